// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

pub mod conversion;
pub mod literals;
pub mod nodes;
