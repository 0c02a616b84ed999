// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Simple line-based writer for generating Coq code with proper indentation.

use std::fmt::Display;

/// Tracks indentation and handles line-based output.
/// Empty lines are never indented.
#[derive(Debug)]
pub struct CoqWriter {
    out: String,
    indent: usize,
    at_line_start: bool,
}

impl CoqWriter {
    pub fn new() -> Self {
        Self {
            out: String::new(),
            indent: 0,
            at_line_start: true,
        }
    }

    /// Write a string, handling indentation at line starts.
    /// Multi-line text keeps its own relative indentation.
    pub fn write(&mut self, s: &str) {
        for c in s.chars() {
            if c == '\n' {
                self.out.push('\n');
                self.at_line_start = true;
            } else {
                if self.at_line_start {
                    for _ in 0..self.indent {
                        self.out.push_str("  ");
                    }
                }
                self.at_line_start = false;
                self.out.push(c);
            }
        }
    }

    /// Write a complete line (adds newline at end).
    pub fn line(&mut self, s: &str) {
        self.write(s);
        self.newline();
    }

    /// Write a formatted string; lets `write!(w, ...)` target the writer.
    pub fn write_fmt(&mut self, args: std::fmt::Arguments<'_>) {
        self.write(&args.to_string());
    }

    pub fn newline(&mut self) {
        self.write("\n");
    }

    /// Increase indentation for subsequent lines.
    pub fn indent(&mut self) {
        self.indent += 1;
    }

    /// Decrease indentation for subsequent lines.
    pub fn dedent(&mut self) {
        self.indent = self.indent.saturating_sub(1);
    }

    /// Write `text` one level deeper, then return to the current level.
    pub fn indented(&mut self, text: &str) {
        self.indent();
        self.line(text);
        self.dedent();
    }

    /// Write items separated by a separator string.
    /// Example: `w.sep(", ", &["a", "b", "c"])` writes "a, b, c"
    pub fn sep<I, T>(&mut self, separator: &str, items: I)
    where
        I: IntoIterator<Item = T>,
        T: Display,
    {
        let mut first = true;
        for item in items {
            if !first {
                self.write(separator);
            }
            first = false;
            self.write(&item.to_string());
        }
    }

    /// Write a tuple-like structure: empty→empty_val, single→element, multiple→`(a, b, c)`
    pub fn tuple<I, T>(&mut self, items: I, empty_val: &str)
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: ExactSizeIterator,
        T: Display,
    {
        let iter = items.into_iter();
        match iter.len() {
            0 => self.write(empty_val),
            1 => self.sep("", iter),
            _ => {
                self.write("(");
                self.sep(", ", iter);
                self.write(")");
            }
        }
    }

    pub fn into_inner(self) -> String {
        self.out
    }
}

impl Default for CoqWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Render to a string starting at indentation level zero.
pub fn render_to_string<F>(f: F) -> String
where
    F: FnOnce(&mut CoqWriter),
{
    let mut writer = CoqWriter::new();
    f(&mut writer);
    writer.into_inner()
}
