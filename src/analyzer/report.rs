//! Report text buffer

use std::fmt::{self, Write};

use crate::constants::BANNER_WIDTH;
use crate::utils::dump::hex_dump;

/// Append-only writer for one analysis pass.
///
/// Verbose-only output goes through [`ReportWriter::verbose_line`] and
/// [`ReportWriter::verbose_dump`] and is dropped when verbose is off.
#[derive(Debug, Default)]
pub struct ReportWriter {
    verbose: bool,
    buf: String,
}

impl ReportWriter {
    pub fn new(verbose: bool) -> Self {
        Self {
            verbose,
            buf: String::new(),
        }
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Three-line dashed banner with the title centered in the middle line
    pub fn banner(&mut self, title: &str) {
        let rule = "-".repeat(BANNER_WIDTH);
        let label = format!(" {} ", title);
        let dashes = BANNER_WIDTH.saturating_sub(label.len());
        let left = (dashes + 1) / 2;
        self.blank();
        self.raw_line(&rule);
        self.raw_line(&format!("{}{}{}", "-".repeat(left), label, "-".repeat(dashes - left)));
        self.raw_line(&rule);
        self.blank();
    }

    pub fn line(&mut self, args: fmt::Arguments<'_>) {
        // Writing into a String cannot fail
        let _ = self.buf.write_fmt(args);
        self.buf.push('\n');
    }

    pub fn raw_line(&mut self, text: &str) {
        self.buf.push_str(text);
        self.buf.push('\n');
    }

    pub fn blank(&mut self) {
        self.buf.push('\n');
    }

    pub fn verbose_line(&mut self, args: fmt::Arguments<'_>) {
        if self.verbose {
            self.line(args);
        }
    }

    /// Hex dump of `data`, verbose only
    pub fn verbose_dump(&mut self, data: &[u8]) {
        if !self.verbose {
            return;
        }
        for line in hex_dump(data) {
            self.raw_line(&line);
        }
    }

    pub fn into_text(self) -> String {
        self.buf
    }
}
