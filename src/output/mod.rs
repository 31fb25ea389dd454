//
//  bitbucket-context
//  output/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Output Module
//!
//! Prints resolved contexts and parsed URLs either as aligned `key: value`
//! lines for people or as pretty JSON for scripts.
//!
//! ## Core Components
//!
//! - [`OutputFormat`]: Text or JSON
//! - [`OutputWriter`]: Writes a value in the selected format
//! - [`TextOutput`]: Implemented by types that have a human-readable form
//!
//! ## Example
//!
//! ```rust,ignore
//! use bitbucket_context::output::{OutputFormat, OutputWriter};
//!
//! let writer = OutputWriter::new(OutputFormat::Json);
//! writer.write(&context)?;
//! writer.write_warning("default branch assumed");
//! ```

mod json;
mod text;

pub use json::*;

use std::io::{self, Write};

use serde::Serialize;

/// Output formats supported by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// `key: value` lines.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

/// Writes values to stdout in one [`OutputFormat`].
pub struct OutputWriter {
    format: OutputFormat,
    color: bool,
}

impl OutputWriter {
    /// Creates a writer; colors follow the terminal's capabilities.
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            color: console::colors_enabled(),
        }
    }

    /// Creates a writer with colors explicitly on or off.
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// The selected format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Writes `value` to stdout.
    pub fn write<T: Serialize + TextOutput>(&self, value: &T) -> anyhow::Result<()> {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        self.write_to(&mut handle, value)
    }

    /// Writes `value` to `out`.
    pub fn write_to<W: Write, T: Serialize + TextOutput>(
        &self,
        out: &mut W,
        value: &T,
    ) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Json => write_json_to(out, value)?,
            OutputFormat::Text => value.write_text(out, self.color)?,
        }
        Ok(())
    }

    /// Prints an error message to stderr.
    pub fn write_error(&self, msg: &str) {
        use console::style;
        if self.color {
            eprintln!("{} {}", style("error:").red().bold(), msg);
        } else {
            eprintln!("error: {}", msg);
        }
    }

    /// Prints a warning message to stderr.
    pub fn write_warning(&self, msg: &str) {
        use console::style;
        if self.color {
            eprintln!("{} {}", style("warning:").yellow().bold(), msg);
        } else {
            eprintln!("warning: {}", msg);
        }
    }

    /// Prints a success message to stdout.
    pub fn write_success(&self, msg: &str) {
        use console::style;
        if self.color {
            println!("{} {}", style("✓").green().bold(), msg);
        } else {
            println!("✓ {}", msg);
        }
    }
}

/// Human-readable rendering of a value.
pub trait TextOutput {
    /// Writes the value as `key: value` lines.
    fn write_text(&self, out: &mut dyn Write, color: bool) -> io::Result<()>;
}

/// Writes one `key: value` line, dimming the key when `color` is set.
pub fn write_field(out: &mut dyn Write, key: &str, value: &str, color: bool) -> io::Result<()> {
    use console::style;
    if color {
        writeln!(out, "{:<15} {}", style(format!("{}:", key)).dim(), value)
    } else {
        writeln!(out, "{:<15} {}", format!("{}:", key), value)
    }
}
