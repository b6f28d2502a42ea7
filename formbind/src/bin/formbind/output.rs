use anyhow::Result;
use clap::ValueEnum;
use colored::{Color, Colorize};
use comfy_table::{Attribute, Cell, Color as CellColor, ContentArrangement, Table, presets};
use serde::Serialize;

use crate::theme::{GLYPHS, PALETTE};

/// How command results are rendered
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable tables (default)
    #[default]
    Table,
    /// Pretty-printed JSON for scripts
    Json,
    /// One line per result
    Compact,
}

#[derive(Clone, Debug, Default)]
pub struct GlobalOptions {
    pub output_format: OutputFormat,
    pub quiet: bool,
    pub verbose: bool,
    pub no_color: bool,
}

/// A command result that can be shown as a table or a single line.
///
/// JSON output goes through `Serialize` instead.
pub trait TableDisplay {
    fn to_table(&self, options: &GlobalOptions) -> Table;
    fn to_compact(&self) -> String;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Status {
    Success,
    Error,
    Warning,
    Info,
    Verbose,
}

impl Status {
    fn glyph(self) -> &'static str {
        match self {
            Status::Success => GLYPHS.success,
            Status::Error => GLYPHS.error,
            Status::Warning => GLYPHS.warning,
            Status::Info => GLYPHS.info,
            Status::Verbose => GLYPHS.arrow,
        }
    }

    fn color(self) -> Color {
        match self {
            Status::Success => PALETTE.success,
            Status::Error => PALETTE.error,
            Status::Warning => PALETTE.warning,
            Status::Info => PALETTE.info,
            Status::Verbose => PALETTE.muted,
        }
    }

    /// Errors always show; success and info lines are table-only.
    fn visible(self, options: &GlobalOptions) -> bool {
        match self {
            Status::Error => true,
            Status::Warning => !options.quiet,
            Status::Verbose => options.verbose && !options.quiet,
            Status::Success | Status::Info => !options.quiet && options.output_format == OutputFormat::Table,
        }
    }

    fn to_stderr(self) -> bool {
        matches!(self, Status::Error | Status::Warning | Status::Verbose)
    }
}

/// Writes command results and status lines according to [`GlobalOptions`].
pub struct Console {
    pub options: GlobalOptions,
}

impl Console {
    pub fn new(options: GlobalOptions) -> Self {
        Self { options }
    }

    fn decorations(&self) -> bool {
        !self.options.quiet && self.options.output_format == OutputFormat::Table
    }

    fn paint(&self, text: &str, color: Color) -> String {
        if self.options.no_color {
            text.to_string()
        } else {
            text.color(color).to_string()
        }
    }

    fn status(&self, status: Status, message: &str) {
        if !status.visible(&self.options) {
            return;
        }
        let line = format!("{} {}", self.paint(status.glyph(), status.color()), self.paint(message, status.color()));
        if status.to_stderr() {
            eprintln!("{line}");
        } else {
            println!("{line}");
        }
    }

    pub fn success(&self, message: &str) {
        self.status(Status::Success, message);
    }

    pub fn error(&self, message: &str) {
        self.status(Status::Error, message);
    }

    pub fn warning(&self, message: &str) {
        self.status(Status::Warning, message);
    }

    pub fn info(&self, message: &str) {
        self.status(Status::Info, message);
    }

    /// Shown only with `--verbose`.
    pub fn verbose(&self, message: &str) {
        self.status(Status::Verbose, message);
    }

    pub fn heading(&self, text: &str) {
        if !self.decorations() {
            return;
        }
        if self.options.no_color {
            println!("{text}\n{}", "=".repeat(text.chars().count()));
        } else {
            println!("{}", text.color(PALETTE.heading).bold());
        }
    }

    pub fn key_value(&self, key: &str, value: &str) {
        if self.decorations() {
            println!("{}: {}", self.paint(key, PALETTE.key), self.paint(value, PALETTE.value));
        }
    }

    /// Renders `data` in the configured format without printing it.
    pub fn render<T>(&self, data: &T) -> Result<String>
    where
        T: Serialize + TableDisplay,
    {
        Ok(match self.options.output_format {
            OutputFormat::Table => data.to_table(&self.options).to_string(),
            OutputFormat::Json => serde_json::to_string_pretty(data)?,
            OutputFormat::Compact => data.to_compact(),
        })
    }

    pub fn display<T>(&self, data: &T) -> Result<()>
    where
        T: Serialize + TableDisplay,
    {
        if !self.options.quiet {
            println!("{}", self.render(data)?);
        }
        Ok(())
    }
}

/// Empty table with a bold header row; ASCII borders when color is off.
pub fn table_with_header(headers: &[&str], options: &GlobalOptions) -> Table {
    let mut table = Table::new();
    table
        .load_preset(if options.no_color {
            presets::ASCII_FULL
        } else {
            presets::UTF8_FULL_CONDENSED
        })
        .set_content_arrangement(ContentArrangement::Dynamic);
    let header: Vec<Cell> = headers
        .iter()
        .map(|title| {
            let cell = Cell::new(title).add_attribute(Attribute::Bold);
            if options.no_color { cell } else { cell.fg(CellColor::Cyan) }
        })
        .collect();
    table.set_header(header);
    table
}
