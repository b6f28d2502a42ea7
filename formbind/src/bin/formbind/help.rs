//! Long-help decoration: styled headings, per-command examples and the
//! environment variable appendix.

use std::fmt::Write;

use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Color as ClapColor, RgbColor, Style};
use clap::{ColorChoice, Command};
use colored::control::ShouldColorize;
use colored::{Color, Colorize};

use crate::examples::{ExampleGroup, examples_for};
use crate::theme::{GLYPHS, PALETTE};

const ENVIRONMENT_VARIABLES: &[(&str, &str)] = &[
    ("RUST_LOG", "Log filter for parser diagnostics, e.g. formbind=debug"),
    ("NO_COLOR", "Disable colored output"),
    ("FORMBIND_ASCII", "Use ASCII status markers instead of Unicode"),
];

/// Applies styles, examples and the appendix to the root command.
pub fn decorate(command: Command) -> Command {
    let use_color = ShouldColorize::from_env().should_colorize();
    let names: Vec<String> = command
        .get_subcommands()
        .map(|subcommand| subcommand.get_name().to_string())
        .collect();

    let mut command = command
        .styles(styles())
        .color(if use_color { ColorChoice::Auto } else { ColorChoice::Never })
        .after_long_help(appendix(use_color));
    for name in names {
        if let Some(groups) = examples_for(&name) {
            let text = examples_text(groups, use_color);
            command = command.mut_subcommand(name, |subcommand| subcommand.after_long_help(text));
        }
    }
    command
}

fn paint(text: &str, color: Color, bold: bool, use_color: bool) -> String {
    match (use_color, bold) {
        (false, _) => text.to_string(),
        (true, false) => text.color(color).to_string(),
        (true, true) => text.color(color).bold().to_string(),
    }
}

fn examples_text(groups: &[ExampleGroup], use_color: bool) -> String {
    let mut text = String::new();
    let _ = writeln!(text, "{}", paint("Examples:", PALETTE.heading, true, use_color));
    for (index, group) in groups.iter().enumerate() {
        if index > 0 {
            text.push('\n');
        }
        let _ = writeln!(text, "  {}", paint(group.title, PALETTE.key, true, use_color));
        for line in group.commands {
            let _ = writeln!(
                text,
                "    {} {}",
                paint(GLYPHS.arrow, PALETTE.muted, false, use_color),
                paint(line, PALETTE.accent, false, use_color)
            );
        }
    }
    text
}

fn appendix(use_color: bool) -> String {
    let mut text = String::new();
    let _ = writeln!(text, "{}", paint("Environment Variables:", PALETTE.heading, true, use_color));
    let width = ENVIRONMENT_VARIABLES.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
    for (name, description) in ENVIRONMENT_VARIABLES {
        let padded = format!("{name:<width$}");
        let _ = writeln!(
            text,
            "  {}  {}",
            paint(&padded, PALETTE.key, true, use_color),
            paint(description, PALETTE.value, false, use_color)
        );
    }
    let _ = writeln!(
        text,
        "\n{} {}",
        paint("Tip:", PALETTE.heading, true, use_color),
        paint("'formbind <command> --help' lists examples for each command.", PALETTE.accent, false, use_color)
    );
    text
}

fn styles() -> Styles {
    let fg = |color: Color| Style::new().fg_color(Some(clap_color(color)));
    Styles::styled()
        .usage(fg(PALETTE.heading).bold())
        .header(fg(PALETTE.heading).bold())
        .literal(fg(PALETTE.accent))
        .placeholder(fg(PALETTE.muted))
        .valid(fg(PALETTE.success))
        .invalid(fg(PALETTE.warning))
        .error(fg(PALETTE.error).bold())
}

fn clap_color(color: Color) -> ClapColor {
    let ansi = match color {
        Color::TrueColor { r, g, b } => return ClapColor::Rgb(RgbColor(r, g, b)),
        Color::Black => AnsiColor::Black,
        Color::Red => AnsiColor::Red,
        Color::Green => AnsiColor::Green,
        Color::Yellow => AnsiColor::Yellow,
        Color::Blue => AnsiColor::Blue,
        Color::Magenta => AnsiColor::Magenta,
        Color::Cyan => AnsiColor::Cyan,
        Color::White => AnsiColor::White,
        Color::BrightBlack => AnsiColor::BrightBlack,
        Color::BrightRed => AnsiColor::BrightRed,
        Color::BrightGreen => AnsiColor::BrightGreen,
        Color::BrightYellow => AnsiColor::BrightYellow,
        Color::BrightBlue => AnsiColor::BrightBlue,
        Color::BrightMagenta => AnsiColor::BrightMagenta,
        Color::BrightCyan => AnsiColor::BrightCyan,
        Color::BrightWhite => AnsiColor::BrightWhite,
    };
    ClapColor::Ansi(ansi)
}
