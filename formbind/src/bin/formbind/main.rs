mod commands;
mod context;
mod examples;
mod help;
mod output;
mod theme;

use std::path::PathBuf;

use anyhow::Result;
use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};

use commands::{
    bind::{BindArgs, handle_bind},
    format::{FormatArgs, handle_format},
    parse::{ParseArgs, handle_parse},
    schema::{SchemaCommands, handle_schema_commands},
};
use context::CliContext;
use output::{Console, GlobalOptions, OutputFormat};

#[derive(Parser)]
#[command(name = "formbind", version)]
#[command(
    about = "Bind compact form strings to typed records",
    long_about = r#"Parse, validate and normalize compact form input such as
"Leica M11-Camera-9000" or "Name:Alice|Email:alice@example.com|GPA:3.5".

Commands:
  schema    List and inspect registered entity schemas
  parse     Parse a compact string into a validated record
  format    Normalize a compact string to its canonical form
  bind      Bind form fields the way a submitted form is bound
"#
)]
#[command(subcommand_required = true, arg_required_else_help = true)]
struct Cli {
    /// Output format [default: [output] format from formbind.toml, else table]
    #[arg(long, value_enum, global = true)]
    output: Option<OutputFormat>,

    /// Only print errors
    #[arg(short = 'q', long, global = true)]
    quiet: bool,

    /// Print extra detail to stderr
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Config file to use instead of the nearest formbind.toml
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List and inspect registered entity schemas
    #[command(subcommand)]
    Schema(SchemaCommands),

    /// Parse a compact string into a validated record
    Parse(ParseArgs),

    /// Normalize a compact string to its canonical form
    Format(FormatArgs),

    /// Bind form fields to an entity
    Bind(BindArgs),
}

fn main() {
    env_logger::init();

    let matches = help::decorate(Cli::command()).get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|err| err.exit());

    if let Err(err) = execute(cli) {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

fn execute(cli: Cli) -> Result<()> {
    let ctx = CliContext::load(cli.config.as_deref())?;

    let options = GlobalOptions {
        output_format: ctx.output_format(cli.output)?,
        quiet: cli.quiet,
        verbose: cli.verbose,
        no_color: cli.no_color,
    };
    if options.no_color {
        colored::control::set_override(false);
    }

    let console = Console::new(options);
    match &ctx.config_path {
        Some(path) => console.verbose(&format!("Using config {}", path.display())),
        None => console.verbose("No formbind.toml found; using defaults"),
    }

    match cli.command {
        Commands::Schema(command) => handle_schema_commands(command, &console),
        Commands::Parse(args) => handle_parse(args, &ctx, &console),
        Commands::Format(args) => handle_format(args, &ctx, &console),
        Commands::Bind(args) => handle_bind(args, &ctx, &console),
    }
}
