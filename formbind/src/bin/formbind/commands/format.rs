use anyhow::Result;
use clap::Args;
use serde_json::json;

use formbind::{format_record_with, parse};

use crate::commands::{reject, resolve_schema};
use crate::context::CliContext;
use crate::examples::ExampleGroup;
use crate::output::{Console, OutputFormat};

pub const EXAMPLES: &[ExampleGroup] = &[ExampleGroup {
    title: "Normalize Compact Strings",
    commands: &[
        "formbind format product 'Notebook - A5 dotted - 4.50'   # Notebook-A5 dotted-4.50",
        "formbind format student 'gpa:3.5|name:Alice|...'       # Canonical key order and casing",
        "formbind --output json format course 'Rust 101|2024-09-01'",
    ],
}];

#[derive(Args)]
pub struct FormatArgs {
    /// Entity or type name (case-insensitive)
    pub entity: String,

    /// Raw compact string to normalize
    pub raw: String,
}

pub fn handle_format(args: FormatArgs, ctx: &CliContext, output: &Console) -> Result<()> {
    let schema = resolve_schema(&args.entity)?;
    let options = ctx.parse_options();

    let record = match parse(&args.raw, schema, &options) {
        Ok(record) => record,
        Err(errors) => return Err(reject(output, &schema.entity, &errors)),
    };
    let canonical = match format_record_with(&record, schema, &options) {
        Ok(canonical) => canonical,
        Err(errors) => return Err(reject(output, &schema.entity, &errors)),
    };

    if output.options.quiet {
        return Ok(());
    }
    match output.options.output_format {
        OutputFormat::Json => {
            let body = json!({ "entity": schema.entity, "compact": canonical });
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        OutputFormat::Table | OutputFormat::Compact => println!("{canonical}"),
    }
    Ok(())
}
