use anyhow::Result;
use chrono::NaiveDate;
use clap::Args;

use formbind::options::ParseOptions;
use formbind::parse;
use formbind::types::ErrorPolicy;

use crate::commands::{RecordView, reject, resolve_schema};
use crate::context::CliContext;
use crate::examples::ExampleGroup;
use crate::output::Console;

pub const EXAMPLES: &[ExampleGroup] = &[
    ExampleGroup {
        title: "Positional Input",
        commands: &[
            "formbind parse course 'Rust 101|2024-09-01'",
            "formbind parse catalog_product 'Leica M11-Camera-9000'   # Defaults fill the rest",
        ],
    },
    ExampleGroup {
        title: "Key:Value Input",
        commands: &[
            "formbind parse student 'Name:Alice|Email:alice@example.com|Phone:0912345678|DOB:2000-01-15|GPA:3.5'",
            "formbind parse student 'Name:Al|GPA:5' --collect-all      # Report every issue",
            "formbind parse student '...' --today 2025-06-01           # Pin the age reference date",
        ],
    },
];

#[derive(Args)]
pub struct ParseArgs {
    /// Entity or type name (case-insensitive)
    pub entity: String,

    /// Raw compact string
    pub raw: String,

    /// Report every issue instead of stopping at the first
    #[arg(long, conflicts_with = "fail_fast")]
    pub collect_all: bool,

    /// Stop at the first issue
    #[arg(long)]
    pub fail_fast: bool,

    /// Reference date for age rules (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub today: Option<NaiveDate>,
}

impl ParseArgs {
    pub fn options(&self, base: ParseOptions) -> ParseOptions {
        let mut options = base;
        if self.collect_all {
            options = options.with_error_policy(ErrorPolicy::CollectAll);
        } else if self.fail_fast {
            options = options.with_error_policy(ErrorPolicy::FailFast);
        }
        if let Some(today) = self.today {
            options = options.with_today(today);
        }
        options
    }
}

pub fn handle_parse(args: ParseArgs, ctx: &CliContext, output: &Console) -> Result<()> {
    let schema = resolve_schema(&args.entity)?;
    let options = args.options(ctx.parse_options());
    output.verbose(&format!("Parsing {} using layout {}", schema.entity, schema.expected_layout()));

    match parse(&args.raw, schema, &options) {
        Ok(record) => {
            output.success(&format!("Parsed {} ({} fields)", schema.entity, record.len()));
            output.display(&RecordView::new(&record, schema, &options))?;
            Ok(())
        }
        Err(errors) => Err(reject(output, &schema.entity, &errors)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(collect_all: bool, fail_fast: bool) -> ParseArgs {
        ParseArgs {
            entity: "student".to_string(),
            raw: String::new(),
            collect_all,
            fail_fast,
            today: NaiveDate::from_ymd_opt(2025, 6, 1),
        }
    }

    #[test]
    fn test_flags_override_configured_policy() {
        let base = ParseOptions::new().with_error_policy(ErrorPolicy::FailFast);
        let options = args(true, false).options(base.clone());
        assert_eq!(options.error_policy, Some(ErrorPolicy::CollectAll));
        assert_eq!(options.today, NaiveDate::from_ymd_opt(2025, 6, 1));

        let untouched = args(false, false).options(base);
        assert_eq!(untouched.error_policy, Some(ErrorPolicy::FailFast));
    }
}
