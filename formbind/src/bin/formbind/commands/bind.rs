use anyhow::{Result, bail};
use clap::Args;

use formbind::binding::{FormValues, bind};
use formbind::types::BindPolicy;

use crate::commands::{RecordView, reject, resolve_schema};
use crate::context::CliContext;
use crate::examples::ExampleGroup;
use crate::output::Console;

pub const EXAMPLES: &[ExampleGroup] = &[
    ExampleGroup {
        title: "Bind Form Submissions",
        commands: &[
            "formbind bind product --field 'product=Pen-Blue ink-1.20'     # Compact field wins",
            "formbind bind course --field Name=Rust --field StartDate=2024-09-01",
            "formbind bind course --body 'Name=Rust+101&StartDate=2024-09-01'",
        ],
    },
    ExampleGroup {
        title: "Merge Compact and Standard Fields",
        commands: &["formbind bind quick_product --merge --field 'RawProduct=Pen-1.20-3-true' --field Price=2.00"],
    },
];

#[derive(Args)]
pub struct BindArgs {
    /// Entity or type name (case-insensitive)
    pub entity: String,

    /// Form field as KEY=VALUE (repeatable; takes precedence over --body)
    #[arg(long = "field", value_name = "KEY=VALUE", value_parser = parse_field)]
    pub fields: Vec<(String, String)>,

    /// URL-encoded form body
    #[arg(long)]
    pub body: Option<String>,

    /// Prefer standard fields and fill gaps from the compact field
    #[arg(long)]
    pub merge: bool,
}

impl BindArgs {
    pub fn form_values(&self) -> FormValues {
        let mut form: FormValues = self.fields.iter().cloned().collect();
        if let Some(body) = &self.body {
            for (key, value) in FormValues::from_urlencoded(body).iter() {
                form.insert(key, value);
            }
        }
        form
    }
}

fn parse_field(raw: &str) -> Result<(String, String)> {
    match raw.split_once('=') {
        Some((key, _)) if key.trim().is_empty() => bail!("field key must not be empty in '{raw}'"),
        Some((key, value)) => Ok((key.trim().to_string(), value.to_string())),
        None => bail!("expected KEY=VALUE, got '{raw}'"),
    }
}

pub fn handle_bind(args: BindArgs, ctx: &CliContext, output: &Console) -> Result<()> {
    let schema = resolve_schema(&args.entity)?;
    let mut options = ctx.parse_options();
    if args.merge {
        options = options.with_bind_policy(BindPolicy::Merge);
    }

    let form = args.form_values();
    if form.is_empty() {
        output.warning("No form values supplied; every required field will be reported missing");
    }
    output.verbose(&format!("Binding {} with compact field {}", schema.entity, schema.compact_field));

    match bind(&form, schema, &options) {
        Ok(record) => {
            output.success(&format!("Bound {}", schema.entity));
            output.display(&RecordView::new(&record, schema, &options))?;
            Ok(())
        }
        Err(errors) => Err(reject(output, &schema.entity, &errors)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_field_splits_on_first_equals() {
        assert_eq!(
            parse_field("Url=https://x.test/?a=b").expect("valid"),
            ("Url".to_string(), "https://x.test/?a=b".to_string())
        );
        assert!(parse_field("novalue").is_err());
        assert!(parse_field("=value").is_err());
    }

    #[test]
    fn test_explicit_fields_shadow_body() {
        let args = BindArgs {
            entity: "course".to_string(),
            fields: vec![("Name".to_string(), "Override".to_string())],
            body: Some("name=From+body&StartDate=2024-09-01".to_string()),
            merge: false,
        };
        let form = args.form_values();
        assert_eq!(form.get("name"), Some("Override"));
        assert_eq!(form.get("StartDate"), Some("2024-09-01"));
    }
}
