use anyhow::Result;
use clap::Subcommand;
use comfy_table::{Cell, Table};
use serde::Serialize;

use formbind::registered_schemas;
use formbind::types::{CompactFormat, ErrorPolicy, Schema};

use crate::commands::resolve_schema;
use crate::examples::ExampleGroup;
use crate::output::{Console, GlobalOptions, TableDisplay, table_with_header};

pub const EXAMPLES: &[ExampleGroup] = &[
    ExampleGroup {
        title: "List Schemas",
        commands: &[
            "formbind schema list                    # Every registered entity",
            "formbind --output json schema list      # Machine-readable listing",
        ],
    },
    ExampleGroup {
        title: "Inspect a Schema",
        commands: &[
            "formbind schema show employee           # Fields, keys, defaults and rules",
            "formbind schema show CatalogProduct     # Type names work too",
        ],
    },
];

#[derive(Subcommand)]
pub enum SchemaCommands {
    /// List registered entity schemas
    #[command(name = "list")]
    List,

    /// Show the fields and rules of one schema
    #[command(name = "show")]
    Show {
        /// Entity or type name (case-insensitive)
        entity: String,
    },
}

pub fn handle_schema_commands(command: SchemaCommands, output: &Console) -> Result<()> {
    match command {
        SchemaCommands::List => handle_list(output),
        SchemaCommands::Show { entity } => handle_show(&entity, output),
    }
}

#[derive(Serialize)]
struct SchemaSummary {
    entity: &'static str,
    type_name: &'static str,
    compact_field: String,
    mode: &'static str,
    layout: String,
    fields: usize,
}

impl SchemaSummary {
    fn new(entity: &'static str, type_name: &'static str, schema: &Schema) -> Self {
        Self {
            entity,
            type_name,
            compact_field: schema.compact_field.clone(),
            mode: mode_label(schema),
            layout: schema.expected_layout(),
            fields: schema.fields.len(),
        }
    }
}

#[derive(Serialize)]
#[serde(transparent)]
struct SchemaList(Vec<SchemaSummary>);

impl TableDisplay for SchemaList {
    fn to_table(&self, options: &GlobalOptions) -> Table {
        let mut table = table_with_header(&["Entity", "Type", "Compact field", "Mode", "Layout"], options);
        for summary in &self.0 {
            table.add_row(vec![
                Cell::new(summary.entity),
                Cell::new(summary.type_name),
                Cell::new(&summary.compact_field),
                Cell::new(summary.mode),
                Cell::new(&summary.layout),
            ]);
        }
        table
    }

    fn to_compact(&self) -> String {
        self.0.iter().map(|summary| summary.entity).collect::<Vec<_>>().join(" ")
    }
}

fn handle_list(output: &Console) -> Result<()> {
    let summaries: Vec<SchemaSummary> = registered_schemas()
        .into_iter()
        .map(|registration| SchemaSummary::new(registration.entity, registration.type_name, registration.schema()))
        .collect();

    if summaries.is_empty() {
        output.warning("No schemas are registered");
        return Ok(());
    }

    output.heading("Registered Schemas");
    output.display(&SchemaList(summaries))?;
    output.info("Use 'formbind schema show <entity>' to see field details.");
    Ok(())
}

struct SchemaDetail(&'static Schema);

impl Serialize for SchemaDetail {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl TableDisplay for SchemaDetail {
    fn to_table(&self, options: &GlobalOptions) -> Table {
        let mut table = table_with_header(&["Key", "Field", "Type", "Required", "Compact", "Default", "Rules"], options);
        for field in &self.0.fields {
            let rules: Vec<String> = field.validations.iter().map(|rule| rule.describe()).collect();
            table.add_row(vec![
                Cell::new(&field.key),
                Cell::new(&field.name),
                Cell::new(field.kind.label()),
                Cell::new(if field.optional { "no" } else { "yes" }),
                Cell::new(if field.compact { "yes" } else { "no" }),
                Cell::new(field.default.as_deref().unwrap_or("")),
                Cell::new(rules.join(", ")),
            ]);
        }
        table
    }

    fn to_compact(&self) -> String {
        self.0.expected_layout()
    }
}

fn handle_show(name: &str, output: &Console) -> Result<()> {
    let schema = resolve_schema(name)?;

    output.heading(&format!("{} ({})", schema.entity, schema.type_name));
    output.key_value("Compact field", &schema.compact_field);
    output.key_value("Mode", mode_label(schema));
    output.key_value("Layout", &schema.expected_layout());
    output.key_value(
        "Errors",
        match schema.error_policy {
            ErrorPolicy::FailFast => "fail fast",
            ErrorPolicy::CollectAll => "collect all",
        },
    );
    output.display(&SchemaDetail(schema))?;
    Ok(())
}

fn mode_label(schema: &Schema) -> &'static str {
    match schema.format {
        CompactFormat::Positional { .. } => "positional",
        CompactFormat::KeyValue { .. } => "key:value",
    }
}
