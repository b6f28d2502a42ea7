use crate::commands::{bind, format, parse, schema};

/// A titled set of sample invocations shown in `--help`.
pub struct ExampleGroup {
    pub title: &'static str,
    pub commands: &'static [&'static str],
}

/// Example groups for a top-level subcommand, if it has any.
pub fn examples_for(subcommand: &str) -> Option<&'static [ExampleGroup]> {
    match subcommand {
        "schema" => Some(schema::EXAMPLES),
        "parse" => Some(parse::EXAMPLES),
        "format" => Some(format::EXAMPLES),
        "bind" => Some(bind::EXAMPLES),
        _ => None,
    }
}
