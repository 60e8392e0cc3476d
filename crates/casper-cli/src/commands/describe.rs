//! The `describe` management command.
//!
//! Prints a schema's metadata and its ordered field descriptors as JSON,
//! the same document API clients receive.

use casper_core::{CasperError, Settings};
use casper_forms::FormSchema;

use crate::command::ManagementCommand;

/// Prints the JSON description of a declared schema.
pub struct DescribeCommand;

/// Renders the description of `schema`, pretty-printed when `pretty` is set.
pub fn describe_schema(schema: &FormSchema, pretty: bool) -> Result<String, CasperError> {
    let doc = schema.describe();
    let rendered = if pretty {
        serde_json::to_string_pretty(&doc)?
    } else {
        serde_json::to_string(&doc)?
    };
    Ok(rendered)
}

impl ManagementCommand for DescribeCommand {
    fn name(&self) -> &'static str {
        "describe"
    }

    fn help(&self) -> &'static str {
        "Print a schema's field descriptors as JSON"
    }

    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        cmd.arg(super::schema_arg()).arg(
            clap::Arg::new("indent")
                .long("indent")
                .action(clap::ArgAction::SetTrue)
                .help("Pretty-print the output"),
        )
    }

    fn handle(&self, matches: &clap::ArgMatches, _settings: &Settings) -> Result<(), CasperError> {
        let schema = super::load_schema(matches)?;
        println!("{}", describe_schema(&schema, matches.get_flag("indent"))?);
        Ok(())
    }
}
