//! Built-in management commands.
//!
//! Each command implements the
//! [`ManagementCommand`](crate::command::ManagementCommand) trait and works
//! on schema files declared in TOML or JSON.

pub mod check;
pub mod describe;
pub mod validate;

use std::path::PathBuf;
use std::sync::Arc;

pub use check::CheckCommand;
pub use describe::DescribeCommand;
pub use validate::ValidateCommand;

use casper_core::CasperError;
use casper_forms::{schema_loader, FormSchema};

use crate::command::CommandRegistry;

/// Registers all built-in management commands into the given registry.
pub fn register_builtin_commands(registry: &mut CommandRegistry) {
    registry.register(Box::new(ValidateCommand));
    registry.register(Box::new(DescribeCommand));
    registry.register(Box::new(CheckCommand));
}

/// The `--schema` argument shared by the built-in commands.
pub(crate) fn schema_arg() -> clap::Arg {
    clap::Arg::new("schema")
        .long("schema")
        .short('s')
        .required(true)
        .value_parser(clap::value_parser!(PathBuf))
        .help("Schema declaration file (.toml or .json)")
}

/// Loads the schema named by `--schema`.
pub(crate) fn load_schema(matches: &clap::ArgMatches) -> Result<Arc<FormSchema>, CasperError> {
    let path = matches
        .get_one::<PathBuf>("schema")
        .ok_or_else(|| CasperError::ConfigurationError("--schema is required".to_string()))?;
    Ok(schema_loader::from_file(path)?.into_shared())
}
