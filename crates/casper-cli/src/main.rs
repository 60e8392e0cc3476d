//! The `casper` management binary.
//!
//! Settings come from `--settings <file>` (or `CASPER_SETTINGS`), TOML
//! unless the file ends in `.json`, with `CASPER_*` environment overrides
//! applied on top.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use casper_cli::command::CommandRegistry;
use casper_cli::commands::register_builtin_commands;
use casper_core::logging::setup_logging;
use casper_core::{settings_loader, CasperError, Settings, SETTINGS};

fn load_settings(path: Option<&Path>) -> Result<Settings, CasperError> {
    let Some(path) = path else {
        return Ok(settings_loader::from_env());
    };
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        settings_loader::from_json_file_with_env(path)
    } else {
        settings_loader::from_toml_file_with_env(path)
    }
}

fn main() -> ExitCode {
    let mut registry = CommandRegistry::new();
    register_builtin_commands(&mut registry);

    let matches = registry
        .build_cli()
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            clap::Arg::new("settings")
                .long("settings")
                .global(true)
                .value_parser(clap::value_parser!(PathBuf))
                .help("Settings file (.toml or .json)"),
        )
        .get_matches();

    let settings_path = matches
        .get_one::<PathBuf>("settings")
        .cloned()
        .or_else(|| std::env::var_os("CASPER_SETTINGS").map(PathBuf::from));
    let settings = match load_settings(settings_path.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("casper: {e}");
            return ExitCode::FAILURE;
        }
    };

    setup_logging(&settings);
    SETTINGS.configure(settings.clone());

    match registry.execute(&matches, &settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            eprintln!("casper: {e}");
            ExitCode::FAILURE
        }
    }
}
