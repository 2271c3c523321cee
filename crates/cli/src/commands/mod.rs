//! CLI command implementations.

pub mod catalog;
pub mod state;

use std::path::PathBuf;

use aurora_storefront::catalog::CatalogError;
use aurora_storefront::config::ConfigError;
use serde::Serialize;

/// Errors surfaced by CLI commands.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("failed to encode output: {0}")]
    Json(#[from] serde_json::Error),
}

/// How results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Text,
    Json,
}

/// `--data-dir` if given, otherwise `STOREFRONT_DATA_DIR` (default `data`).
///
/// # Errors
///
/// Returns `CommandError::Config` if the environment holds an invalid value.
pub fn resolve_data_dir(flag: Option<PathBuf>) -> Result<PathBuf, CommandError> {
    if let Some(dir) = flag {
        return Ok(dir);
    }
    Ok(aurora_storefront::config::StorefrontConfig::from_env()?.data_dir)
}

/// Print `lines` as text, or `value` as pretty JSON.
#[allow(clippy::print_stdout)]
fn emit<T: Serialize + ?Sized>(
    format: Format,
    value: &T,
    lines: impl FnOnce() -> Vec<String>,
) -> Result<(), CommandError> {
    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(value)?),
        Format::Text => {
            for line in lines() {
                println!("{line}");
            }
        }
    }
    Ok(())
}
