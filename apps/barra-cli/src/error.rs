//! # CLI Errors
//!
//! Everything the `barra` binary can fail with. Library errors are wrapped
//! as-is so their messages reach the terminal unchanged.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    /// Config file or environment produced an unusable configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Db(#[from] barra_db::DbError),

    #[error(transparent)]
    Core(#[from] barra_core::CoreError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type CliResult<T> = Result<T, CliError>;
