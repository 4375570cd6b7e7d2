//! CLI error type: wraps engine errors and scenario-file problems behind
//! one type so `main` has a single place to format a failure.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Engine(#[from] md2d_engine::EngineError),

    #[error("invalid scenario: {0}")]
    Scenario(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
