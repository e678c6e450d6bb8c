use std::path::PathBuf;

use thiserror::Error;

/// Errors a game operation can end with. Each one maps to an HTTP status and
/// a `{ "message": ... }` body at the request boundary.
#[derive(Error, Debug)]
pub enum GameError {
    /// Request body is missing, malformed or of the wrong shape.
    #[error("only number allowed")]
    Validation,

    #[error("Invalid game boundaries! Check game tutorial")]
    InvalidBounds { min: i64, max: i64 },

    #[error("Game not found")]
    NotFound(String),

    /// The guess that was just played was the last allowed loss. The game has
    /// already been removed from the store.
    #[error("Game terminated due to consecutive losses")]
    Terminated(String),
}

/// Errors raised while loading a store snapshot.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to read snapshot {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse snapshot {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
