use std::io;

use thiserror::Error;

use crate::error::NnError;

/// Anything that turns a `/predict` call into a 400.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("Did not attempt to load JSON data because the request Content-Type was not 'application/json'.")]
    UnsupportedMediaType,

    #[error("failed to read request body: {0}")]
    Body(#[from] io::Error),

    #[error("Failed to decode JSON object: {0}")]
    Json(#[from] serde_json::Error),

    #[error("request body must be a JSON object")]
    NotAnObject,

    #[error("`input` must be an array of numbers")]
    InputNotArray,

    #[error("`{path}` is not a number")]
    NonNumeric { path: String },

    #[error("`input` has an inhomogeneous shape: `{path}` differs from its siblings")]
    Ragged { path: String },

    #[error(transparent)]
    Model(#[from] NnError),
}

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind {addr}: {reason}")]
    Bind { addr: String, reason: String },
}
