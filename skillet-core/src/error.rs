use thiserror::Error;

use crate::validate::ErrorMap;

/// Failures crossing the REST boundary.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server answered with a non-2xx status. The message comes from the
    /// response body's `message` field when present, else a generic one.
    #[error("{message}")]
    Server { status: u16, message: String },

    #[error("Recipe not found")]
    NotFound,
}

/// Failures turning a draft into a wire payload.
#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("invalid {field}: {message}")]
    InvalidField {
        field: &'static str,
        message: String,
    },

    #[error("failed to serialize recipe fields: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failures from a form-session submission.
#[derive(Error, Debug)]
pub enum SubmitError {
    /// The authoritative validation pass found errors; the network was never
    /// touched. Field paths map to human-readable messages.
    #[error("draft has validation errors")]
    Invalid(ErrorMap),

    /// Another submission from this session is still pending. Rejected, not
    /// queued, so a double-click cannot create a duplicate recipe.
    #[error("a submission is already in flight")]
    InFlight,

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Api(#[from] ApiError),
}
