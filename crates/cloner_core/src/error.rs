use thiserror::Error;

/// Rejected user input; raised before any network call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a valid URL")]
    Empty,
    #[error("Please enter a valid URL ({input}: {reason})")]
    Malformed { input: String, reason: String },
}

/// Fatal failure of one clone operation.
///
/// `Display` is the single human-readable summary surfaced to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CloneError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The service answered with a failure; the message is its own detail text.
    #[error("{0}")]
    RemoteService(String),
    /// The service could not be reached or its answer could not be read.
    #[error("Clone request failed: {0}")]
    Transport(String),
    #[error("Failed to fetch cloned code: {0}")]
    RootFetchFailed(String),
}
