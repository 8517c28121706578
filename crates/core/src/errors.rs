use thiserror::Error;

/// The failure taxonomy for one command-processing pass.
///
/// Every variant is caught at the top of the pass and rendered with
/// [`PipelineError::user_message`]; nothing here is process-fatal.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum PipelineError {
    #[error("backend unavailable: {message}")]
    BackendUnavailable { message: String },
    #[error("model response was not parseable: {message}")]
    MalformedResponse { message: String },
    #[error("unknown deal field `{field}`")]
    UnknownField { field: String },
    #[error("no deal matches company `{company}`")]
    DealNotFound { company: String },
    #[error("unrecognized action kind `{kind}`")]
    UnrecognizedAction { kind: String },
}

impl PipelineError {
    pub fn backend(message: impl Into<String>) -> Self {
        Self::BackendUnavailable { message: message.into() }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse { message: message.into() }
    }

    /// The chat-style reply relayed across the platform boundary.
    ///
    /// Raw error chains never cross it - every failure becomes either an
    /// `Error:`-prefixed line or a specific diagnostic.
    pub fn user_message(&self) -> String {
        match self {
            Self::BackendUnavailable { message } => {
                format!("Error: backend unavailable ({message})")
            }
            Self::MalformedResponse { message } => {
                format!("Error: could not parse the model response ({message})")
            }
            Self::UnknownField { field } => {
                format!("Error: `{field}` is not a deal field")
            }
            Self::DealNotFound { company } => {
                format!("Could not find a deal for '{company}'")
            }
            Self::UnrecognizedAction { kind } => format!("Unknown action: {kind}"),
        }
    }
}
