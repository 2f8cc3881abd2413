use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::time::Duration;
use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum Error {
    /// The `filename` query parameter was not supplied
    #[error("filename not supplied")]
    MissingFilename,

    /// HTTP method other than GET/PUT/DELETE on the file route
    #[error("unsupported method")]
    UnsupportedMethod,

    /// File system failure, passed through with the raw OS error message.
    /// Acceptable detail leak for a loopback-only trusted tool.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Invalid configuration, caught before the server starts
    #[error("{message}")]
    Startup { message: String },

    /// Cleanup did not finish before the shutdown deadline. The top-level
    /// caller must treat this as a non-recoverable process exit.
    #[error("Clean-up timeout. Not finished within {deadline:?}.")]
    CleanupTimeout { deadline: Duration },
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            // Both client faults report as 404, not 400
            Error::MissingFilename | Error::UnsupportedMethod => StatusCode::NOT_FOUND,
            Error::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            // Never reaches an HTTP response; these abort startup/shutdown
            Error::Startup { .. } | Error::CleanupTimeout { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Every failure gets exactly one log line carrying the error and the
        // status code reported to the client.
        match &self {
            Error::MissingFilename | Error::UnsupportedMethod => {
                tracing::debug!("Client error: {} ({})", self, status.as_u16());
            }
            _ => {
                tracing::error!("Request failed: {} ({})", self, status.as_u16());
            }
        }

        (status, self.to_string()).into_response()
    }
}

/// Type alias for fallible shell operations
pub type Result<T> = std::result::Result<T, Error>;
