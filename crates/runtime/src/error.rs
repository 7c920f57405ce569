use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("completion service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("completion service error ({status}): {body}")]
    Service { status: u16, body: String },

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Registration(#[from] tools::RegistrationError),
}

impl Error {
    /// Whether the completion endpoint answered with a failure, as opposed
    /// to not answering at all.
    pub fn is_service_error(&self) -> bool {
        matches!(self, Self::Service { .. } | Self::InvalidResponse(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
