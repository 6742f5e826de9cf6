//! Client-side failures.

/// Errors raised while talking to the users API.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    /// The base URL or a derived endpoint could not be built.
    #[error("invalid API URL: {message}")]
    InvalidUrl { message: String },
    /// The request never produced a response.
    #[error("request failed: {message}")]
    Transport { message: String },
    /// The API answered with a non-success status.
    #[error("API error {status_code}: {message}")]
    Api { status_code: u16, message: String },
    /// A success response did not match the expected shape.
    #[error("unexpected response body: {message}")]
    Decode { message: String },
}

impl ClientError {
    pub fn invalid_url(message: impl Into<String>) -> Self {
        Self::InvalidUrl {
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    pub fn api(status_code: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status_code,
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// HTTP status reported by the API, when the failure came from one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }
}
