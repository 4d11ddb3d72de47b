use thiserror::Error;

/// A single-turn completion request: one system and one user message.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub system_prompt: String,
    pub user_prompt: String,
    pub temperature: f32,
}

/// Errors from a responder call.
#[derive(Debug, Error)]
pub enum ResponderError {
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ResponderError {
    /// The provider's HTTP status, when the provider answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_message_and_status() {
        let err = ResponderError::Api {
            status: 401,
            message: "Incorrect API key provided".to_string(),
        };
        assert_eq!(err.to_string(), "API error 401: Incorrect API key provided");
        assert_eq!(err.status(), Some(401));
    }

    #[test]
    fn invalid_response_has_no_status() {
        let err = ResponderError::InvalidResponse("bad".to_string());
        assert_eq!(err.status(), None);
    }
}
