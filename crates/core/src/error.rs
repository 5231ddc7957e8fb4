//! Error types for the relay domain.
//!
//! Uses `thiserror` for ergonomic error definitions. The gateway maps each
//! variant onto an HTTP status; every server-side failure collapses into the
//! same opaque 500 body, so the variant only matters for logs and tests.

use thiserror::Error;

/// The top-level error type for all relay operations.
#[derive(Debug, Error)]
pub enum RelayError {
    // --- Upstream errors ---
    #[error("Channel not found: {0}")]
    ChannelNotFound(String),

    #[error("Upstream {service} request failed: {reason}")]
    Upstream { service: &'static str, reason: String },

    // --- Session errors ---
    #[error("Relay is not configured: no setup call has been made")]
    NotConfigured,

    #[error("Relay session is missing field: {0}")]
    MissingField(&'static str),

    #[error("Relay session not found: {0}")]
    SessionNotFound(String),

    // --- Inbound request errors ---
    #[error("Unsupported media type: setup requests must be application/json")]
    UnsupportedMediaType,

    #[error("Invalid setup payload: {0}")]
    InvalidPayload(String),
}

impl RelayError {
    /// Shorthand for an upstream failure against the named service.
    pub fn upstream(service: &'static str, reason: impl Into<String>) -> Self {
        Self::Upstream {
            service,
            reason: reason.into(),
        }
    }

    /// Whether this error was caused by the inbound request rather than by
    /// relay state or an upstream platform.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::UnsupportedMediaType | Self::InvalidPayload(_))
    }
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, RelayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_error_displays_service_and_reason() {
        let err = RelayError::upstream("slack", "connection refused");
        assert!(err.to_string().contains("slack"));
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn channel_not_found_names_channel() {
        let err = RelayError::ChannelNotFound("general".into());
        assert_eq!(err.to_string(), "Channel not found: general");
    }

    #[test]
    fn client_errors_are_classified() {
        assert!(RelayError::UnsupportedMediaType.is_client_error());
        assert!(RelayError::InvalidPayload("missing field".into()).is_client_error());
        assert!(!RelayError::NotConfigured.is_client_error());
        assert!(!RelayError::MissingField("channel_id").is_client_error());
    }
}
