//! Error taxonomy for the gateway pipeline.
//!
//! Every failure a capability request can hit is one of these variants. The
//! serve crate maps variants to HTTP statuses; [`GatewayError::kind`] is the
//! stable wire identifier carried in error bodies. Upstream messages are
//! sanitized at the adapter boundary: status codes only, never the provider
//! body or the credential.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    /// A required field is missing, empty, or has the wrong JSON type.
    #[error("invalid request: field `{field}`: {reason}")]
    InvalidRequest {
        field: &'static str,
        reason: String,
    },
    /// The upstream call exceeded the configured deadline. The in-flight
    /// call is abandoned; a late result is discarded with it.
    #[error("model call timed out")]
    Timeout,
    /// The provider rejected the call with a rate-limit status.
    #[error("model provider rate-limited the request")]
    RateLimited,
    /// Any other upstream failure: network error, 5xx after the retry, or a
    /// malformed completion payload.
    #[error("upstream failure: {0}")]
    Upstream(String),
    /// The provider rejected the credential.
    #[error("model provider rejected the credential")]
    Auth,
    /// Model text could not be coerced into the capability's output shape.
    /// Never recovered by guessing at structure.
    #[error("unparseable model response: {0}")]
    Unparseable(String),
}

impl GatewayError {
    /// Stable wire identifier for this error, used in HTTP error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            GatewayError::InvalidRequest { .. } => "InvalidRequest",
            GatewayError::Timeout => "Timeout",
            GatewayError::RateLimited => "RateLimited",
            GatewayError::Upstream(_) => "UpstreamError",
            GatewayError::Auth => "AuthError",
            GatewayError::Unparseable(_) => "UnparseableResponse",
        }
    }

    /// Shorthand for a missing required field.
    pub(crate) fn missing(field: &'static str) -> Self {
        GatewayError::InvalidRequest {
            field,
            reason: "required and must be a non-empty string".to_string(),
        }
    }
}
