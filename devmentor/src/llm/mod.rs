//! Model client abstraction: the one seam between the pipeline and the
//! external provider.
//!
//! [`ModelClient`] is the trait the pipeline calls; implementations are
//! [`OpenAiModel`] (real provider, timeout + single retry + error
//! normalization) and [`MockModel`] (scripted replies with a call counter,
//! exported so the serve crate's tests can assert call counts).

mod mock;
mod openai;

pub use mock::{MockModel, MockReply};
pub use openai::{OpenAiModel, OpenAiOptions};

use std::time::Duration;

use async_trait::async_trait;

use crate::error::GatewayError;

/// One completion call: prompt in, generated text out.
///
/// Implementations must normalize provider failures into [`GatewayError`]
/// variants and must never leak the credential in an error or log line.
/// The call is the pipeline's only suspension point; dropping the returned
/// future abandons the in-flight request.
#[async_trait]
pub trait ModelClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, GatewayError>;
}

/// Raw model output plus call metadata, assembled by the pipeline around the
/// [`ModelClient::complete`] call.
#[derive(Debug, Clone)]
pub struct ModelReply {
    /// Raw text returned by the provider.
    pub text: String,
    /// Wall-clock duration of the call, logged for observability.
    pub latency: Duration,
}
