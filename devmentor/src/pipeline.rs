//! The request pipeline: validate, build the prompt, call the model, shape
//! the reply.
//!
//! One [`Gateway`] is built at process start with an injected model client
//! and passed explicitly to every route (dependency injection, no ambient
//! lookup). Requests share nothing mutable, so concurrent calls need no
//! locking; the model call is the only suspension point, and dropping the
//! request future (client disconnect) drops the in-flight call with it.

use std::sync::Arc;
use std::time::Instant;

use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::capability::Capability;
use crate::error::GatewayError;
use crate::llm::{ModelClient, ModelReply};
use crate::prompt::build_prompt;
use crate::shape::{shape, ShapeLimits, ShapedResult};
use crate::validate::validate;

/// One gateway instance shared by every route.
pub struct Gateway {
    model: Arc<dyn ModelClient>,
    limits: ShapeLimits,
}

impl Gateway {
    pub fn new(model: Arc<dyn ModelClient>, limits: ShapeLimits) -> Self {
        Self { model, limits }
    }

    /// Runs the full pipeline for one request.
    ///
    /// Stages short-circuit with `?`: a validation failure returns before the
    /// prompt is built and performs no network call.
    pub async fn handle(
        &self,
        capability: Capability,
        fields: &Map<String, Value>,
    ) -> Result<ShapedResult, GatewayError> {
        let request = validate(capability, fields)?;
        let prompt = build_prompt(&request);
        let reply = self.call_model(capability, &prompt).await?;
        shape(capability, &reply.text, &self.limits)
    }

    /// Wraps the model call with latency measurement and logging. Errors are
    /// already normalized by the client; nothing is swallowed here.
    async fn call_model(
        &self,
        capability: Capability,
        prompt: &str,
    ) -> Result<ModelReply, GatewayError> {
        let started = Instant::now();
        match self.model.complete(prompt).await {
            Ok(text) => {
                let latency = started.elapsed();
                info!(
                    capability = capability.as_str(),
                    latency_ms = latency.as_millis() as u64,
                    "model call succeeded"
                );
                Ok(ModelReply { text, latency })
            }
            Err(err) => {
                warn!(
                    capability = capability.as_str(),
                    latency_ms = started.elapsed().as_millis() as u64,
                    kind = err.kind(),
                    "model call failed"
                );
                Err(err)
            }
        }
    }
}
