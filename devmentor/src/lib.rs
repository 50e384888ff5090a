//! # devmentor
//!
//! Core gateway for the devmentor learning-assistant API. Five capabilities
//! (explain, debug, summarize, quiz, roadmap) share one request pipeline:
//! validate the raw fields, build a fenced prompt, call the model provider,
//! then shape the raw text into the capability's response structure.
//!
//! Everything here is per-request and stateless; the only long-lived value is
//! a [`Gateway`] built once at startup with an injected [`ModelClient`].
//!
//! ## Main modules
//!
//! - [`capability`]: [`Capability`] tags and validated [`CapabilityRequest`]s.
//! - [`mod@validate`]: the fixed required-field table and [`validate()`](validate::validate).
//! - [`prompt`]: deterministic templates with a fenced user-content section.
//! - [`llm`]: [`ModelClient`] trait, [`OpenAiModel`], [`MockModel`].
//! - [`shape`]: [`ShapedResult`] plus per-capability parsing rules.
//! - [`pipeline`]: [`Gateway`], the stage sequencer.
//! - [`error`]: [`GatewayError`] taxonomy with stable wire kinds.

pub mod capability;
pub mod error;
pub mod llm;
pub mod pipeline;
pub mod prompt;
pub mod shape;
pub mod validate;

pub use capability::{Capability, CapabilityRequest};
pub use error::GatewayError;
pub use llm::{MockModel, MockReply, ModelClient, ModelReply, OpenAiModel, OpenAiOptions};
pub use pipeline::Gateway;
pub use prompt::build_prompt;
pub use shape::{QuizQuestion, RoadmapStep, ShapeLimits, ShapedResult};
pub use validate::validate;
