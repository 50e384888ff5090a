//! Capability set and validated request types.
//!
//! [`Capability`] is the dispatch tag: one variant per endpoint, selected once
//! at routing and threaded through the pipeline as a value. [`CapabilityRequest`]
//! holds the validated, typed fields; constructing one goes through
//! [`validate`](crate::validate::validate).

use std::str::FromStr;

/// Default number of quiz questions when the request omits `count`.
pub const DEFAULT_QUIZ_COUNT: u8 = 5;

/// Upper bound on requested quiz questions; larger values are clamped.
pub const MAX_QUIZ_COUNT: u8 = 10;

/// One of the five supported request types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Capability {
    Explain,
    Debug,
    Summarize,
    Quiz,
    Roadmap,
}

impl Capability {
    /// All capabilities, in endpoint order.
    pub const ALL: [Capability; 5] = [
        Capability::Explain,
        Capability::Debug,
        Capability::Summarize,
        Capability::Quiz,
        Capability::Roadmap,
    ];

    /// Lowercase name as it appears in the route path (`/api/<name>`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::Explain => "explain",
            Capability::Debug => "debug",
            Capability::Summarize => "summarize",
            Capability::Quiz => "quiz",
            Capability::Roadmap => "roadmap",
        }
    }

    /// Required request fields for this capability. All are strings and must
    /// be non-empty after trimming. Explain lists two names because either
    /// one satisfies the requirement (`code` wins when both are present).
    pub fn required_fields(&self) -> &'static [&'static str] {
        match self {
            Capability::Explain => &["code", "topic"],
            Capability::Debug => &["code"],
            Capability::Summarize => &["text"],
            Capability::Quiz => &["topic"],
            Capability::Roadmap => &["goal"],
        }
    }
}

impl FromStr for Capability {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "explain" => Ok(Capability::Explain),
            "debug" => Ok(Capability::Debug),
            "summarize" => Ok(Capability::Summarize),
            "quiz" => Ok(Capability::Quiz),
            "roadmap" => Ok(Capability::Roadmap),
            _ => Err(format!(
                "unknown capability: {} (use explain, debug, summarize, quiz, or roadmap)",
                s
            )),
        }
    }
}

/// A validated request: the capability tag plus its typed input fields.
///
/// Lives for one request only; nothing here is shared or cached.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CapabilityRequest {
    /// Explain code or a topic. `input` is whichever of `code`/`topic` was sent.
    Explain { input: String },
    /// Diagnose a bug in `code`, optionally with the reported error message.
    Debug {
        code: String,
        error_message: Option<String>,
    },
    /// Summarize free-form text.
    Summarize { text: String },
    /// Generate `count` multiple-choice questions about `topic`.
    Quiz { topic: String, count: u8 },
    /// Produce an ordered learning roadmap for `goal`.
    Roadmap { goal: String },
}

impl CapabilityRequest {
    /// The capability this request belongs to.
    pub fn capability(&self) -> Capability {
        match self {
            CapabilityRequest::Explain { .. } => Capability::Explain,
            CapabilityRequest::Debug { .. } => Capability::Debug,
            CapabilityRequest::Summarize { .. } => Capability::Summarize,
            CapabilityRequest::Quiz { .. } => Capability::Quiz,
            CapabilityRequest::Roadmap { .. } => Capability::Roadmap,
        }
    }
}
