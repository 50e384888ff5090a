//! Scripted model client for tests: queued replies plus a call counter.
//!
//! Exported (not test-gated) so downstream crates can drive their own
//! end-to-end tests against a [`Gateway`](crate::pipeline::Gateway) without a
//! network. The counter lets tests assert that validation failures perform no
//! model call.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::ModelClient;
use crate::error::GatewayError;

/// One scripted outcome for a [`MockModel`] call, consumed in order.
#[derive(Debug)]
pub enum MockReply {
    /// Successful completion with this text.
    Text(String),
    /// Fail with the given, already-normalized error.
    Error(GatewayError),
}

impl MockReply {
    /// Convenience for `MockReply::Text(s.to_string())`.
    pub fn text(s: &str) -> Self {
        MockReply::Text(s.to_string())
    }
}

/// Model client that plays back a queue of [`MockReply`]s.
pub struct MockModel {
    replies: Mutex<VecDeque<MockReply>>,
    calls: AtomicUsize,
}

impl MockModel {
    pub fn new(replies: impl IntoIterator<Item = MockReply>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            calls: AtomicUsize::new(0),
        }
    }

    /// One successful reply with the given text.
    pub fn with_text(text: &str) -> Self {
        Self::new([MockReply::text(text)])
    }

    /// Number of `complete` calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ModelClient for MockModel {
    async fn complete(&self, _prompt: &str) -> Result<String, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let reply = self
            .replies
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop_front();
        match reply {
            Some(MockReply::Text(text)) => Ok(text),
            Some(MockReply::Error(err)) => Err(err),
            None => Err(GatewayError::Upstream(
                "mock reply queue exhausted".to_string(),
            )),
        }
    }
}
