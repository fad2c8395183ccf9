//! Local stand-in for an assistant: picks a canned reply and a "thinking"
//! delay. Scheduling and cancellation live in [`super::ChatStore`].

use rand::Rng;
use std::time::Duration;
use tokio::task::AbortHandle;

use crate::constants::{CANNED_REPLIES, RESPONSE_DELAY_MAX, RESPONSE_DELAY_MIN};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplyPlan {
    pub text: &'static str,
    /// Uniform in `[RESPONSE_DELAY_MIN, RESPONSE_DELAY_MAX)`
    pub delay: Duration,
}

pub fn plan_reply<R: Rng + ?Sized>(rng: &mut R) -> ReplyPlan {
    let min_ms = RESPONSE_DELAY_MIN.as_millis() as u64;
    let max_ms = RESPONSE_DELAY_MAX.as_millis() as u64;
    ReplyPlan {
        text: CANNED_REPLIES[rng.gen_range(0..CANNED_REPLIES.len())],
        delay: Duration::from_millis(rng.gen_range(min_ms..max_ms)),
    }
}

/// A scheduled reply that has not fired yet.
#[derive(Debug)]
pub(crate) struct PendingReply {
    pub ticket: u64,
    pub handle: AbortHandle,
}
