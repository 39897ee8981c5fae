use super::{AgentConfig, AgentHandle, Responder};
use crate::error::ResponderError;
use async_trait::async_trait;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::atomic::{AtomicU32, Ordering};

pub const CANNED_LINES: &[&str] = &[
    "I've been watching everyone carefully, and I have some concerns...",
    "That's exactly what an impostor would say!",
    "I was doing tasks in electrical when the lights went out.",
    "Something about their behavior seems off to me.",
    "I think we need to be more strategic about this vote.",
    "I trust my instincts on this one.",
    "Wait, let me think about what I observed...",
];

/// Offline responder that answers with stock in-character lines.
pub struct CannedResponder {
    rng: Mutex<StdRng>,
    next_id: AtomicU32,
}

impl CannedResponder {
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            rng: Mutex::new(rng),
            next_id: AtomicU32::new(0),
        }
    }

    /// Pick a line without going through the async trait.
    pub fn line(&self) -> &'static str {
        let idx = self.rng.lock().gen_range(0..CANNED_LINES.len());
        CANNED_LINES[idx]
    }
}

impl Default for CannedResponder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Responder for CannedResponder {
    async fn init(&self, config: &AgentConfig) -> Result<AgentHandle, ResponderError> {
        Ok(AgentHandle {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            name: config.name.clone(),
        })
    }

    async fn respond(&self, _handle: &AgentHandle, _prompt: &str) -> Result<String, ResponderError> {
        Ok(self.line().to_string())
    }
}
