use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Rough characters-per-token ratio used when the backend reports no count.
pub const CHARS_PER_TOKEN: usize = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenSource {
    Reported,
    Estimated,
}

/// One timed (model, prompt, trial) exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub model: String,
    pub prompt: String,
    /// 1-based within the (model, prompt) pair.
    pub trial: u32,
    pub tokens: u64,
    pub token_source: TokenSource,
    pub duration: Duration,
}

impl Sample {
    /// `None` for a zero-length duration.
    pub fn tokens_per_sec(&self) -> Option<f64> {
        tokens_per_sec(self.tokens, self.duration)
    }
}

pub(crate) fn tokens_per_sec(tokens: u64, duration: Duration) -> Option<f64> {
    let secs = duration.as_secs_f64();
    match secs > 0.0 {
        true => Some(tokens as f64 / secs),
        false => None,
    }
}

/// Prefer the backend's exact count; a missing or zero count falls back to
/// `len(text) / 4` in bytes, truncating.
pub fn count_tokens(reported: Option<u64>, text: &str) -> (u64, TokenSource) {
    match reported {
        Some(n) if n > 0 => (n, TokenSource::Reported),
        _ => ((text.len() / CHARS_PER_TOKEN) as u64, TokenSource::Estimated),
    }
}
