use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::sample::{tokens_per_sec, Sample};

/// Per-model reduction of a sample set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedSummary {
    pub model: String,
    pub samples: usize,
    pub avg_duration: Duration,
    pub total_duration: Duration,
    pub total_tokens: u64,
    /// `total_tokens / total_duration`, time-weighted across the group.
    /// `None` when the summed duration is zero.
    pub tokens_per_sec: Option<f64>,
}

struct Group<'a> {
    model: &'a str,
    samples: usize,
    total_duration: Duration,
    total_tokens: u64,
}

/// One summary per distinct model, in order of first appearance.
///
/// Values depend only on the multiset of samples, never on their order.
pub fn aggregate(samples: &[Sample]) -> Vec<AggregatedSummary> {
    let mut groups: Vec<Group<'_>> = Vec::new();

    for s in samples {
        let idx = match groups.iter().position(|g| g.model == s.model) {
            Some(idx) => idx,
            None => {
                groups.push(Group {
                    model: &s.model,
                    samples: 0,
                    total_duration: Duration::ZERO,
                    total_tokens: 0,
                });
                groups.len() - 1
            }
        };
        let g = &mut groups[idx];
        g.samples += 1;
        g.total_duration += s.duration;
        g.total_tokens += s.tokens;
    }

    groups
        .into_iter()
        .map(|g| AggregatedSummary {
            model: g.model.to_string(),
            samples: g.samples,
            avg_duration: g.total_duration.div_f64(g.samples as f64),
            total_duration: g.total_duration,
            total_tokens: g.total_tokens,
            tokens_per_sec: tokens_per_sec(g.total_tokens, g.total_duration),
        })
        .collect()
}
