use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::aggregate::AggregatedSummary;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RankTier {
    Gold,
    Silver,
    Bronze,
    None,
}

impl RankTier {
    pub fn for_position(idx: usize) -> Self {
        match idx {
            0 => RankTier::Gold,
            1 => RankTier::Silver,
            2 => RankTier::Bronze,
            _ => RankTier::None,
        }
    }

    pub fn medal(&self) -> &'static str {
        match self {
            RankTier::Gold => "🥇",
            RankTier::Silver => "🥈",
            RankTier::Bronze => "🥉",
            RankTier::None => "-",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedEntry {
    pub summary: AggregatedSummary,
    pub tier: RankTier,
}

/// Sort by throughput descending and hand out tiers to the top three.
///
/// The sort is stable: equal throughputs keep their input order. Undefined
/// throughput (`None` or NaN) ranks after every real value.
pub fn rank(mut summaries: Vec<AggregatedSummary>) -> Vec<RankedEntry> {
    summaries.sort_by(|a, b| compare_throughput(a.tokens_per_sec, b.tokens_per_sec));

    summaries
        .into_iter()
        .enumerate()
        .map(|(idx, summary)| RankedEntry {
            summary,
            tier: RankTier::for_position(idx),
        })
        .collect()
}

fn compare_throughput(a: Option<f64>, b: Option<f64>) -> Ordering {
    let defined = |v: Option<f64>| v.filter(|x| !x.is_nan());
    match (defined(a), defined(b)) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn summary(model: &str, tps: Option<f64>) -> AggregatedSummary {
        AggregatedSummary {
            model: model.to_string(),
            samples: 1,
            avg_duration: Duration::from_secs(1),
            total_duration: Duration::from_secs(1),
            total_tokens: 0,
            tokens_per_sec: tps,
        }
    }

    fn models(ranked: &[RankedEntry]) -> Vec<&str> {
        ranked.iter().map(|e| e.summary.model.as_str()).collect()
    }

    fn tiers(ranked: &[RankedEntry]) -> Vec<RankTier> {
        ranked.iter().map(|e| e.tier).collect()
    }

    #[test]
    fn test_sorted_descending_with_tiers() {
        let ranked = rank(vec![
            summary("slow", Some(5.0)),
            summary("fast", Some(50.0)),
            summary("mid", Some(20.0)),
            summary("faster", Some(40.0)),
        ]);
        assert_eq!(models(&ranked), vec!["fast", "faster", "mid", "slow"]);
        assert_eq!(
            tiers(&ranked),
            vec![RankTier::Gold, RankTier::Silver, RankTier::Bronze, RankTier::None]
        );
    }

    #[test]
    fn test_short_lists_get_top_tiers_only() {
        assert!(rank(vec![]).is_empty());
        assert_eq!(tiers(&rank(vec![summary("a", Some(1.0))])), vec![RankTier::Gold]);
        assert_eq!(
            tiers(&rank(vec![summary("a", Some(1.0)), summary("b", Some(2.0))])),
            vec![RankTier::Gold, RankTier::Silver]
        );
    }

    #[test]
    fn test_ties_keep_input_order() {
        let ranked = rank(vec![
            summary("first", Some(10.0)),
            summary("top", Some(30.0)),
            summary("second", Some(10.0)),
            summary("third", Some(10.0)),
        ]);
        assert_eq!(models(&ranked), vec!["top", "first", "second", "third"]);
    }

    #[test]
    fn test_undefined_throughput_ranks_last() {
        let ranked = rank(vec![
            summary("none", None),
            summary("nan", Some(f64::NAN)),
            summary("real", Some(0.5)),
        ]);
        assert_eq!(models(&ranked), vec!["real", "none", "nan"]);
        assert_eq!(ranked[0].tier, RankTier::Gold);
    }

    #[test]
    fn test_end_to_end_two_models() {
        use crate::text::{aggregate, Sample, TokenSource};

        let sample = |model: &str, tokens, secs| Sample {
            model: model.to_string(),
            prompt: "p".to_string(),
            trial: 1,
            tokens,
            token_source: TokenSource::Reported,
            duration: Duration::from_secs(secs),
        };
        let samples = vec![sample("m1", 40, 2), sample("m1", 60, 2), sample("m2", 30, 1)];

        let ranked = rank(aggregate(&samples));
        assert_eq!(models(&ranked), vec!["m2", "m1"]);
        assert_eq!(tiers(&ranked), vec![RankTier::Gold, RankTier::Silver]);
        assert_eq!(ranked[0].summary.tokens_per_sec, Some(30.0));
        assert_eq!(ranked[1].summary.tokens_per_sec, Some(25.0));
        assert_eq!(ranked[1].summary.avg_duration, Duration::from_secs(2));
        assert_eq!(ranked[1].summary.total_tokens, 100);
    }
}
