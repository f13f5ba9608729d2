mod aggregate;
mod plan;
mod ranking;
mod sample;

pub use aggregate::{aggregate, AggregatedSummary};
pub use plan::{validate_models, BenchmarkPlan};
pub use ranking::{rank, RankTier, RankedEntry};
pub use sample::{count_tokens, Sample, TokenSource, CHARS_PER_TOKEN};
