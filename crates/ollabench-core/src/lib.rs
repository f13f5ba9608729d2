pub mod config;
pub mod error;
pub mod text;

pub use config::{DefaultsConfig, OllabenchConfig, OllamaConfig, OutputFormat, DEFAULT_OLLAMA_HOST};
pub use error::{
    BenchmarkError, BenchmarkErrorKind, ConfigError, OllabenchError, RequestError, RequestPhase,
    Result,
};
pub use text::{
    aggregate, count_tokens, rank, validate_models, AggregatedSummary, BenchmarkPlan, RankTier,
    RankedEntry, Sample, TokenSource, CHARS_PER_TOKEN,
};
