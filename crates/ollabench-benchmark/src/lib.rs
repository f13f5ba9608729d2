pub mod client;
pub mod collector;
pub mod ollama;
pub mod runner;

pub use client::{Generation, GenerationClient};
pub use collector::SampleCollector;
pub use ollama::OllamaClient;
pub use runner::{BenchmarkRunner, RunOutcome};
