use std::future::Future;

use ollabench_core::{
    validate_models, BenchmarkError, BenchmarkPlan, ConfigError, RequestError, Sample,
};
use tokio_util::sync::CancellationToken;

use crate::client::GenerationClient;
use crate::collector::SampleCollector;

pub struct BenchmarkRunner<C> {
    collector: SampleCollector<C>,
}

/// Result of driving several models one after another.
#[derive(Debug, Default)]
pub struct RunOutcome {
    /// Samples of every model that completed, concatenated in model order.
    pub samples: Vec<Sample>,
    pub failures: Vec<BenchmarkError>,
    pub cancelled: bool,
}

impl RunOutcome {
    pub fn has_results(&self) -> bool {
        !self.samples.is_empty()
    }
}

impl<C: GenerationClient> BenchmarkRunner<C> {
    pub fn new(client: C) -> Self {
        Self {
            collector: SampleCollector::new(client),
        }
    }

    /// Measure every (prompt, trial) pair for one model, prompt-major.
    ///
    /// The first failed request aborts the model and no samples are returned.
    pub async fn run(
        &self,
        model: &str,
        plan: &BenchmarkPlan,
        cancel: &CancellationToken,
    ) -> Result<Vec<Sample>, BenchmarkError> {
        tracing::info!(
            "Starting benchmark for model: {} ({} prompts x {} trials)",
            model,
            plan.prompts().len(),
            plan.trials()
        );

        if let Some(warmup_prompt) = plan.prompts().first() {
            for i in 0..plan.warmup_runs() {
                tracing::debug!("Warmup run {}/{}", i + 1, plan.warmup_runs());
                guarded(model, cancel, self.collector.client().generate(model, warmup_prompt))
                    .await?;
            }
        }

        let mut samples = Vec::with_capacity(plan.sample_count());

        for (idx, prompt) in plan.prompts().iter().enumerate() {
            for trial in 1..=plan.trials() {
                tracing::debug!(
                    "Prompt {}/{} trial {}/{}",
                    idx + 1,
                    plan.prompts().len(),
                    trial,
                    plan.trials()
                );
                let sample =
                    guarded(model, cancel, self.collector.collect(model, prompt, trial)).await?;
                samples.push(sample);
            }
        }

        tracing::info!("Finished benchmark for model: {} ({} samples)", model, samples.len());
        Ok(samples)
    }

    /// Run each model in order. A failed model is recorded and skipped; the
    /// others still run. Cancellation stops before the next model.
    pub async fn run_models(
        &self,
        models: &[String],
        plan: &BenchmarkPlan,
        cancel: &CancellationToken,
    ) -> Result<RunOutcome, ConfigError> {
        validate_models(models)?;

        let mut outcome = RunOutcome::default();

        for model in models {
            match self.run(model, plan, cancel).await {
                Ok(samples) => outcome.samples.extend(samples),
                Err(e) if e.is_cancelled() => {
                    tracing::warn!("Benchmark cancelled during model: {}", model);
                    outcome.failures.push(e);
                    outcome.cancelled = true;
                    break;
                }
                Err(e) => {
                    tracing::warn!("{}", e);
                    outcome.failures.push(e);
                }
            }
        }

        Ok(outcome)
    }
}

async fn guarded<T>(
    model: &str,
    cancel: &CancellationToken,
    request: impl Future<Output = Result<T, RequestError>>,
) -> Result<T, BenchmarkError> {
    if cancel.is_cancelled() {
        return Err(BenchmarkError::cancelled(model));
    }

    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(BenchmarkError::cancelled(model)),
        result = request => result.map_err(|e| BenchmarkError::request(model, e)),
    }
}
