use crate::error::ConfigError;

/// Validated prompts and trial settings for one benchmark pass.
///
/// Construction is the only place prompts and trials are checked, so a plan in
/// hand always has at least one non-blank, distinct prompt and `trials >= 1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchmarkPlan {
    prompts: Vec<String>,
    trials: u32,
    warmup_runs: u32,
}

impl BenchmarkPlan {
    /// Repeated prompts are dropped, keeping the first occurrence.
    pub fn new(prompts: Vec<String>, trials: u32) -> Result<Self, ConfigError> {
        if prompts.is_empty() {
            return Err(ConfigError::EmptyPrompts);
        }
        if let Some(idx) = prompts.iter().position(|p| p.trim().is_empty()) {
            return Err(ConfigError::BlankPrompt(idx + 1));
        }
        if trials == 0 {
            return Err(ConfigError::ZeroTrials);
        }

        let mut distinct: Vec<String> = Vec::with_capacity(prompts.len());
        for prompt in prompts {
            if !distinct.contains(&prompt) {
                distinct.push(prompt);
            }
        }

        Ok(Self {
            prompts: distinct,
            trials,
            warmup_runs: 0,
        })
    }

    pub fn with_warmup(mut self, warmup_runs: u32) -> Self {
        self.warmup_runs = warmup_runs;
        self
    }

    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    pub fn trials(&self) -> u32 {
        self.trials
    }

    pub fn warmup_runs(&self) -> u32 {
        self.warmup_runs
    }

    /// Number of measured samples a successful run of one model yields.
    pub fn sample_count(&self) -> usize {
        self.prompts.len() * self.trials as usize
    }
}

pub fn validate_models(models: &[String]) -> Result<(), ConfigError> {
    if models.is_empty() {
        return Err(ConfigError::NoModels);
    }
    match models.iter().position(|m| m.trim().is_empty()) {
        Some(idx) => Err(ConfigError::BlankModel(idx + 1)),
        None => Ok(()),
    }
}
