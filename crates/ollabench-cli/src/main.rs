mod interactive;
mod locale;
mod prompts;
mod report;

use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use chrono::Local;
use clap::{Parser, Subcommand};
use locale::{Locale, Msg};
use ollabench_benchmark::{BenchmarkRunner, OllamaClient};
use ollabench_core::{BenchmarkPlan, OllabenchConfig, OutputFormat};
use report::ReportContext;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ollabench")]
#[command(about = "Ollabench - compare Ollama models by latency and token throughput", long_about = None)]
struct Cli {
    /// JSON config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Ollama host URL (overrides OLLAMA_HOST and the config file)
    #[arg(long, global = true)]
    host: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List available models
    Models,

    /// Benchmark one or more models
    Run {
        /// Model to benchmark (repeatable)
        #[arg(short, long = "model", required_unless_present = "all")]
        models: Vec<String>,

        /// Benchmark every model the server lists
        #[arg(short, long, conflicts_with = "models")]
        all: bool,

        /// Prompt file, one prompt per line
        #[arg(short, long)]
        prompts: Option<PathBuf>,

        /// Trials per prompt
        #[arg(short, long)]
        trials: Option<u32>,

        /// Unrecorded warmup requests per model
        #[arg(short, long)]
        warmup: Option<u32>,

        /// Summary file format (csv, json, txt)
        #[arg(short, long)]
        format: Option<String>,

        /// Only show token metrics in tables
        #[arg(long)]
        tokens_only: bool,

        /// Directory for report files
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Report language (en, tr)
        #[arg(short, long)]
        lang: Option<String>,

        /// Per-request timeout in seconds
        #[arg(long)]
        timeout_secs: Option<u64>,
    },

    /// Show connection status
    Status,
}

/// Everything a benchmark run needs, resolved from flags, env and config.
pub struct RunSettings {
    pub host: String,
    pub timeout: Duration,
    /// `None` benchmarks every model the server lists.
    pub models: Option<Vec<String>>,
    pub prompt_file: PathBuf,
    pub trials: u32,
    pub warmup_runs: u32,
    pub format: OutputFormat,
    pub tokens_only: bool,
    pub output_dir: PathBuf,
    pub locale: Locale,
}

impl RunSettings {
    fn from_config(config: &OllabenchConfig) -> Result<Self> {
        Ok(Self {
            host: config.ollama.host.clone(),
            timeout: Duration::from_secs(config.ollama.timeout_secs),
            models: None,
            prompt_file: config.defaults.prompt_file.clone(),
            trials: config.defaults.trials,
            warmup_runs: config.defaults.warmup_runs,
            format: config.defaults.format.parse()?,
            tokens_only: config.defaults.tokens_only,
            output_dir: config.defaults.output_dir.clone(),
            locale: config.language.parse()?,
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => OllabenchConfig::load(path)?,
        None => OllabenchConfig::default(),
    };
    config.apply_env();
    if let Some(host) = cli.host {
        config.ollama.host = host;
    }

    match cli.command {
        Some(Commands::Models) => cmd_models(&config).await?,
        Some(Commands::Run {
            models,
            all,
            prompts,
            trials,
            warmup,
            format,
            tokens_only,
            output_dir,
            lang,
            timeout_secs,
        }) => {
            let mut settings = RunSettings::from_config(&config)?;
            settings.models = match all {
                true => None,
                false => Some(models),
            };
            if let Some(p) = prompts {
                settings.prompt_file = p;
            }
            if let Some(t) = trials {
                settings.trials = t;
            }
            if let Some(w) = warmup {
                settings.warmup_runs = w;
            }
            if let Some(f) = format {
                settings.format = f.parse()?;
            }
            settings.tokens_only |= tokens_only;
            if let Some(dir) = output_dir {
                settings.output_dir = dir;
            }
            if let Some(l) = lang {
                settings.locale = l.parse()?;
            }
            if let Some(secs) = timeout_secs {
                settings.timeout = Duration::from_secs(secs);
            }
            cmd_run(settings).await?
        }
        Some(Commands::Status) => cmd_status(&config).await?,
        None => interactive::run_interactive(RunSettings::from_config(&config)?).await?,
    }

    Ok(())
}

fn client_for(host: &str, timeout: Duration) -> Result<OllamaClient> {
    Ok(OllamaClient::new(host, timeout)?)
}

async fn cmd_models(config: &OllabenchConfig) -> Result<()> {
    let client = client_for(&config.ollama.host, Duration::from_secs(config.ollama.timeout_secs))?;
    let models = client.list_models().await?;

    println!();
    println!("Available Models:");
    println!("{:-<50}", "");
    println!("  {:<4} {}", "#", "Name");
    println!("{:-<50}", "");
    for (i, m) in models.iter().enumerate() {
        println!("  {:<4} {}", i + 1, m);
    }
    println!();
    println!("  Use: ollabench run -m <name> (or --all)");
    println!();

    Ok(())
}

async fn cmd_status(config: &OllabenchConfig) -> Result<()> {
    println!("System Status:");
    println!("{:-<40}", "");
    println!("  Ollama Host: {}", config.ollama.host);

    let client = client_for(&config.ollama.host, Duration::from_secs(config.ollama.timeout_secs))?;
    match client.list_models().await {
        Ok(models) => println!("  Ollama: connected ({} models available)", models.len()),
        Err(e) => println!("  Ollama: disconnected ({})", e),
    }

    Ok(())
}

/// Validate, measure every model, then write reports once measurement is over.
pub async fn cmd_run(settings: RunSettings) -> Result<()> {
    let locale = settings.locale;

    // Config problems surface before any request goes out.
    let prompts = prompts::load_prompts(&settings.prompt_file)?;
    let plan = BenchmarkPlan::new(prompts, settings.trials)?.with_warmup(settings.warmup_runs);
    if let Some(models) = &settings.models {
        ollabench_core::validate_models(models)?;
    }

    let client = client_for(&settings.host, settings.timeout)?;
    let models = match settings.models {
        Some(models) => models,
        None => {
            println!("{}", locale.t(Msg::LoadingModels));
            client.list_models().await?
        }
    };

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, cancelling benchmark");
            ctrl_c.cancel();
        }
    });

    println!(
        "{}: {} ({} x {})",
        locale.t(Msg::ModelRunning),
        models.join(", "),
        plan.prompts().len(),
        plan.trials()
    );

    let runner = BenchmarkRunner::new(client);
    let outcome = runner.run_models(&models, &plan, &cancel).await?;

    for failure in outcome.failures.iter().filter(|f| !f.is_cancelled()) {
        println!("{} [{}]: {}", locale.t(Msg::ModelError), failure.model, failure.kind);
    }
    if outcome.cancelled {
        println!("{}", locale.t(Msg::Cancelled));
    }

    let ctx = ReportContext {
        locale,
        format: settings.format,
        tokens_only: settings.tokens_only,
        output_dir: settings.output_dir,
        generated_at: Local::now(),
    };
    let mut stdout = io::stdout().lock();
    if let Some(files) = report::emit_reports(&outcome.samples, &ctx, &mut stdout)? {
        writeln!(stdout)?;
        for path in files.paths() {
            writeln!(stdout, "{}: {}", locale.t(Msg::ReportWritten), path.display())?;
        }
        writeln!(stdout, "{}", locale.t(Msg::BenchmarkComplete))?;
    }

    Ok(())
}
