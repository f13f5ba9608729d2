use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Result;
use ollabench_benchmark::OllamaClient;
use ollabench_core::OutputFormat;

use crate::locale::{Locale, Msg};
use crate::{cmd_run, RunSettings};

/// Menu-driven flow used when no subcommand is given.
pub async fn run_interactive(mut settings: RunSettings) -> Result<()> {
    let stdin = io::stdin();
    let mut input = stdin.lock();

    println!("🌍 Language / Dil seçin:");
    println!("1) English");
    println!("2) Türkçe");
    let lang = ask(&mut input, "👉 :")?;
    settings.locale = choose_locale(&lang);
    let locale = settings.locale;

    println!();
    println!("{}", locale.t(Msg::MenuTitle));
    println!("{}", locale.t(Msg::MenuQuick));
    println!("{}", locale.t(Msg::MenuSettings));

    match ask(&mut input, locale.t(Msg::ChooseOption))?.as_str() {
        "1" => quick_start(&mut input, settings).await,
        "2" => custom_settings(&mut input, settings).await,
        _ => {
            println!("{}", locale.t(Msg::InvalidChoice));
            Ok(())
        }
    }
}

async fn quick_start(input: &mut impl BufRead, mut settings: RunSettings) -> Result<()> {
    let locale = settings.locale;
    settings.host = ask_or(input, locale.t(Msg::ApiUrl), &settings.host)?;
    settings.models = None;
    settings.trials = 1;
    settings.format = OutputFormat::Txt;
    settings.tokens_only = false;

    println!("{}", locale.t(Msg::QuickStarting));
    cmd_run(settings).await
}

async fn custom_settings(input: &mut impl BufRead, mut settings: RunSettings) -> Result<()> {
    let locale = settings.locale;

    settings.host = ask_or(input, locale.t(Msg::ApiUrl), &settings.host)?;

    let default_file = settings.prompt_file.display().to_string();
    settings.prompt_file = PathBuf::from(ask_or(input, locale.t(Msg::PromptFile), &default_file)?);

    let trials = ask_or(input, locale.t(Msg::Trials), &settings.trials.to_string())?;
    settings.trials = trials.parse().unwrap_or(settings.trials);

    let format = ask(input, &format!("{} (csv/json/txt):", locale.t(Msg::OutputFormat)))?;
    settings.format = match format.as_str() {
        "" => settings.format,
        other => match other.parse() {
            Ok(f) => f,
            Err(_) => {
                println!("{}", locale.t(Msg::InvalidFormat));
                return Ok(());
            }
        },
    };

    let tokens_only = ask(input, locale.t(Msg::TokensOnly))?;
    settings.tokens_only = locale.is_yes(&tokens_only);

    println!("{}", locale.t(Msg::LoadingModels));
    let client = OllamaClient::new(&settings.host, settings.timeout)?;
    let models = client.list_models().await?;

    for (i, m) in models.iter().enumerate() {
        println!("{}) {}", i + 1, m);
    }
    if models.len() > 1 {
        println!("{}) {}", models.len() + 1, locale.t(Msg::AllModels));
    }

    let selection = ask(input, &format!("{}:", locale.t(Msg::ModelSelection)))?;
    match select_models(&selection, &models) {
        Some(selected) => {
            settings.models = Some(selected);
            cmd_run(settings).await
        }
        None => {
            println!("{}", locale.t(Msg::InvalidChoice));
            Ok(())
        }
    }
}

fn choose_locale(answer: &str) -> Locale {
    match answer.trim() {
        "2" => Locale::Tr,
        _ => Locale::En,
    }
}

/// 1-based index of a single model, or `len + 1` for all of them when there
/// is more than one.
fn select_models(selection: &str, models: &[String]) -> Option<Vec<String>> {
    let choice: usize = selection.trim().parse().ok()?;
    match choice {
        0 => None,
        n if n <= models.len() => Some(vec![models[n - 1].clone()]),
        n if n == models.len() + 1 && models.len() > 1 => Some(models.to_vec()),
        _ => None,
    }
}

fn ask(input: &mut impl BufRead, label: &str) -> io::Result<String> {
    print!("{} ", label);
    io::stdout().flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn ask_or(input: &mut impl BufRead, label: &str, default: &str) -> io::Result<String> {
    let answer = ask(input, &format!("{} (default: {}):", label, default))?;
    match answer.is_empty() {
        true => Ok(default.to_string()),
        false => Ok(answer),
    }
}
