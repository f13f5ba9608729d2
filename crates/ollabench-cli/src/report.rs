use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use ollabench_core::{aggregate, rank, AggregatedSummary, OutputFormat, RankedEntry, Sample, TokenSource};
use serde::Serialize;

use crate::locale::{Locale, Msg};

pub const PERFORMANCE_LOG: &str = "benchmark.log";

/// Presentation settings shared by every sink.
#[derive(Debug, Clone)]
pub struct ReportContext {
    pub locale: Locale,
    pub format: OutputFormat,
    pub tokens_only: bool,
    pub output_dir: PathBuf,
    pub generated_at: DateTime<Local>,
}

impl ReportContext {
    fn timestamp(&self) -> String {
        self.generated_at.format("%Y%m%d-%H%M%S").to_string()
    }

    fn path(&self, file_name: String) -> PathBuf {
        self.output_dir.join(file_name)
    }
}

/// Files produced by one [`emit_reports`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportFiles {
    pub details: Vec<PathBuf>,
    pub summary: PathBuf,
    pub comparison: Option<PathBuf>,
    pub log: PathBuf,
}

impl ReportFiles {
    /// Every file in the order it was written.
    pub fn paths(&self) -> impl Iterator<Item = &PathBuf> {
        self.details
            .iter()
            .chain(Some(&self.summary))
            .chain(self.comparison.as_ref())
            .chain(Some(&self.log))
    }
}

#[derive(Debug, Serialize)]
struct SampleRecord<'a> {
    model: &'a str,
    prompt: &'a str,
    trial: u32,
    duration_s: f64,
    tokens: u64,
    token_source: TokenSource,
    token_per_s: Option<f64>,
}

impl<'a> From<&'a Sample> for SampleRecord<'a> {
    fn from(s: &'a Sample) -> Self {
        Self {
            model: &s.model,
            prompt: &s.prompt,
            trial: s.trial,
            duration_s: s.duration.as_secs_f64(),
            tokens: s.tokens,
            token_source: s.token_source,
            token_per_s: s.tokens_per_sec(),
        }
    }
}

/// Print and persist everything for a finished run.
///
/// Returns `None` without touching the filesystem when there are no samples.
pub fn emit_reports<W: Write>(
    samples: &[Sample],
    ctx: &ReportContext,
    out: &mut W,
) -> io::Result<Option<ReportFiles>> {
    if samples.is_empty() {
        writeln!(out, "{}", ctx.locale.t(Msg::NoResults))?;
        return Ok(None);
    }

    let summaries = aggregate(samples);
    let ranked = rank(summaries.clone());

    writeln!(out)?;
    write_summary_table(out, &ranked, ctx.locale, ctx.tokens_only)?;

    let multi_model = summaries.len() > 1;
    if !multi_model {
        writeln!(out)?;
        write_details(out, samples, ctx.locale)?;
    }

    fs::create_dir_all(&ctx.output_dir)?;
    let stamp = ctx.timestamp();

    let mut details = Vec::with_capacity(summaries.len());
    for summary in &summaries {
        let group: Vec<Sample> = samples
            .iter()
            .filter(|s| s.model == summary.model)
            .cloned()
            .collect();
        let path = ctx.path(format!(
            "benchmark_detail_{}_{}.txt",
            sanitize_filename(&summary.model),
            stamp
        ));
        write_file(&path, |w| write_txt(w, &group, ctx.locale, false))?;
        details.push(path);
    }

    let summary = ctx.path(format!(
        "benchmark_summary_result_{}.{}",
        stamp,
        ctx.format.extension()
    ));
    write_file(&summary, |w| match ctx.format {
        OutputFormat::Csv => write_csv(w, samples),
        OutputFormat::Json => write_json(w, samples),
        OutputFormat::Txt => write_txt(w, samples, ctx.locale, ctx.tokens_only),
    })?;

    let comparison = match multi_model {
        true => {
            writeln!(out)?;
            write_comparison(out, &ranked, ctx.locale)?;
            let path = ctx.path(format!("benchmark_summary_comparison_{}.txt", stamp));
            write_file(&path, |w| write_comparison(w, &ranked, ctx.locale))?;
            Some(path)
        }
        false => None,
    };

    let log = ctx.path(PERFORMANCE_LOG.to_string());
    append_performance_log(&log, &summaries, ctx.locale, ctx.generated_at)?;

    tracing::info!("Reports written to {:?}", ctx.output_dir);

    Ok(Some(ReportFiles {
        details,
        summary,
        comparison,
        log,
    }))
}

fn write_file(path: &Path, body: impl FnOnce(&mut BufWriter<File>) -> io::Result<()>) -> io::Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    body(&mut w)?;
    w.flush()
}

/// Ranked per-model table. `tokens_only` drops the duration column.
pub fn write_summary_table<W: Write>(
    w: &mut W,
    ranked: &[RankedEntry],
    locale: Locale,
    tokens_only: bool,
) -> io::Result<()> {
    let width = model_column_width(ranked.iter().map(|e| e.summary.model.as_str()), locale);

    write!(w, "{:<width$}  ", locale.t(Msg::HeaderModel), width = width)?;
    if !tokens_only {
        write!(w, "{:>14}  ", locale.t(Msg::HeaderTime))?;
    }
    writeln!(w, "{:>10}  {:>10}", locale.t(Msg::HeaderTokens), locale.t(Msg::HeaderTps))?;

    for entry in ranked {
        let s = &entry.summary;
        write!(w, "{:<width$}  ", s.model, width = width)?;
        if !tokens_only {
            write!(w, "{:>14.2}  ", s.avg_duration.as_secs_f64())?;
        }
        writeln!(w, "{:>10}  {:>10}", s.total_tokens, format_tps(s.tokens_per_sec))?;
    }
    Ok(())
}

pub fn write_details<W: Write>(w: &mut W, samples: &[Sample], locale: Locale) -> io::Result<()> {
    writeln!(w, "{}", locale.t(Msg::DetailsTitle))?;
    for s in samples {
        writeln!(
            w,
            "[{}] {} {} | {}: {:?}",
            s.model,
            locale.t(Msg::FieldTrial),
            s.trial,
            locale.t(Msg::FieldPrompt),
            s.prompt
        )?;
        let estimated = match s.token_source {
            TokenSource::Estimated => format!(" ({})", locale.t(Msg::Estimated)),
            TokenSource::Reported => String::new(),
        };
        writeln!(
            w,
            "  ➜ {}: {}{} | {}: {:.2}s | {}: {}",
            locale.t(Msg::FieldTokens),
            s.tokens,
            estimated,
            locale.t(Msg::FieldTime),
            s.duration.as_secs_f64(),
            locale.t(Msg::FieldTps),
            format_tps_precise(s.tokens_per_sec())
        )?;
        writeln!(w)?;
    }
    Ok(())
}

pub fn write_csv<W: Write>(w: &mut W, samples: &[Sample]) -> io::Result<()> {
    writeln!(w, "model,prompt,trial,duration_s,tokens,token_per_s")?;
    for s in samples {
        writeln!(
            w,
            "{},{},{},{:.2},{},{}",
            csv_field(&s.model),
            csv_field(&s.prompt),
            s.trial,
            s.duration.as_secs_f64(),
            s.tokens,
            format_tps(s.tokens_per_sec())
        )?;
    }
    Ok(())
}

pub fn write_json<W: Write>(w: &mut W, samples: &[Sample]) -> io::Result<()> {
    let records: Vec<SampleRecord<'_>> = samples.iter().map(SampleRecord::from).collect();
    serde_json::to_writer_pretty(&mut *w, &records)?;
    writeln!(w)
}

/// Summary block (first-appearance order) followed by every trial.
pub fn write_txt<W: Write>(
    w: &mut W,
    samples: &[Sample],
    locale: Locale,
    tokens_only: bool,
) -> io::Result<()> {
    writeln!(w, "{}", locale.t(Msg::SummaryTitle))?;
    let summaries = aggregate(samples);
    write_summary_rows(w, &summaries, locale, tokens_only)?;
    writeln!(w)?;
    write_details(w, samples, locale)
}

fn write_summary_rows<W: Write>(
    w: &mut W,
    summaries: &[AggregatedSummary],
    locale: Locale,
    tokens_only: bool,
) -> io::Result<()> {
    let mut header = vec![locale.t(Msg::HeaderModel)];
    if !tokens_only {
        header.push(locale.t(Msg::HeaderTime));
    }
    header.extend([locale.t(Msg::HeaderTokens), locale.t(Msg::HeaderTps)]);
    writeln!(w, "{}", header.join("\t"))?;

    for s in summaries {
        match tokens_only {
            true => writeln!(w, "{}\t{}\t{}", s.model, s.total_tokens, format_tps(s.tokens_per_sec))?,
            false => writeln!(
                w,
                "{}\t{:.2}\t{}\t{}",
                s.model,
                s.avg_duration.as_secs_f64(),
                s.total_tokens,
                format_tps(s.tokens_per_sec)
            )?,
        }
    }
    Ok(())
}

pub fn write_comparison<W: Write>(w: &mut W, ranked: &[RankedEntry], locale: Locale) -> io::Result<()> {
    writeln!(w, "{}", locale.t(Msg::ComparisonTitle))?;
    writeln!(
        w,
        "{}\t{}\t{}\t{}\t{}",
        locale.t(Msg::HeaderModel),
        locale.t(Msg::HeaderTime),
        locale.t(Msg::HeaderTokens),
        locale.t(Msg::HeaderTps),
        locale.t(Msg::HeaderRank)
    )?;
    for entry in ranked {
        let s = &entry.summary;
        writeln!(
            w,
            "{}\t{:.2}\t{}\t{}\t{}",
            s.model,
            s.avg_duration.as_secs_f64(),
            s.total_tokens,
            format_tps(s.tokens_per_sec),
            entry.tier.medal()
        )?;
    }
    Ok(())
}

pub fn performance_log_lines(
    summaries: &[AggregatedSummary],
    locale: Locale,
    at: DateTime<Local>,
) -> Vec<String> {
    let stamp = at.to_rfc3339();
    summaries
        .iter()
        .map(|s| {
            format!(
                "[{}] {}: {} | {}: {:.2}s | {}: {} | {}: {}",
                stamp,
                locale.t(Msg::HeaderModel),
                s.model,
                locale.t(Msg::FieldTime),
                s.avg_duration.as_secs_f64(),
                locale.t(Msg::FieldTokens),
                s.total_tokens,
                locale.t(Msg::FieldTps),
                format_tps_precise(s.tokens_per_sec)
            )
        })
        .collect()
}

pub fn append_performance_log(
    path: &Path,
    summaries: &[AggregatedSummary],
    locale: Locale,
    at: DateTime<Local>,
) -> io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    for line in performance_log_lines(summaries, locale, at) {
        writeln!(file, "{}", line)?;
    }
    Ok(())
}

pub fn sanitize_filename(s: &str) -> String {
    s.replace([':', '/'], "_")
}

fn format_tps(tps: Option<f64>) -> String {
    match tps {
        Some(v) if v.is_finite() => format!("{:.1}", v),
        _ => "n/a".to_string(),
    }
}

fn format_tps_precise(tps: Option<f64>) -> String {
    match tps {
        Some(v) if v.is_finite() => format!("{:.2}", v),
        _ => "n/a".to_string(),
    }
}

fn model_column_width<'a>(models: impl Iterator<Item = &'a str>, locale: Locale) -> usize {
    models
        .map(|m| m.chars().count())
        .chain(Some(locale.t(Msg::HeaderModel).chars().count()))
        .max()
        .unwrap_or(0)
}

fn csv_field(value: &str) -> String {
    match value.contains([',', '"', '\n', '\r']) {
        true => format!("\"{}\"", value.replace('"', "\"\"")),
        false => value.to_string(),
    }
}
