/// ThreatLens - security log triage from the command line
///
/// This program is free software: you can redistribute it and/or modify
/// it under the terms of the GNU General Public License as published by
/// the Free Software Foundation, either version 3 of the License, or
/// (at your option) any later version.
///
/// This program is distributed in the hope that it will be useful,
/// but WITHOUT ANY WARRANTY; without even the implied warranty of
/// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
/// GNU General Public License for more details.
///
/// You should have received a copy of the GNU General Public License
/// along with this program.  If not, see <https://www.gnu.org/licenses/>.
use anyhow::{bail, Context};
use clap::Parser;
use std::path::PathBuf;
use threatlens::ai::{self, AiAnalyzer};
use threatlens::storage::{AnalysisSink, JsonFileSink};

// Upload bound enforced by the calling context, not by the pipeline
const DEFAULT_MAX_SIZE: u64 = 10 * 1024 * 1024;

#[derive(Parser, Debug)]
#[command(name = "threatlens")]
#[command(version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_HASH"), ")"))]
#[command(about = "Parse security logs and produce a heuristic threat summary", long_about = None)]
struct Args {
    /// Path to the log file to analyze
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Persist records and summary as JSON next to this path stem
    #[arg(long = "summary-out", value_name = "PATH")]
    summary_out: Option<PathBuf>,

    /// Print the full report (records and skip diagnostics) instead of
    /// just the summary
    #[arg(long)]
    records: bool,

    /// Request an AI assessment and print the executive summary
    /// (falls back to a local heuristic without OPENAI_API_KEY)
    #[arg(long)]
    ai: bool,

    /// Maximum accepted file size in bytes
    #[arg(long = "max-size", value_name = "BYTES", default_value_t = DEFAULT_MAX_SIZE)]
    max_size: u64,
}

fn main() -> anyhow::Result<()> {
    // Set RUST_LOG environment variable to override (e.g., RUST_LOG=debug)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let args = Args::parse();

    let metadata = std::fs::metadata(&args.file)
        .with_context(|| format!("cannot stat {}", args.file.display()))?;
    if metadata.len() > args.max_size {
        bail!(
            "{} is {} bytes, over the {} byte limit",
            args.file.display(),
            metadata.len(),
            args.max_size
        );
    }

    // Lossy conversion: log exports are not always clean UTF-8
    let bytes = std::fs::read(&args.file)
        .with_context(|| format!("cannot read {}", args.file.display()))?;
    let content = String::from_utf8_lossy(&bytes);

    let report = threatlens::analyze(&content);
    log::info!(
        "Analyzed {} as {}: {} records, {} skipped",
        args.file.display(),
        report.dialect.as_str(),
        report.records.len(),
        report.skipped.len()
    );

    if let Some(stem) = &args.summary_out {
        let mut sink = JsonFileSink::new(stem);
        sink.persist(&report).context("persisting analysis")?;
    }

    if args.records {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", serde_json::to_string_pretty(&report.summary)?);
    }

    if args.ai {
        let views = ai::record_views(&report.records);
        let assessment = AiAnalyzer::from_env().assess(&views);
        println!("\n{}", ai::executive_summary(&assessment));
    }

    Ok(())
}
