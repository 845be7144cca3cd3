use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};
use clap::Parser;

use drafthorse::cli::{Cli, Command};
use drafthorse::config::DrafthorseConfig;
use drafthorse::report::FileReportSink;
use drafthorse::ui::JobProgress;
use drafthorse::{FinalStatus, GlmClient, JobPipeline};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = DrafthorseConfig::load()?;

    match cli.command {
        Command::Generate {
            topic,
            timeout_secs,
            deadline_secs,
            output_dir,
            model,
        } => {
            if config.api_key.is_empty() {
                bail!("no API key configured; set ZHIPU_API_KEY or api_key in drafthorse.toml");
            }

            let model = model.unwrap_or(config.model);
            let call_timeout =
                Duration::from_secs(timeout_secs.unwrap_or(config.request_timeout_secs));
            let job_deadline = deadline_secs
                .or(config.job_deadline_secs)
                .map(Duration::from_secs);
            let reports_dir = output_dir.unwrap_or(config.reports_dir);

            let capability = Arc::new(GlmClient::new(config.api_key, model));
            let sink = Arc::new(FileReportSink::new(&reports_dir));
            let pipeline = JobPipeline::new(capability, sink, call_timeout, job_deadline);

            let progress = JobProgress::start(&topic);
            let result = pipeline.run(&topic).await;
            progress.complete(&result);
            if cli.verbose {
                progress.print_result(&result);
            }

            if result.status == FinalStatus::Error {
                std::process::exit(1);
            }
        }
        Command::Reports => {
            for name in list_reports(Path::new(&config.reports_dir))? {
                println!("{name}");
            }
        }
    }

    Ok(())
}

/// Report filenames under `dir`, newest first. A missing directory lists
/// nothing.
fn list_reports(dir: &Path) -> Result<Vec<String>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut entries: Vec<(std::time::SystemTime, String)> = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("md") {
            continue;
        }
        let modified = entry.metadata()?.modified()?;
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            entries.push((modified, name.to_string()));
        }
    }
    entries.sort_by(|a, b| b.0.cmp(&a.0));
    Ok(entries.into_iter().map(|(_, name)| name).collect())
}
