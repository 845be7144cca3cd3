//! Report persistence: deterministic filenames derived from the topic, with
//! exactly one fallback attempt under a generic name when the primary save
//! fails.

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;
use thiserror::Error;

/// Characters stripped from filenames because they are unsafe in paths.
const UNSAFE_CHARS: &[char] = &['\\', '/', '*', '?', ':', '"', '<', '>', '|'];

#[derive(Debug, Error)]
pub enum SinkError {
    /// Both the primary save and the single fallback attempt failed.
    #[error("could not save report: {primary}; fallback save also failed: {fallback}")]
    SaveFailed { primary: String, fallback: String },
}

/// Persistence sink for synthesized proposals.
///
/// Invoked exactly once per job, after all concurrency has settled.
pub trait ReportSink: Send + Sync {
    fn save(&self, topic: &str, content: &str) -> Result<PathBuf, SinkError>;
}

/// Writes markdown reports under a directory.
pub struct FileReportSink {
    dir: PathBuf,
}

impl FileReportSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn write_report(&self, path: &Path, topic: &str, content: &str) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let mut file = std::fs::File::create(path)?;
        writeln!(file, "# R&D Project Proposal: {topic}")?;
        writeln!(file)?;
        writeln!(file, "{content}")?;
        Ok(())
    }
}

/// Filename stem derived from the first four words of the topic, sanitized
/// of path-unsafe characters. Empty topics become "Untitled_Project".
fn short_title(topic: &str) -> String {
    let raw: String = topic
        .split_whitespace()
        .take(4)
        .collect::<Vec<_>>()
        .join("_");
    let cleaned: String = raw.chars().filter(|c| !UNSAFE_CHARS.contains(c)).collect();
    if cleaned.is_empty() {
        "Untitled_Project".to_string()
    } else {
        cleaned
    }
}

impl ReportSink for FileReportSink {
    fn save(&self, topic: &str, content: &str) -> Result<PathBuf, SinkError> {
        let date_suffix = Local::now().format("%m%d");
        let filename = format!("{}-{date_suffix}.md", short_title(topic));
        let path = self.dir.join(&filename);

        let primary_err = match self.write_report(&path, topic, content) {
            Ok(()) => return Ok(absolutize(path)),
            Err(e) => e,
        };

        // One fallback attempt under a generic name, then give up.
        let fallback_path = self.dir.join(format!("Fallback_Report_{date_suffix}.md"));
        match self.write_report(&fallback_path, topic, content) {
            Ok(()) => Ok(absolutize(fallback_path)),
            Err(fallback_err) => Err(SinkError::SaveFailed {
                primary: primary_err.to_string(),
                fallback: fallback_err.to_string(),
            }),
        }
    }
}

fn absolutize(path: PathBuf) -> PathBuf {
    std::path::absolute(&path).unwrap_or(path)
}
