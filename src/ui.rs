//! Terminal output for DRAFTHORSE: spinner and colored result lines.
//!
//! Uses `indicatif` for the progress spinner and `console` for styling.
//! [`JobProgress`] visually tracks one drafting job in the terminal.

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::job::{FinalStatus, JobResult, Stage};

/// Visual progress indicator for one drafting job.
///
/// Shows an animated spinner while the pipeline runs and a colored result
/// line at the end: green for success, yellow for partial success, red for
/// error.
pub struct JobProgress {
    pb: ProgressBar,
    green: Style,
    red: Style,
    yellow: Style,
}

impl JobProgress {
    /// Start the spinner with the job topic.
    pub fn start(topic: &str) -> Self {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .expect("invalid template"),
        );
        pb.set_message(format!("{}: {topic}", Stage::FanOut));
        pb.enable_steady_tick(std::time::Duration::from_millis(100));

        Self {
            pb,
            green: Style::new().green().bold(),
            red: Style::new().red().bold(),
            yellow: Style::new().yellow(),
        }
    }

    /// Stop the spinner and print the final result line.
    pub fn complete(&self, result: &JobResult) {
        self.pb.finish_and_clear();
        match result.status {
            FinalStatus::Success => {
                println!("  {} {}", self.green.apply_to("✓"), result.message);
            }
            FinalStatus::PartialSuccess => {
                println!("  {} {}", self.yellow.apply_to("◐"), result.message);
            }
            FinalStatus::Error => {
                println!("  {} {}", self.red.apply_to("✗"), result.message);
            }
        }
    }

    /// Print the full job result as pretty JSON.
    pub fn print_result(&self, result: &JobResult) {
        let status_style = match result.status {
            FinalStatus::Success => &self.green,
            FinalStatus::PartialSuccess => &self.yellow,
            FinalStatus::Error => &self.red,
        };
        println!();
        println!("{}", status_style.apply_to("─── Job Result ───"));
        println!(
            "{}",
            serde_json::to_string_pretty(result).unwrap_or_default()
        );
    }
}
