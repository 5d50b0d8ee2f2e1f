//! GitHub Actions integration: step outputs and the job summary.
//!
//! Both files are only touched when the runner exports their paths.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use std::io::Write;
use tracing::debug;
use ui5check_core::pipeline::CheckOutcome;

pub const OUTPUT_ENV: &str = "GITHUB_OUTPUT";
pub const STEP_SUMMARY_ENV: &str = "GITHUB_STEP_SUMMARY";

/// Paths of the runner-provided files, read from the environment.
#[derive(Debug, Clone, Default)]
pub struct GithubFiles {
    pub output: Option<Utf8PathBuf>,
    pub step_summary: Option<Utf8PathBuf>,
}

impl GithubFiles {
    pub fn from_env() -> Self {
        let var = |name: &str| {
            std::env::var(name)
                .ok()
                .filter(|v| !v.is_empty())
                .map(Utf8PathBuf::from)
        };
        Self {
            output: var(OUTPUT_ENV),
            step_summary: var(STEP_SUMMARY_ENV),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.output.is_none() && self.step_summary.is_none()
    }
}

/// Publish the run's outputs and summary to whichever runner files are configured.
pub fn publish(outcome: &CheckOutcome, files: &GithubFiles) -> anyhow::Result<()> {
    let summary = outcome.summary_md();

    if let Some(path) = &files.output {
        let found = outcome
            .found_manifests
            .iter()
            .map(|p| p.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        let mut block = output_entry("foundManifests", &found);
        // A dry run only plans rewrites; nothing on disk was modified.
        if !outcome.report.dry_run && !outcome.report.updated_files.is_empty() {
            block.push_str(&output_entry(
                "modifiedFiles",
                &outcome.report.updated_files.join("\n"),
            ));
        }
        block.push_str(&output_entry("summary", &summary));

        append(path, &block)?;
        debug!(path = %path, "wrote step outputs");
    }

    if let Some(path) = &files.step_summary {
        append(path, &summary)?;
        debug!(path = %path, "wrote step summary");
    }

    Ok(())
}

/// One multiline output entry: `name<<DELIM`, the value, then `DELIM`.
pub fn output_entry(name: &str, value: &str) -> String {
    let mut delimiter = format!("ghadelimiter_{}", uuid::Uuid::new_v4());
    while value.contains(&delimiter) {
        delimiter = format!("ghadelimiter_{}", uuid::Uuid::new_v4());
    }
    format!("{name}<<{delimiter}\n{value}\n{delimiter}\n")
}

fn append(path: &Utf8Path, contents: &str) -> anyhow::Result<()> {
    let mut file = fs_err::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open {}", path))?;
    file.write_all(contents.as_bytes())
        .with_context(|| format!("append to {}", path))
}
