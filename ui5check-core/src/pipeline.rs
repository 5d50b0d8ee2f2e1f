//! Core check pipeline, extracted from the CLI.
//!
//! The entry point is I/O-agnostic: the catalog, manifest reads and all writes go
//! through the port traits.

use crate::discover::discover_manifests;
use crate::ports::{CatalogSource, WritePort};
use crate::settings::CheckSettings;
use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use chrono::{DateTime, Utc};
use tracing::{debug, error, info, warn};
use ui5check_domain::{
    CheckError, Checker, EocpCalculator, RepoView, build_catalog, updated_status_text,
};
use ui5check_edit::{EditedFile, edit_manifest, render_patch};
use ui5check_render::render_summary_md;
use ui5check_types::catalog::Catalog;
use ui5check_types::report::{CheckReport, ManifestOutcome, RunInfo, ToolInfo};

/// Error type for pipeline results. Every variant aborts the run.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// Invalid or unresolvable inputs.
    #[error("{0}")]
    Input(String),
    #[error(transparent)]
    Check(#[from] CheckError),
    #[error("{0:#}")]
    Internal(#[from] anyhow::Error),
}

/// Outcome of `run_check`.
#[derive(Debug)]
pub struct CheckOutcome {
    pub report: CheckReport,
    /// Manifests resolved from the configured patterns, relative to the repository root.
    pub found_manifests: Vec<Utf8PathBuf>,
    pub patch: String,
}

impl CheckOutcome {
    pub fn summary_md(&self) -> String {
        render_summary_md(&self.report)
    }
}

/// Load the overview document and build the catalog.
///
/// Any source failure is reported as [`CheckError::CatalogFetch`].
pub fn load_catalog(
    source: &dyn CatalogSource,
    eocp: &mut EocpCalculator,
) -> Result<Catalog, ToolError> {
    info!(source = %source.describe(), "Loading UI5 versions");
    let doc = source
        .load_catalog()
        .map_err(|e| CheckError::CatalogFetch {
            message: format!("{e:#}"),
        })?;
    Ok(build_catalog(&doc, eocp)?)
}

/// Run the check pipeline.
///
/// Manifests are checked in discovery order. Auto-fixed manifests are written through
/// `writer` unless `settings.dry_run` is set. Per-manifest failures are recorded in the
/// report; only fatal conditions return `Err`.
pub fn run_check(
    settings: &CheckSettings,
    source: &dyn CatalogSource,
    repo: &dyn RepoView,
    writer: &dyn WritePort,
    tool: ToolInfo,
    now: DateTime<Utc>,
) -> Result<CheckOutcome, ToolError> {
    let started = Utc::now();
    info!(repo_root = %repo.root(), "Repository path");

    if settings.manifest_paths.is_empty() {
        return Err(ToolError::Input(
            "'manifestPaths' must not be empty".to_string(),
        ));
    }
    info!(patterns = ?settings.manifest_paths, "Specified manifest paths");

    info!("Determine manifest.json file paths");
    let found_manifests =
        discover_manifests(repo.root(), &settings.manifest_paths).context("resolve manifests")?;
    if found_manifests.is_empty() {
        return Err(ToolError::Input(
            "Glob patterns in 'manifestPaths' did not resolve to any 'manifest.json' file"
                .to_string(),
        ));
    }
    info!(count = found_manifests.len(), "Resolved manifest file paths");

    let mut eocp = EocpCalculator::new(now);
    let catalog = load_catalog(source, &mut eocp)?;

    info!("Checking UI5 version in manifest.json files");
    let mut checker = Checker::new(settings.check_config(), &catalog, now);
    let mut results = Vec::with_capacity(found_manifests.len());
    let mut edits: Vec<EditedFile> = Vec::new();
    let mut updated_files = Vec::new();
    let mut unwritten = 0u64;

    for rel in &found_manifests {
        let content = repo
            .read_to_string(rel)
            .map_err(|e| CheckError::ManifestRead {
                path: rel.to_string(),
                message: format!("{e:#}"),
            })?;

        let check = checker.check(rel.as_str(), &content)?;
        let mut result = check.result;

        if let Some(fix) = check.fix {
            match edit_manifest(rel, &content, &fix.target_version) {
                Some(edit) => {
                    if !settings.dry_run {
                        write_manifest(repo.root(), rel, &edit, writer)?;
                    }
                    result.status_text = updated_status_text(fix.lts, !settings.dry_run);
                    result.file_change = Some(edit.file_change());
                    updated_files.push(rel.to_string());
                    edits.push(edit);
                }
                None => {
                    warn!(path = %rel, "version declaration could not be rewritten");
                    result.outcome = ManifestOutcome::Error;
                    result.outdated = true;
                    result.updated_version = None;
                    result.status_text = format!(
                        "Version in file {rel} could not be updated to {}",
                        fix.target_version
                    );
                    unwritten += 1;
                }
            }
        }

        debug!(path = %rel, outcome = ?result.outcome, "checked manifest");
        results.push(result);
    }

    let ended = Utc::now();
    let mut report = CheckReport::new(
        tool,
        RunInfo {
            run_id: uuid::Uuid::new_v4().to_string(),
            started_at: started.to_rfc3339(),
            ended_at: Some(ended.to_rfc3339()),
            duration_ms: u64::try_from((ended - started).num_milliseconds()).ok(),
        },
    );
    report.dry_run = settings.dry_run;
    report.results = results;
    report.updated_files = updated_files;
    report.error_count = checker.error_count() + unwritten;
    report.finalize();

    if report.has_errors {
        error!("Some manifest.json files contain invalid/outdated versions");
    }

    Ok(CheckOutcome {
        report,
        found_manifests,
        patch: render_patch(&edits),
    })
}

fn write_manifest(
    root: &Utf8Path,
    rel: &Utf8Path,
    edit: &EditedFile,
    writer: &dyn WritePort,
) -> anyhow::Result<()> {
    let abs = root.join(rel);
    writer
        .write_file(&abs, edit.after.as_bytes())
        .with_context(|| format!("write updated manifest {}", rel))?;
    info!(path = %rel, "updated manifest");
    Ok(())
}

/// Write all check artifacts to the output directory.
pub fn write_check_artifacts(
    outcome: &CheckOutcome,
    out_dir: &Utf8Path,
    writer: &dyn WritePort,
) -> anyhow::Result<()> {
    writer.create_dir_all(out_dir)?;

    let report_json =
        serde_json::to_string_pretty(&outcome.report).context("serialize report")?;
    writer.write_file(&out_dir.join("report.json"), report_json.as_bytes())?;

    writer.write_file(&out_dir.join("summary.md"), outcome.summary_md().as_bytes())?;

    writer.write_file(&out_dir.join("patch.diff"), outcome.patch.as_bytes())?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{FsWritePort, InMemoryCatalogSource};
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use tempfile::TempDir;
    use ui5check_domain::FsRepoView;
    use ui5check_types::overview::{PatchEntry, VersionEntry, VersionOverview};
    use ui5check_types::report::ReportStatus;

    #[derive(Default)]
    struct MemWritePort {
        files: Mutex<HashMap<String, Vec<u8>>>,
        dirs: Mutex<Vec<String>>,
    }

    impl MemWritePort {
        fn get(&self, key: &str) -> Option<String> {
            self.files
                .lock()
                .expect("lock files")
                .iter()
                .find(|(k, _)| k.ends_with(key))
                .map(|(_, v)| String::from_utf8_lossy(v).into_owned())
        }

        fn count(&self) -> usize {
            self.files.lock().expect("lock files").len()
        }
    }

    impl WritePort for MemWritePort {
        fn write_file(&self, path: &Utf8Path, contents: &[u8]) -> anyhow::Result<()> {
            let key = path.as_str().replace('\\', "/");
            self.files
                .lock()
                .expect("lock files")
                .insert(key, contents.to_vec());
            Ok(())
        }

        fn create_dir_all(&self, path: &Utf8Path) -> anyhow::Result<()> {
            let key = path.as_str().replace('\\', "/");
            self.dirs.lock().expect("lock dirs").push(key);
            Ok(())
        }
    }

    struct FailingSource;

    impl CatalogSource for FailingSource {
        fn load_catalog(&self) -> anyhow::Result<VersionOverview> {
            anyhow::bail!("connection refused")
        }

        fn describe(&self) -> String {
            "failing".to_string()
        }
    }

    fn tool() -> ToolInfo {
        ToolInfo {
            name: "ui5check".into(),
            version: Some("0.0.0-test".into()),
            repo: None,
            commit: None,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
    }

    fn overview() -> VersionOverview {
        let line = |v: &str, lts: bool| VersionEntry {
            version: v.to_string(),
            support: "Maintenance".to_string(),
            lts,
            eom: String::new(),
            eocp: "Q4/2030".to_string(),
        };
        let patch = |v: &str| PatchEntry {
            version: v.to_string(),
            eocp: "Q4/2030".to_string(),
            removed: None,
            hidden: None,
        };
        VersionOverview {
            versions: vec![line("1.136.*", false), line("1.120.*", true)],
            patches: vec![
                patch("1.136.0"),
                patch("1.136.2"),
                patch("1.120.1"),
                patch("1.120.4"),
            ],
        }
    }

    fn manifest(version: &str) -> String {
        format!(
            "{{\n  \"sap.app\": {{\n    \"id\": \"demo\"\n  }},\n  \"sap.platform.cf\": {{\n    \"ui5VersionNumber\": \"{version}\"\n  }}\n}}\n"
        )
    }

    fn create_temp_repo(files: &[(&str, String)]) -> (TempDir, Utf8PathBuf) {
        let temp = TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("utf8");
        for (rel, contents) in files {
            let p = root.join(rel);
            std::fs::create_dir_all(p.parent().expect("parent")).expect("mkdir");
            std::fs::write(&p, contents).expect("write");
        }
        (temp, root)
    }

    fn settings(root: &Utf8Path, patterns: &[&str]) -> CheckSettings {
        CheckSettings {
            repo_root: root.to_path_buf(),
            manifest_paths: patterns.iter().map(|p| p.to_string()).collect(),
            ..CheckSettings::default()
        }
    }

    fn run(
        settings: &CheckSettings,
        writer: &dyn WritePort,
    ) -> Result<CheckOutcome, ToolError> {
        let repo = FsRepoView::new(settings.repo_root.clone());
        let source = InMemoryCatalogSource::new(overview());
        run_check(settings, &source, &repo, writer, tool(), now())
    }

    #[test]
    fn valid_manifest_passes_without_writes() {
        let (_t, root) = create_temp_repo(&[("app/manifest.json", manifest("1.120.4"))]);
        let writer = MemWritePort::default();
        let outcome = run(&settings(&root, &["app"]), &writer).unwrap();

        assert_eq!(outcome.report.status, ReportStatus::Pass);
        assert_eq!(outcome.report.results.len(), 1);
        assert_eq!(outcome.report.results[0].status_text, "No change required");
        assert!(outcome.report.updated_files.is_empty());
        assert_eq!(outcome.patch, "");
        assert_eq!(writer.count(), 0);
    }

    #[test]
    fn outdated_manifest_without_repair_fails_run() {
        let (_t, root) = create_temp_repo(&[
            ("a/manifest.json", manifest("1.96.11")),
            ("b/manifest.json", manifest("1.120.9")),
            ("c/manifest.json", manifest("1.136.2")),
        ]);
        let writer = MemWritePort::default();
        let outcome = run(&settings(&root, &["*"]), &writer).unwrap();

        let r = &outcome.report;
        assert_eq!(r.error_count, 2);
        assert!(r.has_errors);
        assert_eq!(r.status, ReportStatus::Fail);
        assert_eq!(
            r.results.iter().map(|x| x.outdated).collect::<Vec<_>>(),
            vec![true, true, false]
        );
        assert_eq!(
            r.results[1].status_text,
            "Patch 9 of version 1.120 is not available"
        );
        assert_eq!(writer.count(), 0);
    }

    #[test]
    fn repair_rewrites_manifest_through_write_port() {
        let original = manifest("1.96.11");
        let (_t, root) = create_temp_repo(&[("app/manifest.json", original.clone())]);
        let writer = MemWritePort::default();
        let mut s = settings(&root, &["app"]);
        s.fix_outdated = true;
        s.use_lts = true;

        let outcome = run(&s, &writer).unwrap();
        let result = &outcome.report.results[0];
        assert_eq!(result.outcome, ManifestOutcome::AutoFixed);
        assert_eq!(result.updated_version.as_deref(), Some("1.120.4"));
        assert_eq!(
            result.status_text,
            "Version has been updated to latest LTS version"
        );
        assert!(result.file_change.is_some());
        assert_eq!(outcome.report.updated_files, vec!["app/manifest.json"]);
        assert_eq!(outcome.report.status, ReportStatus::Warn);
        assert!(!outcome.report.has_errors);

        let written = writer.get("app/manifest.json").expect("manifest written");
        assert_eq!(written, original.replace("1.96.11", "1.120.4"));
        assert!(outcome.patch.contains("+    \"ui5VersionNumber\": \"1.120.4\""));
    }

    #[test]
    fn dry_run_plans_without_writing() {
        let (_t, root) = create_temp_repo(&[("app/manifest.json", manifest("1.96.11"))]);
        let writer = MemWritePort::default();
        let mut s = settings(&root, &["app"]);
        s.fix_outdated = true;
        s.dry_run = true;

        let outcome = run(&s, &writer).unwrap();
        assert_eq!(writer.count(), 0);
        assert!(outcome.report.dry_run);
        assert_eq!(
            outcome.report.results[0].status_text,
            "Version would be updated to latest version"
        );
        assert_eq!(
            outcome.report.results[0].updated_version.as_deref(),
            Some("1.136.2")
        );
        assert_eq!(outcome.report.updated_files, vec!["app/manifest.json"]);
        assert!(!outcome.patch.is_empty());
    }

    #[test]
    fn repair_writes_to_disk_with_fs_port() {
        let (_t, root) = create_temp_repo(&[("app/manifest.json", manifest("1.120.x"))]);
        let mut s = settings(&root, &["app"]);
        s.fix_outdated = true;

        // 1.120.* is acceptable: a published patch exists in the line.
        let outcome = run(&s, &FsWritePort).unwrap();
        assert_eq!(outcome.report.results[0].outcome, ManifestOutcome::NoChange);

        std::fs::write(root.join("app/manifest.json"), manifest("1.99.x")).unwrap();
        let outcome = run(&s, &FsWritePort).unwrap();
        assert_eq!(
            outcome.report.results[0].updated_version.as_deref(),
            Some("1.136.*")
        );
        let on_disk = std::fs::read_to_string(root.join("app/manifest.json")).unwrap();
        assert_eq!(on_disk, manifest("1.136.*"));
    }

    #[test]
    fn skipped_manifest_is_reported() {
        let (_t, root) = create_temp_repo(&[("router/manifest.json", "{}".to_string())]);
        let outcome = run(&settings(&root, &["router"]), &MemWritePort::default()).unwrap();
        let r = &outcome.report.results[0];
        assert_eq!(r.outcome, ManifestOutcome::Skipped);
        assert!(r.found_version.is_none());
        assert_eq!(outcome.report.status, ReportStatus::Pass);
    }

    #[test]
    fn empty_patterns_are_rejected() {
        let (_t, root) = create_temp_repo(&[]);
        let err = run(&settings(&root, &[]), &MemWritePort::default()).unwrap_err();
        assert_eq!(err.to_string(), "'manifestPaths' must not be empty");
        assert!(matches!(err, ToolError::Input(_)));
    }

    #[test]
    fn unresolved_patterns_are_rejected() {
        let (_t, root) = create_temp_repo(&[("app/manifest.json", manifest("1.120.4"))]);
        let err = run(&settings(&root, &["nowhere"]), &MemWritePort::default()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Glob patterns in 'manifestPaths' did not resolve to any 'manifest.json' file"
        );
    }

    #[test]
    fn catalog_failure_is_fatal_before_any_write() {
        let (_t, root) = create_temp_repo(&[("app/manifest.json", manifest("1.96.1"))]);
        let s = settings(&root, &["app"]);
        let repo = FsRepoView::new(root.clone());
        let writer = MemWritePort::default();

        let err = run_check(&s, &FailingSource, &repo, &writer, tool(), now()).unwrap_err();
        assert!(matches!(err, ToolError::Check(CheckError::CatalogFetch { .. })));
        assert!(err.to_string().contains("connection refused"));
        assert_eq!(writer.count(), 0);
    }

    #[test]
    fn empty_catalog_is_fatal() {
        let (_t, root) = create_temp_repo(&[("app/manifest.json", manifest("1.96.1"))]);
        let s = settings(&root, &["app"]);
        let repo = FsRepoView::new(root.clone());
        let source = InMemoryCatalogSource::new(VersionOverview::default());

        let err = run_check(&s, &source, &repo, &MemWritePort::default(), tool(), now())
            .unwrap_err();
        assert_eq!(err.to_string(), "No UI5 versions found in response");
    }

    #[test]
    fn malformed_manifest_is_fatal() {
        let (_t, root) = create_temp_repo(&[("app/manifest.json", "{ broken".to_string())]);
        let err = run(&settings(&root, &["app"]), &MemWritePort::default()).unwrap_err();
        assert!(matches!(err, ToolError::Check(CheckError::ManifestRead { .. })));
    }

    #[test]
    fn artifacts_are_written() {
        let (_t, root) = create_temp_repo(&[("app/manifest.json", manifest("1.96.11"))]);
        let mut s = settings(&root, &["app"]);
        s.fix_outdated = true;
        s.dry_run = true;
        let outcome = run(&s, &MemWritePort::default()).unwrap();

        let writer = MemWritePort::default();
        write_check_artifacts(&outcome, Utf8Path::new("out"), &writer).unwrap();

        let report: serde_json::Value =
            serde_json::from_str(&writer.get("out/report.json").expect("report")).unwrap();
        assert_eq!(report["schema"], "ui5check.report.v1");
        assert_eq!(report["status"], "warn");
        assert_eq!(report["results"][0]["outcome"], "auto_fixed");

        let summary = writer.get("out/summary.md").expect("summary");
        assert!(summary.contains("| app/manifest.json | 1.96.11 | 1.136.2 | ✅ |"));
        assert_eq!(writer.get("out/patch.diff").expect("patch"), outcome.patch);
        assert_eq!(
            writer.dirs.lock().expect("lock dirs").clone(),
            vec!["out".to_string()]
        );
    }
}
