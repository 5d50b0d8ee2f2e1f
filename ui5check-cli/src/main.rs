use anyhow::Context;
use camino::Utf8PathBuf;
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;
use ui5check_cli::config::{self, CheckOverrides, ConfigMerger};
use ui5check_cli::github::{self, GithubFiles};
use ui5check_core::FsRepoView;
use ui5check_core::adapters::{FsWritePort, catalog_source};
use ui5check_core::pipeline::{CheckOutcome, load_catalog, run_check, write_check_artifacts};
use ui5check_core::settings::CheckSettings;
use ui5check_domain::EocpCalculator;
use ui5check_render::{render_verdict_line, render_versions_text};
use ui5check_types::catalog::CatalogLine;
use ui5check_types::report::ToolInfo;

/// Bad input, unreachable catalog, or no eligible repair target.
const EXIT_FATAL: u8 = 1;
/// At least one manifest declares an invalid or outdated version.
const EXIT_MANIFEST_ERRORS: u8 = 2;

#[derive(Debug, Parser)]
#[command(
    name = "ui5check",
    version,
    about = "Check (and optionally repair) the UI5 version declared in manifest.json files."
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Check manifest.json files against the published UI5 version overview.
    Check(CheckArgs),
    /// List the UI5 version lines from the published version overview.
    Versions(VersionsArgs),
}

#[derive(Debug, Parser)]
struct CatalogArgs {
    /// URL of the version overview document.
    #[arg(long, conflicts_with = "catalog_file")]
    catalog_url: Option<String>,

    /// Read the version overview from a local JSON file instead of fetching it.
    #[arg(long)]
    catalog_file: Option<Utf8PathBuf>,
}

#[derive(Debug, Parser)]
struct CheckArgs {
    /// Repository root (default: $GITHUB_WORKSPACE, then the current directory).
    #[arg(long, env = "GITHUB_WORKSPACE")]
    repo_root: Option<Utf8PathBuf>,

    /// Directory glob pattern containing a manifest.json (repeatable; extends ui5check.toml).
    #[arg(long = "manifest-path", value_name = "PATTERN")]
    manifest_paths: Vec<String>,

    /// Rewrite invalid or outdated versions instead of failing.
    #[arg(long, default_value_t = false)]
    fix_outdated: bool,

    /// Repair towards the newest LTS version line.
    #[arg(long, default_value_t = false)]
    use_lts: bool,

    /// Do not warn about version lines that are out of maintenance.
    #[arg(long, default_value_t = false)]
    eom_allowed: bool,

    /// Warn this many days before a version line reaches end of cloud provisioning.
    #[arg(long, value_name = "DAYS")]
    allowed_days_before_eocp: Option<u32>,

    /// Plan repairs and emit artifacts without writing any manifest.
    #[arg(long, default_value_t = false)]
    dry_run: bool,

    #[command(flatten)]
    catalog: CatalogArgs,

    /// Output directory for artifacts (default: <repo_root>/artifacts/ui5check).
    #[arg(long)]
    out_dir: Option<Utf8PathBuf>,

    /// Output format (text, json).
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Debug, Parser)]
struct VersionsArgs {
    /// Repository root used to discover ui5check.toml.
    #[arg(long, env = "GITHUB_WORKSPACE")]
    repo_root: Option<Utf8PathBuf>,

    #[command(flatten)]
    catalog: CatalogArgs,

    /// Only list LTS version lines.
    #[arg(long, default_value_t = false)]
    lts_only: bool,

    /// Output format (text, json).
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> ExitCode {
    match real_main() {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::from(EXIT_FATAL)
        }
    }
}

fn real_main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Check(args) => cmd_check(args),
        Command::Versions(args) => cmd_versions(args),
    }
}

fn cmd_check(args: CheckArgs) -> anyhow::Result<ExitCode> {
    let repo_root = args
        .repo_root
        .unwrap_or_else(|| Utf8PathBuf::from("."));

    let file_config =
        config::load_or_default(&repo_root).context("load ui5check.toml config")?;
    let merged = ConfigMerger::new(file_config).merge_check_args(&CheckOverrides {
        manifest_paths: args.manifest_paths,
        fix_outdated: args.fix_outdated,
        use_lts: args.use_lts,
        eom_allowed: args.eom_allowed,
        allowed_days_before_eocp: args.allowed_days_before_eocp,
        catalog_url: args.catalog.catalog_url,
        catalog_file: args.catalog.catalog_file,
        out_dir: args.out_dir,
    });
    debug!(?merged, "merged config");

    let out_dir = if merged.out_dir.is_absolute() {
        merged.out_dir.clone()
    } else {
        repo_root.join(&merged.out_dir)
    };

    let settings = CheckSettings {
        repo_root: repo_root.clone(),
        out_dir: out_dir.clone(),
        manifest_paths: merged.manifest_paths,
        fix_outdated: merged.fix_outdated,
        use_lts: merged.use_lts,
        eom_allowed: merged.eom_allowed,
        allowed_days_before_eocp: merged.allowed_days_before_eocp,
        dry_run: args.dry_run,
        catalog: merged.catalog,
    };

    let source = catalog_source(&settings.catalog)?;
    let repo = FsRepoView::new(repo_root);
    let outcome = run_check(
        &settings,
        source.as_ref(),
        &repo,
        &FsWritePort,
        tool_info(),
        Utc::now(),
    )?;

    write_check_artifacts(&outcome, &out_dir, &FsWritePort)
        .with_context(|| format!("write artifacts to {}", out_dir))?;
    info!(out_dir = %out_dir, "wrote artifacts");

    github::publish(&outcome, &GithubFiles::from_env()).context("publish GitHub outputs")?;

    match args.format {
        OutputFormat::Text => print_check_text(&outcome),
        OutputFormat::Json => {
            let json =
                serde_json::to_string_pretty(&outcome.report).context("serialize report")?;
            println!("{json}");
        }
    }

    if outcome.report.has_errors {
        return Ok(ExitCode::from(EXIT_MANIFEST_ERRORS));
    }
    Ok(ExitCode::SUCCESS)
}

fn print_check_text(outcome: &CheckOutcome) {
    for r in &outcome.report.results {
        println!("{} {}: {}", r.status_icon(), r.path, r.status_text);
        for note in &r.advisories {
            println!("    note: {note}");
        }
    }
    println!("{}", render_verdict_line(&outcome.report));
}

fn cmd_versions(args: VersionsArgs) -> anyhow::Result<ExitCode> {
    let repo_root = args
        .repo_root
        .unwrap_or_else(|| Utf8PathBuf::from("."));
    let file_config =
        config::load_or_default(&repo_root).context("load ui5check.toml config")?;
    let location = ConfigMerger::new(file_config)
        .merge_catalog_args(args.catalog.catalog_url, args.catalog.catalog_file);

    let source = catalog_source(&location)?;
    let mut eocp = EocpCalculator::new(Utc::now());
    let catalog = load_catalog(source.as_ref(), &mut eocp)?;

    match args.format {
        OutputFormat::Text => print!("{}", render_versions_text(&catalog, args.lts_only)),
        OutputFormat::Json => {
            let lines: Vec<&CatalogLine> = catalog
                .lines
                .values()
                .filter(|l| !args.lts_only || l.is_lts)
                .collect();
            let json = serde_json::to_string_pretty(&lines).context("serialize versions")?;
            println!("{json}");
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn tool_info() -> ToolInfo {
    let env = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());
    ToolInfo {
        name: "ui5check".to_string(),
        version: Some(env!("CARGO_PKG_VERSION").to_string()),
        repo: env("GITHUB_REPOSITORY"),
        commit: env("GITHUB_SHA"),
    }
}
