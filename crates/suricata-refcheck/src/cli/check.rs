//! `refcheck check`: verify the reference URLs of a rules directory.

use crate::cli::output::{self, OutputMode};
use crate::config::CheckerConfig;
use crate::coordinator::{PassReport, RunCoordinator, RunReport, RunStatus};
use crate::verify::Strategy;
use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use std::time::Duration;

/// Flags for the check command. Unset flags fall back to `REFCHECK_*`
/// environment variables, then to built-in defaults.
#[derive(Debug, Clone, Args)]
pub struct CheckArgs {
    /// Directory containing the .rules files to verify
    #[arg(long)]
    pub rules_dir: Option<PathBuf>,

    /// Rule files of non-selected categories to sweep for false positives
    #[arg(long)]
    pub navigate_dir: Option<PathBuf>,

    /// Directory for per-file result streams
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Non-success analytics file
    #[arg(long)]
    pub analytics: Option<PathBuf>,

    /// Success analytics file
    #[arg(long)]
    pub analytics_ok: Option<PathBuf>,

    /// Non-success analytics file of the false-positive sweep
    #[arg(long)]
    pub fp_analytics: Option<PathBuf>,

    /// Success analytics file of the false-positive sweep
    #[arg(long)]
    pub fp_analytics_ok: Option<PathBuf>,

    /// Processed-URL ledger file
    #[arg(long)]
    pub ledger: Option<PathBuf>,

    /// Verify by rendering each URL in headless Chromium instead of HTTP GET
    #[arg(long)]
    pub render: bool,

    /// Per-URL timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Maximum URLs checked at once
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Print every result line as it is written
    #[arg(long)]
    pub echo: bool,

    /// Leave the ledger in place instead of archiving it (resumable runs)
    #[arg(long)]
    pub keep_ledger: bool,

    /// Save a screenshot of every successful URL into this directory
    #[arg(long)]
    pub screenshots: Option<PathBuf>,
}

impl CheckArgs {
    /// Overlay these flags on an environment-derived configuration.
    pub fn into_config(self, base: CheckerConfig) -> CheckerConfig {
        CheckerConfig {
            rules_dir: self.rules_dir.unwrap_or(base.rules_dir),
            navigate_dir: self.navigate_dir.or(base.navigate_dir),
            output_dir: self.output_dir.unwrap_or(base.output_dir),
            failure_analytics: self.analytics.unwrap_or(base.failure_analytics),
            success_analytics: self.analytics_ok.unwrap_or(base.success_analytics),
            fp_failure_analytics: self.fp_analytics.unwrap_or(base.fp_failure_analytics),
            fp_success_analytics: self.fp_analytics_ok.unwrap_or(base.fp_success_analytics),
            ledger_path: self.ledger.unwrap_or(base.ledger_path),
            strategy: if self.render {
                Strategy::Render
            } else {
                base.strategy
            },
            timeout: self
                .timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(base.timeout),
            concurrency: self.concurrency.unwrap_or(base.concurrency),
            echo: self.echo || base.echo,
            archive_ledger: base.archive_ledger && !self.keep_ledger,
            screenshot_dir: self.screenshots.or(base.screenshot_dir),
            chromium_path: base.chromium_path,
            user_agent: base.user_agent,
        }
    }
}

/// Run the check command.
pub async fn run(args: CheckArgs, mode: OutputMode) -> Result<()> {
    let config = args.into_config(CheckerConfig::from_env());
    let coordinator = RunCoordinator::new(config).context("cannot start verification run")?;

    if mode.text() {
        let config = coordinator.config();
        println!(
            "  Checking {} ({} strategy)...",
            config.rules_dir.display(),
            config.strategy
        );
    }

    let report = coordinator.run().await?;

    if mode.json {
        output::print_json(&report);
    } else if !mode.quiet {
        print_report(&report, coordinator.config());
    }

    Ok(())
}

fn print_report(report: &RunReport, config: &CheckerConfig) {
    if report.status == RunStatus::NoInput {
        println!(
            "\n  No .rules files found in {}. Nothing to check.",
            config.rules_dir.display()
        );
        return;
    }

    println!();
    print_pass("Rules", &report.primary);
    if let Some(fp) = &report.false_positive {
        print_pass("False-positive sweep", fp);
    }

    println!();
    println!("  Results:       {}/", config.output_dir.display());
    println!("  Non-success:   {}", config.failure_analytics.display());
    println!("  Success:       {}", config.success_analytics.display());
    if report.false_positive.is_some() {
        println!("  FP non-success: {}", config.fp_failure_analytics.display());
        println!("  FP success:     {}", config.fp_success_analytics.display());
    }
    if let Some(archived) = &report.archived_ledger {
        println!("  Ledger archive: {}", archived.display());
    }
}

fn print_pass(label: &str, pass: &PassReport) {
    println!("  {label}:");
    println!(
        "    {:>3} file(s)  {:>5} reference(s)  {:>5} checked  {:>5} skipped",
        pass.files, pass.records, pass.verified, pass.skipped
    );
    println!(
        "    {:>5} ok  {:>5} failed",
        pass.succeeded, pass.failed
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_args() -> CheckArgs {
        CheckArgs {
            rules_dir: None,
            navigate_dir: None,
            output_dir: None,
            analytics: None,
            analytics_ok: None,
            fp_analytics: None,
            fp_analytics_ok: None,
            ledger: None,
            render: false,
            timeout_secs: None,
            concurrency: None,
            echo: false,
            keep_ledger: false,
            screenshots: None,
        }
    }

    #[test]
    fn test_unset_flags_keep_base() {
        let base = CheckerConfig::default();
        let config = empty_args().into_config(base.clone());
        assert_eq!(config.rules_dir, base.rules_dir);
        assert_eq!(config.timeout, base.timeout);
        assert!(config.archive_ledger);
        assert_eq!(config.strategy, Strategy::Http);
    }

    #[test]
    fn test_flags_override_base() {
        let args = CheckArgs {
            rules_dir: Some(PathBuf::from("/srv/rules")),
            render: true,
            timeout_secs: Some(12),
            concurrency: Some(8),
            keep_ledger: true,
            ..empty_args()
        };
        let config = args.into_config(CheckerConfig::default());
        assert_eq!(config.rules_dir, PathBuf::from("/srv/rules"));
        assert_eq!(config.strategy, Strategy::Render);
        assert_eq!(config.timeout, Duration::from_secs(12));
        assert_eq!(config.concurrency, 8);
        assert!(!config.archive_ledger);
    }
}
