// Copyright 2026 suricata-refcheck contributors
// SPDX-License-Identifier: Apache-2.0

//! Run coordinator. Drives extractor → ledger → verifier → router over a
//! directory of rule files.
//!
//! A run moves through fixed stages:
//! 1. Init: create the output directory, reset the analytics streams.
//! 2. Enumerate `*.rules`; none found ends the run as [`RunStatus::NoInput`].
//! 3. Verify every unseen reference URL of every file.
//! 4. Optionally sweep the navigate directory with the HTTP strategy.
//! 5. Archive the ledger under the run date.
//!
//! Failed checks are data, never retried. Only configuration and I/O
//! errors end a run early; whatever was recorded in the ledger by then
//! stays recorded, so a rerun picks up where this one stopped.

use crate::config::CheckerConfig;
use crate::error::{RefcheckError, Result};
use crate::hooks::ScreenshotHook;
use crate::ledger::Ledger;
use crate::router::{AnalyticsStreams, Partition, ResultRouter};
use crate::rules::{is_rules_file, RuleExtractor, RuleRecord};
use crate::verify::{HttpVerifier, RenderVerifier, Strategy, Verifier};
use chrono::NaiveDate;
use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Completed,
    /// The rules directory held no `.rules` files.
    NoInput,
}

/// Counters for one pass over a set of rule files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PassReport {
    pub files: usize,
    /// Records extracted (lines with both a sid and a reference URL).
    pub records: usize,
    pub verified: usize,
    /// Records whose URL was already in the ledger.
    pub skipped: usize,
    pub succeeded: usize,
    pub failed: usize,
}

/// Summary of a whole run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub status: RunStatus,
    pub strategy: Strategy,
    pub primary: PassReport,
    pub false_positive: Option<PassReport>,
    pub archived_ledger: Option<PathBuf>,
}

enum RecordResult {
    Skipped,
    Verified(Partition),
}

/// One verifier/router pairing applied to a set of files.
struct Pass<'a> {
    name: &'static str,
    verifier: &'a dyn Verifier,
    router: &'a ResultRouter,
}

/// Orchestrates complete runs.
pub struct RunCoordinator {
    config: Arc<CheckerConfig>,
    extractor: RuleExtractor,
    verifier: Arc<dyn Verifier>,
    sweep_verifier: Arc<dyn Verifier>,
    router: ResultRouter,
    sweep_router: ResultRouter,
}

impl RunCoordinator {
    /// Build the verifiers and hooks the configuration asks for.
    ///
    /// Fails with [`RefcheckError::Configuration`] when the render strategy or
    /// screenshots are requested and no Chromium can be found.
    pub fn new(config: CheckerConfig) -> Result<Self> {
        config.validate()?;

        let http: Arc<dyn Verifier> =
            Arc::new(HttpVerifier::new(config.timeout, &config.user_agent)?);
        let verifier: Arc<dyn Verifier> = match config.strategy {
            Strategy::Http => Arc::clone(&http),
            Strategy::Render => Arc::new(RenderVerifier::new(
                config.chromium_path.as_deref(),
                config.timeout,
            )?),
        };

        let mut coordinator = Self::with_verifiers(config, verifier, http)?;

        if let Some(dir) = coordinator.config.screenshot_dir.clone() {
            let hook = ScreenshotHook::new(
                dir,
                coordinator.config.chromium_path.as_deref(),
                coordinator.config.timeout,
            )?;
            coordinator.router = coordinator.router.with_hook(Arc::new(hook));
        }

        Ok(coordinator)
    }

    /// Build a coordinator around caller-supplied verifiers.
    ///
    /// `sweep_verifier` is used for the false-positive sweep regardless of
    /// the primary strategy.
    pub fn with_verifiers(
        config: CheckerConfig,
        verifier: Arc<dyn Verifier>,
        sweep_verifier: Arc<dyn Verifier>,
    ) -> Result<Self> {
        config.validate()?;

        let router = ResultRouter::new(AnalyticsStreams::primary(
            &config.failure_analytics,
            &config.success_analytics,
        ))
        .with_echo(config.echo);
        let sweep_router = ResultRouter::new(AnalyticsStreams::false_positive(
            &config.fp_failure_analytics,
            &config.fp_success_analytics,
        ))
        .with_echo(config.echo);

        Ok(Self {
            config: Arc::new(config),
            extractor: RuleExtractor::new(),
            verifier,
            sweep_verifier,
            router,
            sweep_router,
        })
    }

    pub fn config(&self) -> &CheckerConfig {
        &self.config
    }

    /// Run with today's local date for the ledger archive.
    pub async fn run(&self) -> Result<RunReport> {
        self.run_dated(chrono::Local::now().date_naive()).await
    }

    /// Run, archiving the ledger under `date`.
    pub async fn run_dated(&self, date: NaiveDate) -> Result<RunReport> {
        let config = &self.config;

        // Init
        std::fs::create_dir_all(&config.output_dir)
            .map_err(|e| RefcheckError::io(&config.output_dir, e))?;
        self.router.reset()?;
        if config.navigate_dir.is_some() {
            self.sweep_router.reset()?;
        }

        // Enumerate
        let files = list_rule_files(&config.rules_dir)?;
        if files.is_empty() {
            warn!(
                "no .rules files found in {}",
                config.rules_dir.display()
            );
            return Ok(RunReport {
                status: RunStatus::NoInput,
                strategy: self.verifier.strategy(),
                primary: PassReport::default(),
                false_positive: None,
                archived_ledger: None,
            });
        }

        let ledger = Ledger::load(&config.ledger_path)?;
        info!(
            "checking {} rule file(s) with the {} strategy ({} URL(s) already processed)",
            files.len(),
            self.verifier.strategy(),
            ledger.len()
        );

        // Per-file pass
        let primary = Pass {
            name: "primary",
            verifier: self.verifier.as_ref(),
            router: &self.router,
        };
        let primary_report = self.run_pass(&primary, &files, &ledger).await?;

        // False-positive sweep
        let false_positive = match &config.navigate_dir {
            Some(dir) => {
                let nav_files = list_rule_files(dir)?;
                if nav_files.is_empty() {
                    warn!("no .rules files found in navigate directory {}", dir.display());
                }
                let sweep = Pass {
                    name: "false-positive",
                    verifier: self.sweep_verifier.as_ref(),
                    router: &self.sweep_router,
                };
                Some(self.run_pass(&sweep, &nav_files, &ledger).await?)
            }
            None => None,
        };

        // Finalize
        let archived_ledger = if config.archive_ledger {
            Some(ledger.archive(date)?)
        } else {
            None
        };

        Ok(RunReport {
            status: RunStatus::Completed,
            strategy: self.verifier.strategy(),
            primary: primary_report,
            false_positive,
            archived_ledger,
        })
    }

    async fn run_pass(
        &self,
        pass: &Pass<'_>,
        files: &[PathBuf],
        ledger: &Ledger,
    ) -> Result<PassReport> {
        let mut report = PassReport::default();
        for path in files {
            self.process_file(pass, path, ledger, &mut report).await?;
        }
        info!(
            "{} pass: {} verified, {} skipped, {} ok, {} failed",
            pass.name, report.verified, report.skipped, report.succeeded, report.failed
        );
        Ok(report)
    }

    async fn process_file(
        &self,
        pass: &Pass<'_>,
        path: &Path,
        ledger: &Ledger,
        report: &mut PassReport,
    ) -> Result<()> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        info!("processing {file_name}...");

        ledger.refresh()?;
        let result_path = self.config.result_path(&file_name);
        pass.router.begin_result_file(&result_path)?;

        let records = self.extractor.extract_file(path)?;
        report.files += 1;
        report.records += records.len();

        let result_path = result_path.as_path();
        let mut results = stream::iter(records)
            .map(|record| self.process_record(pass, record, ledger, result_path))
            .buffer_unordered(self.config.concurrency);

        while let Some(result) = results.next().await {
            match result? {
                RecordResult::Skipped => report.skipped += 1,
                RecordResult::Verified(partition) => {
                    report.verified += 1;
                    match partition {
                        Partition::Success => report.succeeded += 1,
                        Partition::Failure => report.failed += 1,
                    }
                }
            }
        }

        info!("results saved to {}", result_path.display());
        Ok(())
    }

    async fn process_record(
        &self,
        pass: &Pass<'_>,
        record: RuleRecord,
        ledger: &Ledger,
        result_path: &Path,
    ) -> Result<RecordResult> {
        if !ledger.claim(&record.url) {
            info!("URL already processed: {}", record.url);
            return Ok(RecordResult::Skipped);
        }

        info!("processing URL: {} (SID: {})", record.url, record.sid);

        let routed = async {
            let outcome = pass.verifier.verify(&record.url).await?;
            pass.router.route(&record.sid, &outcome, result_path).await
        }
        .await;

        match routed {
            Ok(partition) => {
                // Only after the outcome is written.
                ledger.record(&record.url)?;
                Ok(RecordResult::Verified(partition))
            }
            Err(e) => {
                ledger.release(&record.url);
                Err(e)
            }
        }
    }
}

/// `*.rules` files directly inside `dir`, sorted by name.
pub fn list_rule_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| RefcheckError::io(dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| RefcheckError::io(dir, e))?.path();
        if path.is_file() && is_rules_file(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
