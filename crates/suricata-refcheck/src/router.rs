//! Result router: writes outcomes to the per-file and analytics streams.
//!
//! Every outcome produces one line in its rule file's result stream and the
//! same line in exactly one analytics stream. Each write opens the file in
//! append mode, writes a single line and closes it again; a lock keeps lines
//! from concurrent workers whole.

use crate::error::{RefcheckError, Result};
use crate::hooks::SuccessHook;
use crate::status::VerificationOutcome;
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Header of the primary non-success analytics stream.
pub const FAILURE_HEADER: &str = "URLs com erro ou código diferente de 200:";
/// Header of the primary success analytics stream.
pub const SUCCESS_HEADER: &str = "URLs com código 200 Sucesso:";
/// Header of the false-positive sweep's non-success stream.
pub const FP_FAILURE_HEADER: &str =
    "Falsos positivos - URLs com erro ou código diferente de 200:";
/// Header of the false-positive sweep's success stream.
pub const FP_SUCCESS_HEADER: &str = "Falsos positivos - URLs com código 200 Sucesso:";

/// Which analytics stream an outcome went to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Partition {
    Success,
    Failure,
}

impl Partition {
    pub fn of(outcome: &VerificationOutcome) -> Self {
        if outcome.status.is_success() {
            Self::Success
        } else {
            Self::Failure
        }
    }
}

/// A pair of analytics files and their header lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyticsStreams {
    pub failure_path: PathBuf,
    pub failure_header: String,
    pub success_path: PathBuf,
    pub success_header: String,
}

impl AnalyticsStreams {
    /// The primary run's streams.
    pub fn primary(failure_path: impl Into<PathBuf>, success_path: impl Into<PathBuf>) -> Self {
        Self {
            failure_path: failure_path.into(),
            failure_header: FAILURE_HEADER.to_string(),
            success_path: success_path.into(),
            success_header: SUCCESS_HEADER.to_string(),
        }
    }

    /// The false-positive sweep's streams.
    pub fn false_positive(
        failure_path: impl Into<PathBuf>,
        success_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            failure_path: failure_path.into(),
            failure_header: FP_FAILURE_HEADER.to_string(),
            success_path: success_path.into(),
            success_header: FP_SUCCESS_HEADER.to_string(),
        }
    }

    fn path_for(&self, partition: Partition) -> &Path {
        match partition {
            Partition::Success => &self.success_path,
            Partition::Failure => &self.failure_path,
        }
    }
}

/// Format one output line.
pub fn format_line(sid: &str, outcome: &VerificationOutcome) -> String {
    format!(
        "SID: {sid} - {} - Código: {}, Descrição: {}",
        outcome.url, outcome.status, outcome.description
    )
}

/// Routes outcomes to their streams and fires success hooks.
pub struct ResultRouter {
    streams: AnalyticsStreams,
    hooks: Vec<Arc<dyn SuccessHook>>,
    echo: bool,
    write_lock: Mutex<()>,
}

impl ResultRouter {
    pub fn new(streams: AnalyticsStreams) -> Self {
        Self {
            streams,
            hooks: Vec::new(),
            echo: false,
            write_lock: Mutex::new(()),
        }
    }

    /// Also print every routed line to stdout.
    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    /// Register a hook to run for success outcomes.
    pub fn with_hook(mut self, hook: Arc<dyn SuccessHook>) -> Self {
        self.hooks.push(hook);
        self
    }

    pub fn streams(&self) -> &AnalyticsStreams {
        &self.streams
    }

    /// Truncate both analytics streams and write their headers.
    pub fn reset(&self) -> Result<()> {
        let _guard = self.lock();
        for (path, header) in [
            (&self.streams.failure_path, &self.streams.failure_header),
            (&self.streams.success_path, &self.streams.success_header),
        ] {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).map_err(|e| RefcheckError::io(parent, e))?;
            }
            std::fs::write(path, format!("{header}\n")).map_err(|e| RefcheckError::io(path, e))?;
        }
        Ok(())
    }

    /// Start a rule file's result stream empty.
    pub fn begin_result_file(&self, result_path: &Path) -> Result<()> {
        let _guard = self.lock();
        std::fs::File::create(result_path).map_err(|e| RefcheckError::io(result_path, e))?;
        Ok(())
    }

    /// Write `outcome` to the result stream and its analytics stream, then
    /// run success hooks.
    pub async fn route(
        &self,
        sid: &str,
        outcome: &VerificationOutcome,
        result_path: &Path,
    ) -> Result<Partition> {
        let line = format_line(sid, outcome);
        let partition = Partition::of(outcome);

        {
            let _guard = self.lock();
            append_line(result_path, &line)?;
            append_line(self.streams.path_for(partition), &line)?;
        }

        if self.echo {
            println!("{line}");
        }

        if partition == Partition::Success {
            for hook in &self.hooks {
                if let Err(e) = hook.on_success(outcome).await {
                    tracing::warn!("{} hook failed for {}: {e:#}", hook.name(), outcome.url);
                }
            }
        }

        Ok(partition)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ()> {
        self.write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn append_line(path: &Path, line: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| RefcheckError::io(path, e))?;
    writeln!(file, "{line}").map_err(|e| RefcheckError::io(path, e))
}
