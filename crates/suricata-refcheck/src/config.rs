//! Run configuration.
//!
//! Built once at startup from CLI flags, `REFCHECK_*` environment variables
//! and defaults (in that order of precedence), then shared read-only.

use crate::error::{RefcheckError, Result};
use crate::verify::Strategy;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_RULES_DIR: &str = "rules";
pub const DEFAULT_OUTPUT_DIR: &str = "result";
pub const DEFAULT_FAILURE_ANALYTICS: &str = "Analytics.txt";
pub const DEFAULT_SUCCESS_ANALYTICS: &str = "Analytics_200.txt";
pub const DEFAULT_FP_FAILURE_ANALYTICS: &str = "Analytics_FP.txt";
pub const DEFAULT_FP_SUCCESS_ANALYTICS: &str = "Analytics_FP_200.txt";
pub const DEFAULT_LEDGER: &str = "processed_urls.txt";
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_CONCURRENCY: usize = 1;
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) \
                                      AppleWebKit/537.36 (KHTML, like Gecko) \
                                      Chrome/131.0.0.0 Safari/537.36";

/// Prefix of per-rule-file result streams.
pub const RESULT_FILE_PREFIX: &str = "result_";

/// Everything a run needs to know. Immutable after construction.
#[derive(Debug, Clone)]
pub struct CheckerConfig {
    /// Directory of `.rules` files to verify.
    pub rules_dir: PathBuf,
    /// Rule files for the false-positive sweep; `None` disables the sweep.
    pub navigate_dir: Option<PathBuf>,
    /// Where per-file result streams go.
    pub output_dir: PathBuf,
    pub failure_analytics: PathBuf,
    pub success_analytics: PathBuf,
    pub fp_failure_analytics: PathBuf,
    pub fp_success_analytics: PathBuf,
    pub ledger_path: PathBuf,
    pub strategy: Strategy,
    /// Per-URL bound for both strategies.
    pub timeout: Duration,
    /// Maximum verifications in flight at once.
    pub concurrency: usize,
    /// Print every result line to stdout.
    pub echo: bool,
    /// Archive and reset the ledger at the end of the run.
    pub archive_ledger: bool,
    /// Save screenshots of successful URLs here.
    pub screenshot_dir: Option<PathBuf>,
    /// Explicit Chromium binary; discovered when `None`.
    pub chromium_path: Option<PathBuf>,
    pub user_agent: String,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            rules_dir: PathBuf::from(DEFAULT_RULES_DIR),
            navigate_dir: None,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            failure_analytics: PathBuf::from(DEFAULT_FAILURE_ANALYTICS),
            success_analytics: PathBuf::from(DEFAULT_SUCCESS_ANALYTICS),
            fp_failure_analytics: PathBuf::from(DEFAULT_FP_FAILURE_ANALYTICS),
            fp_success_analytics: PathBuf::from(DEFAULT_FP_SUCCESS_ANALYTICS),
            ledger_path: PathBuf::from(DEFAULT_LEDGER),
            strategy: Strategy::Http,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            concurrency: DEFAULT_CONCURRENCY,
            echo: false,
            archive_ledger: true,
            screenshot_dir: None,
            chromium_path: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl CheckerConfig {
    /// Defaults overlaid with `REFCHECK_*` environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            rules_dir: read_env_path("REFCHECK_RULES_DIR").unwrap_or(defaults.rules_dir),
            output_dir: read_env_path("REFCHECK_OUTPUT_DIR").unwrap_or(defaults.output_dir),
            ledger_path: read_env_path("REFCHECK_LEDGER").unwrap_or(defaults.ledger_path),
            timeout: Duration::from_secs(
                read_env_u64("REFCHECK_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS).max(1),
            ),
            concurrency: read_env_usize("REFCHECK_CONCURRENCY", DEFAULT_CONCURRENCY).max(1),
            chromium_path: read_env_path(crate::browser::CHROMIUM_PATH_ENV),
            user_agent: read_env_string("REFCHECK_USER_AGENT").unwrap_or(defaults.user_agent),
            ..defaults
        }
    }

    /// Reject settings no run could work with.
    pub fn validate(&self) -> Result<()> {
        if self.concurrency == 0 {
            return Err(RefcheckError::Configuration(
                "concurrency must be at least 1".to_string(),
            ));
        }
        if self.timeout.is_zero() {
            return Err(RefcheckError::Configuration(
                "timeout must be greater than zero".to_string(),
            ));
        }
        if self.navigate_dir.as_ref() == Some(&self.rules_dir) {
            return Err(RefcheckError::Configuration(
                "navigate directory must differ from the rules directory".to_string(),
            ));
        }
        Ok(())
    }

    /// Result stream path for a rule file name.
    pub fn result_path(&self, rule_file_name: &str) -> PathBuf {
        self.output_dir
            .join(format!("{RESULT_FILE_PREFIX}{rule_file_name}.txt"))
    }
}

fn read_env_u64(name: &str, default_value: u64) -> u64 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default_value)
}

fn read_env_usize(name: &str, default_value: usize) -> usize {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(default_value)
}

fn read_env_string(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn read_env_path(name: &str) -> Option<PathBuf> {
    read_env_string(name).map(PathBuf::from)
}
