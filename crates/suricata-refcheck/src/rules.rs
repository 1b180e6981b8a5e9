//! Rule extractor. Pulls `(sid, reference url)` pairs out of rule text.
//!
//! Only two tokens matter: `sid:<digits>;` and `reference:url,<value>;`.
//! Everything else on the line is ignored, and lines carrying only one of
//! the two produce nothing.

use crate::error::{RefcheckError, Result};
use regex::Regex;
use std::path::Path;

/// Scheme prepended to every extracted reference value.
pub const URL_SCHEME_PREFIX: &str = "https://";

/// File extension of rule files.
pub const RULES_EXTENSION: &str = "rules";

/// One signature's reference URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleRecord {
    pub sid: String,
    /// Fully-qualified URL (scheme already prepended).
    pub url: String,
}

/// Compiled token patterns. Build once and share.
#[derive(Debug, Clone)]
pub struct RuleExtractor {
    url_re: Regex,
    sid_re: Regex,
}

impl RuleExtractor {
    pub fn new() -> Self {
        Self {
            url_re: Regex::new(r"reference:url,([^;]+);").expect("reference regex is valid"),
            sid_re: Regex::new(r"sid:(\d+);").expect("sid regex is valid"),
        }
    }

    /// Extract a record from one line. Uses the first match of each token.
    pub fn extract_line(&self, line: &str) -> Option<RuleRecord> {
        let url = self.url_re.captures(line)?.get(1)?.as_str().trim();
        let sid = self.sid_re.captures(line)?.get(1)?.as_str();

        Some(RuleRecord {
            sid: sid.to_string(),
            url: format!("{URL_SCHEME_PREFIX}{url}"),
        })
    }

    /// Extract records from every line of a rule file's contents, in order.
    pub fn extract_text(&self, text: &str) -> Vec<RuleRecord> {
        text.lines()
            .filter_map(|line| self.extract_line(line))
            .collect()
    }

    /// Read a rule file and extract its records.
    ///
    /// Invalid UTF-8 is replaced rather than rejected; rule bundles are not
    /// always clean.
    pub fn extract_file(&self, path: &Path) -> Result<Vec<RuleRecord>> {
        let bytes = std::fs::read(path).map_err(|e| RefcheckError::io(path, e))?;
        Ok(self.extract_text(&String::from_utf8_lossy(&bytes)))
    }
}

impl Default for RuleExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether `path` names a rule file (`*.rules`).
pub fn is_rules_file(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some(RULES_EXTENSION)
}
