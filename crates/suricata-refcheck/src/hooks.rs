//! Post-verification hooks run for success outcomes.
//!
//! Hooks are side effects only. The router logs their failures and never
//! lets them change an outcome.

use crate::browser::{resolve_chromium, BrowserSession};
use crate::status::VerificationOutcome;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chromiumoxide::page::ScreenshotParams;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Something to do with a URL that verified successfully.
#[async_trait]
pub trait SuccessHook: Send + Sync {
    fn name(&self) -> &str;

    async fn on_success(&self, outcome: &VerificationOutcome) -> Result<()>;
}

/// Saves a full-page PNG of every successful URL.
pub struct ScreenshotHook {
    chrome_path: PathBuf,
    output_dir: PathBuf,
    timeout: Duration,
}

impl ScreenshotHook {
    pub fn new(
        output_dir: impl Into<PathBuf>,
        explicit_chromium: Option<&Path>,
        timeout: Duration,
    ) -> crate::error::Result<Self> {
        let output_dir = output_dir.into();
        std::fs::create_dir_all(&output_dir)
            .map_err(|e| crate::error::RefcheckError::io(&output_dir, e))?;
        Ok(Self {
            chrome_path: resolve_chromium(explicit_chromium)?,
            output_dir,
            timeout,
        })
    }

    /// Where the screenshot of `url` is written.
    pub fn screenshot_path(&self, url: &str) -> PathBuf {
        self.output_dir.join(format!("{}.png", screenshot_file_stem(url)))
    }
}

#[async_trait]
impl SuccessHook for ScreenshotHook {
    fn name(&self) -> &str {
        "screenshot"
    }

    async fn on_success(&self, outcome: &VerificationOutcome) -> Result<()> {
        let session = BrowserSession::launch(&self.chrome_path).await?;

        let captured = async {
            let page = session.open(&outcome.url, self.timeout).await?;
            let shot = page
                .screenshot(ScreenshotParams::builder().full_page(true).build())
                .await;
            let _ = page.close().await;
            shot.context("screenshot capture failed")
        }
        .await;

        session.shutdown().await;

        let png = captured?;
        let path = self.screenshot_path(&outcome.url);
        tokio::fs::write(&path, png)
            .await
            .with_context(|| format!("failed to write {}", path.display()))?;
        tracing::debug!("screenshot for {} saved to {}", outcome.url, path.display());
        Ok(())
    }
}

/// File-system safe name for a URL: scheme dropped, everything outside
/// `[A-Za-z0-9.-]` replaced with `_`, capped at 150 characters.
pub fn screenshot_file_stem(url: &str) -> String {
    let without_scheme = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);

    let stem: String = without_scheme
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .take(150)
        .collect();

    let stem = stem.trim_matches('_');
    if stem.is_empty() {
        "page".to_string()
    } else {
        stem.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screenshot_file_stem() {
        assert_eq!(
            screenshot_file_stem("https://example.com/path/to?q=1"),
            "example.com_path_to_q_1"
        );
        assert_eq!(screenshot_file_stem("http://a.test/"), "a.test");
        assert_eq!(screenshot_file_stem("https:///"), "page");
    }

    #[test]
    fn test_screenshot_file_stem_is_bounded() {
        let long = format!("https://example.com/{}", "a".repeat(500));
        assert_eq!(screenshot_file_stem(&long).len(), 150);
    }
}
