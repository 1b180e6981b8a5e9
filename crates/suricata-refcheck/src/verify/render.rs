//! Full-render strategy: navigate a headless browser to the URL.
//!
//! chromiumoxide does not expose the document's HTTP status, so a loaded
//! page is reported as `Rendered`, never as a numeric code.

use super::{Strategy, Verifier};
use crate::browser::{resolve_chromium, BrowserSession};
use crate::error::Result;
use crate::status::VerificationOutcome;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Browser-backed verifier. Launches a separate browser per URL.
pub struct RenderVerifier {
    chrome_path: PathBuf,
    timeout: Duration,
}

impl RenderVerifier {
    /// Resolve Chromium up front so a missing binary fails before any URL is checked.
    pub fn new(explicit_chromium: Option<&Path>, timeout: Duration) -> Result<Self> {
        let chrome_path = resolve_chromium(explicit_chromium)?;
        tracing::info!("render checks will use {}", chrome_path.display());
        Ok(Self {
            chrome_path,
            timeout,
        })
    }

    pub fn chrome_path(&self) -> &Path {
        &self.chrome_path
    }
}

#[async_trait]
impl Verifier for RenderVerifier {
    fn strategy(&self) -> Strategy {
        Strategy::Render
    }

    async fn verify(&self, url: &str) -> Result<VerificationOutcome> {
        let session = BrowserSession::launch(&self.chrome_path).await?;

        let outcome = match session.open(url, self.timeout).await {
            Ok(page) => {
                if let Err(e) = page.close().await {
                    tracing::debug!("closing page for {url} failed: {e}");
                }
                VerificationOutcome::rendered(url)
            }
            Err(e) => {
                let reason = format!("{e:#}");
                tracing::error!("error rendering URL: {url}, error: {reason}");
                VerificationOutcome::failed(url, reason)
            }
        };

        session.shutdown().await;
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RefcheckError;
    use crate::status::Status;

    #[test]
    fn test_missing_chromium_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let result = RenderVerifier::new(
            Some(&dir.path().join("missing-chrome")),
            Duration::from_secs(5),
        );
        assert!(matches!(result, Err(RefcheckError::Configuration(_))));
    }

    #[tokio::test]
    #[ignore] // Requires Chromium to be installed
    async fn test_render_reports_rendered_not_200() {
        let verifier = RenderVerifier::new(None, Duration::from_secs(10)).unwrap();
        let outcome = verifier
            .verify("data:text/html,<p>reference</p>")
            .await
            .unwrap();
        assert_eq!(outcome.status, Status::Rendered);
    }

    #[tokio::test]
    #[ignore] // Requires Chromium to be installed
    async fn test_render_unreachable_host() {
        let verifier = RenderVerifier::new(None, Duration::from_secs(10)).unwrap();
        let outcome = verifier
            .verify("https://refcheck-unreachable.invalid/")
            .await
            .unwrap();
        assert_eq!(outcome.status, Status::Error);
    }
}
