//! Headless Chromium sessions via chromiumoxide.
//!
//! Every session is its own browser process with its own throwaway profile
//! directory, so concurrent checks never share state.

use crate::error::{RefcheckError, Result};
use anyhow::{bail, Context};
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::page::Page;
use futures::StreamExt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;
use tokio::task::JoinHandle;

/// Environment variable pointing at an explicit Chromium binary.
pub const CHROMIUM_PATH_ENV: &str = "REFCHECK_CHROMIUM_PATH";

/// Find the Chromium binary path.
pub fn find_chromium() -> Option<PathBuf> {
    // 1. REFCHECK_CHROMIUM_PATH env
    if let Ok(p) = std::env::var(CHROMIUM_PATH_ENV) {
        let path = PathBuf::from(&p);
        if path.exists() {
            return Some(path);
        }
    }

    // 2. System PATH
    for name in ["google-chrome", "google-chrome-stable", "chromium", "chromium-browser"] {
        if let Ok(path) = which::which(name) {
            return Some(path);
        }
    }

    // 3. Chrome for Testing installs under the home directory
    if let Some(home) = dirs::home_dir() {
        let candidates = if cfg!(target_os = "macos") {
            vec![
                home.join(".cache/chromium/chrome-mac-arm64/Google Chrome for Testing.app/Contents/MacOS/Google Chrome for Testing"),
                home.join(".cache/chromium/chrome-mac-x64/Google Chrome for Testing.app/Contents/MacOS/Google Chrome for Testing"),
            ]
        } else {
            vec![home.join(".cache/chromium/chrome-linux64/chrome")]
        };
        if let Some(found) = candidates.into_iter().find(|c| c.exists()) {
            return Some(found);
        }
    }

    // 4. Common macOS location
    if cfg!(target_os = "macos") {
        let common =
            PathBuf::from("/Applications/Google Chrome.app/Contents/MacOS/Google Chrome");
        if common.exists() {
            return Some(common);
        }
    }

    None
}

/// Resolve the binary to launch, preferring an explicit path.
pub fn resolve_chromium(explicit: Option<&Path>) -> Result<PathBuf> {
    match explicit {
        Some(path) if path.exists() => Ok(path.to_path_buf()),
        Some(path) => Err(RefcheckError::Configuration(format!(
            "Chromium binary not found at {}",
            path.display()
        ))),
        None => find_chromium().ok_or_else(|| {
            RefcheckError::Configuration(format!(
                "Chromium not found. Install Chrome/Chromium or set {CHROMIUM_PATH_ENV}."
            ))
        }),
    }
}

/// One isolated headless browser process.
///
/// Call [`BrowserSession::shutdown`] when done. If the session is dropped
/// instead (early return, panic, cancelled future) the event handler task is
/// aborted and chromiumoxide kills the child process.
pub struct BrowserSession {
    browser: Browser,
    handler: JoinHandle<()>,
    _profile: TempDir,
}

impl BrowserSession {
    /// Launch a new headless Chromium.
    ///
    /// Launch failures are configuration errors: if the browser cannot start,
    /// no render check can succeed.
    pub async fn launch(chrome_path: &Path) -> Result<Self> {
        let profile = tempfile::Builder::new()
            .prefix("refcheck-chromium-")
            .tempdir()
            .map_err(|e| RefcheckError::io(std::env::temp_dir(), e))?;

        let config = BrowserConfig::builder()
            .chrome_executable(chrome_path)
            .user_data_dir(profile.path())
            .arg("--headless=new")
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions")
            .arg("--disable-background-networking")
            .build()
            .map_err(|e| {
                RefcheckError::Configuration(format!("failed to build browser config: {e}"))
            })?;

        let (browser, mut handler) = Browser::launch(config).await.map_err(|e| {
            RefcheckError::Configuration(format!(
                "failed to launch Chromium at {}: {e}",
                chrome_path.display()
            ))
        })?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                let _ = event;
            }
        });

        Ok(Self {
            browser,
            handler,
            _profile: profile,
        })
    }

    /// Open a tab and navigate it to `url` within `timeout`.
    ///
    /// On failure the tab is closed before returning.
    pub async fn open(&self, url: &str, timeout: Duration) -> anyhow::Result<Page> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .context("failed to create new page")?;

        let navigation = tokio::time::timeout(timeout, page.goto(url))
            .await
            .map(|r| r.map(|_| ()));

        match navigation {
            Ok(Ok(())) => Ok(page),
            Ok(Err(e)) => {
                let _ = page.close().await;
                bail!("navigation failed: {e}")
            }
            Err(_) => {
                let _ = page.close().await;
                bail!("navigation timed out after {}s", timeout.as_secs())
            }
        }
    }

    /// Close the browser and wait for the process to exit.
    pub async fn shutdown(mut self) {
        if let Err(e) = self.browser.close().await {
            tracing::debug!("browser close failed: {e}");
        }
        if let Err(e) = self.browser.wait().await {
            tracing::debug!("waiting for browser exit failed: {e}");
        }
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        self.handler.abort();
    }
}
