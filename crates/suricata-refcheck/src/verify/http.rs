//! Lightweight strategy: one HTTP GET per URL.
//!
//! No retries, no body reads. Transport failures (DNS, refused connection,
//! TLS, timeout) become `Erro` outcomes carrying the error text.

use super::{Strategy, Verifier};
use crate::error::{error_chain, RefcheckError, Result};
use crate::status::VerificationOutcome;
use async_trait::async_trait;
use std::time::Duration;

/// Redirect hops followed before giving up.
pub const MAX_REDIRECTS: usize = 10;

/// HTTP GET verifier wrapping reqwest.
#[derive(Clone)]
pub struct HttpVerifier {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpVerifier {
    /// Build a verifier with the given per-request timeout and user agent.
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .user_agent(user_agent)
            .build()
            .map_err(|e| {
                RefcheckError::Configuration(format!("failed to build HTTP client: {e}"))
            })?;

        Ok(Self { client, timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl Verifier for HttpVerifier {
    fn strategy(&self) -> Strategy {
        Strategy::Http
    }

    async fn verify(&self, url: &str) -> Result<VerificationOutcome> {
        let outcome = match self.client.get(url).send().await {
            // The response is dropped unread, which releases the connection.
            Ok(resp) => VerificationOutcome::http(url, resp.status().as_u16()),
            Err(e) => {
                let reason = error_chain(&e);
                tracing::error!("error accessing URL: {url}, error: {reason}");
                VerificationOutcome::failed(url, reason)
            }
        };
        Ok(outcome)
    }
}
