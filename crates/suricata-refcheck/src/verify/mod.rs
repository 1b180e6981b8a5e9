//! URL verification strategies.
//!
//! Defines the `Verifier` trait the coordinator drives, with two
//! implementations: a direct HTTP GET and a full headless-browser render.
//! One strategy is chosen per run.

pub mod http;
pub mod render;

pub use http::HttpVerifier;
pub use render::RenderVerifier;

use crate::error::Result;
use crate::status::VerificationOutcome;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which verifier a run uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Plain HTTP GET; reports real status codes.
    #[default]
    Http,
    /// Headless browser navigation; reports reachable/unreachable only.
    Render,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http => write!(f, "http"),
            Self::Render => write!(f, "render"),
        }
    }
}

/// Checks one URL and classifies it.
///
/// Per-URL failures come back as `Ok` outcomes with
/// [`Status::Error`](crate::status::Status::Error). `Err` is reserved for
/// configuration problems that make every further check pointless.
#[async_trait]
pub trait Verifier: Send + Sync {
    fn strategy(&self) -> Strategy;

    async fn verify(&self, url: &str) -> Result<VerificationOutcome>;
}
