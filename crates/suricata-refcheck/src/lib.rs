// Copyright 2026 suricata-refcheck contributors
// SPDX-License-Identifier: Apache-2.0

//! Reference URL checker for Suricata rule files.
//!
//! Extracts `reference:url` values from signatures, verifies each URL once
//! per ledger lifetime, and partitions the outcomes into success and
//! non-success analytics files.

pub mod browser;
pub mod cli;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod hooks;
pub mod ledger;
pub mod router;
pub mod rules;
pub mod status;
pub mod verify;

pub use config::CheckerConfig;
pub use coordinator::{RunCoordinator, RunReport, RunStatus};
pub use error::{RefcheckError, Result};
pub use status::{Status, VerificationOutcome};
