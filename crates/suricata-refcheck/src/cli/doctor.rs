//! Environment readiness check.

use crate::browser::{find_chromium, CHROMIUM_PATH_ENV};
use crate::cli::output::{self, OutputMode};
use crate::config::CheckerConfig;
use crate::coordinator::list_rule_files;
use anyhow::Result;
use serde_json::json;

/// Check Chromium availability and the configured input/ledger paths.
pub async fn run(mode: OutputMode) -> Result<()> {
    let config = CheckerConfig::from_env();
    let chromium = config.chromium_path.clone().or_else(find_chromium);
    let rule_files = list_rule_files(&config.rules_dir).ok().map(|f| f.len());
    let ledger_entries = std::fs::read_to_string(&config.ledger_path)
        .ok()
        .map(|s| s.lines().filter(|l| !l.trim().is_empty()).count());

    if mode.json {
        output::print_json(&json!({
            "os": std::env::consts::OS,
            "arch": std::env::consts::ARCH,
            "chromium": chromium.as_ref().map(|p| p.display().to_string()),
            "rules_dir": config.rules_dir.display().to_string(),
            "rule_files": rule_files,
            "ledger": config.ledger_path.display().to_string(),
            "ledger_entries": ledger_entries,
            "render_ready": chromium.is_some(),
        }));
        return Ok(());
    }

    println!("refcheck doctor");
    println!("===============");
    println!();
    println!("OS:   {}", std::env::consts::OS);
    println!("Arch: {}", std::env::consts::ARCH);
    println!();

    match &chromium {
        Some(path) => println!("{} Chromium found: {}", output::ok_sym(), path.display()),
        None => println!(
            "{} Chromium NOT found. Install Chrome/Chromium or set {CHROMIUM_PATH_ENV}.",
            output::fail_sym()
        ),
    }

    match rule_files {
        Some(0) => println!(
            "{} No .rules files in {}",
            output::fail_sym(),
            config.rules_dir.display()
        ),
        Some(n) => println!(
            "{} {n} rule file(s) in {}",
            output::ok_sym(),
            config.rules_dir.display()
        ),
        None => println!(
            "{} Rules directory {} is not readable",
            output::fail_sym(),
            config.rules_dir.display()
        ),
    }

    match ledger_entries {
        Some(n) => println!(
            "{} Ledger {} holds {n} processed URL(s)",
            output::ok_sym(),
            config.ledger_path.display()
        ),
        None => println!(
            "{} Ledger {} does not exist yet (fresh run)",
            output::ok_sym(),
            config.ledger_path.display()
        ),
    }

    println!();
    println!("HTTP checks:   READY");
    if chromium.is_some() {
        println!("Render checks: READY");
    } else {
        println!("Render checks: NOT READY");
    }

    Ok(())
}
