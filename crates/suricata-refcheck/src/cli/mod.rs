//! CLI subcommand implementations for the `refcheck` binary.

pub mod check;
pub mod doctor;
pub mod output;

/// Initialize tracing for the binary.
///
/// `RUST_LOG` wins when set; otherwise `--verbose` selects debug and
/// `--quiet` keeps only warnings.
pub fn init_tracing(verbose: bool, quiet: bool) {
    let level = if verbose {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(format!("suricata_refcheck={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
