//! Tracing subscriber setup shared by the binaries

use tracing_subscriber::EnvFilter;

/// Install a stderr `fmt` subscriber
///
/// `RUST_LOG` wins when set; otherwise the crate logs at `debug` with
/// `verbose` and at `warn` without.
pub fn init(verbose: bool) {
    let default_filter = if verbose {
        "royalbit_nlformula=debug,nlformula=debug"
    } else {
        "royalbit_nlformula=warn,nlformula=warn"
    };

    // A second call (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
