//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is unset.
pub fn default_directives(verbose: bool, quiet: bool) -> &'static str {
    if verbose {
        "vitrine=debug,vitrine_runtime=debug,vitrine_catalog=debug"
    } else if quiet {
        "vitrine=warn,vitrine_runtime=warn,vitrine_catalog=warn"
    } else {
        "vitrine=info,vitrine_runtime=info,vitrine_catalog=info"
    }
}

/// Install the global subscriber. Logs go to stderr so stdout stays
/// usable for command output.
pub fn init(verbose: bool, quiet: bool, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose, quiet)));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let result = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    if let Err(e) = result {
        eprintln!("  Warning: logging already initialised: {e}");
    }
}
