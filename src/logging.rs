// src/logging.rs
//! Diagnostics go through `tracing`; this installs the subscriber.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable holding an `EnvFilter` directive.
pub const LOG_ENV: &str = "POMGRAPH_LOG";

fn filter(verbose: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new("pomgraph_core=debug,pomgraph=debug,info")
    } else {
        EnvFilter::try_from_env(LOG_ENV)
            .unwrap_or_else(|_| EnvFilter::new("pomgraph_core=info,pomgraph=info,warn"))
    }
}

/// Installs a stderr subscriber. `verbose` overrides the environment.
/// Calling it again is a no-op.
pub fn init(verbose: bool) {
    let installed = tracing_subscriber::registry()
        .with(filter(verbose))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .try_init();
    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
