//! Diagnostics for the command-line tools.
//!
//! Reads `RUST_LOG` and defaults to `warn`. Output goes to stderr in compact
//! format so stdout stays clean for maze output.
//!
//! ```bash
//! RUST_LOG=maze_core=debug mazegen generate --seed 7
//! ```

use std::io;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr).compact())
        .init();
}
