// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Logging setup, adapted from the donor daemon's `setup_logging`: an
//! `EnvFilter` registry plus an `fmt` layer, writing to stderr since this is
//! a foreground tool rather than a background process with a log file.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// `verbosity` is `max(--verbosity=<n>, count of -v)`: 0 = info, 1 = debug,
/// 2+ = trace. `RUST_LOG` always wins when set.
pub fn init(verbosity: u8) {
    let default_level = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
