// src/telemetry.rs
//! Tracing subscriber setup.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::{LogConfig, LogFormat};

/// Install the global subscriber. `RUST_LOG` wins over `cfg.level`.
///
/// Uses `try_init`: when the host runtime (Shuttle) already installed a
/// subscriber this is a no-op and returns `false`.
pub fn init(cfg: &LogConfig, to_stderr: bool) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cfg.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter);
    let installed = match (cfg.format, to_stderr) {
        (LogFormat::Json, true) => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        (LogFormat::Json, false) => registry.with(fmt::layer().json()).try_init(),
        (LogFormat::Compact, true) => registry
            .with(fmt::layer().compact().with_ansi(false).with_writer(std::io::stderr))
            .try_init(),
        (LogFormat::Compact, false) => registry.with(fmt::layer().compact()).try_init(),
    };
    installed.is_ok()
}
