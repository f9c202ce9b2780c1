//! Logging setup shared by the emuview binaries and tests.
//!
//! - [`LogArgs`] and [`compute_spec`]: command-line log level flags and the filter they select
//! - [`fmt`]: logfmt rendering of tracing events
//! - [`buffer`]: a layer keeping the most recent events in memory

use std::env;

use clap::Args;
use tracing_subscriber::EnvFilter;

pub mod buffer;
pub mod fmt;

/// Logging controls for CLI apps.
#[derive(Debug, Clone, Default, Args)]
pub struct LogArgs {
    /// Set global log level to trace (our crates only)
    #[arg(long, conflicts_with_all = ["debug", "log_level", "log_filter"])]
    pub trace: bool,

    /// Set global log level to debug (our crates only)
    #[arg(long, conflicts_with_all = ["trace", "log_level", "log_filter"])]
    pub debug: bool,

    /// Set a single global log level for our crates (error|warn|info|debug|trace)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Set an explicit tracing filter directive (overrides other flags)
    /// e.g. "actions=trace,emuview_engine=debug"
    #[arg(long)]
    pub log_filter: Option<String>,
}

impl LogArgs {
    /// The filter spec these flags select.
    pub fn spec(&self) -> String {
        compute_spec(
            self.trace,
            self.debug,
            self.log_level.as_deref(),
            self.log_filter.as_deref(),
        )
    }
}

/// Tracing targets of this workspace's crates.
pub fn our_crates() -> &'static [&'static str] {
    &[
        // Front end
        "emuview",
        "emuview_engine",
        // Core model
        "actions",
        "hotkey",
        // Utilities
        "config",
        "logging",
    ]
}

/// Directive string giving every workspace crate the same `level`.
pub fn level_spec_for(level: &str) -> String {
    let level = level.to_ascii_lowercase();
    our_crates()
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// The effective filter spec. An explicit `log_filter` wins, then `trace`, `debug` and
/// `log_level` (scoped to our crates), then `RUST_LOG`, then crate-scoped `info`.
pub fn compute_spec(
    trace: bool,
    debug: bool,
    log_level: Option<&str>,
    log_filter: Option<&str>,
) -> String {
    if let Some(spec) = log_filter {
        return spec.to_string();
    }
    let level = match (trace, debug) {
        (true, _) => Some("trace"),
        (false, true) => Some("debug"),
        (false, false) => log_level,
    };
    match level {
        Some(level) => level_spec_for(level),
        None => env::var("RUST_LOG").unwrap_or_else(|_| level_spec_for("info")),
    }
}

/// Create an `EnvFilter` from a spec string.
pub fn env_filter_from_spec(spec: &str) -> EnvFilter {
    EnvFilter::new(spec)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_flags_take_precedence() {
        assert_eq!(
            compute_spec(true, false, Some("warn"), Some("actions=trace")),
            "actions=trace"
        );
        assert!(compute_spec(true, false, None, None).contains("actions=trace"));
        assert!(compute_spec(false, true, None, None).contains("emuview_engine=debug"));
        assert!(compute_spec(false, false, Some("WARN"), None).contains("config=warn"));
    }

    #[test]
    fn level_spec_covers_every_crate() {
        let spec = level_spec_for("info");
        for c in our_crates() {
            assert!(spec.contains(&format!("{c}=info")), "{c}");
        }
    }
}
