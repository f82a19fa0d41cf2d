//! Opt-in tracing setup for hosts embedding `n3-charts`.
//!
//! Scheduler activity and debug-mode render timing (`ContextOptions::debug`)
//! are emitted through `tracing`; nothing is printed unless the host installs
//! a subscriber, either its own or one of the helpers below.

/// Default directive used when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "info";

/// Installs a compact `fmt` subscriber filtered by `RUST_LOG`, falling back to
/// [`DEFAULT_FILTER`].
///
/// Returns `false` when the `telemetry` feature is disabled or a global
/// subscriber is already installed.
#[must_use]
pub fn init_default_tracing() -> bool {
    init_tracing_with_filter(DEFAULT_FILTER)
}

/// Same as [`init_default_tracing`] with an explicit fallback directive,
/// e.g. `"n3_charts=debug"` to surface render timings.
#[must_use]
pub fn init_tracing_with_filter(fallback: &str) -> bool {
    #[cfg(feature = "telemetry")]
    {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(fallback));

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .try_init()
            .is_ok()
    }

    #[cfg(not(feature = "telemetry"))]
    {
        let _ = fallback;
        false
    }
}
