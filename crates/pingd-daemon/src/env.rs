// SPDX-License-Identifier: MIT

//! Centralized tuning constants and environment-variable overrides.

use std::time::Duration;

/// Cadence of the UNTESTED bucket's ticker: newly added hosts get one
/// initial probe, then are routed into ACTIVE or DEFUNCT.
pub const UNTESTED_TICK: Duration = Duration::from_millis(30_011);

/// Cadence of the ACTIVE bucket's ticker: frequent probing and failure
/// escalation for everything that isn't DEFUNCT.
pub const ACTIVE_TICK: Duration = Duration::from_millis(5_003);

/// Reference cadence of the DEFUNCT bucket's ticker: a prime comfortably
/// above five hours, chosen (along with the other two periods) to avoid
/// beat patterns between tickers.
pub const DEFUNCT_TICK_REFERENCE: Duration = Duration::from_millis(18_000_041);

/// Probe timeout applied to every bucket's batch, derived from the ACTIVE
/// period regardless of which bucket is sending — including DEFUNCT's own
/// batch. Kept exactly as observed rather than given each bucket its own
/// timeout derivation.
pub fn probe_timeout() -> Duration {
    Duration::from_millis((ACTIVE_TICK.as_millis() as f64 * 0.8) as u64)
}

/// DEFUNCT tick cadence actually used at runtime. Overridable with
/// `PINGD_DEFUNCT_TICK_MS` because the reference ~5 hour period is rarely
/// what an operator wants for dead-host recovery checks, and CLI flag
/// `--defunct-tick-ms` takes precedence over the environment variable.
pub fn defunct_tick(cli_override: Option<u64>) -> Duration {
    if let Some(ms) = cli_override {
        return Duration::from_millis(ms);
    }
    std::env::var("PINGD_DEFUNCT_TICK_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(DEFUNCT_TICK_REFERENCE)
}
