// src/config/model.rs

use serde::Deserialize;

/// Network profile and browser limits for a simulation, as read from a TOML
/// preset file:
///
/// ```toml
/// rtt_ms = 150.0
/// throughput_bps = 1638400.0
/// default_response_time_ms = 30.0
/// maximum_concurrent_requests = 10
/// ```
///
/// All fields are optional and default to a throttled 3G-class profile.
/// This type is the raw deserialisation target; use
/// [`SimulationOptions::try_from`] (or [`crate::config::load_and_validate`])
/// to obtain a validated value.
#[derive(Debug, Clone, Deserialize)]
pub struct RawSimulationOptions {
    /// Round-trip time of the simulated link, in milliseconds.
    #[serde(default = "default_rtt_ms")]
    pub rtt_ms: f64,

    /// Total downlink throughput, in bits per second.
    #[serde(default = "default_throughput_bps")]
    pub throughput_bps: f64,

    /// Server response time substituted for records that did not capture a
    /// finite value, in milliseconds.
    #[serde(default = "default_response_time_ms")]
    pub default_response_time_ms: f64,

    /// Browser-wide cap on simultaneously in-flight requests.
    #[serde(default = "default_maximum_concurrent_requests")]
    pub maximum_concurrent_requests: usize,
}

fn default_rtt_ms() -> f64 {
    150.0
}

fn default_throughput_bps() -> f64 {
    // 1.6 Mbps
    1_600.0 * 1_024.0
}

fn default_response_time_ms() -> f64 {
    30.0
}

fn default_maximum_concurrent_requests() -> usize {
    10
}

impl Default for RawSimulationOptions {
    fn default() -> Self {
        Self {
            rtt_ms: default_rtt_ms(),
            throughput_bps: default_throughput_bps(),
            default_response_time_ms: default_response_time_ms(),
            maximum_concurrent_requests: default_maximum_concurrent_requests(),
        }
    }
}

/// Validated simulation options.
///
/// Construct via [`Default`], [`TryFrom<RawSimulationOptions>`] or the
/// loader in [`crate::config::loader`].
#[derive(Debug, Clone)]
pub struct SimulationOptions {
    pub rtt_ms: f64,
    pub throughput_bps: f64,
    pub default_response_time_ms: f64,
    pub maximum_concurrent_requests: usize,
}

impl SimulationOptions {
    /// Build directly from a raw value that is already known to be valid.
    pub(crate) fn new_unchecked(raw: RawSimulationOptions) -> Self {
        Self {
            rtt_ms: raw.rtt_ms,
            throughput_bps: raw.throughput_bps,
            default_response_time_ms: raw.default_response_time_ms,
            maximum_concurrent_requests: raw.maximum_concurrent_requests,
        }
    }
}

impl Default for SimulationOptions {
    fn default() -> Self {
        Self::new_unchecked(RawSimulationOptions::default())
    }
}
