// src/config/loader.rs

use std::path::Path;

use crate::config::model::{RawSimulationOptions, SimulationOptions};
use crate::errors::Result;

/// Load a network-profile file from a given path and return the raw
/// `RawSimulationOptions`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation (positive rtt, nonzero concurrency, etc.). Use
/// [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawSimulationOptions> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)?;

    let raw: RawSimulationOptions = toml::from_str(&contents)?;

    Ok(raw)
}

/// Load a network-profile file from path and run basic validation.
///
/// This is the recommended entry point for embedders that keep throttling
/// presets in files:
///
/// - Reads TOML.
/// - Applies defaults (handled by `serde` + `Default` impls).
/// - Checks for finite positive rtt and throughput, a non-negative default
///   response time and a nonzero concurrency limit.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<SimulationOptions> {
    let raw = load_from_path(&path)?;
    let options = SimulationOptions::try_from(raw)?;
    Ok(options)
}
