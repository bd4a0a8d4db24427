// src/config/validate.rs

use crate::config::model::{RawSimulationOptions, SimulationOptions};
use crate::errors::{LoadcastError, Result};

impl TryFrom<RawSimulationOptions> for SimulationOptions {
    type Error = LoadcastError;

    fn try_from(raw: RawSimulationOptions) -> std::result::Result<Self, Self::Error> {
        validate_raw_options(&raw)?;
        Ok(SimulationOptions::new_unchecked(raw))
    }
}

fn validate_raw_options(raw: &RawSimulationOptions) -> Result<()> {
    ensure_finite_positive("rtt_ms", raw.rtt_ms)?;
    ensure_finite_positive("throughput_bps", raw.throughput_bps)?;
    ensure_finite_non_negative("default_response_time_ms", raw.default_response_time_ms)?;
    ensure_nonzero_concurrency(raw)?;
    Ok(())
}

fn ensure_finite_positive(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(LoadcastError::ConfigError(format!(
            "{} must be a finite positive number (got {})",
            field, value
        )));
    }
    Ok(())
}

fn ensure_finite_non_negative(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(LoadcastError::ConfigError(format!(
            "{} must be a finite non-negative number (got {})",
            field, value
        )));
    }
    Ok(())
}

fn ensure_nonzero_concurrency(raw: &RawSimulationOptions) -> Result<()> {
    if raw.maximum_concurrent_requests == 0 {
        return Err(LoadcastError::ConfigError(
            "maximum_concurrent_requests must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}
