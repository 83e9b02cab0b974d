use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum SimulationError {
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Dimension mismatch: {0}")]
    DimensionMismatch(String),

    #[error("Capacity exceeded: tick {tick} does not fit a telemetry capacity of {capacity} samples")]
    CapacityExceeded { tick: usize, capacity: usize },

    #[error("Numerical error: {0}")]
    NumericalError(String),
}

/// Rejects NaN and infinite values produced by a derivation or an update.
pub(crate) fn ensure_finite(name: &str, value: f64) -> Result<f64, SimulationError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(SimulationError::NumericalError(format!(
            "{} evaluated to {}",
            name, value
        )))
    }
}
