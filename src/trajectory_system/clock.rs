use crate::constants::{DEFAULT_SAMPLE_INTERVAL, TELEMETRY_CAPACITY};
use crate::errors::SimulationError;

/// Fixed sample interval shared by the whole run, together with the number
/// of ticks the telemetry buffer is provisioned for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationClock {
    sample_interval: f64,
    capacity: usize,
}

impl SimulationClock {
    pub fn new(sample_interval: f64, capacity: usize) -> Result<Self, SimulationError> {
        if !sample_interval.is_finite() || sample_interval <= 0.0 {
            return Err(SimulationError::ConfigurationError(format!(
                "sample interval must be a positive number of seconds, got {}",
                sample_interval
            )));
        }
        if capacity == 0 {
            return Err(SimulationError::ConfigurationError(
                "telemetry capacity must hold at least one sample".to_string(),
            ));
        }
        Ok(SimulationClock {
            sample_interval,
            capacity,
        })
    }

    /// Provisions capacity for `max_duration` seconds at this sample rate,
    /// never more than `TELEMETRY_CAPACITY` ticks.
    pub fn sized_for(sample_interval: f64, max_duration: f64) -> Result<Self, SimulationError> {
        if !max_duration.is_finite() || max_duration <= 0.0 {
            return Err(SimulationError::ConfigurationError(format!(
                "maximum landing duration must be positive, got {}",
                max_duration
            )));
        }
        let ticks = (max_duration / sample_interval).ceil();
        if !ticks.is_finite() || ticks > usize::MAX as f64 {
            return Err(SimulationError::ConfigurationError(format!(
                "cannot provision {} s at a {} s sample interval",
                max_duration, sample_interval
            )));
        }
        Self::new(sample_interval, ticks.min(TELEMETRY_CAPACITY as f64) as usize)
    }

    pub fn sample_interval(&self) -> f64 {
        self.sample_interval
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Elapsed time at the end of `tick`. Computed from the tick count so
    /// that long runs do not accumulate rounding drift.
    pub fn elapsed(&self, tick: usize) -> f64 {
        tick as f64 * self.sample_interval
    }
}

impl Default for SimulationClock {
    fn default() -> Self {
        SimulationClock {
            sample_interval: DEFAULT_SAMPLE_INTERVAL,
            capacity: TELEMETRY_CAPACITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::MAX_LANDING_DURATION;

    #[test]
    fn test_default_clock_covers_thirty_minutes_at_ten_hertz() {
        let clock = SimulationClock::default();
        assert_eq!(clock.sample_interval(), 0.1);
        assert_eq!(clock.capacity(), 18_000);

        let sized = SimulationClock::sized_for(0.1, MAX_LANDING_DURATION).unwrap();
        assert_eq!(sized.capacity(), 18_000);
    }

    #[test]
    fn test_sized_for_is_capped() {
        let clock = SimulationClock::sized_for(1e-9, MAX_LANDING_DURATION).unwrap();
        assert_eq!(clock.capacity(), TELEMETRY_CAPACITY);

        let short = SimulationClock::sized_for(0.1, 60.0).unwrap();
        assert_eq!(short.capacity(), 600);
    }

    #[test]
    fn test_elapsed_time_does_not_drift() {
        let clock = SimulationClock::default();
        assert_eq!(clock.elapsed(0), 0.0);
        assert_eq!(clock.elapsed(300), 30.0);
        assert_eq!(clock.elapsed(350), 35.0);
    }

    #[test]
    fn test_invalid_sample_interval_is_rejected() {
        for dt in [0.0, -0.1, f64::NAN, f64::INFINITY] {
            assert!(
                matches!(
                    SimulationClock::new(dt, 100),
                    Err(SimulationError::ConfigurationError(_))
                ),
                "sample interval {} should be rejected",
                dt
            );
        }
    }

    #[test]
    fn test_zero_capacity_is_rejected() {
        assert!(matches!(
            SimulationClock::new(0.1, 0),
            Err(SimulationError::ConfigurationError(_))
        ));
    }
}
