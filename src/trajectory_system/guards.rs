use tracing::debug;

use crate::control::landing_phase::LandingPhase;
use crate::control::profile::LandingProfile;
use crate::errors::{ensure_finite, SimulationError};

/// Phase durations derived in closed form before stepping begins.
///
/// Phase *k* is active while elapsed time is below the sum of the first
/// *k* durations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseGuards {
    pub transition: f64,
    pub hover: f64,
    pub cruise: f64,
    pub terminal_descent: f64,
    /// Vertical distance covered while the descent rate builds up.
    pub hover_distance: f64,
    /// Rate change implied by the terminal phase's time/altitude budget.
    pub descent_deceleration: f64,
}

impl PhaseGuards {
    pub fn derive(profile: &LandingProfile) -> Result<Self, SimulationError> {
        let transition = &profile.transition;
        let hover = &profile.hover;
        let descent = &profile.descent;

        require_nonzero("transition deceleration", transition.deceleration)?;
        require_nonzero("hover acceleration", hover.acceleration)?;
        require_nonzero("hover final velocity", hover.final_velocity)?;
        if descent.target_altitude < 0.0 {
            return Err(SimulationError::ConfigurationError(format!(
                "descent target altitude must not be negative, got {}",
                descent.target_altitude
            )));
        }

        // t = (v - u) / a
        let transition_time = ensure_finite(
            "transition guard",
            ((transition.final_velocity - transition.initial_velocity) / transition.deceleration)
                .abs(),
        )?;

        // t = (v - u) / a, s = ut + at²/2
        let hover_time = ensure_finite(
            "hover guard",
            ((hover.final_velocity - hover.initial_velocity) / hover.acceleration).abs(),
        )?;
        let hover_distance = ensure_finite(
            "hover distance",
            hover.initial_velocity * hover_time + 0.5 * hover.acceleration * hover_time.powi(2),
        )?;

        // t = remaining distance / constant rate
        let cruise_time = ensure_finite(
            "cruise guard",
            (transition.cruise_altitude - hover_distance - descent.target_altitude)
                / hover.final_velocity,
        )?;
        if cruise_time < 0.0 {
            return Err(SimulationError::ConfigurationError(format!(
                "cruise altitude {} cannot accommodate {:.3} m of hover descent and a {} m terminal descent \
                 (cruise guard {:.3} s)",
                transition.cruise_altitude, hover_distance, descent.target_altitude, cruise_time
            )));
        }

        // t = 2s / (u + v)
        let rate_sum = hover.final_velocity + descent.final_velocity;
        if rate_sum <= 0.0 {
            return Err(SimulationError::ConfigurationError(format!(
                "terminal descent needs a positive entry + exit velocity sum, got {}",
                rate_sum
            )));
        }
        let terminal_time = ensure_finite(
            "terminal descent guard",
            2.0 * descent.target_altitude / rate_sum,
        )?;
        let descent_deceleration = if terminal_time > 0.0 {
            ensure_finite(
                "terminal descent deceleration",
                (descent.final_velocity - hover.final_velocity) / terminal_time,
            )?
        } else {
            0.0
        };

        let guards = PhaseGuards {
            transition: transition_time,
            hover: hover_time,
            cruise: cruise_time,
            terminal_descent: terminal_time,
            hover_distance,
            descent_deceleration,
        };
        ensure_finite("total landing duration", guards.total())?;

        debug!(
            transition = guards.transition,
            hover = guards.hover,
            cruise = guards.cruise,
            terminal_descent = guards.terminal_descent,
            descent_deceleration = guards.descent_deceleration,
            "derived phase guards"
        );
        Ok(guards)
    }

    pub fn duration(&self, phase: LandingPhase) -> f64 {
        match phase {
            LandingPhase::Transition => self.transition,
            LandingPhase::Hover => self.hover,
            LandingPhase::Cruise => self.cruise,
            LandingPhase::TerminalDescent => self.terminal_descent,
            LandingPhase::Landed => f64::INFINITY,
        }
    }

    /// Cumulative elapsed time at which `phase` ends.
    pub fn boundary(&self, phase: LandingPhase) -> f64 {
        match phase {
            LandingPhase::Transition => self.transition,
            LandingPhase::Hover => self.transition + self.hover,
            LandingPhase::Cruise => self.transition + self.hover + self.cruise,
            LandingPhase::TerminalDescent => self.total(),
            LandingPhase::Landed => f64::INFINITY,
        }
    }

    /// Cumulative elapsed time at which `phase` begins.
    pub fn start(&self, phase: LandingPhase) -> f64 {
        match phase {
            LandingPhase::Transition => 0.0,
            LandingPhase::Hover => self.boundary(LandingPhase::Transition),
            LandingPhase::Cruise => self.boundary(LandingPhase::Hover),
            LandingPhase::TerminalDescent => self.boundary(LandingPhase::Cruise),
            LandingPhase::Landed => self.total(),
        }
    }

    /// Total duration of the landing sequence.
    pub fn total(&self) -> f64 {
        self.transition + self.hover + self.cruise + self.terminal_descent
    }
}

fn require_nonzero(name: &str, value: f64) -> Result<(), SimulationError> {
    if value == 0.0 {
        Err(SimulationError::ConfigurationError(format!(
            "{} must be non-zero",
            name
        )))
    } else if !value.is_finite() {
        Err(SimulationError::NumericalError(format!(
            "{} evaluated to {}",
            name, value
        )))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::profile::{DescentPhase, HoverPhase, LandingProfile, TransitionPhase};
    use approx::assert_relative_eq;

    #[test]
    fn test_reference_profile_guards() {
        let guards = PhaseGuards::derive(&LandingProfile::default()).unwrap();

        assert_relative_eq!(guards.transition, 30.0);
        assert_relative_eq!(guards.hover, 5.0);
        assert_relative_eq!(guards.hover_distance, 25.0);
        assert_relative_eq!(guards.cruise, 92.5);
        assert_relative_eq!(guards.terminal_descent, 100.0 / 10.5, epsilon = 1e-12);
        assert_relative_eq!(guards.descent_deceleration, -9.5 * 10.5 / 100.0, epsilon = 1e-12);
        assert_relative_eq!(guards.total(), 127.5 + 100.0 / 10.5, epsilon = 1e-12);
    }

    #[test]
    fn test_boundaries_accumulate() {
        let guards = PhaseGuards::derive(&LandingProfile::default()).unwrap();

        assert_eq!(guards.start(LandingPhase::Transition), 0.0);
        assert_eq!(guards.boundary(LandingPhase::Transition), 30.0);
        assert_eq!(guards.start(LandingPhase::Hover), 30.0);
        assert_eq!(guards.boundary(LandingPhase::Hover), 35.0);
        assert_eq!(guards.boundary(LandingPhase::Cruise), 127.5);
        assert_eq!(guards.boundary(LandingPhase::TerminalDescent), guards.total());
        assert_eq!(guards.start(LandingPhase::Landed), guards.total());

        let mut previous = 0.0;
        for phase in &LandingPhase::ALL[..4] {
            assert!(guards.duration(*phase) >= 0.0);
            assert!(guards.boundary(*phase) >= previous);
            previous = guards.boundary(*phase);
        }
    }

    #[test]
    fn test_guard_uses_magnitude_of_velocity_change() {
        // Deceleration sign opposite to the velocity change still yields a
        // positive duration.
        let profile = LandingProfile {
            transition: TransitionPhase::new(30.0, 0.0, 1.5, 1000.0),
            ..LandingProfile::default()
        };
        let guards = PhaseGuards::derive(&profile).unwrap();
        assert_relative_eq!(guards.transition, 20.0);
    }

    #[test]
    fn test_zero_deceleration_is_rejected() {
        let profile = LandingProfile {
            transition: TransitionPhase::new(30.0, 0.0, 0.0, 1000.0),
            ..LandingProfile::default()
        };
        assert!(matches!(
            PhaseGuards::derive(&profile),
            Err(SimulationError::ConfigurationError(_))
        ));
    }

    #[test]
    fn test_zero_hover_acceleration_is_rejected() {
        let profile = LandingProfile {
            hover: HoverPhase::new(0.0, 10.0, 0.0),
            ..LandingProfile::default()
        };
        assert!(matches!(
            PhaseGuards::derive(&profile),
            Err(SimulationError::ConfigurationError(_))
        ));
    }

    #[test]
    fn test_over_constrained_altitude_budget_is_rejected() {
        let profile = LandingProfile {
            descent: DescentPhase::new(990.0, 0.5),
            ..LandingProfile::default()
        };
        let err = PhaseGuards::derive(&profile).unwrap_err();
        assert!(matches!(err, SimulationError::ConfigurationError(_)));
        assert!(err.to_string().contains("cruise guard"));
    }

    #[test]
    fn test_non_finite_parameters_are_numerical_errors() {
        let profile = LandingProfile {
            hover: HoverPhase::new(0.0, 10.0, f64::NAN),
            ..LandingProfile::default()
        };
        assert!(matches!(
            PhaseGuards::derive(&profile),
            Err(SimulationError::NumericalError(_))
        ));

        let profile = LandingProfile {
            transition: TransitionPhase::new(f64::INFINITY, 0.0, -1.0, 1000.0),
            ..LandingProfile::default()
        };
        assert!(matches!(
            PhaseGuards::derive(&profile),
            Err(SimulationError::NumericalError(_))
        ));
    }

    #[test]
    fn test_zero_target_altitude_skips_terminal_descent() {
        let profile = LandingProfile {
            descent: DescentPhase::new(0.0, 0.5),
            ..LandingProfile::default()
        };
        let guards = PhaseGuards::derive(&profile).unwrap();
        assert_eq!(guards.terminal_descent, 0.0);
        assert_eq!(guards.descent_deceleration, 0.0);
        assert_relative_eq!(guards.cruise, 97.5);
    }
}
