use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::errors::SimulationError;

/// Phase 1: horizontal deceleration from cruise speed at cruise altitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransitionPhase {
    pub initial_velocity: f64,
    pub final_velocity: f64,
    pub deceleration: f64,
    pub cruise_altitude: f64,
    /// Horizontal track direction in radians, from +x towards +y.
    #[serde(default)]
    pub heading: f64,
}

impl TransitionPhase {
    pub fn new(
        initial_velocity: f64,
        final_velocity: f64,
        deceleration: f64,
        cruise_altitude: f64,
    ) -> Self {
        TransitionPhase {
            initial_velocity,
            final_velocity,
            deceleration,
            cruise_altitude,
            heading: TRANSITION_HEADING,
        }
    }

    pub fn with_heading(mut self, heading: f64) -> Self {
        self.heading = heading;
        self
    }
}

/// Phase 2: vertical descent-rate build-up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HoverPhase {
    pub initial_velocity: f64,
    pub final_velocity: f64,
    pub acceleration: f64,
}

impl HoverPhase {
    pub fn new(initial_velocity: f64, final_velocity: f64, acceleration: f64) -> Self {
        HoverPhase {
            initial_velocity,
            final_velocity,
            acceleration,
        }
    }
}

/// Phase 4: terminal deceleration. The deceleration itself is derived from
/// the altitude budget; the vehicle is expected to reach `final_velocity`
/// at z ~= 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DescentPhase {
    pub target_altitude: f64,
    pub final_velocity: f64,
}

impl DescentPhase {
    pub fn new(target_altitude: f64, final_velocity: f64) -> Self {
        DescentPhase {
            target_altitude,
            final_velocity,
        }
    }
}

/// Parameter sets for every configured phase. Phase 3 (constant-rate
/// cruise) has no attributes of its own.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LandingProfile {
    pub transition: TransitionPhase,
    pub hover: HoverPhase,
    pub descent: DescentPhase,
}

impl LandingProfile {
    pub fn new(transition: TransitionPhase, hover: HoverPhase, descent: DescentPhase) -> Self {
        LandingProfile {
            transition,
            hover,
            descent,
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, SimulationError> {
        serde_json::from_str(json).map_err(|e| {
            SimulationError::ConfigurationError(format!("invalid landing profile: {}", e))
        })
    }

    pub fn from_json_file(path: &Path) -> Result<Self, SimulationError> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            SimulationError::ConfigurationError(format!(
                "cannot read landing profile {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json_str(&contents)
    }
}

impl Default for LandingProfile {
    fn default() -> Self {
        LandingProfile {
            transition: TransitionPhase::new(
                TRANSITION_INITIAL_VELOCITY,
                TRANSITION_FINAL_VELOCITY,
                TRANSITION_DECELERATION,
                CRUISE_ALTITUDE,
            ),
            hover: HoverPhase::new(
                HOVER_INITIAL_VELOCITY,
                HOVER_FINAL_VELOCITY,
                HOVER_ACCELERATION,
            ),
            descent: DescentPhase::new(DESCENT_TARGET_ALTITUDE, TOUCHDOWN_VELOCITY),
        }
    }
}
