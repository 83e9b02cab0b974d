// Simulation Parameters
pub const DEFAULT_SAMPLE_INTERVAL: f64 = 0.1; // s (10 Hz)
pub const MAX_LANDING_DURATION: f64 = 1800.0; // s (30 min)
pub const TELEMETRY_CAPACITY: usize = 18_000; // samples (30 min @ 10 Hz)

// Phase 1: transition
pub const TRANSITION_INITIAL_VELOCITY: f64 = 30.0; // m/s
pub const TRANSITION_FINAL_VELOCITY: f64 = 0.0; // m/s
pub const TRANSITION_DECELERATION: f64 = -1.0; // m/s²
pub const CRUISE_ALTITUDE: f64 = 1000.0; // m
pub const TRANSITION_HEADING: f64 = 0.0; // rad, measured from +x towards +y

// Phase 2: hover / descent-rate build-up
pub const HOVER_INITIAL_VELOCITY: f64 = 0.0; // m/s
pub const HOVER_FINAL_VELOCITY: f64 = 10.0; // m/s
pub const HOVER_ACCELERATION: f64 = 2.0; // m/s²

// Phase 4: terminal descent
pub const DESCENT_TARGET_ALTITUDE: f64 = 50.0; // m
pub const TOUCHDOWN_VELOCITY: f64 = 0.5; // m/s, low touchdown impact

// Estimator
pub const STATE_DIMENSION: usize = 6; // [x, y, z, vx, vy, vz]
pub const CONTROL_DIMENSION: usize = 3; // [ax, ay, az]
