pub mod constants;
pub mod control;
pub mod errors;
pub mod estimation_system;
pub mod telemetry_system;
pub mod trajectory_system;
pub mod utils;

pub use constants::*;
pub use control::landing_phase::LandingPhase;
pub use control::profile::{DescentPhase, HoverPhase, LandingProfile, TransitionPhase};
pub use errors::SimulationError;

// Re-export commonly used items from trajectory_system
pub use trajectory_system::clock::SimulationClock;
pub use trajectory_system::guards::PhaseGuards;
pub use trajectory_system::kinematics::{PhaseAccelerations, VehicleState};
pub use trajectory_system::simulator::{simulate, simulate_until, Simulator};

// Re-export commonly used items from telemetry_system
pub use telemetry_system::telemetry::{TelemetryBuffer, TelemetrySample};

// Re-export commonly used items from estimation_system
pub use estimation_system::estimator::{
    predict, predict_telemetry, EstimatorModel, PredictedSample, PredictedStateBuffer,
};

// Re-export commonly used utilities
pub use utils::vector3d::Vector3D;
