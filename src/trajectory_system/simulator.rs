use tracing::{debug, info};

use crate::{
    control::{landing_phase::LandingPhase, profile::LandingProfile},
    errors::SimulationError,
    telemetry_system::telemetry::{TelemetryBuffer, TelemetrySample},
    utils::vector3d::Vector3D,
};

use super::{
    clock::SimulationClock,
    guards::PhaseGuards,
    kinematics::{enter, step, PhaseAccelerations, VehicleState},
};

/// Batch generator for the telemetry of one landing.
#[derive(Debug, Clone)]
pub struct Simulator {
    pub profile: LandingProfile,
    pub clock: SimulationClock,
    pub guards: PhaseGuards,
    pub accelerations: PhaseAccelerations,
}

impl Simulator {
    /// Derives the phase guards up front so that configuration errors
    /// surface before any tick runs.
    pub fn new(profile: LandingProfile, clock: SimulationClock) -> Result<Self, SimulationError> {
        let guards = PhaseGuards::derive(&profile)?;
        let accelerations = PhaseAccelerations::new(&profile, &guards);
        Ok(Simulator {
            profile,
            clock,
            guards,
            accelerations,
        })
    }

    /// Total duration of the landing sequence.
    pub fn landing_duration(&self) -> f64 {
        self.guards.total()
    }

    /// Ticks needed to cover the landing sequence at this clock.
    pub fn required_ticks(&self) -> f64 {
        (self.landing_duration() / self.clock.sample_interval()).ceil()
    }

    /// Acceleration the stepping loop applies to a tick starting at `time`.
    pub fn commanded_acceleration(&self, time: f64) -> Vector3D {
        self.accelerations.for_phase(LandingPhase::at(time, &self.guards))
    }

    pub fn run(&self) -> Result<TelemetryBuffer, SimulationError> {
        self.run_until(self.landing_duration())
    }

    /// Steps until the start of the next tick reaches `end_time`. Ticks past
    /// touchdown are emitted in the `Landed` state and do not move the
    /// vehicle.
    pub fn run_until(&self, end_time: f64) -> Result<TelemetryBuffer, SimulationError> {
        if !end_time.is_finite() || end_time < 0.0 {
            return Err(SimulationError::ConfigurationError(format!(
                "simulation end time must be a non-negative number of seconds, got {}",
                end_time
            )));
        }

        let dt = self.clock.sample_interval();
        let capacity = self.clock.capacity();
        let expected_ticks = (end_time / dt).ceil().min(capacity as f64) as usize;

        let mut state = VehicleState::initial(&self.profile);
        let mut phase = LandingPhase::Transition;
        let mut telemetry =
            TelemetryBuffer::new(TelemetrySample::new(&state, phase), capacity, expected_ticks);

        info!(
            duration = self.landing_duration(),
            end_time,
            sample_interval = dt,
            capacity,
            "starting landing simulation"
        );

        loop {
            let tick_start = self.clock.elapsed(state.tick);
            if tick_start >= end_time {
                break;
            }
            if telemetry.is_full() {
                return Err(SimulationError::CapacityExceeded {
                    tick: state.tick + 1,
                    capacity,
                });
            }

            let next_phase = phase.advance(tick_start, &self.guards);
            if next_phase != phase {
                debug!(from = ?phase, to = ?next_phase, time = tick_start, "phase change");
                if next_phase == LandingPhase::Landed {
                    info!(
                        time = tick_start,
                        altitude = state.altitude(),
                        descent_rate = state.descent_rate(),
                        "vehicle has landed"
                    );
                }
                state = enter(&state, phase, next_phase, &self.profile);
                phase = next_phase;
            }

            state = step(&state, phase, self.accelerations.for_phase(phase), dt);
            if !state.is_finite() {
                return Err(SimulationError::NumericalError(format!(
                    "vehicle state at tick {} is not finite: {:?}",
                    state.tick, state
                )));
            }
            telemetry.push(TelemetrySample::new(&state, phase))?;
        }

        info!(ticks = telemetry.ticks(), "landing simulation complete");
        Ok(telemetry)
    }
}

/// Runs a complete landing for `profile` at `clock`'s sample rate.
pub fn simulate(
    profile: &LandingProfile,
    clock: &SimulationClock,
) -> Result<TelemetryBuffer, SimulationError> {
    Simulator::new(*profile, *clock)?.run()
}

/// Like [`simulate`], but keeps sampling until `end_time`. Ticks after
/// touchdown hold the vehicle in place.
pub fn simulate_until(
    profile: &LandingProfile,
    clock: &SimulationClock,
    end_time: f64,
) -> Result<TelemetryBuffer, SimulationError> {
    Simulator::new(*profile, *clock)?.run_until(end_time)
}
