use std::ops::Index;

use serde::Serialize;
use tracing::info;

use crate::constants::TELEMETRY_CAPACITY;
use crate::control::landing_phase::LandingPhase;
use crate::errors::SimulationError;
use crate::trajectory_system::kinematics::VehicleState;
use crate::utils::vector3d::Vector3D;

/// One telemetry row. `phase` is the phase whose update rule produced the
/// row; tick 0 carries the initial condition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TelemetrySample {
    pub tick: usize,
    pub time: f64,
    pub position: Vector3D,
    pub velocity: Vector3D,
    pub phase: LandingPhase,
}

impl TelemetrySample {
    pub fn new(state: &VehicleState, phase: LandingPhase) -> Self {
        TelemetrySample {
            tick: state.tick,
            time: state.time,
            position: state.position,
            velocity: state.velocity,
            phase,
        }
    }

    pub fn state(&self) -> VehicleState {
        VehicleState {
            tick: self.tick,
            time: self.time,
            position: self.position,
            velocity: self.velocity,
        }
    }

    /// `[x, y, z, vx, vy, vz]`
    pub fn state_vector(&self) -> [f64; 6] {
        [
            self.position.x,
            self.position.y,
            self.position.z,
            self.velocity.x,
            self.velocity.y,
            self.velocity.z,
        ]
    }
}

#[derive(Debug, Serialize)]
struct TelemetryRow {
    tick: usize,
    time: f64,
    x: f64,
    y: f64,
    z: f64,
    vx: f64,
    vy: f64,
    vz: f64,
    phase: &'static str,
}

impl From<&TelemetrySample> for TelemetryRow {
    fn from(sample: &TelemetrySample) -> Self {
        TelemetryRow {
            tick: sample.tick,
            time: sample.time,
            x: sample.position.x,
            y: sample.position.y,
            z: sample.position.z,
            vx: sample.velocity.x,
            vy: sample.velocity.y,
            vz: sample.velocity.z,
            phase: sample.phase.label(),
        }
    }
}

/// Tick-indexed telemetry. Index 0 holds the initial condition and index
/// *i* the state at the end of tick *i*; at most `capacity` ticks follow
/// the initial sample.
#[derive(Debug, Clone)]
pub struct TelemetryBuffer {
    samples: Vec<TelemetrySample>,
    capacity: usize,
}

impl TelemetryBuffer {
    /// `expected_ticks` pre-sizes the allocation; it is clamped to
    /// `capacity` and to `TELEMETRY_CAPACITY`. Larger buffers grow on push.
    pub fn new(initial: TelemetrySample, capacity: usize, expected_ticks: usize) -> Self {
        let reserved = expected_ticks.min(capacity).min(TELEMETRY_CAPACITY);
        let mut samples = Vec::with_capacity(reserved + 1);
        samples.push(initial);
        TelemetryBuffer { samples, capacity }
    }

    pub fn push(&mut self, sample: TelemetrySample) -> Result<(), SimulationError> {
        let tick = self.samples.len();
        if tick > self.capacity {
            return Err(SimulationError::CapacityExceeded {
                tick,
                capacity: self.capacity,
            });
        }
        debug_assert_eq!(sample.tick, tick, "telemetry must be appended in tick order");
        self.samples.push(sample);
        Ok(())
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of stepped ticks, excluding the initial sample.
    pub fn ticks(&self) -> usize {
        self.samples.len() - 1
    }

    pub fn is_full(&self) -> bool {
        self.ticks() >= self.capacity
    }

    pub fn get(&self, tick: usize) -> Option<&TelemetrySample> {
        self.samples.get(tick)
    }

    pub fn initial(&self) -> &TelemetrySample {
        &self.samples[0]
    }

    pub fn last(&self) -> &TelemetrySample {
        &self.samples[self.samples.len() - 1]
    }

    pub fn samples(&self) -> &[TelemetrySample] {
        &self.samples
    }

    pub fn iter(&self) -> impl Iterator<Item = &TelemetrySample> {
        self.samples.iter()
    }

    /// Stepped samples produced under `phase`.
    pub fn phase_samples(&self, phase: LandingPhase) -> impl Iterator<Item = &TelemetrySample> {
        self.samples[1..].iter().filter(move |s| s.phase == phase)
    }

    /// Elapsed time of each phase change, in order, as seen by the stepping
    /// loop.
    pub fn phase_transitions(&self) -> Vec<(LandingPhase, f64)> {
        let mut transitions: Vec<(LandingPhase, f64)> = Vec::new();
        let mut previous_time = self.initial().time;
        for sample in &self.samples[1..] {
            if transitions.last().map(|(p, _)| *p) != Some(sample.phase) {
                transitions.push((sample.phase, previous_time));
            }
            previous_time = sample.time;
        }
        transitions
    }

    pub fn write_csv<W: std::io::Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut wtr = csv::Writer::from_writer(writer);
        for sample in &self.samples {
            wtr.serialize(TelemetryRow::from(sample))?;
        }
        wtr.flush()?;
        Ok(())
    }

    pub fn log_summary(&self) {
        let last = self.last();
        let max_descent_rate = self
            .samples
            .iter()
            .map(|s| -s.velocity.z)
            .fold(0.0_f64, f64::max);

        info!(
            ticks = self.ticks(),
            capacity = self.capacity,
            duration = %format_time(last.time),
            ground_track = %format_distance(last.position.horizontal().magnitude()),
            final_altitude = %format_distance(last.position.z),
            touchdown_rate = -last.velocity.z,
            max_descent_rate,
            "telemetry summary"
        );
        for (phase, time) in self.phase_transitions() {
            info!("Phase {:?} entered at {}", phase, format_time(time));
        }
    }
}

impl Index<usize> for TelemetryBuffer {
    type Output = TelemetrySample;

    fn index(&self, tick: usize) -> &TelemetrySample {
        &self.samples[tick]
    }
}

/// `h m s` rendering of an elapsed time, dropping leading zero units.
pub fn format_time(seconds: f64) -> String {
    let minutes = (seconds / 60.0).floor();
    let remainder = seconds - minutes * 60.0;
    if minutes >= 60.0 {
        let hours = (minutes / 60.0).floor();
        format!("{:.0}h {:.0}m {:.2}s", hours, minutes - hours * 60.0, remainder)
    } else if minutes >= 1.0 {
        format!("{:.0}m {:.2}s", minutes, remainder)
    } else {
        format!("{:.2}s", seconds)
    }
}

pub fn format_distance(distance: f64) -> String {
    if distance.abs() >= 1000.0 {
        format!("{:.2} km", distance / 1000.0)
    } else {
        format!("{:.2} m", distance)
    }
}
