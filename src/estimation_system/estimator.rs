use nalgebra::{DMatrix, DVector};
use tracing::info;

use crate::constants::{CONTROL_DIMENSION, STATE_DIMENSION};
use crate::errors::SimulationError;
use crate::telemetry_system::telemetry::{TelemetryBuffer, TelemetrySample};
use crate::utils::vector3d::Vector3D;

/// Linear state extrapolation: `F·x + B·u`.
///
/// This is the prediction half of a Kalman filter; no measurement update
/// follows and nothing is retained between calls.
pub fn predict(
    transition: &DMatrix<f64>,
    control: &DMatrix<f64>,
    state: &DVector<f64>,
    input: &DVector<f64>,
) -> Result<DVector<f64>, SimulationError> {
    check_model_shape(transition, control)?;
    if transition.ncols() != state.len() {
        return Err(SimulationError::DimensionMismatch(format!(
            "transition matrix is {}x{} but the state vector has {} elements",
            transition.nrows(),
            transition.ncols(),
            state.len()
        )));
    }
    if control.ncols() != input.len() {
        return Err(SimulationError::DimensionMismatch(format!(
            "control matrix is {}x{} but the control vector has {} elements",
            control.nrows(),
            control.ncols(),
            input.len()
        )));
    }

    let predicted = transition * state + control * input;
    if predicted.iter().any(|v| !v.is_finite()) {
        return Err(SimulationError::NumericalError(format!(
            "predicted state is not finite: {:?}",
            predicted.as_slice()
        )));
    }
    Ok(predicted)
}

fn check_model_shape(
    transition: &DMatrix<f64>,
    control: &DMatrix<f64>,
) -> Result<(), SimulationError> {
    if !transition.is_square() {
        return Err(SimulationError::ConfigurationError(format!(
            "transition matrix must be square, got {}x{}",
            transition.nrows(),
            transition.ncols()
        )));
    }
    if control.nrows() != transition.nrows() {
        return Err(SimulationError::DimensionMismatch(format!(
            "control matrix has {} rows but the state has {} elements",
            control.nrows(),
            transition.nrows()
        )));
    }
    Ok(())
}

/// State-transition/control matrix pair.
#[derive(Debug, Clone, PartialEq)]
pub struct EstimatorModel {
    transition: DMatrix<f64>,
    control: DMatrix<f64>,
}

impl EstimatorModel {
    pub fn new(transition: DMatrix<f64>, control: DMatrix<f64>) -> Result<Self, SimulationError> {
        check_model_shape(&transition, &control)?;
        Ok(EstimatorModel {
            transition,
            control,
        })
    }

    /// Constant-acceleration model over `[x, y, z, vx, vy, vz]` driven by
    /// `[ax, ay, az]`. `delta_time` must be the simulator's sample interval.
    pub fn kinematic(delta_time: f64) -> Result<Self, SimulationError> {
        if !delta_time.is_finite() || delta_time <= 0.0 {
            return Err(SimulationError::ConfigurationError(format!(
                "estimator sample interval must be positive, got {}",
                delta_time
            )));
        }

        let axes = CONTROL_DIMENSION;
        let mut transition = DMatrix::<f64>::identity(STATE_DIMENSION, STATE_DIMENSION);
        let mut control = DMatrix::<f64>::zeros(STATE_DIMENSION, CONTROL_DIMENSION);
        for axis in 0..axes {
            // position += velocity * dt
            transition[(axis, axes + axis)] = delta_time;
            control[(axis, axis)] = 0.5 * delta_time.powi(2);
            control[(axes + axis, axis)] = delta_time;
        }
        Self::new(transition, control)
    }

    pub fn transition(&self) -> &DMatrix<f64> {
        &self.transition
    }

    pub fn control(&self) -> &DMatrix<f64> {
        &self.control
    }

    pub fn state_dimension(&self) -> usize {
        self.transition.nrows()
    }

    pub fn control_dimension(&self) -> usize {
        self.control.ncols()
    }

    pub fn predict(
        &self,
        state: &DVector<f64>,
        input: &DVector<f64>,
    ) -> Result<DVector<f64>, SimulationError> {
        predict(&self.transition, &self.control, state, input)
    }
}

pub fn state_vector(sample: &TelemetrySample) -> DVector<f64> {
    DVector::from_vec(sample.state_vector().to_vec())
}

pub fn control_vector(acceleration: Vector3D) -> DVector<f64> {
    DVector::from_vec(acceleration.to_array().to_vec())
}

/// Prediction made from telemetry tick `tick`; `time` is the instant the
/// prediction refers to, one sample interval later.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictedSample {
    pub tick: usize,
    pub time: f64,
    pub state: DVector<f64>,
}

impl PredictedSample {
    pub fn position(&self) -> Option<Vector3D> {
        if self.state.len() < 3 {
            return None;
        }
        Some(Vector3D::new(self.state[0], self.state[1], self.state[2]))
    }
}

/// Predictions indexed the same way as the telemetry they came from.
#[derive(Debug, Clone, Default)]
pub struct PredictedStateBuffer {
    samples: Vec<PredictedSample>,
}

impl PredictedStateBuffer {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn get(&self, tick: usize) -> Option<&PredictedSample> {
        self.samples.get(tick)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PredictedSample> {
        self.samples.iter()
    }

    /// Distance between each prediction and the telemetry sample it
    /// targets. The final telemetry sample has no successor and is skipped.
    pub fn position_residuals(&self, telemetry: &TelemetryBuffer) -> Vec<f64> {
        self.samples
            .iter()
            .filter_map(|predicted| {
                let actual = telemetry.get(predicted.tick + 1)?;
                let position = predicted.position()?;
                Some((position - actual.position).magnitude())
            })
            .collect()
    }

    pub fn max_position_residual(&self, telemetry: &TelemetryBuffer) -> Option<f64> {
        self.position_residuals(telemetry)
            .into_iter()
            .fold(None, |max, r| Some(max.map_or(r, |m: f64| m.max(r))))
    }

    pub fn write_csv<W: std::io::Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut wtr = csv::Writer::from_writer(writer);
        let width = self.samples.first().map_or(0, |s| s.state.len());
        let mut header = vec!["tick".to_string(), "time".to_string()];
        header.extend((0..width).map(|i| format!("s{}", i)));
        wtr.write_record(&header)?;

        for sample in &self.samples {
            let mut record = vec![sample.tick.to_string(), sample.time.to_string()];
            record.extend(sample.state.iter().map(|v| v.to_string()));
            wtr.write_record(&record)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

/// Runs `predict` once per telemetry sample, each call independent of the
/// others. `control_for` supplies the control vector for a sample.
pub fn predict_telemetry<F>(
    model: &EstimatorModel,
    telemetry: &TelemetryBuffer,
    delta_time: f64,
    mut control_for: F,
) -> Result<PredictedStateBuffer, SimulationError>
where
    F: FnMut(&TelemetrySample) -> DVector<f64>,
{
    let mut samples = Vec::with_capacity(telemetry.samples().len());
    for sample in telemetry.iter() {
        let state = model.predict(&state_vector(sample), &control_for(sample))?;
        samples.push(PredictedSample {
            tick: sample.tick,
            time: (sample.tick + 1) as f64 * delta_time,
            state,
        });
    }

    info!(
        predictions = samples.len(),
        state_dimension = model.state_dimension(),
        "state extrapolation complete"
    );
    Ok(PredictedStateBuffer { samples })
}
