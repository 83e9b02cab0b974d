use crate::{
    control::{landing_phase::LandingPhase, profile::LandingProfile},
    utils::vector3d::Vector3D,
};

use super::guards::PhaseGuards;

/// Snapshot of the vehicle at the end of a tick. Velocity is the signed
/// rate of change of position, so `velocity.z` is negative while
/// descending.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleState {
    pub tick: usize,
    pub time: f64,
    pub position: Vector3D,
    pub velocity: Vector3D,
}

impl VehicleState {
    /// Entry state of a landing: at cruise altitude, flying level along the
    /// heading at the transition's initial velocity.
    pub fn initial(profile: &LandingProfile) -> Self {
        let transition = &profile.transition;
        let track = Vector3D::from_heading(transition.heading);
        VehicleState {
            tick: 0,
            time: 0.0,
            position: Vector3D::new(0.0, 0.0, transition.cruise_altitude),
            velocity: transition.initial_velocity * track,
        }
    }

    pub fn altitude(&self) -> f64 {
        self.position.z
    }

    pub fn descent_rate(&self) -> f64 {
        -self.velocity.z
    }

    pub fn ground_speed(&self) -> f64 {
        self.velocity.horizontal().magnitude()
    }

    pub fn is_finite(&self) -> bool {
        self.time.is_finite() && self.position.is_finite() && self.velocity.is_finite()
    }
}

/// Acceleration each phase applies, expressed in the landing frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseAccelerations {
    pub transition: Vector3D,
    pub hover: Vector3D,
    pub terminal_descent: Vector3D,
}

impl PhaseAccelerations {
    pub fn new(profile: &LandingProfile, guards: &PhaseGuards) -> Self {
        let track = Vector3D::from_heading(profile.transition.heading);
        PhaseAccelerations {
            transition: profile.transition.deceleration * track,
            hover: Vector3D::new(0.0, 0.0, -profile.hover.acceleration),
            terminal_descent: Vector3D::new(0.0, 0.0, -guards.descent_deceleration),
        }
    }

    pub fn for_phase(&self, phase: LandingPhase) -> Vector3D {
        match phase {
            LandingPhase::Transition => self.transition,
            LandingPhase::Hover => self.hover,
            LandingPhase::TerminalDescent => self.terminal_descent,
            LandingPhase::Cruise | LandingPhase::Landed => Vector3D::zero(),
        }
    }
}

/// State the machine carries into the tick after a move from `from` to
/// `to`. Leaving `Transition` seeds the hover's initial descent rate; every
/// other boundary carries velocity unchanged.
pub fn enter(
    previous: &VehicleState,
    from: LandingPhase,
    to: LandingPhase,
    profile: &LandingProfile,
) -> VehicleState {
    if from == LandingPhase::Transition && to != LandingPhase::Transition {
        let v = previous.velocity;
        VehicleState {
            velocity: Vector3D::new(v.x, v.y, -profile.hover.initial_velocity),
            ..*previous
        }
    } else {
        *previous
    }
}

/// Advances `previous` by one tick under `phase`'s update rule.
///
/// Displacement is a one-tick increment added to the previous position;
/// velocity is carried from `previous`, never reset to a configured value.
pub fn step(
    previous: &VehicleState,
    phase: LandingPhase,
    acceleration: Vector3D,
    delta_time: f64,
) -> VehicleState {
    let v = previous.velocity;
    let half_dt2 = 0.5 * delta_time.powi(2);

    let (displacement, velocity) = match phase {
        // s = ut + at²/2 along the track, altitude held
        LandingPhase::Transition => {
            let a = acceleration.horizontal();
            (
                v.horizontal() * delta_time + a * half_dt2,
                v + a * delta_time,
            )
        }
        LandingPhase::Hover | LandingPhase::TerminalDescent => (
            Vector3D::new(0.0, 0.0, v.z * delta_time + acceleration.z * half_dt2),
            Vector3D::new(v.x, v.y, v.z + acceleration.z * delta_time),
        ),
        LandingPhase::Cruise => (Vector3D::new(0.0, 0.0, v.z * delta_time), v),
        LandingPhase::Landed => (Vector3D::zero(), Vector3D::zero()),
    };

    let tick = previous.tick + 1;
    VehicleState {
        tick,
        time: tick as f64 * delta_time,
        position: previous.position + displacement,
        velocity,
    }
}
