use crate::trajectory_system::guards::PhaseGuards;

/// Landing profile:
///
/// ```text
/// --Transition-->
///               |
///             Hover
///               |
///             Cruise
///               |
///          TerminalDescent
///               |
///             Landed
/// ```
#[derive(PartialEq, Eq, Debug, Clone, Copy, Hash)]
pub enum LandingPhase {
    Transition,
    Hover,
    Cruise,
    TerminalDescent,
    Landed,
}

impl LandingPhase {
    pub const ALL: [LandingPhase; 5] = [
        LandingPhase::Transition,
        LandingPhase::Hover,
        LandingPhase::Cruise,
        LandingPhase::TerminalDescent,
        LandingPhase::Landed,
    ];

    pub fn next(self) -> Self {
        match self {
            LandingPhase::Transition => LandingPhase::Hover,
            LandingPhase::Hover => LandingPhase::Cruise,
            LandingPhase::Cruise => LandingPhase::TerminalDescent,
            LandingPhase::TerminalDescent | LandingPhase::Landed => LandingPhase::Landed,
        }
    }

    /// Applies the only transition rule: leave a phase once elapsed time
    /// reaches its cumulative guard. Zero-length phases are passed through
    /// in the same call.
    pub fn advance(self, elapsed: f64, guards: &PhaseGuards) -> Self {
        let mut phase = self;
        while phase != LandingPhase::Landed && elapsed >= guards.boundary(phase) {
            phase = phase.next();
        }
        phase
    }

    /// Phase active at `elapsed`, walking the machine from the start.
    pub fn at(elapsed: f64, guards: &PhaseGuards) -> Self {
        LandingPhase::Transition.advance(elapsed, guards)
    }

    pub fn label(self) -> &'static str {
        match self {
            LandingPhase::Transition => "transition",
            LandingPhase::Hover => "hover",
            LandingPhase::Cruise => "cruise",
            LandingPhase::TerminalDescent => "terminal_descent",
            LandingPhase::Landed => "landed",
        }
    }
}
