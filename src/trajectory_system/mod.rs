pub mod clock;
pub mod guards;
pub mod kinematics;
pub mod simulator;
