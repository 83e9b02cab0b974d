pub mod landing_phase;
pub mod profile;
