//! Interaction systems, listed in the order the app schedules them

pub mod button;
pub mod ray_pick;
pub mod calibration;
pub mod rotation;
pub mod instruction;

pub use button::ButtonSystem;
pub use calibration::CalibrationSystem;
pub use instruction::InstructionSystem;
pub use ray_pick::RayPickSystem;
pub use rotation::RotationSystem;
