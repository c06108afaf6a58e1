pub mod controls;
pub mod readout;

pub use controls::{ControlSurface, MemorySurface};
pub use readout::CoordinateReadout;
