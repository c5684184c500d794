pub mod autoplay;
pub mod simulate;

pub use autoplay::{AutoplayConfig, AutoplayMode};
pub use simulate::{SimulateConfig, SimulateMode};
