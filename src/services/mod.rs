pub mod opening;

pub use opening::{OpeningService, OpeningSettings};
