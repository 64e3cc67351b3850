pub mod envelope;

pub use envelope::{RequestEcho, ResponseEnvelope};
