// handlers/mod.rs - HTTP handlers
//
// public:  service info and health, no request body
// opening: POST /api/opening, the gate opening workflow

use std::sync::Arc;

use crate::services::opening::OpeningService;

pub mod opening;
pub mod public;

pub use opening::create_opening;
pub use public::{health, root};

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<OpeningService>,
}

impl AppState {
    pub fn new(service: OpeningService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}
