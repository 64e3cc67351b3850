// handlers/public.rs - service information and liveness

use axum::response::{IntoResponse, Json};
use serde_json::{json, Value};

/// GET / - service name, version and routes
pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Gate Opening API",
            "version": version,
            "description": "Opens access-control gates and reports the event to Sigma Cloud",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "opening": "POST /api/opening",
            }
        }
    }))
}

/// GET /health - liveness only; downstream services are not probed
pub async fn health() -> impl IntoResponse {
    let now = chrono::Utc::now();

    Json(json!({
        "success": true,
        "data": {
            "status": "ok",
            "timestamp": now,
        }
    }))
}
