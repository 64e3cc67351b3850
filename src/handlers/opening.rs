// handlers/opening.rs - POST /api/opening handler

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, OriginalUri, State},
    http::{HeaderMap, Method},
};
use chrono::{SecondsFormat, Utc};

use crate::api::{RequestEcho, ResponseEnvelope};
use crate::error::OpeningError;

use super::AppState;

/**
 * POST /api/opening - Open a gate and record the access-control event
 *
 * Expected Input:
 * ```json
 * {
 *   "accountId": "string",
 *   "code": "string",
 *   "complement": "string",
 *   "partitionId": "string",
 *   "receiverDescription": "string",
 *   "receiverId": "string",
 *   "server": "string"          // gateway port
 * }
 * ```
 *
 * The body is taken as raw bytes so that malformed or incomplete input
 * reaches the validator and is answered with the standard 400 envelope
 * instead of an extractor rejection. A body the extractor refuses (over
 * axum's default 2 MB limit) is still answered with an envelope, carrying
 * the extractor's status and a `null` body echo.
 */
pub async fn create_opening(
    State(state): State<AppState>,
    method: Method,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> ResponseEnvelope {
    let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);

    let body = match body {
        Ok(body) => body,
        Err(rejection) => {
            let echo = RequestEcho::capture(timestamp, &method, &uri, &headers, &[]);
            let err = OpeningError::BodyRejected {
                status: rejection.status(),
                reason: rejection.body_text(),
            };
            tracing::warn!("Opening rejected ({}): {}", err.status_code().as_u16(), err);
            return ResponseEnvelope::failure(&echo, &err);
        }
    };

    let echo = RequestEcho::capture(timestamp, &method, &uri, &headers, &body);

    tracing::debug!("{} {} received at {}", echo.method, echo.path, echo.timestamp);

    state.service.create_opening(&echo).await
}
