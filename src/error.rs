// Opening workflow error types
use axum::http::StatusCode;
use thiserror::Error;

use crate::transport::TransportError;

pub const MISSING_FIELDS_SUGGESTION: &str = "Please provide all required fields: accountId, code, complement, partitionId, receiverDescription, receiverId and server.";
pub const BODY_REJECTED_SUGGESTION: &str = "Please send the request as a JSON body of at most 2 MB.";
pub const UNEXPECTED_SUGGESTION: &str =
    "Please try again later. If this issue persists, contact our support team for assistance.";

/// Every way the opening pipeline can stop before success.
///
/// Validation and lookup misses are expected outcomes reported as 400/404;
/// everything else is unexpected and surfaces as a generic 500.
#[derive(Debug, Error)]
pub enum OpeningError {
    // 400 Bad Request
    #[error("Missing required fields: {}", .missing.join(", "))]
    MissingFields { missing: Vec<&'static str> },

    // Body refused by the extractor, e.g. 413 when over the size limit
    #[error("Request body rejected: {reason}")]
    BodyRejected { status: StatusCode, reason: String },

    // 404 Not Found
    #[error("Account '{account_id}' not found")]
    AccountNotFound { account_id: String },

    #[error("Partition '{partition_id}' not found in account '{account_id}'")]
    PartitionNotFound { account_id: String, partition_id: String },

    #[error("Receiver '{receiver_id}' not found for account '{account_id}'")]
    ReceiverNotFound { account_id: String, receiver_id: String },

    // 500 Internal Server Error
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("Invalid {service} payload: {reason}")]
    InvalidPayload { service: &'static str, reason: String },

    #[error("Partition number '{0}' is not an integer")]
    InvalidPartitionNumber(String),
}

impl OpeningError {
    pub fn invalid_payload(service: &'static str, err: serde_json::Error) -> Self {
        OpeningError::InvalidPayload {
            service,
            reason: err.to_string(),
        }
    }

    /// Get HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            OpeningError::MissingFields { .. } => StatusCode::BAD_REQUEST,
            OpeningError::BodyRejected { status, .. } => *status,
            OpeningError::AccountNotFound { .. }
            | OpeningError::PartitionNotFound { .. }
            | OpeningError::ReceiverNotFound { .. } => StatusCode::NOT_FOUND,
            OpeningError::Transport(_)
            | OpeningError::InvalidPayload { .. }
            | OpeningError::InvalidPartitionNumber(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &'static str {
        match self {
            OpeningError::MissingFields { .. } => "Missing required fields.",
            OpeningError::BodyRejected { .. } => "Request body could not be read.",
            OpeningError::AccountNotFound { .. } => "Account not found.",
            OpeningError::PartitionNotFound { .. } => "Partition not found.",
            OpeningError::ReceiverNotFound { .. } => "Receiver not found.",
            _ => "Something went wrong.",
        }
    }

    pub fn suggestion(&self) -> &'static str {
        match self {
            OpeningError::MissingFields { .. } => MISSING_FIELDS_SUGGESTION,
            OpeningError::BodyRejected { .. } => BODY_REJECTED_SUGGESTION,
            OpeningError::AccountNotFound { .. } => "Please check the accountId and try again.",
            OpeningError::PartitionNotFound { .. } => "Please check the partitionId and try again.",
            OpeningError::ReceiverNotFound { .. } => "Please check the receiverId and try again.",
            _ => UNEXPECTED_SUGGESTION,
        }
    }

    pub fn is_unexpected(&self) -> bool {
        self.status_code() == StatusCode::INTERNAL_SERVER_ERROR
    }
}
