use serde_json::Value;

use crate::config::PartitionIdCheck;
use crate::error::OpeningError;
use crate::models::OpeningRequest;

/// Check all seven required fields before any remote call is made.
///
/// Every field is evaluated, so the reported list is complete regardless of
/// order; the client-facing message is the same whichever field failed.
pub fn validate(body: &Value, partition_id_check: PartitionIdCheck) -> Result<OpeningRequest, OpeningError> {
    let missing: Vec<&'static str> = OpeningRequest::presence(body)
        .filter(|(name, present)| match (*name, partition_id_check) {
            ("partitionId", PartitionIdCheck::LegacyInverted) => *present,
            _ => !*present,
        })
        .map(|(name, _)| name)
        .collect();

    if !missing.is_empty() {
        return Err(OpeningError::MissingFields { missing });
    }

    Ok(OpeningRequest::from_body(body))
}
