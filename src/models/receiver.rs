use serde::{Deserialize, Serialize};

/// Monitoring-station receiver record, from `GET /v1/accounts/{accountId}/receivers/{receiverId}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiverMap {
    #[serde(default)]
    pub name: Option<String>,
}
