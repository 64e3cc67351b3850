use serde::Serialize;
use serde_json::Value;

use super::is_present;

/// Body fields every opening request must carry, in the order they are reported
pub const REQUIRED_FIELDS: [&str; 7] = [
    "accountId",
    "code",
    "complement",
    "partitionId",
    "receiverDescription",
    "receiverId",
    "server",
];

/// Inbound opening request after validation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpeningRequest {
    pub account_id: String,
    pub code: String,
    pub complement: String,
    pub partition_id: String,
    /// `partitionId` exactly as sent, used to match the account's partitions
    #[serde(skip)]
    pub partition_key: Value,
    /// Accepted for compatibility; the audit event uses the registry's receiver name
    pub receiver_description: String,
    pub receiver_id: String,
    /// Gateway port appended to the configured base URL
    pub server: String,
}

impl OpeningRequest {
    /// Read the fields out of a JSON body. Absent values become empty strings;
    /// presence is checked separately by the validator.
    pub fn from_body(body: &Value) -> Self {
        let field = |name: &str| text(body.get(name));

        Self {
            account_id: field("accountId"),
            code: field("code"),
            complement: field("complement"),
            partition_id: field("partitionId"),
            partition_key: body.get("partitionId").cloned().unwrap_or(Value::Null),
            receiver_description: field("receiverDescription"),
            receiver_id: field("receiverId"),
            server: field("server"),
        }
    }

    /// Presence of each required field, by name
    pub fn presence(body: &Value) -> impl Iterator<Item = (&'static str, bool)> + '_ {
        REQUIRED_FIELDS
            .into_iter()
            .map(move |name| (name, is_present(body.get(name))))
    }
}

fn text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(true)) => "true".to_string(),
        Some(v @ Value::Array(_)) | Some(v @ Value::Object(_)) => v.to_string(),
        _ => String::new(),
    }
}
