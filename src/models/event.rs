use serde::{Deserialize, Serialize};

use super::Scalar;

/// Event code for a remote access-control opening
pub const EVENT_ID: &str = "167618000";
pub const PROTOCOL_TYPE: &str = "CONTACT_ID";

/// Body of `POST /v2/events/accessControl`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventBatch {
    pub events: Vec<AccessControlEvent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessControlEvent {
    pub account: String,
    pub code: String,
    pub company_id: Scalar,
    pub complement: String,
    pub event_id: String,
    pub protocol_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receiver_description: Option<String>,
}

impl EventBatch {
    pub fn single(event: AccessControlEvent) -> Self {
        Self { events: vec![event] }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn event_serializes_with_camel_case_keys() {
        let batch = EventBatch::single(AccessControlEvent {
            account: "A1".into(),
            code: "E100".into(),
            company_id: Scalar::Text("C1".into()),
            complement: "Opened remotely".into(),
            event_id: EVENT_ID.into(),
            protocol_type: PROTOCOL_TYPE.into(),
            receiver_description: Some("Front Door".into()),
        });

        assert_eq!(
            serde_json::to_value(&batch).unwrap(),
            json!({
                "events": [{
                    "account": "A1",
                    "code": "E100",
                    "companyId": "C1",
                    "complement": "Opened remotely",
                    "eventId": "167618000",
                    "protocolType": "CONTACT_ID",
                    "receiverDescription": "Front Door"
                }]
            })
        );
    }
}
