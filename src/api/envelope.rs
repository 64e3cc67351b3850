use axum::{
    http::{HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::OpeningError;

/// Request fields echoed back in every envelope, captured once per request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestEcho {
    pub timestamp: String,
    pub method: String,
    pub path: String,
    pub query: Value,
    pub headers: Value,
    pub body: Value,
}

impl RequestEcho {
    pub fn capture(timestamp: String, method: &Method, uri: &Uri, headers: &HeaderMap, body: &[u8]) -> Self {
        let path = uri
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| uri.path().to_string());

        Self {
            timestamp,
            method: method.as_str().to_string(),
            path,
            query: query_to_json(uri.query()),
            headers: headers_to_json(headers),
            body: serde_json::from_slice(body).unwrap_or(Value::Null),
        }
    }
}

/// Repeated query keys collect into an array, like the Node query parser did
fn query_to_json(query: Option<&str>) -> Value {
    let mut map = Map::new();

    for (key, value) in url::form_urlencoded::parse(query.unwrap_or("").as_bytes()) {
        let value = Value::String(value.into_owned());
        match map.get_mut(key.as_ref()) {
            Some(Value::Array(values)) => values.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
            None => {
                map.insert(key.into_owned(), value);
            }
        }
    }

    Value::Object(map)
}

fn headers_to_json(headers: &HeaderMap) -> Value {
    let mut map = Map::new();

    for name in headers.keys() {
        let values: Vec<&str> = headers
            .get_all(name)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect();

        if !values.is_empty() {
            map.insert(name.as_str().to_string(), Value::String(values.join(", ")));
        }
    }

    Value::Object(map)
}

/// The single response shape returned on every exit path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    pub timestamp: String,
    pub status: bool,
    pub status_code: u16,
    pub method: String,
    pub path: String,
    pub query: Value,
    pub headers: Value,
    pub body: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ResponseEnvelope {
    /// Build an envelope around the request echo; `status` follows the status code
    pub fn build(
        echo: &RequestEcho,
        status_code: StatusCode,
        message: Option<&str>,
        suggestion: Option<&str>,
        data: Option<Value>,
    ) -> Self {
        Self {
            timestamp: echo.timestamp.clone(),
            status: status_code.is_success(),
            status_code: status_code.as_u16(),
            method: echo.method.clone(),
            path: echo.path.clone(),
            query: echo.query.clone(),
            headers: echo.headers.clone(),
            body: echo.body.clone(),
            message: message.map(str::to_string),
            suggestion: suggestion.map(str::to_string),
            data,
        }
    }

    pub fn success(echo: &RequestEcho, data: Value) -> Self {
        Self::build(echo, StatusCode::OK, None, None, Some(data))
    }

    pub fn failure(echo: &RequestEcho, err: &OpeningError) -> Self {
        Self::build(
            echo,
            err.status_code(),
            Some(err.message()),
            Some(err.suggestion()),
            None,
        )
    }

    /// Request echo fields of this envelope
    pub fn echo(&self) -> RequestEcho {
        RequestEcho {
            timestamp: self.timestamp.clone(),
            method: self.method.clone(),
            path: self.path.clone(),
            query: self.query.clone(),
            headers: self.headers.clone(),
            body: self.body.clone(),
        }
    }
}

impl IntoResponse for ResponseEnvelope {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use serde_json::json;

    fn echo() -> RequestEcho {
        let mut headers = HeaderMap::new();
        headers.insert("content-type", HeaderValue::from_static("application/json"));
        headers.append("x-forwarded-for", HeaderValue::from_static("10.0.0.1"));
        headers.append("x-forwarded-for", HeaderValue::from_static("10.0.0.2"));

        let uri: Uri = "/api/opening?source=app&tag=a&tag=b".parse().unwrap();
        RequestEcho::capture(
            "2026-10-19T12:00:00Z".into(),
            &Method::POST,
            &uri,
            &headers,
            br#"{"accountId":"1"}"#,
        )
    }

    #[test]
    fn capture_keeps_path_query_headers_and_body() {
        let echo = echo();
        assert_eq!(echo.method, "POST");
        assert_eq!(echo.path, "/api/opening?source=app&tag=a&tag=b");
        assert_eq!(echo.query, json!({ "source": "app", "tag": ["a", "b"] }));
        assert_eq!(echo.headers["content-type"], "application/json");
        assert_eq!(echo.headers["x-forwarded-for"], "10.0.0.1, 10.0.0.2");
        assert_eq!(echo.body, json!({ "accountId": "1" }));
    }

    #[test]
    fn unparseable_body_echoes_null() {
        let uri: Uri = "/api/opening".parse().unwrap();
        let echo = RequestEcho::capture("t".into(), &Method::POST, &uri, &HeaderMap::new(), b"not json");
        assert_eq!(echo.body, Value::Null);
        assert_eq!(echo.query, json!({}));
    }

    #[test]
    fn success_and_failure_share_echo_fields() {
        let echo = echo();
        let ok = ResponseEnvelope::success(&echo, json!({ "opened": true }));
        let not_found = ResponseEnvelope::failure(&echo, &OpeningError::AccountNotFound { account_id: "1".into() });

        assert_eq!(ok.echo(), echo);
        assert_eq!(not_found.echo(), echo);
        assert!(ok.status);
        assert!(!not_found.status);
        assert_eq!(not_found.status_code, 404);
    }

    #[test]
    fn optional_fields_are_omitted_when_empty() {
        let envelope = ResponseEnvelope::failure(&echo(), &OpeningError::MissingFields { missing: vec!["code"] });
        let value = serde_json::to_value(&envelope).unwrap();

        assert_eq!(value["statusCode"], 400);
        assert_eq!(value["message"], "Missing required fields.");
        assert!(value.get("data").is_none());
    }
}
