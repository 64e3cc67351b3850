#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};

use gate_opening_api::config::{PartitionIdCheck, SigmaCloudConfig};
use gate_opening_api::handlers::AppState;
use gate_opening_api::routes::app;
use gate_opening_api::services::{OpeningService, OpeningSettings};
use gate_opening_api::transport::ReqwestTransport;

pub const BEARER_TOKEN: &str = "static-token";
pub const LOGIN_TOKEN: &str = "login-token";
pub const USERNAME: &str = "sigma-user";
pub const PASSWORD: &str = "sigma-pass";
// base64("sigma-user:sigma-pass")
const BASIC_CREDENTIALS: &str = "Basic c2lnbWEtdXNlcjpzaWdtYS1wYXNz";

/// Known account with a healthy gateway
pub const ACCOUNT_ID: &str = "1001";
/// Known account whose gateway answers 503
pub const BROKEN_GATEWAY_ACCOUNT_ID: &str = "2002";
pub const RECEIVER_ID: &str = "R1";

/// One call received by the mock downstream server
#[derive(Debug, Clone)]
pub struct Hit {
    pub method: &'static str,
    pub path: String,
    pub authorization: Option<String>,
    pub body: Option<Value>,
}

#[derive(Clone, Default)]
pub struct Downstream {
    hits: Arc<Mutex<Vec<Hit>>>,
}

impl Downstream {
    fn record(&self, method: &'static str, path: String, headers: &HeaderMap, body: Option<Value>) {
        let authorization = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        self.hits.lock().unwrap().push(Hit {
            method,
            path,
            authorization,
            body,
        });
    }

    pub fn hits(&self) -> Vec<Hit> {
        self.hits.lock().unwrap().clone()
    }

    pub fn hits_on(&self, prefix: &str) -> Vec<Hit> {
        self.hits()
            .into_iter()
            .filter(|hit| hit.path.starts_with(prefix))
            .collect()
    }
}

fn has_auth(headers: &HeaderMap, expected: &str) -> bool {
    headers.get("authorization").and_then(|v| v.to_str().ok()) == Some(expected)
}

async fn account(State(state): State<Downstream>, Path(id): Path<String>, headers: HeaderMap) -> Response {
    state.record("GET", format!("/v5/accounts/{}", id), &headers, None);

    if !has_auth(&headers, &format!("Bearer {}", BEARER_TOKEN)) {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    let account_code = match id.as_str() {
        ACCOUNT_ID => "A1",
        BROKEN_GATEWAY_ACCOUNT_ID => "BROKEN",
        _ => return StatusCode::NOT_FOUND.into_response(),
    };

    Json(json!({
        "accountCode": account_code,
        "companyId": "C1",
        "partitions": [
            { "id": "P0", "number": "1" },
            { "id": "P1", "number": "3" }
        ]
    }))
    .into_response()
}

async fn login(State(state): State<Downstream>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    state.record("POST", "/server/v2/auth".to_string(), &headers, Some(body.clone()));

    if !has_auth(&headers, BASIC_CREDENTIALS) || body != json!({ "type": "WEB" }) {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    LOGIN_TOKEN.into_response()
}

async fn receiver(
    State(state): State<Downstream>,
    Path((account_id, receiver_id)): Path<(String, String)>,
    headers: HeaderMap,
) -> Response {
    state.record(
        "GET",
        format!("/v1/accounts/{}/receivers/{}", account_id, receiver_id),
        &headers,
        None,
    );

    if !has_auth(&headers, &format!("Bearer {}", LOGIN_TOKEN)) {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    if receiver_id != RECEIVER_ID {
        return StatusCode::NOT_FOUND.into_response();
    }

    Json(json!({ "id": receiver_id, "name": "Front Door" })).into_response()
}

async fn gateway(
    State(state): State<Downstream>,
    Path((account_code, partition)): Path<(String, String)>,
    headers: HeaderMap,
) -> Response {
    state.record(
        "GET",
        format!("/conversor_get_post/portao/open/{}/{}", account_code, partition),
        &headers,
        None,
    );

    if account_code == "BROKEN" {
        return StatusCode::SERVICE_UNAVAILABLE.into_response();
    }

    Json(json!({ "opened": true, "account": account_code, "partition": partition })).into_response()
}

async fn events(State(state): State<Downstream>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    state.record("POST", "/v2/events/accessControl".to_string(), &headers, Some(body));

    if !has_auth(&headers, &format!("Bearer {}", BEARER_TOKEN)) {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    (StatusCode::CREATED, Json(json!({ "received": 1 }))).into_response()
}

pub async fn serve(router: Router) -> Result<u16> {
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .with_context(|| format!("failed to bind port {}", port))?;

    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });

    Ok(port)
}

/// Mock Sigma Cloud + device gateway and the opening API wired to it
pub struct Harness {
    pub api_url: String,
    pub downstream_port: u16,
    pub downstream: Downstream,
}

impl Harness {
    pub async fn start() -> Result<Self> {
        Self::start_with_password(PASSWORD).await
    }

    pub async fn start_with_password(password: &str) -> Result<Self> {
        let downstream = Downstream::default();
        let mock = Router::new()
            .route("/v5/accounts/:id", get(account))
            .route("/server/v2/auth", post(login))
            .route("/v1/accounts/:account_id/receivers/:receiver_id", get(receiver))
            .route("/conversor_get_post/portao/open/:account_code/:partition", get(gateway))
            .route("/v2/events/accessControl", post(events))
            .with_state(downstream.clone());
        let downstream_port = serve(mock).await?;

        let settings = OpeningSettings {
            sigma: SigmaCloudConfig {
                api_url: format!("http://127.0.0.1:{}", downstream_port),
                auth_url: format!("http://127.0.0.1:{}/server/v2/auth", downstream_port),
                bearer_token: BEARER_TOKEN.to_string(),
                username: USERNAME.to_string(),
                password: password.to_string(),
            },
            gateway_base_url: "http://127.0.0.1".to_string(),
            partition_id_check: PartitionIdCheck::Required,
        };
        let transport = ReqwestTransport::new(Duration::from_secs(5))?;
        let service = OpeningService::new(Arc::new(transport), settings);
        let api_port = serve(app(AppState::new(service))).await?;

        Ok(Self {
            api_url: format!("http://127.0.0.1:{}", api_port),
            downstream_port,
            downstream,
        })
    }

    /// A complete opening request targeting the mock gateway
    pub fn request(&self, account_id: &str, partition_id: &str, receiver_id: &str) -> Value {
        json!({
            "accountId": account_id,
            "code": "E100",
            "complement": "Remote opening",
            "partitionId": partition_id,
            "receiverDescription": "Caller supplied description",
            "receiverId": receiver_id,
            "server": self.downstream_port.to_string()
        })
    }

    pub async fn open(&self, body: &Value) -> Result<(StatusCode, Value)> {
        let response = reqwest::Client::new()
            .post(format!("{}/api/opening?channel=test", self.api_url))
            .header("x-request-source", "integration")
            .json(body)
            .send()
            .await?;

        let status = StatusCode::from_u16(response.status().as_u16())?;
        Ok((status, response.json::<Value>().await?))
    }
}
