//! # Opening Service
//!
//! Opens a gate on behalf of an account and records the action in Sigma Cloud.
//!
//! Stages run strictly in order, each feeding the next:
//! validate → account → partition → receiver → gateway → audit event.
//! Any stage can stop the pipeline; the outcome is always rendered as one
//! `ResponseEnvelope`.

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

use crate::api::{RequestEcho, ResponseEnvelope};
use crate::config::{AppConfig, PartitionIdCheck, SigmaCloudConfig};
use crate::error::OpeningError;
use crate::models::{
    AccessControlEvent, AccountMap, EventBatch, OpeningRequest, PartitionMap, ReceiverMap, EVENT_ID,
    PROTOCOL_TYPE,
};
use crate::transport::{Auth, BasicLogin, HttpTransport};

pub mod endpoints;
pub mod validate;


const LOCATION: &str = "services::opening::create_opening";

/// Settings the pipeline reads from process configuration
#[derive(Debug, Clone)]
pub struct OpeningSettings {
    pub sigma: SigmaCloudConfig,
    pub gateway_base_url: String,
    pub partition_id_check: PartitionIdCheck,
}

impl From<&AppConfig> for OpeningSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            sigma: config.sigma.clone(),
            gateway_base_url: config.gateway.base_url.clone(),
            partition_id_check: config.validation.partition_id_check,
        }
    }
}

pub struct OpeningService {
    transport: Arc<dyn HttpTransport>,
    settings: OpeningSettings,
}

impl OpeningService {
    pub fn new(transport: Arc<dyn HttpTransport>, settings: OpeningSettings) -> Self {
        Self { transport, settings }
    }

    /// Run the pipeline and render its outcome. Never fails: unexpected
    /// errors are logged here and become a 500 envelope.
    pub async fn create_opening(&self, echo: &RequestEcho) -> ResponseEnvelope {
        match self.execute(&echo.body).await {
            Ok(data) => ResponseEnvelope::success(echo, data),
            Err(err) if err.is_unexpected() => {
                tracing::error!(
                    timestamp = %echo.timestamp,
                    location = LOCATION,
                    "Opening failed: {}",
                    err
                );
                ResponseEnvelope::failure(echo, &err)
            }
            Err(err) => {
                tracing::warn!("Opening rejected ({}): {}", err.status_code().as_u16(), err);
                ResponseEnvelope::failure(echo, &err)
            }
        }
    }

    /// The pipeline proper; returns the gateway's response payload
    pub async fn execute(&self, body: &Value) -> Result<Value, OpeningError> {
        let request = validate::validate(body, self.settings.partition_id_check)?;
        let account = self.resolve_account(&request).await?;
        let partition = resolve_partition(&request, &account)?;
        let receiver = self.resolve_receiver(&request).await?;
        let data = self.actuate(&request, &account, partition).await?;
        self.report_audit(&request, &account, &receiver).await?;

        tracing::info!(
            "Opened account {} partition {} via server {}",
            account.account_code,
            request.partition_id,
            request.server
        );
        Ok(data)
    }

    async fn resolve_account(&self, request: &OpeningRequest) -> Result<AccountMap, OpeningError> {
        let url = endpoints::account_url(&self.settings.sigma.api_url, &request.account_id);
        let found = self.transport.lookup(&url, &self.bearer()).await?;

        decode::<AccountMap>("account", found)?.ok_or_else(|| OpeningError::AccountNotFound {
            account_id: request.account_id.clone(),
        })
    }

    async fn resolve_receiver(&self, request: &OpeningRequest) -> Result<ReceiverMap, OpeningError> {
        let url = endpoints::receiver_url(
            &self.settings.sigma.api_url,
            &request.account_id,
            &request.receiver_id,
        );
        let found = self.transport.lookup(&url, &self.receiver_login()).await?;

        decode::<ReceiverMap>("receiver", found)?.ok_or_else(|| OpeningError::ReceiverNotFound {
            account_id: request.account_id.clone(),
            receiver_id: request.receiver_id.clone(),
        })
    }

    /// Trigger the physical opening. The gateway trusts the network, not a token.
    async fn actuate(
        &self,
        request: &OpeningRequest,
        account: &AccountMap,
        partition: &PartitionMap,
    ) -> Result<Value, OpeningError> {
        let partition_number = partition
            .number
            .leading_int()
            .ok_or_else(|| OpeningError::InvalidPartitionNumber(partition.number.to_string()))?;

        let url = endpoints::gateway_open_url(
            &self.settings.gateway_base_url,
            &request.server,
            &account.account_code,
            partition_number,
        );
        let response = self.transport.get(&url, &Auth::None).await?;

        Ok(response.unwrap_or(Value::Null))
    }

    /// Record the opening. Runs after the gateway call; a failure here does
    /// not undo the opening.
    async fn report_audit(
        &self,
        request: &OpeningRequest,
        account: &AccountMap,
        receiver: &ReceiverMap,
    ) -> Result<(), OpeningError> {
        let batch = EventBatch::single(AccessControlEvent {
            account: account.account_code.clone(),
            code: request.code.clone(),
            company_id: account.company_id.clone(),
            complement: request.complement.clone(),
            event_id: EVENT_ID.to_string(),
            protocol_type: PROTOCOL_TYPE.to_string(),
            receiver_description: receiver.name.clone(),
        });
        let body = serde_json::to_value(&batch).map_err(|e| OpeningError::invalid_payload("event", e))?;

        let url = endpoints::access_control_events_url(&self.settings.sigma.api_url);
        self.transport.post(&url, &self.bearer(), &body).await?;
        Ok(())
    }

    fn bearer(&self) -> Auth {
        Auth::Bearer(self.settings.sigma.bearer_token.clone())
    }

    fn receiver_login(&self) -> Auth {
        Auth::BasicThenBearer(BasicLogin::new(
            self.settings.sigma.auth_url.clone(),
            self.settings.sigma.username.clone(),
            self.settings.sigma.password.clone(),
        ))
    }
}

fn resolve_partition<'a>(request: &OpeningRequest, account: &'a AccountMap) -> Result<&'a PartitionMap, OpeningError> {
    account
        .find_partition(&request.partition_key)
        .ok_or_else(|| OpeningError::PartitionNotFound {
            account_id: request.account_id.clone(),
            partition_id: request.partition_id.clone(),
        })
}

fn decode<T: DeserializeOwned>(service: &'static str, found: Option<Value>) -> Result<Option<T>, OpeningError> {
    found
        .map(serde_json::from_value::<T>)
        .transpose()
        .map_err(|e| OpeningError::invalid_payload(service, e))
}
