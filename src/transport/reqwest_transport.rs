use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde_json::Value;
use std::time::Duration;

use super::{Auth, BasicLogin, HttpTransport, TransportError, TransportResult};

/// `reqwest`-backed transport.
///
/// The inner client only carries connection pooling and the timeout; no
/// credentials live on it between calls.
#[derive(Clone, Debug)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> TransportResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    async fn login(&self, login: &BasicLogin) -> TransportResult<String> {
        let url = parse_url(&login.auth_url)?;
        tracing::debug!("POST {} (login for {})", url, login.username);

        let response = self
            .client
            .post(url)
            .basic_auth(&login.username, Some(&login.password))
            .json(&login.body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Login(format!(
                "auth endpoint returned status {}",
                status.as_u16()
            )));
        }

        let body = response.text().await?;
        (login.extract_token)(&body)
            .ok_or_else(|| TransportError::Login("no token in login response".to_string()))
    }

    async fn authorize(&self, builder: RequestBuilder, auth: &Auth) -> TransportResult<RequestBuilder> {
        match auth {
            Auth::None => Ok(builder),
            Auth::Bearer(token) => Ok(builder.bearer_auth(token)),
            Auth::BasicThenBearer(login) => {
                let token = self.login(login).await?;
                Ok(builder.bearer_auth(token))
            }
        }
    }

    async fn send(
        &self,
        method: &'static str,
        url: &str,
        builder: RequestBuilder,
        missing_on_not_found: bool,
    ) -> TransportResult<Option<Value>> {
        let response = builder.send().await?;
        let status = response.status();

        if status == StatusCode::NO_CONTENT
            || (missing_on_not_found && status == StatusCode::NOT_FOUND)
        {
            tracing::debug!("{} {} -> {} (no entity)", method, url, status.as_u16());
            return Ok(None);
        }

        if !status.is_success() {
            return Err(TransportError::Status {
                method,
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let text = response.text().await?;
        tracing::debug!("{} {} -> {} ({} bytes)", method, url, status.as_u16(), text.len());
        Ok(parse_body(&text))
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn lookup(&self, url: &str, auth: &Auth) -> TransportResult<Option<Value>> {
        tracing::debug!("GET {} (auth: {}, lookup)", url, auth.scheme());
        let builder = self.client.get(parse_url(url)?);
        let builder = self.authorize(builder, auth).await?;
        self.send("GET", url, builder, true).await
    }

    async fn get(&self, url: &str, auth: &Auth) -> TransportResult<Option<Value>> {
        tracing::debug!("GET {} (auth: {})", url, auth.scheme());
        let builder = self.client.get(parse_url(url)?);
        let builder = self.authorize(builder, auth).await?;
        self.send("GET", url, builder, false).await
    }

    async fn post(&self, url: &str, auth: &Auth, body: &Value) -> TransportResult<Option<Value>> {
        tracing::debug!("POST {} (auth: {})", url, auth.scheme());
        let builder = self.client.post(parse_url(url)?).json(body);
        let builder = self.authorize(builder, auth).await?;
        self.send("POST", url, builder, false).await
    }
}

fn parse_url(raw: &str) -> TransportResult<Url> {
    Url::parse(raw).map_err(|e| TransportError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })
}

/// Empty and `null` bodies carry no entity; non-JSON text is kept as a string.
fn parse_body(text: &str) -> Option<Value> {
    if text.trim().is_empty() {
        return None;
    }

    match serde_json::from_str::<Value>(text) {
        Ok(Value::Null) => None,
        Ok(value) => Some(value),
        Err(_) => Some(Value::String(text.to_string())),
    }
}
