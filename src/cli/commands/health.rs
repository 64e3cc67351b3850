use serde_json::Value;
use std::time::Duration;

use crate::cli::utils::{output_error, output_success};
use crate::cli::OutputFormat;

pub async fn handle(base_url: &str, output_format: OutputFormat) -> anyhow::Result<()> {
    let client = reqwest::Client::new();
    let url = format!("{}/health", base_url);

    match client.get(&url).timeout(Duration::from_secs(5)).send().await {
        Ok(response) if response.status().is_success() => {
            let body: Value = response.json().await?;
            output_success(&output_format, &format!("{} is up", base_url), body.get("data").cloned())
        }
        Ok(response) => {
            let status = response.status().as_u16();
            output_error(&output_format, &format!("{} returned status {}", url, status), Some("UNHEALTHY"))?;
            anyhow::bail!("server unhealthy")
        }
        Err(e) => {
            output_error(&output_format, &format!("Could not reach {}: {}", url, e), Some("UNREACHABLE"))?;
            anyhow::bail!("server unreachable")
        }
    }
}
