use clap::Args;
use serde_json::json;

use crate::api::ResponseEnvelope;
use crate::cli::utils::{output_envelope, output_error};
use crate::cli::OutputFormat;

#[derive(Args, Debug)]
pub struct OpenArgs {
    #[arg(long, help = "Sigma Cloud account id")]
    pub account_id: String,
    #[arg(long, help = "Event code recorded with the opening")]
    pub code: String,
    #[arg(long, help = "Event complement recorded with the opening")]
    pub complement: String,
    #[arg(long, help = "Partition id within the account")]
    pub partition_id: String,
    #[arg(long, help = "Receiver description")]
    pub receiver_description: String,
    #[arg(long, help = "Receiver id within the account")]
    pub receiver_id: String,
    #[arg(long, help = "Gateway port for this installation")]
    pub server: String,
}

pub async fn handle(base_url: &str, args: OpenArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let payload = json!({
        "accountId": args.account_id,
        "code": args.code,
        "complement": args.complement,
        "partitionId": args.partition_id,
        "receiverDescription": args.receiver_description,
        "receiverId": args.receiver_id,
        "server": args.server,
    });

    let client = reqwest::Client::new();
    let response = client
        .post(format!("{}/api/opening", base_url))
        .json(&payload)
        .send()
        .await;

    let response = match response {
        Ok(r) => r,
        Err(e) => {
            output_error(&output_format, &format!("Could not reach {}: {}", base_url, e), Some("UNREACHABLE"))?;
            anyhow::bail!("request to {} failed", base_url);
        }
    };

    let envelope: ResponseEnvelope = response.json().await?;
    output_envelope(&output_format, &envelope)?;

    if !envelope.status {
        anyhow::bail!(
            "{}",
            envelope.message.unwrap_or_else(|| format!("status {}", envelope.status_code))
        );
    }
    Ok(())
}
