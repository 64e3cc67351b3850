use serde_json::{json, Value};

use crate::api::ResponseEnvelope;
use crate::cli::OutputFormat;

/// Output a success message in the appropriate format
pub fn output_success(
    output_format: &OutputFormat,
    message: &str,
    data: Option<Value>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let (Some(Value::Object(extra)), Some(target)) = (data, response.as_object_mut()) {
                target.extend(extra);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output an error message in the appropriate format
pub fn output_error(
    output_format: &OutputFormat,
    message: &str,
    error_code: Option<&str>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": false,
                "error": message
            });

            if let Some(code) = error_code {
                response["error_code"] = json!(code);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            eprintln!("Error: {}", message);
        }
    }
    Ok(())
}

/// Print an envelope returned by the API; JSON mode prints it verbatim
pub fn output_envelope(output_format: &OutputFormat, envelope: &ResponseEnvelope) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(envelope)?);
        }
        OutputFormat::Text => {
            if envelope.status {
                println!("✓ Gate opened ({})", envelope.status_code);
                if let Some(data) = envelope.data.as_ref().filter(|d| !d.is_null()) {
                    println!("Gateway response: {}", data);
                }
            } else {
                eprintln!(
                    "Error ({}): {}",
                    envelope.status_code,
                    envelope.message.as_deref().unwrap_or("request failed")
                );
                if let Some(suggestion) = &envelope.suggestion {
                    eprintln!("{}", suggestion);
                }
            }
            println!("Timestamp: {}", envelope.timestamp);
        }
    }
    Ok(())
}
