/// Sigma Cloud and device gateway URLs used by the opening pipeline

pub fn account_url(api_url: &str, account_id: &str) -> String {
    format!("{}/v5/accounts/{}", api_url, account_id)
}

pub fn receiver_url(api_url: &str, account_id: &str, receiver_id: &str) -> String {
    format!("{}/v1/accounts/{}/receivers/{}", api_url, account_id, receiver_id)
}

pub fn access_control_events_url(api_url: &str) -> String {
    format!("{}/v2/events/accessControl", api_url)
}

/// `server` is the gateway port for this installation
pub fn gateway_open_url(base_url: &str, server: &str, account_code: &str, partition_number: i64) -> String {
    format!(
        "{}:{}/conversor_get_post/portao/open/{}/{}",
        base_url, server, account_code, partition_number
    )
}
