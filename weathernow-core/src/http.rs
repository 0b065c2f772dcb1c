use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{LookupError, truncate_body};

pub(crate) fn client(timeout_secs: u64) -> anyhow::Result<Client> {
    let client = Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(concat!("weathernow/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}

/// Send `request` and decode a JSON body, mapping every failure to `Transport`.
pub(crate) async fn get_json<T: DeserializeOwned>(
    request: RequestBuilder,
    what: &str,
) -> Result<T, LookupError> {
    let res = request
        .send()
        .await
        .map_err(|e| LookupError::Transport(format!("{what} request failed: {e}")))?;

    let status = res.status();
    let body = res
        .text()
        .await
        .map_err(|e| LookupError::Transport(format!("failed to read {what} body: {e}")))?;

    if !status.is_success() {
        return Err(LookupError::Transport(format!(
            "{what} request failed with status {status}: {}",
            truncate_body(&body)
        )));
    }

    debug!(what, bytes = body.len(), "response received");

    serde_json::from_str(&body)
        .map_err(|e| LookupError::Transport(format!("failed to parse {what} JSON: {e}")))
}
