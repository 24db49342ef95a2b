//! A-Frame Index API client
//!
//! Submits a deployed site URL to the Index and returns the canonical
//! works URL. The whole round trip is bounded by a timeout.

use std::time::Duration;

use serde_json::Value;
use tracing::info;

use crate::error::{Error, Result};

/// Production Index API base URL
pub const DEFAULT_INDEX_API: &str = "https://index-api.aframe.io";

/// Env var overriding the Index API base, used by tests
pub const INDEX_API_ENV: &str = "AFRAME_INDEX_API";

fn api_base() -> String {
    std::env::var(INDEX_API_ENV).unwrap_or_else(|_| DEFAULT_INDEX_API.to_string())
}

/// Submit a deployed site URL to the Index.
///
/// Returns the works URL for the submitted site. Rejection, a malformed
/// response, and timeout all map to `Error::Submit`.
pub async fn submit_to_index(site_url: &str, submit_timeout: Duration) -> Result<String> {
    let base = api_base();
    info!("Submitting site \"{}\" to the A-Frame Index", site_url);

    let send = async {
        let client = reqwest::Client::new();
        let response = client
            .post(format!("{base}/api/manifests"))
            .form(&[("url", site_url)])
            .send()
            .await?
            .error_for_status()
            .map_err(|e| Error::submit(e.to_string()))?;
        let json: Value = response.json().await?;
        Ok::<Value, Error>(json)
    };

    let json = tokio::time::timeout(submit_timeout, send)
        .await
        .map_err(|_| {
            Error::submit(format!(
                "could not reach the Index API at {base} (timed out after {} seconds)",
                submit_timeout.as_secs()
            ))
        })??;

    let work_idx = json
        .get("_work_idx")
        .and_then(|v| {
            v.as_str()
                .map(str::to_string)
                .or_else(|| v.as_i64().map(|n| n.to_string()))
        })
        .ok_or_else(|| Error::submit("response carried no _work_idx"))?;

    let works_url = format!("{base}/api/works/{work_idx}");
    info!("Submitted site \"{}\": {}", site_url, works_url);
    Ok(works_url)
}
