//! Usage: Advisory HTTP health probe against the backend service.

use serde::Serialize;
use std::time::Duration;

const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct HealthStatus {
    pub reachable: bool,
    pub status_code: Option<u16>,
}

/// Best-effort probe of `GET /health`; only a 200 counts as reachable.
/// The result is advisory and must never stop or restart the backend.
pub(crate) async fn probe(client: &reqwest::Client, port: u16) -> HealthStatus {
    let url = format!("http://127.0.0.1:{port}/health");
    match client.get(&url).timeout(PROBE_TIMEOUT).send().await {
        Ok(response) => HealthStatus {
            reachable: response.status() == reqwest::StatusCode::OK,
            status_code: Some(response.status().as_u16()),
        },
        Err(err) => {
            tracing::debug!(url = %url, "健康检查请求失败: {}", err);
            HealthStatus {
                reachable: false,
                status_code: None,
            }
        }
    }
}
