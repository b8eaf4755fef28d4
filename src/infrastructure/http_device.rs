// HTTP implementation of the device API
use crate::application::device_api::DeviceApi;
use crate::domain::status::DeviceStatus;
use anyhow::Result;
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde_json::{Map, Value};
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    #[error("request to {url} failed")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} answered {status}: {body}")]
    Status {
        url: String,
        status: StatusCode,
        body: String,
    },
    #[error("could not decode response from {url}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

#[derive(Debug, Clone)]
pub struct HttpDevice {
    base_url: String,
    client: Client,
}

impl HttpDevice {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: builder.build()?,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get(&self, path: &str) -> Result<(String, Response), DeviceError> {
        let url = self.url(path);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| DeviceError::Transport {
                url: url.clone(),
                source,
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DeviceError::Status { url, status, body });
        }

        Ok((url, response))
    }

    /// POST and ignore the answer beyond logging a non-success status.
    async fn post(&self, path: &str, body: Option<&Map<String, Value>>) -> Result<(), DeviceError> {
        let url = self.url(path);
        let mut request = self.client.post(&url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|source| DeviceError::Transport {
                url: url.clone(),
                source,
            })?;

        if !response.status().is_success() {
            tracing::warn!("{} answered {}", url, response.status());
        }
        Ok(())
    }
}

#[async_trait]
impl DeviceApi for HttpDevice {
    async fn fetch_status(&self) -> Result<DeviceStatus> {
        let (url, response) = self.get("/api/status").await?;
        let status = response
            .json::<DeviceStatus>()
            .await
            .map_err(|source| DeviceError::Decode { url, source })?;
        Ok(status)
    }

    async fn fetch_log(&self) -> Result<String> {
        let (url, response) = self.get("/api/log").await?;
        let body = response
            .text()
            .await
            .map_err(|source| DeviceError::Decode { url, source })?;
        Ok(body)
    }

    async fn fetch_config(&self) -> Result<Map<String, Value>> {
        let (url, response) = self.get("/api/config").await?;
        let config = response
            .json::<Map<String, Value>>()
            .await
            .map_err(|source| DeviceError::Decode { url, source })?;
        Ok(config)
    }

    async fn post_config(&self, config: &Map<String, Value>) -> Result<()> {
        tracing::debug!("Posting {} config fields", config.len());
        Ok(self.post("/api/config", Some(config)).await?)
    }

    async fn restart(&self) -> Result<()> {
        Ok(self.post("/api/restart", None).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::simulated_device::SimulatedDevice;
    use crate::presentation::router;
    use serde_json::json;

    async fn serve_simulator() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = router::simulator(SimulatedDevice::seeded(96.0, 7));
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/", addr)
    }

    #[tokio::test]
    async fn test_round_trip_against_simulator() {
        let device = HttpDevice::new(&serve_simulator().await, Some(Duration::from_secs(5))).unwrap();

        let status = device.fetch_status().await.unwrap();
        assert!(status.input.is_finite());
        assert_eq!(status.setpoint, Some(96.0));

        let log = device.fetch_log().await.unwrap();
        assert!(log.starts_with("time,temperature\n"));

        let config = device.fetch_config().await.unwrap();
        assert_eq!(config["wlan_ap_ssid"], json!("barepid"));

        let mut update = Map::new();
        update.insert("setpoint".into(), json!("90.5"));
        update.insert("wlan_join_ssid".into(), json!("Home"));
        device.post_config(&update).await.unwrap();

        let config = device.fetch_config().await.unwrap();
        assert_eq!(config["setpoint"], json!(90.5));
        assert_eq!(config["wlan_join_ssid"], json!("Home"));

        device.restart().await.unwrap();
    }

    #[tokio::test]
    async fn test_rejected_config_is_not_an_error() {
        let device = HttpDevice::new(&serve_simulator().await, None).unwrap();

        let mut update = Map::new();
        update.insert("setpoint".into(), json!("500"));
        device.post_config(&update).await.unwrap();

        let config = device.fetch_config().await.unwrap();
        assert_eq!(config["setpoint"], json!(96.0));
    }

    #[tokio::test]
    async fn test_config_is_posted_as_json() {
        use axum::extract::State;
        use axum::http::{header::CONTENT_TYPE, HeaderMap};
        use std::sync::{Arc, Mutex};

        type Received = Arc<Mutex<Vec<(Option<String>, String)>>>;

        async fn record(
            State(received): State<Received>,
            headers: HeaderMap,
            body: String,
        ) -> axum::http::StatusCode {
            let content_type = headers
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            received.lock().unwrap().push((content_type, body));
            axum::http::StatusCode::NO_CONTENT
        }

        let received = Received::default();
        let app = axum::Router::new()
            .route("/api/config", axum::routing::post(record))
            .with_state(received.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let device = HttpDevice::new(&format!("http://{}", addr), None).unwrap();
        let mut update = Map::new();
        update.insert("setpoint".into(), json!("90.5"));
        device.post_config(&update).await.unwrap();

        let received = received.lock().unwrap();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].0.as_deref(), Some("application/json"));
        let body: Value = serde_json::from_str(&received[0].1).unwrap();
        assert_eq!(body, json!({ "setpoint": "90.5" }));
    }

    #[tokio::test]
    async fn test_unreachable_device_is_a_transport_error() {
        let device = HttpDevice::new("http://127.0.0.1:9", Some(Duration::from_millis(500))).unwrap();
        let err = device.fetch_status().await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DeviceError>(),
            Some(DeviceError::Transport { .. })
        ));
    }

    #[tokio::test]
    async fn test_unknown_route_is_a_status_error() {
        let device = HttpDevice::new(&serve_simulator().await, None).unwrap();
        let err = device.get("/api/missing").await.unwrap_err();
        assert!(matches!(err, DeviceError::Status { status, .. } if status == StatusCode::NOT_FOUND));
    }
}
