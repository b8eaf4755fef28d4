// Device API trait - the HTTP surface of a barepid controller
use crate::domain::status::DeviceStatus;
use async_trait::async_trait;
use serde_json::{Map, Value};

#[async_trait]
pub trait DeviceApi: Send + Sync {
    /// `GET /api/status`
    async fn fetch_status(&self) -> anyhow::Result<DeviceStatus>;

    /// `GET /api/log`, the raw CSV body
    async fn fetch_log(&self) -> anyhow::Result<String>;

    /// `GET /api/config`
    async fn fetch_config(&self) -> anyhow::Result<Map<String, Value>>;

    /// `POST /api/config`; whatever the device answers is ignored
    async fn post_config(&self, config: &Map<String, Value>) -> anyhow::Result<()>;

    /// `POST /api/restart`
    async fn restart(&self) -> anyhow::Result<()>;
}
