// Config service - Bridges the device configuration and the config form
use crate::application::device_api::DeviceApi;
use crate::domain::config_form::ConfigForm;
use anyhow::Context;
use std::sync::Arc;

#[derive(Clone)]
pub struct ConfigService {
    api: Arc<dyn DeviceApi>,
}

impl ConfigService {
    pub fn new(api: Arc<dyn DeviceApi>) -> Self {
        Self { api }
    }

    /// Build a form pre-filled from `GET /api/config`.
    pub async fn load_form(&self) -> anyhow::Result<ConfigForm> {
        let config = self
            .api
            .fetch_config()
            .await
            .context("Failed to fetch device config")?;

        let mut form = ConfigForm::default();
        let written = form.prefill(&config);
        tracing::debug!("Pre-filled {} config fields", written);
        Ok(form)
    }

    /// Post every field of the form, changed or not.
    pub async fn submit(&self, form: &ConfigForm) -> anyhow::Result<()> {
        self.api
            .post_config(&form.to_json())
            .await
            .context("Failed to submit device config")?;
        tracing::info!("Config submitted");
        Ok(())
    }

    pub async fn restart(&self) -> anyhow::Result<()> {
        self.api.restart().await.context("Failed to restart device")
    }
}
