// Dashboard service - Polls the device and keeps the view current
use crate::application::chart_renderer::ChartRenderer;
use crate::application::device_api::DeviceApi;
use crate::application::status_panel::StatusPanel;
use crate::domain::sample::{parse_log, Sample};
use crate::domain::status::StatusReadout;
use crate::domain::time_label::relative_labels;
use anyhow::Context;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Shortest period a poll loop runs at.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Everything the dashboard shows.
pub struct DashboardView {
    pub status: StatusPanel,
    pub chart: ChartRenderer,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PollIntervals {
    pub status: Duration,
    pub log: Duration,
}

impl Default for PollIntervals {
    fn default() -> Self {
        Self {
            status: Duration::from_millis(5000),
            log: Duration::from_millis(5000),
        }
    }
}

#[derive(Clone)]
pub struct DashboardService {
    api: Arc<dyn DeviceApi>,
    view: Arc<Mutex<DashboardView>>,
}

impl DashboardService {
    pub fn new(api: Arc<dyn DeviceApi>, view: DashboardView) -> Self {
        Self {
            api,
            view: Arc::new(Mutex::new(view)),
        }
    }

    pub fn view(&self) -> Arc<Mutex<DashboardView>> {
        self.view.clone()
    }

    /// Fetch `/api/status` once and update the status panel.
    pub async fn status_cycle(&self) -> anyhow::Result<StatusReadout> {
        let status = self
            .api
            .fetch_status()
            .await
            .context("Failed to fetch device status")?;

        // The lock is taken only after the request has completed
        let mut view = self.view.lock().await;
        let readout = view
            .status
            .update(&status)
            .context("Failed to draw status panel")?;
        Ok(readout.clone())
    }

    /// Fetch `/api/log` once, relabel it and replace the chart contents.
    /// Returns the number of samples drawn.
    pub async fn log_cycle(&self) -> anyhow::Result<usize> {
        let body = self
            .api
            .fetch_log()
            .await
            .context("Failed to fetch device log")?;

        let samples: Vec<Sample> = parse_log(&body).collect();
        let labels = relative_labels(&samples);
        let count = samples.len();

        self.view
            .lock()
            .await
            .chart
            .refresh(labels, samples)
            .context("Failed to draw chart")?;
        Ok(count)
    }

    /// Start both poll loops. Each fires immediately, then once per period,
    /// until the returned [`Poller`] is stopped or dropped with the runtime.
    pub fn start(&self, intervals: PollIntervals) -> Poller {
        Poller {
            status_task: spawn_status_loop(self.clone(), intervals.status),
            log_task: spawn_log_loop(self.clone(), intervals.log),
        }
    }
}

pub struct Poller {
    status_task: JoinHandle<()>,
    log_task: JoinHandle<()>,
}

impl Poller {
    pub fn stop(self) {
        self.status_task.abort();
        self.log_task.abort();
    }
}

fn ticker(period: Duration) -> tokio::time::Interval {
    let mut ticker = tokio::time::interval(period.max(MIN_POLL_INTERVAL));
    // A slow request postpones the next cycle of its own loop only
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}

fn spawn_status_loop(service: DashboardService, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = ticker(period);
        loop {
            ticker.tick().await;
            match service.status_cycle().await {
                Ok(readout) => tracing::debug!(
                    heater = %readout.heater_percent,
                    temperature = %readout.sensor_temp,
                    "status updated"
                ),
                Err(e) => tracing::warn!("Status cycle failed: {:#}", e),
            }
        }
    })
}

fn spawn_log_loop(service: DashboardService, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = ticker(period);
        loop {
            ticker.tick().await;
            match service.log_cycle().await {
                Ok(count) => tracing::debug!("chart refreshed with {} samples", count),
                Err(e) => tracing::warn!("Log cycle failed: {:#}", e),
            }
        }
    })
}
