// Main entry point - Configuration, dependency injection and command dispatch
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use barepid_dashboard::application::chart_renderer::ChartRenderer;
use barepid_dashboard::application::config_service::ConfigService;
use barepid_dashboard::application::dashboard_service::{DashboardService, DashboardView};
use barepid_dashboard::application::device_api::DeviceApi;
use barepid_dashboard::application::status_panel::StatusPanel;
use barepid_dashboard::infrastructure::config::{load_dashboard_config, DashboardConfig};
use barepid_dashboard::infrastructure::http_device::HttpDevice;
use barepid_dashboard::infrastructure::simulated_device::SimulatedDevice;
use barepid_dashboard::infrastructure::terminal_surface::{LogTable, TerminalSurface};
use barepid_dashboard::presentation::cli::{Cli, Command, ConfigAction};
use barepid_dashboard::presentation::router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing; stdout is reserved for the dashboard itself
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = cli.config.as_deref();

    match cli.command.unwrap_or(Command::Watch) {
        Command::Watch => {
            let (config, api) = connect(settings, cli.device)?;
            watch(api, &config).await
        }
        Command::Status => {
            let (config, api) = connect(settings, cli.device)?;
            dashboard(api, &config).status_cycle().await?;
            Ok(())
        }
        Command::Log => {
            let (config, api) = connect(settings, cli.device)?;
            let view = DashboardView {
                status: StatusPanel::new(Box::new(TerminalSurface::stdout(
                    config.chart_width,
                    config.chart_height,
                ))),
                chart: ChartRenderer::new(Box::new(LogTable::stdout())),
            };
            let count = DashboardService::new(api, view).log_cycle().await?;
            tracing::debug!("Printed {} samples", count);
            Ok(())
        }
        Command::Config { action } => {
            let (_, api) = connect(settings, cli.device)?;
            configure(ConfigService::new(api), action).await
        }
        Command::Restart => {
            let (_, api) = connect(settings, cli.device)?;
            ConfigService::new(api).restart().await
        }
        Command::Simulate { bind, setpoint } => simulate(bind, setpoint).await,
    }
}

/// Load settings and build the HTTP client for the configured device.
fn connect(
    settings: Option<&Path>,
    device: Option<String>,
) -> anyhow::Result<(DashboardConfig, Arc<dyn DeviceApi>)> {
    let config = load_dashboard_config(settings, device)?;
    let api: Arc<dyn DeviceApi> = Arc::new(HttpDevice::new(
        &config.device_url,
        config.request_timeout(),
    )?);
    Ok((config, api))
}

fn dashboard(api: Arc<dyn DeviceApi>, config: &DashboardConfig) -> DashboardService {
    let view = DashboardView {
        status: StatusPanel::new(Box::new(TerminalSurface::stdout(
            config.chart_width,
            config.chart_height,
        ))),
        chart: ChartRenderer::new(Box::new(TerminalSurface::stdout(
            config.chart_width,
            config.chart_height,
        ))),
    };
    DashboardService::new(api, view)
}

async fn watch(api: Arc<dyn DeviceApi>, config: &DashboardConfig) -> anyhow::Result<()> {
    tracing::info!("Watching {}", config.device_url);

    let poller = dashboard(api, config).start(config.poll_intervals());
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl-C")?;
    poller.stop();

    tracing::info!("Stopped");
    Ok(())
}

async fn configure(service: ConfigService, action: ConfigAction) -> anyhow::Result<()> {
    let mut form = service.load_form().await?;

    match action {
        ConfigAction::Show => {
            for (name, value) in form.fields() {
                println!("{} = {}", name, value);
            }
        }
        ConfigAction::Set { fields } => {
            for (name, value) in fields {
                form.set(&name, value)?;
            }
            service.submit(&form).await?;
        }
    }
    Ok(())
}

async fn simulate(bind: std::net::SocketAddr, setpoint: f64) -> anyhow::Result<()> {
    let app = router::simulator(SimulatedDevice::new(setpoint));

    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("Failed to bind {}", bind))?;
    tracing::info!("Simulated barepid listening on http://{}", bind);

    axum::serve(listener, app).await?;
    Ok(())
}
