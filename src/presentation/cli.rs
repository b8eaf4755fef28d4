// Command line interface
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "barepid-dashboard", version, about = "Live dashboard for a barepid temperature controller")]
pub struct Cli {
    /// Base URL of the device, e.g. http://192.168.4.1
    #[arg(long, global = true)]
    pub device: Option<String>,

    /// Settings file (defaults to config/dashboard.* when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand, PartialEq)]
pub enum Command {
    /// Poll status and log, redrawing until Ctrl-C (default)
    Watch,
    /// Print the current status once
    Status,
    /// Print the current log as CSV, one `label,temperature` row per sample
    Log,
    /// Read or change the device configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Restart the device
    Restart,
    /// Serve a simulated device for local development
    Simulate {
        #[arg(long, default_value = "127.0.0.1:8080")]
        bind: SocketAddr,
        /// Initial setpoint of the simulated process
        #[arg(long, default_value_t = 98.0)]
        setpoint: f64,
    },
}

#[derive(Debug, Subcommand, PartialEq)]
pub enum ConfigAction {
    /// Print the configuration form as loaded from the device
    Show,
    /// Load the form, change the given fields and submit all of them
    Set {
        /// Assignments such as setpoint=96.5
        #[arg(required = true, value_parser = parse_assignment)]
        fields: Vec<(String, String)>,
    },
}

fn parse_assignment(arg: &str) -> Result<(String, String), String> {
    arg.split_once('=')
        .map(|(name, value)| (name.trim().to_string(), value.to_string()))
        .filter(|(name, _)| !name.is_empty())
        .ok_or_else(|| format!("expected NAME=VALUE, got `{arg}`"))
}
