// Application layer - Use cases driving the device API and the view
pub mod chart_renderer;
pub mod config_service;
pub mod dashboard_service;
pub mod device_api;
pub mod status_panel;
