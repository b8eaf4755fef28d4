// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod http_device;
pub mod simulated_device;
pub mod terminal_surface;
