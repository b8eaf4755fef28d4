// Presentation layer - Command line and the simulator's HTTP surface
pub mod app_state;
pub mod cli;
pub mod handlers;
pub mod router;
