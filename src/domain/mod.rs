// Domain layer - Device data and the pure transformations applied to it
pub mod config_form;
pub mod sample;
pub mod status;
pub mod time_label;
