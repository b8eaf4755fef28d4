// Application state for the simulator's HTTP handlers
use crate::infrastructure::simulated_device::SimulatedDevice;
use std::sync::Mutex;

pub struct AppState {
    pub device: Mutex<SimulatedDevice>,
}

impl AppState {
    pub fn new(device: SimulatedDevice) -> Self {
        Self {
            device: Mutex::new(device),
        }
    }
}
