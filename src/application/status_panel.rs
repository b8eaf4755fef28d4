// Status panel - heater and sensor readouts
use crate::domain::status::{DeviceStatus, StatusReadout};
use std::io;

pub trait StatusSurface: Send {
    fn draw(&mut self, readout: &StatusReadout) -> io::Result<()>;
}

pub struct StatusPanel {
    readout: Option<StatusReadout>,
    surface: Box<dyn StatusSurface>,
}

impl StatusPanel {
    pub fn new(surface: Box<dyn StatusSurface>) -> Self {
        Self {
            readout: None,
            surface,
        }
    }

    pub fn readout(&self) -> Option<&StatusReadout> {
        self.readout.as_ref()
    }

    pub fn update(&mut self, status: &DeviceStatus) -> io::Result<&StatusReadout> {
        let readout = self.readout.insert(StatusReadout::from_status(status));
        self.surface.draw(readout)?;
        Ok(&*readout)
    }
}


#[cfg(test)]
mod tests {
    use super::recording::RecordingStatus;
    use super::*;

    #[test]
    fn test_update_keeps_latest_readout() {
        let surface = RecordingStatus::default();
        let mut panel = StatusPanel::new(Box::new(surface.clone()));
        assert!(panel.readout().is_none());

        panel
            .update(&DeviceStatus {
                output: 255.0,
                input: 23.45,
                setpoint: None,
            })
            .unwrap();
        panel
            .update(&DeviceStatus {
                output: 1000.0,
                input: 96.0,
                setpoint: Some(96.0),
            })
            .unwrap();

        let readout = panel.readout().unwrap();
        assert_eq!(readout.heater_percent, "100.0");
        assert_eq!(readout.sensor_temp, "96.0");
        assert_eq!(readout.setpoint.as_deref(), Some("96.0"));
        assert_eq!(surface.frames.lock().unwrap().len(), 2);
    }
}
