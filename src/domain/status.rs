// Device status domain model
use serde::{Deserialize, Deserializer};

/// Body of `GET /api/status`.
///
/// `output` is the heater drive in tenths of a percent and `input` the
/// sensor temperature. Firmware builds and the development server differ in
/// whether numbers are sent as JSON numbers or strings, so both are accepted.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DeviceStatus {
    #[serde(deserialize_with = "lenient_number")]
    pub output: f64,
    #[serde(deserialize_with = "lenient_number")]
    pub input: f64,
    #[serde(default, deserialize_with = "lenient_optional_number")]
    pub setpoint: Option<f64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

impl NumberOrText {
    fn into_f64(self) -> f64 {
        match self {
            NumberOrText::Number(n) => n,
            NumberOrText::Text(s) => s.trim().parse().unwrap_or(f64::NAN),
        }
    }
}

fn lenient_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(NumberOrText::deserialize(deserializer)?.into_f64())
}

fn lenient_optional_number<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<f64>, D::Error> {
    Ok(Option::<NumberOrText>::deserialize(deserializer)?.map(NumberOrText::into_f64))
}

/// Display strings derived from a [`DeviceStatus`].
#[derive(Debug, Clone, PartialEq)]
pub struct StatusReadout {
    pub heater_percent: String,
    pub sensor_temp: String,
    pub setpoint: Option<String>,
}

impl StatusReadout {
    pub fn from_status(status: &DeviceStatus) -> Self {
        Self {
            heater_percent: format_one_decimal(status.output / 10.0),
            sensor_temp: format_one_decimal(status.input),
            setpoint: status.setpoint.map(format_one_decimal),
        }
    }
}

/// One decimal, halves rounded away from zero (23.45 -> "23.5").
pub fn format_one_decimal(value: f64) -> String {
    format!("{:.1}", (value * 10.0).round() / 10.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_readout_rounding() {
        let status: DeviceStatus = serde_json::from_str(r#"{"output": 255, "input": 23.45}"#).unwrap();
        let readout = StatusReadout::from_status(&status);

        assert_eq!(readout.heater_percent, "25.5");
        assert_eq!(readout.sensor_temp, "23.5");
        assert_eq!(readout.setpoint, None);
    }

    #[test]
    fn test_numeric_strings_are_accepted() {
        let status: DeviceStatus =
            serde_json::from_str(r#"{"output": "420", "input": 97.1234, "setpoint": 98}"#).unwrap();

        assert_eq!(status.output, 420.0);
        let readout = StatusReadout::from_status(&status);
        assert_eq!(readout.heater_percent, "42.0");
        assert_eq!(readout.sensor_temp, "97.1");
        assert_eq!(readout.setpoint.as_deref(), Some("98.0"));
    }

    #[test]
    fn test_garbage_degrades_to_nan() {
        let status: DeviceStatus =
            serde_json::from_str(r#"{"output": "hot", "input": 1}"#).unwrap();
        assert!(status.output.is_nan());
        assert_eq!(StatusReadout::from_status(&status).heater_percent, "NaN");
    }

    #[test]
    fn test_missing_field_is_an_error() {
        assert!(serde_json::from_str::<DeviceStatus>(r#"{"output": 1}"#).is_err());
    }
}
