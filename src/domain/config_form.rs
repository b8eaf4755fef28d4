// Device configuration form model
use serde_json::{Map, Value};

const FIELD_COUNT: usize = 6;

/// Controls of the configuration form, in display order.
pub const CONFIG_FIELDS: [&str; FIELD_COUNT] = [
    "setpoint",
    "wlan_ap_ssid",
    "wlan_ap_password",
    "wlan_join_hostname",
    "wlan_join_ssid",
    "wlan_join_password",
];

#[derive(Debug, thiserror::Error, PartialEq)]
#[error("unknown config field `{0}`")]
pub struct UnknownField(pub String);

/// Current values of the configuration form controls.
///
/// Every control exists from the start with an empty value. Values are
/// plain strings; nothing here validates them, the device does.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigForm {
    values: [String; FIELD_COUNT],
}

impl ConfigForm {
    fn position(name: &str) -> Option<usize> {
        CONFIG_FIELDS.iter().position(|field| *field == name)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        Self::position(name).map(|idx| self.values[idx].as_str())
    }

    pub fn set(&mut self, name: &str, value: impl Into<String>) -> Result<(), UnknownField> {
        let idx = Self::position(name).ok_or_else(|| UnknownField(name.to_string()))?;
        self.values[idx] = value.into();
        Ok(())
    }

    /// Copy recognized fields of a `GET /api/config` object into the form.
    ///
    /// Unknown keys are ignored and controls absent from the payload keep
    /// their current value. Returns how many controls were written.
    pub fn prefill(&mut self, config: &Map<String, Value>) -> usize {
        let mut written = 0;
        for (idx, field) in CONFIG_FIELDS.iter().enumerate() {
            if let Some(value) = config.get(*field) {
                self.values[idx] = value_text(value);
                written += 1;
            }
        }
        written
    }

    pub fn fields(&self) -> impl Iterator<Item = (&'static str, &str)> {
        CONFIG_FIELDS
            .iter()
            .copied()
            .zip(self.values.iter().map(String::as_str))
    }

    /// Body for `POST /api/config`: every control, changed or not.
    pub fn to_json(&self) -> Map<String, Value> {
        self.fields()
            .map(|(name, value)| (name.to_string(), Value::String(value.to_string())))
            .collect()
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
