// Simulated barepid controller used for local development
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::VecDeque;

/// Ring buffer capacity, five minutes at one sample per second.
pub const LOG_SIZE: usize = 300;
pub const LOG_INTERVAL_MS: i64 = 1000;

const MIN_SETPOINT: f64 = 0.0;
const MAX_SETPOINT: f64 = 130.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogEntry {
    pub time_ms: i64,
    pub temperature: f64,
}

#[derive(Debug, Serialize)]
pub struct SimulatedStatus {
    pub output: f64,
    pub input: f64,
    pub setpoint: f64,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigRejected {
    #[error("invalid setpoint (0 < x < 130)")]
    Setpoint,
}

const STRING_COUNT: usize = 5;

/// String settings with the capacity the firmware stores them in.
const STRING_FIELDS: [(&str, usize); STRING_COUNT] = [
    ("wlan_ap_ssid", 32),
    ("wlan_ap_password", 64),
    ("wlan_join_hostname", 32),
    ("wlan_join_ssid", 32),
    ("wlan_join_password", 64),
];

pub struct SimulatedDevice {
    setpoint: f64,
    strings: [String; STRING_COUNT],
    last_ms: i64,
    log: VecDeque<LogEntry>,
    rng: StdRng,
}

impl SimulatedDevice {
    pub fn new(setpoint: f64) -> Self {
        Self::with_rng(setpoint, StdRng::from_os_rng())
    }

    /// Deterministic noise, for tests.
    pub fn seeded(setpoint: f64, seed: u64) -> Self {
        Self::with_rng(setpoint, StdRng::seed_from_u64(seed))
    }

    fn with_rng(setpoint: f64, rng: StdRng) -> Self {
        let mut device = Self {
            setpoint,
            strings: [
                "barepid".to_string(),
                "barepid42".to_string(),
                "barepid".to_string(),
                String::new(),
                String::new(),
            ],
            last_ms: 0,
            log: VecDeque::with_capacity(LOG_SIZE + 1),
            rng,
        };
        device.reset(now_ms());
        device
    }

    /// Restart the process: the log is reseeded at the setpoint.
    pub fn reset(&mut self, now_ms: i64) {
        self.log.clear();
        for back in (0..4).rev() {
            self.log.push_back(LogEntry {
                time_ms: now_ms - back * LOG_INTERVAL_MS,
                temperature: self.setpoint,
            });
        }
        self.last_ms = now_ms;
    }

    /// Generate the samples that are due up to `now_ms`.
    pub fn advance(&mut self, now_ms: i64) {
        // After a long idle period only the last LOG_SIZE samples matter
        let horizon = now_ms - LOG_SIZE as i64 * LOG_INTERVAL_MS;
        if self.last_ms < horizon {
            self.last_ms = horizon;
        }

        while self.last_ms + LOG_INTERVAL_MS <= now_ms {
            self.last_ms += LOG_INTERVAL_MS;
            let temperature = self.next_temperature();
            self.log.push_back(LogEntry {
                time_ms: self.last_ms,
                temperature,
            });
            if self.log.len() > LOG_SIZE {
                self.log.pop_front();
            }
        }
    }

    fn next_temperature(&mut self) -> f64 {
        let error = |back: usize| {
            self.log
                .len()
                .checked_sub(back)
                .and_then(|idx| self.log.get(idx))
                .map_or(0.0, |entry| entry.temperature - self.setpoint)
        };
        let (e1, e2, e3, e4) = (error(1), error(2), error(3), error(4));
        let noise = self.rng.random_range(-3.0..3.0);
        self.setpoint + 0.8 * e1 + 0.5 * e2 - 0.4 * e3 - 0.1 * e4 + noise
    }

    pub fn temperature(&self) -> f64 {
        self.log.back().map_or(self.setpoint, |entry| entry.temperature)
    }

    pub fn status(&self) -> SimulatedStatus {
        let input = self.temperature();
        // Heater drive in tenths of a percent
        let output = ((self.setpoint - input) * 100.0).clamp(0.0, 1000.0).round();
        SimulatedStatus {
            output,
            input,
            setpoint: self.setpoint,
        }
    }

    pub fn log_entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.log.iter()
    }

    pub fn log_csv(&self) -> String {
        let mut body = String::from("time,temperature");
        for entry in &self.log {
            body.push_str(&format!("\n{},{:.2}", entry.time_ms, entry.temperature));
        }
        body
    }

    pub fn config(&self) -> Map<String, Value> {
        let mut config = Map::new();
        config.insert("setpoint".to_string(), Value::from(self.setpoint));
        for ((name, _), value) in STRING_FIELDS.iter().zip(&self.strings) {
            config.insert(name.to_string(), Value::String(value.clone()));
        }
        config
    }

    /// Apply the recognized fields of a config update.
    ///
    /// A bad setpoint rejects the whole update. Strings are cut to what the
    /// firmware can store.
    pub fn apply_config(&mut self, update: &Map<String, Value>) -> Result<(), ConfigRejected> {
        let setpoint = match update.get("setpoint") {
            Some(value) => {
                let setpoint = number(value).ok_or(ConfigRejected::Setpoint)?;
                if !(setpoint > MIN_SETPOINT && setpoint < MAX_SETPOINT) {
                    return Err(ConfigRejected::Setpoint);
                }
                Some(setpoint)
            }
            None => None,
        };

        if let Some(setpoint) = setpoint {
            if setpoint != self.setpoint {
                tracing::info!("change setpoint from {} to {}", self.setpoint, setpoint);
                self.setpoint = setpoint;
            }
        }

        for ((name, capacity), current) in STRING_FIELDS.iter().zip(self.strings.iter_mut()) {
            if let Some(value) = update.get(*name) {
                let text = match value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                let text: String = text.chars().take(capacity - 1).collect();
                if text != *current {
                    tracing::info!("change {} from {:?} to {:?}", name, current, text);
                    *current = text;
                }
            }
        }

        Ok(())
    }
}

fn number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    n.filter(|n| n.is_finite())
}

pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
