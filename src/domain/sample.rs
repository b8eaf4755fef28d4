// Log sample domain model and the device log parser

/// One reading taken from the device log.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Device time in milliseconds, `None` when the field did not parse
    pub timestamp_ms: Option<i64>,
    /// Sensor value, NaN when the field did not parse
    pub value: f64,
}

impl Sample {
    pub fn new(timestamp_ms: i64, value: f64) -> Self {
        Self {
            timestamp_ms: Some(timestamp_ms),
            value,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.timestamp_ms.is_some() && self.value.is_finite()
    }

    fn from_row(row: &str) -> Self {
        let mut fields = row.split(',').map(str::trim);
        let timestamp_ms = fields.next().and_then(parse_timestamp);
        let value = fields
            .next()
            .and_then(|field| field.parse::<f64>().ok())
            .unwrap_or(f64::NAN);

        Self {
            timestamp_ms,
            value,
        }
    }
}

fn parse_timestamp(field: &str) -> Option<i64> {
    if let Ok(ms) = field.parse::<i64>() {
        return Some(ms);
    }
    // "1500.0" still names a millisecond, keep the integer part
    field
        .parse::<f64>()
        .ok()
        .map(f64::trunc)
        .filter(|ms| *ms >= i64::MIN as f64 && *ms < i64::MAX as f64)
        .map(|ms| ms as i64)
}

/// Lazy iterator over the samples of a `/api/log` body.
///
/// The first line is the CSV header and is skipped. Blank lines (the
/// trailing newline of a body, for instance) are not rows and are skipped
/// as well. Every other line yields exactly one [`Sample`], with invalid
/// fields degraded to sentinels instead of being dropped.
///
/// The iterator borrows the body and is `Clone`, so a sequence can be
/// walked again from the start.
#[derive(Debug, Clone)]
pub struct LogSamples<'a> {
    rows: std::iter::Skip<std::str::Split<'a, char>>,
}

impl<'a> Iterator for LogSamples<'a> {
    type Item = Sample;

    fn next(&mut self) -> Option<Sample> {
        loop {
            let row = self.rows.next()?;
            if row.trim().is_empty() {
                continue;
            }
            return Some(Sample::from_row(row));
        }
    }
}

pub fn parse_log(body: &str) -> LogSamples<'_> {
    LogSamples {
        rows: body.split('\n').skip(1),
    }
}
