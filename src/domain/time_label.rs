// Relative time labels for the chart x-axis
use super::sample::Sample;

/// Added to every delta so the newest sample reads `-00:01`.
pub const LABEL_OFFSET_MS: i64 = 1000;

/// Label used when either timestamp of a pair is not known.
pub const INVALID_LABEL: &str = "--:--";

/// Format the time between `timestamp_ms` and `reference_ms` as `-MM:SS`.
///
/// Minutes are padded to two digits but never truncated, so an hour and a
/// half old sample reads `-90:01` and older ones widen to `-100:01`.
/// A distance that does not fit in an `i64` gets [`INVALID_LABEL`].
pub fn relative_label(reference_ms: i64, timestamp_ms: i64) -> String {
    let Some(delta) = reference_ms
        .checked_sub(timestamp_ms)
        .and_then(|d| d.checked_add(LABEL_OFFSET_MS))
    else {
        return INVALID_LABEL.to_string();
    };
    let minutes = delta.div_euclid(60_000);
    let seconds = (delta - minutes * 60_000).div_euclid(1000);
    format!("-{minutes:02}:{seconds:02}")
}

/// Label every sample relative to the last one in the slice.
pub fn relative_labels(samples: &[Sample]) -> Vec<String> {
    let reference = samples.last().and_then(|s| s.timestamp_ms);

    samples
        .iter()
        .map(|sample| match (reference, sample.timestamp_ms) {
            (Some(reference), Some(ts)) => relative_label(reference, ts),
            _ => INVALID_LABEL.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_count_back_from_latest() {
        let samples = [
            Sample::new(0, 1.0),
            Sample::new(1000, 1.0),
            Sample::new(2000, 1.0),
        ];
        assert_eq!(relative_labels(&samples), vec!["-00:03", "-00:02", "-00:01"]);
    }

    #[test]
    fn test_minutes_and_seconds_split() {
        assert_eq!(relative_label(300_000, 0), "-05:01");
        assert_eq!(relative_label(61_500, 0), "-01:02");
        assert_eq!(relative_label(10_000, 9_999), "-00:01");
    }

    #[test]
    fn test_minutes_widen_past_two_digits() {
        assert_eq!(relative_label(100 * 60_000, 1000), "-100:00");
    }

    #[test]
    fn test_invalid_timestamps() {
        let samples = [
            Sample {
                timestamp_ms: None,
                value: 1.0,
            },
            Sample::new(5000, 2.0),
        ];
        assert_eq!(relative_labels(&samples), vec![INVALID_LABEL, "-00:01"]);

        let broken_reference = [
            Sample::new(5000, 2.0),
            Sample {
                timestamp_ms: None,
                value: f64::NAN,
            },
        ];
        assert_eq!(
            relative_labels(&broken_reference),
            vec![INVALID_LABEL, INVALID_LABEL]
        );
    }

    #[test]
    fn test_extreme_timestamps_do_not_overflow() {
        let samples = [Sample::new(i64::MIN, 1.0), Sample::new(i64::MAX, 2.0)];
        assert_eq!(relative_labels(&samples), vec![INVALID_LABEL, "-00:01"]);

        assert_eq!(relative_label(i64::MAX, i64::MAX - 1), "-00:01");
        assert_eq!(relative_label(i64::MAX - 999, 0), INVALID_LABEL);
    }

    #[test]
    fn test_empty_input() {
        assert!(relative_labels(&[]).is_empty());
    }
}
