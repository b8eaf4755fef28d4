// Text rendering of the status panel and temperature chart
use crate::application::chart_renderer::{ChartState, ChartSurface};
use crate::application::status_panel::StatusSurface;
use crate::domain::status::StatusReadout;
use std::io::{self, Write};

const PLOT_MARK: char = '*';
const AXIS_WIDTH: usize = 8;

/// Draws into any writer, stdout by default.
pub struct TerminalSurface<W: Write + Send> {
    out: W,
    width: usize,
    height: usize,
}

impl TerminalSurface<io::Stdout> {
    pub fn stdout(width: usize, height: usize) -> Self {
        Self::new(io::stdout(), width, height)
    }
}

impl<W: Write + Send> TerminalSurface<W> {
    pub fn new(out: W, width: usize, height: usize) -> Self {
        Self {
            out,
            width: width.max(2),
            height: height.max(2),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> StatusSurface for TerminalSurface<W> {
    fn draw(&mut self, readout: &StatusReadout) -> io::Result<()> {
        write!(
            self.out,
            "Heater: {} %   Temperature: {} °C",
            readout.heater_percent, readout.sensor_temp
        )?;
        if let Some(setpoint) = &readout.setpoint {
            write!(self.out, "   Setpoint: {} °C", setpoint)?;
        }
        writeln!(self.out)?;
        self.out.flush()
    }
}

impl<W: Write + Send> ChartSurface for TerminalSurface<W> {
    fn draw(&mut self, chart: &ChartState) -> io::Result<()> {
        let lines = plot_lines(chart, self.width, self.height);
        for line in lines {
            writeln!(self.out, "{}", line.trim_end())?;
        }
        self.out.flush()
    }
}

/// Prints the chart data as CSV rows instead of a plot.
pub struct LogTable<W: Write + Send> {
    out: W,
}

impl LogTable<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> LogTable<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> ChartSurface for LogTable<W> {
    fn draw(&mut self, chart: &ChartState) -> io::Result<()> {
        writeln!(self.out, "label,temperature")?;
        for (label, sample) in chart.labels.iter().zip(&chart.points) {
            writeln!(self.out, "{},{}", label, sample.value)?;
        }
        self.out.flush()
    }
}

/// Lay the chart out as text rows: the plot grid with a y-axis, then an
/// x-axis carrying the first and last labels.
pub fn plot_lines(chart: &ChartState, width: usize, height: usize) -> Vec<String> {
    let title = format!("Temperature (°C) at {}", chrono::Local::now().format("%H:%M:%S"));
    if chart.points.is_empty() {
        return vec![title, "(no samples)".to_string()];
    }

    // Fixed-stride column sampling: at most `width` points are drawn
    let stride = chart.points.len().div_ceil(width);
    let columns: Vec<(usize, f64)> = chart
        .points
        .iter()
        .enumerate()
        .step_by(stride)
        .map(|(idx, sample)| (idx, sample.value))
        .collect();

    let finite = columns.iter().map(|(_, v)| *v).filter(|v| v.is_finite());
    let (min, max) = finite.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });

    let mut grid = vec![vec![' '; columns.len()]; height];
    if min.is_finite() {
        let span = max - min;
        for (col, (_, value)) in columns.iter().enumerate() {
            // NaN values leave a gap
            if !value.is_finite() {
                continue;
            }
            let level = if span > 0.0 {
                ((value - min) / span * (height - 1) as f64).round() as usize
            } else {
                height / 2
            };
            grid[height - 1 - level][col] = PLOT_MARK;
        }
    }

    let mut lines = Vec::with_capacity(height + 3);
    lines.push(title);
    for (row, cells) in grid.into_iter().enumerate() {
        let axis = if !min.is_finite() {
            String::new()
        } else if row == 0 {
            format!("{:.1}", max)
        } else if row == height - 1 {
            format!("{:.1}", min)
        } else {
            String::new()
        };
        let cells: String = cells.into_iter().collect();
        lines.push(format!("{:>w$} |{}", axis, cells, w = AXIS_WIDTH - 2));
    }
    lines.push(format!("{:>w$}+{}", "", "-".repeat(columns.len()), w = AXIS_WIDTH - 1));

    let first = columns.first().and_then(|(idx, _)| chart.labels.get(*idx));
    let last = columns.last().and_then(|(idx, _)| chart.labels.get(*idx));
    if let (Some(first), Some(last)) = (first, last) {
        let gap = (columns.len() + 1).saturating_sub(first.len() + last.len()).max(1);
        lines.push(format!("{:w$}{}{}{}", "", first, " ".repeat(gap), last, w = AXIS_WIDTH));
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::sample::Sample;

    fn chart(values: &[f64]) -> ChartState {
        let points: Vec<Sample> = values
            .iter()
            .enumerate()
            .map(|(i, v)| Sample::new(i as i64 * 1000, *v))
            .collect();
        let labels = crate::domain::time_label::relative_labels(&points);
        ChartState { labels, points }
    }

    #[test]
    fn test_plot_places_extremes_on_edges() {
        let lines = plot_lines(&chart(&[10.0, 20.0, 15.0]), 60, 5);

        // title, five plot rows, axis, labels
        assert_eq!(lines.len(), 8);
        assert!(lines[1].starts_with("  20.0 |"));
        assert_eq!(lines[1].chars().filter(|c| *c == PLOT_MARK).count(), 1);
        assert!(lines[5].starts_with("  10.0 |*"));
        assert!(lines[7].contains("-00:03"));
        assert!(lines[7].ends_with("-00:01"));
    }

    #[test]
    fn test_plot_samples_columns_to_width() {
        let values: Vec<f64> = (0..300).map(|i| i as f64).collect();
        let lines = plot_lines(&chart(&values), 60, 4);
        let marks: usize = lines.iter().map(|l| l.chars().filter(|c| *c == PLOT_MARK).count()).sum();
        assert_eq!(marks, 60);
    }

    #[test]
    fn test_nan_values_leave_gaps() {
        let lines = plot_lines(&chart(&[1.0, f64::NAN, 3.0]), 60, 3);
        let marks: usize = lines.iter().map(|l| l.chars().filter(|c| *c == PLOT_MARK).count()).sum();
        assert_eq!(marks, 2);
    }

    #[test]
    fn test_log_table_has_a_row_per_sample() {
        let mut table = LogTable::new(Vec::new());
        table.draw(&chart(&[20.5, f64::NAN, 21.0])).unwrap();

        let out = String::from_utf8(table.into_inner()).unwrap();
        assert_eq!(out, "label,temperature\n-00:03,20.5\n-00:02,NaN\n-00:01,21\n");
    }

    #[test]
    fn test_empty_chart() {
        let lines = plot_lines(&ChartState::default(), 60, 3);
        assert_eq!(lines[1], "(no samples)");
    }

    #[test]
    fn test_status_line() {
        let mut surface = TerminalSurface::new(Vec::new(), 60, 10);
        StatusSurface::draw(
            &mut surface,
            &StatusReadout {
                heater_percent: "25.5".into(),
                sensor_temp: "23.5".into(),
                setpoint: None,
            },
        )
        .unwrap();

        let out = String::from_utf8(surface.into_inner()).unwrap();
        assert_eq!(out, "Heater: 25.5 %   Temperature: 23.5 °C\n");
    }
}
