// Chart renderer - owns the temperature chart and redraws it on refresh
use crate::domain::sample::Sample;
use std::io;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartState {
    pub labels: Vec<String>,
    pub points: Vec<Sample>,
}

/// Where a chart ends up being drawn.
pub trait ChartSurface: Send {
    fn draw(&mut self, chart: &ChartState) -> io::Result<()>;
}

pub struct ChartRenderer {
    state: ChartState,
    surface: Box<dyn ChartSurface>,
}

impl ChartRenderer {
    pub fn new(surface: Box<dyn ChartSurface>) -> Self {
        Self {
            state: ChartState::default(),
            surface,
        }
    }

    pub fn state(&self) -> &ChartState {
        &self.state
    }

    /// Replace labels and points wholesale, then redraw.
    pub fn refresh(&mut self, labels: Vec<String>, points: Vec<Sample>) -> io::Result<()> {
        self.state = ChartState { labels, points };
        self.surface.draw(&self.state)
    }
}
