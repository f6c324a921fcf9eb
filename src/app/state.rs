// ABOUTME: View state for the ratio chart and the events that drive it
// Holds the finished runs plus which one is highlighted

use crate::data::simulator::SimulationRun;

#[derive(Debug, Clone)]
pub struct ChartState {
    pub runs: Vec<SimulationRun>,
    pub highlighted: Option<usize>,
    pub show_help: bool,
}

impl ChartState {
    pub fn new(runs: Vec<SimulationRun>) -> Self {
        Self {
            runs,
            highlighted: None,
            show_help: false,
        }
    }

    pub fn highlight_next(&mut self) {
        if self.runs.is_empty() {
            return;
        }
        self.highlighted = Some(match self.highlighted {
            Some(i) if i + 1 < self.runs.len() => i + 1,
            Some(_) => 0,
            None => 0,
        });
    }

    pub fn highlight_prev(&mut self) {
        if self.runs.is_empty() {
            return;
        }
        let last = self.runs.len() - 1;
        self.highlighted = Some(match self.highlighted {
            Some(0) | None => last,
            Some(i) => i - 1,
        });
    }

    pub fn clear_highlight(&mut self) {
        self.highlighted = None;
    }

    pub fn highlighted_run(&self) -> Option<&SimulationRun> {
        self.highlighted.and_then(|i| self.runs.get(i))
    }

    /// Longest run length, used for the x axis
    pub fn max_iterations(&self) -> usize {
        self.runs.iter().map(|r| r.ratios.len()).max().unwrap_or(0)
    }

    /// `[min, max]` over every ratio, padded so flat lines stay visible
    pub fn ratio_bounds(&self) -> [f64; 2] {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for ratio in self.runs.iter().flat_map(|r| r.ratios.iter()) {
            min = min.min(*ratio);
            max = max.max(*ratio);
        }

        if !min.is_finite() || !max.is_finite() {
            return [0.0, 1.0];
        }
        let pad = ((max - min) * 0.05).max(0.05);
        [(min - pad).max(0.0), max + pad]
    }
}

#[derive(Debug, Clone)]
pub enum AppEvent {
    Input(crossterm::event::KeyEvent),
    Resize(u16, u16),
    Quit,
}
