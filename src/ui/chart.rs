// ABOUTME: Ratio chart layout and rendering logic
// Draws one line per threshold with a legend, header and keybind footer

use crate::app::state::ChartState;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Clear, Dataset, GraphType, Paragraph},
    Frame,
};

pub const CHART_TITLE: &str = "Cost Ratio Over Time for Different π Values";
pub const X_AXIS_TITLE: &str = "Iteration";
pub const Y_AXIS_TITLE: &str = "Cost Ratio (Baseline / Tracker)";

const PALETTE: [Color; 8] = [
    Color::Cyan,
    Color::Yellow,
    Color::Green,
    Color::Magenta,
    Color::Red,
    Color::LightBlue,
    Color::LightGreen,
    Color::White,
];

pub struct RatioChart {
    state: ChartState,
}

impl RatioChart {
    pub fn new(state: ChartState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &ChartState {
        &self.state
    }

    pub fn render(&self, frame: &mut Frame) {
        let size = frame.size();

        // Main layout: header, body, footer
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Chart
                Constraint::Length(3), // Footer
            ])
            .split(size);

        self.render_header(frame, chunks[0]);
        self.render_chart(frame, chunks[1]);
        self.render_footer(frame, chunks[2]);

        if self.state.show_help {
            self.render_help_overlay(frame, size);
        }
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let header_text = vec![
            Span::styled("Cache-Sim", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(format!(
                " v{}  [{} runs x {} iterations]",
                env!("CARGO_PKG_VERSION"),
                self.state.runs.len(),
                self.state.max_iterations()
            )),
        ];

        let header = Paragraph::new(Line::from(header_text))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Blue)),
            )
            .alignment(Alignment::Center);

        frame.render_widget(header, area);
    }

    fn series_style(&self, index: usize) -> Style {
        let color = PALETTE[index % PALETTE.len()];
        match self.state.highlighted {
            Some(h) if h == index => Style::default().fg(color).add_modifier(Modifier::BOLD),
            Some(_) => Style::default().fg(Color::DarkGray),
            None => Style::default().fg(color),
        }
    }

    fn render_chart(&self, frame: &mut Frame, area: Rect) {
        let points: Vec<Vec<(f64, f64)>> = self.state.runs.iter().map(|r| r.points()).collect();

        let datasets: Vec<Dataset> = self
            .state
            .runs
            .iter()
            .zip(points.iter())
            .enumerate()
            .map(|(i, (run, data))| {
                Dataset::default()
                    .name(run.label())
                    .marker(symbols::Marker::Braille)
                    .graph_type(GraphType::Line)
                    .style(self.series_style(i))
                    .data(data)
            })
            .collect();

        let max_x = self.state.max_iterations().saturating_sub(1).max(1) as f64;
        let [low, high] = self.state.ratio_bounds();

        let axis_style = Style::default().fg(Color::Gray);
        let chart = Chart::new(datasets)
            .block(
                Block::default()
                    .title(CHART_TITLE)
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Blue)),
            )
            .x_axis(
                Axis::default()
                    .title(X_AXIS_TITLE)
                    .style(axis_style)
                    .bounds([0.0, max_x])
                    .labels(vec![
                        Span::raw("0"),
                        Span::raw(format!("{}", (max_x / 2.0).round())),
                        Span::raw(format!("{}", max_x)),
                    ]),
            )
            .y_axis(
                Axis::default()
                    .title(Y_AXIS_TITLE)
                    .style(axis_style)
                    .bounds([low, high])
                    .labels(vec![
                        Span::raw(format!("{:.2}", low)),
                        Span::raw(format!("{:.2}", (low + high) / 2.0)),
                        Span::raw(format!("{:.2}", high)),
                    ]),
            )
            .hidden_legend_constraints((Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)));

        frame.render_widget(chart, area);
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Summary line
                Constraint::Length(2), // Keybinds
            ])
            .split(area);

        let summary = match self.state.highlighted_run() {
            Some(run) => Line::from(vec![
                Span::styled(run.label(), Style::default().fg(Color::Cyan)),
                Span::raw(format!("  {}  refreshes: {}", run.summary_line(), run.refreshes)),
            ]),
            None => Line::from(Span::styled(
                "Press Tab to inspect a run",
                Style::default().fg(Color::DarkGray),
            )),
        };
        frame.render_widget(Paragraph::new(summary).alignment(Alignment::Center), chunks[0]);

        let keybinds = [("Tab", "Next"), ("S-Tab", "Prev"), ("H", "Help"), ("Q", "Quit")];
        let spans: Vec<Span> = keybinds
            .iter()
            .flat_map(|(key, desc)| {
                vec![
                    Span::styled(
                        format!("[{}]", key),
                        Style::default()
                            .fg(Color::Yellow)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(format!(" {} ", desc)),
                ]
            })
            .collect();

        let footer = Paragraph::new(Line::from(spans))
            .block(
                Block::default()
                    .borders(Borders::TOP)
                    .border_style(Style::default().fg(Color::DarkGray)),
            )
            .alignment(Alignment::Center);

        frame.render_widget(footer, chunks[1]);
    }

    fn render_help_overlay(&self, frame: &mut Frame, area: Rect) {
        let width = 44.min(area.width);
        let height = 8.min(area.height);
        let popup = Rect {
            x: area.x + (area.width - width) / 2,
            y: area.y + (area.height - height) / 2,
            width,
            height,
        };

        let lines = vec![
            Line::from("Tab / Shift-Tab  highlight a threshold"),
            Line::from("Esc              clear highlight, then quit"),
            Line::from("H                toggle this help"),
            Line::from("Q                quit"),
            Line::from(""),
            Line::from("Ratio > 1: tracker is cheaper"),
        ];

        let help = Paragraph::new(lines).block(
            Block::default()
                .title("Help")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        );

        frame.render_widget(Clear, popup);
        frame.render_widget(help, popup);
    }

    /// Returns false when the user asked to quit
    pub fn handle_key(&mut self, key: crossterm::event::KeyCode) -> bool {
        use crossterm::event::KeyCode;

        match key {
            KeyCode::Tab | KeyCode::Right => {
                self.state.highlight_next();
                true
            }
            KeyCode::BackTab | KeyCode::Left => {
                self.state.highlight_prev();
                true
            }
            KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::Char('?') => {
                self.state.show_help = !self.state.show_help;
                true
            }
            KeyCode::Esc => {
                if self.state.show_help {
                    self.state.show_help = false;
                    true
                } else if self.state.highlighted.is_some() {
                    self.state.clear_highlight();
                    true
                } else {
                    false
                }
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => false,
            _ => true,
        }
    }
}
