// ABOUTME: Interactive terminal plotter for finished simulation runs
// Sets up the terminal, forwards key events over a channel and drives the chart

use super::chart::RatioChart;
use crate::app::state::{AppEvent, ChartState};
use crate::data::driver::RatioPlotter;
use crate::data::simulator::SimulationRun;
use crate::utils::error::{Result, SimError};
use crossbeam_channel::{bounded, Receiver, Sender};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::io;
use std::time::Duration;

/// Shows the runs as a full-screen chart until the user quits
#[derive(Debug, Default)]
pub struct TerminalPlotter;

impl TerminalPlotter {
    pub fn new() -> Self {
        Self
    }
}

impl RatioPlotter for TerminalPlotter {
    fn plot(&mut self, runs: &[SimulationRun]) -> Result<()> {
        let mut terminal = setup_terminal()?;

        let (event_tx, event_rx) = bounded::<AppEvent>(100);
        spawn_input_handler(event_tx);

        let mut chart = RatioChart::new(ChartState::new(runs.to_vec()));
        let result = run_event_loop(&mut terminal, &mut chart, event_rx);

        restore_terminal(&mut terminal)?;
        result
    }
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode().map_err(|e| SimError::Terminal(e.to_string()))?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

fn spawn_input_handler(tx: Sender<AppEvent>) {
    std::thread::spawn(move || loop {
        let app_event = match event::poll(Duration::from_millis(100)) {
            Ok(true) => match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => AppEvent::Input(key),
                Ok(Event::Resize(width, height)) => AppEvent::Resize(width, height),
                Ok(_) => continue,
                Err(_) => AppEvent::Quit,
            },
            Ok(false) => continue,
            Err(_) => AppEvent::Quit,
        };

        let quit = matches!(app_event, AppEvent::Quit);
        if tx.send(app_event).is_err() || quit {
            break;
        }
    });
}

fn run_event_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    chart: &mut RatioChart,
    event_rx: Receiver<AppEvent>,
) -> Result<()> {
    loop {
        terminal.draw(|f| chart.render(f))?;

        if let Ok(event) = event_rx.recv_timeout(Duration::from_millis(50)) {
            match event {
                AppEvent::Input(key) => {
                    if !chart.handle_key(key.code) {
                        break; // Quit requested
                    }
                }
                AppEvent::Resize(_, _) => {
                    // Terminal will handle resize automatically
                }
                AppEvent::Quit => break,
            }
        }
    }

    Ok(())
}
