use crate::store::ResistanceLine;
use crate::ui::{Chart, LayoutManager};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{backend::Backend, Terminal};
use std::io;

/// Full-screen chart viewer; runs until the user quits.
pub struct App {
    pub chart: Chart,
    pub layout: LayoutManager,
    running: bool,
}

impl App {
    pub fn new(chart: Chart, lines: Vec<ResistanceLine>) -> Self {
        Self {
            chart,
            layout: LayoutManager::new(lines),
            running: true,
        }
    }

    pub fn run(mut self) -> io::Result<()> {
        let mut terminal = ratatui::try_init()?;
        let result = self.event_loop(&mut terminal);
        ratatui::restore();
        result
    }

    fn event_loop<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        while self.is_running() {
            self.draw(terminal)?;
            if let Event::Key(key) = event::read()? {
                self.handle_key(key);
            }
        }
        Ok(())
    }

    fn draw<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        terminal.draw(|frame| {
            let area = frame.area();
            self.layout.render(frame, &self.chart, area);
        })?;
        Ok(())
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.running = false,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => self.running = false,
            KeyCode::Char('+') | KeyCode::Char('=') => self.chart.zoom_in(),
            KeyCode::Char('-') => self.chart.zoom_out(),
            KeyCode::Left => self.chart.pan_left(),
            KeyCode::Right => self.chart.pan_right(),
            KeyCode::Char('l') | KeyCode::Char('L') | KeyCode::Tab => {
                self.layout.show_levels = !self.layout.show_levels
            }
            _ => {}
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}
