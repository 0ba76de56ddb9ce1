use crate::store::ResistanceLine;
use crate::ui::{Chart, LevelPanel, StatusBar};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    Frame,
};

pub struct LayoutManager {
    pub levels: LevelPanel,
    pub statusbar: StatusBar,
    pub show_levels: bool,
}

impl LayoutManager {
    pub fn new(lines: Vec<ResistanceLine>) -> Self {
        Self {
            levels: LevelPanel::new(lines),
            statusbar: StatusBar::new(),
            show_levels: true,
        }
    }

    pub fn render(&mut self, frame: &mut Frame, chart: &Chart, area: Rect) {
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(20), Constraint::Length(1)])
            .split(area);

        if self.show_levels {
            let content_chunks = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Min(40), Constraint::Length(26)])
                .split(main_chunks[0]);
            chart.render(frame, content_chunks[0]);
            self.levels.render(frame, content_chunks[1], chart.last_close());
        } else {
            chart.render(frame, main_chunks[0]);
        }

        self.statusbar.bars = chart.candles.len();
        self.statusbar.zoom = chart.zoom;
        self.statusbar.render(frame, main_chunks[1]);
    }
}
