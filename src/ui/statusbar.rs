use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph},
    Frame,
};

pub struct StatusBar {
    pub bars: usize,
    pub zoom: usize,
}

impl StatusBar {
    pub fn new() -> Self {
        Self { bars: 0, zoom: 1 }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let text = Line::from(vec![
            Span::styled(format!("{} bars", self.bars), Style::default().fg(Color::White)),
            Span::raw(" | "),
            Span::styled(format!("x{}", self.zoom), Style::default().fg(Color::White)),
            Span::raw(" | "),
            Span::styled("Q", Style::default().fg(Color::Yellow)),
            Span::raw(":Quit "),
            Span::styled("←→", Style::default().fg(Color::Yellow)),
            Span::raw(":Pan "),
            Span::styled("+/-", Style::default().fg(Color::Yellow)),
            Span::raw(":Zoom "),
            Span::styled("L", Style::default().fg(Color::Yellow)),
            Span::raw(":Levels"),
        ]);

        let para = Paragraph::new(text).block(Block::default());
        frame.render_widget(para, area);
    }
}
