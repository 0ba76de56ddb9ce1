use crate::store::ResistanceLine;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Side panel listing the symbol's resistance lines.
pub struct LevelPanel {
    pub lines: Vec<ResistanceLine>,
}

impl LevelPanel {
    pub fn new(lines: Vec<ResistanceLine>) -> Self {
        Self { lines }
    }

    /// Percent distance of `price` above (positive) or below `last_close`.
    pub fn distance_pct(price: f64, last_close: f64) -> Option<f64> {
        if last_close == 0.0 || !last_close.is_finite() {
            return None;
        }
        Some((price - last_close) * 100.0 / last_close)
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, last_close: Option<f64>) {
        let block = Block::default()
            .title("Resistance")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Magenta));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if self.lines.is_empty() {
            let text = Line::from(Span::styled("No levels", Style::default().fg(Color::Gray)));
            frame.render_widget(Paragraph::new(text).alignment(Alignment::Center), inner);
            return;
        }

        let mut text = vec![Line::from(Span::styled(
            format!("{:>12} {:>8}", "Price", "Dist"),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ))];

        for line in &self.lines {
            let (dist, color) = match last_close.and_then(|close| Self::distance_pct(line.price, close)) {
                Some(pct) if pct >= 0.0 => (format!("{:+.2}%", pct), Color::Red),
                Some(pct) => (format!("{:+.2}%", pct), Color::Green),
                None => ("-".to_string(), Color::Gray),
            };
            text.push(Line::from(vec![
                Span::styled(format!("{:>12.2}", line.price), Style::default().fg(Color::White)),
                Span::raw(" "),
                Span::styled(format!("{:>8}", dist), Style::default().fg(color)),
            ]));
            text.push(Line::from(Span::styled(
                format!("  {}", line.span_label()),
                Style::default().fg(Color::DarkGray),
            )));
        }

        frame.render_widget(Paragraph::new(text), inner);
    }
}
