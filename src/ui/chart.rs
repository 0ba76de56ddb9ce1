use crate::data::{Candle, Granularity};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Width reserved left of the plot for price labels.
const AXIS_WIDTH: u16 = 13;
const LEVEL_CHAR: char = '╌';

#[derive(Debug, Clone)]
pub struct Chart {
    pub candles: Vec<Candle>,
    pub symbol: String,
    pub granularity: Granularity,
    pub levels: Vec<f64>,
    pub zoom: usize,
    pub offset: usize,
}

impl Chart {
    pub fn new(symbol: String, granularity: Granularity) -> Self {
        Self {
            candles: Vec::new(),
            symbol,
            granularity,
            levels: Vec::new(),
            zoom: 1,
            offset: 0,
        }
    }

    pub fn update_candles(&mut self, mut new_candles: Vec<Candle>) {
        new_candles.sort_by_key(|c| c.time);
        new_candles.dedup_by_key(|c| c.time);
        self.candles = new_candles;
        self.offset = 0;
    }

    pub fn set_levels(&mut self, levels: Vec<f64>) {
        self.levels = levels;
    }

    pub fn last_close(&self) -> Option<f64> {
        self.candles.last().map(|c| c.close)
    }

    pub fn zoom_in(&mut self) {
        self.zoom = (self.zoom * 2).min(32);
    }

    pub fn zoom_out(&mut self) {
        self.zoom = (self.zoom / 2).max(1);
    }

    pub fn pan_left(&mut self) {
        let visible = self.get_visible_count();
        if self.offset + visible < self.candles.len() {
            self.offset += (visible / 4).max(1);
        }
    }

    pub fn pan_right(&mut self) {
        self.offset = self.offset.saturating_sub((self.get_visible_count() / 4).max(1));
    }

    fn get_visible_count(&self) -> usize {
        (100 / self.zoom).max(10)
    }

    /// Bars in view, capped at `max_width` so each gets at least one column.
    fn visible_candles(&self, max_width: usize) -> &[Candle] {
        let count = self.get_visible_count().min(max_width.max(1));
        let end = self.candles.len().saturating_sub(self.offset);
        let start = end.saturating_sub(count);
        &self.candles[start..end]
    }

    /// Low/high over the visible bars, widened to include every level.
    fn price_bounds(&self, visible: &[Candle]) -> Option<(f64, f64)> {
        if visible.is_empty() {
            return None;
        }
        let (min, max) = visible
            .iter()
            .map(|c| (c.low, c.high))
            .chain(self.levels.iter().map(|&p| (p, p)))
            .fold((f64::MAX, f64::MIN), |(min, max), (low, high)| {
                (min.min(low), max.max(high))
            });
        Some((min, max))
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let vertical = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(10),
                Constraint::Length(4),
                Constraint::Length(3),
            ])
            .split(area);

        let title = format!(
            "{} / {}  ({} levels)",
            self.symbol,
            self.granularity.label().to_uppercase(),
            self.levels.len()
        );
        let title_block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));
        frame.render_widget(title_block, vertical[0]);

        self.render_candlesticks(frame, vertical[1]);
        self.render_volume(frame, vertical[2]);
        self.render_stats(frame, vertical[3]);
    }

    fn render_candlesticks(&self, frame: &mut Frame, area: Rect) {
        if area.width <= AXIS_WIDTH + 1 || area.height < 5 {
            return;
        }

        let chart_width = area.width - AXIS_WIDTH;
        let chart_height = area.height - 2;
        let inner = Rect {
            x: area.x + AXIS_WIDTH,
            y: area.y + 1,
            width: chart_width,
            height: chart_height,
        };

        let visible = self.visible_candles(chart_width as usize);
        let Some((min_price, max_price)) = self.price_bounds(visible) else {
            let para = Paragraph::new(Line::from(Span::styled(
                "No candles in this window",
                Style::default().fg(Color::Gray),
            )));
            frame.render_widget(para, inner);
            return;
        };

        let price_range = (max_price - min_price).max(0.0001);
        let row = |price: f64| inner.y + price_to_row(price, max_price, price_range, chart_height);
        let candle_width = (chart_width as usize / visible.len()).max(1);

        for &level in &self.levels {
            let y = row(level);
            for x in inner.x..inner.x + inner.width {
                frame.buffer_mut()[(x, y)]
                    .set_char(LEVEL_CHAR)
                    .set_fg(Color::Yellow);
            }
        }

        for (idx, candle) in visible.iter().enumerate() {
            let x = inner.x + (idx * candle_width + candle_width / 2) as u16;
            if x >= inner.x + inner.width {
                break;
            }

            let color = if candle.is_bullish() {
                Color::Green
            } else {
                Color::Red
            };

            let (high_y, low_y) = (row(candle.high), row(candle.low));
            let (open_y, close_y) = (row(candle.open), row(candle.close));

            for y in high_y..=low_y {
                frame.buffer_mut()[(x, y)].set_char('│').set_fg(color);
            }
            for y in open_y.min(close_y)..=open_y.max(close_y) {
                frame.buffer_mut()[(x, y)].set_char('█').set_fg(color);
            }
        }

        let label_count = 5.min(chart_height as usize / 2).max(1);
        for i in 0..=label_count {
            let y = inner.y + ((i as u16) * (chart_height - 1) / label_count as u16);
            let price = max_price - (i as f64 / label_count as f64) * price_range;
            let label = format!("{:>11.2}", price);

            for (j, ch) in label.chars().enumerate() {
                let x_pos = area.x + j as u16;
                if x_pos < area.x + AXIS_WIDTH {
                    frame.buffer_mut()[(x_pos, y)].set_char(ch).set_fg(Color::Gray);
                }
            }
        }

        for &level in &self.levels {
            let label = format!(" {:.2} ", level);
            let width = label.chars().count() as u16;
            if width >= inner.width {
                continue;
            }
            let y = row(level);
            let start = inner.x + inner.width - width;
            for (j, ch) in label.chars().enumerate() {
                frame.buffer_mut()[(start + j as u16, y)]
                    .set_char(ch)
                    .set_fg(Color::Black)
                    .set_bg(Color::Yellow);
            }
        }

        let (Some(first), Some(last)) = (visible.first(), visible.last()) else {
            return;
        };
        let change = last.close - first.open;
        let change_pct = if first.open != 0.0 {
            (change / first.open) * 100.0
        } else {
            0.0
        };
        let change_color = if change >= 0.0 {
            Color::Green
        } else {
            Color::Red
        };

        let price_text = Line::from(vec![
            Span::styled("Price: ", Style::default().fg(Color::Gray)),
            Span::styled(
                format!("{:.2}", last.close),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(
                format!("{:+.2} ({:+.2}%)", change, change_pct),
                Style::default().fg(change_color),
            ),
        ]);

        frame.render_widget(
            Paragraph::new(price_text),
            Rect {
                x: inner.x,
                y: area.y + area.height - 1,
                width: chart_width,
                height: 1,
            },
        );
    }

    fn render_volume(&self, frame: &mut Frame, area: Rect) {
        if area.width <= AXIS_WIDTH + 1 || area.height < 2 {
            return;
        }

        let chart_width = area.width - AXIS_WIDTH;
        let chart_height = area.height - 1;
        let visible = self.visible_candles(chart_width as usize);
        if visible.is_empty() {
            return;
        }

        let max_volume = visible.iter().fold(0.0f64, |a, c| a.max(c.volume));
        if max_volume <= 0.0 {
            return;
        }

        let candle_width = (chart_width as usize / visible.len()).max(1);
        let inner = Rect {
            x: area.x + AXIS_WIDTH,
            y: area.y,
            width: chart_width,
            height: chart_height,
        };

        for (idx, candle) in visible.iter().enumerate() {
            let x = inner.x + (idx * candle_width + candle_width / 2) as u16;
            if x >= inner.x + inner.width {
                break;
            }
            let height = ((candle.volume / max_volume) * chart_height as f64) as u16;
            let color = if candle.is_bullish() {
                Color::Green
            } else {
                Color::Red
            };
            for y in inner.y + inner.height - height.min(inner.height)..inner.y + inner.height {
                frame.buffer_mut()[(x, y)].set_char('▊').set_fg(color);
            }
        }

        let label_text = Line::from(Span::styled(
            format!("Vol: {:.0}", max_volume),
            Style::default().fg(Color::Gray),
        ));
        frame.render_widget(
            Paragraph::new(label_text),
            Rect {
                x: area.x,
                y: area.y,
                width: AXIS_WIDTH - 1,
                height: 1,
            },
        );
    }

    fn render_stats(&self, frame: &mut Frame, area: Rect) {
        let Some(latest) = self.candles.last() else {
            return;
        };

        let change = latest.close - latest.open;
        let change_pct = if latest.open > 0.0 {
            (change / latest.open) * 100.0
        } else {
            0.0
        };
        let change_color = if change >= 0.0 {
            Color::Green
        } else {
            Color::Red
        };

        let stats_text = Line::from(vec![
            Span::styled("O: ", Style::default().fg(Color::Gray)),
            Span::styled(format!("{:.2}  ", latest.open), Style::default().fg(Color::White)),
            Span::styled("H: ", Style::default().fg(Color::Gray)),
            Span::styled(format!("{:.2}  ", latest.high), Style::default().fg(Color::Green)),
            Span::styled("L: ", Style::default().fg(Color::Gray)),
            Span::styled(format!("{:.2}  ", latest.low), Style::default().fg(Color::Red)),
            Span::styled("C: ", Style::default().fg(Color::Gray)),
            Span::styled(format!("{:.2}  ", latest.close), Style::default().fg(Color::White)),
            Span::styled("Vol: ", Style::default().fg(Color::Gray)),
            Span::styled(format!("{:.2}  ", latest.volume), Style::default().fg(Color::Yellow)),
            Span::styled("Chg: ", Style::default().fg(Color::Gray)),
            Span::styled(
                format!("{:+.2}%", change_pct),
                Style::default().fg(change_color).add_modifier(Modifier::BOLD),
            ),
        ]);

        let stats_block = Block::default()
            .title(latest.time.format("%Y-%m-%d %H:%M UTC").to_string())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Blue));
        frame.render_widget(Paragraph::new(stats_text).block(stats_block), area);
    }
}

/// Row offset of `price` inside a plot `height` rows tall whose top row is
/// `max_price`.
pub fn price_to_row(price: f64, max_price: f64, price_range: f64, height: u16) -> u16 {
    let span = height.saturating_sub(1);
    let offset = ((max_price - price) / price_range * span as f64).round();
    offset.clamp(0.0, span as f64) as u16
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};

    fn candle(minute: i64, open: f64, close: f64) -> Candle {
        Candle {
            time: DateTime::<Utc>::from_timestamp(minute * 60, 0).unwrap(),
            open,
            high: open.max(close) + 0.5,
            low: open.min(close) - 0.5,
            close,
            volume: 10.0 + minute as f64,
        }
    }

    fn sample_chart(levels: Vec<f64>) -> Chart {
        let mut chart = Chart::new("BTC-USDT".to_string(), Granularity::FiveMinutes);
        chart.update_candles((0..20).map(|i| candle(i, 100.0 + i as f64 * 0.5, 100.5 + i as f64 * 0.5)).collect());
        chart.set_levels(levels);
        chart
    }

    fn draw(chart: &Chart) -> Buffer {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.area();
                chart.render(frame, area);
            })
            .unwrap();
        terminal.backend().buffer().clone()
    }

    /// Rows where `symbol` appears inside the plot columns, clear of borders.
    fn rows_with(buf: &Buffer, symbol: &str) -> Vec<u16> {
        let area = buf.area;
        (area.y..area.y + area.height)
            .filter(|&y| (AXIS_WIDTH..area.width - 1).any(|x| buf[(x, y)].symbol() == symbol))
            .collect()
    }

    #[test]
    fn price_to_row_maps_extremes() {
        assert_eq!(price_to_row(110.0, 110.0, 10.0, 11), 0);
        assert_eq!(price_to_row(100.0, 110.0, 10.0, 11), 10);
        assert_eq!(price_to_row(105.0, 110.0, 10.0, 11), 5);
        assert_eq!(price_to_row(500.0, 110.0, 10.0, 11), 0);
    }

    #[test]
    fn no_levels_means_no_overlay() {
        let buf = draw(&sample_chart(vec![]));
        assert!(rows_with(&buf, "╌").is_empty());
        assert!(!rows_with(&buf, "█").is_empty());
    }

    #[test]
    fn level_above_the_market_is_drawn_above_every_candle() {
        let buf = draw(&sample_chart(vec![150.0]));

        let level_rows = rows_with(&buf, "╌");
        assert_eq!(level_rows.len(), 1);
        let candle_rows = rows_with(&buf, "│");
        assert!(candle_rows.iter().all(|&y| y > level_rows[0]));
    }

    #[test]
    fn level_spans_the_plot_width() {
        let buf = draw(&sample_chart(vec![104.0]));
        let y = rows_with(&buf, "╌")[0];
        let dashed = (0..100).filter(|&x| buf[(x, y)].symbol() == "╌").count();
        assert!(dashed > 40, "only {dashed} columns dashed");
    }

    #[test]
    fn each_level_gets_its_own_row() {
        let buf = draw(&sample_chart(vec![90.0, 130.0]));
        assert_eq!(rows_with(&buf, "╌").len(), 2);
    }

    #[test]
    fn zoom_and_pan_stay_in_bounds() {
        let mut chart = sample_chart(vec![]);
        for _ in 0..10 {
            chart.zoom_in();
        }
        assert_eq!(chart.zoom, 32);
        chart.pan_left();
        chart.pan_left();
        assert!(chart.offset <= chart.candles.len());
        for _ in 0..10 {
            chart.pan_right();
            chart.zoom_out();
        }
        assert_eq!((chart.zoom, chart.offset), (1, 0));
        draw(&chart);
    }

    #[test]
    fn empty_chart_renders_placeholder() {
        let chart = Chart::new("X".to_string(), Granularity::OneHour);
        let buf = draw(&chart);
        assert!(rows_with(&buf, "█").is_empty());
    }
}
