use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Widget};

use crate::ui::theme::Theme;

/// Seconds left at which the countdown switches to the warning colour.
const LOW_TIME_SECS: u64 = 5;

pub struct ProgressBar<'a> {
    pub label: String,
    pub ratio: f64,
    pub fill: Color,
    pub theme: &'a Theme,
}

impl<'a> ProgressBar<'a> {
    pub fn new(label: &str, ratio: f64, theme: &'a Theme) -> Self {
        Self {
            label: label.to_string(),
            ratio: ratio.clamp(0.0, 1.0),
            fill: theme.colors.bar_filled(),
            theme,
        }
    }

    /// Draining bar for the answer timer.
    pub fn countdown(remaining_secs: u64, budget_secs: u64, theme: &'a Theme) -> Self {
        let ratio = if budget_secs == 0 {
            0.0
        } else {
            remaining_secs as f64 / budget_secs as f64
        };
        let mut bar = Self::new(&format!("[ TIME LEFT: {remaining_secs}s ]"), ratio, theme);
        if remaining_secs <= LOW_TIME_SECS {
            bar.fill = theme.colors.warning();
        }
        bar
    }
}

impl Widget for ProgressBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered().border_style(Style::default().fg(colors.border()));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let filled_width = (self.ratio * inner.width as f64).round() as u16;

        for x in inner.x..inner.x + inner.width {
            let style = if x < inner.x + filled_width {
                Style::default().fg(colors.bg()).bg(self.fill)
            } else {
                Style::default().fg(colors.fg()).bg(colors.bar_empty())
            };
            buf[(x, inner.y)].set_style(style);
        }

        let label_width = self.label.chars().count() as u16;
        let label_x = inner.x + (inner.width.saturating_sub(label_width)) / 2;
        buf.set_string(label_x, inner.y, &self.label, Style::default().fg(colors.fg()));
    }
}
