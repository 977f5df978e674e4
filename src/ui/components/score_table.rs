use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Paragraph, Row, Table, Widget};

use crate::store::high_scores::HighScoreEntry;
use crate::ui::theme::Theme;

pub struct ScoreTable<'a> {
    entries: &'a [HighScoreEntry],
    theme: &'a Theme,
}

impl<'a> ScoreTable<'a> {
    /// `entries` are expected best first.
    pub fn new(entries: &'a [HighScoreEntry], theme: &'a Theme) -> Self {
        Self { entries, theme }
    }
}

impl Widget for ScoreTable<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let block = Block::bordered()
            .title(" High Scores ")
            .title_bottom(Line::from(" [Enter/Esc] Back ").alignment(Alignment::Right))
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));

        if self.entries.is_empty() {
            Paragraph::new("No high scores yet.")
                .alignment(Alignment::Center)
                .style(Style::default().fg(colors.text_dim()))
                .block(block)
                .render(area, buf);
            return;
        }

        let header = Row::new(["#", "Player", "Score", "Category", "Difficulty"]).style(
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        );
        let rows = self.entries.iter().enumerate().map(|(i, entry)| {
            let style = if i == 0 {
                Style::default().fg(colors.accent())
            } else {
                Style::default().fg(colors.fg())
            };
            Row::new([
                (i + 1).to_string(),
                entry.player_name.clone(),
                entry.score.to_string(),
                entry.category.clone(),
                entry.difficulty.clone(),
            ])
            .style(style)
        });

        Table::new(
            rows,
            [
                Constraint::Length(4),
                Constraint::Min(12),
                Constraint::Length(7),
                Constraint::Length(10),
                Constraint::Length(10),
            ],
        )
        .header(header)
        .block(block)
        .render(area, buf);
    }
}
