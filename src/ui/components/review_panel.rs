use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::session::state::IncorrectAttempt;
use crate::ui::theme::Theme;

/// One missed question, with the options in the order the player saw them.
pub struct ReviewPanel<'a> {
    attempt: &'a IncorrectAttempt,
    position: usize,
    total: usize,
    theme: &'a Theme,
}

impl<'a> ReviewPanel<'a> {
    /// `position` is 1-based.
    pub fn new(attempt: &'a IncorrectAttempt, position: usize, total: usize, theme: &'a Theme) -> Self {
        Self {
            attempt,
            position,
            total,
            theme,
        }
    }
}

impl Widget for ReviewPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let mut lines = vec![
            Line::from(Span::styled(
                self.attempt.question_text.clone(),
                Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];
        for (slot, option) in self.attempt.displayed_options.iter().enumerate() {
            let is_correct = slot == self.attempt.correct_display_index;
            let style = if is_correct {
                Style::default()
                    .fg(colors.success())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(colors.text_dim())
            };
            let marker = if is_correct { "  <- correct" } else { "" };
            lines.push(Line::from(Span::styled(
                format!("  {}) {option}{marker}", slot + 1),
                style,
            )));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("Correct answer: {}", self.attempt.correct_option()),
            Style::default().fg(colors.accent()),
        )));

        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(
                Block::bordered()
                    .title(format!(" Review {}/{} ", self.position, self.total))
                    .title_bottom(
                        Line::from(" [Enter] Next  [Esc] Back ").alignment(Alignment::Right),
                    )
                    .border_style(Style::default().fg(colors.border_focused()))
                    .style(Style::default().bg(colors.bg())),
            )
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::buffer_lines;

    #[test]
    fn marks_correct_option() {
        let theme = Theme::default();
        let attempt = IncorrectAttempt {
            question_text: "Capital of Peru?".to_string(),
            displayed_options: ["Quito", "Lima", "Bogota", "La Paz"].map(String::from),
            correct_display_index: 1,
        };
        let area = Rect::new(0, 0, 60, 14);
        let mut buf = Buffer::empty(area);
        ReviewPanel::new(&attempt, 2, 3, &theme).render(area, &mut buf);
        let lines = buffer_lines(&buf);

        assert!(lines[0].contains("Review 2/3"));
        assert!(lines.iter().any(|l| l.contains("2) Lima  <- correct")));
        assert!(lines.iter().any(|l| l.contains("Correct answer: Lima")));
    }
}
