use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::session::question::{Category, Difficulty};
use crate::ui::theme::Theme;

pub struct MenuItem {
    pub key: String,
    pub label: String,
    pub description: String,
}

impl MenuItem {
    fn new(key: impl ToString, label: &str, description: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            description: description.to_string(),
        }
    }
}

/// Numbered choice screen. Selection happens by key, there is no cursor.
pub struct Menu<'a> {
    pub title: String,
    pub subtitle: String,
    pub items: Vec<MenuItem>,
    pub notice: Option<String>,
    pub theme: &'a Theme,
}

impl<'a> Menu<'a> {
    pub fn new(title: &str, subtitle: &str, items: Vec<MenuItem>, theme: &'a Theme) -> Self {
        Self {
            title: title.to_string(),
            subtitle: subtitle.to_string(),
            items,
            notice: None,
            theme,
        }
    }

    pub fn main(theme: &'a Theme) -> Self {
        Self::new(
            "quizdr",
            "Terminal Trivia Quiz",
            vec![
                MenuItem::new(1, "Start Quiz", "Pick a category and difficulty"),
                MenuItem::new(2, "View High Scores", "Best sessions so far"),
                MenuItem::new(3, "Exit", "Leave the game"),
            ],
            theme,
        )
    }

    pub fn categories(theme: &'a Theme) -> Self {
        let items = Category::ALL
            .iter()
            .enumerate()
            .map(|(i, cat)| MenuItem::new(i + 1, cat.menu_label(), ""))
            .collect();
        Self::new("Select Category", "", items, theme)
    }

    pub fn difficulties(theme: &'a Theme) -> Self {
        let items = Difficulty::ALL
            .iter()
            .enumerate()
            .map(|(i, diff)| {
                let penalty = format!("Wrong answers cost {} points", diff.penalty());
                MenuItem::new(i + 1, diff.label(), &penalty)
            })
            .collect();
        Self::new("Select Difficulty", "", items, theme)
    }

    pub fn post_quiz(theme: &'a Theme) -> Self {
        Self::new(
            "What next?",
            "",
            vec![
                MenuItem::new(1, "Review Incorrect Answers", ""),
                MenuItem::new(2, "Play Again", "Same category and difficulty"),
                MenuItem::new(3, "Main Menu", ""),
            ],
            theme,
        )
    }

    pub fn with_notice(mut self, notice: Option<String>) -> Self {
        self.notice = notice;
        self
    }
}

impl Widget for &Menu<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Min(0),
                Constraint::Length(2),
            ])
            .split(inner);

        let mut title_lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                &*self.title,
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
        ];
        if !self.subtitle.is_empty() {
            title_lines.push(Line::from(Span::styled(
                &*self.subtitle,
                Style::default().fg(colors.fg()),
            )));
        }
        Paragraph::new(title_lines)
            .alignment(Alignment::Center)
            .render(layout[0], buf);

        let mut lines = Vec::new();
        for item in &self.items {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("  [{}] ", item.key),
                    Style::default().fg(colors.accent()),
                ),
                Span::styled(
                    &*item.label,
                    Style::default()
                        .fg(colors.fg())
                        .add_modifier(Modifier::BOLD),
                ),
            ]));
            if !item.description.is_empty() {
                lines.push(Line::from(Span::styled(
                    format!("      {}", item.description),
                    Style::default().fg(colors.text_dim()),
                )));
            }
        }
        Paragraph::new(lines).render(layout[1], buf);

        if let Some(notice) = &self.notice {
            Paragraph::new(Line::from(Span::styled(
                format!("  {notice}"),
                Style::default().fg(colors.warning()),
            )))
            .wrap(Wrap { trim: false })
            .render(layout[2], buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::buffer_lines;

    fn render(menu: &Menu) -> String {
        let area = Rect::new(0, 0, 60, 20);
        let mut buf = Buffer::empty(area);
        menu.render(area, &mut buf);
        buffer_lines(&buf).join("\n")
    }

    #[test]
    fn category_menu_lists_every_category() {
        let theme = Theme::default();
        let text = render(&Menu::categories(&theme));
        assert!(text.contains("[1] Science"));
        assert!(text.contains("[5] IQ/Logic"));
    }

    #[test]
    fn difficulty_menu_shows_penalties() {
        let theme = Theme::default();
        let text = render(&Menu::difficulties(&theme));
        assert!(text.contains("[3] Hard"));
        assert!(text.contains("Wrong answers cost 5 points"));
    }

    #[test]
    fn notice_is_rendered() {
        let theme = Theme::default();
        let menu = Menu::main(&theme).with_notice(Some("Invalid choice".to_string()));
        assert!(render(&menu).contains("Invalid choice"));
    }
}
