use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::engine::lifeline::{Lifeline, Lifelines};
use crate::session::quiz::QuestionFrame;
use crate::ui::components::progress_bar::ProgressBar;
use crate::ui::layout::{ScreenLayout, pack_hint_lines};
use crate::ui::theme::Theme;

const HINTS: [&str; 3] = ["[1-4] Answer", "[5-8] Lifeline", "Unanswered questions time out"];

/// `5) 50/50 [OK]`, one entry per lifeline.
pub fn lifeline_status(lifelines: &Lifelines) -> Vec<String> {
    Lifeline::ALL
        .iter()
        .map(|&lifeline| {
            let mark = if lifelines.is_available(lifeline) {
                "OK"
            } else {
                "USED"
            };
            format!("{}) {} [{mark}]", lifeline.choice(), lifeline.label())
        })
        .collect()
}

pub struct QuestionPanel<'a, 'f> {
    frame: &'a QuestionFrame<'f>,
    theme: &'a Theme,
}

impl<'a, 'f> QuestionPanel<'a, 'f> {
    pub fn new(frame: &'a QuestionFrame<'f>, theme: &'a Theme) -> Self {
        Self { frame, theme }
    }

    fn header_line(&self) -> Line<'static> {
        let colors = &self.theme.colors;
        let f = self.frame;
        Line::from(vec![
            Span::styled(
                format!(" Question {}/{} ", f.slot, f.total),
                Style::default()
                    .fg(colors.header_fg())
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(" {} | {} ", f.category.label(), f.difficulty.label()),
                Style::default().fg(colors.accent()),
            ),
            Span::styled(
                format!(" Score: {}  Streak: {} ", f.score, f.streak),
                Style::default().fg(colors.header_fg()),
            ),
        ])
    }
}

impl Widget for QuestionPanel<'_, '_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let layout = ScreenLayout::new(area);

        Paragraph::new(self.header_line())
            .block(
                Block::bordered()
                    .border_style(Style::default().fg(colors.border()))
                    .style(Style::default().bg(colors.header_bg())),
            )
            .render(layout.header, buf);

        let body = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(6), Constraint::Length(3)])
            .split(layout.main);

        let question = self.frame.question;
        let mut lines = vec![
            Line::from(Span::styled(
                question.text.clone(),
                Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];
        for (slot, option) in question.options.iter().enumerate() {
            let line = if question.is_removed(slot) {
                Line::from(Span::styled(
                    format!("  {}) ----", slot + 1),
                    Style::default().fg(colors.text_dim()),
                ))
            } else {
                Line::from(vec![
                    Span::styled(format!("  {}) ", slot + 1), Style::default().fg(colors.accent())),
                    Span::styled(option.clone(), Style::default().fg(colors.fg())),
                ])
            };
            lines.push(line);
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("  {}", lifeline_status(self.frame.lifelines).join("   ")),
            Style::default().fg(colors.text_dim()),
        )));
        if let Some(notice) = self.frame.notice {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                format!("  {notice}"),
                Style::default().fg(colors.warning()),
            )));
        }

        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(
                Block::bordered()
                    .border_style(Style::default().fg(colors.border_focused()))
                    .style(Style::default().bg(colors.bg())),
            )
            .render(body[0], buf);

        ProgressBar::countdown(self.frame.remaining_secs, self.frame.budget_secs, self.theme)
            .render(body[1], buf);

        let hints = pack_hint_lines(&HINTS, layout.footer.width as usize);
        let hint_lines: Vec<Line> = hints
            .into_iter()
            .map(|h| Line::from(Span::styled(h, Style::default().fg(colors.text_dim()))))
            .collect();
        Paragraph::new(hint_lines).render(layout.footer, buf);
    }
}
