use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::session::quiz::{SlotOutcome, SlotReport};
use crate::session::state::SessionState;
use crate::ui::theme::Theme;

/// Headline and detail lines for a finished question.
pub fn outcome_text(report: &SlotReport) -> (String, Vec<String>) {
    let correct = format!("Correct answer: {}", report.question.correct_option());
    match &report.outcome {
        SlotOutcome::Correct(award) => {
            let total = award.total();
            let unit = if total == 1 { "point" } else { "points" };
            let mut details = vec![format!("+{total} {unit}")];
            if let Some(bonus) = award.bonus {
                details.push(format!("Streak bonus +{bonus}"));
            }
            ("Correct!".to_string(), details)
        }
        SlotOutcome::Wrong { penalty, .. } => {
            ("Wrong!".to_string(), vec![correct, format!("-{penalty} points")])
        }
        SlotOutcome::TimedOut { penalty } => (
            "Time's up!".to_string(),
            vec![correct, format!("-{penalty} points")],
        ),
        SlotOutcome::Skipped => ("Question skipped".to_string(), Vec::new()),
    }
}

/// Result of a single question, shown until the player presses Enter.
pub struct SlotSummary<'a> {
    report: &'a SlotReport,
    theme: &'a Theme,
}

impl<'a> SlotSummary<'a> {
    pub fn new(report: &'a SlotReport, theme: &'a Theme) -> Self {
        Self { report, theme }
    }

    fn headline_color(&self) -> Color {
        let colors = &self.theme.colors;
        match self.report.outcome {
            SlotOutcome::Correct(_) => colors.success(),
            SlotOutcome::Wrong { .. } | SlotOutcome::TimedOut { .. } => colors.error(),
            SlotOutcome::Skipped => colors.warning(),
        }
    }
}

impl Widget for SlotSummary<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let (headline, details) = outcome_text(self.report);

        let mut lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                headline,
                Style::default()
                    .fg(self.headline_color())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];
        lines.extend(
            details
                .into_iter()
                .map(|d| Line::from(Span::styled(d, Style::default().fg(colors.fg())))),
        );
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("Score: {}", self.report.score),
            Style::default().fg(colors.accent()),
        )));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "[Enter] Continue",
            Style::default().fg(colors.text_dim()),
        )));

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(
                Block::bordered()
                    .title(format!(" Question {} ", self.report.slot))
                    .border_style(Style::default().fg(colors.border_focused()))
                    .style(Style::default().bg(colors.bg())),
            )
            .render(area, buf);
    }
}

/// End-of-session totals.
pub struct SessionSummary<'a> {
    pub player: &'a str,
    pub state: &'a SessionState,
    pub questions: usize,
    pub notices: &'a [String],
    pub theme: &'a Theme,
}

impl Widget for SessionSummary<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let mut lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "Quiz Complete!",
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                format!("Player: {}", self.player),
                Style::default().fg(colors.fg()),
            )),
            Line::from(Span::styled(
                format!("Final Score: {}", self.state.score),
                Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                format!(
                    "Correct: {} | Wrong: {} | Questions: {}",
                    self.state.correct_count, self.state.wrong_count, self.questions
                ),
                Style::default().fg(colors.fg()),
            )),
        ];
        if !self.notices.is_empty() {
            lines.push(Line::from(""));
            lines.extend(self.notices.iter().map(|n| {
                Line::from(Span::styled(n.clone(), Style::default().fg(colors.warning())))
            }));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "[Enter] Continue",
            Style::default().fg(colors.text_dim()),
        )));

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(
                Block::bordered()
                    .border_style(Style::default().fg(colors.border()))
                    .style(Style::default().bg(colors.bg())),
            )
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::scoring::Award;
    use crate::session::question::{DisplayedQuestion, QuestionRecord};
    use crate::ui::buffer_lines;

    fn report(outcome: SlotOutcome) -> SlotReport {
        let record = QuestionRecord {
            text: "2 + 2?".to_string(),
            options: ["3", "4", "5", "22"].map(String::from),
            correct_index: 1,
        };
        SlotReport {
            slot: 4,
            question_index: 17,
            question: DisplayedQuestion::with_order(&record, [3, 2, 1, 0]),
            outcome,
            score: 12,
        }
    }

    #[test]
    fn correct_with_bonus() {
        let award = Award {
            points: 1,
            bonus: Some(5),
            streak: 3,
        };
        let (headline, details) = outcome_text(&report(SlotOutcome::Correct(award)));
        assert_eq!(headline, "Correct!");
        assert_eq!(details, vec!["+6 points", "Streak bonus +5"]);
    }

    #[test]
    fn timeout_reveals_answer() {
        let (headline, details) = outcome_text(&report(SlotOutcome::TimedOut { penalty: 3 }));
        assert_eq!(headline, "Time's up!");
        assert_eq!(details, vec!["Correct answer: 4", "-3 points"]);
    }

    #[test]
    fn skipped_has_no_details() {
        let (headline, details) = outcome_text(&report(SlotOutcome::Skipped));
        assert_eq!(headline, "Question skipped");
        assert!(details.is_empty());
    }

    #[test]
    fn session_summary_shows_totals_and_notices() {
        let theme = Theme::default();
        let mut state = SessionState::new(15);
        state.score = 8;
        state.correct_count = 6;
        state.wrong_count = 4;
        let notices = vec!["Could not save high score".to_string()];
        let area = Rect::new(0, 0, 70, 16);
        let mut buf = Buffer::empty(area);
        SessionSummary {
            player: "Ada",
            state: &state,
            questions: 10,
            notices: &notices,
            theme: &theme,
        }
        .render(area, &mut buf);
        let text = buffer_lines(&buf).join("\n");
        assert!(text.contains("Final Score: 8"));
        assert!(text.contains("Correct: 6 | Wrong: 4"));
        assert!(text.contains("Could not save high score"));
    }
}
