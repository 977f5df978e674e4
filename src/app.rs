use std::time::Duration;

use anyhow::{Result, anyhow};
use chrono::Local;
use rand::rngs::SmallRng;
use ratatui::backend::Backend;
use ratatui::layout::Alignment;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Wrap};
use ratatui::{Frame, Terminal};
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::event::{Clock, InputSource, Key, wait_key};
use crate::session::question::{Category, Difficulty};
use crate::session::quiz::{QuestionFrame, Quiz, QuizScreen, QuizSettings, SlotReport};
use crate::session::state::IncorrectAttempt;
use crate::store::high_scores::{HighScoreEntry, HighScoreTable, sanitize_player_name};
use crate::store::question_store::QuestionBank;
use crate::store::session_log::{SessionLog, SessionLogEntry};
use crate::ui::components::menu::Menu;
use crate::ui::components::question_panel::QuestionPanel;
use crate::ui::components::review_panel::ReviewPanel;
use crate::ui::components::score_table::ScoreTable;
use crate::ui::components::summary::{SessionSummary, SlotSummary};
use crate::ui::layout::centered_rect;
use crate::ui::line_input::{InputResult, LineInput};
use crate::ui::theme::Theme;

const MAX_NAME_CHARS: usize = 24;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum MenuKind {
    Main,
    Categories,
    Difficulties,
    AfterQuiz,
}

impl MenuKind {
    fn build(self, theme: &Theme) -> Menu<'_> {
        match self {
            MenuKind::Main => Menu::main(theme),
            MenuKind::Categories => Menu::categories(theme),
            MenuKind::Difficulties => Menu::difficulties(theme),
            MenuKind::AfterQuiz => Menu::post_quiz(theme),
        }
    }

    fn len(self) -> u8 {
        match self {
            MenuKind::Main | MenuKind::AfterQuiz => 3,
            MenuKind::Categories => Category::ALL.len() as u8,
            MenuKind::Difficulties => Difficulty::ALL.len() as u8,
        }
    }
}

fn invalid_choice(count: u8) -> String {
    format!("Invalid choice. Enter a number from 1 to {count}.")
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Choice {
    Picked(u8),
    Back,
    Quit,
}

enum NameEntry {
    Entered(String),
    Back,
    Quit,
}

enum AfterQuiz {
    Replay,
    MainMenu,
    Quit,
}

/// Owns the terminal and knows how to paint each screen.
pub struct Screen<B: Backend> {
    terminal: Terminal<B>,
    theme: Theme,
}

impl<B: Backend> Screen<B> {
    pub fn new(backend: B, theme: Theme) -> Result<Self> {
        let terminal = Terminal::new(backend).map_err(|err| anyhow!("terminal setup failed: {err}"))?;
        Ok(Self { terminal, theme })
    }

    pub fn backend(&self) -> &B {
        self.terminal.backend()
    }

    fn draw(&mut self, render: impl FnOnce(&mut Frame, &Theme)) -> Result<()> {
        let theme = &self.theme;
        self.terminal
            .draw(|frame| {
                let bg = Block::default().style(Style::default().bg(theme.colors.bg()));
                frame.render_widget(bg, frame.area());
                render(frame, theme);
            })
            .map_err(|err| anyhow!("draw failed: {err}"))?;
        Ok(())
    }

    fn menu(&mut self, kind: MenuKind, notice: Option<String>) -> Result<()> {
        self.draw(|frame, theme| {
            let menu = kind.build(theme).with_notice(notice);
            let area = centered_rect(50, 70, frame.area());
            frame.render_widget(&menu, area);
        })
    }

    fn message(&mut self, title: &str, lines: &[String]) -> Result<()> {
        self.draw(|frame, theme| {
            let colors = &theme.colors;
            let mut text: Vec<Line> = vec![Line::from("")];
            text.extend(lines.iter().map(|l| Line::from(l.as_str())));
            text.push(Line::from(""));
            text.push(Line::from(Span::styled(
                "[Enter] Continue",
                Style::default().fg(colors.text_dim()),
            )));
            let paragraph = Paragraph::new(text)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .style(Style::default().fg(colors.fg()))
                .block(
                    Block::bordered()
                        .title(format!(" {title} "))
                        .border_style(Style::default().fg(colors.warning())),
                );
            frame.render_widget(paragraph, centered_rect(60, 40, frame.area()));
        })
    }

    fn name_entry(&mut self, input: &LineInput) -> Result<()> {
        self.draw(|frame, theme| {
            let colors = &theme.colors;
            let (before, cursor, after) = input.render_parts();
            let cursor = cursor.map(String::from).unwrap_or_else(|| " ".to_string());
            let text = vec![
                Line::from(""),
                Line::from(Span::styled(
                    "Enter your name:",
                    Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                Line::from(vec![
                    Span::styled(format!("  {before}"), Style::default().fg(colors.accent())),
                    Span::styled(
                        cursor,
                        Style::default().fg(colors.bg()).bg(colors.accent()),
                    ),
                    Span::styled(after.to_string(), Style::default().fg(colors.accent())),
                ]),
                Line::from(""),
                Line::from(Span::styled(
                    "[Enter] Confirm  [Esc] Back",
                    Style::default().fg(colors.text_dim()),
                )),
            ];
            let paragraph = Paragraph::new(text).block(
                Block::bordered()
                    .title(" New Quiz ")
                    .border_style(Style::default().fg(colors.border_focused())),
            );
            frame.render_widget(paragraph, centered_rect(50, 40, frame.area()));
        })
    }

    fn slot_summary(&mut self, report: &SlotReport) -> Result<()> {
        self.draw(|frame, theme| {
            let area = centered_rect(50, 50, frame.area());
            frame.render_widget(SlotSummary::new(report, theme), area);
        })
    }

    fn session_summary(&mut self, player: &str, quiz: &Quiz, notices: &[String]) -> Result<()> {
        self.draw(|frame, theme| {
            let summary = SessionSummary {
                player,
                state: quiz.state(),
                questions: quiz.settings().session_questions,
                notices,
                theme,
            };
            frame.render_widget(summary, centered_rect(50, 60, frame.area()));
        })
    }

    fn review(&mut self, attempt: &IncorrectAttempt, position: usize, total: usize) -> Result<()> {
        self.draw(|frame, theme| {
            let panel = ReviewPanel::new(attempt, position, total, theme);
            frame.render_widget(panel, centered_rect(70, 60, frame.area()));
        })
    }

    fn high_scores(&mut self, entries: &[HighScoreEntry]) -> Result<()> {
        self.draw(|frame, theme| {
            frame.render_widget(ScoreTable::new(entries, theme), centered_rect(70, 80, frame.area()));
        })
    }
}

impl<B: Backend> QuizScreen for Screen<B> {
    fn draw_question(&mut self, question: &QuestionFrame<'_>) -> Result<()> {
        self.draw(|frame, theme| {
            frame.render_widget(QuestionPanel::new(question, theme), frame.area());
        })
    }
}

/// Menus, quiz sessions and persistence, driven one blocking screen at a time.
pub struct App<B: Backend, I: InputSource, C: Clock> {
    screen: Screen<B>,
    input: I,
    clock: C,
    config: Config,
    rng: SmallRng,
    high_scores: HighScoreTable,
    session_log: SessionLog,
}

impl<B: Backend, I: InputSource, C: Clock> App<B, I, C> {
    pub fn new(screen: Screen<B>, input: I, clock: C, config: Config, rng: SmallRng) -> Self {
        let data_dir = config.data_path();
        Self {
            screen,
            input,
            clock,
            high_scores: HighScoreTable::in_dir(&data_dir),
            session_log: SessionLog::in_dir(&data_dir),
            config,
            rng,
        }
    }

    pub fn screen(&self) -> &Screen<B> {
        &self.screen
    }

    pub fn run(&mut self) -> Result<()> {
        info!("main menu");
        while self.main_menu()? == Flow::Continue {}
        info!("exiting");
        Ok(())
    }

    fn poll_interval(&self) -> Duration {
        self.config.poll_interval()
    }

    fn next_key(&mut self) -> Key {
        let interval = self.poll_interval();
        wait_key(&mut self.input, &self.clock, interval)
    }

    /// Enter or Ctrl+C dismisses; menus handle the quit.
    fn wait_for_enter(&mut self) {
        while !matches!(self.next_key(), Key::Enter | Key::Interrupt) {}
    }

    /// Show a numbered menu until a valid choice, Esc/q, or Ctrl+C.
    fn choose(&mut self, kind: MenuKind, mut notice: Option<String>) -> Result<Choice> {
        let count = kind.len();
        loop {
            self.screen.menu(kind, notice.take())?;
            let key = self.next_key();
            match key {
                Key::Interrupt => return Ok(Choice::Quit),
                Key::Esc | Key::Char('q') => return Ok(Choice::Back),
                _ => {}
            }
            match key.digit().filter(|d| (1..=count).contains(d)) {
                Some(choice) => return Ok(Choice::Picked(choice)),
                None => {
                    debug!(?key, "invalid menu choice");
                    notice = Some(invalid_choice(count));
                }
            }
        }
    }

    /// Only choice 3 or Ctrl+C leaves the program; Esc and q re-prompt here.
    fn main_menu(&mut self) -> Result<Flow> {
        let mut notice = None;
        loop {
            match self.choose(MenuKind::Main, notice.take())? {
                Choice::Picked(1) => return self.start_quiz(),
                Choice::Picked(2) => {
                    self.show_high_scores()?;
                    return Ok(Flow::Continue);
                }
                Choice::Picked(_) | Choice::Quit => return Ok(Flow::Quit),
                Choice::Back => notice = Some(invalid_choice(MenuKind::Main.len())),
            }
        }
    }

    fn prompt_name(&mut self) -> Result<NameEntry> {
        let mut line = LineInput::new("", MAX_NAME_CHARS);
        loop {
            self.screen.name_entry(&line)?;
            let key = self.next_key();
            if key == Key::Interrupt {
                return Ok(NameEntry::Quit);
            }
            match line.handle(key) {
                InputResult::Submit => {
                    return Ok(NameEntry::Entered(sanitize_player_name(line.value())));
                }
                InputResult::Cancel => return Ok(NameEntry::Back),
                InputResult::Continue => {}
            }
        }
    }

    fn pick_category(&mut self) -> Result<Result<Category, Flow>> {
        Ok(match self.choose(MenuKind::Categories, None)? {
            Choice::Picked(choice) => Category::from_choice(choice).ok_or(Flow::Continue),
            Choice::Back => Err(Flow::Continue),
            Choice::Quit => Err(Flow::Quit),
        })
    }

    fn pick_difficulty(&mut self) -> Result<Result<Difficulty, Flow>> {
        Ok(match self.choose(MenuKind::Difficulties, None)? {
            Choice::Picked(choice) => Difficulty::from_choice(choice).ok_or(Flow::Continue),
            Choice::Back => Err(Flow::Continue),
            Choice::Quit => Err(Flow::Quit),
        })
    }

    fn start_quiz(&mut self) -> Result<Flow> {
        let player = match self.prompt_name()? {
            NameEntry::Entered(name) => name,
            NameEntry::Back => return Ok(Flow::Continue),
            NameEntry::Quit => return Ok(Flow::Quit),
        };
        let category = match self.pick_category()? {
            Ok(category) => category,
            Err(flow) => return Ok(flow),
        };
        let difficulty = match self.pick_difficulty()? {
            Ok(difficulty) => difficulty,
            Err(flow) => return Ok(flow),
        };

        let dir = self.config.questions_path();
        let bank = match QuestionBank::load_category(&dir, category, self.config.question_capacity) {
            Ok(bank) => bank,
            Err(err) => {
                error!(%err, "cannot start quiz");
                self.screen.message("Cannot start quiz", &[err.to_string()])?;
                self.wait_for_enter();
                return Ok(Flow::Continue);
            }
        };

        let settings = QuizSettings::from_config(&self.config);
        let mut quiz = Quiz::new(bank, category, difficulty, settings, &mut self.rng);
        loop {
            self.play(&mut quiz)?;
            if quiz.completed() == 0 {
                self.screen.message(
                    "No questions",
                    &[format!(
                        "{} has no playable {} questions.",
                        category.label(),
                        difficulty.label()
                    )],
                )?;
                self.wait_for_enter();
                return Ok(Flow::Continue);
            }

            let notices = self.record_session(&player, &quiz);
            self.screen.session_summary(&player, &quiz, &notices)?;
            self.wait_for_enter();

            let notice = (!notices.is_empty()).then(|| notices.join(" "));
            match self.after_quiz(&quiz, notice)? {
                AfterQuiz::Replay => quiz.restart(&mut self.rng),
                AfterQuiz::MainMenu => return Ok(Flow::Continue),
                AfterQuiz::Quit => return Ok(Flow::Quit),
            }
        }
    }

    fn play(&mut self, quiz: &mut Quiz) -> Result<()> {
        while let Some(report) =
            quiz.play_next(&mut self.input, &self.clock, &mut self.screen, &mut self.rng)?
        {
            self.screen.slot_summary(&report)?;
            self.wait_for_enter();
        }
        Ok(())
    }

    /// Append to the session log and the high-score table. Failures are
    /// reported but never end the game.
    fn record_session(&mut self, player: &str, quiz: &Quiz) -> Vec<String> {
        let state = quiz.state();
        let questions = quiz.settings().session_questions;
        let mut notices = Vec::new();

        if quiz.completed() < questions {
            notices.push(format!(
                "Only {} of {questions} questions were available.",
                quiz.completed()
            ));
        }

        let log_entry = SessionLogEntry {
            player: player.to_string(),
            finished_at: Local::now(),
            category: quiz.category(),
            difficulty: quiz.difficulty(),
            correct: state.correct_count,
            wrong: state.wrong_count,
            score: state.score,
            session_questions: questions,
        };
        if let Err(err) = self.session_log.append(&log_entry) {
            warn!("cannot write session log: {err:#}");
            notices.push("Could not write the session log.".to_string());
        }

        let entry = HighScoreEntry {
            player_name: player.to_string(),
            score: state.score,
            category: quiz.category().label().to_string(),
            difficulty: quiz.difficulty().label().to_string(),
        };
        if let Err(err) = self.high_scores.append(&entry) {
            warn!("cannot save high score: {err:#}");
            notices.push("Could not save your high score.".to_string());
        }

        info!(
            player,
            score = state.score,
            correct = state.correct_count,
            wrong = state.wrong_count,
            lifelines_used = state.lifelines.used_count(),
            "session finished"
        );
        notices
    }

    fn after_quiz(&mut self, quiz: &Quiz, mut notice: Option<String>) -> Result<AfterQuiz> {
        loop {
            match self.choose(MenuKind::AfterQuiz, notice.take())? {
                Choice::Picked(1) => {
                    let review = &quiz.state().review;
                    if review.is_empty() {
                        notice = Some("No incorrect answers to review.".to_string());
                    } else {
                        self.review(review)?;
                    }
                }
                Choice::Picked(2) => return Ok(AfterQuiz::Replay),
                Choice::Picked(_) | Choice::Back => return Ok(AfterQuiz::MainMenu),
                Choice::Quit => return Ok(AfterQuiz::Quit),
            }
        }
    }

    fn review(&mut self, attempts: &[IncorrectAttempt]) -> Result<()> {
        for (i, attempt) in attempts.iter().enumerate() {
            self.screen.review(attempt, i + 1, attempts.len())?;
            loop {
                match self.next_key() {
                    Key::Enter => break,
                    Key::Esc | Key::Interrupt => return Ok(()),
                    _ => {}
                }
            }
        }
        Ok(())
    }

    fn show_high_scores(&mut self) -> Result<()> {
        match self.high_scores.load_sorted() {
            Ok(mut entries) => {
                entries.truncate(self.config.high_scores_shown);
                self.screen.high_scores(&entries)?;
                loop {
                    match self.next_key() {
                        Key::Enter | Key::Esc | Key::Interrupt | Key::Char('q') => break,
                        _ => {}
                    }
                }
            }
            Err(err) => {
                warn!("cannot read high scores: {err:#}");
                self.screen
                    .message("High Scores", &["Could not read the high-score file.".to_string()])?;
                self.wait_for_enter();
            }
        }
        Ok(())
    }
}
