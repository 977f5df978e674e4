use std::ops::Range;
use std::time::Duration;

use anyhow::Result;
use rand::Rng;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::engine::lifeline::{self, Lifeline, LifelineError, Lifelines};
use crate::engine::scoring::{self, Award};
use crate::engine::shuffle::shuffled_indices;
use crate::engine::timer::{TimedAnswer, TimedInput, whole_seconds_left};
use crate::event::{Clock, InputSource};
use crate::session::question::{
    Category, Difficulty, DisplayedQuestion, OPTION_COUNT, QuestionRecord, parse_record,
};
use crate::session::state::{IncorrectAttempt, SessionState};
use crate::store::question_store::{QuestionBank, band_range};

#[derive(Clone, Debug)]
pub struct QuizSettings {
    pub session_questions: usize,
    pub band_size: usize,
    pub time_limit: Duration,
    pub extra_time: Duration,
    pub poll_interval: Duration,
}

impl QuizSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            session_questions: config.session_questions,
            band_size: config.band_size,
            time_limit: config.time_limit(),
            extra_time: config.extra_time(),
            poll_interval: config.poll_interval(),
        }
    }
}

/// Everything the screen needs to draw the in-flight question.
pub struct QuestionFrame<'a> {
    pub slot: usize,
    pub total: usize,
    pub category: Category,
    pub difficulty: Difficulty,
    pub question: &'a DisplayedQuestion,
    pub lifelines: &'a Lifelines,
    pub score: i32,
    pub streak: u32,
    pub remaining_secs: u64,
    pub budget_secs: u64,
    pub notice: Option<&'a str>,
}

pub trait QuizScreen {
    fn draw_question(&mut self, frame: &QuestionFrame<'_>) -> Result<()>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SlotOutcome {
    Correct(Award),
    Wrong { chosen: usize, penalty: i32 },
    TimedOut { penalty: i32 },
    Skipped,
}

#[derive(Clone, Debug)]
pub struct SlotReport {
    /// 1-based.
    pub slot: usize,
    pub question_index: usize,
    pub question: DisplayedQuestion,
    pub outcome: SlotOutcome,
    pub score: i32,
}

enum Turn {
    Finished(SlotOutcome),
    Replaced(usize, QuestionRecord),
}

enum LifelineEffect {
    Resume(String),
    Skip,
    Replace(usize, QuestionRecord),
}

/// One play-through of a category and difficulty.
pub struct Quiz {
    category: Category,
    difficulty: Difficulty,
    bank: QuestionBank,
    settings: QuizSettings,
    timer: TimedInput,
    pool: Vec<usize>,
    cursor: usize,
    completed: usize,
    state: SessionState,
}

impl Quiz {
    pub fn new<R: Rng + ?Sized>(
        bank: QuestionBank,
        category: Category,
        difficulty: Difficulty,
        settings: QuizSettings,
        rng: &mut R,
    ) -> Self {
        let timer = TimedInput::new(settings.poll_interval);
        let mut quiz = Self {
            category,
            difficulty,
            bank,
            state: SessionState::new(settings.time_limit.as_secs()),
            settings,
            timer,
            pool: Vec::new(),
            cursor: 0,
            completed: 0,
        };
        quiz.restart(rng);
        quiz
    }

    /// Fresh state, re-armed lifelines, reshuffled pool.
    pub fn restart<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.state.reset();
        self.pool = shuffled_indices(self.band(), rng);
        self.cursor = 0;
        self.completed = 0;
        info!(
            category = self.category.label(),
            difficulty = self.difficulty.label(),
            questions = self.settings.session_questions,
            "quiz started"
        );
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn settings(&self) -> &QuizSettings {
        &self.settings
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn completed(&self) -> usize {
        self.completed
    }

    pub fn band(&self) -> Range<usize> {
        band_range(self.difficulty, self.settings.band_size)
    }

    fn record(&self, index: usize) -> Option<QuestionRecord> {
        let line = self.bank.get(index)?;
        match parse_record(line) {
            Ok(record) => Some(record),
            Err(err) => {
                warn!(line = index + 1, %err, "skipping malformed question");
                None
            }
        }
    }

    fn next_candidate(&mut self) -> Option<(usize, QuestionRecord)> {
        while let Some(&index) = self.pool.get(self.cursor) {
            self.cursor += 1;
            if self.state.is_used(index) {
                continue;
            }
            if let Some(record) = self.record(index) {
                return Some((index, record));
            }
        }
        None
    }

    /// Play the next slot to completion. `None` once the session is over,
    /// either because every slot is done or the band has no playable
    /// question left.
    pub fn play_next<I, C, S, R>(
        &mut self,
        input: &mut I,
        clock: &C,
        screen: &mut S,
        rng: &mut R,
    ) -> Result<Option<SlotReport>>
    where
        I: InputSource + ?Sized,
        C: Clock + ?Sized,
        S: QuizScreen + ?Sized,
        R: Rng + ?Sized,
    {
        if self.completed >= self.settings.session_questions {
            return Ok(None);
        }
        let Some((mut index, mut record)) = self.next_candidate() else {
            info!(completed = self.completed, "question pool exhausted");
            return Ok(None);
        };

        let mut notice = None;
        loop {
            let mut question = DisplayedQuestion::shuffled(&record, rng);
            match self.ask(&mut question, index, input, clock, screen, notice.take())? {
                Turn::Replaced(next, next_record) => {
                    debug!(from = index, to = next, "question replaced");
                    index = next;
                    record = next_record;
                    notice = Some("Question replaced".to_string());
                }
                Turn::Finished(outcome) => {
                    self.state.mark_used(index);
                    self.completed += 1;
                    debug!(slot = self.completed, index, ?outcome, score = self.state.score, "slot finished");
                    return Ok(Some(SlotReport {
                        slot: self.completed,
                        question_index: index,
                        question,
                        outcome,
                        score: self.state.score,
                    }));
                }
            }
        }
    }

    fn ask<I, C, S>(
        &mut self,
        question: &mut DisplayedQuestion,
        index: usize,
        input: &mut I,
        clock: &C,
        screen: &mut S,
        mut notice: Option<String>,
    ) -> Result<Turn>
    where
        I: InputSource + ?Sized,
        C: Clock + ?Sized,
        S: QuizScreen + ?Sized,
    {
        // Keys typed before the question appeared are not answers to it.
        let dropped = input.flush();
        if dropped > 0 {
            debug!(dropped, "flushed stale keystrokes");
        }

        let started = clock.now();
        let mut deadline = started + self.settings.time_limit;
        loop {
            let remaining = deadline.saturating_sub(clock.now());
            let budget_secs = whole_seconds_left(deadline - started);
            let answer = self.timer.await_answer(input, clock, remaining, |remaining_secs| {
                screen.draw_question(&QuestionFrame {
                    slot: self.completed + 1,
                    total: self.settings.session_questions,
                    category: self.category,
                    difficulty: self.difficulty,
                    question: &*question,
                    lifelines: &self.state.lifelines,
                    score: self.state.score,
                    streak: self.state.streak,
                    remaining_secs,
                    budget_secs,
                    notice: notice.as_deref(),
                })
            })?;

            let choice = match answer {
                TimedAnswer::TimedOut => {
                    let penalty = self.settle_miss(question);
                    return Ok(Turn::Finished(SlotOutcome::TimedOut { penalty }));
                }
                TimedAnswer::Answer(choice) => choice,
            };

            let Some(lifeline) = Lifeline::from_choice(choice) else {
                let slot = usize::from(choice - 1);
                return Ok(Turn::Finished(self.settle_answer(question, slot)));
            };

            match self.use_lifeline(lifeline, question, index, &mut deadline) {
                Ok(LifelineEffect::Resume(message)) => notice = Some(message),
                Ok(LifelineEffect::Skip) => return Ok(Turn::Finished(SlotOutcome::Skipped)),
                Ok(LifelineEffect::Replace(next, record)) => return Ok(Turn::Replaced(next, record)),
                Err(err) => {
                    debug!(?lifeline, %err, "lifeline rejected");
                    notice = Some(err.to_string());
                }
            }
        }
    }

    fn use_lifeline(
        &mut self,
        lifeline: Lifeline,
        question: &mut DisplayedQuestion,
        current: usize,
        deadline: &mut Duration,
    ) -> Result<LifelineEffect, LifelineError> {
        self.state.lifelines.ensure_available(lifeline)?;
        let effect = match lifeline {
            Lifeline::FiftyFifty => {
                let removed = lifeline::fifty_fifty(question);
                let shown: Vec<String> = removed.iter().map(|slot| (slot + 1).to_string()).collect();
                LifelineEffect::Resume(format!("50/50 used: removed options {}", shown.join(" and ")))
            }
            Lifeline::Skip => LifelineEffect::Skip,
            Lifeline::Replace => {
                let (next, record) = lifeline::find_replacement(
                    self.band(),
                    &self.state.used_question_indices,
                    current,
                    |i| self.record(i),
                )
                .ok_or(LifelineError::BandExhausted)?;
                LifelineEffect::Replace(next, record)
            }
            Lifeline::ExtraTime => {
                *deadline += self.settings.extra_time;
                LifelineEffect::Resume(format!(
                    "+{} seconds added",
                    self.settings.extra_time.as_secs()
                ))
            }
        };
        self.state.lifelines.consume(lifeline)?;
        info!(lifeline = lifeline.label(), "lifeline used");
        Ok(effect)
    }

    fn settle_answer(&mut self, question: &DisplayedQuestion, slot: usize) -> SlotOutcome {
        if slot < OPTION_COUNT && question.is_correct(slot) {
            SlotOutcome::Correct(scoring::record_correct(&mut self.state))
        } else {
            let penalty = scoring::record_miss(
                &mut self.state,
                self.difficulty,
                IncorrectAttempt::from(question),
            );
            SlotOutcome::Wrong {
                chosen: slot,
                penalty,
            }
        }
    }

    fn settle_miss(&mut self, question: &DisplayedQuestion) -> i32 {
        scoring::record_miss(&mut self.state, self.difficulty, IncorrectAttempt::from(question))
    }
}
