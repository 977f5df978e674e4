use std::ops::RangeInclusive;
use std::time::Duration;

use anyhow::Result;
use tracing::{debug, trace};

use crate::event::{Clock, InputSource, Key};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Answers 1-4 plus lifelines 5-8.
pub const CHOICES: RangeInclusive<u8> = 1..=8;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerState {
    AwaitingInput,
    AnswerReceived(u8),
    TimedOut,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimedAnswer {
    Answer(u8),
    TimedOut,
}

/// Cooperative countdown prompt: polls the keyboard and the clock on one
/// thread, sleeping `poll_interval` between cycles.
#[derive(Clone, Debug)]
pub struct TimedInput {
    poll_interval: Duration,
    choices: RangeInclusive<u8>,
}

impl Default for TimedInput {
    fn default() -> Self {
        Self::new(DEFAULT_POLL_INTERVAL)
    }
}

impl TimedInput {
    pub fn new(poll_interval: Duration) -> Self {
        Self {
            poll_interval,
            choices: CHOICES,
        }
    }

    pub fn parse_choice(&self, key: Key) -> Option<u8> {
        key.digit().filter(|d| self.choices.contains(d))
    }

    /// One transition of the countdown machine.
    pub fn step<I: InputSource + ?Sized>(
        &self,
        input: &mut I,
        elapsed: Duration,
        limit: Duration,
    ) -> TimerState {
        if elapsed >= limit {
            let dropped = input.flush();
            debug!(dropped, "countdown expired");
            return TimerState::TimedOut;
        }
        while let Some(key) = input.poll() {
            match self.parse_choice(key) {
                Some(choice) => return TimerState::AnswerReceived(choice),
                None => trace!(?key, "discarded keystroke"),
            }
        }
        TimerState::AwaitingInput
    }

    /// Wait up to `limit` for a choice. `on_tick` receives the whole seconds
    /// left each time that value changes, starting with the initial value.
    pub fn await_answer<I, C, F>(
        &self,
        input: &mut I,
        clock: &C,
        limit: Duration,
        mut on_tick: F,
    ) -> Result<TimedAnswer>
    where
        I: InputSource + ?Sized,
        C: Clock + ?Sized,
        F: FnMut(u64) -> Result<()>,
    {
        let start = clock.now();
        let mut shown: Option<u64> = None;
        loop {
            let elapsed = clock.now().saturating_sub(start);
            match self.step(input, elapsed, limit) {
                TimerState::AnswerReceived(choice) => return Ok(TimedAnswer::Answer(choice)),
                TimerState::TimedOut => return Ok(TimedAnswer::TimedOut),
                TimerState::AwaitingInput => {}
            }

            let remaining = limit - elapsed;
            let secs = whole_seconds_left(remaining);
            if shown != Some(secs) {
                on_tick(secs)?;
                shown = Some(secs);
            }
            clock.sleep(self.poll_interval.min(remaining));
        }
    }
}

/// Rounded up, so a fresh 15 s countdown shows 15 until a full second passes.
pub fn whole_seconds_left(remaining: Duration) -> u64 {
    let millis = remaining.as_millis();
    millis.div_ceil(1000) as u64
}
