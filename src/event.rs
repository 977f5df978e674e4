use std::cell::Cell;
use std::collections::VecDeque;
use std::io;
use std::rc::Rc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::{error, warn};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Enter,
    Backspace,
    Esc,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    Delete,
    Interrupt,
}

impl Key {
    /// Map a crossterm key event. Release and repeat events are dropped.
    pub fn from_event(key: KeyEvent) -> Option<Self> {
        if key.kind != KeyEventKind::Press {
            return None;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(Key::Interrupt);
        }
        match key.code {
            KeyCode::Char(ch) => Some(Key::Char(ch)),
            KeyCode::Enter => Some(Key::Enter),
            KeyCode::Backspace => Some(Key::Backspace),
            KeyCode::Esc => Some(Key::Esc),
            KeyCode::Up => Some(Key::Up),
            KeyCode::Down => Some(Key::Down),
            KeyCode::Left => Some(Key::Left),
            KeyCode::Right => Some(Key::Right),
            KeyCode::Home => Some(Key::Home),
            KeyCode::End => Some(Key::End),
            KeyCode::Delete => Some(Key::Delete),
            _ => None,
        }
    }

    pub fn digit(self) -> Option<u8> {
        match self {
            Key::Char(ch) => ch.to_digit(10).map(|d| d as u8),
            _ => None,
        }
    }
}

/// Non-blocking keyboard source. `poll` must return immediately.
pub trait InputSource {
    fn poll(&mut self) -> Option<Key>;

    /// Discard everything already buffered. Returns how many keys were dropped.
    fn flush(&mut self) -> usize {
        let mut dropped = 0;
        while self.poll().is_some() {
            dropped += 1;
        }
        dropped
    }
}

/// Monotonic time source for the countdown.
pub trait Clock {
    fn now(&self) -> Duration;
    fn sleep(&self, duration: Duration);
}

impl<C: Clock + ?Sized> Clock for Rc<C> {
    fn now(&self) -> Duration {
        (**self).now()
    }

    fn sleep(&self, duration: Duration) {
        (**self).sleep(duration)
    }
}

/// Consecutive read errors before the terminal is treated as gone.
const MAX_READ_FAILURES: u32 = 50;

#[derive(Debug, Default)]
pub struct TerminalInput {
    failures: u32,
}

impl TerminalInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a failed poll or read. Every `MAX_READ_FAILURES` in a row yield
    /// one `Interrupt` so menus can unwind.
    fn record_failure(&mut self, err: &io::Error) -> Option<Key> {
        self.failures += 1;
        if self.failures == 1 {
            warn!(%err, "terminal input failed");
        }
        if self.failures >= MAX_READ_FAILURES {
            error!(%err, failures = self.failures, "terminal input keeps failing");
            self.failures = 0;
            return Some(Key::Interrupt);
        }
        None
    }
}

impl InputSource for TerminalInput {
    fn poll(&mut self) -> Option<Key> {
        loop {
            match event::poll(Duration::ZERO) {
                Ok(true) => match event::read() {
                    Ok(Event::Key(key)) => {
                        self.failures = 0;
                        if let Some(key) = Key::from_event(key) {
                            return Some(key);
                        }
                    }
                    Ok(_) => self.failures = 0,
                    Err(err) => return self.record_failure(&err),
                },
                Ok(false) => {
                    self.failures = 0;
                    return None;
                }
                Err(err) => return self.record_failure(&err),
            }
        }
    }
}

pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn sleep(&self, duration: Duration) {
        thread::sleep(duration);
    }
}

/// Virtual clock: `sleep` advances time instantly.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }

    fn sleep(&self, duration: Duration) {
        self.advance(duration);
    }
}

/// Replays keystrokes at fixed offsets on a [`ManualClock`].
pub struct ScriptedInput {
    clock: Rc<ManualClock>,
    script: VecDeque<(Duration, Key)>,
}

impl ScriptedInput {
    pub fn new(clock: Rc<ManualClock>) -> Self {
        Self {
            clock,
            script: VecDeque::new(),
        }
    }

    /// Queue `key` to become available `at` on the clock. Offsets must be
    /// non-decreasing.
    pub fn key_at(mut self, at: Duration, key: Key) -> Self {
        self.script.push_back((at, key));
        self
    }

    /// Queue a key that is available as soon as the current script drains.
    pub fn then(self, key: Key) -> Self {
        let at = self.script.back().map(|(at, _)| *at).unwrap_or_default();
        self.key_at(at, key)
    }

    pub fn pending(&self) -> usize {
        self.script.len()
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self) -> Option<Key> {
        match self.script.front() {
            Some((at, _)) if *at <= self.clock.now() => self.script.pop_front().map(|(_, key)| key),
            _ => None,
        }
    }
}

/// Block on `input` until a key arrives, sleeping `interval` between polls.
pub fn wait_key<I, C>(input: &mut I, clock: &C, interval: Duration) -> Key
where
    I: InputSource + ?Sized,
    C: Clock + ?Sized,
{
    loop {
        if let Some(key) = input.poll() {
            return key;
        }
        clock.sleep(interval);
    }
}
