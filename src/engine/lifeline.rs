use std::ops::Range;

use thiserror::Error;

use crate::session::question::{DisplayedQuestion, OPTION_COUNT};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Lifeline {
    FiftyFifty,
    Skip,
    Replace,
    ExtraTime,
}

impl Lifeline {
    pub const ALL: [Lifeline; 4] = [
        Lifeline::FiftyFifty,
        Lifeline::Skip,
        Lifeline::Replace,
        Lifeline::ExtraTime,
    ];

    /// Lifelines sit after the four answers, as choices 5-8.
    pub fn from_choice(choice: u8) -> Option<Self> {
        match choice {
            5 => Some(Lifeline::FiftyFifty),
            6 => Some(Lifeline::Skip),
            7 => Some(Lifeline::Replace),
            8 => Some(Lifeline::ExtraTime),
            _ => None,
        }
    }

    pub fn choice(self) -> u8 {
        match self {
            Lifeline::FiftyFifty => 5,
            Lifeline::Skip => 6,
            Lifeline::Replace => 7,
            Lifeline::ExtraTime => 8,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Lifeline::FiftyFifty => "50/50",
            Lifeline::Skip => "Skip",
            Lifeline::Replace => "Replace",
            Lifeline::ExtraTime => "+Time",
        }
    }

    fn slot(self) -> usize {
        usize::from(self.choice() - 5)
    }
}

#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum LifelineError {
    #[error("{} already used!", .0.label())]
    AlreadyUsed(Lifeline),
    #[error("no unused question left in this difficulty")]
    BandExhausted,
}

/// One-shot flags for the four lifelines of a session.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Lifelines {
    used: [bool; 4],
}

impl Lifelines {
    pub fn is_available(&self, lifeline: Lifeline) -> bool {
        !self.used[lifeline.slot()]
    }

    pub fn ensure_available(&self, lifeline: Lifeline) -> Result<(), LifelineError> {
        if self.is_available(lifeline) {
            Ok(())
        } else {
            Err(LifelineError::AlreadyUsed(lifeline))
        }
    }

    pub fn consume(&mut self, lifeline: Lifeline) -> Result<(), LifelineError> {
        self.ensure_available(lifeline)?;
        self.used[lifeline.slot()] = true;
        Ok(())
    }

    pub fn used_count(&self) -> usize {
        self.used.iter().filter(|&&u| u).count()
    }

    pub fn reset(&mut self) {
        self.used = [false; 4];
    }
}

/// Remove the first two incorrect options in display order. Returns the
/// removed slots.
pub fn fifty_fifty(question: &mut DisplayedQuestion) -> Vec<usize> {
    let removed: Vec<usize> = (0..OPTION_COUNT)
        .filter(|&slot| slot != question.correct && !question.is_removed(slot))
        .take(2)
        .collect();
    for &slot in &removed {
        question.removed[slot] = true;
    }
    removed
}

/// Linear scan of `band` for the first index that is neither `current` nor
/// already used and that `load` accepts.
pub fn find_replacement<T, F>(
    band: Range<usize>,
    used: &[usize],
    current: usize,
    mut load: F,
) -> Option<(usize, T)>
where
    F: FnMut(usize) -> Option<T>,
{
    band.filter(|&index| index != current && !used.contains(&index))
        .find_map(|index| load(index).map(|item| (index, item)))
}
