use rand::Rng;
use thiserror::Error;

use crate::engine::shuffle::shuffle;
use crate::store::record::{FieldCountError, split_fields};

pub const OPTION_COUNT: usize = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    Science,
    Computer,
    Sports,
    History,
    Iq,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Science,
        Category::Computer,
        Category::Sports,
        Category::History,
        Category::Iq,
    ];

    /// Menu choice `1..=5`.
    pub fn from_choice(choice: u8) -> Option<Self> {
        Self::ALL.get(usize::from(choice).checked_sub(1)?).copied()
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Science => "Science",
            Category::Computer => "Computer",
            Category::Sports => "Sports",
            Category::History => "History",
            Category::Iq => "IQ",
        }
    }

    pub fn menu_label(self) -> &'static str {
        match self {
            Category::Iq => "IQ/Logic",
            other => other.label(),
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            Category::Science => "science.txt",
            Category::Computer => "computer.txt",
            Category::Sports => "sports.txt",
            Category::History => "history.txt",
            Category::Iq => "iq.txt",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Menu choice `1..=3`.
    pub fn from_choice(choice: u8) -> Option<Self> {
        Self::ALL.get(usize::from(choice).checked_sub(1)?).copied()
    }

    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    /// Position of this difficulty's band within a category file.
    pub fn band_index(self) -> usize {
        match self {
            Difficulty::Easy => 0,
            Difficulty::Medium => 1,
            Difficulty::Hard => 2,
        }
    }

    /// Points lost for a wrong answer or a timeout.
    pub fn penalty(self) -> i32 {
        match self {
            Difficulty::Easy => 2,
            Difficulty::Medium => 3,
            Difficulty::Hard => 5,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionRecord {
    pub text: String,
    pub options: [String; OPTION_COUNT],
    /// Zero-based.
    pub correct_index: usize,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error(transparent)]
    Fields(#[from] FieldCountError),
    #[error("question text is empty")]
    EmptyQuestion,
    #[error("correct index is missing")]
    MissingIndex,
    #[error("correct index '{0}' is not a number")]
    InvalidIndex(String),
    #[error("correct index {0} is outside 1..=4")]
    IndexOutOfRange(usize),
}

/// Parse `question|opt1|opt2|opt3|opt4|correct_1_based`.
pub fn parse_record(line: &str) -> Result<QuestionRecord, ParseError> {
    let [text, a, b, c, d, correct] = split_fields::<6>(line)?;

    if text.is_empty() {
        return Err(ParseError::EmptyQuestion);
    }
    let options = [a, b, c, d];
    if correct.is_empty() {
        return Err(ParseError::MissingIndex);
    }
    let one_based: usize = correct
        .parse()
        .map_err(|_| ParseError::InvalidIndex(correct.to_string()))?;
    if !(1..=OPTION_COUNT).contains(&one_based) {
        return Err(ParseError::IndexOutOfRange(one_based));
    }

    Ok(QuestionRecord {
        text: text.to_string(),
        options: options.map(str::to_string),
        correct_index: one_based - 1,
    })
}

/// A question as shown to the player: options in shuffled display order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplayedQuestion {
    pub text: String,
    pub options: [String; OPTION_COUNT],
    pub correct: usize,
    pub removed: [bool; OPTION_COUNT],
}

impl DisplayedQuestion {
    pub fn shuffled<R: Rng + ?Sized>(record: &QuestionRecord, rng: &mut R) -> Self {
        let mut order = [0, 1, 2, 3];
        shuffle(&mut order, rng);
        Self::with_order(record, order)
    }

    /// `order[slot]` is the record option shown at display `slot`.
    pub fn with_order(record: &QuestionRecord, order: [usize; OPTION_COUNT]) -> Self {
        let mut correct = 0;
        for (slot, &original) in order.iter().enumerate() {
            if original == record.correct_index {
                correct = slot;
            }
        }
        Self {
            text: record.text.clone(),
            options: order.map(|i| record.options[i].clone()),
            correct,
            removed: [false; OPTION_COUNT],
        }
    }

    pub fn is_correct(&self, slot: usize) -> bool {
        slot == self.correct
    }

    pub fn is_removed(&self, slot: usize) -> bool {
        self.removed.get(slot).copied().unwrap_or(false)
    }

    pub fn correct_option(&self) -> &str {
        &self.options[self.correct]
    }
}
