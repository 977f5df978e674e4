use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;
use tracing::warn;

use crate::store::record::{FIELD_DELIMITER, FieldCountError, split_fields};

pub const HIGH_SCORES_FILE: &str = "high_scores.txt";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HighScoreEntry {
    pub player_name: String,
    pub score: i32,
    pub category: String,
    pub difficulty: String,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum HighScoreParseError {
    #[error(transparent)]
    Fields(#[from] FieldCountError),
    #[error("score '{0}' is not a number")]
    InvalidScore(String),
}

impl HighScoreEntry {
    pub fn to_line(&self) -> String {
        format!(
            "{}{d}{}{d}{}{d}{}",
            self.player_name,
            self.score,
            self.category,
            self.difficulty,
            d = FIELD_DELIMITER
        )
    }

    pub fn parse(line: &str) -> Result<Self, HighScoreParseError> {
        let [name, score, category, difficulty] = split_fields::<4>(line)?;
        let score = score
            .parse()
            .map_err(|_| HighScoreParseError::InvalidScore(score.to_string()))?;
        Ok(Self {
            player_name: name.to_string(),
            score,
            category: category.to_string(),
            difficulty: difficulty.to_string(),
        })
    }
}

/// Strip characters that would corrupt a pipe-delimited line.
pub fn sanitize_player_name(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .filter(|c| *c != FIELD_DELIMITER && !c.is_control())
        .collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        "Anonymous".to_string()
    } else {
        cleaned.to_string()
    }
}

/// Highest first. Stable, so equal scores keep file order.
pub fn sort_descending(entries: &mut [HighScoreEntry]) {
    entries.sort_by(|a, b| b.score.cmp(&a.score));
}

/// Append-only high-score table on disk.
pub struct HighScoreTable {
    path: PathBuf,
}

impl HighScoreTable {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(HIGH_SCORES_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, entry: &HighScoreEntry) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("cannot open {}", self.path.display()))?;
        writeln!(file, "{}", entry.to_line())?;
        Ok(())
    }

    /// Every readable entry, best first. A missing file is an empty table.
    pub fn load_sorted(&self) -> Result<Vec<HighScoreEntry>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => {
                return Err(err).with_context(|| format!("cannot read {}", self.path.display()));
            }
        };

        let mut entries: Vec<HighScoreEntry> = content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .filter_map(|(n, line)| match HighScoreEntry::parse(line) {
                Ok(entry) => Some(entry),
                Err(err) => {
                    warn!(line = n + 1, %err, "skipping malformed high score");
                    None
                }
            })
            .collect();
        sort_descending(&mut entries);
        Ok(entries)
    }
}
