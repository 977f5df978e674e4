use std::fmt::Write as _;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Local};

use crate::session::question::{Category, Difficulty};

pub const SESSION_LOG_FILE: &str = "quiz_logs.txt";

const RULE: &str = "========================================";

#[derive(Clone, Debug)]
pub struct SessionLogEntry {
    pub player: String,
    pub finished_at: DateTime<Local>,
    pub category: Category,
    pub difficulty: Difficulty,
    pub correct: u32,
    pub wrong: u32,
    pub score: i32,
    pub session_questions: usize,
}

impl SessionLogEntry {
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{RULE}");
        let _ = writeln!(out, "Player: {}", self.player);
        let _ = writeln!(
            out,
            "Date and Time: {}",
            self.finished_at.format("%Y-%m-%d %H:%M:%S")
        );
        let _ = writeln!(out, "Category: {}", self.category.label());
        let _ = writeln!(out, "Difficulty: {}", self.difficulty.label());
        let _ = writeln!(out, "Correct: {} | Wrong: {}", self.correct, self.wrong);
        let _ = writeln!(out, "Score: {}/{}", self.score, self.session_questions);
        let _ = writeln!(out, "{RULE}");
        out.push('\n');
        out
    }
}

/// Append-only, human-readable log of finished sessions.
pub struct SessionLog {
    path: PathBuf,
}

impl SessionLog {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(SESSION_LOG_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, entry: &SessionLogEntry) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("cannot open {}", self.path.display()))?;
        file.write_all(entry.render().as_bytes())?;
        Ok(())
    }
}
