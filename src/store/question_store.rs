use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::ops::Range;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

use crate::session::question::{Category, Difficulty};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("cannot read question file {}: {source}", .path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("question file {} is empty", .0.display())]
    Empty(PathBuf),
}

/// Raw question lines of one category file. Lines are validated when a
/// session draws them, not here.
#[derive(Clone, Debug, Default)]
pub struct QuestionBank {
    lines: Vec<String>,
}

impl QuestionBank {
    pub fn from_lines<S: Into<String>>(lines: impl IntoIterator<Item = S>) -> Self {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    /// Read at most `capacity` lines from `path`.
    pub fn load(path: &Path, capacity: usize) -> Result<Self, StoreError> {
        let load_err = |source| StoreError::Load {
            path: path.to_path_buf(),
            source,
        };
        let file = File::open(path).map_err(load_err)?;

        let mut lines = Vec::new();
        let mut ignored = 0usize;
        for line in BufReader::new(file).lines() {
            let line = line.map_err(load_err)?;
            if lines.len() < capacity {
                lines.push(line);
            } else {
                ignored += 1;
            }
        }
        if ignored > 0 {
            warn!(path = %path.display(), capacity, ignored, "question file exceeds capacity");
        }
        if lines.is_empty() {
            return Err(StoreError::Empty(path.to_path_buf()));
        }

        debug!(path = %path.display(), count = lines.len(), "loaded question bank");
        Ok(Self { lines })
    }

    pub fn load_category(dir: &Path, category: Category, capacity: usize) -> Result<Self, StoreError> {
        Self::load(&dir.join(category.file_name()), capacity)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }
}

/// Contiguous indices holding one difficulty's questions.
pub fn band_range(difficulty: Difficulty, band_size: usize) -> Range<usize> {
    let start = difficulty.band_index() * band_size;
    start..start + band_size
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn loads_lines_in_order() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("science.txt"), "a|1|2|3|4|1\nb|1|2|3|4|2\n").unwrap();

        let bank = QuestionBank::load_category(dir.path(), Category::Science, 150).unwrap();
        assert_eq!(bank.len(), 2);
        assert_eq!(bank.get(1), Some("b|1|2|3|4|2"));
        assert_eq!(bank.get(2), None);
    }

    #[test]
    fn missing_file_is_a_load_error() {
        let dir = TempDir::new().unwrap();
        let err = QuestionBank::load_category(dir.path(), Category::Sports, 150).unwrap_err();
        assert!(matches!(err, StoreError::Load { .. }));
        assert!(err.to_string().contains("sports.txt"));
    }

    #[test]
    fn empty_file_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("iq.txt");
        fs::write(&path, "").unwrap();
        assert!(matches!(QuestionBank::load(&path, 150), Err(StoreError::Empty(_))));
    }

    #[test]
    fn capacity_truncates() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("history.txt");
        let content: String = (0..10).map(|i| format!("q{i}|a|b|c|d|1\n")).collect();
        fs::write(&path, content).unwrap();

        let bank = QuestionBank::load(&path, 4).unwrap();
        assert_eq!(bank.len(), 4);
        assert_eq!(bank.get(3), Some("q3|a|b|c|d|1"));
    }

    #[test]
    fn bands_are_contiguous() {
        assert_eq!(band_range(Difficulty::Easy, 50), 0..50);
        assert_eq!(band_range(Difficulty::Medium, 50), 50..100);
        assert_eq!(band_range(Difficulty::Hard, 50), 100..150);
    }
}
