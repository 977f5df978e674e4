use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

const MAX_BAND_SIZE: usize = 1000;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_time_limit_secs")]
    pub time_limit_secs: u64,
    #[serde(default = "default_extra_time_secs")]
    pub extra_time_secs: u64,
    #[serde(default = "default_session_questions")]
    pub session_questions: usize,
    #[serde(default = "default_band_size")]
    pub band_size: usize,
    #[serde(default = "default_question_capacity")]
    pub question_capacity: usize,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_high_scores_shown")]
    pub high_scores_shown: usize,
    #[serde(default = "default_questions_dir")]
    pub questions_dir: String,
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_theme")]
    pub theme: String,
}

fn default_time_limit_secs() -> u64 {
    15
}
fn default_extra_time_secs() -> u64 {
    10
}
fn default_session_questions() -> usize {
    10
}
fn default_band_size() -> usize {
    50
}
fn default_question_capacity() -> usize {
    150
}
fn default_poll_interval_ms() -> u64 {
    100
}
fn default_high_scores_shown() -> usize {
    100
}
fn default_data_dir() -> String {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("quizdr")
        .to_string_lossy()
        .to_string()
}
fn default_questions_dir() -> String {
    PathBuf::from(default_data_dir())
        .join("questions")
        .to_string_lossy()
        .to_string()
}
fn default_theme() -> String {
    "catppuccin-mocha".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            time_limit_secs: default_time_limit_secs(),
            extra_time_secs: default_extra_time_secs(),
            session_questions: default_session_questions(),
            band_size: default_band_size(),
            question_capacity: default_question_capacity(),
            poll_interval_ms: default_poll_interval_ms(),
            high_scores_shown: default_high_scores_shown(),
            questions_dir: default_questions_dir(),
            data_dir: default_data_dir(),
            theme: default_theme(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let mut config: Config = toml::from_str(&content)?;
            config.validate();
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("quizdr")
    }

    /// Clamp values into ranges the game can run with.
    pub fn validate(&mut self) {
        self.time_limit_secs = self.time_limit_secs.clamp(5, 120);
        self.extra_time_secs = self.extra_time_secs.clamp(1, 60);
        self.band_size = self.band_size.clamp(1, MAX_BAND_SIZE);
        self.session_questions = self.session_questions.clamp(1, self.band_size);
        self.question_capacity = self
            .question_capacity
            .clamp(self.band_size * 3, MAX_BAND_SIZE * 3);
        self.poll_interval_ms = self.poll_interval_ms.clamp(10, 500);
        self.high_scores_shown = self.high_scores_shown.max(1);
        if self.questions_dir.trim().is_empty() {
            self.questions_dir = default_questions_dir();
        }
        if self.data_dir.trim().is_empty() {
            self.data_dir = default_data_dir();
        }
    }

    pub fn time_limit(&self) -> Duration {
        Duration::from_secs(self.time_limit_secs)
    }

    pub fn extra_time(&self) -> Duration {
        Duration::from_secs(self.extra_time_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn questions_path(&self) -> PathBuf {
        PathBuf::from(&self.questions_dir)
    }

    pub fn data_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir)
    }
}
