use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use ratatui::backend::CrosstermBackend;
use tracing::{info, warn};

use quizdr::app::{App, Screen};
use quizdr::config::Config;
use quizdr::event::{SystemClock, TerminalInput};
use quizdr::logging;
use quizdr::ui::theme::Theme;

#[derive(Parser)]
#[command(name = "quizdr", version, about = "Terminal trivia quiz with timed answers and lifelines")]
struct Cli {
    #[arg(short, long, help = "Directory holding science.txt, computer.txt, ...")]
    questions_dir: Option<PathBuf>,

    #[arg(short, long, help = "Directory for high scores, session log and debug log")]
    data_dir: Option<PathBuf>,

    #[arg(short = 'l', long, help = "Seconds allowed per question")]
    time_limit: Option<u64>,

    #[arg(short = 'n', long, help = "Questions per session")]
    questions: Option<usize>,

    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(long, help = "Write the effective configuration to the config file")]
    save_config: bool,
}

impl Cli {
    fn apply(self, config: &mut Config) -> bool {
        if let Some(dir) = self.questions_dir {
            config.questions_dir = dir.to_string_lossy().to_string();
        }
        if let Some(dir) = self.data_dir {
            config.data_dir = dir.to_string_lossy().to_string();
        }
        if let Some(secs) = self.time_limit {
            config.time_limit_secs = secs;
        }
        if let Some(count) = self.questions {
            config.session_questions = count;
        }
        if let Some(theme) = self.theme {
            config.theme = theme;
        }
        config.validate();
        self.save_config
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let loaded = Config::load();
    let mut config = loaded.as_ref().cloned().unwrap_or_default();
    let save_config = cli.apply(&mut config);

    match logging::init(&config.data_path()) {
        Ok(path) => info!(log = %path.display(), questions = %config.questions_dir, "starting quizdr"),
        Err(err) => eprintln!("warning: logging disabled: {err:#}"),
    }
    if let Err(err) = loaded {
        warn!("ignoring unreadable config file: {err:#}");
    }

    if save_config {
        config.save()?;
        info!(path = %Config::config_path().display(), "configuration saved");
    }

    let theme = Theme::load(&config.theme).unwrap_or_else(|| {
        warn!(theme = %config.theme, "unknown theme, using default");
        Theme::default()
    });

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    if let Err(err) = execute!(stdout, EnterAlternateScreen) {
        let _ = disable_raw_mode();
        return Err(err.into());
    }

    let result = Screen::new(CrosstermBackend::new(stdout), theme).and_then(|screen| {
        App::new(
            screen,
            TerminalInput::new(),
            SystemClock::new(),
            config,
            SmallRng::from_entropy(),
        )
        .run()
    });

    let restored = restore_terminal();

    if let Err(err) = &result {
        tracing::error!("{err:#}");
    }
    result.and(restored)
}

/// Leave the alternate screen and raw mode, attempting both even if one fails.
fn restore_terminal() -> Result<()> {
    let raw = disable_raw_mode();
    let screen = execute!(io::stdout(), LeaveAlternateScreen);
    raw?;
    screen?;
    Ok(())
}
