use anyhow::{Context, Result};
use common::HighScoreStore;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Default, Serialize, Deserialize)]
struct HighScoreFile {
    highscore: u32,
}

/// High score kept as `{"highscore": N}` on disk.
#[derive(Debug, Clone)]
pub struct JsonHighScoreStore {
    path: PathBuf,
}

impl JsonHighScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl HighScoreStore for JsonHighScoreStore {
    fn load(&mut self) -> Result<u32> {
        if !self.path.exists() {
            return Ok(0);
        }

        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read high score file: {:?}", self.path))?;
        let file: HighScoreFile = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse high score file: {:?}", self.path))?;
        Ok(file.highscore)
    }

    fn save(&mut self, score: u32) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory: {:?}", parent))?;
            }
        }

        let content = serde_json::to_string(&HighScoreFile { highscore: score })?;
        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write high score file: {:?}", self.path))?;
        tracing::debug!(score, path = ?self.path, "Saved high score");
        Ok(())
    }
}

/// Default location: `$HOME/.snakeduel/highscore.json`, or the working directory without a home.
pub fn default_high_score_path() -> PathBuf {
    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(".snakeduel").join("highscore.json"),
        None => PathBuf::from("highscore.json"),
    }
}
