use anyhow::Result;

/// Where the best score lives between sessions.
pub trait HighScoreStore {
    fn load(&mut self) -> Result<u32>;

    fn save(&mut self, score: u32) -> Result<()>;
}

/// Keeps the record in memory only.
#[derive(Debug, Default, Clone)]
pub struct MemoryHighScore {
    pub best: u32,
    pub saves: u32,
}

impl MemoryHighScore {
    pub fn new(best: u32) -> Self {
        MemoryHighScore { best, saves: 0 }
    }
}

impl HighScoreStore for MemoryHighScore {
    fn load(&mut self) -> Result<u32> {
        Ok(self.best)
    }

    fn save(&mut self, score: u32) -> Result<()> {
        self.best = score;
        self.saves += 1;
        Ok(())
    }
}
