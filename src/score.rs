/// High score for the lifetime of the process. Nothing is written to disk.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct ScoreBoard {
    high_score: u32,
}

impl ScoreBoard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a finished game's score. Returns true on a new high score.
    pub fn record(&mut self, score: u32) -> bool {
        if score > self.high_score {
            self.high_score = score;
            return true;
        }
        false
    }

    #[must_use]
    pub fn high_score(self) -> u32 {
        self.high_score
    }
}
