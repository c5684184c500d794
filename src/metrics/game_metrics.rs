use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::game::Outcome;

/// Running tallies for a driver session spanning one or more games
pub struct GameMetrics {
    pub session_start: Instant,
    /// Start of the current game
    pub start_time: Instant,
    pub elapsed_time: Duration,
    pub high_score: u32,
    pub games_played: u32,
    outcomes: HashMap<Outcome, u32>,
}

impl GameMetrics {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            session_start: now,
            start_time: now,
            elapsed_time: Duration::ZERO,
            high_score: 0,
            games_played: 0,
            outcomes: HashMap::new(),
        }
    }

    pub fn update(&mut self) {
        self.elapsed_time = self.start_time.elapsed();
    }

    pub fn on_game_start(&mut self) {
        self.start_time = Instant::now();
        self.elapsed_time = Duration::ZERO;
    }

    pub fn on_game_over(&mut self, final_score: u32) {
        self.games_played += 1;
        if final_score > self.high_score {
            self.high_score = final_score;
        }
    }

    pub fn record(&mut self, outcome: Outcome) {
        *self.outcomes.entry(outcome).or_insert(0) += 1;
    }

    pub fn count(&self, outcome: Outcome) -> u32 {
        self.outcomes.get(&outcome).copied().unwrap_or(0)
    }

    /// Wall-clock time since the metrics were created, across restarts
    pub fn session_elapsed(&self) -> Duration {
        self.session_start.elapsed()
    }

    /// Time of the current game as `mm:ss`
    pub fn format_time(&self) -> String {
        format_duration(self.elapsed_time)
    }

    /// One-line summary for progress output
    pub fn format_summary(&self) -> String {
        format!(
            "games: {} | high score: {} | moves: {} | scored: {} | ignored: {} | walls: {} | self: {} | time: {}",
            self.games_played,
            self.high_score,
            self.count(Outcome::Nothing) + self.count(Outcome::Scored),
            self.count(Outcome::Scored),
            self.count(Outcome::InvalidAction),
            self.count(Outcome::WallCollision),
            self.count(Outcome::SnakeCollision),
            format_duration(self.session_elapsed())
        )
    }
}

fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs();
    let minutes = total_secs / 60;
    let seconds = total_secs % 60;
    format!("{:02}:{:02}", minutes, seconds)
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}
