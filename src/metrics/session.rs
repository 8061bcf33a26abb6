use std::time::{Duration, Instant};

/// Play metrics for the current app session
///
/// Tracks the wall clock of the running game and session-local counters for
/// the HUD. Durable per-user aggregates live in the profile store; these
/// reset when the app exits.
pub struct SessionMetrics {
    started_at: Instant,
    elapsed: Duration,
    clock_running: bool,
    pub session_best: u32,
    pub games_played: u32,
}

impl SessionMetrics {
    pub fn new() -> Self {
        Self {
            started_at: Instant::now(),
            elapsed: Duration::ZERO,
            clock_running: false,
            session_best: 0,
            games_played: 0,
        }
    }

    /// Refresh the elapsed clock; called once per render frame
    pub fn update(&mut self) {
        if self.clock_running {
            self.elapsed = self.started_at.elapsed();
        }
    }

    pub fn on_game_start(&mut self) {
        self.started_at = Instant::now();
        self.elapsed = Duration::ZERO;
        self.clock_running = true;
    }

    /// A board reset that did not finish a game: stop and zero the clock
    pub fn on_game_reset(&mut self) {
        self.clock_running = false;
        self.elapsed = Duration::ZERO;
    }

    pub fn on_game_over(&mut self, final_score: u32) {
        self.clock_running = false;
        self.games_played += 1;
        if final_score > self.session_best {
            self.session_best = final_score;
        }
    }

    /// Elapsed game time as mm:ss
    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed.as_secs();
        format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
    }
}

impl Default for SessionMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_formatting() {
        let mut metrics = SessionMetrics::new();
        metrics.elapsed = Duration::from_secs(125);
        assert_eq!(metrics.format_time(), "02:05");

        metrics.elapsed = Duration::ZERO;
        assert_eq!(metrics.format_time(), "00:00");

        metrics.elapsed = Duration::from_secs(3661);
        assert_eq!(metrics.format_time(), "61:01");
    }

    #[test]
    fn session_best_never_decreases() {
        let mut metrics = SessionMetrics::new();

        metrics.on_game_over(10);
        assert_eq!(metrics.session_best, 10);
        assert_eq!(metrics.games_played, 1);

        metrics.on_game_over(5);
        assert_eq!(metrics.session_best, 10);
        assert_eq!(metrics.games_played, 2);

        metrics.on_game_over(15);
        assert_eq!(metrics.session_best, 15);
    }

    #[test]
    fn clock_only_runs_during_a_game() {
        let mut metrics = SessionMetrics::new();
        metrics.update();
        assert_eq!(metrics.elapsed, Duration::ZERO);

        metrics.on_game_start();
        std::thread::sleep(Duration::from_millis(20));
        metrics.update();
        assert!(metrics.elapsed >= Duration::from_millis(20));

        metrics.on_game_over(0);
        let frozen = metrics.elapsed;
        std::thread::sleep(Duration::from_millis(20));
        metrics.update();
        assert_eq!(metrics.elapsed, frozen);
    }
}
