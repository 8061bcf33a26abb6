use serde::{Deserialize, Serialize};

/// Tunables for a game: board geometry, scoring, and pacing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Side length of the square grid, in cells
    pub grid_size: usize,
    /// Initial length of the snake
    pub initial_snake_length: usize,
    /// Points awarded per food eaten
    pub score_per_food: u32,
    /// Tick interval at the start of a game, in milliseconds
    pub initial_tick_ms: u64,
    /// How much the tick interval shrinks per food eaten
    pub speedup_per_food_ms: u64,
    /// Fastest allowed tick interval; the speedup floors here
    pub min_tick_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: 20,
            initial_snake_length: 3,
            score_per_food: 10,
            initial_tick_ms: 150,
            speedup_per_food_ms: 5,
            min_tick_ms: 60,
        }
    }
}

impl GameConfig {
    /// Configuration with a custom grid side length
    pub fn with_grid_size(grid_size: usize) -> Self {
        Self {
            grid_size,
            ..Default::default()
        }
    }

    /// Small grid, handy in tests
    pub fn small() -> Self {
        Self::with_grid_size(10)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = GameConfig::default();
        assert_eq!(config.grid_size, 20);
        assert_eq!(config.initial_snake_length, 3);
        assert_eq!(config.score_per_food, 10);
        assert!(config.min_tick_ms <= config.initial_tick_ms);
    }

    #[test]
    fn custom_grid_size() {
        let config = GameConfig::with_grid_size(15);
        assert_eq!(config.grid_size, 15);
        assert_eq!(config.initial_snake_length, 3);
    }
}
