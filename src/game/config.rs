use std::path::Path;

use anyhow::{Context, Result};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use super::action::Direction;
use super::error::StateError;
use super::state::{Cell, Coordinate, GameState};

/// Configuration for building an initial game layout
///
/// The engine itself has no notion of a grid size; these settings only
/// describe the starting state a host hands to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the game grid, border included
    pub grid_width: usize,
    /// Height of the game grid, border included
    pub grid_height: usize,
    /// Initial length of the snake
    pub initial_snake_length: usize,
    /// Surround the grid with a ring of walls
    pub bordered: bool,
    /// Food items on the board at any time
    pub food_count: usize,
    /// Seed for food placement; random when absent
    pub seed: Option<u64>,
}

/// Rectangle of cells food may be placed on; `min` inclusive, `max` exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnArea {
    pub min: Coordinate,
    pub max: Coordinate,
}

impl SpawnArea {
    /// The cells strictly inside the bounding box of a state's walls.
    ///
    /// `None` when the state has no walls or they enclose no cells.
    pub fn inside_walls(state: &GameState) -> Option<Self> {
        let mut walls = state.walls();
        let first = walls.next()?;
        let (mut min, mut max) = (first, first);
        for wall in walls {
            min = Coordinate::new(min.x.min(wall.x), min.y.min(wall.y));
            max = Coordinate::new(max.x.max(wall.x), max.y.max(wall.y));
        }

        let area = Self {
            min: min.checked_moved_by(1, 1)?,
            max,
        };
        (area.min.x < area.max.x && area.min.y < area.max.y).then_some(area)
    }

    pub fn contains(&self, coordinate: Coordinate) -> bool {
        (self.min.x..self.max.x).contains(&coordinate.x)
            && (self.min.y..self.max.y).contains(&coordinate.y)
    }

    /// Place one food item on a random vacant cell of the area.
    ///
    /// Returns `None` when every cell is taken.
    pub fn spawn_food<R: Rng + ?Sized>(
        &self,
        state: &mut GameState,
        rng: &mut R,
    ) -> Option<Coordinate> {
        let (min, max) = (self.min, self.max);
        let vacant: Vec<Coordinate> = (min.y..max.y)
            .flat_map(|y| (min.x..max.x).map(move |x| Coordinate::new(x, y)))
            .filter(|&coordinate| state.is_vacant(coordinate))
            .collect();

        let spot = *vacant.choose(rng)?;
        state.place(spot, Cell::Food);
        Some(spot)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 20,
            grid_height: 20,
            initial_snake_length: 3,
            bordered: true,
            food_count: 1,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10, 10)
    }

    /// Create a large grid
    pub fn large() -> Self {
        Self::new(30, 30)
    }

    /// Read a JSON config file; missing fields fall back to defaults
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        let config: GameConfig = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse config {:?}", path))?;
        config
            .validate()
            .map_err(anyhow::Error::msg)
            .with_context(|| format!("Invalid config {:?}", path))?;
        Ok(config)
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<(), String> {
        let border = if self.bordered { 2 } else { 0 };

        if self.grid_width < 4 + border {
            return Err(format!(
                "grid_width must be at least {}, got {}",
                4 + border,
                self.grid_width
            ));
        }

        if self.grid_height < 1 + border {
            return Err(format!(
                "grid_height must be at least {}, got {}",
                1 + border,
                self.grid_height
            ));
        }

        if self.grid_width > i32::MAX as usize || self.grid_height > i32::MAX as usize {
            return Err("grid dimensions must fit in an i32".to_string());
        }

        if self.initial_snake_length < 2 {
            return Err(format!(
                "initial_snake_length must be at least 2, got {}",
                self.initial_snake_length
            ));
        }

        let (min_x, _) = self.x_range();
        let room = (self.spawn_head().x - min_x + 1) as usize;
        if self.initial_snake_length > room {
            return Err(format!(
                "initial_snake_length ({}) does not fit left of the centre (room for {})",
                self.initial_snake_length, room
            ));
        }

        let free = self.playable_cells() - self.initial_snake_length;
        if self.food_count > free {
            return Err(format!(
                "food_count ({}) exceeds free cells ({})",
                self.food_count, free
            ));
        }

        Ok(())
    }

    /// Whether a coordinate lies inside the playable area
    pub fn in_bounds(&self, coordinate: Coordinate) -> bool {
        self.spawn_area().contains(coordinate)
    }

    /// The playable area of a generated layout
    pub fn spawn_area(&self) -> SpawnArea {
        let (min_x, max_x) = self.x_range();
        let (min_y, max_y) = self.y_range();
        SpawnArea {
            min: Coordinate::new(min_x, min_y),
            max: Coordinate::new(max_x, max_y),
        }
    }

    /// Build the starting state: border walls, a straight snake heading right
    /// from the centre, and `food_count` food items on free cells.
    pub fn initial_state<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<GameState, StateError> {
        let head = self.spawn_head();
        let body: Vec<Coordinate> = (0..self.initial_snake_length)
            .rev()
            .map(|offset| head.moved_by(-(offset as i32), 0))
            .collect();

        let mut state = GameState::new(&body, Direction::Right)?;

        if self.bordered {
            state = state.with_walls(self.border());
        }

        for _ in 0..self.food_count {
            if self.spawn_food(&mut state, rng).is_none() {
                break;
            }
        }

        Ok(state)
    }

    /// Place one food item on a random vacant in-bounds cell.
    ///
    /// Returns `None` when the board is full.
    pub fn spawn_food<R: Rng + ?Sized>(
        &self,
        state: &mut GameState,
        rng: &mut R,
    ) -> Option<Coordinate> {
        self.spawn_area().spawn_food(state, rng)
    }

    fn x_range(&self) -> (i32, i32) {
        let inset = i32::from(self.bordered);
        (inset, self.grid_width as i32 - inset)
    }

    fn y_range(&self) -> (i32, i32) {
        let inset = i32::from(self.bordered);
        (inset, self.grid_height as i32 - inset)
    }

    fn playable_cells(&self) -> usize {
        let (min_x, max_x) = self.x_range();
        let (min_y, max_y) = self.y_range();
        ((max_x - min_x).max(0) * (max_y - min_y).max(0)) as usize
    }

    fn spawn_head(&self) -> Coordinate {
        Coordinate::new((self.grid_width / 2) as i32, (self.grid_height / 2) as i32)
    }

    fn border(&self) -> Vec<Coordinate> {
        let width = self.grid_width as i32;
        let height = self.grid_height as i32;

        (0..height)
            .flat_map(|y| (0..width).map(move |x| Coordinate::new(x, y)))
            .filter(|c| c.x == 0 || c.y == 0 || c.x == width - 1 || c.y == height - 1)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.grid_width, 20);
        assert_eq!(config.grid_height, 20);
        assert_eq!(config.initial_snake_length, 3);
        assert!(config.bordered);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_custom_config() {
        let config = GameConfig::new(15, 15);
        assert_eq!(config.grid_width, 15);
        assert_eq!(config.grid_height, 15);
        assert!(GameConfig::small().validate().is_ok());
        assert!(GameConfig::large().validate().is_ok());
    }

    #[test]
    fn test_validation_failures() {
        assert!(GameConfig::new(3, 10).validate().is_err());
        assert!(GameConfig::new(10, 2).validate().is_err());

        let mut config = GameConfig::small();
        config.initial_snake_length = 1;
        assert!(config.validate().is_err());

        config.initial_snake_length = 6;
        assert!(config.validate().is_err());

        let mut config = GameConfig::small();
        config.food_count = 1000;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_initial_state_layout() {
        let config = GameConfig::small();
        let mut rng = StdRng::seed_from_u64(7);
        let state = config.initial_state(&mut rng).unwrap();

        assert!(state.validate().is_ok());
        assert_eq!(state.snake.head, Coordinate::new(5, 5));
        assert_eq!(state.snake.tail, Coordinate::new(3, 5));
        assert_eq!(state.snake.direction, Direction::Right);
        assert_eq!(state.snake_len(), 3);
        assert_eq!(state.walls().count(), 36);
        assert_eq!(state.food().count(), 1);
        assert!(state.food().all(|food| config.in_bounds(food)));
    }

    #[test]
    fn test_initial_state_is_reproducible_with_seed() {
        let config = GameConfig::small();
        let a = config.initial_state(&mut StdRng::seed_from_u64(42)).unwrap();
        let b = config.initial_state(&mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_unbordered_layout_has_no_walls() {
        let config = GameConfig {
            bordered: false,
            food_count: 3,
            ..GameConfig::small()
        };
        let state = config.initial_state(&mut StdRng::seed_from_u64(1)).unwrap();

        assert_eq!(state.walls().count(), 0);
        assert_eq!(state.food().count(), 3);
        assert!(config.in_bounds(Coordinate::new(0, 0)));
        assert!(!config.in_bounds(Coordinate::new(10, 0)));
    }

    #[test]
    fn test_spawn_food_on_full_board() {
        let config = GameConfig {
            grid_width: 6,
            grid_height: 3,
            initial_snake_length: 2,
            food_count: 2,
            ..GameConfig::default()
        };
        assert!(config.validate().is_ok());

        let mut rng = StdRng::seed_from_u64(3);
        let mut state = config.initial_state(&mut rng).unwrap();
        assert_eq!(state.food().count(), 2);
        assert!(config.spawn_food(&mut state, &mut rng).is_none());
    }

    #[test]
    fn test_spawn_area_inside_walls() {
        let state = GameConfig::new(6, 6)
            .initial_state(&mut StdRng::seed_from_u64(2))
            .unwrap();

        let area = SpawnArea::inside_walls(&state).unwrap();
        assert_eq!(area, GameConfig::new(6, 6).spawn_area());
        assert!(area.contains(Coordinate::new(1, 1)));
        assert!(area.contains(Coordinate::new(4, 4)));
        assert!(!area.contains(Coordinate::new(5, 4)));

        let open = GameState::new(
            &[Coordinate::new(0, 0), Coordinate::new(1, 0)],
            Direction::Right,
        )
        .unwrap();
        assert_eq!(SpawnArea::inside_walls(&open), None);
        let line = open.with_walls([Coordinate::new(0, 3), Coordinate::new(9, 3)]);
        assert_eq!(SpawnArea::inside_walls(&line), None);
    }

    #[test]
    fn test_load_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("game.json");
        std::fs::write(&path, r#"{"grid_width": 12, "seed": 9}"#).unwrap();

        let config = GameConfig::load(&path).unwrap();
        assert_eq!(config.grid_width, 12);
        assert_eq!(config.grid_height, 20);
        assert_eq!(config.seed, Some(9));

        std::fs::write(&path, r#"{"grid_width": 2}"#).unwrap();
        assert!(GameConfig::load(&path).is_err());
        assert!(GameConfig::load(&temp_dir.path().join("missing.json")).is_err());
    }
}
