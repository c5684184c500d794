use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use super::{
    action::Direction,
    error::StateError,
    state::{Cell, Coordinate, GameState, SnakeCell},
};

/// Classification of a single move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
    /// Moved without eating
    Nothing,
    /// Moved onto food
    Scored,
    /// Requested the reverse of the current direction; ignored
    InvalidAction,
    /// The new head would land on a wall
    WallCollision,
    /// The new head would land on a snake segment
    SnakeCollision,
}

impl Outcome {
    pub const ALL: [Outcome; 5] = [
        Outcome::Nothing,
        Outcome::Scored,
        Outcome::InvalidAction,
        Outcome::WallCollision,
        Outcome::SnakeCollision,
    ];

    /// Whether the move was applied to the state
    pub fn is_move(&self) -> bool {
        matches!(self, Outcome::Nothing | Outcome::Scored)
    }

    /// Collisions end the game; an invalid action does not
    pub fn is_game_over(&self) -> bool {
        matches!(self, Outcome::WallCollision | Outcome::SnakeCollision)
    }
}

/// Result of a call to [`Engine::advance`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResult {
    /// Snapshot after the move, independent of the engine's own copy
    pub state: GameState,
    /// The direction that was requested
    pub action: Direction,
    pub outcome: Outcome,
}

/// The game engine that handles all game logic
///
/// Holds nothing but the current [`GameState`]. Every call to
/// [`advance`](Engine::advance) is a pure function of that state and the
/// requested direction. Rejected moves leave the state untouched.
#[derive(Debug, Clone)]
pub struct Engine {
    state: GameState,
}

impl Engine {
    /// Create an engine from a caller-built state without checking it
    pub fn new(state: GameState) -> Self {
        Self { state }
    }

    /// Create an engine after validating the snake's link chain
    pub fn try_new(state: GameState) -> Result<Self, StateError> {
        state.validate()?;
        Ok(Self::new(state))
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn into_state(self) -> GameState {
        self.state
    }

    /// Execute one tick of the game
    pub fn advance(&mut self, action: Direction) -> ActionResult {
        let current = self.state.snake.direction;
        if current.is_opposite(action) {
            trace!(%action, %current, "reverse move ignored");
            return self.result(action, Outcome::InvalidAction);
        }

        let old_head = self.state.snake.head;
        let Some(new_head) = old_head.checked_moved_in_direction(action) else {
            // Nothing exists past the edge of the coordinate range.
            trace!(%action, head = %old_head, "edge of the grid");
            return self.result(action, Outcome::WallCollision);
        };

        // Wall wins over snake; nothing is written before this point.
        let food_eaten = match self.state.map.get(&new_head) {
            Some(Cell::Wall) => {
                trace!(%action, head = %new_head, "wall collision");
                return self.result(action, Outcome::WallCollision);
            }
            Some(Cell::Snake(_)) => {
                trace!(%action, head = %new_head, "snake collision");
                return self.result(action, Outcome::SnakeCollision);
            }
            Some(Cell::Food) => true,
            None => false,
        };

        self.state.total_steps += 1;
        self.state.snake.direction = action;
        if food_eaten {
            self.state.score += 1;
        }

        self.place_head(old_head, new_head, food_eaten);
        self.retract_tail();

        let outcome = if food_eaten {
            Outcome::Scored
        } else {
            Outcome::Nothing
        };
        trace!(
            %action,
            head = %self.state.snake.head,
            tail = %self.state.snake.tail,
            steps = self.state.total_steps,
            score = self.state.score,
            ?outcome,
            "tick"
        );

        self.result(action, outcome)
    }

    fn place_head(&mut self, old_head: Coordinate, new_head: Coordinate, food_eaten: bool) {
        if let Some(Cell::Snake(cell)) = self.state.map.get_mut(&old_head) {
            cell.previous_body = Some(new_head);
        } else {
            warn!(head = %old_head, "old head is not a snake cell; chain not linked");
        }

        self.state.map.insert(
            new_head,
            Cell::Snake(SnakeCell {
                previous_body: None,
                growth: food_eaten,
            }),
        );
        self.state.snake.head = new_head;
    }

    fn retract_tail(&mut self) {
        let tail = self.state.snake.tail;
        let Some(Cell::Snake(cell)) = self.state.map.get_mut(&tail) else {
            warn!(%tail, "tail is not a snake cell; retraction skipped");
            return;
        };

        if cell.growth {
            cell.growth = false;
            return;
        }

        match cell.previous_body {
            Some(next) => {
                self.state.map.remove(&tail);
                self.state.snake.tail = next;
            }
            None => warn!(%tail, "tail has no link toward the head; retraction skipped"),
        }
    }

    fn result(&self, action: Direction, outcome: Outcome) -> ActionResult {
        ActionResult {
            state: self.state.clone(),
            action,
            outcome,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(x: i32, y: i32) -> Coordinate {
        Coordinate::new(x, y)
    }

    /// Snake (0,2)-(1,2)-(2,2) heading right, food at (4,2), wall at (0,0)
    fn initial_state() -> GameState {
        GameState::new(&[c(0, 2), c(1, 2), c(2, 2)], Direction::Right)
            .unwrap()
            .with_food([c(4, 2)])
            .with_walls([c(0, 0)])
    }

    #[test]
    fn test_prevent_180_degree_turn() {
        let mut engine = Engine::new(initial_state());

        let result = engine.advance(Direction::Left);

        assert_eq!(result.outcome, Outcome::InvalidAction);
        assert_eq!(result.action, Direction::Left);
        assert_eq!(result.state.snake.direction, Direction::Right);
        assert_eq!(result.state.total_steps, 0);
        assert_eq!(result.state, initial_state());
        assert_eq!(engine.state(), &initial_state());
    }

    #[test]
    fn test_basic_movement() {
        let mut engine = Engine::new(initial_state());

        let result = engine.advance(Direction::Up);

        assert_eq!(result.outcome, Outcome::Nothing);
        assert_eq!(result.action, Direction::Up);
        assert_eq!(result.state.total_steps, 1);
        assert_eq!(result.state.snake.direction, Direction::Up);
        assert_eq!(result.state.snake.head, c(2, 1));
    }

    #[test]
    fn test_tail_retracts_without_food() {
        let mut engine = Engine::new(initial_state());

        let result = engine.advance(Direction::Up);

        assert_eq!(result.state.score, 0);
        assert_eq!(result.state.snake.tail, c(1, 2));
        assert!(result.state.cell(c(0, 2)).is_none());
        assert!(result.state.cell(c(1, 2)).is_some());
        assert_eq!(result.state.body(), vec![c(1, 2), c(2, 2), c(2, 1)]);
        assert!(result.state.validate().is_ok());
    }

    #[test]
    fn test_food_consumption() {
        let mut engine = Engine::new(initial_state());

        let first = engine.advance(Direction::Right);
        assert_eq!(first.outcome, Outcome::Nothing);

        let second = Engine::new(first.state).advance(Direction::Right);

        assert_eq!(second.outcome, Outcome::Scored);
        assert_eq!(second.state.score, 1);
        assert_eq!(second.state.snake.head, c(4, 2));
        assert!(matches!(second.state.cell(c(4, 2)), Some(Cell::Snake(_))));
        assert!(second.state.snake_cell(c(4, 2)).unwrap().growth);
        assert_eq!(second.state.food().count(), 0);
    }

    #[test]
    fn test_growth_flag_delays_retraction_once() {
        let mut state = initial_state();
        let tail = state.snake.tail;
        if let Some(Cell::Snake(cell)) = state.map.get_mut(&tail) {
            cell.growth = true;
        }

        let result = Engine::new(state).advance(Direction::Right);

        assert_eq!(result.state.snake.tail, tail);
        assert!(!result.state.snake_cell(tail).unwrap().growth);
        assert_eq!(result.state.snake_len(), 4);

        let next = Engine::new(result.state).advance(Direction::Right);
        assert_eq!(next.state.snake.tail, c(1, 2));
        assert!(next.state.cell(tail).is_none());
        assert_eq!(next.state.snake_len(), 4);
    }

    #[test]
    fn test_snake_grows_when_eaten_segment_reaches_tail() {
        let mut engine = Engine::new(initial_state());

        engine.advance(Direction::Right);
        let scored = engine.advance(Direction::Right);
        assert_eq!(scored.outcome, Outcome::Scored);
        assert_eq!(scored.state.snake_len(), 3);

        // The flagged segment at (4,2) becomes the tail after two more ticks,
        // holds its place for one tick, then retracts normally.
        let mut lengths = Vec::new();
        for _ in 0..4 {
            let result = engine.advance(Direction::Right);
            assert_eq!(result.outcome, Outcome::Nothing);
            lengths.push(result.state.snake_len());
        }
        assert_eq!(lengths, vec![3, 3, 4, 4]);
        assert!(engine.state().validate().is_ok());
    }

    #[test]
    fn test_wall_collision() {
        let state = GameState::new(&[c(0, 3), c(0, 2), c(0, 1)], Direction::Up)
            .unwrap()
            .with_walls([c(0, 0)]);
        let mut engine = Engine::new(state.clone());

        let result = engine.advance(Direction::Up);

        assert_eq!(result.outcome, Outcome::WallCollision);
        assert_eq!(result.action, Direction::Up);
        assert_eq!(result.state, state);
    }

    #[test]
    fn test_collision_rolls_back_direction_and_steps() {
        let state = GameState::new(&[c(2, 2), c(1, 2), c(1, 1)], Direction::Up)
            .unwrap()
            .with_walls([c(0, 1)]);
        let mut engine = Engine::new(state.clone());

        let result = engine.advance(Direction::Left);

        assert_eq!(result.outcome, Outcome::WallCollision);
        assert_eq!(result.state.snake.direction, Direction::Up);
        assert_eq!(result.state.total_steps, 0);
        assert_eq!(engine.state(), &state);
    }

    #[test]
    fn test_self_collision() {
        // Body (0,2) -> (1,2) -> (2,2) -> (2,1) -> (1,1), heading left
        let state = GameState::new(
            &[c(0, 2), c(1, 2), c(2, 2), c(2, 1), c(1, 1)],
            Direction::Left,
        )
        .unwrap();
        let mut engine = Engine::new(state.clone());

        let result = engine.advance(Direction::Down);

        assert_eq!(result.outcome, Outcome::SnakeCollision);
        assert_eq!(result.action, Direction::Down);
        assert_eq!(result.state, state);
    }

    #[test]
    fn test_moving_into_current_tail_collides() {
        // 2x2 loop: the tail is still occupied when the head arrives
        let state = GameState::new(&[c(0, 0), c(1, 0), c(1, 1), c(0, 1)], Direction::Left)
            .unwrap();
        let mut engine = Engine::new(state);

        let result = engine.advance(Direction::Up);

        assert_eq!(result.outcome, Outcome::SnakeCollision);
    }

    #[test]
    fn test_edge_of_coordinate_range_acts_as_wall() {
        let state = GameState::new(&[c(i32::MAX - 1, 0), c(i32::MAX, 0)], Direction::Right)
            .unwrap();
        let mut engine = Engine::new(state.clone());

        let result = engine.advance(Direction::Right);

        assert_eq!(result.outcome, Outcome::WallCollision);
        assert_eq!(result.state, state);

        // Turning away from the edge still works.
        let result = engine.advance(Direction::Down);
        assert_eq!(result.outcome, Outcome::Nothing);
        assert_eq!(result.state.snake.head, c(i32::MAX, 1));
    }

    #[test]
    fn test_returned_state_is_independent() {
        let mut engine = Engine::new(initial_state());

        let mut result = engine.advance(Direction::Up);
        result.state.map.clear();
        result.state.score = 99;

        assert_eq!(engine.state().score, 0);
        assert_eq!(engine.state().snake_len(), 3);

        let next = engine.advance(Direction::Up);
        assert_eq!(next.outcome, Outcome::Nothing);
        assert_eq!(next.state.snake.head, c(2, 0));
    }

    #[test]
    fn test_independent_engines_run_in_parallel() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Engine>();
        assert_send_sync::<ActionResult>();

        let handles: Vec<_> = [Direction::Up, Direction::Down, Direction::Right]
            .into_iter()
            .map(|direction| {
                std::thread::spawn(move || {
                    let mut engine = Engine::new(initial_state());
                    engine.advance(direction).outcome
                })
            })
            .collect();

        let outcomes: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(
            outcomes,
            vec![Outcome::Nothing, Outcome::Nothing, Outcome::Nothing]
        );
    }

    #[test]
    fn test_try_new_rejects_malformed_state() {
        let mut state = initial_state();
        state.snake.tail = c(4, 2);
        assert_eq!(
            Engine::try_new(state).unwrap_err(),
            StateError::TailNotSnake(c(4, 2))
        );
        assert!(Engine::try_new(initial_state()).is_ok());
    }

    #[test]
    fn test_outcome_classification() {
        assert!(Outcome::Nothing.is_move());
        assert!(Outcome::Scored.is_move());
        assert!(!Outcome::InvalidAction.is_move());
        assert!(!Outcome::InvalidAction.is_game_over());
        assert!(Outcome::WallCollision.is_game_over());
        assert!(Outcome::SnakeCollision.is_game_over());
        assert_eq!(
            serde_json::to_string(&Outcome::SnakeCollision).unwrap(),
            "\"SNAKE_COLLISION\""
        );
    }
}
