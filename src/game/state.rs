use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::action::Direction;
use super::error::{ParseCoordinateError, StateError};

/// A position on the (unbounded) game grid
///
/// Serialized as the `"x,y"` key used by the saved-state format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Coordinate {
    pub x: i32,
    pub y: i32,
}

impl Coordinate {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move coordinate by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move coordinate one cell in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }

    /// Like [`moved_by`](Self::moved_by), but `None` past the edge of the
    /// `i32` range
    pub fn checked_moved_by(&self, dx: i32, dy: i32) -> Option<Self> {
        Some(Self {
            x: self.x.checked_add(dx)?,
            y: self.y.checked_add(dy)?,
        })
    }

    pub fn checked_moved_in_direction(&self, direction: Direction) -> Option<Self> {
        let (dx, dy) = direction.delta();
        self.checked_moved_by(dx, dy)
    }

    pub fn manhattan_distance(&self, other: Coordinate) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

impl FromStr for Coordinate {
    type Err = ParseCoordinateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseCoordinateError(s.to_string());
        let (x, y) = s.split_once(',').ok_or_else(err)?;
        let x = x.trim().parse().map_err(|_| err())?;
        let y = y.trim().parse().map_err(|_| err())?;
        Ok(Self { x, y })
    }
}

impl TryFrom<String> for Coordinate {
    type Error = ParseCoordinateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Coordinate> for String {
    fn from(coordinate: Coordinate) -> Self {
        coordinate.to_string()
    }
}

/// A snake body segment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnakeCell {
    /// Link to the neighbouring segment one step closer to the head.
    /// `None` on the head itself.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_body: Option<Coordinate>,
    /// When set on the tail, the next retraction is skipped once
    #[serde(default)]
    pub growth: bool,
}

/// Contents of an occupied grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Cell {
    Snake(SnakeCell),
    Food,
    Wall,
}

impl Cell {
    pub fn is_snake(&self) -> bool {
        matches!(self, Cell::Snake(_))
    }
}

/// Where the snake is and where it is heading.
///
/// The body itself lives in [`GameState::map`]; `head` and `tail` are the two
/// ends of the link chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snake {
    pub direction: Direction,
    pub head: Coordinate,
    pub tail: Coordinate,
}

/// Complete game state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub total_steps: u32,
    pub score: u32,
    pub snake: Snake,
    pub map: HashMap<Coordinate, Cell>,
}

impl GameState {
    /// Create a state holding only a snake laid out along `body`, ordered tail first.
    ///
    /// Consecutive segments do not have to be adjacent, but they must be
    /// distinct and there must be at least two of them.
    pub fn new(body: &[Coordinate], direction: Direction) -> Result<Self, StateError> {
        let (&tail, &head) = match (body.first(), body.last()) {
            (Some(tail), Some(head)) if body.len() >= 2 => (tail, head),
            _ => return Err(StateError::SnakeTooShort(body.len())),
        };

        let mut map = HashMap::with_capacity(body.len());
        for (i, &segment) in body.iter().enumerate() {
            let cell = SnakeCell {
                previous_body: body.get(i + 1).copied(),
                growth: false,
            };
            if map.insert(segment, Cell::Snake(cell)).is_some() {
                return Err(StateError::Cycle(segment));
            }
        }

        Ok(Self {
            total_steps: 0,
            score: 0,
            snake: Snake {
                direction,
                head,
                tail,
            },
            map,
        })
    }

    /// Add walls, skipping coordinates that are already occupied
    pub fn with_walls(mut self, walls: impl IntoIterator<Item = Coordinate>) -> Self {
        for wall in walls {
            self.place(wall, Cell::Wall);
        }
        self
    }

    /// Add food, skipping coordinates that are already occupied
    pub fn with_food(mut self, food: impl IntoIterator<Item = Coordinate>) -> Self {
        for item in food {
            self.place(item, Cell::Food);
        }
        self
    }

    /// Put a wall or food item on an empty coordinate.
    ///
    /// Returns false (and leaves the map alone) if the coordinate is taken.
    /// Snake cells are only ever written by the engine.
    pub fn place(&mut self, coordinate: Coordinate, cell: Cell) -> bool {
        if cell.is_snake() || self.map.contains_key(&coordinate) {
            return false;
        }
        self.map.insert(coordinate, cell);
        true
    }

    pub fn cell(&self, coordinate: Coordinate) -> Option<&Cell> {
        self.map.get(&coordinate)
    }

    pub fn snake_cell(&self, coordinate: Coordinate) -> Option<&SnakeCell> {
        match self.map.get(&coordinate) {
            Some(Cell::Snake(cell)) => Some(cell),
            _ => None,
        }
    }

    pub fn is_vacant(&self, coordinate: Coordinate) -> bool {
        !self.map.contains_key(&coordinate)
    }

    /// Body coordinates from tail to head, following the segment links.
    ///
    /// Stops early on a broken chain instead of looping.
    pub fn body(&self) -> Vec<Coordinate> {
        let mut body = Vec::new();
        let mut current = Some(self.snake.tail);

        while let Some(coordinate) = current {
            let Some(cell) = self.snake_cell(coordinate) else {
                break;
            };
            body.push(coordinate);
            if coordinate == self.snake.head || body.len() > self.map.len() {
                break;
            }
            current = cell.previous_body;
        }

        body
    }

    pub fn snake_len(&self) -> usize {
        self.body().len()
    }

    pub fn food(&self) -> impl Iterator<Item = Coordinate> + '_ {
        self.map
            .iter()
            .filter(|(_, cell)| matches!(cell, Cell::Food))
            .map(|(coordinate, _)| *coordinate)
    }

    pub fn walls(&self) -> impl Iterator<Item = Coordinate> + '_ {
        self.map
            .iter()
            .filter(|(_, cell)| matches!(cell, Cell::Wall))
            .map(|(coordinate, _)| *coordinate)
    }

    /// Check the well-formedness the engine relies on.
    ///
    /// The head and tail must be snake cells, the links from the tail must
    /// reach the head without revisiting a cell, the head must end the chain,
    /// every snake cell must be on the chain, and the snake must have at
    /// least two segments.
    pub fn validate(&self) -> Result<(), StateError> {
        let Snake { head, tail, .. } = self.snake;

        let head_cell = self.snake_cell(head).ok_or(StateError::HeadNotSnake(head))?;
        if let Some(next) = head_cell.previous_body {
            return Err(StateError::HeadHasLink { head, next });
        }
        self.snake_cell(tail).ok_or(StateError::TailNotSnake(tail))?;

        let mut visited = HashSet::new();
        let mut current = tail;
        while current != head {
            if !visited.insert(current) {
                return Err(StateError::Cycle(current));
            }
            let next = self
                .snake_cell(current)
                .and_then(|cell| cell.previous_body)
                .ok_or(StateError::ChainEndsEarly(current))?;
            if self.snake_cell(next).is_none() {
                return Err(StateError::BrokenLink {
                    from: current,
                    to: next,
                });
            }
            current = next;
        }
        visited.insert(head);

        let snake_cells = self.map.values().filter(|cell| cell.is_snake()).count();
        if snake_cells > visited.len() {
            return Err(StateError::DetachedSegments(snake_cells - visited.len()));
        }

        if visited.len() < 2 {
            return Err(StateError::SnakeTooShort(visited.len()));
        }

        Ok(())
    }
}
