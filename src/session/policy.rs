use std::collections::VecDeque;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::game::{Cell, Direction, GameState};

/// Source of one direction per tick
pub trait Policy {
    fn choose(&mut self, state: &GameState) -> Direction;
}

/// Plays a fixed list of moves, then keeps going straight
#[derive(Debug, Clone, Default)]
pub struct ScriptedPolicy {
    moves: VecDeque<Direction>,
}

impl ScriptedPolicy {
    pub fn new(moves: impl IntoIterator<Item = Direction>) -> Self {
        Self {
            moves: moves.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.moves.len()
    }
}

impl Policy for ScriptedPolicy {
    fn choose(&mut self, state: &GameState) -> Direction {
        self.moves
            .pop_front()
            .unwrap_or(state.snake.direction)
    }
}

/// Uniformly random among the three non-reversing directions
pub struct RandomPolicy<R: Rng> {
    rng: R,
}

impl<R: Rng> RandomPolicy<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> Policy for RandomPolicy<R> {
    fn choose(&mut self, state: &GameState) -> Direction {
        let current = state.snake.direction;
        let options: Vec<Direction> = Direction::ALL
            .into_iter()
            .filter(|d| !current.is_opposite(*d))
            .collect();
        options.choose(&mut self.rng).copied().unwrap_or(current)
    }
}

/// Heads for the nearest food, never stepping onto a wall or the body when
/// another move is available.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyPolicy;

impl Policy for GreedyPolicy {
    fn choose(&mut self, state: &GameState) -> Direction {
        let current = state.snake.direction;
        let head = state.snake.head;
        let food: Vec<_> = state.food().collect();

        Direction::ALL
            .into_iter()
            .filter(|d| !current.is_opposite(*d))
            .filter_map(|d| Some((d, head.checked_moved_in_direction(d)?)))
            .filter(|(_, next)| {
                !matches!(state.cell(*next), Some(Cell::Wall) | Some(Cell::Snake(_)))
            })
            // Prefer the current heading on ties so the path stays straight.
            .min_by_key(|(d, next)| {
                let distance = food
                    .iter()
                    .map(|item| next.manhattan_distance(*item))
                    .min()
                    .unwrap_or(0);
                (distance, *d != current)
            })
            .map(|(d, _)| d)
            .unwrap_or(current)
    }
}
