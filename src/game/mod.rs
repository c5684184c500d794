//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or timing dependencies.
//! The engine turns one state plus one direction into the next state and an
//! [`Outcome`]; everything else is up to the caller.

pub mod action;
pub mod config;
pub mod engine;
pub mod error;
pub mod state;

// Re-export commonly used types
pub use action::Direction;
pub use config::{GameConfig, SpawnArea};
pub use engine::{ActionResult, Engine, Outcome};
pub use error::{ParseCoordinateError, ParseDirectionError, StateError};
pub use state::{Cell, Coordinate, GameState, Snake, SnakeCell};
