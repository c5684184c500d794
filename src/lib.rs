//! Space Snake - a deterministic Snake engine with a headless driver
//!
//! This library provides:
//! - Core game logic (game module): one state plus one direction in,
//!   next state plus an outcome out
//! - A host-side session driver with pluggable move policies (session module)
//! - A typed event channel for game notifications (events module)
//! - JSON snapshots of game state (persistence module)
//! - Scripted and timed play modes used by the binary (modes module)

pub mod events;
pub mod game;
pub mod greeter;
pub mod metrics;
pub mod modes;
pub mod persistence;
pub mod session;
