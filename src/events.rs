//! Typed publish/subscribe channel between the game driver and whoever is
//! listening (loggers, UIs, tests).

use serde::Serialize;
use tokio::sync::broadcast;

use crate::game::Outcome;

const DEFAULT_CAPACITY: usize = 256;

/// Which stream an event belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    Tick,
    GameOver,
    Restart,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    /// A move was submitted to the engine
    Ticked {
        total_steps: u32,
        score: u32,
        outcome: Outcome,
    },
    /// A game ended. `outcome` is the collision, or `None` when the host
    /// stopped the game itself.
    GameOver {
        score: u32,
        total_steps: u32,
        outcome: Option<Outcome>,
    },
    /// A new game was started; `game` counts from 1
    Restarted { game: u32 },
}

impl GameEvent {
    pub fn topic(&self) -> Topic {
        match self {
            GameEvent::Ticked { .. } => Topic::Tick,
            GameEvent::GameOver { .. } => Topic::GameOver,
            GameEvent::Restarted { .. } => Topic::Restart,
        }
    }
}

/// Cloneable handle to a broadcast channel of [`GameEvent`]s.
///
/// Publishing with no subscribers is not an error; slow subscribers see
/// `RecvError::Lagged` and skip ahead.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<GameEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Send an event; returns how many subscribers received it
    pub fn publish(&self, event: GameEvent) -> usize {
        self.tx.send(event).unwrap_or(0)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<GameEvent> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
