use super::state::Coordinate;

/// A direction name outside `UP`, `DOWN`, `LEFT`, `RIGHT`
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown direction: {0:?}")]
pub struct ParseDirectionError(pub String);

/// A coordinate key that is not of the form `"x,y"`
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid coordinate key: {0:?} (expected \"x,y\")")]
pub struct ParseCoordinateError(pub String);

/// Structural problems in a caller-supplied [`GameState`](super::GameState).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    /// The snake's head does not point at a snake cell.
    #[error("snake head {0} is not a snake cell")]
    HeadNotSnake(Coordinate),

    /// The snake's tail does not point at a snake cell.
    #[error("snake tail {0} is not a snake cell")]
    TailNotSnake(Coordinate),

    /// The head cell links further on instead of ending the chain.
    #[error("snake head {head} links on to {next}")]
    HeadHasLink { head: Coordinate, next: Coordinate },

    /// Following the body links from the tail hit a cell that is not snake.
    #[error("body link from {from} points at {to}, which is not a snake cell")]
    BrokenLink { from: Coordinate, to: Coordinate },

    /// The body chain ended before reaching the head.
    #[error("body chain ends at {0} before reaching the head")]
    ChainEndsEarly(Coordinate),

    /// The body chain revisits a coordinate.
    #[error("body chain loops back to {0}")]
    Cycle(Coordinate),

    /// The snake has fewer segments than a playable game needs.
    #[error("snake has {0} segment(s), at least 2 are required")]
    SnakeTooShort(usize),

    /// Snake cells exist that are not part of the tail-to-head chain.
    #[error("{0} snake cell(s) are not reachable from the tail")]
    DetachedSegments(usize),
}
