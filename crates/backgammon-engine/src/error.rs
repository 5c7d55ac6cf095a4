//! Error types for the rules engine.

use backgammon_protocol::Color;

/// Why a requested move was rejected.
///
/// All of these are user errors: the board is untouched and the player can
/// simply try something else. The `Display` text is sent verbatim to the
/// player who asked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    /// A checker is on the bar and the source isn't the bar.
    #[error("You must enter from the bar first.")]
    MustEnterFromBar,

    /// The source is a point index past 23, or `OFF`.
    #[error("Bad source.")]
    BadSource,

    /// The source point (or the bar) holds none of the mover's checkers.
    #[error("No checker there.")]
    InvalidSource,

    /// The destination is `BAR` or an index past the last point.
    #[error("Bad destination.")]
    InvalidDestination,

    /// The destination holds two or more opposing checkers.
    #[error("Blocked.")]
    Blocked,

    /// A checker on the bar must enter a point first.
    #[error("Cannot bear off from bar.")]
    BarToOff,

    /// No remaining die enters the bar checker on the requested point.
    #[error("Illegal entry.")]
    IllegalEntry,

    /// No remaining die value takes the source to the destination.
    #[error("Illegal move.")]
    IllegalMove,

    /// Every die of this roll has been used.
    #[error("No dice left. End turn.")]
    NoDiceLeft,
}

/// A broken board invariant. Never produced by legal play: seeing one
/// means a bug, not a bad request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InvariantViolation {
    /// Points + bar + off don't add up to 15 for a color.
    #[error("{color} has {found} checkers, expected 15")]
    CheckerCount { color: Color, found: u32 },

    /// Both colors have checkers on the same point.
    #[error("point {index} holds checkers of both colors")]
    MixedPoint { index: usize },
}
