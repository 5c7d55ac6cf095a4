//! Backgammon rules engine.
//!
//! Pure game logic with no I/O and no knowledge of sessions or
//! connections: everything here operates on a [`BoardState`] passed in by
//! the caller, which is what makes it safe to drive from a single session
//! actor.
//!
//! # Key types
//!
//! - [`BoardState`] — one session's position, dice, and undo history
//! - [`Snapshot`] — a deep copy of the mutable fields; also the wire shape
//! - [`ColorPair`] — a `{W, B}` checker count
//! - [`rules`] — legal targets and validated move application
//! - [`roll_dice`] — two dice, doubled into four on equal faces
//!
//! # Numbering
//!
//! Points are 0-indexed. White moves toward index 0 and bears off below
//! it; Black moves toward index 23 and bears off above it.

mod board;
mod dice;
mod error;
pub mod rules;

pub use board::{
    BoardState, CHECKERS_PER_COLOR, ColorPair, HISTORY_CAPACITY, POINTS, Snapshot,
};
pub use dice::roll_dice;
pub use error::{InvariantViolation, MoveError};
