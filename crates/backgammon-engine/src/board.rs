//! Board state: the pure data model for one session's game.

use std::collections::VecDeque;
use std::ops::{Index, IndexMut};

use backgammon_protocol::Color;
use serde::{Deserialize, Serialize};

use crate::InvariantViolation;

/// Number of points on the board.
pub const POINTS: usize = 24;

/// Checkers each color owns, across points, bar, and off.
pub const CHECKERS_PER_COLOR: u8 = 15;

/// How many snapshots the undo history keeps. The oldest is evicted first.
pub const HISTORY_CAPACITY: usize = 80;

// ---------------------------------------------------------------------------
// ColorPair
// ---------------------------------------------------------------------------

/// A checker count for each color, serialized as `{"W": n, "B": n}`.
///
/// Indexable by [`Color`], so rules code reads `board.bar[color]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColorPair {
    #[serde(rename = "W")]
    pub white: u8,
    #[serde(rename = "B")]
    pub black: u8,
}

impl ColorPair {
    pub const fn new(white: u8, black: u8) -> Self {
        Self { white, black }
    }
}

impl Index<Color> for ColorPair {
    type Output = u8;

    fn index(&self, color: Color) -> &u8 {
        match color {
            Color::White => &self.white,
            Color::Black => &self.black,
        }
    }
}

impl IndexMut<Color> for ColorPair {
    fn index_mut(&mut self, color: Color) -> &mut u8 {
        match color {
            Color::White => &mut self.white,
            Color::Black => &mut self.black,
        }
    }
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// A deep copy of every mutable field of a [`BoardState`] except history.
///
/// This is also exactly what clients receive in a `state` event:
///
/// ```text
/// {points:[{W,B}×24], bar:{W,B}, off:{W,B}, turn, dice, dice_left, rolled}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub points: [ColorPair; POINTS],
    pub bar: ColorPair,
    pub off: ColorPair,
    pub turn: Color,
    pub dice: Vec<u8>,
    pub dice_left: Vec<u8>,
    pub rolled: bool,
}

// ---------------------------------------------------------------------------
// BoardState
// ---------------------------------------------------------------------------

/// One session's authoritative position.
///
/// Fields are public so the rules engine (and tests) can read and adjust
/// them directly; the history is private and only reachable through
/// [`push_history`](Self::push_history) and [`undo`](Self::undo) so its
/// capacity bound can't be bypassed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardState {
    pub points: [ColorPair; POINTS],
    pub bar: ColorPair,
    pub off: ColorPair,
    pub turn: Color,
    /// The dice as rolled: empty, two values, or four equal values.
    pub dice: Vec<u8>,
    /// Dice values not yet used this turn.
    pub dice_left: Vec<u8>,
    pub rolled: bool,
    history: VecDeque<Snapshot>,
}

impl BoardState {
    /// The standard opening position, White to roll.
    ///
    /// In 1-indexed board terms White has 2 on the 24-point, 5 on the
    /// 13-point, 3 on the 8-point and 5 on the 6-point; Black mirrors it.
    pub fn new() -> Self {
        let mut points = [ColorPair::default(); POINTS];

        points[23].white = 2;
        points[12].white = 5;
        points[7].white = 3;
        points[5].white = 5;

        points[0].black = 2;
        points[11].black = 5;
        points[16].black = 3;
        points[18].black = 5;

        Self {
            points,
            bar: ColorPair::default(),
            off: ColorPair::default(),
            turn: Color::White,
            dice: Vec::new(),
            dice_left: Vec::new(),
            rolled: false,
            history: VecDeque::new(),
        }
    }

    /// Builds a custom position. Whatever isn't on a point or the bar is
    /// counted as borne off, so conservation holds by construction.
    ///
    /// # Errors
    /// Returns an [`InvariantViolation`] if a color has more than 15
    /// checkers in play or a point holds both colors.
    pub fn from_position(
        points: [ColorPair; POINTS],
        bar: ColorPair,
    ) -> Result<Self, InvariantViolation> {
        let mut board = Self {
            points,
            bar,
            ..Self::new()
        };
        for color in Color::ALL {
            let in_play = board.in_play(color);
            let off = u32::from(CHECKERS_PER_COLOR)
                .checked_sub(in_play)
                .ok_or(InvariantViolation::CheckerCount {
                    color,
                    found: in_play,
                })?;
            // in_play <= 15 here, so off fits in a u8
            board.off[color] = off as u8;
        }
        board.verify()?;
        Ok(board)
    }

    /// Deep copy of all mutable fields.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            points: self.points,
            bar: self.bar,
            off: self.off,
            turn: self.turn,
            dice: self.dice.clone(),
            dice_left: self.dice_left.clone(),
            rolled: self.rolled,
        }
    }

    /// Overwrites all mutable fields from a prior snapshot. History is left
    /// alone.
    pub fn restore(&mut self, snapshot: Snapshot) {
        self.points = snapshot.points;
        self.bar = snapshot.bar;
        self.off = snapshot.off;
        self.turn = snapshot.turn;
        self.dice = snapshot.dice;
        self.dice_left = snapshot.dice_left;
        self.rolled = snapshot.rolled;
    }

    /// Records the current state on the undo stack, evicting the oldest
    /// entry past [`HISTORY_CAPACITY`].
    pub fn push_history(&mut self) {
        self.history.push_back(self.snapshot());
        while self.history.len() > HISTORY_CAPACITY {
            self.history.pop_front();
        }
    }

    /// Pops the most recent snapshot and restores it. Returns `false` if
    /// there was nothing to undo.
    pub fn undo(&mut self) -> bool {
        match self.history.pop_back() {
            Some(snapshot) => {
                self.restore(snapshot);
                true
            }
            None => false,
        }
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Stores a fresh roll as both the shown dice and the usable dice.
    pub fn record_roll(&mut self, dice: Vec<u8>) {
        self.dice_left = dice.clone();
        self.dice = dice;
        self.rolled = true;
    }

    /// Hands the turn to the opponent with no dice rolled.
    pub fn end_turn(&mut self) {
        self.turn = self.turn.opponent();
        self.dice.clear();
        self.dice_left.clear();
        self.rolled = false;
    }

    /// `true` once all 15 of `color`'s checkers are borne off.
    pub fn has_won(&self, color: Color) -> bool {
        self.off[color] >= CHECKERS_PER_COLOR
    }

    /// Checkers of `color` on points and the bar.
    fn in_play(&self, color: Color) -> u32 {
        let on_points: u32 = self.points.iter().map(|p| u32::from(p[color])).sum();
        on_points + u32::from(self.bar[color])
    }

    /// Checks checker conservation and that no point holds both colors.
    ///
    /// # Errors
    /// Returns the first violated invariant found.
    pub fn verify(&self) -> Result<(), InvariantViolation> {
        for color in Color::ALL {
            let found = self.in_play(color) + u32::from(self.off[color]);
            if found != u32::from(CHECKERS_PER_COLOR) {
                return Err(InvariantViolation::CheckerCount { color, found });
            }
        }
        if let Some(index) = self
            .points
            .iter()
            .position(|p| p.white > 0 && p.black > 0)
        {
            return Err(InvariantViolation::MixedPoint { index });
        }
        Ok(())
    }
}

impl Default for BoardState {
    fn default() -> Self {
        Self::new()
    }
}
