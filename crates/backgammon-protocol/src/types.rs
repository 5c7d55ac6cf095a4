//! Core protocol types for the backgammon wire format.
//!
//! This module defines every type that travels "on the wire": the events a
//! browser sends, the events the server pushes back, and the small value
//! types (colors, board tokens, identifiers) embedded in them.
//!
//! Every event is a JSON object tagged by its `"event"` field:
//!
//! ```text
//! → {"event":"move","source":12,"dest":"OFF"}
//! ← {"event":"status","msg":"Blocked."}
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A unique identifier for a connected participant.
///
/// The connection is the identity: a browser that reconnects gets a fresh
/// `PlayerId`. Newtype over `u64` so it can't be confused with a
/// [`SessionId`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

/// A unique identifier for one paired game session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Color
// ---------------------------------------------------------------------------

/// One of the two sides. Exactly two colors ever exist, so everything keyed
/// by color is a fixed pair rather than a map.
///
/// On the wire a color is the single letter `"W"` or `"B"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    #[serde(rename = "W")]
    White,
    #[serde(rename = "B")]
    Black,
}

impl Color {
    /// Both colors, White first.
    pub const ALL: [Color; 2] = [Color::White, Color::Black];

    /// Returns the other side.
    pub fn opponent(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Stable array index: White = 0, Black = 1.
    pub fn index(self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => 1,
        }
    }

    /// Human-readable name used in status messages.
    pub fn name(self) -> &'static str {
        match self {
            Color::White => "White",
            Color::Black => "Black",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Color::White => "W",
            Color::Black => "B",
        })
    }
}

// ---------------------------------------------------------------------------
// Destination: a board token
// ---------------------------------------------------------------------------

/// A place a checker can move from or to.
///
/// Board points use the engine's 0-indexed numbering (0..=23, White moves
/// toward 0, Black toward 23). `Off` and `Bar` are the two sentinels.
///
/// On the wire a point is a bare integer and the sentinels are the strings
/// `"OFF"` and `"BAR"`; that conversion lives in [`RawDestination`] so the
/// rest of the code only ever matches on variants.
///
/// The derived `Ord` puts every `BoardPoint` before `Off`, which is the
/// order legal-target lists are reported in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawDestination", into = "RawDestination")]
pub enum Destination {
    /// A point index. Not range-checked here: the rules engine rejects
    /// indices past 23.
    BoardPoint(u8),
    /// Borne off.
    Off,
    /// The bar.
    Bar,
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Destination::BoardPoint(i) => write!(f, "{i}"),
            Destination::Off => f.write_str("OFF"),
            Destination::Bar => f.write_str("BAR"),
        }
    }
}

/// The untagged wire form of a [`Destination`].
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawDestination {
    Index(i64),
    Token(String),
}

impl TryFrom<RawDestination> for Destination {
    type Error = String;

    fn try_from(raw: RawDestination) -> Result<Self, Self::Error> {
        match raw {
            RawDestination::Index(i) => u8::try_from(i)
                .map(Destination::BoardPoint)
                .map_err(|_| format!("point index {i} out of range")),
            RawDestination::Token(token) => match token.as_str() {
                "OFF" => Ok(Destination::Off),
                "BAR" => Ok(Destination::Bar),
                other => Err(format!("unknown board token {other:?}")),
            },
        }
    }
}

impl From<Destination> for RawDestination {
    fn from(dest: Destination) -> Self {
        match dest {
            Destination::BoardPoint(i) => RawDestination::Index(i64::from(i)),
            Destination::Off => RawDestination::Token("OFF".into()),
            Destination::Bar => RawDestination::Token("BAR".into()),
        }
    }
}

// ---------------------------------------------------------------------------
// Recipient
// ---------------------------------------------------------------------------

/// Who should receive an outbound event produced by a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recipient {
    /// Both participants of the session.
    All,
    /// Only the participant playing this color.
    Only(Color),
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Everything a client can send.
///
/// `#[serde(tag = "event", rename_all = "kebab-case")]` gives the
/// internally tagged shape `{"event":"select-source","source":"BAR"}`.
/// Disconnect isn't an event: the transport closing is the signal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum ClientEvent {
    /// Ask to be paired (or re-sync if already paired).
    Join,
    /// Roll the dice for the current turn.
    Roll,
    /// Query legal targets for a source; answered to the caller only.
    SelectSource { source: Destination },
    /// Move one checker.
    Move { source: Destination, dest: Destination },
    /// Pass the turn to the opponent.
    EndTurn,
    /// Step back to the state before the last move.
    Undo,
}

/// Everything the server pushes to a client.
///
/// Generic over the board payload `S` so this crate stays independent of
/// the engine; the server instantiates it with the engine's snapshot type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum ServerEvent<S> {
    /// The caller's color in its session (or pending session).
    Assigned { color: Color },
    /// A short human-readable notice: waiting, matched, win, or an error.
    Status { msg: String },
    /// The full board, sent to both participants after every change.
    State { state: S },
    /// Legal targets for a previously selected source.
    SelectResult {
        source: Destination,
        targets: Vec<Destination>,
    },
}

// =========================================================================
// Tests
// =========================================================================
