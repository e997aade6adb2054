//! Game types built on top of fair-random rounds.
//!
//! A game runs three rounds: one of range 2 for the move order and one of
//! range 6 per player for the throws.

use crate::crypto::uniform_int;
use crate::dice::{DiceConfiguration, FACES};
use crate::error::{Error, Result};
use crate::protocol::Reveal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Range of the round that decides who moves first
pub const MOVE_ORDER_RANGE: u32 = 2;

/// Range of a throw round
pub const THROW_RANGE: u32 = FACES as u32;

/// Unique game identifier, used to correlate log lines
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameId(Uuid);

impl GameId {
    /// Create a new random game ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for GameId {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for GameId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl fmt::Debug for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GameId({})", self.0)
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The two sides of a game: the computer commits, the user contributes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Participant {
    Computer,
    User,
}

impl Participant {
    /// Get the opponent
    pub fn opponent(&self) -> Participant {
        match self {
            Participant::Computer => Participant::User,
            Participant::User => Participant::Computer,
        }
    }
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Participant::Computer => write!(f, "computer"),
            Participant::User => write!(f, "user"),
        }
    }
}

/// Who chooses a die and throws first
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveOrder {
    pub first: Participant,
}

impl MoveOrder {
    /// Decide the order from a range-2 round.
    ///
    /// A result of 0 means the user's value matched the computer's hidden
    /// value, i.e. the user guessed it, and the user moves first. A result
    /// of 1 means the computer moves first.
    pub fn from_reveal(reveal: &Reveal) -> Result<Self> {
        expect_range(reveal, MOVE_ORDER_RANGE)?;
        let first = if reveal.result == 0 {
            Participant::User
        } else {
            Participant::Computer
        };
        Ok(Self { first })
    }

    pub fn second(&self) -> Participant {
        self.first.opponent()
    }

    /// Participants in the order they move
    pub fn sequence(&self) -> [Participant; 2] {
        [self.first, self.second()]
    }
}

/// Face shown by `dice` for a finished throw round
pub fn throw_face(dice: &DiceConfiguration, reveal: &Reveal) -> Result<i64> {
    expect_range(reveal, THROW_RANGE)?;
    dice.face(reveal.result as usize).ok_or(Error::FaceIndexOutOfRange {
        index: reveal.result,
        faces: FACES,
    })
}

/// Pick one of the still available die indices uniformly at random
pub fn pick_computer_die(available: &[usize]) -> Result<usize> {
    let count = u32::try_from(available.len()).map_err(|_| Error::InvalidRange(u32::MAX))?;
    let pick = uniform_int(count)?;
    Ok(available[pick as usize])
}

fn expect_range(reveal: &Reveal, expected: u32) -> Result<()> {
    if reveal.range == expected {
        Ok(())
    } else {
        Err(Error::RangeMismatch {
            expected,
            actual: reveal.range,
        })
    }
}

/// Game result
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    ComputerWins,
    UserWins,
    Draw,
}

impl GameResult {
    /// Strictly greater face wins
    pub fn judge(computer_face: i64, user_face: i64) -> Self {
        match computer_face.cmp(&user_face) {
            std::cmp::Ordering::Greater => GameResult::ComputerWins,
            std::cmp::Ordering::Less => GameResult::UserWins,
            std::cmp::Ordering::Equal => GameResult::Draw,
        }
    }

    pub fn winner(&self) -> Option<Participant> {
        match self {
            GameResult::ComputerWins => Some(Participant::Computer),
            GameResult::UserWins => Some(Participant::User),
            GameResult::Draw => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameResult::ComputerWins => "Computer wins",
            GameResult::UserWins => "User wins",
            GameResult::Draw => "Draw",
        }
    }
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
