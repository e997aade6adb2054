//! Fair Dice Core Library
//!
//! This crate provides the commit-reveal randomness protocol, its
//! cryptographic primitives, dice configurations and the win probability
//! model for a two-player game of non-transitive dice.

pub mod crypto;
pub mod dice;
pub mod error;
pub mod game;
pub mod probability;
pub mod protocol;

pub use crypto::{uniform_int, Commitment, MacTag, SecretKey};
pub use dice::DiceConfiguration;
pub use error::{Error, Result};
pub use game::{GameId, GameResult, MoveOrder, Participant};
pub use probability::{probability_matrix, win_probability, ProbabilityMatrix, WinProbability};
pub use protocol::{Aborted, FairRandomRound, Reveal, RoundState};
