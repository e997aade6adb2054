//! Error types for the fair dice core.

use crate::protocol::RoundState;
use thiserror::Error;

/// Errors raised by the protocol, the random source and the dice model
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid range: {0} (must be at least 1)")]
    InvalidRange(u32),

    #[error("Cannot {operation} while the round is {state}")]
    ProtocolState {
        operation: &'static str,
        state: RoundState,
    },

    #[error("Peer value {value} is outside 0..{range}")]
    PeerValueOutOfRange { value: u32, range: u32 },

    #[error("Expected a round of range {expected}, got {actual}")]
    RangeMismatch { expected: u32, actual: u32 },

    #[error("Invalid dice configuration: {0}")]
    InvalidDiceConfiguration(String),

    #[error("Throw result {index} has no face on a {faces}-sided die")]
    FaceIndexOutOfRange { index: u32, faces: usize },

    #[error("Invalid probability: {0}")]
    InvalidProbability(String),
}

pub type Result<T> = std::result::Result<T, Error>;
