//! The commit-contribute-reveal fair-random round.

mod round;

pub use round::{Aborted, FairRandomRound, Reveal, RoundState};
