//! One round of collaborative random-number generation.
//!
//! Committed -> PeerContributed -> Revealed
//!
//! The computer commits to a hidden value by publishing its HMAC tag, the
//! user contributes a value in the open, and the result is
//! `(self_value + peer_value) mod range`. The key is disclosed at the end so
//! the user can check the tag.

use crate::crypto::{Commitment, MacTag, SecretKey};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

/// Position of a round in its state machine
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundState {
    Committed,
    PeerContributed,
    Revealed,
}

impl RoundState {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoundState::Committed => "committed",
            RoundState::PeerContributed => "peer-contributed",
            RoundState::Revealed => "revealed",
        }
    }
}

impl fmt::Display for RoundState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Everything needed to audit a finished round
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reveal {
    pub range: u32,
    pub result: u32,
    pub self_value: u32,
    pub peer_value: u32,
    pub secret_key: SecretKey,
    pub mac: MacTag,
}

impl Reveal {
    /// Check the tag against the disclosed key and value, and the sum
    pub fn verify(&self) -> bool {
        Commitment::verify(&self.mac, &self.secret_key, self.self_value)
            && self.self_value < self.range
            && self.peer_value < self.range
            && self.result == combine(self.self_value, self.peer_value, self.range)
    }
}

/// A round abandoned before it was revealed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Aborted {
    pub range: u32,
    pub state: RoundState,
}

impl fmt::Display for Aborted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "round of range {} aborted while {}", self.range, self.state)
    }
}

/// One commit/reveal exchange between the computer and the user
#[derive(Debug)]
pub struct FairRandomRound {
    range: u32,
    commitment: Commitment,
    peer_value: Option<u32>,
    state: RoundState,
}

impl FairRandomRound {
    /// Commit to a fresh hidden value in `[0, range)`
    pub fn start(range: u32) -> Result<Self> {
        let commitment = Commitment::commit(range)?;
        Ok(Self::with_commitment(range, commitment))
    }

    pub(crate) fn with_commitment(range: u32, commitment: Commitment) -> Self {
        debug!(range, mac = %commitment.mac(), "Round committed");
        Self {
            range,
            commitment,
            peer_value: None,
            state: RoundState::Committed,
        }
    }

    pub fn range(&self) -> u32 {
        self.range
    }

    pub fn state(&self) -> RoundState {
        self.state
    }

    /// The tag published at commit time
    pub fn mac(&self) -> &MacTag {
        self.commitment.mac()
    }

    /// Accept the user's value; it must already be in `[0, range)`
    pub fn contribute(&mut self, peer_value: u32) -> Result<()> {
        self.expect_state(RoundState::Committed, "contribute")?;
        if peer_value >= self.range {
            return Err(Error::PeerValueOutOfRange {
                value: peer_value,
                range: self.range,
            });
        }
        debug!(range = self.range, peer_value, "Peer contributed");
        self.peer_value = Some(peer_value);
        self.state = RoundState::PeerContributed;
        Ok(())
    }

    /// Disclose the key and hidden value and combine the two contributions
    pub fn reveal(&mut self) -> Result<Reveal> {
        self.expect_state(RoundState::PeerContributed, "reveal")?;
        let peer_value = self.peer_value.ok_or(Error::ProtocolState {
            operation: "reveal",
            state: self.state,
        })?;

        let self_value = self.commitment.chosen_value();
        let result = combine(self_value, peer_value, self.range);
        self.state = RoundState::Revealed;
        debug!(range = self.range, self_value, peer_value, result, "Round revealed");

        Ok(Reveal {
            range: self.range,
            result,
            self_value,
            peer_value,
            secret_key: self.commitment.secret_key().clone(),
            mac: *self.commitment.mac(),
        })
    }

    /// Abandon the round; the hidden value is discarded unrevealed
    pub fn abort(self) -> Aborted {
        info!(range = self.range, state = %self.state, "Round aborted");
        Aborted {
            range: self.range,
            state: self.state,
        }
    }

    fn expect_state(&self, expected: RoundState, operation: &'static str) -> Result<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(Error::ProtocolState {
                operation,
                state: self.state,
            })
        }
    }
}

fn combine(self_value: u32, peer_value: u32, range: u32) -> u32 {
    ((u64::from(self_value) + u64::from(peer_value)) % u64::from(range)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn round_with(range: u32, self_value: u32) -> FairRandomRound {
        FairRandomRound::with_commitment(
            range,
            Commitment::from_parts(SecretKey::random(), self_value),
        )
    }

    #[test]
    fn test_full_round() {
        let mut round = FairRandomRound::start(6).unwrap();
        let published = *round.mac();
        assert_eq!(round.state(), RoundState::Committed);

        round.contribute(4).unwrap();
        assert_eq!(round.state(), RoundState::PeerContributed);

        let reveal = round.reveal().unwrap();
        assert_eq!(round.state(), RoundState::Revealed);
        assert_eq!(reveal.mac, published);
        assert_eq!(reveal.peer_value, 4);
        assert_eq!(reveal.result, (reveal.self_value + 4) % 6);
        assert!(Commitment::verify(&published, &reveal.secret_key, reveal.self_value));
        assert!(reveal.verify());
    }

    #[test]
    fn test_zero_range_rejected() {
        assert_eq!(
            FairRandomRound::start(0).unwrap_err(),
            Error::InvalidRange(0)
        );
    }

    #[test]
    fn test_reveal_before_contribute_fails() {
        let mut round = FairRandomRound::start(2).unwrap();

        assert_eq!(
            round.reveal().unwrap_err(),
            Error::ProtocolState {
                operation: "reveal",
                state: RoundState::Committed
            }
        );
        assert_eq!(round.state(), RoundState::Committed);
    }

    #[test]
    fn test_contribute_twice_fails() {
        let mut round = FairRandomRound::start(2).unwrap();
        round.contribute(1).unwrap();

        assert_eq!(
            round.contribute(0).unwrap_err(),
            Error::ProtocolState {
                operation: "contribute",
                state: RoundState::PeerContributed
            }
        );
    }

    #[test]
    fn test_reveal_twice_fails() {
        let mut round = FairRandomRound::start(2).unwrap();
        round.contribute(0).unwrap();
        round.reveal().unwrap();

        assert!(matches!(
            round.reveal(),
            Err(Error::ProtocolState {
                state: RoundState::Revealed,
                ..
            })
        ));
        assert!(round.contribute(0).is_err());
    }

    #[test]
    fn test_out_of_range_peer_value_rejected() {
        let mut round = FairRandomRound::start(6).unwrap();

        assert_eq!(
            round.contribute(6).unwrap_err(),
            Error::PeerValueOutOfRange { value: 6, range: 6 }
        );
        assert_eq!(round.state(), RoundState::Committed);
        round.contribute(5).unwrap();
    }

    #[test]
    fn test_abort_reports_state() {
        let round = FairRandomRound::start(6).unwrap();
        assert_eq!(
            round.abort(),
            Aborted {
                range: 6,
                state: RoundState::Committed
            }
        );

        let mut round = FairRandomRound::start(2).unwrap();
        round.contribute(1).unwrap();
        let aborted = round.abort();
        assert_eq!(aborted.state, RoundState::PeerContributed);
        assert_eq!(
            aborted.to_string(),
            "round of range 2 aborted while peer-contributed"
        );
    }

    #[test]
    fn test_combined_result_wraps() {
        let mut round = round_with(6, 5);
        round.contribute(3).unwrap();

        assert_eq!(round.reveal().unwrap().result, 2);
    }

    #[test]
    fn test_guess_match_gives_zero() {
        for value in 0..2 {
            let mut round = round_with(2, value);
            round.contribute(value).unwrap();
            assert_eq!(round.reveal().unwrap().result, 0);
        }
    }

    #[test]
    fn test_tampered_reveal_fails_verification() {
        let mut round = round_with(6, 2);
        round.contribute(1).unwrap();
        let reveal = round.reveal().unwrap();
        assert!(reveal.verify());

        let mut forged = reveal.clone();
        forged.self_value = 3;
        forged.result = 4;
        assert!(!forged.verify());

        let mut forged = reveal.clone();
        forged.result = 0;
        assert!(!forged.verify());

        let mut forged = reveal;
        forged.secret_key = SecretKey::random();
        assert!(!forged.verify());
    }

    #[test]
    fn test_result_uniform_for_fixed_peer_value() {
        const ROUNDS: usize = 12_000;
        for peer_value in 0..6 {
            let mut counts = [0usize; 6];
            for _ in 0..ROUNDS {
                let mut round = FairRandomRound::start(6).unwrap();
                round.contribute(peer_value).unwrap();
                counts[round.reveal().unwrap().result as usize] += 1;
            }

            let expected = ROUNDS as f64 / 6.0;
            let chi_squared: f64 = counts
                .iter()
                .map(|&c| (c as f64 - expected).powi(2) / expected)
                .sum();
            assert!(
                chi_squared < 30.0,
                "peer {} counts {:?}",
                peer_value,
                counts
            );
        }
    }

    #[test]
    fn test_reveal_serialization() {
        let mut round = FairRandomRound::start(6).unwrap();
        round.contribute(2).unwrap();
        let reveal = round.reveal().unwrap();

        let json = serde_json::to_string(&reveal).unwrap();
        assert!(json.contains(&reveal.secret_key.to_string()));
        let deserialized: Reveal = serde_json::from_str(&json).unwrap();

        assert_eq!(reveal, deserialized);
        assert!(deserialized.verify());
    }

    proptest! {
        #[test]
        fn test_result_is_modular_sum(range in 1u32..=64, a in 0u32..64, b in 0u32..64) {
            let (a, b) = (a % range, b % range);
            let mut round = round_with(range, a);
            round.contribute(b).unwrap();
            let reveal = round.reveal().unwrap();

            prop_assert_eq!(reveal.result, (a + b) % range);
            prop_assert!(reveal.verify());
        }
    }
}
