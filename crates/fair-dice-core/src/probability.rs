//! Win probabilities between dice configurations.
//!
//! Each thrown die shows each of its six faces with probability 1/6, so the
//! chance that `a` beats `b` is the share of the 36 ordered face pairs in
//! which `a`'s face is strictly greater. Ties count for neither side.

use crate::dice::{DiceConfiguration, FACES};
use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Number of ordered face pairs between two dice
pub const FACE_PAIRS: u32 = (FACES * FACES) as u32;

/// Exact win probability, stored as a count of winning face pairs out of 36
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct WinProbability {
    wins: u32,
}

#[derive(Deserialize)]
struct WinProbabilityRepr {
    wins: u32,
}

impl WinProbability {
    /// Value of every diagonal cell of a matrix: 12/36 = 1/3
    pub const DIAGONAL: WinProbability = WinProbability {
        wins: FACE_PAIRS / 3,
    };

    /// Build from a count of winning face pairs, at most 36
    pub fn new(wins: u32) -> Result<Self> {
        if wins > FACE_PAIRS {
            return Err(Error::InvalidProbability(format!(
                "{} winning pairs out of {}",
                wins, FACE_PAIRS
            )));
        }
        Ok(Self { wins })
    }

    pub fn numerator(&self) -> u32 {
        self.wins
    }

    pub fn denominator(&self) -> u32 {
        FACE_PAIRS
    }

    pub fn as_f64(&self) -> f64 {
        f64::from(self.wins) / f64::from(FACE_PAIRS)
    }
}

impl<'de> Deserialize<'de> for WinProbability {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let repr = WinProbabilityRepr::deserialize(deserializer)?;
        Self::new(repr.wins).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for WinProbability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match f.precision() {
            Some(precision) => write!(f, "{:.*}", precision, self.as_f64()),
            None => write!(f, "{:.4}", self.as_f64()),
        }
    }
}

/// Probability that a throw of `a` shows a strictly greater face than `b`
pub fn win_probability(a: &DiceConfiguration, b: &DiceConfiguration) -> WinProbability {
    let wins = a
        .faces()
        .iter()
        .map(|fa| b.faces().iter().filter(|&fb| fa > fb).count() as u32)
        .sum();
    WinProbability { wins }
}

/// Pairwise win probabilities over an ordered list of dice.
///
/// Rows are the user's die and columns the computer's die; cell `(i, j)` is
/// the probability that die `i` beats die `j`. The diagonal is fixed at 1/3
/// because a die against itself is not a contest.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProbabilityMatrix {
    labels: Vec<String>,
    cells: Vec<Vec<WinProbability>>,
}

#[derive(Deserialize)]
struct ProbabilityMatrixRepr {
    labels: Vec<String>,
    cells: Vec<Vec<WinProbability>>,
}

impl<'de> Deserialize<'de> for ProbabilityMatrix {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let repr = ProbabilityMatrixRepr::deserialize(deserializer)?;
        repr.validate().map_err(serde::de::Error::custom)
    }
}

impl ProbabilityMatrixRepr {
    /// The table must be square, one label per row, with the 1/3 diagonal
    fn validate(self) -> Result<ProbabilityMatrix> {
        let size = self.cells.len();
        if self.labels.len() != size {
            return Err(Error::InvalidProbability(format!(
                "{} labels for {} rows",
                self.labels.len(),
                size
            )));
        }
        for (i, row) in self.cells.iter().enumerate() {
            if row.len() != size {
                return Err(Error::InvalidProbability(format!(
                    "row {} has {} cells, expected {}",
                    i,
                    row.len(),
                    size
                )));
            }
            if row[i] != WinProbability::DIAGONAL {
                return Err(Error::InvalidProbability(format!(
                    "diagonal cell {} is {}, expected 1/3",
                    i, row[i]
                )));
            }
        }
        Ok(ProbabilityMatrix {
            labels: self.labels,
            cells: self.cells,
        })
    }
}

impl ProbabilityMatrix {
    pub fn size(&self) -> usize {
        self.cells.len()
    }

    /// Display labels of the dice, in input order
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn cell(&self, user: usize, computer: usize) -> Option<WinProbability> {
        self.cells.get(user)?.get(computer).copied()
    }

    pub fn rows(&self) -> &[Vec<WinProbability>] {
        &self.cells
    }

    pub fn to_f64_rows(&self) -> Vec<Vec<f64>> {
        self.cells
            .iter()
            .map(|row| row.iter().map(WinProbability::as_f64).collect())
            .collect()
    }
}

/// Build the matrix of `win_probability` over every ordered pair of dice
pub fn probability_matrix(configs: &[DiceConfiguration]) -> ProbabilityMatrix {
    let cells = configs
        .iter()
        .enumerate()
        .map(|(i, a)| {
            configs
                .iter()
                .enumerate()
                .map(|(j, b)| {
                    if i == j {
                        WinProbability::DIAGONAL
                    } else {
                        win_probability(a, b)
                    }
                })
                .collect()
        })
        .collect();

    ProbabilityMatrix {
        labels: configs.iter().map(ToString::to_string).collect(),
        cells,
    }
}
