//! Dice configurations.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of faces on every die
pub const FACES: usize = 6;

/// A six-sided die with arbitrary integer faces.
///
/// Faces may be negative, repeated and in any order.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<i64>", into = "Vec<i64>")]
pub struct DiceConfiguration([i64; FACES]);

impl DiceConfiguration {
    /// Build from a face list, which must have exactly six entries
    pub fn new(faces: Vec<i64>) -> Result<Self> {
        let count = faces.len();
        let faces: [i64; FACES] = faces.try_into().map_err(|_| {
            Error::InvalidDiceConfiguration(format!(
                "expected {} faces, got {}",
                FACES, count
            ))
        })?;
        Ok(Self(faces))
    }

    pub fn faces(&self) -> &[i64; FACES] {
        &self.0
    }

    /// Face shown for a throw result in `[0, 6)`
    pub fn face(&self, index: usize) -> Option<i64> {
        self.0.get(index).copied()
    }
}

impl From<[i64; FACES]> for DiceConfiguration {
    fn from(faces: [i64; FACES]) -> Self {
        Self(faces)
    }
}

impl TryFrom<Vec<i64>> for DiceConfiguration {
    type Error = Error;

    fn try_from(faces: Vec<i64>) -> Result<Self> {
        Self::new(faces)
    }
}

impl From<DiceConfiguration> for Vec<i64> {
    fn from(dice: DiceConfiguration) -> Self {
        dice.0.to_vec()
    }
}

impl FromStr for DiceConfiguration {
    type Err = Error;

    /// Parse a comma-separated list such as `2,2,4,4,9,9`
    fn from_str(s: &str) -> Result<Self> {
        let faces = s
            .split(',')
            .map(|face| {
                let face = face.trim();
                face.parse::<i64>().map_err(|_| {
                    Error::InvalidDiceConfiguration(format!(
                        "face '{}' in '{}' is not an integer",
                        face, s
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(faces).map_err(|e| match e {
            Error::InvalidDiceConfiguration(msg) => {
                Error::InvalidDiceConfiguration(format!("{} in '{}'", msg, s))
            }
            other => other,
        })
    }
}

impl fmt::Display for DiceConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let faces: Vec<String> = self.0.iter().map(i64::to_string).collect();
        write!(f, "{}", faces.join(","))
    }
}
