//! SecretKey, MacTag and Commitment for the commit-reveal scheme.
//!
//! mac = HMAC-SHA256(key = secret_key, message = decimal(chosen_value))
//!
//! The message is the canonical decimal string of the value so that anyone
//! can recompute the tag with an off-the-shelf HMAC tool.

use super::random::{random_bytes, uniform_int};
use crate::error::{Error, Result};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::Sha256;
use std::fmt;
use std::str::FromStr;

type HmacSha256 = Hmac<Sha256>;

/// 256-bit key binding a commitment, disclosed at reveal time
#[derive(Clone, PartialEq, Eq)]
pub struct SecretKey([u8; 32]);

impl SecretKey {
    /// Create a new random key
    pub fn random() -> Self {
        Self(random_bytes())
    }

    /// Create from raw bytes
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the underlying bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretKey({}..)", hex::encode(&self.0[..4]))
    }
}

impl fmt::Display for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl FromStr for SecretKey {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(s, &mut bytes)?;
        Ok(Self(bytes))
    }
}

/// HMAC-SHA256 tag published before the peer contributes
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct MacTag([u8; 32]);

impl MacTag {
    /// Compute the tag of `value` under `key`
    pub fn compute(key: &SecretKey, value: u32) -> Self {
        Self(keyed(key, value).finalize().into_bytes().into())
    }

    /// Create from raw bytes
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the underlying bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for MacTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MacTag({})", hex::encode(&self.0[..8]))
    }
}

impl fmt::Display for MacTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl FromStr for MacTag {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(s, &mut bytes)?;
        Ok(Self(bytes))
    }
}

fn keyed(key: &SecretKey, value: u32) -> HmacSha256 {
    let mut mac =
        HmacSha256::new_from_slice(key.as_bytes()).expect("HMAC accepts keys of any length");
    mac.update(value.to_string().as_bytes());
    mac
}

/// A hidden value in `[0, range)` bound to its key by an HMAC tag
#[derive(Clone)]
pub struct Commitment {
    secret_key: SecretKey,
    chosen_value: u32,
    mac: MacTag,
}

impl Commitment {
    /// Draw a value in `[0, range)` under a fresh key and tag it
    pub fn commit(range: u32) -> Result<Self> {
        if range == 0 {
            return Err(Error::InvalidRange(range));
        }
        let chosen_value = uniform_int(range)?;
        Ok(Self::from_parts(SecretKey::random(), chosen_value))
    }

    pub(crate) fn from_parts(secret_key: SecretKey, chosen_value: u32) -> Self {
        let mac = MacTag::compute(&secret_key, chosen_value);
        Self {
            secret_key,
            chosen_value,
            mac,
        }
    }

    /// Check that `secret_key` and `chosen_value` produce `mac`.
    ///
    /// The comparison runs in constant time.
    pub fn verify(mac: &MacTag, secret_key: &SecretKey, chosen_value: u32) -> bool {
        keyed(secret_key, chosen_value)
            .verify_slice(mac.as_bytes())
            .is_ok()
    }

    pub fn secret_key(&self) -> &SecretKey {
        &self.secret_key
    }

    pub fn chosen_value(&self) -> u32 {
        self.chosen_value
    }

    pub fn mac(&self) -> &MacTag {
        &self.mac
    }
}

impl fmt::Debug for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Commitment")
            .field("mac", &self.mac)
            .finish_non_exhaustive()
    }
}

macro_rules! hex_serde {
    ($ty:ty) => {
        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
                self.to_string().serialize(s)
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
                let hex_str = String::deserialize(d)?;
                hex_str.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

hex_serde!(SecretKey);
hex_serde!(MacTag);
