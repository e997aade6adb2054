//! Uniform integer draws from the operating system CSPRNG.
//!
//! Draws use rejection sampling over 32-bit words: a word `v` is accepted
//! only when `v < max * floor(2^32 / max)`, so the reduction `v % max` is
//! exactly uniform. No modulo bias is accepted.

use crate::error::{Error, Result};
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};

/// Draw a uniformly distributed integer in `[0, max)`
pub fn uniform_int(max: u32) -> Result<u32> {
    uniform_int_with(&mut OsRng, max)
}

/// Fill a fixed-size array with random bytes
pub fn random_bytes<const N: usize>() -> [u8; N] {
    let mut bytes = [0u8; N];
    OsRng.fill_bytes(&mut bytes);
    bytes
}

pub(crate) fn uniform_int_with<R: RngCore + CryptoRng>(rng: &mut R, max: u32) -> Result<u32> {
    if max == 0 {
        return Err(Error::InvalidRange(max));
    }
    let max = u64::from(max);
    let zone = (1u64 << 32) / max * max;
    loop {
        let v = u64::from(rng.next_u32());
        if v < zone {
            return Ok((v % max) as u32);
        }
    }
}
