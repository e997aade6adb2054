//! Cryptographic primitives for the fair-random protocol.
//!
//! This module provides:
//! - Uniform integer draws from the operating system CSPRNG
//! - SecretKey, MacTag and Commitment for the commit-reveal scheme

mod commitment;
mod random;

pub use commitment::{Commitment, MacTag, SecretKey};
pub use random::{random_bytes, uniform_int};
