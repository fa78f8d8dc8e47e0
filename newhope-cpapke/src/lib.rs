//! CPA-secure public-key encryption of Small NewHope-512.
//!
//! Ring products go through the pseudo-truncated NTT of
//! [`newhope_core::pt_ntt`]; keys and ciphertexts are fixed-size byte strings.

pub mod params;
pub mod error;
pub mod pack;
pub mod message;
pub mod cpa;

pub use cpa::{decrypt, encrypt, keypair, keypair_from_seed};
pub use error::{PkeError, Result};
pub use pack::{Ciphertext, PublicKey, SecretKey};
