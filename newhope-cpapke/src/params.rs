use newhope_core::params::newhope512;

pub use newhope_core::params::newhope512::{poly_modulus, poly_modulus_ntt};

// Common Small NewHope-512 parameters
pub const N: usize = newhope512::N;
pub const Q: u16 = newhope512::Q;
pub const ETA: usize = newhope512::ETA;
pub const SYMBYTES: usize = newhope512::SYMBYTES;
pub const COMPRESSED_BITS: usize = newhope512::COMPRESSED_BITS;
pub const POLYBYTES: usize = newhope512::POLYBYTES;
pub const COMPRESSEDBYTES: usize = newhope512::COMPRESSEDBYTES;

/// Number of coefficients carrying each message bit
pub const MSG_COPIES: usize = N / (8 * SYMBYTES);

/// Key and ciphertext sizes in bytes
pub mod sizes {
    use super::{COMPRESSEDBYTES, POLYBYTES, SYMBYTES};

    /// Seed size in bytes
    pub const SEED_BYTES: usize = SYMBYTES;
    /// Message size in bytes
    pub const MESSAGE_BYTES: usize = SYMBYTES;
    /// serialize(b) ‖ public seed
    pub const PUBLICKEYBYTES: usize = POLYBYTES + SEED_BYTES;
    /// serialize(s)
    pub const SECRETKEYBYTES: usize = POLYBYTES;
    /// serialize(u) ‖ compress(v)
    pub const CIPHERTEXTBYTES: usize = POLYBYTES + COMPRESSEDBYTES;
}

pub use sizes::{CIPHERTEXTBYTES, PUBLICKEYBYTES, SECRETKEYBYTES};
