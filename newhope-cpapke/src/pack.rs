//! Wire formats.
//!
//! ```text
//! PublicKey  = serialize(b) (POLYBYTES) ‖ public seed (SYMBYTES)
//! SecretKey  = serialize(s) (POLYBYTES)
//! Ciphertext = serialize(u) (POLYBYTES) ‖ compress(v) (COMPRESSEDBYTES)
//! ```
//!
//! Fields sit at fixed offsets; nothing is length-prefixed.

use std::fmt;

use log::debug;
use newhope_core::error::{self as core_error, EncodingError};
use newhope_core::params::PolyModulusInfo;
use newhope_core::polynomial::Polynomial;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{PkeError, Result};
use crate::params::{
    poly_modulus, poly_modulus_ntt, CIPHERTEXTBYTES, COMPRESSEDBYTES, COMPRESSED_BITS, N,
    POLYBYTES, PUBLICKEYBYTES, SECRETKEYBYTES, SYMBYTES,
};

/// Encoded public key: b in the pt-NTT domain followed by the public seed
#[derive(Clone, PartialEq, Eq)]
pub struct PublicKey([u8; PUBLICKEYBYTES]);

/// Encoded secret key: the coefficient-domain secret s
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SecretKey([u8; SECRETKEYBYTES]);

/// Encoded ciphertext: u in the pt-NTT domain followed by compressed v
#[derive(Clone, PartialEq, Eq)]
pub struct Ciphertext([u8; CIPHERTEXTBYTES]);

/// 12-bit packing of a full ring element
pub fn serialize(poly: &Polynomial) -> [u8; POLYBYTES] {
    assert_eq!(poly.degree(), N, "Polynomial degree must be N");
    let mut out = [0u8; POLYBYTES];
    out.copy_from_slice(&poly.to_bytes());
    out
}

/// Inverse of [`serialize`]; `modulus_info` selects the domain the result is
/// tagged with
pub fn deserialize(bytes: &[u8], modulus_info: PolyModulusInfo) -> core_error::Result<Polynomial> {
    Polynomial::from_bytes(bytes, modulus_info)
}

/// Packs `poly` at COMPRESSED_BITS bits per coefficient
pub fn compress(poly: &Polynomial) -> [u8; COMPRESSEDBYTES] {
    assert_eq!(poly.degree(), N, "Polynomial degree must be N");
    let mut out = [0u8; COMPRESSEDBYTES];
    out.copy_from_slice(&poly.compress(COMPRESSED_BITS));
    out
}

/// Coefficient-domain approximation of the polynomial behind `bytes`
pub fn decompress(bytes: &[u8; COMPRESSEDBYTES]) -> core_error::Result<Polynomial> {
    Polynomial::decompress(bytes, COMPRESSED_BITS, poly_modulus())
}

pub fn encode_pk(b_hat: &Polynomial, public_seed: &[u8; SYMBYTES]) -> PublicKey {
    let mut out = [0u8; PUBLICKEYBYTES];
    out[..POLYBYTES].copy_from_slice(&serialize(b_hat));
    out[POLYBYTES..].copy_from_slice(public_seed);
    PublicKey(out)
}

pub fn decode_pk(pk: &PublicKey) -> Result<(Polynomial, [u8; SYMBYTES])> {
    let b_hat = deserialize(&pk.0[..POLYBYTES], poly_modulus_ntt())
        .map_err(|e| malformed("public key", e))?;

    let mut public_seed = [0u8; SYMBYTES];
    public_seed.copy_from_slice(&pk.0[POLYBYTES..]);

    Ok((b_hat, public_seed))
}

pub fn encode_c(u_hat: &Polynomial, v: &Polynomial) -> Ciphertext {
    let mut out = [0u8; CIPHERTEXTBYTES];
    out[..POLYBYTES].copy_from_slice(&serialize(u_hat));
    out[POLYBYTES..].copy_from_slice(&compress(v));
    Ciphertext(out)
}

pub fn decode_c(ct: &Ciphertext) -> Result<(Polynomial, Polynomial)> {
    let u_hat = deserialize(&ct.0[..POLYBYTES], poly_modulus_ntt())
        .map_err(|e| malformed("ciphertext", e))?;

    let mut compressed = [0u8; COMPRESSEDBYTES];
    compressed.copy_from_slice(&ct.0[POLYBYTES..]);
    let v = decompress(&compressed).map_err(|e| malformed("ciphertext", e))?;

    Ok((u_hat, v))
}

fn malformed(what: &'static str, source: EncodingError) -> PkeError {
    match &source {
        EncodingError::Length { expected, actual } => {
            debug!("rejecting {}: {} bytes, expected {}", what, actual, expected)
        }
        EncodingError::CoefficientOutOfRange { index, .. } => {
            debug!("rejecting {}: coefficient {} out of range", what, index)
        }
    }
    PkeError::MalformedEncoding { what, source }
}

fn check_len(what: &'static str, bytes: &[u8], expected: usize) -> Result<()> {
    if bytes.len() != expected {
        return Err(malformed(
            what,
            EncodingError::Length {
                expected,
                actual: bytes.len(),
            },
        ));
    }
    Ok(())
}

impl PublicKey {
    /// Parses an encoded public key, rejecting any coefficient ≥ q
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        check_len("public key", bytes, PUBLICKEYBYTES)?;
        let mut out = [0u8; PUBLICKEYBYTES];
        out.copy_from_slice(bytes);

        let pk = PublicKey(out);
        decode_pk(&pk)?;
        Ok(pk)
    }

    pub fn as_bytes(&self) -> &[u8; PUBLICKEYBYTES] {
        &self.0
    }
}

impl SecretKey {
    /// Encodes the coefficient-domain secret
    pub(crate) fn from_secret(s: &Polynomial) -> Self {
        SecretKey(serialize(s))
    }

    /// Parses an encoded secret key, rejecting any coefficient ≥ q
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        check_len("secret key", bytes, SECRETKEYBYTES)?;
        let mut out = [0u8; SECRETKEYBYTES];
        out.copy_from_slice(bytes);

        let sk = SecretKey(out);
        // the decoded copy carries the secret too
        let mut s = sk.decode()?;
        s.coeffs.zeroize();
        Ok(sk)
    }

    pub fn as_bytes(&self) -> &[u8; SECRETKEYBYTES] {
        &self.0
    }

    pub(crate) fn decode(&self) -> Result<Polynomial> {
        deserialize(&self.0, poly_modulus()).map_err(|e| malformed("secret key", e))
    }
}

impl Ciphertext {
    /// Parses an encoded ciphertext, rejecting any coefficient of u ≥ q
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        check_len("ciphertext", bytes, CIPHERTEXTBYTES)?;
        let mut out = [0u8; CIPHERTEXTBYTES];
        out.copy_from_slice(bytes);

        let ct = Ciphertext(out);
        decode_c(&ct)?;
        Ok(ct)
    }

    pub fn as_bytes(&self) -> &[u8; CIPHERTEXTBYTES] {
        &self.0
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({} bytes, seed ", PUBLICKEYBYTES)?;
        for byte in &self.0[POLYBYTES..POLYBYTES + 4] {
            write!(f, "{:02x}", byte)?;
        }
        write!(f, "..)")
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretKey(<redacted>)")
    }
}

impl fmt::Debug for Ciphertext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ciphertext({} bytes)", CIPHERTEXTBYTES)
    }
}
