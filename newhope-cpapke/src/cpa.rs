use log::{debug, trace};
use newhope_core::{
    hashing::shake256,
    pt_ntt::PtNttParams,
    sampling::{sample_noise, sample_uniform},
};
use rand::{CryptoRng, RngCore};
use zeroize::{Zeroize, Zeroizing};

use crate::error::{PkeError, Result};
use crate::message::{poly_frommsg, poly_tomsg};
use crate::pack::{decode_c, decode_pk, encode_c, encode_pk, Ciphertext, PublicKey, SecretKey};
use crate::params::{poly_modulus, ETA, SYMBYTES};

/// Generates a keypair from a fresh 32-byte seed drawn from `rng`.
///
/// The only fallible step is the random source; a failing `try_fill_bytes`
/// surfaces as [`PkeError::EntropyUnavailable`].
pub fn keypair<R: RngCore + CryptoRng>(rng: &mut R) -> Result<(PublicKey, SecretKey)> {
    let mut seed = Zeroizing::new([0u8; SYMBYTES]);
    rng.try_fill_bytes(&mut seed[..]).map_err(|e| {
        debug!("keypair: random source failed");
        PkeError::EntropyUnavailable(e)
    })?;

    Ok(keypair_from_seed(&seed))
}

/// Deterministic key generation.
///
/// SHAKE-256 expands `seed` to a public seed and a noise seed. Then
/// a = uniform(public seed), s = ψ(noise, 0), e = ψ(noise, 1) and
/// b = a·s + e, kept in the pt-NTT domain.
pub fn keypair_from_seed(seed: &[u8; SYMBYTES]) -> (PublicKey, SecretKey) {
    debug!("keypair: start");
    let engine = PtNttParams::newhope512();
    let info = poly_modulus();

    let expanded = Zeroizing::new(shake256(seed, 2 * SYMBYTES));
    let (public_part, noise_seed) = expanded.split_at(SYMBYTES);
    let mut public_seed = [0u8; SYMBYTES];
    public_seed.copy_from_slice(public_part);

    let a_hat = sample_uniform(&public_seed, info);
    let mut s = sample_noise(noise_seed, 0, info, ETA);
    let mut e = sample_noise(noise_seed, 1, info, ETA);
    trace!("keypair: sampled a, s, e");

    let mut s_operand = engine.forward7(&s);
    let b_hat = engine.bowtie_multiply(&a_hat, &s_operand) + engine.recover(engine.forward4(&e));
    trace!("keypair: computed b = a*s + e");

    let pk = encode_pk(&b_hat, &public_seed);
    let sk = SecretKey::from_secret(&s);
    s.coeffs.zeroize();
    s_operand.zeroize();
    e.coeffs.zeroize();

    debug!("keypair: done");
    (pk, sk)
}

/// Encrypts a 32-byte message under `pk` with caller-supplied coins.
///
/// Deterministic in (msg, pk, coin); never touches a random source.
pub fn encrypt(msg: &[u8; SYMBYTES], pk: &PublicKey, coin: &[u8; SYMBYTES]) -> Result<Ciphertext> {
    debug!("encrypt: start");
    let engine = PtNttParams::newhope512();
    let info = poly_modulus();

    let v = poly_frommsg(msg);
    let mut s_prime = sample_noise(coin, 0, info, ETA);
    let mut e_prime = sample_noise(coin, 1, info, ETA);
    let mut e_prime_prime = sample_noise(coin, 2, info, ETA);
    trace!("encrypt: sampled s', e', e''");

    let (b_hat, public_seed) = decode_pk(pk)?;
    let a_hat = sample_uniform(&public_seed, info);

    let mut s_operand = engine.forward7(&s_prime);
    let u_hat = engine.bowtie_multiply(&a_hat, &s_operand) + engine.recover(engine.forward4(&e_prime));
    trace!("encrypt: computed u = a*s' + e'");

    let bs = engine.invert(&engine.bowtie_multiply(&b_hat, &s_operand));
    let v_prime = &(&bs + &e_prime_prime) + &v;
    trace!("encrypt: computed v = b*s' + e'' + m");

    s_prime.coeffs.zeroize();
    e_prime.coeffs.zeroize();
    e_prime_prime.coeffs.zeroize();
    s_operand.zeroize();

    let ct = encode_c(&u_hat, &v_prime);
    debug!("encrypt: done");
    Ok(ct)
}

/// Recovers the message as v − u·s.
///
/// There is no integrity check here: a wrong key or a tampered ciphertext
/// still yields 32 bytes.
pub fn decrypt(ct: &Ciphertext, sk: &SecretKey) -> Result<[u8; SYMBYTES]> {
    debug!("decrypt: start");
    let engine = PtNttParams::newhope512();

    let (u_hat, v) = decode_c(ct)?;
    let mut s = sk.decode()?;

    let mut s_operand = engine.forward7(&s);
    let product = engine.invert(&engine.bowtie_multiply(&u_hat, &s_operand));
    s.coeffs.zeroize();
    s_operand.zeroize();
    trace!("decrypt: computed u*s");

    let msg = poly_tomsg(&(v - product));
    debug!("decrypt: done");
    Ok(msg)
}
