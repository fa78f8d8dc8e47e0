use sha3::digest::XofReader;

use crate::hashing::{prf, shake128_stream};
use crate::params::{Domain, PolyModulusInfo};
use crate::polynomial::Polynomial;

/// SHAKE-128 rate; the uniform sampler reads the stream in blocks this size
const SHAKE128_RATE: usize = 168;

/// Samples a noise polynomial from the centered binomial distribution ψ_η.
///
/// The stream SHAKE-256(seed || nonce) supplies 2η bits per coefficient; the
/// coefficient is popcount(first η bits) − popcount(next η bits), so it lies
/// in [−η, η]. Distinct nonces over one seed give independent polynomials.
pub fn sample_noise(seed: &[u8], nonce: u8, modulus_info: PolyModulusInfo, eta: usize) -> Polynomial {
    assert!((1..=8).contains(&eta), "eta must lie in 1..=8");
    let n = modulus_info.degree;
    let m = modulus_info.modulus;
    let bytes = prf(seed, nonce, (2 * eta * n).div_ceil(8));

    let bit = |pos: usize| ((bytes[pos / 8] >> (pos % 8)) & 1) as i32;

    let coeffs = (0..n)
        .map(|i| {
            let base = 2 * eta * i;
            let a: i32 = (0..eta).map(|j| bit(base + j)).sum();
            let b: i32 = (0..eta).map(|j| bit(base + eta + j)).sum();
            m.from_signed(a - b)
        })
        .collect();

    Polynomial {
        coeffs,
        modulus_info: modulus_info.with_domain(Domain::Coefficient),
    }
}

/// Deterministically expands a public seed into a uniform polynomial.
///
/// SHAKE-128(seed) is treated as an endless stream: every three bytes give two
/// 12-bit candidates and candidates below q are kept in order until the
/// polynomial is full. The result is tagged as pt-NTT domain since the public
/// element is only ever used there.
pub fn sample_uniform(seed: &[u8], modulus_info: PolyModulusInfo) -> Polynomial {
    let n = modulus_info.degree;
    let q = modulus_info.q();
    assert!(q <= 1 << 12, "uniform sampling draws 12-bit candidates");

    let mut reader = shake128_stream(seed);
    let mut block = [0u8; SHAKE128_RATE];
    let mut coeffs = Vec::with_capacity(n);

    while coeffs.len() < n {
        reader.read(&mut block);

        for chunk in block.chunks_exact(3) {
            let d1 = chunk[0] as u16 | ((chunk[1] as u16 & 0x0f) << 8);
            let d2 = (chunk[1] as u16 >> 4) | ((chunk[2] as u16) << 4);

            for candidate in [d1, d2] {
                if candidate < q && coeffs.len() < n {
                    coeffs.push(candidate);
                }
            }
        }
    }

    Polynomial {
        coeffs,
        modulus_info: modulus_info.with_domain(Domain::PtNtt),
    }
}
