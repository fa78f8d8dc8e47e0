use newhope_core::params::Domain;
use newhope_core::polynomial::Polynomial;

use crate::params::{poly_modulus, MSG_COPIES, N, Q, SYMBYTES};

/// Distance between copies of one message bit
const BIT_STRIDE: usize = 8 * SYMBYTES;

/// Encodes a message as a polynomial.
///
/// Bit b (byte b/8, least significant bit first) sets coefficients
/// b, b + 256, ... to ⌊q/2⌋ when 1 and leaves them at 0 when 0.
pub fn poly_frommsg(msg: &[u8; SYMBYTES]) -> Polynomial {
    let half = Q / 2;
    let mut poly = Polynomial::zero(poly_modulus());

    for (i, byte) in msg.iter().enumerate() {
        for j in 0..8 {
            // all ones when the bit is set
            let mask = (((byte >> j) & 1) as u16).wrapping_neg();
            for k in 0..MSG_COPIES {
                poly.coeffs[8 * i + j + BIT_STRIDE * k] = mask & half;
            }
        }
    }

    poly
}

/// Decodes a noisy message polynomial.
///
/// For each bit the distances |c − ⌊q/2⌋| of its copies are summed; the bit is
/// 1 when the sum is strictly below MSG_COPIES·q/4. Landing exactly on the
/// threshold decodes to 0.
pub fn poly_tomsg(poly: &Polynomial) -> [u8; SYMBYTES] {
    assert_eq!(poly.degree(), N, "Polynomial degree must be N");
    assert_eq!(poly.domain(), Domain::Coefficient,
              "message decoding needs a coefficient-domain polynomial");

    let m = poly.modulus_info.modulus;
    let threshold = (MSG_COPIES as i32 * Q as i32) / 4;
    let mut msg = [0u8; SYMBYTES];

    for bit in 0..BIT_STRIDE {
        let distance: i32 = (0..MSG_COPIES)
            .map(|k| m.flip_abs(poly.coeffs[bit + BIT_STRIDE * k]) as i32)
            .sum();
        // sign bit of distance - threshold
        let set = ((distance - threshold) >> 31) & 1;
        msg[bit / 8] |= (set as u8) << (bit % 8);
    }

    msg
}
