//! Pseudo-truncated NTT.
//!
//! A polynomial a(x) in Z_q[x]/(x^n + 1) is split into four quarters
//! a(x) = A_0(x^4) + x·A_1(x^4) + x^2·A_2(x^4) + x^3·A_3(x^4), with
//! `A_r[k] = a[4k + r]`. With z = x^4 each quarter lives in Z_q[z]/(z^(n/4) + 1),
//! which splits into linear factors once q has a primitive (n/2)-th root of
//! unity, so every quarter gets a complete negacyclic NTT of length n/4.
//!
//! A product c = a·b then reads, quarter by quarter,
//!
//! ```text
//! C_0 = A_0 B_0 + A_1 zB_3 + A_2 zB_2 + A_3 zB_1
//! C_1 = A_0 B_1 + A_1 B_0  + A_2 zB_3 + A_3 zB_2
//! C_2 = A_0 B_2 + A_1 B_1  + A_2 B_0  + A_3 zB_3
//! C_3 = A_0 B_3 + A_1 B_2  + A_2 B_1  + A_3 B_0
//! ```
//!
//! where every product is pointwise in the transformed domain. The seven
//! operand values B_0..B_3, zB_1..zB_3 are what [`PtNttParams::forward7`]
//! produces.
//!
//! In the pt-NTT domain a full polynomial stores quarter r at
//! `[r·n/4, (r+1)·n/4)`.

use crate::params::{newhope512, Domain, PolyModulusInfo};
use crate::polynomial::Polynomial;
use crate::zq::Modulus;
use zeroize::Zeroize;

/// Number of quarters a polynomial is split into
pub const QUARTERS: usize = 4;

/// Precomputed twiddles for the quarter transforms
#[derive(Debug, Clone)]
pub struct PtNttParams {
    /// Coefficient arithmetic
    pub modulus: Modulus,
    /// Degree of the full polynomial X^n + 1
    pub n: usize,
    /// Length of one quarter, n/4
    pub quarter_len: usize,
    /// Primitive (n/2)-th root of unity
    pub zeta: u16,
    /// Inverse of n/4 modulo q
    pub quarter_len_inv: u16,
    /// zeta^bitrev(k), indexed by butterfly block
    pub roots_of_unity: Vec<u16>,
    /// zeta^-bitrev(k), indexed by butterfly block
    pub inv_roots_of_unity: Vec<u16>,
    /// Values of z at the transform's evaluation points; multiplying by this
    /// table pointwise is multiplication by z
    pub z_evaluations: Vec<u16>,
}

/// The four transformed quarters of a polynomial (output of `forward4`)
#[derive(Debug, Clone, PartialEq, Eq, Zeroize)]
pub struct QuarterTransform {
    pub quarters: [Vec<u16>; QUARTERS],
}

/// A multiplicand prepared for bowtie multiplication (output of `forward7`):
/// the four quarters plus z·B_1, z·B_2, z·B_3
#[derive(Debug, Clone, PartialEq, Eq, Zeroize)]
pub struct BowtieOperand {
    pub quarters: [Vec<u16>; QUARTERS],
    pub shifted: [Vec<u16>; QUARTERS - 1],
}

impl PtNttParams {
    /// Precomputes the transform for X^n + 1 over Z_q.
    /// Precondition: n/4 is a power of two and `zeta` has order exactly n/2.
    pub fn new(q: u16, n: usize, zeta: u16) -> Self {
        assert!(n % QUARTERS == 0, "n must split into four quarters");
        let quarter_len = n / QUARTERS;
        assert!(quarter_len.is_power_of_two() && quarter_len >= 2,
               "n/4 must be a power of 2");

        let modulus = Modulus::new(q);
        // zeta^(n/4) = -1 pins the order of zeta to exactly n/2
        assert_eq!(modulus.pow(zeta, quarter_len), q - 1,
                  "zeta must be a primitive (n/2)-th root of unity");

        let (Some(quarter_len_inv), Some(zeta_inv)) =
            (modulus.inverse(quarter_len as u16), modulus.inverse(zeta))
        else {
            panic!("n/4 and zeta must be invertible mod q");
        };

        let log_len = quarter_len.trailing_zeros();
        let roots_of_unity = precompute_roots(&modulus, zeta, quarter_len, log_len);
        let inv_roots_of_unity = precompute_roots(&modulus, zeta_inv, quarter_len, log_len);

        let mut params = PtNttParams {
            modulus,
            n,
            quarter_len,
            zeta,
            quarter_len_inv,
            roots_of_unity,
            inv_roots_of_unity,
            z_evaluations: Vec::new(),
        };

        let mut z = vec![0u16; quarter_len];
        z[1] = 1;
        params.ntt_quarter(&mut z);
        params.z_evaluations = z;

        params
    }

    /// Engine for the Small NewHope-512 ring
    pub fn newhope512() -> Self {
        PtNttParams::new(newhope512::Q, newhope512::N, newhope512::ZETA)
    }

    fn info(&self, domain: Domain) -> PolyModulusInfo {
        PolyModulusInfo {
            degree: self.n,
            modulus: self.modulus,
            domain,
        }
    }

    fn check_ring(&self, poly: &Polynomial, domain: Domain) {
        assert_eq!(poly.modulus_info.degree, self.n,
                  "Polynomial degree must match pt-NTT params");
        assert_eq!(poly.modulus_info.modulus, self.modulus,
                  "Polynomial modulus must match pt-NTT params");
        assert_eq!(poly.modulus_info.domain, domain,
                  "Polynomial is in the wrong domain");
    }

    /// Splits a coefficient-domain polynomial into quarters and transforms each
    pub fn forward4(&self, poly: &Polynomial) -> QuarterTransform {
        self.check_ring(poly, Domain::Coefficient);

        let quarters = std::array::from_fn(|r| {
            let mut quarter: Vec<u16> = poly
                .coeffs
                .iter()
                .skip(r)
                .step_by(QUARTERS)
                .copied()
                .collect();
            self.ntt_quarter(&mut quarter);
            quarter
        });

        QuarterTransform { quarters }
    }

    /// `forward4` plus the three z-shifted quarters a bowtie product needs
    pub fn forward7(&self, poly: &Polynomial) -> BowtieOperand {
        let QuarterTransform { quarters } = self.forward4(poly);

        let shifted = std::array::from_fn(|t| self.pointwise(&quarters[t + 1], &self.z_evaluations));

        BowtieOperand { quarters, shifted }
    }

    /// Lays transformed quarters out as one pt-NTT-domain polynomial, the
    /// domain bowtie products live in
    pub fn recover(&self, transform: QuarterTransform) -> Polynomial {
        let mut coeffs = Vec::with_capacity(self.n);
        for quarter in transform.quarters {
            assert_eq!(quarter.len(), self.quarter_len, "quarter has the wrong length");
            coeffs.extend(quarter);
        }

        Polynomial {
            coeffs,
            modulus_info: self.info(Domain::PtNtt),
        }
    }

    /// Product of `a_hat` (pt-NTT domain) with a prepared operand, returned in
    /// the pt-NTT domain
    pub fn bowtie_multiply(&self, a_hat: &Polynomial, b: &BowtieOperand) -> Polynomial {
        self.check_ring(a_hat, Domain::PtNtt);
        let len = self.quarter_len;
        assert!(b.quarters.iter().chain(&b.shifted).all(|q| q.len() == len),
                "operand quarter has the wrong length");

        let m = self.modulus;
        let a_quarters: Vec<&[u16]> = a_hat.coeffs.chunks(len).collect();
        let mut coeffs = vec![0u16; self.n];

        for (out, block) in coeffs.chunks_mut(len).enumerate() {
            for (r, a_r) in a_quarters.iter().enumerate() {
                // exponents r + t wrap past 3 onto z
                let operand = if r <= out {
                    &b.quarters[out - r]
                } else {
                    &b.shifted[out + QUARTERS - r - 1]
                };

                for ((acc, &x), &y) in block.iter_mut().zip(a_r.iter()).zip(operand.iter()) {
                    *acc = m.add(*acc, m.mul(x, y));
                }
            }
        }

        Polynomial {
            coeffs,
            modulus_info: self.info(Domain::PtNtt),
        }
    }

    /// Brings a pt-NTT-domain polynomial back to coefficients
    pub fn invert(&self, poly: &Polynomial) -> Polynomial {
        self.check_ring(poly, Domain::PtNtt);

        let mut coeffs = vec![0u16; self.n];
        for (r, quarter) in poly.coeffs.chunks(self.quarter_len).enumerate() {
            let mut quarter = quarter.to_vec();
            self.intt_quarter(&mut quarter);
            for (k, c) in quarter.into_iter().enumerate() {
                coeffs[QUARTERS * k + r] = c;
            }
        }

        Polynomial {
            coeffs,
            modulus_info: self.info(Domain::Coefficient),
        }
    }

    /// a·b in Z_q[x]/(x^n + 1) for coefficient-domain inputs
    pub fn multiply(&self, a: &Polynomial, b: &Polynomial) -> Polynomial {
        let a_hat = self.recover(self.forward4(a));
        let product = self.bowtie_multiply(&a_hat, &self.forward7(b));
        self.invert(&product)
    }

    fn pointwise(&self, x: &[u16], y: &[u16]) -> Vec<u16> {
        x.iter().zip(y).map(|(&a, &b)| self.modulus.mul(a, b)).collect()
    }

    /// In-place Cooley-Tukey negacyclic NTT of one quarter
    fn ntt_quarter(&self, a: &mut [u16]) {
        let m = self.modulus;
        let n = self.quarter_len;

        let mut len = n / 2;
        while len >= 1 {
            for start in (0..n).step_by(2 * len) {
                let factor = self.roots_of_unity[n / (2 * len) + start / (2 * len)];
                for j in start..start + len {
                    let t = m.mul(factor, a[j + len]);
                    a[j + len] = m.sub(a[j], t);
                    a[j] = m.add(a[j], t);
                }
            }
            len /= 2;
        }
    }

    /// In-place Gentleman-Sande inverse of [`Self::ntt_quarter`]
    fn intt_quarter(&self, a: &mut [u16]) {
        let m = self.modulus;
        let n = self.quarter_len;

        let mut len = 1;
        while len < n {
            for start in (0..n).step_by(2 * len) {
                let factor = self.inv_roots_of_unity[n / (2 * len) + start / (2 * len)];
                for j in start..start + len {
                    let even = a[j];
                    let odd = a[j + len];
                    a[j] = m.add(even, odd);
                    a[j + len] = m.mul(factor, m.sub(even, odd));
                }
            }
            len *= 2;
        }

        // each layer doubled the values
        for c in a.iter_mut() {
            *c = m.mul(*c, self.quarter_len_inv);
        }
    }
}

/// root^bitrev(k) for k in 0..len, bit reversal over log_len bits
fn precompute_roots(m: &Modulus, root: u16, len: usize, log_len: u32) -> Vec<u16> {
    (0..len)
        .map(|k| m.pow(root, bit_reverse(k, log_len)))
        .collect()
}

/// Implements the bit-reversal permutation on the low `bits` bits
fn bit_reverse(index: usize, bits: u32) -> usize {
    let mut reversed = 0;

    for i in 0..bits {
        reversed |= ((index >> i) & 1) << (bits - 1 - i);
    }

    reversed
}
