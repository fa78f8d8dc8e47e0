use crate::zq::Modulus;

/// Which representation a polynomial's coefficients are in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Domain {
    /// Plain coefficients of a(x) mod x^n + 1
    Coefficient,
    /// Four pt-NTT quarters laid out back to back
    PtNtt,
}

/// Describes the ring R_q = Z_q[X]/(X^n + 1) a polynomial lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolyModulusInfo {
    /// Degree of the polynomial modulus (n)
    pub degree: usize,
    /// Coefficient arithmetic
    pub modulus: Modulus,
    /// Representation of the coefficients
    pub domain: Domain,
}

impl PolyModulusInfo {
    pub fn new(degree: usize, q: u16, domain: Domain) -> Self {
        PolyModulusInfo {
            degree,
            modulus: Modulus::new(q),
            domain,
        }
    }

    /// Coefficient modulus q
    pub fn q(&self) -> u16 {
        self.modulus.q()
    }

    /// Same ring, different domain
    pub fn with_domain(self, domain: Domain) -> Self {
        PolyModulusInfo { domain, ..self }
    }
}

/// Small NewHope-512 parameter set
pub mod newhope512 {
    use super::*;

    /// Degree of the ring X^n + 1
    pub const N: usize = 512;
    /// Prime modulus, 12 bits wide
    pub const Q: u16 = 3329;
    /// Length of one pt-NTT quarter
    pub const QUARTER_N: usize = N / 4;
    /// Primitive 256-th root of unity mod Q
    pub const ZETA: u16 = 17;
    /// Centered binomial noise parameter
    pub const ETA: usize = 3;

    /// Seed, coin and message length in bytes
    pub const SYMBYTES: usize = 32;
    /// Bits per serialized coefficient
    pub const POLY_BITS: usize = 12;
    /// Bits per compressed coefficient
    pub const COMPRESSED_BITS: usize = 3;
    pub const POLYBYTES: usize = N * POLY_BITS / 8;
    pub const COMPRESSEDBYTES: usize = N * COMPRESSED_BITS / 8;

    /// Coefficient-domain ring description
    pub fn poly_modulus() -> PolyModulusInfo {
        PolyModulusInfo::new(N, Q, Domain::Coefficient)
    }

    /// pt-NTT-domain ring description
    pub fn poly_modulus_ntt() -> PolyModulusInfo {
        PolyModulusInfo::new(N, Q, Domain::PtNtt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newhope512_params() {
        use newhope512::*;

        assert_eq!(POLYBYTES, 768);
        assert_eq!(COMPRESSEDBYTES, 192);
        assert_eq!(QUARTER_N, 128);
        // q ≡ 1 (mod 2·QUARTER_N) so each quarter has a complete negacyclic NTT
        assert_eq!((Q as usize - 1) % (2 * QUARTER_N), 0);
        assert!(Q < 1 << POLY_BITS);
    }

    #[test]
    fn test_with_domain() {
        let info = newhope512::poly_modulus();
        let ntt = info.with_domain(Domain::PtNtt);
        assert_eq!(ntt, newhope512::poly_modulus_ntt());
        assert_eq!(ntt.q(), 3329);
        assert_eq!(ntt.degree, 512);
    }
}
