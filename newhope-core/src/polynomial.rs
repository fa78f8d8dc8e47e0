use std::fmt;
use std::ops::{Add, Neg, Sub};

use crate::error::{EncodingError, Result};
use crate::params::{Domain, PolyModulusInfo};

/// A polynomial in the ring R_q = Z_q[X]/(X^n + 1).
///
/// Invariant: `coeffs.len() == modulus_info.degree` and every coefficient lies
/// in [0, q). Constructors reduce their input, so the invariant holds for any
/// value built through this API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Polynomial {
    /// Coefficients of the polynomial, or its pt-NTT quarters
    pub coeffs: Vec<u16>,
    /// Information about the ring and representation
    pub modulus_info: PolyModulusInfo,
}

impl Polynomial {
    /// Creates a polynomial from (possibly unreduced) coefficients, padding
    /// with zeros up to the ring degree
    pub fn new(coeffs: Vec<u16>, modulus_info: PolyModulusInfo) -> Self {
        let n = modulus_info.degree;
        assert!(coeffs.len() <= n, "Polynomial has too many coefficients");

        let modulus = modulus_info.modulus;
        let mut coeffs: Vec<u16> = coeffs
            .into_iter()
            .map(|c| modulus.reduce(c as u32))
            .collect();
        coeffs.resize(n, 0);

        Polynomial {
            coeffs,
            modulus_info,
        }
    }

    /// Creates the zero polynomial
    pub fn zero(modulus_info: PolyModulusInfo) -> Self {
        Polynomial {
            coeffs: vec![0; modulus_info.degree],
            modulus_info,
        }
    }

    /// Creates a polynomial from signed coefficients
    pub fn from_signed(values: &[i32], modulus_info: PolyModulusInfo) -> Self {
        let modulus = modulus_info.modulus;
        let coeffs = values.iter().map(|&v| modulus.from_signed(v)).collect();
        Polynomial::new(coeffs, modulus_info)
    }

    pub fn degree(&self) -> usize {
        self.modulus_info.degree
    }

    pub fn domain(&self) -> Domain {
        self.modulus_info.domain
    }

    fn assert_compatible(&self, other: &Self) {
        assert_eq!(self.modulus_info, other.modulus_info,
                  "Polynomials must share ring and domain");
    }

    /// Negacyclic schoolbook product in Z_q[X]/(X^n + 1).
    ///
    /// Quadratic reference used to check the pt-NTT; protocol code multiplies
    /// through [`crate::pt_ntt::PtNttParams`] only.
    pub fn schoolbook_mul(&self, other: &Self) -> Self {
        self.assert_compatible(other);
        assert_eq!(self.domain(), Domain::Coefficient,
                  "schoolbook multiplication needs coefficient-domain inputs");

        let n = self.degree();
        let m = self.modulus_info.modulus;
        let mut result = vec![0u16; n];

        for i in 0..n {
            for j in 0..n {
                let product = m.mul(self.coeffs[i], other.coeffs[j]);
                let idx = (i + j) % n;
                // X^n = -1
                result[idx] = if i + j >= n {
                    m.sub(result[idx], product)
                } else {
                    m.add(result[idx], product)
                };
            }
        }

        Polynomial {
            coeffs: result,
            modulus_info: self.modulus_info,
        }
    }

    /// Bits needed to hold any coefficient in [0, q)
    pub fn coeff_bits(&self) -> usize {
        coeff_bits(self.modulus_info.q())
    }

    /// Number of bytes produced by [`Polynomial::to_bytes`] for this ring
    pub fn packed_len(modulus_info: PolyModulusInfo) -> usize {
        (modulus_info.degree * coeff_bits(modulus_info.q())).div_ceil(8)
    }

    /// Packs every coefficient at a fixed width, little-endian bit order
    pub fn to_bytes(&self) -> Vec<u8> {
        pack_bits(self.coeffs.iter().copied(), self.coeff_bits())
    }

    /// Inverse of [`Polynomial::to_bytes`]. Rejects buffers of the wrong size
    /// and any field that decodes to a value outside [0, q).
    pub fn from_bytes(bytes: &[u8], modulus_info: PolyModulusInfo) -> Result<Self> {
        let expected = Self::packed_len(modulus_info);
        if bytes.len() != expected {
            return Err(EncodingError::Length {
                expected,
                actual: bytes.len(),
            });
        }

        let q = modulus_info.q();
        let bits = coeff_bits(q);
        let coeffs = unpack_bits(bytes, bits, modulus_info.degree);

        if let Some((index, &value)) = coeffs.iter().enumerate().find(|(_, c)| **c >= q) {
            return Err(EncodingError::CoefficientOutOfRange { index, value, q });
        }

        Ok(Polynomial {
            coeffs,
            modulus_info,
        })
    }

    /// Lossy compression to `bits` bits per coefficient:
    /// c = ⌊(2^bits · x + ⌊q/2⌋) / q⌋ mod 2^bits.
    ///
    /// q is odd, so 2^bits · x / q never sits exactly half-way between two
    /// integers and the rounding needs no tie rule.
    pub fn compress(&self, bits: usize) -> Vec<u8> {
        assert!((1..=8).contains(&bits), "compression width must be 1..=8 bits");
        let q = self.modulus_info.q() as u32;
        let mask = (1u32 << bits) - 1;

        let compressed = self
            .coeffs
            .iter()
            .map(|&x| (((((x as u32) << bits) + q / 2) / q) & mask) as u16);

        pack_bits(compressed, bits)
    }

    /// Approximate inverse of [`Polynomial::compress`]:
    /// x = ⌊(c · q + 2^(bits-1)) / 2^bits⌋, halves rounding up.
    pub fn decompress(bytes: &[u8], bits: usize, modulus_info: PolyModulusInfo) -> Result<Self> {
        assert!((1..=8).contains(&bits), "compression width must be 1..=8 bits");
        let expected = (modulus_info.degree * bits).div_ceil(8);
        if bytes.len() != expected {
            return Err(EncodingError::Length {
                expected,
                actual: bytes.len(),
            });
        }

        let q = modulus_info.q() as u32;
        let coeffs = unpack_bits(bytes, bits, modulus_info.degree)
            .into_iter()
            .map(|c| ((c as u32 * q + (1 << (bits - 1))) >> bits) as u16)
            .collect();

        Ok(Polynomial {
            coeffs,
            modulus_info,
        })
    }

    /// Computes infinity norm (maximum absolute value of any centered coefficient)
    pub fn infinity_norm(&self) -> i32 {
        let m = self.modulus_info.modulus;
        self.coeffs
            .iter()
            .map(|&c| m.centered(c).abs())
            .max()
            .unwrap_or(0)
    }
}

/// Largest circular distance between x and decompress(compress(x)) for a
/// given modulus and width: ⌈q / 2^(bits+1)⌉
pub fn max_compression_error(q: u16, bits: usize) -> u16 {
    (q as u32).div_ceil(1 << (bits + 1)) as u16
}

fn coeff_bits(q: u16) -> usize {
    (u16::BITS - (q - 1).leading_zeros()) as usize
}

/// Concatenates `bits`-wide values into bytes, least significant bit first.
/// Bits above `bits` are dropped so a value never spills into its neighbour.
fn pack_bits(values: impl Iterator<Item = u16>, bits: usize) -> Vec<u8> {
    let mask = (1u32 << bits) - 1;
    let mut out = Vec::new();
    let mut acc: u32 = 0;
    let mut acc_bits = 0;

    for v in values {
        acc |= (v as u32 & mask) << acc_bits;
        acc_bits += bits;
        while acc_bits >= 8 {
            out.push(acc as u8);
            acc >>= 8;
            acc_bits -= 8;
        }
    }

    if acc_bits > 0 {
        out.push(acc as u8);
    }

    out
}

/// Reads `count` values of `bits` bits each, least significant bit first
fn unpack_bits(bytes: &[u8], bits: usize, count: usize) -> Vec<u16> {
    let mask = (1u32 << bits) - 1;
    let mut out = Vec::with_capacity(count);
    let mut acc: u32 = 0;
    let mut acc_bits = 0;
    let mut input = bytes.iter();

    while out.len() < count {
        while acc_bits < bits {
            let byte = input.next().copied().unwrap_or(0);
            acc |= (byte as u32) << acc_bits;
            acc_bits += 8;
        }
        out.push((acc & mask) as u16);
        acc >>= bits;
        acc_bits -= bits;
    }

    out
}

impl Add for Polynomial {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        &self + &other
    }
}

impl<'a> Add<&'a Polynomial> for &'a Polynomial {
    type Output = Polynomial;

    fn add(self, other: &'a Polynomial) -> Polynomial {
        self.assert_compatible(other);
        let m = self.modulus_info.modulus;
        let coeffs = self
            .coeffs
            .iter()
            .zip(&other.coeffs)
            .map(|(&a, &b)| m.add(a, b))
            .collect();

        Polynomial {
            coeffs,
            modulus_info: self.modulus_info,
        }
    }
}

impl Sub for Polynomial {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        &self - &other
    }
}

impl<'a> Sub<&'a Polynomial> for &'a Polynomial {
    type Output = Polynomial;

    fn sub(self, other: &'a Polynomial) -> Polynomial {
        self.assert_compatible(other);
        let m = self.modulus_info.modulus;
        let coeffs = self
            .coeffs
            .iter()
            .zip(&other.coeffs)
            .map(|(&a, &b)| m.sub(a, b))
            .collect();

        Polynomial {
            coeffs,
            modulus_info: self.modulus_info,
        }
    }
}

impl Neg for Polynomial {
    type Output = Self;

    fn neg(self) -> Self {
        let m = self.modulus_info.modulus;
        let coeffs = self.coeffs.iter().map(|&c| m.neg(c)).collect();

        Polynomial {
            coeffs,
            modulus_info: self.modulus_info,
        }
    }
}

impl fmt::Display for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, coeff) in self.coeffs.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", coeff)?;
        }
        write!(f, "]")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::newhope512;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha20Rng;

    fn create_test_modulus() -> PolyModulusInfo {
        PolyModulusInfo::new(4, 13, Domain::Coefficient)
    }

    fn create_test_poly(coeffs: &[u16]) -> Polynomial {
        Polynomial::new(coeffs.to_vec(), create_test_modulus())
    }

    fn random_poly(rng: &mut ChaCha20Rng, info: PolyModulusInfo) -> Polynomial {
        let q = info.q();
        let coeffs = (0..info.degree).map(|_| rng.gen_range(0..q)).collect();
        Polynomial::new(coeffs, info)
    }

    #[test]
    fn test_new_reduces_and_pads() {
        let poly = create_test_poly(&[14, 26]);
        assert_eq!(poly.coeffs, vec![1, 0, 0, 0]);
    }

    #[test]
    fn test_addition() {
        let p1 = create_test_poly(&[1, 2, 3, 4]);
        let p2 = create_test_poly(&[5, 6, 7, 8]);
        let result = p1 + p2;

        let expected = create_test_poly(&[6, 8, 10, 12]);
        assert_eq!(result, expected);
    }

    #[test]
    fn test_subtraction() {
        let p1 = create_test_poly(&[10, 11, 12, 0]);
        let p2 = create_test_poly(&[1, 3, 5, 7]);
        let result = p1 - p2;

        let expected = create_test_poly(&[9, 8, 7, 6]);
        assert_eq!(result, expected);
    }

    #[test]
    fn test_negation() {
        let poly = create_test_poly(&[0, 1, 12, 6]);
        assert_eq!(-poly, create_test_poly(&[0, 12, 1, 7]));
    }

    #[test]
    #[should_panic(expected = "share ring and domain")]
    fn test_mixed_domains_rejected() {
        let a = create_test_poly(&[1, 2, 3, 4]);
        let mut b = a.clone();
        b.modulus_info.domain = Domain::PtNtt;
        let _ = a + b;
    }

    #[test]
    fn test_schoolbook_mul() {
        let p1 = create_test_poly(&[1, 2, 0, 0]);
        let p2 = create_test_poly(&[3, 4, 0, 0]);
        let result = p1.schoolbook_mul(&p2);

        // (1 + 2x)(3 + 4x) = 3 + 10x + 8x^2
        let expected = create_test_poly(&[3, 10, 8, 0]);
        assert_eq!(result, expected);
    }

    #[test]
    fn test_schoolbook_mul_wraps_negacyclically() {
        // x^3 * x^2 = x^5 = -x in Z_13[x]/(x^4 + 1)
        let p1 = create_test_poly(&[0, 0, 0, 1]);
        let p2 = create_test_poly(&[0, 0, 1, 0]);
        assert_eq!(p1.schoolbook_mul(&p2), create_test_poly(&[0, 12, 0, 0]));
    }

    #[test]
    fn test_byte_conversion() {
        let poly = create_test_poly(&[1, 2, 3, 12]);
        let bytes = poly.to_bytes();
        // 4 coefficients at 4 bits each
        assert_eq!(bytes, vec![0x21, 0xc3]);
        let reconstructed = Polynomial::from_bytes(&bytes, create_test_modulus()).unwrap();

        assert_eq!(poly, reconstructed);
    }

    #[test]
    fn test_byte_conversion_newhope512() {
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        let info = newhope512::poly_modulus();

        for _ in 0..8 {
            let poly = random_poly(&mut rng, info);
            let bytes = poly.to_bytes();
            assert_eq!(bytes.len(), newhope512::POLYBYTES);
            assert_eq!(Polynomial::from_bytes(&bytes, info).unwrap(), poly);
        }

        let mut edges = Polynomial::zero(info);
        edges.coeffs[0] = 3328;
        edges.coeffs[511] = 3328;
        let bytes = edges.to_bytes();
        assert_eq!(Polynomial::from_bytes(&bytes, info).unwrap(), edges);
    }

    #[test]
    fn test_twelve_bit_layout() {
        let info = newhope512::poly_modulus();
        let mut poly = Polynomial::zero(info);
        poly.coeffs[0] = 0xabc;
        poly.coeffs[1] = 0x123;
        let bytes = poly.to_bytes();
        assert_eq!(hex::encode(&bytes[..3]), "bc3a12");
    }

    #[test]
    fn test_oversized_coefficient_stays_in_its_field() {
        let info = newhope512::poly_modulus();
        let mut poly = Polynomial::zero(info);
        poly.coeffs[0] = 0x1fff;
        poly.coeffs[1] = 7;

        let bytes = poly.to_bytes();
        assert_eq!(hex::encode(&bytes[..3]), "ff7f00");
        let err = Polynomial::from_bytes(&bytes, info).unwrap_err();
        assert_eq!(
            err,
            EncodingError::CoefficientOutOfRange { index: 0, value: 0xfff, q: 3329 }
        );
    }

    #[test]
    fn test_display() {
        let poly = create_test_poly(&[1, 0, 12, 3]);
        assert_eq!(poly.to_string(), "[1, 0, 12, 3]");
    }

    #[test]
    fn test_from_bytes_rejects_out_of_range() {
        let info = newhope512::poly_modulus();
        let mut bytes = Polynomial::zero(info).to_bytes();
        // coefficient 1 <- 0xfff
        bytes[1] |= 0xf0;
        bytes[2] = 0xff;

        let err = Polynomial::from_bytes(&bytes, info).unwrap_err();
        assert_eq!(
            err,
            EncodingError::CoefficientOutOfRange { index: 1, value: 0xfff, q: 3329 }
        );
    }

    #[test]
    fn test_from_bytes_rejects_wrong_length() {
        let info = newhope512::poly_modulus();
        let err = Polynomial::from_bytes(&[0u8; 10], info).unwrap_err();
        assert_eq!(err, EncodingError::Length { expected: 768, actual: 10 });
    }

    #[test]
    fn test_compress_decompress_bound() {
        let info = newhope512::poly_modulus();
        let q = info.q();
        let bound = max_compression_error(q, newhope512::COMPRESSED_BITS);
        assert_eq!(bound, 209);

        // every residue once, spread over a few polynomials
        let values: Vec<u16> = (0..q).collect();
        for chunk in values.chunks(info.degree) {
            let poly = Polynomial::new(chunk.to_vec(), info);
            let bytes = poly.compress(newhope512::COMPRESSED_BITS);
            assert_eq!(bytes.len(), newhope512::COMPRESSEDBYTES);

            let recovered =
                Polynomial::decompress(&bytes, newhope512::COMPRESSED_BITS, info).unwrap();
            for (orig, back) in poly.coeffs.iter().zip(&recovered.coeffs) {
                let diff = (*orig as i32 - *back as i32).rem_euclid(q as i32);
                let circular = diff.min(q as i32 - diff);
                assert!(circular <= bound as i32, "{} -> {} off by {}", orig, back, circular);
            }
        }
    }

    #[test]
    fn test_compress_is_idempotent_on_decompressed_values() {
        let info = newhope512::poly_modulus();
        let mut rng = ChaCha20Rng::seed_from_u64(11);
        let poly = random_poly(&mut rng, info);

        let once = poly.compress(3);
        let decompressed = Polynomial::decompress(&once, 3, info).unwrap();
        assert_eq!(decompressed.compress(3), once);
    }

    #[test]
    fn test_infinity_norm() {
        let info = PolyModulusInfo::new(4, 17, Domain::Coefficient);
        let poly = Polynomial::new(vec![2, 16, 5, 10], info);

        // 10 is -7 mod 17
        assert_eq!(poly.infinity_norm(), 7);
    }

    #[test]
    fn test_from_signed() {
        let info = create_test_modulus();
        let poly = Polynomial::from_signed(&[-1, 2, -3, 0], info);
        assert_eq!(poly.coeffs, vec![12, 2, 10, 0]);
    }
}
