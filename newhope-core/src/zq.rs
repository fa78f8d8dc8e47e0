use std::fmt;

/// Arithmetic in Z_q for a prime q < 2^15.
///
/// Every operation takes canonical inputs in [0, q) and returns a canonical
/// value in [0, q). Reduction is explicit; nothing relies on integer wrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Modulus {
    q: u16,
    /// floor(2^32 / q), used by Barrett reduction
    barrett_factor: u64,
}

impl Modulus {
    const BARRETT_SHIFT: u32 = 32;

    /// Creates the arithmetic context for modulus q
    pub fn new(q: u16) -> Self {
        assert!(q >= 2 && q < (1 << 15), "modulus must lie in [2, 2^15)");
        Modulus {
            q,
            barrett_factor: (1u64 << Self::BARRETT_SHIFT) / q as u64,
        }
    }

    /// Returns the modulus q
    pub fn q(&self) -> u16 {
        self.q
    }

    /// Barrett reduction of any u32 into [0, q).
    ///
    /// The quotient estimate is off by at most one, so a single conditional
    /// subtraction finishes the job.
    pub fn reduce(&self, x: u32) -> u16 {
        let quotient = ((x as u64 * self.barrett_factor) >> Self::BARRETT_SHIFT) as u32;
        let remainder = x - quotient * self.q as u32;
        self.csubq(remainder)
    }

    /// Maps r in [0, 2q) to [0, q) without branching on r
    fn csubq(&self, r: u32) -> u16 {
        let t = r as i32 - self.q as i32;
        (t + ((t >> 31) & self.q as i32)) as u16
    }

    /// Lifts a signed value into [0, q)
    pub fn from_signed(&self, x: i32) -> u16 {
        let r = x.rem_euclid(self.q as i32);
        r as u16
    }

    pub fn add(&self, a: u16, b: u16) -> u16 {
        self.csubq(a as u32 + b as u32)
    }

    pub fn sub(&self, a: u16, b: u16) -> u16 {
        self.csubq(a as u32 + self.q as u32 - b as u32)
    }

    pub fn neg(&self, a: u16) -> u16 {
        self.sub(0, a)
    }

    pub fn mul(&self, a: u16, b: u16) -> u16 {
        self.reduce(a as u32 * b as u32)
    }

    /// Square-and-multiply exponentiation
    pub fn pow(&self, base: u16, exponent: usize) -> u16 {
        let mut result = 1 % self.q;
        let mut base = self.reduce(base as u32);
        let mut exp = exponent;

        while exp > 0 {
            if exp & 1 == 1 {
                result = self.mul(result, base);
            }
            base = self.mul(base, base);
            exp >>= 1;
        }

        result
    }

    /// Multiplicative inverse via the extended Euclidean algorithm.
    /// Returns `None` when `a` is not invertible modulo q.
    pub fn inverse(&self, a: u16) -> Option<u16> {
        let a = self.reduce(a as u32);
        if a == 0 {
            return None;
        }

        let mut s: i32 = 0;
        let mut old_s: i32 = 1;
        let mut r = self.q as i32;
        let mut old_r = a as i32;

        while r != 0 {
            let quotient = old_r / r;

            let temp = r;
            r = old_r - quotient * r;
            old_r = temp;

            let temp = s;
            s = old_s - quotient * s;
            old_s = temp;
        }

        if old_r != 1 {
            return None;
        }

        Some(self.from_signed(old_s))
    }

    /// Distance of `a` from ⌊q/2⌋, i.e. |a - ⌊q/2⌋| for a in [0, q)
    pub fn flip_abs(&self, a: u16) -> u16 {
        let r = a as i32 - (self.q / 2) as i32;
        let m = r >> 31;
        ((r + m) ^ m) as u16
    }

    /// Centered representative of `a`, in (-q/2, q/2]
    pub fn centered(&self, a: u16) -> i32 {
        let a = a as i32;
        let q = self.q as i32;
        if a > q / 2 {
            a - q
        } else {
            a
        }
    }
}

impl fmt::Display for Modulus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Z_{}", self.q)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Modulus::new(3329).to_string(), "Z_3329");
    }

    #[test]
    fn test_addition() {
        let m = Modulus::new(13);
        assert_eq!(m.add(5, 10), 2);
        assert_eq!(m.add(12, 0), 12);
    }

    #[test]
    fn test_subtraction() {
        let m = Modulus::new(13);
        assert_eq!(m.sub(5, 10), 8);
        assert_eq!(m.sub(0, 0), 0);
    }

    #[test]
    fn test_multiplication() {
        let m = Modulus::new(13);
        assert_eq!(m.mul(5, 7), 9);
    }

    #[test]
    fn test_negation() {
        let m = Modulus::new(13);
        assert_eq!(m.neg(5), 8);
        assert_eq!(m.neg(0), 0);
    }

    #[test]
    fn test_inverse() {
        let m = Modulus::new(3329);
        for a in [1u16, 2, 17, 128, 3328] {
            let inv = m.inverse(a).unwrap();
            assert_eq!(m.mul(a, inv), 1);
        }
        assert_eq!(m.inverse(0), None);
    }

    #[test]
    fn test_barrett_reduce_matches_remainder() {
        let m = Modulus::new(3329);
        let samples = [
            0u32,
            1,
            3328,
            3329,
            3330,
            3328 * 3328,
            4 * 3328 * 3328,
            u16::MAX as u32,
            u32::MAX,
        ];
        for x in samples {
            assert_eq!(m.reduce(x) as u32, x % 3329, "x = {}", x);
        }
    }

    #[test]
    fn test_from_signed() {
        let m = Modulus::new(3329);
        assert_eq!(m.from_signed(-3), 3326);
        assert_eq!(m.from_signed(3), 3);
        assert_eq!(m.from_signed(-3329), 0);
    }

    #[test]
    fn test_pow_order_of_zeta() {
        let m = Modulus::new(3329);
        assert_eq!(m.pow(17, 128), 3328);
        assert_eq!(m.pow(17, 256), 1);
    }

    #[test]
    fn test_flip_abs_and_centered() {
        let m = Modulus::new(3329);
        assert_eq!(m.flip_abs(1664), 0);
        assert_eq!(m.flip_abs(0), 1664);
        assert_eq!(m.flip_abs(3328), 1664);
        assert_eq!(m.centered(3328), -1);
        assert_eq!(m.centered(1664), 1664);
        assert_eq!(m.centered(1665), -1664);
    }
}
