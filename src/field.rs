//! Arithmetic in GF(2^255 - 19).
//!
//! Field elements are held in ten signed limbs of alternating 26/25 bits
//! (the ref10 radix-2^25.5 layout). Intermediate results may be only
//! partially reduced; encoding always produces the unique canonical
//! little-endian form.

use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};
use zeroize::Zeroize;

use crate::constants::{load4, SQRT_M1};

/// An element of GF(2^255 - 19).
#[derive(Clone, Copy, Zeroize)]
pub(crate) struct FieldElement {
    limbs: [i32; 10],
}

// p in the limb representation, for the conditional subtraction.
const P_LIMBS: [i32; 10] = [
    0x3ffffed, 0x1ffffff, 0x3ffffff, 0x1ffffff,
    0x3ffffff, 0x1ffffff, 0x3ffffff, 0x1ffffff,
    0x3ffffff, 0x1ffffff,
];

// p - 2 = 2^255 - 21, little-endian; the inversion exponent.
const P_MINUS_2: [u8; 32] = [
    0xeb, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x7f,
];

#[inline]
const fn limb_mask(i: usize) -> i32 {
    if i & 1 == 0 {
        0x3ffffff
    } else {
        0x1ffffff
    }
}

impl FieldElement {
    pub fn zero() -> Self {
        FieldElement { limbs: [0; 10] }
    }

    pub fn one() -> Self {
        FieldElement {
            limbs: [1, 0, 0, 0, 0, 0, 0, 0, 0, 0],
        }
    }

    /// Decode 32 little-endian bytes. Bit 255 is ignored; the result is
    /// canonicalized, so encodings of values >= p alias their residue.
    pub fn from_bytes(bytes: &[u8; 32]) -> Self {
        let limbs = [
            (load4(&bytes[0..]) as i32) & 0x3ffffff,
            ((load4(&bytes[3..]) >> 2) as i32) & 0x1ffffff,
            ((load4(&bytes[6..]) >> 3) as i32) & 0x3ffffff,
            ((load4(&bytes[9..]) >> 5) as i32) & 0x1ffffff,
            ((load4(&bytes[12..]) >> 6) as i32) & 0x3ffffff,
            (load4(&bytes[16..]) as i32) & 0x1ffffff,
            ((load4(&bytes[19..]) >> 1) as i32) & 0x3ffffff,
            ((load4(&bytes[22..]) >> 3) as i32) & 0x1ffffff,
            ((load4(&bytes[25..]) >> 4) as i32) & 0x3ffffff,
            ((load4(&bytes[28..]) >> 6) as i32) & 0x1ffffff,
        ];

        let mut fe = FieldElement { limbs };
        fe.canonicalize();
        fe
    }

    /// Encode to the canonical 32-byte little-endian form (value < p,
    /// bit 255 clear).
    pub fn to_bytes(self) -> [u8; 32] {
        let mut fe = self;
        fe.canonicalize();
        let h = fe.limbs;

        let mut s = [0u8; 32];
        s[0] = h[0] as u8;
        s[1] = (h[0] >> 8) as u8;
        s[2] = (h[0] >> 16) as u8;
        s[3] = ((h[0] >> 24) | (h[1] << 2)) as u8;
        s[4] = (h[1] >> 6) as u8;
        s[5] = (h[1] >> 14) as u8;
        s[6] = ((h[1] >> 22) | (h[2] << 3)) as u8;
        s[7] = (h[2] >> 5) as u8;
        s[8] = (h[2] >> 13) as u8;
        s[9] = ((h[2] >> 21) | (h[3] << 5)) as u8;
        s[10] = (h[3] >> 3) as u8;
        s[11] = (h[3] >> 11) as u8;
        s[12] = ((h[3] >> 19) | (h[4] << 6)) as u8;
        s[13] = (h[4] >> 2) as u8;
        s[14] = (h[4] >> 10) as u8;
        s[15] = (h[4] >> 18) as u8;
        s[16] = h[5] as u8;
        s[17] = (h[5] >> 8) as u8;
        s[18] = (h[5] >> 16) as u8;
        s[19] = ((h[5] >> 24) | (h[6] << 1)) as u8;
        s[20] = (h[6] >> 7) as u8;
        s[21] = (h[6] >> 15) as u8;
        s[22] = ((h[6] >> 23) | (h[7] << 3)) as u8;
        s[23] = (h[7] >> 5) as u8;
        s[24] = (h[7] >> 13) as u8;
        s[25] = ((h[7] >> 21) | (h[8] << 4)) as u8;
        s[26] = (h[8] >> 4) as u8;
        s[27] = (h[8] >> 12) as u8;
        s[28] = ((h[8] >> 20) | (h[9] << 6)) as u8;
        s[29] = (h[9] >> 2) as u8;
        s[30] = (h[9] >> 10) as u8;
        s[31] = (h[9] >> 18) as u8;
        s
    }

    /// Strong reduction into [0, p).
    ///
    /// Two carry/subtract rounds are required: the 19*c wraparound of the
    /// first carry pass can leave the value in [p, p + 2^25), so a single
    /// conditional subtraction is not enough.
    fn canonicalize(&mut self) {
        propagate_carries(&mut self.limbs);
        conditional_sub_p(&mut self.limbs);
        propagate_carries(&mut self.limbs);
        conditional_sub_p(&mut self.limbs);
    }

    pub fn add(&self, other: &FieldElement) -> FieldElement {
        let mut limbs = [0i32; 10];
        for (i, limb) in limbs.iter_mut().enumerate() {
            *limb = self.limbs[i].wrapping_add(other.limbs[i]);
        }
        propagate_carries(&mut limbs);
        FieldElement { limbs }
    }

    pub fn sub(&self, other: &FieldElement) -> FieldElement {
        let mut limbs = [0i32; 10];
        for (i, limb) in limbs.iter_mut().enumerate() {
            *limb = self.limbs[i] - other.limbs[i];
        }
        // Signed limbs absorb the borrows; the carry pass folds them back
        // through the 19*c wraparound.
        propagate_carries(&mut limbs);
        FieldElement { limbs }
    }

    pub fn neg(&self) -> FieldElement {
        FieldElement::zero().sub(self)
    }

    pub fn double(&self) -> FieldElement {
        self.add(self)
    }

    /// Field multiplication, ref10 coefficient schedule.
    ///
    /// Odd-index limbs of `self` carry an extra factor of two and limbs of
    /// `other` that wrap past 2^255 carry a factor of 19, both folded into
    /// the precomputed products below.
    pub fn mul(&self, other: &FieldElement) -> FieldElement {
        let f = self.limbs;
        let g = other.limbs;

        let (f0, f1, f2, f3, f4, f5, f6, f7, f8, f9) = (
            f[0] as i64, f[1] as i64, f[2] as i64, f[3] as i64, f[4] as i64,
            f[5] as i64, f[6] as i64, f[7] as i64, f[8] as i64, f[9] as i64,
        );
        let (g0, g1, g2, g3, g4, g5, g6, g7, g8, g9) = (
            g[0] as i64, g[1] as i64, g[2] as i64, g[3] as i64, g[4] as i64,
            g[5] as i64, g[6] as i64, g[7] as i64, g[8] as i64, g[9] as i64,
        );

        let (g1_19, g2_19, g3_19, g4_19, g5_19) = (19 * g1, 19 * g2, 19 * g3, 19 * g4, 19 * g5);
        let (g6_19, g7_19, g8_19, g9_19) = (19 * g6, 19 * g7, 19 * g8, 19 * g9);
        let (f1_2, f3_2, f5_2, f7_2, f9_2) = (2 * f1, 2 * f3, 2 * f5, 2 * f7, 2 * f9);

        let mut h = [0i64; 10];
        h[0] = f0 * g0 + f1_2 * g9_19 + f2 * g8_19 + f3_2 * g7_19 + f4 * g6_19
            + f5_2 * g5_19 + f6 * g4_19 + f7_2 * g3_19 + f8 * g2_19 + f9_2 * g1_19;
        h[1] = f0 * g1 + f1 * g0 + f2 * g9_19 + f3 * g8_19 + f4 * g7_19
            + f5 * g6_19 + f6 * g5_19 + f7 * g4_19 + f8 * g3_19 + f9 * g2_19;
        h[2] = f0 * g2 + f1_2 * g1 + f2 * g0 + f3_2 * g9_19 + f4 * g8_19
            + f5_2 * g7_19 + f6 * g6_19 + f7_2 * g5_19 + f8 * g4_19 + f9_2 * g3_19;
        h[3] = f0 * g3 + f1 * g2 + f2 * g1 + f3 * g0 + f4 * g9_19
            + f5 * g8_19 + f6 * g7_19 + f7 * g6_19 + f8 * g5_19 + f9 * g4_19;
        h[4] = f0 * g4 + f1_2 * g3 + f2 * g2 + f3_2 * g1 + f4 * g0
            + f5_2 * g9_19 + f6 * g8_19 + f7_2 * g7_19 + f8 * g6_19 + f9_2 * g5_19;
        h[5] = f0 * g5 + f1 * g4 + f2 * g3 + f3 * g2 + f4 * g1 + f5 * g0
            + f6 * g9_19 + f7 * g8_19 + f8 * g7_19 + f9 * g6_19;
        h[6] = f0 * g6 + f1_2 * g5 + f2 * g4 + f3_2 * g3 + f4 * g2 + f5_2 * g1
            + f6 * g0 + f7_2 * g9_19 + f8 * g8_19 + f9_2 * g7_19;
        h[7] = f0 * g7 + f1 * g6 + f2 * g5 + f3 * g4 + f4 * g3 + f5 * g2
            + f6 * g1 + f7 * g0 + f8 * g9_19 + f9 * g8_19;
        h[8] = f0 * g8 + f1_2 * g7 + f2 * g6 + f3_2 * g5 + f4 * g4 + f5_2 * g3
            + f6 * g2 + f7_2 * g1 + f8 * g0 + f9_2 * g9_19;
        h[9] = f0 * g9 + f1 * g8 + f2 * g7 + f3 * g6 + f4 * g5 + f5 * g4
            + f6 * g3 + f7 * g2 + f8 * g1 + f9 * g0;

        // Wide carry chain, repeated until every limb fits its width.
        for _ in 0..5 {
            let mut c: i64;
            c = h[0] >> 26; h[0] &= 0x3ffffff; h[1] += c;
            c = h[1] >> 25; h[1] &= 0x1ffffff; h[2] += c;
            c = h[2] >> 26; h[2] &= 0x3ffffff; h[3] += c;
            c = h[3] >> 25; h[3] &= 0x1ffffff; h[4] += c;
            c = h[4] >> 26; h[4] &= 0x3ffffff; h[5] += c;
            c = h[5] >> 25; h[5] &= 0x1ffffff; h[6] += c;
            c = h[6] >> 26; h[6] &= 0x3ffffff; h[7] += c;
            c = h[7] >> 25; h[7] &= 0x1ffffff; h[8] += c;
            c = h[8] >> 26; h[8] &= 0x3ffffff; h[9] += c;
            c = h[9] >> 25; h[9] &= 0x1ffffff; h[0] += 19 * c;
        }

        let mut limbs = [0i32; 10];
        for (out, &wide) in limbs.iter_mut().zip(h.iter()) {
            *out = wide as i32;
        }

        let mut fe = FieldElement { limbs };
        fe.canonicalize();
        fe
    }

    pub fn square(&self) -> FieldElement {
        self.mul(self)
    }

    /// Multiplicative inverse a^(p-2).
    ///
    /// The square-and-multiply ladder scans a fixed public exponent, so
    /// its branch pattern is input-independent. invert(0) = 0.
    pub fn invert(&self) -> FieldElement {
        let mut result = FieldElement::one();
        for bit in (0..256).rev() {
            result = result.square();
            if (P_MINUS_2[bit >> 3] >> (bit & 7)) & 1 == 1 {
                result = result.mul(self);
            }
        }
        result
    }

    pub fn is_zero(&self) -> bool {
        self.to_bytes().ct_eq(&[0u8; 32]).into()
    }

    /// Parity of the canonical encoding, i.e. the compressed sign bit.
    pub fn is_negative(&self) -> Choice {
        Choice::from(self.to_bytes()[0] & 1)
    }

    pub fn ct_eq(&self, other: &FieldElement) -> Choice {
        self.to_bytes().ct_eq(&other.to_bytes())
    }
}

impl ConditionallySelectable for FieldElement {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        let mask = -(choice.unwrap_u8() as i32);
        let mut limbs = [0i32; 10];
        for (i, limb) in limbs.iter_mut().enumerate() {
            *limb = a.limbs[i] ^ (mask & (a.limbs[i] ^ b.limbs[i]));
        }
        FieldElement { limbs }
    }
}

/// Two carry passes over the limb vector; the wraparound multiplies the
/// top carry by 19 before folding it into limb 0.
fn propagate_carries(h: &mut [i32; 10]) {
    for _ in 0..2 {
        let mut c: i32;
        c = h[0] >> 26; h[0] &= 0x3ffffff; h[1] += c;
        c = h[1] >> 25; h[1] &= 0x1ffffff; h[2] += c;
        c = h[2] >> 26; h[2] &= 0x3ffffff; h[3] += c;
        c = h[3] >> 25; h[3] &= 0x1ffffff; h[4] += c;
        c = h[4] >> 26; h[4] &= 0x3ffffff; h[5] += c;
        c = h[5] >> 25; h[5] &= 0x1ffffff; h[6] += c;
        c = h[6] >> 26; h[6] &= 0x3ffffff; h[7] += c;
        c = h[7] >> 25; h[7] &= 0x1ffffff; h[8] += c;
        c = h[8] >> 26; h[8] &= 0x3ffffff; h[9] += c;
        c = h[9] >> 25; h[9] &= 0x1ffffff; h[0] += 19 * c;
    }
}

/// Constant-time conditional subtraction of p: if the value is >= p,
/// replace it with value - p, otherwise leave it unchanged.
fn conditional_sub_p(v: &mut [i32; 10]) {
    let mut diff = [0i32; 10];
    let mut borrow = 0i64;

    for i in 0..10 {
        let d = (v[i] as i64) - (P_LIMBS[i] as i64) - borrow;
        diff[i] = (d & (limb_mask(i) as i64)) as i32;
        borrow = (d >> 63) & 1;
    }

    // borrow == 0 means v >= p; build an all-ones mask from that.
    let mask = (borrow as i32).wrapping_sub(1);
    for i in 0..10 {
        v[i] = (v[i] & !mask) | (diff[i] & mask);
    }
}

/// Square root of a field element, if one exists.
///
/// Computes the candidate a^((p+3)/8); either it or its product with
/// sqrt(-1) squares back to `a`, otherwise `a` is a non-residue.
pub(crate) fn sqrt(a: &FieldElement) -> Option<FieldElement> {
    let candidate = pow_p38(a);

    if bool::from(candidate.square().ct_eq(a)) {
        return Some(candidate);
    }

    let adjusted = candidate.mul(&FieldElement::from_bytes(&SQRT_M1));
    if bool::from(adjusted.square().ct_eq(a)) {
        Some(adjusted)
    } else {
        None
    }
}

/// a^((p+3)/8) = a^(2^252 - 2), via the identity r_n = a^(2^(n+1) - 1).
fn pow_p38(a: &FieldElement) -> FieldElement {
    let mut r = *a;
    for _ in 0..250 {
        r = r.square();
        r = r.mul(a);
    }
    r.square()
}

/// True if `bytes` (with bit 255 already cleared by the caller) encodes a
/// value strictly below p, i.e. is the canonical encoding of its residue.
pub(crate) fn is_canonical_encoding(bytes: &[u8; 32]) -> bool {
    use crate::constants::FIELD_PRIME;
    let mut borrow = 0u16;
    for i in 0..32 {
        let d = (bytes[i] as u16).wrapping_sub(FIELD_PRIME[i] as u16 + borrow);
        borrow = (d >> 15) & 1;
    }
    // A final borrow means bytes < p.
    borrow == 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::FIELD_PRIME;
    use rand::{rngs::OsRng, RngCore};

    fn fe(n: u8) -> FieldElement {
        let mut b = [0u8; 32];
        b[0] = n;
        FieldElement::from_bytes(&b)
    }

    fn minus_one() -> FieldElement {
        FieldElement::zero().sub(&FieldElement::one())
    }

    #[test]
    fn encode_decode_round_trip() {
        let mut rng = OsRng;
        for _ in 0..200 {
            let mut bytes = [0u8; 32];
            rng.fill_bytes(&mut bytes);
            bytes[31] &= 0x7f;
            if !is_canonical_encoding(&bytes) {
                continue;
            }
            let a = FieldElement::from_bytes(&bytes);
            assert_eq!(a.to_bytes(), bytes);
        }
    }

    #[test]
    fn prime_reduces_to_zero() {
        let p = FieldElement::from_bytes(&FIELD_PRIME);
        assert!(p.is_zero());

        let mut p_plus_one = FIELD_PRIME;
        p_plus_one[0] += 1;
        let r = FieldElement::from_bytes(&p_plus_one);
        assert_eq!(r.to_bytes(), FieldElement::one().to_bytes());
    }

    #[test]
    fn small_arithmetic_identities() {
        assert_eq!(fe(3).mul(&fe(3)).to_bytes(), fe(9).to_bytes());
        assert_eq!(fe(7).add(&fe(5)).to_bytes(), fe(12).to_bytes());
        assert_eq!(fe(7).sub(&fe(5)).to_bytes(), fe(2).to_bytes());
        assert_eq!(fe(2).sub(&fe(7)).to_bytes(), fe(5).neg().to_bytes());
        assert_eq!(fe(6).double().to_bytes(), fe(12).to_bytes());
        assert_eq!(fe(42).square().to_bytes(), fe(42).mul(&fe(42)).to_bytes());
    }

    #[test]
    fn minus_one_squares_to_one() {
        let m1 = minus_one();
        assert_eq!(m1.mul(&m1).to_bytes(), FieldElement::one().to_bytes());
    }

    #[test]
    fn sqrt_m1_constant_is_a_root_of_minus_one() {
        let i = FieldElement::from_bytes(&SQRT_M1);
        assert_eq!(i.square().to_bytes(), minus_one().to_bytes());
    }

    #[test]
    fn multiplication_is_associative_and_commutative() {
        let mut rng = OsRng;
        for _ in 0..50 {
            let mut ab = [0u8; 32];
            let mut bb = [0u8; 32];
            let mut cb = [0u8; 32];
            rng.fill_bytes(&mut ab);
            rng.fill_bytes(&mut bb);
            rng.fill_bytes(&mut cb);
            let (a, b, c) = (
                FieldElement::from_bytes(&ab),
                FieldElement::from_bytes(&bb),
                FieldElement::from_bytes(&cb),
            );
            assert_eq!(a.mul(&b).to_bytes(), b.mul(&a).to_bytes());
            assert_eq!(
                a.mul(&b).mul(&c).to_bytes(),
                a.mul(&b.mul(&c)).to_bytes()
            );
        }
    }

    #[test]
    fn inversion_round_trip() {
        let mut rng = OsRng;
        for _ in 0..50 {
            let mut bytes = [0u8; 32];
            rng.fill_bytes(&mut bytes);
            let a = FieldElement::from_bytes(&bytes);
            if a.is_zero() {
                continue;
            }
            let product = a.mul(&a.invert());
            assert_eq!(product.to_bytes(), FieldElement::one().to_bytes());
        }
    }

    #[test]
    fn invert_edge_cases() {
        let m1 = minus_one();
        assert_eq!(m1.invert().to_bytes(), m1.to_bytes());
        assert_eq!(
            FieldElement::one().invert().to_bytes(),
            FieldElement::one().to_bytes()
        );
        assert!(FieldElement::zero().invert().is_zero());
    }

    #[test]
    fn sqrt_of_square_exists() {
        let mut rng = OsRng;
        for _ in 0..20 {
            let mut bytes = [0u8; 32];
            rng.fill_bytes(&mut bytes);
            let a = FieldElement::from_bytes(&bytes);
            let aa = a.square();
            let root = sqrt(&aa).expect("square must have a root");
            assert_eq!(root.square().to_bytes(), aa.to_bytes());
        }
    }

    #[test]
    fn conditional_select_chooses_correctly() {
        let a = fe(11);
        let b = fe(22);
        let keep = FieldElement::conditional_select(&a, &b, Choice::from(0));
        let swap = FieldElement::conditional_select(&a, &b, Choice::from(1));
        assert_eq!(keep.to_bytes(), a.to_bytes());
        assert_eq!(swap.to_bytes(), b.to_bytes());
    }

    #[test]
    fn canonical_encoding_predicate() {
        assert!(is_canonical_encoding(&[0u8; 32]));
        let mut p_minus_one = FIELD_PRIME;
        p_minus_one[0] -= 1;
        assert!(is_canonical_encoding(&p_minus_one));
        assert!(!is_canonical_encoding(&FIELD_PRIME));
        let mut above = FIELD_PRIME;
        above[0] = 0xee;
        assert!(!is_canonical_encoding(&above));
    }
}
