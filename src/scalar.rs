//! Arithmetic modulo the group order L = 2^252 + 27742317777372353535851937790883648493.
//!
//! Scalars are 32 little-endian bytes. Reduction and multiply-accumulate
//! use the ref10 radix-2^21 signed-limb algorithm; the fold coefficients
//! encode 2^252 mod L. All paths are free of secret-dependent branches.

use zeroize::Zeroize;

use crate::constants::{load3, load4, GROUP_ORDER};

/// An integer modulo L, canonically encoded.
#[derive(Clone, Zeroize)]
pub(crate) struct Scalar {
    bytes: [u8; 32],
}

const MASK_21: i64 = 0x1fffff;

// 2^252 mod L expressed in the fold schedule: limb k spills into limbs
// k-12 .. k-7 scaled by these.
const FOLD: [i64; 6] = [666643, 470296, 654183, -997805, 136657, -683901];

impl Scalar {
    /// Wrap 32 bytes without reduction. Callers that need canonical form
    /// go through `reduce_512` or `mul_add`.
    pub fn from_bytes(bytes: &[u8; 32]) -> Self {
        Scalar { bytes: *bytes }
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.bytes
    }

    pub fn to_bytes(&self) -> [u8; 32] {
        self.bytes
    }

    /// Reduce a 512-bit little-endian integer modulo L.
    pub fn reduce_512(wide: &[u8; 64]) -> Self {
        let mut s = [
            load3(&wide[0..]) as i64 & MASK_21,
            (load4(&wide[2..]) >> 5) as i64 & MASK_21,
            (load3(&wide[5..]) >> 2) as i64 & MASK_21,
            (load4(&wide[7..]) >> 7) as i64 & MASK_21,
            (load4(&wide[10..]) >> 4) as i64 & MASK_21,
            (load3(&wide[13..]) >> 1) as i64 & MASK_21,
            (load4(&wide[15..]) >> 6) as i64 & MASK_21,
            (load3(&wide[18..]) >> 3) as i64 & MASK_21,
            load3(&wide[21..]) as i64 & MASK_21,
            (load4(&wide[23..]) >> 5) as i64 & MASK_21,
            (load3(&wide[26..]) >> 2) as i64 & MASK_21,
            (load4(&wide[28..]) >> 7) as i64 & MASK_21,
            (load4(&wide[31..]) >> 4) as i64 & MASK_21,
            (load3(&wide[34..]) >> 1) as i64 & MASK_21,
            (load4(&wide[36..]) >> 6) as i64 & MASK_21,
            (load3(&wide[39..]) >> 3) as i64 & MASK_21,
            load3(&wide[42..]) as i64 & MASK_21,
            (load4(&wide[44..]) >> 5) as i64 & MASK_21,
            (load3(&wide[47..]) >> 2) as i64 & MASK_21,
            (load4(&wide[49..]) >> 7) as i64 & MASK_21,
            (load4(&wide[52..]) >> 4) as i64 & MASK_21,
            (load3(&wide[55..]) >> 1) as i64 & MASK_21,
            (load4(&wide[57..]) >> 6) as i64 & MASK_21,
            (load4(&wide[60..]) >> 3) as i64,
        ];

        Scalar {
            bytes: reduce_limbs(&mut s),
        }
    }

    /// (a * b + c) mod L, the S-component combine in signing.
    pub fn mul_add(a: &Scalar, b: &Scalar, c: &Scalar) -> Self {
        let a = load_limbs(&a.bytes);
        let b = load_limbs(&b.bytes);
        let c = load_limbs(&c.bytes);

        // Schoolbook convolution of the 12-limb inputs, with c folded
        // into the low limbs as we go.
        let mut s = [0i64; 24];
        for (k, limb) in s.iter_mut().enumerate().take(12) {
            *limb = c[k];
            for j in k.saturating_sub(11)..=k.min(11) {
                *limb += a[j] * b[k - j];
            }
        }
        for (k, limb) in s.iter_mut().enumerate().skip(12).take(11) {
            for j in (k - 11)..12 {
                *limb += a[j] * b[k - j];
            }
        }

        // One rounding-carry sweep so every limb fits 21 bits before the
        // shared reduction tail.
        for k in (0..=22).step_by(2) {
            carry_rounded(&mut s, k);
        }
        for k in (1..=21).step_by(2) {
            carry_rounded(&mut s, k);
        }

        Scalar {
            bytes: reduce_limbs(&mut s),
        }
    }
}

/// Decompose a 32-byte scalar into twelve 21-bit limbs.
fn load_limbs(s: &[u8; 32]) -> [i64; 12] {
    [
        load3(&s[0..]) as i64 & MASK_21,
        (load4(&s[2..]) >> 5) as i64 & MASK_21,
        (load3(&s[5..]) >> 2) as i64 & MASK_21,
        (load4(&s[7..]) >> 7) as i64 & MASK_21,
        (load4(&s[10..]) >> 4) as i64 & MASK_21,
        (load3(&s[13..]) >> 1) as i64 & MASK_21,
        (load4(&s[15..]) >> 6) as i64 & MASK_21,
        (load3(&s[18..]) >> 3) as i64 & MASK_21,
        load3(&s[21..]) as i64 & MASK_21,
        (load4(&s[23..]) >> 5) as i64 & MASK_21,
        (load3(&s[26..]) >> 2) as i64 & MASK_21,
        (load4(&s[28..]) >> 7) as i64,
    ]
}

/// Rounding carry from limb k into limb k+1.
#[inline]
fn carry_rounded(s: &mut [i64; 24], k: usize) {
    let carry = (s[k] + (1 << 20)) >> 21;
    s[k + 1] += carry;
    s[k] -= carry << 21;
}

/// Exact carry from limb k into limb k+1.
#[inline]
fn carry_exact(s: &mut [i64; 24], k: usize) {
    let carry = s[k] >> 21;
    s[k + 1] += carry;
    s[k] -= carry << 21;
}

/// Spill limb k into limbs k-12 .. k-7 via the fold coefficients.
#[inline]
fn fold_limb(s: &mut [i64; 24], k: usize) {
    let v = s[k];
    for (j, &coeff) in FOLD.iter().enumerate() {
        s[k - 12 + j] += v * coeff;
    }
}

/// Shared reduction tail: fold the high limbs away and renormalize until
/// limbs 0..11 hold the canonical value, then pack to bytes.
fn reduce_limbs(s: &mut [i64; 24]) -> [u8; 32] {
    for k in (18..=23).rev() {
        fold_limb(s, k);
    }
    for k in (6..=16).step_by(2) {
        carry_rounded(s, k);
    }
    for k in (7..=15).step_by(2) {
        carry_rounded(s, k);
    }

    for k in (12..=17).rev() {
        fold_limb(s, k);
    }
    s[12] = 0;
    for k in (0..=10).step_by(2) {
        carry_rounded(s, k);
    }
    for k in (1..=11).step_by(2) {
        carry_rounded(s, k);
    }

    fold_limb(s, 12);
    s[12] = 0;
    for k in 0..=11 {
        carry_exact(s, k);
    }
    fold_limb(s, 12);
    for k in 0..=10 {
        carry_exact(s, k);
    }

    [
        s[0] as u8,
        (s[0] >> 8) as u8,
        ((s[0] >> 16) | (s[1] << 5)) as u8,
        (s[1] >> 3) as u8,
        (s[1] >> 11) as u8,
        ((s[1] >> 19) | (s[2] << 2)) as u8,
        (s[2] >> 6) as u8,
        ((s[2] >> 14) | (s[3] << 7)) as u8,
        (s[3] >> 1) as u8,
        (s[3] >> 9) as u8,
        ((s[3] >> 17) | (s[4] << 4)) as u8,
        (s[4] >> 4) as u8,
        (s[4] >> 12) as u8,
        ((s[4] >> 20) | (s[5] << 1)) as u8,
        (s[5] >> 7) as u8,
        ((s[5] >> 15) | (s[6] << 6)) as u8,
        (s[6] >> 2) as u8,
        (s[6] >> 10) as u8,
        ((s[6] >> 18) | (s[7] << 3)) as u8,
        (s[7] >> 5) as u8,
        (s[7] >> 13) as u8,
        s[8] as u8,
        (s[8] >> 8) as u8,
        ((s[8] >> 16) | (s[9] << 5)) as u8,
        (s[9] >> 3) as u8,
        (s[9] >> 11) as u8,
        ((s[9] >> 19) | (s[10] << 2)) as u8,
        (s[10] >> 6) as u8,
        ((s[10] >> 14) | (s[11] << 7)) as u8,
        (s[11] >> 1) as u8,
        (s[11] >> 9) as u8,
        (s[11] >> 17) as u8,
    ]
}

/// RFC 8032 secret-scalar clamping: clear the cofactor bits, clear bit
/// 255, set bit 254.
pub(crate) fn clamp(bytes: &mut [u8; 32]) {
    bytes[0] &= 248;
    bytes[31] &= 127;
    bytes[31] |= 64;
}

/// True if the 32-byte value is strictly below L, i.e. a canonical
/// scalar encoding. Used to reject malleable signature S components.
pub(crate) fn is_canonical(bytes: &[u8; 32]) -> bool {
    let mut borrow = 0u16;
    for i in 0..32 {
        let d = (bytes[i] as u16).wrapping_sub(GROUP_ORDER[i] as u16 + borrow);
        borrow = (d >> 15) & 1;
    }
    borrow == 1
}
