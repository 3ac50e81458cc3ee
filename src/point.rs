//! Twisted Edwards curve points for Ed25519.
//!
//! Points on -x^2 + y^2 = 1 + d*x^2*y^2 are kept in extended coordinates
//! (X:Y:Z:T) with x = X/Z, y = Y/Z, xy = T/Z, so additions need no field
//! inversion. The addition law is complete: it is correct for every pair
//! of curve points, including doublings and the identity.

use subtle::{Choice, ConditionallySelectable};

use crate::constants::{BASE_X, BASE_Y, EDWARDS_D};
use crate::field::{is_canonical_encoding, sqrt, FieldElement};
use crate::scalar::Scalar;

/// A curve point in extended projective coordinates.
#[derive(Clone, Copy)]
pub(crate) struct EdwardsPoint {
    x: FieldElement,
    y: FieldElement,
    z: FieldElement,
    t: FieldElement,
}

fn curve_d() -> FieldElement {
    FieldElement::from_bytes(&EDWARDS_D)
}

impl EdwardsPoint {
    /// The neutral element (0, 1).
    pub fn identity() -> Self {
        EdwardsPoint {
            x: FieldElement::zero(),
            y: FieldElement::one(),
            z: FieldElement::one(),
            t: FieldElement::zero(),
        }
    }

    /// The standard basepoint B.
    pub fn basepoint() -> Self {
        let x = FieldElement::from_bytes(&BASE_X);
        let y = FieldElement::from_bytes(&BASE_Y);
        EdwardsPoint {
            x,
            y,
            z: FieldElement::one(),
            t: x.mul(&y),
        }
    }

    /// Complete point addition ("add-2008-hwcd-3" with the 2d constant).
    pub fn add(&self, other: &EdwardsPoint) -> EdwardsPoint {
        let d2 = curve_d().double();

        let a = self.y.sub(&self.x).mul(&other.y.sub(&other.x));
        let b = self.y.add(&self.x).mul(&other.y.add(&other.x));
        let c = self.t.mul(&other.t).mul(&d2);
        let d = self.z.double().mul(&other.z);
        let e = b.sub(&a);
        let f = d.sub(&c);
        let g = d.add(&c);
        let h = b.add(&a);

        EdwardsPoint {
            x: e.mul(&f),
            y: g.mul(&h),
            z: f.mul(&g),
            t: e.mul(&h),
        }
    }

    /// Doubling via the complete addition law.
    pub fn double(&self) -> EdwardsPoint {
        self.add(self)
    }

    /// Constant-time scalar multiplication.
    ///
    /// Every iteration performs the same double, add, and select; the
    /// scalar bit only steers the selection, never a branch or an index.
    pub fn mul(&self, scalar: &Scalar) -> EdwardsPoint {
        let bytes = scalar.as_bytes();
        let mut acc = EdwardsPoint::identity();

        for i in (0..256).rev() {
            acc = acc.double();
            let stepped = acc.add(self);
            let bit = Choice::from((bytes[i >> 3] >> (i & 7)) & 1);
            acc = EdwardsPoint::conditional_select(&acc, &stepped, bit);
        }
        acc
    }

    /// Fixed-base scalar multiplication [scalar]B.
    pub fn mul_base(scalar: &Scalar) -> EdwardsPoint {
        EdwardsPoint::basepoint().mul(scalar)
    }

    /// Compress to the 32-byte encoding: affine y with the parity of x
    /// packed into bit 255.
    pub fn compress(&self) -> [u8; 32] {
        let z_inv = self.z.invert();
        let x = self.x.mul(&z_inv);
        let y = self.y.mul(&z_inv);

        let mut bytes = y.to_bytes();
        bytes[31] ^= x.is_negative().unwrap_u8() << 7;
        bytes
    }

    /// Decompress a 32-byte encoding, rejecting anything that would not
    /// re-encode to the same bytes:
    ///
    /// * a y value of p or above (non-canonical field encoding),
    /// * a y whose x^2 = (y^2-1)/(dy^2+1) has no square root,
    /// * a set sign bit alongside x = 0.
    pub fn decompress(bytes: &[u8; 32]) -> Option<EdwardsPoint> {
        let sign = (bytes[31] >> 7) & 1;
        let mut y_bytes = *bytes;
        y_bytes[31] &= 0x7f;

        if !is_canonical_encoding(&y_bytes) {
            return None;
        }

        let y = FieldElement::from_bytes(&y_bytes);
        let yy = y.square();
        let u = yy.sub(&FieldElement::one());
        let v = curve_d().mul(&yy).add(&FieldElement::one());
        let mut x = sqrt(&u.mul(&v.invert()))?;

        if x.is_zero() {
            if sign == 1 {
                return None;
            }
        } else if x.is_negative().unwrap_u8() != sign {
            x = x.neg();
        }

        let t = x.mul(&y);
        Some(EdwardsPoint {
            x,
            y,
            z: FieldElement::one(),
            t,
        })
    }

    #[cfg(test)]
    pub fn is_on_curve(&self) -> bool {
        // -X^2 + Y^2 = Z^2 + d*X^2*Y^2/Z^2, rearranged for extended
        // coordinates.
        let xx = self.x.square();
        let yy = self.y.square();
        let zz = self.z.square();
        let lhs = yy.sub(&xx).mul(&zz);
        let rhs = zz.square().add(&curve_d().mul(&xx).mul(&yy));
        bool::from(lhs.ct_eq(&rhs))
    }
}

impl ConditionallySelectable for EdwardsPoint {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        EdwardsPoint {
            x: FieldElement::conditional_select(&a.x, &b.x, choice),
            y: FieldElement::conditional_select(&a.y, &b.y, choice),
            z: FieldElement::conditional_select(&a.z, &b.z, choice),
            t: FieldElement::conditional_select(&a.t, &b.t, choice),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{FIELD_PRIME, GROUP_ORDER};

    fn scalar(n: u8) -> Scalar {
        let mut b = [0u8; 32];
        b[0] = n;
        Scalar::from_bytes(&b)
    }

    #[test]
    fn basepoint_is_on_curve() {
        assert!(EdwardsPoint::basepoint().is_on_curve());
        assert!(EdwardsPoint::identity().is_on_curve());
    }

    #[test]
    fn addition_laws() {
        let b = EdwardsPoint::basepoint();
        let id = EdwardsPoint::identity();

        // B + 0 = B
        assert_eq!(b.add(&id).compress(), b.compress());
        // B + B = 2B via both paths
        assert_eq!(b.add(&b).compress(), b.double().compress());
        // (B + 2B) = (2B + B)
        let b2 = b.double();
        assert_eq!(b.add(&b2).compress(), b2.add(&b).compress());
        assert!(b.add(&b2).is_on_curve());
    }

    #[test]
    fn scalar_mul_matches_repeated_addition() {
        let b = EdwardsPoint::basepoint();
        assert_eq!(b.mul(&scalar(1)).compress(), b.compress());
        assert_eq!(b.mul(&scalar(2)).compress(), b.double().compress());

        let mut acc = EdwardsPoint::identity();
        for _ in 0..7 {
            acc = acc.add(&b);
        }
        assert_eq!(b.mul(&scalar(7)).compress(), acc.compress());
    }

    #[test]
    fn group_order_annihilates_basepoint() {
        let lb = EdwardsPoint::mul_base(&Scalar::from_bytes(&GROUP_ORDER));
        assert_eq!(lb.compress(), EdwardsPoint::identity().compress());
    }

    #[test]
    fn compress_decompress_round_trip() {
        for n in 1..=16u8 {
            let p = EdwardsPoint::mul_base(&scalar(n));
            let encoded = p.compress();
            let decoded = EdwardsPoint::decompress(&encoded).expect("valid encoding");
            assert_eq!(decoded.compress(), encoded);
            assert!(decoded.is_on_curve());
        }
    }

    #[test]
    fn decompress_rejects_non_canonical_y() {
        // y = p is a valid residue (zero) but not a canonical encoding.
        assert!(EdwardsPoint::decompress(&FIELD_PRIME).is_none());

        let mut with_sign = FIELD_PRIME;
        with_sign[31] |= 0x80;
        assert!(EdwardsPoint::decompress(&with_sign).is_none());
    }

    #[test]
    fn decompress_rejects_sign_bit_on_zero_x() {
        // (0, 1) is the identity; its x-coordinate is zero, so the
        // encoding with the sign bit set can never round-trip.
        let mut identity_neg = [0u8; 32];
        identity_neg[0] = 1;
        identity_neg[31] = 0x80;
        assert!(EdwardsPoint::decompress(&identity_neg).is_none());

        let mut identity_enc = [0u8; 32];
        identity_enc[0] = 1;
        assert!(EdwardsPoint::decompress(&identity_enc).is_some());
    }

    #[test]
    fn decompress_rejects_non_residue() {
        // Scan for a y whose x^2 candidate has no square root; plenty
        // exist below 255, and every rejection must be a clean None.
        let mut rejected = 0;
        for n in 0..=255u8 {
            let mut enc = [0u8; 32];
            enc[0] = n;
            if EdwardsPoint::decompress(&enc).is_none() {
                rejected += 1;
            }
        }
        assert!(rejected > 0, "expected at least one non-residue y");
    }
}
