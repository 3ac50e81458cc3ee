//! Fixed buffer lengths and the Ed25519 curve constants.
//!
//! All multi-byte constants are little-endian, matching the wire encoding
//! used throughout RFC 8032.

/// Length of a key-generation seed in bytes.
pub const SEED_LENGTH: usize = 32;

/// Length of an encoded public key in bytes.
pub const PUBLIC_KEY_LENGTH: usize = 32;

/// Length of a private key in its external form (seed || public key).
pub const PRIVATE_KEY_LENGTH: usize = 64;

/// Length of a signature (R || S) in bytes.
pub const SIGNATURE_LENGTH: usize = 64;

/// The field prime p = 2^255 - 19.
pub(crate) const FIELD_PRIME: [u8; 32] = [
    0xed, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x7f,
];

/// The curve constant d = -121665/121666 mod p.
pub(crate) const EDWARDS_D: [u8; 32] = [
    0xa3, 0x78, 0x59, 0x13, 0xca, 0x4d, 0xeb, 0x75,
    0xab, 0xd8, 0x41, 0x41, 0x4d, 0x0a, 0x70, 0x00,
    0x98, 0xe8, 0x79, 0x77, 0x79, 0x40, 0xc7, 0x8c,
    0x73, 0xfe, 0x6f, 0x2b, 0xee, 0x6c, 0x03, 0x52,
];

/// A square root of -1 mod p, used during point decompression.
pub(crate) const SQRT_M1: [u8; 32] = [
    0xb0, 0xa0, 0x0e, 0x4a, 0x27, 0x1b, 0xee, 0xc4,
    0x78, 0xe4, 0x2f, 0xad, 0x06, 0x18, 0x43, 0x2f,
    0xa7, 0xd7, 0xfb, 0x3d, 0x99, 0x00, 0x4d, 0x2b,
    0x0b, 0xdf, 0xc1, 0x4f, 0x80, 0x24, 0x83, 0x2b,
];

/// x-coordinate of the standard basepoint B.
pub(crate) const BASE_X: [u8; 32] = [
    0x1a, 0xd5, 0x25, 0x8f, 0x60, 0x2d, 0x56, 0xc9,
    0xb2, 0xa7, 0x25, 0x95, 0x60, 0xc7, 0x2c, 0x69,
    0x5c, 0xdc, 0xd6, 0xfd, 0x31, 0xe2, 0xa4, 0xc0,
    0xfe, 0x53, 0x6e, 0xcd, 0xd3, 0x36, 0x69, 0x21,
];

/// y-coordinate of the standard basepoint B (4/5 mod p).
pub(crate) const BASE_Y: [u8; 32] = [
    0x58, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66,
    0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66,
    0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66,
    0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66,
];

/// The group order L = 2^252 + 27742317777372353535851937790883648493.
pub(crate) const GROUP_ORDER: [u8; 32] = [
    0xed, 0xd3, 0xf5, 0x5c, 0x1a, 0x63, 0x12, 0x58,
    0xd6, 0x9c, 0xf7, 0xa2, 0xde, 0xf9, 0xde, 0x14,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x10,
];

/// Load 3 little-endian bytes into the low bits of a u64.
#[inline]
pub(crate) fn load3(b: &[u8]) -> u64 {
    (b[0] as u64) | ((b[1] as u64) << 8) | ((b[2] as u64) << 16)
}

/// Load 4 little-endian bytes into the low bits of a u64.
#[inline]
pub(crate) fn load4(b: &[u8]) -> u64 {
    (b[0] as u64) | ((b[1] as u64) << 8) | ((b[2] as u64) << 16) | ((b[3] as u64) << 24)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_helpers_are_little_endian() {
        let bytes = [0x01, 0x02, 0x03, 0x04];
        assert_eq!(load3(&bytes), 0x030201);
        assert_eq!(load4(&bytes), 0x04030201);
    }

    #[test]
    fn group_order_has_expected_bit_length() {
        // L is a 253-bit number: top byte 0x10, i.e. bit 252 set.
        assert_eq!(GROUP_ORDER[31], 0x10);
        assert_eq!(FIELD_PRIME[31], 0x7f);
    }
}
