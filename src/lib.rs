//! Pure Rust Ed25519 signatures as specified in RFC 8032.
//!
//! The crate implements the full primitive from the field arithmetic up:
//! GF(2^255-19) in radix-2^25.5 limbs, scalar arithmetic modulo the group
//! order, extended-coordinate Edwards points with constant-time scalar
//! multiplication, and a deterministic signing engine on top. SHA-512
//! comes from the `sha2` crate.
//!
//! # Features
//!
//! - Deterministic key generation from a 32-byte seed, or random
//!   generation from the OS entropy source
//! - Deterministic RFC 8032 signatures (no signing-time randomness)
//! - Verification that fails closed on every malformed or non-canonical
//!   input, including `S >= L` and non-canonical point encodings
//! - Constant-time curve arithmetic; secret keys are zeroized on drop
//!
//! # Example
//!
//! ```
//! use ed25519_core::Ed25519;
//! use rand::rngs::OsRng;
//!
//! # fn main() -> ed25519_core::Result<()> {
//! let (public_key, private_key) = Ed25519::keypair(&mut OsRng)?;
//!
//! let message = b"Hello, Ed25519!";
//! let signature = Ed25519::sign(message, &private_key);
//!
//! assert!(Ed25519::verify(message, &signature, &public_key));
//! # Ok(())
//! # }
//! ```

mod constants;
mod ed25519;
pub mod error;
mod field;
mod point;
mod scalar;

pub use constants::{PRIVATE_KEY_LENGTH, PUBLIC_KEY_LENGTH, SEED_LENGTH, SIGNATURE_LENGTH};
pub use ed25519::{Ed25519, PrivateKey, PublicKey, Signature};
pub use error::{Error, Result};

use rand::rngs::OsRng;

/// Generate a key pair from the operating system's entropy source.
///
/// Errors with [`Error::EntropyUnavailable`] if the OS RNG fails; no
/// weaker source is substituted.
pub fn generate_keypair() -> Result<(PublicKey, PrivateKey)> {
    Ed25519::keypair(&mut OsRng)
}

/// Generate a key pair deterministically from a 32-byte seed.
///
/// Errors with [`Error::InvalidLength`] if the seed is not exactly
/// [`SEED_LENGTH`] bytes.
pub fn generate_keypair_from_seed(seed: &[u8]) -> Result<(PublicKey, PrivateKey)> {
    if seed.len() != SEED_LENGTH {
        return Err(Error::InvalidLength {
            context: "seed",
            expected: SEED_LENGTH,
            actual: seed.len(),
        });
    }
    let mut fixed = [0u8; SEED_LENGTH];
    fixed.copy_from_slice(seed);
    Ok(Ed25519::keypair_from_seed(&fixed))
}

/// Sign a message with a 64-byte private key (seed || public key).
///
/// Errors with [`Error::InvalidLength`] if the key is not exactly
/// [`PRIVATE_KEY_LENGTH`] bytes; the length is checked before any
/// computation.
pub fn sign(message: &[u8], private_key: &[u8]) -> Result<Signature> {
    let key = PrivateKey::from_bytes(private_key)?;
    Ok(Ed25519::sign(message, &key))
}

/// Verify a signature over a message.
///
/// Returns `Ok(false)` for any signature that does not validate,
/// including undecodable points and non-canonical scalars; only wrong
/// buffer lengths are reported as errors.
pub fn verify(message: &[u8], signature: &[u8], public_key: &[u8]) -> Result<bool> {
    if signature.len() != SIGNATURE_LENGTH {
        return Err(Error::InvalidLength {
            context: "signature",
            expected: SIGNATURE_LENGTH,
            actual: signature.len(),
        });
    }
    if public_key.len() != PUBLIC_KEY_LENGTH {
        return Err(Error::InvalidLength {
            context: "public key",
            expected: PUBLIC_KEY_LENGTH,
            actual: public_key.len(),
        });
    }

    let sig = Signature::from_bytes(signature)?;
    let mut key = [0u8; PUBLIC_KEY_LENGTH];
    key.copy_from_slice(public_key);
    // Decoding failures are handled inside verify and fail closed.
    let key = PublicKey::from_array(key);
    Ok(Ed25519::verify(message, &sig, &key))
}
