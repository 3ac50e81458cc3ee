//! The Ed25519 signature engine: key generation, signing, verification.
//!
//! Follows RFC 8032. Every operation is a pure function of its inputs;
//! signing is fully deterministic (the nonce is derived from the secret
//! prefix and the message, never from an RNG), so identical inputs always
//! produce byte-identical signatures.

use rand::{CryptoRng, RngCore};
use sha2::{Digest, Sha512};
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, Zeroizing};

use crate::constants::{PRIVATE_KEY_LENGTH, PUBLIC_KEY_LENGTH, SEED_LENGTH, SIGNATURE_LENGTH};
use crate::error::{Error, Result};
use crate::point::EdwardsPoint;
use crate::scalar::{self, Scalar};

/// The Ed25519 signature scheme.
pub struct Ed25519;

/// An Ed25519 public key: the 32-byte compressed encoding of [s]B.
#[derive(Clone, Copy, Zeroize)]
pub struct PublicKey([u8; PUBLIC_KEY_LENGTH]);

/// An Ed25519 private key.
///
/// The canonical external form is 64 bytes: the 32-byte seed followed by
/// the 32-byte public key. The expanded secret scalar and nonce prefix
/// are re-derived from the seed on every signing call and never cached.
#[derive(Clone)]
pub struct PrivateKey {
    seed: [u8; SEED_LENGTH],
    public: [u8; PUBLIC_KEY_LENGTH],
}

/// An Ed25519 signature: 32-byte point R followed by 32-byte scalar S.
#[derive(Clone, Copy)]
pub struct Signature([u8; SIGNATURE_LENGTH]);

impl PublicKey {
    /// Parse a public key, checking length and that the bytes decode to
    /// a curve point under the canonical-encoding rules.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != PUBLIC_KEY_LENGTH {
            return Err(Error::InvalidLength {
                context: "public key",
                expected: PUBLIC_KEY_LENGTH,
                actual: bytes.len(),
            });
        }
        let mut key = [0u8; PUBLIC_KEY_LENGTH];
        key.copy_from_slice(bytes);
        if EdwardsPoint::decompress(&key).is_none() {
            return Err(Error::InvalidEncoding);
        }
        Ok(PublicKey(key))
    }

    pub(crate) fn from_array(bytes: [u8; PUBLIC_KEY_LENGTH]) -> Self {
        PublicKey(bytes)
    }

    pub fn to_bytes(&self) -> [u8; PUBLIC_KEY_LENGTH] {
        self.0
    }

    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LENGTH] {
        &self.0
    }
}

impl PartialEq for PublicKey {
    fn eq(&self, other: &Self) -> bool {
        bool::from(self.0.ct_eq(&other.0))
    }
}

impl Eq for PublicKey {}

impl AsRef<[u8]> for PublicKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

// Key material never appears in formatted output.
impl core::fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PublicKey")
            .field("algorithm", &"Ed25519")
            .finish()
    }
}

impl PrivateKey {
    /// Rebuild a private key from its 64-byte external form.
    ///
    /// Only the seed half is trusted: the public half is recomputed, so
    /// a corrupted trailing 32 bytes cannot desynchronize the key.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != PRIVATE_KEY_LENGTH {
            return Err(Error::InvalidLength {
                context: "private key",
                expected: PRIVATE_KEY_LENGTH,
                actual: bytes.len(),
            });
        }
        let mut seed = [0u8; SEED_LENGTH];
        seed.copy_from_slice(&bytes[..SEED_LENGTH]);
        Ok(Self::from_seed(&seed))
    }

    /// Derive the key pair's private half from a 32-byte seed.
    pub fn from_seed(seed: &[u8; SEED_LENGTH]) -> Self {
        let scalar = expand_scalar(seed);
        let public = EdwardsPoint::mul_base(&scalar).compress();
        PrivateKey {
            seed: *seed,
            public,
        }
    }

    /// The 64-byte external encoding: seed || public key.
    pub fn to_bytes(&self) -> [u8; PRIVATE_KEY_LENGTH] {
        let mut out = [0u8; PRIVATE_KEY_LENGTH];
        out[..SEED_LENGTH].copy_from_slice(&self.seed);
        out[SEED_LENGTH..].copy_from_slice(&self.public);
        out
    }

    pub fn seed(&self) -> &[u8; SEED_LENGTH] {
        &self.seed
    }

    pub fn public_key(&self) -> PublicKey {
        PublicKey(self.public)
    }
}

impl Zeroize for PrivateKey {
    fn zeroize(&mut self) {
        self.seed.zeroize();
        self.public.zeroize();
    }
}

impl Drop for PrivateKey {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl core::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PrivateKey")
            .field("algorithm", &"Ed25519")
            .finish()
    }
}

impl Signature {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != SIGNATURE_LENGTH {
            return Err(Error::InvalidLength {
                context: "signature",
                expected: SIGNATURE_LENGTH,
                actual: bytes.len(),
            });
        }
        let mut sig = [0u8; SIGNATURE_LENGTH];
        sig.copy_from_slice(bytes);
        Ok(Signature(sig))
    }

    pub fn to_bytes(&self) -> [u8; SIGNATURE_LENGTH] {
        self.0
    }

    pub fn as_bytes(&self) -> &[u8; SIGNATURE_LENGTH] {
        &self.0
    }

    fn r_bytes(&self) -> [u8; 32] {
        let mut r = [0u8; 32];
        r.copy_from_slice(&self.0[..32]);
        r
    }

    fn s_bytes(&self) -> [u8; 32] {
        let mut s = [0u8; 32];
        s.copy_from_slice(&self.0[32..]);
        s
    }
}

impl PartialEq for Signature {
    fn eq(&self, other: &Self) -> bool {
        bool::from(self.0.ct_eq(&other.0))
    }
}

impl Eq for Signature {}

impl AsRef<[u8]> for Signature {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl core::fmt::Debug for Signature {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Signature")
            .field("length", &self.0.len())
            .finish()
    }
}

/// SHA-512 the seed and clamp the low half into the secret scalar.
fn expand_scalar(seed: &[u8; SEED_LENGTH]) -> Scalar {
    let digest = Zeroizing::new(seed_digest(seed));
    let mut scalar_bytes = Zeroizing::new([0u8; 32]);
    scalar_bytes.copy_from_slice(&digest[..32]);
    scalar::clamp(&mut scalar_bytes);
    Scalar::from_bytes(&scalar_bytes)
}

/// SHA-512 the seed and return the high half, the deterministic-nonce
/// prefix.
fn expand_prefix(seed: &[u8; SEED_LENGTH]) -> Zeroizing<[u8; 32]> {
    let digest = Zeroizing::new(seed_digest(seed));
    let mut prefix = Zeroizing::new([0u8; 32]);
    prefix.copy_from_slice(&digest[32..]);
    prefix
}

fn seed_digest(seed: &[u8; SEED_LENGTH]) -> [u8; 64] {
    let mut hasher = Sha512::new();
    hasher.update(seed);
    hasher.finalize().into()
}

impl Ed25519 {
    /// Generate a key pair from a caller-supplied cryptographic RNG.
    ///
    /// Fails only if the RNG cannot produce 32 seed bytes; there is no
    /// fallback entropy source.
    pub fn keypair<R: CryptoRng + RngCore>(rng: &mut R) -> Result<(PublicKey, PrivateKey)> {
        let mut seed = Zeroizing::new([0u8; SEED_LENGTH]);
        rng.try_fill_bytes(seed.as_mut())
            .map_err(|e| Error::EntropyUnavailable(e.to_string()))?;
        Ok(Self::keypair_from_seed(&seed))
    }

    /// Deterministically derive a key pair from a 32-byte seed.
    ///
    /// Per RFC 8032: the seed is hashed with SHA-512, the low half is
    /// clamped into the secret scalar s, and the public key is the
    /// compressed encoding of [s]B.
    pub fn keypair_from_seed(seed: &[u8; SEED_LENGTH]) -> (PublicKey, PrivateKey) {
        let private = PrivateKey::from_seed(seed);
        (private.public_key(), private)
    }

    /// Sign a message.
    ///
    /// r = SHA-512(prefix || M) mod L, R = [r]B,
    /// k = SHA-512(R || A || M) mod L, S = (r + k*s) mod L.
    pub fn sign(message: &[u8], key: &PrivateKey) -> Signature {
        let s = expand_scalar(&key.seed);
        let prefix = expand_prefix(&key.seed);

        // The public key enters the challenge transcript; recompute it
        // from the seed rather than trusting the cached copy.
        let public = EdwardsPoint::mul_base(&s).compress();

        let mut hasher = Sha512::new();
        hasher.update(prefix.as_ref());
        hasher.update(message);
        let r = Scalar::reduce_512(&hasher.finalize().into());

        let r_encoded = EdwardsPoint::mul_base(&r).compress();

        let mut hasher = Sha512::new();
        hasher.update(r_encoded);
        hasher.update(public);
        hasher.update(message);
        let k = Scalar::reduce_512(&hasher.finalize().into());

        let s_component = Scalar::mul_add(&k, &s, &r);

        let mut sig = [0u8; SIGNATURE_LENGTH];
        sig[..32].copy_from_slice(&r_encoded);
        sig[32..].copy_from_slice(s_component.as_bytes());
        Signature(sig)
    }

    /// Verify a signature. Total over all byte inputs: every malformed
    /// or non-canonical component yields `false`, never a panic or an
    /// error.
    ///
    /// Accepts iff S < L, R and A decode canonically, and
    /// [S]B == R + [k]A for k = SHA-512(R || A || M) mod L.
    pub fn verify(message: &[u8], signature: &Signature, public_key: &PublicKey) -> bool {
        let a_point = match EdwardsPoint::decompress(public_key.as_bytes()) {
            Some(p) => p,
            None => return false,
        };

        // Canonical-S gate before any curve arithmetic; a reduced alias
        // of a valid S must not verify.
        let s_bytes = signature.s_bytes();
        if !scalar::is_canonical(&s_bytes) {
            return false;
        }

        let r_bytes = signature.r_bytes();
        let r_point = match EdwardsPoint::decompress(&r_bytes) {
            Some(p) => p,
            None => return false,
        };

        let mut hasher = Sha512::new();
        hasher.update(r_bytes);
        hasher.update(public_key.as_bytes());
        hasher.update(message);
        let k = Scalar::reduce_512(&hasher.finalize().into());

        let lhs = EdwardsPoint::mul_base(&Scalar::from_bytes(&s_bytes));
        let rhs = r_point.add(&a_point.mul(&k));

        bool::from(lhs.compress().ct_eq(&rhs.compress()))
    }
}
