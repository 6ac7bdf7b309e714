//! ECVRF-EDWARDS25519-SHA512-TAI.
//!
//! Follows the RFC 9381 construction over edwards25519:
//!
//! - `H = encode_to_curve(Y, alpha)` by try-and-increment with cofactor clearing
//! - `gamma = x * H`
//! - nonce `k = SHA512(nonce_prefix || H) mod L`, derived from the secret key
//!   so that a key and an input always produce the same proof
//! - `c = SHA512(suite || 0x02 || Y || H || gamma || k*G || k*H || 0x00)[..16]`
//! - `s = k + c * x mod L`
//! - `beta = SHA512(suite || 0x03 || 8*gamma || 0x00)[..32]`
//!
//! Proving returns errors; verification never does.

use std::time::{Duration, Instant};

use curve25519_dalek::edwards::{CompressedEdwardsY, EdwardsPoint};
use curve25519_dalek::scalar::Scalar;
use curve25519_dalek::traits::IsIdentity;
use fairplay_crypto::constant_time_eq;
use fairplay_types::{VrfPublicKey, VrfSecretKey};
use sha2::{Digest, Sha512};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::proof::{VrfOutput, VrfProof, BETA_LEN, CHALLENGE_LEN};
use crate::VrfError;

/// Suite string for ECVRF-EDWARDS25519-SHA512-TAI.
pub const SUITE: u8 = 0x03;

const ENCODE_DOMAIN: u8 = 0x01;
const CHALLENGE_DOMAIN: u8 = 0x02;
const OUTPUT_DOMAIN: u8 = 0x03;
const TRAILER: u8 = 0x00;

/// Proving slower than this logs a warning.
pub const DEFAULT_PROVE_BUDGET: Duration = Duration::from_millis(2);

/// Secret scalar and nonce prefix expanded from a 32-byte secret key.
#[derive(Zeroize, ZeroizeOnDrop)]
pub(crate) struct ExpandedSecret {
    pub(crate) scalar: Scalar,
    nonce_prefix: [u8; 32],
}

/// Expand a secret key the RFC 8032 way: hash, clamp the lower half into the
/// secret scalar, keep the upper half as nonce prefix.
pub(crate) fn expand_secret(secret: &VrfSecretKey) -> ExpandedSecret {
    let mut digest = [0u8; 64];
    digest.copy_from_slice(&Sha512::digest(secret.as_bytes()));

    let mut scalar_bytes = [0u8; 32];
    scalar_bytes.copy_from_slice(&digest[..32]);
    scalar_bytes[0] &= 248;
    scalar_bytes[31] &= 127;
    scalar_bytes[31] |= 64;

    let mut nonce_prefix = [0u8; 32];
    nonce_prefix.copy_from_slice(&digest[32..]);

    let scalar = Scalar::from_bytes_mod_order(scalar_bytes);
    scalar_bytes.zeroize();
    digest.zeroize();

    ExpandedSecret {
        scalar,
        nonce_prefix,
    }
}

/// Decode a compressed point, rejecting non-canonical encodings.
fn decode_point(bytes: &[u8; 32]) -> Option<EdwardsPoint> {
    let point = CompressedEdwardsY(*bytes).decompress()?;
    if point.compress().as_bytes() != bytes {
        return None;
    }
    Some(point)
}

/// Try-and-increment hash to curve, bound to the public key.
fn encode_to_curve(public: &[u8; 32], alpha: &[u8]) -> Result<EdwardsPoint, VrfError> {
    for ctr in 0..=u8::MAX {
        let digest = Sha512::new()
            .chain_update([SUITE, ENCODE_DOMAIN])
            .chain_update(public)
            .chain_update(alpha)
            .chain_update([ctr, TRAILER])
            .finalize();

        let mut candidate = [0u8; 32];
        candidate.copy_from_slice(&digest[..32]);
        if let Some(point) = CompressedEdwardsY(candidate).decompress() {
            let h = point.mul_by_cofactor();
            if !h.is_identity() {
                return Ok(h);
            }
        }
    }
    Err(VrfError::HashToCurve(u32::from(u8::MAX) + 1))
}

fn nonce(prefix: &[u8; 32], h: &[u8; 32]) -> Scalar {
    let mut wide = [0u8; 64];
    wide.copy_from_slice(&Sha512::new().chain_update(prefix).chain_update(h).finalize());
    Scalar::from_bytes_mod_order_wide(&wide)
}

/// Challenge over the five encoded points `Y, H, gamma, U, V`.
fn challenge(points: [&[u8; 32]; 5]) -> [u8; CHALLENGE_LEN] {
    let mut hasher = Sha512::new();
    hasher.update([SUITE, CHALLENGE_DOMAIN]);
    for point in points {
        hasher.update(point);
    }
    hasher.update([TRAILER]);
    let digest = hasher.finalize();

    let mut c = [0u8; CHALLENGE_LEN];
    c.copy_from_slice(&digest[..CHALLENGE_LEN]);
    c
}

fn challenge_scalar(c: &[u8; CHALLENGE_LEN]) -> Scalar {
    let mut bytes = [0u8; 32];
    bytes[..CHALLENGE_LEN].copy_from_slice(c);
    Scalar::from_bytes_mod_order(bytes)
}

/// The output-hash primitive: `SHA512(suite || 0x03 || data || 0x00)[..32]`.
///
/// Also used by [`crate::RandomStream`] to stretch a seed.
pub(crate) fn output_hash(data: &[u8]) -> [u8; BETA_LEN] {
    let digest = Sha512::new()
        .chain_update([SUITE, OUTPUT_DOMAIN])
        .chain_update(data)
        .chain_update([TRAILER])
        .finalize();
    let mut beta = [0u8; BETA_LEN];
    beta.copy_from_slice(&digest[..BETA_LEN]);
    beta
}

fn gamma_to_hash(gamma: &EdwardsPoint) -> [u8; BETA_LEN] {
    output_hash(gamma.mul_by_cofactor().compress().as_bytes())
}

/// Derive `beta` from a proof's `gamma` without checking the proof.
///
/// Callers must only trust the result after [`verify`] accepted the proof.
pub fn proof_to_hash(proof: &VrfProof) -> Result<[u8; BETA_LEN], VrfError> {
    let gamma = decode_point(&proof.gamma).ok_or(VrfError::InvalidPoint("gamma"))?;
    Ok(gamma_to_hash(&gamma))
}

/// Prove `alpha` under `secret` with the default latency budget.
pub fn prove(secret: &VrfSecretKey, alpha: &[u8]) -> Result<VrfOutput, VrfError> {
    prove_with_budget(secret, alpha, DEFAULT_PROVE_BUDGET)
}

/// Prove `alpha` under `secret`, warning if it takes longer than `budget`.
pub fn prove_with_budget(
    secret: &VrfSecretKey,
    alpha: &[u8],
    budget: Duration,
) -> Result<VrfOutput, VrfError> {
    let started = Instant::now();

    let expanded = expand_secret(secret);
    let public = EdwardsPoint::mul_base(&expanded.scalar).compress().to_bytes();

    let h = encode_to_curve(&public, alpha)?;
    let h_bytes = h.compress().to_bytes();
    let gamma = expanded.scalar * h;
    let gamma_bytes = gamma.compress().to_bytes();

    let k = nonce(&expanded.nonce_prefix, &h_bytes);
    let u = EdwardsPoint::mul_base(&k).compress().to_bytes();
    let v = (k * h).compress().to_bytes();

    let c = challenge([&public, &h_bytes, &gamma_bytes, &u, &v]);
    let s = k + challenge_scalar(&c) * expanded.scalar;

    let output = VrfOutput {
        beta: gamma_to_hash(&gamma),
        proof: VrfProof {
            gamma: gamma_bytes,
            c,
            s: s.to_bytes(),
            alpha: alpha.to_vec(),
        },
        is_valid: true,
    };

    let elapsed = started.elapsed();
    if elapsed > budget {
        tracing::warn!(
            elapsed_us = elapsed.as_micros() as u64,
            budget_us = budget.as_micros() as u64,
            "VRF proof generation exceeded latency budget"
        );
    }

    Ok(output)
}

fn try_verify(
    public: &VrfPublicKey,
    proof: &VrfProof,
    alpha: &[u8],
) -> Result<[u8; BETA_LEN], VrfError> {
    if !constant_time_eq(&proof.alpha, alpha) {
        return Err(VrfError::AlphaMismatch);
    }

    let y = decode_point(public.as_bytes()).ok_or(VrfError::InvalidPublicKey)?;
    if y.is_small_order() {
        return Err(VrfError::InvalidPublicKey);
    }
    let gamma = decode_point(&proof.gamma).ok_or(VrfError::InvalidPoint("gamma"))?;
    let s = Option::<Scalar>::from(Scalar::from_canonical_bytes(proof.s))
        .ok_or(VrfError::NonCanonicalScalar)?;
    let c = challenge_scalar(&proof.c);

    let h = encode_to_curve(public.as_bytes(), alpha)?;
    let u = EdwardsPoint::mul_base(&s) - c * y;
    let v = s * h - c * gamma;

    let expected = challenge([
        public.as_bytes(),
        h.compress().as_bytes(),
        &proof.gamma,
        u.compress().as_bytes(),
        v.compress().as_bytes(),
    ]);

    if !constant_time_eq(&expected, &proof.c) {
        return Err(VrfError::VerificationFailed);
    }
    Ok(gamma_to_hash(&gamma))
}

/// Verify `proof` for `alpha` under `public`.
///
/// Never fails: malformed keys, points, scalars or a mismatched challenge all
/// yield `is_valid == false` with the zero `beta` sentinel.
pub fn verify(public: &VrfPublicKey, proof: &VrfProof, alpha: &[u8]) -> VrfOutput {
    match try_verify(public, proof, alpha) {
        Ok(beta) => VrfOutput {
            beta,
            proof: proof.clone(),
            is_valid: true,
        },
        Err(err) => {
            tracing::debug!(%err, public_key = %public, "VRF proof rejected");
            VrfOutput::invalid(proof.clone())
        }
    }
}
