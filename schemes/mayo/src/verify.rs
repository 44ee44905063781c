//! MAYO signature verification.

use subtle::ConstantTimeEq;
use tracing::trace;

use crate::codec::decode_vec;
use crate::error::Result;
use crate::keygen::ExpandedPublicKey;
use crate::public_map::PublicMapEvaluator;
use crate::sign::Signature;
use crate::xof::shake256;

/// Verification result for an accepted signature.
pub const ACCEPT: i32 = 0;

/// Verification result for a rejected signature.
pub const REJECT: i32 = -1;

/// Verifies a serialized signature, returning [`ACCEPT`] or [`REJECT`].
///
/// # Errors
///
/// Returns [`crate::MayoError::InvalidLength`] only when `signature` is not
/// `sig_bytes` long; any well-formed signature yields `Ok`.
pub fn verify(epk: &ExpandedPublicKey, message: &[u8], signature: &[u8]) -> Result<i32> {
    let sig = Signature::from_bytes(signature, epk.params)?;
    Ok(verify_signature(epk, message, &sig))
}

/// Verifies a parsed signature, returning [`ACCEPT`] or [`REJECT`].
pub fn verify_signature(epk: &ExpandedPublicKey, message: &[u8], sig: &Signature) -> i32 {
    let p = &epk.params;
    if sig.params != *p {
        trace!(key = %p.level, signature = %sig.params.level, "parameter set mismatch");
        return REJECT;
    }

    let digest = shake256(p.digest_bytes, &[message]);
    let t = decode_vec(p.m, &shake256(p.m_bytes, &[&digest, &sig.salt]));

    let y = PublicMapEvaluator::new(p).evaluate(epk, &sig.s);

    if bool::from(y.ct_eq(&t)) {
        ACCEPT
    } else {
        trace!(level = %p.level, "public map does not match target");
        REJECT
    }
}

/// Like [`verify`], but collapses every failure into `false`.
pub fn verify_bool(epk: &ExpandedPublicKey, message: &[u8], signature: &[u8]) -> bool {
    matches!(verify(epk, message, signature), Ok(ACCEPT))
}
