//! Byte-oriented interface.
//!
//! [`Mayo`] bundles a parameter set with the operations on serialized keys,
//! and the `api_*` functions follow the NIST submission convention where a
//! signed message is `signature ‖ message`.

use rand::{CryptoRng, RngCore};

use crate::error::{MayoError, Result};
use crate::keygen::{
    compact_key_gen, expand_pk, expand_sk, CompactPublicKey, CompactSecretKey, ExpandedPublicKey,
    ExpandedSecretKey,
};
use crate::params::{ParameterSet, SecurityLevel};
use crate::sign::sign;
use crate::verify::{verify, ACCEPT};

/// MAYO for one parameter set, operating on byte strings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Mayo {
    params: ParameterSet,
}

impl Mayo {
    /// Selects a security level.
    ///
    /// # Errors
    ///
    /// Propagates [`MayoError::Configuration`] from parameter derivation.
    pub fn new(level: SecurityLevel) -> Result<Self> {
        Ok(Mayo {
            params: ParameterSet::new(level)?,
        })
    }

    /// Wraps an existing parameter set.
    pub fn with_params(params: ParameterSet) -> Self {
        Mayo { params }
    }

    /// The parameter set in use.
    pub fn params(&self) -> &ParameterSet {
        &self.params
    }

    /// Generates `(cpk, csk)`.
    ///
    /// # Errors
    ///
    /// Returns [`MayoError::Randomness`] if `rng` fails.
    pub fn compact_key_gen<R: RngCore + CryptoRng>(
        &self,
        rng: &mut R,
    ) -> Result<(Vec<u8>, Vec<u8>)> {
        let (cpk, csk) = compact_key_gen(&self.params, rng)?;
        Ok((cpk.to_bytes(), csk.as_bytes().to_vec()))
    }

    /// Expands a compact secret key.
    ///
    /// # Errors
    ///
    /// Returns [`MayoError::InvalidLength`] for a malformed `csk`.
    pub fn expand_sk(&self, csk: &[u8]) -> Result<Vec<u8>> {
        let csk = CompactSecretKey::from_bytes(csk, self.params)?;
        Ok(expand_sk(&csk)?.to_bytes())
    }

    /// Expands a compact public key.
    ///
    /// # Errors
    ///
    /// Returns [`MayoError::InvalidLength`] for a malformed `cpk`.
    pub fn expand_pk(&self, cpk: &[u8]) -> Result<Vec<u8>> {
        let cpk = CompactPublicKey::from_bytes(cpk, self.params)?;
        Ok(expand_pk(&cpk)?.to_bytes())
    }

    /// Signs `message` with an expanded secret key.
    ///
    /// # Errors
    ///
    /// See [`crate::sign::sign`]; additionally rejects a malformed `esk`.
    pub fn sign<R: RngCore + CryptoRng>(
        &self,
        esk: &[u8],
        message: &[u8],
        rng: &mut R,
    ) -> Result<Vec<u8>> {
        let esk = ExpandedSecretKey::from_bytes(esk, self.params)?;
        Ok(sign(&esk, message, rng)?.to_bytes())
    }

    /// Verifies a signature with an expanded public key; `0` accepts, `-1`
    /// rejects.
    ///
    /// # Errors
    ///
    /// Returns [`MayoError::InvalidLength`] for a malformed `epk` or
    /// `signature`.
    pub fn verify(&self, epk: &[u8], message: &[u8], signature: &[u8]) -> Result<i32> {
        let epk = ExpandedPublicKey::from_bytes(epk, self.params)?;
        verify(&epk, message, signature)
    }

    /// See [`api_sign`].
    ///
    /// # Errors
    ///
    /// See [`api_sign`].
    pub fn api_sign<R: RngCore + CryptoRng>(
        &self,
        message: &[u8],
        csk: &[u8],
        rng: &mut R,
    ) -> Result<Vec<u8>> {
        api_sign(&self.params, message, csk, rng)
    }

    /// See [`api_sign_open`].
    ///
    /// # Errors
    ///
    /// See [`api_sign_open`].
    pub fn api_sign_open(&self, signed: &[u8], cpk: &[u8]) -> Result<(i32, Option<Vec<u8>>)> {
        api_sign_open(&self.params, signed, cpk)
    }
}

/// Signs with a compact secret key and returns `signature ‖ message`.
///
/// # Errors
///
/// Returns [`MayoError::InvalidLength`] for a malformed `csk`, or any error
/// of [`crate::sign::sign`].
pub fn api_sign<R: RngCore + CryptoRng>(
    params: &ParameterSet,
    message: &[u8],
    csk: &[u8],
    rng: &mut R,
) -> Result<Vec<u8>> {
    let csk = CompactSecretKey::from_bytes(csk, *params)?;
    let esk = expand_sk(&csk)?;
    let mut signed = sign(&esk, message, rng)?.to_bytes();
    signed.extend_from_slice(message);
    Ok(signed)
}

/// Opens `signature ‖ message` with a compact public key.
///
/// Returns `(0, Some(message))` on acceptance and `(-1, None)` on rejection.
///
/// # Errors
///
/// Returns [`MayoError::InvalidLength`] if `cpk` has the wrong size or
/// `signed` is shorter than a signature.
pub fn api_sign_open(
    params: &ParameterSet,
    signed: &[u8],
    cpk: &[u8],
) -> Result<(i32, Option<Vec<u8>>)> {
    if signed.len() < params.sig_bytes {
        return Err(MayoError::InvalidLength {
            what: "signed message",
            expected: params.sig_bytes,
            actual: signed.len(),
        });
    }
    let cpk = CompactPublicKey::from_bytes(cpk, *params)?;
    let epk = expand_pk(&cpk)?;

    let (signature, message) = signed.split_at(params.sig_bytes);
    let result = verify(&epk, message, signature)?;
    if result == ACCEPT {
        Ok((result, Some(message.to_vec())))
    } else {
        Ok((result, None))
    }
}
