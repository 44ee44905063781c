//! Key generation and key expansion for MAYO.
//!
//! # Key Structure
//!
//! - **Compact secret key**: seedSk (`sk_seed_bytes`)
//! - **Compact public key**: seedPk ‖ P3 (upper triangular, packed)
//! - **Expanded secret key**: seedSk ‖ O ‖ P1 ‖ L
//! - **Expanded public key**: P1 ‖ P2 ‖ P3
//!
//! From seedSk everything else is derived:
//!
//! ```text
//! seedPk ‖ O  = SHAKE256(seedSk)
//! P1 ‖ P2     = AES-128-CTR(seedPk)
//! P3          = Upper(Oᵗ·(P1·O + P2))
//! L           = (P1 + P1ᵗ)·O + P2
//! ```
//!
//! P1, P2, P3 and L are bs matrices (see [`crate::matrix`]): every entry
//! is an m-vector holding one coefficient of each of the `m` public
//! quadratic forms.

use std::fmt;

use rand::{CryptoRng, RngCore};
use subtle::{Choice, ConstantTimeEq};
use tracing::debug;
use zeroize::Zeroize;

use crate::codec::{decode_vec, encode_vec, pack_m_vecs, unpack_m_vecs};
use crate::error::{check_len, Result};
use crate::field::m_vec_mul_add;
use crate::matrix::{mul_add_bs_mat_x_mat, mul_add_mat_trans_x_bs_mat, upper};
use crate::params::ParameterSet;
use crate::xof::{aes128_ctr, shake256};

/// Compact secret key: the secret seed.
///
/// Equality compares the seed in constant time.
#[derive(Clone)]
pub struct CompactSecretKey {
    pub(crate) params: ParameterSet,
    pub(crate) seed_sk: Vec<u8>,
}

impl CompactSecretKey {
    /// Parameter set this key belongs to.
    pub fn params(&self) -> &ParameterSet {
        &self.params
    }

    /// Serialized form (the seed itself).
    pub fn as_bytes(&self) -> &[u8] {
        &self.seed_sk
    }

    /// Parses a compact secret key.
    ///
    /// # Errors
    ///
    /// Returns [`crate::MayoError::InvalidLength`] if `bytes` is not
    /// `csk_bytes` long.
    pub fn from_bytes(bytes: &[u8], params: ParameterSet) -> Result<Self> {
        check_len("compact secret key", params.csk_bytes, bytes.len())?;
        Ok(CompactSecretKey {
            params,
            seed_sk: bytes.to_vec(),
        })
    }
}

impl ConstantTimeEq for CompactSecretKey {
    fn ct_eq(&self, other: &Self) -> Choice {
        Choice::from((self.params == other.params) as u8) & self.seed_sk.ct_eq(&other.seed_sk)
    }
}

impl PartialEq for CompactSecretKey {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for CompactSecretKey {}

impl Drop for CompactSecretKey {
    fn drop(&mut self) {
        self.seed_sk.zeroize();
    }
}

impl fmt::Debug for CompactSecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompactSecretKey")
            .field("level", &self.params.level)
            .finish_non_exhaustive()
    }
}

/// Compact public key: seedPk and the packed upper-triangular P3.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompactPublicKey {
    pub(crate) params: ParameterSet,
    pub(crate) seed_pk: Vec<u8>,
    pub(crate) p3: Vec<u64>,
}

impl CompactPublicKey {
    /// Parameter set this key belongs to.
    pub fn params(&self) -> &ParameterSet {
        &self.params
    }

    /// Serializes the key.
    ///
    /// Format: seedPk ‖ P3
    pub fn to_bytes(&self) -> Vec<u8> {
        let p = &self.params;
        let mut bytes = Vec::with_capacity(p.cpk_bytes);
        bytes.extend(&self.seed_pk);
        bytes.extend(pack_m_vecs(&self.p3, p.p3_vecs(), p.m));
        bytes
    }

    /// Parses a compact public key.
    ///
    /// # Errors
    ///
    /// Returns [`crate::MayoError::InvalidLength`] on a size mismatch.
    pub fn from_bytes(bytes: &[u8], params: ParameterSet) -> Result<Self> {
        check_len("compact public key", params.cpk_bytes, bytes.len())?;
        let (seed_pk, p3) = bytes.split_at(params.pk_seed_bytes);
        Ok(CompactPublicKey {
            params,
            seed_pk: seed_pk.to_vec(),
            p3: unpack_m_vecs(p3, params.p3_vecs(), params.m),
        })
    }
}

/// Expanded secret key, everything the signer needs.
///
/// Equality compares every component in constant time.
#[derive(Clone)]
pub struct ExpandedSecretKey {
    pub(crate) params: ParameterSet,
    pub(crate) seed_sk: Vec<u8>,
    /// Oil matrix, `v x o` nibbles, row-major.
    pub(crate) o: Vec<u8>,
    pub(crate) p1: Vec<u64>,
    pub(crate) l: Vec<u64>,
}

impl ExpandedSecretKey {
    /// Parameter set this key belongs to.
    pub fn params(&self) -> &ParameterSet {
        &self.params
    }

    /// Serializes the key.
    ///
    /// Format: seedSk ‖ O ‖ P1 ‖ L
    pub fn to_bytes(&self) -> Vec<u8> {
        let p = &self.params;
        let mut bytes = Vec::with_capacity(p.esk_bytes);
        bytes.extend(&self.seed_sk);
        bytes.extend(encode_vec(&self.o));
        bytes.extend(pack_m_vecs(&self.p1, p.p1_vecs(), p.m));
        bytes.extend(pack_m_vecs(&self.l, p.p2_vecs(), p.m));
        bytes
    }

    /// Parses an expanded secret key.
    ///
    /// # Errors
    ///
    /// Returns [`crate::MayoError::InvalidLength`] on a size mismatch.
    pub fn from_bytes(bytes: &[u8], params: ParameterSet) -> Result<Self> {
        check_len("expanded secret key", params.esk_bytes, bytes.len())?;
        let (seed_sk, rest) = bytes.split_at(params.sk_seed_bytes);
        let (o, rest) = rest.split_at(params.o_bytes);
        let (p1, l) = rest.split_at(params.p1_bytes);
        Ok(ExpandedSecretKey {
            params,
            seed_sk: seed_sk.to_vec(),
            o: decode_vec(params.v * params.o, o),
            p1: unpack_m_vecs(p1, params.p1_vecs(), params.m),
            l: unpack_m_vecs(l, params.p2_vecs(), params.m),
        })
    }
}

impl ConstantTimeEq for ExpandedSecretKey {
    fn ct_eq(&self, other: &Self) -> Choice {
        Choice::from((self.params == other.params) as u8)
            & self.seed_sk.ct_eq(&other.seed_sk)
            & self.o.ct_eq(&other.o)
            & self.p1.ct_eq(&other.p1)
            & self.l.ct_eq(&other.l)
    }
}

impl PartialEq for ExpandedSecretKey {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for ExpandedSecretKey {}

impl Drop for ExpandedSecretKey {
    fn drop(&mut self) {
        self.seed_sk.zeroize();
        self.o.zeroize();
        self.l.zeroize();
    }
}

impl fmt::Debug for ExpandedSecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExpandedSecretKey")
            .field("level", &self.params.level)
            .finish_non_exhaustive()
    }
}

/// Expanded public key, everything the verifier needs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExpandedPublicKey {
    pub(crate) params: ParameterSet,
    pub(crate) p1: Vec<u64>,
    pub(crate) p2: Vec<u64>,
    pub(crate) p3: Vec<u64>,
}

impl ExpandedPublicKey {
    /// Parameter set this key belongs to.
    pub fn params(&self) -> &ParameterSet {
        &self.params
    }

    /// Serializes the key.
    ///
    /// Format: P1 ‖ P2 ‖ P3
    pub fn to_bytes(&self) -> Vec<u8> {
        let p = &self.params;
        let mut bytes = Vec::with_capacity(p.epk_bytes);
        bytes.extend(pack_m_vecs(&self.p1, p.p1_vecs(), p.m));
        bytes.extend(pack_m_vecs(&self.p2, p.p2_vecs(), p.m));
        bytes.extend(pack_m_vecs(&self.p3, p.p3_vecs(), p.m));
        bytes
    }

    /// Parses an expanded public key.
    ///
    /// # Errors
    ///
    /// Returns [`crate::MayoError::InvalidLength`] on a size mismatch.
    pub fn from_bytes(bytes: &[u8], params: ParameterSet) -> Result<Self> {
        check_len("expanded public key", params.epk_bytes, bytes.len())?;
        let (p1, rest) = bytes.split_at(params.p1_bytes);
        let (p2, p3) = rest.split_at(params.p2_bytes);
        Ok(ExpandedPublicKey {
            params,
            p1: unpack_m_vecs(p1, params.p1_vecs(), params.m),
            p2: unpack_m_vecs(p2, params.p2_vecs(), params.m),
            p3: unpack_m_vecs(p3, params.p3_vecs(), params.m),
        })
    }
}

/// Generates a fresh compact key pair.
///
/// # Errors
///
/// Returns [`crate::MayoError::Randomness`] if `rng` fails.
pub fn compact_key_gen<R: RngCore + CryptoRng>(
    params: &ParameterSet,
    rng: &mut R,
) -> Result<(CompactPublicKey, CompactSecretKey)> {
    let mut seed_sk = vec![0u8; params.sk_seed_bytes];
    rng.try_fill_bytes(&mut seed_sk)?;
    let keys = keypair_from_seed(params, &seed_sk);
    seed_sk.zeroize();
    keys
}

/// Deterministically derives a compact key pair from a secret seed.
///
/// # Errors
///
/// Returns [`crate::MayoError::InvalidLength`] if `seed_sk` is not
/// `sk_seed_bytes` long.
pub fn keypair_from_seed(
    params: &ParameterSet,
    seed_sk: &[u8],
) -> Result<(CompactPublicKey, CompactSecretKey)> {
    check_len("secret key seed", params.sk_seed_bytes, seed_sk.len())?;

    let (seed_pk, mut o) = derive_seed_pk_and_oil(params, seed_sk);
    let (p1, mut p2) = expand_p1_p2(params, &seed_pk)?;
    let p3 = compute_p3(params, &p1, &mut p2, &o);
    o.zeroize();
    p2.zeroize();

    debug!(level = %params.level, "generated compact key pair");

    Ok((
        CompactPublicKey {
            params: *params,
            seed_pk,
            p3,
        },
        CompactSecretKey {
            params: *params,
            seed_sk: seed_sk.to_vec(),
        },
    ))
}

/// Expands a compact secret key into the signer's representation.
///
/// # Errors
///
/// Fails only if the public seed cannot key AES, which the parameter set
/// rules out.
pub fn expand_sk(csk: &CompactSecretKey) -> Result<ExpandedSecretKey> {
    let params = &csk.params;
    let (seed_pk, o) = derive_seed_pk_and_oil(params, &csk.seed_sk);
    let (p1, mut l) = expand_p1_p2(params, &seed_pk)?;
    compute_l(params, &p1, &mut l, &o);

    debug!(level = %params.level, "expanded secret key");

    Ok(ExpandedSecretKey {
        params: *params,
        seed_sk: csk.seed_sk.clone(),
        o,
        p1,
        l,
    })
}

/// Expands a compact public key into the verifier's representation.
///
/// # Errors
///
/// Fails only if the public seed cannot key AES.
pub fn expand_pk(cpk: &CompactPublicKey) -> Result<ExpandedPublicKey> {
    let params = &cpk.params;
    let (p1, p2) = expand_p1_p2(params, &cpk.seed_pk)?;

    debug!(level = %params.level, "expanded public key");

    Ok(ExpandedPublicKey {
        params: *params,
        p1,
        p2,
        p3: cpk.p3.clone(),
    })
}

/// `seedPk ‖ O = SHAKE256(seedSk)`; returns seedPk and O as `v x o` nibbles.
fn derive_seed_pk_and_oil(params: &ParameterSet, seed_sk: &[u8]) -> (Vec<u8>, Vec<u8>) {
    let mut s = shake256(params.pk_seed_bytes + params.o_bytes, &[seed_sk]);
    let seed_pk = s[..params.pk_seed_bytes].to_vec();
    let o = decode_vec(params.v * params.o, &s[params.pk_seed_bytes..]);
    s.zeroize();
    (seed_pk, o)
}

/// `P1 ‖ P2 = AES-128-CTR(seedPk)`, unpacked into bs matrices.
fn expand_p1_p2(params: &ParameterSet, seed_pk: &[u8]) -> Result<(Vec<u64>, Vec<u64>)> {
    let bytes = aes128_ctr(seed_pk, params.p1_bytes + params.p2_bytes)?;
    let (p1, p2) = bytes.split_at(params.p1_bytes);
    Ok((
        unpack_m_vecs(p1, params.p1_vecs(), params.m),
        unpack_m_vecs(p2, params.p2_vecs(), params.m),
    ))
}

/// Computes `P3 = Upper(Oᵗ·(P1·O + P2))`. `p2` is overwritten with
/// `P1·O + P2`.
fn compute_p3(params: &ParameterSet, p1: &[u64], p2: &mut [u64], o: &[u8]) -> Vec<u64> {
    let (v, od, limbs) = (params.v, params.o, params.m_vec_limbs);

    mul_add_bs_mat_x_mat(limbs, p1, o, p2, v, v, od, true);

    let mut p3_full = vec![0u64; od * od * limbs];
    mul_add_mat_trans_x_bs_mat(limbs, o, p2, &mut p3_full, v, od, od);
    let p3 = upper(limbs, &p3_full, od);
    p3_full.zeroize();
    p3
}

/// Computes `L = (P1 + P1ᵗ)·O + P2` in place of `acc`, which holds P2.
///
/// The diagonal of `P1 + P1ᵗ` vanishes in characteristic 2, so only the
/// strict upper triangle contributes, once per side.
fn compute_l(params: &ParameterSet, p1: &[u64], acc: &mut [u64], o: &[u8]) {
    let (v, od, limbs) = (params.v, params.o, params.m_vec_limbs);
    let mut used = 0;
    for r in 0..v {
        for c in r..v {
            if c == r {
                used += 1;
                continue;
            }
            let entry = &p1[used * limbs..(used + 1) * limbs];
            for k in 0..od {
                m_vec_mul_add(
                    entry,
                    o[c * od + k],
                    &mut acc[(r * od + k) * limbs..(r * od + k + 1) * limbs],
                );
                m_vec_mul_add(
                    entry,
                    o[r * od + k],
                    &mut acc[(c * od + k) * limbs..(c * od + k + 1) * limbs],
                );
            }
            used += 1;
        }
    }
}
