//! MAYO signing.
//!
//! 1. `digest = SHAKE256(msg)`, `salt = SHAKE256(digest ‖ R ‖ seedSk)` for
//!    fresh randomness `R`, and the target `t = SHAKE256(digest ‖ salt)`.
//! 2. For each attempt `ctr = 0..256`, derive `k` vinegar vectors and the
//!    solver randomizer from `SHAKE256(digest ‖ salt ‖ seedSk ‖ ctr)`,
//!    linearize P* around the vinegar values and try to solve for the oil
//!    part.
//! 3. On success output `s_i = (v_i + O·x_i) ‖ x_i` for every `i`, followed by
//!    the salt.

use rand::{CryptoRng, RngCore};
use tracing::{debug, error, trace};
use zeroize::Zeroize;

use crate::codec::{decode_vec, encode_vec};
use crate::error::{check_len, MayoError, Result};
use crate::field::{mat_mul, vec_add};
use crate::keygen::ExpandedSecretKey;
use crate::params::ParameterSet;
use crate::public_map::PublicMapEvaluator;
use crate::solver::sample_solution;
use crate::xof::shake256;

/// Number of vinegar resamplings before signing gives up.
pub const MAX_SIGN_ATTEMPTS: u32 = 256;

/// A MAYO signature: `k·n` nibbles and the salt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature {
    pub(crate) params: ParameterSet,
    /// The `k` concatenated vectors `s_i`, one nibble per entry.
    pub(crate) s: Vec<u8>,
    pub(crate) salt: Vec<u8>,
}

impl Signature {
    /// Parameter set this signature belongs to.
    pub fn params(&self) -> &ParameterSet {
        &self.params
    }

    /// The salt.
    pub fn salt(&self) -> &[u8] {
        &self.salt
    }

    /// Serializes the signature.
    ///
    /// Format: encode(s) ‖ salt
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = encode_vec(&self.s);
        bytes.extend(&self.salt);
        bytes
    }

    /// Parses a signature.
    ///
    /// # Errors
    ///
    /// Returns [`MayoError::InvalidLength`] unless `bytes` is exactly
    /// `sig_bytes` long.
    pub fn from_bytes(bytes: &[u8], params: ParameterSet) -> Result<Self> {
        check_len("signature", params.sig_bytes, bytes.len())?;
        let (s, salt) = bytes.split_at(params.s_bytes());
        Ok(Signature {
            params,
            s: decode_vec(params.k * params.n, s),
            salt: salt.to_vec(),
        })
    }
}

/// Signs `message` with an expanded secret key.
///
/// # Errors
///
/// - [`MayoError::Randomness`] if `rng` fails
/// - [`MayoError::SolverExhausted`] if every attempt hit a rank-deficient
///   system, which happens with negligible probability
pub fn sign<R: RngCore + CryptoRng>(
    esk: &ExpandedSecretKey,
    message: &[u8],
    rng: &mut R,
) -> Result<Signature> {
    let p = &esk.params;
    let (m, n, v, o, k) = (p.m, p.n, p.v, p.o, p.k);

    let digest = shake256(p.digest_bytes, &[message]);

    let mut randomizer = vec![0u8; p.salt_bytes];
    rng.try_fill_bytes(&mut randomizer)?;
    let salt = shake256(p.salt_bytes, &[&digest, &randomizer, &esk.seed_sk]);
    randomizer.zeroize();

    let t = decode_vec(m, &shake256(p.m_bytes, &[&digest, &salt]));
    let evaluator = PublicMapEvaluator::new(p);

    for ctr in 0..MAX_SIGN_ATTEMPTS {
        let mut v_and_r = shake256(
            k * p.v_bytes + p.r_bytes,
            &[&digest, &salt, &esk.seed_sk, &[ctr as u8]],
        );
        let mut vinegar = Vec::with_capacity(k * v);
        for chunk in v_and_r[..k * p.v_bytes].chunks(p.v_bytes) {
            vinegar.extend(decode_vec(v, chunk));
        }
        let mut r = decode_vec(k * o, &v_and_r[k * p.v_bytes..]);
        v_and_r.zeroize();

        let mut system = evaluator.linearize(&esk.p1, &esk.l, &vinegar, &t);
        let solution = sample_solution(&mut system.a, &system.y, &r, m, k * o);
        system.a.zeroize();
        system.y.zeroize();
        r.zeroize();

        let Some(mut x) = solution else {
            trace!(attempt = ctr, "linear system rank deficient, resampling vinegar");
            vinegar.zeroize();
            continue;
        };

        let mut s = Vec::with_capacity(k * n);
        for (v_i, x_i) in vinegar.chunks(v).zip(x.chunks(o)) {
            let ox = mat_mul(&esk.o, x_i, v, o, 1);
            s.extend(vec_add(v_i, &ox));
            s.extend_from_slice(x_i);
        }
        vinegar.zeroize();
        x.zeroize();

        debug!(level = %p.level, attempts = ctr + 1, "signed message");
        return Ok(Signature {
            params: *p,
            s,
            salt,
        });
    }

    error!(
        level = %p.level,
        attempts = MAX_SIGN_ATTEMPTS,
        "signing exhausted all attempts; randomness source or parameters are suspect"
    );
    Err(MayoError::SolverExhausted {
        attempts: MAX_SIGN_ATTEMPTS,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keygen::{expand_sk, keypair_from_seed};
    use crate::params::SecurityLevel;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn signing_key() -> ExpandedSecretKey {
        let params = ParameterSet::new(SecurityLevel::Two).unwrap();
        let (_, csk) = keypair_from_seed(&params, &[3u8; 24]).unwrap();
        expand_sk(&csk).unwrap()
    }

    #[test]
    fn test_signature_length() {
        let esk = signing_key();
        let sig = sign(&esk, b"message", &mut ChaCha20Rng::seed_from_u64(1)).unwrap();
        assert_eq!(sig.to_bytes().len(), esk.params.sig_bytes);
        assert_eq!(sig.salt().len(), esk.params.salt_bytes);
    }

    #[test]
    fn test_same_randomness_same_signature() {
        let esk = signing_key();
        let a = sign(&esk, b"message", &mut ChaCha20Rng::seed_from_u64(5)).unwrap();
        let b = sign(&esk, b"message", &mut ChaCha20Rng::seed_from_u64(5)).unwrap();
        assert_eq!(a, b);

        let c = sign(&esk, b"message", &mut ChaCha20Rng::seed_from_u64(6)).unwrap();
        assert_ne!(a.salt(), c.salt());
    }

    #[test]
    fn test_signature_bytes_round_trip() {
        let esk = signing_key();
        let sig = sign(&esk, b"", &mut ChaCha20Rng::seed_from_u64(8)).unwrap();
        let parsed = Signature::from_bytes(&sig.to_bytes(), esk.params).unwrap();
        assert_eq!(parsed, sig);
        assert!(Signature::from_bytes(&sig.to_bytes()[1..], esk.params).is_err());
    }

    struct FailingRng;

    impl RngCore for FailingRng {
        fn next_u32(&mut self) -> u32 {
            0
        }
        fn next_u64(&mut self) -> u64 {
            0
        }
        fn fill_bytes(&mut self, _dest: &mut [u8]) {}
        fn try_fill_bytes(&mut self, _dest: &mut [u8]) -> std::result::Result<(), rand::Error> {
            Err(rand::Error::new("entropy unavailable"))
        }
    }

    impl CryptoRng for FailingRng {}

    #[test]
    fn test_rng_failure_is_reported() {
        let esk = signing_key();
        assert!(matches!(
            sign(&esk, b"message", &mut FailingRng),
            Err(MayoError::Randomness(_))
        ));
    }
}
