//! MAYO parameter sets for NIST security levels 1, 2, 3 and 5.
//!
//! A parameter set is defined by a handful of primitives:
//! - `n`: number of variables, `o`: oil dimension, `v = n - o`
//! - `m`: number of equations (size of an m-vector)
//! - `k`: whipping parameter, the number of vectors in a signature
//! - byte lengths for the salt, the message digest and the public seed
//! - `tail_f`: the low coefficients of the reduction polynomial
//!   `f(z) = z^m + Σ tail_f[i]·z^i` over GF(16)
//!
//! Everything else (key, signature and intermediate sizes) is derived once in
//! [`ParameterSet::new`] and exposed as read-only fields.

use std::fmt;
use std::str::FromStr;

use crate::codec::m_vec_limbs;
use crate::error::{MayoError, Result};

/// NIST security level of a MAYO parameter set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SecurityLevel {
    /// MAYO_1, comparable to AES-128.
    One,
    /// MAYO_2, comparable to AES-128 with smaller signatures.
    Two,
    /// MAYO_3, comparable to AES-192.
    Three,
    /// MAYO_5, comparable to AES-256.
    Five,
}

impl SecurityLevel {
    /// All supported levels in ascending order.
    pub const ALL: [SecurityLevel; 4] = [
        SecurityLevel::One,
        SecurityLevel::Two,
        SecurityLevel::Three,
        SecurityLevel::Five,
    ];

    /// The numeric level (1, 2, 3 or 5).
    pub const fn as_u8(self) -> u8 {
        match self {
            SecurityLevel::One => 1,
            SecurityLevel::Two => 2,
            SecurityLevel::Three => 3,
            SecurityLevel::Five => 5,
        }
    }

    /// The primitive constants of this level.
    pub const fn base(self) -> BaseParams {
        match self {
            SecurityLevel::One => MAYO_1,
            SecurityLevel::Two => MAYO_2,
            SecurityLevel::Three => MAYO_3,
            SecurityLevel::Five => MAYO_5,
        }
    }
}

impl TryFrom<u8> for SecurityLevel {
    type Error = MayoError;

    fn try_from(level: u8) -> Result<Self> {
        match level {
            1 => Ok(SecurityLevel::One),
            2 => Ok(SecurityLevel::Two),
            3 => Ok(SecurityLevel::Three),
            5 => Ok(SecurityLevel::Five),
            _ => Err(MayoError::Configuration {
                reason: "unsupported security level, expected 1, 2, 3 or 5",
            }),
        }
    }
}

impl FromStr for SecurityLevel {
    type Err = MayoError;

    /// Accepts `"1"`, `"MAYO_1"`, `"mayo1"`, `"mayo-1"` and so on.
    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_ascii_lowercase();
        let digits = lower
            .strip_prefix("mayo")
            .unwrap_or(&lower)
            .trim_start_matches(['_', '-']);
        let level: u8 = digits.parse().map_err(|_| MayoError::Configuration {
            reason: "unrecognized security level name",
        })?;
        SecurityLevel::try_from(level)
    }
}

impl fmt::Display for SecurityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MAYO_{}", self.as_u8())
    }
}

/// The primitive constants a parameter set is derived from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BaseParams {
    /// Number of variables.
    pub n: usize,
    /// Number of equations.
    pub m: usize,
    /// Oil dimension.
    pub o: usize,
    /// Whipping parameter.
    pub k: usize,
    /// Field size; only 16 is supported.
    pub q: usize,
    /// Salt length in bytes (also the secret seed length).
    pub salt_bytes: usize,
    /// Message digest length in bytes.
    pub digest_bytes: usize,
    /// Public seed length in bytes (an AES-128 key).
    pub pk_seed_bytes: usize,
    /// Low coefficients of the reduction polynomial.
    pub tail_f: [u8; 4],
}

/// MAYO_1 primitives.
pub const MAYO_1: BaseParams = BaseParams {
    n: 86,
    m: 78,
    o: 8,
    k: 10,
    q: 16,
    salt_bytes: 24,
    digest_bytes: 32,
    pk_seed_bytes: 16,
    tail_f: [8, 1, 1, 0],
};

/// MAYO_2 primitives.
pub const MAYO_2: BaseParams = BaseParams {
    n: 81,
    m: 64,
    o: 17,
    k: 4,
    q: 16,
    salt_bytes: 24,
    digest_bytes: 32,
    pk_seed_bytes: 16,
    tail_f: [8, 0, 2, 8],
};

/// MAYO_3 primitives.
pub const MAYO_3: BaseParams = BaseParams {
    n: 118,
    m: 108,
    o: 10,
    k: 11,
    q: 16,
    salt_bytes: 32,
    digest_bytes: 48,
    pk_seed_bytes: 16,
    tail_f: [8, 0, 1, 7],
};

/// MAYO_5 primitives.
pub const MAYO_5: BaseParams = BaseParams {
    n: 154,
    m: 142,
    o: 12,
    k: 12,
    q: 16,
    salt_bytes: 40,
    digest_bytes: 64,
    pk_seed_bytes: 16,
    tail_f: [4, 0, 8, 1],
};

/// A fully derived MAYO parameter set.
///
/// Values are immutable once built; construct them with
/// [`ParameterSet::new`] or [`ParameterSet::custom`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub struct ParameterSet {
    /// Level this set was built for.
    pub level: SecurityLevel,
    /// Field size (always 16).
    pub q: usize,
    /// Number of equations.
    pub m: usize,
    /// Number of variables.
    pub n: usize,
    /// Oil dimension.
    pub o: usize,
    /// Vinegar dimension, `n - o`.
    pub v: usize,
    /// Whipping parameter.
    pub k: usize,
    /// Low coefficients of the reduction polynomial.
    pub tail_f: [u8; 4],

    /// Salt length.
    pub salt_bytes: usize,
    /// Message digest length.
    pub digest_bytes: usize,
    /// Public seed length.
    pub pk_seed_bytes: usize,
    /// Secret seed length (equal to the salt length).
    pub sk_seed_bytes: usize,

    /// Packed oil matrix, `⌈v·o/2⌉`.
    pub o_bytes: usize,
    /// One packed vinegar vector, `⌈v/2⌉`.
    pub v_bytes: usize,
    /// Packed solver randomizer, `⌈k·o/2⌉`.
    pub r_bytes: usize,
    /// One packed m-vector, `⌈m/2⌉`.
    pub m_bytes: usize,

    /// Packed P1 (upper triangular `v x v` of m-vectors).
    pub p1_bytes: usize,
    /// Packed P2 (`v x o` of m-vectors).
    pub p2_bytes: usize,
    /// Packed P3 (upper triangular `o x o` of m-vectors).
    pub p3_bytes: usize,
    /// Packed L (`v x o` of m-vectors).
    pub l_bytes: usize,

    /// Compact secret key size.
    pub csk_bytes: usize,
    /// Expanded secret key size.
    pub esk_bytes: usize,
    /// Compact public key size.
    pub cpk_bytes: usize,
    /// Expanded public key size.
    pub epk_bytes: usize,
    /// Signature size (packed `s` followed by the salt).
    pub sig_bytes: usize,

    /// `u64` limbs per m-vector, `⌈m/16⌉`.
    pub m_vec_limbs: usize,
    /// Columns of the augmented linear system, `k·o + 1`.
    pub a_cols: usize,
}

impl ParameterSet {
    /// Builds the parameter set for a security level.
    ///
    /// # Errors
    ///
    /// Never fails for the built-in levels; the `Result` mirrors
    /// [`ParameterSet::custom`].
    pub fn new(level: SecurityLevel) -> Result<Self> {
        Self::custom(level, &level.base())
    }

    /// Derives a parameter set from explicit primitives.
    ///
    /// # Errors
    ///
    /// Returns [`MayoError::Configuration`] if:
    /// - `q != 16`
    /// - `o` or `k` is zero, or `o >= n`
    /// - `k >= v`
    /// - `m` is odd or not larger than the reduction tail
    /// - the public seed is not an AES-128 key
    pub fn custom(level: SecurityLevel, base: &BaseParams) -> Result<Self> {
        if base.q != 16 {
            return Err(MayoError::Configuration {
                reason: "only GF(16) is supported (q must be 16)",
            });
        }
        if base.o == 0 || base.k == 0 {
            return Err(MayoError::Configuration {
                reason: "oil dimension o and whipping parameter k must be positive",
            });
        }
        if base.o >= base.n {
            return Err(MayoError::Configuration {
                reason: "oil dimension o must be smaller than n",
            });
        }
        let v = base.n - base.o;
        if base.k >= v {
            return Err(MayoError::Configuration {
                reason: "whipping parameter k must be smaller than v",
            });
        }
        if base.m % 2 != 0 || base.m <= base.tail_f.len() {
            return Err(MayoError::Configuration {
                reason: "m must be even and larger than the reduction tail",
            });
        }
        if base.pk_seed_bytes != 16 {
            return Err(MayoError::Configuration {
                reason: "public seed must be 16 bytes (AES-128 key)",
            });
        }

        let (n, m, o, k) = (base.n, base.m, base.o, base.k);
        let m_bytes = m.div_ceil(2);
        let p1_bytes = v * (v + 1) / 2 * m_bytes;
        let p2_bytes = v * o * m_bytes;
        let p3_bytes = o * (o + 1) / 2 * m_bytes;
        let o_bytes = (v * o).div_ceil(2);
        let sk_seed_bytes = base.salt_bytes;

        Ok(ParameterSet {
            level,
            q: base.q,
            m,
            n,
            o,
            v,
            k,
            tail_f: base.tail_f,
            salt_bytes: base.salt_bytes,
            digest_bytes: base.digest_bytes,
            pk_seed_bytes: base.pk_seed_bytes,
            sk_seed_bytes,
            o_bytes,
            v_bytes: v.div_ceil(2),
            r_bytes: (k * o).div_ceil(2),
            m_bytes,
            p1_bytes,
            p2_bytes,
            p3_bytes,
            l_bytes: p2_bytes,
            csk_bytes: sk_seed_bytes,
            esk_bytes: sk_seed_bytes + o_bytes + p1_bytes + p2_bytes,
            cpk_bytes: base.pk_seed_bytes + p3_bytes,
            epk_bytes: p1_bytes + p2_bytes + p3_bytes,
            sig_bytes: (n * k).div_ceil(2) + base.salt_bytes,
            m_vec_limbs: m_vec_limbs(m),
            a_cols: k * o + 1,
        })
    }

    /// Number of m-vectors in P1.
    #[inline]
    pub const fn p1_vecs(&self) -> usize {
        self.v * (self.v + 1) / 2
    }

    /// Number of m-vectors in P2 (and in L).
    #[inline]
    pub const fn p2_vecs(&self) -> usize {
        self.v * self.o
    }

    /// Number of m-vectors in P3.
    #[inline]
    pub const fn p3_vecs(&self) -> usize {
        self.o * (self.o + 1) / 2
    }

    /// Byte length of the packed signature vector `s`.
    #[inline]
    pub const fn s_bytes(&self) -> usize {
        (self.n * self.k).div_ceil(2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Expected {
        level: SecurityLevel,
        limbs: usize,
        o_bytes: usize,
        p1: usize,
        p2: usize,
        p3: usize,
        cpk: usize,
        sig: usize,
    }

    const EXPECTED: [Expected; 4] = [
        Expected {
            level: SecurityLevel::One,
            limbs: 5,
            o_bytes: 312,
            p1: 120159,
            p2: 24336,
            p3: 1404,
            cpk: 1420,
            sig: 454,
        },
        Expected {
            level: SecurityLevel::Two,
            limbs: 4,
            o_bytes: 544,
            p1: 66560,
            p2: 34816,
            p3: 4896,
            cpk: 4912,
            sig: 186,
        },
        Expected {
            level: SecurityLevel::Three,
            limbs: 7,
            o_bytes: 540,
            p1: 317844,
            p2: 58320,
            p3: 2970,
            cpk: 2986,
            sig: 681,
        },
        Expected {
            level: SecurityLevel::Five,
            limbs: 9,
            o_bytes: 852,
            p1: 720863,
            p2: 120984,
            p3: 5538,
            cpk: 5554,
            sig: 964,
        },
    ];

    #[test]
    fn test_derived_sizes() {
        for e in EXPECTED.iter() {
            let p = ParameterSet::new(e.level).unwrap();
            assert_eq!(p.m_vec_limbs, e.limbs, "{}", e.level);
            assert_eq!(p.o_bytes, e.o_bytes, "{}", e.level);
            assert_eq!(p.p1_bytes, e.p1, "{}", e.level);
            assert_eq!(p.p2_bytes, e.p2, "{}", e.level);
            assert_eq!(p.p3_bytes, e.p3, "{}", e.level);
            assert_eq!(p.cpk_bytes, e.cpk, "{}", e.level);
            assert_eq!(p.sig_bytes, e.sig, "{}", e.level);
            assert_eq!(p.csk_bytes, p.salt_bytes);
            assert_eq!(p.epk_bytes, e.p1 + e.p2 + e.p3);
            assert_eq!(p.esk_bytes, p.sk_seed_bytes + e.o_bytes + e.p1 + e.p2);
            assert_eq!(p.a_cols, p.k * p.o + 1);
        }
    }

    #[test]
    fn test_level_one_primitives() {
        let p = ParameterSet::new(SecurityLevel::One).unwrap();
        assert_eq!((p.n, p.m, p.o, p.k, p.v), (86, 78, 8, 10, 78));
        assert_eq!(p.v_bytes, 39);
        assert_eq!(p.r_bytes, 40);
        assert_eq!(p.m_bytes, 39);
        assert_eq!(p.tail_f, [8, 1, 1, 0]);
    }

    #[test]
    fn test_rejects_wrong_field() {
        let base = BaseParams { q: 7, ..MAYO_1 };
        assert!(matches!(
            ParameterSet::custom(SecurityLevel::One, &base),
            Err(MayoError::Configuration { .. })
        ));
    }

    #[test]
    fn test_rejects_k_not_below_v() {
        // v = 10 - 2 = 8
        let base = BaseParams {
            n: 10,
            o: 2,
            k: 8,
            ..MAYO_1
        };
        assert!(matches!(
            ParameterSet::custom(SecurityLevel::One, &base),
            Err(MayoError::Configuration { .. })
        ));
        let base = BaseParams { k: 7, ..base };
        assert!(ParameterSet::custom(SecurityLevel::One, &base).is_ok());
    }

    #[test]
    fn test_rejects_odd_m() {
        let base = BaseParams { m: 77, ..MAYO_1 };
        assert!(ParameterSet::custom(SecurityLevel::One, &base).is_err());
    }

    #[test]
    fn test_level_parsing() {
        assert_eq!(SecurityLevel::try_from(3).unwrap(), SecurityLevel::Three);
        assert!(SecurityLevel::try_from(4).is_err());
        assert_eq!("MAYO_5".parse::<SecurityLevel>().unwrap(), SecurityLevel::Five);
        assert_eq!("mayo2".parse::<SecurityLevel>().unwrap(), SecurityLevel::Two);
        assert_eq!("1".parse::<SecurityLevel>().unwrap(), SecurityLevel::One);
        assert!("mayo".parse::<SecurityLevel>().is_err());
        assert!("MAYO_4".parse::<SecurityLevel>().is_err());
        assert_eq!(SecurityLevel::Three.to_string(), "MAYO_3");
    }

    #[test]
    fn test_levels_coexist() {
        let sets: Vec<ParameterSet> = SecurityLevel::ALL
            .iter()
            .map(|&l| ParameterSet::new(l).unwrap())
            .collect();
        assert_eq!(sets.len(), 4);
        assert_ne!(sets[0], sets[1]);
        assert_eq!(sets[2].level, SecurityLevel::Three);
    }
}
