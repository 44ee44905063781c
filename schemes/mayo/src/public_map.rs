//! Evaluation of the whipped public map P*.
//!
//! For `k` vectors `s_0..s_{k-1}` the map combines the pairwise values
//! `E_ij = s_iᵗ·P·s_j` (each an m-vector) as
//!
//! ```text
//! P*(s) = Σ_{i <= j} z^ℓ(i,j) · (E_ij + E_ji)      (E_ii counted once)
//! ```
//!
//! in `GF(16)[z] / f(z)`. The exponents are assigned by a Horner walk over
//! pairs (`i` from `k-1` down to `0`, `j` from `i` up to `k-1`), so the last
//! pair visited, `(0, k-1)`, carries `z^0`. Signer and verifier go through the
//! same `fold`, which keeps their exponents in step.

use crate::codec::m_vec_to_nibbles;
use crate::field::{m_vec_add, m_vec_mul_add, mul_ct, nibble_at, xor_nibble};
use crate::keygen::ExpandedPublicKey;
use crate::matrix::{idx_ut, mul_add_bs_mat_x_mat_trans, mul_add_mat_x_bs_mat};
use crate::params::ParameterSet;

/// The linearized system `A·x = y` built for one signing attempt.
///
/// `a` is `m x (k·o + 1)` row-major with a zero last column, ready for
/// [`crate::solver::sample_solution`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinearSystem {
    /// Coefficient matrix with a spare right-hand-side column.
    pub a: Vec<u8>,
    /// Target minus the vinegar-only contribution.
    pub y: Vec<u8>,
}

/// Evaluates and linearizes P* for one parameter set.
#[derive(Clone, Copy, Debug)]
pub struct PublicMapEvaluator<'a> {
    params: &'a ParameterSet,
}

impl<'a> PublicMapEvaluator<'a> {
    /// Creates an evaluator.
    pub fn new(params: &'a ParameterSet) -> Self {
        PublicMapEvaluator { params }
    }

    /// Multiplies an m-vector by `z` modulo `f(z)`.
    fn mul_by_z(&self, acc: &mut [u64]) {
        let m = self.params.m;
        let last = acc.len() - 1;
        let top = nibble_at(acc, m - 1);

        for i in (1..acc.len()).rev() {
            acc[i] = (acc[i] << 4) | (acc[i - 1] >> 60);
        }
        acc[0] <<= 4;
        if m % 16 != 0 {
            acc[last] &= (1u64 << ((m % 16) * 4)) - 1;
        }

        for (t, &coeff) in self.params.tail_f.iter().enumerate() {
            xor_nibble(acc, t, mul_ct(top, coeff));
        }
    }

    /// Horner fold over all pairs `i <= j`.
    ///
    /// `add_pair(i, j, acc)` must add the pair term into `acc`.
    pub(crate) fn fold<T>(&self, mut add_pair: T) -> Vec<u64>
    where
        T: FnMut(usize, usize, &mut [u64]),
    {
        let k = self.params.k;
        let mut acc = vec![0u64; self.params.m_vec_limbs];
        for i in (0..k).rev() {
            for j in i..k {
                self.mul_by_z(&mut acc);
                add_pair(i, j, &mut acc);
            }
        }
        acc
    }

    /// Folds a `k x k` bs matrix of pair values `E`.
    fn fold_pairs(&self, e: &[u64]) -> Vec<u64> {
        let (k, limbs) = (self.params.k, self.params.m_vec_limbs);
        self.fold(|i, j, acc| {
            m_vec_add(&e[(i * k + j) * limbs..][..limbs], acc);
            if i != j {
                m_vec_add(&e[(j * k + i) * limbs..][..limbs], acc);
            }
        })
    }

    /// Computes `P*(s)` for a signature vector `s` of `k·n` nibbles.
    pub fn evaluate(&self, epk: &ExpandedPublicKey, s: &[u8]) -> Vec<u8> {
        let p = self.params;
        let (n, v, o, k, limbs) = (p.n, p.v, p.o, p.k, p.m_vec_limbs);
        debug_assert_eq!(s.len(), k * n);

        // PS[row][a] = Σ_col P[row][col] · s_a[col]
        let mut ps = vec![0u64; n * k * limbs];
        for r in 0..v {
            for c in r..v {
                let entry = &epk.p1[idx_ut(v, r, c) * limbs..][..limbs];
                for a in 0..k {
                    let dst = &mut ps[(r * k + a) * limbs..][..limbs];
                    m_vec_mul_add(entry, s[a * n + c], dst);
                }
            }
            for c in 0..o {
                let entry = &epk.p2[(r * o + c) * limbs..][..limbs];
                for a in 0..k {
                    let dst = &mut ps[(r * k + a) * limbs..][..limbs];
                    m_vec_mul_add(entry, s[a * n + v + c], dst);
                }
            }
        }
        for r in 0..o {
            for c in r..o {
                let entry = &epk.p3[idx_ut(o, r, c) * limbs..][..limbs];
                for a in 0..k {
                    let dst = &mut ps[((v + r) * k + a) * limbs..][..limbs];
                    m_vec_mul_add(entry, s[a * n + v + c], dst);
                }
            }
        }

        // SPS[a][b] = Σ_row s_a[row] · PS[row][b]
        let mut sps = vec![0u64; k * k * limbs];
        for a in 0..k {
            for row in 0..n {
                let coeff = s[a * n + row];
                for b in 0..k {
                    let src = &ps[(row * k + b) * limbs..][..limbs];
                    m_vec_mul_add(src, coeff, &mut sps[(a * k + b) * limbs..][..limbs]);
                }
            }
        }

        m_vec_to_nibbles(&self.fold_pairs(&sps), p.m)
    }

    /// Builds the linear system in the oil variables for fixed vinegar
    /// vectors `vinegar` (`k x v` nibbles) and target `t` (`m` nibbles).
    ///
    /// Every step runs in time independent of `vinegar`, `p1` and `l`.
    pub fn linearize(&self, p1: &[u64], l: &[u64], vinegar: &[u8], t: &[u8]) -> LinearSystem {
        let p = self.params;
        let (m, v, o, k, limbs, a_cols) = (p.m, p.v, p.o, p.k, p.m_vec_limbs, p.a_cols);

        // M_i = v_iᵗ·L, k x o
        let mut vl = vec![0u64; k * o * limbs];
        mul_add_mat_x_bs_mat(limbs, vinegar, l, &mut vl, k, v, o);

        // v_iᵗ·P1·v_j, k x k
        let mut pv = vec![0u64; v * k * limbs];
        mul_add_bs_mat_x_mat_trans(limbs, p1, vinegar, &mut pv, v, v, k, true);
        let mut vpv = vec![0u64; k * k * limbs];
        mul_add_mat_x_bs_mat(limbs, vinegar, &pv, &mut vpv, k, v, k);

        let constant = self.fold_pairs(&vpv);
        let y = (0..m).map(|r| t[r] ^ nibble_at(&constant, r)).collect();

        // Column (block·o + c) collects M_j[c] from pairs (block, j) and
        // M_i[c] from pairs (i, block), i != block.
        let mut a = vec![0u8; m * a_cols];
        for block in 0..k {
            for c in 0..o {
                let column = self.fold(|i, j, acc| {
                    if i == block {
                        m_vec_add(&vl[(j * o + c) * limbs..][..limbs], acc);
                    }
                    if j == block && i != j {
                        m_vec_add(&vl[(i * o + c) * limbs..][..limbs], acc);
                    }
                });
                for r in 0..m {
                    a[r * a_cols + block * o + c] = nibble_at(&column, r);
                }
            }
        }

        LinearSystem { a, y }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{mat_mul, mul, vec_add};
    use crate::keygen::{expand_pk, expand_sk, keypair_from_seed};
    use crate::params::SecurityLevel;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha20Rng;

    /// Reference: multiply a nibble polynomial by z and reduce by f.
    fn mul_by_z_reference(poly: &[u8], tail: &[u8; 4]) -> Vec<u8> {
        let m = poly.len();
        let top = poly[m - 1];
        let mut out = vec![0u8; m];
        out[1..].copy_from_slice(&poly[..m - 1]);
        for (t, &f) in tail.iter().enumerate() {
            out[t] ^= mul(top, f);
        }
        out
    }

    #[test]
    fn test_mul_by_z_matches_reference() {
        for level in SecurityLevel::ALL {
            let params = ParameterSet::new(level).unwrap();
            let eval = PublicMapEvaluator::new(&params);
            let mut rng = ChaCha20Rng::seed_from_u64(level.as_u8() as u64);

            let poly: Vec<u8> = (0..params.m).map(|_| rng.gen_range(0..16)).collect();
            let mut limbs = vec![0u64; params.m_vec_limbs];
            for (i, &x) in poly.iter().enumerate() {
                xor_nibble(&mut limbs, i, x);
            }

            eval.mul_by_z(&mut limbs);
            assert_eq!(
                m_vec_to_nibbles(&limbs, params.m),
                mul_by_z_reference(&poly, &params.tail_f),
                "{level}"
            );
        }
    }

    #[test]
    fn test_fold_exponents() {
        // With a single nonzero pair term equal to 1, the fold yields z^ℓ.
        let params = ParameterSet::new(SecurityLevel::Two).unwrap();
        let eval = PublicMapEvaluator::new(&params);
        let k = params.k;

        let mut visited = Vec::new();
        for i in (0..k).rev() {
            for j in i..k {
                visited.push((i, j));
            }
        }
        let pairs = visited.len();
        for (pos, &(pi, pj)) in visited.iter().enumerate() {
            let out = eval.fold(|i, j, acc| {
                if (i, j) == (pi, pj) {
                    xor_nibble(acc, 0, 1);
                }
            });
            let exponent = pairs - 1 - pos;
            let nibbles = m_vec_to_nibbles(&out, params.m);
            for (idx, &x) in nibbles.iter().enumerate() {
                assert_eq!(x, (idx == exponent) as u8, "pair ({pi},{pj})");
            }
        }
        assert_eq!(visited.last(), Some(&(0, k - 1)));
    }

    /// For any oil assignment x, building s from (vinegar, x) and
    /// evaluating P* must give `t + y + A·x`: the signer's linearization
    /// and the verifier's evaluation describe the same map.
    #[test]
    fn test_linearization_matches_evaluation() {
        let params = ParameterSet::new(SecurityLevel::Two).unwrap();
        let (cpk, csk) = keypair_from_seed(&params, &[5u8; 24]).unwrap();
        let esk = expand_sk(&csk).unwrap();
        let epk = expand_pk(&cpk).unwrap();
        let eval = PublicMapEvaluator::new(&params);
        let (m, n, v, o, k) = (params.m, params.n, params.v, params.o, params.k);

        let mut rng = ChaCha20Rng::seed_from_u64(99);
        let vinegar: Vec<u8> = (0..k * v).map(|_| rng.gen_range(0..16)).collect();
        let x: Vec<u8> = (0..k * o).map(|_| rng.gen_range(0..16)).collect();
        let t: Vec<u8> = (0..m).map(|_| rng.gen_range(0..16)).collect();

        let system = eval.linearize(&esk.p1, &esk.l, &vinegar, &t);

        let mut s = Vec::with_capacity(k * n);
        for i in 0..k {
            let ox = mat_mul(&esk.o, &x[i * o..(i + 1) * o], v, o, 1);
            s.extend(vec_add(&vinegar[i * v..(i + 1) * v], &ox));
            s.extend_from_slice(&x[i * o..(i + 1) * o]);
        }

        let ax: Vec<u8> = (0..m)
            .map(|r| {
                (0..k * o).fold(0u8, |acc, c| acc ^ mul(system.a[r * params.a_cols + c], x[c]))
            })
            .collect();
        let expected: Vec<u8> = (0..m).map(|r| t[r] ^ system.y[r] ^ ax[r]).collect();

        assert_eq!(eval.evaluate(&epk, &s), expected);
        assert!((0..m).all(|r| system.a[r * params.a_cols + k * o] == 0));
    }
}
