//! Matrices whose entries are bit-sliced m-vectors.
//!
//! A "bs matrix" stores one m-vector (`limbs` words) per entry, row-major.
//! Upper-triangular bs matrices store only the entries with `col >= row`,
//! in the same row-major walk used by [`idx_ut`]. The other operand of each
//! product is a plain row-major matrix of GF(16) nibbles.
//!
//! Every kernel accumulates into `acc` through `m_vec_mul_add`, so its
//! running time depends only on the dimensions.

use crate::field::{m_vec_add, m_vec_mul_add};

/// Index of entry `(i, j)`, `i <= j`, of an `n x n` upper-triangular matrix
/// stored as a flat vector.
#[inline]
pub fn idx_ut(n: usize, i: usize, j: usize) -> usize {
    debug_assert!(i <= j, "idx_ut requires i <= j");
    i * n - (i * (i + 1)) / 2 + j
}

#[inline]
fn entry(data: &[u64], idx: usize, limbs: usize) -> &[u64] {
    &data[idx * limbs..(idx + 1) * limbs]
}

#[inline]
fn entry_mut(data: &mut [u64], idx: usize, limbs: usize) -> &mut [u64] {
    &mut data[idx * limbs..(idx + 1) * limbs]
}

/// `acc (rows x mat_cols) += B · M` where `B` is a `rows x cols` bs matrix
/// (upper triangular when `triangular`) and `M` is `cols x mat_cols`.
#[allow(clippy::too_many_arguments)]
pub(crate) fn mul_add_bs_mat_x_mat(
    limbs: usize,
    bs_mat: &[u64],
    mat: &[u8],
    acc: &mut [u64],
    rows: usize,
    cols: usize,
    mat_cols: usize,
    triangular: bool,
) {
    let mut used = 0;
    for r in 0..rows {
        let start = if triangular { r } else { 0 };
        for c in start..cols {
            let b = entry(bs_mat, used, limbs);
            for k in 0..mat_cols {
                m_vec_mul_add(
                    b,
                    mat[c * mat_cols + k],
                    entry_mut(acc, r * mat_cols + k, limbs),
                );
            }
            used += 1;
        }
    }
}

/// `acc (rows x mat_rows) += B · Mᵗ` where `B` is a `rows x cols` bs matrix
/// (upper triangular when `triangular`) and `M` is `mat_rows x cols`.
#[allow(clippy::too_many_arguments)]
pub(crate) fn mul_add_bs_mat_x_mat_trans(
    limbs: usize,
    bs_mat: &[u64],
    mat: &[u8],
    acc: &mut [u64],
    rows: usize,
    cols: usize,
    mat_rows: usize,
    triangular: bool,
) {
    let mut used = 0;
    for r in 0..rows {
        let start = if triangular { r } else { 0 };
        for c in start..cols {
            let b = entry(bs_mat, used, limbs);
            for k in 0..mat_rows {
                m_vec_mul_add(b, mat[k * cols + c], entry_mut(acc, r * mat_rows + k, limbs));
            }
            used += 1;
        }
    }
}

/// `acc (mat_cols x bs_cols) += Mᵗ · B` where `M` is `mat_rows x mat_cols`
/// and `B` is a full `mat_rows x bs_cols` bs matrix.
pub(crate) fn mul_add_mat_trans_x_bs_mat(
    limbs: usize,
    mat: &[u8],
    bs_mat: &[u64],
    acc: &mut [u64],
    mat_rows: usize,
    mat_cols: usize,
    bs_cols: usize,
) {
    for r in 0..mat_cols {
        for c in 0..mat_rows {
            let a = mat[c * mat_cols + r];
            for k in 0..bs_cols {
                m_vec_mul_add(
                    entry(bs_mat, c * bs_cols + k, limbs),
                    a,
                    entry_mut(acc, r * bs_cols + k, limbs),
                );
            }
        }
    }
}

/// `acc (mat_rows x bs_cols) += M · B` where `M` is `mat_rows x mat_cols`
/// and `B` is a full `mat_cols x bs_cols` bs matrix.
pub(crate) fn mul_add_mat_x_bs_mat(
    limbs: usize,
    mat: &[u8],
    bs_mat: &[u64],
    acc: &mut [u64],
    mat_rows: usize,
    mat_cols: usize,
    bs_cols: usize,
) {
    for r in 0..mat_rows {
        for c in 0..mat_cols {
            let a = mat[r * mat_cols + c];
            for k in 0..bs_cols {
                m_vec_mul_add(
                    entry(bs_mat, c * bs_cols + k, limbs),
                    a,
                    entry_mut(acc, r * bs_cols + k, limbs),
                );
            }
        }
    }
}

/// Folds a full `size x size` bs matrix into upper-triangular form:
/// off-diagonal entries become `in[r][c] + in[c][r]`, the diagonal is kept.
pub(crate) fn upper(limbs: usize, input: &[u64], size: usize) -> Vec<u64> {
    let mut out = vec![0u64; size * (size + 1) / 2 * limbs];
    let mut used = 0;
    for r in 0..size {
        for c in r..size {
            let dst = entry_mut(&mut out, used, limbs);
            dst.copy_from_slice(entry(input, r * size + c, limbs));
            if r != c {
                m_vec_add(entry(input, c * size + r, limbs), dst);
            }
            used += 1;
        }
    }
    out
}
