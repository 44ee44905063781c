//! Constant-time linear solver over GF(16).
//!
//! [`sample_solution`] solves `A·x = y` for an `m x (k·o)` system with
//! `m <= k·o`, returning the solution closest to a random point `r`: the free
//! variables keep the values of `r`. The reduction to echelon form works on
//! rows packed as m-vectors and selects pivots with masks, so the sequence of
//! memory accesses depends only on the dimensions.
//!
//! The pivot search looks at most 32 rows past the expected pivot row and
//! back substitution scans `32 / (m - row)` columns past the diagonal, which
//! covers every system where `k·o - m` is small relative to `m`.

use crate::field::{inv_ct, m_vec_mul_add, mul_ct, mul_fx8, nibble_at};

/// All ones if `a == b`, zero otherwise.
#[inline]
fn ct_eq_mask(a: usize, b: usize) -> u64 {
    let d = (a ^ b) as u64;
    ((d | d.wrapping_neg()) >> 63).wrapping_sub(1)
}

/// All ones if `a > b`, zero otherwise.
#[inline]
fn ct_gt_mask(a: usize, b: usize) -> u64 {
    ((b as i64).wrapping_sub(a as i64) >> 63) as u64
}

/// `0xff` if `a != 0`, zero otherwise.
#[inline]
fn ct_nonzero(a: u8) -> u8 {
    (0i32.wrapping_sub(a as i32) >> 31) as u8
}

/// Reduces a row-major `nrows x ncols` nibble matrix to row echelon form
/// with unit pivots.
pub(crate) fn echelon_form(a: &mut [u8], nrows: usize, ncols: usize) {
    let row_len = ncols.div_ceil(16);
    let mut packed = vec![0u64; nrows * row_len];
    for (row, dst) in a.chunks(ncols).zip(packed.chunks_mut(row_len)) {
        for (j, &x) in row.iter().enumerate() {
            dst[j / 16] |= ((x & 0x0f) as u64) << ((j % 16) * 4);
        }
    }

    let mut pivot_row_data = vec![0u64; row_len];
    let mut normalized = vec![0u64; row_len];
    let mut pivot_row = 0usize;

    for pivot_col in 0..ncols {
        let lower = (pivot_col + nrows).saturating_sub(ncols);
        let upper = (nrows - 1).min(pivot_col);

        pivot_row_data.iter_mut().for_each(|w| *w = 0);
        normalized.iter_mut().for_each(|w| *w = 0);

        // Take the pivot row, or the first row below it with a nonzero
        // entry in this column.
        let mut pivot = 0u8;
        let mut pivot_is_zero = u64::MAX;
        for row in lower..=(nrows - 1).min(upper + 32) {
            let is_pivot_row = ct_eq_mask(row, pivot_row);
            let below = ct_gt_mask(row, pivot_row);
            let mask = is_pivot_row | (below & pivot_is_zero);
            for (dst, &w) in pivot_row_data
                .iter_mut()
                .zip(&packed[row * row_len..(row + 1) * row_len])
            {
                *dst ^= mask & w;
            }
            pivot = nibble_at(&pivot_row_data, pivot_col);
            pivot_is_zero = ct_eq_mask(pivot as usize, 0);
        }

        m_vec_mul_add(&pivot_row_data, inv_ct(pivot), &mut normalized);

        for row in lower..=upper {
            let do_copy = ct_eq_mask(row, pivot_row) & !pivot_is_zero;
            for (dst, &w) in packed[row * row_len..(row + 1) * row_len]
                .iter_mut()
                .zip(&normalized)
            {
                *dst = (!do_copy & *dst) | (do_copy & w);
            }
        }

        for row in lower..nrows {
            let below = ct_gt_mask(row, pivot_row) as u8;
            let dst = &mut packed[row * row_len..(row + 1) * row_len];
            let elt = nibble_at(dst, pivot_col);
            m_vec_mul_add(&normalized, below & elt, dst);
        }

        pivot_row += (!pivot_is_zero & 1) as usize;
    }

    for (row, src) in a.chunks_mut(ncols).zip(packed.chunks(row_len)) {
        for (j, x) in row.iter_mut().enumerate() {
            *x = nibble_at(src, j);
        }
    }
}

/// Solves `A·x = y`, keeping the free variables equal to `r`.
///
/// `a` is `rows x (unknowns + 1)` row-major; its last column is scratch
/// space and is overwritten. Returns `None` when `A` does not have full row
/// rank. `a` is left in echelon form either way.
pub fn sample_solution(
    a: &mut [u8],
    y: &[u8],
    r: &[u8],
    rows: usize,
    unknowns: usize,
) -> Option<Vec<u8>> {
    let a_cols = unknowns + 1;
    debug_assert_eq!(a.len(), rows * a_cols);
    debug_assert!(rows <= unknowns);

    let mut x = r[..unknowns].to_vec();

    // Right-hand side y - A·r
    for (i, row) in a.chunks_mut(a_cols).enumerate() {
        let mut ar = 0u8;
        for (&coeff, &ri) in row[..unknowns].iter().zip(&x) {
            ar ^= mul_ct(coeff, ri);
        }
        row[unknowns] = y[i] ^ ar;
    }

    echelon_form(a, rows, a_cols);

    let last_row = &a[(rows - 1) * a_cols..rows * a_cols - 1];
    if last_row.iter().fold(0u8, |acc, &c| acc | c) == 0 {
        return None;
    }

    for row in (0..rows).rev() {
        let mut finished = 0u8;
        let col_upper = (row + 32 / (rows - row)).min(unknowns - 1);

        for col in row..=col_upper {
            // The first nonzero entry of the row is its unit pivot.
            let correct_column = ct_nonzero(a[row * a_cols + col]) & !finished;
            let u = correct_column & a[row * a_cols + unknowns];
            x[col] ^= u;

            for i in (0..row).step_by(8) {
                let chunk = (i + 8).min(row) - i;
                let mut column = 0u64;
                for j in 0..chunk {
                    column |= (a[(i + j) * a_cols + col] as u64) << (8 * j);
                }
                let update = mul_fx8(u, column);
                for j in 0..chunk {
                    a[(i + j) * a_cols + unknowns] ^= (update >> (8 * j)) as u8 & 0x0f;
                }
            }

            finished |= correct_column;
        }
    }

    Some(x)
}
