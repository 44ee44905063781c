//! GF(16) arithmetic modulo x^4 + x + 1.
//!
//! Elements are nibbles (`0..16`) carried in the low four bits of a `u8`.
//! Two flavours of each primitive are provided:
//!
//! - table driven ([`mul`], [`inv`]) for public data, and
//! - branch-free arithmetic ([`mul_ct`], [`inv_ct`]) for anything that
//!   touches secret material.
//!
//! The bottom of the module holds the bit-sliced "m-vector" kernels: an
//! m-vector packs `m` field elements into `⌈m/16⌉` little-endian `u64` limbs,
//! sixteen nibbles per limb, and is scaled or accumulated with a handful of
//! word operations.

// ---------------------------------------------------------------------------
// Scalar primitives
// ---------------------------------------------------------------------------

/// Carry-less product of two nibbles followed by reduction modulo x^4 + x + 1.
///
/// The degree-6 intermediate has its top three bits folded back with
/// `x^4 = x + 1`; no term of the fold reaches bit 4 again.
const fn gf16_mul(a: u8, b: u8) -> u8 {
    let a = a & 0x0f;
    let b = b & 0x0f;
    let mut p = (a & 1) * b;
    p ^= (a & 2) * b;
    p ^= (a & 4) * b;
    p ^= (a & 8) * b;
    let top = p & 0xf0;
    (p ^ (top >> 4) ^ (top >> 3)) & 0x0f
}

const fn build_mul_table() -> [[u8; 16]; 16] {
    let mut table = [[0u8; 16]; 16];
    let mut a = 0;
    while a < 16 {
        let mut b = 0;
        while b < 16 {
            table[a][b] = gf16_mul(a as u8, b as u8);
            b += 1;
        }
        a += 1;
    }
    table
}

const fn build_inv_table(mul: &[[u8; 16]; 16]) -> [u8; 16] {
    let mut table = [0u8; 16];
    let mut a = 1;
    while a < 16 {
        let mut b = 1;
        while b < 16 {
            if mul[a][b] == 1 {
                table[a] = b as u8;
            }
            b += 1;
        }
        a += 1;
    }
    table
}

/// Full 16x16 multiplication table.
pub static MUL_TABLE: [[u8; 16]; 16] = build_mul_table();

/// Inverse table; `INV_TABLE[0] == 0`.
pub static INV_TABLE: [u8; 16] = build_inv_table(&build_mul_table());

/// Table-driven multiplication. Only use on public values.
#[inline]
pub fn mul(a: u8, b: u8) -> u8 {
    MUL_TABLE[(a & 0x0f) as usize][(b & 0x0f) as usize]
}

/// Table-driven inverse. Only use on public values.
#[inline]
pub fn inv(a: u8) -> u8 {
    INV_TABLE[(a & 0x0f) as usize]
}

/// Branch-free multiplication.
#[inline]
pub fn mul_ct(a: u8, b: u8) -> u8 {
    gf16_mul(a, b)
}

/// Branch-free inverse computed as `a^14 = a^8 * a^4 * a^2`.
#[inline]
pub fn inv_ct(a: u8) -> u8 {
    let a2 = mul_ct(a, a);
    let a4 = mul_ct(a2, a2);
    let a8 = mul_ct(a4, a4);
    let a6 = mul_ct(a2, a4);
    mul_ct(a8, a6)
}

// ---------------------------------------------------------------------------
// Nibble vectors and matrices
// ---------------------------------------------------------------------------

/// Element-wise sum of two equally sized vectors.
pub fn vec_add(a: &[u8], b: &[u8]) -> Vec<u8> {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b).map(|(x, y)| x ^ y).collect()
}

/// Scales every element of `a` by `c`.
pub fn vec_scale(c: u8, a: &[u8]) -> Vec<u8> {
    a.iter().map(|&x| mul_ct(c, x)).collect()
}

/// Element-wise sum of two equally sized row-major matrices.
pub fn mat_add(a: &[u8], b: &[u8]) -> Vec<u8> {
    vec_add(a, b)
}

/// Row-major product of an `rows x inner` matrix and an `inner x cols` matrix.
pub fn mat_mul(a: &[u8], b: &[u8], rows: usize, inner: usize, cols: usize) -> Vec<u8> {
    debug_assert_eq!(a.len(), rows * inner);
    debug_assert_eq!(b.len(), inner * cols);

    let mut out = vec![0u8; rows * cols];
    for i in 0..rows {
        for j in 0..cols {
            let mut acc = 0u8;
            for t in 0..inner {
                acc ^= mul_ct(a[i * inner + t], b[t * cols + j]);
            }
            out[i * cols + j] = acc;
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Bit-sliced m-vectors
// ---------------------------------------------------------------------------

/// Mask selecting bit 0 of every nibble in a limb.
const LSB_EACH_NIBBLE: u64 = 0x1111_1111_1111_1111;

const HIGH_NIBBLES: u64 = 0xf0f0_f0f0_f0f0_f0f0;
const LOW_NIBBLES: u64 = 0x0f0f_0f0f_0f0f_0f0f;

/// Packs `b`, `b*x`, `b*x^2`, `b*x^3` into the four bytes of a word.
#[inline]
pub(crate) fn mul_table_word(b: u8) -> u32 {
    let x = ((b & 0x0f) as u32).wrapping_mul(0x0804_0201);
    let high = x & 0xf0f0_f0f0;
    x ^ (high >> 4) ^ (high >> 3)
}

/// `acc += a * input` over all nibbles of an m-vector.
///
/// Runs in time independent of `a`.
#[inline]
pub(crate) fn m_vec_mul_add(input: &[u64], a: u8, acc: &mut [u64]) {
    debug_assert_eq!(input.len(), acc.len());
    let tab = mul_table_word(a) as u64;
    let t0 = tab & 0xff;
    let t1 = (tab >> 8) & 0x0f;
    let t2 = (tab >> 16) & 0x0f;
    let t3 = (tab >> 24) & 0x0f;

    for (dst, &word) in acc.iter_mut().zip(input) {
        *dst ^= (word & LSB_EACH_NIBBLE).wrapping_mul(t0)
            ^ ((word >> 1) & LSB_EACH_NIBBLE).wrapping_mul(t1)
            ^ ((word >> 2) & LSB_EACH_NIBBLE).wrapping_mul(t2)
            ^ ((word >> 3) & LSB_EACH_NIBBLE).wrapping_mul(t3);
    }
}

/// `acc += input` for m-vectors.
#[inline]
pub(crate) fn m_vec_add(input: &[u64], acc: &mut [u64]) {
    debug_assert_eq!(input.len(), acc.len());
    for (dst, &word) in acc.iter_mut().zip(input) {
        *dst ^= word;
    }
}

/// Multiplies eight field elements, one per byte of `b`, by `a`.
#[inline]
pub(crate) fn mul_fx8(a: u8, b: u64) -> u64 {
    let a = a as u64;
    let mut p = (a & 1).wrapping_mul(b);
    p ^= (a & 2).wrapping_mul(b);
    p ^= (a & 4).wrapping_mul(b);
    p ^= (a & 8).wrapping_mul(b);

    let top = p & HIGH_NIBBLES;
    (p ^ (top >> 4) ^ (top >> 3)) & LOW_NIBBLES
}

/// Reads nibble `idx` of a limb array.
#[inline]
pub(crate) fn nibble_at(limbs: &[u64], idx: usize) -> u8 {
    ((limbs[idx / 16] >> ((idx % 16) * 4)) & 0x0f) as u8
}

/// XORs `val` into nibble `idx` of a limb array.
#[inline]
pub(crate) fn xor_nibble(limbs: &mut [u64], idx: usize, val: u8) {
    limbs[idx / 16] ^= ((val & 0x0f) as u64) << ((idx % 16) * 4);
}
