//! Nibble packing and bit-sliced m-vector serialization.
//!
//! Byte streams always carry two field elements per byte, the element with
//! the lower index in the low nibble. An odd trailing element occupies the
//! low nibble of the final byte on its own.

use crate::field::nibble_at;

/// Packs nibbles two per byte, low nibble first.
pub fn encode_vec(nibbles: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(nibbles.len().div_ceil(2));
    for pair in nibbles.chunks(2) {
        let lo = pair[0] & 0x0f;
        let hi = pair.get(1).map_or(0, |&b| b & 0x0f);
        out.push(lo | (hi << 4));
    }
    out
}

/// Unpacks `len` nibbles from `bytes`.
///
/// `bytes` must hold at least `⌈len/2⌉` bytes; anything past that is ignored.
pub fn decode_vec(len: usize, bytes: &[u8]) -> Vec<u8> {
    debug_assert!(
        bytes.len() >= len.div_ceil(2),
        "decode_vec: {} bytes cannot hold {} nibbles",
        bytes.len(),
        len
    );
    (0..len)
        .map(|i| {
            let byte = bytes[i / 2];
            if i % 2 == 0 {
                byte & 0x0f
            } else {
                byte >> 4
            }
        })
        .collect()
}

/// Walk order over the entries of a `rows x cols` matrix, optionally
/// restricted to the upper triangle (`col >= row`).
fn entries(rows: usize, cols: usize, upper: bool) -> impl Iterator<Item = (usize, usize)> {
    (0..rows).flat_map(move |r| {
        let start = if upper { r } else { 0 };
        (start..cols).map(move |c| (r, c))
    })
}

/// Serializes `m` same-shaped row-major matrices.
///
/// Entries are visited row-major (upper triangle only when `upper` is set)
/// and each visited entry contributes one nibble per matrix, matrix order.
pub fn encode_matrices(rows: usize, cols: usize, mats: &[Vec<u8>], upper: bool) -> Vec<u8> {
    let mut nibbles = Vec::new();
    for (r, c) in entries(rows, cols, upper) {
        nibbles.extend(mats.iter().map(|mat| mat[r * cols + c]));
    }
    encode_vec(&nibbles)
}

/// Inverse of [`encode_matrices`]; entries below the diagonal of an upper
/// encoding come back as zero.
pub fn decode_matrices(
    m: usize,
    rows: usize,
    cols: usize,
    bytes: &[u8],
    upper: bool,
) -> Vec<Vec<u8>> {
    let count = entries(rows, cols, upper).count();
    let nibbles = decode_vec(count * m, bytes);
    let mut mats = vec![vec![0u8; rows * cols]; m];
    for (slot, (r, c)) in entries(rows, cols, upper).enumerate() {
        for (layer, mat) in mats.iter_mut().enumerate() {
            mat[r * cols + c] = nibbles[slot * m + layer];
        }
    }
    mats
}

/// Number of `u64` limbs holding one m-vector.
#[inline]
pub const fn m_vec_limbs(m: usize) -> usize {
    m.div_ceil(16)
}

/// Unpacks `count` m-vectors of `m / 2` bytes each into limbs.
///
/// `m` must be even. Limb bytes are little-endian and the unused high
/// nibbles of the last limb stay zero.
pub(crate) fn unpack_m_vecs(bytes: &[u8], count: usize, m: usize) -> Vec<u64> {
    let limbs = m_vec_limbs(m);
    let vec_bytes = m / 2;
    let mut out = vec![0u64; count * limbs];
    for (i, chunk) in bytes.chunks(vec_bytes).take(count).enumerate() {
        let dst = &mut out[i * limbs..(i + 1) * limbs];
        for (b, &byte) in chunk.iter().enumerate() {
            dst[b / 8] |= (byte as u64) << (8 * (b % 8));
        }
    }
    out
}

/// Inverse of [`unpack_m_vecs`].
pub(crate) fn pack_m_vecs(data: &[u64], count: usize, m: usize) -> Vec<u8> {
    let limbs = m_vec_limbs(m);
    let vec_bytes = m / 2;
    let mut out = Vec::with_capacity(count * vec_bytes);
    for vec in data.chunks(limbs).take(count) {
        out.extend((0..vec_bytes).map(|b| (vec[b / 8] >> (8 * (b % 8))) as u8));
    }
    out
}

/// Extracts the `m` nibbles of a single m-vector.
pub(crate) fn m_vec_to_nibbles(limbs: &[u64], m: usize) -> Vec<u8> {
    (0..m).map(|i| nibble_at(limbs, i)).collect()
}
