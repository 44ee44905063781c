//! Symmetric expansion primitives: SHAKE256 and AES-128-CTR.

use aes::cipher::{KeyIvInit, StreamCipher};
use sha3::digest::{ExtendableOutput, Update, XofReader};
use sha3::Shake256;

use crate::error::{MayoError, Result};

type Aes128Ctr = ctr::Ctr128BE<aes::Aes128>;

/// Squeezes `output_len` bytes of SHAKE256 over the concatenated inputs.
pub fn shake256(output_len: usize, inputs: &[&[u8]]) -> Vec<u8> {
    let mut hasher = Shake256::default();
    for input in inputs {
        hasher.update(input);
    }
    let mut reader = hasher.finalize_xof();
    let mut out = vec![0u8; output_len];
    reader.read(&mut out);
    out
}

/// Expands a 16-byte seed with AES-128 in counter mode.
///
/// The counter block starts at zero and is incremented as a 128-bit
/// big-endian integer; the output is the raw keystream.
pub fn aes128_ctr(seed: &[u8], output_len: usize) -> Result<Vec<u8>> {
    let iv = [0u8; 16];
    let mut cipher =
        Aes128Ctr::new_from_slices(seed, &iv).map_err(|_| MayoError::InvalidLength {
            what: "public seed",
            expected: 16,
            actual: seed.len(),
        })?;
    let mut out = vec![0u8; output_len];
    cipher.apply_keystream(&mut out);
    Ok(out)
}
