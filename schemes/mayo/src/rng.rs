//! Deterministic randomness for known-answer tests.
//!
//! [`KatRng`] is the AES-256 CTR_DRBG used by the NIST PQC submission
//! harness (`randombytes_init` / `randombytes`). Feeding it the seed line of
//! a `.rsp` file reproduces the keys and signatures recorded there.

use aes::cipher::generic_array::GenericArray;
use aes::cipher::{BlockEncrypt, KeyInit};
use aes::Aes256;
use rand::{CryptoRng, RngCore};
use zeroize::Zeroize;

/// Length of the DRBG seed material.
pub const KAT_SEED_BYTES: usize = 48;

/// NIST AES-256 CTR_DRBG without derivation function or prediction resistance.
#[derive(Clone)]
pub struct KatRng {
    key: [u8; 32],
    v: [u8; 16],
}

impl KatRng {
    /// `randombytes_init(entropy, NULL, 256)`.
    pub fn new(entropy: &[u8; KAT_SEED_BYTES]) -> Self {
        Self::with_personalization(entropy, None)
    }

    /// `randombytes_init` with an optional personalization string.
    pub fn with_personalization(
        entropy: &[u8; KAT_SEED_BYTES],
        personalization: Option<&[u8; KAT_SEED_BYTES]>,
    ) -> Self {
        let mut seed_material = *entropy;
        if let Some(p) = personalization {
            for (s, x) in seed_material.iter_mut().zip(p.iter()) {
                *s ^= x;
            }
        }

        let mut rng = KatRng {
            key: [0u8; 32],
            v: [0u8; 16],
        };
        rng.update(Some(&seed_material));
        seed_material.zeroize();
        rng
    }

    /// `randombytes(out, out.len())`.
    ///
    /// Each call ends with a state update, so splitting one request into two
    /// calls yields different bytes.
    pub fn randombytes(&mut self, out: &mut [u8]) {
        let cipher = Aes256::new(GenericArray::from_slice(&self.key));
        for chunk in out.chunks_mut(16) {
            self.increment_v();
            let mut block = GenericArray::clone_from_slice(&self.v);
            cipher.encrypt_block(&mut block);
            chunk.copy_from_slice(&block[..chunk.len()]);
        }
        self.update(None);
    }

    fn increment_v(&mut self) {
        for byte in self.v.iter_mut().rev() {
            if *byte == 0xff {
                *byte = 0;
            } else {
                *byte += 1;
                break;
            }
        }
    }

    fn update(&mut self, provided: Option<&[u8; KAT_SEED_BYTES]>) {
        let cipher = Aes256::new(GenericArray::from_slice(&self.key));
        let mut temp = [0u8; KAT_SEED_BYTES];
        for chunk in temp.chunks_mut(16) {
            self.increment_v();
            let mut block = GenericArray::clone_from_slice(&self.v);
            cipher.encrypt_block(&mut block);
            chunk.copy_from_slice(&block);
        }
        if let Some(data) = provided {
            for (t, d) in temp.iter_mut().zip(data.iter()) {
                *t ^= d;
            }
        }
        self.key.copy_from_slice(&temp[..32]);
        self.v.copy_from_slice(&temp[32..]);
        temp.zeroize();
    }
}

impl Drop for KatRng {
    fn drop(&mut self) {
        self.key.zeroize();
        self.v.zeroize();
    }
}

impl RngCore for KatRng {
    fn next_u32(&mut self) -> u32 {
        let mut buf = [0u8; 4];
        self.randombytes(&mut buf);
        u32::from_le_bytes(buf)
    }

    fn next_u64(&mut self) -> u64 {
        let mut buf = [0u8; 8];
        self.randombytes(&mut buf);
        u64::from_le_bytes(buf)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.randombytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.randombytes(dest);
        Ok(())
    }
}

// Only sound for reproducing test vectors; the seed is public in that setting.
impl CryptoRng for KatRng {}
