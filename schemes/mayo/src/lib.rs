//! # pqsigs-mayo
//!
//! A Rust implementation of the MAYO post-quantum digital signature scheme.
//!
//! ## Overview
//!
//! MAYO is a multivariate quadratic signature scheme built on Oil and
//! Vinegar. The public key is a small oil space hidden inside `m` quadratic
//! forms over GF(16); "whipping" `k` copies of the map together lets the oil
//! space stay far smaller than in plain UOV, which keeps public keys compact.
//! MAYO is a candidate in the NIST additional signatures process.
//!
//! This implementation is intended for **educational and experimental purposes only**.
//!
//! ## Quick Start
//!
//! ```rust
//! use rand::rngs::OsRng;
//! use pqsigs_mayo::{Mayo, SecurityLevel};
//!
//! let mayo = Mayo::new(SecurityLevel::Two).expect("valid level");
//!
//! // Generate and expand a key pair
//! let (cpk, csk) = mayo.compact_key_gen(&mut OsRng).expect("keygen");
//! let esk = mayo.expand_sk(&csk).expect("expand sk");
//! let epk = mayo.expand_pk(&cpk).expect("expand pk");
//!
//! // Sign and verify
//! let msg = b"Hello, post-quantum world!";
//! let sig = mayo.sign(&esk, msg, &mut OsRng).expect("signing should succeed");
//! assert_eq!(mayo.verify(&epk, msg, &sig), Ok(0));
//! ```
//!
//! ## Parameter Sets
//!
//! | Level | n   | m   | o  | k  | cpk (B) | sig (B) |
//! |-------|-----|-----|----|----|---------|---------|
//! | 1     | 86  | 78  | 8  | 10 | 1420    | 454     |
//! | 2     | 81  | 64  | 17 | 4  | 4912    | 186     |
//! | 3     | 118 | 108 | 10 | 11 | 2986    | 681     |
//! | 5     | 154 | 142 | 12 | 12 | 5554    | 964     |
//!
//! ## Modules
//!
//! - [`error`]: Error types
//! - [`field`]: GF(16) arithmetic and bit-sliced m-vector kernels
//! - [`codec`]: Nibble packing
//! - [`params`]: Parameter sets and security levels
//! - [`xof`]: SHAKE256 and AES-128-CTR expansion
//! - [`rng`]: NIST KAT deterministic generator
//! - [`matrix`]: Matrices of m-vectors
//! - [`keygen`]: Key generation and expansion
//! - [`public_map`]: Evaluation and linearization of the public map
//! - [`solver`]: Constant-time linear solver
//! - [`sign`]: Signature generation
//! - [`verify`]: Signature verification
//! - [`api`]: Byte-level interface and signed-message wrappers
//!
//! ## Security Warning
//!
//! Signing is written to run in time independent of secret data, but this
//! implementation has NOT been audited and should NOT be used in production
//! systems.

#![warn(missing_docs)]

pub mod api;
pub mod codec;
pub mod error;
pub mod field;
pub mod keygen;
pub mod matrix;
pub mod params;
pub mod public_map;
pub mod rng;
pub mod sign;
pub mod solver;
pub mod verify;
pub mod xof;

pub use api::{api_sign, api_sign_open, Mayo};
pub use error::{MayoError, Result};
pub use keygen::{
    compact_key_gen, expand_pk, expand_sk, keypair_from_seed, CompactPublicKey, CompactSecretKey,
    ExpandedPublicKey, ExpandedSecretKey,
};
pub use params::{ParameterSet, SecurityLevel};
pub use rng::KatRng;
pub use sign::{sign, Signature};
pub use verify::{verify, verify_bool, verify_signature, ACCEPT, REJECT};
