//! Integration tests for the MAYO signature scheme.

use pqsigs_mayo::{
    api_sign, api_sign_open, compact_key_gen, expand_pk, expand_sk, keypair_from_seed, sign,
    verify, verify_bool, CompactPublicKey, ExpandedPublicKey, ExpandedSecretKey, Mayo, MayoError,
    ParameterSet, SecurityLevel, ACCEPT, REJECT,
};
use rand::rngs::OsRng;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

const MESSAGE: &[u8] = b"This is a message.";

fn keys(level: SecurityLevel) -> (ParameterSet, ExpandedSecretKey, ExpandedPublicKey) {
    let params = ParameterSet::new(level).expect("valid level");
    let (cpk, csk) = compact_key_gen(&params, &mut OsRng).expect("keygen");
    let esk = expand_sk(&csk).expect("expand sk");
    let epk = expand_pk(&cpk).expect("expand pk");
    (params, esk, epk)
}

// ============================================================================
// End-to-end per security level
// ============================================================================

fn sign_then_verify(level: SecurityLevel) {
    let (params, esk, epk) = keys(level);
    let sig = sign(&esk, MESSAGE, &mut OsRng).expect("sign should succeed");
    let bytes = sig.to_bytes();

    assert_eq!(bytes.len(), params.sig_bytes);
    assert_eq!(verify(&epk, MESSAGE, &bytes), Ok(ACCEPT), "{level}");
}

#[test]
fn sign_then_verify_level_1() {
    sign_then_verify(SecurityLevel::One);
}

#[test]
fn sign_then_verify_level_2() {
    sign_then_verify(SecurityLevel::Two);
}

#[test]
fn sign_then_verify_level_3() {
    sign_then_verify(SecurityLevel::Three);
}

#[test]
fn sign_then_verify_level_5() {
    sign_then_verify(SecurityLevel::Five);
}

#[test]
fn api_round_trip_every_level() {
    for level in SecurityLevel::ALL {
        let mayo = Mayo::new(level).unwrap();
        let (cpk, csk) = mayo.compact_key_gen(&mut OsRng).unwrap();
        assert_eq!(cpk.len(), mayo.params().cpk_bytes);
        assert_eq!(csk.len(), mayo.params().csk_bytes);

        let signed = mayo.api_sign(MESSAGE, &csk, &mut OsRng).unwrap();
        let (result, opened) = mayo.api_sign_open(&signed, &cpk).unwrap();
        assert_eq!(result, ACCEPT, "{level}");
        assert_eq!(opened.as_deref(), Some(MESSAGE));
    }
}

// ============================================================================
// Tamper sensitivity
// ============================================================================

#[test]
fn verify_rejects_when_message_changes() {
    let (_, esk, epk) = keys(SecurityLevel::One);
    let sig = sign(&esk, MESSAGE, &mut OsRng).unwrap().to_bytes();

    let mut other = MESSAGE.to_vec();
    other[0] ^= 0x01;
    assert_eq!(verify(&epk, &other, &sig), Ok(REJECT));
}

#[test]
fn verify_rejects_when_salt_changes() {
    let (params, esk, epk) = keys(SecurityLevel::One);
    let mut sig = sign(&esk, MESSAGE, &mut OsRng).unwrap().to_bytes();

    sig[params.sig_bytes - params.salt_bytes] ^= 0x01;
    assert_eq!(verify(&epk, MESSAGE, &sig), Ok(REJECT));
}

#[test]
fn verify_rejects_when_signature_vector_changes() {
    let (params, esk, epk) = keys(SecurityLevel::Two);
    let sig = sign(&esk, MESSAGE, &mut OsRng).unwrap().to_bytes();

    // every nibble of s is significant: flip one bit in each half of a few bytes
    for &idx in &[0, 1, params.s_bytes() / 2, params.s_bytes() - 1] {
        for bit in [0x01u8, 0x10] {
            let mut bad = sig.clone();
            bad[idx] ^= bit;
            assert_eq!(verify(&epk, MESSAGE, &bad), Ok(REJECT), "byte {idx} bit {bit:#x}");
        }
    }
}

#[test]
fn verify_rejects_under_other_key() {
    let (_, esk, _) = keys(SecurityLevel::Two);
    let (_, _, other_epk) = keys(SecurityLevel::Two);
    let sig = sign(&esk, MESSAGE, &mut OsRng).unwrap().to_bytes();
    assert!(!verify_bool(&other_epk, MESSAGE, &sig));
}

#[test]
fn signatures_are_randomized() {
    let (_, esk, epk) = keys(SecurityLevel::Two);
    let a = sign(&esk, MESSAGE, &mut OsRng).unwrap();
    let b = sign(&esk, MESSAGE, &mut OsRng).unwrap();
    assert_ne!(a.salt(), b.salt());
    assert!(verify_bool(&epk, MESSAGE, &a.to_bytes()));
    assert!(verify_bool(&epk, MESSAGE, &b.to_bytes()));
}

#[test]
fn multiple_messages_verify() {
    let (_, esk, epk) = keys(SecurityLevel::Two);
    for i in 0..10 {
        let msg = format!("test-{i}");
        let sig = sign(&esk, msg.as_bytes(), &mut OsRng).unwrap().to_bytes();
        assert!(verify_bool(&epk, msg.as_bytes(), &sig));
    }
}

#[test]
fn empty_and_long_messages() {
    let (_, esk, epk) = keys(SecurityLevel::Two);
    let long = vec![0xabu8; 100_000];
    for msg in [&b""[..], &long[..]] {
        let sig = sign(&esk, msg, &mut OsRng).unwrap().to_bytes();
        assert_eq!(verify(&epk, msg, &sig), Ok(ACCEPT));
    }
}

// ============================================================================
// Determinism and serialization
// ============================================================================

#[test]
fn seeded_signing_is_reproducible() {
    let params = ParameterSet::new(SecurityLevel::One).unwrap();
    let (_, csk) = keypair_from_seed(&params, &[0x11u8; 24]).unwrap();
    let esk = expand_sk(&csk).unwrap();

    let a = sign(&esk, MESSAGE, &mut ChaCha20Rng::seed_from_u64(3)).unwrap();
    let b = sign(&esk, MESSAGE, &mut ChaCha20Rng::seed_from_u64(3)).unwrap();
    assert_eq!(a.to_bytes(), b.to_bytes());
}

#[test]
fn compact_public_key_round_trips_through_bytes() {
    let params = ParameterSet::new(SecurityLevel::Three).unwrap();
    let (cpk, csk) = compact_key_gen(&params, &mut OsRng).unwrap();
    let parsed = CompactPublicKey::from_bytes(&cpk.to_bytes(), params).unwrap();
    let epk = expand_pk(&parsed).unwrap();
    let esk = expand_sk(&csk).unwrap();

    let sig = sign(&esk, MESSAGE, &mut OsRng).unwrap().to_bytes();
    assert!(verify_bool(&epk, MESSAGE, &sig));
}

// ============================================================================
// Error handling
// ============================================================================

#[test]
fn wrong_lengths_are_errors() {
    let params = ParameterSet::new(SecurityLevel::One).unwrap();
    let (cpk, csk) = compact_key_gen(&params, &mut OsRng).unwrap();
    let epk = expand_pk(&cpk).unwrap();

    assert!(matches!(
        verify(&epk, MESSAGE, &[0u8; 453]),
        Err(MayoError::InvalidLength { expected: 454, actual: 453, .. })
    ));
    assert!(api_sign(&params, MESSAGE, &csk.as_bytes()[1..], &mut OsRng).is_err());
    assert!(api_sign_open(&params, &[0u8; 100], &cpk.to_bytes()).is_err());
    assert!(api_sign_open(&params, &[0u8; 500], &cpk.to_bytes()[1..]).is_err());
}

#[test]
fn signature_from_another_level_is_rejected() {
    let (_, esk1, _) = keys(SecurityLevel::One);
    let (_, _, epk2) = keys(SecurityLevel::Two);
    let sig = sign(&esk1, MESSAGE, &mut OsRng).unwrap().to_bytes();
    assert!(verify(&epk2, MESSAGE, &sig).is_err());
}

#[test]
fn unsupported_level_is_a_configuration_error() {
    assert!(matches!(
        SecurityLevel::try_from(4),
        Err(MayoError::Configuration { .. })
    ));
    assert!("MAYO_7".parse::<SecurityLevel>().is_err());
}
