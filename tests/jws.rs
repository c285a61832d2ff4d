// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use jose_core::error::Error;
use jose_core::error::Result;
use jose_core::jwa::AlgorithmConstraints;
use jose_core::jwk::Jwk;
use jose_core::jws::Decoder;
use jose_core::jws::Encoder;
use jose_core::jws::JwsAlgorithm;
use jose_core::jws::JwsAlgorithm::*;
use jose_core::jws::JwsHeader;
use jose_core::jws::Token;

mod common;

const __RSA: bool = cfg!(not(feature = "test-rsa-sig"));

const CLAIMS: &[u8] = b"jose_core";

fn keypair(algorithm: JwsAlgorithm) -> (Jwk, Jwk) {
  let secret: Jwk = match algorithm {
    HS256 | HS384 | HS512 => common::oct_jwk(64),
    RS256 | RS384 | RS512 | PS256 | PS384 | PS512 => common::rsa_jwk(),
    ES256 => common::p256_jwk(),
    ES384 => common::p384_jwk(),
    ES512 => common::p521_jwk(),
    ES256K => common::k256_jwk(),
    EdDSA => common::ed25519_jwk(),
    NONE => common::oct_jwk(32),
  };

  // Symmetric keys have no public form; both sides share the secret.
  let public: Jwk = secret.to_public().unwrap_or_else(|| secret.clone());

  (secret, public)
}

fn roundtrip(algorithm: JwsAlgorithm) -> Result<()> {
  let mut header: JwsHeader = JwsHeader::new();
  header.set_alg(algorithm);

  let (secret, public): (Jwk, Jwk) = keypair(algorithm);

  let encoder: Encoder<'_> = Encoder::new().recipient((&secret, &header));
  let decoder: Decoder<'_> = Decoder::new(&public);

  let encoded: String = encoder.encode(CLAIMS)?;
  let decoded: Token = decoder.decode(encoded.as_bytes())?;

  assert_eq!(decoded.protected, header);
  assert_eq!(decoded.claims, CLAIMS);

  Ok(())
}

#[test]
fn test_jws_roundtrip() {
  for alg in JwsAlgorithm::ALL {
    // requires explicit opt-in, covered separately
    if matches!(alg, NONE) {
      continue;
    }

    // skip unless opted-in - rsa keygen is SLOWWWW
    if __RSA && matches!(alg, RS256 | RS384 | RS512 | PS256 | PS384 | PS512) {
      continue;
    }

    roundtrip(*alg).unwrap();
  }
}

#[test]
fn test_jws_tampered_signature() {
  let mut header: JwsHeader = JwsHeader::new();
  header.set_alg(HS256);

  let (secret, _): (Jwk, Jwk) = keypair(HS256);

  let encoded: String = Encoder::new().recipient((&secret, &header)).encode(CLAIMS).unwrap();

  let mut tampered: String = encoded.clone();
  let last: char = tampered.pop().unwrap();
  tampered.push(if last == 'A' { 'B' } else { 'A' });

  let decoder: Decoder<'_> = Decoder::new(&secret);

  assert!(decoder.decode(encoded.as_bytes()).is_ok());
  assert!(matches!(decoder.decode(tampered.as_bytes()), Err(Error::SignatureInvalid)));
}

#[test]
fn test_jws_tampered_payload() {
  let mut header: JwsHeader = JwsHeader::new();
  header.set_alg(EdDSA);

  let (secret, public): (Jwk, Jwk) = keypair(EdDSA);

  let encoded: String = Encoder::new().recipient((&secret, &header)).encode(b"abcdef").unwrap();

  // "abcdef" -> "YWJjZGVm"; swap the payload segment wholesale.
  let tampered: String = {
    let mut parts: Vec<&str> = encoded.split('.').collect();
    parts[1] = "eHljZGVm";
    parts.join(".")
  };

  assert!(matches!(
    Decoder::new(&public).decode(tampered.as_bytes()),
    Err(Error::SignatureInvalid)
  ));
}

#[test]
fn test_jws_none_requires_opt_in() {
  let mut header: JwsHeader = JwsHeader::new();
  header.set_alg(NONE);

  let (secret, _): (Jwk, Jwk) = keypair(NONE);

  // The default constraints refuse `none` on both ends.
  assert!(matches!(
    Encoder::new().recipient((&secret, &header)).encode(CLAIMS),
    Err(Error::AlgorithmConstraintViolated(_))
  ));

  let encoded: String = Encoder::new()
    .algorithm_constraints(AlgorithmConstraints::permit([NONE]))
    .recipient((&secret, &header))
    .encode(CLAIMS)
    .unwrap();

  assert!(encoded.ends_with('.'));

  assert!(matches!(
    Decoder::new(&secret).decode(encoded.as_bytes()),
    Err(Error::AlgorithmConstraintViolated(_))
  ));

  let decoded: Token = Decoder::new(&secret)
    .algorithm_constraints(AlgorithmConstraints::permit([NONE]))
    .decode(encoded.as_bytes())
    .unwrap();

  assert_eq!(decoded.claims, CLAIMS);
}

#[test]
fn test_jws_detached_payload() {
  let mut header: JwsHeader = JwsHeader::new();
  header.set_alg(EdDSA);

  let (secret, public): (Jwk, Jwk) = keypair(EdDSA);

  let encoded: String = Encoder::new()
    .recipient((&secret, &header))
    .detached(true)
    .encode(CLAIMS)
    .unwrap();

  let parts: Vec<&str> = encoded.split('.').collect();
  assert_eq!(parts.len(), 3);
  assert!(parts[1].is_empty());

  let decoded: Token = Decoder::new(&public).payload(CLAIMS).decode(encoded.as_bytes()).unwrap();

  assert_eq!(decoded.claims, CLAIMS);

  // The wrong detached payload must not verify.
  assert!(matches!(
    Decoder::new(&public).payload(b"impostor").decode(encoded.as_bytes()),
    Err(Error::SignatureInvalid)
  ));
}

#[test]
fn test_jws_unknown_critical_header() {
  let mut header: JwsHeader = JwsHeader::new();
  header.set_alg(HS256);
  header.set_crit(["exp"]);

  let (secret, _): (Jwk, Jwk) = keypair(HS256);

  let encoded: String = Encoder::new().recipient((&secret, &header)).encode(CLAIMS).unwrap();

  assert!(matches!(
    Decoder::new(&secret).decode(encoded.as_bytes()),
    Err(Error::UnrecognizedCritical(name)) if name == "exp"
  ));

  let decoded: Token = Decoder::new(&secret).critical("exp").decode(encoded.as_bytes()).unwrap();

  assert_eq!(decoded.claims, CLAIMS);
}

#[test]
fn test_jws_key_algorithm_mismatch() {
  let mut header: JwsHeader = JwsHeader::new();
  header.set_alg(ES256);

  // An Ed25519 key cannot serve an ECDSA algorithm.
  let (secret, _): (Jwk, Jwk) = keypair(EdDSA);

  assert!(matches!(
    Encoder::new().recipient((&secret, &header)).encode(CLAIMS),
    Err(Error::InvalidKey(_))
  ));
}

#[test]
fn test_jws_wrong_curve_rejected() {
  let mut header: JwsHeader = JwsHeader::new();
  header.set_alg(ES384);

  let secret: Jwk = common::p256_jwk();

  assert!(matches!(
    Encoder::new().recipient((&secret, &header)).encode(CLAIMS),
    Err(Error::InvalidKey(_))
  ));
}

#[test]
fn test_jws_hmac_key_too_short() {
  let mut header: JwsHeader = JwsHeader::new();
  header.set_alg(HS512);

  // HS512 requires at least 64 key octets.
  let secret: Jwk = common::oct_jwk(32);

  assert!(matches!(
    Encoder::new().recipient((&secret, &header)).encode(CLAIMS),
    Err(Error::InvalidKey(_))
  ));
}
