// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use jose_core::error::Error;
use jose_core::error::Result;
use jose_core::jwa::AlgorithmConstraints;
use jose_core::jwe::Decoder;
use jose_core::jwe::Encoder;
use jose_core::jwe::JweAlgorithm;
use jose_core::jwe::JweAlgorithm::*;
use jose_core::jwe::JweCompression;
use jose_core::jwe::JweEncryption;
use jose_core::jwe::JweHeader;
use jose_core::jwe::Token;
use jose_core::jwk::Jwk;
use jose_core::utils::decode_b64;
use jose_core::utils::encode_b64;

mod common;

const __RSA: bool = cfg!(not(feature = "test-rsa-enc"));

const CLAIMS: &[u8] = b"jose_core";

fn keypair(algorithm: JweAlgorithm, encryption: JweEncryption) -> (Jwk, Jwk) {
  let secret: Jwk = match algorithm {
    DIR => common::oct_jwk(encryption.key_len()),
    A128KW | A128GCMKW => common::oct_jwk(16),
    A192KW | A192GCMKW => common::oct_jwk(24),
    A256KW | A256GCMKW => common::oct_jwk(32),
    PBES2_HS256_A128KW | PBES2_HS384_A192KW | PBES2_HS512_A256KW => common::oct_jwk(20),
    RSA1_5 | RSA_OAEP | RSA_OAEP_256 => common::rsa_jwk(),
    ECDH_ES | ECDH_ES_A128KW | ECDH_ES_A192KW | ECDH_ES_A256KW => common::p256_jwk(),
  };

  let public: Jwk = secret.to_public().unwrap_or_else(|| secret.clone());

  (secret, public)
}

fn roundtrip(algorithm: JweAlgorithm, encryption: JweEncryption) -> Result<()> {
  let header: JweHeader = JweHeader::new(algorithm, encryption);
  let (secret, public): (Jwk, Jwk) = keypair(algorithm, encryption);

  let encoder: Encoder<'_> = Encoder::new()
    .algorithm_constraints(AlgorithmConstraints::NoConstraints)
    .protected(&header)
    .recipient(&public);

  let decoder: Decoder<'_> = Decoder::new(&secret).algorithm_constraints(AlgorithmConstraints::NoConstraints);

  let encoded: String = encoder.encode(CLAIMS)?;
  let decoded: Token = decoder.decode(encoded.as_bytes())?;

  assert_eq!(decoded.0.alg(), header.alg());
  assert_eq!(decoded.0.enc(), header.enc());
  assert_eq!(decoded.1, CLAIMS);

  Ok(())
}

#[test]
fn test_jwe_roundtrip() {
  for alg in JweAlgorithm::ALL {
    // skip unless opted-in - rsa keygen is SLOWWWW
    if __RSA && matches!(alg, RSA1_5 | RSA_OAEP | RSA_OAEP_256) {
      continue;
    }

    for enc in JweEncryption::ALL {
      roundtrip(*alg, *enc).unwrap();
    }
  }
}

#[test]
fn test_jwe_roundtrip_x25519() {
  for alg in [ECDH_ES, ECDH_ES_A128KW, ECDH_ES_A192KW, ECDH_ES_A256KW] {
    let header: JweHeader = JweHeader::new(alg, JweEncryption::A256GCM);
    let secret: Jwk = common::x25519_jwk();
    let public: Jwk = secret.to_public().unwrap();

    let encoded: String = Encoder::new().protected(&header).recipient(&public).encode(CLAIMS).unwrap();
    let decoded: Token = Decoder::new(&secret).decode(encoded.as_bytes()).unwrap();

    assert_eq!(decoded.1, CLAIMS);
  }
}

#[test]
fn test_jwe_agreement_party_info() {
  let mut header: JweHeader = JweHeader::new(ECDH_ES, JweEncryption::A128CBC_HS256);
  header.set_apu(encode_b64(b"Alice"));
  header.set_apv(encode_b64(b"Bob"));

  let secret: Jwk = common::p256_jwk();
  let public: Jwk = secret.to_public().unwrap();

  let encoded: String = Encoder::new().protected(&header).recipient(&public).encode(CLAIMS).unwrap();
  let decoded: Token = Decoder::new(&secret).decode(encoded.as_bytes()).unwrap();

  assert_eq!(decoded.0.apu(), header.apu());
  assert_eq!(decoded.0.apv(), header.apv());
  assert!(decoded.0.epk().is_some());
  assert_eq!(decoded.1, CLAIMS);
}

#[test]
fn test_jwe_tampered_tag() {
  let header: JweHeader = JweHeader::new(DIR, JweEncryption::A128CBC_HS256);
  let secret: Jwk = common::oct_jwk(32);

  let encoded: String = Encoder::new().protected(&header).recipient(&secret).encode(CLAIMS).unwrap();

  let mut tampered: String = encoded.clone();
  let last: char = tampered.pop().unwrap();
  tampered.push(if last == 'A' { 'B' } else { 'A' });

  let decoder: Decoder<'_> = Decoder::new(&secret);

  assert!(decoder.decode(encoded.as_bytes()).is_ok());
  assert!(matches!(decoder.decode(tampered.as_bytes()), Err(Error::IntegrityFailure)));
}

#[test]
fn test_jwe_tampered_ciphertext_gcm() {
  let header: JweHeader = JweHeader::new(DIR, JweEncryption::A256GCM);
  let secret: Jwk = common::oct_jwk(32);

  let encoded: String = Encoder::new().protected(&header).recipient(&secret).encode(CLAIMS).unwrap();

  let tampered: String = {
    let mut parts: Vec<String> = encoded.split('.').map(ToString::to_string).collect();
    let mut ciphertext: Vec<u8> = decode_b64(&parts[3]).unwrap();
    ciphertext[0] ^= 0x01;
    parts[3] = encode_b64(&ciphertext);
    parts.join(".")
  };

  assert!(matches!(
    Decoder::new(&secret).decode(tampered.as_bytes()),
    Err(Error::IntegrityFailure)
  ));
}

#[test]
fn test_jwe_wrong_kek_masked() {
  let header: JweHeader = JweHeader::new(A256KW, JweEncryption::A128GCM);
  let secret: Jwk = common::oct_jwk(32);
  let wrong: Jwk = common::oct_jwk(32);

  let encoded: String = Encoder::new().protected(&header).recipient(&secret).encode(CLAIMS).unwrap();

  // The unwrap failure is indistinguishable from a content tag failure.
  assert!(matches!(
    Decoder::new(&wrong).decode(encoded.as_bytes()),
    Err(Error::IntegrityFailure)
  ));
}

#[test]
fn test_jwe_pbes2_requires_opt_in() {
  let mut header: JweHeader = JweHeader::new(PBES2_HS512_A256KW, JweEncryption::A128CBC_HS256);
  header.set_p2s("8Q1SzinasR3xchYz6ZZcHA");
  header.set_p2c(8192u64);

  let password: &[u8] = "entrap_o\u{2013}peter_long\u{2013}credit_tun".as_bytes();
  let secret: Jwk = Jwk::from_params(jose_core::jwk::JwkParamsOct {
    k: encode_b64(password),
  });

  // The default constraints refuse PBES2 on both ends.
  assert!(matches!(
    Encoder::new().protected(&header).recipient(&secret).encode(CLAIMS),
    Err(Error::AlgorithmConstraintViolated(_))
  ));

  let encoded: String = Encoder::new()
    .algorithm_constraints(AlgorithmConstraints::NoConstraints)
    .protected(&header)
    .recipient(&secret)
    .encode(CLAIMS)
    .unwrap();

  assert!(matches!(
    Decoder::new(&secret).decode(encoded.as_bytes()),
    Err(Error::AlgorithmConstraintViolated(_))
  ));

  let decoded: Token = Decoder::new(&secret)
    .algorithm_constraints(AlgorithmConstraints::NoConstraints)
    .decode(encoded.as_bytes())
    .unwrap();

  assert_eq!(decoded.0.p2s(), Some("8Q1SzinasR3xchYz6ZZcHA"));
  assert_eq!(decoded.0.p2c(), Some(8192));
  assert_eq!(decoded.1, CLAIMS);
}

#[test]
fn test_jwe_pbes2_generates_salt_and_count() {
  let header: JweHeader = JweHeader::new(PBES2_HS256_A128KW, JweEncryption::A128GCM);
  let secret: Jwk = common::oct_jwk(20);

  let encoded: String = Encoder::new()
    .algorithm_constraints(AlgorithmConstraints::NoConstraints)
    .protected(&header)
    .recipient(&secret)
    .encode(CLAIMS)
    .unwrap();

  let decoded: Token = Decoder::new(&secret)
    .algorithm_constraints(AlgorithmConstraints::NoConstraints)
    .decode(encoded.as_bytes())
    .unwrap();

  assert!(decode_b64(decoded.0.p2s().unwrap()).unwrap().len() >= 12);
  assert!(decoded.0.p2c().unwrap() >= 1000);
  assert_eq!(decoded.1, CLAIMS);
}

#[test]
fn test_jwe_pbes2_count_ceiling() {
  let mut header: JweHeader = JweHeader::new(PBES2_HS256_A128KW, JweEncryption::A128GCM);
  header.set_p2c(8192u64);

  let secret: Jwk = common::oct_jwk(20);

  let encoded: String = Encoder::new()
    .algorithm_constraints(AlgorithmConstraints::NoConstraints)
    .protected(&header)
    .recipient(&secret)
    .encode(CLAIMS)
    .unwrap();

  // A ceiling below the declared count bounds the attacker-controlled work.
  assert!(matches!(
    Decoder::new(&secret)
      .algorithm_constraints(AlgorithmConstraints::NoConstraints)
      .max_pbes2_count(1000)
      .decode(encoded.as_bytes()),
    Err(Error::AlgorithmConstraintViolated(_))
  ));
}

#[test]
fn test_jwe_off_curve_epk_rejected() {
  let header: JweHeader = JweHeader::new(ECDH_ES, JweEncryption::A128CBC_HS256);
  let secret: Jwk = common::p256_jwk();
  let public: Jwk = secret.to_public().unwrap();

  let encoded: String = Encoder::new().protected(&header).recipient(&public).encode(CLAIMS).unwrap();

  // Corrupt the `y` coordinate of the ephemeral key; the point no longer
  // satisfies the curve equation.
  let tampered: String = {
    let mut parts: Vec<String> = encoded.split('.').map(ToString::to_string).collect();
    let mut header: serde_json::Value = serde_json::from_slice(&decode_b64(&parts[0]).unwrap()).unwrap();

    let y: String = header["epk"]["y"].as_str().unwrap().to_string();
    let mut y_bytes: Vec<u8> = decode_b64(&y).unwrap();
    y_bytes[31] ^= 0x01;
    header["epk"]["y"] = serde_json::Value::String(encode_b64(&y_bytes));

    parts[0] = encode_b64(serde_json::to_vec(&header).unwrap());
    parts.join(".")
  };

  assert!(matches!(
    Decoder::new(&secret).decode(tampered.as_bytes()),
    Err(Error::InvalidKey(_))
  ));
}

#[test]
fn test_jwe_epk_curve_mismatch_rejected() {
  let header: JweHeader = JweHeader::new(ECDH_ES, JweEncryption::A128CBC_HS256);
  let p256: Jwk = common::p256_jwk();
  let p384: Jwk = common::p384_jwk();

  let encoded: String = Encoder::new()
    .protected(&header)
    .recipient(&p384.to_public().unwrap())
    .encode(CLAIMS)
    .unwrap();

  assert!(matches!(
    Decoder::new(&p256).decode(encoded.as_bytes()),
    Err(Error::InvalidKey(_))
  ));
}

#[test]
fn test_jwe_secp256k1_refused_for_agreement() {
  let header: JweHeader = JweHeader::new(ECDH_ES, JweEncryption::A128GCM);
  let secret: Jwk = common::k256_jwk();
  let public: Jwk = secret.to_public().unwrap();

  assert!(matches!(
    Encoder::new().protected(&header).recipient(&public).encode(CLAIMS),
    Err(Error::InvalidKey(_))
  ));
}

#[test]
fn test_jwe_deflate_roundtrip() {
  let mut header: JweHeader = JweHeader::new(DIR, JweEncryption::A256GCM);
  header.set_zip(JweCompression::Deflate);

  let secret: Jwk = common::oct_jwk(32);
  let claims: Vec<u8> = b"jose ".repeat(1024);

  let encoded: String = Encoder::new().protected(&header).recipient(&secret).encode(&claims).unwrap();
  let decoded: Token = Decoder::new(&secret).decode(encoded.as_bytes()).unwrap();

  assert_eq!(decoded.1, claims);

  // The compressed ciphertext is markedly smaller than the plaintext.
  assert!(encoded.len() < claims.len());
}

#[test]
fn test_jwe_decompression_ceiling() {
  let mut header: JweHeader = JweHeader::new(DIR, JweEncryption::A256GCM);
  header.set_zip(JweCompression::Deflate);

  let secret: Jwk = common::oct_jwk(32);
  let claims: Vec<u8> = vec![0; 1024 * 1024];

  let encoded: String = Encoder::new().protected(&header).recipient(&secret).encode(&claims).unwrap();

  assert!(matches!(
    Decoder::new(&secret).max_decompressed_size(1024).decode(encoded.as_bytes()),
    Err(Error::DecompressionTooLarge)
  ));
}

#[test]
fn test_jwe_dir_with_explicit_cek_refused() {
  let header: JweHeader = JweHeader::new(DIR, JweEncryption::A128GCM);
  let secret: Jwk = common::oct_jwk(16);
  let cek: [u8; 16] = [7; 16];

  assert!(matches!(
    Encoder::new().protected(&header).recipient(&secret).cek(&cek).encode(CLAIMS),
    Err(Error::InvalidKey(_))
  ));
}

#[test]
fn test_jwe_deterministic_with_cek_and_iv() {
  let header: JweHeader = JweHeader::new(A128KW, JweEncryption::A128GCM);
  let secret: Jwk = common::oct_jwk(16);
  let cek: [u8; 16] = [1; 16];
  let iv: [u8; 12] = [2; 12];

  let encode = || {
    Encoder::new()
      .protected(&header)
      .recipient(&secret)
      .cek(&cek)
      .iv(&iv)
      .encode(CLAIMS)
      .unwrap()
  };

  // Pinning the CEK and IV makes the output reproducible.
  assert_eq!(encode(), encode());
}

#[cfg(feature = "test-rsa-enc")]
#[test]
fn test_jwe_rsa1_5_requires_opt_in() {
  let header: JweHeader = JweHeader::new(RSA1_5, JweEncryption::A128CBC_HS256);
  let secret: Jwk = common::rsa_jwk();
  let public: Jwk = secret.to_public().unwrap();

  assert!(matches!(
    Encoder::new().protected(&header).recipient(&public).encode(CLAIMS),
    Err(Error::AlgorithmConstraintViolated(_))
  ));

  let encoded: String = Encoder::new()
    .algorithm_constraints(AlgorithmConstraints::NoConstraints)
    .protected(&header)
    .recipient(&public)
    .encode(CLAIMS)
    .unwrap();

  assert!(matches!(
    Decoder::new(&secret).decode(encoded.as_bytes()),
    Err(Error::AlgorithmConstraintViolated(_))
  ));

  let decoded: Token = Decoder::new(&secret)
    .algorithm_constraints(AlgorithmConstraints::NoConstraints)
    .decode(encoded.as_bytes())
    .unwrap();

  assert_eq!(decoded.1, CLAIMS);
}

#[cfg(feature = "test-rsa-enc")]
#[test]
fn test_jwe_rsa1_5_wrong_key_masked() {
  let header: JweHeader = JweHeader::new(RSA1_5, JweEncryption::A128CBC_HS256);
  let secret: Jwk = common::rsa_jwk();
  let wrong: Jwk = common::rsa_jwk();

  let encoded: String = Encoder::new()
    .algorithm_constraints(AlgorithmConstraints::NoConstraints)
    .protected(&header)
    .recipient(&secret.to_public().unwrap())
    .encode(CLAIMS)
    .unwrap();

  // A wrong key produces a random CEK substitute; the only observable
  // failure is the content tag check.
  assert!(matches!(
    Decoder::new(&wrong)
      .algorithm_constraints(AlgorithmConstraints::NoConstraints)
      .decode(encoded.as_bytes()),
    Err(Error::IntegrityFailure)
  ));
}
