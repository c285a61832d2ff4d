// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

// Examples from:
//
// https://tools.ietf.org/html/rfc7520
//
use jose_core::jwk::Jwk;
use jose_core::jwk::JwkParams;
use jose_core::jwk::JwkSet;
use jose_core::jwk::JwkType;
use jose_core::jwk::JwkUse;
use serde_json::Value;

macro_rules! assert_matches {
  ($($tt:tt)*) => {
    assert!(matches!($($tt)*))
  };
}

const FX_JWK_EC_PUBLIC: &str = r#"{
  "kty": "EC",
  "kid": "bilbo.baggins@hobbiton.example",
  "use": "sig",
  "crv": "P-521",
  "x": "AHKZLLOsCOzz5cY97ewNUajB957y-C-U88c3v13nmGZx6sYl_oJXu9A5RkTKqjqvjyekWF-7ytDyRXYgCF5cj0Kt",
  "y": "AdymlHvOiLxXkEhayXQnNCvDX4h9htZaCJN34kfmC6pV5OhQHiraVySsUdaQkAgDPrwQrJmbnX9cwlGfP-HqHZR1"
}"#;

const FX_JWK_EC_PRIVATE: &str = r#"{
  "kty": "EC",
  "kid": "bilbo.baggins@hobbiton.example",
  "use": "sig",
  "crv": "P-521",
  "x": "AHKZLLOsCOzz5cY97ewNUajB957y-C-U88c3v13nmGZx6sYl_oJXu9A5RkTKqjqvjyekWF-7ytDyRXYgCF5cj0Kt",
  "y": "AdymlHvOiLxXkEhayXQnNCvDX4h9htZaCJN34kfmC6pV5OhQHiraVySsUdaQkAgDPrwQrJmbnX9cwlGfP-HqHZR1",
  "d": "AAhRON2r9cqXX1hg-RoI6R1tX5p2rUAYdmpHZoC1XNM56KtscrX6zbKipQrCW9CGZH3T4ubpnoTKLDYJ_fF3_rJt"
}"#;

const FX_JWK_RSA_PUBLIC: &str = r#"{
  "kty": "RSA",
  "kid": "bilbo.baggins@hobbiton.example",
  "use": "sig",
  "n": "n4EPtAOCc9AlkeQHPzHStgAbgs7bTZLwUBZdR8_KuKPEHLd4rHVTeT-O-XV2jRojdNhxJWTDvNd7nqQ0VEiZQHz_AJmSCpMaJMRBSFKrKb2wqVwGU_NsYOYL-QtiWN2lbzcEe6XC0dApr5ydQLrHqkHHig3RBordaZ6Aj-oBHqFEHYpPe7Tpe-OfVfHd1E6cS6M1FZcD1NNLYD5lFHpPI9bTwJlsde3uhGqC0ZCuEHg8lhzwOHrtIQbS0FVbb9k3-tVTU4fg_3L_vniUFAKwuCLqKnS2BYwdq_mzSnbLY7h_qixoR7jig3__kRhuaxwUkRz5iaiQkqgc5gHdrNP5zw",
  "e": "AQAB"
}"#;

const FX_JWK_OCT_SIG: &str = r#"{
  "kty": "oct",
  "kid": "018c0ae5-4d9b-471b-bfd6-eef314bc7037",
  "use": "sig",
  "alg": "HS256",
  "k": "hJtXIZ2uSN5kbQfbtTNWbpdmhkV8FJG-Onbc6mxCcYg"
}"#;

const FX_JWK_OCT_ENC: &str = r#"{
  "kty": "oct",
  "kid": "1e571774-2e08-40da-8308-e8d68773842d",
  "use": "enc",
  "alg": "A256GCM",
  "k": "AAPapAv4LbFbiVawEjagUBluYqN5rhna-8nuldDvOx8"
}"#;

#[test]
fn test_cookbook_jwk_ec_public() {
  let jwk: Jwk = serde_json::from_str(FX_JWK_EC_PUBLIC).unwrap();

  assert_eq!(jwk.kty(), JwkType::Ec);
  assert_eq!(jwk.kid(), Some("bilbo.baggins@hobbiton.example"));
  assert_eq!(jwk.use_(), Some(&JwkUse::Signature));
  assert!(jwk.is_public());

  assert_matches!(
    jwk.params().unwrap(),
    JwkParams::Ec(params) if params.crv == "P-521"
  );

  assert_matches!(
    jwk.params().unwrap(),
    JwkParams::Ec(params) if params.x == "AHKZLLOsCOzz5cY97ewNUajB957y-C-U88c3v13nmGZx6sYl_oJXu9A5RkTKqjqvjyekWF-7ytDyRXYgCF5cj0Kt"
  );

  assert_matches!(
    jwk.params().unwrap(),
    JwkParams::Ec(params) if params.y == "AdymlHvOiLxXkEhayXQnNCvDX4h9htZaCJN34kfmC6pV5OhQHiraVySsUdaQkAgDPrwQrJmbnX9cwlGfP-HqHZR1"
  );
}

#[test]
fn test_cookbook_jwk_ec_private() {
  let jwk: Jwk = serde_json::from_str(FX_JWK_EC_PRIVATE).unwrap();

  assert_eq!(jwk.kty(), JwkType::Ec);
  assert!(!jwk.is_public());

  assert_matches!(
    jwk.params().unwrap(),
    JwkParams::Ec(params) if params.d.as_deref() == Some("AAhRON2r9cqXX1hg-RoI6R1tX5p2rUAYdmpHZoC1XNM56KtscrX6zbKipQrCW9CGZH3T4ubpnoTKLDYJ_fF3_rJt")
  );

  let public: Jwk = jwk.to_public().unwrap();
  let expected: Jwk = serde_json::from_str(FX_JWK_EC_PUBLIC).unwrap();

  assert_eq!(public, expected);
}

#[test]
fn test_cookbook_jwk_rsa_public() {
  let jwk: Jwk = serde_json::from_str(FX_JWK_RSA_PUBLIC).unwrap();

  assert_eq!(jwk.kty(), JwkType::Rsa);
  assert_eq!(jwk.kid(), Some("bilbo.baggins@hobbiton.example"));
  assert_eq!(jwk.use_(), Some(&JwkUse::Signature));

  assert_matches!(
    jwk.params().unwrap(),
    JwkParams::Rsa(params) if params.e == "AQAB"
  );
}

#[test]
fn test_cookbook_jwk_oct() {
  let sig: Jwk = serde_json::from_str(FX_JWK_OCT_SIG).unwrap();
  let enc: Jwk = serde_json::from_str(FX_JWK_OCT_ENC).unwrap();

  assert_eq!(sig.kty(), JwkType::Oct);
  assert_eq!(sig.kid(), Some("018c0ae5-4d9b-471b-bfd6-eef314bc7037"));
  assert_eq!(sig.use_(), Some(&JwkUse::Signature));
  assert_eq!(sig.alg(), Some("HS256"));

  assert_eq!(enc.kty(), JwkType::Oct);
  assert_eq!(enc.use_(), Some(&JwkUse::Encryption));
  assert_eq!(enc.alg(), Some("A256GCM"));

  assert_matches!(
    enc.params().unwrap(),
    JwkParams::Oct(params) if params.k == "AAPapAv4LbFbiVawEjagUBluYqN5rhna-8nuldDvOx8"
  );
}

#[test]
fn test_cookbook_jwk_serde_roundtrip() {
  for fixture in [FX_JWK_EC_PUBLIC, FX_JWK_EC_PRIVATE, FX_JWK_RSA_PUBLIC, FX_JWK_OCT_SIG, FX_JWK_OCT_ENC] {
    let value: Value = serde_json::from_str(fixture).unwrap();
    let jwk: Jwk = serde_json::from_str(fixture).unwrap();
    let ser: Value = serde_json::to_value(&jwk).unwrap();

    assert_eq!(ser, value);
  }
}

#[test]
fn test_cookbook_jwk_unknown_members_preserved() {
  const JSON: &str = r#"{
    "kty": "oct",
    "kid": "018c0ae5-4d9b-471b-bfd6-eef314bc7037",
    "k": "hJtXIZ2uSN5kbQfbtTNWbpdmhkV8FJG-Onbc6mxCcYg",
    "ext": true,
    "x-vendor": {"tier": 1}
  }"#;

  let jwk: Jwk = serde_json::from_str(JSON).unwrap();

  assert_eq!(jwk.properties().get("ext"), Some(&Value::Bool(true)));

  let ser: Value = serde_json::to_value(&jwk).unwrap();
  let expected: Value = serde_json::from_str(JSON).unwrap();

  assert_eq!(ser, expected);
}

#[test]
fn test_cookbook_jwk_set() {
  let json: String = format!(r#"{{"keys":[{FX_JWK_EC_PUBLIC},{FX_JWK_RSA_PUBLIC}]}}"#);

  let value: Value = serde_json::from_str(&json).unwrap();
  let jwks: JwkSet = serde_json::from_str(&json).unwrap();

  assert_eq!(jwks.len(), 2);

  for (index, jwk) in jwks.iter().enumerate() {
    let ser: Value = serde_json::to_value(jwk).unwrap();
    assert_eq!(ser, value["keys"][index]);
  }

  assert_eq!(jwks.get("bilbo.baggins@hobbiton.example").len(), 2);
  assert!(jwks.get("missing").is_empty());
}

#[test]
fn test_cookbook_jwk_unknown_kty() {
  assert!(serde_json::from_str::<Jwk>(r#"{"kty":"QUANTUM"}"#).is_err());
}
