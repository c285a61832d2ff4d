// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

#![allow(dead_code)]

use jose_core::jwk::Jwk;
use jose_core::jwk::JwkParamsEc;
use jose_core::jwk::JwkParamsOct;
use jose_core::jwk::JwkParamsOkp;
use jose_core::jwk::JwkParamsRsa;
use jose_core::utils::encode_b64;
use jose_core::utils::random_bytes;
use rand::rngs::OsRng;

pub fn oct_jwk(len: usize) -> Jwk {
  Jwk::from_params(JwkParamsOct {
    k: encode_b64(random_bytes(len).unwrap()),
  })
}

pub fn ed25519_jwk() -> Jwk {
  let secret = crypto::signatures::ed25519::SecretKey::generate().unwrap();

  Jwk::from_params(JwkParamsOkp {
    crv: "Ed25519".to_string(),
    x: encode_b64(secret.public_key().as_slice()),
    d: Some(encode_b64(secret.to_bytes())),
  })
}

pub fn x25519_jwk() -> Jwk {
  let secret = crypto::keys::x25519::SecretKey::generate().unwrap();

  Jwk::from_params(JwkParamsOkp {
    crv: "X25519".to_string(),
    x: encode_b64(secret.public_key().to_bytes()),
    d: Some(encode_b64(secret.to_bytes())),
  })
}

macro_rules! ec_jwk {
  ($fn_name:ident, $ec:ident, $crv:expr) => {
    pub fn $fn_name() -> Jwk {
      use $ec::elliptic_curve::sec1::ToEncodedPoint;

      let secret = $ec::SecretKey::random(&mut OsRng);
      let point = secret.public_key().to_encoded_point(false);

      Jwk::from_params(JwkParamsEc {
        crv: $crv.to_string(),
        x: encode_b64(point.x().unwrap()),
        y: encode_b64(point.y().unwrap()),
        d: Some(encode_b64(secret.to_bytes())),
      })
    }
  };
}

ec_jwk!(p256_jwk, p256, "P-256");
ec_jwk!(p384_jwk, p384, "P-384");
ec_jwk!(p521_jwk, p521, "P-521");
ec_jwk!(k256_jwk, k256, "secp256k1");

pub fn rsa_jwk() -> Jwk {
  use rsa::traits::PrivateKeyParts;
  use rsa::traits::PublicKeyParts;

  let secret = rsa::RsaPrivateKey::new(&mut OsRng, 2048).unwrap();

  Jwk::from_params(JwkParamsRsa {
    n: encode_b64(secret.n().to_bytes_be()),
    e: encode_b64(secret.e().to_bytes_be()),
    d: Some(encode_b64(secret.d().to_bytes_be())),
    p: Some(encode_b64(secret.primes()[0].to_bytes_be())),
    q: Some(encode_b64(secret.primes()[1].to_bytes_be())),
    dp: None,
    dq: None,
    qi: None,
    oth: None,
  })
}
