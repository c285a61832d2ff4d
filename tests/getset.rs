// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use jose_core::jwe::JweAlgorithm;
use jose_core::jwe::JweCompression;
use jose_core::jwe::JweEncryption;
use jose_core::jwe::JweHeader;
use jose_core::jwk::Jwk;
use jose_core::jwk::JwkOperation;
use jose_core::jwk::JwkType;
use jose_core::jwk::JwkUse;
use jose_core::jws::JwsAlgorithm;
use jose_core::jws::JwsHeader;
use jose_core::jwt::JwtClaims;
use jose_core::utils::encode_b64;

macro_rules! test_getset {
  ($target:expr, $get:ident, $set:ident, Url = $value:expr) => {
    let mut target = $target;
    assert_eq!(target.$get(), None);
    target.$set(::url::Url::parse($value).unwrap());
    assert_eq!(target.$get().unwrap().as_str(), $value);
  };
  ($target:expr, $get:ident, $set:ident, Option = $value:expr) => {
    let mut target = $target;
    assert_eq!(target.$get(), None);
    target.$set($value);
    assert_eq!(target.$get().unwrap(), $value);
  };
  ($target:expr, $get:ident, $set:ident, OptionRef = $value:expr) => {
    let mut target = $target;
    assert_eq!(target.$get(), None);
    target.$set($value.clone());
    assert_eq!(target.$get().unwrap(), &$value);
  };
}

#[test]
#[rustfmt::skip]
fn test_jws_header_getset() {
  test_getset!(JwsHeader::new(), alg, set_alg, Option = JwsAlgorithm::EdDSA);
  test_getset!(JwsHeader::new(), jku, set_jku, Url = "https://foo.example/jku");
  test_getset!(JwsHeader::new(), jwk, set_jwk, OptionRef = Jwk::new(JwkType::Oct));
  test_getset!(JwsHeader::new(), kid, set_kid, Option = "key id");
  test_getset!(JwsHeader::new(), x5u, set_x5u, Url = "https://foo.example/x509");
  test_getset!(JwsHeader::new(), x5t, set_x5t, Option = encode_b64([1, 2, 3, 4]));
  test_getset!(JwsHeader::new(), x5t_s256, set_x5t_s256, Option = encode_b64([1, 2, 3, 4]));
  test_getset!(JwsHeader::new(), typ, set_typ, Option = "type");
  test_getset!(JwsHeader::new(), cty, set_cty, Option = "content type");
}

#[test]
#[rustfmt::skip]
fn test_jwe_header_getset() {
  let header = || JweHeader::new(JweAlgorithm::A256KW, JweEncryption::A256GCM);

  test_getset!(header(), zip, set_zip, OptionRef = JweCompression::Deflate);
  test_getset!(header(), kid, set_kid, Option = "key id");
  test_getset!(header(), typ, set_typ, Option = "type");
  test_getset!(header(), cty, set_cty, Option = "content type");
  test_getset!(header(), epk, set_epk, OptionRef = Jwk::new(JwkType::Ec));
  test_getset!(header(), apu, set_apu, Option = "agreement partyuinfo");
  test_getset!(header(), apv, set_apv, Option = "agreement partyvinfo");
  test_getset!(header(), iv, set_iv, Option = encode_b64([1, 2, 3, 4]));
  test_getset!(header(), tag, set_tag, Option = encode_b64([1, 2, 3, 4]));
  test_getset!(header(), p2s, set_p2s, Option = encode_b64([1, 2, 3, 4]));
  test_getset!(header(), p2c, set_p2c, Option = 123456789u64);

  let mut header = header();
  assert_eq!(header.alg(), JweAlgorithm::A256KW);
  assert_eq!(header.enc(), JweEncryption::A256GCM);
  header.set_alg(JweAlgorithm::ECDH_ES_A256KW);
  header.set_enc(JweEncryption::A256CBC_HS512);
  assert_eq!(header.alg(), JweAlgorithm::ECDH_ES_A256KW);
  assert_eq!(header.enc(), JweEncryption::A256CBC_HS512);
}

#[test]
#[rustfmt::skip]
fn test_jwk_getset() {
  test_getset!(Jwk::new(JwkType::Oct), use_, set_use, OptionRef = JwkUse::Signature);
  test_getset!(Jwk::new(JwkType::Oct), alg, set_alg, Option = "HS256");
  test_getset!(Jwk::new(JwkType::Oct), kid, set_kid, Option = "key id");
  test_getset!(Jwk::new(JwkType::Oct), x5u, set_x5u, Url = "https://foo.example/");
  test_getset!(Jwk::new(JwkType::Oct), x5t, set_x5t, Option = encode_b64([1, 2, 3, 4]));
  test_getset!(Jwk::new(JwkType::Oct), x5t_s256, set_x5t_s256, Option = encode_b64([1, 2, 3, 4]));

  let mut jwk = Jwk::new(JwkType::Oct);
  assert_eq!(jwk.key_ops(), None);
  jwk.set_key_ops([JwkOperation::Sign, JwkOperation::Verify]);
  assert_eq!(jwk.key_ops().unwrap(), &[JwkOperation::Sign, JwkOperation::Verify]);
}

#[test]
#[rustfmt::skip]
fn test_jwt_claims_getset() {
  test_getset!(JwtClaims::new(), iss, set_iss, Option = "issuer");
  test_getset!(JwtClaims::new(), sub, set_sub, Option = "subject");
  test_getset!(JwtClaims::new(), exp, set_exp, Option = 123456789i64);
  test_getset!(JwtClaims::new(), nbf, set_nbf, Option = 123456789i64);
  test_getset!(JwtClaims::new(), iat, set_iat, Option = 123456789i64);
  test_getset!(JwtClaims::new(), jti, set_jti, Option = "jwt id");

  let mut claims = JwtClaims::new();
  assert_eq!(claims.aud(), None);
  claims.set_aud(vec!["audience"]);
  assert!(claims.aud().unwrap().contains("audience"));
}
