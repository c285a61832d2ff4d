// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use crate::error::Error;
use crate::error::Result;
use crate::jwa::AlgorithmConstraints;
use crate::jwk::JwkOperation;
use crate::jwk::JwkUse;
use crate::jws::sign;
use crate::jws::validate_signing_key;
use crate::jws::JwsAlgorithm;
use crate::jws::JwsHeader;
use crate::utils::encode_b64;
use crate::utils::encode_b64_json;
use crate::utils::Secret;

/// A single-use builder emitting a JWS in Compact Serialization.
///
/// The default algorithm constraints refuse `none`; signing an unsecured
/// JWS requires explicitly permitting it.
pub struct Encoder<'a> {
  constraints: AlgorithmConstraints<JwsAlgorithm>,
  detached: bool,
  recipient: Option<(Secret<'a>, &'a JwsHeader)>,
}

impl<'a> Encoder<'a> {
  /// Creates a new `Encoder`.
  pub fn new() -> Self {
    Self {
      constraints: AlgorithmConstraints::default_signature(),
      detached: false,
      recipient: None,
    }
  }

  /// Sets the signing key and protected header.
  pub fn recipient<K>(mut self, recipient: (K, &'a JwsHeader)) -> Self
  where
    K: Into<Secret<'a>>,
  {
    self.recipient = Some((recipient.0.into(), recipient.1));
    self
  }

  /// Emits the payload detached: the middle segment of the compact form is
  /// left empty.
  pub fn detached(mut self, value: bool) -> Self {
    self.detached = value;
    self
  }

  /// Replaces the active algorithm constraints.
  pub fn algorithm_constraints(mut self, value: AlgorithmConstraints<JwsAlgorithm>) -> Self {
    self.constraints = value;
    self
  }

  /// Signs `claims` and returns the compact serialization.
  pub fn encode(&self, claims: &[u8]) -> Result<String> {
    let (key, header): (Secret<'a>, &JwsHeader) = self.recipient.ok_or(Error::MissingParam("recipient"))?;
    let alg: JwsAlgorithm = header.alg().ok_or(Error::MissingParam("alg"))?;

    if !self.constraints.is_permitted(alg) {
      return Err(Error::AlgorithmConstraintViolated(alg.name()));
    }

    if let Secret::Jwk(jwk) = key {
      jwk.check_use(&JwkUse::Signature)?;
      jwk.check_ops(&JwkOperation::Sign)?;
      jwk.check_alg(alg.name())?;
    }

    validate_signing_key(alg, key)?;

    let encoded_header: String = encode_b64_json(header)?;
    let encoded_claims: String = encode_b64(claims);

    let signing_input: String = format!("{encoded_header}.{encoded_claims}");
    let signature: Vec<u8> = sign(alg, key, signing_input.as_bytes())?;
    let encoded_signature: String = encode_b64(&signature);

    if self.detached {
      Ok(format!("{encoded_header}..{encoded_signature}"))
    } else {
      Ok(format!("{signing_input}.{encoded_signature}"))
    }
  }
}

impl Default for Encoder<'_> {
  fn default() -> Self {
    Self::new()
  }
}
