// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use crate::error::Error;
use crate::error::Result;
use crate::jwa::AlgorithmConstraints;
use crate::jwk::JwkOperation;
use crate::jwk::JwkUse;
use crate::jws::validate_verification_key;
use crate::jws::verify;
use crate::jws::JwsAlgorithm;
use crate::jws::JwsHeader;
use crate::utils::decode_b64;
use crate::utils::decode_b64_json;
use crate::utils::encode_b64;
use crate::utils::Secret;

/// A verified JWS: the protected header and the recovered claims.
#[derive(Clone, Debug)]
pub struct Token {
  /// The protected header.
  pub protected: JwsHeader,
  /// The recovered payload.
  pub claims: Vec<u8>,
}

/// The decoded segments of a compact JWS, prior to verification.
///
/// The signing input is assembled from the *original* encoded bytes so that
/// verification operates on exactly what was transmitted.
pub(crate) struct RawJws {
  pub(crate) protected: JwsHeader,
  pub(crate) signing_input: Vec<u8>,
  pub(crate) signature: Vec<u8>,
  pub(crate) claims: Vec<u8>,
}

pub(crate) fn parse_compact(data: &[u8], detached_payload: Option<&[u8]>) -> Result<RawJws> {
  let segments: Vec<&[u8]> = data.split(|byte| *byte == b'.').collect();

  if segments.len() != 3 {
    return Err(Error::MalformedEncoding("invalid segments"));
  }

  let protected: JwsHeader = decode_b64_json(segments[0])?;
  let signature: Vec<u8> = decode_b64(segments[2])?;

  let (claims, signing_input): (Vec<u8>, Vec<u8>) = match detached_payload {
    Some(payload) => {
      if !segments[1].is_empty() {
        return Err(Error::MalformedEncoding("unexpected attached payload"));
      }

      let encoded_payload: String = encode_b64(payload);
      let signing_input: Vec<u8> = [segments[0], b".", encoded_payload.as_bytes()].concat();

      (payload.to_vec(), signing_input)
    }
    None => {
      let claims: Vec<u8> = decode_b64(segments[1])?;
      let signing_input: Vec<u8> = [segments[0], b".", segments[1]].concat();

      (claims, signing_input)
    }
  };

  Ok(RawJws {
    protected,
    signing_input,
    signature,
    claims,
  })
}

/// Enforces the `crit` parameter: every listed name must appear in the
/// recipient's known set.
pub(crate) fn check_critical(crit: Option<&[String]>, known: &[String]) -> Result<()> {
  for name in crit.unwrap_or_default() {
    if !known.contains(name) {
      return Err(Error::UnrecognizedCritical(name.clone()));
    }
  }

  Ok(())
}

/// A reusable consumer for JWS objects in Compact Serialization.
///
/// The default algorithm constraints refuse `none`.
pub struct Decoder<'b> {
  constraints: AlgorithmConstraints<JwsAlgorithm>,
  key: Secret<'b>,
  payload: Option<&'b [u8]>,
  critical: Vec<String>,
}

impl<'b> Decoder<'b> {
  /// Creates a new `Decoder` verifying with the given key.
  pub fn new(key: impl Into<Secret<'b>>) -> Self {
    Self {
      constraints: AlgorithmConstraints::default_signature(),
      key: key.into(),
      payload: None,
      critical: Vec::new(),
    }
  }

  /// Replaces the active algorithm constraints.
  pub fn algorithm_constraints(mut self, value: AlgorithmConstraints<JwsAlgorithm>) -> Self {
    self.constraints = value;
    self
  }

  /// Supplies the detached payload of the JWS.
  pub fn payload(mut self, value: &'b [u8]) -> Self {
    self.payload = Some(value);
    self
  }

  /// Marks a critical header parameter as understood.
  pub fn critical(mut self, value: impl Into<String>) -> Self {
    self.critical.push(value.into());
    self
  }

  /// Decodes and verifies the given compact serialization.
  pub fn decode(&self, data: &[u8]) -> Result<Token> {
    let raw: RawJws = parse_compact(data, self.payload)?;

    check_critical(raw.protected.crit(), &self.critical)?;

    let alg: JwsAlgorithm = raw.protected.alg().ok_or(Error::MissingParam("alg"))?;

    if !self.constraints.is_permitted(alg) {
      return Err(Error::AlgorithmConstraintViolated(alg.name()));
    }

    if let Secret::Jwk(jwk) = self.key {
      jwk.check_use(&JwkUse::Signature)?;
      jwk.check_ops(&JwkOperation::Verify)?;
      jwk.check_alg(alg.name())?;
    }

    validate_verification_key(alg, self.key)?;
    verify(alg, self.key, &raw.signing_input, &raw.signature)?;

    Ok(Token {
      protected: raw.protected,
      claims: raw.claims,
    })
  }
}
