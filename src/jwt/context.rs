// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use crate::jwe::JweHeader;
use crate::jws::JwsHeader;
use crate::jwt::JwtClaims;

/// A consumed JWS layer: the parsed header plus the exact signing input and
/// signature bytes, retained so a second pass can re-verify without
/// re-parsing.
#[derive(Clone, Debug)]
pub struct JwsLayer {
  pub(crate) header: JwsHeader,
  pub(crate) signing_input: Vec<u8>,
  pub(crate) signature: Vec<u8>,
  pub(crate) payload: Vec<u8>,
  pub(crate) verified: bool,
}

impl JwsLayer {
  /// Returns the protected header of this layer.
  pub fn header(&self) -> &JwsHeader {
    &self.header
  }

  /// Returns the payload carried by this layer.
  pub fn payload(&self) -> &[u8] {
    &self.payload
  }

  /// Returns `true` if the signature of this layer has been verified.
  pub fn verified(&self) -> bool {
    self.verified
  }
}

/// A consumed JWE layer: the parsed header and the recovered plaintext.
#[derive(Clone, Debug)]
pub struct JweLayer {
  pub(crate) header: JweHeader,
  pub(crate) payload: Vec<u8>,
}

impl JweLayer {
  /// Returns the protected header of this layer.
  pub fn header(&self) -> &JweHeader {
    &self.header
  }

  /// Returns the plaintext recovered from this layer.
  pub fn payload(&self) -> &[u8] {
    &self.payload
  }
}

/// One JOSE object encountered while unwrapping a (possibly nested) JWT.
#[derive(Clone, Debug)]
pub enum JoseLayer {
  /// A signed layer.
  Jws(JwsLayer),
  /// An encrypted layer.
  Jwe(JweLayer),
}

impl JoseLayer {
  /// Returns the JWS layer, if this layer is signed.
  pub fn as_jws(&self) -> Option<&JwsLayer> {
    match self {
      Self::Jws(layer) => Some(layer),
      Self::Jwe(_) => None,
    }
  }

  /// Returns the JWE layer, if this layer is encrypted.
  pub fn as_jwe(&self) -> Option<&JweLayer> {
    match self {
      Self::Jws(_) => None,
      Self::Jwe(layer) => Some(layer),
    }
  }

  /// Returns the `kid` header parameter of this layer.
  pub fn kid(&self) -> Option<&str> {
    match self {
      Self::Jws(layer) => layer.header.kid(),
      Self::Jwe(layer) => layer.header.kid(),
    }
  }

  /// Returns the `cty` header parameter of this layer.
  pub fn cty(&self) -> Option<&str> {
    match self {
      Self::Jws(layer) => layer.header.cty(),
      Self::Jwe(layer) => layer.header.cty(),
    }
  }

  /// Returns the `typ` header parameter of this layer.
  pub fn typ(&self) -> Option<&str> {
    match self {
      Self::Jws(layer) => layer.header.typ(),
      Self::Jwe(layer) => layer.header.typ(),
    }
  }

  /// Returns the payload carried by this layer.
  pub fn payload(&self) -> &[u8] {
    match self {
      Self::Jws(layer) => layer.payload(),
      Self::Jwe(layer) => layer.payload(),
    }
  }
}

/// The outcome of consuming a JWT: every JOSE layer encountered (outermost
/// last), the innermost claims, and the raw input.
#[derive(Clone, Debug)]
pub struct JwtContext {
  pub(crate) layers: Vec<JoseLayer>,
  pub(crate) claims: JwtClaims,
  pub(crate) raw: String,
}

impl JwtContext {
  /// Returns the consumed JOSE layers, ordered outermost-last.
  pub fn layers(&self) -> &[JoseLayer] {
    &self.layers
  }

  /// Returns the innermost decoded claims.
  pub fn claims(&self) -> &JwtClaims {
    &self.claims
  }

  /// Consumes the context and returns the innermost decoded claims.
  pub fn into_claims(self) -> JwtClaims {
    self.claims
  }

  /// Returns the raw input string.
  pub fn raw(&self) -> &str {
    &self.raw
  }
}
