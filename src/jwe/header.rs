// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use core::ops::Deref;
use core::ops::DerefMut;

use crate::jwe::JweAlgorithm;
use crate::jwe::JweCompression;
use crate::jwe::JweEncryption;
use crate::jwk::Jwk;
use crate::jwt::JwtHeader;

/// JSON Web Encryption JOSE Header.
///
/// [More Info](https://tools.ietf.org/html/rfc7516#section-4)
#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct JweHeader {
  /// Common JOSE Header Parameters.
  #[serde(flatten)]
  common: JwtHeader,
  /// Algorithm.
  ///
  /// Identifies the cryptographic algorithm used to encrypt or determine the
  /// value of the content encryption key.
  ///
  /// [More Info](https://tools.ietf.org/html/rfc7516#section-4.1.1)
  alg: JweAlgorithm,
  /// Encryption Algorithm.
  ///
  /// Identifies the content encryption algorithm used to perform
  /// authenticated encryption on the plaintext.
  ///
  /// [More Info](https://tools.ietf.org/html/rfc7516#section-4.1.2)
  enc: JweEncryption,
  /// Compression Algorithm.
  ///
  /// The compression algorithm applied to the plaintext before encryption.
  ///
  /// [More Info](https://tools.ietf.org/html/rfc7516#section-4.1.3)
  #[serde(skip_serializing_if = "Option::is_none")]
  zip: Option<JweCompression>,
  /// Ephemeral Public Key.
  ///
  /// The public key created by the originator for ECDH-ES key agreement.
  ///
  /// [More Info](https://tools.ietf.org/html/rfc7518#section-4.6.1.1)
  #[serde(skip_serializing_if = "Option::is_none")]
  epk: Option<Jwk>,
  /// Agreement PartyUInfo.
  ///
  /// [More Info](https://tools.ietf.org/html/rfc7518#section-4.6.1.2)
  #[serde(skip_serializing_if = "Option::is_none")]
  apu: Option<String>,
  /// Agreement PartyVInfo.
  ///
  /// [More Info](https://tools.ietf.org/html/rfc7518#section-4.6.1.3)
  #[serde(skip_serializing_if = "Option::is_none")]
  apv: Option<String>,
  /// Initialization Vector.
  ///
  /// The base64url-encoded initialization vector used when AES GCM key
  /// wrapping encrypts the content encryption key.
  ///
  /// [More Info](https://tools.ietf.org/html/rfc7518#section-4.7.1.1)
  #[serde(skip_serializing_if = "Option::is_none")]
  iv: Option<String>,
  /// Authentication Tag.
  ///
  /// The base64url-encoded authentication tag produced when AES GCM key
  /// wrapping encrypts the content encryption key.
  ///
  /// [More Info](https://tools.ietf.org/html/rfc7518#section-4.7.1.2)
  #[serde(skip_serializing_if = "Option::is_none")]
  tag: Option<String>,
  /// PBES2 Salt Input.
  ///
  /// [More Info](https://tools.ietf.org/html/rfc7518#section-4.8.1.1)
  #[serde(skip_serializing_if = "Option::is_none")]
  p2s: Option<String>,
  /// PBES2 Count.
  ///
  /// [More Info](https://tools.ietf.org/html/rfc7518#section-4.8.1.2)
  #[serde(skip_serializing_if = "Option::is_none")]
  p2c: Option<u64>,
}

impl JweHeader {
  /// Create a new `JweHeader` with the given algorithms.
  pub const fn new(alg: JweAlgorithm, enc: JweEncryption) -> Self {
    Self {
      common: JwtHeader::new(),
      alg,
      enc,
      zip: None,
      epk: None,
      apu: None,
      apv: None,
      iv: None,
      tag: None,
      p2s: None,
      p2c: None,
    }
  }

  /// Returns the value for the algorithm parameter (alg).
  pub fn alg(&self) -> JweAlgorithm {
    self.alg
  }

  /// Sets a value for the algorithm parameter (alg).
  pub fn set_alg(&mut self, value: impl Into<JweAlgorithm>) {
    self.alg = value.into();
  }

  /// Returns the value for the encryption algorithm parameter (enc).
  pub fn enc(&self) -> JweEncryption {
    self.enc
  }

  /// Sets a value for the encryption algorithm parameter (enc).
  pub fn set_enc(&mut self, value: impl Into<JweEncryption>) {
    self.enc = value.into();
  }

  /// Returns the value for the compression algorithm parameter (zip).
  pub fn zip(&self) -> Option<&JweCompression> {
    self.zip.as_ref()
  }

  /// Sets a value for the compression algorithm parameter (zip).
  pub fn set_zip(&mut self, value: impl Into<JweCompression>) {
    self.zip = Some(value.into());
  }

  /// Returns the value for the ephemeral public key parameter (epk).
  pub fn epk(&self) -> Option<&Jwk> {
    self.epk.as_ref()
  }

  /// Sets a value for the ephemeral public key parameter (epk).
  pub fn set_epk(&mut self, value: impl Into<Jwk>) {
    self.epk = Some(value.into());
  }

  /// Returns the value for the partyuinfo parameter (apu).
  pub fn apu(&self) -> Option<&str> {
    self.apu.as_deref()
  }

  /// Sets a value for the partyuinfo parameter (apu).
  pub fn set_apu(&mut self, value: impl Into<String>) {
    self.apu = Some(value.into());
  }

  /// Returns the value for the partyvinfo parameter (apv).
  pub fn apv(&self) -> Option<&str> {
    self.apv.as_deref()
  }

  /// Sets a value for the partyvinfo parameter (apv).
  pub fn set_apv(&mut self, value: impl Into<String>) {
    self.apv = Some(value.into());
  }

  /// Returns the value for the initialization vector parameter (iv).
  pub fn iv(&self) -> Option<&str> {
    self.iv.as_deref()
  }

  /// Sets a value for the initialization vector parameter (iv).
  pub fn set_iv(&mut self, value: impl Into<String>) {
    self.iv = Some(value.into());
  }

  /// Returns the value for the authentication tag parameter (tag).
  pub fn tag(&self) -> Option<&str> {
    self.tag.as_deref()
  }

  /// Sets a value for the authentication tag parameter (tag).
  pub fn set_tag(&mut self, value: impl Into<String>) {
    self.tag = Some(value.into());
  }

  /// Returns the value for the PBES2 salt input parameter (p2s).
  pub fn p2s(&self) -> Option<&str> {
    self.p2s.as_deref()
  }

  /// Sets a value for the PBES2 salt input parameter (p2s).
  pub fn set_p2s(&mut self, value: impl Into<String>) {
    self.p2s = Some(value.into());
  }

  /// Returns the value for the PBES2 count parameter (p2c).
  pub fn p2c(&self) -> Option<u64> {
    self.p2c
  }

  /// Sets a value for the PBES2 count parameter (p2c).
  pub fn set_p2c(&mut self, value: impl Into<u64>) {
    self.p2c = Some(value.into());
  }

  /// Returns `true` if the header contains the given parameter.
  pub fn has(&self, claim: &str) -> bool {
    match claim {
      "alg" => true,
      "enc" => true,
      "zip" => self.zip.is_some(),
      "epk" => self.epk.is_some(),
      "apu" => self.apu.is_some(),
      "apv" => self.apv.is_some(),
      "iv" => self.iv.is_some(),
      "tag" => self.tag.is_some(),
      "p2s" => self.p2s.is_some(),
      "p2c" => self.p2c.is_some(),
      _ => self.common.has(claim),
    }
  }
}

impl Deref for JweHeader {
  type Target = JwtHeader;

  fn deref(&self) -> &Self::Target {
    &self.common
  }
}

impl DerefMut for JweHeader {
  fn deref_mut(&mut self) -> &mut Self::Target {
    &mut self.common
  }
}
