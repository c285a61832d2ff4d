// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use core::fmt;
use core::fmt::Display;
use core::fmt::Formatter;

/// Supported algorithms for the JSON Web Key `key_ops` property.
///
/// [More Info](https://www.iana.org/assignments/jose/jose.xhtml#web-key-operations)
#[derive(Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, serde::Deserialize, serde::Serialize)]
#[serde(from = "String", into = "String")]
pub enum JwkOperation {
  /// Compute digital signature or MAC.
  Sign,
  /// Verify digital signature or MAC.
  Verify,
  /// Encrypt content.
  Encrypt,
  /// Decrypt content and validate decryption, if applicable.
  Decrypt,
  /// Encrypt key.
  WrapKey,
  /// Decrypt key and validate decryption, if applicable.
  UnwrapKey,
  /// Derive key.
  DeriveKey,
  /// Derive bits not to be used as a key.
  DeriveBits,
  /// Custom key operation.
  Custom(String),
}

impl JwkOperation {
  /// Returns the key operation as a `str` slice.
  pub fn name(&self) -> &str {
    match self {
      Self::Sign => "sign",
      Self::Verify => "verify",
      Self::Encrypt => "encrypt",
      Self::Decrypt => "decrypt",
      Self::WrapKey => "wrapKey",
      Self::UnwrapKey => "unwrapKey",
      Self::DeriveKey => "deriveKey",
      Self::DeriveBits => "deriveBits",
      Self::Custom(inner) => inner,
    }
  }

  /// Returns the operation paired with this one in a key pair, e.g.
  /// `sign` for `verify`.
  pub fn inverse(&self) -> Self {
    match self {
      Self::Sign => Self::Verify,
      Self::Verify => Self::Sign,
      Self::Encrypt => Self::Decrypt,
      Self::Decrypt => Self::Encrypt,
      Self::WrapKey => Self::UnwrapKey,
      Self::UnwrapKey => Self::WrapKey,
      Self::DeriveKey => Self::DeriveKey,
      Self::DeriveBits => Self::DeriveBits,
      Self::Custom(inner) => Self::Custom(inner.clone()),
    }
  }
}

impl From<String> for JwkOperation {
  fn from(other: String) -> Self {
    match other.as_str() {
      "sign" => Self::Sign,
      "verify" => Self::Verify,
      "encrypt" => Self::Encrypt,
      "decrypt" => Self::Decrypt,
      "wrapKey" => Self::WrapKey,
      "unwrapKey" => Self::UnwrapKey,
      "deriveKey" => Self::DeriveKey,
      "deriveBits" => Self::DeriveBits,
      _ => Self::Custom(other),
    }
  }
}

impl From<JwkOperation> for String {
  fn from(other: JwkOperation) -> Self {
    other.name().to_string()
  }
}

impl Display for JwkOperation {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}
