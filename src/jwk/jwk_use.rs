// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use core::fmt;
use core::fmt::Display;
use core::fmt::Formatter;

/// Supported algorithms for the JSON Web Key `use` property.
///
/// [More Info](https://www.iana.org/assignments/jose/jose.xhtml#web-key-use)
#[derive(Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, serde::Deserialize, serde::Serialize)]
#[serde(from = "String", into = "String")]
pub enum JwkUse {
  /// Digital Signature or MAC.
  Signature,
  /// Encryption.
  Encryption,
  /// Custom key use.
  Custom(String),
}

impl JwkUse {
  /// Returns the JWK "use" as a `str` slice.
  pub fn name(&self) -> &str {
    match self {
      Self::Signature => "sig",
      Self::Encryption => "enc",
      Self::Custom(inner) => inner,
    }
  }
}

impl From<String> for JwkUse {
  fn from(other: String) -> Self {
    match other.as_str() {
      "sig" => Self::Signature,
      "enc" => Self::Encryption,
      _ => Self::Custom(other),
    }
  }
}

impl From<JwkUse> for String {
  fn from(other: JwkUse) -> Self {
    other.name().to_string()
  }
}

impl Display for JwkUse {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}
