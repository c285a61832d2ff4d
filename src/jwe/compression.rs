// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use core::fmt;
use core::fmt::Display;
use core::fmt::Formatter;

/// Supported algorithms for the JSON Web Encryption `zip` claim.
///
/// [More Info](https://www.iana.org/assignments/jose/jose.xhtml#web-encryption-compression-algorithms)
#[derive(Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, serde::Deserialize, serde::Serialize)]
#[serde(from = "String", into = "String")]
pub enum JweCompression {
  /// DEFLATE.
  Deflate,
  /// Custom compression algorithm; never applied, only carried.
  Custom(String),
}

impl JweCompression {
  /// Returns the compression algorithm as a `str` slice.
  pub fn name(&self) -> &str {
    match self {
      Self::Deflate => "DEF",
      Self::Custom(inner) => inner,
    }
  }
}

impl From<String> for JweCompression {
  fn from(other: String) -> Self {
    match other.as_str() {
      "DEF" => Self::Deflate,
      _ => Self::Custom(other),
    }
  }
}

impl From<JweCompression> for String {
  fn from(other: JweCompression) -> Self {
    other.name().to_string()
  }
}

impl Display for JweCompression {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}
