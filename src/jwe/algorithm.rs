// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use core::fmt;
use core::fmt::Display;
use core::fmt::Formatter;

/// Supported algorithms for the JSON Web Encryption `alg` claim.
///
/// [More Info](https://www.iana.org/assignments/jose/jose.xhtml#web-signature-encryption-algorithms)
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, serde::Deserialize, serde::Serialize)]
#[allow(non_camel_case_types)]
pub enum JweAlgorithm {
  /// Direct use of a shared symmetric key as the CEK.
  #[serde(rename = "dir")]
  DIR,
  /// AES Key Wrap with default initial value using 128-bit key.
  A128KW,
  /// AES Key Wrap with default initial value using 192-bit key.
  A192KW,
  /// AES Key Wrap with default initial value using 256-bit key.
  A256KW,
  /// Key wrapping with AES GCM using 128-bit key.
  A128GCMKW,
  /// Key wrapping with AES GCM using 192-bit key.
  A192GCMKW,
  /// Key wrapping with AES GCM using 256-bit key.
  A256GCMKW,
  /// PBES2 with HMAC SHA-256 and "A128KW" wrapping.
  #[serde(rename = "PBES2-HS256+A128KW")]
  PBES2_HS256_A128KW,
  /// PBES2 with HMAC SHA-384 and "A192KW" wrapping.
  #[serde(rename = "PBES2-HS384+A192KW")]
  PBES2_HS384_A192KW,
  /// PBES2 with HMAC SHA-512 and "A256KW" wrapping.
  #[serde(rename = "PBES2-HS512+A256KW")]
  PBES2_HS512_A256KW,
  /// RSAES-PKCS1-v1_5.
  RSA1_5,
  /// RSAES OAEP using default parameters.
  #[serde(rename = "RSA-OAEP")]
  RSA_OAEP,
  /// RSAES OAEP using SHA-256 and MGF1 with SHA-256.
  #[serde(rename = "RSA-OAEP-256")]
  RSA_OAEP_256,
  /// ECDH-ES using Concat KDF.
  #[serde(rename = "ECDH-ES")]
  ECDH_ES,
  /// ECDH-ES using Concat KDF and CEK wrapped with "A128KW".
  #[serde(rename = "ECDH-ES+A128KW")]
  ECDH_ES_A128KW,
  /// ECDH-ES using Concat KDF and CEK wrapped with "A192KW".
  #[serde(rename = "ECDH-ES+A192KW")]
  ECDH_ES_A192KW,
  /// ECDH-ES using Concat KDF and CEK wrapped with "A256KW".
  #[serde(rename = "ECDH-ES+A256KW")]
  ECDH_ES_A256KW,
}

impl JweAlgorithm {
  /// A slice of all supported [`JweAlgorithm`]s.
  pub const ALL: &'static [Self] = &[
    Self::DIR,
    Self::A128KW,
    Self::A192KW,
    Self::A256KW,
    Self::A128GCMKW,
    Self::A192GCMKW,
    Self::A256GCMKW,
    Self::PBES2_HS256_A128KW,
    Self::PBES2_HS384_A192KW,
    Self::PBES2_HS512_A256KW,
    Self::RSA1_5,
    Self::RSA_OAEP,
    Self::RSA_OAEP_256,
    Self::ECDH_ES,
    Self::ECDH_ES_A128KW,
    Self::ECDH_ES_A192KW,
    Self::ECDH_ES_A256KW,
  ];

  /// Returns the JWE algorithm as a `str` slice.
  pub const fn name(self) -> &'static str {
    match self {
      Self::DIR => "dir",
      Self::A128KW => "A128KW",
      Self::A192KW => "A192KW",
      Self::A256KW => "A256KW",
      Self::A128GCMKW => "A128GCMKW",
      Self::A192GCMKW => "A192GCMKW",
      Self::A256GCMKW => "A256GCMKW",
      Self::PBES2_HS256_A128KW => "PBES2-HS256+A128KW",
      Self::PBES2_HS384_A192KW => "PBES2-HS384+A192KW",
      Self::PBES2_HS512_A256KW => "PBES2-HS512+A256KW",
      Self::RSA1_5 => "RSA1_5",
      Self::RSA_OAEP => "RSA-OAEP",
      Self::RSA_OAEP_256 => "RSA-OAEP-256",
      Self::ECDH_ES => "ECDH-ES",
      Self::ECDH_ES_A128KW => "ECDH-ES+A128KW",
      Self::ECDH_ES_A192KW => "ECDH-ES+A192KW",
      Self::ECDH_ES_A256KW => "ECDH-ES+A256KW",
    }
  }

  /// Returns the symmetric key length required of the management key, if
  /// the algorithm uses one.
  pub const fn try_key_len(self) -> Option<usize> {
    match self {
      Self::A128KW | Self::A128GCMKW => Some(16),
      Self::A192KW | Self::A192GCMKW => Some(24),
      Self::A256KW | Self::A256GCMKW => Some(32),
      _ => None,
    }
  }

  /// Returns the length of the key produced by the PBES2 derivation or the
  /// ECDH-ES Concat KDF in key-wrap mode, if applicable.
  pub const fn try_wrap_key_len(self) -> Option<usize> {
    match self {
      Self::PBES2_HS256_A128KW | Self::ECDH_ES_A128KW => Some(16),
      Self::PBES2_HS384_A192KW | Self::ECDH_ES_A192KW => Some(24),
      Self::PBES2_HS512_A256KW | Self::ECDH_ES_A256KW => Some(32),
      _ => None,
    }
  }

  /// Returns `true` if producing a token under this algorithm requires
  /// possession of a shared secret, i.e. the encryption itself vouches for
  /// the sender.
  ///
  /// Purely asymmetric modes (RSA and ECDH-ES) allow anyone holding the
  /// public key to produce a token.
  pub const fn provides_integrity(self) -> bool {
    matches!(
      self,
      Self::DIR
        | Self::A128KW
        | Self::A192KW
        | Self::A256KW
        | Self::A128GCMKW
        | Self::A192GCMKW
        | Self::A256GCMKW
        | Self::PBES2_HS256_A128KW
        | Self::PBES2_HS384_A192KW
        | Self::PBES2_HS512_A256KW
    )
  }
}

impl Display for JweAlgorithm {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}
