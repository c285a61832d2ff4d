// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use zeroize::Zeroizing;

use crate::error::Error;
use crate::error::Result;
use crate::jwk::Jwk;
use crate::utils::decode_b64;

/// A borrowed handle to the key material driving a sign/verify or
/// encrypt/decrypt cycle.
#[derive(Clone, Copy, Debug)]
pub enum Secret<'a> {
  /// A JSON Web Key.
  Jwk(&'a Jwk),
  /// Raw octets used directly as symmetric key material or as a PBES2
  /// password.
  Arr(&'a [u8]),
}

impl<'a> Secret<'a> {
  /// Returns the raw symmetric bytes of this secret; fails with `InvalidKey`
  /// when fewer than `min_len` bytes are available.
  pub fn to_oct_key(self, min_len: usize) -> Result<Zeroizing<Vec<u8>>> {
    let bytes: Zeroizing<Vec<u8>> = match self {
      Self::Jwk(jwk) => Zeroizing::new(decode_b64(&jwk.try_oct_params()?.k)?),
      Self::Arr(arr) => Zeroizing::new(arr.to_vec()),
    };

    if bytes.len() < min_len {
      return Err(Error::InvalidKey("insufficient key material"));
    }

    Ok(bytes)
  }

  /// Returns the underlying [`Jwk`]; fails for raw octet secrets.
  pub fn jwk(self) -> Result<&'a Jwk> {
    match self {
      Self::Jwk(jwk) => Ok(jwk),
      Self::Arr(_) => Err(Error::InvalidKey("expected a json web key")),
    }
  }
}

impl<'a> From<&'a Jwk> for Secret<'a> {
  fn from(other: &'a Jwk) -> Self {
    Self::Jwk(other)
  }
}

impl<'a> From<&'a [u8]> for Secret<'a> {
  fn from(other: &'a [u8]) -> Self {
    Self::Arr(other)
  }
}

impl<'a> From<&'a Vec<u8>> for Secret<'a> {
  fn from(other: &'a Vec<u8>) -> Self {
    Self::Arr(other)
  }
}
