// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use core::fmt;
use core::fmt::Display;
use core::fmt::Formatter;

/// Supported Elliptic Curves.
///
/// [More Info](https://www.iana.org/assignments/jose/jose.xhtml#web-key-elliptic-curve)
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum EcCurve {
  /// P-256 Curve.
  P256,
  /// P-384 Curve.
  P384,
  /// P-521 Curve.
  P521,
  /// SECG secp256k1 curve.
  Secp256K1,
}

impl EcCurve {
  /// Returns the name of the curve as a string slice.
  pub const fn name(self) -> &'static str {
    match self {
      Self::P256 => "P-256",
      Self::P384 => "P-384",
      Self::P521 => "P-521",
      Self::Secp256K1 => "secp256k1",
    }
  }

  /// Returns the octet length of a single coordinate on the curve.
  pub const fn field_len(self) -> usize {
    match self {
      Self::P256 => 32,
      Self::P384 => 48,
      Self::P521 => 66,
      Self::Secp256K1 => 32,
    }
  }
}

impl Display for EcCurve {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

/// Supported Edwards Curves.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum EdCurve {
  /// Ed25519 signature algorithm key pairs.
  Ed25519,
  /// Ed448 signature algorithm key pairs.
  Ed448,
}

impl EdCurve {
  /// Returns the name of the curve as a string slice.
  pub const fn name(self) -> &'static str {
    match self {
      Self::Ed25519 => "Ed25519",
      Self::Ed448 => "Ed448",
    }
  }
}

impl Display for EdCurve {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

/// Supported Montgomery Curves.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum EcxCurve {
  /// X25519 function key pairs.
  X25519,
  /// X448 function key pairs.
  X448,
}

impl EcxCurve {
  /// Returns the name of the curve as a string slice.
  pub const fn name(self) -> &'static str {
    match self {
      Self::X25519 => "X25519",
      Self::X448 => "X448",
    }
  }
}

impl Display for EcxCurve {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}
