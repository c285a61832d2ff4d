// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use zeroize::Zeroize;
use zeroize::ZeroizeOnDrop;

use crate::error::Error;
use crate::error::Result;
use crate::jwk::EcCurve;
use crate::jwk::EcxCurve;
use crate::jwk::EdCurve;
use crate::jwk::JwkType;

/// Algorithm-specific parameters of a JSON Web Key.
///
/// [More Info](https://tools.ietf.org/html/rfc7518#section-6)
#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(untagged)]
pub enum JwkParams {
  /// Elliptic Curve parameters.
  Ec(JwkParamsEc),
  /// RSA parameters.
  Rsa(JwkParamsRsa),
  /// Octet sequence parameters.
  Oct(JwkParamsOct),
  /// Octet string key pair parameters.
  Okp(JwkParamsOkp),
}

impl JwkParams {
  /// Returns the key type implied by the parameter set.
  pub const fn kty(&self) -> JwkType {
    match self {
      Self::Ec(_) => JwkType::Ec,
      Self::Rsa(_) => JwkType::Rsa,
      Self::Oct(_) => JwkType::Oct,
      Self::Okp(_) => JwkType::Okp,
    }
  }

  /// Returns a copy with all private key components removed; `None` for
  /// octet sequences, which have no public form.
  pub fn to_public(&self) -> Option<Self> {
    match self {
      Self::Ec(inner) => Some(Self::Ec(inner.to_public())),
      Self::Rsa(inner) => Some(Self::Rsa(inner.to_public())),
      Self::Oct(_) => None,
      Self::Okp(inner) => Some(Self::Okp(inner.to_public())),
    }
  }

  /// Returns `true` if no private key components are present.
  pub fn is_public(&self) -> bool {
    match self {
      Self::Ec(inner) => inner.d.is_none(),
      Self::Rsa(inner) => inner.d.is_none(),
      Self::Oct(_) => false,
      Self::Okp(inner) => inner.d.is_none(),
    }
  }
}

/// Parameters for Elliptic Curve Keys.
///
/// [More Info](https://tools.ietf.org/html/rfc7518#section-6.2)
#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize, Zeroize, ZeroizeOnDrop)]
pub struct JwkParamsEc {
  /// Identifies the cryptographic curve used with the key.
  pub crv: String, // Curve
  /// The `x` coordinate for the Elliptic Curve point as a base64url-encoded
  /// value.
  pub x: String, // X Coordinate
  /// The `y` coordinate for the Elliptic Curve point as a base64url-encoded
  /// value.
  pub y: String, // Y Coordinate
  /// The Elliptic Curve private key as a base64url-encoded value.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub d: Option<String>, // ECC Private Key
}

impl JwkParamsEc {
  /// Returns the curve, if it is a recognized Elliptic Curve.
  pub fn try_ec_curve(&self) -> Result<EcCurve> {
    match self.crv.as_str() {
      "P-256" => Ok(EcCurve::P256),
      "P-384" => Ok(EcCurve::P384),
      "P-521" => Ok(EcCurve::P521),
      "secp256k1" => Ok(EcCurve::Secp256K1),
      _ => Err(Error::UnsupportedAlgorithm("unknown curve")),
    }
  }

  /// Returns a copy with the private key component removed.
  pub fn to_public(&self) -> Self {
    Self {
      crv: self.crv.clone(),
      x: self.x.clone(),
      y: self.y.clone(),
      d: None,
    }
  }
}

/// Parameters for RSA Keys.
///
/// [More Info](https://tools.ietf.org/html/rfc7518#section-6.3)
#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize, Zeroize, ZeroizeOnDrop)]
pub struct JwkParamsRsa {
  /// The modulus as a base64urlUInt-encoded value.
  pub n: String, // Modulus
  /// The exponent as a base64urlUInt-encoded value.
  pub e: String, // Exponent
  /// The private exponent as a base64urlUInt-encoded value.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub d: Option<String>, // Private Exponent
  /// The first prime factor as a base64urlUInt-encoded value.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub p: Option<String>, // First Prime Factor
  /// The second prime factor as a base64urlUInt-encoded value.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub q: Option<String>, // Second Prime Factor
  /// The first factor CRT exponent as a base64urlUInt-encoded value.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub dp: Option<String>, // First Factor CRT Exponent
  /// The second factor CRT exponent as a base64urlUInt-encoded value.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub dq: Option<String>, // Second Factor CRT Exponent
  /// The first CRT coefficient as a base64urlUInt-encoded value.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub qi: Option<String>, // First CRT Coefficient
  /// Additional prime information.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub oth: Option<Vec<JwkParamsRsaPrime>>, // Other Primes Info
}

impl JwkParamsRsa {
  /// Returns a copy with all private key components removed.
  pub fn to_public(&self) -> Self {
    Self {
      n: self.n.clone(),
      e: self.e.clone(),
      d: None,
      p: None,
      q: None,
      dp: None,
      dq: None,
      qi: None,
      oth: None,
    }
  }
}

/// Additional prime information for RSA keys using more than two primes.
///
/// [More Info](https://tools.ietf.org/html/rfc7518#section-6.3.2.7)
#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize, Zeroize, ZeroizeOnDrop)]
pub struct JwkParamsRsaPrime {
  /// The value of a subsequent prime factor as a base64urlUInt-encoded value.
  pub r: String, // Prime Factor
  /// The CRT exponent of the corresponding prime factor as a
  /// base64urlUInt-encoded value.
  pub d: String, // Factor CRT Exponent
  /// The CRT coefficient of the corresponding prime factor as a
  /// base64urlUInt-encoded value.
  pub t: String, // Factor CRT Coefficient
}

/// Parameters for Symmetric Keys.
///
/// [More Info](https://tools.ietf.org/html/rfc7518#section-6.4)
#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize, Zeroize, ZeroizeOnDrop)]
pub struct JwkParamsOct {
  /// The symmetric key as a base64url-encoded value.
  pub k: String, // Key Value
}

/// Parameters for Octet String Key Pairs.
///
/// [More Info](https://tools.ietf.org/html/rfc8037#section-2)
#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize, Zeroize, ZeroizeOnDrop)]
pub struct JwkParamsOkp {
  /// The subtype of the key pair.
  pub crv: String, // Key SubType
  /// The public key as a base64url-encoded value.
  pub x: String, // Public Key
  /// The private key as a base64url-encoded value.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub d: Option<String>, // Private Key
}

impl JwkParamsOkp {
  /// Returns the curve, if it is a recognized Edwards Curve.
  pub fn try_ed_curve(&self) -> Result<EdCurve> {
    match self.crv.as_str() {
      "Ed25519" => Ok(EdCurve::Ed25519),
      "Ed448" => Ok(EdCurve::Ed448),
      _ => Err(Error::UnsupportedAlgorithm("unknown curve")),
    }
  }

  /// Returns the curve, if it is a recognized Montgomery Curve.
  pub fn try_ecx_curve(&self) -> Result<EcxCurve> {
    match self.crv.as_str() {
      "X25519" => Ok(EcxCurve::X25519),
      "X448" => Ok(EcxCurve::X448),
      _ => Err(Error::UnsupportedAlgorithm("unknown curve")),
    }
  }

  /// Returns a copy with the private key component removed.
  pub fn to_public(&self) -> Self {
    Self {
      crv: self.crv.clone(),
      x: self.x.clone(),
      d: None,
    }
  }
}

impl From<JwkParamsEc> for JwkParams {
  fn from(other: JwkParamsEc) -> Self {
    Self::Ec(other)
  }
}

impl From<JwkParamsRsa> for JwkParams {
  fn from(other: JwkParamsRsa) -> Self {
    Self::Rsa(other)
  }
}

impl From<JwkParamsOct> for JwkParams {
  fn from(other: JwkParamsOct) -> Self {
    Self::Oct(other)
  }
}

impl From<JwkParamsOkp> for JwkParams {
  fn from(other: JwkParamsOkp) -> Self {
    Self::Okp(other)
  }
}
