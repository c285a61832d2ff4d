// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use core::fmt;
use crypto::hashes::sha::SHA256;
use crypto::hashes::sha::SHA256_LEN;
use serde::de;
use serde::ser::SerializeMap;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;
use serde_json::Map;
use serde_json::Value;
use url::Url;

use crate::error::Error;
use crate::error::Result;
use crate::jwk::JwkOperation;
use crate::jwk::JwkParams;
use crate::jwk::JwkParamsEc;
use crate::jwk::JwkParamsOct;
use crate::jwk::JwkParamsOkp;
use crate::jwk::JwkParamsRsa;
use crate::jwk::JwkType;
use crate::jwk::JwkUse;

/// A JSON Web Key.
///
/// [More Info](https://tools.ietf.org/html/rfc7517#section-4)
///
/// Members that are not recognized are preserved verbatim and re-emitted on
/// serialization, after all recognized members.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Jwk {
  kty: JwkType,
  use_: Option<JwkUse>,
  key_ops: Option<Vec<JwkOperation>>,
  alg: Option<String>,
  kid: Option<String>,
  x5u: Option<Url>,
  x5c: Option<Vec<String>>,
  x5t: Option<String>,
  x5t_s256: Option<String>,
  params: Option<JwkParams>,
  properties: Map<String, Value>,
}

impl Jwk {
  /// Creates a new `Jwk` with the given key type.
  pub fn new(kty: JwkType) -> Self {
    Self {
      kty,
      use_: None,
      key_ops: None,
      alg: None,
      kid: None,
      x5u: None,
      x5c: None,
      x5t: None,
      x5t_s256: None,
      params: None,
      properties: Map::new(),
    }
  }

  /// Creates a new `Jwk` from the given type-specific parameters.
  pub fn from_params(params: impl Into<JwkParams>) -> Self {
    let params: JwkParams = params.into();
    let mut jwk: Self = Self::new(params.kty());

    jwk.params = Some(params);

    jwk
  }

  /// Returns the value for the key type parameter (kty).
  pub fn kty(&self) -> JwkType {
    self.kty
  }

  /// Sets a value for the key type parameter (kty).
  pub fn set_kty(&mut self, value: impl Into<JwkType>) {
    self.kty = value.into();
  }

  /// Returns the value for the use parameter (use).
  pub fn use_(&self) -> Option<&JwkUse> {
    self.use_.as_ref()
  }

  /// Sets a value for the use parameter (use).
  pub fn set_use(&mut self, value: impl Into<JwkUse>) {
    self.use_ = Some(value.into());
  }

  /// Returns the value for the key operations parameter (key_ops).
  pub fn key_ops(&self) -> Option<&[JwkOperation]> {
    self.key_ops.as_deref()
  }

  /// Sets values for the key operations parameter (key_ops).
  pub fn set_key_ops(&mut self, value: impl IntoIterator<Item = impl Into<JwkOperation>>) {
    self.key_ops = Some(value.into_iter().map(Into::into).collect());
  }

  /// Returns the value for the algorithm parameter (alg).
  pub fn alg(&self) -> Option<&str> {
    self.alg.as_deref()
  }

  /// Sets a value for the algorithm parameter (alg).
  pub fn set_alg(&mut self, value: impl Into<String>) {
    self.alg = Some(value.into());
  }

  /// Returns the value of the key ID parameter (kid).
  pub fn kid(&self) -> Option<&str> {
    self.kid.as_deref()
  }

  /// Sets a value for the key ID parameter (kid).
  pub fn set_kid(&mut self, value: impl Into<String>) {
    self.kid = Some(value.into());
  }

  /// Returns the value of the X.509 URL parameter (x5u).
  pub fn x5u(&self) -> Option<&Url> {
    self.x5u.as_ref()
  }

  /// Sets a value for the X.509 URL parameter (x5u).
  pub fn set_x5u(&mut self, value: impl Into<Url>) {
    self.x5u = Some(value.into());
  }

  /// Returns the value of the X.509 certificate chain parameter (x5c).
  pub fn x5c(&self) -> Option<&[String]> {
    self.x5c.as_deref()
  }

  /// Sets values for the X.509 certificate chain parameter (x5c).
  pub fn set_x5c(&mut self, value: impl IntoIterator<Item = impl Into<String>>) {
    self.x5c = Some(value.into_iter().map(Into::into).collect());
  }

  /// Returns the value of the X.509 certificate SHA-1 thumbprint parameter
  /// (x5t).
  pub fn x5t(&self) -> Option<&str> {
    self.x5t.as_deref()
  }

  /// Sets a value for the X.509 certificate SHA-1 thumbprint parameter (x5t).
  pub fn set_x5t(&mut self, value: impl Into<String>) {
    self.x5t = Some(value.into());
  }

  /// Returns the value of the X.509 certificate SHA-256 thumbprint parameter
  /// (x5t#S256).
  pub fn x5t_s256(&self) -> Option<&str> {
    self.x5t_s256.as_deref()
  }

  /// Sets a value for the X.509 certificate SHA-256 thumbprint parameter
  /// (x5t#S256).
  pub fn set_x5t_s256(&mut self, value: impl Into<String>) {
    self.x5t_s256 = Some(value.into());
  }

  /// Returns a reference to the custom properties.
  pub fn properties(&self) -> &Map<String, Value> {
    &self.properties
  }

  /// Sets a custom property, preserved on serialization after all
  /// recognized members.
  pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<Value>) {
    self.properties.insert(key.into(), value.into());
  }

  // ===========================================================================
  // Parameters
  // ===========================================================================

  /// Returns the type-specific parameters, if set.
  pub fn params(&self) -> Option<&JwkParams> {
    self.params.as_ref()
  }

  /// Sets the type-specific parameters; fails when the parameter set does
  /// not match the key type.
  pub fn set_params(&mut self, params: impl Into<JwkParams>) -> Result<()> {
    let params: JwkParams = params.into();

    if params.kty() != self.kty {
      return Err(Error::InvalidKey("parameter mismatch"));
    }

    self.params = Some(params);

    Ok(())
  }

  /// Returns the EC parameters; fails when this is not an EC key.
  pub fn try_ec_params(&self) -> Result<&JwkParamsEc> {
    match (self.kty, self.params()) {
      (JwkType::Ec, Some(JwkParams::Ec(params))) => Ok(params),
      _ => Err(Error::InvalidKey("expected an EC key")),
    }
  }

  /// Returns the RSA parameters; fails when this is not an RSA key.
  pub fn try_rsa_params(&self) -> Result<&JwkParamsRsa> {
    match (self.kty, self.params()) {
      (JwkType::Rsa, Some(JwkParams::Rsa(params))) => Ok(params),
      _ => Err(Error::InvalidKey("expected an RSA key")),
    }
  }

  /// Returns the oct parameters; fails when this is not a symmetric key.
  pub fn try_oct_params(&self) -> Result<&JwkParamsOct> {
    match (self.kty, self.params()) {
      (JwkType::Oct, Some(JwkParams::Oct(params))) => Ok(params),
      _ => Err(Error::InvalidKey("expected a symmetric key")),
    }
  }

  /// Returns the OKP parameters; fails when this is not an OKP key.
  pub fn try_okp_params(&self) -> Result<&JwkParamsOkp> {
    match (self.kty, self.params()) {
      (JwkType::Okp, Some(JwkParams::Okp(params))) => Ok(params),
      _ => Err(Error::InvalidKey("expected an OKP key")),
    }
  }

  // ===========================================================================
  // Key checks
  // ===========================================================================

  /// Fails when the `use` parameter is set and differs from `expected`.
  pub fn check_use(&self, expected: &JwkUse) -> Result<()> {
    match self.use_() {
      Some(value) if value != expected => Err(Error::InvalidKey("`use` does not permit this operation")),
      _ => Ok(()),
    }
  }

  /// Fails when the `key_ops` parameter is set and omits `expected`.
  pub fn check_ops(&self, expected: &JwkOperation) -> Result<()> {
    match self.key_ops() {
      Some(ops) if !ops.contains(expected) => Err(Error::InvalidKey("`key_ops` does not permit this operation")),
      _ => Ok(()),
    }
  }

  /// Fails when the `alg` parameter is set and differs from `expected`.
  pub fn check_alg(&self, expected: &str) -> Result<()> {
    match self.alg() {
      Some(value) if value != expected => Err(Error::InvalidKey("`alg` does not permit this algorithm")),
      _ => Ok(()),
    }
  }

  /// Returns `true` if the key contains no private components.
  pub fn is_public(&self) -> bool {
    self.params().map(JwkParams::is_public).unwrap_or(true)
  }

  /// Returns a copy of the key with all private components removed; `None`
  /// for symmetric keys, which have no public form.
  pub fn to_public(&self) -> Option<Jwk> {
    let params: Option<JwkParams> = match self.params() {
      Some(params) => Some(params.to_public()?),
      None if self.kty == JwkType::Oct => return None,
      None => None,
    };

    let mut jwk: Jwk = self.clone();

    jwk.params = params;

    Some(jwk)
  }

  // ===========================================================================
  // Thumbprint
  // ===========================================================================

  /// Computes the RFC 7638 SHA-256 thumbprint: the digest of the canonical
  /// JSON form of the required members, in lexicographic order.
  pub fn thumbprint_sha256(&self) -> Result<[u8; SHA256_LEN]> {
    let json: String = self.thumbprint_json()?;
    let mut digest: [u8; SHA256_LEN] = [0; SHA256_LEN];

    SHA256(json.as_bytes(), &mut digest);

    Ok(digest)
  }

  /// Computes the base64url-encoded RFC 7638 SHA-256 thumbprint.
  pub fn thumbprint_b64(&self) -> Result<String> {
    self.thumbprint_sha256().map(crate::utils::encode_b64)
  }

  /// Computes the RFC 9278 JWK thumbprint URI.
  pub fn thumbprint_uri(&self) -> Result<String> {
    let thumbprint: String = self.thumbprint_b64()?;

    Ok(format!("urn:ietf:params:oauth:jwk-thumbprint:sha-256:{thumbprint}"))
  }

  fn thumbprint_json(&self) -> Result<String> {
    // The base64url member values never require JSON string escaping.
    match self.params() {
      Some(JwkParams::Ec(params)) => Ok(format!(
        r#"{{"crv":"{}","kty":"EC","x":"{}","y":"{}"}}"#,
        params.crv, params.x, params.y,
      )),
      Some(JwkParams::Rsa(params)) => Ok(format!(r#"{{"e":"{}","kty":"RSA","n":"{}"}}"#, params.e, params.n)),
      Some(JwkParams::Oct(params)) => Ok(format!(r#"{{"k":"{}","kty":"oct"}}"#, params.k)),
      Some(JwkParams::Okp(params)) => Ok(format!(r#"{{"crv":"{}","kty":"OKP","x":"{}"}}"#, params.crv, params.x)),
      None => Err(Error::InvalidKey("missing key parameters")),
    }
  }
}

// =============================================================================
// Serde
// =============================================================================

impl Serialize for Jwk {
  fn serialize<S>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error>
  where
    S: Serializer,
  {
    let params: Option<Value> = self
      .params
      .as_ref()
      .map(serde_json::to_value)
      .transpose()
      .map_err(serde::ser::Error::custom)?;

    let mut map = serializer.serialize_map(None)?;

    map.serialize_entry("kty", self.kty.name())?;

    if let Some(value) = self.use_.as_ref() {
      map.serialize_entry("use", value.name())?;
    }

    if let Some(value) = self.key_ops.as_ref() {
      map.serialize_entry("key_ops", value)?;
    }

    if let Some(value) = self.alg.as_deref() {
      map.serialize_entry("alg", value)?;
    }

    if let Some(value) = self.kid.as_deref() {
      map.serialize_entry("kid", value)?;
    }

    if let Some(value) = self.x5u.as_ref() {
      map.serialize_entry("x5u", value.as_str())?;
    }

    if let Some(value) = self.x5c.as_ref() {
      map.serialize_entry("x5c", value)?;
    }

    if let Some(value) = self.x5t.as_deref() {
      map.serialize_entry("x5t", value)?;
    }

    if let Some(value) = self.x5t_s256.as_deref() {
      map.serialize_entry("x5t#S256", value)?;
    }

    if let Some(Value::Object(entries)) = params {
      for (key, value) in entries.iter() {
        map.serialize_entry(key, value)?;
      }
    }

    for (key, value) in self.properties.iter() {
      map.serialize_entry(key, value)?;
    }

    map.end()
  }
}

impl<'de> Deserialize<'de> for Jwk {
  fn deserialize<D>(deserializer: D) -> core::result::Result<Self, D::Error>
  where
    D: Deserializer<'de>,
  {
    let mut entries: Map<String, Value> = Map::deserialize(deserializer)?;

    let kty: JwkType = match entries.shift_remove("kty") {
      Some(Value::String(kty)) => match kty.as_str() {
        "EC" => JwkType::Ec,
        "RSA" => JwkType::Rsa,
        "oct" => JwkType::Oct,
        "OKP" => JwkType::Okp,
        _ => return Err(de::Error::custom("unknown key type")),
      },
      Some(_) => return Err(de::Error::custom("unknown key type")),
      None => return Err(de::Error::missing_field("kty")),
    };

    fn take<'de, T, D>(entries: &mut Map<String, Value>, key: &str) -> core::result::Result<Option<T>, D::Error>
    where
      T: serde::de::DeserializeOwned,
      D: Deserializer<'de>,
    {
      entries
        .shift_remove(key)
        .map(serde_json::from_value)
        .transpose()
        .map_err(de::Error::custom)
    }

    let use_: Option<JwkUse> = take::<_, D>(&mut entries, "use")?;
    let key_ops: Option<Vec<JwkOperation>> = take::<_, D>(&mut entries, "key_ops")?;
    let alg: Option<String> = take::<_, D>(&mut entries, "alg")?;
    let kid: Option<String> = take::<_, D>(&mut entries, "kid")?;
    let x5u: Option<Url> = take::<_, D>(&mut entries, "x5u")?;
    let x5c: Option<Vec<String>> = take::<_, D>(&mut entries, "x5c")?;
    let x5t: Option<String> = take::<_, D>(&mut entries, "x5t")?;
    let x5t_s256: Option<String> = take::<_, D>(&mut entries, "x5t#S256")?;

    let keys: &[&str] = match kty {
      JwkType::Ec => &["crv", "x", "y", "d"],
      JwkType::Rsa => &["n", "e", "d", "p", "q", "dp", "dq", "qi", "oth"],
      JwkType::Oct => &["k"],
      JwkType::Okp => &["crv", "x", "d"],
    };

    let mut typed: Map<String, Value> = Map::new();

    for key in keys {
      if let Some(value) = entries.shift_remove(*key) {
        typed.insert((*key).to_string(), value);
      }
    }

    let params: Option<JwkParams> = if typed.is_empty() {
      None
    } else {
      let params: JwkParams = match kty {
        JwkType::Ec => serde_json::from_value::<JwkParamsEc>(Value::Object(typed))
          .map(JwkParams::Ec)
          .map_err(de::Error::custom)?,
        JwkType::Rsa => serde_json::from_value::<JwkParamsRsa>(Value::Object(typed))
          .map(JwkParams::Rsa)
          .map_err(de::Error::custom)?,
        JwkType::Oct => serde_json::from_value::<JwkParamsOct>(Value::Object(typed))
          .map(JwkParams::Oct)
          .map_err(de::Error::custom)?,
        JwkType::Okp => serde_json::from_value::<JwkParamsOkp>(Value::Object(typed))
          .map(JwkParams::Okp)
          .map_err(de::Error::custom)?,
      };

      Some(params)
    };

    Ok(Self {
      kty,
      use_,
      key_ops,
      alg,
      kid,
      x5u,
      x5c,
      x5t,
      x5t_s256,
      params,
      properties: entries,
    })
  }
}

impl fmt::Display for Jwk {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self.kid() {
      Some(kid) => write!(f, "Jwk({}, {})", self.kty, kid),
      None => write!(f, "Jwk({})", self.kty),
    }
  }
}
