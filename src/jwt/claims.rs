// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use std::time::SystemTime;

use serde_json::Map;
use serde_json::Value;

/// The `aud` claim: a single string or an array of strings.
///
/// [More Info](https://tools.ietf.org/html/rfc7519#section-4.1.3)
#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(untagged)]
pub enum Audience {
  /// A single audience value.
  One(String),
  /// A list of audience values.
  Many(Vec<String>),
}

impl Audience {
  /// Returns an iterator over the audience values.
  pub fn iter(&self) -> impl Iterator<Item = &str> {
    match self {
      Self::One(value) => core::slice::from_ref(value).iter().map(String::as_str),
      Self::Many(values) => values.as_slice().iter().map(String::as_str),
    }
  }

  /// Returns `true` if `audience` is among the values.
  pub fn contains(&self, audience: &str) -> bool {
    self.iter().any(|value| value == audience)
  }
}

impl From<&str> for Audience {
  fn from(other: &str) -> Self {
    Self::One(other.to_string())
  }
}

impl From<String> for Audience {
  fn from(other: String) -> Self {
    Self::One(other)
  }
}

impl From<Vec<String>> for Audience {
  fn from(other: Vec<String>) -> Self {
    Self::Many(other)
  }
}

impl From<Vec<&str>> for Audience {
  fn from(other: Vec<&str>) -> Self {
    Self::Many(other.into_iter().map(ToString::to_string).collect())
  }
}

/// JSON Web Token Claims Set.
///
/// [More Info](https://tools.ietf.org/html/rfc7519#section-4)
///
/// Claims that are not registered are preserved verbatim and re-emitted on
/// serialization, after all registered claims.
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct JwtClaims {
  /// Issuer.
  ///
  /// [More Info](https://tools.ietf.org/html/rfc7519#section-4.1.1)
  #[serde(skip_serializing_if = "Option::is_none")]
  iss: Option<String>,
  /// Subject.
  ///
  /// [More Info](https://tools.ietf.org/html/rfc7519#section-4.1.2)
  #[serde(skip_serializing_if = "Option::is_none")]
  sub: Option<String>,
  /// Audience.
  ///
  /// [More Info](https://tools.ietf.org/html/rfc7519#section-4.1.3)
  #[serde(skip_serializing_if = "Option::is_none")]
  aud: Option<Audience>,
  /// Expiration Time, in seconds since the epoch.
  ///
  /// [More Info](https://tools.ietf.org/html/rfc7519#section-4.1.4)
  #[serde(skip_serializing_if = "Option::is_none")]
  exp: Option<i64>,
  /// Not Before, in seconds since the epoch.
  ///
  /// [More Info](https://tools.ietf.org/html/rfc7519#section-4.1.5)
  #[serde(skip_serializing_if = "Option::is_none")]
  nbf: Option<i64>,
  /// Issued At, in seconds since the epoch.
  ///
  /// [More Info](https://tools.ietf.org/html/rfc7519#section-4.1.6)
  #[serde(skip_serializing_if = "Option::is_none")]
  iat: Option<i64>,
  /// JWT ID.
  ///
  /// [More Info](https://tools.ietf.org/html/rfc7519#section-4.1.7)
  #[serde(skip_serializing_if = "Option::is_none")]
  jti: Option<String>,
  /// Additional claims.
  #[serde(flatten, skip_serializing_if = "Map::is_empty")]
  custom: Map<String, Value>,
}

impl JwtClaims {
  /// Create a new empty `JwtClaims`.
  pub fn new() -> Self {
    Self::default()
  }

  /// Returns the value of the issuer claim (iss).
  pub fn iss(&self) -> Option<&str> {
    self.iss.as_deref()
  }

  /// Sets a value for the issuer claim (iss).
  pub fn set_iss(&mut self, value: impl Into<String>) {
    self.iss = Some(value.into());
  }

  /// Returns the value of the subject claim (sub).
  pub fn sub(&self) -> Option<&str> {
    self.sub.as_deref()
  }

  /// Sets a value for the subject claim (sub).
  pub fn set_sub(&mut self, value: impl Into<String>) {
    self.sub = Some(value.into());
  }

  /// Returns the value of the audience claim (aud).
  pub fn aud(&self) -> Option<&Audience> {
    self.aud.as_ref()
  }

  /// Sets a value for the audience claim (aud).
  pub fn set_aud(&mut self, value: impl Into<Audience>) {
    self.aud = Some(value.into());
  }

  /// Returns the value of the expiration time claim (exp).
  pub fn exp(&self) -> Option<i64> {
    self.exp
  }

  /// Sets a value for the expiration time claim (exp).
  pub fn set_exp(&mut self, value: impl Into<i64>) {
    self.exp = Some(value.into());
  }

  /// Returns the value of the not-before claim (nbf).
  pub fn nbf(&self) -> Option<i64> {
    self.nbf
  }

  /// Sets a value for the not-before claim (nbf).
  pub fn set_nbf(&mut self, value: impl Into<i64>) {
    self.nbf = Some(value.into());
  }

  /// Returns the value of the issued-at claim (iat).
  pub fn iat(&self) -> Option<i64> {
    self.iat
  }

  /// Sets a value for the issued-at claim (iat).
  pub fn set_iat(&mut self, value: impl Into<i64>) {
    self.iat = Some(value.into());
  }

  /// Returns the value of the token ID claim (jti).
  pub fn jti(&self) -> Option<&str> {
    self.jti.as_deref()
  }

  /// Sets a value for the token ID claim (jti).
  pub fn set_jti(&mut self, value: impl Into<String>) {
    self.jti = Some(value.into());
  }

  /// Returns a reference to the additional claims.
  pub fn custom(&self) -> &Map<String, Value> {
    &self.custom
  }

  /// Returns the additional claim `name`, if present.
  pub fn custom_claim(&self, name: &str) -> Option<&Value> {
    self.custom.get(name)
  }

  /// Sets an additional claim.
  pub fn set_custom_claim(&mut self, name: impl Into<String>, value: impl Into<Value>) {
    self.custom.insert(name.into(), value.into());
  }

  // ===========================================================================
  // Date arithmetic
  // ===========================================================================

  /// Sets the issued-at claim (iat) to the current time.
  pub fn set_iat_now(&mut self) {
    self.iat = Some(unix_now());
  }

  /// Sets the expiration time claim (exp) to `minutes` in the future.
  pub fn set_exp_minutes_in_the_future(&mut self, minutes: u32) {
    self.exp = Some(unix_now() + i64::from(minutes) * 60);
  }

  /// Sets the not-before claim (nbf) to `minutes` in the past.
  pub fn set_nbf_minutes_in_the_past(&mut self, minutes: u32) {
    self.nbf = Some(unix_now() - i64::from(minutes) * 60);
  }
}

pub(crate) fn unix_now() -> i64 {
  SystemTime::now()
    .duration_since(SystemTime::UNIX_EPOCH)
    .map(|duration| duration.as_secs() as i64)
    .unwrap_or_default()
}

#[cfg(test)]
mod tests {
  use super::Audience;
  use super::JwtClaims;

  #[test]
  fn test_audience_shapes() {
    let one: JwtClaims = serde_json::from_str(r#"{"aud":"joe"}"#).unwrap();
    let many: JwtClaims = serde_json::from_str(r#"{"aud":["joe","bob"]}"#).unwrap();

    assert_eq!(one.aud(), Some(&Audience::One("joe".to_string())));
    assert!(many.aud().unwrap().contains("bob"));
    assert!(serde_json::from_str::<JwtClaims>(r#"{"aud":42}"#).is_err());
  }

  #[test]
  fn test_custom_claims_roundtrip() {
    let json: &str = r#"{"iss":"joe","exp":1300819380,"http://example.com/is_root":true}"#;
    let claims: JwtClaims = serde_json::from_str(json).unwrap();

    assert_eq!(claims.iss(), Some("joe"));
    assert_eq!(claims.exp(), Some(1300819380));
    assert_eq!(
      claims.custom_claim("http://example.com/is_root"),
      Some(&serde_json::Value::Bool(true))
    );
    assert_eq!(serde_json::to_string(&claims).unwrap(), json);
  }

  #[test]
  fn test_non_numeric_exp_rejected() {
    assert!(serde_json::from_str::<JwtClaims>(r#"{"exp":"soon"}"#).is_err());
  }
}
