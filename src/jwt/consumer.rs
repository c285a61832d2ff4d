// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use serde_json::Map;
use serde_json::Value;

use crate::error::Error;
use crate::error::InvalidJwt;
use crate::error::Result;
use crate::error::ValidationCode;
use crate::error::ValidationItem;
use crate::jwa::AlgorithmConstraints;
use crate::jwe;
use crate::jwe::JweAlgorithm;
use crate::jwe::JweEncryption;
use crate::jwk::Jwk;
use crate::jwk::JwkOperation;
use crate::jwk::JwkUse;
use crate::jws;
use crate::jws::JwsAlgorithm;
use crate::jwt::claims::unix_now;
use crate::jwt::JoseLayer;
use crate::jwt::JweLayer;
use crate::jwt::JwsLayer;
use crate::jwt::JwtClaims;
use crate::jwt::JwtContext;
use crate::utils::decode_b64_json;
use crate::utils::Secret;

/// Resolves the key for a layer from the layer itself and the outer layers
/// already consumed, in processing order.
pub type KeyResolver = dyn Fn(&JoseLayer, &[JoseLayer]) -> Result<Jwk> + Send + Sync;

/// A caller-registered claim validator; returns a failure to report, if any.
pub type Validator = dyn Fn(&JwtContext) -> Option<ValidationItem> + Send + Sync;

/// Configures and builds an immutable [`JwtConsumer`].
pub struct JwtConsumerBuilder {
  verification_key: Option<Jwk>,
  verification_key_resolver: Option<Box<KeyResolver>>,
  decryption_key: Option<Jwk>,
  decryption_key_resolver: Option<Box<KeyResolver>>,
  jws_constraints: AlgorithmConstraints<JwsAlgorithm>,
  jwe_alg_constraints: AlgorithmConstraints<JweAlgorithm>,
  jwe_enc_constraints: AlgorithmConstraints<JweEncryption>,
  known_critical: Vec<String>,
  require_signature: bool,
  require_integrity: bool,
  require_encryption: bool,
  require_exp: bool,
  expected_issuers: Option<Vec<String>>,
  require_issuer: bool,
  expected_audience: Option<Vec<String>>,
  require_audience: bool,
  expected_subject: Option<String>,
  require_subject: bool,
  require_jti: bool,
  expected_type: Option<String>,
  skew: i64,
  max_future_validity: Option<i64>,
  iat_allowed_past: Option<i64>,
  iat_allowed_future: Option<i64>,
  evaluation_time: Option<i64>,
  liberal_content_type: bool,
  skip_signature_verification: bool,
  skip_all_validators: bool,
  validators: Vec<Box<Validator>>,
}

impl JwtConsumerBuilder {
  /// Creates a new `JwtConsumerBuilder` with the default requirements: a
  /// token must carry a signature or integrity-providing encryption, and
  /// the default algorithm constraints apply.
  pub fn new() -> Self {
    Self {
      verification_key: None,
      verification_key_resolver: None,
      decryption_key: None,
      decryption_key_resolver: None,
      jws_constraints: AlgorithmConstraints::default_signature(),
      jwe_alg_constraints: AlgorithmConstraints::default_key_management(),
      jwe_enc_constraints: AlgorithmConstraints::NoConstraints,
      known_critical: Vec::new(),
      require_signature: true,
      require_integrity: false,
      require_encryption: false,
      require_exp: false,
      expected_issuers: None,
      require_issuer: false,
      expected_audience: None,
      require_audience: false,
      expected_subject: None,
      require_subject: false,
      require_jti: false,
      expected_type: None,
      skew: 0,
      max_future_validity: None,
      iat_allowed_past: None,
      iat_allowed_future: None,
      evaluation_time: None,
      liberal_content_type: false,
      skip_signature_verification: false,
      skip_all_validators: false,
      validators: Vec::new(),
    }
  }

  /// Sets the fixed signature verification key.
  pub fn verification_key(mut self, value: &Jwk) -> Self {
    self.verification_key = Some(value.clone());
    self
  }

  /// Sets a callback resolving the signature verification key per layer.
  pub fn verification_key_resolver(mut self, value: impl Fn(&JoseLayer, &[JoseLayer]) -> Result<Jwk> + Send + Sync + 'static) -> Self {
    self.verification_key_resolver = Some(Box::new(value));
    self
  }

  /// Sets the fixed decryption key.
  pub fn decryption_key(mut self, value: &Jwk) -> Self {
    self.decryption_key = Some(value.clone());
    self
  }

  /// Sets a callback resolving the decryption key per layer.
  pub fn decryption_key_resolver(mut self, value: impl Fn(&JoseLayer, &[JoseLayer]) -> Result<Jwk> + Send + Sync + 'static) -> Self {
    self.decryption_key_resolver = Some(Box::new(value));
    self
  }

  /// Replaces the signature algorithm constraints.
  pub fn jws_algorithm_constraints(mut self, value: AlgorithmConstraints<JwsAlgorithm>) -> Self {
    self.jws_constraints = value;
    self
  }

  /// Replaces the key-management algorithm constraints.
  pub fn jwe_algorithm_constraints(mut self, value: AlgorithmConstraints<JweAlgorithm>) -> Self {
    self.jwe_alg_constraints = value;
    self
  }

  /// Replaces the content-encryption algorithm constraints.
  pub fn jwe_encryption_constraints(mut self, value: AlgorithmConstraints<JweEncryption>) -> Self {
    self.jwe_enc_constraints = value;
    self
  }

  /// Marks a critical header parameter as understood.
  pub fn known_critical_header(mut self, value: impl Into<String>) -> Self {
    self.known_critical.push(value.into());
    self
  }

  /// Relaxes the default signature requirement.
  pub fn disable_requiring_signature(mut self) -> Self {
    self.require_signature = false;
    self
  }

  /// Requires integrity protection: a signature or symmetric key-management
  /// encryption; purely asymmetric encryption does not qualify.
  pub fn require_integrity(mut self) -> Self {
    self.require_integrity = true;
    self
  }

  /// Requires the token to have been encrypted.
  pub fn require_encryption(mut self) -> Self {
    self.require_encryption = true;
    self
  }

  /// Requires the expiration time claim (exp) to be present.
  pub fn require_expiration_time(mut self) -> Self {
    self.require_exp = true;
    self
  }

  /// Sets the issuers accepted for the issuer claim (iss); `require`
  /// additionally demands the claim be present.
  pub fn expected_issuers(mut self, require: bool, issuers: impl IntoIterator<Item = impl Into<String>>) -> Self {
    self.expected_issuers = Some(issuers.into_iter().map(Into::into).collect());
    self.require_issuer = require;
    self
  }

  /// Sets the audiences accepted for the audience claim (aud); `require`
  /// additionally demands the claim be present.
  pub fn expected_audience(mut self, require: bool, audience: impl IntoIterator<Item = impl Into<String>>) -> Self {
    self.expected_audience = Some(audience.into_iter().map(Into::into).collect());
    self.require_audience = require;
    self
  }

  /// Sets the expected value of the subject claim (sub).
  pub fn expected_subject(mut self, value: impl Into<String>) -> Self {
    self.expected_subject = Some(value.into());
    self.require_subject = true;
    self
  }

  /// Requires the subject claim (sub) to be present.
  pub fn require_subject(mut self) -> Self {
    self.require_subject = true;
    self
  }

  /// Requires the token ID claim (jti) to be present.
  pub fn require_jwt_id(mut self) -> Self {
    self.require_jti = true;
    self
  }

  /// Sets the expected value of the outermost `typ` header, compared
  /// case-insensitively with an optional `application/` prefix.
  pub fn expected_type(mut self, value: impl Into<String>) -> Self {
    self.expected_type = Some(value.into());
    self
  }

  /// Sets the clock skew allowed by the time-based validators, in seconds.
  pub fn allowed_clock_skew_seconds(mut self, value: i64) -> Self {
    self.skew = value;
    self
  }

  /// Bounds how far in the future the expiration time may lie, in seconds.
  pub fn max_future_validity_seconds(mut self, value: i64) -> Self {
    self.max_future_validity = Some(value);
    self
  }

  /// Bounds the age of the issued-at claim (iat): at most `allowed_past`
  /// seconds in the past and `allowed_future` seconds in the future.
  pub fn issued_at_restrictions(mut self, allowed_past: i64, allowed_future: i64) -> Self {
    self.iat_allowed_past = Some(allowed_past);
    self.iat_allowed_future = Some(allowed_future);
    self
  }

  /// Pins the instant used by the time-based validators, in seconds since
  /// the epoch. Defaults to the current time.
  pub fn evaluation_time(mut self, value: i64) -> Self {
    self.evaluation_time = Some(value);
    self
  }

  /// Attempts nested processing when the payload of a layer is not valid
  /// JSON, even without a `cty` declaration.
  pub fn enable_liberal_content_type_handling(mut self) -> Self {
    self.liberal_content_type = true;
    self
  }

  /// Skips signature verification; used by the first pass of two-pass
  /// processing.
  pub fn skip_signature_verification(mut self) -> Self {
    self.skip_signature_verification = true;
    self
  }

  /// Skips every claim validator and structural requirement; used by the
  /// first pass of two-pass processing.
  pub fn skip_all_validators(mut self) -> Self {
    self.skip_all_validators = true;
    self
  }

  /// Registers an additional claim validator, run after the built-in ones.
  pub fn validator(mut self, value: impl Fn(&JwtContext) -> Option<ValidationItem> + Send + Sync + 'static) -> Self {
    self.validators.push(Box::new(value));
    self
  }

  /// Builds the immutable consumer.
  pub fn build(self) -> JwtConsumer {
    JwtConsumer { config: self }
  }
}

impl Default for JwtConsumerBuilder {
  fn default() -> Self {
    Self::new()
  }
}

/// A reusable, immutable consumer running the full JWT pipeline: nested
/// unwrap, key resolution, constraint enforcement, and claim validation.
///
/// Claim validators never short-circuit one another; every failure is
/// collected and reported in a single composite
/// [`InvalidJwt`][crate::error::Error::InvalidJwt].
pub struct JwtConsumer {
  config: JwtConsumerBuilder,
}

impl JwtConsumer {
  /// Creates a builder for a new consumer.
  pub fn builder() -> JwtConsumerBuilder {
    JwtConsumerBuilder::new()
  }

  /// Consumes the given compact JWT: unwraps every JOSE layer, decodes the
  /// innermost claims, and runs the validator battery.
  pub fn process(&self, jwt: &str) -> Result<JwtContext> {
    let mut layers: Vec<JoseLayer> = Vec::new();
    let mut current: Vec<u8> = jwt.as_bytes().to_vec();

    let payload: Vec<u8> = loop {
      let layer: JoseLayer = self.consume_layer(&current, &layers)?;
      let payload: Vec<u8> = layer.payload().to_vec();
      let nested: bool = is_nested_content_type(layer.cty());

      layers.push(layer);

      if nested {
        current = payload;
        continue;
      }

      if self.config.liberal_content_type && looks_like_compact(&payload) && !parses_as_json_object(&payload) {
        current = payload;
        continue;
      }

      break payload;
    };

    let claims: JwtClaims = serde_json::from_slice(&payload).map_err(|error| {
      Error::InvalidJwt(InvalidJwt::new(vec![ValidationItem::new(
        ValidationCode::MalformedClaim,
        format!("claims are not a valid claims set: {error}"),
      )]))
    })?;

    // The context stores layers outermost-last.
    layers.reverse();

    let context: JwtContext = JwtContext {
      layers,
      claims,
      raw: jwt.to_string(),
    };

    self.validate(&context)?;

    Ok(context)
  }

  /// Consumes the given compact JWT and returns the innermost claims.
  pub fn process_to_claims(&self, jwt: &str) -> Result<JwtClaims> {
    self.process(jwt).map(JwtContext::into_claims)
  }

  /// Runs the second pass of two-pass processing: re-verifies the layers of
  /// an already-parsed context (no re-parse, no re-decryption) and runs the
  /// validator battery.
  pub fn process_context(&self, context: &JwtContext) -> Result<JwtContext> {
    let mut layers: Vec<JoseLayer> = Vec::new();

    for layer in context.layers().iter().rev() {
      match layer {
        JoseLayer::Jws(inner) => {
          jws::check_critical(inner.header.crit(), &self.config.known_critical)?;

          let alg: JwsAlgorithm = inner.header.alg().ok_or(Error::MissingParam("alg"))?;

          if !self.config.jws_constraints.is_permitted(alg) {
            return Err(Error::AlgorithmConstraintViolated(alg.name()));
          }

          let mut updated: JwsLayer = inner.clone();

          if alg != JwsAlgorithm::NONE && !self.config.skip_signature_verification {
            let provisional: JoseLayer = JoseLayer::Jws(updated);
            let key: Jwk = self.resolve_verification_key(&provisional, &layers)?;

            updated = match provisional {
              JoseLayer::Jws(inner) => inner,
              JoseLayer::Jwe(_) => unreachable!(),
            };

            self.verify_signature(alg, &key, &updated)?;
            updated.verified = true;
          }

          layers.push(JoseLayer::Jws(updated));
        }
        JoseLayer::Jwe(inner) => {
          jws::check_critical(inner.header.crit(), &self.config.known_critical)?;

          let alg: JweAlgorithm = inner.header.alg();
          let enc: JweEncryption = inner.header.enc();

          if !self.config.jwe_alg_constraints.is_permitted(alg) {
            return Err(Error::AlgorithmConstraintViolated(alg.name()));
          }

          if !self.config.jwe_enc_constraints.is_permitted(enc) {
            return Err(Error::AlgorithmConstraintViolated(enc.name()));
          }

          layers.push(JoseLayer::Jwe(inner.clone()));
        }
      }
    }

    layers.reverse();

    let context: JwtContext = JwtContext {
      layers,
      claims: context.claims.clone(),
      raw: context.raw.clone(),
    };

    self.validate(&context)?;

    Ok(context)
  }

  // ===========================================================================
  // Layer processing
  // ===========================================================================

  fn consume_layer(&self, data: &[u8], outer: &[JoseLayer]) -> Result<JoseLayer> {
    match data.iter().filter(|byte| **byte == b'.').count() {
      2 => self.consume_jws(data, outer),
      4 => self.consume_jwe(data, outer),
      _ => Err(Error::MalformedEncoding("invalid segments")),
    }
  }

  fn consume_jws(&self, data: &[u8], outer: &[JoseLayer]) -> Result<JoseLayer> {
    let raw: jws::RawJws = jws::parse_compact(data, None)?;

    jws::check_critical(raw.protected.crit(), &self.config.known_critical)?;

    let alg: JwsAlgorithm = raw.protected.alg().ok_or(Error::MissingParam("alg"))?;

    if !self.config.jws_constraints.is_permitted(alg) {
      return Err(Error::AlgorithmConstraintViolated(alg.name()));
    }

    let layer: JwsLayer = JwsLayer {
      header: raw.protected,
      signing_input: raw.signing_input,
      signature: raw.signature,
      payload: raw.claims,
      verified: false,
    };

    if alg == JwsAlgorithm::NONE {
      // Reachable only when the constraints explicitly permit `none`.
      if !layer.signature.is_empty() {
        return Err(Error::SignatureInvalid);
      }

      return Ok(JoseLayer::Jws(layer));
    }

    let provisional: JoseLayer = JoseLayer::Jws(layer);

    if self.config.skip_signature_verification {
      return Ok(provisional);
    }

    let key: Jwk = self.resolve_verification_key(&provisional, outer)?;

    let mut layer: JwsLayer = match provisional {
      JoseLayer::Jws(inner) => inner,
      JoseLayer::Jwe(_) => unreachable!(),
    };

    self.verify_signature(alg, &key, &layer)?;
    layer.verified = true;

    Ok(JoseLayer::Jws(layer))
  }

  fn verify_signature(&self, alg: JwsAlgorithm, key: &Jwk, layer: &JwsLayer) -> Result<()> {
    key.check_use(&JwkUse::Signature)?;
    key.check_ops(&JwkOperation::Verify)?;
    key.check_alg(alg.name())?;

    jws::validate_verification_key(alg, Secret::Jwk(key))?;
    jws::verify(alg, Secret::Jwk(key), &layer.signing_input, &layer.signature)
  }

  fn consume_jwe(&self, data: &[u8], outer: &[JoseLayer]) -> Result<JoseLayer> {
    let segments: Vec<&[u8]> = data.split(|byte| *byte == b'.').collect();
    let header: jwe::JweHeader = decode_b64_json(segments[0])?;

    let provisional: JoseLayer = JoseLayer::Jwe(JweLayer {
      header,
      payload: Vec::new(),
    });

    let key: Jwk = self.resolve_decryption_key(&provisional, outer)?;

    let mut decoder: jwe::Decoder<'_> = jwe::Decoder::new(&key)
      .algorithm_constraints(self.config.jwe_alg_constraints.clone())
      .encryption_constraints(self.config.jwe_enc_constraints.clone());

    for critical in self.config.known_critical.iter() {
      decoder = decoder.critical(critical);
    }

    let jwe::Token(header, payload) = decoder.decode(data)?;

    Ok(JoseLayer::Jwe(JweLayer { header, payload }))
  }

  fn resolve_verification_key(&self, layer: &JoseLayer, outer: &[JoseLayer]) -> Result<Jwk> {
    if let Some(resolver) = self.config.verification_key_resolver.as_ref() {
      return resolver(layer, outer);
    }

    self
      .config
      .verification_key
      .clone()
      .ok_or(Error::UnresolvableKey("no verification key configured"))
  }

  fn resolve_decryption_key(&self, layer: &JoseLayer, outer: &[JoseLayer]) -> Result<Jwk> {
    if let Some(resolver) = self.config.decryption_key_resolver.as_ref() {
      return resolver(layer, outer);
    }

    self
      .config
      .decryption_key
      .clone()
      .ok_or(Error::UnresolvableKey("no decryption key configured"))
  }

  // ===========================================================================
  // Validation
  // ===========================================================================

  fn validate(&self, context: &JwtContext) -> Result<()> {
    if self.config.skip_all_validators {
      return Ok(());
    }

    let mut errors: Vec<ValidationItem> = Vec::new();

    self.check_structure(context, &mut errors);
    self.check_times(context, &mut errors);
    self.check_identity(context, &mut errors);
    self.check_type(context, &mut errors);

    for validator in self.config.validators.iter() {
      if let Some(item) = validator(context) {
        errors.push(item);
      }
    }

    if errors.is_empty() {
      Ok(())
    } else {
      Err(Error::InvalidJwt(InvalidJwt::new(errors)))
    }
  }

  fn check_structure(&self, context: &JwtContext, errors: &mut Vec<ValidationItem>) {
    let signed: bool = context.layers().iter().any(|layer| {
      matches!(layer, JoseLayer::Jws(inner) if inner.verified && inner.header.alg() != Some(JwsAlgorithm::NONE))
    });

    let integrity_encrypted: bool = context
      .layers()
      .iter()
      .any(|layer| matches!(layer, JoseLayer::Jwe(inner) if inner.header.alg().provides_integrity()));

    let encrypted: bool = context.layers().iter().any(|layer| matches!(layer, JoseLayer::Jwe(_)));

    if self.config.require_signature && !signed && !integrity_encrypted {
      errors.push(ValidationItem::new(
        ValidationCode::SignatureMissing,
        "the token carries neither a signature nor integrity-providing encryption",
      ));
    }

    if self.config.require_integrity && !signed && !integrity_encrypted {
      errors.push(ValidationItem::new(
        ValidationCode::IntegrityMissing,
        "the token lacks integrity protection",
      ));
    }

    if self.config.require_encryption && !encrypted {
      errors.push(ValidationItem::new(ValidationCode::EncryptionMissing, "the token was not encrypted"));
    }
  }

  fn check_times(&self, context: &JwtContext, errors: &mut Vec<ValidationItem>) {
    let claims: &JwtClaims = context.claims();
    let now: i64 = self.config.evaluation_time.unwrap_or_else(unix_now);
    let skew: i64 = self.config.skew;

    match claims.exp() {
      Some(exp) if exp < 0 => {
        errors.push(ValidationItem::new(ValidationCode::MalformedClaim, "`exp` must be non-negative"));
      }
      Some(exp) => {
        if now - skew > exp {
          errors.push(ValidationItem::new(
            ValidationCode::Expired,
            format!("the token expired at {exp} (evaluated at {now})"),
          ));
        }

        if let Some(max) = self.config.max_future_validity {
          if exp - (now + skew) > max {
            errors.push(ValidationItem::new(
              ValidationCode::ExpirationTooFarInFuture,
              format!("`exp` is more than {max} seconds in the future"),
            ));
          }
        }
      }
      None => {
        if self.config.require_exp {
          errors.push(ValidationItem::new(ValidationCode::ExpirationMissing, "no `exp` claim present"));
        }
      }
    }

    match claims.nbf() {
      Some(nbf) if nbf < 0 => {
        errors.push(ValidationItem::new(ValidationCode::MalformedClaim, "`nbf` must be non-negative"));
      }
      Some(nbf) if nbf > now + skew => {
        errors.push(ValidationItem::new(
          ValidationCode::NotYetValid,
          format!("the token is not valid before {nbf} (evaluated at {now})"),
        ));
      }
      _ => {}
    }

    match claims.iat() {
      Some(iat) if iat < 0 => {
        errors.push(ValidationItem::new(ValidationCode::MalformedClaim, "`iat` must be non-negative"));
      }
      Some(iat) => {
        if let Some(allowed) = self.config.iat_allowed_future {
          if iat - (now + skew) > allowed {
            errors.push(ValidationItem::new(
              ValidationCode::IssuedAtInvalidFuture,
              format!("`iat` is more than {allowed} seconds in the future"),
            ));
          }
        }

        if let Some(allowed) = self.config.iat_allowed_past {
          if (now - skew) - iat > allowed {
            errors.push(ValidationItem::new(
              ValidationCode::IssuedAtInvalidPast,
              format!("`iat` is more than {allowed} seconds in the past"),
            ));
          }
        }
      }
      None => {}
    }
  }

  fn check_identity(&self, context: &JwtContext, errors: &mut Vec<ValidationItem>) {
    let claims: &JwtClaims = context.claims();

    match (self.config.expected_issuers.as_deref(), claims.iss()) {
      (Some(expected), Some(iss)) if !expected.iter().any(|value| value == iss) => {
        errors.push(ValidationItem::new(
          ValidationCode::IssuerInvalid,
          format!("issuer {iss} is not accepted"),
        ));
      }
      (_, None) if self.config.require_issuer => {
        errors.push(ValidationItem::new(ValidationCode::IssuerMissing, "no `iss` claim present"));
      }
      _ => {}
    }

    match (self.config.expected_audience.as_deref(), claims.aud()) {
      (Some(expected), Some(aud)) if !aud.iter().any(|value| expected.iter().any(|e| e == value)) => {
        errors.push(ValidationItem::new(
          ValidationCode::AudienceInvalid,
          "none of the token audiences is accepted",
        ));
      }
      (Some(_), None) if self.config.require_audience => {
        errors.push(ValidationItem::new(ValidationCode::AudienceMissing, "no `aud` claim present"));
      }
      _ => {}
    }

    match (self.config.expected_subject.as_deref(), claims.sub()) {
      (Some(expected), Some(sub)) if expected != sub => {
        errors.push(ValidationItem::new(
          ValidationCode::SubjectInvalid,
          format!("subject {sub} is not accepted"),
        ));
      }
      (_, None) if self.config.require_subject => {
        errors.push(ValidationItem::new(ValidationCode::SubjectMissing, "no `sub` claim present"));
      }
      _ => {}
    }

    if self.config.require_jti && claims.jti().is_none() {
      errors.push(ValidationItem::new(ValidationCode::JwtIdMissing, "no `jti` claim present"));
    }
  }

  fn check_type(&self, context: &JwtContext, errors: &mut Vec<ValidationItem>) {
    let Some(expected) = self.config.expected_type.as_deref() else {
      return;
    };

    // The outermost layer is stored last.
    match context.layers().last().and_then(JoseLayer::typ) {
      Some(typ) if !media_type_matches(typ, expected) => {
        errors.push(ValidationItem::new(
          ValidationCode::TypeInvalid,
          format!("header `typ` {typ} does not match the expected {expected}"),
        ));
      }
      Some(_) => {}
      None => {
        errors.push(ValidationItem::new(ValidationCode::TypeMissing, "no `typ` header present"));
      }
    }
  }
}

// Compares media types case-insensitively, tolerating an `application/`
// prefix on either side.
fn media_type_matches(actual: &str, expected: &str) -> bool {
  let actual: &str = strip_application_prefix(actual);
  let expected: &str = strip_application_prefix(expected);

  actual.eq_ignore_ascii_case(expected)
}

fn strip_application_prefix(value: &str) -> &str {
  if value.len() >= 12 && value[..12].eq_ignore_ascii_case("application/") {
    &value[12..]
  } else {
    value
  }
}

fn is_nested_content_type(cty: Option<&str>) -> bool {
  cty.map(|value| media_type_matches(value, "JWT")).unwrap_or(false)
}

fn looks_like_compact(payload: &[u8]) -> bool {
  matches!(payload.iter().filter(|byte| **byte == b'.').count(), 2 | 4)
}

fn parses_as_json_object(payload: &[u8]) -> bool {
  serde_json::from_slice::<Map<String, Value>>(payload).is_ok()
}
