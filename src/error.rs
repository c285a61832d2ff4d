// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! Errors produced while emitting or consuming JOSE objects.

use core::fmt;
use core::fmt::Display;
use core::fmt::Formatter;

/// Alias for a `Result` with the error type [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All possible errors that can occur while producing or consuming
/// JWS/JWE/JWT objects.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
  /// Caused by invalid base64url content or an invalid compact serialization.
  #[error("malformed encoding: {0}")]
  MalformedEncoding(&'static str),
  /// Caused by invalid JSON content.
  #[error("invalid json")]
  InvalidJson(#[source] serde_json::Error),
  /// Caused by a `kty` member outside of {RSA, EC, OKP, oct}.
  #[error("unknown key type")]
  UnknownKeyType,
  /// Caused by an algorithm identifier that is unknown or not backed by the
  /// crypto stack.
  #[error("unsupported algorithm: {0}")]
  UnsupportedAlgorithm(&'static str),
  /// Caused by an algorithm that is known but rejected by the active
  /// [`AlgorithmConstraints`][crate::jwa::AlgorithmConstraints].
  #[error("algorithm rejected by active constraints: {0}")]
  AlgorithmConstraintViolated(&'static str),
  /// Caused by a key that does not match the algorithm family or strength
  /// requirements.
  #[error("invalid key: {0}")]
  InvalidKey(&'static str),
  /// Caused by a key resolver that returned no key.
  #[error("no key could be resolved: {0}")]
  UnresolvableKey(&'static str),
  /// Caused by a signature that failed verification.
  #[error("signature verification failed")]
  SignatureInvalid,
  /// Caused by a token without a signature where one is required.
  #[error("signature required but absent")]
  SignatureMissing,
  /// Caused by a token without integrity protection where it is required.
  #[error("integrity protection required but absent")]
  IntegrityMissing,
  /// Caused by any failure while decrypting or unwrapping. Deliberately
  /// carries no detail: tag, padding, and key-unwrap failures are
  /// indistinguishable.
  #[error("decryption failed")]
  IntegrityFailure,
  /// Caused by a `crit` entry that is not understood by the recipient.
  #[error("unrecognized critical header parameter: {0}")]
  UnrecognizedCritical(String),
  /// Caused by a registered claim with an invalid shape or value.
  #[error("malformed claim: {0}")]
  MalformedClaim(&'static str),
  /// Caused by a compressed payload that inflates beyond the configured
  /// ceiling.
  #[error("decompressed payload exceeds the configured limit")]
  DecompressionTooLarge,
  /// Caused by a header that lacks a required parameter.
  #[error("missing required header parameter: {0}")]
  MissingParam(&'static str),
  /// Caused by a failure inside a cryptographic primitive. Deliberately
  /// carries no primitive-level detail.
  #[error("cryptographic operation failed: {0}")]
  CryptoFailure(&'static str),
  /// Caused by one or more claim validation failures. Every failed validator
  /// is reported; none short-circuits the others.
  #[error("invalid jwt: {0}")]
  InvalidJwt(InvalidJwt),
}

impl Error {
  /// Returns a stable numeric code for the error kind.
  pub const fn code(&self) -> u16 {
    match self {
      Self::MalformedEncoding(_) => 1,
      Self::InvalidJson(_) => 2,
      Self::UnknownKeyType => 3,
      Self::UnsupportedAlgorithm(_) => 4,
      Self::AlgorithmConstraintViolated(_) => 5,
      Self::InvalidKey(_) => 6,
      Self::UnresolvableKey(_) => 7,
      Self::SignatureInvalid => 8,
      Self::SignatureMissing => 9,
      Self::IntegrityMissing => 10,
      Self::IntegrityFailure => 11,
      Self::UnrecognizedCritical(_) => 12,
      Self::MalformedClaim(_) => 13,
      Self::DecompressionTooLarge => 14,
      Self::MissingParam(_) => 15,
      Self::CryptoFailure(_) => 16,
      Self::InvalidJwt(_) => 17,
    }
  }
}

impl From<serde_json::Error> for Error {
  fn from(other: serde_json::Error) -> Self {
    Self::InvalidJson(other)
  }
}

// =============================================================================
// Claim Validation
// =============================================================================

/// A numeric reason code attached to a failed claim validation.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
#[repr(u16)]
pub enum ValidationCode {
  Expired = 1,
  NotYetValid = 2,
  ExpirationTooFarInFuture = 3,
  IssuedAtInvalidPast = 4,
  IssuedAtInvalidFuture = 5,
  IssuerMissing = 6,
  IssuerInvalid = 7,
  AudienceMissing = 8,
  AudienceInvalid = 9,
  SubjectMissing = 10,
  SubjectInvalid = 11,
  JwtIdMissing = 12,
  TypeMissing = 13,
  TypeInvalid = 14,
  SignatureMissing = 15,
  SignatureInvalid = 16,
  IntegrityMissing = 17,
  EncryptionMissing = 18,
  ExpirationMissing = 19,
  MalformedClaim = 20,
  Other = 21,
}

impl ValidationCode {
  /// Returns the numeric value of the code.
  pub const fn value(self) -> u16 {
    self as u16
  }
}

/// A single claim validation failure: a [`ValidationCode`] plus a
/// human-readable reason.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationItem {
  code: ValidationCode,
  message: String,
}

impl ValidationItem {
  /// Creates a new `ValidationItem`.
  pub fn new(code: ValidationCode, message: impl Into<String>) -> Self {
    Self {
      code,
      message: message.into(),
    }
  }

  /// Returns the reason code of this failure.
  pub const fn code(&self) -> ValidationCode {
    self.code
  }

  /// Returns the human-readable reason of this failure.
  pub fn message(&self) -> &str {
    &self.message
  }
}

impl Display for ValidationItem {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    write!(f, "[{}] {}", self.code.value(), self.message)
  }
}

/// The aggregated outcome of a failed consumer run. Carries every
/// [`ValidationItem`] encountered, in validator order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InvalidJwt {
  errors: Vec<ValidationItem>,
}

impl InvalidJwt {
  /// Creates a new `InvalidJwt` from the collected failures.
  pub fn new(errors: Vec<ValidationItem>) -> Self {
    Self { errors }
  }

  /// Returns all collected failures.
  pub fn errors(&self) -> &[ValidationItem] {
    &self.errors
  }

  /// Returns `true` if any failure carries the given code.
  pub fn has_code(&self, code: ValidationCode) -> bool {
    self.errors.iter().any(|item| item.code() == code)
  }
}

impl Display for InvalidJwt {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    for (index, item) in self.errors.iter().enumerate() {
      if index > 0 {
        f.write_str("; ")?;
      }
      write!(f, "{item}")?;
    }
    Ok(())
  }
}
