// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! JSON Web Algorithms ([JWA](https://tools.ietf.org/html/rfc7518)):
//! constraints applied to the algorithms accepted by a processing path.

use crate::jwe::JweAlgorithm;
use crate::jws::JwsAlgorithm;

/// A permit- or block-list over an algorithm registry.
///
/// A constraint set is consulted before any key material reaches a
/// primitive; a rejected algorithm fails with
/// [`AlgorithmConstraintViolated`][crate::error::Error::AlgorithmConstraintViolated].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AlgorithmConstraints<T> {
  /// Any known algorithm is acceptable.
  NoConstraints,
  /// Only the listed algorithms are acceptable.
  Permit(Vec<T>),
  /// Any known algorithm except the listed ones is acceptable.
  Block(Vec<T>),
}

impl<T: Copy + PartialEq> AlgorithmConstraints<T> {
  /// Creates a permit-list over `algs`.
  pub fn permit(algs: impl IntoIterator<Item = T>) -> Self {
    Self::Permit(algs.into_iter().collect())
  }

  /// Creates a block-list over `algs`.
  pub fn block(algs: impl IntoIterator<Item = T>) -> Self {
    Self::Block(algs.into_iter().collect())
  }

  /// Returns `true` if `alg` passes the constraint set.
  pub fn is_permitted(&self, alg: T) -> bool {
    match self {
      Self::NoConstraints => true,
      Self::Permit(algs) => algs.contains(&alg),
      Self::Block(algs) => !algs.contains(&alg),
    }
  }
}

impl<T> Default for AlgorithmConstraints<T> {
  fn default() -> Self {
    Self::NoConstraints
  }
}

impl AlgorithmConstraints<JwsAlgorithm> {
  /// The default signature constraints: every algorithm except `none`.
  pub fn default_signature() -> Self {
    Self::Block(vec![JwsAlgorithm::NONE])
  }
}

impl AlgorithmConstraints<JweAlgorithm> {
  /// The default key-management constraints: every algorithm except
  /// `RSA1_5` and the `PBES2` family, which require explicit opt-in.
  pub fn default_key_management() -> Self {
    Self::Block(vec![
      JweAlgorithm::RSA1_5,
      JweAlgorithm::PBES2_HS256_A128KW,
      JweAlgorithm::PBES2_HS384_A192KW,
      JweAlgorithm::PBES2_HS512_A256KW,
    ])
  }
}

#[cfg(test)]
mod tests {
  use super::AlgorithmConstraints;
  use crate::jwe::JweAlgorithm;
  use crate::jws::JwsAlgorithm;

  #[test]
  fn test_default_signature_blocks_none() {
    let constraints = AlgorithmConstraints::default_signature();

    assert!(!constraints.is_permitted(JwsAlgorithm::NONE));
    assert!(constraints.is_permitted(JwsAlgorithm::HS256));
    assert!(constraints.is_permitted(JwsAlgorithm::EdDSA));
  }

  #[test]
  fn test_default_key_management_blocks_legacy() {
    let constraints = AlgorithmConstraints::default_key_management();

    assert!(!constraints.is_permitted(JweAlgorithm::RSA1_5));
    assert!(!constraints.is_permitted(JweAlgorithm::PBES2_HS256_A128KW));
    assert!(!constraints.is_permitted(JweAlgorithm::PBES2_HS384_A192KW));
    assert!(!constraints.is_permitted(JweAlgorithm::PBES2_HS512_A256KW));
    assert!(constraints.is_permitted(JweAlgorithm::A256KW));
    assert!(constraints.is_permitted(JweAlgorithm::ECDH_ES));
  }

  #[test]
  fn test_permit_list() {
    let constraints = AlgorithmConstraints::permit([JwsAlgorithm::ES256]);

    assert!(constraints.is_permitted(JwsAlgorithm::ES256));
    assert!(!constraints.is_permitted(JwsAlgorithm::HS256));
  }
}
