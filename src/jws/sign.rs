// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! Signature primitives: creation, verification, and key validation for
//! every registered JWS algorithm.

use crypto::hashes::sha::SHA256_LEN;
use crypto::hashes::sha::SHA384_LEN;
use crypto::hashes::sha::SHA512_LEN;
use crypto::macs::hmac::HMAC_SHA256;
use crypto::macs::hmac::HMAC_SHA384;
use crypto::macs::hmac::HMAC_SHA512;
use crypto::signatures::ed25519;
use rand::rngs::OsRng;
use rsa::Pkcs1v15Sign;
use rsa::Pss;
use sha2::Digest;
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use crate::error::Error;
use crate::error::Result;
use crate::jwk::EcCurve;
use crate::jwk::EdCurve;
use crate::jwk::Jwk;
use crate::jwk::JwkParamsEc;
use crate::jwk::JwkParamsOkp;
use crate::jws::JwsAlgorithm;
use crate::utils::decode_b64;
use crate::utils::k256_public_key;
use crate::utils::k256_secret_key;
use crate::utils::p256_public_key;
use crate::utils::p256_secret_key;
use crate::utils::p384_public_key;
use crate::utils::p384_secret_key;
use crate::utils::p521_public_key;
use crate::utils::p521_secret_key;
use crate::utils::rsa_public_key;
use crate::utils::rsa_secret_key;
use crate::utils::Secret;

// The smallest RSA modulus accepted for RS/PS algorithms, in bytes.
const RSA_MIN_SIZE: usize = 2048 / 8;

/// Signs `message` with `key` under the given algorithm.
///
/// `none` produces an empty signature; callers are expected to have applied
/// their algorithm constraints beforehand.
pub fn sign(alg: JwsAlgorithm, key: Secret<'_>, message: &[u8]) -> Result<Vec<u8>> {
  match alg {
    JwsAlgorithm::HS256 => {
      let key: Zeroizing<Vec<u8>> = hmac_key(key, SHA256_LEN)?;
      let mut mac: [u8; SHA256_LEN] = [0; SHA256_LEN];
      HMAC_SHA256(message, &key, &mut mac);
      Ok(mac.to_vec())
    }
    JwsAlgorithm::HS384 => {
      let key: Zeroizing<Vec<u8>> = hmac_key(key, SHA384_LEN)?;
      let mut mac: [u8; SHA384_LEN] = [0; SHA384_LEN];
      HMAC_SHA384(message, &key, &mut mac);
      Ok(mac.to_vec())
    }
    JwsAlgorithm::HS512 => {
      let key: Zeroizing<Vec<u8>> = hmac_key(key, SHA512_LEN)?;
      let mut mac: [u8; SHA512_LEN] = [0; SHA512_LEN];
      HMAC_SHA512(message, &key, &mut mac);
      Ok(mac.to_vec())
    }
    JwsAlgorithm::RS256 | JwsAlgorithm::RS384 | JwsAlgorithm::RS512 => {
      let secret: rsa::RsaPrivateKey = rsa_signing_key(key)?;
      let digest: Vec<u8> = rsa_digest(alg, message);

      secret
        .sign(rsa_pkcs1v15(alg), &digest)
        .map_err(|_| Error::CryptoFailure("signature creation failed"))
    }
    JwsAlgorithm::PS256 | JwsAlgorithm::PS384 | JwsAlgorithm::PS512 => {
      let secret: rsa::RsaPrivateKey = rsa_signing_key(key)?;
      let digest: Vec<u8> = rsa_digest(alg, message);

      secret
        .sign_with_rng(&mut OsRng, rsa_pss(alg), &digest)
        .map_err(|_| Error::CryptoFailure("signature creation failed"))
    }
    JwsAlgorithm::ES256 => {
      let params: &JwkParamsEc = ec_params_on(key.jwk()?, EcCurve::P256)?;
      let secret: p256::ecdsa::SigningKey = p256_secret_key(params)?.into();
      let signature: p256::ecdsa::Signature = signature::Signer::sign(&secret, message);
      Ok(signature.to_bytes().to_vec())
    }
    JwsAlgorithm::ES384 => {
      let params: &JwkParamsEc = ec_params_on(key.jwk()?, EcCurve::P384)?;
      let secret: p384::ecdsa::SigningKey = p384_secret_key(params)?.into();
      let signature: p384::ecdsa::Signature = signature::Signer::sign(&secret, message);
      Ok(signature.to_bytes().to_vec())
    }
    JwsAlgorithm::ES512 => {
      let params: &JwkParamsEc = ec_params_on(key.jwk()?, EcCurve::P521)?;
      let secret: p521::ecdsa::SigningKey =
        p521::ecdsa::SigningKey::from_bytes(&p521_secret_key(params)?.to_bytes())
          .map_err(|_| Error::CryptoFailure("invalid secret key"))?;
      let signature: p521::ecdsa::Signature = signature::Signer::sign(&secret, message);
      Ok(signature.to_bytes().to_vec())
    }
    JwsAlgorithm::ES256K => {
      let params: &JwkParamsEc = ec_params_on(key.jwk()?, EcCurve::Secp256K1)?;
      let secret: k256::ecdsa::SigningKey = k256_secret_key(params)?.into();
      let signature: k256::ecdsa::Signature = signature::Signer::sign(&secret, message);
      Ok(signature.to_bytes().to_vec())
    }
    JwsAlgorithm::EdDSA => {
      let secret: ed25519::SecretKey = ed25519_secret(key)?;
      Ok(secret.sign(message).to_bytes().to_vec())
    }
    JwsAlgorithm::NONE => Ok(Vec::new()),
  }
}

/// Verifies `signature` over `message` with `key` under the given algorithm.
///
/// Fails with [`Error::SignatureInvalid`] on mismatch; a `none` signature is
/// valid only when empty.
pub fn verify(alg: JwsAlgorithm, key: Secret<'_>, message: &[u8], signature: &[u8]) -> Result<()> {
  match alg {
    JwsAlgorithm::HS256 | JwsAlgorithm::HS384 | JwsAlgorithm::HS512 => {
      let mac: Vec<u8> = sign(alg, key, message)?;

      if mac.ct_eq(signature).into() {
        Ok(())
      } else {
        Err(Error::SignatureInvalid)
      }
    }
    JwsAlgorithm::RS256 | JwsAlgorithm::RS384 | JwsAlgorithm::RS512 => {
      let public: rsa::RsaPublicKey = rsa_verification_key(key)?;
      let digest: Vec<u8> = rsa_digest(alg, message);

      public
        .verify(rsa_pkcs1v15(alg), &digest, signature)
        .map_err(|_| Error::SignatureInvalid)
    }
    JwsAlgorithm::PS256 | JwsAlgorithm::PS384 | JwsAlgorithm::PS512 => {
      let public: rsa::RsaPublicKey = rsa_verification_key(key)?;
      let digest: Vec<u8> = rsa_digest(alg, message);

      public
        .verify(rsa_pss(alg), &digest, signature)
        .map_err(|_| Error::SignatureInvalid)
    }
    JwsAlgorithm::ES256 => {
      let params: &JwkParamsEc = ec_params_on(key.jwk()?, EcCurve::P256)?;
      let public: p256::ecdsa::VerifyingKey = p256_public_key(params)?.into();
      let signature: p256::ecdsa::Signature =
        p256::ecdsa::Signature::from_slice(signature).map_err(|_| Error::SignatureInvalid)?;

      signature::Verifier::verify(&public, message, &signature).map_err(|_| Error::SignatureInvalid)
    }
    JwsAlgorithm::ES384 => {
      let params: &JwkParamsEc = ec_params_on(key.jwk()?, EcCurve::P384)?;
      let public: p384::ecdsa::VerifyingKey = p384_public_key(params)?.into();
      let signature: p384::ecdsa::Signature =
        p384::ecdsa::Signature::from_slice(signature).map_err(|_| Error::SignatureInvalid)?;

      signature::Verifier::verify(&public, message, &signature).map_err(|_| Error::SignatureInvalid)
    }
    JwsAlgorithm::ES512 => {
      let params: &JwkParamsEc = ec_params_on(key.jwk()?, EcCurve::P521)?;
      let public: p521::ecdsa::VerifyingKey = p521::ecdsa::VerifyingKey::from_encoded_point(
        &p521::elliptic_curve::sec1::ToEncodedPoint::to_encoded_point(&p521_public_key(params)?, false),
      )
      .map_err(|_| Error::InvalidKey("invalid public key"))?;
      let signature: p521::ecdsa::Signature =
        p521::ecdsa::Signature::from_slice(signature).map_err(|_| Error::SignatureInvalid)?;

      signature::Verifier::verify(&public, message, &signature).map_err(|_| Error::SignatureInvalid)
    }
    JwsAlgorithm::ES256K => {
      let params: &JwkParamsEc = ec_params_on(key.jwk()?, EcCurve::Secp256K1)?;
      let public: k256::ecdsa::VerifyingKey = k256_public_key(params)?.into();
      let signature: k256::ecdsa::Signature =
        k256::ecdsa::Signature::from_slice(signature).map_err(|_| Error::SignatureInvalid)?;

      signature::Verifier::verify(&public, message, &signature).map_err(|_| Error::SignatureInvalid)
    }
    JwsAlgorithm::EdDSA => {
      let public: ed25519::PublicKey = ed25519_public(key)?;
      let signature: [u8; ed25519::Signature::LENGTH] =
        signature.try_into().map_err(|_| Error::SignatureInvalid)?;

      if public.verify(&ed25519::Signature::from_bytes(signature), message) {
        Ok(())
      } else {
        Err(Error::SignatureInvalid)
      }
    }
    JwsAlgorithm::NONE => {
      if signature.is_empty() {
        Ok(())
      } else {
        Err(Error::SignatureInvalid)
      }
    }
  }
}

/// Validates that `key` is suitable for signing under `alg`.
pub fn validate_signing_key(alg: JwsAlgorithm, key: Secret<'_>) -> Result<()> {
  match alg {
    JwsAlgorithm::HS256 => hmac_key(key, SHA256_LEN).map(drop),
    JwsAlgorithm::HS384 => hmac_key(key, SHA384_LEN).map(drop),
    JwsAlgorithm::HS512 => hmac_key(key, SHA512_LEN).map(drop),
    JwsAlgorithm::RS256 | JwsAlgorithm::RS384 | JwsAlgorithm::RS512 | JwsAlgorithm::PS256 | JwsAlgorithm::PS384 | JwsAlgorithm::PS512 => {
      rsa_signing_key(key).map(drop)
    }
    JwsAlgorithm::ES256 => ec_signing_params(key, EcCurve::P256),
    JwsAlgorithm::ES384 => ec_signing_params(key, EcCurve::P384),
    JwsAlgorithm::ES512 => ec_signing_params(key, EcCurve::P521),
    JwsAlgorithm::ES256K => ec_signing_params(key, EcCurve::Secp256K1),
    JwsAlgorithm::EdDSA => ed25519_secret(key).map(drop),
    JwsAlgorithm::NONE => Ok(()),
  }
}

/// Validates that `key` is suitable for verification under `alg`.
pub fn validate_verification_key(alg: JwsAlgorithm, key: Secret<'_>) -> Result<()> {
  match alg {
    JwsAlgorithm::HS256 => hmac_key(key, SHA256_LEN).map(drop),
    JwsAlgorithm::HS384 => hmac_key(key, SHA384_LEN).map(drop),
    JwsAlgorithm::HS512 => hmac_key(key, SHA512_LEN).map(drop),
    JwsAlgorithm::RS256 | JwsAlgorithm::RS384 | JwsAlgorithm::RS512 | JwsAlgorithm::PS256 | JwsAlgorithm::PS384 | JwsAlgorithm::PS512 => {
      rsa_verification_key(key).map(drop)
    }
    JwsAlgorithm::ES256 => ec_params_on(key.jwk()?, EcCurve::P256).map(drop),
    JwsAlgorithm::ES384 => ec_params_on(key.jwk()?, EcCurve::P384).map(drop),
    JwsAlgorithm::ES512 => ec_params_on(key.jwk()?, EcCurve::P521).map(drop),
    JwsAlgorithm::ES256K => ec_params_on(key.jwk()?, EcCurve::Secp256K1).map(drop),
    JwsAlgorithm::EdDSA => ed25519_public(key).map(drop),
    JwsAlgorithm::NONE => Ok(()),
  }
}

// =============================================================================
// HMAC
// =============================================================================

// The key must be at least as long as the hash output.
fn hmac_key(key: Secret<'_>, min_len: usize) -> Result<Zeroizing<Vec<u8>>> {
  key.to_oct_key(min_len)
}

// =============================================================================
// RSA
// =============================================================================

fn rsa_digest(alg: JwsAlgorithm, message: &[u8]) -> Vec<u8> {
  match alg {
    JwsAlgorithm::RS256 | JwsAlgorithm::PS256 => sha2::Sha256::digest(message).to_vec(),
    JwsAlgorithm::RS384 | JwsAlgorithm::PS384 => sha2::Sha384::digest(message).to_vec(),
    _ => sha2::Sha512::digest(message).to_vec(),
  }
}

fn rsa_pkcs1v15(alg: JwsAlgorithm) -> Pkcs1v15Sign {
  match alg {
    JwsAlgorithm::RS256 => Pkcs1v15Sign::new::<sha2::Sha256>(),
    JwsAlgorithm::RS384 => Pkcs1v15Sign::new::<sha2::Sha384>(),
    _ => Pkcs1v15Sign::new::<sha2::Sha512>(),
  }
}

// The salt length equals the hash output length.
fn rsa_pss(alg: JwsAlgorithm) -> Pss {
  match alg {
    JwsAlgorithm::PS256 => Pss::new::<sha2::Sha256>(),
    JwsAlgorithm::PS384 => Pss::new::<sha2::Sha384>(),
    _ => Pss::new::<sha2::Sha512>(),
  }
}

fn rsa_signing_key(key: Secret<'_>) -> Result<rsa::RsaPrivateKey> {
  let secret: rsa::RsaPrivateKey = rsa_secret_key(key.jwk()?)?;

  if rsa::traits::PublicKeyParts::size(&secret) < RSA_MIN_SIZE {
    return Err(Error::InvalidKey("insufficient modulus length"));
  }

  Ok(secret)
}

fn rsa_verification_key(key: Secret<'_>) -> Result<rsa::RsaPublicKey> {
  let public: rsa::RsaPublicKey = rsa_public_key(key.jwk()?)?;

  if rsa::traits::PublicKeyParts::size(&public) < RSA_MIN_SIZE {
    return Err(Error::InvalidKey("insufficient modulus length"));
  }

  Ok(public)
}

// =============================================================================
// ECDSA
// =============================================================================

fn ec_params_on(jwk: &Jwk, curve: EcCurve) -> Result<&JwkParamsEc> {
  let params: &JwkParamsEc = jwk.try_ec_params()?;

  if params.try_ec_curve()? != curve {
    return Err(Error::InvalidKey("curve mismatch"));
  }

  Ok(params)
}

fn ec_signing_params(key: Secret<'_>, curve: EcCurve) -> Result<()> {
  let params: &JwkParamsEc = ec_params_on(key.jwk()?, curve)?;

  if params.d.is_none() {
    return Err(Error::InvalidKey("missing private component"));
  }

  Ok(())
}

// =============================================================================
// EdDSA
// =============================================================================

fn okp_ed25519_params(jwk: &Jwk) -> Result<&JwkParamsOkp> {
  let params: &JwkParamsOkp = jwk.try_okp_params()?;

  match params.try_ed_curve()? {
    EdCurve::Ed25519 => Ok(params),
    EdCurve::Ed448 => Err(Error::UnsupportedAlgorithm("Ed448")),
  }
}

fn ed25519_secret(key: Secret<'_>) -> Result<ed25519::SecretKey> {
  let params: &JwkParamsOkp = okp_ed25519_params(key.jwk()?)?;
  let d: Zeroizing<Vec<u8>> = params
    .d
    .as_deref()
    .map(decode_b64)
    .transpose()?
    .map(Zeroizing::new)
    .ok_or(Error::InvalidKey("missing private component"))?;
  let d: [u8; ed25519::SecretKey::LENGTH] = d
    .as_slice()
    .try_into()
    .map_err(|_| Error::InvalidKey("invalid secret key length"))?;

  Ok(ed25519::SecretKey::from_bytes(&d))
}

fn ed25519_public(key: Secret<'_>) -> Result<ed25519::PublicKey> {
  let params: &JwkParamsOkp = okp_ed25519_params(key.jwk()?)?;
  let x: [u8; ed25519::PublicKey::LENGTH] = decode_b64(&params.x)?
    .try_into()
    .map_err(|_| Error::InvalidKey("invalid public key length"))?;

  ed25519::PublicKey::try_from(x).map_err(|_| Error::InvalidKey("invalid public key"))
}
