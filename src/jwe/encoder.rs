// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use rand::rngs::OsRng;
use zeroize::Zeroizing;

use crate::error::Error;
use crate::error::Result;
use crate::jwa::AlgorithmConstraints;
use crate::jwe::cek;
use crate::jwe::encryption;
use crate::jwe::JweAlgorithm;
use crate::jwe::JweCompression;
use crate::jwe::JweEncryption;
use crate::jwe::JweHeader;
use crate::jwk::Jwk;
use crate::jwk::JwkOperation;
use crate::jwk::JwkUse;
use crate::utils::concat_kdf;
use crate::utils::decode_b64;
use crate::utils::ecdh_shared_secret;
use crate::utils::encode_b64;
use crate::utils::encode_b64_json;
use crate::utils::generate_agreement_key;
use crate::utils::random_bytes;
use crate::utils::rsa_public_key;
use crate::utils::Secret;

// The smallest RSA modulus accepted for CEK encryption, in bytes.
const RSA_MIN_SIZE: usize = 2048 / 8;

// PBES2 salt input and iteration count floors from RFC 7518.
const PBES2_MIN_SALT_LEN: usize = 8;
const PBES2_MIN_COUNT: u64 = 1000;

// Applied when the caller leaves `p2s`/`p2c` unset.
const PBES2_DEFAULT_SALT_LEN: usize = 16;
const PBES2_DEFAULT_COUNT: u64 = 65536;

/// A single-use builder emitting a JWE in Compact Serialization.
///
/// The default key-management constraints refuse `RSA1_5` and the `PBES2`
/// family; using them requires explicit opt-in.
pub struct Encoder<'a> {
  alg_constraints: AlgorithmConstraints<JweAlgorithm>,
  enc_constraints: AlgorithmConstraints<JweEncryption>,
  protected: Option<&'a JweHeader>,
  recipient: Option<Secret<'a>>,
  cek: Option<&'a [u8]>,
  iv: Option<&'a [u8]>,
}

impl<'a> Encoder<'a> {
  /// Creates a new `Encoder`.
  pub fn new() -> Self {
    Self {
      alg_constraints: AlgorithmConstraints::default_key_management(),
      enc_constraints: AlgorithmConstraints::NoConstraints,
      protected: None,
      recipient: None,
      cek: None,
      iv: None,
    }
  }

  /// Sets the protected header.
  pub fn protected(mut self, value: &'a JweHeader) -> Self {
    self.protected = Some(value);
    self
  }

  /// Sets the recipient key driving the key-management algorithm.
  pub fn recipient(mut self, value: impl Into<Secret<'a>>) -> Self {
    self.recipient = Some(value.into());
    self
  }

  /// Supplies the content encryption key instead of generating a fresh one.
  ///
  /// Only valid for key-wrapping and key-encryption modes; direct and
  /// key-agreement modes determine the CEK themselves.
  pub fn cek(mut self, value: &'a [u8]) -> Self {
    self.cek = Some(value);
    self
  }

  /// Supplies the content-encryption initialization vector instead of
  /// generating a fresh one.
  pub fn iv(mut self, value: &'a [u8]) -> Self {
    self.iv = Some(value);
    self
  }

  /// Replaces the active key-management algorithm constraints.
  pub fn algorithm_constraints(mut self, value: AlgorithmConstraints<JweAlgorithm>) -> Self {
    self.alg_constraints = value;
    self
  }

  /// Replaces the active content-encryption algorithm constraints.
  pub fn encryption_constraints(mut self, value: AlgorithmConstraints<JweEncryption>) -> Self {
    self.enc_constraints = value;
    self
  }

  /// Encrypts `claims` and returns the compact serialization.
  pub fn encode(&self, claims: &[u8]) -> Result<String> {
    let mut header: JweHeader = self.protected.ok_or(Error::MissingParam("protected"))?.clone();
    let key: Secret<'a> = self.recipient.ok_or(Error::MissingParam("recipient"))?;

    let alg: JweAlgorithm = header.alg();
    let enc: JweEncryption = header.enc();

    if !self.alg_constraints.is_permitted(alg) {
      return Err(Error::AlgorithmConstraintViolated(alg.name()));
    }

    if !self.enc_constraints.is_permitted(enc) {
      return Err(Error::AlgorithmConstraintViolated(enc.name()));
    }

    if let Secret::Jwk(jwk) = key {
      jwk.check_use(&JwkUse::Encryption)?;
      jwk.check_ops(&JwkOperation::Encrypt)?;
      jwk.check_alg(alg.name())?;
    }

    let (content_key, encrypted_cek): (Zeroizing<Vec<u8>>, Vec<u8>) = self.manage_cek(alg, enc, key, &mut header)?;

    if content_key.len() != enc.key_len() {
      return Err(Error::InvalidKey("invalid content encryption key length"));
    }

    let payload: Vec<u8> = match header.zip() {
      None => claims.to_vec(),
      Some(JweCompression::Deflate) => miniz_oxide::deflate::compress_to_vec(claims, 6),
      Some(JweCompression::Custom(_)) => return Err(Error::UnsupportedAlgorithm("zip")),
    };

    // The header is serialized exactly once; these bytes are both the first
    // segment and the AAD.
    let encoded_header: String = encode_b64_json(&header)?;

    let iv: Vec<u8> = match self.iv {
      Some(iv) => iv.to_vec(),
      None => random_bytes(enc.iv_len())?,
    };

    let (ciphertext, tag): (Vec<u8>, Vec<u8>) =
      encryption::encrypt(enc, &content_key, &iv, encoded_header.as_bytes(), &payload)?;

    Ok(format!(
      "{}.{}.{}.{}.{}",
      encoded_header,
      encode_b64(&encrypted_cek),
      encode_b64(&iv),
      encode_b64(&ciphertext),
      encode_b64(&tag),
    ))
  }

  // Produces the content encryption key and its encrypted form, updating
  // `header` with any algorithm-generated parameters (epk, iv/tag, p2s/p2c).
  fn manage_cek(
    &self,
    alg: JweAlgorithm,
    enc: JweEncryption,
    key: Secret<'a>,
    header: &mut JweHeader,
  ) -> Result<(Zeroizing<Vec<u8>>, Vec<u8>)> {
    match alg {
      JweAlgorithm::DIR => {
        if self.cek.is_some() {
          return Err(Error::InvalidKey("`dir` does not accept an explicit content encryption key"));
        }

        Ok((key.to_oct_key(enc.key_len())?, Vec::new()))
      }
      JweAlgorithm::A128KW | JweAlgorithm::A192KW | JweAlgorithm::A256KW => {
        let key_len: usize = alg.try_key_len().ok_or(Error::UnsupportedAlgorithm(alg.name()))?;
        let kek: Zeroizing<Vec<u8>> = key.to_oct_key(key_len)?;
        let content_key: Zeroizing<Vec<u8>> = self.generate_cek(enc)?;
        let encrypted_cek: Vec<u8> = cek::kw_wrap(key_len, &kek, &content_key)?;

        Ok((content_key, encrypted_cek))
      }
      JweAlgorithm::A128GCMKW | JweAlgorithm::A192GCMKW | JweAlgorithm::A256GCMKW => {
        let key_len: usize = alg.try_key_len().ok_or(Error::UnsupportedAlgorithm(alg.name()))?;
        let kek: Zeroizing<Vec<u8>> = key.to_oct_key(key_len)?;

        let iv: Vec<u8> = match header.iv() {
          Some(iv) => decode_b64(iv)?,
          None => random_bytes(cek::GCM_KW_IV_LEN)?,
        };

        let content_key: Zeroizing<Vec<u8>> = self.generate_cek(enc)?;
        let (encrypted_cek, tag): (Vec<u8>, Vec<u8>) = cek::gcm_kw_wrap(key_len, &kek, &iv, &content_key)?;

        header.set_iv(encode_b64(&iv));
        header.set_tag(encode_b64(&tag));

        Ok((content_key, encrypted_cek))
      }
      JweAlgorithm::PBES2_HS256_A128KW | JweAlgorithm::PBES2_HS384_A192KW | JweAlgorithm::PBES2_HS512_A256KW => {
        let password: Zeroizing<Vec<u8>> = key.to_oct_key(0)?;

        let p2s: Vec<u8> = match header.p2s() {
          Some(p2s) => decode_b64(p2s)?,
          None => {
            let p2s: Vec<u8> = random_bytes(PBES2_DEFAULT_SALT_LEN)?;
            header.set_p2s(encode_b64(&p2s));
            p2s
          }
        };

        let p2c: u64 = match header.p2c() {
          Some(p2c) => p2c,
          None => {
            header.set_p2c(PBES2_DEFAULT_COUNT);
            PBES2_DEFAULT_COUNT
          }
        };

        if p2s.len() < PBES2_MIN_SALT_LEN {
          return Err(Error::MalformedEncoding("`p2s` must be at least 8 octets"));
        }

        if p2c < PBES2_MIN_COUNT {
          return Err(Error::MalformedEncoding("`p2c` must be at least 1000"));
        }

        let key_len: usize = alg.try_wrap_key_len().ok_or(Error::UnsupportedAlgorithm(alg.name()))?;
        let kek: Zeroizing<Vec<u8>> = cek::pbes2_derive(alg, &password, &p2s, p2c)?;
        let content_key: Zeroizing<Vec<u8>> = self.generate_cek(enc)?;
        let encrypted_cek: Vec<u8> = cek::kw_wrap(key_len, &kek, &content_key)?;

        Ok((content_key, encrypted_cek))
      }
      JweAlgorithm::RSA1_5 => {
        let public: rsa::RsaPublicKey = self.rsa_encryption_key(key)?;
        let content_key: Zeroizing<Vec<u8>> = self.generate_cek(enc)?;

        let encrypted_cek: Vec<u8> = public
          .encrypt(&mut OsRng, rsa::Pkcs1v15Encrypt, &content_key)
          .map_err(|_| Error::CryptoFailure("key encryption failed"))?;

        Ok((content_key, encrypted_cek))
      }
      JweAlgorithm::RSA_OAEP | JweAlgorithm::RSA_OAEP_256 => {
        let public: rsa::RsaPublicKey = self.rsa_encryption_key(key)?;
        let content_key: Zeroizing<Vec<u8>> = self.generate_cek(enc)?;

        let padding: rsa::Oaep = match alg {
          JweAlgorithm::RSA_OAEP => rsa::Oaep::new::<sha1::Sha1>(),
          _ => rsa::Oaep::new::<sha2::Sha256>(),
        };

        let encrypted_cek: Vec<u8> = public
          .encrypt(&mut OsRng, padding, &content_key)
          .map_err(|_| Error::CryptoFailure("key encryption failed"))?;

        Ok((content_key, encrypted_cek))
      }
      JweAlgorithm::ECDH_ES => {
        if self.cek.is_some() {
          return Err(Error::InvalidKey("`ECDH-ES` does not accept an explicit content encryption key"));
        }

        let derived: Zeroizing<Vec<u8>> = self.ecdh_derive(alg, enc, key, header, enc.key_len())?;

        Ok((derived, Vec::new()))
      }
      JweAlgorithm::ECDH_ES_A128KW | JweAlgorithm::ECDH_ES_A192KW | JweAlgorithm::ECDH_ES_A256KW => {
        let key_len: usize = alg.try_wrap_key_len().ok_or(Error::UnsupportedAlgorithm(alg.name()))?;
        let kek: Zeroizing<Vec<u8>> = self.ecdh_derive(alg, enc, key, header, key_len)?;
        let content_key: Zeroizing<Vec<u8>> = self.generate_cek(enc)?;
        let encrypted_cek: Vec<u8> = cek::kw_wrap(key_len, &kek, &content_key)?;

        Ok((content_key, encrypted_cek))
      }
    }
  }

  // Returns the caller-supplied CEK or a fresh random one.
  fn generate_cek(&self, enc: JweEncryption) -> Result<Zeroizing<Vec<u8>>> {
    match self.cek {
      Some(cek) => Ok(Zeroizing::new(cek.to_vec())),
      None => random_bytes(enc.key_len()).map(Zeroizing::new),
    }
  }

  fn rsa_encryption_key(&self, key: Secret<'a>) -> Result<rsa::RsaPublicKey> {
    let public: rsa::RsaPublicKey = rsa_public_key(key.jwk()?)?;

    if rsa::traits::PublicKeyParts::size(&public) < RSA_MIN_SIZE {
      return Err(Error::InvalidKey("insufficient modulus length"));
    }

    Ok(public)
  }

  // Generates the ephemeral key, records it in the `epk` header and derives
  // `len` bytes with the Concat KDF.
  fn ecdh_derive(
    &self,
    alg: JweAlgorithm,
    enc: JweEncryption,
    key: Secret<'a>,
    header: &mut JweHeader,
    len: usize,
  ) -> Result<Zeroizing<Vec<u8>>> {
    let recipient: &Jwk = key.jwk()?;
    let ephemeral: Jwk = generate_agreement_key(recipient)?;

    let z: Zeroizing<Vec<u8>> = ecdh_shared_secret(recipient, &ephemeral)?;

    let algorithm_id: &str = match alg {
      JweAlgorithm::ECDH_ES => enc.name(),
      _ => alg.name(),
    };

    let apu: Vec<u8> = header.apu().map(decode_b64).transpose()?.unwrap_or_default();
    let apv: Vec<u8> = header.apv().map(decode_b64).transpose()?.unwrap_or_default();

    let derived: Zeroizing<Vec<u8>> = concat_kdf(algorithm_id, len, &z, &apu, &apv)?;

    let epk: Jwk = ephemeral
      .to_public()
      .ok_or(Error::CryptoFailure("invalid ephemeral key"))?;

    header.set_epk(epk);

    Ok(derived)
  }
}

impl Default for Encoder<'_> {
  fn default() -> Self {
    Self::new()
  }
}
