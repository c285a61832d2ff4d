// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use miniz_oxide::inflate::TINFLStatus;
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
use crate::jwk::EcCurve;
use crate::jwk::Jwk;
use crate::jwk::JwkOperation;
use crate::jwk::JwkType;
use crate::jwk::JwkUse;
use crate::jws::check_critical;
use crate::utils::concat_kdf;
use crate::utils::decode_b64;
use crate::utils::decode_b64_json;
use crate::utils::ecdh_shared_secret;
use crate::utils::random_bytes;
use crate::utils::rsa_secret_key;
use crate::utils::Secret;

// The smallest RSA modulus accepted for CEK decryption, in bytes.
const RSA_MIN_SIZE: usize = 2048 / 8;

// Ceiling on the PBES2 iteration count accepted from a header, bounding the
// work an attacker can demand.
const DEFAULT_MAX_PBES2_COUNT: u64 = 2_500_000;

// Ceiling on the DEFLATE output size, bounding decompression bombs.
const DEFAULT_MAX_DECOMPRESSED: usize = 10 * 1024 * 1024;

/// A decrypted JWE: the protected header and the recovered plaintext.
#[derive(Clone, Debug)]
pub struct Token(pub JweHeader, pub Vec<u8>);

/// A reusable consumer for JWE objects in Compact Serialization.
///
/// The default key-management constraints refuse `RSA1_5` and the `PBES2`
/// family; consuming them requires explicit opt-in.
pub struct Decoder<'b> {
  alg_constraints: AlgorithmConstraints<JweAlgorithm>,
  enc_constraints: AlgorithmConstraints<JweEncryption>,
  key: Secret<'b>,
  ecdh_curve: Option<EcCurve>,
  critical: Vec<String>,
  max_pbes2_count: u64,
  max_decompressed: usize,
}

impl<'b> Decoder<'b> {
  /// Creates a new `Decoder` decrypting with the given key.
  pub fn new(key: impl Into<Secret<'b>>) -> Self {
    Self {
      alg_constraints: AlgorithmConstraints::default_key_management(),
      enc_constraints: AlgorithmConstraints::NoConstraints,
      key: key.into(),
      ecdh_curve: None,
      critical: Vec::new(),
      max_pbes2_count: DEFAULT_MAX_PBES2_COUNT,
      max_decompressed: DEFAULT_MAX_DECOMPRESSED,
    }
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

  /// Pins the curve accepted for ECDH-ES key agreement.
  pub fn ecdh_curve(mut self, value: EcCurve) -> Self {
    self.ecdh_curve = Some(value);
    self
  }

  /// Marks a critical header parameter as understood.
  pub fn critical(mut self, value: impl Into<String>) -> Self {
    self.critical.push(value.into());
    self
  }

  /// Replaces the ceiling on the PBES2 iteration count.
  pub fn max_pbes2_count(mut self, value: u64) -> Self {
    self.max_pbes2_count = value;
    self
  }

  /// Replaces the ceiling on the decompressed payload size.
  pub fn max_decompressed_size(mut self, value: usize) -> Self {
    self.max_decompressed = value;
    self
  }

  /// Decodes and decrypts the given compact serialization.
  pub fn decode(&self, data: &[u8]) -> Result<Token> {
    let segments: Vec<&[u8]> = data.split(|byte| *byte == b'.').collect();

    if segments.len() != 5 {
      return Err(Error::MalformedEncoding("invalid segments"));
    }

    if segments[2].is_empty() || segments[3].is_empty() {
      return Err(Error::MalformedEncoding("invalid segments"));
    }

    let header: JweHeader = decode_b64_json(segments[0])?;

    check_critical(header.crit(), &self.critical)?;

    let alg: JweAlgorithm = header.alg();
    let enc: JweEncryption = header.enc();

    if !self.alg_constraints.is_permitted(alg) {
      return Err(Error::AlgorithmConstraintViolated(alg.name()));
    }

    if !self.enc_constraints.is_permitted(enc) {
      return Err(Error::AlgorithmConstraintViolated(enc.name()));
    }

    if let Secret::Jwk(jwk) = self.key {
      jwk.check_use(&JwkUse::Encryption)?;
      jwk.check_ops(&JwkOperation::Decrypt)?;
      jwk.check_alg(alg.name())?;
    }

    let encrypted_cek: Vec<u8> = decode_b64(segments[1])?;
    let iv: Vec<u8> = decode_b64(segments[2])?;
    let ciphertext: Vec<u8> = decode_b64(segments[3])?;
    let tag: Vec<u8> = decode_b64(segments[4])?;

    let content_key: Zeroizing<Vec<u8>> = self.decrypt_cek(&header, &encrypted_cek)?;

    if content_key.len() != enc.key_len() {
      return Err(Error::IntegrityFailure);
    }

    // Tag verification happens inside the AEAD, before any plaintext
    // leaves it; decompression only runs on authenticated data.
    let plaintext: Vec<u8> = encryption::decrypt(enc, &content_key, &iv, segments[0], &ciphertext, &tag)?;

    let claims: Vec<u8> = match header.zip() {
      None => plaintext,
      Some(JweCompression::Deflate) => self.decompress(&plaintext)?,
      Some(JweCompression::Custom(_)) => return Err(Error::UnsupportedAlgorithm("zip")),
    };

    Ok(Token(header, claims))
  }

  #[doc(hidden)]
  pub fn __test_decrypt_key(&self, header: &JweHeader) -> Result<Vec<u8>> {
    self.decrypt_cek(header, &[]).map(|key| key.to_vec())
  }

  fn decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
    miniz_oxide::inflate::decompress_to_vec_with_limit(data, self.max_decompressed).map_err(|error| {
      if error.status == TINFLStatus::HasMoreOutput {
        Error::DecompressionTooLarge
      } else {
        Error::MalformedEncoding("invalid compressed content")
      }
    })
  }

  // Recovers the content encryption key. Unwrap failures are masked: AES
  // unwrap errors surface as `IntegrityFailure` and RSA decoding failures
  // substitute a random CEK, leaving the content tag check as the only
  // observable signal.
  fn decrypt_cek(&self, header: &JweHeader, encrypted_cek: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
    let alg: JweAlgorithm = header.alg();
    let enc: JweEncryption = header.enc();

    match alg {
      JweAlgorithm::DIR => {
        if !encrypted_cek.is_empty() {
          return Err(Error::MalformedEncoding("`dir` must not carry an encrypted key"));
        }

        self.key.to_oct_key(enc.key_len())
      }
      JweAlgorithm::A128KW | JweAlgorithm::A192KW | JweAlgorithm::A256KW => {
        let key_len: usize = alg.try_key_len().ok_or(Error::UnsupportedAlgorithm(alg.name()))?;
        let kek: Zeroizing<Vec<u8>> = self.key.to_oct_key(key_len)?;

        cek::kw_unwrap(key_len, &kek, encrypted_cek)
      }
      JweAlgorithm::A128GCMKW | JweAlgorithm::A192GCMKW | JweAlgorithm::A256GCMKW => {
        let key_len: usize = alg.try_key_len().ok_or(Error::UnsupportedAlgorithm(alg.name()))?;
        let kek: Zeroizing<Vec<u8>> = self.key.to_oct_key(key_len)?;
        let iv: Vec<u8> = header.iv().map(decode_b64).transpose()?.ok_or(Error::MissingParam("iv"))?;
        let tag: Vec<u8> = header.tag().map(decode_b64).transpose()?.ok_or(Error::MissingParam("tag"))?;

        cek::gcm_kw_unwrap(key_len, &kek, &iv, &tag, encrypted_cek)
      }
      JweAlgorithm::PBES2_HS256_A128KW | JweAlgorithm::PBES2_HS384_A192KW | JweAlgorithm::PBES2_HS512_A256KW => {
        let password: Zeroizing<Vec<u8>> = self.key.to_oct_key(0)?;
        let p2s: Vec<u8> = header.p2s().map(decode_b64).transpose()?.ok_or(Error::MissingParam("p2s"))?;
        let p2c: u64 = header.p2c().ok_or(Error::MissingParam("p2c"))?;

        if p2c == 0 {
          return Err(Error::MalformedEncoding("invalid `p2c` value"));
        }

        if p2c > self.max_pbes2_count {
          return Err(Error::AlgorithmConstraintViolated("`p2c` exceeds the configured ceiling"));
        }

        let key_len: usize = alg.try_wrap_key_len().ok_or(Error::UnsupportedAlgorithm(alg.name()))?;
        let kek: Zeroizing<Vec<u8>> = cek::pbes2_derive(alg, &password, &p2s, p2c)?;

        cek::kw_unwrap(key_len, &kek, encrypted_cek)
      }
      JweAlgorithm::RSA1_5 => {
        let secret: rsa::RsaPrivateKey = self.rsa_decryption_key()?;

        self.rsa_decrypt_masked(&secret, rsa::Pkcs1v15Encrypt, encrypted_cek, enc)
      }
      JweAlgorithm::RSA_OAEP => {
        let secret: rsa::RsaPrivateKey = self.rsa_decryption_key()?;

        self.rsa_decrypt_masked(&secret, rsa::Oaep::new::<sha1::Sha1>(), encrypted_cek, enc)
      }
      JweAlgorithm::RSA_OAEP_256 => {
        let secret: rsa::RsaPrivateKey = self.rsa_decryption_key()?;

        self.rsa_decrypt_masked(&secret, rsa::Oaep::new::<sha2::Sha256>(), encrypted_cek, enc)
      }
      JweAlgorithm::ECDH_ES => {
        if !encrypted_cek.is_empty() {
          return Err(Error::MalformedEncoding("`ECDH-ES` must not carry an encrypted key"));
        }

        self.ecdh_derive(header, enc.key_len())
      }
      JweAlgorithm::ECDH_ES_A128KW | JweAlgorithm::ECDH_ES_A192KW | JweAlgorithm::ECDH_ES_A256KW => {
        let key_len: usize = alg.try_wrap_key_len().ok_or(Error::UnsupportedAlgorithm(alg.name()))?;
        let kek: Zeroizing<Vec<u8>> = self.ecdh_derive(header, key_len)?;

        cek::kw_unwrap(key_len, &kek, encrypted_cek)
      }
    }
  }

  fn rsa_decryption_key(&self) -> Result<rsa::RsaPrivateKey> {
    let secret: rsa::RsaPrivateKey = rsa_secret_key(self.key.jwk()?)?;

    if rsa::traits::PublicKeyParts::size(&secret) < RSA_MIN_SIZE {
      return Err(Error::InvalidKey("insufficient modulus length"));
    }

    Ok(secret)
  }

  // The Bleichenbacher countermeasure: a decode failure or an unexpected
  // length yields a fresh random CEK, and the content tag check downstream
  // becomes the only observable failure.
  fn rsa_decrypt_masked<P: rsa::traits::PaddingScheme>(
    &self,
    secret: &rsa::RsaPrivateKey,
    padding: P,
    encrypted_cek: &[u8],
    enc: JweEncryption,
  ) -> Result<Zeroizing<Vec<u8>>> {
    let substitute: Zeroizing<Vec<u8>> = Zeroizing::new(random_bytes(enc.key_len())?);

    match secret.decrypt(padding, encrypted_cek) {
      Ok(out) if out.len() == enc.key_len() => Ok(Zeroizing::new(out)),
      _ => Ok(substitute),
    }
  }

  // Reads the ephemeral public key from the `epk` header and derives `len`
  // bytes with the Concat KDF. The received point must lie on the private
  // key's curve.
  fn ecdh_derive(&self, header: &JweHeader, len: usize) -> Result<Zeroizing<Vec<u8>>> {
    let recipient: &Jwk = self.key.jwk()?;
    let epk: &Jwk = header.epk().ok_or(Error::MissingParam("epk"))?;

    if recipient.kty() == JwkType::Ec {
      let curve: EcCurve = recipient.try_ec_params()?.try_ec_curve()?;

      if let Some(expected) = self.ecdh_curve {
        if curve != expected {
          return Err(Error::InvalidKey("curve mismatch"));
        }
      }

      if epk.try_ec_params()?.try_ec_curve()? != curve {
        return Err(Error::InvalidKey("`epk` curve mismatch"));
      }
    }

    // Point validation happens during key construction: an off-curve `epk`
    // is rejected before any agreement is computed.
    let z: Zeroizing<Vec<u8>> = ecdh_shared_secret(epk, recipient)?;

    let alg: JweAlgorithm = header.alg();

    let algorithm_id: &str = match alg {
      JweAlgorithm::ECDH_ES => header.enc().name(),
      _ => alg.name(),
    };

    let apu: Vec<u8> = header.apu().map(decode_b64).transpose()?.unwrap_or_default();
    let apv: Vec<u8> = header.apv().map(decode_b64).transpose()?.unwrap_or_default();

    concat_kdf(algorithm_id, len, &z, &apu, &apv)
  }
}
