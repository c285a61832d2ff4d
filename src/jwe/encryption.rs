// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use core::fmt;
use core::fmt::Display;
use core::fmt::Formatter;

use crypto::ciphers::aes_gcm::Aes128Gcm;
use crypto::ciphers::aes_gcm::Aes192Gcm;
use crypto::ciphers::aes_gcm::Aes256Gcm;
use crypto::ciphers::aes_cbc::Aes128CbcHmac256;
use crypto::ciphers::aes_cbc::Aes192CbcHmac384;
use crypto::ciphers::aes_cbc::Aes256CbcHmac512;
use crypto::ciphers::traits::Aead;

use crate::error::Error;
use crate::error::Result;

/// Supported algorithms for the JSON Web Encryption `enc` claim.
///
/// [More Info](https://www.iana.org/assignments/jose/jose.xhtml#web-signature-encryption-algorithms)
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, serde::Deserialize, serde::Serialize)]
#[allow(non_camel_case_types)]
pub enum JweEncryption {
  /// AES_128_CBC_HMAC_SHA_256 authenticated encryption algorithm.
  #[serde(rename = "A128CBC-HS256")]
  A128CBC_HS256,
  /// AES_192_CBC_HMAC_SHA_384 authenticated encryption algorithm.
  #[serde(rename = "A192CBC-HS384")]
  A192CBC_HS384,
  /// AES_256_CBC_HMAC_SHA_512 authenticated encryption algorithm.
  #[serde(rename = "A256CBC-HS512")]
  A256CBC_HS512,
  /// AES GCM using 128-bit key.
  A128GCM,
  /// AES GCM using 192-bit key.
  A192GCM,
  /// AES GCM using 256-bit key.
  A256GCM,
}

impl JweEncryption {
  /// A slice of all supported [`JweEncryption`]s.
  pub const ALL: &'static [Self] = &[
    Self::A128CBC_HS256,
    Self::A192CBC_HS384,
    Self::A256CBC_HS512,
    Self::A128GCM,
    Self::A192GCM,
    Self::A256GCM,
  ];

  /// Returns the JWE encryption algorithm as a `str` slice.
  pub const fn name(self) -> &'static str {
    match self {
      Self::A128CBC_HS256 => "A128CBC-HS256",
      Self::A192CBC_HS384 => "A192CBC-HS384",
      Self::A256CBC_HS512 => "A256CBC-HS512",
      Self::A128GCM => "A128GCM",
      Self::A192GCM => "A192GCM",
      Self::A256GCM => "A256GCM",
    }
  }

  /// Returns the required length of the content encryption key.
  pub const fn key_len(self) -> usize {
    match self {
      Self::A128CBC_HS256 => Aes128CbcHmac256::KEY_LENGTH,
      Self::A192CBC_HS384 => Aes192CbcHmac384::KEY_LENGTH,
      Self::A256CBC_HS512 => Aes256CbcHmac512::KEY_LENGTH,
      Self::A128GCM => Aes128Gcm::KEY_LENGTH,
      Self::A192GCM => Aes192Gcm::KEY_LENGTH,
      Self::A256GCM => Aes256Gcm::KEY_LENGTH,
    }
  }

  /// Returns the required length of the initialization vector.
  pub const fn iv_len(self) -> usize {
    match self {
      Self::A128CBC_HS256 => Aes128CbcHmac256::NONCE_LENGTH,
      Self::A192CBC_HS384 => Aes192CbcHmac384::NONCE_LENGTH,
      Self::A256CBC_HS512 => Aes256CbcHmac512::NONCE_LENGTH,
      Self::A128GCM => Aes128Gcm::NONCE_LENGTH,
      Self::A192GCM => Aes192Gcm::NONCE_LENGTH,
      Self::A256GCM => Aes256Gcm::NONCE_LENGTH,
    }
  }
}

impl Display for JweEncryption {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

// =============================================================================
// AEAD Dispatch
// =============================================================================

/// Encrypts `plaintext` under `cek`, authenticating `aad`. Returns the
/// ciphertext and authentication tag.
pub(crate) fn encrypt(enc: JweEncryption, cek: &[u8], iv: &[u8], aad: &[u8], plaintext: &[u8]) -> Result<(Vec<u8>, Vec<u8>)> {
  match enc {
    JweEncryption::A128CBC_HS256 => aead_encrypt::<Aes128CbcHmac256>(cek, iv, aad, plaintext),
    JweEncryption::A192CBC_HS384 => aead_encrypt::<Aes192CbcHmac384>(cek, iv, aad, plaintext),
    JweEncryption::A256CBC_HS512 => aead_encrypt::<Aes256CbcHmac512>(cek, iv, aad, plaintext),
    JweEncryption::A128GCM => aead_encrypt::<Aes128Gcm>(cek, iv, aad, plaintext),
    JweEncryption::A192GCM => aead_encrypt::<Aes192Gcm>(cek, iv, aad, plaintext),
    JweEncryption::A256GCM => aead_encrypt::<Aes256Gcm>(cek, iv, aad, plaintext),
  }
}

/// Verifies the authentication tag and decrypts `ciphertext` under `cek`.
///
/// Tag verification completes before any plaintext is produced; all
/// failures surface as [`Error::IntegrityFailure`].
pub(crate) fn decrypt(
  enc: JweEncryption,
  cek: &[u8],
  iv: &[u8],
  aad: &[u8],
  ciphertext: &[u8],
  tag: &[u8],
) -> Result<Vec<u8>> {
  match enc {
    JweEncryption::A128CBC_HS256 => aead_decrypt::<Aes128CbcHmac256>(cek, iv, aad, ciphertext, tag),
    JweEncryption::A192CBC_HS384 => aead_decrypt::<Aes192CbcHmac384>(cek, iv, aad, ciphertext, tag),
    JweEncryption::A256CBC_HS512 => aead_decrypt::<Aes256CbcHmac512>(cek, iv, aad, ciphertext, tag),
    JweEncryption::A128GCM => aead_decrypt::<Aes128Gcm>(cek, iv, aad, ciphertext, tag),
    JweEncryption::A192GCM => aead_decrypt::<Aes192Gcm>(cek, iv, aad, ciphertext, tag),
    JweEncryption::A256GCM => aead_decrypt::<Aes256Gcm>(cek, iv, aad, ciphertext, tag),
  }
}

fn aead_encrypt<A: Aead>(key: &[u8], iv: &[u8], aad: &[u8], plaintext: &[u8]) -> Result<(Vec<u8>, Vec<u8>)> {
  if key.len() != A::KEY_LENGTH {
    return Err(Error::InvalidKey("invalid content encryption key length"));
  }

  if iv.len() != A::NONCE_LENGTH {
    return Err(Error::CryptoFailure("invalid initialization vector length"));
  }

  let padding: usize = A::padsize(plaintext).map(|size| size.get()).unwrap_or_default();
  let mut ciphertext: Vec<u8> = vec![0; plaintext.len() + padding];
  let mut tag: Vec<u8> = vec![0; A::TAG_LENGTH];

  A::try_encrypt(key, iv, aad, plaintext, &mut ciphertext, &mut tag).map_err(|_| Error::CryptoFailure("encryption failed"))?;

  Ok((ciphertext, tag))
}

fn aead_decrypt<A: Aead>(key: &[u8], iv: &[u8], aad: &[u8], ciphertext: &[u8], tag: &[u8]) -> Result<Vec<u8>> {
  if key.len() != A::KEY_LENGTH {
    return Err(Error::IntegrityFailure);
  }

  if iv.len() != A::NONCE_LENGTH || tag.len() != A::TAG_LENGTH {
    return Err(Error::IntegrityFailure);
  }

  let mut plaintext: Vec<u8> = vec![0; ciphertext.len()];

  let length: usize = A::try_decrypt(key, iv, aad, &mut plaintext, ciphertext, tag).map_err(|_| Error::IntegrityFailure)?;

  plaintext.truncate(length);

  Ok(plaintext)
}
