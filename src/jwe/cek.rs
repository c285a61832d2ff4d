// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! Shared key-management primitives: AES Key Wrap, AES GCM key wrapping and
//! the PBES2 key derivation.

use core::num::NonZeroU32;

use crypto::ciphers::aes_gcm::Aes128Gcm;
use crypto::ciphers::aes_gcm::Aes192Gcm;
use crypto::ciphers::aes_gcm::Aes256Gcm;
use crypto::ciphers::aes_kw::Aes128Kw;
use crypto::ciphers::aes_kw::Aes192Kw;
use crypto::ciphers::aes_kw::Aes256Kw;
use crypto::ciphers::traits::Aead;
use crypto::keys::pbkdf::PBKDF2_HMAC_SHA256;
use crypto::keys::pbkdf::PBKDF2_HMAC_SHA384;
use crypto::keys::pbkdf::PBKDF2_HMAC_SHA512;
use zeroize::Zeroizing;

use crate::error::Error;
use crate::error::Result;
use crate::jwe::JweAlgorithm;

// The AES Key Wrap semi-block size.
pub(crate) const KW_BLOCK: usize = 8;

// The length of the initialization vector consumed by AES GCM key wrapping.
pub(crate) const GCM_KW_IV_LEN: usize = 12;

// The length of the authentication tag produced by AES GCM key wrapping.
pub(crate) const GCM_KW_TAG_LEN: usize = 16;

/// Wraps `cek` under `kek` with RFC 3394 AES Key Wrap.
pub(crate) fn kw_wrap(key_len: usize, kek: &[u8], cek: &[u8]) -> Result<Vec<u8>> {
  if kek.len() != key_len {
    return Err(Error::InvalidKey("invalid key wrap key length"));
  }

  let mut wrapped: Vec<u8> = vec![0; cek.len() + KW_BLOCK];

  let result: core::result::Result<(), _> = match key_len {
    16 => Aes128Kw::new(kek).wrap_key(cek, &mut wrapped),
    24 => Aes192Kw::new(kek).wrap_key(cek, &mut wrapped),
    32 => Aes256Kw::new(kek).wrap_key(cek, &mut wrapped),
    _ => return Err(Error::InvalidKey("invalid key wrap key length")),
  };

  result.map_err(|_| Error::CryptoFailure("key wrap failed"))?;

  Ok(wrapped)
}

/// Unwraps `wrapped` under `kek` with RFC 3394 AES Key Wrap.
///
/// All failures surface as [`Error::IntegrityFailure`].
pub(crate) fn kw_unwrap(key_len: usize, kek: &[u8], wrapped: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
  if kek.len() != key_len {
    return Err(Error::InvalidKey("invalid key wrap key length"));
  }

  if wrapped.len() <= KW_BLOCK || wrapped.len() % KW_BLOCK != 0 {
    return Err(Error::IntegrityFailure);
  }

  let mut cek: Zeroizing<Vec<u8>> = Zeroizing::new(vec![0; wrapped.len() - KW_BLOCK]);

  let result: core::result::Result<(), _> = match key_len {
    16 => Aes128Kw::new(kek).unwrap_key(wrapped, &mut cek),
    24 => Aes192Kw::new(kek).unwrap_key(wrapped, &mut cek),
    32 => Aes256Kw::new(kek).unwrap_key(wrapped, &mut cek),
    _ => return Err(Error::InvalidKey("invalid key wrap key length")),
  };

  result.map_err(|_| Error::IntegrityFailure)?;

  Ok(cek)
}

/// Encrypts `cek` under `kek` with AES GCM. Returns the wrapped key and the
/// authentication tag.
pub(crate) fn gcm_kw_wrap(key_len: usize, kek: &[u8], iv: &[u8], cek: &[u8]) -> Result<(Vec<u8>, Vec<u8>)> {
  fn wrap<A: Aead>(kek: &[u8], iv: &[u8], cek: &[u8]) -> Result<(Vec<u8>, Vec<u8>)> {
    let mut wrapped: Vec<u8> = vec![0; cek.len()];
    let mut tag: Vec<u8> = vec![0; A::TAG_LENGTH];

    A::try_encrypt(kek, iv, &[], cek, &mut wrapped, &mut tag).map_err(|_| Error::CryptoFailure("key wrap failed"))?;

    Ok((wrapped, tag))
  }

  if kek.len() != key_len {
    return Err(Error::InvalidKey("invalid key wrap key length"));
  }

  match key_len {
    16 => wrap::<Aes128Gcm>(kek, iv, cek),
    24 => wrap::<Aes192Gcm>(kek, iv, cek),
    32 => wrap::<Aes256Gcm>(kek, iv, cek),
    _ => Err(Error::InvalidKey("invalid key wrap key length")),
  }
}

/// Decrypts `wrapped` under `kek` with AES GCM.
///
/// All failures surface as [`Error::IntegrityFailure`].
pub(crate) fn gcm_kw_unwrap(key_len: usize, kek: &[u8], iv: &[u8], tag: &[u8], wrapped: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
  fn unwrap<A: Aead>(kek: &[u8], iv: &[u8], tag: &[u8], wrapped: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
    let mut cek: Zeroizing<Vec<u8>> = Zeroizing::new(vec![0; wrapped.len()]);

    let length: usize = A::try_decrypt(kek, iv, &[], &mut cek, wrapped, tag).map_err(|_| Error::IntegrityFailure)?;

    cek.truncate(length);

    Ok(cek)
  }

  if kek.len() != key_len {
    return Err(Error::InvalidKey("invalid key wrap key length"));
  }

  if iv.len() != GCM_KW_IV_LEN || tag.len() != GCM_KW_TAG_LEN {
    return Err(Error::IntegrityFailure);
  }

  match key_len {
    16 => unwrap::<Aes128Gcm>(kek, iv, tag, wrapped),
    24 => unwrap::<Aes192Gcm>(kek, iv, tag, wrapped),
    32 => unwrap::<Aes256Gcm>(kek, iv, tag, wrapped),
    _ => Err(Error::InvalidKey("invalid key wrap key length")),
  }
}

/// Derives the PBES2 key wrap key from `password` with PBKDF2.
///
/// The PBKDF2 salt is the UTF-8 algorithm identifier, a zero byte, then the
/// decoded `p2s` value.
pub(crate) fn pbes2_derive(alg: JweAlgorithm, password: &[u8], p2s: &[u8], p2c: u64) -> Result<Zeroizing<Vec<u8>>> {
  let key_len: usize = alg.try_wrap_key_len().ok_or(Error::UnsupportedAlgorithm(alg.name()))?;

  let count: NonZeroU32 = u32::try_from(p2c)
    .ok()
    .and_then(NonZeroU32::new)
    .ok_or(Error::MalformedEncoding("invalid `p2c` value"))?;

  let mut salt: Vec<u8> = Vec::with_capacity(alg.name().len() + 1 + p2s.len());

  salt.extend_from_slice(alg.name().as_bytes());
  salt.push(0x00);
  salt.extend_from_slice(p2s);

  let mut output: Zeroizing<Vec<u8>> = Zeroizing::new(vec![0; key_len]);

  match alg {
    JweAlgorithm::PBES2_HS256_A128KW => PBKDF2_HMAC_SHA256(password, &salt, count, &mut output),
    JweAlgorithm::PBES2_HS384_A192KW => PBKDF2_HMAC_SHA384(password, &salt, count, &mut output),
    JweAlgorithm::PBES2_HS512_A256KW => PBKDF2_HMAC_SHA512(password, &salt, count, &mut output),
    _ => return Err(Error::UnsupportedAlgorithm(alg.name())),
  }

  Ok(output)
}

#[cfg(test)]
mod tests {
  use super::kw_unwrap;
  use super::kw_wrap;

  #[test]
  fn test_kw_roundtrip() {
    let kek: [u8; 32] = [7; 32];
    let cek: [u8; 32] = [42; 32];

    let wrapped: Vec<u8> = kw_wrap(32, &kek, &cek).unwrap();

    assert_eq!(wrapped.len(), cek.len() + 8);
    assert_eq!(kw_unwrap(32, &kek, &wrapped).unwrap().as_slice(), cek);
  }

  #[test]
  fn test_kw_unwrap_tampered() {
    let kek: [u8; 16] = [7; 16];
    let cek: [u8; 16] = [42; 16];

    let mut wrapped: Vec<u8> = kw_wrap(16, &kek, &cek).unwrap();
    wrapped[3] ^= 0x80;

    assert!(kw_unwrap(16, &kek, &wrapped).is_err());
  }

  #[test]
  fn test_kw_rfc3394_vector() {
    // RFC 3394 Section 4.1: 128-bit key data with a 128-bit KEK.
    let kek: Vec<u8> = (0..16).collect();
    let cek: [u8; 16] = [
      0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88, 0x99, 0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff,
    ];
    let expected: [u8; 24] = [
      0x1f, 0xa6, 0x8b, 0x0a, 0x81, 0x12, 0xb4, 0x47, 0xae, 0xf3, 0x4b, 0xd8, 0xfb, 0x5a, 0x7b, 0x82, 0x9d, 0x3e,
      0x86, 0x23, 0x71, 0xd2, 0xcf, 0xe5,
    ];

    assert_eq!(kw_wrap(16, &kek, &cek).unwrap(), expected);
  }
}
