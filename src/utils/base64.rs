// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Error;
use crate::error::Result;

/// Encodes `data` as base64url without padding.
pub fn encode_b64(data: impl AsRef<[u8]>) -> String {
  base64::encode_config(data.as_ref(), base64::URL_SAFE_NO_PAD)
}

/// Decodes base64url `data`, with or without padding.
pub fn decode_b64(data: impl AsRef<[u8]>) -> Result<Vec<u8>> {
  let data: &[u8] = data.as_ref();

  // Trailing padding is tolerated on input; it is never emitted.
  let padding: usize = data.iter().rev().take_while(|byte| **byte == b'=').count();

  base64::decode_config(&data[..data.len() - padding], base64::URL_SAFE_NO_PAD)
    .map_err(|_| Error::MalformedEncoding("invalid base64url content"))
}

/// Serializes `data` as JSON and encodes the result as base64url.
pub fn encode_b64_json<T>(data: &T) -> Result<String>
where
  T: Serialize,
{
  serde_json::to_vec(data).map(encode_b64).map_err(Error::InvalidJson)
}

/// Decodes base64url `data` and deserializes the result as JSON.
pub fn decode_b64_json<T>(data: impl AsRef<[u8]>) -> Result<T>
where
  T: DeserializeOwned,
{
  decode_b64(data).and_then(|json| serde_json::from_slice(&json).map_err(Error::InvalidJson))
}

#[cfg(test)]
mod tests {
  use super::decode_b64;
  use super::encode_b64;

  #[test]
  fn test_roundtrip() {
    for data in [&b""[..], &b"f"[..], &b"fo"[..], &b"foo"[..], &[0xfb, 0xff, 0xbf][..]] {
      assert_eq!(decode_b64(encode_b64(data)).unwrap(), data);
    }
  }

  #[test]
  fn test_no_padding_emitted() {
    assert_eq!(encode_b64(b"f"), "Zg");
    assert_eq!(encode_b64(b"fo"), "Zm8");
  }

  #[test]
  fn test_padded_input_accepted() {
    assert_eq!(decode_b64("Zg==").unwrap(), b"f");
    assert_eq!(decode_b64("Zm8=").unwrap(), b"fo");
  }

  #[test]
  fn test_foreign_characters_rejected() {
    assert!(decode_b64("Zm9v+A").is_err());
    assert!(decode_b64("Zm9v/A").is_err());
    assert!(decode_b64("Zm9v A").is_err());
  }
}
