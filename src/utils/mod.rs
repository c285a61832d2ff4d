// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! Shared utilities: base64url codec, key material handling, ECDH and the
//! Concat KDF.

mod base64;
mod crypto;
mod secret;

pub use self::base64::decode_b64;
pub use self::base64::decode_b64_json;
pub use self::base64::encode_b64;
pub use self::base64::encode_b64_json;
pub use self::crypto::concat_kdf;
pub use self::crypto::diffie_hellman;
pub use self::crypto::random_bytes;
pub use self::secret::Secret;

pub(crate) use self::crypto::ecdh_shared_secret;
pub(crate) use self::crypto::generate_agreement_key;
pub(crate) use self::crypto::k256_public_key;
pub(crate) use self::crypto::k256_secret_key;
pub(crate) use self::crypto::p256_public_key;
pub(crate) use self::crypto::p256_secret_key;
pub(crate) use self::crypto::p384_public_key;
pub(crate) use self::crypto::p384_secret_key;
pub(crate) use self::crypto::p521_public_key;
pub(crate) use self::crypto::p521_secret_key;
pub(crate) use self::crypto::rsa_public_key;
pub(crate) use self::crypto::rsa_secret_key;
