// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! JSON Web Signatures ([JWS](https://tools.ietf.org/html/rfc7515)).

mod algorithm;
mod decoder;
mod encoder;
mod header;
mod sign;

pub use self::algorithm::JwsAlgorithm;
pub use self::decoder::Decoder;
pub use self::decoder::Token;
pub use self::encoder::Encoder;
pub use self::header::JwsHeader;
pub use self::sign::sign;
pub use self::sign::validate_signing_key;
pub use self::sign::validate_verification_key;
pub use self::sign::verify;

pub(crate) use self::decoder::check_critical;
pub(crate) use self::decoder::parse_compact;
pub(crate) use self::decoder::RawJws;
