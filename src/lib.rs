// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! A producer and consumer for JOSE objects (JWS, JWE, JWT, JWK) in Compact
//! Serialization, implementing RFC 7515, 7516, 7517, 7518, 7519 and 7638.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(clippy::upper_case_acronyms)]

pub mod error;
pub mod jwa;
pub mod jwe;
pub mod jwk;
pub mod jws;
pub mod jwt;
pub mod utils;

pub use self::error::Error;
pub use self::error::Result;
