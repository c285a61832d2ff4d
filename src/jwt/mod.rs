// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! JSON Web Tokens ([JWT](https://tools.ietf.org/html/rfc7519)).

mod claims;
mod consumer;
mod context;
mod header;

pub use self::claims::Audience;
pub use self::claims::JwtClaims;
pub use self::consumer::JwtConsumer;
pub use self::consumer::JwtConsumerBuilder;
pub use self::consumer::KeyResolver;
pub use self::consumer::Validator;
pub use self::context::JoseLayer;
pub use self::context::JweLayer;
pub use self::context::JwsLayer;
pub use self::context::JwtContext;
pub use self::header::JwtHeader;
