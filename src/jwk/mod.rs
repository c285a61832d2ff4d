// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! JSON Web Keys ([JWK](https://tools.ietf.org/html/rfc7517)).

mod curve;
mod jwk;
mod jwk_operation;
mod jwk_params;
mod jwk_set;
mod jwk_type;
mod jwk_use;

pub use self::curve::EcCurve;
pub use self::curve::EcxCurve;
pub use self::curve::EdCurve;
pub use self::jwk::Jwk;
pub use self::jwk_operation::JwkOperation;
pub use self::jwk_params::JwkParams;
pub use self::jwk_params::JwkParamsEc;
pub use self::jwk_params::JwkParamsOct;
pub use self::jwk_params::JwkParamsOkp;
pub use self::jwk_params::JwkParamsRsa;
pub use self::jwk_params::JwkParamsRsaPrime;
pub use self::jwk_set::JwkSet;
pub use self::jwk_type::JwkType;
pub use self::jwk_use::JwkUse;
