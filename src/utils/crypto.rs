// Copyright 2020-2024 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use crypto::hashes::sha::Sha256;
use crypto::hashes::Digest;
use crypto::keys::x25519;
use crypto::keys::x448;
use rand::rngs::OsRng;
use zeroize::Zeroizing;

use crate::error::Error;
use crate::error::Result;
use crate::jwk::EcCurve;
use crate::jwk::EcxCurve;
use crate::jwk::Jwk;
use crate::jwk::JwkParamsEc;
use crate::jwk::JwkParamsOkp;
use crate::jwk::JwkType;
use crate::utils::decode_b64;
use crate::utils::encode_b64;

/// Fills a new buffer of `size` bytes from the platform secure RNG.
pub fn random_bytes(size: usize) -> Result<Vec<u8>> {
  let mut bytes: Vec<u8> = vec![0; size];

  crypto::utils::rand::fill(&mut bytes).map_err(|_| Error::CryptoFailure("rng failure"))?;

  Ok(bytes)
}

/// The Concat KDF (using SHA-256) as defined in Section 5.8.1 of NIST.800-56A.
///
/// `alg` is the AlgorithmID: the `enc` identifier for direct key agreement
/// and the `alg` identifier for key agreement with key wrapping.
pub fn concat_kdf(alg: &str, len: usize, z: &[u8], apu: &[u8], apv: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
  let mut digest: Sha256 = Sha256::new();
  let mut output: Zeroizing<Vec<u8>> = Zeroizing::new(Vec::new());

  let target: usize = (len + (Sha256::output_size() - 1)) / Sha256::output_size();
  let rounds: u32 = u32::try_from(target).map_err(|_| Error::CryptoFailure("concat kdf rounds"))?;

  for count in 0..rounds {
    // Iteration Count
    digest.update((count + 1).to_be_bytes());

    // Derived Secret
    digest.update(z);

    // AlgorithmId
    digest.update((alg.len() as u32).to_be_bytes());
    digest.update(alg.as_bytes());

    // PartyUInfo
    digest.update((apu.len() as u32).to_be_bytes());
    digest.update(apu);

    // PartyVInfo
    digest.update((apv.len() as u32).to_be_bytes());
    digest.update(apv);

    // SuppPubInfo
    digest.update(((len * 8) as u32).to_be_bytes());

    output.extend_from_slice(&digest.finalize_reset());
  }

  output.truncate(len);

  Ok(output)
}

// =============================================================================
// X25519/X448 Key Agreement
// =============================================================================

/// Computes the shared secret between an X25519/X448 `public` and `secret` key.
pub fn diffie_hellman(curve: EcxCurve, public: &Jwk, secret: &Jwk) -> Result<Vec<u8>> {
  match curve {
    EcxCurve::X25519 => {
      let public: x25519::PublicKey = to_x25519_public(public)?;
      let secret: x25519::SecretKey = to_x25519_secret(secret)?;

      Ok(secret.diffie_hellman(&public).to_bytes().to_vec())
    }
    EcxCurve::X448 => {
      let public: x448::PublicKey = to_x448_public(public)?;
      let secret: x448::SecretKey = to_x448_secret(secret)?;

      Ok(secret.diffie_hellman(&public).to_bytes().to_vec())
    }
  }
}

fn okp_params_on(jwk: &Jwk, curve: EcxCurve) -> Result<&JwkParamsOkp> {
  let params: &JwkParamsOkp = jwk.try_okp_params()?;

  if params.try_ecx_curve()? != curve {
    return Err(Error::InvalidKey("curve mismatch"));
  }

  Ok(params)
}

fn to_x25519_public(jwk: &Jwk) -> Result<x25519::PublicKey> {
  let params: &JwkParamsOkp = okp_params_on(jwk, EcxCurve::X25519)?;
  let x: [u8; x25519::PUBLIC_KEY_LENGTH] = decode_b64(&params.x)?
    .try_into()
    .map_err(|_| Error::InvalidKey("invalid public key length"))?;

  Ok(x25519::PublicKey::from_bytes(x))
}

fn to_x25519_secret(jwk: &Jwk) -> Result<x25519::SecretKey> {
  let params: &JwkParamsOkp = okp_params_on(jwk, EcxCurve::X25519)?;
  let d: Zeroizing<Vec<u8>> = params
    .d
    .as_deref()
    .map(decode_b64)
    .transpose()?
    .map(Zeroizing::new)
    .ok_or(Error::InvalidKey("missing private component"))?;
  let d: [u8; x25519::SECRET_KEY_LENGTH] = d
    .as_slice()
    .try_into()
    .map_err(|_| Error::InvalidKey("invalid secret key length"))?;

  Ok(x25519::SecretKey::from_bytes(d))
}

fn to_x448_public(jwk: &Jwk) -> Result<x448::PublicKey> {
  let params: &JwkParamsOkp = okp_params_on(jwk, EcxCurve::X448)?;
  let x: [u8; x448::PUBLIC_KEY_LENGTH] = decode_b64(&params.x)?
    .try_into()
    .map_err(|_| Error::InvalidKey("invalid public key length"))?;

  Ok(x448::PublicKey::from_bytes(x))
}

fn to_x448_secret(jwk: &Jwk) -> Result<x448::SecretKey> {
  let params: &JwkParamsOkp = okp_params_on(jwk, EcxCurve::X448)?;
  let d: Zeroizing<Vec<u8>> = params
    .d
    .as_deref()
    .map(decode_b64)
    .transpose()?
    .map(Zeroizing::new)
    .ok_or(Error::InvalidKey("missing private component"))?;
  let d: [u8; x448::SECRET_KEY_LENGTH] = d
    .as_slice()
    .try_into()
    .map_err(|_| Error::InvalidKey("invalid secret key length"))?;

  Ok(x448::SecretKey::from_bytes(&d))
}

// =============================================================================
// NIST Curve Keys
// =============================================================================

macro_rules! impl_ec_keys {
  ($ec:ident, $public_fn:ident, $secret_fn:ident, $field_len:expr) => {
    pub(crate) fn $public_fn(params: &JwkParamsEc) -> Result<$ec::PublicKey> {
      use $ec::elliptic_curve::sec1::FromEncodedPoint;

      let x: Vec<u8> = decode_b64(&params.x)?;
      let y: Vec<u8> = decode_b64(&params.y)?;

      if x.len() != $field_len || y.len() != $field_len {
        return Err(Error::InvalidKey("invalid coordinate length"));
      }

      let point: $ec::EncodedPoint =
        $ec::EncodedPoint::from_affine_coordinates($ec::FieldBytes::from_slice(&x), $ec::FieldBytes::from_slice(&y), false);

      // `from_encoded_point` rejects any point that does not satisfy the
      // curve equation.
      Option::from($ec::PublicKey::from_encoded_point(&point)).ok_or(Error::InvalidKey("point is not on the curve"))
    }

    pub(crate) fn $secret_fn(params: &JwkParamsEc) -> Result<$ec::SecretKey> {
      let d: Zeroizing<Vec<u8>> = params
        .d
        .as_deref()
        .map(decode_b64)
        .transpose()?
        .map(Zeroizing::new)
        .ok_or(Error::InvalidKey("missing private component"))?;

      $ec::SecretKey::from_slice(&d).map_err(|_| Error::InvalidKey("invalid private component"))
    }
  };
}

impl_ec_keys!(p256, p256_public_key, p256_secret_key, 32);
impl_ec_keys!(p384, p384_public_key, p384_secret_key, 48);
impl_ec_keys!(p521, p521_public_key, p521_secret_key, 66);
impl_ec_keys!(k256, k256_public_key, k256_secret_key, 32);

// =============================================================================
// ECDH-ES Key Agreement
// =============================================================================

/// Generates an ephemeral key on the same curve as `recipient`.
///
/// The returned key includes the private component; strip it with
/// [`Jwk::to_public`] before placing it into an `epk` header.
pub(crate) fn generate_agreement_key(recipient: &Jwk) -> Result<Jwk> {
  match recipient.kty() {
    JwkType::Ec => {
      let curve: EcCurve = recipient.try_ec_params()?.try_ec_curve()?;

      match curve {
        EcCurve::P256 => generate_p256(),
        EcCurve::P384 => generate_p384(),
        EcCurve::P521 => generate_p521(),
        EcCurve::Secp256K1 => Err(Error::InvalidKey("secp256k1 cannot be used for key agreement")),
      }
    }
    JwkType::Okp => match recipient.try_okp_params()?.try_ecx_curve()? {
      EcxCurve::X25519 => {
        let secret: x25519::SecretKey = x25519::SecretKey::generate().map_err(|_| Error::CryptoFailure("rng failure"))?;

        Ok(Jwk::from_params(JwkParamsOkp {
          crv: EcxCurve::X25519.name().to_string(),
          x: encode_b64(secret.public_key().to_bytes()),
          d: Some(encode_b64(secret.to_bytes())),
        }))
      }
      EcxCurve::X448 => {
        let secret: x448::SecretKey = x448::SecretKey::generate().map_err(|_| Error::CryptoFailure("rng failure"))?;

        Ok(Jwk::from_params(JwkParamsOkp {
          crv: EcxCurve::X448.name().to_string(),
          x: encode_b64(secret.public_key().to_bytes()),
          d: Some(encode_b64(secret.to_bytes())),
        }))
      }
    },
    _ => Err(Error::InvalidKey("expected an EC or OKP key")),
  }
}

macro_rules! impl_ec_generate {
  ($ec:ident, $generate_fn:ident, $curve:expr) => {
    fn $generate_fn() -> Result<Jwk> {
      use $ec::elliptic_curve::sec1::ToEncodedPoint;

      let secret: $ec::SecretKey = $ec::SecretKey::random(&mut OsRng);
      let point: $ec::EncodedPoint = secret.public_key().to_encoded_point(false);

      let x: &[u8] = point.x().map(AsRef::as_ref).ok_or(Error::CryptoFailure("invalid ephemeral key"))?;
      let y: &[u8] = point.y().map(AsRef::as_ref).ok_or(Error::CryptoFailure("invalid ephemeral key"))?;

      Ok(Jwk::from_params(JwkParamsEc {
        crv: $curve.name().to_string(),
        x: encode_b64(x),
        y: encode_b64(y),
        d: Some(encode_b64(secret.to_bytes())),
      }))
    }
  };
}

impl_ec_generate!(p256, generate_p256, EcCurve::P256);
impl_ec_generate!(p384, generate_p384, EcCurve::P384);
impl_ec_generate!(p521, generate_p521, EcCurve::P521);

/// Computes the ECDH shared secret `Z` between `public` and `secret`, which
/// must lie on the same curve. `secp256k1` is refused for key agreement.
pub(crate) fn ecdh_shared_secret(public: &Jwk, secret: &Jwk) -> Result<Zeroizing<Vec<u8>>> {
  match public.kty() {
    JwkType::Ec => {
      let public_params: &JwkParamsEc = public.try_ec_params()?;
      let secret_params: &JwkParamsEc = secret.try_ec_params()?;
      let curve: EcCurve = public_params.try_ec_curve()?;

      if secret_params.try_ec_curve()? != curve {
        return Err(Error::InvalidKey("curve mismatch"));
      }

      match curve {
        EcCurve::P256 => {
          let public: p256::PublicKey = p256_public_key(public_params)?;
          let secret: p256::SecretKey = p256_secret_key(secret_params)?;

          Ok(Zeroizing::new(
            p256::ecdh::diffie_hellman(secret.to_nonzero_scalar(), public.as_affine())
              .raw_secret_bytes()
              .to_vec(),
          ))
        }
        EcCurve::P384 => {
          let public: p384::PublicKey = p384_public_key(public_params)?;
          let secret: p384::SecretKey = p384_secret_key(secret_params)?;

          Ok(Zeroizing::new(
            p384::ecdh::diffie_hellman(secret.to_nonzero_scalar(), public.as_affine())
              .raw_secret_bytes()
              .to_vec(),
          ))
        }
        EcCurve::P521 => {
          let public: p521::PublicKey = p521_public_key(public_params)?;
          let secret: p521::SecretKey = p521_secret_key(secret_params)?;

          Ok(Zeroizing::new(
            p521::ecdh::diffie_hellman(secret.to_nonzero_scalar(), public.as_affine())
              .raw_secret_bytes()
              .to_vec(),
          ))
        }
        EcCurve::Secp256K1 => Err(Error::InvalidKey("secp256k1 cannot be used for key agreement")),
      }
    }
    JwkType::Okp => {
      let curve: EcxCurve = public.try_okp_params()?.try_ecx_curve()?;

      diffie_hellman(curve, public, secret).map(Zeroizing::new)
    }
    _ => Err(Error::InvalidKey("expected an EC or OKP key")),
  }
}

// =============================================================================
// RSA Keys
// =============================================================================

pub(crate) fn rsa_public_key(jwk: &Jwk) -> Result<rsa::RsaPublicKey> {
  let params: &crate::jwk::JwkParamsRsa = jwk.try_rsa_params()?;

  let n: rsa::BigUint = rsa::BigUint::from_bytes_be(&decode_b64(&params.n)?);
  let e: rsa::BigUint = rsa::BigUint::from_bytes_be(&decode_b64(&params.e)?);

  rsa::RsaPublicKey::new(n, e).map_err(|_| Error::InvalidKey("invalid rsa public key"))
}

pub(crate) fn rsa_secret_key(jwk: &Jwk) -> Result<rsa::RsaPrivateKey> {
  let params: &crate::jwk::JwkParamsRsa = jwk.try_rsa_params()?;

  let n: rsa::BigUint = rsa::BigUint::from_bytes_be(&decode_b64(&params.n)?);
  let e: rsa::BigUint = rsa::BigUint::from_bytes_be(&decode_b64(&params.e)?);

  let d: rsa::BigUint = params
    .d
    .as_deref()
    .map(decode_b64)
    .transpose()?
    .map(|bytes| rsa::BigUint::from_bytes_be(&bytes))
    .ok_or(Error::InvalidKey("missing private exponent"))?;

  let mut primes: Vec<rsa::BigUint> = Vec::new();

  if let (Some(p), Some(q)) = (params.p.as_deref(), params.q.as_deref()) {
    primes.push(rsa::BigUint::from_bytes_be(&decode_b64(p)?));
    primes.push(rsa::BigUint::from_bytes_be(&decode_b64(q)?));
  }

  rsa::RsaPrivateKey::from_components(n, e, d, primes).map_err(|_| Error::InvalidKey("invalid rsa private key"))
}
