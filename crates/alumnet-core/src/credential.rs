//! Bearer credential issuing and verification.
//!
//! Tokens are JWTs signed with one symmetric key and one algorithm
//! ([`SIGNING_ALGORITHM`]). Anything else is rejected as unauthenticated.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Error, Result,
  account::{Account, normalize_email},
};

/// The only algorithm tokens are signed and accepted with.
pub const SIGNING_ALGORITHM: Algorithm = Algorithm::HS256;

/// Default lifetime of an issued token.
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;

const BEARER_PREFIX: &str = "Bearer ";

// ─── Wire payload ────────────────────────────────────────────────────────────

/// The JWT payload as it travels in the `Authorization` header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
  pub sub:     Uuid,
  pub email:   String,
  pub role_id: Uuid,
  pub iat:     i64,
  pub exp:     i64,
}

impl TokenClaims {
  pub fn for_account(account: &Account, ttl: Duration) -> Self {
    let now = Utc::now();
    Self {
      sub:     account.id,
      email:   account.email.clone(),
      role_id: account.role_id,
      iat:     now.timestamp(),
      exp:     (now + ttl).timestamp(),
    }
  }
}

// ─── Verified identity ───────────────────────────────────────────────────────

/// The verified fields of a bearer credential.
///
/// Only [`CredentialVerifier::verify`] constructs this, so holding one means
/// the signature and expiry were checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdentityClaims {
  subject:    Uuid,
  email:      String,
  role_id:    Uuid,
  expires_at: DateTime<Utc>,
}

impl IdentityClaims {
  pub fn subject(&self) -> Uuid { self.subject }

  pub fn email(&self) -> &str { &self.email }

  pub fn role_id(&self) -> Uuid { self.role_id }

  pub fn expires_at(&self) -> DateTime<Utc> { self.expires_at }
}

// ─── Verifier ────────────────────────────────────────────────────────────────

pub struct CredentialVerifier {
  key:        DecodingKey,
  validation: Validation,
}

impl CredentialVerifier {
  pub fn new(secret: &[u8]) -> Self {
    let mut validation = Validation::new(SIGNING_ALGORITHM);
    validation.leeway = 0;
    validation.set_required_spec_claims(&["exp"]);
    Self { key: DecodingKey::from_secret(secret), validation }
  }

  /// Verify a raw `Authorization` header value.
  pub fn verify(&self, header: &str) -> Result<IdentityClaims> {
    let token = header
      .strip_prefix(BEARER_PREFIX)
      .ok_or(Error::Unauthenticated("expected a Bearer credential"))?
      .trim();
    if token.is_empty() {
      return Err(Error::Unauthenticated("empty bearer credential"));
    }

    let data = jsonwebtoken::decode::<TokenClaims>(token, &self.key, &self.validation)
      .map_err(|e| {
        tracing::debug!(error = %e, "bearer credential rejected");
        Error::Unauthenticated("invalid or expired credential")
      })?;
    let claims = data.claims;

    let expires_at = DateTime::from_timestamp(claims.exp, 0)
      .ok_or(Error::Unauthenticated("invalid or expired credential"))?;

    Ok(IdentityClaims {
      subject: claims.sub,
      email: normalize_email(&claims.email),
      role_id: claims.role_id,
      expires_at,
    })
  }
}

// ─── Issuer ──────────────────────────────────────────────────────────────────

/// Signs tokens with the same key and algorithm the verifier accepts.
pub struct CredentialIssuer {
  key: EncodingKey,
  ttl: Duration,
}

impl CredentialIssuer {
  pub fn new(secret: &[u8], ttl: Duration) -> Self {
    Self { key: EncodingKey::from_secret(secret), ttl }
  }

  pub fn sign(&self, claims: &TokenClaims) -> Result<String> {
    jsonwebtoken::encode(&Header::new(SIGNING_ALGORITHM), claims, &self.key)
      .map_err(|e| Error::Internal(format!("token signing failed: {e}")))
  }

  /// Issue a token for `account`, returning it with its payload.
  pub fn issue(&self, account: &Account) -> Result<(String, TokenClaims)> {
    let claims = TokenClaims::for_account(account, self.ttl);
    let token = self.sign(&claims)?;
    Ok((token, claims))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::ErrorKind;

  const SECRET: &[u8] = b"test-secret";

  fn claims(exp_offset: Duration) -> TokenClaims {
    let now = Utc::now();
    TokenClaims {
      sub:     Uuid::new_v4(),
      email:   "alice@example.com".into(),
      role_id: Uuid::new_v4(),
      iat:     now.timestamp(),
      exp:     (now + exp_offset).timestamp(),
    }
  }

  fn bearer(token: &str) -> String { format!("Bearer {token}") }

  fn issuer() -> CredentialIssuer { CredentialIssuer::new(SECRET, Duration::hours(1)) }

  fn assert_unauthenticated(result: Result<IdentityClaims>) {
    assert_eq!(result.unwrap_err().kind(), ErrorKind::Unauthenticated);
  }

  #[test]
  fn valid_token_yields_encoded_fields() {
    let payload = claims(Duration::hours(1));
    let token = issuer().sign(&payload).unwrap();

    let identity = CredentialVerifier::new(SECRET).verify(&bearer(&token)).unwrap();
    assert_eq!(identity.subject(), payload.sub);
    assert_eq!(identity.email(), payload.email);
    assert_eq!(identity.role_id(), payload.role_id);
    assert_eq!(identity.expires_at().timestamp(), payload.exp);
  }

  #[test]
  fn email_is_normalised() {
    let mut payload = claims(Duration::hours(1));
    payload.email = "  Alice@Example.COM ".into();
    let token = issuer().sign(&payload).unwrap();

    let identity = CredentialVerifier::new(SECRET).verify(&bearer(&token)).unwrap();
    assert_eq!(identity.email(), "alice@example.com");
  }

  #[test]
  fn surrounding_whitespace_is_trimmed() {
    let token = issuer().sign(&claims(Duration::hours(1))).unwrap();
    let header = format!("Bearer   {token}  ");
    assert!(CredentialVerifier::new(SECRET).verify(&header).is_ok());
  }

  #[test]
  fn expired_token_is_rejected() {
    let token = issuer().sign(&claims(Duration::seconds(-30))).unwrap();
    assert_unauthenticated(CredentialVerifier::new(SECRET).verify(&bearer(&token)));
  }

  #[test]
  fn wrong_key_is_rejected() {
    let token = CredentialIssuer::new(b"other", Duration::hours(1))
      .sign(&claims(Duration::hours(1)))
      .unwrap();
    assert_unauthenticated(CredentialVerifier::new(SECRET).verify(&bearer(&token)));
  }

  #[test]
  fn other_algorithm_is_rejected() {
    let token = jsonwebtoken::encode(
      &Header::new(Algorithm::HS512),
      &claims(Duration::hours(1)),
      &EncodingKey::from_secret(SECRET),
    )
    .unwrap();
    assert_unauthenticated(CredentialVerifier::new(SECRET).verify(&bearer(&token)));
  }

  #[test]
  fn unsigned_token_is_rejected() {
    let token = issuer().sign(&claims(Duration::hours(1))).unwrap();
    let unsigned = token.rsplit_once('.').map(|(head, _)| format!("{head}.")).unwrap();
    assert_unauthenticated(CredentialVerifier::new(SECRET).verify(&bearer(&unsigned)));
  }

  #[test]
  fn malformed_headers_are_rejected() {
    let verifier = CredentialVerifier::new(SECRET);
    let token = issuer().sign(&claims(Duration::hours(1))).unwrap();
    for header in [
      String::new(),
      "Bearer ".to_string(),
      "Bearer    ".to_string(),
      format!("bearer {token}"),
      format!("Basic {token}"),
      token.clone(),
      "Bearer not.a.jwt".to_string(),
    ] {
      assert_unauthenticated(verifier.verify(&header));
    }
  }

  #[test]
  fn issue_round_trips_account_fields() {
    let account = Account {
      id:            Uuid::new_v4(),
      username:      "alice".into(),
      email:         "alice@example.com".into(),
      password_hash: String::new(),
      role_id:       Uuid::new_v4(),
      alumni_id:     None,
      created_at:    Utc::now(),
    };
    let (token, payload) = issuer().issue(&account).unwrap();
    assert_eq!(payload.exp - payload.iat, 3600);

    let identity = CredentialVerifier::new(SECRET).verify(&bearer(&token)).unwrap();
    assert_eq!(identity.subject(), account.id);
    assert_eq!(identity.role_id(), account.role_id);
  }
}
