//! # Bearer Tokens
//!
//! A token names a user and nothing else. Role and privileges are re-read
//! from the identity relation on every request, so a demoted user loses
//! access without waiting for the token to expire.
//!
//! Tokens are HS256, issued and accepted only for the `typedcms` issuer and
//! audience.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::{AuthError, AuthResult};
use super::user::User;

/// Issuer and audience of every token.
pub const TOKEN_ISSUER: &str = "typedcms";

/// Claims carried by an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    /// User id, as a decimal string
    pub sub: String,
    pub username: String,
    pub iat: i64,
    pub exp: i64,
    pub aud: String,
    pub iss: String,
    /// Per-token id, logged when the token is accepted
    pub jti: String,
}

impl JwtClaims {
    /// The user id named by `sub`.
    pub fn user_id(&self) -> AuthResult<i64> {
        self.sub.parse().map_err(|_| AuthError::MalformedToken)
    }
}

/// Signing secret and token lifetime.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub ttl: Duration,
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>, ttl: Duration) -> Self {
        Self {
            secret: secret.into(),
            ttl,
        }
    }
}

/// A freshly signed token and the instant it stops being accepted.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Signs and verifies access tokens with one shared secret.
#[derive(Clone)]
pub struct TokenIssuer {
    ttl: Duration,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenIssuer {
    pub fn new(config: &JwtConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[TOKEN_ISSUER]);
        validation.set_issuer(&[TOKEN_ISSUER]);
        validation.set_required_spec_claims(&["exp", "sub", "aud", "iss"]);

        Self {
            ttl: config.ttl,
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
        }
    }

    /// Signs a token for `user`, valid for the configured lifetime.
    pub fn issue(&self, user: &User) -> AuthResult<IssuedToken> {
        let issued_at = Utc::now();
        let expires_at = issued_at + self.ttl;

        let claims = JwtClaims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            aud: TOKEN_ISSUER.to_string(),
            iss: TOKEN_ISSUER.to_string(),
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|_| AuthError::TokenGenerationFailed)?;
        Ok(IssuedToken { token, expires_at })
    }

    /// Checks signature, expiry, issuer and audience.
    pub fn verify(&self, token: &str) -> AuthResult<JwtClaims> {
        decode::<JwtClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                _ => AuthError::MalformedToken,
            })
    }
}

/// Login response body
#[derive(Debug, Clone, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    /// Seconds until expiry
    pub expires_in: i64,
    pub expires_at: i64,
    pub username: String,
}

impl TokenResponse {
    pub fn new(issued: IssuedToken, username: String) -> Self {
        Self {
            access_token: issued.token,
            token_type: "bearer".to_string(),
            expires_in: (issued.expires_at - Utc::now()).num_seconds(),
            expires_at: issued.expires_at.timestamp(),
            username,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::privileges::{Privileges, Role};

    fn issuer(secret: &str) -> TokenIssuer {
        TokenIssuer::new(&JwtConfig::new(secret, Duration::minutes(15)))
    }

    fn bilbo() -> User {
        User {
            id: 42,
            username: "bilbo".to_string(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string(),
            role: Role::User,
            privileges: Privileges::all(),
        }
    }

    fn sign(claims: &JwtClaims, secret: &str) -> String {
        encode(&Header::default(), claims, &EncodingKey::from_secret(secret.as_bytes())).unwrap()
    }

    fn claims_for(sub: &str, issued_at: DateTime<Utc>, ttl: Duration) -> JwtClaims {
        JwtClaims {
            sub: sub.to_string(),
            username: "bilbo".to_string(),
            iat: issued_at.timestamp(),
            exp: (issued_at + ttl).timestamp(),
            aud: TOKEN_ISSUER.to_string(),
            iss: TOKEN_ISSUER.to_string(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    #[test]
    fn test_issue_then_verify() {
        let issuer = issuer("test_secret");
        let issued = issuer.issue(&bilbo()).unwrap();
        let claims = issuer.verify(&issued.token).unwrap();

        assert_eq!(claims.user_id().unwrap(), 42);
        assert_eq!(claims.username, "bilbo");
        assert_eq!(claims.exp, issued.expires_at.timestamp());
        assert!(Uuid::parse_str(&claims.jti).is_ok());
    }

    #[test]
    fn test_token_ids_are_unique() {
        let issuer = issuer("test_secret");
        let a = issuer.verify(&issuer.issue(&bilbo()).unwrap().token).unwrap();
        let b = issuer.verify(&issuer.issue(&bilbo()).unwrap().token).unwrap();
        assert_ne!(a.jti, b.jti);
    }

    #[test]
    fn test_garbage_is_malformed() {
        assert!(matches!(
            issuer("test_secret").verify("not.a.token"),
            Err(AuthError::MalformedToken)
        ));
    }

    #[test]
    fn test_other_secret_rejected() {
        let token = issuer("secret_one").issue(&bilbo()).unwrap().token;
        assert!(matches!(
            issuer("secret_two").verify(&token),
            Err(AuthError::InvalidSignature)
        ));
    }

    #[test]
    fn test_expired_token_rejected() {
        let claims = claims_for("42", Utc::now() - Duration::hours(2), Duration::hours(1));
        assert!(matches!(
            issuer("test_secret").verify(&sign(&claims, "test_secret")),
            Err(AuthError::TokenExpired)
        ));
    }

    #[test]
    fn test_foreign_audience_rejected() {
        let mut claims = claims_for("42", Utc::now(), Duration::minutes(5));
        claims.aud = "someone_else".to_string();
        assert!(matches!(
            issuer("test_secret").verify(&sign(&claims, "test_secret")),
            Err(AuthError::MalformedToken)
        ));
    }

    #[test]
    fn test_non_numeric_subject() {
        let claims = claims_for("not-a-number", Utc::now(), Duration::minutes(5));
        let verified = issuer("test_secret").verify(&sign(&claims, "test_secret")).unwrap();
        assert!(matches!(verified.user_id(), Err(AuthError::MalformedToken)));
    }

    #[test]
    fn test_token_carries_no_password_hash() {
        let user = bilbo();
        let issued = issuer("test_secret").issue(&user).unwrap();
        assert!(!issued.token.contains(&user.password_hash));
    }

    #[test]
    fn test_response_expiry() {
        let issued = issuer("test_secret").issue(&bilbo()).unwrap();
        let expires_at = issued.expires_at.timestamp();
        let response = TokenResponse::new(issued, "bilbo".to_string());
        assert_eq!(response.token_type, "bearer");
        assert_eq!(response.expires_at, expires_at);
        assert!(response.expires_in > 14 * 60 && response.expires_in <= 15 * 60);
    }
}
