//! Signed identity tokens (HS256 JWT).

use crate::auth::{Claims, Role};
use crate::error::AppError;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

/// Issues and verifies identity tokens with a process-wide secret.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "sub"]);
        validation.leeway = 0;
        TokenService {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn issue(&self, subject: Uuid, role: Role, display_name: &str) -> Result<String, AppError> {
        let now = Utc::now();
        let exp = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| AppError::Internal("token expiry out of range".into()))?;
        let claims = Claims {
            sub: subject,
            role,
            name: display_name.to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(format!("token signing failed: {}", e)))
    }

    /// Fails with `AppError::Auth` on a bad signature, malformed token, expiry or unknown role.
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(error = %e, "token rejected");
                AppError::Auth("invalid or expired token".into())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new(b"test-secret", Duration::hours(10_000))
    }

    #[test]
    fn issue_then_verify_round_trips_claims() {
        let svc = service();
        let id = Uuid::new_v4();
        let token = svc.issue(id, Role::Moderator, "mod").unwrap();
        let claims = svc.verify(&token).unwrap();
        assert_eq!(claims.sub, id);
        assert_eq!(claims.role, Role::Moderator);
        assert_eq!(claims.name, "mod");
        assert!(claims.exp > claims.iat);
        assert_eq!(claims.exp - claims.iat, 10_000 * 3600);
    }

    #[test]
    fn rejects_token_signed_with_other_secret() {
        let other = TokenService::new(b"other-secret", Duration::hours(1));
        let token = other.issue(Uuid::new_v4(), Role::Admin, "x").unwrap();
        assert!(matches!(service().verify(&token), Err(AppError::Auth(_))));
    }

    #[test]
    fn rejects_expired_token() {
        let expired = TokenService::new(b"test-secret", Duration::hours(-1));
        let token = expired.issue(Uuid::new_v4(), Role::User, "late").unwrap();
        assert!(matches!(service().verify(&token), Err(AppError::Auth(_))));
    }

    #[test]
    fn unrepresentable_expiry_is_an_error() {
        let svc = TokenService::new(b"test-secret", Duration::MAX);
        assert!(matches!(
            svc.issue(Uuid::new_v4(), Role::User, "x"),
            Err(AppError::Internal(_))
        ));
    }

    #[test]
    fn rejects_malformed_token() {
        assert!(matches!(service().verify("not.a.token"), Err(AppError::Auth(_))));
        assert!(matches!(service().verify(""), Err(AppError::Auth(_))));
    }

    #[test]
    fn rejects_unknown_role() {
        #[derive(serde::Serialize)]
        struct Forged {
            sub: Uuid,
            role: &'static str,
            name: &'static str,
            iat: i64,
            exp: i64,
        }
        let now = Utc::now().timestamp();
        let forged = Forged {
            sub: Uuid::new_v4(),
            role: "root",
            name: "x",
            iat: now,
            exp: now + 3600,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &forged,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();
        assert!(matches!(service().verify(&token), Err(AppError::Auth(_))));
    }
}
