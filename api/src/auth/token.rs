use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::AuthError;

/// Tokens expire this long after they are issued.
pub const TOKEN_TTL_HOURS: i64 = 72;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: i64,
    pub email: String,
    /// Unix seconds.
    pub exp: i64,
}

/// Signs and checks HS256 bearer tokens with the server secret.
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenIssuer {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Only the HMAC family; `none` and asymmetric headers never verify.
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    pub fn issue(&self, user_id: i64, email: &str) -> Result<String, jsonwebtoken::errors::Error> {
        self.issue_at(user_id, email, Utc::now())
    }

    fn issue_at(
        &self,
        user_id: i64,
        email: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let claims = Claims {
            user_id,
            email: email.to_owned(),
            exp: (issued_at + Duration::hours(TOKEN_TTL_HOURS)).timestamp(),
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
    }

    /// Every failure collapses to [`AuthError::InvalidOrExpiredToken`].
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let token_data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                tracing::debug!(error = %e, "token rejected");
                AuthError::InvalidOrExpiredToken
            })?;

        // The library accepts exp == now; a token at its expiry instant is dead.
        if token_data.claims.exp <= Utc::now().timestamp() {
            tracing::debug!("token rejected: expired");
            return Err(AuthError::InvalidOrExpiredToken);
        }

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine;
    use serde_json::json;

    const SECRET: &[u8] = b"test-jwt-secret";

    fn b64(value: &serde_json::Value) -> String {
        URL_SAFE_NO_PAD.encode(serde_json::to_vec(value).unwrap())
    }

    fn future_exp() -> i64 {
        (Utc::now() + Duration::hours(1)).timestamp()
    }

    #[test]
    fn test_issue_and_verify() {
        let issuer = TokenIssuer::new(SECRET);
        let token = issuer.issue(42, "a@x.com").unwrap();
        assert_eq!(token.split('.').count(), 3);

        let claims = issuer.verify(&token).unwrap();
        assert_eq!(claims.user_id, 42);
        assert_eq!(claims.email, "a@x.com");
    }

    #[test]
    fn test_expiry_is_72_hours_out() {
        let issuer = TokenIssuer::new(SECRET);
        let before = Utc::now().timestamp();
        let claims = issuer.verify(&issuer.issue(1, "a@x.com").unwrap()).unwrap();
        let ttl = claims.exp - before;
        assert!((TOKEN_TTL_HOURS * 3600..=TOKEN_TTL_HOURS * 3600 + 5).contains(&ttl));
    }

    #[test]
    fn test_header_declares_hs256() {
        let issuer = TokenIssuer::new(SECRET);
        let token = issuer.issue(1, "a@x.com").unwrap();
        let header = jsonwebtoken::decode_header(&token).unwrap();
        assert_eq!(header.alg, Algorithm::HS256);
    }

    #[test]
    fn test_wrong_secret_fails() {
        let token = TokenIssuer::new(b"secret-1").issue(1, "a@x.com").unwrap();
        assert_eq!(
            TokenIssuer::new(b"secret-2").verify(&token),
            Err(AuthError::InvalidOrExpiredToken)
        );
    }

    #[test]
    fn test_expired_token_fails() {
        let issuer = TokenIssuer::new(SECRET);
        let issued_at = Utc::now() - Duration::hours(TOKEN_TTL_HOURS + 1);
        let token = issuer.issue_at(1, "a@x.com", issued_at).unwrap();
        assert_eq!(issuer.verify(&token), Err(AuthError::InvalidOrExpiredToken));
    }

    #[test]
    fn test_token_at_expiry_instant_fails() {
        let issuer = TokenIssuer::new(SECRET);
        let issued_at = Utc::now() - Duration::hours(TOKEN_TTL_HOURS);
        let token = issuer.issue_at(1, "a@x.com", issued_at).unwrap();
        assert_eq!(issuer.verify(&token), Err(AuthError::InvalidOrExpiredToken));
    }

    #[test]
    fn test_flipped_signature_fails() {
        let issuer = TokenIssuer::new(SECRET);
        let token = issuer.issue(1, "a@x.com").unwrap();
        let (signed, signature) = token.rsplit_once('.').unwrap();
        let mut chars: Vec<char> = signature.chars().collect();
        chars[0] = if chars[0] == 'A' { 'B' } else { 'A' };
        let tampered = format!("{}.{}", signed, chars.into_iter().collect::<String>());

        assert_eq!(issuer.verify(&tampered), Err(AuthError::InvalidOrExpiredToken));
    }

    #[test]
    fn test_tampered_claims_fail() {
        let issuer = TokenIssuer::new(SECRET);
        let token = issuer.issue(1, "a@x.com").unwrap();
        let parts: Vec<&str> = token.split('.').collect();
        let forged_claims = b64(&json!({"user_id": 2, "email": "a@x.com", "exp": future_exp()}));
        let forged = format!("{}.{}.{}", parts[0], forged_claims, parts[2]);

        assert_eq!(issuer.verify(&forged), Err(AuthError::InvalidOrExpiredToken));
    }

    #[test]
    fn test_alg_none_rejected() {
        let issuer = TokenIssuer::new(SECRET);
        let header = b64(&json!({"alg": "none", "typ": "JWT"}));
        let claims = b64(&json!({"user_id": 1, "email": "a@x.com", "exp": future_exp()}));
        let token = format!("{}.{}.", header, claims);

        assert_eq!(issuer.verify(&token), Err(AuthError::InvalidOrExpiredToken));
    }

    #[test]
    fn test_asymmetric_header_rejected_even_with_valid_hmac() {
        let issuer = TokenIssuer::new(SECRET);
        let header = b64(&json!({"alg": "RS256", "typ": "JWT"}));
        let claims = b64(&json!({"user_id": 1, "email": "a@x.com", "exp": future_exp()}));
        let message = format!("{}.{}", header, claims);
        let signature = jsonwebtoken::crypto::sign(
            message.as_bytes(),
            &EncodingKey::from_secret(SECRET),
            Algorithm::HS256,
        )
        .unwrap();
        let token = format!("{}.{}", message, signature);

        assert_eq!(issuer.verify(&token), Err(AuthError::InvalidOrExpiredToken));
    }

    #[test]
    fn test_other_hmac_variants_accepted() {
        let issuer = TokenIssuer::new(SECRET);
        let claims = Claims {
            user_id: 9,
            email: "h@x.com".to_string(),
            exp: future_exp(),
        };
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        assert_eq!(issuer.verify(&token).unwrap(), claims);
    }

    #[test]
    fn test_missing_exp_rejected() {
        let issuer = TokenIssuer::new(SECRET);
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &json!({"user_id": 1, "email": "a@x.com"}),
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        assert_eq!(issuer.verify(&token), Err(AuthError::InvalidOrExpiredToken));
    }

    #[test]
    fn test_garbage_rejected() {
        let issuer = TokenIssuer::new(SECRET);
        assert_eq!(issuer.verify("not.a.token"), Err(AuthError::InvalidOrExpiredToken));
        assert_eq!(issuer.verify(""), Err(AuthError::InvalidOrExpiredToken));
    }
}
