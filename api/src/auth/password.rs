use std::sync::Arc;

use argon2::{
    password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use rand_core::OsRng;

use crate::error::AppError;

/// Argon2id work factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for HashConfig {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

#[derive(Clone)]
pub struct CredentialHasher {
    argon2: Argon2<'static>,
    /// Hash of a random throwaway password at the configured work factor.
    /// Checked when no account matches, so both login failures cost the same.
    placeholder_hash: Arc<str>,
}

impl CredentialHasher {
    pub fn new(config: HashConfig) -> Result<Self, password_hash::Error> {
        let params = Params::new(config.memory_kib, config.iterations, config.parallelism, None)?;
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

        let throwaway = SaltString::generate(&mut OsRng);
        let placeholder_hash = hash_with(&argon2, throwaway.as_str())?;

        Ok(Self {
            argon2,
            placeholder_hash: placeholder_hash.into(),
        })
    }

    /// Hash a password with a fresh random salt. Returns a PHC string.
    pub fn hash(&self, password: &str) -> Result<String, password_hash::Error> {
        hash_with(&self.argon2, password)
    }

    /// Check a password against a stored hash, using the parameters embedded
    /// in that hash. A wrong password is `Ok(false)`; only a malformed hash is
    /// an error.
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, password_hash::Error> {
        let parsed_hash = PasswordHash::new(hash)?;
        match self.argon2.verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// [`hash`](Self::hash) on the blocking pool.
    pub async fn hash_blocking(&self, password: String) -> Result<String, AppError> {
        let hasher = self.clone();
        let hash = tokio::task::spawn_blocking(move || hasher.hash(&password)).await??;
        Ok(hash)
    }

    /// Spend a full verification when there is no stored hash to check.
    /// Always `false`.
    pub async fn verify_absent_blocking(&self, password: String) -> Result<bool, AppError> {
        let placeholder = self.placeholder_hash.to_string();
        self.verify_blocking(password, placeholder).await?;
        Ok(false)
    }

    /// [`verify`](Self::verify) on the blocking pool.
    pub async fn verify_blocking(&self, password: String, hash: String) -> Result<bool, AppError> {
        let hasher = self.clone();
        let matches = tokio::task::spawn_blocking(move || hasher.verify(&password, &hash)).await??;
        Ok(matches)
    }
}

fn hash_with(argon2: &Argon2<'_>, password: &str) -> Result<String, password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = argon2.hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_hasher() -> CredentialHasher {
        CredentialHasher::new(HashConfig {
            memory_kib: 8,
            iterations: 1,
            parallelism: 1,
        })
        .unwrap()
    }

    #[test]
    fn test_hash_and_verify_correct() {
        let hasher = fast_hasher();
        let hash = hasher.hash("pw123").unwrap();
        assert_ne!(hash, "pw123");
        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify("pw123", &hash).unwrap());
    }

    #[test]
    fn test_verify_wrong_password_is_false() {
        let hasher = fast_hasher();
        let hash = hasher.hash("correct-password").unwrap();
        assert!(!hasher.verify("wrong-password", &hash).unwrap());
    }

    #[test]
    fn test_same_password_different_salts() {
        let hasher = fast_hasher();
        let hash1 = hasher.hash("same-password").unwrap();
        let hash2 = hasher.hash("same-password").unwrap();
        assert_ne!(hash1, hash2);
        assert!(hasher.verify("same-password", &hash1).unwrap());
        assert!(hasher.verify("same-password", &hash2).unwrap());
    }

    #[test]
    fn test_malformed_hash_is_an_error() {
        let hasher = fast_hasher();
        assert!(hasher.verify("pw", "not-a-phc-string").is_err());
    }

    #[test]
    fn test_verify_uses_parameters_from_stored_hash() {
        let stored = fast_hasher().hash("pw123").unwrap();
        let other = CredentialHasher::new(HashConfig {
            memory_kib: 16,
            iterations: 2,
            parallelism: 1,
        })
        .unwrap();
        assert!(other.verify("pw123", &stored).unwrap());
    }

    #[test]
    fn test_invalid_work_factor_rejected() {
        assert!(CredentialHasher::new(HashConfig {
            memory_kib: 1,
            iterations: 1,
            parallelism: 1,
        })
        .is_err());
    }

    #[test]
    fn test_placeholder_hash_uses_configured_work_factor() {
        let hasher = fast_hasher();
        let parsed = PasswordHash::new(&hasher.placeholder_hash).unwrap();
        let params = Params::try_from(&parsed).unwrap();
        assert_eq!(parsed.algorithm, Algorithm::Argon2id.ident());
        assert_eq!(params.m_cost(), 8);
        assert_eq!(params.t_cost(), 1);
        assert_eq!(params.p_cost(), 1);
    }

    #[tokio::test]
    async fn test_verify_absent_is_always_false() {
        let hasher = fast_hasher();
        assert!(!hasher
            .verify_absent_blocking("pw123".to_string())
            .await
            .unwrap());
        assert!(!hasher.verify_absent_blocking(String::new()).await.unwrap());
    }

    #[tokio::test]
    async fn test_blocking_wrappers() {
        let hasher = fast_hasher();
        let hash = hasher.hash_blocking("pw123".to_string()).await.unwrap();
        assert!(hasher
            .verify_blocking("pw123".to_string(), hash.clone())
            .await
            .unwrap());
        assert!(!hasher
            .verify_blocking("nope".to_string(), hash)
            .await
            .unwrap());
    }
}
