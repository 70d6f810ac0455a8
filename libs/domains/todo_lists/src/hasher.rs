use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng};
use argon2::{Algorithm, Argon2, Params, Version};
use core_config::env_parse_or;

use crate::error::{TodoListError, TodoListResult};

/// One-way hashing of list passwords.
///
/// Hashes are self-describing, so [`CredentialHasher::verify`] works across
/// cost settings.
#[cfg_attr(test, mockall::automock)]
pub trait CredentialHasher: Send + Sync {
    fn hash(&self, plaintext: &str) -> TodoListResult<String>;

    /// `Ok(false)` on mismatch; `Err` only if `hash` is malformed.
    fn verify(&self, plaintext: &str, hash: &str) -> TodoListResult<bool>;
}

/// Argon2id cost parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HasherConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for HasherConfig {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

impl HasherConfig {
    pub fn from_env() -> TodoListResult<Self> {
        let defaults = Self::default();
        Ok(Self {
            memory_kib: env_parse_or("ARGON2_MEMORY_KIB", defaults.memory_kib)?,
            iterations: env_parse_or("ARGON2_ITERATIONS", defaults.iterations)?,
            parallelism: env_parse_or("ARGON2_PARALLELISM", defaults.parallelism)?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct Argon2Hasher {
    params: Params,
}

impl Argon2Hasher {
    pub fn new(config: HasherConfig) -> TodoListResult<Self> {
        let params = Params::new(config.memory_kib, config.iterations, config.parallelism, None)
            .map_err(|e| TodoListError::Config(format!("Invalid argon2 parameters: {}", e)))?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

impl CredentialHasher for Argon2Hasher {
    fn hash(&self, plaintext: &str) -> TodoListResult<String> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2()
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| TodoListError::PasswordHash(e.to_string()))
    }

    fn verify(&self, plaintext: &str, hash: &str) -> TodoListResult<bool> {
        let parsed_hash =
            PasswordHash::new(hash).map_err(|e| TodoListError::PasswordHash(e.to_string()))?;

        Ok(self
            .argon2()
            .verify_password(plaintext.as_bytes(), &parsed_hash)
            .is_ok())
    }
}
