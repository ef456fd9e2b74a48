//! Password credential - write-only, one-way hashed.
//!
//! The plaintext never outlives the call that hashes it. The stored value
//! is an argon2id PHC string; callers can replace it or check a candidate
//! against it, but there is no way to read a password back.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use serde::{Deserialize, Serialize, Serializer};

use crate::constants::{CREDENTIAL_NOT_READABLE, MIN_PASSWORD_LENGTH, REDACTED};
use crate::error::{DomainError, DomainResult};

/// Argon2 cost parameters used when hashing new passwords.
///
/// Verification always uses the parameters recorded in the stored hash, so
/// raising the cost never invalidates existing credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashCost {
    /// Memory size in KiB
    pub memory_kib: u32,
    /// Number of passes
    pub iterations: u32,
    /// Degree of parallelism
    pub parallelism: u32,
}

impl Default for HashCost {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

impl HashCost {
    pub fn new(memory_kib: u32, iterations: u32, parallelism: u32) -> Self {
        Self {
            memory_kib,
            iterations,
            parallelism,
        }
    }

    /// Build an argon2id hasher for these parameters.
    ///
    /// # Errors
    /// Returns an internal error when argon2 rejects the parameters
    /// (e.g. memory below `8 * parallelism`).
    pub fn build(&self) -> DomainResult<Argon2<'static>> {
        let params = Params::new(self.memory_kib, self.iterations, self.parallelism, None)
            .map_err(|e| DomainError::internal(format!("Invalid hash cost: {}", e)))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

/// Hashed password credential.
#[derive(Clone, PartialEq, Eq)]
pub struct Password {
    hash: String,
}

// Don't expose hash in debug output (security)
impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Password").field("hash", &REDACTED).finish()
    }
}

/// Serializing a credential is a read attempt and always fails.
impl Serialize for Password {
    fn serialize<S: Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
        Err(serde::ser::Error::custom(CREDENTIAL_NOT_READABLE))
    }
}

impl Password {
    /// Hash a plaintext password with the given cost.
    ///
    /// # Errors
    /// Returns a validation error if the password is empty.
    pub fn new(plain_text: &str, cost: &HashCost) -> DomainResult<Self> {
        let hash = Self::hash(plain_text, cost)?;
        Ok(Self { hash })
    }

    /// Replace the stored hash with the hash of a new plaintext.
    ///
    /// On error the previous hash is kept.
    pub fn set(&mut self, plain_text: &str, cost: &HashCost) -> DomainResult<()> {
        self.hash = Self::hash(plain_text, cost)?;
        Ok(())
    }

    /// Rebuild a credential from a hash loaded from storage.
    pub fn from_hash(hash: String) -> Self {
        Self { hash }
    }

    /// PHC string for the persistence layer only. This is the hash, not
    /// the password, and it must not be placed in any response.
    pub fn as_hash(&self) -> &str {
        &self.hash
    }

    /// Check a plaintext candidate against the stored hash.
    ///
    /// A mismatch, or a stored value that is not a valid PHC string, is
    /// reported as `false`.
    pub fn verify(&self, plain_text: &str) -> bool {
        PasswordHash::new(&self.hash)
            .map(|parsed| {
                Argon2::default()
                    .verify_password(plain_text.as_bytes(), &parsed)
                    .is_ok()
            })
            .unwrap_or(false)
    }

    /// The plaintext cannot be recovered; this always fails.
    pub fn reveal(&self) -> DomainResult<String> {
        Err(DomainError::access(CREDENTIAL_NOT_READABLE))
    }

    fn hash(plain_text: &str, cost: &HashCost) -> DomainResult<String> {
        if plain_text.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(DomainError::validation("password cannot be empty"));
        }

        let salt = SaltString::generate(&mut OsRng);
        let hash = cost
            .build()?
            .hash_password(plain_text.as_bytes(), &salt)
            .map_err(|e| DomainError::internal(format!("Password hash failed: {}", e)))?;
        Ok(hash.to_string())
    }
}
