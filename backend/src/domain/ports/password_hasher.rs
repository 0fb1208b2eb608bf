//! Port for one-way password hashing.

use super::define_port_error;

define_port_error! {
    /// Errors raised by password hashing adapters.
    pub enum PasswordHasherError {
        /// Hashing failed.
        Hash { message: String } => "password hashing failed: {message}",
        /// The stored hash could not be decoded.
        MalformedHash { message: String } => "stored password hash is malformed: {message}",
    }
}

/// Hashes and verifies passwords.
///
/// Hashing is CPU-bound and synchronous; callers decide whether to offload it.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    /// Produce an encoded hash for `password`.
    fn hash(&self, password: &str) -> Result<String, PasswordHasherError>;

    /// Whether `password` matches the encoded `hash`.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordHasherError>;
}

/// Reversible stand-in for tests. Never use outside of tests and fixtures.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePasswordHasher;

impl FixturePasswordHasher {
    const PREFIX: &'static str = "fixture$";
}

impl PasswordHasher for FixturePasswordHasher {
    fn hash(&self, password: &str) -> Result<String, PasswordHasherError> {
        Ok(format!("{}{password}", Self::PREFIX))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordHasherError> {
        let stored = hash
            .strip_prefix(Self::PREFIX)
            .ok_or_else(|| PasswordHasherError::malformed_hash("missing fixture prefix"))?;
        Ok(stored == password)
    }
}
