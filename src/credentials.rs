//! Seed user credentials

use crate::error::Result;
use bcrypt::Version;
use sha2::{Digest, Sha256};

/// Accounts seeded when the folder has no users.csv
pub const DEFAULT_USERS: &[&str] = &[
    "admin@test.ode",
    "dc@test.ode",
    "ek@test.ode",
    "ja@test.ode",
    "pnhd@test.ode",
    "ad@test.ode",
    "rv@test.ode",
];

/// Pre-hashed password shared by the default accounts
pub const DEFAULT_PASSWORD_HASH: &str =
    "$2a$10$RTELpt2ltJpjDEYRhU1NR.uK8hw4pdVCWZNl5FCRYx.ejUI7LMzb.";

/// Hashes plaintext passwords from users.csv with bcrypt.
///
/// The salt is derived from the account email, so the same input folder always
/// produces the same script. These are development fixtures, not real accounts.
#[derive(Debug, Clone, PartialEq)]
pub struct CredentialHasher {
    pub cost: u32,
}

impl CredentialHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn hash(&self, email: &str, plain: &str) -> Result<String> {
        let parts = bcrypt::hash_with_salt(plain, self.cost, derive_salt(email))?;
        Ok(parts.format_for_version(Version::TwoA))
    }
}

impl Default for CredentialHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

fn derive_salt(email: &str) -> [u8; 16] {
    let digest = Sha256::digest(email.as_bytes());
    let mut salt = [0u8; 16];
    salt.copy_from_slice(&digest[..16]);
    salt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_verifiable_and_backend_compatible() {
        let hasher = CredentialHasher::new(4);
        let hash = hasher.hash("ann@test.ode", "secret").unwrap();
        assert!(hash.starts_with("$2a$04$"));
        assert!(bcrypt::verify("secret", &hash).unwrap());
        assert!(!bcrypt::verify("other", &hash).unwrap());
    }

    #[test]
    fn test_hash_is_deterministic_per_email() {
        let hasher = CredentialHasher::new(4);
        let a = hasher.hash("ann@test.ode", "secret").unwrap();
        let b = hasher.hash("ann@test.ode", "secret").unwrap();
        let c = hasher.hash("bob@test.ode", "secret").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_default_password_hash_is_bcrypt() {
        assert!(bcrypt::verify("", DEFAULT_PASSWORD_HASH).is_ok());
        assert_eq!(DEFAULT_USERS.len(), 7);
    }
}
