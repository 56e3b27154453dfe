// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Argon2id password hashing.
//!
//! Digests are stored in PHC string format, so the salt and cost parameters
//! travel with each digest and verification needs nothing else.

use std::fmt;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};

#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("invalid argon2 parameters: {0}")]
    Params(String),

    #[error("password hashing failed: {0}")]
    Hash(String),
}

/// One-way digest of a password, in PHC format.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordDigest(String);

impl PasswordDigest {
    pub fn from_phc(phc: impl Into<String>) -> Self {
        Self(phc.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PasswordDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordDigest([REDACTED])")
    }
}

/// Salted, slow password hasher.
#[derive(Clone, Default)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher {
    pub fn new(params: Params) -> Self {
        Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        }
    }

    /// Hasher with explicit memory (KiB), iteration and lane counts.
    pub fn with_cost(memory_kib: u32, iterations: u32, parallelism: u32) -> Result<Self, PasswordError> {
        let params = Params::new(memory_kib, iterations, parallelism, None)
            .map_err(|e| PasswordError::Params(e.to_string()))?;
        Ok(Self::new(params))
    }

    /// Hash with a fresh random salt. Equal passwords give different digests.
    pub fn hash(&self, plaintext: &str) -> Result<PasswordDigest, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|hash| PasswordDigest(hash.to_string()))
            .map_err(|e| PasswordError::Hash(e.to_string()))
    }

    /// True iff `plaintext` produced `digest`. Unparseable digests never match.
    pub fn verify(&self, plaintext: &str, digest: &PasswordDigest) -> bool {
        match PasswordHash::new(digest.as_str()) {
            Ok(parsed) => self
                .argon2
                .verify_password(plaintext.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }

    /// Verify against a digest that may not exist.
    ///
    /// A missing digest still pays for one hash so that an unknown username
    /// costs the same as a wrong password.
    pub fn verify_credential(&self, plaintext: &str, digest: Option<&PasswordDigest>) -> bool {
        match digest {
            Some(digest) => self.verify(plaintext, digest),
            None => {
                let _ = self.hash(plaintext);
                false
            }
        }
    }
}

impl fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordHasher").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> PasswordHasher {
        PasswordHasher::with_cost(1024, 1, 1).unwrap()
    }

    #[test]
    fn hash_and_verify_round_trip() {
        let hasher = hasher();
        let digest = hasher.hash("correct horse battery staple").unwrap();

        assert!(digest.as_str().starts_with("$argon2id$"));
        assert!(hasher.verify("correct horse battery staple", &digest));
        assert!(!hasher.verify("wrong password", &digest));
    }

    #[test]
    fn digests_are_salted() {
        let hasher = hasher();
        let first = hasher.hash("password").unwrap();
        let second = hasher.hash("password").unwrap();

        assert_ne!(first, second);
        assert!(hasher.verify("password", &first));
        assert!(hasher.verify("password", &second));
    }

    #[test]
    fn digest_never_contains_plaintext() {
        let digest = hasher().hash("hunter2hunter2").unwrap();
        assert!(!digest.as_str().contains("hunter2hunter2"));
    }

    #[test]
    fn garbage_digest_does_not_verify() {
        let hasher = hasher();
        assert!(!hasher.verify("password", &PasswordDigest::from_phc("not-a-phc-string")));
        assert!(!hasher.verify("password", &PasswordDigest::from_phc("")));
    }

    #[test]
    fn missing_digest_is_rejected() {
        let hasher = hasher();
        assert!(!hasher.verify_credential("password", None));

        let digest = hasher.hash("password").unwrap();
        assert!(hasher.verify_credential("password", Some(&digest)));
    }

    #[test]
    fn verification_uses_parameters_embedded_in_digest() {
        let cheap = hasher();
        let digest = cheap.hash("password").unwrap();

        let other = PasswordHasher::with_cost(2048, 2, 1).unwrap();
        assert!(other.verify("password", &digest));
    }

    #[test]
    fn rejects_invalid_cost() {
        assert!(matches!(
            PasswordHasher::with_cost(1, 1, 1),
            Err(PasswordError::Params(_))
        ));
    }

    #[test]
    fn debug_is_redacted() {
        let digest = hasher().hash("password").unwrap();
        assert_eq!(format!("{digest:?}"), "PasswordDigest([REDACTED])");
    }
}
