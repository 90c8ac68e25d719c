//! Credential domain model
//!
//! The registry has always stored secrets verbatim and compared them byte for
//! byte. That remains the default scheme. Argon2id is available as an opt-in
//! for new registrations; each stored record remembers its own scheme so a
//! registry can hold both.

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::result::{Error, Result};

/// How a stored secret is encoded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialScheme {
    /// Stored and compared verbatim
    #[default]
    Plaintext,
    /// Argon2id PHC string
    Argon2,
}

impl CredentialScheme {
    fn is_plaintext(&self) -> bool {
        *self == CredentialScheme::Plaintext
    }
}

/// A stored secret plus the scheme needed to check it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    #[serde(rename = "password")]
    pub secret: String,
    #[serde(default, skip_serializing_if = "CredentialScheme::is_plaintext")]
    pub scheme: CredentialScheme,
}

impl Credential {
    pub fn plaintext(password: impl Into<String>) -> Self {
        Self {
            secret: password.into(),
            scheme: CredentialScheme::Plaintext,
        }
    }

    /// Encode a password with the given scheme
    pub fn create(password: &str, scheme: CredentialScheme) -> Result<Self> {
        match scheme {
            CredentialScheme::Plaintext => Ok(Self::plaintext(password)),
            CredentialScheme::Argon2 => {
                let salt_bytes: [u8; 16] = rand::thread_rng().gen();
                let salt = SaltString::encode_b64(&salt_bytes)
                    .map_err(|e| Error::Other(format!("Failed to encode salt: {}", e)))?;
                let hash = Argon2::default()
                    .hash_password(password.as_bytes(), &salt)
                    .map_err(|e| Error::Other(format!("Failed to hash password: {}", e)))?;
                Ok(Self {
                    secret: hash.to_string(),
                    scheme: CredentialScheme::Argon2,
                })
            }
        }
    }

    /// Check a candidate password against this credential
    pub fn verify(&self, password: &str) -> bool {
        match self.scheme {
            CredentialScheme::Plaintext => self.secret.as_bytes() == password.as_bytes(),
            CredentialScheme::Argon2 => match PasswordHash::new(&self.secret) {
                Ok(parsed) => Argon2::default()
                    .verify_password(password.as_bytes(), &parsed)
                    .is_ok(),
                Err(_) => false,
            },
        }
    }
}
