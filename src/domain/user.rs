use chrono::{DateTime, Utc};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

pub type UserId = Uuid;

const SALT_LEN: usize = 16;

/// Salted one-way hash of a password, stored as `hex(salt)$hex(sha256(salt || password))`.
/// The empty default never verifies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Hash a plain-text password with a fresh random salt.
    pub fn new(password: &str) -> Self {
        let mut salt = [0u8; SALT_LEN];
        rand::thread_rng().fill_bytes(&mut salt);
        Self::with_salt(&salt, password)
    }

    fn with_salt(salt: &[u8], password: &str) -> Self {
        Self(format!(
            "{}${}",
            hex::encode(salt),
            hex::encode(digest(salt, password))
        ))
    }

    /// Wrap a value previously produced by [`PasswordHash::new`] and read back from storage.
    pub fn from_stored(stored: String) -> Self {
        Self(stored)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if `password` hashes to this value.
    /// Malformed stored values never verify.
    pub fn verify(&self, password: &str) -> bool {
        let Some((salt_hex, hash_hex)) = self.0.split_once('$') else {
            return false;
        };
        let (Ok(salt), Ok(expected)) = (hex::decode(salt_hex), hex::decode(hash_hex)) else {
            return false;
        };
        constant_time_eq(&digest(&salt, password), &expected)
    }
}

fn digest(salt: &[u8], password: &str) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    hasher.finalize().to_vec()
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    #[serde(skip)]
    pub password_hash: PasswordHash,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(username: String, password: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            username,
            password_hash: PasswordHash::new(password),
            created_at: Utc::now(),
        }
    }

    pub fn verify_password(&self, password: &str) -> bool {
        self.password_hash.verify(password)
    }
}
