use tokio::task;

use crate::repository::StorageError;

/// bcrypt based password hashing.
///
/// Hashing and verification are CPU bound, so both run on the blocking pool.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub async fn hash(&self, plaintext: &str) -> Result<String, StorageError> {
        let cost = self.cost;
        let plaintext = plaintext.to_owned();
        let hashed = task::spawn_blocking(move || bcrypt::hash(plaintext, cost)).await??;
        Ok(hashed)
    }

    /// Returns `Ok(false)` on a wrong password; `Err` only if `hashed` isn't a bcrypt hash.
    pub async fn verify(&self, hashed: &str, plaintext: &str) -> Result<bool, StorageError> {
        let hashed = hashed.to_owned();
        let plaintext = plaintext.to_owned();
        let matches = task::spawn_blocking(move || bcrypt::verify(plaintext, &hashed)).await??;
        Ok(matches)
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}
