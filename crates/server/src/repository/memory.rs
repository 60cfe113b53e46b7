use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use tracing::info;

use crate::model::User;
use crate::repository::{StorageError, UserRepository};

/// Volatile user storage.
///
/// Every operation holds the one mutex for its whole read-modify-write, and
/// records are replaced as whole values, so readers never see a torn user.
#[derive(Debug)]
pub struct MemoryUserRepository {
    state: Mutex<MemoryState>,
}

#[derive(Debug)]
struct MemoryState {
    users: BTreeMap<i64, User>,
    next_id: i64,
}

impl MemoryState {
    fn login_taken(&self, login: &str, except: Option<i64>) -> bool {
        self.users.values().any(|user| user.login == login && Some(user.id) != except)
    }
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self { state: Mutex::new(MemoryState { users: BTreeMap::new(), next_id: 1 }) }
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>, StorageError> {
        self.state.lock().map_err(|_| StorageError::Poisoned)
    }
}

impl Default for MemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn create(&self, mut user: User) -> Result<User, StorageError> {
        let mut state = self.lock()?;
        if state.login_taken(&user.login, None) {
            return Err(StorageError::duplicate_login(&user.login));
        }

        user.id = state.next_id;
        state.next_id += 1;
        state.users.insert(user.id, user.clone());

        info!(id = user.id, username = %user.username, role = %user.role, "created user");
        Ok(user)
    }

    async fn get(&self, id: i64) -> Result<Option<User>, StorageError> {
        Ok(self.lock()?.users.get(&id).cloned())
    }

    async fn get_all(&self) -> Result<Vec<User>, StorageError> {
        Ok(self.lock()?.users.values().cloned().collect())
    }

    async fn get_by_role(&self, role: &str) -> Result<Vec<User>, StorageError> {
        let state = self.lock()?;
        Ok(state.users.values().filter(|user| role.is_empty() || user.role == role).cloned().collect())
    }

    async fn get_by_login(&self, login: &str) -> Result<Option<User>, StorageError> {
        Ok(self.lock()?.users.values().find(|user| user.login == login).cloned())
    }

    async fn update(&self, id: i64, mut user: User) -> Result<Option<User>, StorageError> {
        let mut state = self.lock()?;
        if !state.users.contains_key(&id) {
            return Ok(None);
        }
        if state.login_taken(&user.login, Some(id)) {
            return Err(StorageError::duplicate_login(&user.login));
        }

        user.id = id;
        state.users.insert(id, user.clone());

        info!(id, username = %user.username, role = %user.role, "updated user");
        Ok(Some(user))
    }

    async fn delete(&self, id: i64) -> Result<bool, StorageError> {
        let removed = self.lock()?.users.remove(&id).is_some();
        if removed {
            info!(id, "deleted user");
        }
        Ok(removed)
    }
}
