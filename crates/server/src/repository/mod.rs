//! User storage.
//!
//! [`UserRepository`] is the single storage capability the rest of the server
//! depends on. Two variants implement it:
//!
//! - [`MemoryUserRepository`]: a mutex guarded map, lost on restart
//! - [`SqliteUserRepository`]: a SQLite database file
//!
//! Both assign ids on create, enforce unique logins, and treat an empty role
//! filter as "no filter". Passwords are stored exactly as given; hashing is the
//! job of [`UserService`](crate::service::UserService).

use async_trait::async_trait;
use thiserror::Error;

use crate::model::User;

mod memory;
mod sqlite;

pub use memory::MemoryUserRepository;
pub use sqlite::SqliteUserRepository;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("login {login:?} already exists")]
    DuplicateLogin { login: String },

    #[error("sqlite error: {source}")]
    Sqlite {
        #[from]
        source: rusqlite::Error,
    },

    #[error("storage lock poisoned")]
    Poisoned,

    #[error("blocking storage task failed: {source}")]
    Join {
        #[from]
        source: tokio::task::JoinError,
    },

    #[error("password hashing failed: {source}")]
    Hash {
        #[from]
        source: bcrypt::BcryptError,
    },
}

impl StorageError {
    pub fn duplicate_login<S: ToString>(login: S) -> Self {
        Self::DuplicateLogin { login: login.to_string() }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Stores a new user under a freshly assigned id. The incoming id is ignored.
    async fn create(&self, user: User) -> Result<User, StorageError>;

    async fn get(&self, id: i64) -> Result<Option<User>, StorageError>;

    async fn get_all(&self) -> Result<Vec<User>, StorageError>;

    /// Users whose role equals `role` exactly; an empty role returns everyone.
    async fn get_by_role(&self, role: &str) -> Result<Vec<User>, StorageError>;

    async fn get_by_login(&self, login: &str) -> Result<Option<User>, StorageError>;

    /// Replaces every field but the id. Returns `None` if `id` doesn't exist.
    async fn update(&self, id: i64, user: User) -> Result<Option<User>, StorageError>;

    /// Returns `false` if `id` doesn't exist.
    async fn delete(&self, id: i64) -> Result<bool, StorageError>;
}

/// Behavior every backend must share, run against each variant's own tests.
#[cfg(test)]
pub(crate) mod contract {
    use super::*;

    fn alice() -> User {
        User::new("Alice", "admin", "alice", "hash-a")
    }

    fn bob() -> User {
        User::new("Bob", "user", "bob", "hash-b")
    }

    pub async fn create_assigns_ids(repo: &dyn UserRepository) {
        let first = repo.create(User { id: 42, ..alice() }).await.unwrap();
        let second = repo.create(bob()).await.unwrap();

        assert_ne!(first.id, 42);
        assert_ne!(first.id, second.id);
        assert_eq!(repo.get(first.id).await.unwrap(), Some(first.clone()));
        assert_eq!(first, User { id: first.id, ..alice() });
    }

    pub async fn login_is_unique(repo: &dyn UserRepository) {
        repo.create(alice()).await.unwrap();

        let duplicate = repo.create(User::new("Other", "user", "alice", "x")).await;

        assert!(matches!(duplicate, Err(StorageError::DuplicateLogin { .. })));
        assert_eq!(repo.get_all().await.unwrap().len(), 1);
    }

    pub async fn update_cannot_steal_login(repo: &dyn UserRepository) {
        let a = repo.create(alice()).await.unwrap();
        repo.create(bob()).await.unwrap();

        let result = repo.update(a.id, User { login: "bob".into(), ..alice() }).await;

        assert!(matches!(result, Err(StorageError::DuplicateLogin { .. })));
        assert_eq!(repo.get(a.id).await.unwrap().unwrap().login, "alice");
    }

    pub async fn filter_by_role(repo: &dyn UserRepository) {
        repo.create(alice()).await.unwrap();
        repo.create(bob()).await.unwrap();
        repo.create(User::new("Carl", "moderator", "carl", "hash-c")).await.unwrap();

        let admins = repo.get_by_role("admin").await.unwrap();
        assert_eq!(admins.len(), 1);
        assert_eq!(admins[0].login, "alice");

        assert_eq!(repo.get_by_role("").await.unwrap().len(), 3);
        assert!(repo.get_by_role("nobody").await.unwrap().is_empty());
    }

    pub async fn lookup_by_login(repo: &dyn UserRepository) {
        let created = repo.create(bob()).await.unwrap();

        assert_eq!(repo.get_by_login("bob").await.unwrap(), Some(created));
        assert_eq!(repo.get_by_login("nobody").await.unwrap(), None);
    }

    pub async fn update_replaces_everything_but_id(repo: &dyn UserRepository) {
        let created = repo.create(alice()).await.unwrap();

        let replacement = User { id: 999, username: "Alice B".into(), login: "alice".into(), ..User::default() };
        let updated = repo.update(created.id, replacement).await.unwrap().unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.role, "");
        assert_eq!(updated.password, "");
        assert_eq!(repo.get(created.id).await.unwrap(), Some(updated));
        assert_eq!(repo.get(999).await.unwrap(), None);
    }

    pub async fn update_missing(repo: &dyn UserRepository) {
        assert_eq!(repo.update(12345, alice()).await.unwrap(), None);
        assert!(repo.get_all().await.unwrap().is_empty());
    }

    pub async fn delete_twice(repo: &dyn UserRepository) {
        let created = repo.create(alice()).await.unwrap();

        assert!(repo.delete(created.id).await.unwrap());
        assert_eq!(repo.get(created.id).await.unwrap(), None);
        assert!(!repo.delete(created.id).await.unwrap());
    }
}
