use std::sync::Arc;

use tracing::info;

use crate::model::User;
use crate::password::PasswordHasher;
use crate::repository::{StorageError, UserRepository};

const DEFAULT_PASSWORD: &str = "12345";

/// Users created by [`UserService::seed_defaults`]: `(username, role, login)`.
const DEFAULT_USERS: [(&str, &str, &str); 3] =
    [("Леха", "admin", "admin"), ("Андрей", "user", "andrey"), ("xd", "moderator", "xd")];

/// Repository facade that keeps passwords hashed.
///
/// Everything that writes a user goes through here, so a plaintext password
/// never reaches a [`UserRepository`].
#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository>,
    hasher: PasswordHasher,
}

impl std::fmt::Debug for UserService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserService").field("hasher", &self.hasher).finish_non_exhaustive()
    }
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepository>, hasher: PasswordHasher) -> Self {
        Self { repo, hasher }
    }

    pub async fn create_user(&self, mut user: User) -> Result<User, StorageError> {
        user.id = 0;
        user.password = self.hasher.hash(&user.password).await?;
        self.repo.create(user).await
    }

    pub async fn update_user(&self, id: i64, mut user: User) -> Result<Option<User>, StorageError> {
        user.password = self.hasher.hash(&user.password).await?;
        self.repo.update(id, user).await
    }

    pub async fn get_user(&self, id: i64) -> Result<Option<User>, StorageError> {
        self.repo.get(id).await
    }

    pub async fn get_users(&self) -> Result<Vec<User>, StorageError> {
        self.repo.get_all().await
    }

    pub async fn get_users_by_role(&self, role: &str) -> Result<Vec<User>, StorageError> {
        self.repo.get_by_role(role).await
    }

    pub async fn get_user_by_login(&self, login: &str) -> Result<Option<User>, StorageError> {
        self.repo.get_by_login(login).await
    }

    pub async fn delete_user(&self, id: i64) -> Result<bool, StorageError> {
        self.repo.delete(id).await
    }

    pub async fn hash_password(&self, plaintext: &str) -> Result<String, StorageError> {
        self.hasher.hash(plaintext).await
    }

    pub async fn verify_password(&self, hashed: &str, plaintext: &str) -> Result<bool, StorageError> {
        self.hasher.verify(hashed, plaintext).await
    }

    /// Looks up `login` and checks `password` against its hash.
    ///
    /// Returns `None` for an unknown login, a wrong password, or a stored
    /// password that isn't a valid hash.
    pub async fn authenticate(&self, login: &str, password: &str) -> Result<Option<User>, StorageError> {
        let Some(user) = self.repo.get_by_login(login).await? else {
            return Ok(None);
        };

        match self.hasher.verify(&user.password, password).await {
            Ok(true) => Ok(Some(user)),
            Ok(false) | Err(StorageError::Hash { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Inserts the built-in accounts, skipping any login that already exists.
    pub async fn seed_defaults(&self) -> Result<(), StorageError> {
        for (username, role, login) in DEFAULT_USERS {
            if self.repo.get_by_login(login).await?.is_some() {
                continue;
            }
            self.create_user(User::new(username, role, login, DEFAULT_PASSWORD)).await?;
        }
        info!(count = DEFAULT_USERS.len(), "seeded default users");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MemoryUserRepository;

    const TEST_COST: u32 = 4;

    fn service() -> UserService {
        UserService::new(Arc::new(MemoryUserRepository::new()), PasswordHasher::new(TEST_COST))
    }

    #[tokio::test]
    async fn create_hashes_password_and_assigns_id() {
        let service = service();

        let created = service.create_user(User { id: 77, ..User::new("Alice", "admin", "alice", "pw") }).await.unwrap();
        let fetched = service.get_user(created.id).await.unwrap().unwrap();

        assert_ne!(created.id, 77);
        assert_eq!(fetched.username, "Alice");
        assert_eq!(fetched.role, "admin");
        assert_eq!(fetched.login, "alice");
        assert_ne!(fetched.password, "pw");
        assert!(service.verify_password(&fetched.password, "pw").await.unwrap());
    }

    #[tokio::test]
    async fn update_is_a_full_replace() {
        let service = service();
        let created = service.create_user(User::new("Alice", "admin", "alice", "pw")).await.unwrap();

        let updated = service.update_user(created.id, User::new("Alicia", "", "alicia", "new")).await.unwrap().unwrap();
        let fetched = service.get_user(created.id).await.unwrap().unwrap();

        assert_eq!(updated, fetched);
        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.username, "Alicia");
        assert_eq!(fetched.role, "");
        assert!(service.verify_password(&fetched.password, "new").await.unwrap());
    }

    #[tokio::test]
    async fn authenticate_checks_password() {
        let service = service();
        service.create_user(User::new("Bob", "user", "bob", "secret")).await.unwrap();

        assert_eq!(service.authenticate("bob", "secret").await.unwrap().unwrap().login, "bob");
        assert!(service.authenticate("bob", "wrong").await.unwrap().is_none());
        assert!(service.authenticate("nobody", "secret").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn seeding_twice_keeps_three_users() {
        let service = service();

        service.seed_defaults().await.unwrap();
        service.seed_defaults().await.unwrap();

        let users = service.get_users().await.unwrap();
        assert_eq!(users.len(), 3);
        assert_eq!(service.get_users_by_role("admin").await.unwrap().len(), 1);

        let admin = service.get_user_by_login("admin").await.unwrap().unwrap();
        assert!(service.verify_password(&admin.password, "12345").await.unwrap());
    }
}
