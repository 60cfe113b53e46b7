use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension, Row};
use tokio::task;
use tracing::info;

use crate::model::User;
use crate::repository::{StorageError, UserRepository};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS "user" (
    ID INTEGER PRIMARY KEY AUTOINCREMENT,
    Username TEXT NOT NULL,
    Role TEXT NOT NULL,
    Login TEXT NOT NULL UNIQUE,
    Password TEXT NOT NULL
);
"#;

const SELECT_USER: &str = r#"SELECT ID, Username, Role, Login, Password FROM "user""#;

/// Persistent user storage in a single SQLite database.
///
/// Statements run one at a time on the blocking pool; each one is atomic on its
/// own and no transaction spans several of them.
#[derive(Debug, Clone)]
pub struct SqliteUserRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteUserRepository {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let conn = Connection::open(path.as_ref())?;
        info!(path = %path.as_ref().display(), "connected to sqlite");
        Ok(Self { conn: Arc::new(Mutex::new(conn)) })
    }

    pub fn open_in_memory() -> Result<Self, StorageError> {
        Ok(Self { conn: Arc::new(Mutex::new(Connection::open_in_memory()?)) })
    }

    /// Creates the `user` table if it doesn't exist yet. Safe to call on every start.
    pub fn migrate(&self) -> Result<(), StorageError> {
        let conn = self.conn.lock().map_err(|_| StorageError::Poisoned)?;
        conn.execute_batch(SCHEMA)?;
        info!("applied sqlite migrations");
        Ok(())
    }

    async fn with_connection<T, F>(&self, f: F) -> Result<T, StorageError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T, StorageError> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        task::spawn_blocking(move || {
            let conn = conn.lock().map_err(|_| StorageError::Poisoned)?;
            f(&conn)
        })
        .await?
    }
}

fn read_user(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User { id: row.get(0)?, username: row.get(1)?, role: row.get(2)?, login: row.get(3)?, password: row.get(4)? })
}

/// Maps a unique constraint violation on `Login` to [`StorageError::DuplicateLogin`].
fn map_write_error(e: rusqlite::Error, login: &str) -> StorageError {
    if let rusqlite::Error::SqliteFailure(failure, _) = &e {
        if failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE {
            return StorageError::duplicate_login(login);
        }
    }
    e.into()
}

fn query_users(conn: &Connection, sql: &str, params: impl rusqlite::Params) -> Result<Vec<User>, StorageError> {
    let mut stmt = conn.prepare(sql)?;
    let users = stmt.query_map(params, read_user)?.collect::<Result<Vec<_>, _>>()?;
    Ok(users)
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn create(&self, mut user: User) -> Result<User, StorageError> {
        self.with_connection(move |conn| {
            conn.execute(
                r#"INSERT INTO "user" (Username, Role, Login, Password) VALUES (?1, ?2, ?3, ?4)"#,
                params![user.username, user.role, user.login, user.password],
            )
            .map_err(|e| map_write_error(e, &user.login))?;

            user.id = conn.last_insert_rowid();
            info!(id = user.id, username = %user.username, role = %user.role, "created user");
            Ok(user)
        })
        .await
    }

    async fn get(&self, id: i64) -> Result<Option<User>, StorageError> {
        self.with_connection(move |conn| {
            let user = conn.query_row(&format!("{SELECT_USER} WHERE ID = ?1"), params![id], read_user).optional()?;
            Ok(user)
        })
        .await
    }

    async fn get_all(&self) -> Result<Vec<User>, StorageError> {
        self.with_connection(|conn| query_users(conn, &format!("{SELECT_USER} ORDER BY ID"), params![])).await
    }

    async fn get_by_role(&self, role: &str) -> Result<Vec<User>, StorageError> {
        if role.is_empty() {
            return self.get_all().await;
        }

        let role = role.to_owned();
        self.with_connection(move |conn| query_users(conn, &format!("{SELECT_USER} WHERE Role = ?1 ORDER BY ID"), params![role]))
            .await
    }

    async fn get_by_login(&self, login: &str) -> Result<Option<User>, StorageError> {
        let login = login.to_owned();
        self.with_connection(move |conn| {
            let user = conn.query_row(&format!("{SELECT_USER} WHERE Login = ?1"), params![login], read_user).optional()?;
            Ok(user)
        })
        .await
    }

    async fn update(&self, id: i64, mut user: User) -> Result<Option<User>, StorageError> {
        self.with_connection(move |conn| {
            let changed = conn
                .execute(
                    r#"UPDATE "user" SET Username = ?1, Role = ?2, Login = ?3, Password = ?4 WHERE ID = ?5"#,
                    params![user.username, user.role, user.login, user.password, id],
                )
                .map_err(|e| map_write_error(e, &user.login))?;
            if changed == 0 {
                return Ok(None);
            }

            user.id = id;
            info!(id, username = %user.username, role = %user.role, "updated user");
            Ok(Some(user))
        })
        .await
    }

    async fn delete(&self, id: i64) -> Result<bool, StorageError> {
        self.with_connection(move |conn| {
            let removed = conn.execute(r#"DELETE FROM "user" WHERE ID = ?1"#, params![id])? > 0;
            if removed {
                info!(id, "deleted user");
            }
            Ok(removed)
        })
        .await
    }
}
