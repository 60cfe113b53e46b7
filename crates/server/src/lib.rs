//! A user CRUD service on top of `micro-user-http`.
//!
//! Requests are resolved by the [`dispatcher::Dispatcher`], which talks to a
//! [`repository::UserRepository`] through the password hashing
//! [`service::UserService`] and guards user creation with bearer tokens from
//! [`token::TokenService`].
//!
//! ```no_run
//! use micro_user_server::config::Config;
//! use micro_user_server::server::{self, Server};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::load("config.json")?;
//! let dispatcher = micro_user_server::build_dispatcher(&config).await?;
//! let listener = server::bind(config.address()).await?;
//! Server::new(dispatcher).serve(listener).await;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use tracing::info;

pub mod config;
pub mod dispatcher;
pub mod logging;
pub mod model;
pub mod password;
pub mod repository;
pub mod server;
pub mod service;
pub mod token;

use config::Config;
use dispatcher::Dispatcher;
use password::PasswordHasher;
use repository::{MemoryUserRepository, SqliteUserRepository, StorageError, UserRepository};
use service::UserService;
use token::TokenService;

/// Wires storage, hashing and tokens together as described by `config`.
///
/// Opens and migrates the SQLite database when `database_path` is set, and
/// seeds the default accounts when `seed_users` is on.
pub async fn build_dispatcher(config: &Config) -> Result<Dispatcher, StorageError> {
    let repo: Arc<dyn UserRepository> = match &config.database_path {
        Some(path) => {
            let repo = SqliteUserRepository::open(path)?;
            repo.migrate()?;
            Arc::new(repo)
        }
        None => {
            info!("using in-memory user storage");
            Arc::new(MemoryUserRepository::new())
        }
    };

    let users = UserService::new(repo, PasswordHasher::new(config.bcrypt_cost));
    if config.seed_users {
        users.seed_defaults().await?;
    }

    let tokens = TokenService::new(&config.jwt_secret, config.jwt_expires);
    Ok(Dispatcher::new(&config.api_base_path, users, tokens))
}
