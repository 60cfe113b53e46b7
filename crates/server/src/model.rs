use serde::{Deserialize, Serialize};

/// A stored user.
///
/// Every field defaults when absent from incoming JSON, so an update body that
/// omits a field clears it. The password is accepted from clients but never
/// serialized back out; once stored it always holds a bcrypt hash.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub role: String,
    pub login: String,
    #[serde(skip_serializing)]
    pub password: String,
}

impl User {
    pub fn new(username: impl Into<String>, role: impl Into<String>, login: impl Into<String>, password: impl Into<String>) -> Self {
        Self { id: 0, username: username.into(), role: role.into(), login: login.into(), password: password.into() }
    }
}

/// Body of a login request.
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub login: String,
    #[serde(default)]
    pub password: String,
}

/// The public part of a user returned next to a freshly issued token.
#[derive(Debug, Clone, Serialize)]
pub struct UserSummary<'a> {
    pub id: i64,
    pub username: &'a str,
    pub role: &'a str,
}

impl<'a> From<&'a User> for UserSummary<'a> {
    fn from(user: &'a User) -> Self {
        Self { id: user.id, username: &user.username, role: &user.role }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse<'a> {
    pub user: UserSummary<'a>,
    pub access_token: String,
}
