//! Request dispatch.
//!
//! The [`Dispatcher`] resolves a request against the [`RouteTable`], applies
//! the bearer check where the route demands it, calls the [`UserService`] and
//! turns the outcome into a [`Response`]. Every [`ApiError`] becomes a
//! bodyless status response, so the handler itself never fails.

use std::convert::Infallible;

use async_trait::async_trait;
use http::StatusCode;
use micro_user_http::handler::Handler;
use micro_user_http::protocol::{Request, Response};
use tracing::{debug, error, info, warn};

use crate::model::{Credentials, LoginResponse, User};
use crate::service::UserService;
use crate::token::TokenService;

mod error;
mod route;

pub use error::ApiError;
pub use route::{Endpoint, RouteMatch, RouteTable};

#[derive(Debug)]
pub struct Dispatcher {
    routes: RouteTable,
    users: UserService,
    tokens: TokenService,
}

impl Dispatcher {
    pub fn new(api_base_path: &str, users: UserService, tokens: TokenService) -> Self {
        Self { routes: RouteTable::new(api_base_path), users, tokens }
    }

    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    pub async fn dispatch(&self, req: &Request) -> Result<Response, ApiError> {
        let Some(RouteMatch { endpoint, id }) = self.routes.resolve(req.method(), req.path()) else {
            return Err(ApiError::route(req.method(), req.path()));
        };

        match endpoint {
            Endpoint::ListUsers => self.list_users(req).await,
            Endpoint::CreateUser => self.create_user(req).await,
            Endpoint::UploadFiles => upload_files(req),
            Endpoint::Login => self.login(req).await,
            Endpoint::GetUser => self.get_user(parse_id(id)?).await,
            Endpoint::UpdateUser => self.update_user(parse_id(id)?, req).await,
            Endpoint::DeleteUser => self.delete_user(parse_id(id)?).await,
        }
    }

    async fn list_users(&self, req: &Request) -> Result<Response, ApiError> {
        let role = req.query_param("role").unwrap_or_default();
        let users = self.users.get_users_by_role(role).await?;
        info!(role, count = users.len(), "listed users");
        Ok(Response::json(StatusCode::OK, &users)?)
    }

    async fn create_user(&self, req: &Request) -> Result<Response, ApiError> {
        let claims = self.tokens.parse(req.headers())?;
        let user: User = req.json()?;
        let created = self.users.create_user(user).await?;
        info!(id = created.id, by = claims.user_id, "user created");
        Ok(Response::json(StatusCode::CREATED, &created)?)
    }

    async fn login(&self, req: &Request) -> Result<Response, ApiError> {
        let credentials: Credentials = req.json()?;
        let Some(user) = self.users.authenticate(&credentials.login, &credentials.password).await? else {
            return Err(ApiError::bad_credentials(credentials.login));
        };

        let access_token = self.tokens.generate(user.id)?;
        info!(id = user.id, login = %user.login, "user logged in");
        Ok(Response::json(StatusCode::OK, &LoginResponse { user: (&user).into(), access_token })?)
    }

    async fn get_user(&self, id: i64) -> Result<Response, ApiError> {
        let user = self.users.get_user(id).await?.ok_or(ApiError::not_found(id))?;
        Ok(Response::json(StatusCode::OK, &user)?)
    }

    async fn update_user(&self, id: i64, req: &Request) -> Result<Response, ApiError> {
        let user: User = req.json()?;
        let updated = self.users.update_user(id, user).await?.ok_or(ApiError::not_found(id))?;
        Ok(Response::json(StatusCode::OK, &updated)?)
    }

    async fn delete_user(&self, id: i64) -> Result<Response, ApiError> {
        if !self.users.delete_user(id).await? {
            return Err(ApiError::not_found(id));
        }
        Ok(Response::status(StatusCode::NO_CONTENT))
    }
}

fn upload_files(req: &Request) -> Result<Response, ApiError> {
    if req.uploads().is_empty() {
        return Err(ApiError::validation("no uploaded files"));
    }
    info!(count = req.uploads().len(), "received uploads");
    Ok(Response::json(StatusCode::OK, req.uploads())?)
}

fn parse_id(id: Option<&str>) -> Result<i64, ApiError> {
    let id = id.unwrap_or_default();
    id.parse().map_err(|_| ApiError::invalid_id(id))
}

#[async_trait]
impl Handler for Dispatcher {
    type Error = Infallible;

    async fn call(&self, req: Request) -> Result<Response, Self::Error> {
        info!(method = %req.method(), path = req.path(), "received request");

        let response = match self.dispatch(&req).await {
            Ok(response) => response,
            Err(e) => {
                let status = e.status();
                if e.is_server_error() {
                    error!(status = status.as_u16(), cause = %e, "request failed");
                } else {
                    warn!(status = status.as_u16(), cause = %e, "request rejected");
                }
                Response::status(status)
            }
        };

        debug!(status = response.status_code().as_u16(), body_size = response.body().len(), "dispatched request");
        Ok(response)
    }
}
