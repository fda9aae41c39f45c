use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::Config;
use crate::error::SyncError;
use crate::roles::{Role, SubPermission};

pub const ADD_FAILED: &str = "Failed to add user";
pub const ADD_UNREACHABLE: &str = "Failed to add user. Please try again.";
pub const DELETE_FAILED: &str = "Failed to delete user.";
pub const DELETE_UNREACHABLE: &str = "Failed to delete user. Please try again.";

#[derive(Debug, Serialize)]
struct CreateUserRoleRequest<'a> {
    user_email: &'a str,
    role: Role,
    sub_role: SubPermission,
}

#[derive(Debug, Serialize)]
struct DeleteUserRoleRequest<'a> {
    user_email: &'a str,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Remote store of role assignments.
#[async_trait]
pub trait RoleBackend: Send + Sync {
    async fn create_assignment(
        &self,
        email: &str,
        role: Role,
        sub_permission: SubPermission,
    ) -> Result<(), SyncError>;

    async fn delete_assignment(&self, email: &str) -> Result<(), SyncError>;
}

pub struct HttpBackend {
    api_url: String,
    client: reqwest::Client,
}

impl HttpBackend {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(seconds) = config.request_timeout_seconds {
            builder = builder.timeout(Duration::from_secs(seconds));
        }

        Ok(Self {
            api_url: config.api_url.trim_end_matches('/').to_string(),
            client: builder.build()?,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/user_roles", self.api_url)
    }

    async fn send<T: Serialize + ?Sized>(
        &self,
        request: reqwest::RequestBuilder,
        body: &T,
        failed: &str,
        unreachable: &str,
    ) -> Result<(), SyncError> {
        let response = request
            .json(body)
            .send()
            .await
            .map_err(|e| network_error(e, unreachable))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let text = response
            .text()
            .await
            .map_err(|e| network_error(e, unreachable))?;
        tracing::debug!("user_roles responded {}: {}", status, text);

        Err(SyncError::Backend(backend_message(&text, failed)))
    }
}

#[async_trait]
impl RoleBackend for HttpBackend {
    async fn create_assignment(
        &self,
        email: &str,
        role: Role,
        sub_permission: SubPermission,
    ) -> Result<(), SyncError> {
        let body = CreateUserRoleRequest {
            user_email: email,
            role,
            sub_role: sub_permission,
        };

        self.send(
            self.client.post(self.endpoint()),
            &body,
            ADD_FAILED,
            ADD_UNREACHABLE,
        )
        .await
    }

    async fn delete_assignment(&self, email: &str) -> Result<(), SyncError> {
        let body = DeleteUserRoleRequest { user_email: email };

        self.send(
            self.client.delete(self.endpoint()),
            &body,
            DELETE_FAILED,
            DELETE_UNREACHABLE,
        )
        .await
    }
}

/// Picks the `error` field out of a failure body, falling back to `default`
/// when the body is not JSON or the field is missing or empty.
pub fn backend_message(body: &str, default: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .filter(|e| !e.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn network_error(err: reqwest::Error, default: &str) -> SyncError {
    let message = err.to_string();
    if message.is_empty() {
        SyncError::Network(default.to_string())
    } else {
        SyncError::Network(message)
    }
}
