//! Login and role gating

use ledgerdesk_config::AuthConfig;
use ledgerdesk_remote::{LoginRequest, RemoteStore, Role};
use serde::Serialize;

use crate::error::{CoreError, CoreResult, DefaultErrorLogger, ErrorContext, ErrorLogger};

/// Signed-in user
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Session {
    pub username: String,
    pub role: Role,
    /// Signed in through the bypass pair, no server contact
    pub offline: bool,
}

impl Session {
    /// Authenticate against the configured bypass pair, then the server
    pub async fn login(
        store: &dyn RemoteStore,
        auth: &AuthConfig,
        username: &str,
        password: &str,
    ) -> CoreResult<Session> {
        let username = username.trim();
        if username.is_empty() {
            return Err(CoreError::validation("username", "Username is required"));
        }
        if password.trim().is_empty() {
            return Err(CoreError::validation("password", "Password is required"));
        }

        if let Some(ref bypass) = auth.bypass {
            if bypass.matches(username, password) {
                log::warn!("Signed in as {} with the offline bypass credentials", username);
                return Ok(Session {
                    username: username.to_string(),
                    role: Role::Admin,
                    offline: true,
                });
            }
        }

        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let response = match store.login(&request).await {
            Ok(response) => response,
            Err(e) => {
                let error = CoreError::from(e);
                DefaultErrorLogger.log_error(
                    &error,
                    &ErrorContext::new("login").with_data("username", serde_json::json!(username)),
                );
                return Err(error);
            }
        };

        if !response.success {
            log::info!("Login refused for {}", username);
            return Err(CoreError::Unauthorized);
        }

        let role = response.role.unwrap_or(Role::Standard);
        log::info!("Signed in as {} ({})", username, role);
        Ok(Session {
            username: username.to_string(),
            role,
            offline: false,
        })
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Fail with `Unauthorized` unless the session holds the Admin role
    pub fn require_admin(&self) -> CoreResult<()> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(CoreError::Unauthorized)
        }
    }
}
