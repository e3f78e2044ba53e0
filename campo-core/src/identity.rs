//! Firebase Identity Toolkit client (email + password accounts).

use crate::config::CampoConfig;
use crate::error::{CampoError, Result};
use crate::session::{IdentityProvider, Session};
use log::{info, warn};
use reqwest::Client;
use serde::{Deserialize, Serialize};

const IDENTITY_TOOLKIT_URL: &str = "https://identitytoolkit.googleapis.com/v1";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountResponse {
    local_id: String,
    id_token: Option<String>,
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl From<AccountResponse> for Session {
    fn from(value: AccountResponse) -> Self {
        Session {
            user_id: Some(value.local_id),
            id_token: value.id_token,
            email: value.email,
        }
    }
}

/// Identity provider backed by Firebase's REST API.
#[derive(Debug, Clone)]
pub struct FirebaseIdentity {
    client: Client,
    api_key: String,
    base_url: String,
}

impl FirebaseIdentity {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: IDENTITY_TOOLKIT_URL.to_string(),
        }
    }

    pub fn from_config(config: &CampoConfig) -> Result<Self> {
        Ok(Self::new(config.require_identity_key()?))
    }

    fn action_url(&self, action: &str) -> String {
        format!("{}/accounts:{}?key={}", self.base_url, action, self.api_key)
    }

    async fn password_call(&self, action: &str, email: &str, password: &str) -> Result<Session> {
        let body = PasswordRequest {
            email,
            password,
            return_secure_token: true,
        };
        let response = self
            .client
            .post(self.action_url(action))
            .json(&body)
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            let message = serde_json::from_str::<ErrorEnvelope>(&text)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| status.to_string());
            warn!("identity {} failed: {}", action, message);
            return Err(CampoError::Identity(message));
        }
        let account: AccountResponse = serde_json::from_str(&text)?;
        info!("identity {} succeeded for {}", action, account.local_id);
        Ok(account.into())
    }
}

impl IdentityProvider for FirebaseIdentity {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
        self.password_call("signInWithPassword", email, password)
            .await
    }

    async fn create_account(&self, email: &str, password: &str) -> Result<Session> {
        self.password_call("signUp", email, password).await
    }
}
