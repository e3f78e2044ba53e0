//! Backend client and session setup shared by every command.

use crate::Connection;
use anyhow::{bail, Context};
use campo_core::api::ApiClient;
use campo_core::config::CampoConfig;
use campo_core::identity::FirebaseIdentity;
use campo_core::session::{IdentityProvider, Session};
use log::info;

impl Connection {
    pub fn config(&self) -> CampoConfig {
        CampoConfig::new(self.api_url.clone(), self.identity_key.clone())
    }
}

/// Build the backend client and a session, signing in unless `--uid` was given.
pub async fn connect(connection: &Connection) -> anyhow::Result<(ApiClient, Session)> {
    let config = connection.config();
    let session = match (&connection.uid, &connection.email, &connection.password) {
        (Some(uid), _, _) => Session::signed_in(uid.clone()),
        (None, Some(email), Some(password)) => {
            let identity = FirebaseIdentity::from_config(&config)?;
            identity
                .sign_in(email, password)
                .await
                .with_context(|| format!("sign in failed for {}", email))?
        }
        _ => bail!("pass --uid, or --email and --password to sign in"),
    };
    info!("Using backend {} as {:?}", config.api_base_url, session.user_id);
    Ok((ApiClient::new(config), session))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn connection() -> Connection {
        Connection {
            api_url: "http://campo.test/api/".to_string(),
            identity_key: None,
            email: None,
            password: None,
            uid: None,
        }
    }

    #[tokio::test]
    async fn test_uid_skips_sign_in() {
        let mut conn = connection();
        conn.uid = Some("u1".to_string());
        let (client, session) = connect(&conn).await.unwrap();
        assert_eq!(session.user_id.as_deref(), Some("u1"));
        assert_eq!(client.config().endpoint("/pais"), "http://campo.test/api/pais");
    }

    #[tokio::test]
    async fn test_missing_credentials_fail() {
        let mut conn = connection();
        conn.email = Some("ana@campo.ar".to_string());
        assert!(connect(&conn).await.is_err());
    }

    #[tokio::test]
    async fn test_sign_in_needs_identity_key() {
        let mut conn = connection();
        conn.email = Some("ana@campo.ar".to_string());
        conn.password = Some("secreto".to_string());
        assert!(connect(&conn).await.is_err());
    }
}
