//! HTTP client for the campaign backend.
//!
//! Works on native targets (CLI, driven by tokio) and on wasm32 (dashboard,
//! where reqwest goes through the browser's fetch).

use crate::catalog::{Catalog, Crop, Place};
use crate::config::CampoConfig;
use crate::error::{CampoError, Result};
use crate::fetch::CampaignSource;
use crate::filters::CampaignFilters;
use crate::level::Level;
use crate::observation::{AverageReference, Envelope, RawObservation};
use crate::session::Session;
use log::{info, warn};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Body of `POST /usuario`, linking an identity-provider account to a
/// backend user.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct NewUser<'a> {
    pub uid_usuario: &'a str,
    pub nombre: &'a str,
}

/// Read-only client for the campaign backend.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    config: CampoConfig,
}

impl ApiClient {
    pub fn new(config: CampoConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &CampoConfig {
        &self.config
    }

    fn authorized(&self, builder: RequestBuilder, session: &Session) -> RequestBuilder {
        match session.id_token.as_deref() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    fn checked(response: Response, path: &str) -> Result<Response> {
        let status = response.status();
        if !status.is_success() {
            warn!("Bad response status for {}: {}", path, status);
            return Err(CampoError::Status {
                status: status.as_u16(),
                endpoint: path.to_string(),
            });
        }
        Ok(response)
    }

    /// GET `path` and unwrap the `{data: [...]}` envelope.
    async fn get_data<T: DeserializeOwned>(
        &self,
        session: &Session,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<Vec<T>> {
        let url = self.config.endpoint(path);
        let request = self.authorized(self.client.get(&url).query(params), session);
        let response = Self::checked(request.send().await?, path)?;
        let body = response.text().await?;
        let envelope: Envelope<T> = serde_json::from_str(&body)?;
        let data = envelope.into_data();
        info!("GET {} returned {} records", path, data.len());
        Ok(data)
    }

    /// Load crops and every place level, one request after another.
    pub async fn load_catalog(&self, session: &Session) -> Result<Catalog> {
        session.require_user()?;
        let mut catalog = Catalog {
            crops: self.get_data::<Crop>(session, "/cultivo", &[]).await?,
            ..Default::default()
        };
        for level in Level::ALL {
            let records: Vec<RawObservation> =
                self.get_data(session, level.catalog_path(), &[]).await?;
            catalog.set_places(level, Place::from_records(level, &records));
        }
        Ok(catalog)
    }

    /// Create the backend user record for a freshly created account.
    pub async fn register_user(&self, session: &Session, name: &str) -> Result<()> {
        let uid = session.require_user()?;
        let body = NewUser {
            uid_usuario: uid,
            nombre: name,
        };
        let request = self.authorized(self.client.post(self.config.endpoint("/usuario")), session);
        Self::checked(request.json(&body).send().await?, "/usuario")?;
        info!("registered backend user {}", uid);
        Ok(())
    }
}

impl CampaignSource for ApiClient {
    async fn campaigns(
        &self,
        session: &Session,
        level: Level,
        location_id: &str,
        filters: &CampaignFilters,
    ) -> Result<Vec<RawObservation>> {
        self.get_data(session, &level.campaigns_path(location_id), &filters.query_params())
            .await
    }

    async fn losses(
        &self,
        session: &Session,
        level: Level,
        location_id: &str,
        filters: &CampaignFilters,
    ) -> Result<Vec<RawObservation>> {
        self.get_data(session, &level.losses_path(location_id), &filters.query_params())
            .await
    }

    async fn average(
        &self,
        session: &Session,
        level: Level,
        location_id: &str,
        filters: &CampaignFilters,
    ) -> Result<Option<AverageReference>> {
        let records: Vec<RawObservation> = self
            .get_data(session, &level.average_path(location_id), &filters.query_params())
            .await?;
        Ok(AverageReference::from_records(&records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_body() {
        let body = NewUser {
            uid_usuario: "abc",
            nombre: "Ana",
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"uid_usuario": "abc", "nombre": "Ana"})
        );
    }

    #[tokio::test]
    async fn test_catalog_requires_session() {
        let client = ApiClient::new(CampoConfig::default());
        let result = client.load_catalog(&Session::default()).await;
        assert!(matches!(result, Err(CampoError::Unauthenticated)));
    }

    #[tokio::test]
    async fn test_register_requires_session() {
        let client = ApiClient::new(CampoConfig::default());
        let result = client.register_user(&Session::default(), "Ana").await;
        assert!(matches!(result, Err(CampoError::Unauthenticated)));
    }
}
