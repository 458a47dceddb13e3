use reqwest::{Method, RequestBuilder, Response};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::{config::AppConfig, error::StoreError};

/// Privilege
///
/// Which key a hosted-path call is made with. `Public` is the anonymous key the
/// marketing site itself may use; `Admin` is the privileged key that bypasses row
/// level security and is reserved for the console.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Privilege {
    Public,
    Admin,
}

/// HostedClient
///
/// A thin client for the hosted backend's table API (`{base}/rest/v1/{table}`).
/// Every call is a single HTTP round trip; rows come back as JSON arrays.
#[derive(Clone, Debug)]
pub struct HostedClient {
    http: reqwest::Client,
    rest_url: String,
    key: String,
    privilege: Privilege,
}

impl HostedClient {
    pub fn new(http: reqwest::Client, base_url: &str, key: &str, privilege: Privilege) -> Self {
        Self {
            http,
            rest_url: format!("{}/rest/v1", base_url.trim_end_matches('/')),
            key: key.to_string(),
            privilege,
        }
    }

    pub fn privilege(&self) -> Privilege {
        self.privilege
    }

    pub fn table_url(&self, table: &str) -> String {
        format!("{}/{}", self.rest_url, table)
    }

    fn request(&self, method: Method, table: &str) -> RequestBuilder {
        self.http
            .request(method, self.table_url(table))
            .header("apikey", &self.key)
            .bearer_auth(&self.key)
    }

    pub async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        select: &Select,
    ) -> Result<Vec<T>, StoreError> {
        let response = self
            .request(Method::GET, table)
            .query(&select.query_pairs())
            .send()
            .await?;
        rows(table, response).await
    }

    pub async fn select_by_id<T: DeserializeOwned>(
        &self,
        table: &str,
        id: Uuid,
    ) -> Result<Option<T>, StoreError> {
        let select = Select::new().eq("id", id).limit(1);
        Ok(self.select(table, &select).await?.into_iter().next())
    }

    /// Inserts one row and returns the stored representation.
    pub async fn insert<B, T>(&self, table: &str, body: &B) -> Result<T, StoreError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .request(Method::POST, table)
            .header("Prefer", "return=representation")
            .json(body)
            .send()
            .await?;
        rows(table, response)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::NoRows {
                table: table.to_string(),
            })
    }

    /// update
    ///
    /// Merges the given keys into the row with `id`. Columns not named in `patch` keep
    /// their stored value. Returns `None` when no row matched.
    pub async fn update<T: DeserializeOwned>(
        &self,
        table: &str,
        id: Uuid,
        patch: &Map<String, Value>,
    ) -> Result<Option<T>, StoreError> {
        // An empty PATCH is rejected by the table API; nothing to merge means a plain read.
        if patch.is_empty() {
            return self.select_by_id(table, id).await;
        }

        let response = self
            .request(Method::PATCH, table)
            .query(&[("id", format!("eq.{id}"))])
            .header("Prefer", "return=representation")
            .json(patch)
            .send()
            .await?;
        Ok(rows(table, response).await?.into_iter().next())
    }

    /// Deletes the row with `id`; `false` when there was none.
    pub async fn delete(&self, table: &str, id: Uuid) -> Result<bool, StoreError> {
        let response = self
            .request(Method::DELETE, table)
            .query(&[("id", format!("eq.{id}"))])
            .header("Prefer", "return=representation")
            .send()
            .await?;
        let deleted: Vec<Value> = rows(table, response).await?;
        Ok(!deleted.is_empty())
    }
}

async fn rows<T: DeserializeOwned>(table: &str, response: Response) -> Result<Vec<T>, StoreError> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        tracing::error!(table, status = status.as_u16(), body = %body, "hosted backend rejected request");
        return Err(StoreError::Hosted {
            status: status.as_u16(),
            message: body,
        });
    }
    Ok(serde_json::from_str(&body)?)
}

/// HostedClients
///
/// Both privilege variants, created once at startup over a shared HTTP connection pool.
#[derive(Clone, Debug)]
pub struct HostedClients {
    pub public: HostedClient,
    pub admin: HostedClient,
}

impl HostedClients {
    pub fn new(config: &AppConfig) -> Self {
        let http = reqwest::Client::new();
        Self {
            public: HostedClient::new(
                http.clone(),
                &config.supabase_url,
                &config.supabase_anon_key,
                Privilege::Public,
            ),
            admin: HostedClient::new(
                http,
                &config.supabase_url,
                &config.supabase_service_key,
                Privilege::Admin,
            ),
        }
    }

    pub fn with(&self, privilege: Privilege) -> &HostedClient {
        match privilege {
            Privilege::Public => &self.public,
            Privilege::Admin => &self.admin,
        }
    }
}

/// Select
///
/// Filter, ordering and limit for a table read, rendered as table-API query parameters.
#[derive(Clone, Debug, Default)]
pub struct Select {
    filters: Vec<(String, String)>,
    order: Vec<(String, bool)>,
    limit: Option<usize>,
}

impl Select {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, column: &str, value: impl ToString) -> Self {
        self.filters
            .push((column.to_string(), format!("eq.{}", value.to_string())));
        self
    }

    pub fn order(mut self, column: &str, descending: bool) -> Self {
        self.order.push((column.to_string(), descending));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![("select".to_string(), "*".to_string())];
        pairs.extend(self.filters.iter().cloned());

        if !self.order.is_empty() {
            let order = self
                .order
                .iter()
                .map(|(column, descending)| {
                    format!("{column}.{}", if *descending { "desc" } else { "asc" })
                })
                .collect::<Vec<_>>()
                .join(",");
            pairs.push(("order".to_string(), order));
        }

        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        pairs
    }
}
