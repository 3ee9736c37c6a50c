//! reqwest-backed [`RemoteStore`]

use async_trait::async_trait;
use ledgerdesk_config::Config;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client, RequestBuilder, Response};
use serde::Serialize;

use crate::error::{RemoteError, RemoteResult};
use crate::types::*;
use crate::RemoteStore;

/// JSON-over-HTTP client for the bookkeeping service
///
/// Every call is single-shot: no retries, no caching, and no timeout
/// beyond what the transport applies.
#[derive(Debug, Clone)]
pub struct HttpRemoteStore {
    client: Client,
    config: Config,
}

impl HttpRemoteStore {
    pub fn new(config: Config) -> RemoteResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let client = Client::builder().default_headers(headers).build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        self.config.endpoint(path)
    }

    /// Send and map non-2xx responses to [`RemoteError::ServerRejected`]
    async fn send(&self, request: RequestBuilder) -> RemoteResult<Response> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            let body = rejection_body(response.text().await);
            log::debug!("Remote rejected request with {}: {}", status, body);
            Err(RemoteError::ServerRejected {
                status: status.as_u16(),
                body,
            })
        }
    }

    async fn list<R: Resource>(&self) -> RemoteResult<Vec<R>> {
        let response = self.send(self.client.get(self.url(R::PATH))).await?;
        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        let list: Option<Vec<R>> = serde_json::from_str(&text)
            .map_err(|e| RemoteError::Decode { message: e.to_string() })?;
        Ok(list.unwrap_or_default())
    }

    async fn get<R: Resource>(&self, id: i64) -> RemoteResult<R> {
        let url = self.url(&format!("{}/{}", R::PATH, id));
        let response = self.send(self.client.get(url)).await?;
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| RemoteError::Decode { message: e.to_string() })
    }

    /// POST to the collection; the created record is returned when the body carries one
    async fn create<R, F>(&self, fields: &F) -> RemoteResult<Option<R>>
    where
        R: Resource,
        F: Serialize + Sync,
    {
        let response = self
            .send(self.client.post(self.url(R::PATH)).json(fields))
            .await?;
        let text = response.text().await?;
        match serde_json::from_str(&text) {
            Ok(created) => Ok(Some(created)),
            Err(e) => {
                log::debug!("Create on {} returned no usable record: {}", R::PATH, e);
                Ok(None)
            }
        }
    }

    async fn update<R, F>(&self, id: i64, fields: &F) -> RemoteResult<()>
    where
        R: Resource,
        F: Serialize + Sync,
    {
        let url = self.url(&format!("{}/{}", R::PATH, id));
        self.send(self.client.put(url).json(fields)).await?;
        Ok(())
    }

    async fn delete<R: Resource>(&self, id: i64) -> RemoteResult<()> {
        let url = self.url(&format!("{}/{}", R::PATH, id));
        self.send(self.client.delete(url)).await?;
        Ok(())
    }

    /// One-off state transition: PUT `{collection}/{id}/{verb}` with no body
    async fn action<R: Resource>(&self, id: i64, verb: &str) -> RemoteResult<()> {
        let url = self.url(&format!("{}/{}/{}", R::PATH, id, verb));
        self.send(self.client.put(url)).await?;
        Ok(())
    }
}

#[async_trait]
impl RemoteStore for HttpRemoteStore {
    async fn list_counterparties(&self) -> RemoteResult<Vec<Counterparty>> {
        self.list().await
    }

    async fn create_counterparty(&self, fields: &CounterpartyFields) -> RemoteResult<Option<Counterparty>> {
        self.create(fields).await
    }

    async fn list_transactions(&self) -> RemoteResult<Vec<Transaction>> {
        self.list().await
    }

    async fn get_transaction(&self, id: TransactionId) -> RemoteResult<Transaction> {
        self.get(id).await
    }

    async fn create_transaction(&self, fields: &TransactionFields) -> RemoteResult<Option<Transaction>> {
        self.create(fields).await
    }

    async fn update_transaction(&self, id: TransactionId, fields: &TransactionFields) -> RemoteResult<()> {
        self.update::<Transaction, _>(id, fields).await
    }

    async fn delete_transaction(&self, id: TransactionId) -> RemoteResult<()> {
        self.delete::<Transaction>(id).await
    }

    async fn list_accounts(&self) -> RemoteResult<Vec<Account>> {
        self.list().await
    }

    async fn revoke_account(&self, id: AccountId) -> RemoteResult<()> {
        self.action::<Account>(id, "revoke").await
    }

    async fn login(&self, request: &LoginRequest) -> RemoteResult<LoginResponse> {
        let response = self
            .send(self.client.post(self.url("auth/login")).json(request))
            .await?;
        let text = response.text().await?;
        if text.trim().is_empty() {
            // A bare 2xx is an accepted login with no role information
            return Ok(LoginResponse { success: true, role: None });
        }
        serde_json::from_str(&text).map_err(|e| RemoteError::Decode { message: e.to_string() })
    }

    async fn wipe(&self) -> RemoteResult<()> {
        self.send(self.client.delete(self.url("admin/wipe"))).await?;
        Ok(())
    }
}

/// Body of a rejected response, or a note saying why it could not be read
fn rejection_body<E: std::fmt::Display>(body: Result<String, E>) -> String {
    match body {
        Ok(text) => text,
        Err(e) => format!("<unreadable body: {}>", e),
    }
}
