//! Remote store client for the bookkeeping service
//!
//! Issues list/create/update/delete calls for counterparties,
//! transactions and accounts, plus login and the admin wipe. This layer
//! neither caches nor validates; failures carry the transport error or
//! the server's response body verbatim.
//!
//! | Resource | List | Create | Update | Delete | Extra |
//! |---|---|---|---|---|---|
//! | Counterparty | GET /counterparties | POST /counterparties | | | |
//! | Transaction | GET /transactions | POST /transactions | PUT /transactions/{id} | DELETE /transactions/{id} | GET /transactions/{id} |
//! | Account | GET /accounts | | | | PUT /accounts/{id}/revoke |
//! | Auth | | POST /auth/login | | | |
//! | Admin | | | | DELETE /admin/wipe | |

use async_trait::async_trait;
use std::sync::Arc;

pub mod error;
pub mod http;
pub mod types;

pub use error::{RemoteError, RemoteResult};
pub use http::HttpRemoteStore;
pub use types::{
    parse_wire_date, Account, AccountId, Counterparty, CounterpartyFields, CounterpartyId,
    LoginRequest, LoginResponse, Resource, Role, Transaction, TransactionFields, TransactionId,
    TransactionType,
};

/// Shared store reference
pub type RemoteStoreRef = Arc<dyn RemoteStore>;

/// CRUD contract of the bookkeeping service
///
/// Calls are single-shot and independent; nothing is retried.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    async fn list_counterparties(&self) -> RemoteResult<Vec<Counterparty>>;

    /// Returns the created record when the service echoes one back
    async fn create_counterparty(&self, fields: &CounterpartyFields) -> RemoteResult<Option<Counterparty>>;

    async fn list_transactions(&self) -> RemoteResult<Vec<Transaction>>;

    async fn get_transaction(&self, id: TransactionId) -> RemoteResult<Transaction>;

    /// Returns the created record when the service echoes one back
    async fn create_transaction(&self, fields: &TransactionFields) -> RemoteResult<Option<Transaction>>;

    /// Full replacement of the record server-side, no merge
    async fn update_transaction(&self, id: TransactionId, fields: &TransactionFields) -> RemoteResult<()>;

    async fn delete_transaction(&self, id: TransactionId) -> RemoteResult<()>;

    async fn list_accounts(&self) -> RemoteResult<Vec<Account>>;

    /// Ask the server to deactivate an account
    async fn revoke_account(&self, id: AccountId) -> RemoteResult<()>;

    async fn login(&self, request: &LoginRequest) -> RemoteResult<LoginResponse>;

    /// Erase all server data
    async fn wipe(&self) -> RemoteResult<()>;
}
