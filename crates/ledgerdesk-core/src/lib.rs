//! Core ledger cache and aggregation
//!
//! [`Ledger`] holds the local copy of counterparties, transactions and
//! accounts, keeps it in step with a [`RemoteStore`](ledgerdesk_remote::RemoteStore), and derives filtered
//! views and credit/debit totals from it. Collections are replaced whole on
//! refresh; a failed call leaves them exactly as they were.

pub mod error;
pub mod filter;
pub mod models;
pub mod reports;
pub mod session;

#[cfg(test)]
mod testing;

use chrono::{Local, NaiveDate};
use ledgerdesk_remote::{
    Account, AccountId, Counterparty, CounterpartyId, RemoteStoreRef, Transaction, TransactionId,
};
use serde::Serialize;
use std::collections::HashSet;

pub use error::{CoreError, CoreResult, ErrorCode, ErrorDetails, ErrorSeverity};
use error::{DefaultErrorLogger, ErrorContext, ErrorLogger};
pub use filter::LedgerFilter;
pub use models::{parse_amount, CounterpartyDraft, TransactionDraft, TransactionView};
pub use reports::{DailyRegister, LedgerReport, LedgerSummary, Totals};
pub use session::Session;

/// Local cache over the remote store
///
/// The only mutator of the cached collections. Every mutating call takes
/// `&mut self`, so at most one is in flight per ledger.
pub struct Ledger {
    store: RemoteStoreRef,
    data: LedgerData,
    logger: Box<dyn ErrorLogger>,
}

/// In-memory ledger data
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct LedgerData {
    pub counterparties: Vec<Counterparty>,
    pub transactions: Vec<TransactionView>,
    pub accounts: Vec<Account>,
}

impl Ledger {
    /// Create an empty ledger over a store
    pub fn new(store: RemoteStoreRef) -> Self {
        Self {
            store,
            data: LedgerData::default(),
            logger: Box::new(DefaultErrorLogger),
        }
    }

    /// Replace the failure logger
    pub fn with_logger(mut self, logger: Box<dyn ErrorLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn data(&self) -> &LedgerData {
        &self.data
    }

    fn fail(&self, operation: &str, error: impl Into<CoreError>) -> CoreError {
        let error = error.into();
        self.logger.log_error(&error, &ErrorContext::new(operation));
        error
    }

    fn fail_on(&self, operation: &str, id: i64, error: impl Into<CoreError>) -> CoreError {
        let error = error.into();
        let context = ErrorContext::new(operation).with_data("id", serde_json::json!(id));
        self.logger.log_error(&error, &context);
        error
    }

    // ==================== Refresh ====================

    /// Replace the counterparty collection with the server's list
    pub async fn refresh_counterparties(&mut self) -> CoreResult<usize> {
        let fetched = self
            .store
            .list_counterparties()
            .await
            .map_err(|e| self.fail("refresh_counterparties", e))?;

        self.data.counterparties = unique_by_id(fetched, |c| c.id);
        log::info!("Loaded {} counterparties", self.data.counterparties.len());
        Ok(self.data.counterparties.len())
    }

    /// Replace the transaction collection, joining names from the cached counterparties
    pub async fn refresh_transactions(&mut self) -> CoreResult<usize> {
        let fetched = self
            .store
            .list_transactions()
            .await
            .map_err(|e| self.fail("refresh_transactions", e))?;

        let counterparties = &self.data.counterparties;
        let views: Vec<TransactionView> = unique_by_id(fetched, |t| t.id)
            .into_iter()
            .map(|tx| TransactionView::join(tx, counterparties))
            .collect();

        self.data.transactions = views;
        log::info!("Loaded {} transactions", self.data.transactions.len());
        Ok(self.data.transactions.len())
    }

    /// Replace the account collection
    pub async fn refresh_accounts(&mut self) -> CoreResult<usize> {
        let fetched = self
            .store
            .list_accounts()
            .await
            .map_err(|e| self.fail("refresh_accounts", e))?;

        self.data.accounts = unique_by_id(fetched, |a| a.id);
        log::info!("Loaded {} accounts", self.data.accounts.len());
        Ok(self.data.accounts.len())
    }

    /// Initial load; counterparties first so the transaction join sees them
    pub async fn load_all(&mut self, include_accounts: bool) -> CoreResult<()> {
        self.refresh_counterparties().await?;
        self.refresh_transactions().await?;
        if include_accounts {
            self.refresh_accounts().await?;
        }
        Ok(())
    }

    /// Re-fetch one transaction; patch it in place or append it
    pub async fn refresh_transaction(&mut self, id: TransactionId) -> CoreResult<()> {
        let fetched = self
            .store
            .get_transaction(id)
            .await
            .map_err(|e| self.fail_on("refresh_transaction", id, e))?;

        let view = TransactionView::join(fetched, &self.data.counterparties);
        match self.data.transactions.iter_mut().find(|t| t.id == id) {
            Some(existing) => *existing = view,
            None => self.data.transactions.push(view),
        }
        log::info!("Refreshed transaction {}", id);
        Ok(())
    }

    // ==================== Mutations ====================

    /// Create a counterparty; the cache is not touched until the next refresh
    pub async fn create_counterparty(&self, draft: &CounterpartyDraft) -> CoreResult<Option<Counterparty>> {
        let fields = draft.validate()?;
        let created = self
            .store
            .create_counterparty(&fields)
            .await
            .map_err(|e| self.fail("create_counterparty", e))?;
        log::info!("Created counterparty {}", fields.name);
        Ok(created)
    }

    /// Create a transaction dated today unless the draft says otherwise
    pub async fn create_transaction(&self, draft: &TransactionDraft) -> CoreResult<Option<Transaction>> {
        self.create_transaction_on(draft, Local::now().date_naive()).await
    }

    /// Create a transaction, with `today` standing in for a missing date
    pub async fn create_transaction_on(
        &self,
        draft: &TransactionDraft,
        today: NaiveDate,
    ) -> CoreResult<Option<Transaction>> {
        let fields = draft.validate(today)?;
        self.require_counterparty(fields.counterparty_id)?;
        let created = self
            .store
            .create_transaction(&fields)
            .await
            .map_err(|e| self.fail("create_transaction", e))?;
        log::info!(
            "Created {} of {} for counterparty {}",
            fields.transaction_type,
            fields.amount,
            fields.counterparty_id
        );
        Ok(created)
    }

    /// Replace a transaction server-side, then patch the cached copy
    ///
    /// Returns whether a cached record was patched; an id absent from the
    /// cache leaves it unchanged.
    pub async fn update_transaction(&mut self, id: TransactionId, draft: &TransactionDraft) -> CoreResult<bool> {
        let today = self
            .transaction(id)
            .map(|t| t.day())
            .unwrap_or_else(|| Local::now().date_naive());
        let fields = draft.validate(today)?;
        // A record may keep pointing at a counterparty the cache no longer holds
        let unchanged = self
            .transaction(id)
            .map_or(false, |t| t.counterparty_id == fields.counterparty_id);
        if !unchanged {
            self.require_counterparty(fields.counterparty_id)?;
        }

        self.store
            .update_transaction(id, &fields)
            .await
            .map_err(|e| self.fail_on("update_transaction", id, e))?;

        let counterparties = &self.data.counterparties;
        match self.data.transactions.iter_mut().find(|t| t.id == id) {
            Some(view) => {
                view.apply(&fields, counterparties);
                log::info!("Updated transaction {}", id);
                Ok(true)
            }
            None => {
                log::debug!("Transaction {} updated remotely but not cached", id);
                Ok(false)
            }
        }
    }

    /// Delete a transaction, then reload the transaction collection
    pub async fn delete_transaction(&mut self, id: TransactionId) -> CoreResult<()> {
        self.store
            .delete_transaction(id)
            .await
            .map_err(|e| self.fail_on("delete_transaction", id, e))?;
        log::info!("Deleted transaction {}", id);
        self.refresh_transactions().await?;
        Ok(())
    }

    /// Revoke an account, then reload the account collection
    pub async fn revoke_account(&mut self, id: AccountId) -> CoreResult<()> {
        self.store
            .revoke_account(id)
            .await
            .map_err(|e| self.fail_on("revoke_account", id, e))?;
        log::info!("Revoked account {}", id);
        self.refresh_accounts().await?;
        Ok(())
    }

    /// Erase all server data and empty the cache to match
    pub async fn wipe_remote(&mut self) -> CoreResult<()> {
        self.store
            .wipe()
            .await
            .map_err(|e| self.fail("wipe_remote", e))?;
        self.data = LedgerData::default();
        log::warn!("Remote data wiped");
        Ok(())
    }

    fn require_counterparty(&self, id: CounterpartyId) -> CoreResult<()> {
        if self.counterparty(id).is_some() {
            Ok(())
        } else {
            Err(CoreError::validation("counterparty", format!("Unknown counterparty {}", id)))
        }
    }

    // ==================== Lookups ====================

    pub fn counterparties(&self) -> &[Counterparty] {
        &self.data.counterparties
    }

    pub fn transactions(&self) -> &[TransactionView] {
        &self.data.transactions
    }

    pub fn accounts(&self) -> &[Account] {
        &self.data.accounts
    }

    pub fn counterparty(&self, id: CounterpartyId) -> Option<&Counterparty> {
        self.data.counterparties.iter().find(|c| c.id == id)
    }

    pub fn transaction(&self, id: TransactionId) -> Option<&TransactionView> {
        self.data.transactions.iter().find(|t| t.id == id)
    }

    /// Like [`Ledger::transaction`], failing with `TransactionNotFound`
    pub fn require_transaction(&self, id: TransactionId) -> CoreResult<&TransactionView> {
        self.transaction(id).ok_or(CoreError::TransactionNotFound { id })
    }

    /// Display name, empty when the counterparty is not cached
    pub fn counterparty_name(&self, id: CounterpartyId) -> &str {
        self.counterparty(id).map(|c| c.name.as_str()).unwrap_or("")
    }

    // ==================== Filter & Aggregation ====================

    /// Matching transactions in cache order
    pub fn filter_transactions(&self, filter: &LedgerFilter) -> Vec<TransactionView> {
        self.data
            .transactions
            .iter()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect()
    }

    /// Filtered transactions with their totals
    pub fn ledger(&self, filter: &LedgerFilter) -> LedgerReport {
        let transactions = self.filter_transactions(filter);
        let totals = Totals::aggregate(&transactions);
        LedgerReport {
            period: filter.description(),
            transactions,
            totals,
        }
    }

    /// Register for one calendar day
    pub fn by_exact_date(&self, date: NaiveDate) -> DailyRegister {
        DailyRegister::new(date, self.filter_transactions(&LedgerFilter::on(date)))
    }
}

/// Trait for ledger operations
pub trait LedgerOperations {
    /// Get ledger summary
    fn summary(&self) -> LedgerSummary;

    /// Transactions recorded against one counterparty
    fn transactions_for(&self, counterparty_id: CounterpartyId) -> Vec<TransactionView>;
}

impl LedgerOperations for Ledger {
    fn summary(&self) -> LedgerSummary {
        LedgerSummary {
            counterparty_count: self.data.counterparties.len(),
            transaction_count: self.data.transactions.len(),
            totals: Totals::aggregate(&self.data.transactions),
        }
    }

    fn transactions_for(&self, counterparty_id: CounterpartyId) -> Vec<TransactionView> {
        self.filter_transactions(&LedgerFilter::all().counterparty(counterparty_id))
    }
}

/// Keep the first record of each id, preserving arrival order
fn unique_by_id<T, F: Fn(&T) -> i64>(records: Vec<T>, id: F) -> Vec<T> {
    let mut seen = HashSet::with_capacity(records.len());
    let before = records.len();
    let unique: Vec<T> = records.into_iter().filter(|r| seen.insert(id(r))).collect();
    if unique.len() != before {
        log::warn!("Dropped {} records with duplicate ids", before - unique.len());
    }
    unique
}

// ==================== Tests ====================
