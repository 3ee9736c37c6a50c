//! In-memory remote store for tests

use async_trait::async_trait;
use ledgerdesk_remote::{
    Account, AccountId, Counterparty, CounterpartyFields, LoginRequest, LoginResponse, RemoteError,
    RemoteResult, RemoteStore, Role, Transaction, TransactionFields, TransactionId,
};
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Default)]
struct State {
    counterparties: Vec<Counterparty>,
    transactions: Vec<Transaction>,
    accounts: Vec<Account>,
    users: HashMap<String, (String, Option<Role>)>,
    next_id: i64,
    echo_created: bool,
    failures: HashMap<&'static str, RemoteError>,
    calls: HashMap<&'static str, usize>,
}

/// Behaves like the service: assigns ids, stores records, answers lists
#[derive(Default)]
pub struct FakeStore {
    state: Mutex<State>,
}

impl FakeStore {
    pub fn new() -> Self {
        let store = Self::default();
        {
            let mut state = store.state.lock().unwrap();
            state.next_id = 100;
            state.echo_created = true;
        }
        store
    }

    pub fn with_counterparty(self, counterparty: Counterparty) -> Self {
        self.state.lock().unwrap().counterparties.push(counterparty);
        self
    }

    pub fn with_transaction(self, transaction: Transaction) -> Self {
        self.state.lock().unwrap().transactions.push(transaction);
        self
    }

    pub fn with_account(self, account: Account) -> Self {
        self.state.lock().unwrap().accounts.push(account);
        self
    }

    pub fn add_user(&self, username: &str, password: &str, role: Option<Role>) {
        self.state
            .lock()
            .unwrap()
            .users
            .insert(username.to_string(), (password.to_string(), role));
    }

    /// Creates answer with an empty body
    pub fn silent_creates(self) -> Self {
        self.state.lock().unwrap().echo_created = false;
        self
    }

    /// Fail the next call of `operation` with `error`
    pub fn fail_next(&self, operation: &'static str, error: RemoteError) {
        self.state.lock().unwrap().failures.insert(operation, error);
    }

    pub fn calls(&self, operation: &'static str) -> usize {
        self.state.lock().unwrap().calls.get(operation).copied().unwrap_or(0)
    }

    pub fn transactions(&self) -> Vec<Transaction> {
        self.state.lock().unwrap().transactions.clone()
    }

    /// Mutate server-side records behind the ledger's back
    pub fn edit<F: FnOnce(&mut Vec<Counterparty>, &mut Vec<Transaction>)>(&self, f: F) {
        let mut state = self.state.lock().unwrap();
        let state = &mut *state;
        f(&mut state.counterparties, &mut state.transactions);
    }

    fn enter(&self, operation: &'static str) -> RemoteResult<std::sync::MutexGuard<'_, State>> {
        let mut state = self.state.lock().unwrap();
        *state.calls.entry(operation).or_default() += 1;
        match state.failures.remove(operation) {
            Some(error) => Err(error),
            None => Ok(state),
        }
    }
}

fn not_found(what: &str, id: i64) -> RemoteError {
    RemoteError::ServerRejected {
        status: 404,
        body: format!("{} {} not found", what, id),
    }
}

#[async_trait]
impl RemoteStore for FakeStore {
    async fn list_counterparties(&self) -> RemoteResult<Vec<Counterparty>> {
        Ok(self.enter("list_counterparties")?.counterparties.clone())
    }

    async fn create_counterparty(&self, fields: &CounterpartyFields) -> RemoteResult<Option<Counterparty>> {
        let mut state = self.enter("create_counterparty")?;
        state.next_id += 1;
        let created = Counterparty {
            id: state.next_id,
            name: fields.name.clone(),
            address: fields.address.clone(),
            phone: fields.phone.clone(),
        };
        state.counterparties.push(created.clone());
        Ok(state.echo_created.then_some(created))
    }

    async fn list_transactions(&self) -> RemoteResult<Vec<Transaction>> {
        Ok(self.enter("list_transactions")?.transactions.clone())
    }

    async fn get_transaction(&self, id: TransactionId) -> RemoteResult<Transaction> {
        let state = self.enter("get_transaction")?;
        state
            .transactions
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or_else(|| not_found("Transaction", id))
    }

    async fn create_transaction(&self, fields: &TransactionFields) -> RemoteResult<Option<Transaction>> {
        let mut state = self.enter("create_transaction")?;
        state.next_id += 1;
        let created = Transaction {
            id: state.next_id,
            counterparty_id: fields.counterparty_id,
            amount: fields.amount,
            transaction_type: fields.transaction_type.clone(),
            date: fields.date,
            description: fields.description.clone(),
        };
        state.transactions.push(created.clone());
        Ok(state.echo_created.then_some(created))
    }

    async fn update_transaction(&self, id: TransactionId, fields: &TransactionFields) -> RemoteResult<()> {
        let mut state = self.enter("update_transaction")?;
        let tx = state
            .transactions
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| not_found("Transaction", id))?;
        tx.counterparty_id = fields.counterparty_id;
        tx.amount = fields.amount;
        tx.transaction_type = fields.transaction_type.clone();
        tx.date = fields.date;
        tx.description = fields.description.clone();
        Ok(())
    }

    async fn delete_transaction(&self, id: TransactionId) -> RemoteResult<()> {
        let mut state = self.enter("delete_transaction")?;
        let before = state.transactions.len();
        state.transactions.retain(|t| t.id != id);
        if state.transactions.len() == before {
            return Err(not_found("Transaction", id));
        }
        Ok(())
    }

    async fn list_accounts(&self) -> RemoteResult<Vec<Account>> {
        Ok(self.enter("list_accounts")?.accounts.clone())
    }

    async fn revoke_account(&self, id: AccountId) -> RemoteResult<()> {
        let mut state = self.enter("revoke_account")?;
        let account = state
            .accounts
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| not_found("Account", id))?;
        account.is_active = false;
        Ok(())
    }

    async fn login(&self, request: &LoginRequest) -> RemoteResult<LoginResponse> {
        let state = self.enter("login")?;
        let response = match state.users.get(&request.username) {
            Some((password, role)) if *password == request.password => LoginResponse {
                success: true,
                role: role.clone(),
            },
            _ => LoginResponse { success: false, role: None },
        };
        Ok(response)
    }

    async fn wipe(&self) -> RemoteResult<()> {
        let mut state = self.enter("wipe")?;
        state.counterparties.clear();
        state.transactions.clear();
        state.accounts.clear();
        Ok(())
    }
}
