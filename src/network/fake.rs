//! In-memory [`WarmupApi`] for tests: records every call and lets a test
//! make individual endpoints fail.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{ApiError, Result};
use crate::models::{Account, AccountForm, AccountId, LogEntry, Settings, Status};
use crate::network::api::WarmupApi;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Accounts,
    Logs,
    Status,
    CreateAccount,
    DeleteAccount,
    UpdateSettings,
    StartWarmup,
    StopWarmup,
    ClearLogs,
    DeleteLogs,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    ListAccounts,
    ListLogs,
    Status,
    CreateAccount(AccountForm),
    DeleteAccount(AccountId),
    UpdateSettings(Settings),
    StartWarmup,
    StopWarmup,
    ClearLogs,
    DeleteLogs,
}

#[derive(Default)]
struct Inner {
    accounts: Vec<Account>,
    logs: Vec<LogEntry>,
    active: bool,
    settings: Option<Settings>,
    next_id: u64,
    failures: HashMap<Endpoint, ApiError>,
    calls: Vec<Call>,
}

#[derive(Default)]
pub struct FakeApi {
    inner: Mutex<Inner>,
}

impl FakeApi {
    pub fn with_accounts(n: usize) -> Self {
        let api = FakeApi::default();
        {
            let mut inner = api.inner.lock().unwrap();
            for _ in 0..n {
                let id = inner.next_id;
                inner.next_id += 1;
                inner.accounts.push(Account {
                    id: AccountId::new(id.to_string()),
                    email: format!("user{}@example.com", id),
                    ..Account::default()
                });
            }
            inner.logs.push(LogEntry {
                sender: String::from("user0@example.com"),
                receiver: String::from("user1@example.com"),
                ..LogEntry::default()
            });
        }
        api
    }

    pub fn fail(&self, endpoint: Endpoint, error: ApiError) {
        self.inner.lock().unwrap().failures.insert(endpoint, error);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.inner.lock().unwrap().calls.clone()
    }

    /// Record the call, then either fail or apply `f`
    fn handle<T>(&self, endpoint: Endpoint, call: Call, f: impl FnOnce(&mut Inner) -> T) -> Result<T> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(call);
        if let Some(err) = inner.failures.get(&endpoint) {
            return Err(err.clone());
        }
        Ok(f(&mut *inner))
    }
}

#[async_trait]
impl WarmupApi for FakeApi {
    async fn list_accounts(&self) -> Result<Vec<Account>> {
        self.handle(Endpoint::Accounts, Call::ListAccounts, |i| i.accounts.clone())
    }

    async fn list_logs(&self) -> Result<Vec<LogEntry>> {
        self.handle(Endpoint::Logs, Call::ListLogs, |i| i.logs.clone())
    }

    async fn status(&self) -> Result<Status> {
        self.handle(Endpoint::Status, Call::Status, |i| Status {
            scheduler_active: Some(i.active),
            account_count: Some(i.accounts.len() as u64),
            daily_volume: i.settings.map(|s| s.daily_volume as u64),
            max_volume: i.settings.map(|s| s.max_volume as u64),
        })
    }

    async fn create_account(&self, form: &AccountForm) -> Result<()> {
        self.handle(Endpoint::CreateAccount, Call::CreateAccount(form.clone()), |i| {
            let id = i.next_id;
            i.next_id += 1;
            i.accounts.push(Account {
                id: AccountId::new(id.to_string()),
                email: form.email.clone(),
                smtp_host: Some(form.smtp_host.clone()),
                smtp_port: Some(form.smtp_port),
                imap_host: Some(form.imap_host.clone()),
                imap_port: Some(form.imap_port),
                use_tls: Some(form.use_tls),
            });
        })
    }

    async fn delete_account(&self, id: &AccountId) -> Result<()> {
        self.handle(Endpoint::DeleteAccount, Call::DeleteAccount(id.clone()), |i| {
            i.accounts.retain(|a| &a.id != id);
        })
    }

    async fn update_settings(&self, settings: &Settings) -> Result<()> {
        self.handle(Endpoint::UpdateSettings, Call::UpdateSettings(*settings), |i| {
            i.settings = Some(*settings);
        })
    }

    async fn start_warmup(&self) -> Result<()> {
        self.handle(Endpoint::StartWarmup, Call::StartWarmup, |i| i.active = true)
    }

    async fn stop_warmup(&self) -> Result<()> {
        self.handle(Endpoint::StopWarmup, Call::StopWarmup, |i| i.active = false)
    }

    async fn clear_logs(&self) -> Result<()> {
        self.handle(Endpoint::ClearLogs, Call::ClearLogs, |i| i.logs.clear())
    }

    async fn delete_logs(&self) -> Result<()> {
        self.handle(Endpoint::DeleteLogs, Call::DeleteLogs, |i| i.logs.clear())
    }
}
