//! The warm-up API as seen by the dashboard.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Account, AccountForm, AccountId, LogEntry, Settings, Status};

/// One method per endpoint. Implementations report failures; they never
/// retry on their own.
#[async_trait]
pub trait WarmupApi: Send + Sync + 'static {
    /// `GET /accounts`
    async fn list_accounts(&self) -> Result<Vec<Account>>;

    /// `GET /logs`
    async fn list_logs(&self) -> Result<Vec<LogEntry>>;

    /// `GET /status`
    async fn status(&self) -> Result<Status>;

    /// `POST /accounts`
    async fn create_account(&self, form: &AccountForm) -> Result<()>;

    /// `DELETE /accounts/{id}`
    async fn delete_account(&self, id: &AccountId) -> Result<()>;

    /// `POST /settings`
    async fn update_settings(&self, settings: &Settings) -> Result<()>;

    /// `POST /warmup/start`
    async fn start_warmup(&self) -> Result<()>;

    /// `POST /warmup/stop`
    async fn stop_warmup(&self) -> Result<()>;

    /// `POST /logs/clear`
    async fn clear_logs(&self) -> Result<()>;

    /// `DELETE /logs`
    async fn delete_logs(&self) -> Result<()>;
}
