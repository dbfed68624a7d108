//! Scatter/gather polling and single-shot command execution

use crate::error::Result;
use crate::messages::Command;
use crate::models::Snapshot;
use crate::network::api::WarmupApi;

/// Fetch accounts, logs and status concurrently. Any single failure fails the
/// whole snapshot, so a caller never sees a mix of generations.
pub async fn fetch_snapshot<A: WarmupApi + ?Sized>(api: &A) -> Result<Snapshot> {
    let (accounts, logs, status) =
        tokio::join!(api.list_accounts(), api.list_logs(), api.status());

    Ok(Snapshot {
        accounts: accounts?,
        logs: logs?,
        status: status?,
    })
}

/// Execute one command. Only log clearing has a second attempt.
pub async fn dispatch<A: WarmupApi + ?Sized>(api: &A, command: &Command) -> Result<()> {
    match command {
        Command::AddAccount(form) => api.create_account(form).await,
        Command::DeleteAccount(id) => api.delete_account(id).await,
        Command::SaveSettings(settings) => api.update_settings(settings).await,
        Command::StartWarmup => api.start_warmup().await,
        Command::StopWarmup => api.stop_warmup().await,
        Command::ClearLogs => clear_logs(api).await,
    }
}

/// Log clearing is exposed either as `POST /logs/clear` or as `DELETE /logs`.
/// The second form is tried only after the first has failed, never both at
/// once.
async fn clear_logs<A: WarmupApi + ?Sized>(api: &A) -> Result<()> {
    match api.clear_logs().await {
        Ok(()) => Ok(()),
        Err(e) => {
            tracing::info!(kind = e.kind().as_str(), error = %e, "Clear form failed, trying DELETE /logs");
            api.delete_logs().await
        }
    }
}
