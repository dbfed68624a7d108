//! Network actor - runs refreshes and commands in the Tokio runtime

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::error::ApiError;
use crate::messages::{NetworkCommand, NetworkResponse};
use crate::network::api::WarmupApi;
use crate::network::sync::{dispatch, fetch_snapshot};

/// Sends exactly one response per task. If the task ends without reporting
/// (panic, runtime shutdown) the fallback is sent from `Drop`, so the App
/// layer never waits forever on a refresh.
struct ReplyGuard {
    tx: mpsc::UnboundedSender<NetworkResponse>,
    fallback: Option<NetworkResponse>,
}

impl ReplyGuard {
    fn new(tx: mpsc::UnboundedSender<NetworkResponse>, fallback: NetworkResponse) -> Self {
        ReplyGuard {
            tx,
            fallback: Some(fallback),
        }
    }

    fn send(mut self, response: NetworkResponse) {
        self.fallback = None;
        // The App actor may already be gone; nothing to commit into then
        let _ = self.tx.send(response);
    }
}

impl Drop for ReplyGuard {
    fn drop(&mut self) {
        if let Some(fallback) = self.fallback.take() {
            tracing::warn!(id = fallback.id(), "Request task ended without a result");
            let _ = self.tx.send(fallback);
        }
    }
}

/// Network actor that executes refreshes and commands against a [`WarmupApi`]
pub struct NetworkActor<A> {
    api: Arc<A>,
    response_tx: mpsc::UnboundedSender<NetworkResponse>,
    active_requests: JoinSet<()>,
}

impl<A: WarmupApi> NetworkActor<A> {
    pub fn new(api: A, response_tx: mpsc::UnboundedSender<NetworkResponse>) -> Self {
        NetworkActor {
            api: Arc::new(api),
            response_tx,
            active_requests: JoinSet::new(),
        }
    }

    /// Run the network actor message loop
    pub async fn run(mut self, mut cmd_rx: mpsc::UnboundedReceiver<NetworkCommand>) {
        loop {
            tokio::select! {
                biased;

                // Handle incoming commands
                cmd = cmd_rx.recv() => {
                    match cmd {
                        Some(NetworkCommand::Refresh { id }) => self.spawn_refresh(id),

                        Some(NetworkCommand::Dispatch { id, command }) => {
                            let kind = command.kind();
                            let api = self.api.clone();
                            let reply = ReplyGuard::new(
                                self.response_tx.clone(),
                                NetworkResponse::CommandCompleted { id, kind, result: Err(ApiError::Aborted) },
                            );

                            self.active_requests.spawn(async move {
                                let result = dispatch(api.as_ref(), &command).await;
                                tracing::info!(id, operation = kind.as_str(), ok = result.is_ok(), "Command completed");
                                reply.send(NetworkResponse::CommandCompleted { id, kind, result });
                            });
                        }

                        Some(NetworkCommand::Shutdown) | None => {
                            // In-flight requests finish on their own; their
                            // results go nowhere once the App actor is gone
                            self.active_requests.detach_all();
                            break;
                        }
                    }
                }

                // Clean up completed tasks
                Some(joined) = self.active_requests.join_next() => {
                    if let Err(e) = joined {
                        if e.is_panic() {
                            tracing::error!(error = %e, "Request task panicked");
                        }
                    }
                }
            }
        }
    }

    fn spawn_refresh(&mut self, id: u64) {
        let api = self.api.clone();
        let reply = ReplyGuard::new(
            self.response_tx.clone(),
            NetworkResponse::Snapshot { id, result: Err(ApiError::Aborted) },
        );

        self.active_requests.spawn(async move {
            tracing::debug!(id, "Refreshing");
            let result = fetch_snapshot(api.as_ref()).await;
            if let Err(e) = &result {
                tracing::debug!(id, kind = e.kind().as_str(), "Refresh failed");
            }
            reply.send(NetworkResponse::Snapshot { id, result });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiErrorKind;
    use crate::messages::{Command, CommandKind};
    use crate::network::fake::{Endpoint, FakeApi};

    fn spawn(api: FakeApi) -> (
        mpsc::UnboundedSender<NetworkCommand>,
        mpsc::UnboundedReceiver<NetworkResponse>,
    ) {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (resp_tx, resp_rx) = mpsc::unbounded_channel();
        tokio::spawn(NetworkActor::new(api, resp_tx).run(cmd_rx));
        (cmd_tx, resp_rx)
    }

    #[tokio::test]
    async fn test_refresh_reports_snapshot() {
        let (cmd_tx, mut resp_rx) = spawn(FakeApi::with_accounts(2));
        cmd_tx.send(NetworkCommand::Refresh { id: 7 }).unwrap();

        match resp_rx.recv().await {
            Some(NetworkResponse::Snapshot { id: 7, result: Ok(snap) }) => {
                assert_eq!(snap.accounts.len(), 2);
                assert_eq!(snap.logs.len(), 1);
            }
            other => panic!("unexpected response {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_refresh_failure_carries_kind() {
        let api = FakeApi::with_accounts(2);
        api.fail(Endpoint::Status, ApiError::Network("down".into()));
        let (cmd_tx, mut resp_rx) = spawn(api);
        cmd_tx.send(NetworkCommand::Refresh { id: 1 }).unwrap();

        match resp_rx.recv().await {
            Some(NetworkResponse::Snapshot { id: 1, result: Err(e) }) => {
                assert_eq!(e.kind(), ApiErrorKind::Network);
            }
            other => panic!("unexpected response {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_dispatch_reports_command_result() {
        let (cmd_tx, mut resp_rx) = spawn(FakeApi::with_accounts(0));
        cmd_tx
            .send(NetworkCommand::Dispatch { id: 3, command: Command::ClearLogs })
            .unwrap();

        assert_eq!(
            resp_rx.recv().await,
            Some(NetworkResponse::CommandCompleted {
                id: 3,
                kind: CommandKind::ClearLogs,
                result: Ok(()),
            })
        );
    }

    #[tokio::test]
    async fn test_shutdown_closes_response_channel() {
        let (cmd_tx, mut resp_rx) = spawn(FakeApi::with_accounts(0));
        cmd_tx.send(NetworkCommand::Shutdown).unwrap();
        assert_eq!(resp_rx.recv().await, None);
    }

    #[test]
    fn test_reply_guard_sends_fallback_when_dropped() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let guard = ReplyGuard::new(
            tx,
            NetworkResponse::Snapshot { id: 9, result: Err(ApiError::Aborted) },
        );
        drop(guard);
        assert_eq!(
            rx.try_recv().ok(),
            Some(NetworkResponse::Snapshot { id: 9, result: Err(ApiError::Aborted) })
        );
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_reply_guard_sends_once() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let guard = ReplyGuard::new(
            tx,
            NetworkResponse::Snapshot { id: 9, result: Err(ApiError::Aborted) },
        );
        guard.send(NetworkResponse::Snapshot { id: 9, result: Ok(Default::default()) });
        assert!(matches!(
            rx.try_recv(),
            Ok(NetworkResponse::Snapshot { result: Ok(_), .. })
        ));
        assert!(rx.try_recv().is_err());
    }
}
