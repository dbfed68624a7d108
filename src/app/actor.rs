//! App actor - message loop processing UI events, poll ticks and network responses

use tokio::sync::mpsc;

use crate::app::state::AppState;
use crate::messages::{NetworkCommand, NetworkResponse, RenderState, UiEvent};
use crate::network::poller::{PollTick, PollerHandle};

/// App actor that owns the view-state
pub struct AppActor {
    state: AppState,
    network_tx: mpsc::UnboundedSender<NetworkCommand>,
    render_tx: mpsc::UnboundedSender<RenderState>,
    poller: Option<PollerHandle>,
}

impl AppActor {
    pub fn new(
        network_tx: mpsc::UnboundedSender<NetworkCommand>,
        render_tx: mpsc::UnboundedSender<RenderState>,
    ) -> Self {
        AppActor {
            state: AppState::new(),
            network_tx,
            render_tx,
            poller: None,
        }
    }

    /// Attach the poller so it is stopped together with this actor
    pub fn with_poller(mut self, poller: PollerHandle) -> Self {
        self.poller = Some(poller);
        self
    }

    /// Run the actor message loop
    pub async fn run(
        mut self,
        mut ui_rx: mpsc::UnboundedReceiver<UiEvent>,
        mut tick_rx: mpsc::UnboundedReceiver<PollTick>,
        mut net_rx: mpsc::UnboundedReceiver<NetworkResponse>,
    ) {
        // Send initial render state
        let _ = self.render_tx.send(self.state.to_render_state());

        loop {
            tokio::select! {
                Some(event) = ui_rx.recv() => {
                    if self.handle_ui_event(event) {
                        break;
                    }
                }
                Some(PollTick) = tick_rx.recv() => {
                    let cmd = self.state.begin_refresh();
                    self.send(cmd);
                }
                Some(response) = net_rx.recv() => {
                    if let Some(cmd) = self.state.handle_response(response) {
                        self.send(cmd);
                    }
                }
                else => break,
            }
            let _ = self.render_tx.send(self.state.to_render_state());
        }

        self.shutdown().await;
    }

    fn send(&self, cmd: NetworkCommand) {
        let _ = self.network_tx.send(cmd);
    }

    /// Stop the timer first so no refresh is issued after teardown
    async fn shutdown(&mut self) {
        if let Some(poller) = self.poller.take() {
            poller.stop().await;
        }
        self.send(NetworkCommand::Shutdown);
        tracing::info!("App actor stopped");
    }

    /// Handle a UI event, returns true if quit was requested
    fn handle_ui_event(&mut self, event: UiEvent) -> bool {
        match event {
            // Panel navigation
            UiEvent::NextPanel => self.state.next_panel(),
            UiEvent::PrevPanel => self.state.prev_panel(),
            UiEvent::NextItem => self.state.next_item(),
            UiEvent::PrevItem => self.state.prev_item(),

            // Input editing
            UiEvent::StartEditing => self.state.start_editing(),
            UiEvent::StopEditing => self.state.stop_editing(),
            UiEvent::CharInput(c) => self.state.enter_char(c),
            UiEvent::Backspace => self.state.delete_char(),
            UiEvent::ToggleTls => self.state.toggle_tls(),

            // Dispatch
            UiEvent::Refresh => {
                let cmd = self.state.begin_refresh();
                self.send(cmd);
            }
            UiEvent::StartWarmup => {
                if let Some(cmd) = self.state.start_warmup() {
                    self.send(cmd);
                }
            }
            UiEvent::StopWarmup => {
                let cmd = self.state.stop_warmup();
                self.send(cmd);
            }
            UiEvent::AddAccount => {
                if let Some(cmd) = self.state.add_account() {
                    self.send(cmd);
                }
            }
            UiEvent::DeleteAccount => {
                if let Some(cmd) = self.state.delete_selected_account() {
                    self.send(cmd);
                }
            }
            UiEvent::SaveSettings => {
                if let Some(cmd) = self.state.save_settings() {
                    self.send(cmd);
                }
            }
            UiEvent::ClearLogs => {
                let cmd = self.state.clear_logs();
                self.send(cmd);
            }

            // Popups
            UiEvent::ToggleHelp => self.state.toggle_help(),
            UiEvent::CloseHelp => self.state.close_help(),

            // System
            UiEvent::Quit => return true,
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::{Command, CommandKind};
    use crate::models::{Account, AccountId, Snapshot};

    struct Harness {
        ui_tx: mpsc::UnboundedSender<UiEvent>,
        tick_tx: mpsc::UnboundedSender<PollTick>,
        resp_tx: mpsc::UnboundedSender<NetworkResponse>,
        net_rx: mpsc::UnboundedReceiver<NetworkCommand>,
        render_rx: mpsc::UnboundedReceiver<RenderState>,
        task: tokio::task::JoinHandle<()>,
    }

    fn spawn_actor() -> Harness {
        let (ui_tx, ui_rx) = mpsc::unbounded_channel();
        let (tick_tx, tick_rx) = mpsc::unbounded_channel();
        let (resp_tx, resp_rx) = mpsc::unbounded_channel();
        let (net_tx, net_rx) = mpsc::unbounded_channel();
        let (render_tx, render_rx) = mpsc::unbounded_channel();
        let actor = AppActor::new(net_tx, render_tx);
        let task = tokio::spawn(actor.run(ui_rx, tick_rx, resp_rx));
        Harness { ui_tx, tick_tx, resp_tx, net_rx, render_rx, task }
    }

    fn accounts(n: usize) -> Vec<Account> {
        (0..n)
            .map(|i| Account {
                id: AccountId::new(i.to_string()),
                ..Account::default()
            })
            .collect()
    }

    #[tokio::test]
    async fn test_tick_issues_refresh_and_commit_renders() {
        let mut h = spawn_actor();
        h.tick_tx.send(PollTick).unwrap();

        let id = match h.net_rx.recv().await {
            Some(NetworkCommand::Refresh { id }) => id,
            other => panic!("expected refresh, got {:?}", other),
        };

        h.resp_tx
            .send(NetworkResponse::Snapshot {
                id,
                result: Ok(Snapshot {
                    accounts: accounts(2),
                    ..Snapshot::default()
                }),
            })
            .unwrap();

        let mut last = None;
        while let Some(state) = h.render_rx.recv().await {
            if state.accounts.len() == 2 {
                last = Some(state);
                break;
            }
        }
        let state = last.expect("render with committed accounts");
        assert!(state.can_start);
        assert!(!state.is_loading);

        h.ui_tx.send(UiEvent::Quit).unwrap();
        h.task.await.unwrap();
    }

    #[tokio::test]
    async fn test_successful_command_triggers_refresh() {
        let mut h = spawn_actor();
        h.ui_tx.send(UiEvent::StopWarmup).unwrap();

        let id = match h.net_rx.recv().await {
            Some(NetworkCommand::Dispatch { id, command: Command::StopWarmup }) => id,
            other => panic!("expected stop dispatch, got {:?}", other),
        };
        h.resp_tx
            .send(NetworkResponse::CommandCompleted {
                id,
                kind: CommandKind::StopWarmup,
                result: Ok(()),
            })
            .unwrap();

        assert!(matches!(h.net_rx.recv().await, Some(NetworkCommand::Refresh { .. })));

        h.ui_tx.send(UiEvent::Quit).unwrap();
        h.task.await.unwrap();
        assert_eq!(h.net_rx.recv().await, Some(NetworkCommand::Shutdown));
    }

    #[tokio::test]
    async fn test_start_blocked_without_committed_accounts() {
        let mut h = spawn_actor();
        h.ui_tx.send(UiEvent::StartWarmup).unwrap();
        h.ui_tx.send(UiEvent::Quit).unwrap();
        h.task.await.unwrap();

        // Only the shutdown notice reaches the network layer
        assert_eq!(h.net_rx.recv().await, Some(NetworkCommand::Shutdown));
    }
}
