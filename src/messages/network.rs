//! Network messages - communication between App and Network layers

use crate::error::ApiError;
use crate::models::{AccountForm, AccountId, Settings, Snapshot};

/// A single mutating request against the warm-up API
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    AddAccount(AccountForm),
    DeleteAccount(AccountId),
    SaveSettings(Settings),
    StartWarmup,
    StopWarmup,
    /// `POST /logs/clear`, falling back to `DELETE /logs`
    ClearLogs,
}

/// Payload-free tag of a [`Command`], carried back with its result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    AddAccount,
    DeleteAccount,
    SaveSettings,
    StartWarmup,
    StopWarmup,
    ClearLogs,
}

impl CommandKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandKind::AddAccount => "add_account",
            CommandKind::DeleteAccount => "delete_account",
            CommandKind::SaveSettings => "save_settings",
            CommandKind::StartWarmup => "start_warmup",
            CommandKind::StopWarmup => "stop_warmup",
            CommandKind::ClearLogs => "clear_logs",
        }
    }
}

impl Command {
    pub fn kind(&self) -> CommandKind {
        match self {
            Command::AddAccount(_) => CommandKind::AddAccount,
            Command::DeleteAccount(_) => CommandKind::DeleteAccount,
            Command::SaveSettings(_) => CommandKind::SaveSettings,
            Command::StartWarmup => CommandKind::StartWarmup,
            Command::StopWarmup => CommandKind::StopWarmup,
            Command::ClearLogs => CommandKind::ClearLogs,
        }
    }
}

/// Commands sent from App layer to Network layer
#[derive(Debug, Clone, PartialEq)]
pub enum NetworkCommand {
    /// Poll accounts, logs and status concurrently
    Refresh { id: u64 },
    /// Issue one mutating request
    Dispatch { id: u64, command: Command },
    /// Shutdown the network actor
    Shutdown,
}

/// Responses sent from Network layer to App layer
#[derive(Debug, Clone, PartialEq)]
pub enum NetworkResponse {
    /// Outcome of a refresh; `Ok` only when all three reads succeeded
    Snapshot {
        id: u64,
        result: Result<Snapshot, ApiError>,
    },
    /// Outcome of a dispatched command
    CommandCompleted {
        id: u64,
        kind: CommandKind,
        result: Result<(), ApiError>,
    },
}

impl NetworkResponse {
    /// Get the request ID from the response
    pub fn id(&self) -> u64 {
        match self {
            NetworkResponse::Snapshot { id, .. } => *id,
            NetworkResponse::CommandCompleted { id, .. } => *id,
        }
    }
}
