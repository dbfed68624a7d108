//! # Warm-Up Dashboard
//!
//! A terminal operator dashboard for an email warm-up service.
//!
//! ## Features
//! - Register and remove mailbox accounts
//! - Tune daily / max sending volume
//! - Start and stop the remote scheduler
//! - Rolling activity log with clearing
//!
//! ## Architecture
//! Actor-based with channels:
//! - UI Layer (Ratatui) - synchronous
//! - App Layer (State machine) - owns the committed view and drafts
//! - Network Layer (Tokio runtime) - polls and dispatches against the REST API

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod ui;
pub mod messages;
pub mod app;
pub mod network;

// Re-export commonly used types
pub use config::Config;
pub use error::{ApiError, ApiErrorKind};
pub use models::{Account, AccountForm, LogEntry, Settings, Snapshot, Status};
pub use messages::{Command, UiEvent, NetworkCommand, NetworkResponse, RenderState};
pub use app::{AppState, AppActor};
pub use network::{ApiClient, NetworkActor, Poller, WarmupApi};
