//! Application constants
//!
//! Centralized location for magic strings and configuration defaults.

use std::time::Duration;

/// Base address used when `WARMUP_API_BASE` is not set
pub const DEFAULT_API_BASE: &str = "http://localhost:5000/api";

/// Environment variable holding the API base address
pub const API_BASE_ENV: &str = "WARMUP_API_BASE";

/// Fixed polling cadence
pub const POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Accounts needed before the scheduler may be started
pub const MIN_ACCOUNTS_TO_START: usize = 2;

/// Placeholder for unset hosts, ports and volumes
pub const PLACEHOLDER: &str = "-";

/// Default SMTP submission port for the add-account draft
pub const DEFAULT_SMTP_PORT: u16 = 587;

/// Default IMAPS port for the add-account draft
pub const DEFAULT_IMAP_PORT: u16 = 993;

/// Default settings draft values
pub const DEFAULT_DAILY_VOLUME: u32 = 2;
pub const DEFAULT_MAX_VOLUME: u32 = 20;

/// Log file written by the binary
pub const LOG_FILE_NAME: &str = "warmup-dashboard.log";

/// Application name
pub const APP_NAME: &str = "Email Warm-Up Dashboard";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
