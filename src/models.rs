use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::constants::{
    DEFAULT_DAILY_VOLUME, DEFAULT_IMAP_PORT, DEFAULT_MAX_VOLUME, DEFAULT_SMTP_PORT,
};

/// Server-assigned identifier. Accepted as a JSON string or number, kept as text.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ResourceId(String);

impl ResourceId {
    pub fn new(id: impl Into<String>) -> Self {
        ResourceId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ResourceId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(ResourceId(loose_text(deserializer)?.unwrap_or_default()))
    }
}

/// A scalar the server may send as text or as a number. Anything else is
/// accepted and dropped, so a display-only field never fails a poll.
#[derive(Deserialize)]
#[serde(untagged)]
enum Loose {
    Text(String),
    Number(serde_json::Number),
    Other(serde::de::IgnoredAny),
}

fn loose_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Loose::deserialize(deserializer)? {
        Loose::Text(s) => Some(s),
        Loose::Number(n) => Some(n.to_string()),
        Loose::Other(_) => None,
    })
}

/// Like [`loose_text`], with an empty string for anything unusable
fn loose_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(loose_text(deserializer)?.unwrap_or_default())
}

fn loose_u64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
    Ok(match Loose::deserialize(deserializer)? {
        Loose::Text(s) => s.trim().parse().ok(),
        Loose::Number(n) => n.as_u64(),
        Loose::Other(_) => None,
    })
}

fn loose_port<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u16>, D::Error> {
    Ok(loose_u64(deserializer)?.and_then(|p| u16::try_from(p).ok()))
}

fn loose_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<bool>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Flag(bool),
        Other(serde::de::IgnoredAny),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Flag(b) => Some(b),
        Raw::Other(_) => None,
    })
}

pub type AccountId = ResourceId;

/// A registered mailbox as reported by the server. The credential is never
/// part of this projection.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Account {
    #[serde(default)]
    pub id: AccountId,
    #[serde(default, deserialize_with = "loose_string")]
    pub email: String,
    #[serde(default, deserialize_with = "loose_text")]
    pub smtp_host: Option<String>,
    #[serde(default, deserialize_with = "loose_port")]
    pub smtp_port: Option<u16>,
    #[serde(default, deserialize_with = "loose_text")]
    pub imap_host: Option<String>,
    #[serde(default, deserialize_with = "loose_port")]
    pub imap_port: Option<u16>,
    #[serde(default, deserialize_with = "loose_bool")]
    pub use_tls: Option<bool>,
}

/// Delivery outcome of a warm-up message
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum DeliveryStatus {
    Sent,
    Failed,
    /// Any status the server reports that the dashboard has no name for
    Other(String),
    #[default]
    Unknown,
}

impl DeliveryStatus {
    pub fn as_str(&self) -> &str {
        match self {
            DeliveryStatus::Sent => "sent",
            DeliveryStatus::Failed => "failed",
            DeliveryStatus::Other(s) => s,
            DeliveryStatus::Unknown => "unknown",
        }
    }

    pub fn is_sent(&self) -> bool {
        matches!(self, DeliveryStatus::Sent)
    }
}

impl From<String> for DeliveryStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "sent" => DeliveryStatus::Sent,
            "failed" => DeliveryStatus::Failed,
            "" => DeliveryStatus::Unknown,
            _ => DeliveryStatus::Other(s),
        }
    }
}

impl<'de> Deserialize<'de> for DeliveryStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(loose_text(deserializer)?
            .map(DeliveryStatus::from)
            .unwrap_or_default())
    }
}

/// One line of the server's append-only activity log
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct LogEntry {
    #[serde(default)]
    pub id: ResourceId,
    #[serde(default, deserialize_with = "loose_string")]
    pub sender: String,
    #[serde(default, deserialize_with = "loose_string")]
    pub receiver: String,
    #[serde(default)]
    pub status: DeliveryStatus,
    /// Raw server timestamp, text or epoch milliseconds; see [`LogEntry::display_time`]
    #[serde(default, deserialize_with = "loose_text")]
    pub timestamp: Option<String>,
}

impl LogEntry {
    /// `HH:MM:SS` for RFC 3339 or epoch-millisecond timestamps (UTC for
    /// the latter), otherwise the raw text
    pub fn display_time(&self) -> Option<String> {
        let raw = self.timestamp.as_deref()?;
        if let Ok(ts) = chrono::DateTime::parse_from_rfc3339(raw) {
            return Some(ts.format("%H:%M:%S").to_string());
        }
        let from_millis = raw
            .parse::<i64>()
            .ok()
            .and_then(chrono::DateTime::<chrono::Utc>::from_timestamp_millis);
        match from_millis {
            Some(ts) => Some(ts.format("%H:%M:%S").to_string()),
            None => Some(raw.to_string()),
        }
    }
}

/// Scheduler snapshot. Not addressable on its own; replaced on every commit.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Status {
    #[serde(deserialize_with = "loose_bool")]
    pub scheduler_active: Option<bool>,
    #[serde(deserialize_with = "loose_u64")]
    pub account_count: Option<u64>,
    #[serde(deserialize_with = "loose_u64")]
    pub daily_volume: Option<u64>,
    #[serde(deserialize_with = "loose_u64")]
    pub max_volume: Option<u64>,
}

impl Status {
    pub fn is_active(&self) -> bool {
        self.scheduler_active.unwrap_or(false)
    }
}

/// The three polled resources, committed together or not at all
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Snapshot {
    pub accounts: Vec<Account>,
    pub logs: Vec<LogEntry>,
    pub status: Status,
}

/// Draft for creating an account
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct AccountForm {
    pub email: String,
    pub password: String,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub imap_host: String,
    pub imap_port: u16,
    pub use_tls: bool,
}

impl Default for AccountForm {
    fn default() -> Self {
        AccountForm {
            email: String::new(),
            password: String::new(),
            smtp_host: String::new(),
            smtp_port: DEFAULT_SMTP_PORT,
            imap_host: String::new(),
            imap_port: DEFAULT_IMAP_PORT,
            use_tls: true,
        }
    }
}

impl AccountForm {
    pub fn is_submittable(&self) -> bool {
        !self.email.trim().is_empty()
    }
}

impl fmt::Debug for AccountForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountForm")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("imap_host", &self.imap_host)
            .field("imap_port", &self.imap_port)
            .field("use_tls", &self.use_tls)
            .finish()
    }
}

/// Volume settings draft, only sent on an explicit save
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub daily_volume: u32,
    pub max_volume: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            daily_volume: DEFAULT_DAILY_VOLUME,
            max_volume: DEFAULT_MAX_VOLUME,
        }
    }
}

impl Settings {
    pub fn is_valid(&self) -> bool {
        self.daily_volume >= 1 && self.max_volume >= 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_tolerates_missing_and_null_fields() {
        let json = r#"[{"id": 7, "email": null}, {"id": "abc", "email": "a@b.io", "smtp_port": 587}]"#;
        let accounts: Vec<Account> = serde_json::from_str(json).unwrap();
        assert_eq!(accounts[0].id.as_str(), "7");
        assert_eq!(accounts[0].email, "");
        assert_eq!(accounts[0].smtp_host, None);
        assert_eq!(accounts[1].id.as_str(), "abc");
        assert_eq!(accounts[1].smtp_port, Some(587));
    }

    #[test]
    fn test_account_with_odd_field_types_still_decodes() {
        let json = r#"[
            {"id": 1, "email": "a@b.io", "smtp_port": "587", "imap_port": " 993 "},
            {"id": 2, "email": "c@d.io", "smtp_host": 42, "smtp_port": 70000, "imap_port": {"n": 1}, "use_tls": "yes"}
        ]"#;
        let accounts: Vec<Account> = serde_json::from_str(json).unwrap();
        assert_eq!(accounts[0].smtp_port, Some(587));
        assert_eq!(accounts[0].imap_port, Some(993));
        assert_eq!(accounts[1].smtp_host.as_deref(), Some("42"));
        assert_eq!(accounts[1].smtp_port, None);
        assert_eq!(accounts[1].imap_port, None);
        assert_eq!(accounts[1].use_tls, None);
        assert_eq!(accounts[1].email, "c@d.io");
    }

    #[test]
    fn test_log_entry_with_numeric_timestamp() {
        let json = r#"[
            {"id": 1, "sender": "a@x.io", "receiver": "b@x.io", "status": "sent", "timestamp": 1717000000000},
            {"id": 2, "status": "sent", "timestamp": ["not", "a", "time"]}
        ]"#;
        let logs: Vec<LogEntry> = serde_json::from_str(json).unwrap();
        assert_eq!(logs[0].timestamp.as_deref(), Some("1717000000000"));
        // 2024-05-29T16:26:40Z
        assert_eq!(logs[0].display_time().as_deref(), Some("16:26:40"));
        assert_eq!(logs[1].timestamp, None);
        assert!(logs[1].status.is_sent());
    }

    #[test]
    fn test_status_with_string_counts() {
        let status: Status = serde_json::from_str(
            r#"{"schedulerActive": "on", "accountCount": "3", "dailyVolume": null, "maxVolume": -1}"#,
        )
        .unwrap();
        assert!(!status.is_active());
        assert_eq!(status.account_count, Some(3));
        assert_eq!(status.daily_volume, None);
        assert_eq!(status.max_volume, None);
    }

    #[test]
    fn test_account_ignores_credential_field() {
        let json = r#"{"id": 1, "email": "a@b.io", "password": "hunter2"}"#;
        let account: Account = serde_json::from_str(json).unwrap();
        assert!(!format!("{:?}", account).contains("hunter2"));
    }

    #[test]
    fn test_log_entry_status() {
        let json = r#"[
            {"id": 1, "sender": "a@x.io", "receiver": "b@x.io", "status": "sent"},
            {"id": 2, "sender": "a@x.io", "receiver": "b@x.io", "status": "failed"},
            {"id": 3, "status": "bounced"},
            {"id": 4, "status": null},
            {"id": 5, "sender": {"name": "x"}, "status": 3}
        ]"#;
        let logs: Vec<LogEntry> = serde_json::from_str(json).unwrap();
        assert!(logs[0].status.is_sent());
        assert_eq!(logs[1].status, DeliveryStatus::Failed);
        assert_eq!(logs[2].status.as_str(), "bounced");
        assert_eq!(logs[3].status, DeliveryStatus::Unknown);
        assert_eq!(logs[3].sender, "");
        assert_eq!(logs[4].sender, "");
        assert_eq!(logs[4].status.as_str(), "3");
    }

    #[test]
    fn test_log_display_time() {
        let mut entry = LogEntry {
            timestamp: Some("2024-03-01T09:15:30Z".into()),
            ..LogEntry::default()
        };
        assert_eq!(entry.display_time().as_deref(), Some("09:15:30"));

        entry.timestamp = Some("yesterday".into());
        assert_eq!(entry.display_time().as_deref(), Some("yesterday"));

        entry.timestamp = None;
        assert_eq!(entry.display_time(), None);
    }

    #[test]
    fn test_status_camel_case_and_empty_object() {
        let status: Status = serde_json::from_str(
            r#"{"schedulerActive": true, "accountCount": 3, "dailyVolume": 5, "maxVolume": 40}"#,
        )
        .unwrap();
        assert!(status.is_active());
        assert_eq!(status.account_count, Some(3));

        let empty: Status = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, Status::default());
        assert!(!empty.is_active());
    }

    #[test]
    fn test_account_form_defaults() {
        let form = AccountForm::default();
        assert_eq!(form.email, "");
        assert_eq!(form.password, "");
        assert_eq!(form.smtp_host, "");
        assert_eq!(form.smtp_port, 587);
        assert_eq!(form.imap_host, "");
        assert_eq!(form.imap_port, 993);
        assert!(form.use_tls);
        assert!(!form.is_submittable());
    }

    #[test]
    fn test_account_form_wire_shape_and_redacted_debug() {
        let form = AccountForm {
            email: "ops@example.com".into(),
            password: "s3cret".into(),
            ..AccountForm::default()
        };
        let value = serde_json::to_value(&form).unwrap();
        assert_eq!(value["smtp_port"], 587);
        assert_eq!(value["password"], "s3cret");
        assert_eq!(value["use_tls"], true);
        assert!(!format!("{:?}", form).contains("s3cret"));
    }

    #[test]
    fn test_settings_wire_shape_and_validation() {
        let settings = Settings::default();
        assert_eq!(
            serde_json::to_value(settings).unwrap(),
            serde_json::json!({"dailyVolume": 2, "maxVolume": 20})
        );
        assert!(settings.is_valid());
        assert!(!Settings { daily_volume: 0, max_volume: 5 }.is_valid());
        assert!(!Settings { daily_volume: 5, max_volume: 0 }.is_valid());
    }
}
