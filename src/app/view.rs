//! View derivation - pure projections of the committed server view.
//!
//! Nothing here reads drafts or in-flight requests; every value is computed
//! from the last snapshot that was committed.

use crate::constants::{MIN_ACCOUNTS_TO_START, PLACEHOLDER};
use crate::models::{Account, AccountId, DeliveryStatus, LogEntry, Status};

/// Start is only offered once enough accounts are confirmed server-side
pub fn can_start(accounts: &[Account]) -> bool {
    accounts.len() >= MIN_ACCOUNTS_TO_START
}

/// `host:port`, with a placeholder for either half when unset
pub fn endpoint_label(host: Option<&str>, port: Option<u16>) -> String {
    let host = host.filter(|h| !h.is_empty()).unwrap_or(PLACEHOLDER);
    let port = port
        .filter(|p| *p != 0)
        .map(|p| p.to_string())
        .unwrap_or_else(|| PLACEHOLDER.to_string());
    format!("{}:{}", host, port)
}

/// Password fields are never shown in clear
pub fn mask(secret: &str) -> String {
    "*".repeat(secret.chars().count())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchedulerBadge {
    Active,
    Stopped,
}

impl SchedulerBadge {
    pub fn from_status(status: &Status) -> Self {
        if status.is_active() {
            SchedulerBadge::Active
        } else {
            SchedulerBadge::Stopped
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SchedulerBadge::Active => "Active",
            SchedulerBadge::Stopped => "Stopped",
        }
    }
}

/// Status card values, already formatted
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusCard {
    pub accounts: String,
    pub daily_volume: String,
    pub max_volume: String,
}

impl Default for StatusCard {
    fn default() -> Self {
        StatusCard::from_status(&Status::default())
    }
}

impl StatusCard {
    pub fn from_status(status: &Status) -> Self {
        let or_placeholder = |v: Option<u64>| {
            v.map(|n| n.to_string())
                .unwrap_or_else(|| PLACEHOLDER.to_string())
        };
        StatusCard {
            accounts: status.account_count.unwrap_or(0).to_string(),
            daily_volume: or_placeholder(status.daily_volume),
            max_volume: or_placeholder(status.max_volume),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccountRow {
    pub id: AccountId,
    pub email: String,
    pub smtp: String,
    pub imap: String,
}

impl From<&Account> for AccountRow {
    fn from(account: &Account) -> Self {
        AccountRow {
            id: account.id.clone(),
            email: account.email.clone(),
            smtp: endpoint_label(account.smtp_host.as_deref(), account.smtp_port),
            imap: endpoint_label(account.imap_host.as_deref(), account.imap_port),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogRow {
    pub sender: String,
    pub receiver: String,
    pub status: DeliveryStatus,
    pub time: Option<String>,
}

impl From<&LogEntry> for LogRow {
    fn from(entry: &LogEntry) -> Self {
        LogRow {
            sender: entry.sender.clone(),
            receiver: entry.receiver.clone(),
            status: entry.status.clone(),
            time: entry.display_time(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(id: &str) -> Account {
        Account {
            id: AccountId::new(id),
            email: format!("{}@example.com", id),
            ..Account::default()
        }
    }

    #[test]
    fn test_can_start_threshold() {
        assert!(!can_start(&[]));
        assert!(!can_start(&[account("a")]));
        assert!(can_start(&[account("a"), account("b")]));
        assert!(can_start(&[account("a"), account("b"), account("c")]));
    }

    #[test]
    fn test_endpoint_label_placeholders() {
        assert_eq!(endpoint_label(Some("smtp.x.io"), Some(587)), "smtp.x.io:587");
        assert_eq!(endpoint_label(None, Some(993)), "-:993");
        assert_eq!(endpoint_label(Some(""), None), "-:-");
        assert_eq!(endpoint_label(Some("imap.x.io"), Some(0)), "imap.x.io:-");
    }

    #[test]
    fn test_badge_reads_status_only() {
        assert_eq!(SchedulerBadge::from_status(&Status::default()), SchedulerBadge::Stopped);
        let active = Status {
            scheduler_active: Some(true),
            ..Status::default()
        };
        assert_eq!(SchedulerBadge::from_status(&active).as_str(), "Active");
    }

    #[test]
    fn test_status_card_fallbacks() {
        let card = StatusCard::default();
        assert_eq!(card.accounts, "0");
        assert_eq!(card.daily_volume, "-");
        assert_eq!(card.max_volume, "-");

        let card = StatusCard::from_status(&Status {
            account_count: Some(4),
            daily_volume: Some(10),
            max_volume: Some(50),
            ..Status::default()
        });
        assert_eq!(card.accounts, "4");
        assert_eq!(card.daily_volume, "10");
    }

    #[test]
    fn test_mask() {
        assert_eq!(mask(""), "");
        assert_eq!(mask("pässword"), "********");
    }
}
