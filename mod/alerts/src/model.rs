use serde::{Deserialize, Serialize};

/// Notification category. Monitors emit `stock`, `expiry`, and
/// `sanitary_expiry`; finishing a production emits `production`; `general`
/// is for everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Expiry,
    Stock,
    Production,
    General,
    SanitaryExpiry,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Expiry => "expiry",
            Self::Stock => "stock",
            Self::Production => "production",
            Self::General => "general",
            Self::SanitaryExpiry => "sanitary_expiry",
        }
    }
}

/// Notification — one entry of the account's feed. Created by monitors or
/// business events; mutated only to flip the read flag.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// UUID primary key.
    #[serde(default)]
    pub id: String,

    pub title: String,

    pub message: String,

    pub kind: NotificationKind,

    #[serde(default)]
    pub read: bool,

    /// Entity this notification is about (ingredient, label, production).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_wire_names() {
        assert_eq!(
            serde_json::to_string(&NotificationKind::SanitaryExpiry).unwrap(),
            "\"sanitary_expiry\""
        );
        let k: NotificationKind = serde_json::from_str("\"stock\"").unwrap();
        assert_eq!(k, NotificationKind::Stock);
        assert_eq!(k.as_str(), "stock");
    }
}
