use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Spirit shown on the dashboard before the user has a history.
pub const DEFAULT_FAVORITE_SPIRIT: &str = "Vodka";

/// Dashboard counters. `last_active` is stored as RFC 3339 text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub total_favorites: u32,
    pub cocktails_tried: u32,
    pub favorite_spirit: String,
    pub total_sessions: u32,
    pub last_active: DateTime<Utc>,
}

impl Default for UserStats {
    fn default() -> Self {
        Self {
            total_favorites: 0,
            cocktails_tried: 0,
            favorite_spirit: DEFAULT_FAVORITE_SPIRIT.to_string(),
            total_sessions: 0,
            last_active: Utc::now(),
        }
    }
}

impl UserStats {
    /// Shallow merge: only fields present in `update` change.
    pub fn merge(&mut self, update: &StatsUpdate) {
        if let Some(v) = update.total_favorites {
            self.total_favorites = v;
        }
        if let Some(v) = update.cocktails_tried {
            self.cocktails_tried = v;
        }
        if let Some(ref v) = update.favorite_spirit {
            self.favorite_spirit = v.clone();
        }
        if let Some(v) = update.total_sessions {
            self.total_sessions = v;
        }
        if let Some(v) = update.last_active {
            self.last_active = v;
        }
    }

    pub fn merged(&self, update: &StatsUpdate) -> Self {
        let mut stats = self.clone();
        stats.merge(update);
        stats
    }

    fn inactive_minutes(&self) -> i64 {
        (Utc::now() - self.last_active).num_minutes()
    }

    /// Relative "last active" label for the dashboard
    pub fn last_active_display(&self) -> String {
        let minutes = self.inactive_minutes();
        if minutes < 1 {
            // Also covers clock skew
            "just now".to_string()
        } else if minutes < 60 {
            format!("{}m ago", minutes)
        } else if minutes < 1440 {
            let hours = minutes / 60;
            if minutes % 60 >= 30 {
                format!("{}h ago", hours + 1)
            } else {
                format!("{}h ago", hours)
            }
        } else {
            let days = minutes / 1440;
            if (minutes % 1440) / 60 >= 12 {
                format!("{}d ago", days + 1)
            } else {
                format!("{}d ago", days)
            }
        }
    }
}

/// Partial stats update. `None` fields are left untouched by a merge.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_favorites: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cocktails_tried: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favorite_spirit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_sessions: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_active: Option<DateTime<Utc>>,
}

impl StatsUpdate {
    pub fn total_favorites(count: u32) -> Self {
        Self {
            total_favorites: Some(count),
            ..Default::default()
        }
    }

    pub fn cocktails_tried(count: u32) -> Self {
        Self {
            cocktails_tried: Some(count),
            ..Default::default()
        }
    }

    pub fn favorite_spirit(spirit: impl Into<String>) -> Self {
        Self {
            favorite_spirit: Some(spirit.into()),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == StatsUpdate::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_defaults() {
        let stats = UserStats::default();
        assert_eq!(stats.total_favorites, 0);
        assert_eq!(stats.cocktails_tried, 0);
        assert_eq!(stats.favorite_spirit, "Vodka");
        assert_eq!(stats.total_sessions, 0);
        assert!(stats.inactive_minutes() <= 1);
    }

    #[test]
    fn test_merge_leaves_unspecified_fields() {
        let stored = UserStats {
            total_favorites: 3,
            cocktails_tried: 5,
            favorite_spirit: "Rum".to_string(),
            total_sessions: 2,
            last_active: Utc::now(),
        };
        let merged = stored.merged(&StatsUpdate::cocktails_tried(6));
        assert_eq!(merged.total_favorites, 3);
        assert_eq!(merged.cocktails_tried, 6);
        assert_eq!(merged.favorite_spirit, "Rum");
        assert_eq!(merged.total_sessions, 2);
        assert_eq!(merged.last_active, stored.last_active);
    }

    #[test]
    fn test_timestamp_is_text() {
        let stats = UserStats::default();
        let value = serde_json::to_value(&stats).expect("Failed to serialize");
        let text = value["lastActive"].as_str().expect("lastActive should be a string");
        assert!(DateTime::parse_from_rfc3339(text).is_ok());
    }

    #[test]
    fn test_malformed_timestamp_rejected() {
        let json = r#"{"totalFavorites":1,"cocktailsTried":0,"favoriteSpirit":"Gin","totalSessions":1,"lastActive":"yesterday"}"#;
        assert!(serde_json::from_str::<UserStats>(json).is_err());
    }

    #[test]
    fn test_last_active_display() {
        let mut stats = UserStats::default();
        assert_eq!(stats.last_active_display(), "just now");

        stats.last_active = Utc::now() - Duration::minutes(5);
        assert_eq!(stats.last_active_display(), "5m ago");

        stats.last_active = Utc::now() - Duration::minutes(95);
        assert_eq!(stats.last_active_display(), "2h ago");

        stats.last_active = Utc::now() - Duration::hours(30);
        assert_eq!(stats.last_active_display(), "1d ago");
    }

    #[test]
    fn test_update_is_empty() {
        assert!(StatsUpdate::default().is_empty());
        assert!(!StatsUpdate::favorite_spirit("Gin").is_empty());
    }
}
