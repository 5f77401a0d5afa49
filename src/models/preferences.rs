//! User Preferences Model
//!
//! Display, notification and privacy settings of the single local user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Id of the implicit local user.
pub const DEFAULT_USER_ID: &str = "default";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    Auto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Density {
    Compact,
    #[default]
    Normal,
    Comfortable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    #[default]
    Grid,
    List,
}

// == Notification Toggles ==
/// Per-category notification switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPreferences {
    pub price_drops: bool,
    pub deals: bool,
    pub shipping: bool,
    pub recommendations: bool,
    pub marketing: bool,
}

impl Default for NotificationPreferences {
    fn default() -> Self {
        Self {
            price_drops: true,
            deals: true,
            shipping: true,
            recommendations: false,
            marketing: false,
        }
    }
}

// == User Preferences ==
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPreferences {
    pub user_id: String,
    pub theme: Theme,
    pub font_size: u8,
    pub density: Density,
    pub layout: Layout,
    pub language: String,
    pub currency: String,
    pub notifications: NotificationPreferences,

    /// Do-not-disturb window, hours of day in [0, 24)
    pub dnd_enabled: bool,
    pub dnd_start_hour: u32,
    pub dnd_end_hour: u32,

    pub enable_analytics: bool,
    pub enable_personalization: bool,
    pub share_data_with_cloud: bool,

    pub last_updated_at: DateTime<Utc>,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            user_id: DEFAULT_USER_ID.to_string(),
            theme: Theme::default(),
            font_size: 14,
            density: Density::default(),
            layout: Layout::default(),
            language: "en".to_string(),
            currency: crate::models::DEFAULT_CURRENCY.to_string(),
            notifications: NotificationPreferences::default(),
            dnd_enabled: false,
            dnd_start_hour: 22,
            dnd_end_hour: 8,
            enable_analytics: true,
            enable_personalization: true,
            share_data_with_cloud: true,
            last_updated_at: Utc::now(),
        }
    }
}

impl UserPreferences {
    // == Quiet Hours ==
    /// Whether `hour` falls in the do-not-disturb window.
    ///
    /// The window is half-open, `[start, end)`, and wraps past midnight when
    /// `start > end`. Equal bounds mean an empty window.
    pub fn in_quiet_hours(&self, hour: u32) -> bool {
        if !self.dnd_enabled {
            return false;
        }
        let (start, end) = (self.dnd_start_hour, self.dnd_end_hour);
        if start <= end {
            hour >= start && hour < end
        } else {
            hour >= start || hour < end
        }
    }

    /// Whether a price drop alert may be delivered at `hour`.
    pub fn allows_price_drop_alert(&self, hour: u32) -> bool {
        self.notifications.price_drops && !self.in_quiet_hours(hour)
    }
}
