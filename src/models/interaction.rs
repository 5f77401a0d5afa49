//! Interaction Model
//!
//! User interaction events recorded by the app. Events are append-only.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// == Interaction Type ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InteractionType {
    ScreenView,
    ProductView,
    ProductClick,
    AddToWishlist,
    RemoveFromWishlist,
    StartTracking,
    StopTracking,
    ShareProduct,
    Search,
    FilterApplied,
    SortChanged,
    NotificationClicked,
    NotificationDismissed,
}

impl InteractionType {
    pub const ALL: [InteractionType; 13] = [
        InteractionType::ScreenView,
        InteractionType::ProductView,
        InteractionType::ProductClick,
        InteractionType::AddToWishlist,
        InteractionType::RemoveFromWishlist,
        InteractionType::StartTracking,
        InteractionType::StopTracking,
        InteractionType::ShareProduct,
        InteractionType::Search,
        InteractionType::FilterApplied,
        InteractionType::SortChanged,
        InteractionType::NotificationClicked,
        InteractionType::NotificationDismissed,
    ];

    /// Types that count as an access of the product they reference.
    pub fn is_product_access(self) -> bool {
        matches!(self, InteractionType::ProductView | InteractionType::ProductClick)
    }
}

// == Interaction Event ==
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionEvent {
    /// Store-assigned sequence id, 0 until appended
    #[serde(default)]
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: InteractionType,
    pub screen_name: String,
    pub action: Option<String>,
    pub product_id: Option<String>,
    /// Time spent, in milliseconds
    pub duration_ms: u64,
    pub timestamp: DateTime<Utc>,
    /// Free-form additional data
    pub metadata: Option<serde_json::Value>,
}

impl InteractionEvent {
    /// Creates an event of `kind` on `screen_name` at `timestamp`.
    pub fn new(kind: InteractionType, screen_name: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: 0,
            kind,
            screen_name: screen_name.into(),
            action: None,
            product_id: None,
            duration_ms: 0,
            timestamp,
            metadata: None,
        }
    }

    pub fn with_product(mut self, product_id: impl Into<String>) -> Self {
        self.product_id = Some(product_id.into());
        self
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    pub fn with_duration_ms(mut self, duration_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }
}
