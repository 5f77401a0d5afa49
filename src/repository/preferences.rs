//! Preferences Repository
//!
//! Preferences of the single implicit user.

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::{NotificationPreferences, Theme, UserPreferences, DEFAULT_USER_ID};
use crate::store::EntryStore;

#[derive(Debug)]
pub struct PreferencesRepository<S> {
    preferences: S,
}

impl<S> PreferencesRepository<S>
where
    S: EntryStore<UserPreferences>,
{
    /// Creates a repository over the given preferences store.
    pub fn new(preferences: S) -> Self {
        Self { preferences }
    }

    /// Stored preferences, or the defaults when none were saved yet.
    pub fn get(&self) -> Result<UserPreferences> {
        Ok(self
            .preferences
            .get_by_id(DEFAULT_USER_ID)?
            .unwrap_or_default())
    }

    /// Stores `preferences` under the default user id.
    pub fn save(&mut self, preferences: UserPreferences) -> Result<()> {
        let preferences = UserPreferences {
            user_id: DEFAULT_USER_ID.to_string(),
            ..preferences
        };
        Ok(self.preferences.insert_or_replace(preferences)?)
    }

    /// Changes the theme and bumps `last_updated_at`.
    pub fn update_theme(&mut self, theme: Theme, now: DateTime<Utc>) -> Result<UserPreferences> {
        self.modify(now, |p| p.theme = theme)
    }

    /// Replaces the notification toggles and bumps `last_updated_at`.
    pub fn update_notifications(
        &mut self,
        notifications: NotificationPreferences,
        now: DateTime<Utc>,
    ) -> Result<UserPreferences> {
        self.modify(now, |p| p.notifications = notifications)
    }

    fn modify<F>(&mut self, now: DateTime<Utc>, apply: F) -> Result<UserPreferences>
    where
        F: FnOnce(&mut UserPreferences),
    {
        let mut preferences = self.get()?;
        apply(&mut preferences);
        preferences.last_updated_at = now;
        self.save(preferences.clone())?;
        Ok(preferences)
    }
}
