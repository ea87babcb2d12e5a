//! Preference store port: persistence for the user's preference document.

use std::future::Future;

use locmode_domain::error::LocModeError;

use crate::preferences::Preferences;

/// Where the user's saved [`Preferences`] live.
pub trait PreferenceStore {
    /// Load the saved preferences. A store with nothing saved yields
    /// [`Preferences::default`].
    fn load(&self) -> impl Future<Output = Result<Preferences, LocModeError>> + Send;

    /// Replace the saved preferences.
    fn save(&self, preferences: Preferences)
    -> impl Future<Output = Result<(), LocModeError>> + Send;
}
