//! Display preferences backed by the key-value store.

use std::cell::RefCell;

use crate::config;
use crate::error::Result;
use crate::models::Theme;
use crate::store::KeyValueStore;

/// Theme preference stored under the `theme` key.
pub struct PreferenceQuery<'a> {
    store: &'a RefCell<KeyValueStore>,
}

impl<'a> PreferenceQuery<'a> {
    pub fn new(store: &'a RefCell<KeyValueStore>) -> Self {
        Self { store }
    }

    /// Saved theme; dark unless light was explicitly chosen.
    pub fn theme(&self) -> Theme {
        match self.store.borrow().get(config::THEME_KEY) {
            Some("light") => Theme::Light,
            _ => Theme::Dark,
        }
    }

    pub fn set_theme(&self, theme: Theme) -> Result<()> {
        self.store
            .borrow_mut()
            .set(config::THEME_KEY, theme.as_str())
    }

    /// Switch between light and dark and return the new theme.
    pub fn toggle_theme(&self) -> Result<Theme> {
        let next = self.theme().toggled();
        self.set_theme(next)?;
        Ok(next)
    }
}
