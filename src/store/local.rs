//! Local persistence through eframe's key-value storage.
//!
//! Unreadable entries are logged and treated as absent so a corrupt value
//! never keeps the editor from starting.

use eframe::Storage;

use crate::constants::{DRAFT_KEY, TEMPLATES_KEY, USER_KEY};
use crate::types::{AppUser, LabelConfig, SavedTemplate};

/// The stored working configuration, merged over the defaults.
pub fn load_draft(storage: &dyn Storage) -> Option<LabelConfig> {
    let json = non_empty(storage, DRAFT_KEY)?;
    match LabelConfig::from_json(&json) {
        Ok(config) => Some(config),
        Err(err) => {
            log::error!("Failed to load draft: {err}");
            None
        }
    }
}

/// Writes the working configuration.
pub fn save_draft(storage: &mut dyn Storage, config: &LabelConfig) {
    match serde_json::to_string(config) {
        Ok(json) => storage.set_string(DRAFT_KEY, json),
        Err(err) => log::error!("Failed to serialize draft: {err}"),
    }
}

/// The locally mirrored template list.
pub fn load_templates(storage: &dyn Storage) -> Option<Vec<SavedTemplate>> {
    let json = non_empty(storage, TEMPLATES_KEY)?;
    match serde_json::from_str(&json) {
        Ok(templates) => Some(templates),
        Err(err) => {
            log::error!("Failed to load templates: {err}");
            None
        }
    }
}

/// Writes the template list mirror.
pub fn save_templates(storage: &mut dyn Storage, templates: &[SavedTemplate]) {
    match serde_json::to_string(templates) {
        Ok(json) => storage.set_string(TEMPLATES_KEY, json),
        Err(err) => log::error!("Failed to serialize templates: {err}"),
    }
}

/// The cached identity, if someone is signed in.
pub fn load_user(storage: &dyn Storage) -> Option<AppUser> {
    let json = non_empty(storage, USER_KEY)?;
    match serde_json::from_str(&json) {
        Ok(user) => Some(user),
        Err(err) => {
            log::error!("Failed to load user: {err}");
            None
        }
    }
}

/// Writes the identity, or clears it when `user` is `None`.
///
/// The storage has no delete operation, so a cleared key holds an empty string.
pub fn save_user(storage: &mut dyn Storage, user: Option<&AppUser>) {
    match user {
        Some(user) => match serde_json::to_string(user) {
            Ok(json) => storage.set_string(USER_KEY, json),
            Err(err) => log::error!("Failed to serialize user: {err}"),
        },
        None => storage.set_string(USER_KEY, String::new()),
    }
}

fn non_empty(storage: &dyn Storage, key: &str) -> Option<String> {
    storage
        .get_string(key)
        .filter(|value| !value.trim().is_empty())
}

/// Storage kept in memory, for tests.
#[cfg(test)]
#[derive(Default)]
pub(crate) struct MemoryStorage {
    pub(crate) values: std::collections::HashMap<String, String>,
}

#[cfg(test)]
impl Storage for MemoryStorage {
    fn get_string(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set_string(&mut self, key: &str, value: String) {
        self.values.insert(key.to_string(), value);
    }

    fn flush(&mut self) {}
}
