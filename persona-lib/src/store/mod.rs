//! The persisted list of profiles.
//!
//! The [`ProfileStore`] keeps profiles most-recently-used first, unique by name and email,
//! and never more than [`MAX_PROFILES`] of them. Every mutation writes the whole list back
//! through its [`Persistence`].

use std::sync::Arc;

use parking_lot::RwLock;
use toml::Value;
use tracing::{debug, warn};

mod persistence;
mod profile;

pub use persistence::{FileState, MemoryState, Persistence};
pub use profile::Profile;

/// Key the profile list is persisted under.
pub const STATE_KEY: &str = "profiles";
/// Oldest entries beyond this are dropped.
pub const MAX_PROFILES: usize = 10;

#[derive(Clone, Debug)]
pub struct ProfileStore {
    profiles: Arc<RwLock<Vec<Profile>>>,
    persistence: Arc<dyn Persistence>,
}

impl ProfileStore {
    /// Restore the store from `persistence`.
    pub fn init(persistence: Arc<dyn Persistence>) -> Self {
        let profiles = Self::restore(persistence.as_ref());
        debug!("Restored {} profiles", profiles.len());

        Self {
            profiles: Arc::new(RwLock::new(profiles)),
            persistence,
        }
    }

    /// Read the persisted list. Anything absent or malformed comes back empty.
    pub fn load(&self) -> Vec<Profile> {
        Self::restore(self.persistence.as_ref())
    }

    /// Replace the whole stored list with `list` and persist it. Failures to persist are
    /// logged and otherwise ignored.
    pub fn save(&self, list: &[Profile]) {
        let mut profiles = self.profiles.write();
        *profiles = normalise(list.to_vec());
        self.persist(&profiles);
    }

    /// Snapshot of the current list.
    pub fn profiles(&self) -> Vec<Profile> {
        self.profiles.read().clone()
    }

    /// Insert a profile at the front unless one with the same name and email exists. An
    /// existing entry is left untouched, registry included.
    pub fn upsert(&self, name: &str, email: &str, registry: Option<&str>) -> (Vec<Profile>, bool) {
        let mut profiles = self.profiles.write();

        if profiles.iter().any(|p| p.matches(name, email)) {
            return (profiles.clone(), false);
        }

        profiles.insert(0, Profile::new(name, email, registry));
        if profiles.len() > MAX_PROFILES {
            for evicted in profiles.drain(MAX_PROFILES..) {
                debug!("Evicted profile: {evicted}");
            }
        }

        self.persist(&profiles);
        debug!("Added profile: {name} <{email}>");

        (profiles.clone(), true)
    }

    /// Drop the profile with this name and email, if there is one.
    pub fn remove(&self, name: &str, email: &str) -> Vec<Profile> {
        let mut profiles = self.profiles.write();

        profiles.retain(|p| !p.matches(name, email));
        self.persist(&profiles);
        debug!("Removed profile: {name} <{email}>");

        profiles.clone()
    }

    pub fn exists(&self, name: &str, email: &str) -> bool {
        self.profiles.read().iter().any(|p| p.matches(name, email))
    }

    pub fn find(&self, name: &str, email: &str) -> Option<Profile> {
        self.profiles
            .read()
            .iter()
            .find(|p| p.matches(name, email))
            .cloned()
    }

    /// All stored profiles called `name`, most recent first.
    pub fn find_by_name(&self, name: &str) -> Vec<Profile> {
        self.profiles
            .read()
            .iter()
            .filter(|p| p.name() == name)
            .cloned()
            .collect()
    }

    fn restore(persistence: &dyn Persistence) -> Vec<Profile> {
        let Some(value) = persistence.get(STATE_KEY) else {
            return Vec::new();
        };

        let stored: Vec<Profile> = match value.try_into() {
            Ok(stored) => stored,
            Err(err) => {
                warn!("Ignoring malformed profile list: {err}");
                return Vec::new();
            }
        };

        normalise(stored)
    }

    /// Write `list` through to persistence. Callers hold the write lock.
    fn persist(&self, list: &[Profile]) {
        let value = match Value::try_from(list) {
            Ok(value) => value,
            Err(err) => {
                warn!("Could not serialize profiles: {err}");
                return;
            }
        };

        if let Err(err) = self.persistence.set(STATE_KEY, value) {
            warn!("Could not save profiles: {err}");
        }
    }

    /// Return a store backed by memory only, for use in tests.
    #[cfg(test)]
    pub(crate) fn mock() -> Self {
        Self::init(Arc::new(MemoryState::new()))
    }
}

/// Enforce the store invariants on a list from outside: blank registries become none, the
/// first of any repeated name and email wins, and at most [`MAX_PROFILES`] are kept.
fn normalise(list: Vec<Profile>) -> Vec<Profile> {
    let mut profiles: Vec<Profile> = Vec::with_capacity(list.len());
    for profile in list {
        if !profiles
            .iter()
            .any(|p| p.matches(profile.name(), profile.email()))
        {
            profiles.push(Profile::new(
                profile.name(),
                profile.email(),
                profile.registry(),
            ));
        }
    }
    profiles.truncate(MAX_PROFILES);

    profiles
}
