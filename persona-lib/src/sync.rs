//! Reconciling the stored profiles with what git and npm are currently configured with.

use std::{fmt, sync::Arc};

use derive_more::Display;
use strum::Display as StrumDisplay;
use tracing::{debug, info};

use crate::{
    config::Tools,
    registry::{RegistryKind, classify},
    runner::{Output, Runner, Unknown},
    store::{Profile, ProfileStore},
};

const CURRENT_MARKER: &str = "(current)";

/// Live identity and registry, as reported by the tools right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveState {
    pub name: Output,
    pub email: Output,
    pub registry: Output,
}

impl ActiveState {
    pub fn name(&self) -> &str {
        or_unknown(&self.name)
    }

    pub fn email(&self) -> &str {
        or_unknown(&self.email)
    }

    pub fn registry(&self) -> &str {
        or_unknown(&self.registry)
    }
}

fn or_unknown(output: &Output) -> &str {
    match output {
        Ok(value) => value,
        Err(Unknown) => "unknown",
    }
}

/// The compact status line: who git thinks you are, and where npm downloads from.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
#[display("{name} | {registry}")]
pub struct Summary {
    pub name: String,
    pub registry: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, StrumDisplay)]
pub enum RowAction {
    Switch,
    Delete,
}

/// A stored profile as the picker shows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub profile: Profile,
    pub label: String,
    pub description: String,
    pub current: bool,
}

impl Row {
    fn new(profile: Profile, current: bool) -> Self {
        let mut description = profile.email().clone();
        if let Some(registry) = profile.registry() {
            description.push_str(" · ");
            description.push_str(registry);
        }
        if current {
            description.push(' ');
            description.push_str(CURRENT_MARKER);
        }

        Self {
            label: profile.name().clone(),
            description,
            current,
            profile,
        }
    }

    /// The active profile can be switched to again but not deleted.
    pub fn actions(&self) -> &'static [RowAction] {
        if self.current {
            &[RowAction::Switch]
        } else {
            &[RowAction::Switch, RowAction::Delete]
        }
    }
}

/// Bridges the [`ProfileStore`] and the external tools.
#[derive(Clone)]
pub struct Synchronizer {
    store: ProfileStore,
    runner: Arc<dyn Runner>,
    tools: Tools,
}

impl fmt::Debug for Synchronizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Synchronizer")
            .field("store", &self.store)
            .field("tools", &self.tools)
            .finish_non_exhaustive()
    }
}

impl Synchronizer {
    pub fn new(store: ProfileStore, runner: Arc<dyn Runner>, tools: Tools) -> Self {
        Self {
            store,
            runner,
            tools,
        }
    }

    pub fn store(&self) -> &ProfileStore {
        &self.store
    }

    /// Ask git and npm for the current identity and registry. Each value is queried on its
    /// own and may independently be [`Unknown`].
    pub fn query_active(&self) -> ActiveState {
        ActiveState {
            name: self.git(&["config", "--global", "user.name"]),
            email: self.git(&["config", "--global", "user.email"]),
            registry: self
                .runner
                .run(&self.tools.npm, &["config", "get", "registry"]),
        }
    }

    /// A profile is current when git's identity matches it. The registry plays no part.
    pub fn is_current(profile: &Profile, active: &ActiveState) -> bool {
        matches!((&active.name, &active.email), (Ok(name), Ok(email)) if profile.matches(name, email))
    }

    /// Point git (and npm, if a registry is given) at this identity and remember it.
    ///
    /// Nothing is rolled back if a tool fails; the profile is recorded regardless. Returns
    /// whether the profile was new to the store.
    pub fn apply(&self, name: &str, email: &str, registry: Option<&str>) -> bool {
        self.fire(&self.tools.git, &["config", "--global", "user.name", name]);
        self.fire(&self.tools.git, &["config", "--global", "user.email", email]);

        let registry = registry.map(str::trim).filter(|r| !r.is_empty());
        if let Some(registry) = registry {
            match classify(registry) {
                Some(RegistryKind::Url) => {
                    self.fire(&self.tools.npm, &["config", "set", "registry", registry])
                }
                Some(RegistryKind::Alias) => self.fire(&self.tools.nrm, &["use", registry]),
                None => {}
            }
        }

        let (_, inserted) = self.store.upsert(name, email, registry);
        info!("Applied profile {name} <{email}>");

        inserted
    }

    /// The status line for `active`. A matching stored profile's registry wins over the
    /// live one.
    pub fn summary(&self, active: &ActiveState) -> Summary {
        let stored_registry = self
            .store
            .profiles()
            .into_iter()
            .find(|p| Self::is_current(p, active))
            .and_then(|p| p.registry().map(ToString::to_string));

        Summary {
            name: active.name().to_string(),
            registry: stored_registry.unwrap_or_else(|| active.registry().to_string()),
        }
    }

    /// One row per stored profile, in store order.
    pub fn rows(&self, active: &ActiveState) -> Vec<Row> {
        self.store
            .profiles()
            .into_iter()
            .map(|profile| {
                let current = Self::is_current(&profile, active);
                Row::new(profile, current)
            })
            .collect()
    }

    fn git(&self, args: &[&str]) -> Output {
        self.runner.run(&self.tools.git, args)
    }

    /// Run a command whose output nobody needs.
    fn fire(&self, program: &str, args: &[&str]) {
        if let Err(Unknown) = self.runner.run(program, args) {
            debug!("`{program} {}` gave no output", args.join(" "));
        }
    }

    /// Return a synchronizer over an in-memory store and the given fake tools.
    #[cfg(test)]
    pub(crate) fn mock(runner: Arc<dyn Runner>) -> Self {
        Self::new(ProfileStore::mock(), runner, Tools::default())
    }
}
