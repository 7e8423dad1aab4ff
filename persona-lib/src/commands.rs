//! Handlers for everything a user can do from the picker.
//!
//! Handlers never touch the terminal. They return an [`Update`] describing what the
//! presentation layer should show next.

use tracing::debug;

use crate::{
    store::Profile,
    sync::{ActiveState, Row, Summary, Synchronizer},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Warning(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Update {
    /// Show (or redraw) the picker. `active` is what the rows were computed against.
    Render {
        active: ActiveState,
        rows: Vec<Row>,
        summary: Summary,
    },
    /// Close the picker and refresh the status line
    Status { summary: Summary, notice: Notice },
    /// Tell the user something without changing anything
    Notice(Notice),
    None,
}

/// What the add-profile prompts collected. Empty fields mean a prompt was abandoned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewProfile {
    pub name: String,
    pub email: String,
    pub registry: Option<String>,
}

impl NewProfile {
    fn validate(&self) -> bool {
        !self.name.is_empty() && !self.email.is_empty()
    }
}

/// Open the picker.
pub fn open(sync: &Synchronizer) -> Update {
    let active = sync.query_active();
    render(sync, &active)
}

/// Re-read the tools and redraw. Nothing is changed.
pub fn refresh(sync: &Synchronizer) -> Update {
    open(sync)
}

/// Switch to a stored profile, registry included.
pub fn switch(sync: &Synchronizer, profile: &Profile) -> Update {
    sync.apply(profile.name(), profile.email(), profile.registry());
    switched(sync, profile.name(), profile.email())
}

/// Forget a stored profile and redraw with the already known `active` state.
pub fn delete(sync: &Synchronizer, profile: &Profile, active: &ActiveState) -> Update {
    if Synchronizer::is_current(profile, active) {
        return Update::Notice(Notice::Warning(format!(
            "{profile} is the active profile and can't be deleted"
        )));
    }

    sync.store().remove(profile.name(), profile.email());
    render(sync, active)
}

/// Apply a brand new profile, unless it is already stored.
pub fn add(sync: &Synchronizer, new_profile: &NewProfile) -> Update {
    if !new_profile.validate() {
        debug!("Add profile cancelled");
        return Update::None;
    }

    let NewProfile {
        name,
        email,
        registry,
    } = new_profile;

    if sync.store().exists(name, email) {
        return Update::Notice(Notice::Warning(format!(
            "A profile for {name} <{email}> already exists"
        )));
    }

    sync.apply(name, email, registry.as_deref());
    switched(sync, name, email)
}

fn render(sync: &Synchronizer, active: &ActiveState) -> Update {
    Update::Render {
        active: active.clone(),
        rows: sync.rows(active),
        summary: sync.summary(active),
    }
}

fn switched(sync: &Synchronizer, name: &str, email: &str) -> Update {
    let active = sync.query_active();
    Update::Status {
        summary: sync.summary(&active),
        notice: Notice::Info(format!("Switched to {name} <{email}>")),
    }
}
