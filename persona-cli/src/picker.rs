use std::fmt;

use colored::Colorize;
use inquire::{InquireError, Select, Text};
use persona_lib::{NewProfile, Row, RowAction, Synchronizer, Update, commands};
use sysexits::ExitCode;

use crate::render;

const PAGE_SIZE: usize = 12;

#[derive(Clone)]
enum Entry {
    Profile(Row),
    Add,
    Refresh,
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Profile(row) => write!(f, "{}  {}", row.label, row.description.dimmed()),
            Self::Add => write!(f, "{}", "+ Add new profile".cyan()),
            Self::Refresh => write!(f, "{}", "↻ Refresh".cyan()),
        }
    }
}

/// The interactive manager: switch, delete, add and refresh until a profile is applied or
/// the picker is dismissed.
pub fn open(sync: &Synchronizer) -> ExitCode {
    let mut update = commands::open(sync);

    loop {
        let (active, rows, summary) = match update {
            Update::Render {
                active,
                rows,
                summary,
            } => (active, rows, summary),
            other => return render::finish(&other),
        };

        render::status(&summary);

        let mut entries: Vec<Entry> = rows.into_iter().map(Entry::Profile).collect();
        entries.push(Entry::Add);
        entries.push(Entry::Refresh);

        let choice = match Select::new("Switch profile", entries)
            .with_page_size(PAGE_SIZE)
            .prompt()
        {
            Ok(choice) => choice,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                return ExitCode::Ok;
            }
            Err(err) => return prompt_failed(&err),
        };

        update = match choice {
            Entry::Profile(row) => match choose_action(&row) {
                Ok(Some(RowAction::Switch)) => commands::switch(sync, &row.profile),
                Ok(Some(RowAction::Delete)) => commands::delete(sync, &row.profile, &active),
                Ok(None) => commands::refresh(sync),
                Err(err) => return prompt_failed(&err),
            },
            Entry::Add => match prompt_new_profile() {
                Ok(Some(new_profile)) => commands::add(sync, &new_profile),
                Ok(None) => Update::None,
                Err(err) => return prompt_failed(&err),
            },
            Entry::Refresh => commands::refresh(sync),
        };
    }
}

/// Only the add-profile prompts.
pub fn configure(sync: &Synchronizer) -> ExitCode {
    match prompt_new_profile() {
        Ok(Some(new_profile)) => render::finish(&commands::add(sync, &new_profile)),
        Ok(None) => ExitCode::Ok,
        Err(err) => prompt_failed(&err),
    }
}

/// The current profile can only be switched to, so there is nothing to ask.
fn choose_action(row: &Row) -> Result<Option<RowAction>, InquireError> {
    match row.actions() {
        [only] => Ok(Some(*only)),
        actions => Select::new(&row.profile.to_string(), actions.to_vec()).prompt_skippable(),
    }
}

/// Ask for a name, email and optional registry. Abandoning a prompt, or leaving the name
/// or email empty, yields `None`.
fn prompt_new_profile() -> Result<Option<NewProfile>, InquireError> {
    let Some(name) = ask(Text::new("Name:").with_help_message("git user.name"))? else {
        return Ok(None);
    };
    let Some(email) = ask(Text::new("Email:").with_help_message("git user.email"))? else {
        return Ok(None);
    };
    // Empty input skips the registry, abandoning the prompt abandons the whole profile
    let registry = match Text::new("Registry:")
        .with_help_message("optional, a registry URL or an nrm alias")
        .prompt_skippable()
    {
        Ok(Some(input)) => Some(input.trim().to_string()).filter(|s| !s.is_empty()),
        Ok(None) | Err(InquireError::OperationInterrupted) => return Ok(None),
        Err(err) => return Err(err),
    };

    Ok(Some(NewProfile {
        name,
        email,
        registry,
    }))
}

/// Trimmed, non-empty input. Escape and Ctrl-C count as no input.
fn ask(text: Text<'_>) -> Result<Option<String>, InquireError> {
    match text.prompt_skippable() {
        Ok(input) => Ok(input
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())),
        Err(InquireError::OperationInterrupted) => Ok(None),
        Err(err) => Err(err),
    }
}

fn prompt_failed(err: &InquireError) -> ExitCode {
    eprintln!("{} {err}", "error:".red().bold());
    ExitCode::IoErr
}
