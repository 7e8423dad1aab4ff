use clap::Subcommand;
use colored::Colorize;
use persona_lib::{NewProfile, Profile, Synchronizer, Update, commands};
use sysexits::ExitCode;

use crate::render;

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List stored profiles
    List,
    /// Apply a new profile and store it
    Add {
        name: String,
        email: String,
        /// Registry URL or nrm alias
        #[arg(short, long)]
        registry: Option<String>,
    },
    /// Switch to a stored profile
    Use {
        name: String,
        /// Pick between stored profiles sharing a name
        #[arg(short, long)]
        email: Option<String>,
    },
    /// Delete a stored profile
    Remove { name: String, email: String },
}

pub fn handle(sync: &Synchronizer, cmd: &Command) -> ExitCode {
    match cmd {
        Command::List => render::finish(&commands::open(sync)),
        Command::Add {
            name,
            email,
            registry,
        } => {
            let new_profile = NewProfile {
                name: name.trim().to_string(),
                email: email.trim().to_string(),
                registry: registry.as_deref().map(str::trim).map(String::from),
            };

            match commands::add(sync, &new_profile) {
                Update::None => {
                    eprintln!("{} name and email must not be empty", "error:".red().bold());
                    ExitCode::Usage
                }
                update => render::finish(&update),
            }
        }
        Command::Use { name, email } => match resolve(sync, name, email.as_deref()) {
            Ok(profile) => render::finish(&commands::switch(sync, &profile)),
            Err(msg) => {
                eprintln!("{} {msg}", "error:".red().bold());
                ExitCode::Usage
            }
        },
        Command::Remove { name, email } => {
            let active = sync.query_active();
            let profile = sync
                .store()
                .find(name, email)
                .unwrap_or_else(|| Profile::new(name, email, None));

            match commands::delete(sync, &profile, &active) {
                Update::Render { summary, .. } => {
                    render::status(&summary);
                    ExitCode::Ok
                }
                update => render::finish(&update),
            }
        }
    }
}

/// Find the stored profile `use` refers to.
fn resolve(sync: &Synchronizer, name: &str, email: Option<&str>) -> Result<Profile, String> {
    if let Some(email) = email {
        return sync
            .store()
            .find(name, email)
            .ok_or_else(|| format!("No stored profile for {name} <{email}>"));
    }

    let mut matches = sync.store().find_by_name(name);
    match matches.len() {
        0 => Err(format!("No stored profile named {name}")),
        1 => matches.pop().ok_or_else(|| format!("No stored profile named {name}")),
        _ => {
            let emails: Vec<_> = matches.iter().map(|p| p.email().as_str()).collect();
            Err(format!(
                "{name} is stored with several emails ({}), pass --email",
                emails.join(", ")
            ))
        }
    }
}
