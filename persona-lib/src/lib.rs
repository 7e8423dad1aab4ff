//! Core of Persona: a small store of git/npm identities and the engine that keeps it in step
//! with the live tool configuration.

use std::path::PathBuf;

use thiserror::Error;

pub mod commands;
pub mod config;
pub mod fs;
pub mod registry;
pub mod runner;
pub mod store;
pub mod sync;

pub use commands::{NewProfile, Notice, Update};
pub use config::CoreConfig;
pub use runner::{Runner, SystemRunner, Unknown};
pub use store::{FileState, MemoryState, Persistence, Profile, ProfileStore};
pub use sync::{ActiveState, Row, RowAction, Summary, Synchronizer};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to serialize state: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("Could not determine the home directory")]
    NoHome,
}
