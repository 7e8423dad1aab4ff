//! Running the external tools.
//!
//! A [`Runner`] never fails loudly: anything that keeps a command from producing output
//! collapses into the [`Unknown`] sentinel, which callers treat as "no data".

use std::process::Command;

use thiserror::Error;
use tracing::debug;

#[cfg(test)]
pub(crate) mod fake;

/// Sentinel for a command that failed, could not be started or printed nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unknown")]
pub struct Unknown;

/// Trimmed stdout of a command, or [`Unknown`].
pub type Output = std::result::Result<String, Unknown>;

pub trait Runner: Send + Sync {
    fn run(&self, program: &str, args: &[&str]) -> Output;
}

/// Runs commands as child processes of the current one.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl Runner for SystemRunner {
    fn run(&self, program: &str, args: &[&str]) -> Output {
        let output = Command::new(program).args(args).output().map_err(|err| {
            debug!("Failed to start `{program}`: {err}");
            Unknown
        })?;

        if !output.status.success() {
            debug!("`{program} {}` exited with {}", args.join(" "), output.status);
            return Err(Unknown);
        }

        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if stdout.is_empty() {
            Err(Unknown)
        } else {
            Ok(stdout)
        }
    }
}

#[cfg(test)]
mod test {
    use super::{Runner, SystemRunner, Unknown};

    #[test]
    fn test_missing_program_is_unknown() {
        assert_eq!(
            SystemRunner.run("persona-definitely-not-a-program", &[]),
            Err(Unknown)
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_output_is_trimmed() {
        assert_eq!(
            SystemRunner.run("echo", &["  https://registry.npmjs.org/  "]),
            Ok("https://registry.npmjs.org/".to_string())
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_empty_output_is_unknown() {
        assert_eq!(SystemRunner.run("true", &[]), Err(Unknown));
    }

    #[cfg(unix)]
    #[test]
    fn test_failure_is_unknown() {
        assert_eq!(SystemRunner.run("false", &[]), Err(Unknown));
    }
}
