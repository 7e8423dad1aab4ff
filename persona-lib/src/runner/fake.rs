use std::collections::HashMap;

use parking_lot::Mutex;

use crate::runner::{Output, Runner, Unknown};

/// Scripted stand-in for git, npm and nrm.
#[derive(Debug, Default)]
pub(crate) struct FakeTools {
    state: Mutex<FakeState>,
}

#[derive(Debug, Default)]
struct FakeState {
    git: HashMap<String, String>,
    registry: Option<String>,
    calls: Vec<String>,
    offline: bool,
}

impl FakeTools {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_identity(self, name: &str, email: &str) -> Self {
        {
            let mut state = self.state.lock();
            state.git.insert("user.name".into(), name.into());
            state.git.insert("user.email".into(), email.into());
        }
        self
    }

    pub fn with_registry(self, registry: &str) -> Self {
        self.state.lock().registry = Some(registry.into());
        self
    }

    /// Every command fails, as if none of the tools were installed.
    pub fn offline() -> Self {
        let tools = Self::default();
        tools.state.lock().offline = true;
        tools
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().calls.clone()
    }

    pub fn registry(&self) -> Option<String> {
        self.state.lock().registry.clone()
    }
}

impl Runner for FakeTools {
    fn run(&self, program: &str, args: &[&str]) -> Output {
        let mut state = self.state.lock();
        state.calls.push(format!("{program} {}", args.join(" ")));

        if state.offline {
            return Err(Unknown);
        }

        match (program, args) {
            ("git", ["config", "--global", key]) => state.git.get(*key).cloned().ok_or(Unknown),
            ("git", ["config", "--global", key, value]) => {
                state.git.insert((*key).to_string(), (*value).to_string());
                Err(Unknown)
            }
            ("npm", ["config", "get", "registry"]) => state.registry.clone().ok_or(Unknown),
            ("npm", ["config", "set", "registry", url]) => {
                state.registry = Some((*url).to_string());
                Err(Unknown)
            }
            ("nrm", ["use", alias]) => {
                let url = match *alias {
                    "npm" => "https://registry.npmjs.org/",
                    "taobao" => "https://registry.npmmirror.com/",
                    "yarn" => "https://registry.yarnpkg.com/",
                    _ => return Err(Unknown),
                };
                state.registry = Some(url.to_string());
                Ok(format!("Registry has been set to: {url}"))
            }
            _ => Err(Unknown),
        }
    }
}
