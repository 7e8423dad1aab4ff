use derive_more::Display;
use getset::Getters;
use serde::{Deserialize, Serialize};

/// A stored identity: what git should call the user, and optionally which registry npm
/// should download from.
///
/// Profiles are immutable. Two profiles are the same entry in the store when their name and
/// email match, regardless of registry.
#[derive(Debug, Clone, PartialEq, Eq, Display, Getters, Serialize, Deserialize)]
#[display("{name} <{email}>")]
pub struct Profile {
    #[getset(get = "pub")]
    name: String,
    #[getset(get = "pub")]
    email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    registry: Option<String>,
}

impl Profile {
    /// The registry is trimmed, and a blank one is stored as no registry at all.
    pub fn new(name: &str, email: &str, registry: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            email: email.to_string(),
            registry: registry
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .map(ToString::to_string),
        }
    }

    pub fn registry(&self) -> Option<&str> {
        self.registry.as_deref()
    }

    /// Whether this profile has the given identity key.
    pub fn matches(&self, name: &str, email: &str) -> bool {
        self.name == name && self.email == email
    }
}

#[cfg(test)]
mod test {
    use super::Profile;

    #[test]
    fn test_blank_registry_is_none() {
        assert_eq!(Profile::new("A", "a@x", Some("  ")).registry(), None);
        assert_eq!(
            Profile::new("A", "a@x", Some("taobao")).registry(),
            Some("taobao")
        );
    }

    #[test]
    fn test_registry_is_trimmed() {
        assert_eq!(
            Profile::new("A", "a@x", Some("  https://x/ \n")).registry(),
            Some("https://x/")
        );
        assert_eq!(Profile::new("A", "a@x", Some("\t")).registry(), None);
    }

    #[test]
    fn test_matches_ignores_registry() {
        let profile = Profile::new("A", "a@x", Some("taobao"));

        assert!(profile.matches("A", "a@x"));
        assert!(!profile.matches("A", "b@x"));
        assert!(!profile.matches("B", "a@x"));
    }

    #[test]
    fn test_display() {
        assert_eq!(
            Profile::new("Alice", "alice@x.com", None).to_string(),
            "Alice <alice@x.com>"
        );
    }
}
