use strum::{AsRefStr, Display};

/// How a stored registry value is handed to the package manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum RegistryKind {
    /// An absolute `http`/`https` URL, set directly on npm.
    Url,
    /// A symbolic name resolved by `nrm`.
    Alias,
}

/// Classify a registry value. Only the `http://` and `https://` prefixes count as URLs;
/// anything else that isn't blank is an alias.
pub fn classify(value: &str) -> Option<RegistryKind> {
    if value.trim().is_empty() {
        None
    } else if value.starts_with("http://") || value.starts_with("https://") {
        Some(RegistryKind::Url)
    } else {
        Some(RegistryKind::Alias)
    }
}

#[cfg(test)]
mod test {
    use super::{RegistryKind, classify};

    #[test]
    fn test_urls() {
        assert_eq!(
            classify("https://registry.npmmirror.com/"),
            Some(RegistryKind::Url)
        );
        assert_eq!(classify("http://localhost:4873"), Some(RegistryKind::Url));
    }

    #[test]
    fn test_aliases() {
        assert_eq!(classify("taobao"), Some(RegistryKind::Alias));
        // Only http(s) is treated as a URL
        assert_eq!(
            classify("git://example.com/registry"),
            Some(RegistryKind::Alias)
        );
        assert_eq!(classify("HTTPS://EXAMPLE.COM"), Some(RegistryKind::Alias));
    }

    #[test]
    fn test_blank() {
        assert_eq!(classify(""), None);
        assert_eq!(classify("   "), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(RegistryKind::Url.to_string(), "url");
        assert_eq!(RegistryKind::Alias.as_ref(), "alias");
    }
}
