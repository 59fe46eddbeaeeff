//! Original-to-minted filename registry.
//!
//! Populated while CSS and JS resources are minified, then frozen into a
//! [`RegistrySnapshot`] that the HTML phase reads. Keys are basenames, not
//! paths, so two sources sharing a basename collide and the last one
//! recorded wins.

use std::collections::HashMap;

/// Mapping from original basename to minted basename
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewriteRegistry {
    entries: HashMap<String, String>,
}

impl RewriteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a mapping, returning the minted name it replaced, if any
    pub fn record(&mut self, original: impl Into<String>, minted: impl Into<String>) -> Option<String> {
        self.entries.insert(original.into(), minted.into())
    }

    pub fn lookup(&self, original: &str) -> Option<&str> {
        self.entries.get(original).map(String::as_str)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Freeze the current entries in rewrite order
    pub fn snapshot(&self) -> RegistrySnapshot {
        let mut entries: Vec<(String, String)> = self
            .entries
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        entries.sort_by(|(a, _), (b, _)| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        RegistrySnapshot { entries }
    }
}

/// Immutable view of the registry.
///
/// Entries are ordered longest original first, ties broken lexicographically,
/// so a basename is always tried before any shorter basename that is its
/// suffix.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrySnapshot {
    entries: Vec<(String, String)>,
}

impl RegistrySnapshot {
    pub fn lookup(&self, original: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == original)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_lookup() {
        let mut registry = RewriteRegistry::new();
        assert!(registry.is_empty());

        assert_eq!(registry.record("app.css", "app-abc123.min.css"), None);

        assert_eq!(registry.lookup("app.css"), Some("app-abc123.min.css"));
        assert_eq!(registry.lookup("missing.css"), None);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_record_last_wins() {
        let mut registry = RewriteRegistry::new();
        registry.record("app.js", "app-111111.min.js");

        let previous = registry.record("app.js", "app-222222.min.js");

        assert_eq!(previous, Some("app-111111.min.js".to_string()));
        assert_eq!(registry.lookup("app.js"), Some("app-222222.min.js"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_snapshot_order_longest_first() {
        let mut registry = RewriteRegistry::new();
        registry.record("b.js", "b-1.js");
        registry.record("app.js", "app-2.js");
        registry.record("app.js.map", "map-3.js");
        registry.record("a.js", "a-4.js");

        let snapshot = registry.snapshot();
        let keys: Vec<&str> = snapshot.iter().map(|(k, _)| k).collect();

        assert_eq!(keys, vec!["app.js.map", "app.js", "a.js", "b.js"]);
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut registry = RewriteRegistry::new();
        registry.record("a.css", "a-1.css");
        let snapshot = registry.snapshot();

        registry.record("b.css", "b-2.css");

        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.lookup("a.css"), Some("a-1.css"));
        assert_eq!(snapshot.lookup("b.css"), None);
    }

    #[test]
    fn test_empty_snapshot() {
        let snapshot = RewriteRegistry::new().snapshot();
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.iter().count(), 0);
    }
}
