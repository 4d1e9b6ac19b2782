use std::collections::HashMap;
use std::sync::RwLock;

/// Handle -> display identity, kept for one run.
///
/// Misses are stored too (as the handle itself), so every handle costs at
/// most one round of remote lookups per process.
#[derive(Debug, Default)]
pub struct IdentityCache {
    entries: RwLock<HashMap<String, String>>,
}

impl IdentityCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, handle: &str) -> Option<String> {
        let entries = self
            .entries
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        entries.get(handle).cloned()
    }

    pub fn insert(&self, handle: &str, identity: &str) {
        let mut entries = self
            .entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        entries.insert(handle.to_string(), identity.to_string());
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_one_entry_per_handle() {
        let cache = IdentityCache::new();
        assert_eq!(cache.len(), 0);

        cache.insert("jdoe", "Jane Doe <jane@example.org>");
        cache.insert("jdoe", "Jane Doe <jane@example.org>");
        cache.insert("ghost", "ghost");

        assert_eq!(cache.len(), 2);
        assert_eq!(
            cache.get("jdoe").as_deref(),
            Some("Jane Doe <jane@example.org>")
        );
        assert_eq!(cache.get("ghost").as_deref(), Some("ghost"));
        assert_eq!(cache.get("JDOE"), None);
    }
}
