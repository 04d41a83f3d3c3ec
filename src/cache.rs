//! Session-scoped cache of selected files
//!
//! Keys are derived from name, size, and last-modified time (see
//! [`FileHandle::key`]). Entries are inserted on selection and removed on
//! successful upload; there is no other eviction, so the cache grows with
//! failed or never-uploaded selections for the lifetime of the instance.

use crate::file::FileHandle;
use dashmap::DashMap;

/// Key/value store mapping derived keys to selected files
#[derive(Debug, Default)]
pub struct FileCache {
    entries: DashMap<String, FileHandle>,
}

impl FileCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a file under its derived key, returning the key.
    /// An existing entry for the same key is overwritten.
    pub fn insert(&self, file: FileHandle) -> String {
        let key = file.key();
        self.entries.insert(key.clone(), file);
        key
    }

    /// Look up a file by derived key
    pub fn get(&self, key: &str) -> Option<FileHandle> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    /// Remove a file by derived key
    pub fn remove(&self, key: &str) -> Option<FileHandle> {
        self.entries.remove(key).map(|(_, file)| file)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn file(name: &str, content: &'static [u8]) -> FileHandle {
        FileHandle::new(
            name,
            content,
            Utc.timestamp_millis_opt(1_700_000_000_000).unwrap(),
        )
    }

    #[test]
    fn test_insert_and_get() {
        let cache = FileCache::new();
        let key = cache.insert(file("a.txt", b"abc"));

        let cached = cache.get(&key).unwrap();
        assert_eq!(cached.name(), "a.txt");
        assert_eq!(cache.len(), 1);
        assert!(cache.get("missing").is_none());
    }

    #[test]
    fn test_reselection_overwrites() {
        let cache = FileCache::new();
        let first = cache.insert(file("a.txt", b"abc"));
        let second = cache.insert(file("a.txt", b"xyz"));

        // same name/size/mtime, same key, one entry
        assert_eq!(first, second);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&first).unwrap().data().as_ref(), b"xyz");
    }

    #[test]
    fn test_remove() {
        let cache = FileCache::new();
        let key = cache.insert(file("a.txt", b"abc"));

        assert!(cache.remove(&key).is_some());
        assert!(cache.remove(&key).is_none());
        assert!(cache.is_empty());
    }
}
