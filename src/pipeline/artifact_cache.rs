use crate::error::IoError;
use ahash::AHashMap;
use log::debug;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

/// What a cached entry was loaded from: modification time and length of the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Fingerprint {
    modified: Option<SystemTime>,
    len: u64,
}

impl Fingerprint {
    fn of(path: &Path) -> Result<Self, IoError> {
        let metadata = std::fs::metadata(path)?;
        Ok(Fingerprint {
            // not every platform reports modification times
            modified: metadata.modified().ok(),
            len: metadata.len(),
        })
    }
}

struct Entry<T> {
    fingerprint: Fingerprint,
    value: Arc<T>,
}

/// Caller-owned cache of artifacts loaded from files.
///
/// Entries are keyed by canonical path. Every lookup compares the file's current
/// modification time and length with the ones recorded at load time and reloads
/// on any difference. Entries live until [`ArtifactCache::invalidate`],
/// [`ArtifactCache::clear`] or the cache itself is dropped.
///
/// # Example
/// ```rust
/// use deepcluster::pipeline::ArtifactCache;
/// use std::io::Write;
///
/// let mut file = tempfile::NamedTempFile::new().unwrap();
/// write!(file, "42").unwrap();
///
/// let mut cache: ArtifactCache<String> = ArtifactCache::new();
/// let load = |p: &std::path::Path| -> Result<String, deepcluster::error::IoError> {
///     Ok(std::fs::read_to_string(p)?)
/// };
///
/// let first = cache.get_or_load(file.path(), load).unwrap();
/// let second = cache.get_or_load(file.path(), load).unwrap();
/// assert_eq!(*first, "42");
/// assert!(std::sync::Arc::ptr_eq(&first, &second));
/// assert_eq!((cache.hits(), cache.misses()), (1, 1));
/// ```
pub struct ArtifactCache<T> {
    entries: AHashMap<PathBuf, Entry<T>>,
    hits: u64,
    misses: u64,
}

impl<T> Default for ArtifactCache<T> {
    fn default() -> Self {
        ArtifactCache {
            entries: AHashMap::new(),
            hits: 0,
            misses: 0,
        }
    }
}

impl<T> ArtifactCache<T> {
    /// Creates an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached artifact for `path`, loading it with `load` when absent or stale.
    ///
    /// # Parameters
    ///
    /// - `path` - Artifact file
    /// - `load` - Loader called with the canonical path on a miss
    ///
    /// # Returns
    ///
    /// - `Ok(Arc<T>)` - The shared artifact
    /// - `Err(IoError::StdIoError)` - The file cannot be resolved or inspected
    /// - `Err(IoError)` - Whatever `load` returned; nothing is cached in that case
    pub fn get_or_load<F>(&mut self, path: &Path, load: F) -> Result<Arc<T>, IoError>
    where
        F: FnOnce(&Path) -> Result<T, IoError>,
    {
        let key = path.canonicalize()?;
        let fingerprint = Fingerprint::of(&key)?;

        if let Some(entry) = self.entries.get(&key) {
            if entry.fingerprint == fingerprint {
                self.hits += 1;
                debug!("artifact cache hit for {}", key.display());
                return Ok(Arc::clone(&entry.value));
            }
            debug!("artifact {} changed on disk, reloading", key.display());
        }

        self.misses += 1;
        let value = Arc::new(load(&key)?);
        self.entries.insert(
            key,
            Entry {
                fingerprint,
                value: Arc::clone(&value),
            },
        );

        Ok(value)
    }

    /// Drops the entry for `path`. Returns `true` if there was one.
    pub fn invalidate(&mut self, path: &Path) -> bool {
        let key = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        self.entries.remove(&key).is_some()
    }

    /// Drops every entry. Hit and miss counters are kept.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Returns `true` if an entry exists for `path`, stale or not
    pub fn contains(&self, path: &Path) -> bool {
        path.canonicalize()
            .map(|key| self.entries.contains_key(&key))
            .unwrap_or(false)
    }

    /// Number of cached entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is cached
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Lookups answered from the cache
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// Lookups that called the loader
    pub fn misses(&self) -> u64 {
        self.misses
    }
}
