//! The archive abstraction and its registry.
//!
//! An [`Archive`] is a named collection of files behind a uniform query and
//! open interface. Backends register an [`ArchiveFactory`] with the
//! [`ArchiveManager`], which caches loaded archives by name.

use std::sync::Arc;
use std::time::SystemTime;

use ahash::AHashMap;
use parking_lot::Mutex;
use tracing::debug;

use ember_common::{EmberError, EmberResult};

use crate::stream::SharedStream;

/// Metadata for one file inside an archive.
#[derive(Debug, Clone)]
pub struct FileInfo {
    /// Name of the archive the file lives in.
    pub archive_name: String,
    /// Full relative path within the archive.
    pub filename: String,
    /// Path component of `filename` (empty for top-level files).
    pub path: String,
    /// Final component of `filename`.
    pub basename: String,
    /// Size in bytes as stored.
    pub compressed_size: u64,
    /// Size in bytes once read.
    pub uncompressed_size: u64,
}

impl FileInfo {
    /// Builds a `FileInfo` by splitting `filename` at its last `/`.
    #[must_use]
    pub fn from_path(archive_name: &str, filename: &str, size: u64) -> Self {
        let (path, basename) = match filename.rfind('/') {
            Some(i) => (&filename[..=i], &filename[i + 1..]),
            None => ("", filename),
        };
        Self {
            archive_name: archive_name.to_string(),
            filename: filename.to_string(),
            path: path.to_string(),
            basename: basename.to_string(),
            compressed_size: size,
            uncompressed_size: size,
        }
    }
}

/// A named collection of files.
///
/// Queries never fail: a name that is not present simply does not appear in
/// listings, and [`Archive::exists`] returns `false`. Only I/O faults
/// surface as errors.
pub trait Archive: Send + Sync {
    /// Archive name (for filesystem archives, the root path).
    fn name(&self) -> &str;

    /// Backend type tag, e.g. `"FileSystem"`.
    fn archive_type(&self) -> &str;

    /// Whether filenames are matched case-sensitively.
    fn is_case_sensitive(&self) -> bool;

    /// Whether [`Archive::create`] and [`Archive::remove`] are refused.
    fn is_read_only(&self) -> bool {
        true
    }

    /// Opens a file for reading. A missing file yields an empty stream;
    /// only genuine I/O faults are errors.
    fn open(&self, filename: &str) -> EmberResult<SharedStream>;

    /// Creates (or truncates) a file, returning a writable stream.
    fn create(&self, _filename: &str) -> EmberResult<SharedStream> {
        Err(EmberError::InvalidState(format!(
            "archive '{}' is read-only",
            self.name()
        )))
    }

    /// Deletes a file.
    fn remove(&self, _filename: &str) -> EmberResult<()> {
        Err(EmberError::InvalidState(format!(
            "archive '{}' is read-only",
            self.name()
        )))
    }

    /// All filenames, optionally recursing into subdirectories and
    /// optionally restricted to directories themselves.
    fn list(&self, recursive: bool, dirs: bool) -> Vec<String>;

    /// Like [`Archive::list`] but with full metadata.
    fn list_file_info(&self, recursive: bool, dirs: bool) -> Vec<FileInfo>;

    /// Filenames matching `pattern` (see [`crate::pattern::matches`]).
    fn find(&self, pattern: &str, recursive: bool, dirs: bool) -> Vec<String>;

    /// Like [`Archive::find`] but with full metadata.
    fn find_file_info(&self, pattern: &str, recursive: bool, dirs: bool) -> Vec<FileInfo>;

    /// Whether the named file exists.
    fn exists(&self, filename: &str) -> bool;

    /// Last modification time of the named file, if known.
    fn modified_time(&self, filename: &str) -> Option<SystemTime>;
}

/// Creates archives of one backend type.
pub trait ArchiveFactory: Send + Sync {
    /// The type tag this factory handles.
    fn archive_type(&self) -> &str;

    /// Instantiates an archive for `name`.
    fn create(&self, name: &str, read_only: bool) -> EmberResult<Arc<dyn Archive>>;
}

/// Registry of archive factories plus a cache of loaded archives.
pub struct ArchiveManager {
    factories: Mutex<AHashMap<String, Box<dyn ArchiveFactory>>>,
    archives: Mutex<AHashMap<String, Arc<dyn Archive>>>,
}

impl Default for ArchiveManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ArchiveManager {
    /// An empty manager with the built-in backends registered.
    #[must_use]
    pub fn new() -> Self {
        let manager = Self {
            factories: Mutex::new(AHashMap::new()),
            archives: Mutex::new(AHashMap::new()),
        };
        manager.add_factory(Box::new(crate::filesystem::FileSystemArchiveFactory));
        manager.add_factory(Box::new(crate::memory::MemoryArchiveFactory));
        manager
    }

    /// Registers a backend. A factory of the same type tag is replaced.
    pub fn add_factory(&self, factory: Box<dyn ArchiveFactory>) {
        debug!(archive_type = factory.archive_type(), "registering archive factory");
        self.factories
            .lock()
            .insert(factory.archive_type().to_string(), factory);
    }

    /// Loads (or returns the cached) archive `name` of `archive_type`.
    pub fn load(
        &self,
        name: &str,
        archive_type: &str,
        read_only: bool,
    ) -> EmberResult<Arc<dyn Archive>> {
        if let Some(existing) = self.archives.lock().get(name) {
            return Ok(Arc::clone(existing));
        }
        let archive = {
            let factories = self.factories.lock();
            let factory = factories.get(archive_type).ok_or_else(|| {
                EmberError::ItemNotFound(format!(
                    "no archive factory registered for type '{archive_type}'"
                ))
            })?;
            factory.create(name, read_only)?
        };
        debug!(name, archive_type, "loaded archive");
        self.archives
            .lock()
            .insert(name.to_string(), Arc::clone(&archive));
        Ok(archive)
    }

    /// Inserts a pre-built archive into the cache under its own name.
    pub fn add_archive(&self, archive: Arc<dyn Archive>) {
        self.archives
            .lock()
            .insert(archive.name().to_string(), archive);
    }

    /// Drops the named archive from the cache.
    pub fn unload(&self, name: &str) -> EmberResult<()> {
        self.archives
            .lock()
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| EmberError::ItemNotFound(format!("archive '{name}' is not loaded")))
    }

    /// The cached archive with this name, if loaded.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<dyn Archive>> {
        self.archives.lock().get(name).map(Arc::clone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryArchive;

    #[test]
    fn test_load_caches_by_name() {
        let manager = ArchiveManager::new();
        let a = manager.load("mem:a", "Memory", false).expect("load");
        let b = manager.load("mem:a", "Memory", false).expect("load");
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_unknown_factory_rejected() {
        let manager = ArchiveManager::new();
        assert!(matches!(
            manager.load("x", "Zip", true),
            Err(EmberError::ItemNotFound(_))
        ));
    }

    #[test]
    fn test_prebuilt_archive_found_before_factory() {
        let manager = ArchiveManager::new();
        let archive = Arc::new(MemoryArchive::new("mem:seeded", false));
        archive.add_file("a.txt", b"hello".to_vec());
        manager.add_archive(archive);

        let loaded = manager.load("mem:seeded", "Memory", false).expect("load");
        assert!(loaded.exists("a.txt"));
    }

    #[test]
    fn test_unload_removes_from_cache() {
        let manager = ArchiveManager::new();
        manager.load("mem:gone", "Memory", false).expect("load");
        manager.unload("mem:gone").expect("unload");
        assert!(manager.get("mem:gone").is_none());
        assert!(manager.unload("mem:gone").is_err());
    }

    #[test]
    fn test_file_info_path_split() {
        let info = FileInfo::from_path("arc", "models/ship/hull.mesh", 42);
        assert_eq!(info.path, "models/ship/");
        assert_eq!(info.basename, "hull.mesh");
        assert_eq!(info.uncompressed_size, 42);

        let flat = FileInfo::from_path("arc", "readme.txt", 1);
        assert_eq!(flat.path, "");
        assert_eq!(flat.basename, "readme.txt");
    }
}
