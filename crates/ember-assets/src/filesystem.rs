//! Directory-backed archives.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use tracing::warn;

use ember_common::{EmberError, EmberResult};

use crate::archive::{Archive, ArchiveFactory, FileInfo};
use crate::pattern;
use crate::stream::{FileStream, MemoryStream, SharedStream};

/// An archive rooted at a directory on disk. Filenames are relative paths
/// below the root, with `/` separators.
pub struct FileSystemArchive {
    name: String,
    root: PathBuf,
    read_only: bool,
}

impl FileSystemArchive {
    /// An archive over the directory at `name`.
    #[must_use]
    pub fn new(name: impl Into<String>, read_only: bool) -> Self {
        let name = name.into();
        let root = PathBuf::from(&name);
        Self {
            name,
            root,
            read_only,
        }
    }

    fn full_path(&self, filename: &str) -> PathBuf {
        self.root.join(filename)
    }

    fn walk(&self, dir: &Path, prefix: &str, recursive: bool, dirs: bool, out: &mut Vec<FileInfo>) {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(err) => {
                warn!(dir = %dir.display(), %err, "failed to enumerate directory");
                return;
            }
        };
        for entry in entries.flatten() {
            let file_name = entry.file_name();
            let Some(file_name) = file_name.to_str() else {
                continue;
            };
            let relative = if prefix.is_empty() {
                file_name.to_string()
            } else {
                format!("{prefix}/{file_name}")
            };
            let Ok(file_type) = entry.file_type() else {
                continue;
            };
            if file_type.is_dir() {
                if dirs {
                    out.push(FileInfo::from_path(&self.name, &relative, 0));
                }
                if recursive {
                    self.walk(&entry.path(), &relative, recursive, dirs, out);
                }
            } else if !dirs {
                let size = entry.metadata().map_or(0, |m| m.len());
                out.push(FileInfo::from_path(&self.name, &relative, size));
            }
        }
    }

    fn enumerate(&self, recursive: bool, dirs: bool) -> Vec<FileInfo> {
        let mut out = Vec::new();
        self.walk(&self.root.clone(), "", recursive, dirs, &mut out);
        out
    }
}

impl Archive for FileSystemArchive {
    fn name(&self) -> &str {
        &self.name
    }

    fn archive_type(&self) -> &str {
        "FileSystem"
    }

    fn is_case_sensitive(&self) -> bool {
        true
    }

    fn is_read_only(&self) -> bool {
        self.read_only
    }

    fn open(&self, filename: &str) -> EmberResult<SharedStream> {
        let path = self.full_path(filename);
        if !path.is_file() {
            return Ok(Box::new(MemoryStream::new(filename, Vec::new())));
        }
        let file = fs::File::open(path)?;
        Ok(Box::new(FileStream::open(filename, file)?))
    }

    fn create(&self, filename: &str) -> EmberResult<SharedStream> {
        if self.read_only {
            return Err(EmberError::InvalidState(format!(
                "archive '{}' is read-only",
                self.name
            )));
        }
        let path = self.full_path(filename);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = fs::File::create(path)?;
        Ok(Box::new(FileStream::create(filename, file)))
    }

    fn remove(&self, filename: &str) -> EmberResult<()> {
        if self.read_only {
            return Err(EmberError::InvalidState(format!(
                "archive '{}' is read-only",
                self.name
            )));
        }
        fs::remove_file(self.full_path(filename))?;
        Ok(())
    }

    fn list(&self, recursive: bool, dirs: bool) -> Vec<String> {
        self.enumerate(recursive, dirs)
            .into_iter()
            .map(|info| info.filename)
            .collect()
    }

    fn list_file_info(&self, recursive: bool, dirs: bool) -> Vec<FileInfo> {
        self.enumerate(recursive, dirs)
    }

    fn find(&self, pat: &str, recursive: bool, dirs: bool) -> Vec<String> {
        self.enumerate(recursive, dirs)
            .into_iter()
            .map(|info| info.filename)
            .filter(|name| pattern::matches(pat, name, self.is_case_sensitive()))
            .collect()
    }

    fn find_file_info(&self, pat: &str, recursive: bool, dirs: bool) -> Vec<FileInfo> {
        self.enumerate(recursive, dirs)
            .into_iter()
            .filter(|info| pattern::matches(pat, &info.filename, self.is_case_sensitive()))
            .collect()
    }

    fn exists(&self, filename: &str) -> bool {
        self.full_path(filename).is_file()
    }

    fn modified_time(&self, filename: &str) -> Option<SystemTime> {
        fs::metadata(self.full_path(filename))
            .and_then(|m| m.modified())
            .ok()
    }
}

/// Factory for [`FileSystemArchive`].
pub struct FileSystemArchiveFactory;

impl ArchiveFactory for FileSystemArchiveFactory {
    fn archive_type(&self) -> &str {
        "FileSystem"
    }

    fn create(&self, name: &str, read_only: bool) -> EmberResult<Arc<dyn Archive>> {
        Ok(Arc::new(FileSystemArchive::new(name, read_only)))
    }
}
