//! In-memory archives, mostly useful for generated content and tests.

use std::sync::Arc;
use std::time::SystemTime;

use ahash::AHashMap;
use parking_lot::RwLock;

use ember_common::{EmberError, EmberResult};

use crate::archive::{Archive, ArchiveFactory, FileInfo};
use crate::pattern;
use crate::stream::{DataStream, MemoryStream, SharedStream};

struct MemoryFile {
    data: Arc<Vec<u8>>,
    modified: SystemTime,
}

type FileMap = Arc<RwLock<AHashMap<String, MemoryFile>>>;

/// An archive whose files live entirely in a map.
pub struct MemoryArchive {
    name: String,
    files: FileMap,
    read_only: bool,
}

impl MemoryArchive {
    /// An empty in-memory archive.
    #[must_use]
    pub fn new(name: impl Into<String>, read_only: bool) -> Self {
        Self {
            name: name.into(),
            files: Arc::new(RwLock::new(AHashMap::new())),
            read_only,
        }
    }

    /// Inserts (or replaces) a file, bypassing the read-only flag. Intended
    /// for seeding content before the archive is handed out.
    pub fn add_file(&self, filename: impl Into<String>, data: Vec<u8>) {
        self.files.write().insert(
            filename.into(),
            MemoryFile {
                data: Arc::new(data),
                modified: SystemTime::now(),
            },
        );
    }

    fn snapshot(&self) -> Vec<FileInfo> {
        self.files
            .read()
            .iter()
            .map(|(name, file)| FileInfo::from_path(&self.name, name, file.data.len() as u64))
            .collect()
    }
}

impl Archive for MemoryArchive {
    fn name(&self) -> &str {
        &self.name
    }

    fn archive_type(&self) -> &str {
        "Memory"
    }

    fn is_case_sensitive(&self) -> bool {
        true
    }

    fn is_read_only(&self) -> bool {
        self.read_only
    }

    fn open(&self, filename: &str) -> EmberResult<SharedStream> {
        let data = self
            .files
            .read()
            .get(filename)
            .map_or_else(Vec::new, |file| file.data.as_ref().clone());
        Ok(Box::new(MemoryStream::new(filename, data)))
    }

    fn create(&self, filename: &str) -> EmberResult<SharedStream> {
        if self.read_only {
            return Err(EmberError::InvalidState(format!(
                "archive '{}' is read-only",
                self.name
            )));
        }
        Ok(Box::new(MemoryWriteStream {
            name: filename.to_string(),
            buffer: MemoryStream::writable(filename),
            files: Arc::clone(&self.files),
            flushed: false,
        }))
    }

    fn remove(&self, filename: &str) -> EmberResult<()> {
        if self.read_only {
            return Err(EmberError::InvalidState(format!(
                "archive '{}' is read-only",
                self.name
            )));
        }
        self.files
            .write()
            .remove(filename)
            .map(|_| ())
            .ok_or_else(|| EmberError::ItemNotFound(format!("'{filename}' is not in the archive")))
    }

    fn list(&self, _recursive: bool, dirs: bool) -> Vec<String> {
        if dirs {
            return Vec::new();
        }
        self.files.read().keys().cloned().collect()
    }

    fn list_file_info(&self, _recursive: bool, dirs: bool) -> Vec<FileInfo> {
        if dirs {
            return Vec::new();
        }
        self.snapshot()
    }

    fn find(&self, pat: &str, _recursive: bool, dirs: bool) -> Vec<String> {
        if dirs {
            return Vec::new();
        }
        self.files
            .read()
            .keys()
            .filter(|name| pattern::matches(pat, name, true))
            .cloned()
            .collect()
    }

    fn find_file_info(&self, pat: &str, recursive: bool, dirs: bool) -> Vec<FileInfo> {
        if dirs {
            return Vec::new();
        }
        self.list_file_info(recursive, dirs)
            .into_iter()
            .filter(|info| pattern::matches(pat, &info.filename, true))
            .collect()
    }

    fn exists(&self, filename: &str) -> bool {
        self.files.read().contains_key(filename)
    }

    fn modified_time(&self, filename: &str) -> Option<SystemTime> {
        self.files.read().get(filename).map(|file| file.modified)
    }
}

/// Writable stream that commits its buffer back into the archive map when
/// closed (or dropped).
struct MemoryWriteStream {
    name: String,
    buffer: MemoryStream,
    files: FileMap,
    flushed: bool,
}

impl MemoryWriteStream {
    fn flush_to_archive(&mut self) {
        if self.flushed {
            return;
        }
        self.flushed = true;
        self.files.write().insert(
            self.name.clone(),
            MemoryFile {
                data: Arc::new(self.buffer.bytes().to_vec()),
                modified: SystemTime::now(),
            },
        );
    }
}

impl DataStream for MemoryWriteStream {
    fn name(&self) -> &str {
        &self.name
    }

    fn read(&mut self, buf: &mut [u8]) -> EmberResult<usize> {
        self.buffer.read(buf)
    }

    fn write(&mut self, buf: &[u8]) -> EmberResult<usize> {
        self.buffer.write(buf)
    }

    fn is_writable(&self) -> bool {
        true
    }

    fn seek(&mut self, pos: u64) -> EmberResult<()> {
        self.buffer.seek(pos)
    }

    fn tell(&self) -> u64 {
        self.buffer.tell()
    }

    fn len(&self) -> u64 {
        self.buffer.len()
    }

    fn close(&mut self) {
        self.flush_to_archive();
    }
}

impl Drop for MemoryWriteStream {
    fn drop(&mut self) {
        self.flush_to_archive();
    }
}

/// Factory for [`MemoryArchive`].
pub struct MemoryArchiveFactory;

impl ArchiveFactory for MemoryArchiveFactory {
    fn archive_type(&self) -> &str {
        "Memory"
    }

    fn create(&self, name: &str, read_only: bool) -> EmberResult<Arc<dyn Archive>> {
        Ok(Arc::new(MemoryArchive::new(name, read_only)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_files_are_readable() {
        let archive = MemoryArchive::new("mem", true);
        archive.add_file("a.cfg", b"alpha".to_vec());
        archive.add_file("b.cfg", b"beta".to_vec());

        assert!(archive.exists("a.cfg"));
        let mut stream = archive.open("a.cfg").expect("open");
        assert_eq!(stream.read_to_end().expect("read"), b"alpha");
    }

    #[test]
    fn test_create_commits_on_close() {
        let archive = MemoryArchive::new("mem", false);
        {
            let mut stream = archive.create("new.txt").expect("create");
            stream.write(b"payload").expect("write");
            stream.close();
        }
        let mut reader = archive.open("new.txt").expect("open");
        assert_eq!(reader.read_to_end().expect("read"), b"payload");
    }

    #[test]
    fn test_create_commits_on_drop() {
        let archive = MemoryArchive::new("mem", false);
        {
            let mut stream = archive.create("dropped.txt").expect("create");
            stream.write(b"x").expect("write");
        }
        assert!(archive.exists("dropped.txt"));
    }

    #[test]
    fn test_find_and_remove() {
        let archive = MemoryArchive::new("mem", false);
        archive.add_file("one.material", Vec::new());
        archive.add_file("two.mesh", Vec::new());

        assert_eq!(archive.find("*.material", true, false), ["one.material"]);
        archive.remove("one.material").expect("remove");
        assert!(archive.find("*.material", true, false).is_empty());
        assert!(archive.remove("one.material").is_err());
    }

    #[test]
    fn test_missing_file_opens_empty() {
        let archive = MemoryArchive::new("mem", true);
        assert!(archive.open("ghost").expect("open").is_empty());
    }
}
