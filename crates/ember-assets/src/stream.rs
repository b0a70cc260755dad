//! Byte streams handed out by archives.
//!
//! A [`DataStream`] is byte-oriented and seekable where the backing store
//! allows it; the open file's lifetime is tied to the stream value.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom, Write};

use ember_common::{EmberError, EmberResult};

/// Streams are passed around boxed; the concrete backend is opaque.
pub type SharedStream = Box<dyn DataStream>;

/// A byte stream over a named resource.
pub trait DataStream: Send {
    /// Name of the resource this stream reads (usually the filename).
    fn name(&self) -> &str;

    /// Reads up to `buf.len()` bytes; returns the number read (0 at EOF).
    fn read(&mut self, buf: &mut [u8]) -> EmberResult<usize>;

    /// Writes `buf`; only meaningful when [`DataStream::is_writable`].
    fn write(&mut self, _buf: &[u8]) -> EmberResult<usize> {
        Err(EmberError::InvalidState(format!(
            "stream '{}' is not writable",
            self.name()
        )))
    }

    /// Whether this stream accepts writes.
    fn is_writable(&self) -> bool {
        false
    }

    /// Absolute seek.
    fn seek(&mut self, pos: u64) -> EmberResult<()>;

    /// Current position.
    fn tell(&self) -> u64;

    /// Relative skip; negative counts rewind.
    fn skip(&mut self, count: i64) -> EmberResult<()> {
        let pos = i64::try_from(self.tell()).map_err(|_| {
            EmberError::InvalidState("stream position exceeds i64".to_string())
        })?;
        let target = pos + count;
        if target < 0 {
            return Err(EmberError::InvalidParameters(
                "cannot skip before the start of a stream".to_string(),
            ));
        }
        #[allow(clippy::cast_sign_loss)]
        self.seek(target as u64)
    }

    /// Whether the read position is at or past the end.
    fn eof(&self) -> bool {
        self.tell() >= self.len()
    }

    /// Total stream length in bytes.
    fn len(&self) -> u64;

    /// Whether the stream holds no bytes.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Releases the underlying handle. Further reads fail or return 0.
    fn close(&mut self) {}

    /// Reads a single line, consuming the delimiter. A trailing `\r` is
    /// stripped when the delimiter is `\n`.
    fn read_line(&mut self, delim: u8) -> EmberResult<String> {
        let mut out = Vec::new();
        let mut byte = [0u8; 1];
        loop {
            let n = self.read(&mut byte)?;
            if n == 0 || byte[0] == delim {
                break;
            }
            out.push(byte[0]);
        }
        if delim == b'\n' && out.last() == Some(&b'\r') {
            out.pop();
        }
        Ok(String::from_utf8_lossy(&out).into_owned())
    }

    /// Reads everything from the current position to the end.
    fn read_to_end(&mut self) -> EmberResult<Vec<u8>> {
        let remaining = usize::try_from(self.len().saturating_sub(self.tell()))
            .map_err(|_| EmberError::InvalidState("stream too large".to_string()))?;
        let mut out = vec![0u8; remaining];
        let mut filled = 0;
        while filled < out.len() {
            let n = self.read(&mut out[filled..])?;
            if n == 0 {
                break;
            }
            filled += n;
        }
        out.truncate(filled);
        Ok(out)
    }
}

/// A stream over an in-memory byte buffer.
pub struct MemoryStream {
    name: String,
    data: Vec<u8>,
    pos: usize,
    writable: bool,
}

impl MemoryStream {
    /// A read-only stream over the given bytes.
    #[must_use]
    pub fn new(name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            data,
            pos: 0,
            writable: false,
        }
    }

    /// An empty, growable, writable stream.
    #[must_use]
    pub fn writable(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: Vec::new(),
            pos: 0,
            writable: true,
        }
    }

    /// Buffers the remainder of another stream into memory, so parsers can
    /// seek freely regardless of the backing archive.
    pub fn buffer_from(name: &str, source: &mut dyn DataStream) -> EmberResult<Self> {
        Ok(Self::new(name, source.read_to_end()?))
    }

    /// The full backing buffer.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    /// Consumes the stream, returning its buffer.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }
}

impl DataStream for MemoryStream {
    fn name(&self) -> &str {
        &self.name
    }

    fn read(&mut self, buf: &mut [u8]) -> EmberResult<usize> {
        let available = self.data.len().saturating_sub(self.pos);
        let n = buf.len().min(available);
        buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }

    fn write(&mut self, buf: &[u8]) -> EmberResult<usize> {
        if !self.writable {
            return Err(EmberError::InvalidState(format!(
                "stream '{}' is not writable",
                self.name
            )));
        }
        if self.pos + buf.len() > self.data.len() {
            self.data.resize(self.pos + buf.len(), 0);
        }
        self.data[self.pos..self.pos + buf.len()].copy_from_slice(buf);
        self.pos += buf.len();
        Ok(buf.len())
    }

    fn is_writable(&self) -> bool {
        self.writable
    }

    fn seek(&mut self, pos: u64) -> EmberResult<()> {
        self.pos = usize::try_from(pos)
            .map_err(|_| EmberError::InvalidParameters("seek past addressable range".to_string()))?
            .min(self.data.len());
        Ok(())
    }

    fn tell(&self) -> u64 {
        self.pos as u64
    }

    fn len(&self) -> u64 {
        self.data.len() as u64
    }
}

/// A stream over an open file.
pub struct FileStream {
    name: String,
    file: Option<File>,
    len: u64,
    pos: u64,
    writable: bool,
}

impl FileStream {
    /// Opens `file` for reading under the given resource name.
    pub fn open(name: impl Into<String>, file: File) -> EmberResult<Self> {
        let len = file.metadata()?.len();
        Ok(Self {
            name: name.into(),
            file: Some(file),
            len,
            pos: 0,
            writable: false,
        })
    }

    /// Wraps a freshly created file for writing.
    #[must_use]
    pub fn create(name: impl Into<String>, file: File) -> Self {
        Self {
            name: name.into(),
            file: Some(file),
            len: 0,
            pos: 0,
            writable: true,
        }
    }

    fn file_mut(&mut self) -> EmberResult<&mut File> {
        let name = self.name.clone();
        self.file
            .as_mut()
            .ok_or(EmberError::InvalidState(format!("stream '{name}' is closed")))
    }
}

impl DataStream for FileStream {
    fn name(&self) -> &str {
        &self.name
    }

    fn read(&mut self, buf: &mut [u8]) -> EmberResult<usize> {
        let n = self.file_mut()?.read(buf)?;
        self.pos += n as u64;
        Ok(n)
    }

    fn write(&mut self, buf: &[u8]) -> EmberResult<usize> {
        if !self.writable {
            return Err(EmberError::InvalidState(format!(
                "stream '{}' is not writable",
                self.name
            )));
        }
        let n = self.file_mut()?.write(buf)?;
        self.pos += n as u64;
        self.len = self.len.max(self.pos);
        Ok(n)
    }

    fn is_writable(&self) -> bool {
        self.writable
    }

    fn seek(&mut self, pos: u64) -> EmberResult<()> {
        self.file_mut()?.seek(SeekFrom::Start(pos))?;
        self.pos = pos;
        Ok(())
    }

    fn tell(&self) -> u64 {
        self.pos
    }

    fn len(&self) -> u64 {
        self.len
    }

    fn close(&mut self) {
        self.file = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_stream_read_and_seek() {
        let mut s = MemoryStream::new("test", b"hello world".to_vec());
        let mut buf = [0u8; 5];
        assert_eq!(s.read(&mut buf).expect("read"), 5);
        assert_eq!(&buf, b"hello");
        s.seek(6).expect("seek");
        assert_eq!(s.read(&mut buf).expect("read"), 5);
        assert_eq!(&buf, b"world");
        assert!(s.eof());
    }

    #[test]
    fn test_read_line_strips_carriage_return() {
        let mut s = MemoryStream::new("test", b"first\r\nsecond\nlast".to_vec());
        assert_eq!(s.read_line(b'\n').expect("line"), "first");
        assert_eq!(s.read_line(b'\n').expect("line"), "second");
        assert_eq!(s.read_line(b'\n').expect("line"), "last");
        assert!(s.eof());
    }

    #[test]
    fn test_skip_backwards() {
        let mut s = MemoryStream::new("test", b"abcdef".to_vec());
        s.skip(4).expect("skip");
        s.skip(-2).expect("skip");
        assert_eq!(s.tell(), 2);
        assert!(s.skip(-5).is_err());
    }

    #[test]
    fn test_writable_memory_stream_grows() {
        let mut s = MemoryStream::writable("out");
        s.write(b"abc").expect("write");
        s.write(b"def").expect("write");
        assert_eq!(s.len(), 6);
        assert_eq!(s.bytes(), b"abcdef");
    }

    #[test]
    fn test_read_only_stream_rejects_writes() {
        let mut s = MemoryStream::new("ro", vec![1, 2, 3]);
        assert!(matches!(s.write(b"x"), Err(EmberError::InvalidState(_))));
    }

    #[test]
    fn test_read_to_end_from_midway() {
        let mut s = MemoryStream::new("test", b"0123456789".to_vec());
        s.seek(7).expect("seek");
        assert_eq!(s.read_to_end().expect("rest"), b"789");
    }
}
