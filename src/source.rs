// File-provider capability: positioned-read access to a resource.
//
// Every read is parameterized by an explicit absolute offset. There is no
// implicit "current position", which is what makes it safe for many
// scanners to share one handle concurrently: the handle is read-only and
// each scanner owns its own buffer and cursor.

use std::fs::File;
use std::io;
use std::path::Path;
use std::sync::Arc;

use crate::error::{Error, Result};

/// Random-access read capability over some byte resource.
///
/// Implementations must not maintain a shared read cursor; `read_at` at the
/// same offset from two threads must be safe and independent.
pub trait PositionedRead: Send + Sync {
    /// Read up to `buf.len()` bytes starting at `offset`. Returns the number
    /// of bytes written into `buf`; 0 means end of resource.
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> io::Result<usize>;

    /// Total size of the resource in bytes.
    fn size(&self) -> io::Result<u64>;
}

/// Shared read-only handle to a resource.
///
/// The caller controls the lifetime: open before constructing partitioners
/// or scanners, drop after the last of them is done. Scanners never close
/// the handle themselves.
pub type SourceHandle = Arc<dyn PositionedRead>;

/// A resource backed by a file on disk.
pub struct FileSource {
    file: File,
}

impl FileSource {
    /// Open a file by path.
    pub fn open(path: impl AsRef<Path>) -> Result<SourceHandle> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::ResourceUnavailable {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Arc::new(FileSource { file }))
    }

    /// Wrap an already-open file handle.
    pub fn from_file(file: File) -> SourceHandle {
        Arc::new(FileSource { file })
    }
}

impl PositionedRead for FileSource {
    #[cfg(unix)]
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> io::Result<usize> {
        use std::os::unix::fs::FileExt;
        self.file.read_at(buf, offset)
    }

    #[cfg(windows)]
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> io::Result<usize> {
        use std::os::windows::fs::FileExt;
        self.file.seek_read(buf, offset)
    }

    fn size(&self) -> io::Result<u64> {
        self.file.metadata().map(|m| m.len())
    }
}

/// A resource backed by an in-memory byte buffer.
pub struct MemorySource {
    bytes: Vec<u8>,
}

impl MemorySource {
    /// Wrap raw bytes as a resource.
    pub fn new(bytes: impl Into<Vec<u8>>) -> SourceHandle {
        Arc::new(MemorySource {
            bytes: bytes.into(),
        })
    }
}

impl PositionedRead for MemorySource {
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> io::Result<usize> {
        let len = self.bytes.len() as u64;
        if offset >= len {
            return Ok(0);
        }
        let start = offset as usize;
        let n = buf.len().min(self.bytes.len() - start);
        buf[..n].copy_from_slice(&self.bytes[start..start + n]);
        Ok(n)
    }

    fn size(&self) -> io::Result<u64> {
        Ok(self.bytes.len() as u64)
    }
}

/// Read exactly `len` bytes starting at `offset`.
///
/// The blocking positioned read runs on the tokio blocking pool; short reads
/// are retried until the span is filled. Hitting end of resource before
/// `len` bytes surfaces as an `UnexpectedEof` I/O error at that offset.
pub(crate) async fn read_full_at(source: &SourceHandle, offset: u64, len: usize) -> Result<Vec<u8>> {
    let source = Arc::clone(source);
    let task = tokio::task::spawn_blocking(move || {
        let mut buf = vec![0u8; len];
        let mut filled = 0usize;
        while filled < len {
            let at = offset + filled as u64;
            let n = source
                .read_at(at, &mut buf[filled..])
                .map_err(|source| Error::Io { offset: at, source })?;
            if n == 0 {
                return Err(Error::Io {
                    offset: at,
                    source: io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        "positioned read past end of resource",
                    ),
                });
            }
            filled += n;
        }
        Ok(buf)
    });
    task.await.map_err(|join| Error::Io {
        offset,
        source: io::Error::new(io::ErrorKind::Other, join),
    })?
}
