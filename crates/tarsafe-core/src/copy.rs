//! Exact-length content copy with a reusable buffer.
//!
//! Every regular file entry declares its size up front. The copy reads
//! exactly that many bytes: a source that ends early is an error, and bytes
//! past the declared size are never consumed.

use std::io::Read;
use std::io::Write;
use std::io::{self};

/// Buffer size for I/O operations (64KB).
const COPY_BUFFER_SIZE: usize = 64 * 1024;

/// Heap-allocated buffer reused across every file of one extraction run.
#[derive(Debug)]
pub struct CopyBuffer {
    buf: Box<[u8]>,
}

impl CopyBuffer {
    /// Creates a new zero-initialized copy buffer.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: vec![0u8; COPY_BUFFER_SIZE].into_boxed_slice(),
        }
    }

    /// Returns the buffer size in bytes.
    #[inline]
    #[must_use]
    pub fn size(&self) -> usize {
        self.buf.len()
    }
}

impl Default for CopyBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Copies exactly `len` bytes from `reader` to `writer`.
///
/// # Errors
///
/// Returns `UnexpectedEof` if the reader ends before `len` bytes were read,
/// or any error from the reader or writer. Interrupted reads are retried.
pub fn copy_exact<R: Read + ?Sized, W: Write + ?Sized>(
    reader: &mut R,
    writer: &mut W,
    len: u64,
    buffer: &mut CopyBuffer,
) -> io::Result<u64> {
    let mut remaining = len;

    while remaining > 0 {
        let chunk =
            usize::try_from(remaining).map_or(buffer.buf.len(), |r| r.min(buffer.buf.len()));
        let bytes_read = match reader.read(&mut buffer.buf[..chunk]) {
            Ok(0) => {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    format!(
                        "entry content ended after {} of {len} bytes",
                        len - remaining
                    ),
                ));
            }
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };

        writer.write_all(&buffer.buf[..bytes_read])?;
        remaining -= bytes_read as u64;
    }

    Ok(len)
}
