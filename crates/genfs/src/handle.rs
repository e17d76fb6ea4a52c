//! Read/seek handle over frozen generated content.

use std::io::SeekFrom;
use std::path::{Component, Path, PathBuf};
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::SystemTime;

use tokio::io::{AsyncRead, AsyncSeek, ReadBuf};

use crate::error::{Error, Result};

/// Descriptor returned by [`OpenFile::stat`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    /// Final path segment
    pub name: String,
    /// Content size in bytes
    pub size: u64,
    /// Permission/type bits
    pub mode: u32,
    /// Last modification time
    pub modified: SystemTime,
}

/// Handle returned by a successful generation.
///
/// The handle owns a cursor over an immutable snapshot of the generated
/// bytes. The cursor always stays within `0..=len`: seeks that would leave
/// that range fail and leave it where it was. Reading at the end returns
/// `Ok(0)`.
///
/// Handles are not shared between tasks; open the path again for an
/// independent cursor. Cloning a handle clones the cursor and shares the
/// content.
#[derive(Debug, Clone)]
pub struct OpenFile {
    path: PathBuf,
    data: Arc<[u8]>,
    mode: u32,
    modified: SystemTime,
    offset: u64,
}

impl OpenFile {
    pub(crate) fn new(path: PathBuf, data: Arc<[u8]>, mode: u32, modified: SystemTime) -> Self {
        Self {
            path,
            data,
            mode,
            modified,
            offset: 0,
        }
    }

    /// Path the content was generated for.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current cursor position.
    pub fn position(&self) -> u64 {
        self.offset
    }

    /// Whether the cursor has reached the end of the content.
    pub fn is_eof(&self) -> bool {
        self.offset >= self.len()
    }

    fn len(&self) -> u64 {
        self.data.len() as u64
    }

    /// Copy bytes from the cursor into `buf` and advance past them.
    ///
    /// Returns the number of bytes copied, `Ok(0)` once the content is
    /// exhausted.
    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        // offset <= len is maintained by seek; anything else is a broken cursor
        if self.offset > self.len() {
            return Err(Error::invalid("read", &self.path));
        }
        let start = self.offset as usize;
        let remaining = &self.data[start..];
        let n = remaining.len().min(buf.len());
        buf[..n].copy_from_slice(&remaining[..n]);
        self.offset += n as u64;
        Ok(n)
    }

    /// Move the cursor and return its new position.
    ///
    /// Targets before the start or past the end fail with an
    /// invalid-argument error; the cursor is left unchanged.
    pub fn seek(&mut self, pos: SeekFrom) -> Result<u64> {
        let target = match pos {
            SeekFrom::Start(offset) => Some(offset),
            SeekFrom::Current(delta) => self.offset.checked_add_signed(delta),
            SeekFrom::End(delta) => self.len().checked_add_signed(delta),
        };
        match target {
            Some(offset) if offset <= self.len() => {
                self.offset = offset;
                Ok(offset)
            }
            _ => Err(Error::invalid("seek", &self.path)),
        }
    }

    /// Describe the content. Does not touch the cursor.
    pub fn stat(&self) -> Metadata {
        Metadata {
            name: base_name(&self.path),
            size: self.len(),
            mode: self.mode,
            modified: self.modified,
        }
    }

    /// Release the handle. Nothing is held, so this always succeeds.
    pub fn close(self) -> Result<()> {
        Ok(())
    }
}

/// Last path element; `/` for the root and `.` for an empty path.
fn base_name(path: &Path) -> String {
    match path.components().next_back() {
        Some(Component::RootDir) => "/".to_string(),
        Some(last) => last.as_os_str().to_string_lossy().into_owned(),
        None => ".".to_string(),
    }
}

impl std::io::Read for OpenFile {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        OpenFile::read(self, buf).map_err(Into::into)
    }
}

impl std::io::Seek for OpenFile {
    fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64> {
        OpenFile::seek(self, pos).map_err(Into::into)
    }
}

impl AsyncRead for OpenFile {
    fn poll_read(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<std::io::Result<()>> {
        let this = self.get_mut();
        let n = OpenFile::read(this, buf.initialize_unfilled())?;
        buf.advance(n);
        Poll::Ready(Ok(()))
    }
}

impl AsyncSeek for OpenFile {
    fn start_seek(self: Pin<&mut Self>, position: SeekFrom) -> std::io::Result<()> {
        OpenFile::seek(self.get_mut(), position)?;
        Ok(())
    }

    fn poll_complete(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<std::io::Result<u64>> {
        Poll::Ready(Ok(self.offset))
    }
}
