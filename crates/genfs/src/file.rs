//! File builder handed to generator callbacks.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use crate::event::Event;
use crate::handle::OpenFile;

/// Default mode for generated files.
pub const DEFAULT_MODE: u32 = 0o644;

/// Staging area populated by a generator callback.
///
/// A `File` accumulates content, mode bits and dependency declarations. None
/// of its operations can fail. Once the callback succeeds the builder is
/// consumed and its content frozen into an [`OpenFile`].
///
/// ```rust
/// use genfs::{Event, File};
///
/// let mut file = File::new("/site/index.html");
/// file.write(b"<h1>");
/// file.write(b"hello</h1>");
/// file.watch("templates/*.tmpl", Event::WRITE);
///
/// assert_eq!(file.len(), 14);
/// assert_eq!(file.links().len(), 1);
/// ```
#[derive(Debug)]
pub struct File {
    path: PathBuf,
    data: Vec<u8>,
    mode: u32,
    modified: SystemTime,
    /// pattern -> events; BTreeMap keeps forwarding order stable
    watch: BTreeMap<String, Event>,
}

impl File {
    /// Create an empty builder for `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            data: Vec::new(),
            mode: DEFAULT_MODE,
            modified: SystemTime::now(),
            watch: BTreeMap::new(),
        }
    }

    /// Path this file is generated for.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append bytes to the content.
    pub fn write(&mut self, data: impl AsRef<[u8]>) {
        self.data.extend_from_slice(data.as_ref());
    }

    /// Set permission/type bits. Last call wins.
    pub fn mode(&mut self, mode: u32) {
        self.mode = mode;
    }

    /// Set the modification time reported by `stat`.
    pub fn modified(&mut self, time: SystemTime) {
        self.modified = time;
    }

    /// Declare that this file depends on paths matching `pattern` for the
    /// given kinds of change.
    pub fn watch(&mut self, pattern: impl Into<String>, event: Event) {
        *self.watch.entry(pattern.into()).or_insert(Event::empty()) |= event;
    }

    /// Bytes written so far.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True until something has been written.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of distinct watch patterns.
    pub fn watch_count(&self) -> usize {
        self.watch.len()
    }

    /// Dependency edges declared so far, one per watch pattern.
    pub fn links(&self) -> Vec<Link> {
        self.watch
            .iter()
            .map(|(pattern, event)| Link {
                from: self.path.clone(),
                pattern: pattern.clone(),
                event: *event,
            })
            .collect()
    }

    /// Freeze the content into a handle. The buffer is moved, not copied, and
    /// can no longer change.
    pub(crate) fn freeze(self) -> OpenFile {
        let data: Arc<[u8]> = self.data.into();
        OpenFile::new(self.path, data, self.mode, self.modified)
    }
}

impl std::io::Write for File {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.data.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl std::fmt::Write for File {
    fn write_str(&mut self, s: &str) -> std::fmt::Result {
        self.data.extend_from_slice(s.as_bytes());
        Ok(())
    }
}

/// A dependency edge: `from` must be regenerated when something matching
/// `pattern` sees one of `event`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Link {
    pub from: PathBuf,
    pub pattern: String,
    pub event: Event,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_writes_accumulate() {
        let mut file = File::new("/out.txt");
        file.write("abc");
        file.write(b"");
        file.write(vec![b'd', b'e', b'f']);
        assert_eq!(file.data, b"abcdef");
    }

    #[test]
    fn test_mode_last_wins() {
        let mut file = File::new("/out.txt");
        assert_eq!(file.mode, DEFAULT_MODE);
        file.mode(0o600);
        file.mode(0o755);
        assert_eq!(file.mode, 0o755);
    }

    #[test]
    fn test_watch_merges_masks() {
        let mut file = File::new("/app.js");
        file.watch("src/*.ts", Event::WRITE);
        file.watch("src/*.ts", Event::CREATE);
        file.watch("src/*.ts", Event::WRITE);
        file.watch("package.json", Event::REMOVE);

        assert_eq!(file.watch_count(), 2);
        assert_eq!(
            file.links(),
            vec![
                Link {
                    from: PathBuf::from("/app.js"),
                    pattern: "package.json".to_string(),
                    event: Event::REMOVE,
                },
                Link {
                    from: PathBuf::from("/app.js"),
                    pattern: "src/*.ts".to_string(),
                    event: Event::CREATE | Event::WRITE,
                },
            ]
        );
    }

    #[test]
    fn test_io_and_fmt_write() {
        use std::fmt::Write as _;

        let mut file = File::new("/log.txt");
        std::io::Write::write_all(&mut file, b"one ").unwrap();
        write!(file, "two {}", 3).unwrap();
        std::io::Write::flush(&mut file).unwrap();
        assert_eq!(file.data, b"one two 3");
    }

    #[test]
    fn test_freeze_keeps_metadata() {
        let when = SystemTime::UNIX_EPOCH + std::time::Duration::from_secs(60);
        let mut file = File::new("/dir/page.html");
        file.write("hi");
        file.mode(0o444);
        file.modified(when);

        let handle = file.freeze();
        let stat = handle.stat();
        assert_eq!(stat.name, "page.html");
        assert_eq!(stat.size, 2);
        assert_eq!(stat.mode, 0o444);
        assert_eq!(stat.modified, when);
    }
}
