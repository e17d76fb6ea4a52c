//! Generation limits.
//!
//! A generator callback can write any number of bytes and declare any number
//! of watch patterns. These limits bound what a single successful generation
//! may produce before it is frozen and its links are forwarded.

use std::fmt;
use std::path::Path;

/// Default maximum size of one generated file: 10MB
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10_000_000;

/// Default maximum number of distinct watch patterns per file: 1,000
pub const DEFAULT_MAX_WATCH_COUNT: usize = 1_000;

/// Default maximum total path length: 4096 bytes
pub const DEFAULT_MAX_PATH_LENGTH: usize = 4096;

/// Limits applied to every generation.
///
/// Returned by [`FileSystem::limits()`](crate::FileSystem::limits) so the
/// owning filesystem decides what its generators may produce.
///
/// # Example
///
/// ```rust
/// use genfs::GenLimits;
///
/// let limits = GenLimits::new()
///     .max_file_size(1_000_000)
///     .max_watch_count(64);
/// assert_eq!(limits.max_file_size, 1_000_000);
/// ```
///
/// # Default Limits
///
/// | Limit | Default | Purpose |
/// |-------|---------|---------|
/// | `max_file_size` | 10MB | Bytes written by one generation |
/// | `max_watch_count` | 1,000 | Distinct watch patterns per file |
/// | `max_path_length` | 4096 | Length of an opened path |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenLimits {
    /// Maximum size of a generated file in bytes.
    /// Default: 10MB (10,000,000 bytes)
    pub max_file_size: u64,

    /// Maximum number of distinct watch patterns one file may declare.
    /// Default: 1,000
    pub max_watch_count: usize,

    /// Maximum total path length in bytes.
    /// Default: 4096 bytes
    pub max_path_length: usize,
}

impl Default for GenLimits {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            max_watch_count: DEFAULT_MAX_WATCH_COUNT,
            max_path_length: DEFAULT_MAX_PATH_LENGTH,
        }
    }
}

impl GenLimits {
    /// Create new limits with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create unlimited limits (no restrictions).
    ///
    /// ```rust
    /// use genfs::GenLimits;
    ///
    /// let limits = GenLimits::unlimited();
    /// assert_eq!(limits.max_file_size, u64::MAX);
    /// ```
    pub fn unlimited() -> Self {
        Self {
            max_file_size: u64::MAX,
            max_watch_count: usize::MAX,
            max_path_length: usize::MAX,
        }
    }

    /// Set maximum generated file size.
    pub fn max_file_size(mut self, bytes: u64) -> Self {
        self.max_file_size = bytes;
        self
    }

    /// Set maximum number of watch patterns per file.
    pub fn max_watch_count(mut self, count: usize) -> Self {
        self.max_watch_count = count;
        self
    }

    /// Set maximum path length.
    pub fn max_path_length(mut self, len: usize) -> Self {
        self.max_path_length = len;
        self
    }

    /// Check if a generated file size exceeds the limit.
    pub fn check_file_size(&self, size: u64) -> Result<(), LimitExceeded> {
        if size > self.max_file_size {
            return Err(LimitExceeded::FileSize {
                size,
                limit: self.max_file_size,
            });
        }
        Ok(())
    }

    /// Check if the number of declared watch patterns exceeds the limit.
    pub fn check_watch_count(&self, count: usize) -> Result<(), LimitExceeded> {
        if count > self.max_watch_count {
            return Err(LimitExceeded::WatchCount {
                count,
                limit: self.max_watch_count,
            });
        }
        Ok(())
    }

    /// Validate a path before it is resolved.
    pub fn validate_path(&self, path: &Path) -> Result<(), LimitExceeded> {
        let length = path.as_os_str().len();
        if length > self.max_path_length {
            return Err(LimitExceeded::PathTooLong {
                length,
                limit: self.max_path_length,
            });
        }
        Ok(())
    }
}

/// Error returned when a generation limit is exceeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LimitExceeded {
    /// Generated file is larger than allowed.
    FileSize { size: u64, limit: u64 },
    /// Too many distinct watch patterns were declared.
    WatchCount { count: usize, limit: usize },
    /// Opened path exceeds length limit.
    PathTooLong { length: usize, limit: usize },
}

impl fmt::Display for LimitExceeded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LimitExceeded::FileSize { size, limit } => {
                write!(
                    f,
                    "generated file too large: {} bytes exceeds {} byte limit",
                    size, limit
                )
            }
            LimitExceeded::WatchCount { count, limit } => {
                write!(
                    f,
                    "too many watch patterns: {} exceeds {} pattern limit",
                    count, limit
                )
            }
            LimitExceeded::PathTooLong { length, limit } => {
                write!(
                    f,
                    "path too long: {} bytes exceeds {} byte limit",
                    length, limit
                )
            }
        }
    }
}

impl std::error::Error for LimitExceeded {}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limits() {
        let limits = GenLimits::default();
        assert_eq!(limits.max_file_size, 10_000_000);
        assert_eq!(limits.max_watch_count, 1_000);
        assert_eq!(limits.max_path_length, 4096);
    }

    #[test]
    fn test_unlimited() {
        let limits = GenLimits::unlimited();
        assert_eq!(limits.max_file_size, u64::MAX);
        assert_eq!(limits.max_watch_count, usize::MAX);
        assert_eq!(limits.max_path_length, usize::MAX);
    }

    #[test]
    fn test_builder() {
        let limits = GenLimits::new()
            .max_file_size(1_000)
            .max_watch_count(3)
            .max_path_length(32);

        assert_eq!(limits.max_file_size, 1_000);
        assert_eq!(limits.max_watch_count, 3);
        assert_eq!(limits.max_path_length, 32);
    }

    #[test]
    fn test_check_file_size() {
        let limits = GenLimits::new().max_file_size(1000);

        assert!(limits.check_file_size(0).is_ok());
        assert!(limits.check_file_size(1000).is_ok());
        assert_eq!(
            limits.check_file_size(1001),
            Err(LimitExceeded::FileSize {
                size: 1001,
                limit: 1000
            })
        );
    }

    #[test]
    fn test_check_watch_count() {
        let limits = GenLimits::new().max_watch_count(2);

        assert!(limits.check_watch_count(2).is_ok());
        assert!(limits.check_watch_count(3).is_err());
    }

    #[test]
    fn test_validate_path() {
        let limits = GenLimits::new().max_path_length(8);

        assert!(limits.validate_path(Path::new("/a/b.txt")).is_ok());
        assert!(limits.validate_path(Path::new("/a/bc.txt")).is_err());
    }

    #[test]
    fn test_error_display() {
        let err = LimitExceeded::FileSize {
            size: 200,
            limit: 100,
        };
        assert!(err.to_string().contains("200"));
        assert!(err.to_string().contains("100"));

        let err = LimitExceeded::WatchCount { count: 5, limit: 4 };
        assert!(err.to_string().contains("watch patterns"));
    }
}
