//! Mountable generator filesystem.
//!
//! [`MountableFs`] maps mount points to generators, similar to Unix mount
//! semantics, and keeps every dependency link its generators declare.

// RwLock.read()/write().unwrap() only panics on lock poisoning (prior panic
// while holding lock). This is intentional - corrupted state should not propagate.
#![allow(clippy::unwrap_used)]

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, RwLock};

use super::traits::FileSystem;
use crate::error::{Error, Result};
use crate::event::Event;
use crate::file::Link;
use crate::generator::Generator;
use crate::handle::OpenFile;
use crate::limits::GenLimits;

/// Namespace of generators at mount points.
///
/// A path is served by the generator mounted at its longest matching prefix.
/// The generator receives the mount point as `key`, the remainder as
/// `relative` (`.` when the path is the mount point itself) and the full
/// normalized path as `target`.
///
/// Links forwarded by generators are appended to a log that an invalidation
/// engine can read with [`links`](Self::links) or drain with
/// [`take_links`](Self::take_links).
///
/// # Example: Serving a directory
///
/// ```rust
/// use genfs::{Event, File, FileGenerator, FileSystem, MountableFs, Result, ServeFile};
/// use genfs::async_trait;
/// use std::path::Path;
/// use std::sync::Arc;
///
/// struct Assets;
///
/// #[async_trait]
/// impl ServeFile for Assets {
///     async fn serve_file(&self, _fs: &dyn FileSystem, file: &mut File) -> Result<()> {
///         file.write(format!("/* {} */", file.path().display()));
///         file.watch("assets/**", Event::WRITE | Event::REMOVE);
///         Ok(())
///     }
/// }
///
/// # #[tokio::main]
/// # async fn main() -> genfs::Result<()> {
/// let fs = MountableFs::new();
/// fs.mount("/assets", Arc::new(FileGenerator::server(Assets)))?;
///
/// let handle = fs.open(Path::new("/assets/app.css")).await?;
/// assert_eq!(handle.stat().name, "app.css");
///
/// // The mount point itself is not a file
/// assert!(fs.open(Path::new("/assets")).await.is_err());
/// # Ok(())
/// # }
/// ```
///
/// # Path Resolution
///
/// With mounts at `/site` and `/site/blog`:
///
/// - `/site/index.html` → `/site`, relative `index.html`
/// - `/site/blog/post.html` → `/site/blog`, relative `post.html`
/// - `/site/blog` → `/site/blog`, relative `.`
/// - `/other.txt` → not found
pub struct MountableFs {
    /// Mount points: path -> generator
    mounts: RwLock<BTreeMap<PathBuf, Arc<dyn Generator>>>,
    /// Links forwarded by successful generations, in arrival order
    links: RwLock<Vec<Link>>,
    limits: GenLimits,
}

impl Default for MountableFs {
    fn default() -> Self {
        Self::new()
    }
}

impl MountableFs {
    /// Create an empty namespace with default limits.
    pub fn new() -> Self {
        Self::with_limits(GenLimits::default())
    }

    /// Create an empty namespace with custom limits.
    pub fn with_limits(limits: GenLimits) -> Self {
        Self {
            mounts: RwLock::new(BTreeMap::new()),
            links: RwLock::new(Vec::new()),
            limits,
        }
    }

    /// Mount a generator at the given path, replacing any generator already
    /// mounted there.
    ///
    /// # Errors
    ///
    /// Returns an invalid-argument error if the path is not absolute.
    pub fn mount(&self, path: impl AsRef<Path>, generator: Arc<dyn Generator>) -> Result<()> {
        let path = path.as_ref();
        if !path.is_absolute() {
            return Err(Error::invalid("mount", path));
        }
        let path = Self::normalize_path(path);

        tracing::debug!(mount = %path.display(), "mounted generator");
        let mut mounts = self.mounts.write().unwrap();
        mounts.insert(path, generator);
        Ok(())
    }

    /// Unmount the generator at the given path.
    ///
    /// # Errors
    ///
    /// Returns not-found if nothing is mounted at the path.
    pub fn unmount(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = Self::normalize_path(path.as_ref());

        let mut mounts = self.mounts.write().unwrap();
        mounts.remove(&path).ok_or(Error::NotFound(path))?;
        Ok(())
    }

    /// Snapshot of every link forwarded so far.
    pub fn links(&self) -> Vec<Link> {
        self.links.read().unwrap().clone()
    }

    /// Drain the link log.
    pub fn take_links(&self) -> Vec<Link> {
        std::mem::take(&mut *self.links.write().unwrap())
    }

    /// Normalize a path for consistent lookups
    fn normalize_path(path: &Path) -> PathBuf {
        let mut result = PathBuf::new();

        for component in path.components() {
            match component {
                Component::RootDir => {
                    result.push("/");
                }
                Component::Normal(name) => {
                    result.push(name);
                }
                Component::ParentDir => {
                    result.pop();
                }
                Component::CurDir => {}
                Component::Prefix(_) => {}
            }
        }

        if result.as_os_str().is_empty() {
            result.push("/");
        }

        result
    }

    /// Resolve a normalized path to its generator.
    ///
    /// Returns (generator, mount_point, path_within_mount).
    fn resolve(&self, path: &Path) -> Option<(Arc<dyn Generator>, PathBuf, PathBuf)> {
        let mounts = self.mounts.read().unwrap();

        // BTreeMap iteration is in key order, but we need longest match
        let mut best_mount: Option<(&PathBuf, &Arc<dyn Generator>)> = None;

        for (mount_path, generator) in mounts.iter() {
            if path.starts_with(mount_path) {
                match best_mount {
                    None => best_mount = Some((mount_path, generator)),
                    Some((best_path, _)) => {
                        if mount_path.components().count() > best_path.components().count() {
                            best_mount = Some((mount_path, generator));
                        }
                    }
                }
            }
        }

        best_mount.map(|(mount_path, generator)| {
            let relative = path.strip_prefix(mount_path).unwrap_or(Path::new(""));
            let relative = if relative.as_os_str().is_empty() {
                PathBuf::from(".")
            } else {
                relative.to_path_buf()
            };
            (Arc::clone(generator), mount_path.clone(), relative)
        })
    }
}

#[async_trait]
impl FileSystem for MountableFs {
    async fn open(&self, path: &Path) -> Result<OpenFile> {
        self.limits.validate_path(path)?;
        let path = Self::normalize_path(path);

        // The lock is released before generating: callbacks open other paths
        let (generator, key, relative) = self
            .resolve(&path)
            .ok_or_else(|| Error::NotFound(path.clone()))?;

        generator.open(self, &key, &relative, &path).await
    }

    fn link(&self, from: &Path, to: &str, event: Event) {
        self.links.write().unwrap().push(Link {
            from: from.to_path_buf(),
            pattern: to.to_string(),
            event,
        });
    }

    fn limits(&self) -> GenLimits {
        self.limits.clone()
    }
}
