//! Generators: produce a file's content the first time it is opened.
//!
//! All generator shapes share one flow:
//!
//! 1. build an empty [`File`] for the target path
//! 2. run the callback against it
//! 3. on success, check the namespace's limits, forward every watch entry
//!    to [`FileSystem::link`] and freeze the content into an [`OpenFile`]
//!
//! A failing callback leaves no links behind. Serving generators also refuse
//! to open their own mount point, so a directory-style server cannot be
//! mistaken for a leaf file.

use async_trait::async_trait;
use futures_util::future::BoxFuture;
use std::path::Path;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::file::{File, Link};
use crate::fs::FileSystem;
use crate::handle::OpenFile;

/// Anything that can open a path on behalf of a [`FileSystem`].
///
/// `key` is the mount point the lookup resolved to, `relative` the path
/// beneath it (`.` for the mount point itself) and `target` the full path
/// being opened.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn open(
        &self,
        fs: &dyn FileSystem,
        key: &Path,
        relative: &Path,
        target: &Path,
    ) -> Result<OpenFile>;
}

/// Capability for objects that produce a file.
#[async_trait]
pub trait GenerateFile: Send + Sync {
    async fn generate_file(&self, fs: &dyn FileSystem, file: &mut File) -> Result<()>;
}

/// Capability for objects that serve files beneath their mount point.
#[async_trait]
pub trait ServeFile: Send + Sync {
    async fn serve_file(&self, fs: &dyn FileSystem, file: &mut File) -> Result<()>;
}

/// Which flavor a [`FileGenerator`] was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorKind {
    /// Produces the file at its own path.
    Generate,
    /// Serves paths beneath its mount point; never the mount point itself.
    Serve,
}

/// The generator used for every callback shape.
///
/// # Example
///
/// ```rust
/// use genfs::{Event, FileGenerator, FileSystem, MountableFs};
/// use std::path::Path;
/// use std::sync::Arc;
///
/// # #[tokio::main]
/// # async fn main() -> genfs::Result<()> {
/// let fs = MountableFs::new();
/// fs.mount(
///     "/index.html",
///     Arc::new(FileGenerator::from_fn(|_fs, file| {
///         Box::pin(async move {
///             file.write("<h1>hello</h1>");
///             file.watch("templates/*.tmpl", Event::WRITE);
///             Ok(())
///         })
///     })),
/// )?;
///
/// let handle = fs.open(Path::new("/index.html")).await?;
/// assert_eq!(handle.stat().size, 14);
/// assert_eq!(fs.links().len(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct FileGenerator {
    kind: GeneratorKind,
    callback: Arc<dyn GenerateFile>,
}

impl std::fmt::Debug for FileGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileGenerator")
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

impl FileGenerator {
    /// Generator from a bare callback.
    pub fn from_fn<F>(callback: F) -> Self
    where
        F: for<'a> Fn(&'a dyn FileSystem, &'a mut File) -> BoxFuture<'a, Result<()>>
            + Send
            + Sync
            + 'static,
    {
        Self {
            kind: GeneratorKind::Generate,
            callback: Arc::new(FnCallback(callback)),
        }
    }

    /// Serving generator from a bare callback.
    pub fn serve_fn<F>(callback: F) -> Self
    where
        F: for<'a> Fn(&'a dyn FileSystem, &'a mut File) -> BoxFuture<'a, Result<()>>
            + Send
            + Sync
            + 'static,
    {
        Self {
            kind: GeneratorKind::Serve,
            callback: Arc::new(FnCallback(callback)),
        }
    }

    /// Generator from a [`GenerateFile`] implementation.
    pub fn generator(generator: impl GenerateFile + 'static) -> Self {
        Self {
            kind: GeneratorKind::Generate,
            callback: Arc::new(generator),
        }
    }

    /// Serving generator from a [`ServeFile`] implementation.
    pub fn server(server: impl ServeFile + 'static) -> Self {
        Self {
            kind: GeneratorKind::Serve,
            callback: Arc::new(Served(server)),
        }
    }

    /// Flavor this generator was built from.
    pub fn kind(&self) -> GeneratorKind {
        self.kind
    }
}

#[async_trait]
impl Generator for FileGenerator {
    async fn open(
        &self,
        fs: &dyn FileSystem,
        key: &Path,
        relative: &Path,
        target: &Path,
    ) -> Result<OpenFile> {
        if self.kind == GeneratorKind::Serve && relative == Path::new(".") {
            tracing::debug!(key = %key.display(), "serving generator opened at its mount point");
            return Err(Error::invalid("open", target));
        }

        let mut file = File::new(target);
        tracing::debug!(path = %target.display(), kind = ?self.kind, "generating file");

        if let Err(err) = self.callback.generate_file(fs, &mut file).await {
            tracing::debug!(path = %target.display(), error = %err, "generator failed");
            return Err(err);
        }

        let limits = fs.limits();
        let checked = limits
            .check_file_size(file.len() as u64)
            .and_then(|()| limits.check_watch_count(file.watch_count()));
        if let Err(exceeded) = checked {
            tracing::warn!(path = %target.display(), error = %exceeded, "generated file rejected");
            return Err(exceeded.into());
        }

        let links = file.links();
        forward_links(fs, &links);
        tracing::debug!(
            path = %target.display(),
            bytes = file.len(),
            links = links.len(),
            "generated file"
        );

        Ok(file.freeze())
    }
}

/// Forward each edge to the owning filesystem, one `link` call per edge.
pub(crate) fn forward_links(fs: &dyn FileSystem, links: &[Link]) {
    for link in links {
        tracing::trace!(
            from = %link.from.display(),
            pattern = %link.pattern,
            event = ?link.event,
            "link"
        );
        fs.link(&link.from, &link.pattern, link.event);
    }
}

struct FnCallback<F>(F);

#[async_trait]
impl<F> GenerateFile for FnCallback<F>
where
    F: for<'a> Fn(&'a dyn FileSystem, &'a mut File) -> BoxFuture<'a, Result<()>>
        + Send
        + Sync
        + 'static,
{
    async fn generate_file(&self, fs: &dyn FileSystem, file: &mut File) -> Result<()> {
        (self.0)(fs, file).await
    }
}

struct Served<S>(S);

#[async_trait]
impl<S: ServeFile> GenerateFile for Served<S> {
    async fn generate_file(&self, fs: &dyn FileSystem, file: &mut File) -> Result<()> {
        self.0.serve_file(fs, file).await
    }
}
