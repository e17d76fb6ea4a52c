//! genfs - Virtual files generated lazily on first open
//!
//! Files in a genfs namespace are not stored. A generator callback produces
//! each one when it is opened, and declares which source paths it depends on
//! so an invalidation engine knows when to regenerate it.
//!
//! # Example
//!
//! ```rust
//! use genfs::{Event, FileGenerator, FileSystem, MountableFs};
//! use std::io::SeekFrom;
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let fs = MountableFs::new();
//!     fs.mount(
//!         "/greeting.txt",
//!         Arc::new(FileGenerator::from_fn(|_fs, file| {
//!             Box::pin(async move {
//!                 file.write("hello ");
//!                 file.write("world");
//!                 file.watch("greetings/*.txt", Event::WRITE);
//!                 Ok(())
//!             })
//!         })),
//!     )?;
//!
//!     let mut handle = fs.open(Path::new("/greeting.txt")).await?;
//!     handle.seek(SeekFrom::Start(6))?;
//!     let mut buf = [0u8; 16];
//!     let n = handle.read(&mut buf)?;
//!     assert_eq!(&buf[..n], b"world");
//!     assert_eq!(handle.read(&mut buf)?, 0);
//!
//!     let links = fs.links();
//!     assert_eq!(links[0].pattern, "greetings/*.txt");
//!     Ok(())
//! }
//! ```

mod error;
mod event;
mod file;
mod fs;
mod generator;
mod handle;
mod limits;

pub use error::{Error, Result};
pub use event::Event;
pub use file::{DEFAULT_MODE, File, Link};
pub use fs::{FileSystem, MountableFs};
pub use generator::{FileGenerator, GenerateFile, Generator, GeneratorKind, ServeFile};
pub use handle::{Metadata, OpenFile};
pub use limits::{GenLimits, LimitExceeded};

/// Re-export async_trait for implementing [`Generator`], [`GenerateFile`],
/// [`ServeFile`] and [`FileSystem`].
pub use async_trait::async_trait;

/// Boxed future returned by bare generator callbacks.
pub use futures_util::future::BoxFuture;
