//! Owning filesystem trait

use async_trait::async_trait;
use std::path::Path;

use crate::error::Result;
use crate::event::Event;
use crate::handle::OpenFile;
use crate::limits::GenLimits;

/// The namespace a generator lives in.
///
/// Generators receive it twice: as the target of dependency links once a
/// file has been generated, and inside their callback so they can open other
/// paths of the same namespace.
#[async_trait]
pub trait FileSystem: Send + Sync {
    /// Open a path, generating it if needed.
    async fn open(&self, path: &Path) -> Result<OpenFile>;

    /// Record that `from` depends on paths matching `to` for `event`.
    ///
    /// Called once per declared watch pattern, only after a callback
    /// succeeded.
    fn link(&self, from: &Path, to: &str, event: Event);

    /// Limits applied to generations in this namespace.
    ///
    /// Unlimited unless the namespace opts in; a successful callback is
    /// only rejected when the owner asked for a cap.
    fn limits(&self) -> GenLimits {
        GenLimits::unlimited()
    }
}
