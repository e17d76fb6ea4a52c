//! Owning filesystem for generators
//!
//! - `FileSystem`: the interface generators consume (recursive open, link, limits)
//! - `MountableFs`: generators at mount points, with an in-memory link log

mod mountable;
mod traits;

pub use mountable::MountableFs;
pub use traits::FileSystem;
