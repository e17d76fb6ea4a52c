//! Change-event masks attached to dependency links.

use bitflags::bitflags;

bitflags! {
    /// Kinds of change a generated file depends on.
    ///
    /// Masks combine with `|`; a watch declared twice for the same pattern
    /// keeps the union of both masks.
    ///
    /// ```rust
    /// use genfs::Event;
    ///
    /// let mask = Event::CREATE | Event::WRITE;
    /// assert!(mask.contains(Event::WRITE));
    /// assert!(!mask.contains(Event::REMOVE));
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct Event: u32 {
        const CREATE = 1 << 0;
        const WRITE = 1 << 1;
        const REMOVE = 1 << 2;
        const RENAME = 1 << 3;
        const CHMOD = 1 << 4;
    }
}
