//! Core aggregate trait.

use std::fmt::Display;
use std::hash::Hash;

use common::Version;

/// Trait for aggregate roots.
///
/// An aggregate is a cluster of domain objects that is loaded, mutated and
/// saved as a single unit. The aggregate root is the only entry point for
/// changing its owned entities and enforces their joint invariants.
///
/// Aggregates carry the version they were loaded at so that repositories can
/// reject a save that would overwrite a concurrent change.
pub trait Aggregate: Clone + Send + Sync {
    /// The identifier type of this aggregate.
    type Id: Copy + Eq + Hash + Display + Send + Sync;

    /// Returns the aggregate type name.
    ///
    /// Used in logs and concurrency-conflict errors.
    fn aggregate_type() -> &'static str;

    /// Returns the aggregate's unique identifier.
    fn id(&self) -> Self::Id;

    /// Returns the version this aggregate was loaded (or last saved) at.
    ///
    /// Version 0 means the aggregate has never been persisted.
    fn version(&self) -> Version;

    /// Sets the aggregate version.
    ///
    /// Called by repositories when they store the aggregate.
    fn set_version(&mut self, version: Version);

    /// Returns true if the aggregate has never been persisted.
    fn is_new(&self) -> bool {
        self.version() == Version::initial()
    }
}
