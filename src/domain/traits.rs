use crate::domain::error::FleetError;
use crate::domain::model::Session;
use async_trait::async_trait;
use std::fmt::Debug;
use std::hash::Hash;

/// Stable external identity of a record within its collection.
pub trait Keyed {
    type Key: Clone + Eq + Hash + Debug;

    fn key(&self) -> Self::Key;
}

/// What a record exposes to `FilterCriteria`.
///
/// Collections without a route or status dimension keep the defaults and
/// only participate in free-text search.
pub trait Filterable {
    fn route(&self) -> Option<&str> {
        None
    }

    fn status(&self) -> Option<&str> {
        None
    }

    /// Text searched by the case-insensitive substring predicate.
    fn haystack(&self) -> String;
}

/// Trait for remote collection reads
///
/// This trait provides an abstraction over the HTTP API for one record
/// type. A fetch is a pure read: it returns data for the caller to
/// install and never touches shared state itself.
#[async_trait]
pub trait CollectionSource<T> {
    async fn fetch(&self) -> Result<Vec<T>, FleetError>;
}

/// Trait for session persistence
///
/// Abstracts the opaque key-value store holding the logged-in identity,
/// so flows can be tested against an in-memory implementation.
#[async_trait]
pub trait SessionStore {
    /// Current session, if one is persisted.
    async fn load(&self) -> Result<Option<Session>, FleetError>;

    /// Replace the persisted session.
    async fn save(&self, session: &Session) -> Result<(), FleetError>;

    /// Drop the persisted session.
    async fn clear(&self) -> Result<(), FleetError>;
}
