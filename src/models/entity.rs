//! Traits shared by every catalog entity, plus request validation helpers.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::kind::CatalogKind;
use super::version::{Payload, VersionHistory};
use crate::{Error, Result};

/// A usage example attached to an entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Example {
    /// What the user types or triggers.
    #[serde(default)]
    pub input: String,
    /// What happens.
    #[serde(default)]
    pub description: String,
}

/// An entry stored in one of the catalog collections.
pub trait CatalogEntity:
    std::fmt::Debug + Clone + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// The collection this entity lives in.
    const KIND: CatalogKind;

    /// Reduced view returned by list operations.
    type Summary: std::fmt::Debug + Clone + Serialize + DeserializeOwned + Send + Sync;

    /// Unique id within the collection.
    fn id(&self) -> &str;

    /// Display name.
    fn name(&self) -> &str;

    /// Free-text description.
    fn description(&self) -> &str;

    /// Category label.
    fn category(&self) -> &str;

    /// Builds the list view.
    fn summary(&self) -> Self::Summary;

    /// Sets top-level `updatedAt` and `updatedBy`.
    fn touch(&mut self, updated_at: &str, updated_by: &str);
}

/// An entity with a version history.
pub trait Versioned: CatalogEntity {
    /// The fields captured by each version.
    type Payload: Payload;

    /// Normalized history.
    fn history(&self) -> &VersionHistory<Self::Payload>;

    /// Mutable history.
    fn history_mut(&mut self) -> &mut VersionHistory<Self::Payload>;

    /// Current top-level payload fields.
    fn payload(&self) -> Self::Payload;

    /// Overwrites the top-level payload fields.
    fn set_payload(&mut self, payload: Self::Payload);
}

/// A request that creates a new entity.
pub trait EntityUpload<E: CatalogEntity> {
    /// Validates the request and builds the entity.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingRequiredField`] or [`Error::MissingAuthor`].
    fn into_entity(self, now: &str) -> Result<E>;
}

/// A request that modifies an existing entity.
pub trait EntityUpdate<E: CatalogEntity> {
    /// Id of the entity to update.
    fn target_id(&self) -> Option<&str>;

    /// Author identifier.
    fn author(&self) -> Option<&str>;

    /// Applies the non-versioned fields.
    fn merge_metadata(&self, entity: &mut E);
}

/// An update that may also change the versioned payload.
pub trait PayloadUpdate<E: Versioned>: EntityUpdate<E> {
    /// The payload that would result from this update.
    ///
    /// Fields not supplied keep the current value.
    fn proposed_payload(&self, current: &E::Payload) -> E::Payload;

    /// Change note for a new version.
    fn changelog(&self) -> Option<&str>;
}

/// Checks that every named field has a non-blank value.
///
/// # Errors
///
/// Returns [`Error::MissingRequiredField`] listing all blank fields.
pub fn require_fields(fields: &[(&str, bool)]) -> Result<()> {
    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, present)| !present)
        .map(|(name, _)| *name)
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(Error::MissingRequiredField(missing.join(", ")))
    }
}

/// Returns true if the option holds a non-blank string.
#[must_use]
pub fn present(value: Option<&String>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

/// The id of an upload with surrounding whitespace removed.
#[must_use]
pub fn normalized_id(id: Option<String>) -> String {
    id.map(|id| id.trim().to_string()).unwrap_or_default()
}

/// Extracts a trimmed, non-blank author.
///
/// # Errors
///
/// Returns [`Error::MissingAuthor`] when absent or blank.
pub fn require_author(author: Option<&str>) -> Result<String> {
    author
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(ToString::to_string)
        .ok_or(Error::MissingAuthor)
}

/// Replaces `target` with `value` when the value is non-empty.
pub fn merge_non_empty(target: &mut String, value: Option<&String>) {
    if let Some(v) = value.filter(|v| !v.is_empty()) {
        target.clone_from(v);
    }
}

/// Replaces `target` with `value` when the value was supplied at all.
pub fn merge_supplied<T: Clone>(target: &mut T, value: Option<&T>) {
    if let Some(v) = value {
        target.clone_from(v);
    }
}
