//! Version manager.
//!
//! Decides whether an update appends a version, merges metadata, and
//! resolves reads at a specific version. Legacy backfill has already
//! happened by the time an entity reaches this module (see
//! [`crate::models::StoredHistory`]).

use crate::models::{PayloadUpdate, Versioned, VersionRecord, require_author};
use crate::{Error, Result};
use serde::Serialize;
use tracing::info;

/// A proposed payload change.
#[derive(Debug, Clone)]
pub struct PayloadChange<P> {
    /// Payload after the update.
    pub proposed: P,
    /// Author of the change.
    pub author: String,
    /// Optional change note.
    pub changelog: Option<String>,
}

/// Result of an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOutcome {
    /// Current version after the update.
    pub version: u32,
    /// Whether a new version record was appended.
    pub new_version_created: bool,
}

/// Entity view at a particular version.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionView<E> {
    /// Entity with the version's payload and provenance substituted.
    #[serde(flatten)]
    pub entity: E,
    /// The version explicitly asked for, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requested_version: Option<u32>,
    /// Whether the view shows the latest version.
    pub is_latest: bool,
}

/// One row of a history listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry<P> {
    /// The stored record.
    #[serde(flatten)]
    pub record: VersionRecord<P>,
    /// Whether this is the latest version.
    pub is_latest: bool,
}

/// Full history of one entity, newest first.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryView<P> {
    /// Entity id.
    pub id: String,
    /// Entity name.
    pub name: String,
    /// Latest version number.
    pub current_version: u32,
    /// Records, newest first.
    pub versions: Vec<HistoryEntry<P>>,
}

/// Version manager.
pub struct VersionManager;

impl VersionManager {
    /// Applies a payload change.
    ///
    /// Appends a version at `max + 1` when the proposed payload differs from
    /// the current one, then mirrors the newest payload to the top level.
    /// Returns the current version and whether one was appended.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OperationFailed`] if the history is already at the
    /// highest representable version.
    pub fn apply<E: Versioned>(
        entity: &mut E,
        change: PayloadChange<E::Payload>,
        now: &str,
    ) -> Result<UpdateOutcome> {
        let created = change.proposed != entity.payload();
        if created {
            let version = entity.history_mut().append(
                change.proposed,
                now,
                &change.author,
                change.changelog,
            )?;
            metrics::counter!(
                "skillshare_versions_created_total",
                "kind" => E::KIND.as_str()
            )
            .increment(1);
            info!(
                kind = %E::KIND,
                id = entity.id(),
                version,
                author = %change.author,
                "Created new version"
            );
        }
        let latest = entity.history().latest().payload.clone();
        entity.set_payload(latest);

        Ok(UpdateOutcome {
            version: entity.history().current_version(),
            new_version_created: created,
        })
    }

    /// Applies a full update request: payload change, metadata merge and
    /// provenance.
    ///
    /// Provenance (`updatedAt`/`updatedBy`) is refreshed even when no
    /// version is appended.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingAuthor`] if the update carries no author.
    pub fn update<E, U>(entity: &mut E, update: &U, now: &str) -> Result<UpdateOutcome>
    where
        E: Versioned,
        U: PayloadUpdate<E>,
    {
        let author = require_author(update.author())?;
        let change = PayloadChange {
            proposed: update.proposed_payload(&entity.payload()),
            author: author.clone(),
            changelog: update.changelog().map(ToString::to_string),
        };
        let outcome = Self::apply(entity, change, now)?;
        update.merge_metadata(entity);
        entity.touch(now, &author);
        Ok(outcome)
    }

    /// Resolves the entity view at `version`, or the latest when `None`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::VersionNotFound`] if the version does not exist.
    pub fn resolve<E: Versioned>(entity: &E, version: Option<u32>) -> Result<VersionView<E>> {
        let Some(requested) = version else {
            return Ok(VersionView {
                entity: entity.clone(),
                requested_version: None,
                is_latest: true,
            });
        };

        let record = entity
            .history()
            .get(requested)
            .ok_or_else(|| Error::VersionNotFound {
                kind: E::KIND,
                id: entity.id().to_string(),
                version: requested,
            })?;

        let mut view = entity.clone();
        view.set_payload(record.payload.clone());
        view.touch(&record.updated_at, &record.updated_by);

        Ok(VersionView {
            entity: view,
            requested_version: Some(requested),
            is_latest: requested == entity.history().current_version(),
        })
    }

    /// Lists the entity's history newest first.
    #[must_use]
    pub fn history<E: Versioned>(entity: &E) -> HistoryView<E::Payload> {
        let history = entity.history();
        let current = history.current_version();
        HistoryView {
            id: entity.id().to_string(),
            name: entity.name().to_string(),
            current_version: current,
            versions: history
                .newest_first()
                .into_iter()
                .map(|record| HistoryEntry {
                    record: record.clone(),
                    is_latest: record.version == current,
                })
                .collect(),
        }
    }
}
