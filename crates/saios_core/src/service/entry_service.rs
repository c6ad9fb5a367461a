//! Entry store use-case service.
//!
//! # Responsibility
//! - Provide add/list/update/delete entry points for every domain page.
//! - Assign ids and creation timestamps; delegate persistence to repositories.
//!
//! # Invariants
//! - Service APIs never bypass repository validation.
//! - Delete and update of an absent id are silent no-ops.
//! - Log events carry ids and domains only, never entry payload text.

use crate::model::domain::Domain;
use crate::model::entry::{Entry, EntryId, EntryPatch, NewEntry};
use crate::repo::entry_repo::{EntryListQuery, EntryRepository, RepoResult};
use chrono::{DateTime, Utc};
use log::{debug, error, info};

/// Use-case service wrapper for entry collections.
pub struct EntryService<R: EntryRepository> {
    repo: R,
}

impl<R: EntryRepository> EntryService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Adds an entry stamped with the current time.
    pub fn add(&self, domain: Domain, input: NewEntry) -> RepoResult<Entry> {
        self.add_at(domain, input, Utc::now())
    }

    /// Adds an entry with an explicit timestamp (backfill and import paths).
    ///
    /// # Contract
    /// - Assigns a fresh clock-derived id.
    /// - Returns the entry exactly as stored.
    pub fn add_at(
        &self,
        domain: Domain,
        input: NewEntry,
        recorded_at: DateTime<Utc>,
    ) -> RepoResult<Entry> {
        let entry = Entry::create(domain, input, recorded_at);
        match self.repo.insert_entry(&entry) {
            Ok(id) => {
                info!("event=entry_add module=service status=ok domain={domain} id={id}");
                Ok(entry)
            }
            Err(err) => {
                error!(
                    "event=entry_add module=service status=error domain={} error={}",
                    domain, err
                );
                Err(err)
            }
        }
    }

    pub fn get(&self, id: EntryId) -> RepoResult<Option<Entry>> {
        self.repo.get_entry(id)
    }

    /// Returns one domain collection, most recent first.
    pub fn get_all(&self, domain: Domain) -> RepoResult<Vec<Entry>> {
        self.repo.list_entries(&EntryListQuery::domain(domain))
    }

    /// Returns entries of one category label, most recent first.
    pub fn get_by_kind(&self, domain: Domain, kind: &str) -> RepoResult<Vec<Entry>> {
        self.repo.list_entries(&EntryListQuery {
            kind: Some(kind.to_string()),
            ..EntryListQuery::domain(domain)
        })
    }

    /// Returns entries recorded within `[start, end]`, most recent first.
    pub fn get_by_date_range(
        &self,
        domain: Domain,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> RepoResult<Vec<Entry>> {
        self.repo.list_entries(&EntryListQuery {
            since: Some(start),
            until: Some(end),
            ..EntryListQuery::domain(domain)
        })
    }

    /// Runs an arbitrary list query.
    pub fn list(&self, query: &EntryListQuery) -> RepoResult<Vec<Entry>> {
        self.repo.list_entries(query)
    }

    /// Merges `patch` into the entry with `id`.
    ///
    /// Returns `None` without writing when the id is absent.
    pub fn update(&self, id: EntryId, patch: &EntryPatch) -> RepoResult<Option<Entry>> {
        let Some(mut entry) = self.repo.get_entry(id)? else {
            debug!("event=entry_update module=service status=skipped reason=not_found id={id}");
            return Ok(None);
        };

        entry.apply_patch(patch);
        if !self.repo.update_entry(&entry)? {
            return Ok(None);
        }

        info!(
            "event=entry_update module=service status=ok domain={} id={}",
            entry.domain, id
        );
        Ok(Some(entry))
    }

    /// Flips the completion flag of a ritual-style entry.
    ///
    /// Entries without a flag become completed.
    pub fn toggle_completed(&self, id: EntryId) -> RepoResult<Option<Entry>> {
        let Some(entry) = self.repo.get_entry(id)? else {
            return Ok(None);
        };
        let patch = EntryPatch {
            completed: Some(!entry.completed.unwrap_or(false)),
            ..EntryPatch::default()
        };
        self.update(id, &patch)
    }

    /// Removes the entry with `id`. Returns whether a row was removed.
    pub fn delete(&self, id: EntryId) -> RepoResult<bool> {
        let removed = self.repo.delete_entry(id)?;
        if removed {
            info!("event=entry_delete module=service status=ok id={id}");
        } else {
            debug!("event=entry_delete module=service status=skipped reason=not_found id={id}");
        }
        Ok(removed)
    }
}
