//! The owning lead store
//!
//! Holds the authoritative in-memory collection (most-recent-first by
//! convention) and pushes a full-collection save to durable storage after
//! every mutation. Saves are best-effort: a failed write is logged and
//! swallowed, and the in-memory state stays authoritative for the session.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::model::{new_lead_id, Lead, LeadPatch, LeadStatus};
use crate::storage::LeadStorage;
use crate::time;

/// Direction for a single-step status move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusMove {
    Forward,
    Back,
}

/// Result of a merge-import: how many records merged into existing leads and
/// how many were inserted as new.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    pub merged: usize,
    pub added: usize,
}

pub struct LeadStore {
    leads: Vec<Lead>,
    storage: Box<dyn LeadStorage>,
}

impl LeadStore {
    /// Open the store, rehydrating from the given backend. A missing or
    /// unparseable persisted collection is treated as empty, never fatal.
    pub fn open(storage: Box<dyn LeadStorage>) -> Self {
        let leads = match storage.load() {
            Ok(leads) => {
                debug!(count = leads.len(), "loaded lead collection");
                leads
            }
            Err(e) => {
                warn!(error = %e, "could not load persisted leads, starting empty");
                Vec::new()
            }
        };
        Self { leads, storage }
    }

    pub fn leads(&self) -> &[Lead] {
        &self.leads
    }

    pub fn len(&self) -> usize {
        self.leads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leads.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Lead> {
        self.leads.iter().find(|l| l.id == id)
    }

    /// Insert a lead at the front of the collection. Always succeeds: a blank
    /// or colliding id is replaced with a fresh one, and timestamps are
    /// stamped when the lead does not carry valid ones.
    pub fn create(&mut self, mut lead: Lead) -> Lead {
        if lead.id.trim().is_empty() || self.get(&lead.id).is_some() {
            lead.id = new_lead_id();
        }
        let now = time::now_millis();
        if lead.created_at <= 0 {
            lead.created_at = now;
        }
        lead.updated_at = now.max(lead.created_at);
        self.leads.insert(0, lead.clone());
        self.persist();
        lead
    }

    /// Merge a patch onto the lead with the given id, refreshing
    /// `updated_at`. Returns `None` (a logged no-op) when the id is absent.
    pub fn update(&mut self, id: &str, patch: &LeadPatch) -> Option<Lead> {
        let now = time::now_millis();
        let Some(lead) = self.leads.iter_mut().find(|l| l.id == id) else {
            debug!(%id, "update: no such lead");
            return None;
        };
        lead.apply_patch(patch);
        lead.updated_at = now.max(lead.created_at);
        let updated = lead.clone();
        self.persist();
        Some(updated)
    }

    /// Remove the lead with the given id. Idempotent: deleting an absent id
    /// is a no-op and returns false.
    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.leads.len();
        self.leads.retain(|l| l.id != id);
        let removed = self.leads.len() != before;
        if removed {
            self.persist();
        } else {
            debug!(%id, "delete: no such lead");
        }
        removed
    }

    /// Remove every lead whose id is in the given set; returns the count
    /// removed.
    pub fn bulk_delete(&mut self, ids: &[String]) -> usize {
        let ids: HashSet<&str> = ids.iter().map(String::as_str).collect();
        let before = self.leads.len();
        self.leads.retain(|l| !ids.contains(l.id.as_str()));
        let removed = before - self.leads.len();
        if removed > 0 {
            self.persist();
        }
        removed
    }

    /// Shift a lead's status one step along the pipeline ordering, clamped at
    /// both ends. Arrival at `Won` stamps `close_date` if unset. Returns the
    /// (possibly unchanged) status, or `None` when the id is absent.
    pub fn move_status(&mut self, id: &str, direction: StatusMove) -> Option<LeadStatus> {
        let now = time::now_millis();
        let today = time::today();
        let Some(lead) = self.leads.iter_mut().find(|l| l.id == id) else {
            debug!(%id, "move_status: no such lead");
            return None;
        };
        let next = match direction {
            StatusMove::Forward => lead.status.next(),
            StatusMove::Back => lead.status.prev(),
        };
        lead.status = next;
        if next == LeadStatus::Won && lead.close_date.is_none() {
            lead.close_date = Some(today);
        }
        lead.updated_at = now.max(lead.created_at);
        self.persist();
        Some(next)
    }

    /// Reconcile an imported record list with the collection, by id.
    ///
    /// A record whose id matches an existing lead shallow-merges onto it:
    /// last writer wins per present field, absent fields are preserved, and
    /// `updated_at` is refreshed. Anything else is inserted as a new lead
    /// (id generated and timestamps stamped when the record lacks them).
    /// New records keep their incoming order at the front of the collection.
    /// Each insert lands immediately, so a record repeated within one batch
    /// merges onto the copy inserted earlier instead of duplicating its id.
    pub fn merge_import(&mut self, records: Vec<LeadPatch>) -> MergeOutcome {
        let now = time::now_millis();
        let mut outcome = MergeOutcome::default();
        let mut insert_at = 0;

        for record in records {
            let existing = record
                .id
                .as_deref()
                .and_then(|id| self.leads.iter_mut().find(|l| l.id == id));
            match existing {
                Some(lead) => {
                    lead.apply_patch(&record);
                    lead.updated_at = now.max(lead.created_at);
                    outcome.merged += 1;
                }
                None => {
                    self.leads.insert(insert_at, Lead::from_patch(record, now));
                    insert_at += 1;
                    outcome.added += 1;
                }
            }
        }

        self.persist();
        debug!(merged = outcome.merged, added = outcome.added, "merge import complete");
        outcome
    }

    // Best-effort full-collection save; failures never interrupt the
    // mutation that triggered them.
    fn persist(&mut self) {
        if let Err(e) = self.storage.save(&self.leads) {
            warn!(error = %e, "lead save failed, in-memory state remains authoritative");
        }
    }
}
