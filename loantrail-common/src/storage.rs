//! Durable storage backends for the lead collection
//!
//! The whole collection is saved as one pretty-printed JSON array under a
//! single fixed path — there is no versioning; compatibility on load comes
//! from the tolerant field defaulting in the model deserializers.

use std::fs;
use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::model::Lead;

/// Seam between the store and its durable backing.
pub trait LeadStorage {
    /// Load the persisted collection. Absence is an empty collection, not an
    /// error; only unreadable or unparseable content errors.
    fn load(&self) -> Result<Vec<Lead>>;

    /// Replace the persisted collection with the given one.
    fn save(&mut self, leads: &[Lead]) -> Result<()>;
}

/// JSON-file-backed storage, the production backend.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl LeadStorage for FileStorage {
    fn load(&self) -> Result<Vec<Lead>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let text = fs::read_to_string(&self.path)?;
        serde_json::from_str(&text)
            .map_err(|e| Error::Storage(format!("unreadable lead file {}: {e}", self.path.display())))
    }

    fn save(&mut self, leads: &[Lead]) -> Result<()> {
        let json = serde_json::to_string_pretty(leads)
            .map_err(|e| Error::Internal(format!("lead serialization failed: {e}")))?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, json)?;
        Ok(())
    }
}

/// In-memory storage for tests and dry runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    leads: Vec<Lead>,
}

impl MemoryStorage {
    pub fn with_leads(leads: Vec<Lead>) -> Self {
        Self { leads }
    }

    pub fn leads(&self) -> &[Lead] {
        &self.leads
    }
}

impl LeadStorage for MemoryStorage {
    fn load(&self) -> Result<Vec<Lead>> {
        Ok(self.leads.clone())
    }

    fn save(&mut self, leads: &[Lead]) -> Result<()> {
        self.leads = leads.to_vec();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_storage_missing_file_is_empty() {
        let storage = FileStorage::new(PathBuf::from("/nonexistent/loantrail/leads.json"));
        let leads = storage.load().unwrap();
        assert!(leads.is_empty());
    }

    #[test]
    fn test_memory_storage_round_trip() {
        let mut storage = MemoryStorage::default();
        let lead = Lead {
            id: "a".into(),
            name: "Ann".into(),
            ..Lead::default()
        };
        storage.save(std::slice::from_ref(&lead)).unwrap();
        let loaded = storage.load().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, "a");
    }
}
