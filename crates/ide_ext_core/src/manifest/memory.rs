//! In-memory manifest store.

use super::{ManifestRecord, ManifestResult, ManifestStore};

/// Default manifest store; records live for the manager's lifetime.
#[derive(Debug, Default, Clone)]
pub struct InMemoryManifestStore {
    records: Vec<ManifestRecord>,
}

impl InMemoryManifestStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl ManifestStore for InMemoryManifestStore {
    fn upsert(&mut self, record: ManifestRecord) -> ManifestResult<()> {
        match self.records.iter_mut().find(|item| item.path == record.path) {
            Some(existing) => *existing = record,
            None => self.records.push(record),
        }
        Ok(())
    }

    fn set_enabled(&mut self, path: &str, enabled: bool) -> ManifestResult<bool> {
        match self.records.iter_mut().find(|item| item.path == path) {
            Some(existing) => {
                existing.enabled = enabled;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn get(&self, path: &str) -> ManifestResult<Option<ManifestRecord>> {
        Ok(self.records.iter().find(|item| item.path == path).cloned())
    }

    fn list(&self) -> ManifestResult<Vec<ManifestRecord>> {
        Ok(self.records.clone())
    }
}
