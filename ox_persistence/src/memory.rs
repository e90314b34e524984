use crate::{PersistenceError, RecordStore};
use ox_data_object::GenericDataObject;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

type Table = BTreeMap<(String, String), Map<String, Value>>;

#[derive(Default)]
struct MemoryState {
    records: Table,
    /// One snapshot per open transaction, innermost last.
    savepoints: Vec<Table>,
}

/// Record store kept entirely in memory. Transactions nest as savepoints.
pub struct MemoryStore {
    identifier_name: String,
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_identifier("id")
    }

    pub fn with_identifier(identifier_name: &str) -> Self {
        Self {
            identifier_name: identifier_name.to_string(),
            state: Mutex::new(MemoryState::default()),
        }
    }

    fn state(&self) -> Result<MutexGuard<'_, MemoryState>, PersistenceError> {
        self.state
            .lock()
            .map_err(|_| PersistenceError::Storage("memory store lock poisoned".to_string()))
    }

    pub fn contains(&self, class: &str, id: &str) -> bool {
        self.state()
            .map(|s| s.records.contains_key(&(class.to_string(), id.to_string())))
            .unwrap_or(false)
    }

    pub fn count(&self, class: &str) -> usize {
        self.state()
            .map(|s| s.records.keys().filter(|(c, _)| c == class).count())
            .unwrap_or(0)
    }

    pub fn in_transaction(&self) -> bool {
        self.state().map(|s| !s.savepoints.is_empty()).unwrap_or(false)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordStore for MemoryStore {
    fn instantiate(&self, class: &str) -> GenericDataObject {
        GenericDataObject::unsaved(class, &self.identifier_name)
    }

    fn find_or_fail(&self, class: &str, id: &str) -> Result<GenericDataObject, PersistenceError> {
        let state = self.state()?;
        let attributes = state
            .records
            .get(&(class.to_string(), id.to_string()))
            .ok_or_else(|| PersistenceError::NotFound {
                class: class.to_string(),
                id: id.to_string(),
            })?;

        let mut record = GenericDataObject::with_id(class, &self.identifier_name, id);
        record.set_attributes(attributes.clone());
        Ok(record)
    }

    fn save(&self, record: &mut GenericDataObject) -> Result<(), PersistenceError> {
        let id = match record.id() {
            Some(id) => id,
            None => record.assign_id(),
        };

        log::debug!("Saving '{}' record {}", record.class_name, id);
        let mut state = self.state()?;
        state
            .records
            .insert((record.class_name.clone(), id), record.attributes().clone());
        Ok(())
    }

    fn delete(&self, record: &GenericDataObject) -> Result<(), PersistenceError> {
        let id = record.id().ok_or_else(|| PersistenceError::NotFound {
            class: record.class_name.clone(),
            id: String::new(),
        })?;

        log::debug!("Deleting '{}' record {}", record.class_name, id);
        let mut state = self.state()?;
        state
            .records
            .remove(&(record.class_name.clone(), id.clone()))
            .map(|_| ())
            .ok_or(PersistenceError::NotFound {
                class: record.class_name.clone(),
                id,
            })
    }

    fn begin_transaction(&self) -> Result<(), PersistenceError> {
        let mut state = self.state()?;
        let snapshot = state.records.clone();
        state.savepoints.push(snapshot);
        Ok(())
    }

    fn commit(&self) -> Result<(), PersistenceError> {
        let mut state = self.state()?;
        state
            .savepoints
            .pop()
            .map(|_| ())
            .ok_or(PersistenceError::NoActiveTransaction)
    }

    fn rollback(&self) -> Result<(), PersistenceError> {
        let mut state = self.state()?;
        let snapshot = state
            .savepoints
            .pop()
            .ok_or(PersistenceError::NoActiveTransaction)?;
        state.records = snapshot;
        Ok(())
    }
}
