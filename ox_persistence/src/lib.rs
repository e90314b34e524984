pub mod memory;
pub mod morph_map;

pub use memory::MemoryStore;
pub use morph_map::MorphMap;

use ox_data_object::GenericDataObject;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PersistenceError {
    #[error("no '{class}' record with id '{id}'")]
    NotFound { class: String, id: String },
    #[error("no transaction is active")]
    NoActiveTransaction,
    #[error("storage failure: {0}")]
    Storage(String),
}

/// Storage collaborator used by form fields to look up, create and remove
/// related records.
pub trait RecordStore: Send + Sync {
    /// A fresh, unsaved record of `class`.
    fn instantiate(&self, class: &str) -> GenericDataObject;

    /// Load a record by primary key, failing with `NotFound` if absent.
    fn find_or_fail(&self, class: &str, id: &str) -> Result<GenericDataObject, PersistenceError>;

    /// Insert or update the record under its class and id.
    fn save(&self, record: &mut GenericDataObject) -> Result<(), PersistenceError>;

    fn delete(&self, record: &GenericDataObject) -> Result<(), PersistenceError>;

    fn begin_transaction(&self) -> Result<(), PersistenceError>;
    fn commit(&self) -> Result<(), PersistenceError>;
    fn rollback(&self) -> Result<(), PersistenceError>;
}

/// Run `f` inside a transaction on `store`. Committed on `Ok`, rolled back on `Err`.
pub fn transaction<T, E, F>(store: &dyn RecordStore, f: F) -> Result<T, E>
where
    F: FnOnce() -> Result<T, E>,
    E: From<PersistenceError>,
{
    store.begin_transaction()?;
    match f() {
        Ok(value) => {
            store.commit()?;
            Ok(value)
        }
        Err(e) => {
            if let Err(rollback_err) = store.rollback() {
                log::error!("Rollback failed: {}", rollback_err);
            }
            Err(e)
        }
    }
}
