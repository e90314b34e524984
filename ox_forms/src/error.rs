use ox_persistence::PersistenceError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FormError {
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
    #[error("field '{field}' registers discriminator '{discriminator}' more than once")]
    DuplicateDiscriminator { field: String, discriminator: String },
    #[error("field '{field}' has no type registered for '{value}'")]
    UnknownDiscriminator { field: String, value: String },
    #[error("record has no related id for field '{field}'")]
    MissingRelatedId { field: String },
    #[error("hook failed: {0}")]
    Hook(#[from] anyhow::Error),
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl FormError {
    /// True for failures the host should answer with "not found".
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            FormError::Persistence(PersistenceError::NotFound { .. }) | FormError::MissingRelatedId { .. }
        )
    }
}
