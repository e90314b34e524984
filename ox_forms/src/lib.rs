pub mod binding;
pub mod config;
pub mod context;
pub mod error;
pub mod polymorphic;
pub mod registry;
pub mod request;
pub mod resolver;
pub mod schema;
pub mod traits;
pub mod validation;

pub use binding::*;
pub use config::FormsConfig;
pub use context::FieldContext;
pub use error::FormError;
pub use polymorphic::*;
pub use registry::HookRegistry;
pub use request::*;
pub use resolver::{FieldSetPolicy, FieldSetResolver};
pub use schema::*;
pub use traits::*;
pub use validation::{ValidationError, Validator};
