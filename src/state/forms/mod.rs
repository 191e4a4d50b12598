//! Form domain layer
//!
//! Type-safe field names, values and error records for the registration form.

mod field;
mod form_state;

pub use field::{ConsentItem, FieldError, FieldName, FormField, TextField, UnknownField};
pub use form_state::{FieldStore, FormValues};
