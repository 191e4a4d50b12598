//! Field value store for the registration form

use super::field::{ConsentItem, FieldError, FormField, TextField, TextFields};
use crate::state::ConsentSet;

/// Read-only view of every value the validation rules may look at
#[derive(Debug, Clone, Copy)]
pub struct FormValues<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub password_confirm: &'a str,
    pub user_name: &'a str,
    pub consents: ConsentSet,
}

impl FormValues<'_> {
    pub fn text(&self, field: TextField) -> &str {
        match field {
            TextField::Email => self.email,
            TextField::Password => self.password,
            TextField::PasswordConfirm => self.password_confirm,
            TextField::UserName => self.user_name,
        }
    }
}

/// Current values and error records of all tracked fields.
///
/// Pure value cache: nothing here validates. The only side effect of an edit
/// is that the edited field's error record is reset.
#[derive(Debug, Clone)]
pub struct FieldStore {
    text: TextFields,
    consents: ConsentSet,
}

impl FieldStore {
    pub fn new() -> Self {
        Self {
            text: TextFields::new(),
            consents: ConsentSet::default(),
        }
    }

    /// Overwrite a text field and clear its error record
    pub fn set_value(&mut self, name: TextField, value: impl Into<String>) {
        self.text.get_mut(name).set_text(value.into());
    }

    /// Boolean analogue of [`FieldStore::set_value`] for the consent checkboxes
    pub fn set_checked(&mut self, item: ConsentItem, checked: bool) {
        self.consents.set(item, checked);
    }

    /// Write all five consent flags at once
    pub fn set_all_checked(&mut self, checked: bool) {
        self.consents = ConsentSet::with_all(checked);
    }

    /// Current text of a field
    pub fn value(&self, name: TextField) -> &str {
        self.text.get(name).as_text()
    }

    /// Value and error record together
    pub fn field(&self, name: TextField) -> &FormField {
        self.text.get(name)
    }

    /// State of one consent checkbox
    pub fn is_checked(&self, item: ConsentItem) -> bool {
        self.consents.get(item)
    }

    /// Copy of all five consent flags
    pub fn consents(&self) -> ConsentSet {
        self.consents
    }

    /// Error record of a field; cleared records have `is_error == false`
    pub fn error(&self, name: TextField) -> &FieldError {
        &self.text.get(name).error
    }

    /// Replace the error record, leaving the value alone
    pub fn set_error(&mut self, name: TextField, error: FieldError) {
        self.text.get_mut(name).error = error;
    }

    /// Reset the record to the cleared state
    pub fn clear_error(&mut self, name: TextField) {
        self.text.get_mut(name).error = FieldError::none();
    }

    /// True if any text field currently holds an error
    pub fn any_error(&self) -> bool {
        self.text.iter().any(FormField::has_error)
    }

    /// Borrowed read-only view for the rule engine
    pub fn snapshot(&self) -> FormValues<'_> {
        FormValues {
            email: self.value(TextField::Email),
            password: self.value(TextField::Password),
            password_confirm: self.value(TextField::PasswordConfirm),
            user_name: self.value(TextField::UserName),
            consents: self.consents,
        }
    }
}

impl Default for FieldStore {
    fn default() -> Self {
        Self::new()
    }
}
