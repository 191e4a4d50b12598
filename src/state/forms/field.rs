//! Form field value objects

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Free-text fields tracked by the registration form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TextField {
    Email,
    Password,
    PasswordConfirm,
    UserName,
}

impl TextField {
    pub const ALL: [TextField; 4] = [
        TextField::Email,
        TextField::Password,
        TextField::PasswordConfirm,
        TextField::UserName,
    ];

    /// Wire/markup name of the field
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Password => "password",
            Self::PasswordConfirm => "passwordConfirm",
            Self::UserName => "userName",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Email => "Email",
            Self::Password => "Password",
            Self::PasswordConfirm => "Confirm password",
            Self::UserName => "Nickname",
        }
    }

    /// Helper text shown under the input, if any
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::Password => Some("letters and digits, at least 8 characters"),
            Self::UserName => Some("2 to 15 characters, must be unique"),
            Self::Email | Self::PasswordConfirm => None,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// The five consent checkboxes of the agreement group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ConsentItem {
    AgeCheck,
    AgreeToTerms,
    AgreeToPrivacyPolicy,
    IsMarketing,
    IsEvent,
}

impl ConsentItem {
    pub const ALL: [ConsentItem; 5] = [
        ConsentItem::AgeCheck,
        ConsentItem::AgreeToTerms,
        ConsentItem::AgreeToPrivacyPolicy,
        ConsentItem::IsMarketing,
        ConsentItem::IsEvent,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AgeCheck => "ageCheck",
            Self::AgreeToTerms => "agreeToTerms",
            Self::AgreeToPrivacyPolicy => "agreeToPrivacyPolicy",
            Self::IsMarketing => "isMarketing",
            Self::IsEvent => "isEvent",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::AgeCheck => "I am 14 years of age or older",
            Self::AgreeToTerms => "Terms of service",
            Self::AgreeToPrivacyPolicy => "Collection and use of personal information",
            Self::IsMarketing => "Use of personal information for marketing",
            Self::IsEvent => "Event, coupon and special offer notices by mail and SMS",
        }
    }

    /// Age, terms and privacy must be accepted; marketing and event notices are optional
    pub fn is_required(&self) -> bool {
        matches!(
            self,
            Self::AgeCheck | Self::AgreeToTerms | Self::AgreeToPrivacyPolicy
        )
    }
}

/// Any tracked field, text or checkbox
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldName {
    Text(TextField),
    Consent(ConsentItem),
}

impl FieldName {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text(field) => field.as_str(),
            Self::Consent(item) => item.as_str(),
        }
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for TextField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a name does not match any tracked field
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown field `{0}`")]
pub struct UnknownField(pub String);

impl FromStr for FieldName {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TextField::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .map(FieldName::Text)
            .or_else(|| {
                ConsentItem::ALL
                    .into_iter()
                    .find(|c| c.as_str() == s)
                    .map(FieldName::Consent)
            })
            .ok_or_else(|| UnknownField(s.to_string()))
    }
}

/// Per-field error record rendered beside the input
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldError {
    pub is_error: bool,
    pub message: String,
}

impl FieldError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            is_error: true,
            message: message.into(),
        }
    }

    /// The cleared record
    pub fn none() -> Self {
        Self::default()
    }
}

/// A single text field with its current value and error record
#[derive(Debug, Clone)]
pub struct FormField {
    pub name: TextField,
    pub value: String,
    pub error: FieldError,
}

impl FormField {
    pub fn new(name: TextField) -> Self {
        Self {
            name,
            value: String::new(),
            error: FieldError::none(),
        }
    }

    pub fn as_text(&self) -> &str {
        &self.value
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    pub fn has_error(&self) -> bool {
        self.error.is_error
    }

    /// Overwrite the value; any pending error is dropped with it
    pub fn set_text(&mut self, value: String) {
        self.value = value;
        self.error = FieldError::none();
    }
}

/// Fixed-order storage for the four text fields
#[derive(Debug, Clone)]
pub(crate) struct TextFields([FormField; 4]);

impl TextFields {
    pub(crate) fn new() -> Self {
        Self(TextField::ALL.map(FormField::new))
    }

    pub(crate) fn get(&self, name: TextField) -> &FormField {
        &self.0[name.index()]
    }

    pub(crate) fn get_mut(&mut self, name: TextField) -> &mut FormField {
        &mut self.0[name.index()]
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &FormField> {
        self.0.iter()
    }
}
