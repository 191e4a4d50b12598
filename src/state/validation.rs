//! Ordered per-field validation rules
//!
//! Each field owns a list of `(violated, message)` pairs. Rules are tried in
//! declaration order and the first violated one is reported; later rules are
//! never consulted.

use super::forms::{FieldError, FormValues, TextField};
use regex::Regex;
use std::sync::LazyLock;

pub const EMAIL_REQUIRED: &str = "email required";
pub const EMAIL_MALFORMED: &str = "malformed email";
pub const PASSWORD_REQUIRED: &str = "password required";
pub const PASSWORD_WEAK: &str = "weak password";
pub const PASSWORD_MISMATCH: &str = "passwords do not match";
pub const NAME_REQUIRED: &str = "name required";
pub const NAME_TOO_SHORT: &str = "too short";
pub const NAME_TOO_LONG: &str = "too long";
pub const REQUIRED_AGREE: &str = "must accept required terms";

pub const USER_NAME_MIN_CHARS: usize = 2;
pub const USER_NAME_MAX_CHARS: usize = 15;
const PASSWORD_MIN_CHARS: usize = 8;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9-]+(\.[A-Za-z0-9-]+)*\.[A-Za-z]{2,}$")
        .expect("email pattern compiles")
});

static PASSWORD_CHARSET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9@$!%*#?&]+$").expect("password pattern compiles"));

/// Standard email shape check
pub fn is_email_shape(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

/// At least one letter, one digit, and 8+ characters from the allowed set
pub fn is_strong_password(value: &str) -> bool {
    value.chars().count() >= PASSWORD_MIN_CHARS
        && PASSWORD_CHARSET_RE.is_match(value)
        && value.chars().any(|c| c.is_ascii_alphabetic())
        && value.chars().any(|c| c.is_ascii_digit())
}

/// What a rule list is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKey {
    Field(TextField),
    /// Synthetic key: the three required consent flags taken together
    RequiredAgree,
}

impl From<TextField> for RuleKey {
    fn from(field: TextField) -> Self {
        RuleKey::Field(field)
    }
}

/// A single condition/message pair
#[derive(Clone, Copy)]
pub struct Rule {
    violated: fn(&FormValues<'_>) -> bool,
    message: &'static str,
}

impl Rule {
    pub const fn new(violated: fn(&FormValues<'_>) -> bool, message: &'static str) -> Self {
        Self { violated, message }
    }

    pub fn message(&self) -> &'static str {
        self.message
    }
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule").field("message", &self.message).finish()
    }
}

/// Rule lists keyed by field
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<(RuleKey, Vec<Rule>)>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Append a rule to the end of a key's list
    pub fn push(&mut self, key: impl Into<RuleKey>, rule: Rule) -> &mut Self {
        let key = key.into();
        match self.rules.iter_mut().find(|(k, _)| *k == key) {
            Some((_, list)) => list.push(rule),
            None => self.rules.push((key, vec![rule])),
        }
        self
    }

    pub fn rules_for(&self, key: impl Into<RuleKey>) -> &[Rule] {
        let key = key.into();
        self.rules
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, list)| list.as_slice())
            .unwrap_or(&[])
    }

    /// First violated rule for `key`, or `None` when the value is valid
    pub fn validate(&self, key: impl Into<RuleKey>, values: &FormValues<'_>) -> Option<FieldError> {
        self.rules_for(key)
            .iter()
            .find(|rule| (rule.violated)(values))
            .map(|rule| FieldError::new(rule.message))
    }

    /// The registration form's rules
    pub fn registration() -> Self {
        let mut set = Self::new();
        set.push(TextField::Email, Rule::new(|v| v.email.is_empty(), EMAIL_REQUIRED))
            .push(
                TextField::Email,
                Rule::new(|v| !is_email_shape(v.email), EMAIL_MALFORMED),
            )
            .push(
                TextField::Password,
                Rule::new(|v| v.password.is_empty(), PASSWORD_REQUIRED),
            )
            .push(
                TextField::Password,
                Rule::new(|v| !is_strong_password(v.password), PASSWORD_WEAK),
            )
            .push(
                TextField::PasswordConfirm,
                Rule::new(
                    |v| v.password_confirm.is_empty() || v.password_confirm != v.password,
                    PASSWORD_MISMATCH,
                ),
            )
            .push(
                TextField::UserName,
                Rule::new(|v| v.user_name.is_empty(), NAME_REQUIRED),
            )
            .push(
                TextField::UserName,
                Rule::new(
                    |v| v.user_name.chars().count() < USER_NAME_MIN_CHARS,
                    NAME_TOO_SHORT,
                ),
            )
            .push(
                TextField::UserName,
                Rule::new(
                    |v| v.user_name.chars().count() > USER_NAME_MAX_CHARS,
                    NAME_TOO_LONG,
                ),
            )
            .push(
                RuleKey::RequiredAgree,
                Rule::new(|v| !v.consents.required_accepted(), REQUIRED_AGREE),
            );
        set
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::registration()
    }
}
