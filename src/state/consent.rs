//! Consent checkbox group and its derived "select all" control

use super::forms::{ConsentItem, FieldError};
use serde::Serialize;

/// Message raised when focus leaves the group with a required item unchecked
pub const GROUP_CONSENT_MESSAGE: &str = "must accept required items";

/// The five consent flags.
///
/// "Select all" is never stored; it is computed from the flags on demand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsentSet {
    pub age_check: bool,
    pub agree_to_terms: bool,
    pub agree_to_privacy_policy: bool,
    pub is_marketing: bool,
    pub is_event: bool,
}

impl ConsentSet {
    pub fn with_all(checked: bool) -> Self {
        Self {
            age_check: checked,
            agree_to_terms: checked,
            agree_to_privacy_policy: checked,
            is_marketing: checked,
            is_event: checked,
        }
    }

    pub fn get(&self, item: ConsentItem) -> bool {
        match item {
            ConsentItem::AgeCheck => self.age_check,
            ConsentItem::AgreeToTerms => self.agree_to_terms,
            ConsentItem::AgreeToPrivacyPolicy => self.agree_to_privacy_policy,
            ConsentItem::IsMarketing => self.is_marketing,
            ConsentItem::IsEvent => self.is_event,
        }
    }

    pub fn set(&mut self, item: ConsentItem, checked: bool) {
        let flag = match item {
            ConsentItem::AgeCheck => &mut self.age_check,
            ConsentItem::AgreeToTerms => &mut self.agree_to_terms,
            ConsentItem::AgreeToPrivacyPolicy => &mut self.agree_to_privacy_policy,
            ConsentItem::IsMarketing => &mut self.is_marketing,
            ConsentItem::IsEvent => &mut self.is_event,
        };
        *flag = checked;
    }

    /// Conjunction of all five flags
    pub fn all_selected(&self) -> bool {
        ConsentItem::ALL.into_iter().all(|item| self.get(item))
    }

    /// Conjunction of the three required flags
    pub fn required_accepted(&self) -> bool {
        ConsentItem::ALL
            .into_iter()
            .filter(ConsentItem::is_required)
            .all(|item| self.get(item))
    }

    /// Result of pressing "select all": every flag flips to the opposite of the aggregate
    pub fn toggled_all(&self) -> Self {
        Self::with_all(!self.all_selected())
    }
}

/// Where focus went after a blur inside the consent group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusTarget {
    /// A sibling checkbox inside the group
    InsideGroup,
    /// Anything outside the group container
    OutsideGroup,
    /// The host cannot tell yet; ask again on the next scheduling tick
    Unknown,
}

/// What a group blur resolved to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupBlur {
    /// Focus moved between siblings, nothing to do
    StillInside,
    /// Focus genuinely left and the required items were accepted
    Accepted,
    /// Focus genuinely left with a required item unchecked; group error raised
    Rejected,
    /// Waiting for a single re-check of the focus target
    Deferred,
}

/// Group-level error record and pending focus re-check
#[derive(Debug, Clone, Default)]
pub struct ConsentGroup {
    error: FieldError,
    recheck_pending: bool,
}

impl ConsentGroup {
    pub fn error(&self) -> &FieldError {
        &self.error
    }

    pub fn has_error(&self) -> bool {
        self.error.is_error
    }

    pub fn is_recheck_pending(&self) -> bool {
        self.recheck_pending
    }

    /// Any flag edit drops a pending group error
    pub fn clear_error(&mut self) {
        self.error = FieldError::none();
    }

    /// Handle a blur event from inside the group.
    pub fn on_blur(&mut self, target: FocusTarget, consents: ConsentSet) -> GroupBlur {
        match target {
            FocusTarget::InsideGroup => {
                self.recheck_pending = false;
                GroupBlur::StillInside
            }
            FocusTarget::OutsideGroup => {
                self.recheck_pending = false;
                self.validate(consents)
            }
            FocusTarget::Unknown => {
                self.recheck_pending = true;
                GroupBlur::Deferred
            }
        }
    }

    /// Resolve a deferred blur. Only one re-check is honoured per blur; an
    /// unresolvable target is treated as still inside the group.
    pub fn recheck(&mut self, target: FocusTarget, consents: ConsentSet) -> GroupBlur {
        if !self.recheck_pending {
            return GroupBlur::StillInside;
        }
        self.recheck_pending = false;
        match target {
            FocusTarget::OutsideGroup => self.validate(consents),
            FocusTarget::InsideGroup | FocusTarget::Unknown => GroupBlur::StillInside,
        }
    }

    fn validate(&mut self, consents: ConsentSet) -> GroupBlur {
        if consents.required_accepted() {
            self.error = FieldError::none();
            GroupBlur::Accepted
        } else {
            self.error = FieldError::new(GROUP_CONSENT_MESSAGE);
            GroupBlur::Rejected
        }
    }
}
