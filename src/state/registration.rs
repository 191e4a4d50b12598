//! The registration form: one owner for values, errors, verification and consent

use super::consent::{ConsentGroup, FocusTarget, GroupBlur};
use super::forms::{ConsentItem, FieldError, FieldStore, TextField};
use super::gate::is_submit_ready;
use super::validation::{is_email_shape, RuleKey, RuleSet};
use super::verification::{
    run_send_request, ConfirmationOutcome, SendApplied, SendOutcome, SendRequest, TickOutcome,
    VerificationSession,
};
use crate::api::{AuthApi, CorrelationValue};
use crate::config::IntakeConfig;
use uuid::Uuid;

/// State of one registration form instance.
///
/// Every mutation goes through a transition method here; the pieces it owns
/// never reach into each other.
#[derive(Debug, Clone)]
pub struct RegistrationForm {
    session_id: Uuid,
    fields: FieldStore,
    rules: RuleSet,
    verification: VerificationSession,
    consent: ConsentGroup,
}

impl RegistrationForm {
    pub fn new(config: &IntakeConfig) -> Self {
        Self::with_rules(config, RuleSet::registration())
    }

    pub fn with_rules(config: &IntakeConfig, rules: RuleSet) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            fields: FieldStore::new(),
            rules,
            verification: VerificationSession::new(
                config.countdown_secs,
                config.correlation_key.clone(),
            ),
            consent: ConsentGroup::default(),
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn fields(&self) -> &FieldStore {
        &self.fields
    }

    pub fn verification(&self) -> &VerificationSession {
        &self.verification
    }

    pub fn consent(&self) -> &ConsentGroup {
        &self.consent
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    // Field edits

    /// Keystroke path: overwrite the value and drop its error. Editing the
    /// email also revokes any verification progress for the old address.
    pub fn set_value(&mut self, field: TextField, value: impl Into<String>) {
        self.fields.set_value(field, value);
        if field == TextField::Email && self.verification.revoke() {
            tracing::info!(session = %self.session_id, "email edited, verification revoked");
        }
    }

    /// Validate `field` against its rules on loss of focus
    pub fn blur(&mut self, field: TextField) -> Option<FieldError> {
        let error = self.rules.validate(field, &self.fields.snapshot());
        match &error {
            Some(err) => {
                tracing::debug!(session = %self.session_id, %field, message = %err.message, "field invalid");
                self.fields.set_error(field, err.clone());
            }
            None => self.fields.clear_error(field),
        }
        error
    }

    // Consent group

    pub fn set_checked(&mut self, item: ConsentItem, checked: bool) {
        self.fields.set_checked(item, checked);
        self.consent.clear_error();
    }

    /// Flip all five flags to the opposite of the current aggregate
    pub fn toggle_all(&mut self) {
        let next = !self.all_selected();
        self.fields.set_all_checked(next);
        self.consent.clear_error();
    }

    pub fn all_selected(&self) -> bool {
        self.fields.consents().all_selected()
    }

    /// A checkbox in the group lost focus; `target` says where focus went
    pub fn consent_blur(&mut self, target: FocusTarget) -> GroupBlur {
        let outcome = self.consent.on_blur(target, self.fields.consents());
        self.log_group_blur(outcome);
        outcome
    }

    /// Second look at a deferred group blur
    pub fn consent_recheck(&mut self, target: FocusTarget) -> GroupBlur {
        let outcome = self.consent.recheck(target, self.fields.consents());
        self.log_group_blur(outcome);
        outcome
    }

    fn log_group_blur(&self, outcome: GroupBlur) {
        if outcome == GroupBlur::Rejected {
            tracing::debug!(session = %self.session_id, "required consent missing");
        }
    }

    // Verification

    /// Whether the "send code" trigger is enabled
    pub fn can_send_code(&self) -> bool {
        let email = self.fields.field(TextField::Email);
        !email.is_empty()
            && !email.has_error()
            && is_email_shape(email.as_text())
            && self.verification.can_begin()
    }

    /// Start a send attempt if the trigger is enabled
    pub fn begin_send_code(&mut self) -> Option<SendRequest> {
        if !self.can_send_code() {
            tracing::debug!(session = %self.session_id, "send code ignored, trigger disabled");
            return None;
        }
        let email = self.fields.value(TextField::Email).to_string();
        let request = self.verification.begin(&email)?;
        tracing::info!(session = %self.session_id, generation = request.generation, "checking email");
        Some(request)
    }

    /// Apply the request phase result to the session and the email field
    pub fn finish_send_code(&mut self, outcome: SendOutcome) -> SendApplied {
        let generation = outcome.generation;
        let applied = self.verification.apply(outcome);
        match &applied {
            SendApplied::CodeSent { .. } => {
                self.fields.clear_error(TextField::Email);
                tracing::info!(
                    session = %self.session_id,
                    generation,
                    key = self.verification.correlation_key(),
                    "code sent, countdown started"
                );
            }
            SendApplied::Expired { .. } => {
                self.fields.clear_error(TextField::Email);
                tracing::warn!(
                    session = %self.session_id,
                    generation,
                    "code sent with a zero-second countdown, expired immediately"
                );
            }
            SendApplied::Failed { message } => {
                self.fields.set_error(TextField::Email, FieldError::new(*message));
                tracing::warn!(session = %self.session_id, generation, %message, "verification request failed");
            }
            SendApplied::Stale => {
                tracing::debug!(session = %self.session_id, generation, "stale verification response discarded");
            }
        }
        applied
    }

    /// Run a whole send attempt inline. `None` when the trigger is disabled.
    pub async fn send_code(&mut self, api: &dyn AuthApi) -> Option<SendApplied> {
        let request = self.begin_send_code()?;
        let outcome = run_send_request(api, request).await;
        Some(self.finish_send_code(outcome))
    }

    /// One countdown second for the code dispatched under `generation`
    pub fn tick(&mut self, generation: u64) -> TickOutcome {
        let outcome = self.verification.tick(generation);
        if outcome == TickOutcome::Expired {
            tracing::info!(session = %self.session_id, generation, "verification code expired");
        }
        outcome
    }

    /// Callback contract of the confirmation widget
    pub fn on_verification_result(&mut self, success: bool, completed: bool) -> ConfirmationOutcome {
        let outcome = self.verification.on_verification_result(success, completed);
        tracing::info!(session = %self.session_id, success, completed, ?outcome, "verification result");
        outcome
    }

    /// Read-and-clear of the stashed correlation value
    pub fn take_correlation(&mut self) -> Option<CorrelationValue> {
        self.verification.take_correlation()
    }

    // Gate

    /// Result of the `requiredAgree` rule for the current consents
    pub fn required_agree_error(&self) -> FieldError {
        self.rules
            .validate(RuleKey::RequiredAgree, &self.fields.snapshot())
            .unwrap_or_else(FieldError::none)
    }

    pub fn is_submit_ready(&self) -> bool {
        is_submit_ready(&self.fields, &self.rules, &self.verification, &self.consent)
    }
}

impl Default for RegistrationForm {
    fn default() -> Self {
        Self::new(&IntakeConfig::default())
    }
}
