//! Submission gate

use super::consent::ConsentGroup;
use super::forms::{FieldStore, TextField};
use super::validation::{RuleKey, RuleSet};
use super::verification::VerificationSession;

/// Whether the create-account action may be invoked.
///
/// Confirmed email, every text field filled, the `requiredAgree` rule
/// passing, and no field or group error outstanding.
pub fn is_submit_ready(
    fields: &FieldStore,
    rules: &RuleSet,
    session: &VerificationSession,
    consent: &ConsentGroup,
) -> bool {
    session.is_confirmed()
        && TextField::ALL
            .into_iter()
            .all(|field| !fields.value(field).is_empty())
        && rules
            .validate(RuleKey::RequiredAgree, &fields.snapshot())
            .is_none()
        && !fields.any_error()
        && !consent.has_error()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::CorrelationValue;
    use crate::state::forms::{ConsentItem, FieldError};
    use crate::state::validation::Rule;
    use crate::state::verification::SendOutcome;

    fn filled_store() -> FieldStore {
        let mut fields = FieldStore::new();
        fields.set_value(TextField::Email, "a@b.com");
        fields.set_value(TextField::Password, "abcd1234");
        fields.set_value(TextField::PasswordConfirm, "abcd1234");
        fields.set_value(TextField::UserName, "neo");
        fields.set_checked(ConsentItem::AgeCheck, true);
        fields.set_checked(ConsentItem::AgreeToTerms, true);
        fields.set_checked(ConsentItem::AgreeToPrivacyPolicy, true);
        fields
    }

    fn confirmed_session() -> VerificationSession {
        let mut session = VerificationSession::default();
        let request = session.begin("a@b.com").unwrap();
        session.apply(SendOutcome {
            generation: request.generation,
            result: Ok(CorrelationValue::new("1")),
        });
        session.on_verification_result(true, true);
        session
    }

    fn ready(fields: &FieldStore, session: &VerificationSession, consent: &ConsentGroup) -> bool {
        is_submit_ready(fields, &RuleSet::registration(), session, consent)
    }

    #[test]
    fn test_ready_when_everything_holds() {
        assert!(ready(
            &filled_store(),
            &confirmed_session(),
            &ConsentGroup::default()
        ));
    }

    #[test]
    fn test_unconfirmed_blocks() {
        assert!(!ready(
            &filled_store(),
            &VerificationSession::default(),
            &ConsentGroup::default()
        ));
    }

    #[test]
    fn test_each_empty_text_field_blocks() {
        for field in TextField::ALL {
            let mut fields = filled_store();
            fields.set_value(field, "");
            assert!(
                !ready(&fields, &confirmed_session(), &ConsentGroup::default()),
                "{field} empty but gate open"
            );
        }
    }

    #[test]
    fn test_optional_consents_do_not_block() {
        let fields = filled_store();
        assert!(!fields.is_checked(ConsentItem::IsMarketing));
        assert!(!fields.is_checked(ConsentItem::IsEvent));
        assert!(ready(
            &fields,
            &confirmed_session(),
            &ConsentGroup::default()
        ));
    }

    #[test]
    fn test_each_required_consent_blocks() {
        for item in ConsentItem::ALL.into_iter().filter(ConsentItem::is_required) {
            let mut fields = filled_store();
            fields.set_checked(item, false);
            assert!(!ready(
                &fields,
                &confirmed_session(),
                &ConsentGroup::default()
            ));
        }
    }

    #[test]
    fn test_required_agree_rule_decides_consents() {
        // A host rule set that additionally demands the event opt-in
        let mut rules = RuleSet::registration();
        rules.push(
            RuleKey::RequiredAgree,
            Rule::new(|v| !v.consents.is_event, "must accept event terms"),
        );
        let mut fields = filled_store();
        assert!(!is_submit_ready(
            &fields,
            &rules,
            &confirmed_session(),
            &ConsentGroup::default()
        ));

        fields.set_checked(ConsentItem::IsEvent, true);
        assert!(is_submit_ready(
            &fields,
            &rules,
            &confirmed_session(),
            &ConsentGroup::default()
        ));
    }

    #[test]
    fn test_field_error_blocks() {
        let mut fields = filled_store();
        fields.set_error(TextField::UserName, FieldError::new("too short"));
        assert!(!ready(
            &fields,
            &confirmed_session(),
            &ConsentGroup::default()
        ));
    }

    #[test]
    fn test_group_error_blocks() {
        use crate::state::{ConsentSet, FocusTarget};

        let mut group = ConsentGroup::default();
        group.on_blur(FocusTarget::OutsideGroup, ConsentSet::default());
        assert!(!ready(&filled_store(), &confirmed_session(), &group));
    }
}
