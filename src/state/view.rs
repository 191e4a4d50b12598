//! Read-only snapshot handed to the rendering layer

use super::consent::ConsentSet;
use super::forms::{FieldError, TextField};
use super::registration::RegistrationForm;
use super::verification::VerificationStatus;
use serde::Serialize;
use std::collections::BTreeMap;
use uuid::Uuid;

/// Everything a renderer needs to draw the form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormView {
    pub session_id: Uuid,
    pub values: BTreeMap<TextField, String>,
    pub errors: BTreeMap<TextField, FieldError>,
    pub hints: BTreeMap<TextField, &'static str>,
    pub consents: ConsentSet,
    pub all_selected: bool,
    pub group_error: FieldError,
    pub required_agree: FieldError,
    pub verification: VerificationStatus,
    pub countdown: Option<u32>,
    pub send_enabled: bool,
    pub submit_enabled: bool,
}

impl FormView {
    pub fn of(form: &RegistrationForm) -> Self {
        let fields = form.fields();
        Self {
            session_id: form.session_id(),
            values: TextField::ALL
                .into_iter()
                .map(|f| (f, fields.value(f).to_string()))
                .collect(),
            errors: TextField::ALL
                .into_iter()
                .map(|f| (f, fields.error(f).clone()))
                .collect(),
            hints: TextField::ALL
                .into_iter()
                .filter_map(|f| f.hint().map(|hint| (f, hint)))
                .collect(),
            consents: fields.consents(),
            all_selected: form.all_selected(),
            group_error: form.consent().error().clone(),
            required_agree: form.required_agree_error(),
            verification: form.verification().status().clone(),
            countdown: form.verification().countdown(),
            send_enabled: form.can_send_code(),
            submit_enabled: form.is_submit_ready(),
        }
    }
}

impl RegistrationForm {
    pub fn view(&self) -> FormView {
        FormView::of(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::forms::ConsentItem;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_view_of_fresh_form() {
        let form = RegistrationForm::default();
        let view = form.view();
        assert_eq!(view.values.len(), 4);
        assert!(view.values.values().all(String::is_empty));
        assert!(view.errors.values().all(|e| !e.is_error));
        assert_eq!(view.hints.len(), 2);
        assert_eq!(view.verification, VerificationStatus::Idle);
        assert_eq!(view.countdown, None);
        assert!(!view.send_enabled);
        assert!(!view.submit_enabled);
        assert!(!view.all_selected);
    }

    #[test]
    fn test_view_serializes_with_wire_names() {
        let mut form = RegistrationForm::default();
        form.set_value(TextField::PasswordConfirm, "x");
        form.set_checked(ConsentItem::IsEvent, true);
        form.blur(TextField::PasswordConfirm);

        let value = serde_json::to_value(form.view()).unwrap();
        assert_eq!(value["values"]["passwordConfirm"], json!("x"));
        assert_eq!(
            value["errors"]["passwordConfirm"],
            json!({"isError": true, "message": "passwords do not match"})
        );
        assert_eq!(value["consents"]["isEvent"], json!(true));
        assert_eq!(value["allSelected"], json!(false));
        assert_eq!(value["verification"], json!("idle"));
        assert_eq!(value["countdown"], json!(null));
        assert_eq!(value["groupError"], json!({"isError": false, "message": ""}));
        assert_eq!(
            value["requiredAgree"],
            json!({"isError": true, "message": "must accept required terms"})
        );
    }

    #[test]
    fn test_view_clears_required_agree_once_accepted() {
        let mut form = RegistrationForm::default();
        form.set_checked(ConsentItem::AgeCheck, true);
        form.set_checked(ConsentItem::AgreeToTerms, true);
        assert!(form.view().required_agree.is_error);

        form.set_checked(ConsentItem::AgreeToPrivacyPolicy, true);
        assert_eq!(form.view().required_agree, FieldError::none());
        assert!(!form.view().all_selected);
    }

    #[test]
    fn test_view_tracks_send_enabled() {
        let mut form = RegistrationForm::default();
        form.set_value(TextField::Email, "a@b.com");
        assert!(form.view().send_enabled);
    }
}
