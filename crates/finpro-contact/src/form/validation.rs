use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;

use super::countries;
use super::domain::{
    ContactFormData, Interest, MAX_ATTACHMENTS, MAX_ATTACHMENT_BYTES, MESSAGE_MAX_CHARS,
    MESSAGE_MIN_CHARS,
};

/// Field name -> human-readable message. Absence of a key means the field
/// is valid. Recomputed wholesale on every forward attempt and on submit.
pub type ValidationErrors = BTreeMap<String, String>;

/// The wizard steps in order. The review step is terminal and carries the
/// attachment checks so nothing unvalidated reaches submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FormStep {
    Contact,
    Interests,
    Details,
    Message,
    Review,
}

pub const TOTAL_STEPS: usize = 5;

impl FormStep {
    pub const ALL: [FormStep; TOTAL_STEPS] = [
        FormStep::Contact,
        FormStep::Interests,
        FormStep::Details,
        FormStep::Message,
        FormStep::Review,
    ];

    pub const fn index(self) -> usize {
        match self {
            FormStep::Contact => 0,
            FormStep::Interests => 1,
            FormStep::Details => 2,
            FormStep::Message => 3,
            FormStep::Review => 4,
        }
    }

    pub fn from_index(index: usize) -> Option<FormStep> {
        Self::ALL.get(index).copied()
    }

    pub const fn label(self) -> &'static str {
        match self {
            FormStep::Contact => "Coordonnées",
            FormStep::Interests => "Votre intérêt",
            FormStep::Details => "Services & modules",
            FormStep::Message => "Message",
            FormStep::Review => "Récapitulatif",
        }
    }
}

fn email_shape() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("static email pattern")
    })
}

/// Validate a single step. Pure: no side effects, no state.
pub fn validate_step(step: FormStep, form: &ContactFormData) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    match step {
        FormStep::Contact => validate_contact(form, &mut errors),
        FormStep::Interests => validate_interests(form, &mut errors),
        FormStep::Details => {}
        FormStep::Message => validate_message(form, &mut errors),
        FormStep::Review => validate_attachments(form, &mut errors),
    }

    errors
}

/// Validate every step at once, as done at submit time.
pub fn validate_all(form: &ContactFormData) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    for step in FormStep::ALL {
        errors.extend(validate_step(step, form));
    }
    errors
}

fn validate_contact(form: &ContactFormData, errors: &mut ValidationErrors) {
    if form.name.trim().chars().count() < 2 {
        errors.insert(
            "name".to_string(),
            "Le nom doit contenir au moins 2 caractères".to_string(),
        );
    }

    if !email_shape().is_match(form.email.trim()) {
        errors.insert(
            "email".to_string(),
            "Adresse email invalide".to_string(),
        );
    }

    if !form.phone.trim().is_empty() {
        match countries::lookup(&form.country_code) {
            Some(entry) => {
                if !entry.matches(&form.phone) {
                    let typed = countries::national_digits(&form.phone).len();
                    errors.insert(
                        "phone".to_string(),
                        format!(
                            "Numéro invalide pour {} — format attendu: {} ({} chiffre(s) saisi(s))",
                            entry.country, entry.format_hint, typed
                        ),
                    );
                }
            }
            None => {
                errors.insert(
                    "phone".to_string(),
                    "Sélectionnez un indicatif pays pour valider le numéro".to_string(),
                );
            }
        }
    }
}

fn validate_interests(form: &ContactFormData, errors: &mut ValidationErrors) {
    if form.interests.is_empty() {
        errors.insert(
            "interests".to_string(),
            "Veuillez sélectionner au moins un intérêt".to_string(),
        );
    }
}

fn validate_message(form: &ContactFormData, errors: &mut ValidationErrors) {
    let trimmed = form.message.trim();
    if trimmed.is_empty() {
        return;
    }
    let len = trimmed.chars().count();
    if !(MESSAGE_MIN_CHARS..=MESSAGE_MAX_CHARS).contains(&len) {
        errors.insert(
            "message".to_string(),
            format!(
                "Le message doit contenir entre {} et {} caractères ({} actuellement)",
                MESSAGE_MIN_CHARS, MESSAGE_MAX_CHARS, len
            ),
        );
    }
}

// The count and size checks are independent; both are reported in one
// combined message instead of letting the later check overwrite the first.
fn validate_attachments(form: &ContactFormData, errors: &mut ValidationErrors) {
    let mut problems = Vec::new();

    if form.attachments.len() > MAX_ATTACHMENTS {
        problems.push(format!(
            "maximum {} fichiers ({} fournis)",
            MAX_ATTACHMENTS,
            form.attachments.len()
        ));
    }

    let oversized: Vec<&str> = form
        .attachments
        .iter()
        .filter(|a| a.size_bytes > MAX_ATTACHMENT_BYTES)
        .map(|a| a.file_name.as_str())
        .collect();
    if !oversized.is_empty() {
        problems.push(format!(
            "chaque fichier doit faire moins de 10 Mo ({})",
            oversized.join(", ")
        ));
    }

    if !problems.is_empty() {
        errors.insert(
            "attachments".to_string(),
            format!("Pièces jointes invalides: {}", problems.join("; ")),
        );
    }
}

/// Submit-time invariant: service/module selections only make sense when
/// the matching interest is checked. The form hides the controls, but a
/// client driving the API directly could bypass that.
pub fn validate_interest_consistency(form: &ContactFormData) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    if !form.services.is_empty() && !form.interests.contains(&Interest::Consulting) {
        errors.insert(
            "services".to_string(),
            "Des services consulting sont sélectionnés sans l'intérêt Consulting".to_string(),
        );
    }
    if !form.modules.is_empty() && !form.interests.contains(&Interest::Formation) {
        errors.insert(
            "modules".to_string(),
            "Des modules formation sont sélectionnés sans l'intérêt Formation".to_string(),
        );
    }

    errors
}
