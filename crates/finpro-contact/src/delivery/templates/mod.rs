//! Interest-driven message renderings for the email channel.

mod html;
mod plain;

use crate::form::{Interest, SubmissionPayload};

pub use html::render_html;
pub use plain::render_plain;

pub(crate) use html::escape_html;

/// Which rendering a submission gets, decided by the selected interests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    Consulting,
    Formation,
    Combined,
}

impl TemplateKind {
    /// Both interests -> `Combined`; a single one -> its own template.
    /// No interests should not occur past step-two validation, but the
    /// selector falls back to `Combined` rather than refusing to render.
    pub fn for_interests(interests: &[Interest]) -> Self {
        let consulting = interests.contains(&Interest::Consulting);
        let formation = interests.contains(&Interest::Formation);

        match (consulting, formation) {
            (true, false) => TemplateKind::Consulting,
            (false, true) => TemplateKind::Formation,
            _ => TemplateKind::Combined,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            TemplateKind::Consulting => "Consulting",
            TemplateKind::Formation => "Formation",
            TemplateKind::Combined => "Consulting & Formation",
        }
    }

    pub fn subject(self, payload: &SubmissionPayload) -> String {
        let name = payload.form_data.name.as_str();
        match self {
            TemplateKind::Consulting => {
                format!("💼 Nouvelle demande de Consulting — {name}")
            }
            TemplateKind::Formation => {
                format!("📚 Nouvelle demande de Formation — {name}")
            }
            TemplateKind::Combined => {
                format!("⭐ Demande Consulting & Formation — {name}")
            }
        }
    }

    /// The "recommended next action" block embedded in the HTML variant,
    /// fixed per kind.
    pub const fn recommended_actions(self) -> &'static [&'static str] {
        match self {
            TemplateKind::Consulting => &[
                "Planifier un appel de cadrage sous 48h",
                "Préparer une proposition d'honoraires",
                "Identifier le consultant référent",
            ],
            TemplateKind::Formation => &[
                "Évaluer le niveau actuel du candidat",
                "Proposer un parcours de formation personnalisé",
                "Envoyer le calendrier des sessions disponibles",
            ],
            TemplateKind::Combined => &[
                "Proposer un package Consulting + Formation intégré",
                "Programmer un appel de découverte approfondi",
                "Préparer une offre personnalisée sur mesure",
            ],
        }
    }
}

/// Subject plus body, ready for the mail-client handoff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEmail {
    pub subject: String,
    pub body: String,
    pub is_html: bool,
}

/// Render a payload for the email channel, picking the template by the
/// submission's interests.
pub fn render(payload: &SubmissionPayload, use_html: bool) -> RenderedEmail {
    let kind = TemplateKind::for_interests(&payload.form_data.interests);
    let body = if use_html {
        render_html(kind, payload)
    } else {
        render_plain(kind, payload)
    };

    RenderedEmail {
        subject: kind.subject(payload),
        body,
        is_html: use_html,
    }
}

pub(crate) fn format_submitted_at(payload: &SubmissionPayload) -> String {
    payload.submitted_at.format("%d/%m/%Y à %H:%M UTC").to_string()
}
