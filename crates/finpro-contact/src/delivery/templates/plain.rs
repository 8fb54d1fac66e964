use std::fmt::Write as _;

use crate::form::SubmissionPayload;

use super::{format_submitted_at, TemplateKind};

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

/// Sectioned plain-text summary used for mailto bodies.
pub fn render_plain(kind: TemplateKind, payload: &SubmissionPayload) -> String {
    let form = &payload.form_data;
    let mut body = String::new();

    let header = match kind {
        TemplateKind::Consulting => "💼 NOUVELLE DEMANDE DE CONSULTING - FINANCEPRO",
        TemplateKind::Formation => "📚 NOUVELLE DEMANDE DE FORMATION - FINANCEPRO",
        TemplateKind::Combined => "⭐ DEMANDE CONSULTING & FORMATION - FINANCEPRO",
    };
    writeln!(body, "{header}\n").expect("write header");
    writeln!(body, "{RULE}\n").expect("write rule");

    writeln!(body, "👤 INFORMATIONS CLIENT").expect("write contact section");
    writeln!(body, "   Nom: {}", form.name).expect("write name");
    writeln!(body, "   Email: {}", form.email).expect("write email");
    if !form.phone.trim().is_empty() {
        writeln!(body, "   Téléphone: {} {}", form.country_code, form.phone)
            .expect("write phone");
    }
    if !form.address.trim().is_empty() {
        writeln!(body, "   Adresse: {}", form.address).expect("write address");
    }
    body.push('\n');

    if !form.services.is_empty() {
        writeln!(body, "💼 SERVICES CONSULTING DEMANDÉS").expect("write services section");
        for service in &form.services {
            writeln!(body, "   • {service}").expect("write service");
        }
        body.push('\n');
    }

    if !form.modules.is_empty() {
        writeln!(body, "📚 MODULES FORMATION SÉLECTIONNÉS").expect("write modules section");
        for module in &form.modules {
            writeln!(body, "   • {module}").expect("write module");
        }
        body.push('\n');
    }

    if !form.message.trim().is_empty() {
        writeln!(body, "💬 MESSAGE").expect("write message section");
        writeln!(body, "   {}", form.message).expect("write message");
        body.push('\n');
    }

    if payload.attachment_count > 0 {
        writeln!(body, "📎 FICHIERS JOINTS: {}", payload.attachment_count)
            .expect("write attachments");
        body.push('\n');
    }

    writeln!(body, "{RULE}").expect("write closing rule");
    writeln!(body, "🕐 Soumis le: {}", format_submitted_at(payload)).expect("write timestamp");

    body
}
