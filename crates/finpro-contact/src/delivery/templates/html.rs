use std::fmt::Write as _;

use crate::form::SubmissionPayload;

use super::{format_submitted_at, TemplateKind};

struct Palette {
    headline: &'static str,
    tagline: &'static str,
    accent: &'static str,
    footer: &'static str,
}

const fn palette(kind: TemplateKind) -> Palette {
    match kind {
        TemplateKind::Consulting => Palette {
            headline: "💼 Nouvelle Demande de Consulting",
            tagline: "Un client potentiel vous a contacté",
            accent: "#2d4aa7",
            footer: "FinancePro - Consulting Professionnel",
        },
        TemplateKind::Formation => Palette {
            headline: "📚 Nouvelle Demande de Formation",
            tagline: "Un candidat souhaite s'inscrire à vos formations",
            accent: "#1e8a4f",
            footer: "FinancePro - Formations Professionnelles",
        },
        TemplateKind::Combined => Palette {
            headline: "⭐ Demande Consulting & Formation",
            tagline: "Un client souhaite nos services complets",
            accent: "#6b21a8",
            footer: "FinancePro - Solutions Complètes en Finance",
        },
    }
}

/// Styled HTML document for the email channel's `use_html_template` mode.
pub fn render_html(kind: TemplateKind, payload: &SubmissionPayload) -> String {
    let form = &payload.form_data;
    let colors = palette(kind);
    let mut html = String::new();

    writeln!(html, "<!DOCTYPE html>").expect("write doctype");
    writeln!(html, "<html lang=\"fr\"><head><meta charset=\"UTF-8\">").expect("write head");
    writeln!(
        html,
        "<title>{} - FinancePro</title></head>",
        escape_html(kind.label())
    )
    .expect("write title");
    writeln!(
        html,
        "<body style=\"margin:0;padding:24px;font-family:'Inter',Arial,sans-serif;background-color:#f7f7f7;\">"
    )
    .expect("write body open");

    writeln!(
        html,
        "<div style=\"max-width:600px;margin:0 auto;background:#ffffff;border-radius:12px;overflow:hidden;\">"
    )
    .expect("write card");
    writeln!(
        html,
        "<div style=\"background:{};padding:32px;text-align:center;color:#ffffff;\"><h1 style=\"margin:0;font-size:26px;\">{}</h1><p style=\"margin:8px 0 0;\">{}</p></div>",
        colors.accent, colors.headline, colors.tagline
    )
    .expect("write header");

    writeln!(html, "<div style=\"padding:32px;\">").expect("write content open");

    section_open(&mut html, colors.accent, "👤 Informations Client");
    writeln!(html, "<p><strong>Nom:</strong> {}</p>", escape_html(&form.name)).expect("write name");
    writeln!(
        html,
        "<p><strong>Email:</strong> <a href=\"mailto:{0}\" style=\"color:{1};\">{0}</a></p>",
        escape_html(&form.email),
        colors.accent
    )
    .expect("write email");
    if !form.phone.trim().is_empty() {
        writeln!(
            html,
            "<p><strong>Téléphone:</strong> {} {}</p>",
            escape_html(&form.country_code),
            escape_html(&form.phone)
        )
        .expect("write phone");
    }
    if !form.address.trim().is_empty() {
        writeln!(
            html,
            "<p><strong>Adresse:</strong> {}</p>",
            escape_html(&form.address)
        )
        .expect("write address");
    }
    section_close(&mut html);

    if !form.services.is_empty() {
        item_list(&mut html, colors.accent, "💼 Services de Consulting", &form.services);
    }
    if !form.modules.is_empty() {
        item_list(&mut html, colors.accent, "📚 Modules de Formation", &form.modules);
    }

    if !form.message.trim().is_empty() {
        section_open(&mut html, colors.accent, "💬 Message");
        writeln!(
            html,
            "<p style=\"white-space:pre-wrap;\">{}</p>",
            escape_html(&form.message)
        )
        .expect("write message");
        section_close(&mut html);
    }

    if payload.attachment_count > 0 {
        section_open(&mut html, colors.accent, "📎 Fichiers Joints");
        writeln!(html, "<p>{} fichier(s) fourni(s)</p>", payload.attachment_count)
            .expect("write attachments");
        section_close(&mut html);
    }

    let actions: Vec<String> = kind
        .recommended_actions()
        .iter()
        .map(|action| (*action).to_string())
        .collect();
    item_list(&mut html, colors.accent, "🎯 Actions Recommandées", &actions);

    writeln!(html, "</div>").expect("write content close");

    writeln!(
        html,
        "<div style=\"background:#f8f9fd;padding:20px;text-align:center;color:#888;font-size:13px;\"><p style=\"margin:0 0 6px;\">🕐 Reçu le {}</p><p style=\"margin:0;color:#aaa;font-size:12px;\">{}</p></div>",
        format_submitted_at(payload),
        colors.footer
    )
    .expect("write footer");

    writeln!(html, "</div></body></html>").expect("write close");

    html
}

fn section_open(html: &mut String, accent: &str, title: &str) {
    writeln!(
        html,
        "<div style=\"border-left:4px solid {accent};background:#f8f9fd;padding:16px 20px;margin-bottom:20px;border-radius:6px;\"><h2 style=\"margin:0 0 10px;color:{accent};font-size:17px;\">{title}</h2>"
    )
    .expect("write section open");
}

fn section_close(html: &mut String) {
    writeln!(html, "</div>").expect("write section close");
}

fn item_list(html: &mut String, accent: &str, title: &str, items: &[String]) {
    section_open(html, accent, title);
    writeln!(html, "<ul style=\"margin:0;padding-left:20px;\">").expect("write list open");
    for item in items {
        writeln!(html, "<li style=\"margin:6px 0;\"><strong>{}</strong></li>", escape_html(item))
            .expect("write list item");
    }
    writeln!(html, "</ul>").expect("write list close");
    section_close(html);
}

pub(crate) fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
