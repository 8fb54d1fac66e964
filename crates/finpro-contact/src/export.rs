use std::fmt::Write as _;

use serde::Serialize;

use crate::delivery::templates::escape_html;
use crate::form::StoredSubmission;

/// CSV export failure.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("csv encoding: {0}")]
    Csv(#[from] csv::Error),
    #[error("csv output was not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

#[derive(Debug, Serialize)]
struct SubmissionRow<'a> {
    #[serde(rename = "ID")]
    id: &'a str,
    #[serde(rename = "Nom")]
    name: &'a str,
    #[serde(rename = "Email")]
    email: &'a str,
    #[serde(rename = "Téléphone")]
    phone: String,
    #[serde(rename = "Adresse")]
    address: &'a str,
    #[serde(rename = "Intérêts")]
    interests: String,
    #[serde(rename = "Services")]
    services: String,
    #[serde(rename = "Modules")]
    modules: String,
    #[serde(rename = "Message")]
    message: &'a str,
    #[serde(rename = "Fichiers")]
    attachments: String,
    #[serde(rename = "Date")]
    submitted_at: String,
}

/// Derived column values shared by the CSV and HTML renderings.
struct RowText {
    phone: String,
    interests: String,
    services: String,
    modules: String,
    attachments: String,
    submitted_at: String,
}

fn row_text(submission: &StoredSubmission) -> RowText {
    let form = &submission.form_data;
    RowText {
        phone: if form.phone.trim().is_empty() {
            String::new()
        } else {
            format!("{} {}", form.country_code, form.phone)
        },
        interests: form
            .interests
            .iter()
            .map(|i| i.label())
            .collect::<Vec<_>>()
            .join(", "),
        services: form.services.join(", "),
        modules: form.modules.join(", "),
        attachments: format!("{} fichier(s)", submission.attachment_count),
        submitted_at: submission.submitted_at.format("%d/%m/%Y %H:%M").to_string(),
    }
}

/// Render the submission history as a CSV document, one row per
/// submission, column layout matching the operator export.
pub fn submissions_to_csv(submissions: &[StoredSubmission]) -> Result<String, ExportError> {
    let mut writer = csv::WriterBuilder::new().from_writer(Vec::new());

    for submission in submissions {
        let form = &submission.form_data;
        let row = row_text(submission);

        writer.serialize(SubmissionRow {
            id: &submission.id.0,
            name: &form.name,
            email: &form.email,
            phone: row.phone,
            address: &form.address,
            interests: row.interests,
            services: row.services,
            modules: row.modules,
            message: &form.message,
            attachments: row.attachments,
            submitted_at: row.submitted_at,
        })?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| ExportError::Csv(err.into_error().into()))?;
    Ok(String::from_utf8(bytes)?)
}

const EXPORT_COLUMNS: [&str; 11] = [
    "ID",
    "Nom",
    "Email",
    "Téléphone",
    "Adresse",
    "Intérêts",
    "Services",
    "Modules",
    "Message",
    "Fichiers",
    "Date",
];

/// Render the submission history as a spreadsheet-compatible HTML table
/// document, same columns as the CSV rendering.
pub fn submissions_to_html(submissions: &[StoredSubmission]) -> String {
    let mut html = String::new();

    writeln!(html, "<!DOCTYPE html>").expect("write doctype");
    writeln!(html, "<html lang=\"fr\"><head><meta charset=\"UTF-8\">").expect("write head");
    writeln!(html, "<title>Soumissions - FinancePro</title>").expect("write title");
    writeln!(html, "<style>").expect("write style open");
    writeln!(html, "table {{ border-collapse: collapse; width: 100%; }}").expect("write style");
    writeln!(
        html,
        "th {{ background-color: #4472C4; color: white; font-weight: bold; padding: 8px; border: 1px solid #ddd; }}"
    )
    .expect("write style");
    writeln!(html, "td {{ padding: 8px; border: 1px solid #ddd; }}").expect("write style");
    writeln!(html, "tr:nth-child(even) {{ background-color: #f2f2f2; }}").expect("write style");
    writeln!(html, "</style></head>").expect("write style close");
    writeln!(html, "<body><table>").expect("write table open");

    writeln!(html, "<thead><tr>").expect("write header open");
    for column in EXPORT_COLUMNS {
        writeln!(html, "<th>{}</th>", escape_html(column)).expect("write header cell");
    }
    writeln!(html, "</tr></thead>").expect("write header close");

    writeln!(html, "<tbody>").expect("write body open");
    for submission in submissions {
        let form = &submission.form_data;
        let row = row_text(submission);
        let cells = [
            submission.id.0.as_str(),
            form.name.as_str(),
            form.email.as_str(),
            row.phone.as_str(),
            form.address.as_str(),
            row.interests.as_str(),
            row.services.as_str(),
            row.modules.as_str(),
            form.message.as_str(),
            row.attachments.as_str(),
            row.submitted_at.as_str(),
        ];

        writeln!(html, "<tr>").expect("write row open");
        for cell in cells {
            writeln!(html, "<td>{}</td>", escape_html(cell)).expect("write cell");
        }
        writeln!(html, "</tr>").expect("write row close");
    }
    writeln!(html, "</tbody>").expect("write body close");

    writeln!(html, "</table></body></html>").expect("write document close");
    html
}
