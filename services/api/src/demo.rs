use clap::Args;
use finpro_contact::config::AppConfig;
use finpro_contact::delivery::{
    render_email, ChannelId, ChannelKind, DeliveryChannel, DeliveryResult, EmailChannelConfig,
    ReqwestTransport, TracingMailGateway, WebhookChannelConfig,
};
use finpro_contact::error::AppError;
use finpro_contact::form::{
    validate_all, validate_interest_consistency, ContactFormData, Interest, SubmissionId,
};
use finpro_contact::service::{ContactIntakeService, IntakeError};
use finpro_contact::storage::InMemoryKv;
use finpro_contact::telemetry;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Optional webhook endpoint to deliver the demo submission to.
    /// Without it the demo only exercises the email channel.
    #[arg(long)]
    pub(crate) webhook_url: Option<String>,
    /// Render the email notification with the HTML template instead of plain text.
    #[arg(long)]
    pub(crate) html: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ValidateArgs {
    /// Path to a JSON file holding the form payload
    pub(crate) file: PathBuf,
}

#[derive(Args, Debug)]
pub(crate) struct DispatchArgs {
    /// Identifier of the stored submission to re-send (e.g. sub-000001)
    pub(crate) submission_id: String,
}

/// Run the full step rules over a form file and report per-field findings.
pub(crate) fn run_validate(args: ValidateArgs) -> Result<(), AppError> {
    let raw = fs::read_to_string(&args.file)?;
    let form: ContactFormData = serde_json::from_str(&raw)
        .map_err(|err| AppError::Io(io::Error::new(io::ErrorKind::InvalidData, err)))?;

    let mut errors = validate_all(&form);
    errors.extend(validate_interest_consistency(&form));

    if errors.is_empty() {
        println!("Formulaire valide: {} <{}>", form.name, form.email);
        return Ok(());
    }

    println!("{} champ(s) invalide(s):", errors.len());
    for (field, message) in &errors {
        println!("- {field}: {message}");
    }
    Err(AppError::Intake(IntakeError::Invalid(errors)))
}

/// Re-fire the delivery fan-out for an already stored submission, against
/// the configured store and channels.
pub(crate) async fn run_dispatch(args: DispatchArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let service = crate::infra::build_intake_service(&config)?;
    let results = service
        .redispatch(&SubmissionId(args.submission_id))
        .await?;

    if results.is_empty() {
        println!("Aucun canal activé, rien à envoyer.");
        return Ok(());
    }

    print_delivery_results(&results);
    Ok(())
}

fn print_delivery_results(results: &[DeliveryResult]) {
    for result in results {
        let status = if result.success { "ok" } else { "failed" };
        match (&result.status_code, &result.error) {
            (Some(code), _) => println!("- {}: {} (HTTP {})", result.channel_name, status, code),
            (None, Some(error)) => println!("- {}: {} ({})", result.channel_name, status, error),
            (None, None) => println!("- {}: {}", result.channel_name, status),
        }
    }
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    println!("FinancePro contact intake demo");

    let service = Arc::new(ContactIntakeService::new(
        Arc::new(InMemoryKv::default()),
        Arc::new(ReqwestTransport::default()),
        Arc::new(TracingMailGateway),
    ));

    service.upsert_channel(DeliveryChannel {
        id: ChannelId("email-marketing".to_string()),
        name: "Équipe Marketing".to_string(),
        enabled: true,
        created_at: chrono::Utc::now(),
        kind: ChannelKind::Email(EmailChannelConfig {
            recipient_name: "Équipe Marketing".to_string(),
            recipient_email: "marketing@financepro.example".to_string(),
            use_html_template: args.html,
        }),
    })?;

    if let Some(url) = args.webhook_url {
        println!("Webhook channel configured: {url}");
        service.upsert_channel(DeliveryChannel {
            id: ChannelId("webhook-demo".to_string()),
            name: "Webhook de démonstration".to_string(),
            enabled: true,
            created_at: chrono::Utc::now(),
            kind: ChannelKind::Webhook(WebhookChannelConfig {
                url,
                headers: BTreeMap::new(),
            }),
        })?;
    }

    let form = sample_form();
    println!(
        "\nSubmitting form for {} <{}> ({} interest(s))",
        form.name,
        form.email,
        form.interests.len()
    );

    let outcome = service.submit(form).await?;
    println!(
        "Stored submission {} at {}",
        outcome.submission.id,
        outcome.submission.submitted_at.format("%d/%m/%Y %H:%M UTC")
    );

    println!("\nDelivery results");
    print_delivery_results(&outcome.delivery);

    let email = render_email(&outcome.submission.payload(), false);
    println!("\nEmail notification preview");
    println!("Subject: {}", email.subject);
    println!("{}", email.body);

    println!("CSV export");
    print!("{}", service.export_csv()?);

    Ok(())
}

fn sample_form() -> ContactFormData {
    ContactFormData {
        name: "Awa Diop".to_string(),
        email: "awa.diop@example.sn".to_string(),
        country_code: "+221".to_string(),
        phone: "76 464 42 90".to_string(),
        address: "Dakar, Sénégal".to_string(),
        interests: BTreeSet::from([Interest::Consulting, Interest::Formation]),
        services: vec!["Audit financier".to_string()],
        modules: vec!["Analyse financière".to_string()],
        message: "Je souhaite un accompagnement sur la digitalisation de notre reporting."
            .to_string(),
        attachments: Vec::new(),
    }
}
