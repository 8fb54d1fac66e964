//! Integration specifications for the contact intake pipeline.
//!
//! Scenarios run end to end through the public service facade: validation,
//! persistence, channel configuration, and the delivery fan-out, with both
//! outbound transports replaced by scripted fakes.

mod common {
    use std::collections::{BTreeMap, BTreeSet, HashMap};
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use chrono::Utc;

    use finpro_contact::delivery::{
        ChannelId, ChannelKind, ComposedEmail, DeliveryChannel, EmailChannelConfig, MailGateway,
        MailHandoffError, TransportError, WebhookChannelConfig, WebhookTransport,
    };
    use finpro_contact::form::{ContactFormData, Interest};
    use finpro_contact::service::ContactIntakeService;
    use finpro_contact::storage::InMemoryKv;

    pub(super) fn valid_form() -> ContactFormData {
        ContactFormData {
            name: "Awa Diop".to_string(),
            email: "awa.diop@example.sn".to_string(),
            country_code: "+221".to_string(),
            phone: "76 464 42 90".to_string(),
            address: "Dakar, Sénégal".to_string(),
            interests: BTreeSet::from([Interest::Consulting, Interest::Formation]),
            services: vec!["Audit financier".to_string()],
            modules: vec!["Analyse financière".to_string()],
            message: "Je souhaite un accompagnement sur notre reporting.".to_string(),
            attachments: Vec::new(),
        }
    }

    pub(super) fn webhook_channel(id: &str, url: &str) -> DeliveryChannel {
        DeliveryChannel {
            id: ChannelId(id.to_string()),
            name: format!("Webhook {id}"),
            enabled: true,
            created_at: Utc::now(),
            kind: ChannelKind::Webhook(WebhookChannelConfig {
                url: url.to_string(),
                headers: BTreeMap::new(),
            }),
        }
    }

    pub(super) fn email_channel(id: &str, use_html_template: bool) -> DeliveryChannel {
        DeliveryChannel {
            id: ChannelId(id.to_string()),
            name: "Équipe Marketing".to_string(),
            enabled: true,
            created_at: Utc::now(),
            kind: ChannelKind::Email(EmailChannelConfig {
                recipient_name: "Équipe Marketing".to_string(),
                recipient_email: "marketing@financepro.example".to_string(),
                use_html_template,
            }),
        }
    }

    pub(super) enum Script {
        Status(u16),
        Timeout,
        Network(String),
    }

    /// Webhook transport scripted per URL; unscripted URLs answer 200.
    #[derive(Default, Clone)]
    pub(super) struct ScriptedTransport {
        scripts: Arc<Mutex<HashMap<String, Script>>>,
        posts: Arc<Mutex<Vec<(String, serde_json::Value)>>>,
    }

    impl ScriptedTransport {
        pub(super) fn respond(&self, url: &str, script: Script) {
            self.scripts
                .lock()
                .expect("lock")
                .insert(url.to_string(), script);
        }

        pub(super) fn posts(&self) -> Vec<(String, serde_json::Value)> {
            self.posts.lock().expect("lock").clone()
        }
    }

    #[async_trait]
    impl WebhookTransport for ScriptedTransport {
        async fn post_json(
            &self,
            url: &str,
            _headers: &BTreeMap<String, String>,
            body: &serde_json::Value,
        ) -> Result<u16, TransportError> {
            self.posts
                .lock()
                .expect("lock")
                .push((url.to_string(), body.clone()));

            match self.scripts.lock().expect("lock").get(url) {
                Some(Script::Status(code)) => Ok(*code),
                Some(Script::Timeout) => Err(TransportError::Timeout),
                Some(Script::Network(message)) => Err(TransportError::Network(message.clone())),
                None => Ok(200),
            }
        }
    }

    #[derive(Default, Clone)]
    pub(super) struct MemoryMail {
        sent: Arc<Mutex<Vec<ComposedEmail>>>,
    }

    impl MemoryMail {
        pub(super) fn sent(&self) -> Vec<ComposedEmail> {
            self.sent.lock().expect("lock").clone()
        }
    }

    impl MailGateway for MemoryMail {
        fn open_compose(&self, email: &ComposedEmail) -> Result<(), MailHandoffError> {
            self.sent.lock().expect("lock").push(email.clone());
            Ok(())
        }
    }

    pub(super) struct FailingMail;

    impl MailGateway for FailingMail {
        fn open_compose(&self, _email: &ComposedEmail) -> Result<(), MailHandoffError> {
            Err(MailHandoffError::Handoff(
                "no mail client available".to_string(),
            ))
        }
    }

    pub(super) fn build_service() -> (Arc<ContactIntakeService>, ScriptedTransport, MemoryMail) {
        let transport = ScriptedTransport::default();
        let mail = MemoryMail::default();
        let service = Arc::new(ContactIntakeService::new(
            Arc::new(InMemoryKv::default()),
            Arc::new(transport.clone()),
            Arc::new(mail.clone()),
        ));
        (service, transport, mail)
    }

    pub(super) fn build_service_with_mail(
        transport: ScriptedTransport,
        mail: Arc<dyn MailGateway>,
    ) -> Arc<ContactIntakeService> {
        Arc::new(ContactIntakeService::new(
            Arc::new(InMemoryKv::default()),
            Arc::new(transport),
            mail,
        ))
    }

    /// Service over a caller-provided store, for scenarios spanning a
    /// simulated restart.
    pub(super) fn build_service_on(
        kv: Arc<dyn finpro_contact::storage::KvStore>,
    ) -> Arc<ContactIntakeService> {
        Arc::new(ContactIntakeService::new(
            kv,
            Arc::new(ScriptedTransport::default()),
            Arc::new(MemoryMail::default()),
        ))
    }
}

mod validation {
    use super::common::*;
    use finpro_contact::service::IntakeError;

    #[tokio::test]
    async fn malformed_fields_reject_the_submission() {
        let (service, _, _) = build_service();
        let mut form = valid_form();
        form.email = "pas-un-email".to_string();
        form.message = "court".to_string();

        match service.submit(form).await {
            Err(IntakeError::Invalid(errors)) => {
                assert!(errors.contains_key("email"));
                assert!(errors.contains_key("message"));
            }
            other => panic!("expected validation rejection, got {other:?}"),
        }

        assert!(service.history().expect("history").is_empty());
    }

    #[tokio::test]
    async fn services_without_consulting_interest_are_rejected() {
        let (service, _, _) = build_service();
        let mut form = valid_form();
        form.interests.remove(&finpro_contact::form::Interest::Consulting);
        form.modules.clear();

        match service.submit(form).await {
            Err(IntakeError::Invalid(errors)) => {
                assert!(errors.contains_key("services"));
            }
            other => panic!("expected consistency rejection, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unknown_dialing_code_with_phone_is_rejected() {
        let (service, _, _) = build_service();
        let mut form = valid_form();
        form.country_code = "+999".to_string();

        match service.submit(form).await {
            Err(IntakeError::Invalid(errors)) => {
                assert!(errors.contains_key("phone"));
            }
            other => panic!("expected phone rejection, got {other:?}"),
        }
    }
}

mod intake {
    use super::common::*;
    use finpro_contact::service::IntakeError;

    #[tokio::test]
    async fn accepted_submission_is_persisted_before_any_delivery() {
        let (service, transport, _) = build_service();
        service
            .upsert_channel(webhook_channel("wh-1", "https://hooks.example.com/a"))
            .expect("channel stored");

        let outcome = service.submit(valid_form()).await.expect("submission accepted");

        assert!(outcome.submission.id.0.starts_with("sub-"));
        assert_eq!(outcome.delivery.len(), 1);
        assert!(outcome.delivery[0].success);

        let history = service.history().expect("history");
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].id, outcome.submission.id);
        assert_eq!(history[0].form_data.name, "Awa Diop");

        let posts = transport.posts();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].1["form_data"]["email"], "awa.diop@example.sn");
    }

    #[tokio::test]
    async fn channel_failures_never_fail_the_submission() {
        let transport = ScriptedTransport::default();
        transport.respond(
            "https://hooks.example.com/down",
            Script::Network("connection refused".to_string()),
        );
        let service =
            build_service_with_mail(transport, std::sync::Arc::new(FailingMail));

        service
            .upsert_channel(webhook_channel("wh-down", "https://hooks.example.com/down"))
            .expect("channel stored");
        service
            .upsert_channel(email_channel("email-1", false))
            .expect("channel stored");

        let outcome = service
            .submit(valid_form())
            .await
            .expect("submission still accepted");

        assert_eq!(outcome.delivery.len(), 2);
        assert!(outcome.delivery.iter().all(|result| !result.success));
        assert_eq!(service.history().expect("history").len(), 1);
    }

    #[tokio::test]
    async fn redispatch_refires_the_configured_channels() {
        let (service, transport, _) = build_service();
        service
            .upsert_channel(webhook_channel("wh-1", "https://hooks.example.com/a"))
            .expect("channel stored");

        let outcome = service.submit(valid_form()).await.expect("accepted");
        let results = service
            .redispatch(&outcome.submission.id)
            .await
            .expect("redispatch runs");

        assert_eq!(results.len(), 1);
        assert!(results[0].success);
        assert_eq!(transport.posts().len(), 2);

        let log = service.recent_deliveries().expect("log");
        assert_eq!(log.len(), 2);
    }

    #[tokio::test]
    async fn redispatch_of_unknown_submission_is_not_found() {
        let (service, _, _) = build_service();
        let missing = finpro_contact::form::SubmissionId("sub-999999".to_string());

        match service.redispatch(&missing).await {
            Err(IntakeError::NotFound(id)) => assert_eq!(id, missing),
            other => panic!("expected not-found, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn email_channel_composes_a_plain_notification() {
        let (service, _, mail) = build_service();
        service
            .upsert_channel(email_channel("email-1", false))
            .expect("channel stored");

        service.submit(valid_form()).await.expect("accepted");

        let sent = mail.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].recipient_email, "marketing@financepro.example");
        assert!(!sent[0].is_html);
        assert!(sent[0].body.contains("Awa Diop"));
        assert!(sent[0].mailto_uri().starts_with("mailto:marketing@financepro.example"));
    }

    #[tokio::test]
    async fn id_sequence_resumes_after_a_restart_over_the_same_store() {
        let kv: std::sync::Arc<dyn finpro_contact::storage::KvStore> =
            std::sync::Arc::new(finpro_contact::storage::InMemoryKv::default());

        let first = build_service_on(kv.clone());
        let outcome = first.submit(valid_form()).await.expect("accepted");
        assert_eq!(outcome.submission.id.0, "sub-000001");
        drop(first);

        let second = build_service_on(kv);
        let outcome = second.submit(valid_form()).await.expect("accepted");
        assert_eq!(outcome.submission.id.0, "sub-000002");

        let ids: Vec<String> = second
            .history()
            .expect("history")
            .into_iter()
            .map(|s| s.id.0)
            .collect();
        assert_eq!(ids, ["sub-000001", "sub-000002"]);
    }

    #[tokio::test]
    async fn html_export_covers_stored_submissions() {
        let (service, _, _) = build_service();
        let outcome = service.submit(valid_form()).await.expect("accepted");

        let html = service.export_html().expect("export renders");
        assert!(html.contains("<th>Nom</th>"));
        assert!(html.contains(&format!("<td>{}</td>", outcome.submission.id.0)));
        assert!(html.contains("<td>Awa Diop</td>"));
    }

    #[tokio::test]
    async fn csv_export_covers_stored_submissions() {
        let (service, _, _) = build_service();
        let outcome = service.submit(valid_form()).await.expect("accepted");

        let csv = service.export_csv().expect("export renders");
        let mut lines = csv.lines();
        let header = lines.next().expect("header row");
        assert!(header.contains("Nom"));
        assert!(header.contains("Téléphone"));

        let row = lines.next().expect("data row");
        assert!(row.contains(&outcome.submission.id.0));
        assert!(row.contains("Awa Diop"));
        assert!(row.contains("+221 76 464 42 90"));
    }
}

mod routing {
    use super::common::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use finpro_contact::router::contact_router;
    use tower::ServiceExt;

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        serde_json::from_slice(&bytes).expect("json body")
    }

    #[tokio::test]
    async fn submit_route_accepts_valid_payloads() {
        let (service, _, _) = build_service();
        let router = contact_router(service);

        let response = router
            .oneshot(
                Request::post("/api/v1/contact/submissions")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        serde_json::to_vec(&valid_form()).expect("encode"),
                    ))
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert!(body["submission"]["id"]
            .as_str()
            .expect("id present")
            .starts_with("sub-"));
        assert!(body["delivery"].as_array().expect("delivery list").is_empty());
    }

    #[tokio::test]
    async fn invalid_submission_maps_to_unprocessable_entity() {
        let (service, _, _) = build_service();
        let router = contact_router(service);
        let mut form = valid_form();
        form.email = "pas-un-email".to_string();

        let response = router
            .oneshot(
                Request::post("/api/v1/contact/submissions")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(serde_json::to_vec(&form).expect("encode")))
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(response).await;
        assert!(body["fields"]["email"].is_string());
    }

    #[tokio::test]
    async fn export_route_serves_csv() {
        let (service, _, _) = build_service();
        service.submit(valid_form()).await.expect("accepted");
        let router = contact_router(service);

        let response = router
            .oneshot(
                Request::get("/api/v1/contact/submissions/export.csv")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get(header::CONTENT_TYPE)
                .expect("content type")
                .to_str()
                .expect("ascii"),
            "text/csv; charset=utf-8"
        );
    }

    #[tokio::test]
    async fn export_route_serves_html() {
        let (service, _, _) = build_service();
        service.submit(valid_form()).await.expect("accepted");
        let router = contact_router(service);

        let response = router
            .oneshot(
                Request::get("/api/v1/contact/submissions/export.html")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get(header::CONTENT_TYPE)
                .expect("content type")
                .to_str()
                .expect("ascii"),
            "text/html; charset=utf-8"
        );
    }

    #[tokio::test]
    async fn deleting_an_unknown_channel_is_not_found() {
        let (service, _, _) = build_service();
        let router = contact_router(service);

        let response = router
            .oneshot(
                Request::delete("/api/v1/contact/channels/missing")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}

mod channels {
    use super::common::*;
    use finpro_contact::delivery::ChannelId;
    use finpro_contact::storage::ChannelConfigError;

    #[tokio::test]
    async fn invalid_webhook_urls_are_rejected_at_configuration_time() {
        let (service, _, _) = build_service();

        match service.upsert_channel(webhook_channel("wh-bad", "ftp://example.com/hook")) {
            Err(ChannelConfigError::InvalidUrl(url)) => {
                assert_eq!(url, "ftp://example.com/hook");
            }
            other => panic!("expected URL rejection, got {other:?}"),
        }

        assert!(service.list_channels().expect("channels").is_empty());
    }

    #[tokio::test]
    async fn upsert_replaces_an_existing_channel() {
        let (service, _, _) = build_service();
        service
            .upsert_channel(webhook_channel("wh-1", "https://hooks.example.com/a"))
            .expect("stored");
        service
            .upsert_channel(webhook_channel("wh-1", "https://hooks.example.com/b"))
            .expect("replaced");

        let channels = service.list_channels().expect("channels");
        assert_eq!(channels.len(), 1);
    }

    #[tokio::test]
    async fn remove_reports_whether_the_channel_existed() {
        let (service, _, _) = build_service();
        service
            .upsert_channel(webhook_channel("wh-1", "https://hooks.example.com/a"))
            .expect("stored");

        assert!(service
            .remove_channel(&ChannelId("wh-1".to_string()))
            .expect("remove runs"));
        assert!(!service
            .remove_channel(&ChannelId("wh-1".to_string()))
            .expect("remove runs"));
    }
}
