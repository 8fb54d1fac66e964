use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use serde_json::json;

use crate::delivery::{ChannelId, DeliveryChannel};
use crate::error::AppError;
use crate::service::{ContactIntakeService, SubmissionOutcome};

/// Router builder exposing the contact intake pipeline over HTTP.
pub fn contact_router(service: Arc<ContactIntakeService>) -> Router {
    Router::new()
        .route(
            "/api/v1/contact/submissions",
            get(history_handler).post(submit_handler),
        )
        .route(
            "/api/v1/contact/submissions/export.csv",
            get(export_csv_handler),
        )
        .route(
            "/api/v1/contact/submissions/export.html",
            get(export_html_handler),
        )
        .route("/api/v1/contact/delivery-log", get(delivery_log_handler))
        .route(
            "/api/v1/contact/channels",
            put(upsert_channel_handler).get(list_channels_handler),
        )
        .route(
            "/api/v1/contact/channels/:channel_id",
            axum::routing::delete(remove_channel_handler),
        )
        .with_state(service)
}

async fn submit_handler(
    State(service): State<Arc<ContactIntakeService>>,
    Json(form): Json<crate::form::ContactFormData>,
) -> Result<Json<SubmissionOutcome>, AppError> {
    let outcome = service.submit(form).await?;
    Ok(Json(outcome))
}

async fn history_handler(
    State(service): State<Arc<ContactIntakeService>>,
) -> Result<Response, AppError> {
    let submissions = service.history()?;
    Ok(Json(submissions).into_response())
}

async fn export_csv_handler(
    State(service): State<Arc<ContactIntakeService>>,
) -> Result<Response, AppError> {
    let csv = service.export_csv()?;
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/csv; charset=utf-8")],
        csv,
    )
        .into_response())
}

async fn export_html_handler(
    State(service): State<Arc<ContactIntakeService>>,
) -> Result<Response, AppError> {
    let html = service.export_html()?;
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        html,
    )
        .into_response())
}

async fn delivery_log_handler(
    State(service): State<Arc<ContactIntakeService>>,
) -> Result<Response, AppError> {
    let log = service.recent_deliveries()?;
    Ok(Json(log).into_response())
}

async fn list_channels_handler(
    State(service): State<Arc<ContactIntakeService>>,
) -> Result<Response, AppError> {
    let channels = service.list_channels()?;
    Ok(Json(channels).into_response())
}

async fn upsert_channel_handler(
    State(service): State<Arc<ContactIntakeService>>,
    Json(channel): Json<DeliveryChannel>,
) -> Result<Response, AppError> {
    service.upsert_channel(channel)?;
    Ok((StatusCode::NO_CONTENT, ()).into_response())
}

async fn remove_channel_handler(
    State(service): State<Arc<ContactIntakeService>>,
    Path(channel_id): Path<String>,
) -> Result<Response, AppError> {
    let removed = service.remove_channel(&ChannelId(channel_id.clone()))?;
    if removed {
        Ok((StatusCode::NO_CONTENT, ()).into_response())
    } else {
        Ok((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": format!("channel '{channel_id}' not found") })),
        )
            .into_response())
    }
}
