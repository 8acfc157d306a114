use crate::core::intake::ContactIntake;
use crate::core::portfolio::PortfolioProvider;
use crate::core::{StatusCheckStore, SubmissionStore};
use crate::domain::model::{
    ContactFormInput, ContactResponse, ContactSubmission, Envelope, StatusCheck, StatusCheckInput,
};
use crate::domain::portfolio::Portfolio;
use crate::utils::error::{FieldError, PortfolioError};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use std::sync::Arc;

/// 舊版 status 端點一次最多回傳的筆數
pub const STATUS_LIST_LIMIT: usize = 1000;

/// 各 handler 共用的狀態，啟動時建立一次
pub struct AppState<S: SubmissionStore> {
    pub intake: ContactIntake<S>,
    pub portfolio: PortfolioProvider,
}

impl<S: SubmissionStore> AppState<S> {
    pub fn new(intake: ContactIntake<S>, portfolio: PortfolioProvider) -> Self {
        Self { intake, portfolio }
    }
}

type SharedState<S> = State<Arc<AppState<S>>>;

pub fn api_routes<S>() -> Router<Arc<AppState<S>>>
where
    S: SubmissionStore + StatusCheckStore + 'static,
{
    Router::new()
        .route("/api", get(root))
        .route("/api/", get(root))
        .route("/api/portfolio", get(get_portfolio::<S>))
        .route("/api/contact", axum::routing::post(submit_contact::<S>))
        .route("/api/contacts", get(list_contacts::<S>))
        .route(
            "/api/status",
            get(list_status_checks::<S>).post(create_status_check::<S>),
        )
}

async fn root() -> Json<serde_json::Value> {
    Json(json!({ "message": "Hello World" }))
}

async fn get_portfolio<S: SubmissionStore>(
    State(state): SharedState<S>,
) -> Result<Json<Envelope<Portfolio>>, ApiError> {
    let portfolio = state.portfolio.get_portfolio()?;
    Ok(Json(Envelope::ok(portfolio.as_ref().clone())))
}

async fn submit_contact<S: SubmissionStore>(
    State(state): SharedState<S>,
    payload: Result<Json<ContactFormInput>, JsonRejection>,
) -> Result<Json<ContactResponse>, ApiError> {
    let Json(input) = payload?;
    let receipt = state.intake.submit(input).await?;
    let response = receipt.response();

    // 通知在背景完成；回應不等待，結果只留在log
    drop(receipt.notification);

    Ok(Json(response))
}

async fn list_contacts<S: SubmissionStore>(
    State(state): SharedState<S>,
) -> Result<Json<Envelope<Vec<ContactSubmission>>>, ApiError> {
    let submissions = state.intake.list().await?;
    Ok(Json(Envelope::ok(submissions)))
}

async fn create_status_check<S: SubmissionStore + StatusCheckStore>(
    State(state): SharedState<S>,
    payload: Result<Json<StatusCheckInput>, JsonRejection>,
) -> Result<Json<StatusCheck>, ApiError> {
    let Json(input) = payload?;
    let check = StatusCheck::try_from(input)?;
    state.intake.store().append_status(&check).await?;
    Ok(Json(check))
}

async fn list_status_checks<S: SubmissionStore + StatusCheckStore>(
    State(state): SharedState<S>,
) -> Result<Json<Vec<StatusCheck>>, ApiError> {
    let checks = state.intake.store().list_status(STATUS_LIST_LIMIT).await?;
    Ok(Json(checks))
}

/// HTTP 邊界上的錯誤，負責把 `PortfolioError` 轉成狀態碼與 JSON
#[derive(Debug)]
pub struct ApiError(PortfolioError);

impl From<PortfolioError> for ApiError {
    fn from(err: PortfolioError) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(PortfolioError::validation(vec![FieldError::body(
            rejection.body_text(),
            "json_invalid",
        )]))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, detail) = match &self.0 {
            PortfolioError::ValidationError { errors } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "Validation failed",
                json!(errors),
            ),
            PortfolioError::StorageError { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to process request",
                json!("storage unavailable"),
            ),
            PortfolioError::DataError { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Portfolio data unavailable",
                json!("portfolio document is malformed"),
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error",
                serde_json::Value::Null,
            ),
        };

        if status.is_server_error() {
            tracing::error!("❌ {} ({})", message, self.0);
        } else {
            tracing::debug!("Rejected request: {}", self.0);
        }

        let body = json!({
            "success": false,
            "message": message,
            "detail": detail,
        });
        (status, Json(body)).into_response()
    }
}
