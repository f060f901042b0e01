use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;

/// Message returned when a report window holds no telemetry.
pub const EMPTY_REPORT_MESSAGE: &str = "Nenhum dado encontrado para este período.";

pub const VALIDATION_MESSAGE: &str = "Dados de entrada inválidos";

/// One rejected input field, listed under `details` in a 400 body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation failed on {} field(s)", .0.len())]
    Validation(Vec<FieldError>),

    #[error("Missing required identifier: {0}")]
    MissingIdentifier(&'static str),

    #[error("Nenhum dado encontrado para este período.")]
    EmptyReportWindow,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Too many requests: {0}")]
    TooManyRequests(&'static str),

    #[error("Report error: {0}")]
    Report(#[from] rust_xlsxwriter::XlsxError),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl AppError {
    /// Single-field validation failure.
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation(vec![FieldError::new(field, message)])
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            Self::Database(e) => {
                tracing::error!("Database error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Erro ao processar requisição no banco de dados".to_string(),
                )
            }
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Self::MissingIdentifier(field) => (
                StatusCode::BAD_REQUEST,
                format!("Parâmetro obrigatório ausente: {field}"),
            ),
            Self::EmptyReportWindow => (StatusCode::NOT_FOUND, EMPTY_REPORT_MESSAGE.to_string()),
            Self::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            Self::TooManyRequests(msg) => (StatusCode::TOO_MANY_REQUESTS, (*msg).to_string()),
            Self::Validation(_) => (StatusCode::BAD_REQUEST, VALIDATION_MESSAGE.to_string()),
            Self::Report(e) => {
                tracing::error!("Report error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Erro ao gerar relatório".to_string(),
                )
            }
            Self::Internal(msg) => {
                tracing::error!("Internal error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Erro interno do servidor".to_string(),
                )
            }
            Self::Config(e) => {
                tracing::error!("Config error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Configuration error".to_string(),
                )
            }
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
        };

        let body = match self {
            Self::Validation(details) => Json(json!({
                "success": false,
                "error": error_message,
                "details": details,
            })),
            _ => Json(json!({
                "success": false,
                "error": error_message,
            })),
        };

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
