//! Sistema de manejo de errores
//!
//! Este módulo define todos los tipos de errores del sistema
//! y su conversión a respuestas HTTP apropiadas.

use std::borrow::Cow;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};
use validator::{ValidationError, ValidationErrors};

use crate::services::lifecycle::Denial;

/// Clave usada por `validator` para los avisos generales (no ligados a un campo)
pub const GENERAL_NOTICE: &str = "__all__";

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Transition denied: {0}")]
    TransitionDenied(#[from] Denial),

    #[error("Delete blocked: {assignments} assignment(s), {placements} placement(s)")]
    DeleteBlocked { assignments: i64, placements: i64 },

    #[error("Not found: {0}")]
    NotFound(String),
}

/// Respuesta de error para la API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_response) = match self {
            AppError::Database(e) => {
                error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: "Database Error".to_string(),
                        message: "No fue posible completar la operación".to_string(),
                        details: None,
                        code: Some("DB_ERROR".to_string()),
                    },
                )
            }

            AppError::Validation(e) => {
                warn!("Validation error: {}", e);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse {
                        error: "Validation Error".to_string(),
                        message: "Los datos enviados no son válidos".to_string(),
                        details: Some(json!(e)),
                        code: Some("VALIDATION_ERROR".to_string()),
                    },
                )
            }

            AppError::TransitionDenied(denial) => {
                warn!("Transition denied: {}", denial);
                (
                    StatusCode::CONFLICT,
                    ErrorResponse {
                        error: "Transition Denied".to_string(),
                        message: denial.to_string(),
                        details: None,
                        code: Some("TRANSITION_DENIED".to_string()),
                    },
                )
            }

            AppError::DeleteBlocked { assignments, placements } => {
                warn!(
                    "Delete blocked: {} assignment(s), {} placement(s)",
                    assignments, placements
                );
                (
                    StatusCode::CONFLICT,
                    ErrorResponse {
                        error: "Delete Blocked".to_string(),
                        message: format!(
                            "No se puede eliminar la empresa: tiene {} asignación(es) y {} etapa(s) de práctica asociadas",
                            assignments, placements
                        ),
                        details: Some(json!({
                            "assignments": assignments,
                            "placements": placements,
                        })),
                        code: Some("DELETE_BLOCKED".to_string()),
                    },
                )
            }

            AppError::NotFound(msg) => {
                warn!("Resource not found: {}", msg);
                (
                    StatusCode::NOT_FOUND,
                    ErrorResponse {
                        error: "Not Found".to_string(),
                        message: msg,
                        details: None,
                        code: Some("NOT_FOUND".to_string()),
                    },
                )
            }
        };

        (status, Json(error_response)).into_response()
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

/// Construir un `ValidationError` con mensaje legible
pub fn field_error(code: &'static str, message: impl Into<Cow<'static, str>>) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}

/// Función helper para crear errores de validación
pub fn validation_error(field: &'static str, message: impl Into<Cow<'static, str>>) -> AppError {
    let mut errors = ValidationErrors::new();
    errors.add(field, field_error("custom", message));
    AppError::Validation(errors)
}

/// Mensaje para un valor duplicado según la restricción única que lo detectó
fn unique_field(constraint: &str) -> Option<(&'static str, &'static str)> {
    match constraint {
        "companies_tax_id_key" => Some(("tax_id", "Ya existe una empresa con este NIT.")),
        "companies_email_key" => Some((
            "email",
            "Ya existe una empresa con este correo electrónico.",
        )),
        "apprentices_document_key" => Some((
            "document",
            "Ya existe un aprendiz con este documento.",
        )),
        "assignments_one_active_idx" => Some((
            "apprentice_id",
            "El aprendiz ya tiene una asignación activa.",
        )),
        "placements_origin_assignment_id_key" => Some((
            GENERAL_NOTICE,
            "La asignación ya tiene una etapa de práctica asociada.",
        )),
        _ => None,
    }
}

/// Traducir una violación de unicidad de PostgreSQL (SQLSTATE 23505)
/// al mismo error de campo que produce la verificación previa.
pub fn translate_unique_violation(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some("23505") {
            if let Some((field, message)) = db_err.constraint().and_then(unique_field) {
                return validation_error(field, message);
            }
        }
    }
    AppError::Database(err)
}
