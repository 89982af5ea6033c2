use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::{Assignment, AssignmentDetail, AssignmentModality, AssignmentStatus, Placement};
use crate::services::lifecycle::AssignmentEvent;
use crate::utils::validation::validate_not_blank;

// Formulario de asignación (propuesta, asignación directa y edición)
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AssignmentRequest {
    pub apprentice_id: Uuid,

    /// Obligatorio salvo en el flujo "asignar aprendiz", donde viene en la ruta
    pub company_id: Option<Uuid>,

    pub proposed_start_date: NaiveDate,
    pub proposed_end_date: NaiveDate,

    pub modality: Option<AssignmentModality>,

    #[validate(length(min = 1, max = 200), custom = "validate_not_blank")]
    pub proposed_tutor: String,

    #[validate(length(max = 100))]
    pub work_area: Option<String>,

    pub proposed_objectives: Option<String>,

    #[validate(length(max = 200))]
    pub company_contact_name: Option<String>,

    #[validate(length(max = 15))]
    pub company_contact_phone: Option<String>,

    #[validate(email)]
    pub company_contact_email: Option<String>,

    pub notes: Option<String>,
}

// Confirmación con observación opcional
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfirmRequest {
    pub note: Option<String>,
}

// Rechazo (motivo obligatorio) o cancelación (motivo opcional)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReasonRequest {
    pub reason: Option<String>,
}

// Acciones masivas del panel de administración
#[derive(Debug, Clone, Deserialize)]
pub struct BatchRequest {
    pub ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchResult {
    pub requested: usize,
    pub updated: usize,
}

/// Filtros conjuntivos del listado de asignaciones
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssignmentFilter {
    /// Texto libre: nombre/documento del aprendiz, nombre de la empresa o tutor
    pub q: Option<String>,
    pub status: Option<AssignmentStatus>,
    pub modality: Option<AssignmentModality>,
    pub company_id: Option<Uuid>,
    /// Rango sobre la fecha de creación (inclusivo)
    pub created_from: Option<NaiveDate>,
    pub created_to: Option<NaiveDate>,
    pub page: Option<i64>,
}

impl AssignmentFilter {
    /// Texto de búsqueda normalizado, `None` si está vacío
    pub fn search_text(&self) -> Option<&str> {
        self.q.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }
}

/// Conteos por estado sobre el conjunto filtrado
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub total: i64,
    pub pending: i64,
    pub assigned: i64,
    pub confirmed: i64,
    pub rejected: i64,
    pub started: i64,
    pub canceled: i64,
}

impl StatusCounts {
    pub fn from_pairs(pairs: &[(AssignmentStatus, i64)]) -> Self {
        let mut counts = Self::default();
        for (status, count) in pairs {
            counts.total += count;
            match status {
                AssignmentStatus::Pending => counts.pending += count,
                AssignmentStatus::Assigned => counts.assigned += count,
                AssignmentStatus::Confirmed => counts.confirmed += count,
                AssignmentStatus::Rejected => counts.rejected += count,
                AssignmentStatus::Started => counts.started += count,
                AssignmentStatus::Canceled => counts.canceled += count,
            }
        }
        counts
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AssignmentListResponse {
    pub items: Vec<AssignmentDetail>,
    pub page: i64,
    pub per_page: i64,
    pub total: i64,
    pub total_pages: i64,
    pub counts: StatusCounts,
}

#[derive(Debug, Serialize)]
pub struct AssignmentDetailResponse {
    pub assignment: AssignmentDetail,
    pub placement_id: Option<Uuid>,
    pub allowed_events: Vec<AssignmentEvent>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StartPracticeResponse {
    pub assignment: Assignment,
    pub placement: Placement,
}
