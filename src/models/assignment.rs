//! Modelo de Assignment (asignación de aprendiz a empresa)
//!
//! Una asignación es la propuesta que vincula un aprendiz con una empresa
//! antes de que exista la etapa de práctica. Las transiciones de estado
//! viven en `services::lifecycle`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

use crate::dto::assignment_dto::AssignmentRequest;

/// Estado de la asignación - mapea al ENUM assignment_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq, Hash)]
#[sqlx(type_name = "assignment_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssignmentStatus {
    Pending,
    Assigned,
    Confirmed,
    Rejected,
    Started,
    Canceled,
}

impl AssignmentStatus {
    pub const ALL: [AssignmentStatus; 6] = [
        AssignmentStatus::Pending,
        AssignmentStatus::Assigned,
        AssignmentStatus::Confirmed,
        AssignmentStatus::Rejected,
        AssignmentStatus::Started,
        AssignmentStatus::Canceled,
    ];

    /// Estados que ocupan al aprendiz: sólo puede tener una asignación en ellos
    pub const ACTIVE: [AssignmentStatus; 4] = [
        AssignmentStatus::Pending,
        AssignmentStatus::Assigned,
        AssignmentStatus::Confirmed,
        AssignmentStatus::Started,
    ];

    pub fn is_active(self) -> bool {
        Self::ACTIVE.contains(&self)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AssignmentStatus::Pending => "PENDING",
            AssignmentStatus::Assigned => "ASSIGNED",
            AssignmentStatus::Confirmed => "CONFIRMED",
            AssignmentStatus::Rejected => "REJECTED",
            AssignmentStatus::Started => "STARTED",
            AssignmentStatus::Canceled => "CANCELED",
        }
    }

    /// Etiqueta visible para el usuario
    pub fn label(self) -> &'static str {
        match self {
            AssignmentStatus::Pending => "Pendiente",
            AssignmentStatus::Assigned => "Asignado",
            AssignmentStatus::Confirmed => "Confirmado",
            AssignmentStatus::Rejected => "Rechazado",
            AssignmentStatus::Started => "Práctica iniciada",
            AssignmentStatus::Canceled => "Cancelado",
        }
    }
}

impl std::fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Modalidad de la práctica - mapea al ENUM assignment_modality
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, Type, PartialEq, Eq, Hash)]
#[sqlx(type_name = "assignment_modality", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssignmentModality {
    #[default]
    OnSite,
    Remote,
    Hybrid,
}

/// Assignment principal - mapea exactamente a la tabla assignments
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Assignment {
    pub id: Uuid,
    pub apprentice_id: Uuid,
    pub company_id: Uuid,
    pub proposed_start_date: NaiveDate,
    pub proposed_end_date: NaiveDate,
    pub status: AssignmentStatus,
    pub modality: AssignmentModality,
    pub proposed_tutor: String,
    pub work_area: String,
    pub proposed_objectives: String,
    pub company_contact_name: String,
    pub company_contact_phone: String,
    pub company_contact_email: String,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
    pub created_by: Option<String>,
}

impl Assignment {
    /// Crear una asignación nueva; `created_at` no vuelve a modificarse
    pub fn new(
        request: AssignmentRequest,
        company_id: Uuid,
        status: AssignmentStatus,
        created_by: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        let mut assignment = Self {
            id: Uuid::new_v4(),
            apprentice_id: request.apprentice_id,
            company_id,
            proposed_start_date: request.proposed_start_date,
            proposed_end_date: request.proposed_end_date,
            status,
            modality: AssignmentModality::default(),
            proposed_tutor: String::new(),
            work_area: String::new(),
            proposed_objectives: String::new(),
            company_contact_name: String::new(),
            company_contact_phone: String::new(),
            company_contact_email: String::new(),
            notes: String::new(),
            created_at: now,
            confirmed_at: None,
            updated_at: now,
            created_by,
        };
        assignment.apply(request, company_id, now);
        assignment
    }

    /// Copiar los campos editables desde el formulario
    pub fn apply(&mut self, request: AssignmentRequest, company_id: Uuid, now: DateTime<Utc>) {
        self.apprentice_id = request.apprentice_id;
        self.company_id = company_id;
        self.proposed_start_date = request.proposed_start_date;
        self.proposed_end_date = request.proposed_end_date;
        self.modality = request.modality.unwrap_or_default();
        self.proposed_tutor = request.proposed_tutor.trim().to_string();
        self.work_area = trimmed(request.work_area);
        self.proposed_objectives = trimmed(request.proposed_objectives);
        self.company_contact_name = trimmed(request.company_contact_name);
        self.company_contact_phone = trimmed(request.company_contact_phone);
        self.company_contact_email = trimmed(request.company_contact_email).to_lowercase();
        self.notes = trimmed(request.notes);
        self.updated_at = now;
    }
}

fn trimmed(value: Option<String>) -> String {
    value.map(|v| v.trim().to_string()).unwrap_or_default()
}

/// Asignación con los nombres necesarios para listados y detalle
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AssignmentDetail {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub assignment: Assignment,
    pub apprentice_name: String,
    pub apprentice_document: String,
    pub company_name: String,
}
