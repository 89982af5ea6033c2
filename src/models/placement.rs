//! Modelo de Placement (etapa de práctica)
//!
//! La etapa de práctica es el registro de la práctica real, con su bitácora.
//! Puede crearse manualmente o derivarse de una asignación confirmada.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

use crate::dto::placement_dto::PlacementRequest;

/// Estado académico de la etapa - mapea al ENUM placement_status
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, Type, PartialEq, Eq, Hash)]
#[sqlx(type_name = "placement_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlacementStatus {
    #[default]
    Academic,
    Productive,
    Completed,
    Withdrawn,
    Deferred,
}

impl PlacementStatus {
    pub const ALL: [PlacementStatus; 5] = [
        PlacementStatus::Academic,
        PlacementStatus::Productive,
        PlacementStatus::Completed,
        PlacementStatus::Withdrawn,
        PlacementStatus::Deferred,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PlacementStatus::Academic => "En etapa lectiva",
            PlacementStatus::Productive => "En etapa productiva",
            PlacementStatus::Completed => "Formación finalizada",
            PlacementStatus::Withdrawn => "Retirado",
            PlacementStatus::Deferred => "Aplazado",
        }
    }

    /// Estados que requieren seguimiento en la vista de aprendices asignados
    pub fn needs_attention(self) -> bool {
        matches!(self, PlacementStatus::Deferred | PlacementStatus::Withdrawn)
    }
}

/// Placement principal - mapea exactamente a la tabla placements
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Placement {
    pub id: Uuid,
    pub apprentice_id: Uuid,
    pub company_id: Uuid,
    pub tutor: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub objectives: String,
    pub logbook: String,
    pub status: PlacementStatus,
    pub origin_assignment_id: Option<Uuid>,
}

impl Placement {
    /// Etapa creada desde el formulario manual (sin asignación de origen)
    pub fn new(request: PlacementRequest) -> Self {
        let mut placement = Self {
            id: Uuid::new_v4(),
            apprentice_id: request.apprentice_id,
            company_id: request.company_id,
            tutor: String::new(),
            start_date: request.start_date,
            end_date: None,
            objectives: String::new(),
            logbook: String::new(),
            status: PlacementStatus::default(),
            origin_assignment_id: None,
        };
        placement.apply(request);
        placement
    }

    /// Copiar los campos editables; la asignación de origen nunca cambia
    pub fn apply(&mut self, request: PlacementRequest) {
        self.apprentice_id = request.apprentice_id;
        self.company_id = request.company_id;
        self.tutor = request.tutor.trim().to_string();
        self.start_date = request.start_date;
        self.end_date = request.end_date;
        self.objectives = request.objectives.unwrap_or_default();
        self.logbook = request.logbook.unwrap_or_default();
        self.status = request.status;
    }
}

/// Etapa con los nombres del aprendiz y la empresa (detalle de bitácora)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PlacementDetail {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub placement: Placement,
    pub apprentice_name: String,
    pub apprentice_document: String,
    pub company_name: String,
}
