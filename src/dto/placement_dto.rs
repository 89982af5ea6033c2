use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::models::PlacementStatus;
use crate::utils::validation::validate_not_blank;

// Formulario de etapa de práctica (creación manual y edición)
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PlacementRequest {
    pub apprentice_id: Uuid,
    pub company_id: Uuid,

    #[validate(length(min = 1, max = 200), custom = "validate_not_blank")]
    pub tutor: String,

    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub objectives: Option<String>,
    pub logbook: Option<String>,
    pub status: PlacementStatus,
}

// Filtros del listado de etapas
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlacementFilter {
    pub company_id: Option<Uuid>,
    pub status: Option<PlacementStatus>,
}
