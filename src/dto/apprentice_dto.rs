use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::Apprentice;
use crate::utils::validation::validate_not_blank;

// Request para registrar un aprendiz
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateApprenticeRequest {
    #[validate(length(min = 1, max = 100), custom = "validate_not_blank")]
    pub first_name: String,

    #[validate(length(min = 1, max = 100), custom = "validate_not_blank")]
    pub last_name: String,

    #[validate(length(min = 5, max = 20), custom = "validate_not_blank")]
    pub document: String,

    #[validate(email)]
    pub email: Option<String>,
}

// Listado completo, ordenado por apellido y nombre
#[derive(Debug, Serialize, Deserialize)]
pub struct ApprenticeListResponse {
    pub apprentices: Vec<Apprentice>,
    pub total: usize,
}

// Aprendiz sin asignación activa
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AvailableApprentice {
    pub id: Uuid,
    pub name: String,
    pub document: String,
}

impl From<Apprentice> for AvailableApprentice {
    fn from(apprentice: Apprentice) -> Self {
        Self {
            id: apprentice.id,
            name: apprentice.full_name(),
            document: apprentice.document,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AvailableApprenticesResponse {
    pub apprentices: Vec<AvailableApprentice>,
    pub total: usize,
}
