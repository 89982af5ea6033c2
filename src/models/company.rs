//! Modelo de Company
//!
//! Este módulo contiene el struct Company (empresa patrocinadora) y sus
//! variantes de lectura. Mapea exactamente a la tabla `companies`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::dto::company_dto::CompanyRequest;

/// Company principal - mapea exactamente a la tabla companies
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Company {
    pub id: Uuid,
    pub name: String,
    pub tax_id: String,
    pub address: String,
    pub city: String,
    pub phone: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Company {
    /// Crear una nueva empresa a partir de un formulario ya validado
    pub fn new(request: CompanyRequest, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: request.name.trim().to_string(),
            tax_id: request.tax_id.trim().to_string(),
            address: request.address.trim().to_string(),
            city: request.city.trim().to_string(),
            phone: request.phone.trim().to_string(),
            email: request.email.trim().to_lowercase(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Aplicar los cambios de un formulario de edición
    pub fn apply(&mut self, request: CompanyRequest, now: DateTime<Utc>) {
        self.name = request.name.trim().to_string();
        self.tax_id = request.tax_id.trim().to_string();
        self.address = request.address.trim().to_string();
        self.city = request.city.trim().to_string();
        self.phone = request.phone.trim().to_string();
        self.email = request.email.trim().to_lowercase();
        self.updated_at = now;
    }
}

/// Empresa anotada con sus registros dependientes, para el listado
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CompanyWithCounts {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub company: Company,
    pub assignment_count: i64,
    pub placement_count: i64,
}

/// Registros que impiden eliminar una empresa
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CompanyDependents {
    pub assignments: i64,
    pub placements: i64,
}

impl CompanyDependents {
    pub fn is_empty(&self) -> bool {
        self.assignments == 0 && self.placements == 0
    }
}
