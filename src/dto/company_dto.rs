use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{Company, CompanyWithCounts, PlacementDetail};
use crate::utils::validation::{validate_nit, validate_not_blank, validate_phone};

// Formulario de empresa (creación y edición); todos los campos son obligatorios
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CompanyRequest {
    #[validate(length(min = 1, max = 100), custom = "validate_not_blank")]
    pub name: String,

    #[validate(length(min = 1, max = 50), custom = "validate_nit")]
    pub tax_id: String,

    #[validate(length(min = 1, max = 300), custom = "validate_not_blank")]
    pub address: String,

    #[validate(length(min = 1, max = 50), custom = "validate_not_blank")]
    pub city: String,

    #[validate(length(min = 1, max = 15), custom = "validate_phone")]
    pub phone: String,

    #[validate(email)]
    pub email: String,
}

// Filtros del listado de empresas
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompanyListQuery {
    /// Busca en nombre, NIT y correo
    pub q: Option<String>,
    pub city: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CompanyListResponse {
    pub companies: Vec<CompanyWithCounts>,
    pub total: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CompanyDetailResponse {
    pub company: Company,
    pub stats: PlacementStatistics,
    pub recent_placements: Vec<PlacementDetail>,
}

// Vista de aprendices asignados a la empresa
#[derive(Debug, Serialize, Deserialize)]
pub struct CompanyApprenticesResponse {
    pub company: Company,
    pub placements: Vec<PlacementDetail>,
    pub total: i64,
    pub with_alerts: i64,
    pub completed: i64,
}

/// Conteos de bitácoras por estado de la etapa
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogbookCounts {
    pub not_started: i64,
    pub submitted: i64,
    pub reviewed: i64,
    pub with_observations: i64,
    pub withdrawn: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LogbookOverviewResponse {
    pub company: Company,
    pub placements: Vec<PlacementDetail>,
    pub counts: LogbookCounts,
}

// Estadísticas JSON de la empresa
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentStatistics {
    pub total: i64,
    pub pending: i64,
    pub confirmed: i64,
    pub rejected: i64,
    pub started: i64,
}

/// Resumen de etapas; también es el bloque de estadísticas del detalle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementStatistics {
    pub total: i64,
    pub productive: i64,
    pub completed: i64,
    pub withdrawn: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyStatisticsResponse {
    pub assignments: AssignmentStatistics,
    pub placements: PlacementStatistics,
}
