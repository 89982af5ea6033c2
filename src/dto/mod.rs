//! Objetos de transferencia (requests y responses de la API)

pub mod apprentice_dto;
pub mod assignment_dto;
pub mod company_dto;
pub mod placement_dto;

use serde::{Deserialize, Serialize};

/// Tamaño fijo de página de los listados de asignaciones
pub const PAGE_SIZE: i64 = 10;

/// Página más alta que se atiende; números mayores se recortan
pub const MAX_PAGE: i64 = 1_000_000;

// Response genérica
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    pub fn success_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: None,
        }
    }
}

/// Página calculada a partir del número solicitado (1-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub number: i64,
    pub size: i64,
}

impl Page {
    pub fn new(number: Option<i64>) -> Self {
        Self {
            number: number.unwrap_or(1).clamp(1, MAX_PAGE),
            size: PAGE_SIZE,
        }
    }

    pub fn offset(&self) -> i64 {
        (self.number - 1).saturating_mul(self.size)
    }

    pub fn total_pages(&self, total: i64) -> i64 {
        if total <= 0 {
            1
        } else {
            (total + self.size - 1) / self.size
        }
    }
}
