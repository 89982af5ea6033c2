//! Modelo de Apprentice (aprendiz)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::dto::apprentice_dto::CreateApprenticeRequest;

/// Aprendiz - mapea a la tabla apprentices
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Apprentice {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub document: String,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Apprentice {
    pub fn new(request: CreateApprenticeRequest, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            first_name: request.first_name.trim().to_string(),
            last_name: request.last_name.trim().to_string(),
            document: request.document.trim().to_string(),
            email: request
                .email
                .map(|e| e.trim().to_lowercase())
                .filter(|e| !e.is_empty()),
            created_at: now,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
