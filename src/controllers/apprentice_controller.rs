use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::dto::apprentice_dto::{
    ApprenticeListResponse, AvailableApprentice, AvailableApprenticesResponse,
    CreateApprenticeRequest,
};
use crate::dto::ApiResponse;
use crate::models::Apprentice;
use crate::repositories::ApprenticeRepository;
use crate::state::AppState;
use crate::utils::errors::{field_error, AppError, AppResult};
use crate::utils::validation::{collect, into_result};

pub struct ApprenticeController {
    apprentices: Arc<dyn ApprenticeRepository>,
}

impl ApprenticeController {
    pub fn new(state: &AppState) -> Self {
        Self {
            apprentices: state.apprentices.clone(),
        }
    }

    pub async fn create(
        &self,
        request: CreateApprenticeRequest,
    ) -> AppResult<ApiResponse<Apprentice>> {
        let mut errors = collect(request.validate());
        if !errors.field_errors().contains_key("document")
            && self.apprentices.document_exists(&request.document).await?
        {
            errors.add(
                "document",
                field_error("unique", "Ya existe un aprendiz con este documento."),
            );
        }
        into_result(errors)?;

        let apprentice = self
            .apprentices
            .create(&Apprentice::new(request, Utc::now()))
            .await?;
        info!("Aprendiz registrado: {} ({})", apprentice.full_name(), apprentice.id);

        Ok(ApiResponse::success_with_message(
            apprentice,
            "Aprendiz registrado exitosamente",
        ))
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Apprentice> {
        self.apprentices
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Aprendiz no encontrado".to_string()))
    }

    pub async fn list(&self) -> AppResult<ApprenticeListResponse> {
        let apprentices = self.apprentices.list_all().await?;
        Ok(ApprenticeListResponse {
            total: apprentices.len(),
            apprentices,
        })
    }

    /// Aprendices elegibles para una nueva asignación
    pub async fn available(&self) -> AppResult<AvailableApprenticesResponse> {
        let apprentices: Vec<AvailableApprentice> = self
            .apprentices
            .list_available()
            .await?
            .into_iter()
            .map(AvailableApprentice::from)
            .collect();

        Ok(AvailableApprenticesResponse {
            total: apprentices.len(),
            apprentices,
        })
    }
}
