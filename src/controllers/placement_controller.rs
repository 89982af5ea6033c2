use std::sync::Arc;

use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::dto::placement_dto::{PlacementFilter, PlacementRequest};
use crate::dto::ApiResponse;
use crate::models::{Placement, PlacementDetail};
use crate::repositories::{ApprenticeRepository, CompanyRepository, PlacementRepository};
use crate::state::AppState;
use crate::utils::errors::{field_error, AppError, AppResult};
use crate::utils::validation::{check_placement_dates, collect, into_result};

pub struct PlacementController {
    apprentices: Arc<dyn ApprenticeRepository>,
    companies: Arc<dyn CompanyRepository>,
    placements: Arc<dyn PlacementRepository>,
}

impl PlacementController {
    pub fn new(state: &AppState) -> Self {
        Self {
            apprentices: state.apprentices.clone(),
            companies: state.companies.clone(),
            placements: state.placements.clone(),
        }
    }

    /// Alta manual: sin asignación de origen
    pub async fn create(&self, request: PlacementRequest) -> AppResult<ApiResponse<Placement>> {
        self.validate(&request).await?;

        let placement = self.placements.create(&Placement::new(request)).await?;
        info!("Etapa práctica {} registrada", placement.id);

        Ok(ApiResponse::success_with_message(
            placement,
            "Etapa práctica registrada exitosamente",
        ))
    }

    pub async fn update(
        &self,
        id: Uuid,
        request: PlacementRequest,
    ) -> AppResult<ApiResponse<Placement>> {
        let mut placement = self
            .placements
            .find_by_id(id)
            .await?
            .ok_or_else(not_found)?;
        self.validate(&request).await?;

        placement.apply(request);
        let placement = self.placements.update(&placement).await?;
        info!("Etapa práctica {} actualizada", placement.id);

        Ok(ApiResponse::success_with_message(
            placement,
            "Etapa práctica actualizada exitosamente",
        ))
    }

    pub async fn get_detail(&self, id: Uuid) -> AppResult<PlacementDetail> {
        self.placements.find_detail(id).await?.ok_or_else(not_found)
    }

    pub async fn list(&self, filter: PlacementFilter) -> AppResult<Vec<PlacementDetail>> {
        self.placements.list(&filter, None).await
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<ApiResponse<()>> {
        if !self.placements.delete(id).await? {
            return Err(not_found());
        }
        info!("Etapa práctica {} eliminada", id);

        Ok(ApiResponse::message("Etapa práctica eliminada"))
    }

    async fn validate(&self, request: &PlacementRequest) -> AppResult<()> {
        let mut errors = collect(request.validate());
        check_placement_dates(&mut errors, request.start_date, request.end_date);

        if self.apprentices.find_by_id(request.apprentice_id).await?.is_none() {
            errors.add(
                "apprentice_id",
                field_error("not_found", "El aprendiz seleccionado no existe."),
            );
        }
        if self.companies.find_by_id(request.company_id).await?.is_none() {
            errors.add(
                "company_id",
                field_error("not_found", "La empresa seleccionada no existe."),
            );
        }

        into_result(errors)
    }
}

fn not_found() -> AppError {
    AppError::NotFound("Etapa práctica no encontrada".to_string())
}
