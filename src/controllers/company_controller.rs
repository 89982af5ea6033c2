use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::dto::assignment_dto::{AssignmentFilter, StatusCounts};
use crate::dto::company_dto::{
    AssignmentStatistics, CompanyApprenticesResponse, CompanyDetailResponse, CompanyListQuery,
    CompanyListResponse, CompanyRequest, CompanyStatisticsResponse, LogbookCounts,
    LogbookOverviewResponse, PlacementStatistics,
};
use crate::dto::placement_dto::PlacementFilter;
use crate::dto::ApiResponse;
use crate::models::{Company, PlacementStatus};
use crate::repositories::{AssignmentRepository, CompanyRepository, PlacementRepository};
use crate::state::AppState;
use crate::utils::errors::{field_error, AppError, AppResult};
use crate::utils::validation::{collect, into_result};

/// Etapas recientes mostradas en el detalle de la empresa
const RECENT_PLACEMENTS: i64 = 5;

pub struct CompanyController {
    companies: Arc<dyn CompanyRepository>,
    assignments: Arc<dyn AssignmentRepository>,
    placements: Arc<dyn PlacementRepository>,
}

impl CompanyController {
    pub fn new(state: &AppState) -> Self {
        Self {
            companies: state.companies.clone(),
            assignments: state.assignments.clone(),
            placements: state.placements.clone(),
        }
    }

    pub async fn create(&self, request: CompanyRequest) -> AppResult<ApiResponse<Company>> {
        self.validate(&request, None).await?;

        let company = self.companies.create(&Company::new(request, Utc::now())).await?;
        info!("Empresa registrada: {} ({})", company.name, company.id);

        Ok(ApiResponse::success_with_message(
            company,
            "Empresa registrada exitosamente",
        ))
    }

    pub async fn update(
        &self,
        id: Uuid,
        request: CompanyRequest,
    ) -> AppResult<ApiResponse<Company>> {
        let mut company = self.get_by_id(id).await?;
        self.validate(&request, Some(id)).await?;

        company.apply(request, Utc::now());
        let company = self.companies.update(&company).await?;
        info!("Empresa actualizada: {}", company.id);

        Ok(ApiResponse::success_with_message(
            company,
            "Empresa actualizada exitosamente",
        ))
    }

    /// Sólo se elimina si no tiene asignaciones ni etapas asociadas
    pub async fn delete(&self, id: Uuid) -> AppResult<ApiResponse<()>> {
        let company = self.get_by_id(id).await?;

        let dependents = self.companies.dependents(id).await?;
        if !dependents.is_empty() {
            warn!(
                "Eliminación bloqueada para {}: {} asignaciones, {} etapas",
                company.id, dependents.assignments, dependents.placements
            );
            return Err(AppError::DeleteBlocked {
                assignments: dependents.assignments,
                placements: dependents.placements,
            });
        }

        self.companies.delete(id).await?;
        info!("Empresa eliminada: {} ({})", company.name, company.id);

        Ok(ApiResponse::message(format!(
            "La empresa {} fue eliminada",
            company.name
        )))
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Company> {
        self.companies
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Empresa no encontrada".to_string()))
    }

    pub async fn list(&self, query: CompanyListQuery) -> AppResult<CompanyListResponse> {
        let companies = self.companies.list(&query).await?;
        Ok(CompanyListResponse {
            total: companies.len(),
            companies,
        })
    }

    pub async fn detail(&self, id: Uuid) -> AppResult<CompanyDetailResponse> {
        let company = self.get_by_id(id).await?;
        let stats = self.placement_statistics(id).await?;
        let recent_placements = self
            .placements
            .list(&company_placements(id), Some(RECENT_PLACEMENTS))
            .await?;

        Ok(CompanyDetailResponse {
            company,
            stats,
            recent_placements,
        })
    }

    pub async fn statistics(&self, id: Uuid) -> AppResult<CompanyStatisticsResponse> {
        self.get_by_id(id).await?;

        let filter = AssignmentFilter {
            company_id: Some(id),
            ..AssignmentFilter::default()
        };
        let counts = StatusCounts::from_pairs(&self.assignments.count_by_status(&filter).await?);

        Ok(CompanyStatisticsResponse {
            assignments: AssignmentStatistics {
                total: counts.total,
                pending: counts.pending,
                confirmed: counts.confirmed,
                rejected: counts.rejected,
                started: counts.started,
            },
            placements: self.placement_statistics(id).await?,
        })
    }

    /// Aprendices con etapa en la empresa y cuántos requieren seguimiento
    pub async fn apprentices(&self, id: Uuid) -> AppResult<CompanyApprenticesResponse> {
        let company = self.get_by_id(id).await?;
        let placements = self.placements.list(&company_placements(id), None).await?;

        let with_alerts = placements
            .iter()
            .filter(|p| p.placement.status.needs_attention())
            .count() as i64;
        let completed = placements
            .iter()
            .filter(|p| p.placement.status == PlacementStatus::Completed)
            .count() as i64;

        Ok(CompanyApprenticesResponse {
            company,
            total: placements.len() as i64,
            with_alerts,
            completed,
            placements,
        })
    }

    pub async fn logbooks(&self, id: Uuid) -> AppResult<LogbookOverviewResponse> {
        let company = self.get_by_id(id).await?;
        let placements = self.placements.list(&company_placements(id), None).await?;

        let mut counts = LogbookCounts::default();
        for detail in &placements {
            match detail.placement.status {
                PlacementStatus::Academic => counts.not_started += 1,
                PlacementStatus::Productive => counts.submitted += 1,
                PlacementStatus::Completed => counts.reviewed += 1,
                PlacementStatus::Deferred => counts.with_observations += 1,
                PlacementStatus::Withdrawn => counts.withdrawn += 1,
            }
        }

        Ok(LogbookOverviewResponse {
            company,
            placements,
            counts,
        })
    }

    async fn placement_statistics(&self, id: Uuid) -> AppResult<PlacementStatistics> {
        let mut stats = PlacementStatistics::default();
        for (status, count) in self.placements.count_by_status(id).await? {
            stats.total += count;
            match status {
                PlacementStatus::Productive => stats.productive += count,
                PlacementStatus::Completed => stats.completed += count,
                PlacementStatus::Withdrawn => stats.withdrawn += count,
                PlacementStatus::Academic | PlacementStatus::Deferred => {}
            }
        }
        Ok(stats)
    }

    /// Reglas de formato más unicidad de NIT y correo (excluyendo la propia empresa)
    async fn validate(&self, request: &CompanyRequest, exclude: Option<Uuid>) -> AppResult<()> {
        let mut errors = collect(request.validate());
        let invalid = errors.field_errors();
        let check_tax_id = !invalid.contains_key("tax_id");
        let check_email = !invalid.contains_key("email");

        if check_tax_id && self.companies.tax_id_exists(&request.tax_id, exclude).await? {
            errors.add("tax_id", field_error("unique", "Ya existe una empresa con este NIT."));
        }
        if check_email && self.companies.email_exists(&request.email, exclude).await? {
            errors.add(
                "email",
                field_error("unique", "Ya existe una empresa con este correo electrónico."),
            );
        }

        into_result(errors)
    }
}

fn company_placements(company_id: Uuid) -> PlacementFilter {
    PlacementFilter {
        company_id: Some(company_id),
        status: None,
    }
}
