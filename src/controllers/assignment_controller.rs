use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::{info, warn};
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::dto::assignment_dto::{
    AssignmentDetailResponse, AssignmentFilter, AssignmentListResponse, AssignmentRequest,
    BatchResult, ConfirmRequest, ReasonRequest, StartPracticeResponse, StatusCounts,
};
use crate::dto::{ApiResponse, Page};
use crate::models::{Assignment, AssignmentStatus};
use crate::repositories::{
    ApprenticeRepository, AssignmentRepository, CompanyRepository, PlacementRepository,
};
use crate::services::lifecycle::{self, Denial};
use crate::state::AppState;
use crate::utils::errors::{field_error, validation_error, AppError, AppResult};
use crate::utils::validation::{check_proposal_dates, collect, into_result};

/// Motivo fijo del rechazo masivo
pub const BATCH_REJECT_REASON: &str = "Rechazado desde admin";

pub struct AssignmentController {
    apprentices: Arc<dyn ApprenticeRepository>,
    companies: Arc<dyn CompanyRepository>,
    assignments: Arc<dyn AssignmentRepository>,
    placements: Arc<dyn PlacementRepository>,
}

impl AssignmentController {
    pub fn new(state: &AppState) -> Self {
        Self {
            apprentices: state.apprentices.clone(),
            companies: state.companies.clone(),
            assignments: state.assignments.clone(),
            placements: state.placements.clone(),
        }
    }

    /// Propuesta general: nace PENDING
    pub async fn propose(
        &self,
        request: AssignmentRequest,
        created_by: Option<String>,
    ) -> AppResult<ApiResponse<Assignment>> {
        let company_id = request
            .company_id
            .ok_or_else(|| validation_error("company_id", "Debe seleccionar una empresa."))?;

        let assignment = self
            .create(request, company_id, AssignmentStatus::Pending, created_by)
            .await?;

        Ok(ApiResponse::success_with_message(
            assignment,
            "Asignación propuesta exitosamente",
        ))
    }

    /// Asignar un aprendiz desde la empresa: nace ASSIGNED
    pub async fn assign_to_company(
        &self,
        company_id: Uuid,
        request: AssignmentRequest,
        created_by: Option<String>,
    ) -> AppResult<ApiResponse<Assignment>> {
        self.companies
            .find_by_id(company_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Empresa no encontrada".to_string()))?;

        let assignment = self
            .create(request, company_id, AssignmentStatus::Assigned, created_by)
            .await?;

        Ok(ApiResponse::success_with_message(
            assignment,
            "Aprendiz asignado exitosamente",
        ))
    }

    async fn create(
        &self,
        request: AssignmentRequest,
        company_id: Uuid,
        status: AssignmentStatus,
        created_by: Option<String>,
    ) -> AppResult<Assignment> {
        let now = Utc::now();
        self.validate(&request, company_id, None, now.date_naive()).await?;

        let assignment = Assignment::new(request, company_id, status, created_by, now);
        let assignment = self.assignments.create(&assignment).await?;
        info!(
            "Asignación {} creada en estado {} (aprendiz {}, empresa {})",
            assignment.id,
            assignment.status.as_str(),
            assignment.apprentice_id,
            assignment.company_id
        );

        Ok(assignment)
    }

    pub async fn get_detail(&self, id: Uuid) -> AppResult<AssignmentDetailResponse> {
        let assignment = self
            .assignments
            .find_detail(id)
            .await?
            .ok_or_else(not_found)?;
        let placement_id = self.placements.find_by_origin(id).await?.map(|p| p.id);
        let allowed_events = lifecycle::allowed_events(assignment.assignment.status);

        Ok(AssignmentDetailResponse {
            assignment,
            placement_id,
            allowed_events,
        })
    }

    pub async fn list(&self, filter: AssignmentFilter) -> AppResult<AssignmentListResponse> {
        let page = Page::new(filter.page);
        let counts = StatusCounts::from_pairs(&self.assignments.count_by_status(&filter).await?);
        let items = self.assignments.search(&filter, page).await?;

        Ok(AssignmentListResponse {
            items,
            page: page.number,
            per_page: page.size,
            total: counts.total,
            total_pages: page.total_pages(counts.total),
            counts,
        })
    }

    /// Edición de los campos propuestos (sólo PENDING/ASSIGNED)
    pub async fn update(
        &self,
        id: Uuid,
        request: AssignmentRequest,
    ) -> AppResult<ApiResponse<Assignment>> {
        let current = self.find(id).await?;
        lifecycle::ensure_editable(&current)?;

        let now = Utc::now();
        let company_id = request.company_id.unwrap_or(current.company_id);
        self.validate(&request, company_id, Some(id), now.date_naive()).await?;

        let mut next = current.clone();
        next.apply(request, company_id, now);
        let updated = self.persist(&next, current.status).await?;
        info!("Asignación {} actualizada", updated.id);

        Ok(ApiResponse::success_with_message(
            updated,
            "Asignación actualizada exitosamente",
        ))
    }

    pub async fn confirm(
        &self,
        id: Uuid,
        request: ConfirmRequest,
    ) -> AppResult<ApiResponse<Assignment>> {
        let current = self.find(id).await?;
        let next = lifecycle::confirm(&current, request.note.as_deref(), Utc::now())
            .map_err(denial_error)?;
        let updated = self.persist(&next, current.status).await?;
        info!("Asignación {} confirmada", updated.id);

        Ok(ApiResponse::success_with_message(
            updated,
            "Asignación confirmada exitosamente",
        ))
    }

    pub async fn reject(
        &self,
        id: Uuid,
        request: ReasonRequest,
    ) -> AppResult<ApiResponse<Assignment>> {
        let current = self.find(id).await?;
        let next = lifecycle::reject(&current, request.reason.as_deref(), Utc::now())
            .map_err(denial_error)?;
        let updated = self.persist(&next, current.status).await?;
        info!("Asignación {} rechazada", updated.id);

        Ok(ApiResponse::success_with_message(updated, "Asignación rechazada"))
    }

    pub async fn cancel(
        &self,
        id: Uuid,
        request: ReasonRequest,
    ) -> AppResult<ApiResponse<Assignment>> {
        let current = self.find(id).await?;
        let next = lifecycle::cancel(&current, request.reason.as_deref(), Utc::now())
            .map_err(denial_error)?;
        let updated = self.persist(&next, current.status).await?;
        info!("Asignación {} cancelada", updated.id);

        Ok(ApiResponse::success_with_message(updated, "Asignación cancelada"))
    }

    /// CONFIRMED → STARTED más la etapa productiva, como una sola unidad
    pub async fn start_practice(&self, id: Uuid) -> AppResult<ApiResponse<StartPracticeResponse>> {
        let current = self.find(id).await?;
        let (next, placement) = lifecycle::start_practice(&current, Utc::now())?;

        let started = self.assignments.start_practice(&next, &placement).await?;
        let (assignment, placement) = match started {
            Some(result) => result,
            None => return Err(self.stale(id, lifecycle::AssignmentEvent::StartPractice).await),
        };
        info!(
            "Etapa práctica {} iniciada desde la asignación {}",
            placement.id, assignment.id
        );

        Ok(ApiResponse::success_with_message(
            StartPracticeResponse { assignment, placement },
            "Etapa práctica iniciada exitosamente",
        ))
    }

    /// Borrado directo; la etapa derivada conserva su registro sin origen
    pub async fn delete(&self, id: Uuid) -> AppResult<ApiResponse<()>> {
        if !self.assignments.delete(id).await? {
            return Err(not_found());
        }
        info!("Asignación {} eliminada", id);

        Ok(ApiResponse::message("Asignación eliminada"))
    }

    /// Confirmar en bloque; sólo cambian las que están ASSIGNED
    pub async fn batch_confirm(&self, ids: Vec<Uuid>) -> AppResult<ApiResponse<BatchResult>> {
        let now = Utc::now();
        let mut updated = 0;
        for id in &ids {
            if let Some(current) = self.assignments.find_by_id(*id).await? {
                if let Ok(next) = lifecycle::confirm(&current, None, now) {
                    if self.assignments.update(&next, current.status).await?.is_some() {
                        updated += 1;
                    }
                }
            }
        }
        info!("Confirmación masiva: {}/{} asignaciones", updated, ids.len());

        Ok(ApiResponse::success_with_message(
            BatchResult { requested: ids.len(), updated },
            format!("{} asignación(es) confirmada(s)", updated),
        ))
    }

    /// Rechazar en bloque con motivo fijo; sólo cambian las PENDING/ASSIGNED
    pub async fn batch_reject(&self, ids: Vec<Uuid>) -> AppResult<ApiResponse<BatchResult>> {
        let now = Utc::now();
        let mut updated = 0;
        for id in &ids {
            if let Some(current) = self.assignments.find_by_id(*id).await? {
                if let Ok(next) = lifecycle::reject(&current, Some(BATCH_REJECT_REASON), now) {
                    if self.assignments.update(&next, current.status).await?.is_some() {
                        updated += 1;
                    }
                }
            }
        }
        info!("Rechazo masivo: {}/{} asignaciones", updated, ids.len());

        Ok(ApiResponse::success_with_message(
            BatchResult { requested: ids.len(), updated },
            format!("{} asignación(es) rechazada(s)", updated),
        ))
    }

    async fn find(&self, id: Uuid) -> AppResult<Assignment> {
        self.assignments.find_by_id(id).await?.ok_or_else(not_found)
    }

    /// Escritura condicionada al estado leído; si otro cambio llegó antes, se deniega
    async fn persist(
        &self,
        next: &Assignment,
        expected: AssignmentStatus,
    ) -> AppResult<Assignment> {
        match self.assignments.update(next, expected).await? {
            Some(updated) => Ok(updated),
            None => {
                Err(self.stale(next.id, event_into(next.status)).await)
            }
        }
    }

    async fn stale(&self, id: Uuid, event: lifecycle::AssignmentEvent) -> AppError {
        match self.assignments.find_by_id(id).await {
            Ok(Some(current)) => {
                warn!(
                    "Asignación {} cambió a {} durante la operación",
                    id,
                    current.status.as_str()
                );
                AppError::TransitionDenied(Denial::NotAllowed {
                    event,
                    from: current.status,
                })
            }
            Ok(None) => not_found(),
            Err(e) => e,
        }
    }

    /// Datos válidos, referencias existentes y una sola asignación activa por aprendiz
    async fn validate(
        &self,
        request: &AssignmentRequest,
        company_id: Uuid,
        exclude: Option<Uuid>,
        today: NaiveDate,
    ) -> AppResult<()> {
        let mut errors: ValidationErrors = collect(request.validate());
        check_proposal_dates(
            &mut errors,
            request.proposed_start_date,
            request.proposed_end_date,
            today,
        );

        if self.apprentices.find_by_id(request.apprentice_id).await?.is_none() {
            errors.add(
                "apprentice_id",
                field_error("not_found", "El aprendiz seleccionado no existe."),
            );
        } else if self
            .assignments
            .has_active_for_apprentice(request.apprentice_id, exclude)
            .await?
        {
            errors.add(
                "apprentice_id",
                field_error(
                    "active_assignment",
                    "El aprendiz ya tiene una asignación activa.",
                ),
            );
        }

        if self.companies.find_by_id(company_id).await?.is_none() {
            errors.add(
                "company_id",
                field_error("not_found", "La empresa seleccionada no existe."),
            );
        }

        into_result(errors)
    }
}

fn not_found() -> AppError {
    AppError::NotFound("Asignación no encontrada".to_string())
}

/// El motivo faltante es un error de campo; el resto, una transición denegada
fn denial_error(denial: Denial) -> AppError {
    match denial {
        Denial::ReasonRequired => validation_error("reason", denial.to_string()),
        other => AppError::TransitionDenied(other),
    }
}

/// Evento que produce el estado `to`, para informar una escritura rechazada
fn event_into(to: AssignmentStatus) -> lifecycle::AssignmentEvent {
    use lifecycle::AssignmentEvent as E;

    match to {
        AssignmentStatus::Confirmed => E::Confirm,
        AssignmentStatus::Rejected => E::Reject,
        AssignmentStatus::Canceled => E::Cancel,
        AssignmentStatus::Started => E::StartPractice,
        AssignmentStatus::Pending | AssignmentStatus::Assigned => E::Edit,
    }
}
