use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::assignment_controller::AssignmentController;
use crate::controllers::company_controller::CompanyController;
use crate::dto::assignment_dto::{AssignmentFilter, AssignmentListResponse, AssignmentRequest};
use crate::dto::company_dto::{
    CompanyApprenticesResponse, CompanyDetailResponse, CompanyListQuery, CompanyListResponse,
    CompanyRequest, CompanyStatisticsResponse, LogbookOverviewResponse,
};
use crate::dto::ApiResponse;
use crate::middleware::ActingUser;
use crate::models::{Assignment, Company};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_company_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_companies).post(create_company))
        .route(
            "/:id",
            get(get_company).put(update_company).delete(delete_company),
        )
        .route("/:id/statistics", get(company_statistics))
        .route("/:id/apprentices", get(company_apprentices))
        .route("/:id/logbooks", get(company_logbooks))
        .route(
            "/:id/assignments",
            get(company_assignments).post(assign_apprentice),
        )
}

async fn create_company(
    State(state): State<AppState>,
    Json(request): Json<CompanyRequest>,
) -> Result<Json<ApiResponse<Company>>, AppError> {
    let controller = CompanyController::new(&state);
    let response = controller.create(request).await?;
    Ok(Json(response))
}

async fn list_companies(
    State(state): State<AppState>,
    Query(query): Query<CompanyListQuery>,
) -> Result<Json<CompanyListResponse>, AppError> {
    let controller = CompanyController::new(&state);
    let response = controller.list(query).await?;
    Ok(Json(response))
}

async fn get_company(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CompanyDetailResponse>, AppError> {
    let controller = CompanyController::new(&state);
    let response = controller.detail(id).await?;
    Ok(Json(response))
}

async fn update_company(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<CompanyRequest>,
) -> Result<Json<ApiResponse<Company>>, AppError> {
    let controller = CompanyController::new(&state);
    let response = controller.update(id, request).await?;
    Ok(Json(response))
}

async fn delete_company(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = CompanyController::new(&state);
    let response = controller.delete(id).await?;
    Ok(Json(response))
}

async fn company_statistics(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CompanyStatisticsResponse>, AppError> {
    let controller = CompanyController::new(&state);
    let response = controller.statistics(id).await?;
    Ok(Json(response))
}

async fn company_apprentices(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CompanyApprenticesResponse>, AppError> {
    let controller = CompanyController::new(&state);
    let response = controller.apprentices(id).await?;
    Ok(Json(response))
}

async fn company_logbooks(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<LogbookOverviewResponse>, AppError> {
    let controller = CompanyController::new(&state);
    let response = controller.logbooks(id).await?;
    Ok(Json(response))
}

async fn company_assignments(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(mut filter): Query<AssignmentFilter>,
) -> Result<Json<AssignmentListResponse>, AppError> {
    CompanyController::new(&state).get_by_id(id).await?;

    filter.company_id = Some(id);
    let controller = AssignmentController::new(&state);
    let response = controller.list(filter).await?;
    Ok(Json(response))
}

async fn assign_apprentice(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    user: ActingUser,
    Json(request): Json<AssignmentRequest>,
) -> Result<Json<ApiResponse<Assignment>>, AppError> {
    let controller = AssignmentController::new(&state);
    let response = controller
        .assign_to_company(id, request, user.into_inner())
        .await?;
    Ok(Json(response))
}
