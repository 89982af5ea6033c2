use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::assignment_controller::AssignmentController;
use crate::dto::assignment_dto::{
    AssignmentDetailResponse, AssignmentFilter, AssignmentListResponse, AssignmentRequest,
    BatchRequest, BatchResult, ConfirmRequest, ReasonRequest, StartPracticeResponse,
};
use crate::dto::ApiResponse;
use crate::middleware::{ActingUser, ActionBody};
use crate::models::Assignment;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_assignment_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_assignments).post(propose_assignment))
        .route("/batch/confirm", post(batch_confirm))
        .route("/batch/reject", post(batch_reject))
        .route(
            "/:id",
            get(get_assignment)
                .put(update_assignment)
                .delete(delete_assignment),
        )
        .route("/:id/confirm", post(confirm_assignment))
        .route("/:id/reject", post(reject_assignment))
        .route("/:id/cancel", post(cancel_assignment))
        .route("/:id/start", post(start_practice))
}

async fn list_assignments(
    State(state): State<AppState>,
    Query(filter): Query<AssignmentFilter>,
) -> Result<Json<AssignmentListResponse>, AppError> {
    let controller = AssignmentController::new(&state);
    let response = controller.list(filter).await?;
    Ok(Json(response))
}

async fn propose_assignment(
    State(state): State<AppState>,
    user: ActingUser,
    Json(request): Json<AssignmentRequest>,
) -> Result<Json<ApiResponse<Assignment>>, AppError> {
    let controller = AssignmentController::new(&state);
    let response = controller.propose(request, user.into_inner()).await?;
    Ok(Json(response))
}

async fn get_assignment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AssignmentDetailResponse>, AppError> {
    let controller = AssignmentController::new(&state);
    let response = controller.get_detail(id).await?;
    Ok(Json(response))
}

async fn update_assignment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<AssignmentRequest>,
) -> Result<Json<ApiResponse<Assignment>>, AppError> {
    let controller = AssignmentController::new(&state);
    let response = controller.update(id, request).await?;
    Ok(Json(response))
}

async fn delete_assignment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = AssignmentController::new(&state);
    let response = controller.delete(id).await?;
    Ok(Json(response))
}

// Las acciones aceptan cuerpo vacío; uno mal formado es un error
async fn confirm_assignment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ActionBody(request): ActionBody<ConfirmRequest>,
) -> Result<Json<ApiResponse<Assignment>>, AppError> {
    let controller = AssignmentController::new(&state);
    let response = controller.confirm(id, request).await?;
    Ok(Json(response))
}

async fn reject_assignment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ActionBody(request): ActionBody<ReasonRequest>,
) -> Result<Json<ApiResponse<Assignment>>, AppError> {
    let controller = AssignmentController::new(&state);
    let response = controller.reject(id, request).await?;
    Ok(Json(response))
}

async fn cancel_assignment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ActionBody(request): ActionBody<ReasonRequest>,
) -> Result<Json<ApiResponse<Assignment>>, AppError> {
    let controller = AssignmentController::new(&state);
    let response = controller.cancel(id, request).await?;
    Ok(Json(response))
}

async fn start_practice(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<StartPracticeResponse>>, AppError> {
    let controller = AssignmentController::new(&state);
    let response = controller.start_practice(id).await?;
    Ok(Json(response))
}

async fn batch_confirm(
    State(state): State<AppState>,
    Json(request): Json<BatchRequest>,
) -> Result<Json<ApiResponse<BatchResult>>, AppError> {
    let controller = AssignmentController::new(&state);
    let response = controller.batch_confirm(request.ids).await?;
    Ok(Json(response))
}

async fn batch_reject(
    State(state): State<AppState>,
    Json(request): Json<BatchRequest>,
) -> Result<Json<ApiResponse<BatchResult>>, AppError> {
    let controller = AssignmentController::new(&state);
    let response = controller.batch_reject(request.ids).await?;
    Ok(Json(response))
}
