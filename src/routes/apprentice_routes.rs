use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::apprentice_controller::ApprenticeController;
use crate::dto::apprentice_dto::{
    ApprenticeListResponse, AvailableApprenticesResponse, CreateApprenticeRequest,
};
use crate::dto::ApiResponse;
use crate::models::Apprentice;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_apprentice_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_apprentices).post(create_apprentice))
        .route("/available", get(available_apprentices))
        .route("/:id", get(get_apprentice))
}

async fn create_apprentice(
    State(state): State<AppState>,
    Json(request): Json<CreateApprenticeRequest>,
) -> Result<Json<ApiResponse<Apprentice>>, AppError> {
    let controller = ApprenticeController::new(&state);
    let response = controller.create(request).await?;
    Ok(Json(response))
}

async fn list_apprentices(
    State(state): State<AppState>,
) -> Result<Json<ApprenticeListResponse>, AppError> {
    let controller = ApprenticeController::new(&state);
    let response = controller.list().await?;
    Ok(Json(response))
}

async fn available_apprentices(
    State(state): State<AppState>,
) -> Result<Json<AvailableApprenticesResponse>, AppError> {
    let controller = ApprenticeController::new(&state);
    let response = controller.available().await?;
    Ok(Json(response))
}

async fn get_apprentice(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Apprentice>, AppError> {
    let controller = ApprenticeController::new(&state);
    let response = controller.get_by_id(id).await?;
    Ok(Json(response))
}
