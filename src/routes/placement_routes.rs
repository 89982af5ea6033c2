use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::placement_controller::PlacementController;
use crate::dto::placement_dto::{PlacementFilter, PlacementRequest};
use crate::dto::ApiResponse;
use crate::models::{Placement, PlacementDetail};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_placement_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_placements).post(create_placement))
        .route(
            "/:id",
            get(get_placement).put(update_placement).delete(delete_placement),
        )
}

async fn create_placement(
    State(state): State<AppState>,
    Json(request): Json<PlacementRequest>,
) -> Result<Json<ApiResponse<Placement>>, AppError> {
    let controller = PlacementController::new(&state);
    let response = controller.create(request).await?;
    Ok(Json(response))
}

async fn list_placements(
    State(state): State<AppState>,
    Query(filter): Query<PlacementFilter>,
) -> Result<Json<Vec<PlacementDetail>>, AppError> {
    let controller = PlacementController::new(&state);
    let response = controller.list(filter).await?;
    Ok(Json(response))
}

async fn get_placement(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PlacementDetail>, AppError> {
    let controller = PlacementController::new(&state);
    let response = controller.get_detail(id).await?;
    Ok(Json(response))
}

async fn update_placement(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<PlacementRequest>,
) -> Result<Json<ApiResponse<Placement>>, AppError> {
    let controller = PlacementController::new(&state);
    let response = controller.update(id, request).await?;
    Ok(Json(response))
}

async fn delete_placement(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let controller = PlacementController::new(&state);
    let response = controller.delete(id).await?;
    Ok(Json(response))
}
