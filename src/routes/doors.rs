use axum::{extract::State, Json};

use super::response::ApiResponse;
use crate::common::AppState;
use crate::domain::DoorStatusView;
use crate::error::AppResult;
use crate::services::doors;

/// Latest door state per cold room
#[utoipa::path(
    get,
    path = "/api/doors/latest",
    responses(
        (status = 200, description = "Door panel sorted by display name", body = Vec<DoorStatusView>),
        (status = 401, description = "Missing or invalid API key"),
    ),
    tag = "doors"
)]
pub async fn latest_doors(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<DoorStatusView>>>> {
    let board = doors::door_board(state.store.as_ref()).await?;
    Ok(ApiResponse::ok(board))
}
