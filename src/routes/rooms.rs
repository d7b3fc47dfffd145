use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};

use crate::{dto::room::RoomSummary, error::AppError, services::room_service, state::SharedState};

/// Read-only lobby endpoints.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/rooms", get(list_rooms))
        .route("/rooms/{name}", get(get_room))
}

#[utoipa::path(
    get,
    path = "/rooms",
    tag = "rooms",
    responses((status = 200, description = "Live rooms ordered by name", body = [RoomSummary]))
)]
/// List every live room.
pub async fn list_rooms(State(state): State<SharedState>) -> Json<Vec<RoomSummary>> {
    Json(room_service::list_rooms(&state))
}

#[utoipa::path(
    get,
    path = "/rooms/{name}",
    tag = "rooms",
    params(("name" = String, Path, description = "Room name")),
    responses(
        (status = 200, description = "Room summary", body = RoomSummary),
        (status = 404, description = "No such room")
    )
)]
/// Return the summary of one room.
pub async fn get_room(
    State(state): State<SharedState>,
    Path(name): Path<String>,
) -> Result<Json<RoomSummary>, AppError> {
    let payload = room_service::room_summary(&state, &name)?;
    Ok(Json(payload))
}
