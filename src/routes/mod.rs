use axum::Router;

use crate::state::SharedState;

/// Swagger UI and OpenAPI document.
pub mod docs;
/// Liveness probe.
pub mod health;
/// Lobby listing.
pub mod rooms;
/// Game client WebSocket.
pub mod websocket;

/// Compose all route trees, wiring in shared state and documentation routes.
pub fn router(state: SharedState) -> Router<()> {
    let api_router = health::router()
        .merge(rooms::router())
        .merge(websocket::router());

    let docs_router = docs::router(state.clone());

    api_router.merge(docs_router).with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::{
        Json,
        extract::{Path, State},
        http::StatusCode,
        response::IntoResponse,
    };
    use tokio::sync::mpsc;
    use uuid::Uuid;

    use crate::{
        config::AppConfig,
        dto::{game::GameModeDto, ws::CreateRoomRequest},
        services::room_service,
        state::AppState,
    };

    #[tokio::test]
    async fn lobby_handlers_reflect_live_rooms() {
        let state = AppState::new(AppConfig::default());
        let (tx, _rx) = mpsc::unbounded_channel();
        room_service::create_room(
            &state,
            Uuid::new_v4(),
            &tx,
            CreateRoomRequest {
                room_name: "sala".into(),
                password: "pw".into(),
                player_name: "ana".into(),
                game_mode: GameModeDto::Teams,
            },
        )
        .unwrap();

        let Json(health) = super::health::healthcheck(State(state.clone())).await;
        assert_eq!(health.status, "ok");
        assert_eq!(health.rooms, 1);

        let Json(rooms) = super::rooms::list_rooms(State(state.clone())).await;
        assert_eq!(rooms.len(), 1);
        assert_eq!(rooms[0].room_name, "sala");
        assert_eq!(rooms[0].seated, 1);
        assert_eq!(rooms[0].max_players, 4);

        let Json(room) = super::rooms::get_room(State(state.clone()), Path("sala".into()))
            .await
            .unwrap();
        assert_eq!(room, rooms[0]);

        let missing = super::rooms::get_room(State(state), Path("missing".into()))
            .await
            .unwrap_err();
        assert_eq!(missing.into_response().status(), StatusCode::NOT_FOUND);
    }
}
