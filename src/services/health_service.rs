use crate::{dto::health::HealthResponse, state::SharedState};

/// Report liveness along with the number of live rooms.
pub fn health_status(state: &SharedState) -> HealthResponse {
    HealthResponse::ok(state.rooms().len())
}
