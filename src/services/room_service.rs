//! Room session management: seating connections, routing intents to the right
//! room's game, and broadcasting the results.
//!
//! Every operation here is synchronous. A room stays locked from the moment an
//! intent reaches it until its broadcast has been queued on every seat, which
//! gives each room a strict apply-then-broadcast order.

use dashmap::mapref::one::RefMut;
use tracing::{debug, info, warn};

use crate::{
    config::RejectionPolicy,
    dto::{
        game::GameStateSnapshot,
        room::{PlayerUpdate, RoomSummary},
        ws::{
            ClientMessage, CreateRoomRequest, JoinRoomRequest, PlaceWallRequest,
            PlayerMoveRequest, RoomNamePayload, ServerMessage,
        },
    },
    error::{AdmissionError, RuleViolation, ServiceError},
    state::{
        SharedState,
        board::Position,
        game::MoveOutcome,
        room::{ClientTx, ConnectionId, PlainPassword, Room},
    },
};

/// Route a validated client message to its operation and answer failures the
/// way each error class requires.
pub fn dispatch(
    state: &SharedState,
    connection: ConnectionId,
    tx: &ClientTx,
    message: ClientMessage,
) {
    match message {
        ClientMessage::CreateRoom(request) => {
            if let Err(err) = create_room(state, connection, tx, request) {
                reject_admission(connection, tx, err);
            }
        }
        ClientMessage::JoinRoom(request) => {
            if let Err(err) = join_room(state, connection, tx, request) {
                reject_admission(connection, tx, err);
            }
        }
        ClientMessage::PlayerMove(request) => {
            if let Err(err) = player_move(state, connection, request) {
                reject_intent(state, connection, tx, err);
            }
        }
        ClientMessage::PlaceWall(request) => {
            if let Err(err) = place_wall(state, connection, request) {
                reject_intent(state, connection, tx, err);
            }
        }
    }
}

fn reject_admission(connection: ConnectionId, tx: &ClientTx, err: AdmissionError) {
    info!(%connection, error = %err, "admission refused");
    send(tx, ServerMessage::error(err.to_string()));
}

fn reject_intent(
    state: &SharedState,
    connection: ConnectionId,
    tx: &ClientTx,
    err: RuleViolation,
) {
    match state.config().rule_violations() {
        RejectionPolicy::Silent => {
            debug!(%connection, error = %err, "intent dropped");
        }
        RejectionPolicy::Report => {
            debug!(%connection, error = %err, "intent rejected");
            send(tx, ServerMessage::error(err.to_string()));
        }
    }
}

fn send(tx: &ClientTx, message: ServerMessage) {
    if tx.send(message).is_err() {
        debug!("dropping message for closed connection");
    }
}

fn ensure_unseated(state: &SharedState, connection: ConnectionId) -> Result<(), AdmissionError> {
    match state.memberships().get(&connection) {
        Some(room) => Err(AdmissionError::AlreadySeated(room.value().clone())),
        None => Ok(()),
    }
}

/// Register a room and seat its creator in it.
pub fn create_room(
    state: &SharedState,
    connection: ConnectionId,
    tx: &ClientTx,
    request: CreateRoomRequest,
) -> Result<usize, AdmissionError> {
    ensure_unseated(state, connection)?;

    let CreateRoomRequest {
        room_name,
        password,
        player_name,
        game_mode,
    } = request;

    let seated = {
        let mut room = state.rooms().create(
            &room_name,
            Box::new(PlainPassword::new(password.clone())),
            game_mode.into(),
        )?;
        info!(room = %room_name, mode = room.mode().label(), %connection, "room created");
        send(
            tx,
            ServerMessage::RoomCreated(RoomNamePayload {
                room_name: room_name.clone(),
            }),
        );
        seat_connection(state, &mut room, connection, tx, &player_name, &password)
    };

    if seated.is_err() && state.rooms().remove_if_empty(&room_name) {
        warn!(room = %room_name, "creator could not be seated; room deleted");
    }
    seated
}

/// Seat the connection in an existing room.
pub fn join_room(
    state: &SharedState,
    connection: ConnectionId,
    tx: &ClientTx,
    request: JoinRoomRequest,
) -> Result<usize, AdmissionError> {
    ensure_unseated(state, connection)?;

    let mut room = state
        .rooms()
        .get_mut(&request.room_name)
        .ok_or_else(|| AdmissionError::NotFound(request.room_name.clone()))?;
    seat_connection(
        state,
        &mut room,
        connection,
        tx,
        &request.player_name,
        &request.password,
    )
}

/// Admit the connection, announce the new roster, acknowledge the joiner, and
/// hand out the board if this seat filled the room.
fn seat_connection(
    state: &SharedState,
    room: &mut Room,
    connection: ConnectionId,
    tx: &ClientTx,
    player_name: &str,
    secret: &str,
) -> Result<usize, AdmissionError> {
    let index = room.admit(connection, player_name, secret, tx.clone())?;
    state
        .memberships()
        .insert(connection, room.name().to_owned());
    info!(room = %room.name(), %connection, seat = index + 1, "player seated");

    room.broadcast(&ServerMessage::PlayerUpdate(PlayerUpdate::from(&*room)));
    send(
        tx,
        ServerMessage::JoinSuccess(RoomNamePayload {
            room_name: room.name().to_owned(),
        }),
    );

    if room.is_full() {
        if room.seat_players() {
            info!(room = %room.name(), "room full; game started");
        }
        room.broadcast(&ServerMessage::GameStateUpdate(GameStateSnapshot::from(
            room.game(),
        )));
    }
    Ok(index)
}

fn seated_room<'a>(
    state: &'a SharedState,
    connection: ConnectionId,
    room_name: &str,
) -> Result<(RefMut<'a, String, Room>, usize), RuleViolation> {
    let room = state
        .rooms()
        .get_mut(room_name)
        .ok_or_else(|| RuleViolation::RoomNotFound(room_name.to_owned()))?;
    let seat = room.seat_of(&connection).ok_or(RuleViolation::NotSeated)?;
    Ok((room, seat))
}

/// Move the sender's pawn and broadcast the new state.
pub fn player_move(
    state: &SharedState,
    connection: ConnectionId,
    request: PlayerMoveRequest,
) -> Result<MoveOutcome, RuleViolation> {
    let (mut room, seat) = seated_room(state, connection, &request.room_name)?;
    let target = Position::new(request.target.row, request.target.col).ok_or(
        RuleViolation::IllegalMove {
            row: request.target.row,
            col: request.target.col,
        },
    )?;

    let outcome = room.game_mut().apply_move(seat, target)?;
    if let MoveOutcome::Won(winner) = &outcome {
        info!(room = %request.room_name, seat = seat + 1, ?winner, "game over");
    }
    room.broadcast(&ServerMessage::GameStateUpdate(GameStateSnapshot::from(
        room.game(),
    )));
    Ok(outcome)
}

/// Place a wall for the sender and broadcast the new state.
pub fn place_wall(
    state: &SharedState,
    connection: ConnectionId,
    request: PlaceWallRequest,
) -> Result<usize, RuleViolation> {
    let (mut room, seat) = seated_room(state, connection, &request.room_name)?;
    let wall = request.wall;

    let next = room
        .game_mut()
        .apply_wall(seat, wall.kind.into(), wall.row, wall.col)?;
    room.broadcast(&ServerMessage::GameStateUpdate(GameStateSnapshot::from(
        room.game(),
    )));
    Ok(next)
}

/// Vacate the connection's seat, tell the rest of the room, and delete the
/// room once nobody is left. An in-progress game is neither paused nor forfeited.
pub fn remove_connection(state: &SharedState, connection: ConnectionId) {
    let Some((_, room_name)) = state.memberships().remove(&connection) else {
        return;
    };

    if let Some(mut room) = state.rooms().get_mut(&room_name) {
        if let Some(seat) = room.remove(&connection) {
            info!(room = %room_name, %connection, seat = seat.index + 1, "player left");
        }
        room.broadcast(&ServerMessage::PlayerUpdate(PlayerUpdate::from(&*room)));
    }

    if state.rooms().remove_if_empty(&room_name) {
        info!(room = %room_name, "room deleted");
    }
}

/// Lobby listing of every live room.
pub fn list_rooms(state: &SharedState) -> Vec<RoomSummary> {
    let mut rooms = state.rooms().map(|room| RoomSummary::from(room));
    rooms.sort_by(|a, b| a.room_name.cmp(&b.room_name));
    rooms
}

/// Summary of a single room.
pub fn room_summary(state: &SharedState, room_name: &str) -> Result<RoomSummary, ServiceError> {
    state
        .rooms()
        .with_room(room_name, |room| RoomSummary::from(room))
        .ok_or_else(|| ServiceError::NotFound(format!("room `{room_name}` not found")))
}
