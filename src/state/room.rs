//! A room: its credential, its seated connections, and its game.

use std::fmt;

use indexmap::IndexMap;
use tokio::sync::mpsc;
use tracing::debug;
use uuid::Uuid;

use crate::{
    dto::ws::ServerMessage,
    error::AdmissionError,
    state::game::{GameMode, GameState},
};

/// Identifier of a WebSocket connection, allocated on upgrade.
pub type ConnectionId = Uuid;

/// Outbound queue of a connection; its writer task drains it onto the socket.
pub type ClientTx = mpsc::UnboundedSender<ServerMessage>;

/// Something that can tell whether a join secret grants access to a room.
pub trait RoomCredential: Send + Sync + fmt::Debug {
    /// Whether `secret` unlocks the room.
    fn verify(&self, secret: &str) -> bool;
}

/// Password compared verbatim against the join secret.
#[derive(Clone)]
pub struct PlainPassword(String);

impl PlainPassword {
    /// Wrap the password chosen at room creation.
    pub fn new(password: impl Into<String>) -> Self {
        Self(password.into())
    }
}

impl fmt::Debug for PlainPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PlainPassword(..)")
    }
}

impl RoomCredential for PlainPassword {
    fn verify(&self, secret: &str) -> bool {
        self.0 == secret
    }
}

/// Metadata of one seated connection.
#[derive(Debug, Clone)]
pub struct Seat {
    /// Index into the game's player list; fixed while the connection stays.
    pub index: usize,
    /// Name the connection joined with.
    pub player_name: String,
    tx: ClientTx,
}

/// One game room. Seat indices are stable: a leaver's seat stays empty until
/// the next joiner takes the lowest free index.
#[derive(Debug)]
pub struct Room {
    name: String,
    credential: Box<dyn RoomCredential>,
    seats: IndexMap<ConnectionId, Seat>,
    game: GameState,
}

impl Room {
    /// Empty room with a fresh board for `mode`.
    pub fn new(
        name: impl Into<String>,
        credential: Box<dyn RoomCredential>,
        mode: GameMode,
    ) -> Self {
        Self {
            name: name.into(),
            credential,
            seats: IndexMap::with_capacity(mode.max_players()),
            game: GameState::new(mode),
        }
    }

    /// Registry key of the room.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Mode the room was created with.
    pub fn mode(&self) -> GameMode {
        self.game.mode()
    }

    /// Seat capacity.
    pub fn max_players(&self) -> usize {
        self.mode().max_players()
    }

    /// Seated connections in join order.
    pub fn seats(&self) -> impl Iterator<Item = (&ConnectionId, &Seat)> {
        self.seats.iter()
    }

    /// Number of seated connections.
    pub fn seated(&self) -> usize {
        self.seats.len()
    }

    /// Whether every seat is taken.
    pub fn is_full(&self) -> bool {
        self.seated() >= self.max_players()
    }

    /// Whether nobody is seated.
    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    /// Seat index of `connection`, if seated here.
    pub fn seat_of(&self, connection: &ConnectionId) -> Option<usize> {
        self.seats.get(connection).map(|seat| seat.index)
    }

    /// Authoritative game state.
    pub fn game(&self) -> &GameState {
        &self.game
    }

    /// Mutable game state.
    pub fn game_mut(&mut self) -> &mut GameState {
        &mut self.game
    }

    /// Check the secret and capacity, then seat `connection` at the lowest free index.
    pub fn admit(
        &mut self,
        connection: ConnectionId,
        player_name: &str,
        secret: &str,
        tx: ClientTx,
    ) -> Result<usize, AdmissionError> {
        if !self.credential.verify(secret) {
            return Err(AdmissionError::BadPassword);
        }
        if self.is_full() {
            return Err(AdmissionError::Full(self.name.clone()));
        }

        let index = (0..self.max_players())
            .find(|candidate| self.seats.values().all(|seat| seat.index != *candidate))
            .ok_or_else(|| AdmissionError::Full(self.name.clone()))?;

        self.seats.insert(
            connection,
            Seat {
                index,
                player_name: player_name.to_owned(),
                tx,
            },
        );
        Ok(index)
    }

    /// Vacate the seat held by `connection`.
    pub fn remove(&mut self, connection: &ConnectionId) -> Option<Seat> {
        self.seats.shift_remove(connection)
    }

    /// Copy seat names into the players and start play if this is the first
    /// time the room filled. Returns whether the game just started.
    pub fn seat_players(&mut self) -> bool {
        for seat in self.seats.values() {
            self.game.assign_name(seat.index, &seat.player_name);
        }
        self.game.start()
    }

    /// Queue `message` for every seated connection.
    pub fn broadcast(&self, message: &ServerMessage) {
        for (connection, seat) in &self.seats {
            if seat.tx.send(message.clone()).is_err() {
                debug!(room = %self.name, %connection, "dropping message for closed connection");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::state_machine::GamePhase;

    fn room(mode: GameMode) -> Room {
        Room::new("lobby", Box::new(PlainPassword::new("secret")), mode)
    }

    fn channel() -> (ClientTx, mpsc::UnboundedReceiver<ServerMessage>) {
        mpsc::unbounded_channel()
    }

    #[test]
    fn plain_password_compares_verbatim() {
        let password = PlainPassword::new("Secret");
        assert!(password.verify("Secret"));
        assert!(!password.verify("secret"));
        assert!(!password.verify(""));
        assert_eq!(format!("{password:?}"), "PlainPassword(..)");
    }

    #[test]
    fn admission_checks_password_then_capacity() {
        let mut room = room(GameMode::HeadToHead);
        let (tx, _rx) = channel();

        assert_eq!(
            room.admit(Uuid::new_v4(), "ana", "nope", tx.clone()),
            Err(AdmissionError::BadPassword)
        );
        assert_eq!(room.admit(Uuid::new_v4(), "ana", "secret", tx.clone()), Ok(0));
        assert_eq!(room.admit(Uuid::new_v4(), "bia", "secret", tx.clone()), Ok(1));
        assert!(room.is_full());
        assert_eq!(
            room.admit(Uuid::new_v4(), "caio", "secret", tx.clone()),
            Err(AdmissionError::Full("lobby".into()))
        );
        // Wrong password is reported before fullness.
        assert_eq!(
            room.admit(Uuid::new_v4(), "caio", "nope", tx),
            Err(AdmissionError::BadPassword)
        );
        assert_eq!(room.seated(), 2);
    }

    #[test]
    fn vacated_seat_is_reused() {
        let mut room = room(GameMode::Teams);
        let (tx, _rx) = channel();
        let ids: Vec<_> = (0..3).map(|_| Uuid::new_v4()).collect();
        for (expected, id) in ids.iter().enumerate() {
            assert_eq!(room.admit(*id, "p", "secret", tx.clone()), Ok(expected));
        }

        assert!(room.remove(&ids[1]).is_some());
        assert_eq!(room.seat_of(&ids[2]), Some(2));

        let late = Uuid::new_v4();
        assert_eq!(room.admit(late, "late", "secret", tx.clone()), Ok(1));
        assert_eq!(room.admit(Uuid::new_v4(), "last", "secret", tx), Ok(3));
        assert!(room.is_full());
    }

    #[test]
    fn seating_players_copies_names_and_starts_once() {
        let mut room = room(GameMode::HeadToHead);
        let (tx, _rx) = channel();
        let first = Uuid::new_v4();
        room.admit(first, "ana", "secret", tx.clone()).unwrap();
        room.admit(Uuid::new_v4(), "bia", "secret", tx.clone()).unwrap();

        assert!(room.seat_players());
        assert_eq!(room.game().phase(), &GamePhase::InProgress);
        let names: Vec<_> = room
            .game()
            .players()
            .iter()
            .map(|p| p.display_name.as_deref())
            .collect();
        assert_eq!(names, vec![Some("ana"), Some("bia")]);

        room.remove(&first);
        room.admit(Uuid::new_v4(), "caio", "secret", tx).unwrap();
        assert!(!room.seat_players());
        assert_eq!(
            room.game().players()[0].display_name.as_deref(),
            Some("caio")
        );
    }

    #[test]
    fn broadcast_reaches_every_seat() {
        let mut room = room(GameMode::HeadToHead);
        let (tx_a, mut rx_a) = channel();
        let (tx_b, mut rx_b) = channel();
        room.admit(Uuid::new_v4(), "ana", "secret", tx_a).unwrap();
        room.admit(Uuid::new_v4(), "bia", "secret", tx_b).unwrap();

        room.broadcast(&ServerMessage::error("hello"));
        assert!(rx_a.try_recv().is_ok());
        assert!(rx_b.try_recv().is_ok());
    }
}
