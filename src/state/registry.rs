use dashmap::{DashMap, mapref::entry::Entry, mapref::one::RefMut};

use crate::{
    error::AdmissionError,
    state::{
        game::GameMode,
        room::{Room, RoomCredential},
    },
};

/// Process-wide map of live rooms keyed by name.
///
/// Each room sits behind its shard's write lock while a guard from
/// [`RoomRegistry::get_mut`] or [`RoomRegistry::create`] is alive, so every
/// intent for a room is applied and broadcast before the next one for that
/// room starts. Guards must not be held across `.await` points.
pub struct RoomRegistry {
    rooms: DashMap<String, Room>,
    max_rooms: usize,
}

impl RoomRegistry {
    /// Empty registry that accepts up to `max_rooms` rooms.
    pub fn new(max_rooms: usize) -> Self {
        Self {
            rooms: DashMap::new(),
            max_rooms,
        }
    }

    /// Register a new room under `name`, returning a locked handle to it.
    pub fn create(
        &self,
        name: &str,
        credential: Box<dyn RoomCredential>,
        mode: GameMode,
    ) -> Result<RefMut<'_, String, Room>, AdmissionError> {
        if self.rooms.contains_key(name) {
            return Err(AdmissionError::NameTaken(name.to_owned()));
        }
        // Counted before taking the entry lock: `len` visits every shard.
        // The limit is therefore approximate under concurrent creation.
        if self.rooms.len() >= self.max_rooms {
            return Err(AdmissionError::RegistryFull);
        }

        match self.rooms.entry(name.to_owned()) {
            Entry::Occupied(_) => Err(AdmissionError::NameTaken(name.to_owned())),
            Entry::Vacant(vacant) => Ok(vacant.insert(Room::new(name, credential, mode))),
        }
    }

    /// Locked handle to the room called `name`.
    pub fn get_mut(&self, name: &str) -> Option<RefMut<'_, String, Room>> {
        self.rooms.get_mut(name)
    }

    /// Apply `f` to every room, for read-only listings.
    pub fn map<T>(&self, mut f: impl FnMut(&Room) -> T) -> Vec<T> {
        self.rooms.iter().map(|entry| f(entry.value())).collect()
    }

    /// Apply `f` to the room called `name`.
    pub fn with_room<T>(&self, name: &str, f: impl FnOnce(&Room) -> T) -> Option<T> {
        self.rooms.get(name).map(|entry| f(entry.value()))
    }

    /// Drop the room called `name` if nobody is seated in it. The emptiness
    /// check and the removal happen under the same lock.
    pub fn remove_if_empty(&self, name: &str) -> bool {
        self.rooms
            .remove_if(name, |_, room| room.is_empty())
            .is_some()
    }

    /// Number of live rooms.
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    /// Whether no room is live.
    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc;
    use uuid::Uuid;

    use super::*;
    use crate::state::room::PlainPassword;

    fn password() -> Box<dyn RoomCredential> {
        Box::new(PlainPassword::new("pw"))
    }

    #[test]
    fn names_are_unique() {
        let registry = RoomRegistry::new(8);
        drop(registry.create("a", password(), GameMode::HeadToHead).unwrap());

        let err = registry
            .create("a", password(), GameMode::Teams)
            .unwrap_err();
        assert_eq!(err, AdmissionError::NameTaken("a".into()));
        assert_eq!(registry.len(), 1);
        assert_eq!(
            registry.with_room("a", |room| room.mode()),
            Some(GameMode::HeadToHead)
        );
    }

    #[test]
    fn room_limit_is_enforced() {
        let registry = RoomRegistry::new(1);
        drop(registry.create("a", password(), GameMode::HeadToHead).unwrap());
        assert_eq!(
            registry
                .create("b", password(), GameMode::HeadToHead)
                .unwrap_err(),
            AdmissionError::RegistryFull
        );
    }

    #[test]
    fn only_empty_rooms_are_removed() {
        let registry = RoomRegistry::new(8);
        let connection = Uuid::new_v4();
        let (tx, _rx) = mpsc::unbounded_channel();
        {
            let mut room = registry.create("a", password(), GameMode::HeadToHead).unwrap();
            room.admit(connection, "ana", "pw", tx).unwrap();
        }

        assert!(!registry.remove_if_empty("a"));
        registry.get_mut("a").unwrap().remove(&connection);
        assert!(registry.remove_if_empty("a"));
        assert!(registry.is_empty());
        assert!(!registry.remove_if_empty("a"));
    }
}
