pub mod board;
pub mod game;
pub mod registry;
pub mod room;
pub mod rules;
pub mod state_machine;

use std::sync::Arc;

use dashmap::DashMap;

use crate::config::AppConfig;

use self::{registry::RoomRegistry, room::ConnectionId};

/// Shared handle passed to every route and service.
pub type SharedState = Arc<AppState>;

/// Central application state: configuration, live rooms, and which room each
/// connection sits in.
pub struct AppState {
    config: AppConfig,
    rooms: RoomRegistry,
    memberships: DashMap<ConnectionId, String>,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    pub fn new(config: AppConfig) -> SharedState {
        Arc::new(Self {
            rooms: RoomRegistry::new(config.max_rooms()),
            memberships: DashMap::new(),
            config,
        })
    }

    /// Runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Registry of live rooms.
    pub fn rooms(&self) -> &RoomRegistry {
        &self.rooms
    }

    /// Room name keyed by seated connection.
    pub fn memberships(&self) -> &DashMap<ConnectionId, String> {
        &self.memberships
    }
}
