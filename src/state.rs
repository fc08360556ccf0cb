use crate::core::RoomRegistry;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared application state
///
/// The registry lock is the serialization point for all room mutation;
/// holding the write lock across a whole move keeps each room's updates
/// atomic while unrelated requests only contend on the map itself.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<RwLock<RoomRegistry>>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            registry: Arc::new(RwLock::new(RoomRegistry::new())),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
