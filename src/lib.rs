// Core game logic: catalog, registry, sessions, turn engine
pub mod core;

// Wire messages
pub mod models;

// HTTP and WebSocket routes
pub mod routes;

// Application state
pub mod state;
