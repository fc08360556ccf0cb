pub mod catalog;
pub mod constants;
pub mod engine;
pub mod registry;
pub mod session;

pub use catalog::{CityCatalog, CITY_CATALOG};
pub use constants::*;
pub use engine::{next_required_letter, normalize_city, submit_move, AcceptedMove, MoveError};
pub use registry::{JoinError, RoomRegistry};
pub use session::{GameSession, MoveRecord};
