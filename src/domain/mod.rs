pub mod models;
pub mod normalize;

pub use models::{EventTuple, TournamentRecord};
pub use normalize::{normalize, parse_timestamp};
