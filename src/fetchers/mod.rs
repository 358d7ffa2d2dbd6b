pub mod query;
mod search_client;

pub use search_client::TournamentSearchClient;
