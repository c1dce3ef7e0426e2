pub mod client;
pub mod types;

pub use client::{ApiClient, AuthError};
pub use types::{
    LeaderboardRow, MatchRecord, MatchUpdate, NewMatch, NewPlayer, Player, PlayerStats, PlayerType,
    UpdatedMatch,
};
