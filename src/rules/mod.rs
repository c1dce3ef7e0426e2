pub mod forms;
pub mod player;
pub mod score;

pub use forms::{validate_new_match, validate_new_player};
pub use score::{parse_score, validate_score, ScoreError, SetScore};
