pub mod formatter;

pub use formatter::{
    format_leaderboard_table, format_leaderboard_tsv, format_matches_table, format_matches_tsv,
    format_player_stats, format_players_table, format_players_tsv, format_win_rate,
    should_use_colors,
};
