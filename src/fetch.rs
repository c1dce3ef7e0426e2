use anyhow::Result;
use std::time::Instant;

use crate::api::{ApiClient, LeaderboardRow, MatchRecord, Player};

/// Everything the club view renders, fetched in one round.
#[derive(Debug, Clone, Default)]
pub struct ClubData {
    pub players: Vec<Player>,
    pub matches: Vec<MatchRecord>,
    pub leaderboard: Vec<LeaderboardRow>,
}

/// Fetch players, matches and the leaderboard concurrently.
///
/// Called from main.rs for the one-shot views and from the TUI event loop
/// for initial load and refresh. Failures come back as-is so the caller can
/// downcast the auth marker and re-prompt.
pub async fn fetch_club_data(client: &ApiClient, verbose: bool) -> Result<ClubData> {
    let start = Instant::now();

    let (players, mut matches, leaderboard) =
        tokio::try_join!(client.players(), client.matches(), client.leaderboard())?;

    sort_newest_first(&mut matches);

    if verbose {
        eprintln!(
            "Fetched {} players, {} matches, {} leaderboard rows in {:?}",
            players.len(),
            matches.len(),
            leaderboard.len(),
            start.elapsed()
        );
    }

    Ok(ClubData {
        players,
        matches,
        leaderboard,
    })
}

/// Newest matches first; the server returns insertion order.
fn sort_newest_first(matches: &mut [MatchRecord]) {
    matches.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
}

/// Match list alone, in display order.
pub async fn sorted_matches(client: &ApiClient) -> Result<Vec<MatchRecord>> {
    let mut matches = client.matches().await?;
    sort_newest_first(&mut matches);
    Ok(matches)
}
