use owo_colors::OwoColorize;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::api::types::{LeaderboardRow, MatchRecord, Player, PlayerStats};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate a name to fit available width, accounting for Unicode
fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Widest name in the list, clamped so one long entry cannot eat the row.
fn name_column_width<'a, I: Iterator<Item = &'a str>>(names: I) -> usize {
    let cap = match get_terminal_width() {
        Some(w) if w < 100 => 20,
        _ => 30,
    };
    names
        .map(|n| n.chars().count())
        .max()
        .unwrap_or(0)
        .clamp(4, cap)
}

fn pad(value: &str, width: usize) -> String {
    let len = value.chars().count();
    if len >= width {
        value.to_string()
    } else {
        format!("{}{}", value, " ".repeat(width - len))
    }
}

/// "62.5%" style win rate, one decimal place.
pub fn format_win_rate(percent: f64) -> String {
    format!("{:.1}%", percent)
}

/// Format players as an aligned table: Name, Age, Type.
pub fn format_players_table(players: &[Player], use_colors: bool) -> String {
    if players.is_empty() {
        return "No players registered yet.".to_string();
    }

    let name_width = name_column_width(players.iter().map(|p| p.name.as_str()));
    let mut lines = Vec::with_capacity(players.len() + 1);

    let header = format!("{}  {:>3}  {}", pad("Name", name_width), "Age", "Type");
    lines.push(if use_colors {
        header.bold().to_string()
    } else {
        header
    });

    for player in players {
        let name = pad(&truncate_name(&player.name, name_width), name_width);
        let kind = player.player_type.to_string();
        if use_colors {
            lines.push(format!(
                "{}  {:>3}  {}",
                name.bold(),
                player.age,
                kind.cyan()
            ));
        } else {
            lines.push(format!("{}  {:>3}  {}", name, player.age, kind));
        }
    }

    lines.join("\n")
}

/// Format matches as an aligned table: ID, Player A, Player B, Score, Date.
pub fn format_matches_table(matches: &[MatchRecord], use_colors: bool) -> String {
    if matches.is_empty() {
        return "No matches recorded yet.".to_string();
    }

    let name_width = name_column_width(
        matches
            .iter()
            .flat_map(|m| [m.player_a_name.as_str(), m.player_b_name.as_str()]),
    );
    let mut lines = Vec::with_capacity(matches.len() + 1);

    let header = format!(
        "{:>4}  {}  {}  {:<14}  {}",
        "ID",
        pad("Player A", name_width),
        pad("Player B", name_width),
        "Score",
        "Date"
    );
    lines.push(if use_colors {
        header.bold().to_string()
    } else {
        header
    });

    for m in matches {
        let a = pad(&truncate_name(&m.player_a_name, name_width), name_width);
        let b = pad(&truncate_name(&m.player_b_name, name_width), name_width);
        let date = m.date.format("%Y-%m-%d").to_string();
        if use_colors {
            lines.push(format!(
                "{:>4}  {}  {}  {:<14}  {}",
                m.id.dimmed(),
                a,
                b,
                m.score.yellow(),
                date
            ));
        } else {
            lines.push(format!("{:>4}  {}  {}  {:<14}  {}", m.id, a, b, m.score, date));
        }
    }

    lines.join("\n")
}

/// Format the leaderboard as an aligned table: rank, name, played, W, L, rate.
pub fn format_leaderboard_table(rows: &[LeaderboardRow], use_colors: bool) -> String {
    if rows.is_empty() {
        return "Leaderboard is empty. Record a match first.".to_string();
    }

    let name_width = name_column_width(rows.iter().map(|r| r.name.as_str()));
    let mut lines = Vec::with_capacity(rows.len() + 1);

    let header = format!(
        "{:>3}  {}  {:>7}  {:>4}  {:>6}  {:>7}",
        "#",
        pad("Name", name_width),
        "Matches",
        "Wins",
        "Losses",
        "Rate"
    );
    lines.push(if use_colors {
        header.bold().to_string()
    } else {
        header
    });

    for (idx, row) in rows.iter().enumerate() {
        let rank = format!("{}.", idx + 1);
        let name = pad(&truncate_name(&row.name, name_width), name_width);
        let rate = format_win_rate(row.win_rate_percent);
        if use_colors {
            lines.push(format!(
                "{:>3}  {}  {:>7}  {:>4}  {:>6}  {:>7}",
                rank.dimmed(),
                name.bold(),
                row.matches,
                row.wins.green(),
                row.losses.red(),
                rate
            ));
        } else {
            lines.push(format!(
                "{:>3}  {}  {:>7}  {:>4}  {:>6}  {:>7}",
                rank, name, row.matches, row.wins, row.losses, rate
            ));
        }
    }

    lines.join("\n")
}

/// Multi-line detail block for one player's stats.
pub fn format_player_stats(stats: &PlayerStats, use_colors: bool) -> String {
    let rate = format_win_rate(stats.win_rate_percent);
    if use_colors {
        format!(
            "{}\n  Matches: {}\n  Wins: {}\n  Losses: {}\n  Win rate: {}",
            stats.name.bold(),
            stats.matches,
            stats.wins.green(),
            stats.losses.red(),
            rate
        )
    } else {
        format!(
            "{}\n  Matches: {}\n  Wins: {}\n  Losses: {}\n  Win rate: {}",
            stats.name, stats.matches, stats.wins, stats.losses, rate
        )
    }
}

/// Players as tab-separated values for scripting (no headers, no colors)
pub fn format_players_tsv(players: &[Player]) -> String {
    players
        .iter()
        .map(|p| format!("{}\t{}\t{}", p.name, p.age, p.player_type))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Matches as tab-separated values: id, player A, player B, score, date
pub fn format_matches_tsv(matches: &[MatchRecord]) -> String {
    matches
        .iter()
        .map(|m| {
            format!(
                "{}\t{}\t{}\t{}\t{}",
                m.id,
                m.player_a_name,
                m.player_b_name,
                m.score,
                m.date.format("%Y-%m-%d")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Leaderboard as tab-separated values: name, matches, wins, losses, rate
pub fn format_leaderboard_tsv(rows: &[LeaderboardRow]) -> String {
    rows.iter()
        .map(|r| {
            format!(
                "{}\t{}\t{}\t{}\t{:.1}",
                r.name, r.matches, r.wins, r.losses, r.win_rate_percent
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::PlayerType;
    use chrono::NaiveDate;

    fn sample_player() -> Player {
        Player {
            id: Some(1),
            name: "Roger Federer".to_string(),
            age: 43,
            player_type: PlayerType::Professional,
        }
    }

    fn sample_match() -> MatchRecord {
        MatchRecord {
            id: 12,
            player_a_name: "Roger Federer".to_string(),
            player_b_name: "Rafael Nadal".to_string(),
            score: "6:4, 7:6".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 8, 30).unwrap(),
        }
    }

    fn sample_row() -> LeaderboardRow {
        LeaderboardRow {
            name: "Roger Federer".to_string(),
            matches: 8,
            wins: 5,
            losses: 3,
            win_rate_percent: 62.5,
        }
    }

    #[test]
    fn test_players_table_empty() {
        let result = format_players_table(&[], false);
        assert_eq!(result, "No players registered yet.");
    }

    #[test]
    fn test_players_table_single() {
        let result = format_players_table(&[sample_player()], false);
        assert!(result.contains("Name"));
        assert!(result.contains("Roger Federer"));
        assert!(result.contains("43"));
        assert!(result.contains("Professional"));
    }

    #[test]
    fn test_matches_table_empty() {
        assert_eq!(format_matches_table(&[], false), "No matches recorded yet.");
    }

    #[test]
    fn test_matches_table_single() {
        let result = format_matches_table(&[sample_match()], false);
        assert!(result.contains("12"));
        assert!(result.contains("Roger Federer"));
        assert!(result.contains("Rafael Nadal"));
        assert!(result.contains("6:4, 7:6"));
        assert!(result.contains("2026-08-30"));
    }

    #[test]
    fn test_leaderboard_table_empty() {
        let result = format_leaderboard_table(&[], false);
        assert!(result.contains("empty"));
    }

    #[test]
    fn test_leaderboard_ranks_are_one_based() {
        let mut second = sample_row();
        second.name = "Rafael Nadal".to_string();
        let result = format_leaderboard_table(&[sample_row(), second], false);
        let lines: Vec<&str> = result.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].trim_start().starts_with("1."));
        assert!(lines[2].trim_start().starts_with("2."));
    }

    #[test]
    fn test_player_stats_detail() {
        let stats = PlayerStats {
            name: "Roger Federer".to_string(),
            matches: 8,
            wins: 5,
            losses: 3,
            win_rate_percent: 62.5,
        };
        let result = format_player_stats(&stats, false);
        assert!(result.contains("Roger Federer"));
        assert!(result.contains("Matches: 8"));
        assert!(result.contains("Win rate: 62.5%"));
    }

    #[test]
    fn test_format_win_rate() {
        assert_eq!(format_win_rate(0.0), "0.0%");
        assert_eq!(format_win_rate(62.5), "62.5%");
        assert_eq!(format_win_rate(100.0), "100.0%");
    }

    #[test]
    fn test_truncate_name_short() {
        assert_eq!(truncate_name("Eva", 20), "Eva");
    }

    #[test]
    fn test_truncate_name_long() {
        assert_eq!(
            truncate_name("Jo Wilfried Tsonga formerly of Le Mans", 15),
            "Jo Wilfried ..."
        );
    }

    #[test]
    fn test_truncate_name_unicode() {
        // By char, not by byte, so diacritics don't split.
        assert_eq!(truncate_name("Peter Šťastný", 20), "Peter Šťastný");
        assert_eq!(truncate_name("Peter Šťastný Junior", 10), "Peter Š...");
    }

    #[test]
    fn test_players_tsv() {
        let result = format_players_tsv(&[sample_player()]);
        assert_eq!(result, "Roger Federer\t43\tProfessional");
    }

    #[test]
    fn test_matches_tsv() {
        let result = format_matches_tsv(&[sample_match()]);
        assert_eq!(
            result,
            "12\tRoger Federer\tRafael Nadal\t6:4, 7:6\t2026-08-30"
        );
    }

    #[test]
    fn test_leaderboard_tsv() {
        let result = format_leaderboard_tsv(&[sample_row()]);
        assert_eq!(result, "Roger Federer\t8\t5\t3\t62.5");
    }

    #[test]
    fn test_tsv_empty_inputs() {
        assert_eq!(format_players_tsv(&[]), "");
        assert_eq!(format_matches_tsv(&[]), "");
        assert_eq!(format_leaderboard_tsv(&[]), "");
    }
}
