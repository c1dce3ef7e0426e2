use std::fmt;

/// One completed set, as parsed from a `games:games` token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetScore {
    pub games_a: u8,
    pub games_b: u8,
}

impl SetScore {
    pub fn winner_games(&self) -> u8 {
        self.games_a.max(self.games_b)
    }

    pub fn loser_games(&self) -> u8 {
        self.games_a.min(self.games_b)
    }
}

/// Why a score string was rejected. Exactly one of these categories applies
/// to any invalid input; callers surface the message to the user as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreError {
    Empty,
    Malformed,
    TiedSet,
    InsufficientGames,
    InvalidMargin,
    InvalidSevenGameSet,
    GameCountTooHigh,
}

impl fmt::Display for ScoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreError::Empty => write!(f, "Enter the match result."),
            ScoreError::Malformed => {
                write!(f, "Invalid result format. Use e.g. 6:4 or 6:4, 7:6.")
            }
            ScoreError::TiedSet => {
                write!(f, "A set cannot end in a tie (e.g. 6:6 is not valid).")
            }
            ScoreError::InsufficientGames => {
                write!(f, "The set winner needs at least 6 games (e.g. 6:4, 7:5, 7:6).")
            }
            ScoreError::InvalidMargin => {
                write!(f, "A set won with 6 games needs a 2-game margin (e.g. 6:4, 6:3).")
            }
            ScoreError::InvalidSevenGameSet => {
                write!(f, "A 7:x set is only valid as 7:5 or 7:6 (7:4 is not).")
            }
            ScoreError::GameCountTooHigh => {
                write!(f, "Game count too high. Enter a real tennis result.")
            }
        }
    }
}

impl std::error::Error for ScoreError {}

/// Parse a `games:games` half of one token: one or two ASCII digits.
fn parse_games(s: &str) -> Option<u8> {
    if s.is_empty() || s.len() > 2 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Parse a comma-separated score string ("6:4, 7:6") into its sets,
/// rejecting on the first rule violation.
///
/// Rules, checked in order per set:
/// - token must match `d{1,2}:d{1,2}`
/// - no ties
/// - the winner has at least 6 games
/// - a 6-game win needs a margin of 2
/// - a 7-game win is only 7:5 or 7:6
/// - more than 7 games is rejected outright
///
/// Pure and deterministic: same input, same outcome, no side effects.
pub fn parse_score(raw: &str) -> Result<Vec<SetScore>, ScoreError> {
    let score = raw.trim();
    if score.is_empty() {
        return Err(ScoreError::Empty);
    }

    let mut sets = Vec::new();
    for token in score.split(',') {
        let token = token.trim();
        let (a, b) = match token.split_once(':') {
            Some((a, b)) => (a, b),
            None => return Err(ScoreError::Malformed),
        };
        let games_a = parse_games(a).ok_or(ScoreError::Malformed)?;
        let games_b = parse_games(b).ok_or(ScoreError::Malformed)?;

        if games_a == games_b {
            return Err(ScoreError::TiedSet);
        }

        let max = games_a.max(games_b);
        let min = games_a.min(games_b);

        if max < 6 {
            return Err(ScoreError::InsufficientGames);
        }
        if max == 6 && max - min < 2 {
            return Err(ScoreError::InvalidMargin);
        }
        if max == 7 && min < 5 {
            return Err(ScoreError::InvalidSevenGameSet);
        }
        if max > 7 {
            return Err(ScoreError::GameCountTooHigh);
        }

        sets.push(SetScore { games_a, games_b });
    }

    Ok(sets)
}

/// Accept/reject wrapper for callers that only need the decision.
pub fn validate_score(raw: &str) -> Result<(), ScoreError> {
    parse_score(raw).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_set_accepted() {
        assert!(validate_score("6:4").is_ok());
        assert!(validate_score("7:5").is_ok());
        assert!(validate_score("7:6").is_ok());
        assert!(validate_score("6:0").is_ok());
    }

    #[test]
    fn test_multi_set_accepted() {
        assert!(validate_score("6:4, 7:6").is_ok());
        assert!(validate_score("6:3,6:3").is_ok());
        assert!(validate_score("0:6, 7:5, 6:4").is_ok());
    }

    #[test]
    fn test_loser_side_can_win_set() {
        // Orientation does not matter, only the game counts.
        assert!(validate_score("4:6").is_ok());
        assert!(validate_score("5:7").is_ok());
    }

    #[test]
    fn test_whitespace_tolerated() {
        assert!(validate_score("  6:4 ,  7:6  ").is_ok());
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(validate_score(""), Err(ScoreError::Empty));
        assert_eq!(validate_score("   "), Err(ScoreError::Empty));
    }

    #[test]
    fn test_malformed_tokens() {
        assert_eq!(validate_score("6-4"), Err(ScoreError::Malformed));
        assert_eq!(validate_score("6:"), Err(ScoreError::Malformed));
        assert_eq!(validate_score(":4"), Err(ScoreError::Malformed));
        assert_eq!(validate_score("six:four"), Err(ScoreError::Malformed));
        assert_eq!(validate_score("123:4"), Err(ScoreError::Malformed));
        assert_eq!(validate_score("6:4,"), Err(ScoreError::Malformed));
        assert_eq!(validate_score("6:4,,7:6"), Err(ScoreError::Malformed));
        assert_eq!(validate_score("6:4:2"), Err(ScoreError::Malformed));
        assert_eq!(validate_score("-6:4"), Err(ScoreError::Malformed));
    }

    #[test]
    fn test_tied_set() {
        assert_eq!(validate_score("6:6"), Err(ScoreError::TiedSet));
        assert_eq!(validate_score("0:0"), Err(ScoreError::TiedSet));
    }

    #[test]
    fn test_insufficient_games() {
        assert_eq!(validate_score("5:4"), Err(ScoreError::InsufficientGames));
        assert_eq!(validate_score("1:0"), Err(ScoreError::InsufficientGames));
    }

    #[test]
    fn test_six_game_set_needs_margin() {
        assert_eq!(validate_score("6:5"), Err(ScoreError::InvalidMargin));
        assert!(validate_score("6:4").is_ok());
    }

    #[test]
    fn test_seven_game_set() {
        assert_eq!(validate_score("7:4"), Err(ScoreError::InvalidSevenGameSet));
        assert_eq!(validate_score("7:0"), Err(ScoreError::InvalidSevenGameSet));
        assert!(validate_score("7:5").is_ok());
        assert!(validate_score("7:6").is_ok());
    }

    #[test]
    fn test_game_count_too_high() {
        assert_eq!(validate_score("9:7"), Err(ScoreError::GameCountTooHigh));
        assert_eq!(validate_score("10:8"), Err(ScoreError::GameCountTooHigh));
        assert_eq!(validate_score("99:0"), Err(ScoreError::GameCountTooHigh));
    }

    #[test]
    fn test_rejects_on_first_bad_set() {
        // First set is fine, second one is a tie.
        assert_eq!(validate_score("6:4,6:6"), Err(ScoreError::TiedSet));
        // Checks run left to right.
        assert_eq!(validate_score("5:4,6:6"), Err(ScoreError::InsufficientGames));
    }

    #[test]
    fn test_idempotent() {
        for input in ["6:4, 7:6", "", "6:6", "garbage"] {
            assert_eq!(validate_score(input), validate_score(input));
        }
    }

    #[test]
    fn test_parse_returns_sets() {
        let sets = parse_score("6:4, 5:7").unwrap();
        assert_eq!(sets.len(), 2);
        assert_eq!(sets[0], SetScore { games_a: 6, games_b: 4 });
        assert_eq!(sets[0].winner_games(), 6);
        assert_eq!(sets[1].winner_games(), 7);
        assert_eq!(sets[1].loser_games(), 5);
    }

    #[test]
    fn test_category_messages_are_distinct() {
        let all = [
            ScoreError::Empty,
            ScoreError::Malformed,
            ScoreError::TiedSet,
            ScoreError::InsufficientGames,
            ScoreError::InvalidMargin,
            ScoreError::InvalidSevenGameSet,
            ScoreError::GameCountTooHigh,
        ];
        let msgs: Vec<String> = all.iter().map(|e| e.to_string()).collect();
        for (i, m) in msgs.iter().enumerate() {
            assert!(!m.is_empty());
            for other in &msgs[i + 1..] {
                assert_ne!(m, other);
            }
        }
    }
}
