use chrono::NaiveDate;

use super::player::{is_valid_age, is_valid_name, same_player, MAX_AGE, MIN_AGE};
use super::score::validate_score;

/// Validate a new-player form before it turns into a request.
/// Returns all violations at once (not just the first).
pub fn validate_new_player(name: &str, age: u32) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    let name = name.trim();
    if name.is_empty() {
        errors.push("Enter the player's name.".to_string());
    } else if !is_valid_name(name) {
        errors.push(
            "Player name may only contain letters and single spaces (no digits or symbols)."
                .to_string(),
        );
    }

    if !is_valid_age(age) {
        errors.push(format!(
            "Enter a realistic age ({} to {} years).",
            MIN_AGE, MAX_AGE
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate a new-match form before it turns into a request.
/// The score check short-circuits internally; the form check does not.
pub fn validate_new_match(
    player_a: &str,
    player_b: &str,
    score: &str,
    date: &str,
) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    let player_a = player_a.trim();
    let player_b = player_b.trim();

    if player_a.is_empty() || player_b.is_empty() {
        errors.push("Enter both player names.".to_string());
    } else {
        if !is_valid_name(player_a) {
            errors.push(format!("Invalid name for player A: '{}'.", player_a));
        }
        if !is_valid_name(player_b) {
            errors.push(format!("Invalid name for player B: '{}'.", player_b));
        }
        if same_player(player_a, player_b) {
            errors.push("Player A and player B must be different.".to_string());
        }
    }

    if let Err(e) = validate_score(score) {
        errors.push(e.to_string());
    }

    let date = date.trim();
    if date.is_empty() {
        errors.push("Enter the match date.".to_string());
    } else if NaiveDate::parse_from_str(date, "%Y-%m-%d").is_err() {
        errors.push(format!("Invalid date '{}'. Use YYYY-MM-DD.", date));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_player_form() {
        assert!(validate_new_player("Roger Federer", 43).is_ok());
    }

    #[test]
    fn test_player_form_collects_all_errors() {
        let errors = validate_new_player("R2D2", 1).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("letters"));
        assert!(errors[1].contains("age"));
    }

    #[test]
    fn test_player_form_empty_name() {
        let errors = validate_new_player("   ", 30).unwrap_err();
        assert_eq!(errors, vec!["Enter the player's name.".to_string()]);
    }

    #[test]
    fn test_valid_match_form() {
        assert!(validate_new_match("Roger Federer", "Rafael Nadal", "6:4, 7:6", "2026-08-30").is_ok());
    }

    #[test]
    fn test_match_form_same_player() {
        let errors =
            validate_new_match("Roger Federer", "roger federer", "6:4", "2026-08-30").unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("different"));
    }

    #[test]
    fn test_match_form_surfaces_score_reason() {
        let errors = validate_new_match("Ana", "Eva", "7:4", "2026-08-30").unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("7:5 or 7:6"));
    }

    #[test]
    fn test_match_form_bad_date() {
        let errors = validate_new_match("Ana", "Eva", "6:4", "30.8.2026").unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("YYYY-MM-DD"));
    }

    #[test]
    fn test_match_form_collects_all_errors() {
        let errors = validate_new_match("", "", "6:6", "").unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
