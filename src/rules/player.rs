/// Age range the club accepts for a registered player.
pub const MIN_AGE: u32 = 5;
pub const MAX_AGE: u32 = 100;

/// A player name is letters (accented letters included) in words separated
/// by single spaces. No digits, no punctuation, no leading/trailing space.
pub fn is_valid_name(name: &str) -> bool {
    if name.is_empty() {
        return false;
    }
    let mut prev_was_space = true; // Rejects a leading space and doubled spaces.
    for c in name.chars() {
        if c == ' ' {
            if prev_was_space {
                return false;
            }
            prev_was_space = true;
        } else if c.is_alphabetic() {
            prev_was_space = false;
        } else {
            return false;
        }
    }
    !prev_was_space // Rejects a trailing space.
}

pub fn is_valid_age(age: u32) -> bool {
    (MIN_AGE..=MAX_AGE).contains(&age)
}

/// Case-insensitive name equality, used to keep the two sides of a match
/// distinct.
pub fn same_player(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}
