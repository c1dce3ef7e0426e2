use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Player category, with the wire constants the server's enum uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerType {
    #[serde(rename = "AMATER")]
    Amateur,
    #[serde(rename = "PROFESIONAL")]
    Professional,
}

impl fmt::Display for PlayerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerType::Amateur => write!(f, "Amateur"),
            PlayerType::Professional => write!(f, "Professional"),
        }
    }
}

impl FromStr for PlayerType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "amateur" | "amater" => Ok(PlayerType::Amateur),
            "professional" | "pro" | "profesional" => Ok(PlayerType::Professional),
            other => Err(format!(
                "Unknown player type '{}'. Use 'amateur' or 'professional'.",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Player {
    #[serde(default)]
    pub id: Option<u64>,
    pub name: String,
    pub age: u32,
    #[serde(rename = "type")]
    pub player_type: PlayerType,
}

/// Body for `POST /api/players`.
#[derive(Debug, Clone, Serialize)]
pub struct NewPlayer {
    pub name: String,
    pub age: u32,
    #[serde(rename = "type")]
    pub player_type: PlayerType,
}

/// A recorded match as the server returns it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRecord {
    pub id: u64,
    pub player_a_name: String,
    pub player_b_name: String,
    pub score: String,
    pub date: NaiveDate,
}

impl MatchRecord {
    /// Short "A vs B" label for status lines.
    pub fn pairing(&self) -> String {
        format!("{} vs {}", self.player_a_name, self.player_b_name)
    }
}

/// Body for `POST /api/matches`. The server parses the date itself, so it
/// crosses the wire as the `YYYY-MM-DD` string the form validated.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMatch {
    pub player_a: String,
    pub player_b: String,
    pub score: String,
    pub date: String,
}

/// Body for `PUT /api/matches/{id}`. The server binds the replacement
/// values as `newScore`/`newDate`; both optional.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MatchUpdate {
    #[serde(rename = "newScore", skip_serializing_if = "Option::is_none")]
    pub new_score: Option<String>,
    #[serde(rename = "newDate", skip_serializing_if = "Option::is_none")]
    pub new_date: Option<String>,
}

/// Response of the match update endpoint. Unlike the list endpoint, the
/// server echoes its bare match model here: nested player objects, no id.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdatedMatch {
    #[serde(rename = "playerA")]
    pub player_a: Player,
    #[serde(rename = "playerB")]
    pub player_b: Player,
    pub score: String,
    pub date: NaiveDate,
}

/// One leaderboard row, win/loss aggregates computed server-side.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardRow {
    pub name: String,
    pub matches: u32,
    pub wins: u32,
    pub losses: u32,
    pub win_rate_percent: f64,
}

/// Per-player aggregates, optionally restricted to a date window.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStats {
    pub name: String,
    pub matches: u32,
    pub wins: u32,
    pub losses: u32,
    pub win_rate_percent: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_type_wire_names() {
        assert_eq!(
            serde_json::to_string(&PlayerType::Amateur).unwrap(),
            "\"AMATER\""
        );
        assert_eq!(
            serde_json::to_string(&PlayerType::Professional).unwrap(),
            "\"PROFESIONAL\""
        );
    }

    #[test]
    fn test_player_type_from_str() {
        assert_eq!("amateur".parse::<PlayerType>().unwrap(), PlayerType::Amateur);
        assert_eq!("PRO".parse::<PlayerType>().unwrap(), PlayerType::Professional);
        assert!("wizard".parse::<PlayerType>().is_err());
    }

    #[test]
    fn test_deserialize_player() {
        let json = r#"{"id":3,"name":"Roger Federer","age":43,"type":"PROFESIONAL"}"#;
        let p: Player = serde_json::from_str(json).unwrap();
        assert_eq!(p.id, Some(3));
        assert_eq!(p.name, "Roger Federer");
        assert_eq!(p.player_type, PlayerType::Professional);
    }

    #[test]
    fn test_deserialize_player_without_id() {
        // CSV mode on the server returns players without ids.
        let json = r#"{"name":"Eva","age":30,"type":"AMATER"}"#;
        let p: Player = serde_json::from_str(json).unwrap();
        assert_eq!(p.id, None);
    }

    #[test]
    fn test_deserialize_match_record() {
        let json = r#"{"id":7,"playerAName":"Ana","playerBName":"Eva","score":"6:4, 7:6","date":"2026-08-30"}"#;
        let m: MatchRecord = serde_json::from_str(json).unwrap();
        assert_eq!(m.id, 7);
        assert_eq!(m.pairing(), "Ana vs Eva");
        assert_eq!(m.date, NaiveDate::from_ymd_opt(2026, 8, 30).unwrap());
    }

    #[test]
    fn test_serialize_new_match_is_camel_case() {
        let m = NewMatch {
            player_a: "Ana".into(),
            player_b: "Eva".into(),
            score: "6:4".into(),
            date: "2026-08-30".into(),
        };
        let json = serde_json::to_string(&m).unwrap();
        assert!(json.contains("\"playerA\":\"Ana\""));
        assert!(json.contains("\"playerB\":\"Eva\""));
    }

    #[test]
    fn test_match_update_uses_server_binding_names() {
        let u = MatchUpdate {
            new_score: Some("6:2, 6:2".into()),
            new_date: None,
        };
        let json = serde_json::to_string(&u).unwrap();
        assert!(json.contains("\"newScore\":\"6:2, 6:2\""));
        assert!(!json.contains("newDate"));
        assert!(!json.contains("\"score\""));
    }

    #[test]
    fn test_deserialize_updated_match() {
        let json = r#"{
            "playerA": {"name":"Ana","age":30,"type":"AMATER"},
            "playerB": {"name":"Eva","age":28,"type":"PROFESIONAL"},
            "score": "6:2, 6:2",
            "date": "2026-08-30"
        }"#;
        let m: UpdatedMatch = serde_json::from_str(json).unwrap();
        assert_eq!(m.player_a.name, "Ana");
        assert_eq!(m.player_b.player_type, PlayerType::Professional);
        assert_eq!(m.score, "6:2, 6:2");
    }

    #[test]
    fn test_deserialize_leaderboard_row() {
        let json = r#"{"name":"Ana","matches":10,"wins":7,"losses":3,"winRatePercent":70.0}"#;
        let row: LeaderboardRow = serde_json::from_str(json).unwrap();
        assert_eq!(row.wins, 7);
        assert!((row.win_rate_percent - 70.0).abs() < f64::EPSILON);
    }
}
