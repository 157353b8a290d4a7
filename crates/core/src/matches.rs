use crate::{Record, Result, Season};

pub const ID: &str = "id";
pub const SEASON: &str = "season";
pub const WINNER: &str = "winner";
pub const TEAM1: &str = "team1";
pub const TEAM2: &str = "team2";

pub fn season(record: &Record) -> Result<Season> {
    record.int(SEASON)
}

/// Winner of the match, or `None` for no-results and ties.
pub fn winner(record: &Record) -> Result<Option<String>> {
    let winner = record.text(WINNER)?;
    let winner = winner.trim();
    Ok((!winner.is_empty()).then(|| winner.to_string()))
}

/// Both sides of a match, trimmed, in `team1`, `team2` order.
pub fn teams(record: &Record) -> Result<[String; 2]> {
    Ok([
        record.text(TEAM1)?.trim().to_string(),
        record.text(TEAM2)?.trim().to_string(),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_winner_is_none() {
        let rec = Record::from_pairs([(WINNER, "  ")]);
        assert_eq!(winner(&rec).unwrap(), None);
        let rec = Record::from_pairs([(WINNER, "Mumbai Indians")]);
        assert_eq!(winner(&rec).unwrap().as_deref(), Some("Mumbai Indians"));
    }

    #[test]
    fn team_names_are_trimmed_like_winners() {
        let rec = Record::from_pairs([(TEAM1, "A "), (TEAM2, " B"), (WINNER, " B")]);
        let [team1, team2] = teams(&rec).unwrap();
        assert_eq!((team1.as_str(), team2.as_str()), ("A", "B"));
        assert_eq!(winner(&rec).unwrap(), Some(team2));
    }
}
