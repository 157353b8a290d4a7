use crate::{Record, Result};

pub const MATCH_ID: &str = "match_id";
pub const BATTING_TEAM: &str = "batting_team";
pub const BOWLING_TEAM: &str = "bowling_team";
pub const BATSMAN: &str = "batsman";
pub const BOWLER: &str = "bowler";
pub const TOTAL_RUNS: &str = "total_runs";
pub const BATSMAN_RUNS: &str = "batsman_runs";
pub const EXTRA_RUNS: &str = "extra_runs";
pub const NOBALL_RUNS: &str = "noball_runs";
pub const WIDE_RUNS: &str = "wide_runs";

pub const BALLS_PER_OVER: i64 = 6;

/// A delivery counts towards the over unless it was a wide or a no-ball.
pub fn is_legal(record: &Record) -> Result<bool> {
    Ok(record.int(NOBALL_RUNS)? == 0 && record.int(WIDE_RUNS)? == 0)
}
