pub mod auth;
pub mod client;
pub mod graphql;
pub mod wire;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Series / match
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesStatus {
    #[default]
    Upcoming,
    Ongoing,
    Completed,
}

impl SeriesStatus {
    pub fn label(&self) -> &'static str {
        match self {
            SeriesStatus::Upcoming => "Upcoming",
            SeriesStatus::Ongoing => "Ongoing",
            SeriesStatus::Completed => "Completed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub status: SeriesStatus,
    /// User id of the owner. Only the owner may create matches or score.
    #[serde(default)]
    pub created_by: Option<String>,
}

impl Series {
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.created_by.as_deref() == Some(user_id)
    }
}

/// Create/update payload for a series. The server assigns `id` and `created_by`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSeries {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<SeriesStatus>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    #[default]
    Live,
    Completed,
    Cancelled,
}

/// Team slot in a match. Team A / team B, used for the toss winner and batting side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TeamSide {
    #[default]
    A,
    B,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TossType {
    #[default]
    Heads,
    Tails,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: String,
    pub series_id: String,
    pub match_number: u32,
    pub date: NaiveDate,
    #[serde(default)]
    pub status: MatchStatus,
    #[serde(default)]
    pub team_a: String,
    #[serde(default)]
    pub team_b: String,
    pub team_a_player_count: u8,
    pub team_b_player_count: u8,
    pub total_overs: u8,
    pub toss_winner: TeamSide,
    pub toss_type: TossType,
    pub batting_team: TeamSide,
}

/// Create/update payload for a match.
///
/// `match_number == Some(1)` is the auto-assign sentinel; [`client::ApiClient::create_match`]
/// strips it so the server picks the next free number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMatch {
    pub series_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_number: Option<u32>,
    pub date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<MatchStatus>,
    pub team_a: String,
    pub team_b: String,
    pub team_a_player_count: u8,
    pub team_b_player_count: u8,
    pub total_overs: u8,
    pub toss_winner: TeamSide,
    pub toss_type: TossType,
    pub batting_team: TeamSide,
}

// ---------------------------------------------------------------------------
// Scorecard
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScorecardStatus {
    #[default]
    Scheduled,
    Live,
    Completed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InningsStatus {
    #[default]
    InProgress,
    Completed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BallType {
    #[default]
    Good,
    Wide,
    NoBall,
    DeadBall,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ScorecardResponse {
    pub match_id: String,
    pub series_id: String,
    #[serde(default)]
    pub series_name: Option<String>,
    #[serde(default)]
    pub match_number: Option<u32>,
    pub team_a: String,
    pub team_b: String,
    pub total_overs: u8,
    pub toss_winner: TeamSide,
    pub toss_type: TossType,
    #[serde(default)]
    pub current_innings: u8,
    #[serde(default)]
    pub match_status: ScorecardStatus,
    /// `None` until scoring starts.
    #[serde(default)]
    pub innings: Option<Vec<InningsSummary>>,
}

impl ScorecardResponse {
    pub fn innings(&self, innings_number: u8) -> Option<&InningsSummary> {
        self.innings
            .as_deref()?
            .iter()
            .find(|i| i.innings_number == innings_number)
    }

    pub fn current_innings(&self) -> Option<&InningsSummary> {
        self.innings(self.current_innings).or_else(|| {
            self.innings
                .as_deref()?
                .iter()
                .find(|i| i.status == InningsStatus::InProgress)
        })
    }

    /// True once two innings exist and neither is still in progress.
    pub fn both_innings_completed(&self) -> bool {
        match self.innings.as_deref() {
            Some(innings) => {
                innings.len() >= 2 && innings.iter().all(|i| i.status == InningsStatus::Completed)
            }
            None => false,
        }
    }

    pub fn is_started(&self) -> bool {
        self.innings.as_ref().is_some_and(|i| !i.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Extras {
    #[serde(default)]
    pub byes: u32,
    #[serde(default)]
    pub leg_byes: u32,
    #[serde(default)]
    pub wides: u32,
    #[serde(default)]
    pub no_balls: u32,
    #[serde(default)]
    pub total: u32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InningsSummary {
    pub innings_number: u8,
    pub batting_team: String,
    pub total_runs: u32,
    pub total_wickets: u32,
    pub total_overs: f64,
    pub total_balls: u32,
    pub status: InningsStatus,
    #[serde(default)]
    pub extras: Extras,
    /// Ordered by `over_number`; append/update only.
    #[serde(default)]
    pub overs: Vec<OverSummary>,
}

impl InningsSummary {
    /// Number of balls actually recorded in the over list, extras included.
    pub fn ball_count(&self) -> usize {
        self.overs.iter().map(|o| o.balls.len()).sum()
    }

    /// True when there is at most one recorded ball, so nothing can be undone.
    pub fn is_first_ball_of_innings(&self) -> bool {
        self.ball_count() <= 1
    }

    pub fn last_over(&self) -> Option<&OverSummary> {
        self.overs.last()
    }

    /// Apply a score-only summary. Ball-level detail in `overs` is kept as is.
    pub fn apply_score(&mut self, score: InningsScore) {
        self.batting_team = score.batting_team;
        self.total_runs = score.total_runs;
        self.total_wickets = score.total_wickets;
        self.total_overs = score.total_overs;
        self.total_balls = score.total_balls;
        self.status = score.status;
        self.extras = score.extras;
    }

    /// Replace the over with the same `over_number`, or append it as the newest over.
    pub fn upsert_over(&mut self, over: OverSummary) {
        match self.overs.iter_mut().find(|o| o.over_number == over.over_number) {
            Some(existing) => *existing = over,
            None => self.overs.push(over),
        }
    }
}

/// Score-only view of an innings, as returned by the GraphQL summary queries.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InningsScore {
    pub innings_number: u8,
    pub batting_team: String,
    pub total_runs: u32,
    pub total_wickets: u32,
    pub total_overs: f64,
    pub total_balls: u32,
    pub status: InningsStatus,
    #[serde(default)]
    pub extras: Extras,
}

impl From<InningsScore> for InningsSummary {
    fn from(score: InningsScore) -> Self {
        InningsSummary {
            innings_number: score.innings_number,
            batting_team: score.batting_team,
            total_runs: score.total_runs,
            total_wickets: score.total_wickets,
            total_overs: score.total_overs,
            total_balls: score.total_balls,
            status: score.status,
            extras: score.extras,
            overs: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OverSummary {
    pub over_number: u32,
    #[serde(default)]
    pub total_runs: u32,
    #[serde(default)]
    pub total_balls: u32,
    #[serde(default)]
    pub total_wickets: u32,
    #[serde(default)]
    pub status: InningsStatus,
    #[serde(default)]
    pub balls: Vec<BallSummary>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BallSummary {
    pub ball_number: u32,
    pub ball_type: BallType,
    /// Runs as a string ("0".."6") or one of the codes NB, WD, LB, WC.
    pub run_type: String,
    #[serde(default)]
    pub runs: u32,
    #[serde(default)]
    pub byes: u32,
    #[serde(default)]
    pub is_wicket: bool,
    #[serde(default)]
    pub wicket_type: Option<String>,
}

impl BallSummary {
    /// Short label for an over strip: "4", "W", "Wd", "Nb", "2b".
    pub fn short_label(&self) -> String {
        if self.is_wicket {
            return "W".into();
        }
        match self.ball_type {
            BallType::Wide => "Wd".into(),
            BallType::NoBall => "Nb".into(),
            BallType::DeadBall => "D".into(),
            BallType::Good if self.run_type == "LB" => format!("{}lb", self.runs),
            BallType::Good if self.byes > 0 => format!("{}+{}b", self.runs, self.byes),
            BallType::Good => self.runs.to_string(),
        }
    }
}

/// Outgoing add-ball request body.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BallEvent {
    pub match_id: String,
    pub innings_number: u8,
    pub ball_type: BallType,
    pub run_type: String,
    pub runs: u32,
    pub byes: u32,
    pub is_wicket: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wicket_type: Option<String>,
}

/// Acknowledgement of start-scoring. Synthesized when the server reports that
/// scoring was already started.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringStarted {
    pub match_id: String,
    pub message: Option<String>,
    pub already_started: bool,
}

// ---------------------------------------------------------------------------
// Teams / players
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Team {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub match_id: Option<String>,
    #[serde(default)]
    pub side: Option<TeamSide>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Player {
    pub id: String,
    pub name: String,
    pub team_id: String,
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    /// Identity provider subject id.
    #[serde(default)]
    pub google_id: Option<String>,
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub picture: Option<String>,
    #[serde(default)]
    pub email_verified: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthStatus {
    pub authenticated: bool,
    pub user: Option<User>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ball(n: u32) -> BallSummary {
        BallSummary { ball_number: n, run_type: "1".into(), runs: 1, ..Default::default() }
    }

    fn over(n: u32, balls: u32) -> OverSummary {
        OverSummary { over_number: n, balls: (1..=balls).map(ball).collect(), ..Default::default() }
    }

    #[test]
    fn first_ball_detection_counts_balls_across_overs() {
        let mut innings = InningsSummary { innings_number: 1, ..Default::default() };
        assert!(innings.is_first_ball_of_innings());
        innings.overs.push(over(1, 1));
        assert!(innings.is_first_ball_of_innings());
        innings.overs[0].balls.push(ball(2));
        assert!(!innings.is_first_ball_of_innings());
    }

    #[test]
    fn upsert_over_replaces_in_place_or_appends() {
        let mut innings = InningsSummary { overs: vec![over(1, 6), over(2, 2)], ..Default::default() };
        innings.upsert_over(over(2, 3));
        innings.upsert_over(over(3, 1));
        let numbers: Vec<u32> = innings.overs.iter().map(|o| o.over_number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert_eq!(innings.overs[1].balls.len(), 3);
        assert_eq!(innings.last_over().map(|o| o.over_number), Some(3));
    }

    #[test]
    fn apply_score_keeps_overs() {
        let mut innings = InningsSummary { innings_number: 1, overs: vec![over(1, 4)], ..Default::default() };
        let before = innings.overs.clone();
        innings.apply_score(InningsScore {
            innings_number: 1,
            batting_team: "Lions".into(),
            total_runs: 42,
            total_wickets: 1,
            total_overs: 0.4,
            total_balls: 4,
            status: InningsStatus::InProgress,
            extras: Extras::default(),
        });
        assert_eq!(innings.total_runs, 42);
        assert_eq!(innings.overs, before);
    }

    #[test]
    fn both_innings_completed_needs_two_finished_innings() {
        let done = |n| InningsSummary { innings_number: n, status: InningsStatus::Completed, ..Default::default() };
        let mut card = ScorecardResponse { innings: Some(vec![done(1)]), ..Default::default() };
        assert!(!card.both_innings_completed());
        card.innings.as_mut().unwrap().push(done(2));
        assert!(card.both_innings_completed());
        card.innings = None;
        assert!(!card.both_innings_completed());
    }

    #[test]
    fn scorecard_with_null_innings_parses() {
        let raw = r#"{
            "match_id": "m1", "series_id": "s1", "team_a": "Lions", "team_b": "Tigers",
            "total_overs": 20, "toss_winner": "A", "toss_type": "heads",
            "current_innings": 1, "match_status": "scheduled", "innings": null
        }"#;
        let card: ScorecardResponse = serde_json::from_str(raw).unwrap();
        assert!(card.innings.is_none());
        assert!(!card.is_started());
        assert_eq!(card.match_status, ScorecardStatus::Scheduled);
    }

    #[test]
    fn ball_event_omits_missing_wicket_type() {
        let event = BallEvent {
            match_id: "m1".into(),
            innings_number: 1,
            ball_type: BallType::Good,
            run_type: "4".into(),
            runs: 4,
            byes: 0,
            is_wicket: false,
            wicket_type: None,
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "match_id": "m1", "innings_number": 1, "ball_type": "good",
                "run_type": "4", "runs": 4, "byes": 0, "is_wicket": false
            })
        );
    }

    #[test]
    fn ball_short_labels() {
        let mut b = ball(1);
        b.runs = 4;
        assert_eq!(b.short_label(), "4");
        b.ball_type = BallType::Wide;
        assert_eq!(b.short_label(), "Wd");
        b.is_wicket = true;
        assert_eq!(b.short_label(), "W");
    }
}
