use crate::state::messages::ScorecardAction;
use cricket_api::{InningsScore, OverSummary, ScorecardResponse};
use log::debug;

/// Server-authoritative scorecard of the open match.
///
/// `loading` covers whole-snapshot fetches, `scoring` covers writes (start,
/// add ball, undo) so the two spinners can be driven independently.
/// Results for any match other than the requested or loaded one are dropped.
#[derive(Debug, Default)]
pub struct ScorecardSlice {
    pub scorecard: Option<ScorecardResponse>,
    pub requested: Option<String>,
    pub loading: bool,
    pub scoring: bool,
    pub error: Option<String>,
}

impl ScorecardSlice {
    pub fn reduce(&mut self, action: ScorecardAction) {
        use ScorecardAction::*;
        match action {
            FetchScorecardRequest(match_id) => {
                self.loading = true;
                self.error = None;
                self.requested = Some(match_id);
            }
            FetchScorecardSuccess(scorecard) => {
                if self.requested.as_deref().is_some_and(|id| id != scorecard.match_id) {
                    debug!("dropping scorecard of {}, not the requested match", scorecard.match_id);
                    return;
                }
                self.loading = false;
                self.scorecard = Some(scorecard);
            }
            FetchScorecardFailure(e) => {
                self.loading = false;
                self.error = Some(e);
            }
            StartScoringRequest(_) | AddBallRequest(_) | UndoBallRequest { .. } => {
                self.scoring = true;
                self.error = None;
            }
            StartScoringSuccess(_) | AddBallSuccess | UndoBallSuccess => {
                self.scoring = false;
            }
            StartScoringFailure(e) | AddBallFailure(e) | UndoBallFailure(e) => {
                self.scoring = false;
                self.error = Some(e);
            }
            // Incremental reads never touch the busy flags or the error banner.
            FetchInningsScoreSummaryRequest { .. }
            | FetchLatestOverRequest { .. }
            | FetchInningsScoreSummaryFailure(_)
            | FetchLatestOverFailure(_) => {}
            FetchInningsScoreSummarySuccess { match_id, score } => {
                if self.is_loaded(&match_id) {
                    self.upsert_innings_score(score);
                }
            }
            FetchLatestOverSuccess { match_id, innings_number, over } => {
                if self.is_loaded(&match_id) {
                    self.upsert_latest_over(innings_number, over);
                }
            }
            ClearScorecard => *self = Self::default(),
        }
    }

    /// Upsert one innings by number. A new innings starts with no overs; an
    /// existing one gets its totals replaced and its overs left alone.
    pub fn upsert_innings_score(&mut self, score: InningsScore) {
        let Some(scorecard) = self.scorecard.as_mut() else {
            return;
        };
        let innings = scorecard.innings.get_or_insert_with(Vec::new);
        match innings
            .iter_mut()
            .find(|i| i.innings_number == score.innings_number)
        {
            Some(existing) => existing.apply_score(score),
            None => innings.push(score.into()),
        }
    }

    /// Upsert one over within an existing innings. Unknown innings: no-op.
    pub fn upsert_latest_over(&mut self, innings_number: u8, over: OverSummary) {
        let Some(innings) = self
            .scorecard
            .as_mut()
            .and_then(|s| s.innings.as_mut())
            .and_then(|list| list.iter_mut().find(|i| i.innings_number == innings_number))
        else {
            return;
        };
        innings.upsert_over(over);
    }

    pub fn match_id(&self) -> Option<&str> {
        self.scorecard.as_ref().map(|s| s.match_id.as_str())
    }

    fn is_loaded(&self, match_id: &str) -> bool {
        let loaded = self.match_id() == Some(match_id);
        if !loaded {
            debug!("dropping incremental update for {match_id}, not the loaded match");
        }
        loaded
    }
}
