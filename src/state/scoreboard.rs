use crate::state::messages::ScoreboardAction;
use chrono::{DateTime, Local};
use cricket_api::ScorecardResponse;

/// Latest live snapshot read over GraphQL for the open match.
#[derive(Debug, Default)]
pub struct ScoreboardSlice {
    pub live: Option<ScorecardResponse>,
    pub match_id: Option<String>,
    pub last_updated: Option<DateTime<Local>>,
    pub loading: bool,
    pub error: Option<String>,
}

impl ScoreboardSlice {
    pub fn reduce(&mut self, action: ScoreboardAction) {
        match action {
            ScoreboardAction::FetchLiveScoreboardRequest(match_id) => {
                self.loading = true;
                self.error = None;
                if self.match_id.as_deref() != Some(match_id.as_str()) {
                    self.live = None;
                    self.last_updated = None;
                }
                self.match_id = Some(match_id);
            }
            ScoreboardAction::FetchLiveScoreboardSuccess(card) => {
                self.loading = false;
                // A response for a match we navigated away from is dropped.
                if self.match_id.as_deref() == Some(card.match_id.as_str()) {
                    self.live = Some(card);
                    self.last_updated = Some(Local::now());
                }
            }
            ScoreboardAction::FetchLiveScoreboardFailure(e) => {
                self.loading = false;
                self.error = Some(e);
            }
            ScoreboardAction::ClearScoreboard => *self = Self::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(match_id: &str) -> ScorecardResponse {
        ScorecardResponse { match_id: match_id.into(), ..Default::default() }
    }

    #[test]
    fn stale_match_response_is_dropped() {
        let mut slice = ScoreboardSlice::default();
        slice.reduce(ScoreboardAction::FetchLiveScoreboardRequest("m1".into()));
        slice.reduce(ScoreboardAction::FetchLiveScoreboardRequest("m2".into()));
        slice.reduce(ScoreboardAction::FetchLiveScoreboardSuccess(card("m1")));
        assert!(slice.live.is_none());
        slice.reduce(ScoreboardAction::FetchLiveScoreboardSuccess(card("m2")));
        assert_eq!(slice.live.as_ref().unwrap().match_id, "m2");
        assert!(slice.last_updated.is_some());
    }
}
