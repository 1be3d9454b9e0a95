use crate::state::auth::AuthSlice;
use crate::state::matches::MatchSlice;
use crate::state::messages::Action;
use crate::state::roster::{PlayerSlice, TeamSlice};
use crate::state::scoreboard::ScoreboardSlice;
use crate::state::scorecard::ScorecardSlice;
use crate::state::series::SeriesSlice;
use log::{debug, error};
use tokio::sync::mpsc;

/// The state tree. Only [`StoreState::reduce`] mutates it.
#[derive(Debug, Default)]
pub struct StoreState {
    pub series: SeriesSlice,
    pub matches: MatchSlice,
    pub scorecard: ScorecardSlice,
    pub auth: AuthSlice,
    pub teams: TeamSlice,
    pub players: PlayerSlice,
    pub scoreboard: ScoreboardSlice,
}

impl StoreState {
    pub fn reduce(&mut self, action: Action) {
        match action {
            Action::Series(a) => self.series.reduce(a),
            Action::Match(a) => self.matches.reduce(a),
            Action::Scorecard(a) => self.scorecard.reduce(a),
            Action::Auth(a) => self.auth.reduce(a),
            Action::Team(a) => self.teams.reduce(a),
            Action::Player(a) => self.players.reduce(a),
            Action::Scoreboard(a) => self.scoreboard.reduce(a),
        }
    }

    /// Any slice with a fetch or write in flight.
    pub fn is_busy(&self) -> bool {
        self.series.loading
            || self.matches.loading
            || self.scorecard.loading
            || self.scorecard.scoring
            || self.auth.loading
            || self.teams.0.loading
            || self.players.0.loading
    }

    /// Any slice showing a failure. Live scoreboard misses are not counted.
    pub fn has_error(&self) -> bool {
        self.series.error.is_some()
            || self.matches.error.is_some()
            || self.scorecard.error.is_some()
            || self.auth.error.is_some()
            || self.teams.0.error.is_some()
            || self.players.0.error.is_some()
    }
}

/// Serial reducer plus hand-off of intents to the saga worker.
pub struct Store {
    pub state: StoreState,
    effects: mpsc::UnboundedSender<Action>,
}

impl Store {
    pub fn new(effects: mpsc::UnboundedSender<Action>) -> Self {
        Self { state: StoreState::default(), effects }
    }

    pub fn dispatch(&mut self, action: Action) {
        debug!("dispatch {action:?}");
        let intent = action.is_request().then(|| action.clone());
        self.state.reduce(action);
        if let Some(intent) = intent
            && let Err(e) = self.effects.send(intent)
        {
            error!("saga worker is gone, dropping intent: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::messages::{ScorecardAction, SeriesAction};

    #[test]
    fn requests_are_reduced_and_forwarded() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut store = Store::new(tx);
        store.dispatch(Action::Series(SeriesAction::FetchSeriesRequest));
        assert!(store.state.series.loading);
        assert_eq!(rx.try_recv().unwrap(), Action::Series(SeriesAction::FetchSeriesRequest));
    }

    #[test]
    fn results_are_reduced_but_not_forwarded() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut store = Store::new(tx);
        store.dispatch(Action::Scorecard(ScorecardAction::AddBallSuccess));
        store.dispatch(Action::Series(SeriesAction::FetchSeriesFailure("x".into())));
        assert!(rx.try_recv().is_err());
        assert_eq!(store.state.series.error.as_deref(), Some("x"));
    }
}
