use crate::state::app_settings::AppSettings;
use crate::state::app_state::{AppState, PendingDelete};
use crate::state::forms::FormState;
use crate::state::messages::{
    Action, AuthAction, MatchAction, PlayerAction, ScoreboardAction, ScorecardAction, SeriesAction,
    TeamAction,
};
use crate::state::scoring::{ScoringAction, ScoringContext};
use crate::state::store::{Store, StoreState};
use cricket_api::{Match, MatchStatus, ScorecardStatus, Series};
use log::{debug, info};
use std::time::Instant;

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum MenuItem {
    #[default]
    Series,
    Matches,
    Scorecard,
    Scoreboard,
    Account,
    Help,
}

pub struct App {
    pub settings: AppSettings,
    pub state: AppState,
    pub store: Store,
}

/// Guard inputs for the open match, read straight from the store.
pub fn scoring_context<'a>(store: &'a StoreState, match_id: Option<&str>) -> ScoringContext<'a> {
    let scorecard = store
        .scorecard
        .scorecard
        .as_ref()
        .filter(|s| Some(s.match_id.as_str()) == match_id);
    let series_id = scorecard
        .map(|s| s.series_id.as_str())
        .or_else(|| match_id.and_then(|id| store.matches.get(id)).map(|m| m.series_id.as_str()));
    ScoringContext {
        user_id: store.auth.user_id(),
        series: series_id.and_then(|id| store.series.get(id)),
        match_status: match_id.and_then(|id| store.matches.get(id)).map(|m| m.status),
        scorecard,
    }
}

impl App {
    pub fn new(settings: AppSettings, store: Store) -> Self {
        Self { settings, state: AppState::new(), store }
    }

    pub fn dispatch(&mut self, action: Action) {
        self.store.dispatch(action);
    }

    // -----------------------------------------------------------------------
    // Saga results, called from main_ui_loop
    // -----------------------------------------------------------------------

    pub fn on_put(&mut self, action: Action) {
        if self.is_for_other_match(&action) {
            debug!("dropping late put for a match that is no longer open: {action:?}");
            return;
        }
        let follow_up = self.before_reduce(&action);
        self.dispatch(action);
        self.after_reduce();
        if let Some(next) = follow_up {
            self.dispatch(next);
        }
    }

    /// Scorecard puts from sagas that started before another match was opened.
    fn is_for_other_match(&self, action: &Action) -> bool {
        use ScorecardAction as C;
        let target = match action {
            Action::Scorecard(C::FetchScorecardRequest(match_id))
            | Action::Scorecard(C::FetchInningsScoreSummarySuccess { match_id, .. })
            | Action::Scorecard(C::FetchLatestOverSuccess { match_id, .. }) => match_id.as_str(),
            Action::Scorecard(C::FetchScorecardSuccess(card)) => card.match_id.as_str(),
            _ => return false,
        };
        self.state.open_match_id.as_deref() != Some(target)
    }

    fn before_reduce(&mut self, action: &Action) -> Option<Action> {
        use ScorecardAction as C;
        match action {
            Action::Scorecard(C::AddBallSuccess | C::AddBallFailure(_)) => self.state.scoring.on_ball_settled(),
            Action::Series(SeriesAction::CreateSeriesSuccess(_) | SeriesAction::UpdateSeriesSuccess(_))
            | Action::Match(MatchAction::CreateMatchSuccess(_) | MatchAction::UpdateMatchSuccess(_)) => {
                self.state.form = None;
            }
            Action::Auth(AuthAction::LoginRedirect(url)) => {
                info!("open {url} in a browser to sign in, then set CRICTUI_SESSION_COOKIE");
            }
            Action::Team(TeamAction::FetchTeamsSuccess(teams)) => {
                self.state.team_cursor.selected = 0;
                return teams
                    .first()
                    .map(|t| Action::Player(PlayerAction::FetchPlayersRequest(t.id.clone())));
            }
            _ => {}
        }
        None
    }

    fn after_reduce(&mut self) {
        let state = &self.store.state;
        self.state.series_cursor.clamp(state.series.items.len());
        self.state.match_cursor.clamp(state.matches.items.len());
        self.state.team_cursor.clamp(state.teams.teams().len());
    }

    // -----------------------------------------------------------------------
    // Tab management
    // -----------------------------------------------------------------------

    pub fn update_tab(&mut self, next: MenuItem) {
        if self.state.active_tab == next {
            return;
        }
        self.state.previous_tab = self.state.active_tab;
        self.state.active_tab = next;
        if next == MenuItem::Matches
            && self.store.state.matches.items.is_empty()
            && !self.store.state.matches.loading
        {
            let series_id = self.state.selected_series_id.clone();
            self.dispatch(Action::Match(MatchAction::FetchMatchesRequest { series_id }));
        }
        if next == MenuItem::Scoreboard {
            self.refresh_live_scoreboard();
        }
    }

    pub fn exit_help(&mut self) {
        if self.state.active_tab == MenuItem::Help {
            self.state.active_tab = self.state.previous_tab;
        }
    }

    pub fn toggle_show_logs(&mut self) {
        self.state.show_logs = !self.state.show_logs;
    }

    pub fn toggle_full_screen(&mut self) {
        self.settings.full_screen = !self.settings.full_screen;
    }

    /// Reload whatever the active tab shows.
    pub fn refresh(&mut self) {
        match self.state.active_tab {
            MenuItem::Series => self.dispatch(Action::Series(SeriesAction::FetchSeriesRequest)),
            MenuItem::Matches => {
                let series_id = self.state.selected_series_id.clone();
                self.dispatch(Action::Match(MatchAction::FetchMatchesRequest { series_id }));
            }
            MenuItem::Scorecard => {
                if let Some(id) = self.state.open_match_id.clone() {
                    self.dispatch(Action::Scorecard(ScorecardAction::FetchScorecardRequest(id)));
                }
            }
            MenuItem::Scoreboard => self.refresh_live_scoreboard(),
            MenuItem::Account => self.dispatch(Action::Auth(AuthAction::CheckAuthStatusRequest)),
            MenuItem::Help => {}
        }
    }

    // -----------------------------------------------------------------------
    // Series and matches
    // -----------------------------------------------------------------------

    pub fn selected_series(&self) -> Option<&Series> {
        self.store.state.series.items.get(self.state.series_cursor.selected)
    }

    pub fn selected_match(&self) -> Option<&Match> {
        self.store.state.matches.items.get(self.state.match_cursor.selected)
    }

    pub fn series_down(&mut self) {
        self.state.series_cursor.down(self.store.state.series.items.len());
    }

    pub fn series_up(&mut self) {
        self.state.series_cursor.up();
    }

    pub fn match_down(&mut self) {
        self.state.match_cursor.down(self.store.state.matches.items.len());
    }

    pub fn match_up(&mut self) {
        self.state.match_cursor.up();
    }

    /// List the selected series' matches on the Matches tab.
    pub fn open_series(&mut self) {
        let Some(series_id) = self.selected_series().map(|s| s.id.clone()) else {
            return;
        };
        self.state.selected_series_id = Some(series_id.clone());
        self.state.match_cursor.selected = 0;
        self.dispatch(Action::Match(MatchAction::FetchMatchesRequest { series_id: Some(series_id) }));
        self.update_tab(MenuItem::Matches);
    }

    pub fn show_all_matches(&mut self) {
        self.state.selected_series_id = None;
        self.state.match_cursor.selected = 0;
        self.dispatch(Action::Match(MatchAction::FetchMatchesRequest { series_id: None }));
    }

    /// Open the selected match's scorecard, dropping state of the previous one.
    pub fn open_match(&mut self) {
        let Some(match_id) = self.selected_match().map(|m| m.id.clone()) else {
            return;
        };
        self.state.scoring.close();
        self.state.scorecard_scroll = 0;
        self.state.open_match_id = Some(match_id.clone());
        self.dispatch(Action::Scorecard(ScorecardAction::ClearScorecard));
        self.dispatch(Action::Scoreboard(ScoreboardAction::ClearScoreboard));
        self.dispatch(Action::Match(MatchAction::FetchMatchRequest(match_id.clone())));
        self.dispatch(Action::Scorecard(ScorecardAction::FetchScorecardRequest(match_id.clone())));
        self.dispatch(Action::Team(TeamAction::FetchTeamsRequest(match_id)));
        self.update_tab(MenuItem::Scorecard);
    }

    pub fn scroll_scorecard(&mut self, down: bool) {
        self.state.scorecard_scroll = if down {
            self.state.scorecard_scroll.saturating_add(1)
        } else {
            self.state.scorecard_scroll.saturating_sub(1)
        };
    }

    pub fn next_team(&mut self) {
        let teams = self.store.state.teams.teams();
        if teams.is_empty() {
            return;
        }
        let next = (self.state.team_cursor.selected + 1) % teams.len();
        let team_id = teams[next].id.clone();
        self.state.team_cursor.selected = next;
        self.dispatch(Action::Player(PlayerAction::FetchPlayersRequest(team_id)));
    }

    // -----------------------------------------------------------------------
    // Live refresh
    // -----------------------------------------------------------------------

    fn open_match_is_live(&self) -> bool {
        let Some(match_id) = self.state.open_match_id.as_deref() else {
            return false;
        };
        let store = &self.store.state;
        let by_match = store
            .matches
            .get(match_id)
            .is_some_and(|m| m.status == MatchStatus::Live);
        let by_card = store
            .scorecard
            .scorecard
            .as_ref()
            .is_some_and(|s| s.match_id == match_id && s.match_status != ScorecardStatus::Completed);
        by_match || by_card
    }

    pub fn refresh_live_scoreboard(&mut self) {
        if let Some(match_id) = self.state.open_match_id.clone() {
            self.dispatch(Action::Scoreboard(ScoreboardAction::FetchLiveScoreboardRequest(match_id)));
        }
    }

    pub fn on_refresh_due(&mut self) {
        if self.open_match_is_live() {
            self.refresh_live_scoreboard();
        }
    }

    // -----------------------------------------------------------------------
    // Live scoring
    // -----------------------------------------------------------------------

    pub fn toggle_scoring(&mut self) {
        if self.state.scoring.is_open() {
            self.state.scoring.close();
        } else {
            self.state.scoring.open();
        }
    }

    pub fn start_scoring(&mut self) {
        let ctx = scoring_context(&self.store.state, self.state.open_match_id.as_deref());
        if let Some(intent) = self.state.scoring.start_scoring(&ctx, Instant::now()) {
            self.state.scoring.open();
            self.store.dispatch(intent);
        }
    }

    pub fn score(&mut self, action: ScoringAction) {
        let ctx = scoring_context(&self.store.state, self.state.open_match_id.as_deref());
        if let Some(intent) = self.state.scoring.score(&ctx, action, Instant::now()) {
            self.store.dispatch(intent);
        }
    }

    pub fn undo_last_ball(&mut self) {
        let ctx = scoring_context(&self.store.state, self.state.open_match_id.as_deref());
        if let Some(intent) = self.state.scoring.undo(&ctx, Instant::now()) {
            self.store.dispatch(intent);
        }
    }

    // -----------------------------------------------------------------------
    // Forms and deletes
    // -----------------------------------------------------------------------

    pub fn open_new_form(&mut self) {
        self.state.form = match self.state.active_tab {
            MenuItem::Series => Some(FormState::new_series()),
            MenuItem::Matches => self
                .state
                .selected_series_id
                .as_deref()
                .map(FormState::new_match),
            _ => None,
        };
    }

    pub fn open_edit_form(&mut self) {
        self.state.form = match self.state.active_tab {
            MenuItem::Series => self.selected_series().map(FormState::edit_series),
            MenuItem::Matches => self.selected_match().map(FormState::edit_match),
            _ => None,
        };
    }

    pub fn submit_form(&mut self) {
        let Some(intent) = self.state.form.as_mut().and_then(FormState::submit) else {
            return;
        };
        self.dispatch(intent);
    }

    pub fn cancel_form(&mut self) {
        self.state.form = None;
    }

    pub fn request_delete(&mut self) {
        self.state.pending_delete = match self.state.active_tab {
            MenuItem::Series => self
                .selected_series()
                .map(|s| PendingDelete::Series { id: s.id.clone(), name: s.name.clone() }),
            MenuItem::Matches => self.selected_match().map(|m| PendingDelete::Match {
                id: m.id.clone(),
                label: format!("{} v {}", m.team_a, m.team_b),
            }),
            _ => None,
        };
    }

    pub fn confirm_delete(&mut self) {
        match self.state.pending_delete.take() {
            Some(PendingDelete::Series { id, .. }) => {
                self.dispatch(Action::Series(SeriesAction::DeleteSeriesRequest(id)))
            }
            Some(PendingDelete::Match { id, .. }) => {
                self.dispatch(Action::Match(MatchAction::DeleteMatchRequest(id)))
            }
            None => {}
        }
    }

    pub fn cancel_delete(&mut self) {
        self.state.pending_delete = None;
    }

    // -----------------------------------------------------------------------
    // Account
    // -----------------------------------------------------------------------

    pub fn login(&mut self) {
        self.dispatch(Action::Auth(AuthAction::LoginRequest));
    }

    pub fn logout(&mut self) {
        self.dispatch(Action::Auth(AuthAction::LogoutRequest));
    }

    // -----------------------------------------------------------------------
    // Animation tick, called every 80ms from AnimationTick event
    // -----------------------------------------------------------------------

    pub fn advance_animation(&mut self) {
        self.state.animation.advance();
        self.state.scoring.tick(Instant::now());
    }
}
