use crate::state::messages::{
    Action, AuthAction, MatchAction, PlayerAction, ScoreboardAction, ScorecardAction, SeriesAction,
    TeamAction,
};
use cricket_api::auth::{AuthClient, SessionMirror};
use cricket_api::client::{ApiClient, ApiError};
use cricket_api::graphql::{GraphqlClient, QueryOutcome};
use cricket_api::{BallEvent, InningsStatus, NewMatch, NewSeries};
use log::{debug, error, warn};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::AbortHandle;

/// Message for a failure action: typed API errors carry their own text,
/// everything else gets the operation's fallback.
pub fn failure_message(err: &ApiError, fallback: &str) -> String {
    if err.is_typed() {
        err.message().to_owned()
    } else {
        fallback.to_owned()
    }
}

/// How concurrent intents of the same kind are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Take {
    /// A newer intent cancels the one in flight.
    Latest(&'static str),
    /// Every intent runs to completion.
    Every,
}

pub fn take_policy(intent: &Action) -> Take {
    use ScorecardAction as C;
    match intent {
        Action::Series(SeriesAction::FetchSeriesRequest) => Take::Latest("series/fetch"),
        Action::Match(MatchAction::FetchMatchesRequest { .. }) => Take::Latest("matches/fetch"),
        Action::Match(MatchAction::FetchMatchRequest(_)) => Take::Latest("match/fetch"),
        Action::Scorecard(C::FetchScorecardRequest(_)) => Take::Latest("scorecard/fetch"),
        Action::Scorecard(C::FetchInningsScoreSummaryRequest { .. }) => Take::Latest("scorecard/innings"),
        Action::Scorecard(C::FetchLatestOverRequest { .. }) => Take::Latest("scorecard/over"),
        Action::Auth(AuthAction::CheckAuthStatusRequest) => Take::Latest("auth/status"),
        Action::Auth(AuthAction::FetchCurrentUserRequest) => Take::Latest("auth/me"),
        Action::Team(_) => Take::Latest("teams/fetch"),
        Action::Player(_) => Take::Latest("players/fetch"),
        Action::Scoreboard(_) => Take::Latest("scoreboard/fetch"),
        _ => Take::Every,
    }
}

/// Clients the sagas talk to, plus the channel results are put on.
pub struct Effects {
    pub api: ApiClient,
    pub graphql: GraphqlClient,
    pub auth: AuthClient,
    pub mirror: SessionMirror,
    puts: mpsc::UnboundedSender<Action>,
}

impl Effects {
    pub fn new(
        api: ApiClient,
        graphql: GraphqlClient,
        auth: AuthClient,
        mirror: SessionMirror,
        puts: mpsc::UnboundedSender<Action>,
    ) -> Self {
        Self { api, graphql, auth, mirror, puts }
    }

    fn put(&self, action: Action) {
        if let Err(e) = self.puts.send(action) {
            error!("failed to put action, store is gone: {e}");
        }
    }
}

/// Receives intents from the store and runs one saga task per intent.
pub struct SagaWorker {
    effects: Arc<Effects>,
    intents: mpsc::UnboundedReceiver<Action>,
    in_flight: HashMap<&'static str, AbortHandle>,
}

impl SagaWorker {
    pub fn new(effects: Effects, intents: mpsc::UnboundedReceiver<Action>) -> Self {
        Self { effects: Arc::new(effects), intents, in_flight: HashMap::new() }
    }

    pub async fn run(mut self) {
        while let Some(intent) = self.intents.recv().await {
            let policy = take_policy(&intent);
            let effects = self.effects.clone();
            let handle = tokio::spawn(async move { run_saga(&effects, intent).await });

            if let Take::Latest(key) = policy
                && let Some(previous) = self.in_flight.insert(key, handle.abort_handle())
                && !previous.is_finished()
            {
                debug!("cancelling in-flight {key}");
                previous.abort();
            }
        }
    }
}

pub async fn run_saga(fx: &Effects, intent: Action) {
    use ScorecardAction as C;
    match intent {
        Action::Series(SeriesAction::FetchSeriesRequest) => fetch_series(fx).await,
        Action::Series(SeriesAction::CreateSeriesRequest(series)) => create_series(fx, series).await,
        Action::Series(SeriesAction::UpdateSeriesRequest { id, series }) => {
            update_series(fx, id, series).await
        }
        Action::Series(SeriesAction::DeleteSeriesRequest(id)) => delete_series(fx, id).await,

        Action::Match(MatchAction::FetchMatchesRequest { series_id }) => fetch_matches(fx, series_id).await,
        Action::Match(MatchAction::FetchMatchRequest(id)) => fetch_match(fx, id).await,
        Action::Match(MatchAction::CreateMatchRequest(new_match)) => create_match(fx, new_match).await,
        Action::Match(MatchAction::UpdateMatchRequest { id, new_match }) => {
            update_match(fx, id, new_match).await
        }
        Action::Match(MatchAction::DeleteMatchRequest(id)) => delete_match(fx, id).await,

        Action::Scorecard(C::FetchScorecardRequest(match_id)) => fetch_scorecard(fx, match_id).await,
        Action::Scorecard(C::StartScoringRequest(match_id)) => start_scoring(fx, match_id).await,
        Action::Scorecard(C::AddBallRequest(ball)) => add_ball(fx, ball).await,
        Action::Scorecard(C::UndoBallRequest { match_id, innings_number }) => {
            undo_ball(fx, match_id, innings_number).await
        }
        Action::Scorecard(C::FetchInningsScoreSummaryRequest { match_id, innings_number }) => {
            fetch_innings_score_summary(fx, match_id, innings_number).await
        }
        Action::Scorecard(C::FetchLatestOverRequest { match_id, innings_number }) => {
            fetch_latest_over(fx, match_id, innings_number).await
        }

        Action::Auth(AuthAction::CheckAuthStatusRequest) => check_auth_status(fx).await,
        Action::Auth(AuthAction::FetchCurrentUserRequest) => fetch_current_user(fx).await,
        Action::Auth(AuthAction::LoginRequest) => {
            fx.put(Action::Auth(AuthAction::LoginRedirect(fx.auth.login_url())))
        }
        Action::Auth(AuthAction::LogoutRequest) => logout(fx).await,

        Action::Team(TeamAction::FetchTeamsRequest(match_id)) => fetch_teams(fx, match_id).await,
        Action::Player(PlayerAction::FetchPlayersRequest(team_id)) => fetch_players(fx, team_id).await,
        Action::Scoreboard(ScoreboardAction::FetchLiveScoreboardRequest(match_id)) => {
            fetch_live_scoreboard(fx, match_id).await
        }

        other => warn!("no saga for {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Series
// ---------------------------------------------------------------------------

async fn fetch_series(fx: &Effects) {
    let action = match fx.api.fetch_series().await {
        Ok(items) => SeriesAction::FetchSeriesSuccess(items),
        Err(e) => SeriesAction::FetchSeriesFailure(failure_message(&e, "Failed to fetch series")),
    };
    fx.put(Action::Series(action));
}

async fn create_series(fx: &Effects, series: NewSeries) {
    let action = match fx.api.create_series(&series).await {
        Ok(created) => SeriesAction::CreateSeriesSuccess(created),
        Err(e) => SeriesAction::CreateSeriesFailure(failure_message(&e, "Failed to create series")),
    };
    fx.put(Action::Series(action));
}

async fn update_series(fx: &Effects, id: String, series: NewSeries) {
    let action = match fx.api.update_series(&id, &series).await {
        Ok(updated) => SeriesAction::UpdateSeriesSuccess(updated),
        Err(e) => SeriesAction::UpdateSeriesFailure(failure_message(&e, "Failed to update series")),
    };
    fx.put(Action::Series(action));
}

async fn delete_series(fx: &Effects, id: String) {
    let action = match fx.api.delete_series(&id).await {
        Ok(_) => SeriesAction::DeleteSeriesSuccess(id),
        Err(e) => SeriesAction::DeleteSeriesFailure(failure_message(&e, "Failed to delete series")),
    };
    fx.put(Action::Series(action));
}

// ---------------------------------------------------------------------------
// Matches
// ---------------------------------------------------------------------------

async fn fetch_matches(fx: &Effects, series_id: Option<String>) {
    let result = match series_id.as_deref() {
        Some(series_id) => fx.api.fetch_matches_by_series(series_id).await,
        None => fx.api.fetch_matches().await,
    };
    let action = match result {
        Ok(items) => MatchAction::FetchMatchesSuccess(items),
        Err(e) => MatchAction::FetchMatchesFailure(failure_message(&e, "Failed to fetch matches")),
    };
    fx.put(Action::Match(action));
}

async fn fetch_match(fx: &Effects, id: String) {
    let action = match fx.api.fetch_match(&id).await {
        Ok(m) => MatchAction::FetchMatchSuccess(m),
        Err(e) => MatchAction::FetchMatchFailure(failure_message(&e, "Failed to fetch match")),
    };
    fx.put(Action::Match(action));
}

async fn create_match(fx: &Effects, new_match: NewMatch) {
    let action = match fx.api.create_match(&new_match).await {
        Ok(m) => MatchAction::CreateMatchSuccess(m),
        Err(e) => MatchAction::CreateMatchFailure(failure_message(&e, "Failed to create match")),
    };
    fx.put(Action::Match(action));
}

async fn update_match(fx: &Effects, id: String, new_match: NewMatch) {
    let action = match fx.api.update_match(&id, &new_match).await {
        Ok(m) => MatchAction::UpdateMatchSuccess(m),
        Err(e) => MatchAction::UpdateMatchFailure(failure_message(&e, "Failed to update match")),
    };
    fx.put(Action::Match(action));
}

async fn delete_match(fx: &Effects, id: String) {
    let action = match fx.api.delete_match(&id).await {
        Ok(_) => MatchAction::DeleteMatchSuccess(id),
        Err(e) => MatchAction::DeleteMatchFailure(failure_message(&e, "Failed to delete match")),
    };
    fx.put(Action::Match(action));
}

// ---------------------------------------------------------------------------
// Scorecard
// ---------------------------------------------------------------------------

async fn fetch_scorecard(fx: &Effects, match_id: String) {
    let action = match fx.api.fetch_scorecard(&match_id).await {
        Ok(card) => ScorecardAction::FetchScorecardSuccess(card),
        Err(e) => ScorecardAction::FetchScorecardFailure(failure_message(&e, "Failed to fetch scorecard")),
    };
    fx.put(Action::Scorecard(action));
}

/// Start scoring, then pull the full scorecard so the first innings shows up.
async fn start_scoring(fx: &Effects, match_id: String) {
    match fx.api.start_scoring(&match_id).await {
        Ok(started) => {
            fx.put(Action::Scorecard(ScorecardAction::StartScoringSuccess(started)));
            fx.put(Action::Scorecard(ScorecardAction::FetchScorecardRequest(match_id)));
        }
        Err(e) => fx.put(Action::Scorecard(ScorecardAction::StartScoringFailure(
            failure_message(&e, "Failed to start scoring"),
        ))),
    }
}

/// Record one ball, then refresh the innings incrementally.
///
/// The two GraphQL reads run one after the other and only after the write has
/// been acknowledged. Their failures are logged and never reported as a
/// failed ball. A completed innings triggers a full scorecard re-fetch.
pub async fn add_ball(fx: &Effects, ball: BallEvent) {
    if let Err(e) = fx.api.add_ball(&ball).await {
        fx.put(Action::Scorecard(ScorecardAction::AddBallFailure(failure_message(
            &e,
            "Failed to add ball",
        ))));
        return;
    }
    fx.put(Action::Scorecard(ScorecardAction::AddBallSuccess));

    let match_id = ball.match_id;
    let innings_number = ball.innings_number;

    let mut innings_completed = false;
    match fx.graphql.innings_score_summary(&match_id, innings_number).await {
        QueryOutcome::Success(score) => {
            innings_completed = score.status == InningsStatus::Completed;
            fx.put(Action::Scorecard(ScorecardAction::FetchInningsScoreSummarySuccess {
                match_id: match_id.clone(),
                score,
            }));
        }
        QueryOutcome::Failure(e) => warn!("innings summary refresh failed after ball: {e}"),
    }

    match fx.graphql.latest_over_only(&match_id, innings_number).await {
        QueryOutcome::Success(over) => fx.put(Action::Scorecard(ScorecardAction::FetchLatestOverSuccess {
            match_id: match_id.clone(),
            innings_number,
            over,
        })),
        QueryOutcome::Failure(e) => warn!("latest over refresh failed after ball: {e}"),
    }

    if innings_completed {
        debug!("innings {innings_number} of {match_id} completed, re-fetching scorecard");
        fx.put(Action::Scorecard(ScorecardAction::FetchScorecardRequest(match_id)));
    }
}

/// Remove the last ball; consistency comes from a full re-fetch.
pub async fn undo_ball(fx: &Effects, match_id: String, innings_number: u8) {
    match fx.api.undo_last_ball(&match_id, innings_number).await {
        Ok(_) => {
            fx.put(Action::Scorecard(ScorecardAction::UndoBallSuccess));
            fx.put(Action::Scorecard(ScorecardAction::FetchScorecardRequest(match_id)));
        }
        Err(e) => fx.put(Action::Scorecard(ScorecardAction::UndoBallFailure(failure_message(
            &e,
            "Failed to undo ball",
        )))),
    }
}

async fn fetch_innings_score_summary(fx: &Effects, match_id: String, innings_number: u8) {
    let action = match fx.graphql.innings_score_summary(&match_id, innings_number).await {
        QueryOutcome::Success(score) => ScorecardAction::FetchInningsScoreSummarySuccess { match_id, score },
        QueryOutcome::Failure(e) => {
            warn!("innings summary refresh failed: {e}");
            ScorecardAction::FetchInningsScoreSummaryFailure(e)
        }
    };
    fx.put(Action::Scorecard(action));
}

async fn fetch_latest_over(fx: &Effects, match_id: String, innings_number: u8) {
    let action = match fx.graphql.latest_over_only(&match_id, innings_number).await {
        QueryOutcome::Success(over) => {
            ScorecardAction::FetchLatestOverSuccess { match_id, innings_number, over }
        }
        QueryOutcome::Failure(e) => {
            warn!("latest over refresh failed: {e}");
            ScorecardAction::FetchLatestOverFailure(e)
        }
    };
    fx.put(Action::Scorecard(action));
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

async fn check_auth_status(fx: &Effects) {
    match fx.auth.auth_status().await {
        Ok(status) => {
            if let Err(e) = fx.mirror.set_auth_state(status.authenticated, status.user.as_ref()) {
                warn!("could not persist session hint to {}: {e}", fx.mirror.path().display());
            }
            fx.put(Action::Auth(AuthAction::CheckAuthStatusSuccess(status)));
        }
        Err(e) => {
            if e.status() == 401
                && let Err(e) = fx.mirror.clear_auth_state()
            {
                warn!("could not clear session hint: {e}");
            }
            fx.put(Action::Auth(AuthAction::CheckAuthStatusFailure(failure_message(
                &e,
                "Failed to check sign-in status",
            ))));
        }
    }
}

async fn fetch_current_user(fx: &Effects) {
    match fx.auth.current_user().await {
        Ok(user) => {
            if let Err(e) = fx.mirror.set_auth_state(true, Some(&user)) {
                warn!("could not persist session hint to {}: {e}", fx.mirror.path().display());
            }
            fx.put(Action::Auth(AuthAction::FetchCurrentUserSuccess(user)));
        }
        Err(e) => fx.put(Action::Auth(AuthAction::FetchCurrentUserFailure(failure_message(
            &e,
            "Failed to load user",
        )))),
    }
}

async fn logout(fx: &Effects) {
    match fx.auth.logout().await {
        Ok(()) => {
            if let Err(e) = fx.mirror.clear_auth_state() {
                warn!("could not clear session hint: {e}");
            }
            fx.put(Action::Auth(AuthAction::LogoutSuccess));
        }
        Err(e) => fx.put(Action::Auth(AuthAction::LogoutFailure(failure_message(&e, "Failed to sign out")))),
    }
}

// ---------------------------------------------------------------------------
// Teams / players / live scoreboard
// ---------------------------------------------------------------------------

async fn fetch_teams(fx: &Effects, match_id: String) {
    let action = match fx.api.fetch_teams(&match_id).await {
        Ok(teams) => TeamAction::FetchTeamsSuccess(teams),
        Err(e) => TeamAction::FetchTeamsFailure(failure_message(&e, "Failed to fetch teams")),
    };
    fx.put(Action::Team(action));
}

async fn fetch_players(fx: &Effects, team_id: String) {
    let action = match fx.api.fetch_players(&team_id).await {
        Ok(players) => PlayerAction::FetchPlayersSuccess(players),
        Err(e) => PlayerAction::FetchPlayersFailure(failure_message(&e, "Failed to fetch players")),
    };
    fx.put(Action::Player(action));
}

async fn fetch_live_scoreboard(fx: &Effects, match_id: String) {
    let action = match fx.graphql.live_scorecard(&match_id).await {
        QueryOutcome::Success(card) => ScoreboardAction::FetchLiveScoreboardSuccess(card),
        QueryOutcome::Failure(e) => {
            debug!("live scoreboard refresh failed: {e}");
            ScoreboardAction::FetchLiveScoreboardFailure(e)
        }
    };
    fx.put(Action::Scoreboard(action));
}
