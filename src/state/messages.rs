use cricket_api::{
    AuthStatus, BallEvent, InningsScore, Match, NewMatch, NewSeries, OverSummary, Player,
    ScorecardResponse, ScoringStarted, Series, Team, User,
};
use crossterm::event::KeyEvent;

/// Everything that can change the store. `*Request` variants are intents:
/// the store reduces them (busy flags) and hands them to the saga worker.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Series(SeriesAction),
    Match(MatchAction),
    Scorecard(ScorecardAction),
    Auth(AuthAction),
    Team(TeamAction),
    Player(PlayerAction),
    Scoreboard(ScoreboardAction),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SeriesAction {
    FetchSeriesRequest,
    FetchSeriesSuccess(Vec<Series>),
    FetchSeriesFailure(String),
    CreateSeriesRequest(NewSeries),
    CreateSeriesSuccess(Series),
    CreateSeriesFailure(String),
    UpdateSeriesRequest { id: String, series: NewSeries },
    UpdateSeriesSuccess(Series),
    UpdateSeriesFailure(String),
    DeleteSeriesRequest(String),
    DeleteSeriesSuccess(String),
    DeleteSeriesFailure(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum MatchAction {
    /// All matches, or only those of one series.
    FetchMatchesRequest { series_id: Option<String> },
    FetchMatchesSuccess(Vec<Match>),
    FetchMatchesFailure(String),
    FetchMatchRequest(String),
    FetchMatchSuccess(Match),
    FetchMatchFailure(String),
    CreateMatchRequest(NewMatch),
    CreateMatchSuccess(Match),
    CreateMatchFailure(String),
    UpdateMatchRequest { id: String, new_match: NewMatch },
    UpdateMatchSuccess(Match),
    UpdateMatchFailure(String),
    DeleteMatchRequest(String),
    DeleteMatchSuccess(String),
    DeleteMatchFailure(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScorecardAction {
    FetchScorecardRequest(String),
    FetchScorecardSuccess(ScorecardResponse),
    FetchScorecardFailure(String),
    StartScoringRequest(String),
    StartScoringSuccess(ScoringStarted),
    StartScoringFailure(String),
    AddBallRequest(BallEvent),
    AddBallSuccess,
    AddBallFailure(String),
    UndoBallRequest { match_id: String, innings_number: u8 },
    UndoBallSuccess,
    UndoBallFailure(String),
    FetchInningsScoreSummaryRequest { match_id: String, innings_number: u8 },
    FetchInningsScoreSummarySuccess { match_id: String, score: InningsScore },
    FetchInningsScoreSummaryFailure(String),
    FetchLatestOverRequest { match_id: String, innings_number: u8 },
    FetchLatestOverSuccess { match_id: String, innings_number: u8, over: OverSummary },
    FetchLatestOverFailure(String),
    ClearScorecard,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AuthAction {
    /// Seed the slice from the local mirror before the server answers.
    RestoreSession { authenticated: bool, user: Option<User> },
    CheckAuthStatusRequest,
    CheckAuthStatusSuccess(AuthStatus),
    CheckAuthStatusFailure(String),
    FetchCurrentUserRequest,
    FetchCurrentUserSuccess(User),
    FetchCurrentUserFailure(String),
    LoginRequest,
    LoginRedirect(String),
    LogoutRequest,
    LogoutSuccess,
    LogoutFailure(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum TeamAction {
    FetchTeamsRequest(String),
    FetchTeamsSuccess(Vec<Team>),
    FetchTeamsFailure(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlayerAction {
    FetchPlayersRequest(String),
    FetchPlayersSuccess(Vec<Player>),
    FetchPlayersFailure(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScoreboardAction {
    FetchLiveScoreboardRequest(String),
    FetchLiveScoreboardSuccess(ScorecardResponse),
    FetchLiveScoreboardFailure(String),
    ClearScoreboard,
}

impl Action {
    /// Intents that the saga worker acts on.
    pub fn is_request(&self) -> bool {
        use AuthAction as A;
        use MatchAction as M;
        use ScorecardAction as C;
        use SeriesAction as S;
        match self {
            Action::Series(a) => matches!(
                a,
                S::FetchSeriesRequest
                    | S::CreateSeriesRequest(_)
                    | S::UpdateSeriesRequest { .. }
                    | S::DeleteSeriesRequest(_)
            ),
            Action::Match(a) => matches!(
                a,
                M::FetchMatchesRequest { .. }
                    | M::FetchMatchRequest(_)
                    | M::CreateMatchRequest(_)
                    | M::UpdateMatchRequest { .. }
                    | M::DeleteMatchRequest(_)
            ),
            Action::Scorecard(a) => matches!(
                a,
                C::FetchScorecardRequest(_)
                    | C::StartScoringRequest(_)
                    | C::AddBallRequest(_)
                    | C::UndoBallRequest { .. }
                    | C::FetchInningsScoreSummaryRequest { .. }
                    | C::FetchLatestOverRequest { .. }
            ),
            Action::Auth(a) => matches!(
                a,
                A::CheckAuthStatusRequest
                    | A::FetchCurrentUserRequest
                    | A::LoginRequest
                    | A::LogoutRequest
            ),
            Action::Team(a) => matches!(a, TeamAction::FetchTeamsRequest(_)),
            Action::Player(a) => matches!(a, PlayerAction::FetchPlayersRequest(_)),
            Action::Scoreboard(a) => matches!(a, ScoreboardAction::FetchLiveScoreboardRequest(_)),
        }
    }
}

#[derive(Debug, Clone)]
pub enum UiEvent {
    KeyPressed(KeyEvent),
    Resize,
    AppStarted,
    AnimationTick,
    /// Periodic live refresh is due.
    RefreshDue,
}
