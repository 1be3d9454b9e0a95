use crate::state::messages::{Action, ScorecardAction};
use cricket_api::{BallEvent, BallType, MatchStatus, ScorecardResponse, ScorecardStatus, Series};
use std::fmt;
use std::time::{Duration, Instant};

pub const ADVISORY_TTL: Duration = Duration::from_secs(3);
pub const MAX_BYES: u8 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WicketKind {
    Bowled,
    Caught,
    Lbw,
    RunOut,
    Stumped,
    HitWicket,
}

impl WicketKind {
    pub const ALL: [WicketKind; 6] = [
        WicketKind::Bowled,
        WicketKind::Caught,
        WicketKind::Lbw,
        WicketKind::RunOut,
        WicketKind::Stumped,
        WicketKind::HitWicket,
    ];

    /// Dismissal label as the server stores it.
    pub fn label(&self) -> &'static str {
        match self {
            WicketKind::Bowled => "bowled",
            WicketKind::Caught => "caught",
            WicketKind::Lbw => "lbw",
            WicketKind::RunOut => "run_out",
            WicketKind::Stumped => "stumped",
            WicketKind::HitWicket => "hit_wicket",
        }
    }
}

/// One button on the scoring pad.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoringAction {
    /// Runs off the bat, 0..=6.
    Runs(u8),
    Wide,
    NoBall,
    DeadBall,
    LegByes(u8),
    Wicket(WicketKind),
}

impl ScoringAction {
    pub fn to_ball_event(self, match_id: &str, innings_number: u8, byes: u8) -> BallEvent {
        let (ball_type, run_type, runs, wicket) = match self {
            ScoringAction::Runs(n) => (BallType::Good, n.min(6).to_string(), u32::from(n.min(6)), None),
            ScoringAction::Wide => (BallType::Wide, "WD".to_owned(), 1, None),
            ScoringAction::NoBall => (BallType::NoBall, "NB".to_owned(), 1, None),
            ScoringAction::DeadBall => (BallType::DeadBall, "DB".to_owned(), 0, None),
            ScoringAction::LegByes(n) => (BallType::Good, "LB".to_owned(), u32::from(n), None),
            ScoringAction::Wicket(kind) => (BallType::Good, "WC".to_owned(), 0, Some(kind)),
        };
        BallEvent {
            match_id: match_id.to_owned(),
            innings_number,
            ball_type,
            run_type,
            runs,
            byes: u32::from(byes),
            is_wicket: wicket.is_some(),
            wicket_type: wicket.map(|w| w.label().to_owned()),
        }
    }
}

/// Byes attached to the next ball, 0..=4.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ByesStepper(u8);

impl ByesStepper {
    pub fn value(&self) -> u8 {
        self.0
    }

    pub fn increment(&mut self) {
        self.0 = (self.0 + 1).min(MAX_BYES);
    }

    pub fn decrement(&mut self) {
        self.0 = self.0.saturating_sub(1);
    }

    /// Current value, resetting the stepper to zero.
    pub fn take(&mut self) -> u8 {
        std::mem::take(&mut self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardViolation {
    NotSignedIn,
    NotOwner,
    MatchCompleted,
    InningsCompleted,
    NotStarted,
    NothingToUndo,
}

impl fmt::Display for GuardViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            GuardViolation::NotSignedIn => "Sign in to score this match",
            GuardViolation::NotOwner => "Only the series owner can score this match",
            GuardViolation::MatchCompleted => "This match is already completed",
            GuardViolation::InningsCompleted => "Both innings are already completed",
            GuardViolation::NotStarted => "Start scoring before recording balls",
            GuardViolation::NothingToUndo => "The first ball of an innings cannot be undone",
        };
        f.write_str(msg)
    }
}

/// Transient message shown over the scoring pad.
#[derive(Debug, Clone, PartialEq)]
pub struct Advisory {
    pub message: String,
    raised_at: Instant,
}

impl Advisory {
    pub fn new(message: impl Into<String>, now: Instant) -> Self {
        Self { message: message.into(), raised_at: now }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now.duration_since(self.raised_at) >= ADVISORY_TTL
    }
}

/// What the guards look at. Built from the store each time a key is pressed.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoringContext<'a> {
    pub user_id: Option<&'a str>,
    pub series: Option<&'a Series>,
    pub match_status: Option<MatchStatus>,
    pub scorecard: Option<&'a ScorecardResponse>,
}

impl ScoringContext<'_> {
    fn match_completed(&self) -> bool {
        self.match_status == Some(MatchStatus::Completed)
            || self
                .scorecard
                .is_some_and(|s| s.match_status == ScorecardStatus::Completed)
    }
}

/// Ownership, match status and innings status, in that order.
pub fn check_scoring_allowed(ctx: &ScoringContext) -> Result<(), GuardViolation> {
    let Some(user_id) = ctx.user_id else {
        return Err(GuardViolation::NotSignedIn);
    };
    if !ctx.series.is_some_and(|s| s.is_owned_by(user_id)) {
        return Err(GuardViolation::NotOwner);
    }
    if ctx.match_completed() {
        return Err(GuardViolation::MatchCompleted);
    }
    if ctx.scorecard.is_some_and(|s| s.both_innings_completed()) {
        return Err(GuardViolation::InningsCompleted);
    }
    Ok(())
}

/// Scoring guards plus: the current innings must hold more than one ball.
pub fn check_undo_allowed(ctx: &ScoringContext) -> Result<u8, GuardViolation> {
    check_scoring_allowed(ctx)?;
    let innings = ctx
        .scorecard
        .and_then(|s| s.current_innings())
        .ok_or(GuardViolation::NotStarted)?;
    if innings.is_first_ball_of_innings() {
        return Err(GuardViolation::NothingToUndo);
    }
    Ok(innings.innings_number)
}

/// Second-key menus on the scoring pad.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Picker {
    Wicket,
    LegByes,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    Open,
    BallInFlight,
}

/// Client-local state of the scoring pad. Methods return the intent to
/// dispatch, or `None` when a guard short-circuited.
#[derive(Debug, Default)]
pub struct LiveScoringView {
    pub phase: Phase,
    pub byes: ByesStepper,
    pub advisory: Option<Advisory>,
    pub picker: Option<Picker>,
}

impl LiveScoringView {
    pub fn open(&mut self) {
        if self.phase == Phase::Idle {
            self.phase = Phase::Open;
        }
    }

    pub fn close(&mut self) {
        *self = Self::default();
    }

    pub fn is_open(&self) -> bool {
        self.phase != Phase::Idle
    }

    pub fn start_scoring(&mut self, ctx: &ScoringContext, now: Instant) -> Option<Action> {
        if let Err(violation) = check_scoring_allowed(ctx) {
            self.advise(violation, now);
            return None;
        }
        let match_id = ctx.scorecard?.match_id.clone();
        Some(Action::Scorecard(ScorecardAction::StartScoringRequest(match_id)))
    }

    pub fn score(&mut self, ctx: &ScoringContext, action: ScoringAction, now: Instant) -> Option<Action> {
        if self.phase != Phase::Open {
            return None;
        }
        self.picker = None;
        if let Err(violation) = check_scoring_allowed(ctx) {
            self.advise(violation, now);
            return None;
        }
        let Some((match_id, innings_number)) = ctx
            .scorecard
            .and_then(|s| s.current_innings().map(|i| (s.match_id.as_str(), i.innings_number)))
        else {
            self.advise(GuardViolation::NotStarted, now);
            return None;
        };

        let ball = action.to_ball_event(match_id, innings_number, self.byes.take());
        self.phase = Phase::BallInFlight;
        Some(Action::Scorecard(ScorecardAction::AddBallRequest(ball)))
    }

    pub fn undo(&mut self, ctx: &ScoringContext, now: Instant) -> Option<Action> {
        if self.phase != Phase::Open {
            return None;
        }
        match check_undo_allowed(ctx) {
            Ok(innings_number) => Some(Action::Scorecard(ScorecardAction::UndoBallRequest {
                match_id: ctx.scorecard?.match_id.clone(),
                innings_number,
            })),
            Err(violation) => {
                self.advise(violation, now);
                None
            }
        }
    }

    /// The in-flight ball got its success or failure.
    pub fn on_ball_settled(&mut self) {
        if self.phase == Phase::BallInFlight {
            self.phase = Phase::Open;
        }
    }

    pub fn toggle_picker(&mut self, picker: Picker) {
        self.picker = if self.picker == Some(picker) { None } else { Some(picker) };
    }

    pub fn tick(&mut self, now: Instant) {
        if self.advisory.as_ref().is_some_and(|a| a.is_expired(now)) {
            self.advisory = None;
        }
    }

    fn advise(&mut self, violation: GuardViolation, now: Instant) {
        self.advisory = Some(Advisory::new(violation.to_string(), now));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cricket_api::{BallSummary, InningsStatus, InningsSummary, OverSummary};

    fn series(owner: &str) -> Series {
        Series {
            id: "s1".into(),
            name: "Ashes".into(),
            description: None,
            start_date: "2024-01-01".parse().unwrap(),
            end_date: "2024-01-31".parse().unwrap(),
            status: Default::default(),
            created_by: Some(owner.into()),
        }
    }

    fn innings_with_balls(n: u8, balls: usize, status: InningsStatus) -> InningsSummary {
        InningsSummary {
            innings_number: n,
            batting_team: "Lions".into(),
            status,
            overs: vec![OverSummary {
                over_number: 1,
                balls: (1..=balls as u32)
                    .map(|b| BallSummary { ball_number: b, run_type: "1".into(), runs: 1, ..Default::default() })
                    .collect(),
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    fn scorecard(innings: Vec<InningsSummary>) -> ScorecardResponse {
        ScorecardResponse {
            match_id: "m1".into(),
            series_id: "s1".into(),
            team_a: "Lions".into(),
            team_b: "Tigers".into(),
            total_overs: 20,
            current_innings: innings.last().map(|i| i.innings_number).unwrap_or(1),
            match_status: ScorecardStatus::Live,
            innings: Some(innings),
            ..Default::default()
        }
    }

    fn ctx<'a>(series: &'a Series, card: &'a ScorecardResponse) -> ScoringContext<'a> {
        ScoringContext {
            user_id: Some("owner"),
            series: Some(series),
            match_status: Some(MatchStatus::Live),
            scorecard: Some(card),
        }
    }

    #[test]
    fn wicket_sets_wc_and_carries_label() {
        let ball = ScoringAction::Wicket(WicketKind::RunOut).to_ball_event("m1", 2, 0);
        assert!(ball.is_wicket);
        assert_eq!(ball.run_type, "WC");
        assert_eq!(ball.ball_type, BallType::Good);
        assert_eq!(ball.wicket_type.as_deref(), Some("run_out"));
    }

    #[test]
    fn extras_map_to_their_codes() {
        assert_eq!(ScoringAction::Wide.to_ball_event("m1", 1, 0).run_type, "WD");
        assert_eq!(ScoringAction::NoBall.to_ball_event("m1", 1, 0).ball_type, BallType::NoBall);
        let lb = ScoringAction::LegByes(2).to_ball_event("m1", 1, 0);
        assert_eq!((lb.run_type.as_str(), lb.runs, lb.is_wicket), ("LB", 2, false));
    }

    #[test]
    fn byes_stepper_clamps_and_resets_on_take() {
        let mut byes = ByesStepper::default();
        for _ in 0..7 {
            byes.increment();
        }
        assert_eq!(byes.value(), 4);
        assert_eq!(byes.take(), 4);
        assert_eq!(byes.value(), 0);
        byes.decrement();
        assert_eq!(byes.value(), 0);
    }

    #[test]
    fn scoring_a_four_submits_good_ball_and_enters_flight() {
        let series = series("owner");
        let card = scorecard(vec![innings_with_balls(1, 1, InningsStatus::InProgress)]);
        let mut view = LiveScoringView::default();
        view.open();

        let intent = view.score(&ctx(&series, &card), ScoringAction::Runs(4), Instant::now());

        let Some(Action::Scorecard(ScorecardAction::AddBallRequest(ball))) = intent else {
            panic!("expected add ball, got {intent:?}");
        };
        assert_eq!(ball.ball_type, BallType::Good);
        assert_eq!(ball.run_type, "4");
        assert_eq!((ball.runs, ball.byes, ball.is_wicket), (4, 0, false));
        assert_eq!(ball.wicket_type, None);
        assert_eq!(view.phase, Phase::BallInFlight);

        // A second key press while the ball is in flight is ignored.
        assert!(view.score(&ctx(&series, &card), ScoringAction::Runs(1), Instant::now()).is_none());
        view.on_ball_settled();
        assert_eq!(view.phase, Phase::Open);
    }

    #[test]
    fn byes_are_consumed_by_the_next_ball() {
        let series = series("owner");
        let card = scorecard(vec![innings_with_balls(1, 3, InningsStatus::InProgress)]);
        let mut view = LiveScoringView::default();
        view.open();
        view.byes.increment();
        view.byes.increment();

        let Some(Action::Scorecard(ScorecardAction::AddBallRequest(ball))) =
            view.score(&ctx(&series, &card), ScoringAction::Runs(0), Instant::now())
        else {
            panic!("expected add ball");
        };
        assert_eq!(ball.byes, 2);
        assert_eq!(view.byes.value(), 0);
    }

    #[test]
    fn undo_with_one_ball_is_blocked_with_advisory() {
        let series = series("owner");
        let card = scorecard(vec![innings_with_balls(1, 1, InningsStatus::InProgress)]);
        let mut view = LiveScoringView::default();
        view.open();

        assert!(view.undo(&ctx(&series, &card), Instant::now()).is_none());
        assert_eq!(
            view.advisory.as_ref().map(|a| a.message.as_str()),
            Some("The first ball of an innings cannot be undone")
        );
    }

    #[test]
    fn undo_with_two_balls_targets_current_innings() {
        let series = series("owner");
        let card = scorecard(vec![
            innings_with_balls(1, 6, InningsStatus::Completed),
            innings_with_balls(2, 2, InningsStatus::InProgress),
        ]);
        let mut view = LiveScoringView::default();
        view.open();
        assert_eq!(
            view.undo(&ctx(&series, &card), Instant::now()),
            Some(Action::Scorecard(ScorecardAction::UndoBallRequest { match_id: "m1".into(), innings_number: 2 }))
        );
    }

    #[test]
    fn non_owner_is_advised_without_intent() {
        let series = series("someone-else");
        let card = scorecard(vec![innings_with_balls(1, 3, InningsStatus::InProgress)]);
        let mut view = LiveScoringView::default();
        view.open();
        view.byes.increment();

        assert!(view.score(&ctx(&series, &card), ScoringAction::Runs(1), Instant::now()).is_none());
        assert_eq!(view.phase, Phase::Open);
        assert_eq!(view.byes.value(), 1);
        assert!(view.advisory.is_some());
    }

    #[test]
    fn completed_match_and_innings_block_scoring() {
        let series = series("owner");
        let done = scorecard(vec![
            innings_with_balls(1, 6, InningsStatus::Completed),
            innings_with_balls(2, 6, InningsStatus::Completed),
        ]);
        assert_eq!(check_scoring_allowed(&ctx(&series, &done)), Err(GuardViolation::InningsCompleted));

        let live = scorecard(vec![innings_with_balls(1, 2, InningsStatus::InProgress)]);
        let mut completed = ctx(&series, &live);
        completed.match_status = Some(MatchStatus::Completed);
        assert_eq!(check_scoring_allowed(&completed), Err(GuardViolation::MatchCompleted));

        let mut anonymous = ctx(&series, &live);
        anonymous.user_id = None;
        assert_eq!(check_scoring_allowed(&anonymous), Err(GuardViolation::NotSignedIn));
    }

    #[test]
    fn start_scoring_on_unstarted_match() {
        let series = series("owner");
        let mut card = scorecard(vec![]);
        card.innings = None;
        let mut view = LiveScoringView::default();
        assert_eq!(
            view.start_scoring(&ctx(&series, &card), Instant::now()),
            Some(Action::Scorecard(ScorecardAction::StartScoringRequest("m1".into())))
        );
    }

    #[test]
    fn advisory_expires_after_ttl() {
        let series = series("nobody");
        let card = scorecard(vec![innings_with_balls(1, 3, InningsStatus::InProgress)]);
        let mut view = LiveScoringView::default();
        view.open();
        let t0 = Instant::now();
        view.score(&ctx(&series, &card), ScoringAction::Runs(1), t0);

        view.tick(t0 + Duration::from_secs(1));
        assert!(view.advisory.is_some());
        view.tick(t0 + ADVISORY_TTL);
        assert!(view.advisory.is_none());
    }
}
