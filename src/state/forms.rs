use crate::state::messages::{Action, MatchAction, SeriesAction};
use chrono::{Local, NaiveDate};
use cricket_api::{Match, NewMatch, NewSeries, Series, TeamSide, TossType};

pub const MAX_PLAYERS: u8 = 11;
pub const MAX_OVERS: u8 = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormKind {
    NewSeries,
    EditSeries(String),
    NewMatch { series_id: String },
    EditMatch { id: String, series_id: String },
}

impl FormKind {
    pub fn title(&self) -> &'static str {
        match self {
            FormKind::NewSeries => "New series",
            FormKind::EditSeries(_) => "Edit series",
            FormKind::NewMatch { .. } => "New match",
            FormKind::EditMatch { .. } => "Edit match",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub label: &'static str,
    pub value: String,
}

impl Field {
    fn new(label: &'static str, value: impl Into<String>) -> Self {
        Self { label, value: value.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self { field, message: message.into() }
    }
}

/// A modal create/edit form. Values are raw text until submit.
#[derive(Debug, Clone)]
pub struct FormState {
    pub kind: FormKind,
    pub fields: Vec<Field>,
    pub focus: usize,
    pub errors: Vec<FieldError>,
}

const NAME: &str = "Name";
const DESCRIPTION: &str = "Description";
const START_DATE: &str = "Start date";
const END_DATE: &str = "End date";

const MATCH_NUMBER: &str = "Match number";
const DATE: &str = "Date";
const TEAM_A: &str = "Team A";
const TEAM_B: &str = "Team B";
const TEAM_A_PLAYERS: &str = "Team A players";
const TEAM_B_PLAYERS: &str = "Team B players";
const TOTAL_OVERS: &str = "Total overs";
const TOSS_WINNER: &str = "Toss winner (A/B)";
const TOSS_TYPE: &str = "Toss (heads/tails)";
const BATTING_TEAM: &str = "Batting team (A/B)";

impl FormState {
    pub fn new_series() -> Self {
        let today = Local::now().date_naive().to_string();
        Self::with_fields(
            FormKind::NewSeries,
            vec![
                Field::new(NAME, ""),
                Field::new(DESCRIPTION, ""),
                Field::new(START_DATE, today.clone()),
                Field::new(END_DATE, today),
            ],
        )
    }

    pub fn edit_series(series: &Series) -> Self {
        Self::with_fields(
            FormKind::EditSeries(series.id.clone()),
            vec![
                Field::new(NAME, series.name.clone()),
                Field::new(DESCRIPTION, series.description.clone().unwrap_or_default()),
                Field::new(START_DATE, series.start_date.to_string()),
                Field::new(END_DATE, series.end_date.to_string()),
            ],
        )
    }

    pub fn new_match(series_id: &str) -> Self {
        Self::with_fields(
            FormKind::NewMatch { series_id: series_id.to_owned() },
            match_fields("1", &Local::now().date_naive().to_string(), "", "", "11", "11", "20", "A", "heads", "A"),
        )
    }

    pub fn edit_match(m: &Match) -> Self {
        Self::with_fields(
            FormKind::EditMatch { id: m.id.clone(), series_id: m.series_id.clone() },
            match_fields(
                &m.match_number.to_string(),
                &m.date.to_string(),
                &m.team_a,
                &m.team_b,
                &m.team_a_player_count.to_string(),
                &m.team_b_player_count.to_string(),
                &m.total_overs.to_string(),
                side_label(m.toss_winner),
                toss_label(m.toss_type),
                side_label(m.batting_team),
            ),
        )
    }

    fn with_fields(kind: FormKind, fields: Vec<Field>) -> Self {
        Self { kind, fields, focus: 0, errors: Vec::new() }
    }

    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % self.fields.len().max(1);
    }

    pub fn focus_prev(&mut self) {
        let len = self.fields.len().max(1);
        self.focus = (self.focus + len - 1) % len;
    }

    pub fn push_char(&mut self, c: char) {
        if let Some(field) = self.fields.get_mut(self.focus) {
            field.value.push(c);
        }
    }

    pub fn pop_char(&mut self) {
        if let Some(field) = self.fields.get_mut(self.focus) {
            field.value.pop();
        }
    }

    pub fn error_for(&self, label: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == label)
            .map(|e| e.message.as_str())
    }

    fn value(&self, label: &str) -> &str {
        self.fields
            .iter()
            .find(|f| f.label == label)
            .map(|f| f.value.trim())
            .unwrap_or_default()
    }

    /// Validate and build the request intent. On failure the per-field
    /// errors are kept on the form and nothing is dispatched.
    pub fn submit(&mut self) -> Option<Action> {
        let result = match &self.kind {
            FormKind::NewSeries => validate_series(self)
                .map(|series| Action::Series(SeriesAction::CreateSeriesRequest(series))),
            FormKind::EditSeries(id) => validate_series(self)
                .map(|series| Action::Series(SeriesAction::UpdateSeriesRequest { id: id.clone(), series })),
            FormKind::NewMatch { series_id } => validate_match(self, series_id)
                .map(|new_match| Action::Match(MatchAction::CreateMatchRequest(new_match))),
            FormKind::EditMatch { id, series_id } => validate_match(self, series_id).map(|new_match| {
                Action::Match(MatchAction::UpdateMatchRequest { id: id.clone(), new_match })
            }),
        };
        match result {
            Ok(action) => {
                self.errors.clear();
                Some(action)
            }
            Err(errors) => {
                self.errors = errors;
                None
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn match_fields(
    number: &str,
    date: &str,
    team_a: &str,
    team_b: &str,
    a_players: &str,
    b_players: &str,
    overs: &str,
    toss_winner: &str,
    toss_type: &str,
    batting: &str,
) -> Vec<Field> {
    vec![
        Field::new(MATCH_NUMBER, number),
        Field::new(DATE, date),
        Field::new(TEAM_A, team_a),
        Field::new(TEAM_B, team_b),
        Field::new(TEAM_A_PLAYERS, a_players),
        Field::new(TEAM_B_PLAYERS, b_players),
        Field::new(TOTAL_OVERS, overs),
        Field::new(TOSS_WINNER, toss_winner),
        Field::new(TOSS_TYPE, toss_type),
        Field::new(BATTING_TEAM, batting),
    ]
}

fn side_label(side: TeamSide) -> &'static str {
    match side {
        TeamSide::A => "A",
        TeamSide::B => "B",
    }
}

fn toss_label(toss: TossType) -> &'static str {
    match toss {
        TossType::Heads => "heads",
        TossType::Tails => "tails",
    }
}

fn parse_date(form: &FormState, label: &'static str, errors: &mut Vec<FieldError>) -> Option<NaiveDate> {
    let raw = form.value(label);
    if raw.is_empty() {
        errors.push(FieldError::new(label, format!("{label} is required")));
        return None;
    }
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(_) => {
            errors.push(FieldError::new(label, "Use YYYY-MM-DD"));
            None
        }
    }
}

fn parse_in_range(
    form: &FormState,
    label: &'static str,
    min: u32,
    max: u32,
    errors: &mut Vec<FieldError>,
) -> Option<u32> {
    match form.value(label).parse::<u32>() {
        Ok(n) if (min..=max).contains(&n) => Some(n),
        _ if max == u32::MAX => {
            errors.push(FieldError::new(label, format!("Must be at least {min}")));
            None
        }
        _ => {
            errors.push(FieldError::new(label, format!("Must be between {min} and {max}")));
            None
        }
    }
}

fn parse_side(form: &FormState, label: &'static str, errors: &mut Vec<FieldError>) -> Option<TeamSide> {
    match form.value(label).to_ascii_uppercase().as_str() {
        "A" => Some(TeamSide::A),
        "B" => Some(TeamSide::B),
        _ => {
            errors.push(FieldError::new(label, "Choose A or B"));
            None
        }
    }
}

pub fn validate_series(form: &FormState) -> Result<NewSeries, Vec<FieldError>> {
    let mut errors = Vec::new();

    let name = form.value(NAME);
    if name.is_empty() {
        errors.push(FieldError::new(NAME, "Name is required"));
    }
    let start = parse_date(form, START_DATE, &mut errors);
    let end = parse_date(form, END_DATE, &mut errors);
    if let (Some(start), Some(end)) = (start, end)
        && end < start
    {
        errors.push(FieldError::new(END_DATE, "End date cannot be before start date"));
    }

    match (start, end) {
        (Some(start_date), Some(end_date)) if errors.is_empty() => {
            let description = form.value(DESCRIPTION);
            Ok(NewSeries {
                name: name.to_owned(),
                description: (!description.is_empty()).then(|| description.to_owned()),
                start_date,
                end_date,
                status: None,
            })
        }
        _ => Err(errors),
    }
}

pub fn validate_match(form: &FormState, series_id: &str) -> Result<NewMatch, Vec<FieldError>> {
    let mut errors = Vec::new();

    if series_id.trim().is_empty() {
        errors.push(FieldError::new("Series", "Series is required"));
    }
    let match_number = parse_in_range(form, MATCH_NUMBER, 1, u32::MAX, &mut errors);
    let date = parse_date(form, DATE, &mut errors);
    for label in [TEAM_A, TEAM_B] {
        if form.value(label).is_empty() {
            errors.push(FieldError::new(label, format!("{label} is required")));
        }
    }
    let a_players = parse_in_range(form, TEAM_A_PLAYERS, 1, u32::from(MAX_PLAYERS), &mut errors);
    let b_players = parse_in_range(form, TEAM_B_PLAYERS, 1, u32::from(MAX_PLAYERS), &mut errors);
    let overs = parse_in_range(form, TOTAL_OVERS, 1, u32::from(MAX_OVERS), &mut errors);
    let toss_winner = parse_side(form, TOSS_WINNER, &mut errors);
    let toss_type = match form.value(TOSS_TYPE).to_ascii_lowercase().as_str() {
        "heads" => Some(TossType::Heads),
        "tails" => Some(TossType::Tails),
        _ => {
            errors.push(FieldError::new(TOSS_TYPE, "Choose heads or tails"));
            None
        }
    };
    let batting_team = parse_side(form, BATTING_TEAM, &mut errors);

    if !errors.is_empty() {
        return Err(errors);
    }
    match (match_number, date, a_players, b_players, overs, toss_winner, toss_type, batting_team) {
        (Some(number), Some(date), Some(a), Some(b), Some(overs), Some(toss_winner), Some(toss_type), Some(batting_team)) => {
            Ok(NewMatch {
                series_id: series_id.to_owned(),
                match_number: Some(number),
                date,
                status: None,
                team_a: form.value(TEAM_A).to_owned(),
                team_b: form.value(TEAM_B).to_owned(),
                team_a_player_count: a as u8,
                team_b_player_count: b as u8,
                total_overs: overs as u8,
                toss_winner,
                toss_type,
                batting_team,
            })
        }
        _ => Err(errors),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(form: &mut FormState, label: &str, value: &str) {
        let field = form.fields.iter_mut().find(|f| f.label == label).unwrap();
        field.value = value.into();
    }

    #[test]
    fn ashes_series_submits_create_request() {
        let mut form = FormState::new_series();
        set(&mut form, NAME, "  Ashes ");
        set(&mut form, START_DATE, "2024-01-01");
        set(&mut form, END_DATE, "2024-01-31");

        let Some(Action::Series(SeriesAction::CreateSeriesRequest(series))) = form.submit() else {
            panic!("expected create request");
        };
        assert_eq!(series.name, "Ashes");
        assert_eq!(series.description, None);
        assert_eq!(series.end_date.to_string(), "2024-01-31");
    }

    #[test]
    fn series_errors_are_per_field_and_block_submit() {
        let mut form = FormState::new_series();
        set(&mut form, START_DATE, "2024-02-01");
        set(&mut form, END_DATE, "2024-01-01");

        assert!(form.submit().is_none());
        assert_eq!(form.error_for(NAME), Some("Name is required"));
        assert_eq!(form.error_for(END_DATE), Some("End date cannot be before start date"));
        assert_eq!(form.error_for(START_DATE), None);

        set(&mut form, START_DATE, "01/02/2024");
        form.submit();
        assert_eq!(form.error_for(START_DATE), Some("Use YYYY-MM-DD"));
    }

    #[test]
    fn match_ranges_are_enforced() {
        let mut form = FormState::new_match("s1");
        set(&mut form, TEAM_A, "Lions");
        set(&mut form, TEAM_B, "Tigers");
        set(&mut form, TEAM_A_PLAYERS, "12");
        set(&mut form, TOTAL_OVERS, "0");
        set(&mut form, MATCH_NUMBER, "0");
        set(&mut form, TOSS_TYPE, "edge");

        assert!(form.submit().is_none());
        assert_eq!(form.error_for(TEAM_A_PLAYERS), Some("Must be between 1 and 11"));
        assert_eq!(form.error_for(TOTAL_OVERS), Some("Must be between 1 and 20"));
        assert_eq!(form.error_for(MATCH_NUMBER), Some("Must be at least 1"));
        assert_eq!(form.error_for(TOSS_TYPE), Some("Choose heads or tails"));
        assert_eq!(form.error_for(TEAM_B_PLAYERS), None);
    }

    #[test]
    fn valid_match_keeps_auto_number_for_client_to_strip() {
        let mut form = FormState::new_match("s1");
        set(&mut form, DATE, "2024-01-05");
        set(&mut form, TEAM_A, "Lions");
        set(&mut form, TEAM_B, "Tigers");
        set(&mut form, TOSS_WINNER, "b");
        set(&mut form, BATTING_TEAM, "A");

        let Some(Action::Match(MatchAction::CreateMatchRequest(m))) = form.submit() else {
            panic!("expected create match");
        };
        assert_eq!(m.match_number, Some(1));
        assert_eq!(m.series_id, "s1");
        assert_eq!(m.toss_winner, TeamSide::B);
        assert_eq!((m.team_a_player_count, m.total_overs), (11, 20));
    }

    #[test]
    fn edit_series_prefills_and_updates_by_id() {
        let series = Series {
            id: "s9".into(),
            name: "Ashes".into(),
            description: Some("Old rivals".into()),
            start_date: "2024-01-01".parse().unwrap(),
            end_date: "2024-01-31".parse().unwrap(),
            status: Default::default(),
            created_by: None,
        };
        let mut form = FormState::edit_series(&series);
        set(&mut form, NAME, "The Ashes");
        let Some(Action::Series(SeriesAction::UpdateSeriesRequest { id, series })) = form.submit() else {
            panic!("expected update");
        };
        assert_eq!(id, "s9");
        assert_eq!(series.name, "The Ashes");
        assert_eq!(series.description.as_deref(), Some("Old rivals"));
    }

    #[test]
    fn typing_edits_focused_field() {
        let mut form = FormState::new_series();
        form.push_char('A');
        form.push_char('x');
        form.pop_char();
        assert_eq!(form.fields[0].value, "A");
        form.focus_prev();
        assert_eq!(form.focus, form.fields.len() - 1);
        form.focus_next();
        assert_eq!(form.focus, 0);
    }
}
