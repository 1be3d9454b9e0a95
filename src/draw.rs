use tui::backend::Backend;
use tui::layout::{Alignment, Constraint, Layout, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Block, BorderType, Borders, Clear, List, ListItem, ListState, Paragraph, Tabs, Wrap};
use tui::{Frame, Terminal};
use tui_logger::TuiLoggerWidget;

use crate::app::{App, MenuItem};
use crate::components::scorecard::{ScorecardView, over_strip, scorecard_lines};
use crate::state::app_state::ERROR_CHAR;
use crate::state::forms::FormState;
use crate::state::scoring::{Phase, Picker, WicketKind};
use crate::ui::layout::LayoutAreas;

static TABS: &[&str; 5] = &["Series", "Matches", "Scorecard", "Scoreboard", "Account"];

const HELP_TEXT: &str = "\
Global     1-5 tabs  r refresh  f full screen  \" logs  ? help  q quit
Series     j/k move  Enter matches  n new  e edit  d delete
Matches    j/k move  Enter scorecard  a all matches  n new  e edit  d delete
Scorecard  j/k scroll  s start scoring  l scoring pad  t next team  Esc back
Scoring    0-6 runs  w wide  n no ball  . dead ball  g leg byes  x wicket
           +/- byes  u undo  l/Esc close pad
Account    i sign in  o sign out";

pub fn draw<B>(terminal: &mut Terminal<B>, app: &mut App)
where
    B: Backend,
{
    let current_size = terminal.size().unwrap_or_default();
    if current_size.width <= 10 || current_size.height <= 10 {
        return;
    }

    let mut layout = LayoutAreas::new(current_size);

    let result = terminal.draw(|f| {
        layout.update(f.area(), app.settings.full_screen, app.state.show_logs);

        if !app.settings.full_screen {
            draw_tabs(f, layout.tab_bar, app);
        }

        match app.state.active_tab {
            MenuItem::Series => draw_series(f, layout.main, app),
            MenuItem::Matches => draw_matches(f, layout.main, app),
            MenuItem::Scorecard => draw_scorecard(f, layout.main, app),
            MenuItem::Scoreboard => draw_scoreboard(f, layout.main, app),
            MenuItem::Account => draw_account(f, layout.main, app),
            MenuItem::Help => draw_help(f, layout.main),
        }

        if let Some(logs) = layout.logs {
            draw_logs(f, logs);
        }
        if let Some(form) = app.state.form.as_ref() {
            draw_form(f, f.area(), form, app.store.state.series.error.as_deref().or(app.store.state.matches.error.as_deref()));
        }
        if let Some(pending) = app.state.pending_delete.as_ref() {
            draw_popup(f, f.area(), " Confirm ", &pending.prompt(), Color::Red);
        }

        draw_loading_spinner(f, f.area(), app);
    });
    if let Err(e) = result {
        log::error!("draw failed: {e}");
    }
}

pub fn default_border<'a>(color: Color) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
}

fn draw_tabs(f: &mut Frame, tab_bar: [Rect; 2], app: &App) {
    let style = Style::default().fg(Color::White);
    let border_type = BorderType::Rounded;

    let tab_index = match app.state.active_tab {
        MenuItem::Series => 0,
        MenuItem::Matches => 1,
        MenuItem::Scorecard => 2,
        MenuItem::Scoreboard => 3,
        MenuItem::Account => 4,
        MenuItem::Help => 0,
    };

    let titles: Vec<Line> = TABS.iter().map(|t| Line::from(*t)).collect();
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::LEFT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .highlight_style(Style::default().add_modifier(Modifier::UNDERLINED))
        .select(tab_index)
        .style(style);
    f.render_widget(tabs, tab_bar[0]);

    let help = Paragraph::new("Help: ? ")
        .alignment(Alignment::Right)
        .block(
            Block::default()
                .borders(Borders::RIGHT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .style(style);
    f.render_widget(help, tab_bar[1]);
}

/// Centered message inside an already-drawn block.
fn draw_notice(f: &mut Frame, area: Rect, msg: &str, color: Color) {
    f.render_widget(
        Paragraph::new(msg.to_string())
            .style(Style::default().fg(color))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        area,
    );
}

fn error_line(error: Option<&str>) -> Option<Line<'static>> {
    error.map(|e| Line::styled(format!("Error: {e}  (r to retry)"), Style::default().fg(Color::Red)))
}

fn draw_series(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Series ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let slice = &app.store.state.series;
    let [status, content] = Layout::vertical([Constraint::Length(1), Constraint::Fill(1)]).areas(inner);
    f.render_widget(
        Paragraph::new(error_line(slice.error.as_deref()).unwrap_or_else(|| {
            Line::styled("Enter=matches  n=new  e=edit  d=delete", Style::default().fg(Color::DarkGray))
        })),
        status,
    );

    if slice.items.is_empty() {
        let msg = if slice.loading { "Loading series..." } else { "No series yet. Press n to create one." };
        draw_notice(f, content, msg, Color::DarkGray);
        return;
    }

    let user_id = app.store.state.auth.user_id();
    let items: Vec<ListItem> = slice
        .items
        .iter()
        .map(|s| {
            let owned = user_id.is_some_and(|id| s.is_owned_by(id));
            ListItem::new(Line::from(vec![
                Span::raw(format!("{:<30} ", s.name)),
                Span::styled(format!("{} to {}  ", s.start_date, s.end_date), Style::default().fg(Color::Gray)),
                Span::styled(s.status.label(), Style::default().fg(Color::Cyan)),
                Span::styled(if owned { "  (yours)" } else { "" }, Style::default().fg(Color::Green)),
            ]))
        })
        .collect();
    draw_list(f, content, items, app.state.series_cursor.selected);
}

fn draw_list(f: &mut Frame, area: Rect, items: Vec<ListItem>, selected: usize) {
    let list = List::new(items)
        .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");
    let mut state = ListState::default().with_selected(Some(selected));
    f.render_stateful_widget(list, area, &mut state);
}

fn draw_matches(f: &mut Frame, area: Rect, app: &App) {
    let slice = &app.store.state.matches;
    let title = match slice.series_id.as_deref().and_then(|id| app.store.state.series.get(id)) {
        Some(series) => format!(" Matches: {} ", series.name),
        None => " Matches: all ".to_string(),
    };
    let block = default_border(Color::White).title(title);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let [status, content] = Layout::vertical([Constraint::Length(1), Constraint::Fill(1)]).areas(inner);
    f.render_widget(
        Paragraph::new(error_line(slice.error.as_deref()).unwrap_or_else(|| {
            Line::styled(
                "Enter=scorecard  a=all  n=new  e=edit  d=delete",
                Style::default().fg(Color::DarkGray),
            )
        })),
        status,
    );

    if slice.items.is_empty() {
        let msg = if slice.loading { "Loading matches..." } else { "No matches" };
        draw_notice(f, content, msg, Color::DarkGray);
        return;
    }

    let items: Vec<ListItem> = slice
        .items
        .iter()
        .map(|m| {
            let status_color = match m.status {
                cricket_api::MatchStatus::Live => Color::Green,
                cricket_api::MatchStatus::Completed => Color::DarkGray,
                cricket_api::MatchStatus::Cancelled => Color::Red,
            };
            ListItem::new(Line::from(vec![
                Span::raw(format!("#{:<3} {}  ", m.match_number, m.date)),
                Span::raw(format!("{} v {}  ", m.team_a, m.team_b)),
                Span::styled(format!("{} ov  ", m.total_overs), Style::default().fg(Color::Gray)),
                Span::styled(format!("{:?}", m.status), Style::default().fg(status_color)),
            ]))
        })
        .collect();
    draw_list(f, content, items, app.state.match_cursor.selected);
}

fn draw_scorecard(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Scorecard ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let slice = &app.store.state.scorecard;
    let Some(card) = slice.scorecard.as_ref() else {
        let msg = match (slice.error.as_deref(), app.state.open_match_id.is_some()) {
            (Some(e), _) => format!("Scorecard load failed:\n{e}\n\nPress r to retry"),
            (None, true) => "Loading scorecard...".to_string(),
            (None, false) => "Select a match on the Matches tab and press Enter".to_string(),
        };
        draw_notice(f, inner, &msg, Color::DarkGray);
        return;
    };

    let pad_height = if app.state.scoring.is_open() { 8 } else { 1 };
    let [body, footer] = Layout::vertical([Constraint::Fill(1), Constraint::Length(pad_height)]).areas(inner);

    let (card_area, roster_area) = if body.width >= 90 {
        let [left, right] = Layout::horizontal([Constraint::Fill(1), Constraint::Length(28)]).areas(body);
        (left, Some(right))
    } else {
        (body, None)
    };

    f.render_widget(ScorecardView { card, scroll: app.state.scorecard_scroll }, card_area);
    if let Some(roster) = roster_area {
        draw_roster(f, roster, app);
    }

    if app.state.scoring.is_open() {
        draw_scoring_pad(f, footer, app);
    } else {
        let hint = error_line(slice.error.as_deref()).unwrap_or_else(|| {
            let text = if card.is_started() { "l=scoring pad  t=next team  r=refresh" } else { "s=start scoring  r=refresh" };
            Line::styled(text, Style::default().fg(Color::DarkGray))
        });
        f.render_widget(Paragraph::new(hint), footer);
    }
}

fn draw_roster(f: &mut Frame, area: Rect, app: &App) {
    let teams = app.store.state.teams.teams();
    let title = teams
        .get(app.state.team_cursor.selected)
        .map(|t| format!(" {} ", t.name))
        .unwrap_or_else(|| " Players ".to_string());
    let block = default_border(Color::DarkGray).title(title);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let players = &app.store.state.players.0;
    if let Some(e) = players.error.as_deref() {
        draw_notice(f, inner, e, Color::Red);
        return;
    }
    let lines: Vec<Line> = players.items.iter().map(|p| Line::from(p.name.clone())).collect();
    if lines.is_empty() {
        draw_notice(f, inner, if players.loading { "Loading..." } else { "No players" }, Color::DarkGray);
        return;
    }
    f.render_widget(Paragraph::new(lines), inner);
}

fn draw_scoring_pad(f: &mut Frame, area: Rect, app: &App) {
    let view = &app.state.scoring;
    let color = if view.phase == Phase::BallInFlight { Color::DarkGray } else { Color::Yellow };
    let block = default_border(color).title(" Live scoring ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let mut lines = Vec::new();
    if let Some(over) = app
        .store
        .state
        .scorecard
        .scorecard
        .as_ref()
        .and_then(|card| card.current_innings())
        .and_then(|innings| innings.last_over())
    {
        lines.push(Line::styled(over_strip(over), Style::default().add_modifier(Modifier::BOLD)));
    }
    lines.extend([
        Line::from("0-6 runs   w wide   n no ball   . dead ball   g leg byes   x wicket"),
        Line::from(format!("+/- byes: {}   u undo   l close", view.byes.value())),
    ]);
    match view.picker {
        Some(Picker::Wicket) => {
            let kinds: Vec<String> = WicketKind::ALL
                .iter()
                .enumerate()
                .map(|(i, k)| format!("{} {}", i + 1, k.label()))
                .collect();
            lines.push(Line::styled(format!("Wicket: {}", kinds.join("  ")), Style::default().fg(Color::Red)));
        }
        Some(Picker::LegByes) => {
            lines.push(Line::styled("Leg byes: 1-4", Style::default().fg(Color::Cyan)));
        }
        None => {}
    }
    if view.phase == Phase::BallInFlight {
        lines.push(Line::styled("Recording ball...", Style::default().fg(Color::Gray)));
    }
    if let Some(advisory) = view.advisory.as_ref() {
        lines.push(Line::styled(advisory.message.clone(), Style::default().fg(Color::Magenta)));
    }
    f.render_widget(Paragraph::new(lines), inner);
}

fn draw_scoreboard(f: &mut Frame, area: Rect, app: &App) {
    let slice = &app.store.state.scoreboard;
    let title = match slice.last_updated {
        Some(at) => format!(" Live scoreboard (updated {}) ", at.format("%H:%M:%S")),
        None => " Live scoreboard ".to_string(),
    };
    let block = default_border(Color::White).title(title);
    let inner = block.inner(area);
    f.render_widget(block, area);

    match (slice.live.as_ref(), slice.error.as_deref()) {
        (Some(card), _) => f.render_widget(Paragraph::new(scorecard_lines(card)), inner),
        (None, Some(e)) => draw_notice(f, inner, &format!("Live scoreboard unavailable:\n{e}"), Color::Red),
        (None, None) if slice.loading => draw_notice(f, inner, "Loading...", Color::DarkGray),
        (None, None) => draw_notice(f, inner, "Open a live match to follow it here", Color::DarkGray),
    }
}

fn draw_account(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Account ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let auth = &app.store.state.auth;
    let mut lines = Vec::new();
    match auth.user.as_ref().filter(|_| auth.authenticated) {
        Some(user) => {
            lines.push(Line::from(vec![
                Span::styled("Signed in as ", Style::default().fg(Color::Gray)),
                Span::styled(user.name.clone(), Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(format!(" <{}>", user.email)),
            ]));
            if auth.from_hint {
                lines.push(Line::styled("(checking session...)", Style::default().fg(Color::DarkGray)));
            }
            lines.push(Line::from(""));
            lines.push(Line::styled("o=sign out", Style::default().fg(Color::DarkGray)));
        }
        None => {
            lines.push(Line::from("Not signed in"));
            lines.push(Line::from(""));
            lines.push(Line::styled("i=sign in with Google", Style::default().fg(Color::DarkGray)));
        }
    }
    if let Some(url) = auth.login_url.as_deref() {
        lines.push(Line::from(""));
        lines.push(Line::from("Open this URL in a browser, then restart with CRICTUI_SESSION_COOKIE set:"));
        lines.push(Line::styled(url.to_string(), Style::default().fg(Color::Cyan)));
    }
    if let Some(e) = error_line(auth.error.as_deref()) {
        lines.push(Line::from(""));
        lines.push(e);
    }
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

fn draw_help(f: &mut Frame, area: Rect) {
    let block = default_border(Color::DarkGray).title(" Help (Esc to close) ");
    let inner = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(Paragraph::new(HELP_TEXT), inner);
}

fn draw_logs(f: &mut Frame, area: Rect) {
    let logger = TuiLoggerWidget::default()
        .block(default_border(Color::DarkGray).title(" Logs "))
        .style_error(Style::default().fg(Color::Red))
        .style_warn(Style::default().fg(Color::Yellow))
        .style_info(Style::default().fg(Color::Gray))
        .style_debug(Style::default().fg(Color::DarkGray))
        .output_timestamp(Some("%H:%M:%S".to_string()))
        .output_target(false)
        .output_file(false)
        .output_line(false);
    f.render_widget(logger, area);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

fn draw_popup(f: &mut Frame, area: Rect, title: &str, msg: &str, color: Color) {
    let popup = centered(area, 50, 5);
    f.render_widget(Clear, popup);
    let block = default_border(color).title(title.to_string());
    let inner = block.inner(popup);
    f.render_widget(block, popup);
    draw_notice(f, inner, msg, Color::White);
}

fn draw_form(f: &mut Frame, area: Rect, form: &FormState, server_error: Option<&str>) {
    let height = form.fields.len() as u16 * 2 + 5;
    let popup = centered(area, 64, height);
    f.render_widget(Clear, popup);
    let block = default_border(Color::Yellow).title(format!(" {} ", form.kind.title()));
    let inner = block.inner(popup);
    f.render_widget(block, popup);

    let mut lines = Vec::new();
    for (idx, field) in form.fields.iter().enumerate() {
        let focused = idx == form.focus;
        let label_style = if focused {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        let cursor = if focused { "_" } else { "" };
        lines.push(Line::from(vec![
            Span::styled(format!("{:<20}", field.label), label_style),
            Span::raw(format!("{}{cursor}", field.value)),
        ]));
        match form.error_for(field.label) {
            Some(e) => lines.push(Line::styled(format!("{:<20}{e}", ""), Style::default().fg(Color::Red))),
            None => lines.push(Line::from("")),
        }
    }
    for e in form.errors.iter().filter(|e| !form.fields.iter().any(|f| f.label == e.field)) {
        lines.push(Line::styled(e.message.clone(), Style::default().fg(Color::Red)));
    }
    if let Some(e) = server_error {
        lines.push(Line::styled(e.to_string(), Style::default().fg(Color::Red)));
    }
    lines.push(Line::styled("Tab/Shift-Tab move  Enter save  Esc cancel", Style::default().fg(Color::DarkGray)));
    f.render_widget(Paragraph::new(lines), inner);
}

fn draw_loading_spinner(f: &mut Frame, area: Rect, app: &App) {
    let busy = app.store.state.is_busy();
    let spinner_char = if busy { app.state.animation.spinner_char() } else { ERROR_CHAR };
    let failed = !busy && app.store.state.has_error();
    if !busy && !failed {
        return;
    }
    let style = match spinner_char {
        ERROR_CHAR => Style::default().fg(Color::Red),
        _ => Style::default().fg(Color::White),
    };
    let spinner = Paragraph::new(spinner_char.to_string())
        .alignment(Alignment::Right)
        .style(style);
    let area = if app.settings.full_screen {
        Rect::new(area.width.saturating_sub(3), area.height.saturating_sub(2), 1, 1)
    } else {
        Rect::new(area.width.saturating_sub(11), 1, 1, 1)
    };
    f.render_widget(spinner, area);
}
