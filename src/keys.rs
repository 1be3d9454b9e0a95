use crate::app::{App, MenuItem};
use crate::state::scoring::{Picker, ScoringAction, WicketKind};
use crossterm::event::KeyCode::Char;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Returns false when the user asked to quit.
pub fn handle_key_bindings(key_event: KeyEvent, app: &mut App) -> bool {
    if matches!((key_event.code, key_event.modifiers), (Char('c'), KeyModifiers::CONTROL)) {
        return false;
    }

    // Modal states swallow every key.
    if app.state.pending_delete.is_some() {
        match key_event.code {
            Char('y') | Char('Y') => app.confirm_delete(),
            _ => app.cancel_delete(),
        }
        return true;
    }
    if app.state.form.is_some() {
        handle_form_keys(key_event, app);
        return true;
    }
    if app.state.active_tab == MenuItem::Scorecard && app.state.scoring.is_open() {
        return handle_scoring_keys(key_event, app);
    }

    match (app.state.active_tab, key_event.code, key_event.modifiers) {
        (_, Char('q'), _) => return false,

        // Tab switching
        (_, Char('1'), _) => app.update_tab(MenuItem::Series),
        (_, Char('2'), _) => app.update_tab(MenuItem::Matches),
        (_, Char('3'), _) => app.update_tab(MenuItem::Scorecard),
        (_, Char('4'), _) => app.update_tab(MenuItem::Scoreboard),
        (_, Char('5'), _) => app.update_tab(MenuItem::Account),
        (_, Char('?'), _) => app.update_tab(MenuItem::Help),
        (MenuItem::Help, KeyCode::Esc, _) => app.exit_help(),

        // Series list
        (MenuItem::Series, Char('j') | KeyCode::Down, _) => app.series_down(),
        (MenuItem::Series, Char('k') | KeyCode::Up, _) => app.series_up(),
        (MenuItem::Series, KeyCode::Enter, _) => app.open_series(),

        // Match list
        (MenuItem::Matches, Char('j') | KeyCode::Down, _) => app.match_down(),
        (MenuItem::Matches, Char('k') | KeyCode::Up, _) => app.match_up(),
        (MenuItem::Matches, Char('a'), _) => app.show_all_matches(),
        (MenuItem::Matches, KeyCode::Enter, _) => app.open_match(),

        (MenuItem::Series | MenuItem::Matches, Char('n'), _) => app.open_new_form(),
        (MenuItem::Series | MenuItem::Matches, Char('e'), _) => app.open_edit_form(),
        (MenuItem::Series | MenuItem::Matches, Char('d'), _) => app.request_delete(),

        // Scorecard
        (MenuItem::Scorecard, Char('j') | KeyCode::Down, _) => app.scroll_scorecard(true),
        (MenuItem::Scorecard, Char('k') | KeyCode::Up, _) => app.scroll_scorecard(false),
        (MenuItem::Scorecard, Char('s'), _) => app.start_scoring(),
        (MenuItem::Scorecard, Char('l'), _) => app.toggle_scoring(),
        (MenuItem::Scorecard, Char('t'), _) => app.next_team(),
        (MenuItem::Scorecard, KeyCode::Esc, _) => app.update_tab(MenuItem::Matches),

        // Account
        (MenuItem::Account, Char('i'), _) => app.login(),
        (MenuItem::Account, Char('o'), _) => app.logout(),

        // Global
        (_, Char('r'), _) => app.refresh(),
        (_, Char('f'), _) => app.toggle_full_screen(),
        (_, Char('"'), _) => app.toggle_show_logs(),

        _ => {}
    }
    true
}

fn handle_form_keys(key_event: KeyEvent, app: &mut App) {
    match key_event.code {
        KeyCode::Esc => return app.cancel_form(),
        KeyCode::Enter => return app.submit_form(),
        _ => {}
    }
    let Some(form) = app.state.form.as_mut() else {
        return;
    };
    match key_event.code {
        KeyCode::Tab | KeyCode::Down => form.focus_next(),
        KeyCode::BackTab | KeyCode::Up => form.focus_prev(),
        KeyCode::Backspace => form.pop_char(),
        Char(c) => form.push_char(c),
        _ => {}
    }
}

/// Scoring pad: digits score runs, letters score extras.
fn handle_scoring_keys(key_event: KeyEvent, app: &mut App) -> bool {
    match (app.state.scoring.picker, key_event.code) {
        (Some(Picker::Wicket), Char(c @ '1'..='6')) => {
            let kind = WicketKind::ALL[(c as u8 - b'1') as usize];
            app.score(ScoringAction::Wicket(kind));
        }
        (Some(Picker::LegByes), Char(c @ '1'..='4')) => app.score(ScoringAction::LegByes(c as u8 - b'0')),
        (Some(_), _) => app.state.scoring.picker = None,

        (None, Char(c @ '0'..='6')) => app.score(ScoringAction::Runs(c as u8 - b'0')),
        (None, Char('w')) => app.score(ScoringAction::Wide),
        (None, Char('n')) => app.score(ScoringAction::NoBall),
        (None, Char('.')) => app.score(ScoringAction::DeadBall),
        (None, Char('x')) => app.state.scoring.toggle_picker(Picker::Wicket),
        (None, Char('g')) => app.state.scoring.toggle_picker(Picker::LegByes),
        (None, Char('+') | Char('b')) => app.state.scoring.byes.increment(),
        (None, Char('-')) => app.state.scoring.byes.decrement(),
        (None, Char('u')) => app.undo_last_ball(),
        (None, Char('"')) => app.toggle_show_logs(),
        (None, Char('q')) => return false,
        (None, KeyCode::Esc | Char('l')) => app.toggle_scoring(),
        _ => {}
    }
    true
}
