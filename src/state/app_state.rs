use crate::app::MenuItem;
use crate::state::forms::FormState;
use crate::state::scoring::LiveScoringView;

const SPINNER_CHARS: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
pub const ERROR_CHAR: char = '!';

// ---------------------------------------------------------------------------
// Spinner animation
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct AnimationState {
    pub frame: usize,
    /// Monotonic tick counter.
    pub tick: u64,
}

impl AnimationState {
    pub fn advance(&mut self) {
        self.tick = self.tick.wrapping_add(1);
        self.frame = (self.frame + 1) % SPINNER_CHARS.len();
    }

    pub fn spinner_char(&self) -> char {
        SPINNER_CHARS[self.frame % SPINNER_CHARS.len()]
    }
}

// ---------------------------------------------------------------------------
// List navigation
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Clone, Copy)]
pub struct ListCursor {
    pub selected: usize,
}

impl ListCursor {
    pub fn down(&mut self, len: usize) {
        if self.selected + 1 < len {
            self.selected += 1;
        }
    }

    pub fn up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Keep the cursor inside a list that may have shrunk.
    pub fn clamp(&mut self, len: usize) {
        self.selected = self.selected.min(len.saturating_sub(1));
    }
}

/// Delete waiting for a y/n confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingDelete {
    Series { id: String, name: String },
    Match { id: String, label: String },
}

impl PendingDelete {
    pub fn prompt(&self) -> String {
        match self {
            PendingDelete::Series { name, .. } => format!("Delete series \"{name}\"? (y/n)"),
            PendingDelete::Match { label, .. } => format!("Delete match \"{label}\"? (y/n)"),
        }
    }
}

#[derive(Debug, Default)]
pub struct AppState {
    pub active_tab: MenuItem,
    pub previous_tab: MenuItem,
    pub show_logs: bool,
    pub series_cursor: ListCursor,
    pub match_cursor: ListCursor,
    /// Series whose matches are listed on the Matches tab.
    pub selected_series_id: Option<String>,
    /// Match whose scorecard is open.
    pub open_match_id: Option<String>,
    /// Team whose players are listed beside the scorecard.
    pub team_cursor: ListCursor,
    pub scorecard_scroll: u16,
    pub scoring: LiveScoringView,
    pub form: Option<FormState>,
    pub pending_delete: Option<PendingDelete>,
    pub animation: AnimationState,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_stays_in_bounds() {
        let mut cursor = ListCursor::default();
        cursor.up();
        assert_eq!(cursor.selected, 0);
        cursor.down(2);
        cursor.down(2);
        assert_eq!(cursor.selected, 1);
        cursor.clamp(0);
        assert_eq!(cursor.selected, 0);
    }

    #[test]
    fn spinner_cycles() {
        let mut animation = AnimationState::default();
        let first = animation.spinner_char();
        for _ in 0..SPINNER_CHARS.len() {
            animation.advance();
        }
        assert_eq!(animation.spinner_char(), first);
        assert_eq!(animation.tick, SPINNER_CHARS.len() as u64);
    }
}
