use crate::state::entities::{remove_by_id, replace_by_id};
use crate::state::messages::MatchAction;
use cricket_api::Match;

#[derive(Debug, Default)]
pub struct MatchSlice {
    pub items: Vec<Match>,
    /// Series the list was fetched for; `None` means all matches.
    pub series_id: Option<String>,
    /// Last match fetched by id.
    pub current: Option<Match>,
    pub loading: bool,
    pub error: Option<String>,
}

impl MatchSlice {
    pub fn reduce(&mut self, action: MatchAction) {
        use MatchAction::*;
        match action {
            FetchMatchesRequest { series_id } => {
                self.loading = true;
                self.error = None;
                if self.series_id != series_id {
                    self.items.clear();
                }
                self.series_id = series_id;
            }
            FetchMatchRequest(_)
            | CreateMatchRequest(_)
            | UpdateMatchRequest { .. }
            | DeleteMatchRequest(_) => {
                self.loading = true;
                self.error = None;
            }
            FetchMatchesSuccess(items) => {
                self.loading = false;
                self.items = items;
            }
            FetchMatchSuccess(m) => {
                self.loading = false;
                replace_by_id(&mut self.items, m.clone());
                self.current = Some(m);
            }
            CreateMatchSuccess(m) => {
                self.loading = false;
                if self.series_id.as_deref().is_none_or(|sid| sid == m.series_id) {
                    self.items.push(m);
                }
            }
            UpdateMatchSuccess(m) => {
                self.loading = false;
                if self.current.as_ref().is_some_and(|c| c.id == m.id) {
                    self.current = Some(m.clone());
                }
                replace_by_id(&mut self.items, m);
            }
            DeleteMatchSuccess(id) => {
                self.loading = false;
                remove_by_id(&mut self.items, &id);
                if self.current.as_ref().is_some_and(|c| c.id == id) {
                    self.current = None;
                }
            }
            FetchMatchesFailure(e)
            | FetchMatchFailure(e)
            | CreateMatchFailure(e)
            | UpdateMatchFailure(e)
            | DeleteMatchFailure(e) => {
                self.loading = false;
                self.error = Some(e);
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&Match> {
        self.items
            .iter()
            .find(|m| m.id == id)
            .or_else(|| self.current.as_ref().filter(|m| m.id == id))
    }
}
