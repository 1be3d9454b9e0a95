use crate::state::entities::{remove_by_id, replace_by_id};
use crate::state::messages::SeriesAction;
use cricket_api::Series;

#[derive(Debug, Default)]
pub struct SeriesSlice {
    pub items: Vec<Series>,
    pub loading: bool,
    pub error: Option<String>,
}

impl SeriesSlice {
    pub fn reduce(&mut self, action: SeriesAction) {
        use SeriesAction::*;
        match action {
            FetchSeriesRequest
            | CreateSeriesRequest(_)
            | UpdateSeriesRequest { .. }
            | DeleteSeriesRequest(_) => {
                self.loading = true;
                self.error = None;
            }
            FetchSeriesSuccess(items) => {
                self.loading = false;
                self.items = items;
            }
            CreateSeriesSuccess(series) => {
                self.loading = false;
                self.items.push(series);
            }
            UpdateSeriesSuccess(series) => {
                self.loading = false;
                if !replace_by_id(&mut self.items, series.clone()) {
                    self.items.push(series);
                }
            }
            DeleteSeriesSuccess(id) => {
                self.loading = false;
                remove_by_id(&mut self.items, &id);
            }
            FetchSeriesFailure(e)
            | CreateSeriesFailure(e)
            | UpdateSeriesFailure(e)
            | DeleteSeriesFailure(e) => {
                self.loading = false;
                self.error = Some(e);
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&Series> {
        self.items.iter().find(|s| s.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use cricket_api::SeriesStatus;

    fn ashes(id: &str) -> Series {
        Series {
            id: id.into(),
            name: "Ashes".into(),
            description: None,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            status: SeriesStatus::Upcoming,
            created_by: Some("u1".into()),
        }
    }

    #[test]
    fn request_sets_loading_and_clears_error() {
        let mut slice = SeriesSlice { error: Some("old".into()), ..Default::default() };
        slice.reduce(SeriesAction::FetchSeriesRequest);
        assert!(slice.loading);
        assert!(slice.error.is_none());
    }

    #[test]
    fn create_success_appends_server_record() {
        let mut slice = SeriesSlice::default();
        slice.reduce(SeriesAction::CreateSeriesRequest(cricket_api::NewSeries {
            name: "Ashes".into(),
            description: None,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            status: None,
        }));
        assert!(slice.items.is_empty(), "no optimistic insert");
        slice.reduce(SeriesAction::CreateSeriesSuccess(ashes("s1")));
        assert!(!slice.loading);
        assert_eq!(slice.items.len(), 1);
        assert_eq!(slice.items[0].name, "Ashes");
        assert_eq!(slice.items[0].id, "s1");
    }

    #[test]
    fn update_replaces_and_delete_removes_by_id() {
        let mut slice = SeriesSlice { items: vec![ashes("s1"), ashes("s2")], ..Default::default() };
        let mut renamed = ashes("s2");
        renamed.name = "Border-Gavaskar".into();
        slice.reduce(SeriesAction::UpdateSeriesSuccess(renamed));
        assert_eq!(slice.get("s2").unwrap().name, "Border-Gavaskar");
        assert_eq!(slice.items.len(), 2);

        slice.reduce(SeriesAction::DeleteSeriesSuccess("s1".into()));
        assert!(slice.get("s1").is_none());
        assert_eq!(slice.items.len(), 1);
    }

    #[test]
    fn failure_keeps_last_known_good_list() {
        let mut slice = SeriesSlice { items: vec![ashes("s1")], ..Default::default() };
        slice.reduce(SeriesAction::FetchSeriesRequest);
        slice.reduce(SeriesAction::FetchSeriesFailure("Failed to fetch series".into()));
        assert!(!slice.loading);
        assert_eq!(slice.error.as_deref(), Some("Failed to fetch series"));
        assert_eq!(slice.items.len(), 1);
    }
}
