use cricket_api::{Match, Player, Series, Team};

/// Records addressable by a server-assigned id.
pub trait Keyed {
    fn key(&self) -> &str;
}

impl Keyed for Series {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for Match {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for Team {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for Player {
    fn key(&self) -> &str {
        &self.id
    }
}

/// Replace the entry with the same id. Returns false when nothing matched.
pub fn replace_by_id<T: Keyed>(items: &mut [T], item: T) -> bool {
    match items.iter_mut().find(|existing| existing.key() == item.key()) {
        Some(existing) => {
            *existing = item;
            true
        }
        None => false,
    }
}

pub fn remove_by_id<T: Keyed>(items: &mut Vec<T>, id: &str) -> Option<T> {
    let idx = items.iter().position(|existing| existing.key() == id)?;
    Some(items.remove(idx))
}

/// Plain list slice used for read-only collections (teams, players).
#[derive(Debug)]
pub struct EntityList<T> {
    pub items: Vec<T>,
    /// Which parent the list was fetched for (match id for teams, team id for players).
    pub scope: Option<String>,
    pub loading: bool,
    pub error: Option<String>,
}

impl<T> Default for EntityList<T> {
    fn default() -> Self {
        Self { items: Vec::new(), scope: None, loading: false, error: None }
    }
}

impl<T> EntityList<T> {
    pub fn request(&mut self, scope: String) {
        self.loading = true;
        self.error = None;
        if self.scope.as_deref() != Some(scope.as_str()) {
            self.items.clear();
        }
        self.scope = Some(scope);
    }

    pub fn success(&mut self, items: Vec<T>) {
        self.loading = false;
        self.items = items;
    }

    pub fn failure(&mut self, error: String) {
        self.loading = false;
        self.error = Some(error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn team(id: &str, name: &str) -> Team {
        Team { id: id.into(), name: name.into(), ..Default::default() }
    }

    #[test]
    fn replace_and_remove_by_id() {
        let mut teams = vec![team("t1", "Lions"), team("t2", "Tigers")];
        assert!(replace_by_id(&mut teams, team("t2", "Bengal Tigers")));
        assert!(!replace_by_id(&mut teams, team("t9", "Ghosts")));
        assert_eq!(teams[1].name, "Bengal Tigers");

        assert_eq!(remove_by_id(&mut teams, "t1").map(|t| t.name), Some("Lions".into()));
        assert!(remove_by_id(&mut teams, "t1").is_none());
        assert_eq!(teams.len(), 1);
    }

    #[test]
    fn entity_list_clears_items_when_scope_changes() {
        let mut list = EntityList::default();
        list.request("m1".into());
        list.success(vec![team("t1", "Lions")]);
        list.request("m1".into());
        assert_eq!(list.items.len(), 1, "same scope keeps last-known-good data");
        list.request("m2".into());
        assert!(list.items.is_empty());
        list.failure("boom".into());
        assert!(!list.loading);
        assert_eq!(list.error.as_deref(), Some("boom"));
    }
}
