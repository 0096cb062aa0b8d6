//! Selection set and select-all tri-state

use std::collections::BTreeSet;

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::UserItem;

/// IDs of the selected users.
///
/// IDs left over from a previous filter view stay in the set; they are
/// inert until the user shows up again.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    ids: BTreeSet<String>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.ids.iter()
    }

    pub fn select(&mut self, id: impl Into<String>, selected: bool) {
        let id = id.into();
        if selected {
            self.ids.insert(id);
        } else {
            self.ids.remove(&id);
        }
    }

    /// Add or remove every displayed ID; IDs not displayed are left alone.
    pub fn select_all<'a>(&mut self, displayed: impl IntoIterator<Item = &'a str>, selected: bool) {
        for id in displayed {
            self.select(id, selected);
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.ids.iter().cloned().collect()
    }
}

impl FromIterator<String> for SelectionSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

/// Header checkbox state relative to the displayed users
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum SelectAllState {
    None,
    Some,
    All,
}

impl SelectAllState {
    pub fn of(users: &[UserItem], selection: &SelectionSet) -> Self {
        if users.is_empty() {
            return Self::None;
        }
        let selected = users.iter().filter(|u| selection.contains(&u.id)).count();
        if selected == users.len() {
            Self::All
        } else if selected > 0 {
            Self::Some
        } else {
            Self::None
        }
    }

    pub fn all_selected(&self) -> bool {
        matches!(self, Self::All)
    }

    pub fn some_selected(&self) -> bool {
        matches!(self, Self::Some)
    }

    /// Argument passed to select-all when the header checkbox is clicked.
    /// A partial selection always selects everything.
    pub fn toggle_target(&self) -> bool {
        !self.all_selected()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    use crate::domain::UserRole;

    fn users(ids: &[&str]) -> Vec<UserItem> {
        ids.iter()
            .map(|id| UserItem {
                id: id.to_string(),
                tenant_id: "acme".into(),
                name: None,
                email: format!("{id}@x.io"),
                role: UserRole::Client,
                status: None,
                company: None,
                department: None,
                created_at: Utc::now(),
            })
            .collect()
    }

    #[test]
    fn empty_list_is_never_all_selected() {
        let mut selection = SelectionSet::new();
        selection.select("a", true);
        let state = SelectAllState::of(&[], &selection);
        assert!(!state.all_selected());
        assert!(!state.some_selected());
    }

    #[test]
    fn three_user_scenario() {
        let users = users(&["a", "b", "c"]);
        let mut selection = SelectionSet::new();

        selection.select("a", true);
        selection.select("b", true);
        let state = SelectAllState::of(&users, &selection);
        assert!(state.some_selected());
        assert!(!state.all_selected());

        selection.select("c", true);
        let state = SelectAllState::of(&users, &selection);
        assert!(state.all_selected());

        let target = state.toggle_target();
        selection.select_all(users.iter().map(|u| u.id.as_str()), target);
        assert!(selection.is_empty());
    }

    #[test]
    fn partial_click_selects_all_displayed() {
        let users = users(&["a", "b", "c"]);
        let mut selection: SelectionSet = ["a".to_string(), "stale".to_string()].into_iter().collect();

        let state = SelectAllState::of(&users, &selection);
        assert!(state.some_selected());
        assert!(state.toggle_target());

        selection.select_all(users.iter().map(|u| u.id.as_str()), true);
        assert!(SelectAllState::of(&users, &selection).all_selected());
        assert!(selection.contains("stale"));
    }

    #[test]
    fn deselect_all_keeps_ids_outside_view() {
        let users = users(&["a", "b"]);
        let mut selection: SelectionSet =
            ["a", "b", "old"].into_iter().map(String::from).collect();

        selection.select_all(users.iter().map(|u| u.id.as_str()), false);
        assert_eq!(selection.to_vec(), vec!["old".to_string()]);
        assert_eq!(SelectAllState::of(&users, &selection), SelectAllState::None);
    }

    #[test]
    fn stale_ids_do_not_count_toward_state() {
        let users = users(&["a", "b"]);
        let selection: SelectionSet = ["x".to_string()].into_iter().collect();
        assert_eq!(SelectAllState::of(&users, &selection), SelectAllState::None);
    }
}
