//! In-memory name filter over the last loaded contact snapshot.

use crate::models::Contact;

/// Holds the full snapshot and the subset currently shown.
#[derive(Debug, Clone, Default)]
pub struct ContactFilter {
    all: Vec<Contact>,
    visible: Vec<Contact>,
    query: Option<String>,
}

impl ContactFilter {
    pub fn new(records: Vec<Contact>) -> Self {
        let mut filter = Self::default();
        filter.set_all(records);
        filter
    }

    /// Replace the snapshot. Shows everything and clears any active search.
    pub fn set_all(&mut self, records: Vec<Contact>) {
        self.visible = records.clone();
        self.all = records;
        self.query = None;
    }

    /// Recompute the visible subset from the full snapshot.
    ///
    /// An empty query shows every contact. Otherwise a contact is kept when
    /// its name contains the query, ignoring case. Snapshot order is kept.
    pub fn filter(&mut self, query: &str) {
        if query.is_empty() {
            self.query = None;
            self.visible = self.all.clone();
            return;
        }

        let needle = query.to_lowercase();
        self.visible = self
            .all
            .iter()
            .filter(|c| c.name.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        self.query = Some(query.to_string());
    }

    /// Number of visible contacts
    #[inline]
    pub fn count(&self) -> usize {
        self.visible.len()
    }

    /// Number of contacts in the snapshot
    #[inline]
    pub fn total(&self) -> usize {
        self.all.len()
    }

    pub fn visible(&self) -> &[Contact] {
        &self.visible
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn is_searching(&self) -> bool {
        self.query.is_some()
    }

    /// What to tell the user when nothing is visible; `None` when something is.
    pub fn empty_state(&self) -> Option<EmptyState> {
        if self.count() > 0 {
            return None;
        }
        if self.is_searching() && self.total() > 0 {
            Some(EmptyState::NoMatches)
        } else {
            Some(EmptyState::NoContacts)
        }
    }
}

/// The two empty list states render different text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyState {
    NoContacts,
    NoMatches,
}

impl EmptyState {
    pub fn message(self) -> &'static str {
        match self {
            Self::NoContacts => "No contacts added yet",
            Self::NoMatches => "No matching contacts found",
        }
    }
}

impl std::fmt::Display for EmptyState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contacts(names: &[&str]) -> Vec<Contact> {
        names
            .iter()
            .enumerate()
            .map(|(i, n)| {
                let mut c = Contact::new(*n, "", "");
                c.id = i as i64 + 1;
                c
            })
            .collect()
    }

    fn visible_names(f: &ContactFilter) -> Vec<&str> {
        f.visible().iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn test_set_all_shows_everything() {
        let f = ContactFilter::new(contacts(&["a", "b"]));
        assert_eq!(f.count(), 2);
        assert_eq!(f.total(), 2);
        assert!(!f.is_searching());
        assert_eq!(f.empty_state(), None);
    }

    #[test]
    fn test_filter_substring_case_insensitive() {
        let mut f = ContactFilter::new(contacts(&["John Doe", "jane smith"]));

        f.filter("jo");
        assert_eq!(visible_names(&f), vec!["John Doe"]);

        f.filter("JANE");
        assert_eq!(visible_names(&f), vec!["jane smith"]);

        f.filter("");
        assert_eq!(visible_names(&f), vec!["John Doe", "jane smith"]);
        assert!(!f.is_searching());
    }

    #[test]
    fn test_filter_is_stable_and_idempotent() {
        let mut f = ContactFilter::new(contacts(&["alice", "Bob", "Charlie"]));

        f.filter("a");
        let first: Vec<Contact> = f.visible().to_vec();
        f.filter("a");
        assert_eq!(f.visible(), first.as_slice());
        assert_eq!(visible_names(&f), vec!["alice", "Charlie"]);
    }

    #[test]
    fn test_filter_always_starts_from_full_snapshot() {
        let mut f = ContactFilter::new(contacts(&["alpha", "beta", "gamma"]));
        f.filter("zzz");
        assert_eq!(f.count(), 0);

        f.filter("ta");
        assert_eq!(visible_names(&f), vec!["beta"]);
    }

    #[test]
    fn test_set_all_resets_search() {
        let mut f = ContactFilter::new(contacts(&["alpha", "beta"]));
        f.filter("alp");
        f.set_all(contacts(&["gamma", "delta", "alpha"]));
        assert_eq!(f.count(), 3);
        assert_eq!(f.query(), None);
    }

    #[test]
    fn test_empty_states_differ() {
        let mut f = ContactFilter::new(Vec::new());
        assert_eq!(f.empty_state(), Some(EmptyState::NoContacts));

        f.set_all(contacts(&["alpha"]));
        f.filter("zzz");
        assert_eq!(f.empty_state(), Some(EmptyState::NoMatches));

        assert_ne!(EmptyState::NoContacts.message(), EmptyState::NoMatches.message());
        assert_eq!(EmptyState::NoMatches.to_string(), "No matching contacts found");
    }

    #[test]
    fn test_search_over_empty_snapshot_is_no_contacts() {
        let mut f = ContactFilter::new(Vec::new());
        f.filter("anything");
        assert_eq!(f.empty_state(), Some(EmptyState::NoContacts));
    }
}
