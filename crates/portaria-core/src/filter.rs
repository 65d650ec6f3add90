//! Free-text search over listings.
//!
//! An empty term matches everything.

use crate::types::{AuthorizedPerson, ServiceTicket};

/// A search term, kept both as typed and case-folded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchTerm {
    raw: String,
    folded: String,
}

impl SearchTerm {
    /// Creates a search term.
    pub fn new(term: impl Into<String>) -> Self {
        let raw = term.into();
        let folded = raw.to_lowercase();
        Self { raw, folded }
    }

    /// The term as typed.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Whether the term matches everything.
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    fn in_folded(&self, haystack: &str) -> bool {
        haystack.to_lowercase().contains(&self.folded)
    }
}

/// Something a [`SearchTerm`] can be matched against.
pub trait Searchable {
    /// Whether this item matches `term`.
    fn matches(&self, term: &SearchTerm) -> bool;
}

impl Searchable for ServiceTicket {
    fn matches(&self, term: &SearchTerm) -> bool {
        term.in_folded(&self.title) || term.in_folded(&self.service) || term.in_folded(&self.category)
    }
}

impl Searchable for AuthorizedPerson {
    // CPF is compared as typed, punctuation included.
    fn matches(&self, term: &SearchTerm) -> bool {
        term.in_folded(&self.name)
            || self.cpf.contains(term.raw())
            || self.rooms.iter().any(|room| term.in_folded(room))
    }
}

/// Keeps the items matching `term`, preserving order.
pub fn apply<T: Searchable>(items: Vec<T>, term: &SearchTerm) -> Vec<T> {
    if term.is_empty() {
        return items;
    }
    items.into_iter().filter(|item| item.matches(term)).collect()
}
