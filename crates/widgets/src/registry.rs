//! Navigation registry: the ordered page list every widget consults.

use historia_types::PageEntry;

/// Ordered, immutable list of pages with wrap-around neighbour lookups.
///
/// Lookups are linear scans; the list is a handful of entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationRegistry {
    entries: Vec<PageEntry>,
    default_id: String,
}

impl NavigationRegistry {
    /// Creates a registry. `entries` must not be empty for neighbour lookups
    /// to return anything.
    pub fn new(entries: Vec<PageEntry>, default_id: impl Into<String>) -> Self {
        Self {
            entries,
            default_id: default_id.into(),
        }
    }

    pub fn entries(&self) -> &[PageEntry] {
        &self.entries
    }

    pub fn find(&self, id: &str) -> Option<&PageEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.id == id)
    }

    /// Entry before `current_id`, wrapping to the last entry. Unknown ids
    /// count as "before the first entry" and also yield the last entry.
    pub fn previous_of(&self, current_id: &str) -> Option<&PageEntry> {
        match self.index_of(current_id) {
            Some(idx) if idx > 0 => self.entries.get(idx - 1),
            _ => self.entries.last(),
        }
    }

    /// Entry after `current_id`, wrapping to the first entry. Unknown ids
    /// yield the first entry.
    pub fn next_of(&self, current_id: &str) -> Option<&PageEntry> {
        match self.index_of(current_id) {
            Some(idx) if idx + 1 < self.entries.len() => self.entries.get(idx + 1),
            _ => self.entries.first(),
        }
    }

    /// Resolves the current page identity.
    ///
    /// Precedence: a non-empty `attribute` from the navigation element; then
    /// the first entry (in registry order) whose path token occurs in
    /// `pathname`, matched case-sensitively; then the default id.
    pub fn resolve_current(&self, attribute: Option<&str>, pathname: &str) -> String {
        if let Some(explicit) = attribute.map(str::trim).filter(|value| !value.is_empty()) {
            return explicit.to_string();
        }
        self.entries
            .iter()
            .find(|entry| pathname.contains(entry.path_token()))
            .map(|entry| entry.id.clone())
            .unwrap_or_else(|| self.default_id.clone())
    }
}
