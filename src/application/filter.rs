use crate::domain::traits::Filterable;

/// Predicates applied to the cache to produce a view.
///
/// `route` and `status` are equality checks, `search` is a
/// case-insensitive substring match over the record's haystack. An unset
/// predicate matches everything, as does the `all` sentinel the web
/// filters used.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub route: Option<String>,
    pub status: Option<String>,
    pub search: Option<String>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_route(mut self, route: impl Into<String>) -> Self {
        self.route = Some(route.into());
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.route.is_none() && self.status.is_none() && self.search.is_none()
    }

    pub fn matches<T: Filterable>(&self, record: &T) -> bool {
        if let Some(route) = active(&self.route) {
            if record.route() != Some(route) {
                return false;
            }
        }

        if let Some(status) = active(&self.status) {
            if record.status().map(str::to_ascii_lowercase) != Some(status.to_ascii_lowercase()) {
                return false;
            }
        }

        if let Some(search) = active(&self.search) {
            let needle = search.to_lowercase();
            if !record.haystack().to_lowercase().contains(&needle) {
                return false;
            }
        }

        true
    }
}

// Treat empty strings and the web UI's "all" option as no predicate
fn active(field: &Option<String>) -> Option<&str> {
    match field.as_deref() {
        None | Some("") | Some("all") => None,
        Some(value) => Some(value),
    }
}
