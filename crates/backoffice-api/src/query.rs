// ── List query parameters ──
//
// Filters, sorting, and pagination are forwarded to the server as-is.
// The client never filters or sorts locally.

use std::fmt;

use strum::{Display, EnumString};

/// Sort direction for list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Query parameters for a list call, kept in insertion order.
///
/// Setting a key that is already present replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    params: Vec<(String, String)>,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(self, page: u32) -> Self {
        self.filter("page", page)
    }

    pub fn limit(self, limit: u32) -> Self {
        self.filter("limit", limit)
    }

    pub fn sort(self, field: impl Into<String>) -> Self {
        let field: String = field.into();
        self.filter("sort", field)
    }

    pub fn order(self, order: SortOrder) -> Self {
        self.filter("order", order)
    }

    pub fn search(self, term: impl Into<String>) -> Self {
        let term: String = term.into();
        self.filter("search", term)
    }

    /// Any other server-understood parameter (`status`, `isActive`, ...).
    pub fn filter(mut self, key: impl Into<String>, value: impl fmt::Display) -> Self {
        let key = key.into();
        let value = value.to_string();
        match self.params.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.params.push((key, value)),
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Page size, used to derive `totalPages` when the server omits it.
    pub fn limit_value(&self) -> Option<u32> {
        self.get("limit").and_then(|v| v.parse().ok())
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn builder_keeps_insertion_order() {
        let q = ListQuery::new()
            .page(2)
            .limit(10)
            .sort("createdAt")
            .order(SortOrder::Desc)
            .filter("status", "new");

        let params: Vec<(&str, &str)> = q
            .params()
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        assert_eq!(
            params,
            vec![
                ("page", "2"),
                ("limit", "10"),
                ("sort", "createdAt"),
                ("order", "desc"),
                ("status", "new"),
            ]
        );
    }

    #[test]
    fn repeated_key_replaces_value() {
        let q = ListQuery::new().page(1).limit(25).page(3);
        assert_eq!(q.get("page"), Some("3"));
        assert_eq!(q.params().len(), 2);
        assert_eq!(q.limit_value(), Some(25));
    }

    #[test]
    fn sort_order_parses() {
        assert_eq!("asc".parse::<SortOrder>().ok(), Some(SortOrder::Asc));
        assert_eq!(SortOrder::Desc.to_string(), "desc");
    }
}
