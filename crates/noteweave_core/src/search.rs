//! Search functionality over an item collection
//!
//! Filters items by text (title and body), classification and tag.

use serde::Serialize;

use crate::item::{AttributeKind, Item};

/// Represents a search query configuration
#[derive(Debug, Clone, Default, Serialize)]
pub struct ItemQuery {
    /// Text to look for in the title or body; empty matches everything
    pub pattern: String,
    /// Whether the text search is case-sensitive
    pub case_sensitive: bool,
    /// Only items classified as this kind
    pub kind: Option<AttributeKind>,
    /// Only items carrying this tag
    pub tag: Option<String>,
}

impl ItemQuery {
    /// Create a new text query
    pub fn text(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            ..Self::default()
        }
    }

    /// Create a query for every item of a kind
    pub fn of_kind(kind: AttributeKind) -> Self {
        Self {
            kind: Some(kind),
            ..Self::default()
        }
    }

    /// Restrict to a classification
    pub fn with_kind(mut self, kind: AttributeKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Restrict to a tag
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Make the text search case-sensitive
    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    /// Whether an item satisfies every criterion
    pub fn matches(&self, item: &Item) -> bool {
        if let Some(kind) = self.kind
            && !item.has_attributes(kind)
        {
            return false;
        }
        if let Some(tag) = &self.tag
            && !item.has_tag(tag)
        {
            return false;
        }
        self.matches_text(item)
    }

    fn matches_text(&self, item: &Item) -> bool {
        if self.pattern.is_empty() {
            return true;
        }
        if self.case_sensitive {
            item.title.contains(&self.pattern) || item.content.contains(&self.pattern)
        } else {
            let pattern = self.pattern.to_lowercase();
            item.title.to_lowercase().contains(&pattern)
                || item.content.to_lowercase().contains(&pattern)
        }
    }
}

/// Items matching a query, in collection order
pub fn search<'a>(items: &'a [Item], query: &ItemQuery) -> Vec<&'a Item> {
    items.iter().filter(|item| query.matches(item)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collection() -> Vec<Item> {
        vec![
            Item::new("Buy milk", "from the corner shop").with_done(false),
            Item::new("Dentist", "Bring insurance card")
                .with_event_date(chrono::Local::now())
                .with_done(false)
                .with_tag("health"),
            Item::new("Ideas", "Milk-based desserts").with_tag("food"),
        ]
    }

    fn titles<'a>(items: &[&'a Item]) -> Vec<&'a str> {
        items.iter().map(|i| i.title.as_str()).collect()
    }

    #[test]
    fn test_text_search_case_insensitive() {
        let items = collection();
        let found = search(&items, &ItemQuery::text("milk"));
        assert_eq!(titles(&found), vec!["Buy milk", "Ideas"]);
    }

    #[test]
    fn test_text_search_case_sensitive() {
        let items = collection();
        let found = search(&items, &ItemQuery::text("Milk").case_sensitive(true));
        assert_eq!(titles(&found), vec!["Ideas"]);
    }

    #[test]
    fn test_kind_filter_uses_derived_classification() {
        let items = collection();
        let tasks = search(&items, &ItemQuery::of_kind(AttributeKind::Task));
        assert_eq!(titles(&tasks), vec!["Buy milk", "Dentist"]);

        let events = search(&items, &ItemQuery::of_kind(AttributeKind::Event));
        assert_eq!(titles(&events), vec!["Dentist"]);

        let notes = search(&items, &ItemQuery::of_kind(AttributeKind::Note));
        assert_eq!(titles(&notes), vec!["Ideas"]);
    }

    #[test]
    fn test_combined_filters() {
        let items = collection();
        let query = ItemQuery::text("card")
            .with_kind(AttributeKind::Task)
            .with_tag("health");
        assert_eq!(titles(&search(&items, &query)), vec!["Dentist"]);

        let query = ItemQuery::default().with_tag("missing");
        assert!(search(&items, &query).is_empty());
    }
}
