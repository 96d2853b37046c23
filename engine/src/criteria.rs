//! Filter and sort criteria for deriving the display view.

use serde::{Deserialize, Serialize};

/// Category value that disables the category filter.
pub const ALL_CATEGORIES: &str = "all";

/// Fields the view can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    /// Creation timestamp, ties broken by canonical order
    #[default]
    DateAdded,
    /// Lowercased title, ties broken by id
    Name,
    /// Lowercased category, ties broken by id
    Category,
}

impl std::fmt::Display for SortField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortField::DateAdded => write!(f, "dateAdded"),
            SortField::Name => write!(f, "name"),
            SortField::Category => write!(f, "category"),
        }
    }
}

impl std::str::FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dateAdded" | "date" => Ok(SortField::DateAdded),
            "name" => Ok(SortField::Name),
            "category" => Ok(SortField::Category),
            other => Err(format!("unknown sort field: {}", other)),
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl std::fmt::Display for SortDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortDirection::Asc => write!(f, "asc"),
            SortDirection::Desc => write!(f, "desc"),
        }
    }
}

impl std::str::FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(format!("unknown sort direction: {}", other)),
        }
    }
}

/// How the view is sorted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortCriteria {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortCriteria {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Newest first.
    pub fn newest_first() -> Self {
        Self::new(SortField::DateAdded, SortDirection::Desc)
    }

    /// Alphabetical by title.
    pub fn name_asc() -> Self {
        Self::new(SortField::Name, SortDirection::Asc)
    }
}

/// Which items are visible.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    /// Settled search query (already debounced)
    pub search_query: String,
    /// Exact category, or [`ALL_CATEGORIES`]
    pub category: String,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            search_query: String::new(),
            category: ALL_CATEGORIES.to_string(),
        }
    }
}

impl FilterCriteria {
    /// Filter with only a search query.
    pub fn search(query: impl Into<String>) -> Self {
        Self {
            search_query: query.into(),
            ..Self::default()
        }
    }

    /// Filter with only a category.
    pub fn category(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            ..Self::default()
        }
    }

    /// Whether the category filter is disabled.
    pub fn all_categories(&self) -> bool {
        self.category == ALL_CATEGORIES
    }

    /// Whether this filter lets every item through.
    pub fn is_unfiltered(&self) -> bool {
        self.search_query.is_empty() && self.all_categories()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_is_unfiltered() {
        let filter = FilterCriteria::default();
        assert!(filter.is_unfiltered());
        assert_eq!(filter.category, "all");
    }

    #[test]
    fn sort_field_parsing() {
        assert_eq!("dateAdded".parse::<SortField>(), Ok(SortField::DateAdded));
        assert_eq!("name".parse::<SortField>(), Ok(SortField::Name));
        assert!("size".parse::<SortField>().is_err());
        assert_eq!("desc".parse::<SortDirection>(), Ok(SortDirection::Desc));
    }

    #[test]
    fn serialization_format() {
        let sort = SortCriteria::newest_first();
        let json = serde_json::to_string(&sort).unwrap();
        assert_eq!(json, r#"{"field":"dateAdded","direction":"desc"}"#);

        let filter = FilterCriteria::search("rust");
        let json = serde_json::to_string(&filter).unwrap();
        assert!(json.contains("searchQuery"));
    }
}
