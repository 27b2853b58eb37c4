use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
}

impl SortDir {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDir::Asc => "asc",
            SortDir::Desc => "desc",
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            SortDir::Asc => SortDir::Desc,
            SortDir::Desc => SortDir::Asc,
        }
    }
}

impl fmt::Display for SortDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SortDir {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDir::Asc),
            "desc" => Ok(SortDir::Desc),
            other => Err(format!("invalid sort direction '{}' (expected asc or desc)", other)),
        }
    }
}

/// `page, size, sortBy, sortDir` query parameters for paginated listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
    pub sort_by: String,
    pub sort_dir: SortDir,
}

impl PageRequest {
    /// First page at the configured page size
    pub fn new(sort_by: impl Into<String>) -> Self {
        Self::with_size(sort_by, crate::config::config().ui.page_size)
    }

    pub fn with_size(sort_by: impl Into<String>, size: u32) -> Self {
        Self {
            page: 0,
            size: size.max(1),
            sort_by: sort_by.into(),
            sort_dir: SortDir::Asc,
        }
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    pub fn size(mut self, size: u32) -> Self {
        self.size = size.max(1);
        self
    }

    pub fn sort_dir(mut self, dir: SortDir) -> Self {
        self.sort_dir = dir;
        self
    }

    /// Clicking the current column flips direction; a new column starts ascending
    pub fn toggle_sort(&mut self, field: &str) {
        if self.sort_by == field {
            self.sort_dir = self.sort_dir.flipped();
        } else {
            self.sort_by = field.to_string();
            self.sort_dir = SortDir::Asc;
        }
    }

    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        vec![
            ("page", self.page.to_string()),
            ("size", self.size.to_string()),
            ("sortBy", self.sort_by.clone()),
            ("sortDir", self.sort_dir.to_string()),
        ]
    }
}

/// One page of a paginated listing; missing fields default to empty
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub content: Vec<T>,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub total_pages: u32,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub total_elements: u64,
}

impl<T> Page<T> {
    pub fn has_next(&self, request: &PageRequest) -> bool {
        request.page + 1 < self.total_pages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_sort_flips_or_resets() {
        let mut req = PageRequest::new("companyName");
        req.toggle_sort("companyName");
        assert_eq!(req.sort_dir, SortDir::Desc);

        req.toggle_sort("email");
        assert_eq!(req.sort_by, "email");
        assert_eq!(req.sort_dir, SortDir::Asc);
    }

    #[test]
    fn zero_page_size_is_clamped() {
        assert_eq!(PageRequest::with_size("id", 0).size, 1);
        assert_eq!(PageRequest::with_size("id", 0).to_query()[1], ("size", "1".to_string()));
        assert_eq!(PageRequest::new("id").size(0).size, 1);
    }

    #[test]
    fn query_uses_wire_names() {
        let req = PageRequest::new("equipmentType").page(2).size(25).sort_dir(SortDir::Desc);
        assert_eq!(
            req.to_query(),
            vec![
                ("page", "2".to_string()),
                ("size", "25".to_string()),
                ("sortBy", "equipmentType".to_string()),
                ("sortDir", "desc".to_string()),
            ]
        );
    }

    #[test]
    fn page_defaults_missing_fields() {
        let page: Page<serde_json::Value> = serde_json::from_str("{}").unwrap();
        assert!(page.content.is_empty());
        assert_eq!(page.total_pages, 0);
        assert!(!page.has_next(&PageRequest::new("id")));
    }
}
