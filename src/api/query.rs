//! List query parameters

use std::collections::BTreeMap;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;
pub const MAX_LIMIT: u32 = 100;

/// Parameters of a list request: page, limit, search and facet filters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub page: u32,
    pub limit: u32,
    pub search: Option<String>,
    /// Exact-match filters keyed by wire field name (e.g. `economicGroupId`)
    pub facets: BTreeMap<String, String>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            search: None,
            facets: BTreeMap::new(),
        }
    }
}

impl ListQuery {
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page,
            limit,
            ..Self::default()
        }
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn facet(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.facets.insert(key.into(), value.to_string());
        self
    }

    /// Query pairs in wire order; a blank search is omitted
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("page".to_string(), self.page.to_string()),
            ("limit".to_string(), self.limit.to_string()),
        ];
        if let Some(search) = self.search.as_deref().map(str::trim) {
            if !search.is_empty() {
                pairs.push(("search".to_string(), search.to_string()));
            }
        }
        for (key, value) in &self.facets {
            pairs.push((key.clone(), value.clone()));
        }
        pairs
    }

    /// `page=1&limit=10&search=...`, percent-encoded
    pub fn query_string(&self) -> String {
        encode_pairs(&self.to_pairs())
    }
}

/// Percent-encode query pairs as `k=v&k=v`
pub fn encode_pairs(pairs: &[(String, String)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}
