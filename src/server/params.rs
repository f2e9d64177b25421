//! List request parameters as the local backend reads them

use std::collections::BTreeMap;

use crate::api::envelope::{codes, ApiError};
use crate::api::query::{DEFAULT_LIMIT, DEFAULT_PAGE, MAX_LIMIT};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListParams {
    pub page: u32,
    pub limit: u32,
    pub search: Option<String>,
    pub filters: BTreeMap<String, String>,
}

impl ListParams {
    /// Parse query pairs; page below 1 becomes 1 and limit is clamped to 1..=100
    pub fn parse(pairs: &[(String, String)]) -> Result<Self, ApiError> {
        let mut params = Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            search: None,
            filters: BTreeMap::new(),
        };
        let mut details = BTreeMap::new();

        for (key, value) in pairs {
            match key.as_str() {
                "page" => match value.trim().parse::<i64>() {
                    Ok(page) => params.page = page.clamp(1, i64::from(u32::MAX)) as u32,
                    Err(_) => {
                        details.insert("page".to_string(), "must be a number".to_string());
                    }
                },
                "limit" => match value.trim().parse::<i64>() {
                    Ok(limit) => params.limit = limit.clamp(1, i64::from(MAX_LIMIT)) as u32,
                    Err(_) => {
                        details.insert("limit".to_string(), "must be a number".to_string());
                    }
                },
                "search" => {
                    let search = value.trim();
                    params.search = (!search.is_empty()).then(|| search.to_string());
                }
                _ => {
                    params.filters.insert(key.clone(), value.clone());
                }
            }
        }

        if details.is_empty() {
            Ok(params)
        } else {
            Err(ApiError::new(400, codes::VALIDATION, "Invalid list parameters")
                .with_details(details))
        }
    }

    /// Zero-based index of the first item of the page
    pub fn offset(&self) -> usize {
        (self.page as usize - 1) * self.limit as usize
    }
}
