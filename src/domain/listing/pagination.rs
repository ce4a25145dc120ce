//! Pagination planning from raw query parameters

use crate::domain::cache::{CacheKeyGenerator, CacheKeyParams, DefaultKeyGenerator};

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_RECORDS_PER_PAGE: i64 = 10;

/// Resolved pagination for one listing request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagePlan {
    pub page: i64,
    pub records_per_page: i64,
    /// Offset of the first item; may be negative when supplied explicitly
    pub start_index: i64,
}

impl Default for PagePlan {
    fn default() -> Self {
        Self::resolve(None, None, None)
    }
}

impl PagePlan {
    /// Resolves raw parameters into a plan. Never fails.
    ///
    /// `page` and `records_per_page` fall back to their defaults when absent,
    /// non-numeric, or below 1. A `start_index` that parses as an integer
    /// replaces the computed offset unconditionally; anything else is ignored.
    pub fn resolve(
        page: Option<&str>,
        records_per_page: Option<&str>,
        start_index: Option<&str>,
    ) -> Self {
        let page = parse_positive(page).unwrap_or(DEFAULT_PAGE);
        let records_per_page = parse_positive(records_per_page).unwrap_or(DEFAULT_RECORDS_PER_PAGE);

        let start_index = start_index
            .and_then(|raw| raw.parse::<i64>().ok())
            .unwrap_or_else(|| (page - 1).saturating_mul(records_per_page));

        Self {
            page,
            records_per_page,
            start_index,
        }
    }

    /// Cache key for this plan under the given resource name, e.g.
    /// `foods:page=1:perPage=10:startIndex=0`
    pub fn cache_key(&self, resource: &str) -> String {
        let params = CacheKeyParams::new(resource)
            .with_component("page", self.page)
            .with_component("perPage", self.records_per_page)
            .with_component("startIndex", self.start_index);

        DefaultKeyGenerator::new().generate(&params)
    }
}

fn parse_positive(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|value| value.parse::<i64>().ok())
        .filter(|value| *value >= 1)
}
