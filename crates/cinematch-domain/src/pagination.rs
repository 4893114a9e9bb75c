//! Pagination parameters shared by list endpoints.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PER_PAGE: u32 = 25;
pub const MAX_PER_PAGE: u32 = 100;

/// Page selector deserialized straight from query params; call [`clamped`]
/// before using the values.
///
/// [`clamped`]: PageRequest::clamped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    #[serde(default = "default_per_page", rename = "per-page")]
    pub per_page: u32,
    #[serde(default = "default_page")]
    pub page: u32,
}

fn default_per_page() -> u32 {
    DEFAULT_PER_PAGE
}

fn default_page() -> u32 {
    1
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            per_page: DEFAULT_PER_PAGE,
            page: 1,
        }
    }
}

impl PageRequest {
    /// Force `per_page` into 1..=MAX_PER_PAGE and `page` to at least 1.
    pub fn clamped(self) -> Self {
        Self {
            per_page: self.per_page.clamp(1, MAX_PER_PAGE),
            page: self.page.max(1),
        }
    }

    /// Rows to skip for this page. Assumes the request is already clamped.
    pub fn offset(&self) -> u64 {
        u64::from((self.page - 1) * self.per_page)
    }

    /// Rows per page as a query limit.
    pub fn limit(&self) -> u64 {
        u64::from(self.per_page)
    }
}
