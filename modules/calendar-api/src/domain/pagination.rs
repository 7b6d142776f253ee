//! Page-number pagination.

use crate::config::ServiceConfig;

/// Largest row offset a database accepts as a bound `BIGINT`.
const MAX_OFFSET: u64 = i64::MAX.unsigned_abs();

/// A validated page request. Pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub per_page: u64,
}

impl PageRequest {
    /// Page `0` is treated as `1`; `per_page` is clamped to `[1, max_per_page]`.
    /// Pages past the largest representable offset are pulled back to it.
    #[must_use]
    pub fn new(page: Option<u64>, per_page: Option<u64>, cfg: &ServiceConfig) -> Self {
        let max = cfg.max_per_page.max(1);
        let per_page = per_page.unwrap_or(cfg.default_per_page).clamp(1, max);
        let last_page = MAX_OFFSET.div_euclid(per_page).saturating_add(1);
        Self {
            page: page.unwrap_or(1).clamp(1, last_page),
            per_page,
        }
    }

    #[must_use]
    pub fn offset(&self) -> u64 {
        self.page
            .saturating_sub(1)
            .saturating_mul(self.per_page)
            .min(MAX_OFFSET)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None, &ServiceConfig::default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
    pub total_pages: u64,
}

impl PageInfo {
    #[must_use]
    pub fn new(req: PageRequest, total: u64) -> Self {
        Self {
            page: req.page,
            per_page: req.per_page,
            total,
            total_pages: total.div_ceil(req.per_page.max(1)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub info: PageInfo,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            info: self.info,
        }
    }
}
