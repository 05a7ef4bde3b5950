//! Paging over historical series.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::currency::CurrencyCode;
use super::rates::{DateSeries, HistoricalSeries};
use crate::error::DomainError;

/// A validated page request. Both fields are at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSpec {
    page: u32,
    page_size: u32,
}

impl PageSpec {
    pub const DEFAULT_PAGE: u32 = 1;
    pub const DEFAULT_PAGE_SIZE: u32 = 10;

    /// Rejects zero page numbers and zero page sizes.
    pub fn new(page: u32, page_size: u32) -> Result<Self, DomainError> {
        if page < 1 || page_size < 1 {
            return Err(DomainError::InvalidPage { page, page_size });
        }
        Ok(Self { page, page_size })
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Number of entries preceding this page.
    pub fn skip(&self) -> usize {
        (self.page as usize - 1).saturating_mul(self.page_size as usize)
    }
}

impl Default for PageSpec {
    fn default() -> Self {
        Self {
            page: Self::DEFAULT_PAGE,
            page_size: Self::DEFAULT_PAGE_SIZE,
        }
    }
}

/// One page of a historical series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PagedResult {
    pub base: CurrencyCode,
    #[schema(value_type = String, example = "2024-01-02")]
    pub start_date: NaiveDate,
    #[schema(value_type = String, example = "2024-01-31")]
    pub end_date: NaiveDate,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 10)]
    pub page_size: u32,
    /// Number of dates in the whole series, not just this page
    #[schema(example = 22)]
    pub total_count: usize,
    #[schema(value_type = Object)]
    pub rates: DateSeries,
}

/// Slices `series` into the requested page without reordering it.
///
/// A page past the end is empty but still reports the full `total_count`.
pub fn paginate(series: &HistoricalSeries, spec: PageSpec) -> PagedResult {
    PagedResult {
        base: series.base.clone(),
        start_date: series.start_date,
        end_date: series.end_date,
        page: spec.page(),
        page_size: spec.page_size(),
        total_count: series.rates.len(),
        rates: series.rates.window(spec.skip(), spec.page_size() as usize),
    }
}
