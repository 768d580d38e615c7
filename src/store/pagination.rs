//! Offset pagination over in-memory result sets.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: usize = 20;
pub const MAX_PAGE_SIZE: usize = 100;

/// Query parameters for a paginated listing. `page` is one-based.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct PageParams {
    pub page: usize,
    pub size: usize,
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            page: 1,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageParams {
    /// Whether the parameters are within the accepted bounds.
    pub fn is_valid(&self) -> bool {
        self.page >= 1 && (1..=MAX_PAGE_SIZE).contains(&self.size)
    }

    pub fn offset(&self) -> usize {
        self.page.saturating_sub(1).saturating_mul(self.size)
    }
}

/// One page of results plus totals.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub page: usize,
    pub size: usize,
    pub pages: usize,
}

/// Slice `items` according to `params`.
pub fn paginate<T: Clone>(items: &[T], params: PageParams) -> Page<T> {
    let total = items.len();
    let start = params.offset().min(total);
    let end = start.saturating_add(params.size).min(total);
    Page {
        items: items[start..end].to_vec(),
        total,
        page: params.page,
        size: params.size,
        pages: if params.size == 0 { 0 } else { total.div_ceil(params.size) },
    }
}
