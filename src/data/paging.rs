//! Page bookkeeping for client-sliced and server-paged data.
//!
//! [`PageManager`] tracks the current page, the page size and the total number of
//! matching records. In client mode it slices the in-memory result set; in server
//! mode the total count is reported by the data service and slicing is a no-op
//! because the service already delivered exactly one page.

use serde::{Deserialize, Serialize};

/// Permitted page sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum PageSize {
    Ten,
    #[default]
    TwentyFive,
    Fifty,
    Hundred,
}

impl PageSize {
    /// All permitted sizes in ascending order.
    pub const ALL: [Self; 4] = [Self::Ten, Self::TwentyFive, Self::Fifty, Self::Hundred];

    /// Number of rows per page.
    #[must_use]
    pub const fn rows(self) -> usize {
        match self {
            Self::Ten => 10,
            Self::TwentyFive => 25,
            Self::Fifty => 50,
            Self::Hundred => 100,
        }
    }

    /// Parses a configured value, returning `None` outside the permitted set.
    #[must_use]
    pub const fn from_rows(rows: u32) -> Option<Self> {
        match rows {
            10 => Some(Self::Ten),
            25 => Some(Self::TwentyFive),
            50 => Some(Self::Fifty),
            100 => Some(Self::Hundred),
            _ => None,
        }
    }

    /// Parses a configured value, falling back to the default page size.
    #[must_use]
    pub fn from_rows_or_default(rows: Option<u32>) -> Self {
        match rows {
            None => Self::default(),
            Some(value) => Self::from_rows(value).unwrap_or_else(|| {
                tracing::debug!(configured = value, fallback = Self::default().rows(), "invalid page size, using default");
                Self::default()
            }),
        }
    }
}

impl TryFrom<u32> for PageSize {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::from_rows(value).ok_or_else(|| format!("page size {value} is not one of 10, 25, 50, 100"))
    }
}

impl From<PageSize> for u32 {
    fn from(size: PageSize) -> Self {
        match size {
            PageSize::Ten => 10,
            PageSize::TwentyFive => 25,
            PageSize::Fifty => 50,
            PageSize::Hundred => 100,
        }
    }
}

/// Read-only snapshot of the paging state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// 1-based current page.
    pub current_page: usize,
    /// Number of pages; at least 1 even when there is no data.
    pub page_count: usize,
    /// Rows per page.
    pub page_size: usize,
    /// Number of records across all pages.
    pub total_count: usize,
}

/// Where paging happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagingMode {
    /// The full result set is in memory and sliced locally.
    Client,
    /// The data service returns one page at a time.
    Server,
}

/// Tracks current page, page size and total count.
#[derive(Debug, Clone)]
pub struct PageManager {
    mode: PagingMode,
    enabled: bool,
    page_size: PageSize,
    current_page: usize,
    total_count: usize,
}

impl PageManager {
    /// Creates a page manager positioned on the first page.
    #[must_use]
    pub const fn new(mode: PagingMode, page_size: PageSize, enabled: bool) -> Self {
        Self {
            mode,
            enabled,
            page_size,
            current_page: 1,
            total_count: 0,
        }
    }

    /// Paging mode.
    #[must_use]
    pub const fn mode(&self) -> PagingMode {
        self.mode
    }

    /// Current page size.
    #[must_use]
    pub const fn page_size(&self) -> PageSize {
        self.page_size
    }

    /// 1-based current page.
    #[must_use]
    pub const fn current_page(&self) -> usize {
        self.current_page
    }

    /// Rows per page, or the whole set when paging is disabled.
    #[must_use]
    pub fn effective_page_size(&self) -> usize {
        if self.enabled {
            self.page_size.rows()
        } else {
            self.total_count.max(1)
        }
    }

    /// Number of pages for the current total; never zero.
    #[must_use]
    pub fn page_count(&self) -> usize {
        if !self.enabled || self.total_count == 0 {
            return 1;
        }
        self.total_count.div_ceil(self.page_size.rows())
    }

    /// Updates the total count and clamps the current page into range.
    pub fn set_total_count(&mut self, total: usize) {
        self.total_count = total;
        self.current_page = self.current_page.clamp(1, self.page_count());
    }

    /// Moves to a page, clamped to the valid range. Returns true if the page changed.
    pub fn set_page(&mut self, page: usize) -> bool {
        let target = page.clamp(1, self.page_count());
        let changed = target != self.current_page;
        self.current_page = target;
        changed
    }

    /// Changes the page size and returns to the first page.
    pub fn set_page_size(&mut self, size: PageSize) {
        self.page_size = size;
        self.current_page = 1;
    }

    /// Returns to the first page.
    pub fn reset(&mut self) {
        self.current_page = 1;
    }

    /// Offset of the first row of the current page within the full result set.
    #[must_use]
    pub fn skip(&self) -> usize {
        if self.enabled {
            (self.current_page - 1) * self.page_size.rows()
        } else {
            0
        }
    }

    /// The rows of the current page.
    ///
    /// Server mode returns `rows` unchanged since the service already paged them.
    #[must_use]
    pub fn slice<'a, T>(&self, rows: &'a [T]) -> &'a [T] {
        if self.mode == PagingMode::Server || !self.enabled {
            return rows;
        }
        let start = self.skip().min(rows.len());
        let end = (start + self.page_size.rows()).min(rows.len());
        &rows[start..end]
    }

    /// Snapshot for hosts and projections.
    #[must_use]
    pub fn page_info(&self) -> PageInfo {
        PageInfo {
            current_page: self.current_page,
            page_count: self.page_count(),
            page_size: self.effective_page_size(),
            total_count: self.total_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_page_sizes_fall_back_to_default() {
        assert_eq!(PageSize::from_rows_or_default(Some(10)), PageSize::Ten);
        assert_eq!(PageSize::from_rows_or_default(Some(30)), PageSize::TwentyFive);
        assert_eq!(PageSize::from_rows_or_default(Some(0)), PageSize::TwentyFive);
        assert_eq!(PageSize::from_rows_or_default(None), PageSize::TwentyFive);
    }

    #[test]
    fn client_slicing_and_page_count() {
        let rows: Vec<u32> = (0..12).collect();
        let mut pages = PageManager::new(PagingMode::Client, PageSize::Ten, true);
        pages.set_total_count(rows.len());
        assert_eq!(pages.page_count(), 2);
        assert_eq!(pages.slice(&rows).len(), 10);

        assert!(pages.set_page(2));
        assert_eq!(pages.slice(&rows), &[10, 11]);

        assert!(!pages.set_page(9));
        assert_eq!(pages.current_page(), 2);
    }

    #[test]
    fn shrinking_total_clamps_current_page() {
        let mut pages = PageManager::new(PagingMode::Client, PageSize::Ten, true);
        pages.set_total_count(35);
        pages.set_page(4);
        pages.set_total_count(3);
        assert_eq!(pages.current_page(), 1);
        assert_eq!(pages.page_info().page_count, 1);
    }

    #[test]
    fn disabled_paging_shows_everything() {
        let rows: Vec<u32> = (0..40).collect();
        let mut pages = PageManager::new(PagingMode::Client, PageSize::Ten, false);
        pages.set_total_count(rows.len());
        assert_eq!(pages.page_count(), 1);
        assert_eq!(pages.slice(&rows).len(), 40);
        assert_eq!(pages.page_info().page_size, 40);
    }

    #[test]
    fn server_mode_does_not_slice() {
        let page: Vec<u32> = (0..10).collect();
        let mut pages = PageManager::new(PagingMode::Server, PageSize::Ten, true);
        pages.set_total_count(95);
        pages.set_page(3);
        assert_eq!(pages.skip(), 20);
        assert_eq!(pages.slice(&page).len(), 10);
        assert_eq!(pages.page_count(), 10);
    }
}
