//! Explicit pagination values.
//!
//! # Invariants
//! - `PageRequest.size` is never zero; any positive size is honored.
//! - `Page.total_elements` counts matches across all pages, not just the
//!   items carried by this page.

/// Page size applied when the caller does not ask for one.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Zero-based page index plus page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
}

impl PageRequest {
    /// Builds a request, normalizing `size` against the page contract.
    pub fn new(page: u32, size: u32) -> Self {
        Self {
            page,
            size: normalize_page_size(Some(size)),
        }
    }

    /// Number of rows preceding this page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page) * u64::from(self.size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Normalizes page size: `None`/`0` falls back to the default.
pub fn normalize_page_size(size: Option<u32>) -> u32 {
    match size {
        Some(0) | None => DEFAULT_PAGE_SIZE,
        Some(value) => value,
    }
}

/// One page of an ordered result set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// Items of this page, in query order.
    pub items: Vec<T>,
    /// Matching elements across all pages.
    pub total_elements: u64,
    /// Requested zero-based page index.
    pub page: u32,
    /// Requested page size.
    pub size: u32,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total_elements: u64, request: PageRequest) -> Self {
        Self {
            items,
            total_elements,
            page: request.page,
            size: request.size,
        }
    }

    /// Empty page for `request`.
    pub fn empty(request: PageRequest) -> Self {
        Self::new(Vec::new(), 0, request)
    }

    pub fn total_pages(&self) -> u64 {
        if self.size == 0 {
            return 0;
        }
        self.total_elements.div_ceil(u64::from(self.size))
    }

    pub fn is_last(&self) -> bool {
        u64::from(self.page) + 1 >= self.total_pages()
    }

    /// Projects items while keeping page metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total_elements: self.total_elements,
            page: self.page,
            size: self.size,
        }
    }
}
