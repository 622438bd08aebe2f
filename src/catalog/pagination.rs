//! Pagination control derivation for the presentation layer.
//!
//! Page numbers here are one-based, matching what the user sees.

use serde::Serialize;

use crate::constants::MAX_VISIBLE_PAGES;

/// `max(1, ceil(total / page_size))`; a zero page size yields one page.
pub fn total_pages(total: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 1;
    }
    total.div_ceil(page_size).max(1)
}

/// One entry of the page-button row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageMarker {
    Page(usize),
    Ellipsis,
}

impl Serialize for PageMarker {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PageMarker::Page(n) => serializer.serialize_u64(*n as u64),
            PageMarker::Ellipsis => serializer.serialize_str("..."),
        }
    }
}

impl std::fmt::Display for PageMarker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PageMarker::Page(n) => write!(f, "{n}"),
            PageMarker::Ellipsis => f.write_str("..."),
        }
    }
}

/// Visible page buttons for `current` of `total_pages`.
///
/// Shows every page up to [`MAX_VISIBLE_PAGES`]; beyond that keeps the first
/// and last page and one ellipsis for each truncated side.
pub fn page_window(current: usize, total_pages: usize) -> Vec<PageMarker> {
    use PageMarker::{Ellipsis, Page};

    let last = total_pages.max(1);
    if last <= MAX_VISIBLE_PAGES {
        return (1..=last).map(Page).collect();
    }

    if current <= 3 {
        vec![Page(1), Page(2), Page(3), Page(4), Ellipsis, Page(last)]
    } else if current >= last - 2 {
        vec![
            Page(1),
            Ellipsis,
            Page(last - 3),
            Page(last - 2),
            Page(last - 1),
            Page(last),
        ]
    } else {
        vec![
            Page(1),
            Ellipsis,
            Page(current - 1),
            Page(current),
            Page(current + 1),
            Ellipsis,
            Page(last),
        ]
    }
}

/// Everything a pager widget needs for one result page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationControls {
    /// One-based current page.
    pub current: usize,
    pub total_pages: usize,
    pub has_prev: bool,
    pub has_next: bool,
    pub window: Vec<PageMarker>,
}

impl PaginationControls {
    /// Derives controls from a zero-based page index.
    pub fn derive(page: usize, total: usize, page_size: usize) -> Self {
        let total_pages = total_pages(total, page_size);
        let current = page.saturating_add(1);
        Self {
            current,
            total_pages,
            has_prev: current > 1,
            has_next: current < total_pages,
            window: page_window(current, total_pages),
        }
    }
}
