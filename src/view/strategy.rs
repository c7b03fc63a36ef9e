//! Pagination strategies

use std::fmt::Debug;

use pulse_client::ArticlesPage;
use serde::Deserialize;

use super::state::{FilterState, PAGE_SIZE};

/// Pagination strategy selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaginationMode {
    /// Previous/next controls, one page shown at a time
    Paged,
    /// Pages appended when the end of the list comes into view
    #[default]
    InfiniteScroll,
}

impl PaginationMode {
    /// Returns the strategy for this mode
    pub fn strategy(self) -> Box<dyn PaginationStrategy> {
        match self {
            PaginationMode::Paged => Box::new(PagedStrategy),
            PaginationMode::InfiniteScroll => Box::new(InfiniteScrollStrategy),
        }
    }
}

/// How new results are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Replace the current list
    Replace,
    /// Append to the current list
    Append,
}

/// A page navigation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageRequest {
    /// Next page control
    Next,
    /// Previous page control
    Previous,
    /// The end-of-list sentinel came into view
    SentinelVisible,
}

/// Pagination controls under the list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaginationControls {
    /// Page numbers with previous/next controls
    Pages {
        /// Current page
        page: u32,
        /// Total pages (at least 1)
        total_pages: u32,
        /// Previous control enabled
        prev_enabled: bool,
        /// Next control enabled
        next_enabled: bool,
    },
    /// Infinite scroll sentinel
    Sentinel {
        /// The sentinel is observed
        visible: bool,
    },
    /// No controls
    Hidden,
}

/// Checks if pages remain after `page`
pub fn has_more(page: u32, total_pages: u32) -> bool {
    page < total_pages
}

/// Pagination strategy
pub trait PaginationStrategy: Debug + Send + Sync {
    /// Returns the mode
    fn mode(&self) -> PaginationMode;

    /// Returns the page to fetch for a navigation request
    ///
    /// `None` means the request does not apply in the current state and
    /// is dropped.
    fn target(&self, state: &FilterState, request: PageRequest) -> Option<u32>;

    /// Returns how the results of a page navigation are rendered
    fn render_mode(&self) -> RenderMode;

    /// Returns the number of pages of a response
    fn total_pages(&self, page: &ArticlesPage) -> u32;

    /// Returns the controls for a state
    fn controls(&self, state: &FilterState, total_pages: u32) -> PaginationControls;
}

/// Classic page-numbered pagination
#[derive(Debug, Clone, Copy, Default)]
pub struct PagedStrategy;

impl PaginationStrategy for PagedStrategy {
    fn mode(&self) -> PaginationMode {
        PaginationMode::Paged
    }

    fn target(&self, state: &FilterState, request: PageRequest) -> Option<u32> {
        if state.category.is_saved() {
            return None;
        }
        match request {
            PageRequest::Next if state.has_more => Some(state.page + 1),
            PageRequest::Previous if state.page > 1 => Some(state.page - 1),
            _ => None,
        }
    }

    fn render_mode(&self) -> RenderMode {
        RenderMode::Replace
    }

    fn total_pages(&self, page: &ArticlesPage) -> u32 {
        let pages = (page.total as f64 / PAGE_SIZE as f64).ceil() as u32;
        pages.max(1)
    }

    fn controls(&self, state: &FilterState, total_pages: u32) -> PaginationControls {
        if state.category.is_saved() {
            return PaginationControls::Hidden;
        }
        let total_pages = total_pages.max(1);
        PaginationControls::Pages {
            page: state.page,
            total_pages,
            prev_enabled: state.page > 1,
            next_enabled: state.page < total_pages,
        }
    }
}

/// Infinite scroll pagination
#[derive(Debug, Clone, Copy, Default)]
pub struct InfiniteScrollStrategy;

impl PaginationStrategy for InfiniteScrollStrategy {
    fn mode(&self) -> PaginationMode {
        PaginationMode::InfiniteScroll
    }

    fn target(&self, state: &FilterState, request: PageRequest) -> Option<u32> {
        match request {
            PageRequest::SentinelVisible
                if !state.is_loading && state.has_more && !state.category.is_saved() =>
            {
                Some(state.page + 1)
            }
            _ => None,
        }
    }

    fn render_mode(&self) -> RenderMode {
        RenderMode::Append
    }

    fn total_pages(&self, page: &ArticlesPage) -> u32 {
        page.total_pages
    }

    fn controls(&self, state: &FilterState, _total_pages: u32) -> PaginationControls {
        PaginationControls::Sentinel {
            visible: state.has_more && !state.category.is_saved(),
        }
    }
}
