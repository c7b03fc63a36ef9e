//! Article list view

mod controller;
mod debounce;
mod fetcher;
mod install;
mod render;
mod state;
mod strategy;

pub use controller::{
    filter_saved, Command, FetchOutcome, FetchTicket, ViewController, ViewStatus, SYNC_GRACE,
};
pub use debounce::{debounce, DebounceInput, Debouncer, SEARCH_DEBOUNCE};
pub use fetcher::ArticleFetcher;
pub use install::{DeferredPrompt, InstallOutcome, InstallPrompt};
pub use render::{
    format_date, rewrite_links, ArticleDetail, Card, EmptyState, RecordingRenderer, RenderEvent,
    Renderer, CARD_FADE, DEFAULT_AUTHOR, DEFAULT_CATEGORY, DEFAULT_READ_TIME, PLACEHOLDER_IMAGE,
};
pub use state::{Category, FilterKey, FilterState, PAGE_SIZE};
pub use strategy::{
    has_more, InfiniteScrollStrategy, PageRequest, PagedStrategy, PaginationControls,
    PaginationMode, PaginationStrategy, RenderMode,
};
