//! View controller
//!
//! Owns the filter and pagination state, drives the [ArticleFetcher] and
//! pushes view-models to a [Renderer]. One command is handled at a time;
//! hosts that keep requests in flight while accepting input use
//! [ViewController::begin_fetch] and [ViewController::finish_fetch]
//! directly.

use std::{collections::HashSet, time::Duration};

use pulse_client::{Article, ArticleId, ArticlesPage, NetworkError};
use tracing::{debug, error, info, warn};

use super::{
    fetcher::ArticleFetcher,
    render::{ArticleDetail, Card, EmptyState, Renderer, CARD_FADE},
    state::{Category, FilterKey, FilterState},
    strategy::{has_more, PageRequest, PaginationControls, PaginationMode, PaginationStrategy, RenderMode},
};
use crate::store::{BookmarkStore, Storage, Theme, ThemeStore, Toggled};

/// Default delay between an accepted sync and the refresh
pub const SYNC_GRACE: Duration = Duration::from_millis(3000);

/// User command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Loads the first page under the current filters
    Load,
    /// Selects a category
    SelectCategory(Category),
    /// Selects a source, empty for all
    SelectSource(String),
    /// Commits a (debounced) search
    Search(String),
    /// Page navigation
    Page(PageRequest),
    /// Toggles the bookmark of an article
    ToggleBookmark(ArticleId),
    /// Opens the detail of an article
    OpenArticle(ArticleId),
    /// Closes the detail
    CloseArticle,
    /// Asks the backend to refresh its feeds, then reloads
    Sync,
    /// Switches the colour theme
    ToggleTheme,
}

/// View status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewStatus {
    /// Nothing loaded yet
    Idle,
    /// A fetch is in flight
    Loading,
    /// Articles are shown
    Loaded {
        /// More pages are available
        has_more: bool,
    },
    /// The last fetch failed
    Error,
}

/// An in-flight request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    /// Filters the request was issued under
    pub key: FilterKey,
    /// Requested page
    pub page: u32,
    /// How the results are rendered
    pub mode: RenderMode,
}

/// What happened to a fetch result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Articles were rendered
    Rendered,
    /// The response held no articles
    Empty,
    /// The request failed
    Failed,
    /// The filters changed while the request was in flight
    Stale,
}

/// View controller
pub struct ViewController<F, S, R> {
    /// Article source
    fetcher: F,
    /// Presentation layer
    renderer: R,
    /// Bookmarks
    bookmarks: BookmarkStore<S>,
    /// Theme preference
    themes: ThemeStore<S>,
    /// Pagination strategy
    strategy: Box<dyn PaginationStrategy>,
    /// Filters and pagination
    state: FilterState,
    /// Status
    status: ViewStatus,
    /// Articles shown, in order
    articles: Vec<Article>,
    /// Total pages of the last response
    total_pages: u32,
    /// Article shown in the detail panel
    modal: Option<ArticleId>,
    /// Delay between an accepted sync and the refresh
    sync_grace: Duration,
}

impl<F, S, R> ViewController<F, S, R>
where
    F: ArticleFetcher,
    S: Storage + Clone,
    R: Renderer,
{
    /// Creates a controller and applies the saved theme
    pub fn new(fetcher: F, storage: S, mut renderer: R, mode: PaginationMode) -> Self {
        let themes = ThemeStore::new(storage.clone());
        renderer.theme(themes.get());
        Self {
            fetcher,
            renderer,
            bookmarks: BookmarkStore::new(storage),
            themes,
            strategy: mode.strategy(),
            state: FilterState::default(),
            status: ViewStatus::Idle,
            articles: vec![],
            total_pages: 0,
            modal: None,
            sync_grace: SYNC_GRACE,
        }
    }

    /// Sets the delay between an accepted sync and the refresh
    pub fn with_sync_grace(mut self, grace: Duration) -> Self {
        self.sync_grace = grace;
        self
    }

    /// Sets every filter at once without fetching
    ///
    /// Follow with [Command::Load] to show the first page.
    pub fn set_filters(
        &mut self,
        category: Category,
        source: impl Into<String>,
        query: impl Into<String>,
    ) {
        self.state.set_category(category);
        self.state.set_source(source);
        self.state.set_query(query);
    }

    /// Returns the filter and pagination state
    pub fn state(&self) -> &FilterState {
        &self.state
    }

    /// Returns the status
    pub fn status(&self) -> ViewStatus {
        self.status
    }

    /// Returns the pagination mode
    pub fn mode(&self) -> PaginationMode {
        self.strategy.mode()
    }

    /// Returns the articles shown
    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    /// Returns the article shown in the detail panel
    pub fn modal(&self) -> Option<&ArticleId> {
        self.modal.as_ref()
    }

    /// Returns the bookmarks
    pub fn bookmarks(&self) -> &BookmarkStore<S> {
        &self.bookmarks
    }

    /// Returns the current theme
    pub fn theme(&self) -> Theme {
        self.themes.get()
    }

    /// Returns the article source
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Returns the renderer
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Returns the renderer, mutably
    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Handles a command and returns the resulting status
    pub async fn dispatch(&mut self, command: Command) -> ViewStatus {
        debug!(?command, "dispatch");
        match command {
            Command::Load => self.refresh().await,
            Command::SelectCategory(category) => {
                self.state.set_category(category);
                self.refresh().await;
            }
            Command::SelectSource(source) => {
                self.state.set_source(source);
                self.refresh().await;
            }
            Command::Search(query) => {
                self.state.set_query(query);
                self.refresh().await;
            }
            Command::Page(request) => self.navigate(request).await,
            Command::ToggleBookmark(id) => self.toggle_bookmark(&id),
            Command::OpenArticle(id) => self.open_article(&id),
            Command::CloseArticle => self.close_article(),
            Command::Sync => self.sync().await,
            Command::ToggleTheme => {
                let theme = self.themes.toggle();
                info!(%theme, "theme switched");
                self.renderer.theme(theme);
            }
        }
        self.status
    }

    /// Marks a fetch as started
    ///
    /// Returns `None`, and leaves everything untouched, while another
    /// fetch is in flight.
    pub fn begin_fetch(&mut self, page: u32, mode: RenderMode) -> Option<FetchTicket> {
        if self.state.is_loading {
            debug!(page, "fetch dropped, another one is in flight");
            return None;
        }
        self.state.is_loading = true;
        self.status = ViewStatus::Loading;
        if mode == RenderMode::Replace {
            self.renderer.loading(true);
        }
        Some(FetchTicket {
            key: self.state.key(),
            page,
            mode,
        })
    }

    /// Applies the result of a fetch
    ///
    /// A result issued under filters that are no longer current is
    /// discarded and reported as [FetchOutcome::Stale].
    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<ArticlesPage, NetworkError>,
    ) -> FetchOutcome {
        self.state.is_loading = false;
        if ticket.mode == RenderMode::Replace {
            self.renderer.loading(false);
        }

        if ticket.key != self.state.key() {
            debug!(page = ticket.page, "stale response discarded");
            self.status = ViewStatus::Idle;
            return FetchOutcome::Stale;
        }

        let response = match result {
            Ok(response) => response,
            Err(err) => {
                error!(%err, page = ticket.page, "error fetching news");
                self.status = ViewStatus::Error;
                if ticket.mode == RenderMode::Replace {
                    self.state.has_more = false;
                    self.articles.clear();
                    self.renderer.empty(EmptyState::ConnectionError);
                    self.renderer.controls(&PaginationControls::Hidden);
                }
                return FetchOutcome::Failed;
            }
        };

        if response.articles.is_empty() {
            self.state.has_more = false;
            self.status = ViewStatus::Loaded { has_more: false };
            if ticket.mode == RenderMode::Replace {
                self.state.page = ticket.page;
                self.articles.clear();
                self.renderer.empty(EmptyState::NoResults);
            }
            let controls = self.controls();
            self.renderer.controls(&controls);
            return FetchOutcome::Empty;
        }

        self.state.page = ticket.page;
        self.total_pages = self.strategy.total_pages(&response);
        self.state.has_more = has_more(ticket.page, self.total_pages);
        self.status = ViewStatus::Loaded {
            has_more: self.state.has_more,
        };
        info!(
            page = ticket.page,
            total_pages = self.total_pages,
            count = response.articles.len(),
            "articles loaded"
        );

        let cards = self.cards(&response.articles);
        match ticket.mode {
            RenderMode::Replace => self.articles = response.articles,
            RenderMode::Append => self.articles.extend(response.articles),
        }
        self.renderer.cards(&cards, ticket.mode);
        let controls = self.controls();
        self.renderer.controls(&controls);
        FetchOutcome::Rendered
    }

    /// Applies the result of a fetch, reloading the current filters if it
    /// turned out stale
    pub async fn finish_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<ArticlesPage, NetworkError>,
    ) -> FetchOutcome {
        let outcome = self.complete_fetch(ticket, result);
        if outcome == FetchOutcome::Stale {
            self.refresh().await;
        }
        outcome
    }

    /// Shows the first page under the current filters
    async fn refresh(&mut self) {
        if self.state.category.is_saved() {
            self.show_saved();
        } else {
            self.load(1, RenderMode::Replace).await;
        }
    }

    /// Handles a page navigation
    async fn navigate(&mut self, request: PageRequest) {
        match self.strategy.target(&self.state, request) {
            Some(page) => self.load(page, self.strategy.render_mode()).await,
            None => debug!(?request, "page request ignored"),
        }
    }

    /// Fetches and renders a page
    async fn load(&mut self, page: u32, mode: RenderMode) {
        let Some(ticket) = self.begin_fetch(page, mode) else {
            return;
        };
        let query = ticket.key.to_query(ticket.page);
        let result = self.fetcher.fetch_articles(&query).await;
        self.complete_fetch(ticket, result);
    }

    /// Renders the bookmarks matching the filters
    fn show_saved(&mut self) {
        let saved = filter_saved(self.bookmarks.list(), &self.state.source, &self.state.query);
        debug!(count = saved.len(), "showing saved articles");

        self.state.page = 1;
        self.state.has_more = false;
        self.status = ViewStatus::Loaded { has_more: false };
        if saved.is_empty() {
            self.articles.clear();
            self.renderer.empty(EmptyState::NoResults);
        } else {
            let cards: Vec<Card> = saved.iter().map(|article| Card::new(article, true)).collect();
            self.articles = saved;
            self.renderer.cards(&cards, RenderMode::Replace);
        }
        let controls = self.controls();
        self.renderer.controls(&controls);
    }

    /// Builds the cards of a batch
    fn cards(&self, articles: &[Article]) -> Vec<Card> {
        let saved: HashSet<ArticleId> = self
            .bookmarks
            .list()
            .into_iter()
            .map(|article| article.id)
            .collect();
        articles
            .iter()
            .map(|article| Card::new(article, saved.contains(&article.id)))
            .collect()
    }

    /// Returns the controls for the current state
    fn controls(&self) -> PaginationControls {
        if self.articles.is_empty() {
            PaginationControls::Hidden
        } else {
            self.strategy.controls(&self.state, self.total_pages)
        }
    }

    /// Finds an article shown or bookmarked
    fn find(&self, id: &ArticleId) -> Option<Article> {
        self.articles
            .iter()
            .find(|article| &article.id == id)
            .cloned()
            .or_else(|| self.bookmarks.list().into_iter().find(|article| &article.id == id))
    }

    /// Toggles a bookmark
    fn toggle_bookmark(&mut self, id: &ArticleId) {
        let Some(article) = self.find(id) else {
            warn!(%id, "cannot bookmark an unknown article");
            return;
        };

        let saved = self.bookmarks.toggle(&article) == Toggled::Added;
        self.renderer.bookmark(id, saved);

        if !saved && self.state.category.is_saved() {
            self.articles.retain(|article| &article.id != id);
            self.renderer.remove_card(id, CARD_FADE);
        }
    }

    /// Opens the detail panel
    fn open_article(&mut self, id: &ArticleId) {
        let Some(article) = self.find(id) else {
            warn!(%id, "cannot open an unknown article");
            return;
        };
        self.renderer.open_modal(&ArticleDetail::new(&article));
        self.modal = Some(id.clone());
    }

    /// Closes the detail panel
    fn close_article(&mut self) {
        if self.modal.take().is_some() {
            self.renderer.close_modal();
        }
    }

    /// Triggers a backend sync and reloads once it had time to run
    async fn sync(&mut self) {
        self.renderer.sync_busy(true);
        match self.fetcher.trigger_sync().await {
            Ok(()) => {
                info!(grace_ms = self.sync_grace.as_millis() as u64, "sync started");
                tokio::time::sleep(self.sync_grace).await;
                self.refresh().await;
            }
            Err(err) => error!(%err, "sync error"),
        }
        self.renderer.sync_busy(false);
    }
}

/// Keeps the bookmarks matching a source (exact) and a search text
/// (case-insensitive, in title or description)
pub fn filter_saved(articles: Vec<Article>, source: &str, query: &str) -> Vec<Article> {
    let query = query.to_lowercase();
    articles
        .into_iter()
        .filter(|article| source.is_empty() || article.source == source)
        .filter(|article| {
            query.is_empty()
                || article.title.to_lowercase().contains(&query)
                || article
                    .description
                    .as_deref()
                    .is_some_and(|description| description.to_lowercase().contains(&query))
        })
        .collect()
}
