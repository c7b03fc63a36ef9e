//! Rendering
//!
//! The controller never touches the presentation layer directly: it builds
//! view-models ([Card], [ArticleDetail], [EmptyState]) and hands them to a
//! [Renderer].

use std::{sync::OnceLock, time::Duration};

use pulse_client::{Article, ArticleId};
use regex::Regex;
use time::{
    format_description::well_known::{Iso8601, Rfc3339},
    macros::format_description,
    Date, OffsetDateTime, PrimitiveDateTime,
};

use super::strategy::{PaginationControls, RenderMode};
use crate::store::Theme;

/// Image shown when an article has none
pub const PLACEHOLDER_IMAGE: &str =
    "https://images.unsplash.com/photo-1504711434969-e33886168f5c?q=80&w=1000&auto=format&fit=crop";
/// Category shown when an article has none
pub const DEFAULT_CATEGORY: &str = "Focus";
/// Author shown when an article has none
pub const DEFAULT_AUTHOR: &str = "Pulse Reporter";
/// Read time shown when an article has none
pub const DEFAULT_READ_TIME: u32 = 3;
/// Fade-out of a card removed from the saved view
pub const CARD_FADE: Duration = Duration::from_millis(300);

/// Formats a publication date as `Jan 5, 2024`
///
/// Missing dates read "Just now"; unparsable ones are shown verbatim.
pub fn format_date(published_at: Option<&str>) -> String {
    let Some(raw) = published_at.map(str::trim).filter(|s| !s.is_empty()) else {
        return "Just now".to_string();
    };

    let date = OffsetDateTime::parse(raw, &Rfc3339)
        .map(|dt| dt.date())
        .or_else(|_| PrimitiveDateTime::parse(raw, &Iso8601::DEFAULT).map(|dt| dt.date()))
        .or_else(|_| Date::parse(raw, format_description!("[year]-[month]-[day]")));

    match date {
        Ok(date) => date
            .format(format_description!(
                "[month repr:short] [day padding:none], [year]"
            ))
            .unwrap_or_else(|_| raw.to_string()),
        Err(_) => raw.to_string(),
    }
}

/// Makes every link of an HTML fragment open in a new browsing context
/// without leaking the opener or the referrer
pub fn rewrite_links(html: &str) -> String {
    static ANCHOR: OnceLock<Regex> = OnceLock::new();
    static TARGET_REL: OnceLock<Regex> = OnceLock::new();

    let anchor = ANCHOR.get_or_init(|| Regex::new(r"(?i)<a\b([^>]*)>").expect("valid regex"));
    let target_rel = TARGET_REL.get_or_init(|| {
        Regex::new(r#"(?i)\s+(?:target|rel)\s*=\s*(?:"[^"]*"|'[^']*'|[^\s>]+)"#)
            .expect("valid regex")
    });

    anchor
        .replace_all(html, |caps: &regex::Captures| {
            let attrs = target_rel.replace_all(&caps[1], "");
            let attrs = attrs.trim_end();
            format!(r#"<a{attrs} target="_blank" rel="noopener noreferrer">"#)
        })
        .into_owned()
}

/// An article card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    /// Article id
    pub id: ArticleId,
    /// Title
    pub title: String,
    /// Description
    pub description: String,
    /// Category label
    pub category: String,
    /// Source
    pub source: String,
    /// Author
    pub author: String,
    /// Formatted date
    pub date: String,
    /// Image url
    pub image_url: String,
    /// Read time badge (e.g. `4m`)
    pub read_time: String,
    /// Bookmarked
    pub saved: bool,
}

impl Card {
    /// Builds the card of an article
    pub fn new(article: &Article, saved: bool) -> Self {
        Self {
            id: article.id.clone(),
            title: article.title.clone(),
            description: article
                .description
                .clone()
                .unwrap_or_else(|| "Click to read full article content...".to_string()),
            category: article
                .category
                .clone()
                .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            source: article.source.clone(),
            author: article
                .author
                .clone()
                .unwrap_or_else(|| DEFAULT_AUTHOR.to_string()),
            date: format_date(article.published_at.as_deref()),
            image_url: article
                .image_url
                .clone()
                .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
            read_time: format!(
                "{}m",
                article.read_time_minutes.unwrap_or(DEFAULT_READ_TIME)
            ),
            saved,
        }
    }
}

/// Detail panel content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleDetail {
    /// Article id
    pub id: ArticleId,
    /// Image url
    pub image_url: String,
    /// Category label
    pub category: String,
    /// Source
    pub source: String,
    /// Formatted date
    pub date: String,
    /// Title
    pub title: String,
    /// Author
    pub author: String,
    /// Read time badge (e.g. `4 min read`)
    pub read_time: String,
    /// Description HTML, links rewritten
    pub description_html: String,
    /// Link to the original article
    pub source_link: String,
}

impl ArticleDetail {
    /// Builds the detail of an article
    pub fn new(article: &Article) -> Self {
        let description = article
            .description
            .as_deref()
            .unwrap_or("No description available for this article.");
        Self {
            id: article.id.clone(),
            image_url: article
                .image_url
                .clone()
                .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
            category: article
                .category
                .clone()
                .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            source: article.source.clone(),
            date: format_date(article.published_at.as_deref()),
            title: article.title.clone(),
            author: article
                .author
                .clone()
                .unwrap_or_else(|| DEFAULT_AUTHOR.to_string()),
            read_time: format!(
                "{} min read",
                article.read_time_minutes.unwrap_or(DEFAULT_READ_TIME)
            ),
            description_html: rewrite_links(description),
            source_link: article.url.clone(),
        }
    }
}

/// What the empty list shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyState {
    /// The query matched nothing
    NoResults,
    /// The API could not be reached
    ConnectionError,
}

impl EmptyState {
    /// Returns the heading
    pub fn title(&self) -> &'static str {
        match self {
            EmptyState::NoResults => "No articles found",
            EmptyState::ConnectionError => "Something went wrong",
        }
    }

    /// Returns the message
    pub fn message(&self) -> &'static str {
        match self {
            EmptyState::NoResults => "Try a different search or filter.",
            EmptyState::ConnectionError => "We're unable to connect to our servers right now.",
        }
    }
}

/// Presentation layer
pub trait Renderer {
    /// Shows or hides the loading indicator
    fn loading(&mut self, visible: bool);

    /// Renders cards, replacing or extending the list
    fn cards(&mut self, cards: &[Card], mode: RenderMode);

    /// Clears the list and shows an empty state
    fn empty(&mut self, state: EmptyState);

    /// Updates the pagination controls
    fn controls(&mut self, controls: &PaginationControls);

    /// Updates the bookmark marker of a card in place
    fn bookmark(&mut self, id: &ArticleId, saved: bool);

    /// Removes a card after a fade-out
    fn remove_card(&mut self, id: &ArticleId, fade: Duration);

    /// Opens the detail panel
    fn open_modal(&mut self, detail: &ArticleDetail);

    /// Closes the detail panel and restores scrolling
    fn close_modal(&mut self);

    /// Marks the sync control busy or idle
    fn sync_busy(&mut self, busy: bool);

    /// Applies a theme
    fn theme(&mut self, theme: Theme);
}

/// A call received by a [RecordingRenderer]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderEvent {
    /// [Renderer::loading]
    Loading(bool),
    /// [Renderer::cards]
    Cards(Vec<Card>, RenderMode),
    /// [Renderer::empty]
    Empty(EmptyState),
    /// [Renderer::controls]
    Controls(PaginationControls),
    /// [Renderer::bookmark]
    Bookmark(ArticleId, bool),
    /// [Renderer::remove_card]
    RemoveCard(ArticleId),
    /// [Renderer::open_modal]
    OpenModal(ArticleDetail),
    /// [Renderer::close_modal]
    CloseModal,
    /// [Renderer::sync_busy]
    SyncBusy(bool),
    /// [Renderer::theme]
    Theme(Theme),
}

/// Headless renderer keeping every call, and the resulting list
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    /// Calls, oldest first
    pub events: Vec<RenderEvent>,
    /// Cards currently shown
    pub list: Vec<Card>,
}

impl RecordingRenderer {
    /// Creates an empty renderer
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the ids of the shown cards
    pub fn ids(&self) -> Vec<ArticleId> {
        self.list.iter().map(|card| card.id.clone()).collect()
    }

    /// Returns the last empty state shown, if the list is empty
    pub fn empty_state(&self) -> Option<EmptyState> {
        if !self.list.is_empty() {
            return None;
        }
        self.events.iter().rev().find_map(|event| match event {
            RenderEvent::Empty(state) => Some(*state),
            _ => None,
        })
    }
}

impl Renderer for RecordingRenderer {
    fn loading(&mut self, visible: bool) {
        self.events.push(RenderEvent::Loading(visible));
    }

    fn cards(&mut self, cards: &[Card], mode: RenderMode) {
        if mode == RenderMode::Replace {
            self.list.clear();
        }
        self.list.extend_from_slice(cards);
        self.events.push(RenderEvent::Cards(cards.to_vec(), mode));
    }

    fn empty(&mut self, state: EmptyState) {
        self.list.clear();
        self.events.push(RenderEvent::Empty(state));
    }

    fn controls(&mut self, controls: &PaginationControls) {
        self.events.push(RenderEvent::Controls(controls.clone()));
    }

    fn bookmark(&mut self, id: &ArticleId, saved: bool) {
        for card in self.list.iter_mut().filter(|card| &card.id == id) {
            card.saved = saved;
        }
        self.events.push(RenderEvent::Bookmark(id.clone(), saved));
    }

    fn remove_card(&mut self, id: &ArticleId, _fade: Duration) {
        self.list.retain(|card| &card.id != id);
        self.events.push(RenderEvent::RemoveCard(id.clone()));
    }

    fn open_modal(&mut self, detail: &ArticleDetail) {
        self.events.push(RenderEvent::OpenModal(detail.clone()));
    }

    fn close_modal(&mut self) {
        self.events.push(RenderEvent::CloseModal);
    }

    fn sync_busy(&mut self, busy: bool) {
        self.events.push(RenderEvent::SyncBusy(busy));
    }

    fn theme(&mut self, theme: Theme) {
        self.events.push(RenderEvent::Theme(theme));
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Map;

    use super::*;

    fn article() -> Article {
        Article {
            id: ArticleId::Int(1),
            title: "Title".into(),
            description: None,
            author: None,
            category: None,
            source: "guardian".into(),
            image_url: None,
            url: "https://example.com/1".into(),
            published_at: None,
            read_time_minutes: None,
            content: None,
            sentiment: None,
            extra: Map::new(),
        }
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(None), "Just now");
        assert_eq!(format_date(Some("")), "Just now");
        assert_eq!(format_date(Some("2024-01-05T10:00:00+00:00")), "Jan 5, 2024");
        assert_eq!(format_date(Some("2023-11-20T23:59:59Z")), "Nov 20, 2023");
        assert_eq!(format_date(Some("2024-03-09T08:15:00")), "Mar 9, 2024");
        assert_eq!(format_date(Some("2024-12-25")), "Dec 25, 2024");
        assert_eq!(format_date(Some("yesterday")), "yesterday");
    }

    #[test]
    fn test_rewrite_links() {
        let html = r#"Read <a href="https://x.org/a">this</a> and <A HREF='/b' target="_self" rel=author>that</A>."#;
        let out = rewrite_links(html);
        assert_eq!(
            out,
            r#"Read <a href="https://x.org/a" target="_blank" rel="noopener noreferrer">this</a> and <a HREF='/b' target="_blank" rel="noopener noreferrer">that</A>."#
        );

        // text without links is untouched, <abbr> is not a link
        let plain = "<p>No <abbr>links</abbr> here</p>";
        assert_eq!(rewrite_links(plain), plain);
    }

    #[test]
    fn test_card_defaults() {
        let card = Card::new(&article(), true);
        assert_eq!(card.category, "Focus");
        assert_eq!(card.author, "Pulse Reporter");
        assert_eq!(card.read_time, "3m");
        assert_eq!(card.image_url, PLACEHOLDER_IMAGE);
        assert_eq!(card.date, "Just now");
        assert_eq!(card.description, "Click to read full article content...");
        assert!(card.saved);
    }

    #[test]
    fn test_detail() {
        let mut article = article();
        let detail = ArticleDetail::new(&article);
        assert_eq!(detail.read_time, "3 min read");
        assert_eq!(
            detail.description_html,
            "No description available for this article."
        );

        article.description = Some(r#"<a href="/x">x</a>"#.into());
        article.read_time_minutes = Some(7);
        article.category = Some("Science".into());
        let detail = ArticleDetail::new(&article);
        assert_eq!(detail.read_time, "7 min read");
        assert_eq!(detail.category, "Science");
        assert_eq!(
            detail.description_html,
            r#"<a href="/x" target="_blank" rel="noopener noreferrer">x</a>"#
        );
        assert_eq!(detail.source_link, "https://example.com/1");
    }

    #[test]
    fn test_recording_renderer() {
        let mut renderer = RecordingRenderer::new();
        let card = Card::new(&article(), false);
        renderer.cards(&[card.clone()], RenderMode::Replace);
        renderer.cards(&[card], RenderMode::Append);
        assert_eq!(renderer.list.len(), 2);

        renderer.bookmark(&ArticleId::Int(1), true);
        assert!(renderer.list.iter().all(|card| card.saved));

        renderer.remove_card(&ArticleId::Int(1), CARD_FADE);
        assert!(renderer.list.is_empty());

        renderer.empty(EmptyState::NoResults);
        assert_eq!(renderer.empty_state(), Some(EmptyState::NoResults));
    }
}
