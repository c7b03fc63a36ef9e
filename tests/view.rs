//! Article list view

use std::time::Duration;

use pulse::{
    store::{BookmarkStore, MemoryStorage, Theme},
    view::{
        debounce, ArticleFetcher, Category, Command, EmptyState, FetchOutcome, PageRequest,
        PaginationControls, PaginationMode, RenderEvent, RenderMode, ViewStatus,
    },
};
use pulse_client::ArticleId;

mod common;

use common::{article, corpus, view, view_with_storage};

#[tokio::test]
async fn test_initial_load() {
    let mut view = view(corpus(30), PaginationMode::InfiniteScroll);
    assert_eq!(view.status(), ViewStatus::Idle);

    let status = view.dispatch(Command::Load).await;
    assert_eq!(status, ViewStatus::Loaded { has_more: true });
    assert_eq!(view.renderer().list.len(), 12);
    assert_eq!(view.state().page, 1);
    assert!(!view.state().is_loading);

    let queries = view.fetcher().queries();
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].page, 1);
    assert_eq!(queries[0].page_size, 12);
    assert!(queries[0].category.is_none());
    assert!(queries[0].source.is_none());
    assert!(queries[0].query.is_none());
}

#[tokio::test]
async fn test_infinite_scroll_appends() {
    let mut view = view(corpus(30), PaginationMode::InfiniteScroll);
    view.dispatch(Command::Load).await;

    view.dispatch(Command::Page(PageRequest::SentinelVisible)).await;
    assert_eq!(view.state().page, 2);
    assert_eq!(view.renderer().list.len(), 24);
    assert!(view.state().has_more);

    let status = view.dispatch(Command::Page(PageRequest::SentinelVisible)).await;
    assert_eq!(status, ViewStatus::Loaded { has_more: false });
    assert_eq!(view.state().page, 3);
    assert_eq!(view.renderer().list.len(), 30);
    assert_eq!(
        view.renderer().events.last(),
        Some(&RenderEvent::Controls(PaginationControls::Sentinel {
            visible: false
        }))
    );

    // nothing left: the sentinel no longer triggers requests
    view.dispatch(Command::Page(PageRequest::SentinelVisible)).await;
    assert_eq!(view.fetcher().queries().len(), 3);

    // cards keep the server order across appends
    let ids = view.renderer().ids();
    assert_eq!(ids.first(), Some(&ArticleId::from(1)));
    assert_eq!(ids.last(), Some(&ArticleId::from(30)));
}

#[tokio::test]
async fn test_paged_has_more() {
    let mut view = view(corpus(60), PaginationMode::Paged);
    view.dispatch(Command::Load).await;

    view.dispatch(Command::Page(PageRequest::Next)).await;
    assert_eq!(view.state().page, 2);
    assert!(view.state().has_more);
    assert_eq!(view.renderer().list.len(), 12);
    assert_eq!(view.renderer().ids()[0], ArticleId::from(13));

    for _ in 0..3 {
        view.dispatch(Command::Page(PageRequest::Next)).await;
    }
    assert_eq!(view.state().page, 5);
    assert!(!view.state().has_more);
    assert_eq!(
        view.renderer().events.last(),
        Some(&RenderEvent::Controls(PaginationControls::Pages {
            page: 5,
            total_pages: 5,
            prev_enabled: true,
            next_enabled: false,
        }))
    );

    view.dispatch(Command::Page(PageRequest::Next)).await;
    assert_eq!(view.fetcher().queries().len(), 5);

    view.dispatch(Command::Page(PageRequest::Previous)).await;
    assert_eq!(view.state().page, 4);
    assert!(view.state().has_more);
}

#[tokio::test]
async fn test_no_results() {
    let mut view = view(vec![], PaginationMode::InfiniteScroll);
    let status = view.dispatch(Command::Load).await;

    assert_eq!(status, ViewStatus::Loaded { has_more: false });
    assert!(!view.state().has_more);
    assert_eq!(view.renderer().empty_state(), Some(EmptyState::NoResults));
    assert_eq!(
        view.renderer().events.last(),
        Some(&RenderEvent::Controls(PaginationControls::Hidden))
    );
}

#[tokio::test]
async fn test_filter_change_resets_page() {
    let mut corpus = corpus(30);
    corpus.extend((100..105).map(|id| article(id, "sports", "espn")));
    let mut view = view(corpus, PaginationMode::InfiniteScroll);
    view.dispatch(Command::Load).await;
    view.dispatch(Command::Page(PageRequest::SentinelVisible)).await;
    assert_eq!(view.state().page, 2);

    view.dispatch(Command::SelectCategory(Category::Sports)).await;
    assert_eq!(view.state().page, 1);
    assert_eq!(view.renderer().list.len(), 5);

    let query = view.fetcher().queries().pop().unwrap();
    assert_eq!(query.page, 1);
    assert_eq!(query.category.as_deref(), Some("sports"));

    view.dispatch(Command::SelectSource("espn".into())).await;
    let query = view.fetcher().queries().pop().unwrap();
    assert_eq!(query.category.as_deref(), Some("sports"));
    assert_eq!(query.source.as_deref(), Some("espn"));

    view.dispatch(Command::SelectCategory(Category::All)).await;
    let query = view.fetcher().queries().pop().unwrap();
    assert!(query.category.is_none());
}

#[tokio::test]
async fn test_initial_filters_load_once() {
    let mut corpus = corpus(30);
    corpus.extend((100..105).map(|id| article(id, "sports", "espn")));
    let mut view = view(corpus, PaginationMode::Paged);

    view.set_filters(Category::Sports, " espn ", "story 10");
    assert!(view.fetcher().queries().is_empty());

    view.dispatch(Command::Load).await;
    let queries = view.fetcher().queries();
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].category.as_deref(), Some("sports"));
    assert_eq!(queries[0].source.as_deref(), Some("espn"));
    assert_eq!(queries[0].query.as_deref(), Some("story 10"));
    assert_eq!(view.renderer().list.len(), 5);
}

#[tokio::test(start_paused = true)]
async fn test_debounced_search_fetches_once() {
    let mut view = view(corpus(30), PaginationMode::InfiniteScroll);
    view.dispatch(Command::Load).await;

    let (input, mut search) = debounce::<String>(Duration::from_millis(500));
    for typed in ["a", "ab", "abc"] {
        input.push(typed.to_string());
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    drop(input);
    while let Some(query) = search.next().await {
        view.dispatch(Command::Search(query)).await;
    }

    let queries = view.fetcher().queries();
    assert_eq!(queries.len(), 2);
    assert_eq!(queries[1].query.as_deref(), Some("abc"));
    assert_eq!(queries[1].page, 1);
}

#[tokio::test]
async fn test_saved_view_is_local() {
    let mut bookmarks = BookmarkStore::new(MemoryStorage::new());
    for saved in [
        article(1, "technology", "wired"),
        article(2, "business", "reuters"),
        article(3, "politics", "reuters"),
    ] {
        bookmarks.toggle(&saved);
    }
    let storage = bookmarks.storage().clone();

    let mut view = view_with_storage(corpus(30), storage, PaginationMode::InfiniteScroll);
    let status = view.dispatch(Command::SelectCategory(Category::Saved)).await;

    assert_eq!(status, ViewStatus::Loaded { has_more: false });
    assert!(view.fetcher().queries().is_empty());
    assert_eq!(view.renderer().list.len(), 3);
    assert!(view.renderer().list.iter().all(|card| card.saved));

    view.dispatch(Command::SelectSource("reuters".into())).await;
    assert_eq!(
        view.renderer().ids(),
        vec![ArticleId::from(2), ArticleId::from(3)]
    );

    view.dispatch(Command::Search("STORY 3".into())).await;
    assert_eq!(view.renderer().ids(), vec![ArticleId::from(3)]);

    view.dispatch(Command::SelectSource("Reuters".into())).await;
    assert_eq!(view.renderer().empty_state(), Some(EmptyState::NoResults));

    // no pagination in the saved view
    view.dispatch(Command::Page(PageRequest::SentinelVisible)).await;
    assert!(view.fetcher().queries().is_empty());
}

#[tokio::test]
async fn test_unbookmark_in_saved_view_removes_card() {
    let mut view = view(corpus(3), PaginationMode::InfiniteScroll);
    view.dispatch(Command::Load).await;
    view.dispatch(Command::ToggleBookmark(ArticleId::Int(1))).await;
    view.dispatch(Command::ToggleBookmark(ArticleId::Int(2))).await;
    assert!(view.renderer().list[0].saved);
    assert!(!view.renderer().list[2].saved);

    view.dispatch(Command::SelectCategory(Category::Saved)).await;
    assert_eq!(view.renderer().list.len(), 2);

    view.dispatch(Command::ToggleBookmark(ArticleId::Int(1))).await;
    assert_eq!(view.renderer().ids(), vec![ArticleId::from(2)]);
    assert_eq!(view.articles().len(), 1);
    assert!(view
        .renderer()
        .events
        .contains(&RenderEvent::RemoveCard(ArticleId::Int(1))));
    assert!(!view.bookmarks().is_bookmarked(&ArticleId::Int(1)));
}

#[tokio::test]
async fn test_bookmark_outside_saved_view_keeps_card() {
    let mut view = view(corpus(3), PaginationMode::Paged);
    view.dispatch(Command::Load).await;

    view.dispatch(Command::ToggleBookmark(ArticleId::Int(2))).await;
    view.dispatch(Command::ToggleBookmark(ArticleId::Int(2))).await;
    assert_eq!(view.renderer().list.len(), 3);
    assert!(!view.renderer().list[1].saved);

    // unknown ids are ignored
    view.dispatch(Command::ToggleBookmark(ArticleId::Int(99))).await;
    assert!(view.bookmarks().list().is_empty());
}

#[tokio::test]
async fn test_stale_response_discarded() {
    let mut view = view(corpus(30), PaginationMode::InfiniteScroll);
    view.dispatch(Command::Load).await;

    let ticket = view.begin_fetch(2, RenderMode::Append).unwrap();
    assert!(view.state().is_loading);
    assert!(view.begin_fetch(2, RenderMode::Append).is_none());

    // the change is accepted but its fetch is dropped by the guard
    view.dispatch(Command::Search("story 1".into())).await;
    assert_eq!(view.fetcher().queries().len(), 1);

    let old = view.fetcher().fetch_articles(&ticket.key.to_query(2)).await;
    let outcome = view.finish_fetch(ticket, old).await;
    assert_eq!(outcome, FetchOutcome::Stale);

    // the current filters were reloaded instead
    let query = view.fetcher().queries().pop().unwrap();
    assert_eq!(query.query.as_deref(), Some("story 1"));
    assert_eq!(query.page, 1);
    assert!(view
        .renderer()
        .list
        .iter()
        .all(|card| card.title.starts_with("Story 1")));
}

#[tokio::test]
async fn test_replace_failure_shows_connection_error() {
    let mut view = view(corpus(30), PaginationMode::Paged);
    view.fetcher().set_offline(true);

    let status = view.dispatch(Command::Load).await;
    assert_eq!(status, ViewStatus::Error);
    assert_eq!(
        view.renderer().empty_state(),
        Some(EmptyState::ConnectionError)
    );
    assert!(!view.state().is_loading);

    view.fetcher().set_offline(false);
    let status = view.dispatch(Command::Load).await;
    assert_eq!(status, ViewStatus::Loaded { has_more: true });
    assert_eq!(view.renderer().list.len(), 12);
}

#[tokio::test]
async fn test_sentinel_ignored_until_first_page() {
    let mut view = view(corpus(30), PaginationMode::InfiniteScroll);

    // idle, nothing loaded
    let status = view.dispatch(Command::Page(PageRequest::SentinelVisible)).await;
    assert_eq!(status, ViewStatus::Idle);
    assert!(view.fetcher().queries().is_empty());

    // a failed first page leaves nothing to append to
    view.fetcher().set_offline(true);
    let status = view.dispatch(Command::SelectCategory(Category::Technology)).await;
    assert_eq!(status, ViewStatus::Error);
    assert!(!view.state().has_more);

    view.fetcher().set_offline(false);
    view.dispatch(Command::Page(PageRequest::SentinelVisible)).await;
    assert_eq!(view.fetcher().queries().len(), 1);
    assert!(view.renderer().list.is_empty());

    view.dispatch(Command::Load).await;
    assert_eq!(view.fetcher().queries().pop().unwrap().page, 1);
    assert_eq!(view.renderer().ids()[0], ArticleId::Int(1));
    assert!(view.state().has_more);
}

#[tokio::test]
async fn test_append_failure_keeps_cards() {
    let mut view = view(corpus(30), PaginationMode::InfiniteScroll);
    view.dispatch(Command::Load).await;

    view.fetcher().set_offline(true);
    let status = view.dispatch(Command::Page(PageRequest::SentinelVisible)).await;
    assert_eq!(status, ViewStatus::Error);
    assert_eq!(view.renderer().list.len(), 12);
    assert_eq!(view.state().page, 1);
    assert!(view.state().has_more);

    // the same page is requested again once back online
    view.fetcher().set_offline(false);
    view.dispatch(Command::Page(PageRequest::SentinelVisible)).await;
    assert_eq!(view.fetcher().queries().pop().unwrap().page, 2);
    assert_eq!(view.renderer().list.len(), 24);
}

#[tokio::test(start_paused = true)]
async fn test_sync_reloads_after_grace() {
    let mut view = view(corpus(30), PaginationMode::InfiniteScroll)
        .with_sync_grace(Duration::from_millis(3000));
    view.dispatch(Command::Load).await;
    view.dispatch(Command::Page(PageRequest::SentinelVisible)).await;

    let start = tokio::time::Instant::now();
    view.dispatch(Command::Sync).await;
    assert!(start.elapsed() >= Duration::from_millis(3000));
    assert_eq!(view.fetcher().syncs(), 1);

    let query = view.fetcher().queries().pop().unwrap();
    assert_eq!(query.page, 1);
    assert_eq!(view.renderer().list.len(), 12);

    let busy: Vec<bool> = view
        .renderer()
        .events
        .iter()
        .filter_map(|event| match event {
            RenderEvent::SyncBusy(busy) => Some(*busy),
            _ => None,
        })
        .collect();
    assert_eq!(busy, vec![true, false]);
}

#[tokio::test]
async fn test_sync_failure_reenables() {
    let mut view = view(corpus(3), PaginationMode::InfiniteScroll);
    view.fetcher().set_offline(true);
    view.dispatch(Command::Sync).await;

    assert_eq!(view.fetcher().syncs(), 1);
    assert!(view.fetcher().queries().is_empty());
    assert_eq!(
        view.renderer().events.last(),
        Some(&RenderEvent::SyncBusy(false))
    );
}

#[tokio::test]
async fn test_article_detail() {
    let mut view = view(corpus(3), PaginationMode::InfiniteScroll);
    view.dispatch(Command::Load).await;

    view.dispatch(Command::OpenArticle(ArticleId::Int(2))).await;
    assert_eq!(view.modal(), Some(&ArticleId::from(2)));
    let detail = view
        .renderer()
        .events
        .iter()
        .find_map(|event| match event {
            RenderEvent::OpenModal(detail) => Some(detail.clone()),
            _ => None,
        })
        .unwrap();
    assert_eq!(detail.title, "Story 2");
    assert_eq!(detail.read_time, "4 min read");
    assert_eq!(detail.date, "Jan 5, 2024");
    assert_eq!(detail.source_link, "https://news.example.com/2");

    view.dispatch(Command::CloseArticle).await;
    assert!(view.modal().is_none());
    assert_eq!(view.renderer().events.last(), Some(&RenderEvent::CloseModal));
}

#[tokio::test]
async fn test_theme_toggle() {
    let mut view = view(vec![], PaginationMode::Paged);
    assert_eq!(
        view.renderer().events.first(),
        Some(&RenderEvent::Theme(Theme::Light))
    );

    view.dispatch(Command::ToggleTheme).await;
    assert_eq!(view.theme(), Theme::Dark);
    assert_eq!(
        view.renderer().events.last(),
        Some(&RenderEvent::Theme(Theme::Dark))
    );
}
