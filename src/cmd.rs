//! Commands

use std::fmt;

use anyhow::Error;
use clap::{Args, Parser, Subcommand};
use inquire::{Select, Text};
use pulse::{
    config::AppConfig,
    offline::{default_manifest, HttpAssetFetcher, OfflineCacheManager},
    store::{BookmarkStore, FileStorage},
    trace,
    view::{
        debounce, filter_saved, Card, Category, Command, PageRequest, PaginationMode,
        ViewController, ViewStatus,
    },
};

use crate::{
    term::TerminalRenderer,
    util::{info, success, warn},
};

/// Runs the program
pub async fn run() -> Result<(), Error> {
    let args = MainArgs::parse();
    let cfg = AppConfig::load()?;
    trace::init_tracer(&cfg.trace)?;

    match args.commands {
        MainCommands::Browse(args) => run_browse_cmd(&cfg, args).await,
        MainCommands::Saved(args) => run_saved_cmd(&cfg, args),
        MainCommands::Sync => run_sync_cmd(&cfg).await,
        MainCommands::Health => run_health_cmd(&cfg).await,
        MainCommands::Precache => run_precache_cmd(&cfg).await,
        MainCommands::Config => run_config_cmd(&cfg),
    }
}

/// CLI main arguments
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct MainArgs {
    #[command(subcommand)]
    pub commands: MainCommands,
}

/// CLI main commands
#[derive(Subcommand)]
pub enum MainCommands {
    /// Browse the articles
    Browse(BrowseArgs),
    /// List the saved articles
    Saved(FilterArgs),
    /// Ask the backend to refresh its feeds
    Sync,
    /// Check the API
    Health,
    /// Pre-cache the offline shell
    Precache,
    /// Show the configuration
    Config,
}

/// Filters
#[derive(Args)]
pub struct FilterArgs {
    /// Source
    #[arg(long, default_value = "")]
    source: String,
    /// Search text
    #[arg(short, long, default_value = "")]
    query: String,
}

/// Browse arguments
#[derive(Args)]
pub struct BrowseArgs {
    /// Category
    #[arg(short, long, default_value = "all")]
    category: Category,
    /// Filters
    #[command(flatten)]
    filters: FilterArgs,
    /// Use page-numbered pagination
    #[arg(long)]
    paged: bool,
}

/// Browse session actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    More,
    Next,
    Previous,
    Open,
    Bookmark,
    Category,
    Source,
    Search,
    Sync,
    Theme,
    Quit,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Action::More => "Load more",
            Action::Next => "Next page",
            Action::Previous => "Previous page",
            Action::Open => "Read an article",
            Action::Bookmark => "Save / unsave an article",
            Action::Category => "Change category",
            Action::Source => "Filter by source",
            Action::Search => "Search",
            Action::Sync => "Sync news",
            Action::Theme => "Toggle theme",
            Action::Quit => "Quit",
        };
        write!(f, "{s}")
    }
}

/// Runs an interactive browse session
async fn run_browse_cmd(cfg: &AppConfig, args: BrowseArgs) -> Result<(), Error> {
    let storage = FileStorage::open(cfg.storage.dir()?)?;
    let mode = if args.paged {
        PaginationMode::Paged
    } else {
        cfg.view.pagination
    };
    let mut view: Browser =
        ViewController::new(cfg.api.client(), storage, TerminalRenderer::new(), mode)
            .with_sync_grace(cfg.view.sync_grace());
    let (search_input, mut search) = debounce::<String>(cfg.view.search_debounce());

    view.set_filters(args.category, args.filters.source, args.filters.query);
    view.dispatch(Command::Load).await;

    loop {
        let action = Select::new("What next?", actions(&view)).prompt()?;
        let command = match action {
            Action::More => Command::Page(PageRequest::SentinelVisible),
            Action::Next => Command::Page(PageRequest::Next),
            Action::Previous => Command::Page(PageRequest::Previous),
            Action::Open => {
                let Some(id) = pick_card(view.renderer().cards())? else {
                    continue;
                };
                view.dispatch(Command::OpenArticle(id.clone())).await;
                let saved = view.bookmarks().is_bookmarked(&id);
                let toggle = if saved { "Unsave" } else { "Save" };
                let choice = Select::new("Article:", vec![toggle, "Back"]).prompt()?;
                if choice != "Back" {
                    view.dispatch(Command::ToggleBookmark(id)).await;
                }
                Command::CloseArticle
            }
            Action::Bookmark => match pick_card(view.renderer().cards())? {
                Some(id) => Command::ToggleBookmark(id),
                None => continue,
            },
            Action::Category => {
                let category = Select::new("Category:", Category::ALL.to_vec()).prompt()?;
                Command::SelectCategory(category)
            }
            Action::Source => {
                let source = Text::new("Source (empty for all):")
                    .with_initial_value(&view.state().source)
                    .prompt()?;
                Command::SelectSource(source)
            }
            Action::Search => {
                let query = Text::new("Search:")
                    .with_initial_value(&view.state().query)
                    .prompt()?;
                search_input.push(query);
                match search.next().await {
                    Some(query) => Command::Search(query),
                    None => continue,
                }
            }
            Action::Sync => Command::Sync,
            Action::Theme => Command::ToggleTheme,
            Action::Quit => break,
        };

        if view.dispatch(command).await == ViewStatus::Error {
            warn("the last request failed, check the API url with `pulse config`");
        }
    }
    Ok(())
}

/// Browse session view
type Browser = ViewController<pulse_client::Client, FileStorage, TerminalRenderer>;

/// Returns the actions available in the current state
fn actions(view: &Browser) -> Vec<Action> {
    let state = view.state();
    let mut actions = vec![];
    if !state.category.is_saved() && state.has_more {
        actions.push(match view.mode() {
            PaginationMode::InfiniteScroll => Action::More,
            PaginationMode::Paged => Action::Next,
        });
    }
    if view.mode() == PaginationMode::Paged && !state.category.is_saved() && state.page > 1 {
        actions.push(Action::Previous);
    }
    if !view.articles().is_empty() {
        actions.extend([Action::Open, Action::Bookmark]);
    }
    actions.extend([
        Action::Category,
        Action::Source,
        Action::Search,
        Action::Sync,
        Action::Theme,
        Action::Quit,
    ]);
    actions
}

/// Card choice, numbered as shown
struct CardOption<'a> {
    index: usize,
    card: &'a Card,
}

impl fmt::Display for CardOption<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>3}. {}", self.index + 1, self.card.title)
    }
}

/// Asks for one of the shown cards
fn pick_card(cards: &[Card]) -> Result<Option<pulse_client::ArticleId>, Error> {
    if cards.is_empty() {
        info("no articles shown");
        return Ok(None);
    }
    let options: Vec<CardOption> = cards
        .iter()
        .enumerate()
        .map(|(index, card)| CardOption { index, card })
        .collect();
    let choice = Select::new("Article:", options).prompt_skippable()?;
    Ok(choice.map(|option| option.card.id.clone()))
}

/// Lists the saved articles
fn run_saved_cmd(cfg: &AppConfig, args: FilterArgs) -> Result<(), Error> {
    let storage = FileStorage::open(cfg.storage.dir()?)?;
    let bookmarks = BookmarkStore::new(storage);
    let saved = filter_saved(bookmarks.list(), &args.source, &args.query);
    if saved.is_empty() {
        info("no saved articles");
        return Ok(());
    }
    println!("Saved articles:");
    for (i, article) in saved.iter().enumerate() {
        let card = Card::new(article, true);
        println!("{:>3}. {} ({}, {})", i + 1, card.title, card.source, card.date);
        println!("     {}", article.url);
    }
    Ok(())
}

/// Triggers a backend sync
async fn run_sync_cmd(cfg: &AppConfig) -> Result<(), Error> {
    cfg.api.client().sync().await?;
    success("sync started, new articles will show up shortly");
    Ok(())
}

/// Checks the API
async fn run_health_cmd(cfg: &AppConfig) -> Result<(), Error> {
    let health = cfg.api.client().health().await?;
    success(&format!("{} is {}", cfg.api.url, health.status));
    Ok(())
}

/// Installs and activates the offline cache
async fn run_precache_cmd(cfg: &AppConfig) -> Result<(), Error> {
    let manifest = default_manifest(&cfg.offline.origin()?)?;
    let mut manager = OfflineCacheManager::new(
        cfg.offline.cache_name.as_str(),
        manifest,
        cfg.offline.api_namespace.as_str(),
        HttpAssetFetcher::new(),
    );
    let count = manager.install().await?;
    let deleted = manager.activate()?;
    success(&format!(
        "{count} assets cached in {} ({} old caches dropped)",
        manager.cache_name(),
        deleted.len()
    ));
    Ok(())
}

/// Shows the configuration
fn run_config_cmd(cfg: &AppConfig) -> Result<(), Error> {
    println!("Configuration:");
    println!("  - API url: {}", cfg.api.url);
    println!("  - pagination: {:?}", cfg.view.pagination);
    println!("  - search debounce: {}ms", cfg.view.search_debounce_ms);
    println!("  - storage: {}", cfg.storage.dir()?.display());
    println!("  - offline origin: {}", cfg.offline.origin);
    println!("  - offline cache: {}", cfg.offline.cache_name);
    Ok(())
}
