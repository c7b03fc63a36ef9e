//! Terminal renderer

use std::{sync::OnceLock, time::Duration};

use colored::{Color, Colorize};
use pulse::{
    store::Theme,
    view::{ArticleDetail, Card, EmptyState, PaginationControls, RenderMode, Renderer},
};
use pulse_client::ArticleId;
use regex::Regex;

/// Prints the view to stdout
#[derive(Debug, Default)]
pub struct TerminalRenderer {
    /// Cards shown, numbered from 1
    cards: Vec<Card>,
    /// Colour theme
    theme: Theme,
}

impl TerminalRenderer {
    /// Creates a renderer
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cards shown
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    fn accent(&self) -> Color {
        match self.theme {
            Theme::Light => Color::Blue,
            Theme::Dark => Color::Cyan,
        }
    }

    fn print_card(&self, number: usize, card: &Card) {
        let mark = if card.saved { "★" } else { " " };
        println!(
            "{mark} {} {}",
            format!("{number:>3}.").dimmed(),
            card.title.bold().color(self.accent())
        );
        println!(
            "       {} · {} · {} · {}",
            card.category.to_uppercase(),
            card.source,
            card.date,
            card.read_time
        );
        println!("       {}", strip_tags(&card.description).dimmed());
    }
}

impl Renderer for TerminalRenderer {
    fn loading(&mut self, visible: bool) {
        if visible {
            println!("{}", "Loading…".dimmed());
        }
    }

    fn cards(&mut self, cards: &[Card], mode: RenderMode) {
        if mode == RenderMode::Replace {
            self.cards.clear();
            println!();
        }
        for card in cards {
            self.print_card(self.cards.len() + 1, card);
            self.cards.push(card.clone());
        }
    }

    fn empty(&mut self, state: EmptyState) {
        self.cards.clear();
        println!();
        println!("{}", state.title().bold());
        println!("{}", state.message().dimmed());
    }

    fn controls(&mut self, controls: &PaginationControls) {
        match controls {
            PaginationControls::Pages {
                page, total_pages, ..
            } => println!("{}", format!("Page {page} of {total_pages}").dimmed()),
            PaginationControls::Sentinel { visible: true } => {
                println!("{}", "More articles below".dimmed())
            }
            PaginationControls::Sentinel { visible: false } | PaginationControls::Hidden => {}
        }
    }

    fn bookmark(&mut self, id: &ArticleId, saved: bool) {
        for card in self.cards.iter_mut().filter(|card| &card.id == id) {
            card.saved = saved;
        }
        if saved {
            println!("{} saved", "★".yellow());
        } else {
            println!("removed from saved");
        }
    }

    fn remove_card(&mut self, id: &ArticleId, _fade: Duration) {
        self.cards.retain(|card| &card.id != id);
    }

    fn open_modal(&mut self, detail: &ArticleDetail) {
        println!();
        println!(
            "{} · {} · {}",
            detail.category.to_uppercase().color(self.accent()),
            detail.source,
            detail.date
        );
        println!("{}", detail.title.bold());
        println!("{} · {}", detail.author, detail.read_time);
        println!();
        println!("{}", strip_tags(&detail.description_html));
        for link in links(&detail.description_html) {
            println!("  {} {}", "↗".dimmed(), link.underline());
        }
        println!();
        println!("Read the full story: {}", detail.source_link.underline());
    }

    fn close_modal(&mut self) {
        println!();
    }

    fn sync_busy(&mut self, busy: bool) {
        if busy {
            println!("{}", "Syncing…".dimmed());
        }
    }

    fn theme(&mut self, theme: Theme) {
        self.theme = theme;
    }
}

/// Removes the markup of an HTML fragment
fn strip_tags(html: &str) -> String {
    static TAG: OnceLock<Regex> = OnceLock::new();
    let tag = TAG.get_or_init(|| Regex::new(r"<[^>]*>").expect("valid regex"));
    tag.replace_all(html, "").trim().to_string()
}

/// Returns the link targets of an HTML fragment
fn links(html: &str) -> Vec<String> {
    static HREF: OnceLock<Regex> = OnceLock::new();
    let href = HREF.get_or_init(|| {
        Regex::new(r#"(?i)<a\b[^>]*\bhref\s*=\s*["']([^"']*)["']"#).expect("valid regex")
    });
    href.captures_iter(html)
        .map(|caps| caps[1].to_string())
        .collect()
}
