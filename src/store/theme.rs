//! Theme preference

use std::{fmt, str::FromStr};

use tracing::warn;

use super::Storage;

/// Storage key of the theme preference
pub const THEME_KEY: &str = "pulse-theme";

/// Colour theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    /// Light theme
    #[default]
    Light,
    /// Dark theme
    Dark,
}

impl Theme {
    /// Returns the other theme
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Returns the stored value
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("unknown theme '{other}'")),
        }
    }
}

/// Theme preference store
#[derive(Debug)]
pub struct ThemeStore<S> {
    /// Backing storage
    storage: S,
}

impl<S: Storage> ThemeStore<S> {
    /// Creates a store over a storage
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Returns the saved theme, the default one if unset or unreadable
    pub fn get(&self) -> Theme {
        match self.storage.get(THEME_KEY) {
            Ok(Some(value)) => value.trim().parse().unwrap_or_else(|err| {
                warn!(%err, "ignoring stored theme");
                Theme::default()
            }),
            Ok(None) => Theme::default(),
            Err(err) => {
                warn!(%err, "theme unreadable");
                Theme::default()
            }
        }
    }

    /// Saves the theme
    pub fn set(&mut self, theme: Theme) {
        if let Err(err) = self.storage.set(THEME_KEY, theme.as_str()) {
            warn!(%err, "theme not saved");
        }
    }

    /// Switches to the other theme and returns it
    pub fn toggle(&mut self) -> Theme {
        let theme = self.get().toggled();
        self.set(theme);
        theme
    }
}
