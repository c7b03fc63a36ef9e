//! Install prompt

use async_trait::async_trait;
use tracing::{debug, info};

/// User choice on the platform install prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    /// The app was installed
    Accepted,
    /// The prompt was dismissed
    Dismissed,
}

/// A platform install prompt whose display was postponed
///
/// It can only be shown once.
#[async_trait]
pub trait DeferredPrompt: Send {
    /// Shows the prompt and waits for the user's choice
    async fn prompt(self: Box<Self>) -> InstallOutcome;
}

/// Install control state
#[derive(Default)]
pub struct InstallPrompt {
    /// Prompt waiting to be shown
    deferred: Option<Box<dyn DeferredPrompt>>,
    /// The app was installed
    installed: bool,
}

impl InstallPrompt {
    /// Creates a hidden install control
    pub fn new() -> Self {
        Self::default()
    }

    /// The platform offers to install the app
    ///
    /// The prompt is kept for later and the control shown, unless the app
    /// is already installed.
    pub fn available(&mut self, prompt: Box<dyn DeferredPrompt>) {
        if self.installed {
            debug!("install prompt ignored, already installed");
            return;
        }
        self.deferred = Some(prompt);
    }

    /// Checks if the install control is shown
    pub fn is_visible(&self) -> bool {
        self.deferred.is_some()
    }

    /// Checks if the app was installed
    pub fn is_installed(&self) -> bool {
        self.installed
    }

    /// The install control was activated
    ///
    /// Consumes the deferred prompt, hides the control and returns the
    /// user's choice, or `None` if no prompt was available.
    pub async fn trigger(&mut self) -> Option<InstallOutcome> {
        let prompt = self.deferred.take()?;
        let outcome = prompt.prompt().await;
        info!(?outcome, "install prompt answered");
        Some(outcome)
    }

    /// The app was installed
    pub fn installed(&mut self) {
        self.deferred = None;
        self.installed = true;
    }
}
