//! Debounce

use std::time::Duration;

use tokio::sync::mpsc;

/// Default quiet period of the search box
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

/// Creates a debounced channel
///
/// Values pushed into the [DebounceInput] come out of the [Debouncer] only
/// once no newer value arrived for `quiet`; each new value cancels the
/// pending one.
pub fn debounce<T>(quiet: Duration) -> (DebounceInput<T>, Debouncer<T>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (DebounceInput { tx }, Debouncer { rx, quiet })
}

/// Sending side of a debounced channel
#[derive(Debug, Clone)]
pub struct DebounceInput<T> {
    /// Sender
    tx: mpsc::UnboundedSender<T>,
}

impl<T> DebounceInput<T> {
    /// Pushes a value, returns `false` if the debouncer is gone
    pub fn push(&self, value: T) -> bool {
        self.tx.send(value).is_ok()
    }
}

/// Receiving side of a debounced channel
#[derive(Debug)]
pub struct Debouncer<T> {
    /// Receiver
    rx: mpsc::UnboundedReceiver<T>,
    /// Quiet period
    quiet: Duration,
}

impl<T> Debouncer<T> {
    /// Waits for the next committed value
    ///
    /// Returns `None` once every input is dropped and nothing is pending.
    /// A value pending when the inputs are dropped is committed right away.
    pub async fn next(&mut self) -> Option<T> {
        let mut latest = self.rx.recv().await?;
        loop {
            match tokio::time::timeout(self.quiet, self.rx.recv()).await {
                Ok(Some(value)) => latest = value,
                Ok(None) | Err(_) => return Some(latest),
            }
        }
    }
}
