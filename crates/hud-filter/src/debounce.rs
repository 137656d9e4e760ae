//! Debounced commits of the free-text filter term.
//!
//! Every keystroke updates the draft right away; the term is committed to
//! the location only once input has been quiet for the debounce period.
//! [`DebounceState`] applies that rule against a caller-supplied clock.
//! [`TermDebouncer`] applies it on Tokio timers and emits committed locations
//! on a channel.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::debug;

use crate::filter::{EMPTY_TERM, FilterEdits};
use crate::location::{Location, next_location};

/// Trailing-edge debounce over an explicit millisecond clock.
#[derive(Debug, Clone)]
pub struct DebounceState<T> {
    quiet_ms: u64,
    pending: Option<(T, u64)>,
}

impl<T> DebounceState<T> {
    pub fn new(quiet_ms: u64) -> Self {
        Self {
            quiet_ms,
            pending: None,
        }
    }

    /// Record an edit at `now_ms`, replacing any pending value and restarting
    /// the quiet period.
    pub fn edit(&mut self, value: T, now_ms: u64) {
        self.pending = Some((value, now_ms.saturating_add(self.quiet_ms)));
    }

    /// Take the pending value once its quiet period has elapsed.
    pub fn poll(&mut self, now_ms: u64) -> Option<T> {
        match &self.pending {
            Some((_, due)) if *due <= now_ms => self.pending.take().map(|(value, _)| value),
            _ => None,
        }
    }

    /// Drop the pending value without committing it.
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|(value, _)| value)
    }

    pub fn pending(&self) -> Option<&T> {
        self.pending.as_ref().map(|(value, _)| value)
    }

    /// When the pending value becomes ready.
    pub fn due_at(&self) -> Option<u64> {
        self.pending.as_ref().map(|(_, due)| *due)
    }
}

struct PendingCommit {
    handle: JoinHandle<()>,
    deadline: Instant,
}

/// Owns the search input's draft term and its single pending commit.
///
/// Must be used from within a Tokio runtime. Dropping the debouncer cancels
/// the pending commit.
pub struct TermDebouncer {
    location: Location,
    draft: String,
    quiet: Duration,
    pending: Option<PendingCommit>,
    commits: mpsc::UnboundedSender<Location>,
}

impl TermDebouncer {
    /// Create a debouncer at `location`. Committed locations arrive on the
    /// returned receiver.
    pub fn new(location: Location, quiet: Duration) -> (Self, mpsc::UnboundedReceiver<Location>) {
        let (commits, rx) = mpsc::unbounded_channel();
        let draft = location.filter_set().term.source_text;
        let debouncer = Self {
            location,
            draft,
            quiet,
            pending: None,
            commits,
        };
        (debouncer, rx)
    }

    /// The text currently shown in the input.
    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    /// Returns true while a commit is scheduled and has not fired.
    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|p| !p.handle.is_finished())
    }

    /// Handle an input edit: update the draft now, commit after the quiet
    /// period unless another edit arrives first.
    pub fn on_change(&mut self, term: impl Into<String>) {
        self.draft = term.into();
        self.cancel();
        self.schedule(Instant::now() + self.quiet);
    }

    /// Cancel the pending commit, if any.
    pub fn cancel(&mut self) {
        if let Some(pending) = self.pending.take() {
            if !pending.handle.is_finished() {
                debug!(draft = %self.draft, "cancelled pending term commit");
            }
            pending.handle.abort();
        }
    }

    /// Empty the input and commit the empty term immediately.
    pub fn clear(&mut self) {
        self.cancel();
        self.draft.clear();
        let next = next_location(&self.location, &FilterEdits::new().with_term(EMPTY_TERM));
        self.send(next);
    }

    /// Follow a navigation event.
    ///
    /// Moving to another path cancels the pending commit. On the same path a
    /// pending commit keeps its deadline but is retargeted at the new query
    /// string; with nothing pending the draft follows the location's term.
    pub fn navigate(&mut self, location: Location) {
        if location.pathname != self.location.pathname {
            self.cancel();
            self.draft = location.filter_set().term.source_text;
            self.location = location;
            return;
        }

        self.location = location;
        match self.pending.take() {
            Some(pending) if !pending.handle.is_finished() => {
                pending.handle.abort();
                self.schedule(pending.deadline);
            }
            _ => self.draft = self.location.filter_set().term.source_text,
        }
    }

    fn schedule(&mut self, deadline: Instant) {
        let next = next_location(&self.location, &FilterEdits::new().with_term(self.draft.clone()));
        let commits = self.commits.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            debug!(location = %next, "committing filter term");
            // The receiver going away means nobody is listening for commits.
            let _ = commits.send(next);
        });
        self.pending = Some(PendingCommit { handle, deadline });
    }

    fn send(&self, next: Location) {
        debug!(location = %next, "committing cleared filter term");
        let _ = self.commits.send(next);
    }
}

impl Drop for TermDebouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl std::fmt::Debug for TermDebouncer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TermDebouncer")
            .field("location", &self.location)
            .field("draft", &self.draft)
            .field("quiet", &self.quiet)
            .field("pending", &self.is_pending())
            .finish()
    }
}
