//! Page transitions: flag the transition, wait out the visual effect, navigate,
//! then clear the flag. Navigation goes through the [`Navigator`] seam;
//! [`RouteHistory`] is the in-memory implementation.

use crate::state::Observable;
use async_trait::async_trait;
use std::{fmt, sync::Arc, time::Duration};
use tracing::debug;

pub const DEFAULT_TRANSITION: Duration = Duration::from_millis(300);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TransitionKind {
    #[default]
    Fade,
    Slide,
    Blur,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TransitionState {
    pub is_transitioning: bool,
    pub transition: TransitionKind,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GotoOptions {
    pub transition: TransitionKind,
    pub duration: Duration,
    pub replace_state: bool,
}

impl Default for GotoOptions {
    fn default() -> Self {
        Self {
            transition: TransitionKind::Fade,
            duration: DEFAULT_TRANSITION,
            replace_state: false,
        }
    }
}

#[async_trait]
pub trait Navigator: Send + Sync {
    /// Moves to `url`, replacing the current history entry when asked.
    async fn navigate(&self, url: &str, replace_state: bool);
}

/// In-memory navigation history. Starts at `/`.
#[derive(Clone, Debug)]
pub struct RouteHistory {
    entries: Observable<Vec<String>>,
}

impl Default for RouteHistory {
    fn default() -> Self {
        Self {
            entries: Observable::new(vec!["/".to_string()]),
        }
    }
}

impl RouteHistory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn current(&self) -> Option<String> {
        self.entries.with(|entries| entries.last().cloned())
    }

    #[must_use]
    pub fn entries(&self) -> Vec<String> {
        self.entries.get()
    }

    #[must_use]
    pub fn subscribe(&self) -> tokio::sync::watch::Receiver<Vec<String>> {
        self.entries.subscribe()
    }
}

#[async_trait]
impl Navigator for RouteHistory {
    async fn navigate(&self, url: &str, replace_state: bool) {
        self.entries.update(|entries| {
            if replace_state {
                entries.pop();
            }
            entries.push(url.to_string());
        });
    }
}

#[derive(Clone)]
pub struct PageTransitionStore {
    state: Observable<TransitionState>,
    navigator: Arc<dyn Navigator>,
}

impl fmt::Debug for PageTransitionStore {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("PageTransitionStore")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl PageTransitionStore {
    #[must_use]
    pub fn new(navigator: Arc<dyn Navigator>) -> Self {
        Self {
            state: Observable::default(),
            navigator,
        }
    }

    #[must_use]
    pub fn state(&self) -> &Observable<TransitionState> {
        &self.state
    }

    #[must_use]
    pub fn is_transitioning(&self) -> bool {
        self.state.with(|state| state.is_transitioning)
    }

    pub async fn goto(&self, url: &str, options: GotoOptions) {
        debug!(url, replace_state = options.replace_state, "page transition");
        self.start_transition(options.transition);
        tokio::time::sleep(options.duration).await;
        self.navigator.navigate(url, options.replace_state).await;
        self.end_transition();
    }

    pub fn start_transition(&self, transition: TransitionKind) {
        self.state.set(TransitionState {
            is_transitioning: true,
            transition,
        });
    }

    pub fn end_transition(&self) {
        self.state.update(|state| state.is_transitioning = false);
    }
}
