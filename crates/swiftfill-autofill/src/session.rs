//! Per-input autocomplete state machine.
//!
//! The session owns no timers and performs no I/O. Each event handler
//! updates the state and returns the [`Effect`]s the delivery adapter must
//! carry out: arm or cancel the debounce timer, issue a search, render or
//! hide the dropdown, fill the form.
//!
//! ```text
//! Idle ──input──▶ Typing ──debounce──▶ Searching ──ok──▶ ResultsShown
//!   ▲                ▲                     │                 │
//!   │                └──────input──────────┴──err──▶ Error   │
//!   └──────────── select / Escape / blur ◀───────────────────┘
//! ```
//!
//! Every search carries a sequence number. A response is rendered only if it
//! belongs to the most recent search and the session is still `Searching`;
//! anything else is stale and dropped.

use std::time::Duration;

use swiftfill_core::{ClientConfig, NormalizedAddress};

use crate::error::AutofillError;

/// Shown inline when a search fails.
pub const SEARCH_ERROR_MESSAGE: &str = "Failed to load address suggestions";

/// Time between blur and hiding the dropdown, so a click on a suggestion
/// still lands.
pub const BLUR_GRACE: Duration = Duration::from_millis(200);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    pub min_characters: usize,
    pub debounce: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            min_characters: 3,
            debounce: Duration::from_millis(300),
        }
    }
}

impl From<&ClientConfig> for SessionConfig {
    fn from(config: &ClientConfig) -> Self {
        Self {
            min_characters: config.min_characters,
            debounce: Duration::from_millis(config.debounce_delay),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Typing,
    Searching,
    /// Suggestions, or the explicit empty state, are on screen.
    ResultsShown,
    Error,
}

/// Keys the dropdown reacts to. Printable keys arrive through
/// [`AutocompleteSession::on_input`] instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowDown,
    ArrowUp,
    Enter,
    Escape,
    Other,
}

/// An instruction for the delivery adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Arm the debounce timer, replacing any pending one.
    ScheduleDebounce(Duration),
    CancelDebounce,
    /// Fetch suggestions and report back through
    /// [`AutocompleteSession::on_response`] with the same `seq`.
    Search { seq: u64, query: String },
    ShowLoading,
    RenderResults {
        items: Vec<NormalizedAddress>,
        active: Option<usize>,
    },
    /// Zero suggestions; show "No addresses found".
    RenderEmpty,
    RenderError(&'static str),
    Highlight(usize),
    Hide,
    /// Arm the blur timer; report back through
    /// [`AutocompleteSession::on_blur_elapsed`].
    ScheduleBlurHide(Duration),
    /// Fill the form from the chosen suggestion.
    Apply(NormalizedAddress),
}

#[derive(Debug, Clone)]
pub struct AutocompleteSession {
    config: SessionConfig,
    state: SessionState,
    query: String,
    seq: u64,
    results: Vec<NormalizedAddress>,
    active: Option<usize>,
    visible: bool,
    focused: bool,
}

impl AutocompleteSession {
    #[must_use]
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            state: SessionState::Idle,
            query: String::new(),
            seq: 0,
            results: Vec::new(),
            active: None,
            visible: false,
            focused: false,
        }
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn results(&self) -> &[NormalizedAddress] {
        &self.results
    }

    #[must_use]
    pub fn active(&self) -> Option<usize> {
        self.active
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Sequence number of the most recently issued search.
    #[must_use]
    pub fn latest_seq(&self) -> u64 {
        self.seq
    }

    /// The input's value changed through typing.
    pub fn on_input(&mut self, value: &str) -> Vec<Effect> {
        let query = value.trim();

        if query.chars().count() < self.config.min_characters {
            self.state = SessionState::Idle;
            self.query.clear();
            self.results.clear();
            self.active = None;
            self.visible = false;
            return vec![Effect::CancelDebounce, Effect::Hide];
        }

        query.clone_into(&mut self.query);
        self.state = SessionState::Typing;
        vec![Effect::ScheduleDebounce(self.config.debounce)]
    }

    pub fn on_debounce_elapsed(&mut self) -> Vec<Effect> {
        if self.state != SessionState::Typing {
            return Vec::new();
        }

        self.seq += 1;
        self.state = SessionState::Searching;
        self.visible = true;
        vec![
            Effect::ShowLoading,
            Effect::Search {
                seq: self.seq,
                query: self.query.clone(),
            },
        ]
    }

    /// Outcome of the search issued with sequence number `seq`.
    pub fn on_response(
        &mut self,
        seq: u64,
        outcome: Result<Vec<NormalizedAddress>, AutofillError>,
    ) -> Vec<Effect> {
        if seq != self.seq || self.state != SessionState::Searching {
            tracing::debug!(
                seq,
                latest = self.seq,
                state = ?self.state,
                "dropping stale search response"
            );
            return Vec::new();
        }

        match outcome {
            Ok(results) if results.is_empty() => {
                self.results.clear();
                self.active = None;
                self.state = SessionState::ResultsShown;
                vec![Effect::RenderEmpty]
            }
            Ok(results) => {
                self.results = results;
                self.active = Some(0);
                self.state = SessionState::ResultsShown;
                vec![self.render()]
            }
            Err(e) => {
                tracing::warn!(error = %e, "address search failed");
                self.results.clear();
                self.active = None;
                self.state = SessionState::Error;
                vec![Effect::RenderError(SEARCH_ERROR_MESSAGE)]
            }
        }
    }

    pub fn on_key(&mut self, key: Key) -> Vec<Effect> {
        match key {
            Key::Escape if self.state != SessionState::Idle || self.visible => self.dismiss(),
            Key::ArrowDown | Key::ArrowUp if self.has_navigable_results() => {
                let len = self.results.len();
                let next = match (key, self.active) {
                    (Key::ArrowDown, Some(i)) => (i + 1) % len,
                    (Key::ArrowDown, None) => 0,
                    (_, Some(i)) if i > 0 => i - 1,
                    _ => len - 1,
                };
                self.active = Some(next);
                vec![Effect::Highlight(next)]
            }
            Key::Enter if self.has_navigable_results() => match self.active {
                Some(i) => self.select(i),
                None => Vec::new(),
            },
            _ => Vec::new(),
        }
    }

    /// A suggestion was clicked.
    pub fn on_click(&mut self, index: usize) -> Vec<Effect> {
        if self.has_navigable_results() && index < self.results.len() {
            self.select(index)
        } else {
            Vec::new()
        }
    }

    /// Re-shows cached suggestions when the input regains focus.
    pub fn on_focus(&mut self) -> Vec<Effect> {
        self.focused = true;
        if self.state == SessionState::Idle && !self.visible && !self.results.is_empty() {
            self.visible = true;
            self.state = SessionState::ResultsShown;
            return vec![self.render()];
        }
        Vec::new()
    }

    pub fn on_blur(&mut self) -> Vec<Effect> {
        self.focused = false;
        if self.state == SessionState::Idle && !self.visible {
            return Vec::new();
        }
        vec![Effect::ScheduleBlurHide(BLUR_GRACE)]
    }

    /// The blur grace period ran out. A no-op if focus came back meanwhile.
    pub fn on_blur_elapsed(&mut self) -> Vec<Effect> {
        if self.focused || (self.state == SessionState::Idle && !self.visible) {
            return Vec::new();
        }
        self.dismiss()
    }

    fn dismiss(&mut self) -> Vec<Effect> {
        self.state = SessionState::Idle;
        self.visible = false;
        vec![Effect::CancelDebounce, Effect::Hide]
    }

    fn select(&mut self, index: usize) -> Vec<Effect> {
        let address = self.results.swap_remove(index);
        self.results.clear();
        self.active = None;
        self.query.clear();
        self.state = SessionState::Idle;
        self.visible = false;
        vec![Effect::CancelDebounce, Effect::Hide, Effect::Apply(address)]
    }

    fn has_navigable_results(&self) -> bool {
        self.state == SessionState::ResultsShown && !self.results.is_empty()
    }

    fn render(&self) -> Effect {
        Effect::RenderResults {
            items: self.results.clone(),
            active: self.active,
        }
    }
}

impl Default for AutocompleteSession {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
