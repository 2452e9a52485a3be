//! The weather view model: one presentation state, driven by an activation
//! cycle and by search submissions.

use serde::Serialize;

use crate::{
    FetchError, LocationQuery, WeatherProvider, WeatherReading,
    location::{self, Geolocator},
};

/// The record the rendering layer observes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PresentationState {
    pub loading: bool,
    pub reading: Option<WeatherReading>,
}

impl Default for PresentationState {
    fn default() -> Self {
        Self { loading: true, reading: None }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ActivationPhase {
    Idle,
    Resolving,
    Fetching,
    Ready,
    Failed,
}

/// Tags one fetch cycle. Only the most recently issued ticket may write
/// state, and only once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FetchTicket(u64);

/// Keys the search field reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Backspace,
    Enter,
}

/// The single text input. Enter submits its contents and clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchField {
    text: String,
}

impl SearchField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Returns a query only when Enter is pressed on non-blank text.
    pub fn on_key(&mut self, key: Key) -> Option<LocationQuery> {
        match key {
            Key::Char(c) => {
                self.text.push(c);
                None
            }
            Key::Backspace => {
                self.text.pop();
                None
            }
            Key::Enter => {
                let submitted = std::mem::take(&mut self.text);
                let name = submitted.trim();
                if name.is_empty() {
                    tracing::debug!("Ignoring blank search submission");
                    None
                } else {
                    Some(LocationQuery::by_name(name))
                }
            }
        }
    }
}

#[derive(Debug)]
pub struct WeatherViewModel<P: WeatherProvider> {
    provider: P,
    fallback_location: String,
    state: PresentationState,
    phase: ActivationPhase,
    activated: bool,
    latest_ticket: u64,
    applied_ticket: u64,
}

impl<P: WeatherProvider> WeatherViewModel<P> {
    pub fn new(provider: P, fallback_location: impl Into<String>) -> Self {
        Self {
            provider,
            fallback_location: fallback_location.into(),
            state: PresentationState::default(),
            phase: ActivationPhase::Idle,
            activated: false,
            latest_ticket: 0,
            applied_ticket: 0,
        }
    }

    pub fn state(&self) -> &PresentationState {
        &self.state
    }

    pub fn phase(&self) -> ActivationPhase {
        self.phase
    }

    /// Resolve the location once and fetch for it. Later calls do nothing.
    pub async fn activate(&mut self, geolocator: Option<&dyn Geolocator>) {
        if self.activated {
            tracing::debug!("View model already activated");
            return;
        }
        self.activated = true;

        self.phase = ActivationPhase::Resolving;
        let query = location::resolve(geolocator, &self.fallback_location).await;
        self.fetch(query).await;
    }

    /// Fetch by place name, bypassing location resolution.
    pub async fn search(&mut self, name: &str) {
        let name = name.trim();
        if name.is_empty() {
            tracing::debug!("Ignoring blank search");
            return;
        }
        self.fetch(LocationQuery::by_name(name)).await;
    }

    /// Feed a key press to `field`; Enter starts a fetch for its contents.
    ///
    /// Returns whether a fetch was started.
    pub async fn handle_key(&mut self, field: &mut SearchField, key: Key) -> bool {
        match field.on_key(key) {
            Some(query) => {
                self.fetch(query).await;
                true
            }
            None => false,
        }
    }

    /// Run one fetch cycle for `query` and apply its outcome.
    pub async fn fetch(&mut self, query: LocationQuery) {
        let ticket = self.begin_fetch();
        let result = self.provider.fetch_current(&query).await;
        if let Err(e) = &result {
            tracing::error!("Error fetching weather for {query}: {e}");
        }
        self.complete_fetch(ticket, result);
    }

    /// Enter `Fetching` and issue a ticket newer than every earlier one.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.latest_ticket += 1;
        self.phase = ActivationPhase::Fetching;
        FetchTicket(self.latest_ticket)
    }

    /// Apply a fetch outcome. Returns `false` when a newer fetch has since
    /// been started, or this ticket was already completed, and the outcome
    /// was dropped.
    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<WeatherReading, FetchError>,
    ) -> bool {
        if ticket.0 != self.latest_ticket {
            tracing::debug!(
                ticket = ticket.0,
                latest = self.latest_ticket,
                "Dropping stale weather result"
            );
            return false;
        }
        if ticket.0 == self.applied_ticket {
            tracing::debug!(ticket = ticket.0, "Fetch cycle already completed");
            return false;
        }
        self.applied_ticket = ticket.0;

        self.state.loading = false;
        match result {
            Ok(reading) => {
                self.state.reading = Some(reading);
                self.phase = ActivationPhase::Ready;
            }
            Err(_) => {
                self.state.reading = None;
                self.phase = ActivationPhase::Failed;
            }
        }
        true
    }
}
