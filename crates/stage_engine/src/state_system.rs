//! State registry and dispatch
//!
//! Owns every registered [`GameState`] and forwards the per-frame update and
//! render calls to whichever one is active. Until the first successful
//! [`StateSystem::change_state`] both calls are no-ops, so the registry can be
//! built and populated before the frame loop starts.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use thiserror::Error;

use crate::game_state::{GameState, Transition};
use crate::render::{RenderResult, RendererContext};

/// Errors reported by the state registry
#[derive(Error, Debug)]
pub enum StateError {
    /// The requested id has no registered state.
    #[error("no state registered under id `{0}`")]
    NotFound(String),
}

/// Registry of named states with a single active one
///
/// States are registered once at startup and never removed; the active id is
/// therefore always a valid key once [`StateSystem::change_state`] has
/// accepted it.
pub struct StateSystem {
    states: HashMap<String, Box<dyn GameState>>,
    active: Option<String>,
}

impl Default for StateSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl StateSystem {
    /// Create an empty registry with no active state
    pub fn new() -> Self {
        Self {
            states: HashMap::new(),
            active: None,
        }
    }

    /// Register `state` under `id`
    ///
    /// Ids must be unique. A duplicate id is a wiring bug in the caller: it
    /// panics in debug builds and is rejected in release builds, leaving the
    /// first registration in place.
    pub fn add_state(&mut self, id: &str, state: Box<dyn GameState>) {
        debug_assert!(!self.states.contains_key(id), "state id `{id}` registered twice");
        match self.states.entry(id.to_string()) {
            Entry::Occupied(entry) => {
                log::error!("duplicate registration for state `{}` rejected", entry.key());
            }
            Entry::Vacant(entry) => {
                log::debug!("registered state `{}`", entry.key());
                entry.insert(state);
            }
        }
    }

    /// Check whether a state is registered under `id`
    pub fn exists(&self, id: &str) -> bool {
        self.states.contains_key(id)
    }

    /// Make the state registered under `id` the active one
    ///
    /// Takes effect immediately; the next update and render calls dispatch to
    /// the new state. No lifecycle hook runs on either the outgoing or the
    /// incoming state. Fails with [`StateError::NotFound`] if `id` was never
    /// registered, leaving the previously active state in place.
    pub fn change_state(&mut self, id: &str) -> Result<(), StateError> {
        if !self.states.contains_key(id) {
            return Err(StateError::NotFound(id.to_string()));
        }
        log::info!("state change -> `{id}`");
        self.active = Some(id.to_string());
        Ok(())
    }

    /// Id of the currently active state, if any
    pub fn active_state(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Advance the active state by `elapsed` seconds
    ///
    /// A [`Transition::Switch`] request returned by the state is applied
    /// before this call returns, so the caller observes the new active id on
    /// the very next frame. A request naming an unregistered id is reported
    /// as [`StateError::NotFound`] and the active state is left unchanged.
    /// No-op when no state has been activated yet.
    pub fn update(&mut self, elapsed: f32) -> Result<(), StateError> {
        let transition = {
            let Some(id) = self.active.as_deref() else {
                return Ok(());
            };
            match self.states.get_mut(id) {
                Some(state) => state.update(elapsed),
                // unreachable: the active id is always a registered key
                None => Transition::Stay,
            }
        };

        match transition {
            Transition::Stay => Ok(()),
            Transition::Switch(next) => self.change_state(&next),
        }
    }

    /// Render one frame through the active state
    ///
    /// No-op when no state has been activated yet.
    pub fn render(&mut self, ctx: &mut dyn RendererContext) -> RenderResult<()> {
        let Some(id) = self.active.as_deref() else {
            return Ok(());
        };
        match self.states.get_mut(id) {
            Some(state) => state.render(ctx),
            None => Ok(()),
        }
    }
}
