//! Game state contract
//!
//! Defines the lifecycle every phase of the application implements. The
//! registry drives exactly one state per frame; states hand control to a
//! sibling by returning a [`Transition`] request from their update.

use crate::render::{RenderResult, RendererContext};

/// Request returned from [`GameState::update`] telling the registry what to
/// activate next.
///
/// Returning a request instead of mutating the registry directly keeps the
/// registry free to hold the state mutably while it runs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Transition {
    /// Keep the current state active.
    #[default]
    Stay,
    /// Activate the registered state with this id before the frame's update
    /// call returns.
    Switch(String),
}

/// A single phase of the application (splash screen, title menu, gameplay...)
///
/// States own their draw resources and camera. The registry never calls
/// `render` on a state that is not active, and never calls anything at all
/// before the first activation.
pub trait GameState {
    /// Advance the state by `elapsed` seconds of simulated time.
    fn update(&mut self, elapsed: f32) -> Transition;

    /// Record and submit one complete frame through the renderer context.
    fn render(&mut self, ctx: &mut dyn RendererContext) -> RenderResult<()>;
}
