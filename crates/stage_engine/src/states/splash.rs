//! Splash screen state
//!
//! Shows a solid background for a configured number of seconds, then hands
//! over to the next state. Time comes exclusively from the elapsed values fed
//! into update, so the hold behaves the same under a real clock or a test
//! driving synthetic steps.

use crate::game_state::{GameState, Transition};
use crate::render::{FrameScope, RenderResult, RendererContext};

/// Background color shown while the splash holds
const BACKGROUND: [f32; 4] = [0.05, 0.05, 0.15, 1.0];

/// Timed splash screen that transitions to a configured successor
pub struct SplashState {
    hold_seconds: f32,
    elapsed: f32,
    handed_over: bool,
    next_state: String,
}

impl SplashState {
    /// Create a splash that holds for `hold_seconds`, then switches to
    /// `next_state`
    pub fn new(hold_seconds: f32, next_state: &str) -> Self {
        Self {
            hold_seconds,
            elapsed: 0.0,
            handed_over: false,
            next_state: next_state.to_string(),
        }
    }
}

impl GameState for SplashState {
    fn update(&mut self, elapsed: f32) -> Transition {
        if self.handed_over {
            // One-shot: there is no activation hook that could rearm the hold.
            return Transition::Stay;
        }

        self.elapsed += elapsed;
        if self.elapsed >= self.hold_seconds {
            self.handed_over = true;
            log::info!(
                "splash hold complete after {:.2}s, switching to `{}`",
                self.elapsed,
                self.next_state
            );
            return Transition::Switch(self.next_state.clone());
        }

        Transition::Stay
    }

    fn render(&mut self, ctx: &mut dyn RendererContext) -> RenderResult<()> {
        let mut scope = FrameScope::begin(ctx)?;
        scope.ctx().clear_target(BACKGROUND)?;
        scope.finish()?;
        ctx.present()
    }
}
