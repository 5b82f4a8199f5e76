//! # Stage Engine
//!
//! A minimal, single-threaded engine core: named game states behind a
//! registry, a cached-matrix camera, and a fixed per-frame device protocol
//! spoken through an opaque renderer context.
//!
//! ## Features
//!
//! - **State registry**: named states with exactly one active at a time
//! - **Transition requests**: states hand over by returning a request, never
//!   by reaching back into the registry
//! - **Cached camera**: view and projection recomputed only by the mutation
//!   that affects them
//! - **Explicit frame protocol**: upload, clear, bind, draw, submit, present
//!   inside one balanced command scope
//! - **Headless context**: journaling in-memory device for tests and demos
//!
//! ## Quick Start
//!
//! ```rust
//! use stage_engine::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut ctx = HeadlessContext::new(1024, 768);
//!
//!     let mut states = StateSystem::new();
//!     states.add_state("splash", Box::new(SplashState::new(3.0, "title_menu")));
//!     states.add_state(
//!         "title_menu",
//!         Box::new(TitleMenuState::new(&mut ctx, &CameraSettings::default())?),
//!     );
//!     states.change_state("splash")?;
//!
//!     // one frame of the loop
//!     states.update(0.016)?;
//!     states.render(&mut ctx)?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod foundation;
pub mod render;
pub mod states;

mod game_state;
mod state_system;

pub use game_state::{GameState, Transition};
pub use state_system::{StateError, StateSystem};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{CameraSettings, Config, SplashSettings, StageConfig, WindowSettings},
        foundation::{
            math::{Mat4, Mat4Ext, Vec3},
            time::Timer,
        },
        render::{
            Camera, FrameOp, FrameResources, FrameScope, HeadlessContext, RenderError,
            RenderResult, RendererContext, Vertex,
        },
        states::{SplashState, SpriteDrawState, TitleMenuState},
        GameState, StateError, StateSystem, Transition,
    };
}
