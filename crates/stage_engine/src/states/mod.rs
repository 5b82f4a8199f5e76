//! Application phases
//!
//! Three states share the registry in the demo: the splash screen that holds
//! for a configured delay, the title menu with its spinning triangle, and the
//! sprite draw phase with its own quad geometry. The drawing states differ
//! only in geometry and in what their update computes; the frame sequence
//! itself lives in [`crate::render::FrameResources`].

pub mod splash;
pub mod sprite_draw;
pub mod title_menu;

pub use splash::SplashState;
pub use sprite_draw::SpriteDrawState;
pub use title_menu::TitleMenuState;
