//! Rotating triangle demo
//!
//! Minimal embedding of the stage engine: a GLFW window for the event pump, a
//! headless renderer context for the device side, and three registered states.
//! The splash holds for its configured delay and hands over to the title menu;
//! Space toggles between the menu and the sprite draw state, Escape quits.

mod window;

use glfw::{Action, Key, WindowEvent};
use stage_engine::prelude::*;

use crate::window::Window;

const CONFIG_PATH: &str = "triangle_app.toml";

const SPLASH_ID: &str = "splash";
const TITLE_MENU_ID: &str = "title_menu";
const SPRITE_DRAW_ID: &str = "sprite_draw";

fn load_config() -> StageConfig {
    match StageConfig::load_from_file(CONFIG_PATH) {
        Ok(config) => {
            log::info!("loaded configuration from {CONFIG_PATH}");
            config
        }
        Err(err) => {
            log::info!("using default configuration ({err})");
            StageConfig::default()
        }
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config();

    let mut window = Window::new(
        &config.window.title,
        config.window.width,
        config.window.height,
    )?;
    let (width, height) = window.get_framebuffer_size();
    let mut ctx = HeadlessContext::new(width, height);

    let mut states = StateSystem::new();
    states.add_state(
        SPLASH_ID,
        Box::new(SplashState::new(config.splash.hold_seconds, TITLE_MENU_ID)),
    );
    states.add_state(
        TITLE_MENU_ID,
        Box::new(TitleMenuState::new(&mut ctx, &config.camera)?),
    );
    states.add_state(
        SPRITE_DRAW_ID,
        Box::new(SpriteDrawState::new(&mut ctx, &config.camera)?),
    );
    states.change_state(SPLASH_ID)?;

    let mut timer = Timer::new();
    while !window.should_close() {
        window.poll_events();
        let events: Vec<WindowEvent> = window
            .flush_events()
            .map(|(_, event)| event)
            .collect();
        for event in events {
            match event {
                WindowEvent::Close | WindowEvent::Key(Key::Escape, _, Action::Press, _) => {
                    window.set_should_close(true);
                }
                WindowEvent::Key(Key::Space, _, Action::Press, _) => {
                    let next = if states.active_state() == Some(TITLE_MENU_ID) {
                        SPRITE_DRAW_ID
                    } else {
                        TITLE_MENU_ID
                    };
                    states.change_state(next)?;
                }
                WindowEvent::FramebufferSize(width, height) => {
                    if width > 0 && height > 0 {
                        ctx.resize(width as u32, height as u32);
                    }
                }
                _ => {}
            }
        }

        timer.update();
        states.update(timer.delta_time())?;
        states.render(&mut ctx)?;
    }

    log::info!(
        "shutting down after {} frames ({:.1} fps average)",
        timer.frame_count(),
        timer.average_fps()
    );
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    log::info!("starting triangle demo");

    match run() {
        Ok(()) => {
            log::info!("triangle demo completed successfully");
            Ok(())
        }
        Err(e) => {
            log::error!("triangle demo failed: {e}");
            Err(e)
        }
    }
}
