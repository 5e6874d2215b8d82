//! Moves a textured sprite with WASD or the arrow keys. Q or closing the
//! window quits.

mod config;
mod game;
mod player;

use std::process::ExitCode;

use sprite_engine::device::GpuInit;
use sprite_engine::logging::{init_logging, LoggingConfig};
use sprite_engine::window::Runtime;

use crate::config::GameConfig;
use crate::game::SpriteApp;

fn main() -> ExitCode {
    init_logging(LoggingConfig::default());

    let config = GameConfig::default();
    let window = config.window.clone();

    match Runtime::run(window, GpuInit::default(), SpriteApp::new(config)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("sprite-game failed: {e:#}");
            ExitCode::FAILURE
        }
    }
}
