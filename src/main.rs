//! TurkeySpell - typing toy for Windows.
//!
//! Shows what the child typed and flashes red with a sound when the last
//! letter has a matching file in the `sounds` directory.

// Hide console window in release builds
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod config;
mod dictionary;
mod input;
mod render;
mod session;
mod sound;
#[cfg(windows)]
mod window;

use config::{AppConfig, ConfigManager};
use dictionary::Dictionary;
use session::Session;
use std::path::PathBuf;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("TurkeySpell starting...");

    let config_manager = ConfigManager::new();
    let config = config_manager.load();
    log::info!("Configuration loaded from {}", config_manager.path().display());

    let sounds_dir = match std::env::current_dir() {
        Ok(cwd) => config.sounds_path(&cwd),
        Err(e) => {
            log::warn!("Cannot determine working directory: {}", e);
            PathBuf::from(&config.sounds_dir)
        }
    };

    let dictionary = Dictionary::load(&sounds_dir);
    if dictionary.is_empty() {
        log::warn!("No sounds found in {}", sounds_dir.display());
    } else {
        log::info!(
            "Loaded {} sounds from {}",
            dictionary.len(),
            sounds_dir.display()
        );
        log::debug!("Words: {:?}", dictionary.keys().collect::<Vec<_>>());
    }

    let session = Session::new(dictionary, config.ignore_key_repeat);
    let code = run(&config, session);

    log::info!("TurkeySpell stopped");
    std::process::exit(code);
}

#[cfg(windows)]
fn run(config: &AppConfig, session: Session) -> i32 {
    use sound::{SoundQueue, SystemPlayback};
    use window::{run_message_loop, show_error_message, MainWindow};

    let sounds = config
        .sound
        .enabled
        .then(|| SoundQueue::new(SystemPlayback));

    let window = match MainWindow::new(config, session, sounds) {
        Ok(window) => window,
        Err(e) => {
            log::error!("{}", e);
            show_error_message(&e.to_string());
            return 1;
        }
    };

    window.show();
    log::info!("TurkeySpell running");

    run_message_loop()
}

#[cfg(not(windows))]
fn run(_config: &AppConfig, _session: Session) -> i32 {
    log::error!("TurkeySpell needs a Windows desktop to run");
    1
}
