//! Vector Duel entry point

use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Context;
use winit::event_loop::EventLoop;

use vector_duel::Settings;
use vector_duel::app::App;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = Settings::load().context("loading settings")?;
    let seed = settings.seed.unwrap_or_else(time_seed);
    log::info!(
        "Vector Duel starting: {} players, {}x{} at {} fps, seed {}",
        settings.players,
        settings.window.width,
        settings.window.height,
        settings.window.fps,
        seed
    );

    let event_loop = EventLoop::new().context("creating event loop")?;
    let mut app = App::new(settings, seed);
    event_loop.run_app(&mut app)?;
    app.finish()?;

    log::info!("Bye");
    Ok(())
}

fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}
