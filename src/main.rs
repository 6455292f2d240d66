mod assets;
mod battle;
mod config;
mod creature;
mod data;
mod ecs;
mod encounter;
mod error;
mod game;
mod input;
mod map;
mod movement;
mod render;
mod rng;
mod scene;

use std::path::Path;
use std::sync::Arc;

use bracket_random::prelude::RandomNumberGenerator;
use bracket_terminal::prelude::*;
use tracing::{error, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use config::GameConfig;
use data::DataTables;
use game::Game;
use input::bindings;
use input::scripted::ScriptedInput;
use scene::GameSession;

const LOG_FILE: &str = "tallgrass.log";

struct TallgrassState {
    game: Game,
    script: Option<ScriptedInput>,
}

impl GameState for TallgrassState {
    fn tick(&mut self, ctx: &mut BTerm) {
        let elapsed = ctx.frame_time_ms / 1000.0;
        let held = match self.script.as_mut() {
            Some(script) => script.next_frame().unwrap_or_else(|| {
                info!("input script finished");
                self.game.stop();
                Vec::new()
            }),
            None => bindings::held_keys(ctx),
        };

        if let Err(err) = self.game.tick(elapsed, held) {
            error!("frame failed: {err}");
            ctx.quit();
            return;
        }
        if !self.game.is_running() {
            ctx.quit();
            return;
        }

        ctx.cls();
        if let Err(err) = self.game.render(ctx) {
            error!("render failed: {err}");
            ctx.quit();
        }
    }
}

/// Everything goes to `<log_dir>/tallgrass.log`; the terminal belongs to the game.
fn init_logging(log_dir: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(log_dir)?;
    let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false),
        )
        .init();

    // Keep the writer alive for the life of the process.
    std::mem::forget(guard);
    info!("log file: {}", log_dir.join(LOG_FILE).display());
    Ok(())
}

fn main() -> BError {
    let config = GameConfig::from_env();
    init_logging(&config.log_dir)?;
    info!(seed = config.seed, movement = ?config.movement_model, "tallgrass starting");

    let data = match &config.data_dir {
        Some(dir) => DataTables::load_dir(dir)?,
        None => DataTables::builtin(),
    };
    let script = match &config.script {
        Some(path) => {
            info!("replaying input from {}", path.display());
            Some(ScriptedInput::from_file(path)?)
        }
        None => None,
    };
    let rng = RandomNumberGenerator::seeded(config.seed);
    let session = GameSession::new(config, Arc::new(data), Box::new(rng));
    let game = Game::standard(session)?;

    let context = BTermBuilder::simple80x50()
        .with_title("Tallgrass")
        .build()?;
    main_loop(context, TallgrassState { game, script })
}
