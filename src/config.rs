//! Runtime configuration.
//!
//! Defaults describe the bundled meadow: 16 px tiles, four tiles per second
//! and a one-in-ten encounter rate on grass.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::Utc;

use crate::encounter::DEFAULT_ENCOUNTER_RATE;
use crate::movement::MovementModel;

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub tile_size: u32,
    pub debug: bool,
    /// Tiles per second.
    pub move_speed: f32,
    pub encounter_rate: f64,
    pub movement_model: MovementModel,
    pub assets_dir: PathBuf,
    pub map_name: String,
    /// Directory holding `species.json` and `moves.json`; builtin tables when unset.
    pub data_dir: Option<PathBuf>,
    pub seed: u64,
    pub log_dir: PathBuf,
    /// Key script replayed instead of the keyboard.
    pub script: Option<PathBuf>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tile_size: 16,
            debug: true,
            move_speed: 4.0,
            encounter_rate: DEFAULT_ENCOUNTER_RATE,
            movement_model: MovementModel::Interpolated,
            assets_dir: PathBuf::from("assets"),
            map_name: "meadow".to_string(),
            data_dir: None,
            seed: Utc::now().timestamp_millis().unsigned_abs(),
            log_dir: PathBuf::from("logs"),
            script: None,
        }
    }
}

impl GameConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `TALLGRASS_ASSETS_DIR` - asset root holding `maps/` (default: `assets`)
    /// - `TALLGRASS_MAP` - map name under `maps/` (default: `meadow`)
    /// - `TALLGRASS_DATA_DIR` - species/move JSON directory (default: builtin tables)
    /// - `TALLGRASS_SEED` - RNG seed (default: current time)
    /// - `TALLGRASS_ENCOUNTER_RATE` - probability per grass tile entered, 0..=1 (default: 0.1)
    /// - `TALLGRASS_MOVE_SPEED` - tiles per second (default: 4)
    /// - `TALLGRASS_MOVEMENT` - `discrete` or `interpolated` (default: interpolated)
    /// - `TALLGRASS_DEBUG` - show the FPS counter (default: true)
    /// - `TALLGRASS_LOG_DIR` - log file directory (default: `logs`)
    /// - `TALLGRASS_SCRIPT` - key script to replay instead of the keyboard
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(dir) = lookup("TALLGRASS_ASSETS_DIR") {
            config.assets_dir = PathBuf::from(dir);
        }
        if let Some(name) = lookup("TALLGRASS_MAP").filter(|name| !name.trim().is_empty()) {
            config.map_name = name.trim().to_string();
        }
        if let Some(dir) = lookup("TALLGRASS_DATA_DIR") {
            config.data_dir = Some(PathBuf::from(dir));
        }
        if let Some(seed) = read_env::<u64, _>(&lookup, "TALLGRASS_SEED") {
            config.seed = seed;
        }
        if let Some(rate) = read_env::<f64, _>(&lookup, "TALLGRASS_ENCOUNTER_RATE") {
            if rate.is_finite() {
                config.encounter_rate = rate.clamp(0.0, 1.0);
            }
        }
        if let Some(speed) = read_env::<f32, _>(&lookup, "TALLGRASS_MOVE_SPEED") {
            if speed.is_finite() && speed > 0.0 {
                config.move_speed = speed;
            }
        }
        if let Some(model) = read_env::<MovementModel, _>(&lookup, "TALLGRASS_MOVEMENT") {
            config.movement_model = model;
        }
        if let Some(debug) = read_env_bool(&lookup, "TALLGRASS_DEBUG") {
            config.debug = debug;
        }
        if let Some(dir) = lookup("TALLGRASS_LOG_DIR") {
            config.log_dir = PathBuf::from(dir);
        }
        if let Some(script) = lookup("TALLGRASS_SCRIPT") {
            config.script = Some(PathBuf::from(script));
        }

        config
    }
}

fn read_env<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)?.trim().parse().ok()
}

fn read_env_bool<F>(lookup: &F, key: &str) -> Option<bool>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key)?.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
