//! Data layer: populates the registries and tunables at game startup.
//!
//! This plugin runs in OnEnter(GameState::Loading), fills ArchetypeRegistry
//! and LevelRegistry from the hard-coded game-design data in the submodules,
//! reads `config/transit.ron` over the default TransitConfig, then moves the
//! game on to GameState::Title.

pub mod archetypes;
pub mod config;
pub mod levels;

use bevy::prelude::*;
use crate::shared::*;

pub struct DataPlugin;

impl Plugin for DataPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(GameState::Loading), load_all_data);
    }
}

/// Single system that populates every registry, applies the config file and
/// then transitions to Title.
fn load_all_data(
    mut archetypes: ResMut<ArchetypeRegistry>,
    mut levels: ResMut<LevelRegistry>,
    mut transit_config: ResMut<TransitConfig>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    info!("[Data] populating registries…");

    archetypes::populate_archetypes(&mut archetypes);
    info!("[Data]   Archetypes loaded: {}", archetypes.archetypes.len());

    levels::populate_levels(&mut levels);
    info!("[Data]   Levels loaded: {}", levels.levels.len());

    match config::load_config(config::CONFIG_PATH) {
        Ok(Some(loaded)) => {
            info!("[Data]   Config read from {}", config::CONFIG_PATH);
            *transit_config = loaded;
        }
        Ok(None) => {
            info!("[Data]   No {}, using default tunables", config::CONFIG_PATH);
        }
        Err(e) => {
            warn!("[Data]   {} ignored: {}", config::CONFIG_PATH, e);
        }
    }

    next_state.set(GameState::Title);
}
