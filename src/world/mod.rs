//! World domain plugin for the Bodmin Line.
//!
//! Responsible for:
//! - Tearing down and spawning station levels on `LoadLevelEvent`
//! - Starting the game from the title screen
//! - The view window and which entities are on screen

use bevy::prelude::*;

use crate::npcs::spawning::spawn_level_npcs;
use crate::shared::*;
use crate::train::motion::{carry_seated_passengers, sync_carriage_layout};
use crate::train::spawning::spawn_train;

pub const PLAYER_HALF_WIDTH: f32 = 0.4;

// ═══════════════════════════════════════════════════════════════════════
// PLUGIN
// ═══════════════════════════════════════════════════════════════════════

pub struct WorldPlugin;

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            start_from_title.run_if(in_state(GameState::Title)),
        )
        .add_systems(
            Update,
            handle_load_level
                .in_set(TransitSet::Level)
                .run_if(in_state(GameState::Playing)),
        )
        .add_systems(
            Update,
            (update_view_bounds, update_on_screen)
                .chain()
                .after(sync_carriage_layout)
                .after(carry_seated_passengers)
                .in_set(TransitSet::Layout)
                .run_if(in_state(GameState::Playing)),
        );
    }
}

// ═══════════════════════════════════════════════════════════════════════
// SYSTEMS
// ═══════════════════════════════════════════════════════════════════════

/// Interact on the title screen walks the player onto the Wadebridge platform.
fn start_from_title(
    input: Res<PlayerInput>,
    mut load: EventWriter<LoadLevelEvent>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if !input.interact {
        return;
    }
    load.send(LoadLevelEvent {
        station: Station::Wadebridge,
        by_train: false,
    });
    next_state.set(GameState::Playing);
}

/// Handle LoadLevelEvent: despawn the current level and build the new one.
#[allow(clippy::too_many_arguments)]
pub fn handle_load_level(
    mut commands: Commands,
    mut events: EventReader<LoadLevelEvent>,
    scoped: Query<Entity, With<LevelScoped>>,
    levels: Res<LevelRegistry>,
    archetypes: Res<ArchetypeRegistry>,
    config: Res<TransitConfig>,
    mut current: ResMut<CurrentStation>,
    mut remaining: ResMut<RemainingPassengers>,
    mut control: ResMut<PlayerControl>,
    mut pending: ResMut<PendingReconstruction>,
) {
    // Only the most recent request matters.
    let Some(event) = events.read().last().copied() else {
        return;
    };
    let Some(level) = levels.get(event.station) else {
        error!("[World] {}", TransitError::MissingLevel(event.station));
        return;
    };

    for entity in scoped.iter() {
        commands.entity(entity).despawn_recursive();
    }

    current.0 = event.station;
    spawn_train(&mut commands, level, event.by_train);

    let player_x = if event.by_train {
        level.arrival_start_x
    } else {
        level.player_start_x
    };
    commands.spawn((
        Player,
        Transform::from_xyz(player_x, TRACK_LEVEL, TRAIN_DEPTH + 2.0),
        VisualExtent {
            half_width: PLAYER_HALF_WIDTH,
        },
        OnScreen::default(),
        LevelScoped,
        Name::new("Player"),
    ));
    *control = if event.by_train {
        PlayerControl {
            locomotion: false,
            visible: false,
            on_board: true,
        }
    } else {
        PlayerControl::default()
    };

    remaining.0 = spawn_level_npcs(&mut commands, level, &archetypes, &config);
    pending.0 = true;

    info!(
        "[World] loaded {} (build index {}){}",
        event.station,
        event.station.level_index(),
        if event.by_train { " by train" } else { "" }
    );
}

/// Centre the view on whatever the player is: themselves, or the train
/// they are riding.
pub fn update_view_bounds(
    config: Res<TransitConfig>,
    control: Res<PlayerControl>,
    player: Query<&Transform, With<Player>>,
    trains: Query<&Transform, (With<Train>, Without<Player>)>,
    mut view: ResMut<ViewBounds>,
) {
    let focus = if control.on_board {
        trains.get_single().ok()
    } else {
        player.get_single().ok()
    };
    if let Some(transform) = focus {
        *view = ViewBounds::centered(transform.translation.x, config.view_half_width);
    }
}

pub fn update_on_screen(
    view: Res<ViewBounds>,
    mut query: Query<(&Transform, &VisualExtent, &mut OnScreen)>,
) {
    for (transform, extent, mut on_screen) in query.iter_mut() {
        let visible = view.overlaps(transform.translation.x, extent.half_width);
        if on_screen.0 != visible {
            on_screen.0 = visible;
        }
    }
}
