mod shared;
mod input;
mod player;
mod manifest;
mod npcs;
mod train;
mod world;
mod dialogue;
mod ui;
mod data;

use bevy::prelude::*;
use bevy::window::{PresentMode, WindowResolution};

use shared::*;

fn main() {
    App::new()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Bodmin Line".into(),
                        resolution: WindowResolution::new(SCREEN_WIDTH, SCREEN_HEIGHT),
                        present_mode: PresentMode::AutoVsync,
                        resizable: true,
                        ..default()
                    }),
                    ..default()
                })
                .set(ImagePlugin::default_nearest()),
        )
        // Game state
        .init_state::<GameState>()
        .configure_sets(
            Update,
            (
                TransitSet::Level,
                TransitSet::Reconstruct,
                TransitSet::Layout,
                TransitSet::Sense,
                TransitSet::Agents,
                TransitSet::Train,
            )
                .chain(),
        )
        // Shared resources
        .init_resource::<CurrentStation>()
        .init_resource::<ArchetypeRegistry>()
        .init_resource::<LevelRegistry>()
        .init_resource::<TransitConfig>()
        .init_resource::<PlayerControl>()
        .init_resource::<PlayerInput>()
        .init_resource::<ViewBounds>()
        .init_resource::<RemainingPassengers>()
        // Events
        .add_event::<ProximityEvent>()
        .add_event::<DialogueStartEvent>()
        .add_event::<DialogueEndEvent>()
        .add_event::<LoadLevelEvent>()
        .add_event::<BoardingContactEvent>()
        .add_event::<NpcStateChanged>()
        .add_event::<StationArrivedEvent>()
        // Domain plugins
        .add_plugins(input::InputPlugin)
        .add_plugins(player::PlayerPlugin)
        .add_plugins(manifest::ManifestPlugin)
        .add_plugins(world::WorldPlugin)
        .add_plugins(npcs::NpcPlugin)
        .add_plugins(train::TrainPlugin)
        .add_plugins(dialogue::DialoguePlugin)
        .add_plugins(ui::UiPlugin)
        // Data loading
        .add_plugins(data::DataPlugin)
        .run();
}
