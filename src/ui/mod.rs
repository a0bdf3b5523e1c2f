//! Presentation: camera, placeholder sprites and the text overlays.
//!
//! Nothing in the simulation reads back from here. Every system only
//! mirrors shared state onto the screen.

use bevy::prelude::*;
use crate::shared::*;

pub mod hud;
pub mod sprites;

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_camera)
            .add_systems(OnEnter(GameState::Title), hud::spawn_title_screen)
            .add_systems(OnExit(GameState::Title), hud::despawn_title_screen)
            .add_systems(OnEnter(GameState::Playing), hud::spawn_hud)
            .add_systems(
                Update,
                (
                    sprites::attach_npc_sprites,
                    sprites::attach_train_sprites,
                    sprites::attach_player_sprite,
                    sprites::sync_player_visibility,
                    sprites::sync_affordance_markers,
                    hud::update_remaining_text,
                    hud::update_dialogue_text,
                    camera_follow_view,
                )
                    .after(TransitSet::Train)
                    .run_if(in_state(GameState::Playing)),
            );
    }
}

fn setup_camera(mut commands: Commands) {
    commands.spawn((
        Camera2d,
        Transform::from_scale(Vec3::splat(1.0 / PIXELS_PER_UNIT)),
    ));
}

fn camera_follow_view(view: Res<ViewBounds>, mut camera: Query<&mut Transform, With<Camera2d>>) {
    let centre = (view.min_x + view.max_x) / 2.0;
    for mut transform in camera.iter_mut() {
        transform.translation.x = centre;
        transform.translation.y = SCREEN_HEIGHT / PIXELS_PER_UNIT / 4.0;
    }
}
