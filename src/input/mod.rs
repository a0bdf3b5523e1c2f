use bevy::prelude::*;
use crate::shared::*;

pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<KeyBindings>()
            .add_systems(PreUpdate, reset_and_read_input);
    }
}

#[derive(Resource, Debug, Clone)]
pub struct KeyBindings {
    pub move_left: KeyCode,
    pub move_right: KeyCode,
    pub interact: KeyCode,
    pub toggle_text_speed: KeyCode,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            move_left: KeyCode::KeyA,
            move_right: KeyCode::KeyD,
            interact: KeyCode::KeyE,
            toggle_text_speed: KeyCode::KeyT,
        }
    }
}

/// The single point where hardware input becomes game actions.
fn reset_and_read_input(
    keys: Res<ButtonInput<KeyCode>>,
    bindings: Res<KeyBindings>,
    mut input: ResMut<PlayerInput>,
) {
    *input = PlayerInput::default();

    if keys.pressed(bindings.move_left) || keys.pressed(KeyCode::ArrowLeft) {
        input.move_x -= 1.0;
    }
    if keys.pressed(bindings.move_right) || keys.pressed(KeyCode::ArrowRight) {
        input.move_x += 1.0;
    }

    input.interact = keys.just_pressed(bindings.interact) || keys.just_pressed(KeyCode::Space);
    input.toggle_text_speed = keys.just_pressed(bindings.toggle_text_speed);
}
