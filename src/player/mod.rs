//! Player locomotion along the platform. Visibility and boarding belong to
//! the train; this plugin only walks when it is allowed to.

use bevy::prelude::*;
use crate::shared::*;

pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            player_movement
                .in_set(TransitSet::Sense)
                .before(crate::npcs::proximity::detect_player_proximity)
                .run_if(in_state(GameState::Playing)),
        );
    }
}

pub fn player_movement(
    time: Res<Time>,
    config: Res<TransitConfig>,
    input: Res<PlayerInput>,
    control: Res<PlayerControl>,
    mut player: Query<&mut Transform, With<Player>>,
) {
    if !control.locomotion || !control.visible || input.move_x == 0.0 {
        return;
    }
    for mut transform in player.iter_mut() {
        transform.translation.x += input.move_x * config.player_speed * time.delta_secs();
        transform.scale.x = input.move_x.signum();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use bevy::time::TimeUpdateStrategy;

    fn walker_app(control: PlayerControl) -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(100)))
            .init_resource::<TransitConfig>()
            .insert_resource(control)
            .insert_resource(PlayerInput {
                move_x: 1.0,
                ..default()
            })
            .add_systems(Update, player_movement);
        app.world_mut().spawn((Player, Transform::default()));
        app
    }

    fn player_x(app: &mut App) -> f32 {
        let mut query = app.world_mut().query_filtered::<&Transform, With<Player>>();
        query.single(app.world()).translation.x
    }

    #[test]
    fn test_player_walks_when_allowed() {
        let mut app = walker_app(PlayerControl::default());
        app.update();
        app.update();
        app.update();
        assert!(player_x(&mut app) > 0.0);
    }

    #[test]
    fn test_player_stands_still_on_board() {
        let mut app = walker_app(PlayerControl {
            locomotion: false,
            visible: false,
            on_board: true,
        });
        app.update();
        app.update();
        assert_eq!(player_x(&mut app), 0.0);
    }
}
