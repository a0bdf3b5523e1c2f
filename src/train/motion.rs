//! Train motion, carriage layout and the off-screen turn-round.

use bevy::prelude::*;
use crate::shared::*;

pub fn carriage_world_x(train_x: f32, heading: Heading, offset: f32) -> f32 {
    train_x + heading.sign() * offset
}

pub fn seat_world_x(train_x: f32, heading: Heading, offset: f32, local_x: f32) -> f32 {
    train_x + heading.sign() * (offset + local_x)
}

/// Has a train at `train_x` reached (or gone beyond) `trigger_x`?
pub fn has_passed(train_x: f32, trigger_x: f32, heading: Heading) -> bool {
    (train_x - trigger_x) * heading.travel_sign() >= 0.0
}

/// System: translate the train while it is moving.
pub fn move_train(
    time: Res<Time>,
    config: Res<TransitConfig>,
    mut trains: Query<(&Train, &mut Transform)>,
) {
    let dt = time.delta_secs();
    for (train, mut transform) in trains.iter_mut() {
        if train.moving {
            transform.translation.x += train.heading.travel_sign() * config.train_speed * dt;
        }
    }
}

/// System: hang carriages and seats off the locomotive.
pub fn sync_carriage_layout(
    trains: Query<(&Train, &Transform)>,
    mut carriages: Query<(&Carriage, &mut Transform), Without<Train>>,
    mut seats: Query<(&Seat, &mut Transform), (Without<Train>, Without<Carriage>)>,
) {
    let Ok((train, train_tf)) = trains.get_single() else {
        return;
    };
    let origin = train_tf.translation;

    for (carriage, mut transform) in carriages.iter_mut() {
        transform.translation.x = carriage_world_x(origin.x, train.heading, carriage.offset);
        transform.translation.y = origin.y;
        transform.translation.z = origin.z;
    }

    for (seat, mut transform) in seats.iter_mut() {
        let Ok((carriage, _)) = carriages.get(seat.carriage) else {
            continue;
        };
        transform.translation.x =
            seat_world_x(origin.x, train.heading, carriage.offset, seat.local_x);
        transform.translation.y = origin.y + SEAT_HEIGHT;
        transform.translation.z = origin.z;
    }
}

/// System: seated passengers ride on their seat.
pub fn carry_seated_passengers(
    seats: Query<(&Seat, &Transform), Without<Npc>>,
    mut npcs: Query<(&NpcState, &SeatAnchor, &mut Transform), With<Npc>>,
) {
    for (state, anchor, mut transform) in npcs.iter_mut() {
        if *state != NpcState::Seated {
            continue;
        }
        let Ok((seat, seat_tf)) = seats.get(anchor.0) else {
            continue;
        };
        transform.translation.x = seat_tf.translation.x;
        transform.translation.y = seat_tf.translation.y;
        transform.translation.z = seat_tf.translation.z + seat.occupant_depth();
    }
}

/// System: once the player has walked away from a train that has just come
/// in, turn it round for the return journey.
pub fn reorient_when_hidden(
    station: Res<CurrentStation>,
    mut trains: Query<(&mut Train, &mut BoardingVolume, &mut Transform, &OnScreen)>,
    carriages: Query<&OnScreen, With<Carriage>>,
) {
    for (mut train, mut volume, mut transform, on_screen) in trains.iter_mut() {
        if train.has_rotated || train.moving || on_screen.0 {
            continue;
        }
        if carriages.iter().any(|visible| visible.0) {
            continue;
        }

        train.heading = station.0.departure_heading();
        transform.translation.x = 0.0;
        transform.translation.z = TRAIN_DEPTH;
        volume.enabled = true;
        train.has_rotated = true;
        info!("[Train] turned round at {}, boarding open", station.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seats_mirror_with_heading() {
        assert_eq!(seat_world_x(0.0, Heading::Forward, 6.0, 2.0), 8.0);
        assert_eq!(seat_world_x(0.0, Heading::Reversed, 6.0, 2.0), -8.0);
        assert_eq!(carriage_world_x(10.0, Heading::Reversed, 11.0), -1.0);
    }

    #[test]
    fn test_has_passed_follows_travel_direction() {
        // Forward travels towards -x.
        assert!(!has_passed(5.0, 0.0, Heading::Forward));
        assert!(has_passed(0.0, 0.0, Heading::Forward));
        assert!(has_passed(-0.1, 0.0, Heading::Forward));
        assert!(!has_passed(-5.0, 0.0, Heading::Reversed));
        assert!(has_passed(30.2, 30.0, Heading::Reversed));
    }
}
