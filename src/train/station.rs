//! Station protocol: arrival and disembarkation, the player boarding, the
//! whistle delay and the departure trigger.

use bevy::prelude::*;
use crate::shared::*;
use super::motion::has_passed;

/// Release one seat and put its occupant back on the track.
fn disembark(
    commands: &mut Commands,
    seat: &mut Seat,
    npcs: &mut Query<
        (&mut Npc, &mut NpcState, &mut NpcAgent, &mut Transform),
        (Without<Player>, Without<Train>),
    >,
    changed: &mut EventWriter<NpcStateChanged>,
) -> bool {
    let Some(occupant) = seat.occupant.take() else {
        return false;
    };
    let Ok((mut npc, mut state, mut agent, mut transform)) = npcs.get_mut(occupant) else {
        warn!("[Train] seat {} held a passenger that no longer exists", seat.index);
        return false;
    };
    commands.entity(occupant).remove::<SeatAnchor>();
    transform.translation.y = TRACK_LEVEL;
    agent.collidable = true;
    agent.velocity = 0.0;
    npc.target = TargetClass::Cleared;
    transition_npc(occupant, &mut state, NpcState::Disembarking, changed);
    true
}

/// System: stop an arriving train at the platform and empty it.
#[allow(clippy::too_many_arguments)]
pub fn check_station_arrival(
    mut commands: Commands,
    station: Res<CurrentStation>,
    mut control: ResMut<PlayerControl>,
    mut trains: Query<(&mut Train, &mut BoardingVolume, &Transform), (Without<Player>, Without<Npc>)>,
    mut stops: Query<&mut StationStop>,
    carriages: Query<&Carriage>,
    mut seats: Query<&mut Seat>,
    mut npcs: Query<
        (&mut Npc, &mut NpcState, &mut NpcAgent, &mut Transform),
        (Without<Player>, Without<Train>),
    >,
    mut player: Query<&mut Transform, (With<Player>, Without<Npc>, Without<Train>)>,
    mut arrived: EventWriter<StationArrivedEvent>,
    mut changed: EventWriter<NpcStateChanged>,
) {
    let Ok((mut train, mut volume, train_tf)) = trains.get_single_mut() else {
        return;
    };
    if !train.moving {
        return;
    }
    let train_x = train_tf.translation.x;
    let Some(mut stop) = stops
        .iter_mut()
        .find(|stop| stop.enabled && has_passed(train_x, stop.x, train.heading))
    else {
        return;
    };

    train.moving = false;
    train.has_rotated = false;
    stop.enabled = false;
    volume.enabled = false;

    control.visible = true;
    control.locomotion = true;
    control.on_board = false;
    if let Ok(mut player_tf) = player.get_single_mut() {
        player_tf.translation.x = train_x;
        player_tf.translation.y = TRACK_LEVEL;
    }

    // ClassA first, then ClassB, every seat in one sweep.
    let mut disembarked = 0;
    for class in CarriageClass::ALL {
        for carriage in carriages.iter().filter(|carriage| carriage.class == class) {
            for &seat_entity in &carriage.seats {
                let Ok(mut seat) = seats.get_mut(seat_entity) else {
                    continue;
                };
                if disembark(&mut commands, &mut seat, &mut npcs, &mut changed) {
                    disembarked += 1;
                }
            }
        }
    }

    info!(
        "[Train] arrived at {}, {} passengers off",
        station.0, disembarked
    );
    arrived.send(StationArrivedEvent {
        station: station.0,
        disembarked,
    });
}

/// System: the player steps aboard from the platform side and the whistle
/// starts counting down.
#[allow(clippy::too_many_arguments)]
pub fn board_player(
    input: Res<PlayerInput>,
    config: Res<TransitConfig>,
    station: Res<CurrentStation>,
    mut control: ResMut<PlayerControl>,
    player: Query<&Transform, With<Player>>,
    mut trains: Query<(&mut Train, &BoardingVolume, &Transform), Without<Player>>,
    mut triggers: Query<&mut DepartureTrigger>,
) {
    if !input.interact || !control.visible || !control.locomotion || control.on_board {
        return;
    }
    let Ok(player_tf) = player.get_single() else {
        return;
    };
    let Ok((mut train, volume, train_tf)) = trains.get_single_mut() else {
        return;
    };
    let player_x = player_tf.translation.x;
    if !volume.enabled
        || train.moving
        || train.departure.is_some()
        || !volume.contains(train_tf.translation.x, train.heading, player_x)
        || !station.0.on_boarding_side(player_x)
    {
        return;
    }

    control.on_board = true;
    control.visible = false;
    control.locomotion = false;
    for mut trigger in triggers.iter_mut() {
        trigger.enabled = true;
    }
    train.departure = Some(Timer::from_seconds(
        config.whistle_delay_secs,
        TimerMode::Once,
    ));
    info!("[Train] player boarded at {}", station.0);
}

/// System: the whistle delay runs out and the train moves off.
pub fn tick_departure(time: Res<Time>, mut trains: Query<&mut Train>) {
    for mut train in trains.iter_mut() {
        let Some(timer) = train.departure.as_mut() else {
            continue;
        };
        timer.tick(time.delta());
        if timer.finished() {
            train.departure = None;
            train.moving = true;
            info!("[Train] departing");
        }
    }
}

/// System: once the train has run out of the level, load the other station.
pub fn check_departure_trigger(
    station: Res<CurrentStation>,
    trains: Query<(&Train, &Transform)>,
    mut triggers: Query<&mut DepartureTrigger>,
    mut load: EventWriter<LoadLevelEvent>,
) {
    let Ok((train, train_tf)) = trains.get_single() else {
        return;
    };
    if !train.moving {
        return;
    }
    for mut trigger in triggers.iter_mut() {
        if trigger.enabled && has_passed(train_tf.translation.x, trigger.x, train.heading) {
            trigger.enabled = false;
            info!("[Train] leaving {} for {}", station.0, station.0.next());
            load.send(LoadLevelEvent {
                station: station.0.next(),
                by_train: true,
            });
        }
    }
}
