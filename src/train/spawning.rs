//! Rolling stock and track triggers for a freshly loaded level.

use bevy::prelude::*;
use crate::shared::*;
use super::motion::seat_world_x;

/// Spawn the train, its carriages and seats, the station stop and the
/// departure trigger. A train arriving by rail enters moving, facing the
/// opposite way to its departure; otherwise it is already laid over at the
/// platform with its boarding volume open.
pub fn spawn_train(commands: &mut Commands, level: &LevelDef, by_train: bool) -> Entity {
    let (x, heading) = if by_train {
        (level.arrival_start_x, level.station.departure_heading().reversed())
    } else {
        (level.station_stop_x, level.station.departure_heading())
    };

    let train = commands
        .spawn((
            Train {
                moving: by_train,
                heading,
                ..default()
            },
            BoardingVolume {
                near: level.boarding_near,
                far: level.boarding_far,
                enabled: !by_train,
            },
            Transform::from_xyz(x, TRACK_LEVEL, TRAIN_DEPTH),
            VisualExtent {
                half_width: level.locomotive_half_length,
            },
            OnScreen::default(),
            LevelScoped,
            Name::new("Locomotive"),
        ))
        .id();

    for layout in &level.carriages {
        let carriage = commands.spawn_empty().id();
        let seats: Vec<Entity> = layout
            .seats
            .iter()
            .enumerate()
            .map(|(index, &local_x)| {
                let seat_x = seat_world_x(x, heading, layout.offset, local_x);
                commands
                    .spawn((
                        Seat {
                            carriage,
                            class: layout.class,
                            index,
                            local_x,
                            occupant: None,
                        },
                        Transform::from_xyz(seat_x, SEAT_HEIGHT, TRAIN_DEPTH),
                        LevelScoped,
                    ))
                    .id()
            })
            .collect();

        commands.entity(carriage).insert((
            Carriage {
                class: layout.class,
                offset: layout.offset,
                half_length: layout.half_length,
                seats,
            },
            Transform::from_xyz(x + heading.sign() * layout.offset, TRACK_LEVEL, TRAIN_DEPTH),
            VisualExtent {
                half_width: layout.half_length,
            },
            OnScreen::default(),
            LevelScoped,
            Name::new(format!("{:?} carriage", layout.class)),
        ));
    }

    commands.spawn((
        StationStop {
            x: level.station_stop_x,
            enabled: by_train,
        },
        LevelScoped,
    ));
    commands.spawn((
        DepartureTrigger {
            x: level.departure_x,
            enabled: false,
        },
        LevelScoped,
    ));

    info!(
        "[Train] spawned at {} x={} heading {:?}{}",
        level.station,
        x,
        heading,
        if by_train { " (arriving)" } else { "" }
    );
    train
}
