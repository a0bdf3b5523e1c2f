//! Station layouts.
//!
//! Both stations share the same rolling stock: a locomotive at train-local
//! x = 0 with the 2nd class carriage behind it and the open 3rd class carriage
//! at the rear. Seat offsets are listed front to back, which is also the
//! order passengers walking in from the platform reach them.
//!
//! A train arriving by rail enters from the departure side of the level and
//! is turned round off screen before it can leave again.

use crate::shared::*;

fn rolling_stock() -> Vec<CarriageLayout> {
    vec![
        CarriageLayout {
            class: CarriageClass::ClassA,
            offset: 6.0,
            half_length: 2.5,
            seats: vec![2.0, 1.0, 0.0, -1.0],
        },
        CarriageLayout {
            class: CarriageClass::ClassB,
            offset: 11.0,
            half_length: 2.5,
            seats: vec![2.0, 1.0, 0.0, -1.0],
        },
    ]
}

fn spawn(archetype: &str, class: &str, x: f32) -> NpcSpawn {
    NpcSpawn {
        archetype: archetype.to_string(),
        class: class.to_string(),
        x,
    }
}

pub fn wadebridge() -> LevelDef {
    LevelDef {
        station: Station::Wadebridge,
        arrival_start_x: 40.0,
        station_stop_x: 0.0,
        departure_x: 30.0,
        player_start_x: -20.0,
        locomotive_half_length: 2.0,
        boarding_near: -2.0,
        boarding_far: 14.0,
        carriages: rolling_stock(),
        npcs: vec![
            spawn("gentleman", "ClassA", -22.0),
            spawn("lady", "ClassA", -30.0),
            spawn("farmer", "ClassB", -26.0),
            spawn("milkmaid", "ClassB", -34.0),
            spawn("fisherman", "None", -18.0),
            spawn("schoolboy", "None", -38.0),
        ],
    }
}

pub fn bodmin() -> LevelDef {
    LevelDef {
        station: Station::Bodmin,
        arrival_start_x: -40.0,
        station_stop_x: 0.0,
        departure_x: -30.0,
        player_start_x: 20.0,
        locomotive_half_length: 2.0,
        boarding_near: -2.0,
        boarding_far: 14.0,
        carriages: rolling_stock(),
        npcs: vec![
            spawn("clergyman", "ClassA", 24.0),
            spawn("clerk", "ClassA", 34.0),
            spawn("miner", "ClassB", 22.0),
            spawn("quarryman", "ClassB", 30.0),
            spawn("widow", "None", 18.0),
        ],
    }
}

pub fn populate_levels(registry: &mut LevelRegistry) {
    for level in [wadebridge(), bodmin()] {
        registry.levels.insert(level.station, level);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::archetypes::populate_archetypes;

    #[test]
    fn test_every_roster_entry_has_an_archetype() {
        let mut archetypes = ArchetypeRegistry::default();
        populate_archetypes(&mut archetypes);
        for level in [wadebridge(), bodmin()] {
            for npc in &level.npcs {
                assert!(
                    archetypes.get(&ArchetypeId::new(npc.archetype.as_str())).is_some(),
                    "{} has no archetype",
                    npc.archetype
                );
            }
        }
    }

    #[test]
    fn test_rosters_start_on_the_platform_side() {
        for level in [wadebridge(), bodmin()] {
            let heading = level.station.departure_heading();
            let volume = BoardingVolume {
                near: level.boarding_near,
                far: level.boarding_far,
                enabled: true,
            };
            let (min, max) = volume.world_extent(level.station_stop_x, heading);
            let centre = (min + max) / 2.0;
            for npc in &level.npcs {
                assert!(
                    npc.x < min || npc.x > max,
                    "{} spawns inside the train at {}",
                    npc.archetype,
                    npc.x
                );
                // Walking the approach direction closes the gap.
                assert_eq!((centre - npc.x).signum(), level.station.approach_sign());
            }
        }
    }

    #[test]
    fn test_arrival_runs_against_departure() {
        for level in [wadebridge(), bodmin()] {
            let arriving = level.station.departure_heading().reversed();
            let towards_stop = (level.station_stop_x - level.arrival_start_x).signum();
            assert_eq!(towards_stop, arriving.travel_sign());
            let leaving = (level.departure_x - level.station_stop_x).signum();
            assert_eq!(leaving, level.station.departure_heading().travel_sign());
        }
    }
}
