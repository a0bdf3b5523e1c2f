//! Seat allocation: boarding contacts, manifest writes and the replay of the
//! manifest into a freshly loaded train.
//!
//! Every seat claim happens inside the systems in this file, one contact at a
//! time, mutating `Seat` in place. That is the whole of seat mutual
//! exclusion: a claim is visible to the next contact before it is examined.

use bevy::prelude::*;
use std::collections::HashSet;
use crate::manifest::PassengerManifest;
use crate::npcs::spawning::spawn_seated_npc;
use crate::shared::*;

/// NPCs whose seating error has already been logged. Entries go with the
/// NPC, so a level load leaves nothing behind.
#[derive(Resource, Debug, Default)]
pub struct UnseatableNpcs {
    pub reported: HashSet<Entity>,
}

/// Index of the first seat in `seats` (free flag, world x) that is empty and
/// lines up with `npc_x`.
pub fn first_lined_up_free(seats: &[(bool, f32)], npc_x: f32) -> Option<usize> {
    seats
        .iter()
        .position(|&(free, seat_x)| free && lines_up(npc_x, seat_x))
}

/// System: NPCs walking through an open boarding volume touch the train.
pub fn detect_boarding_contacts(
    trains: Query<(&Train, &BoardingVolume, &Transform)>,
    npcs: Query<(Entity, &NpcState, &NpcAgent, &Transform), (With<Npc>, Without<Train>)>,
    mut contacts: EventWriter<BoardingContactEvent>,
) {
    for (train, volume, train_tf) in trains.iter() {
        if !volume.enabled {
            continue;
        }
        for (entity, state, agent, transform) in npcs.iter() {
            if *state != NpcState::Moving || !agent.collidable {
                continue;
            }
            if volume.contains(train_tf.translation.x, train.heading, transform.translation.x) {
                contacts.send(BoardingContactEvent { npc: entity });
            }
        }
    }
}

/// Try to seat `npc` at `npc_x`. `Ok(None)` when the NPC has no boarding
/// target or no empty seat lines up with it yet.
pub fn assign_seat(
    npc: Entity,
    npc_x: f32,
    target: &TargetClass,
    carriages: &Query<&Carriage>,
    seats: &mut Query<(&mut Seat, &Transform), Without<Npc>>,
) -> Result<Option<(Entity, CarriageClass)>, TransitError> {
    let class = match target {
        TargetClass::Carriage(class) => *class,
        TargetClass::None | TargetClass::Cleared => return Ok(None),
        TargetClass::Unrecognized(raw) => {
            return Err(TransitError::UnknownCarriageClass(raw.clone()))
        }
    };

    let carriage = carriages
        .iter()
        .find(|carriage| carriage.class == class)
        .ok_or(TransitError::MissingCarriage(class))?;

    let candidates: Vec<(bool, f32)> = carriage
        .seats
        .iter()
        .map(|&seat| match seats.get(seat) {
            Ok((seat, transform)) => (seat.is_free(), transform.translation.x),
            Err(_) => (false, f32::NAN),
        })
        .collect();

    let Some(index) = first_lined_up_free(&candidates, npc_x) else {
        return Ok(None);
    };
    let seat_entity = carriage.seats[index];
    if let Ok((mut seat, _)) = seats.get_mut(seat_entity) {
        seat.occupant = Some(npc);
    }
    Ok(Some((seat_entity, class)))
}

/// System: seat NPCs from this tick's boarding contacts.
#[allow(clippy::too_many_arguments)]
pub fn handle_boarding_contacts(
    mut commands: Commands,
    mut contacts: EventReader<BoardingContactEvent>,
    carriages: Query<&Carriage>,
    mut seats: Query<(&mut Seat, &Transform), Without<Npc>>,
    mut npcs: Query<(&Npc, &mut NpcState, &mut NpcAgent, &mut Affordances, &Transform)>,
    mut manifest: ResMut<PassengerManifest>,
    mut changed: EventWriter<NpcStateChanged>,
    mut unseatable: ResMut<UnseatableNpcs>,
) {
    if !unseatable.reported.is_empty() {
        unseatable.reported.retain(|&npc| npcs.contains(npc));
    }

    for contact in contacts.read() {
        let Ok((npc, mut state, mut agent, mut affordances, transform)) =
            npcs.get_mut(contact.npc)
        else {
            continue;
        };
        if *state != NpcState::Moving {
            continue;
        }

        match assign_seat(
            contact.npc,
            transform.translation.x,
            &npc.target,
            &carriages,
            &mut seats,
        ) {
            Ok(Some((seat, class))) => {
                commands.entity(contact.npc).insert(SeatAnchor(seat));
                agent.velocity = 0.0;
                agent.movable = false;
                agent.collidable = false;
                *affordances = Affordances::hidden();
                transition_npc(contact.npc, &mut state, NpcState::Seated, &mut changed);
                manifest.record(class, npc.archetype.clone());
                info!("[Train] {} seated in {:?}", npc.archetype, class);
            }
            Ok(None) => {}
            Err(e) => {
                // A misconfigured NPC keeps touching the train every tick.
                if unseatable.reported.insert(contact.npc) {
                    error!("[Train] cannot seat {}: {}", npc.archetype, e);
                }
            }
        }
    }
}

/// Seat one manifest entry in the current train.
fn reseat(
    commands: &mut Commands,
    class: CarriageClass,
    id: &ArchetypeId,
    archetypes: &ArchetypeRegistry,
    config: &TransitConfig,
    carriages: &Query<&Carriage>,
    seats: &mut Query<(&mut Seat, &Transform)>,
) -> Result<Entity, TransitError> {
    let def = archetypes
        .get(id)
        .ok_or_else(|| TransitError::UnknownArchetype(id.clone()))?;
    let carriage = carriages
        .iter()
        .find(|carriage| carriage.class == class)
        .ok_or(TransitError::MissingCarriage(class))?;
    let seat_entity = carriage
        .seats
        .iter()
        .copied()
        .find(|&seat| seats.get(seat).map(|(seat, _)| seat.is_free()).unwrap_or(false))
        .ok_or_else(|| TransitError::NoFreeSeat {
            archetype: id.clone(),
            class,
        })?;

    let (mut seat, seat_tf) = seats
        .get_mut(seat_entity)
        .map_err(|_| TransitError::MissingCarriage(class))?;
    let mut position = seat_tf.translation;
    position.z += seat.occupant_depth();
    let npc = spawn_seated_npc(commands, def, seat_entity, position, config);
    seat.occupant = Some(npc);
    Ok(npc)
}

/// System: replay and drain the passenger manifest once per level load.
pub fn reconstruct_passengers(
    mut commands: Commands,
    mut pending: ResMut<PendingReconstruction>,
    mut manifest: ResMut<PassengerManifest>,
    archetypes: Res<ArchetypeRegistry>,
    config: Res<TransitConfig>,
    carriages: Query<&Carriage>,
    mut seats: Query<(&mut Seat, &Transform)>,
) {
    if !pending.0 {
        return;
    }
    pending.0 = false;

    let entries = manifest.drain();
    let total = entries.len();
    let mut seated = 0;
    for (class, id) in entries {
        match reseat(
            &mut commands,
            class,
            &id,
            &archetypes,
            &config,
            &carriages,
            &mut seats,
        ) {
            Ok(_) => seated += 1,
            Err(e) => warn!("[Manifest] dropping passenger: {}", e),
        }
    }
    if total > 0 {
        info!("[Manifest] {} of {} passengers back in their seats", seated, total);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_free_seat_that_lines_up_wins() {
        let seats = [(true, -8.0), (true, -7.0), (true, -6.0), (true, -5.0)];
        assert_eq!(first_lined_up_free(&seats, -7.2), Some(1));
        assert_eq!(first_lined_up_free(&seats, -9.0), None);
    }

    #[test]
    fn test_occupied_seat_is_skipped() {
        let seats = [(false, -8.0), (true, -7.0)];
        assert_eq!(first_lined_up_free(&seats, -8.0), None);
        assert_eq!(first_lined_up_free(&seats, -7.4), Some(1));
    }
}
