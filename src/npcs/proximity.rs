//! Player ↔ NPC range detection.
//!
//! Range is an edge signal: `ProximityEvent::Entered` when the player comes
//! within `interact_range` of an interactable NPC, `Exited` when they leave.
//! Agents only ever see the edges, never the distance.

use bevy::prelude::*;
use std::collections::HashSet;
use crate::shared::*;

/// NPCs the player was in range of last tick.
#[derive(Resource, Debug, Default)]
pub struct NearbyNpcs {
    pub entities: HashSet<Entity>,
}

pub fn in_range(player_x: f32, npc_x: f32, range: f32) -> bool {
    (player_x - npc_x).abs() <= range
}

/// System: diff this tick's in-range set against the last one.
pub fn detect_player_proximity(
    config: Res<TransitConfig>,
    control: Res<PlayerControl>,
    player: Query<&Transform, With<Player>>,
    npcs: Query<(Entity, &Transform, &NpcAgent, &Affordances), Without<Player>>,
    mut nearby: ResMut<NearbyNpcs>,
    mut proximity: EventWriter<ProximityEvent>,
) {
    let current: HashSet<Entity> = match player.get_single() {
        Ok(player_tf) if control.visible => npcs
            .iter()
            .filter(|(_, tf, agent, affordances)| {
                agent.collidable
                    && affordances.interactable
                    && in_range(player_tf.translation.x, tf.translation.x, config.interact_range)
            })
            .map(|(entity, ..)| entity)
            .collect(),
        _ => HashSet::new(),
    };

    for &npc in current.difference(&nearby.entities) {
        proximity.send(ProximityEvent {
            npc,
            kind: ProximityKind::Entered,
        });
    }
    for &npc in nearby.entities.difference(&current) {
        proximity.send(ProximityEvent {
            npc,
            kind: ProximityKind::Exited,
        });
    }
    nearby.entities = current;
}

/// System: feed range edges into the agents and their prompt.
pub fn apply_proximity_events(
    mut proximity: EventReader<ProximityEvent>,
    mut npcs: Query<(&mut NpcAgent, &mut Affordances)>,
) {
    for ev in proximity.read() {
        // The NPC may have gone with the last level.
        let Ok((mut agent, mut affordances)) = npcs.get_mut(ev.npc) else {
            continue;
        };
        let entered = ev.kind == ProximityKind::Entered;
        agent.in_range = entered;
        affordances.prompt_visible = entered && affordances.interactable;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_is_inclusive_and_symmetric() {
        assert!(in_range(0.0, 1.5, 1.5));
        assert!(in_range(1.5, 0.0, 1.5));
        assert!(!in_range(0.0, 1.6, 1.5));
    }
}
