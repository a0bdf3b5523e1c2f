//! NPC spawning: the roster of a freshly loaded level and passengers
//! reconstructed into their seats.

use bevy::prelude::*;
use crate::shared::*;

/// Depth NPCs walk at, in front of the platform and behind the train.
pub const NPC_DEPTH: f32 = 0.5;
pub const NPC_HALF_WIDTH: f32 = 0.4;

/// Spawn one roster entry standing on the platform.
pub fn spawn_roster_npc(
    commands: &mut Commands,
    spawn: &NpcSpawn,
    def: &ArchetypeDef,
    config: &TransitConfig,
) -> Entity {
    let target = TargetClass::parse(&spawn.class);
    let affordances = Affordances {
        ticket_visible: target.counts_as_passenger(),
        ..default()
    };
    commands
        .spawn((
            Npc {
                archetype: def.id.clone(),
                target,
            },
            NpcState::Idle,
            NpcAgent::new(config.wander_interval_secs),
            affordances,
            Transform::from_xyz(spawn.x, TRACK_LEVEL, NPC_DEPTH),
            VisualExtent {
                half_width: NPC_HALF_WIDTH,
            },
            OnScreen::default(),
            LevelScoped,
            Name::new(def.name.clone()),
        ))
        .id()
}

/// Spawn every roster entry of `level`. Returns how many still need a ticket.
pub fn spawn_level_npcs(
    commands: &mut Commands,
    level: &LevelDef,
    archetypes: &ArchetypeRegistry,
    config: &TransitConfig,
) -> u32 {
    let mut passengers = 0;
    for spawn in &level.npcs {
        let id = ArchetypeId::new(spawn.archetype.as_str());
        let Some(def) = archetypes.get(&id) else {
            warn!("[Npc] {}", TransitError::UnknownArchetype(id));
            continue;
        };
        spawn_roster_npc(commands, spawn, def, config);
        if TargetClass::parse(&spawn.class).counts_as_passenger() {
            passengers += 1;
        }
    }
    info!(
        "[Npc] {} NPCs spawned at {}, {} waiting for tickets",
        level.npcs.len(),
        level.station,
        passengers
    );
    passengers
}

/// Spawn an already-travelling passenger anchored to `seat`.
pub fn spawn_seated_npc(
    commands: &mut Commands,
    def: &ArchetypeDef,
    seat: Entity,
    position: Vec3,
    config: &TransitConfig,
) -> Entity {
    let agent = NpcAgent {
        collidable: false,
        ..NpcAgent::new(config.wander_interval_secs)
    };
    commands
        .spawn((
            Npc {
                archetype: def.id.clone(),
                target: TargetClass::Cleared,
            },
            NpcState::Seated,
            agent,
            Affordances::hidden(),
            SeatAnchor(seat),
            Transform::from_translation(position),
            VisualExtent {
                half_width: NPC_HALF_WIDTH,
            },
            OnScreen::default(),
            LevelScoped,
            Name::new(def.name.clone()),
        ))
        .id()
}
