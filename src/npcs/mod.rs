//! NPC domain plugin for the Bodmin Line.
//!
//! Runs the passenger state machine: NPCs wait on the platform, talk to the
//! player, walk to the train with their ticket and ride it to the next
//! station. Boarding itself belongs to the train; this domain only reacts.

use bevy::prelude::*;
use crate::shared::*;

pub mod behaviour;
pub mod proximity;
pub mod spawning;
pub mod state;

use behaviour::{handle_dialogue_finished, move_npcs, tick_npc_agents};
use proximity::{apply_proximity_events, detect_player_proximity, NearbyNpcs};

pub struct NpcPlugin;

impl Plugin for NpcPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<NearbyNpcs>();

        app.add_systems(
            Update,
            (detect_player_proximity, apply_proximity_events)
                .chain()
                .in_set(TransitSet::Sense)
                .run_if(in_state(GameState::Playing)),
        );

        app.add_systems(
            Update,
            (handle_dialogue_finished, tick_npc_agents, move_npcs)
                .chain()
                .in_set(TransitSet::Agents)
                .run_if(in_state(GameState::Playing)),
        );
    }
}
