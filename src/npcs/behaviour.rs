//! NPC state machine systems: dialogue completion, per-tick transitions and
//! translation along the track.

use bevy::prelude::*;
use crate::shared::*;
use super::state::{self, TickInputs};

/// Talking entry. Runs once per conversation, guarded by `session_started`.
fn begin_conversation(
    npc: Entity,
    target: &TargetClass,
    agent: &mut NpcAgent,
    control: &mut PlayerControl,
    dialogue_start: &mut EventWriter<DialogueStartEvent>,
) {
    if agent.session_started {
        return;
    }
    dialogue_start.send(DialogueStartEvent {
        npc,
        target: target.clone(),
    });
    agent.in_range = false;
    agent.session_started = true;
    control.locomotion = false;
}

/// System: close the Talking state of whichever NPC the finished conversation
/// belonged to.
pub fn handle_dialogue_finished(
    mut dialogue_end: EventReader<DialogueEndEvent>,
    mut npcs: Query<(&Npc, &mut NpcState, &mut NpcAgent, &mut Affordances)>,
    mut control: ResMut<PlayerControl>,
    mut changed: EventWriter<NpcStateChanged>,
) {
    for ev in dialogue_end.read() {
        let Ok((npc, mut state, mut agent, mut affordances)) = npcs.get_mut(ev.npc) else {
            continue;
        };
        if *state != NpcState::Talking || !agent.session_started {
            continue;
        }

        agent.session_started = false;
        agent.in_range = true;
        affordances.prompt_visible = false;
        control.locomotion = true;

        let next = state::talking_exit(&npc.target);
        transition_npc(ev.npc, &mut state, next, &mut changed);
    }
}

/// System: advance every agent by one tick.
#[allow(clippy::too_many_arguments)]
pub fn tick_npc_agents(
    time: Res<Time>,
    input: Res<PlayerInput>,
    mut control: ResMut<PlayerControl>,
    mut remaining: ResMut<RemainingPassengers>,
    mut npcs: Query<(Entity, &Npc, &mut NpcState, &mut NpcAgent, &mut Affordances)>,
    mut dialogue_start: EventWriter<DialogueStartEvent>,
    mut changed: EventWriter<NpcStateChanged>,
) {
    let mut rng = rand::thread_rng();

    for (entity, npc, mut state, mut agent, mut affordances) in npcs.iter_mut() {
        // One conversation at a time: whoever starts talking first this
        // tick takes the player's controls away from the rest.
        let inputs = TickInputs {
            movable: agent.movable,
            in_range: agent.in_range,
            interact: input.interact && control.locomotion && affordances.interactable,
        };

        match *state {
            NpcState::Idle => {
                if npc.target.is_wanderer() {
                    agent.movable = true;
                }
                let inputs = TickInputs {
                    movable: agent.movable,
                    ..inputs
                };
                if let Some(next) = state::idle_exit(inputs) {
                    transition_npc(entity, &mut state, next, &mut changed);
                }
            }
            NpcState::Moving => {
                if npc.target.is_wanderer() {
                    agent.wander_timer.tick(time.delta());
                    if agent.wander_timer.just_finished() {
                        agent.velocity = state::draw_wander_velocity(&mut rng);
                    }
                }
                if let Some(next) = state::moving_exit(&npc.target, inputs) {
                    transition_npc(entity, &mut state, next, &mut changed);
                }
            }
            NpcState::Embarking => {
                let next = state::embarking_exit(inputs);
                if next == NpcState::Moving {
                    agent.movable = true;
                    remaining.remove();
                    affordances.ticket_visible = false;
                    info!(
                        "[Npc] {} has a ticket, {} still waiting",
                        npc.archetype, remaining.0
                    );
                }
                transition_npc(entity, &mut state, next, &mut changed);
            }
            NpcState::Disembarking => {
                agent.movable = true;
                transition_npc(entity, &mut state, NpcState::Moving, &mut changed);
            }
            NpcState::Talking | NpcState::Seated => {}
        }

        if *state == NpcState::Talking {
            begin_conversation(
                entity,
                &npc.target,
                &mut agent,
                &mut control,
                &mut dialogue_start,
            );
        }
    }
}

/// System: translate Moving NPCs along the track.
pub fn move_npcs(
    time: Res<Time>,
    config: Res<TransitConfig>,
    station: Res<CurrentStation>,
    mut npcs: Query<(&Npc, &NpcState, &NpcAgent, &mut Transform)>,
) {
    let dt = time.delta_secs();
    for (npc, state, agent, mut transform) in npcs.iter_mut() {
        if *state != NpcState::Moving {
            continue;
        }
        let velocity =
            state::walk_velocity(&npc.target, station.0, config.npc_walk_speed, agent.velocity);
        transform.translation.x += velocity * dt;
        if velocity.abs() > 0.1 {
            transform.scale.x = velocity.signum();
        }
    }
}
