//! Train domain plugin: seat allocation, the station protocol and motion.

use bevy::prelude::*;
use crate::shared::*;

pub mod motion;
pub mod seating;
pub mod spawning;
pub mod station;

use motion::{carry_seated_passengers, move_train, reorient_when_hidden, sync_carriage_layout};
use seating::{
    detect_boarding_contacts, handle_boarding_contacts, reconstruct_passengers, UnseatableNpcs,
};
use station::{board_player, check_departure_trigger, check_station_arrival, tick_departure};

pub struct TrainPlugin;

impl Plugin for TrainPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PendingReconstruction>()
            .init_resource::<UnseatableNpcs>();

        app.add_systems(
            Update,
            reconstruct_passengers
                .in_set(TransitSet::Reconstruct)
                .run_if(in_state(GameState::Playing)),
        );

        app.add_systems(
            Update,
            (sync_carriage_layout, carry_seated_passengers)
                .chain()
                .in_set(TransitSet::Layout)
                .run_if(in_state(GameState::Playing)),
        );

        app.add_systems(
            Update,
            detect_boarding_contacts
                .in_set(TransitSet::Sense)
                .run_if(in_state(GameState::Playing)),
        );

        app.add_systems(
            Update,
            (
                // Seats first: contacts were sampled against this tick's layout
                handle_boarding_contacts,
                board_player,
                tick_departure,
                move_train,
                check_station_arrival,
                check_departure_trigger,
                reorient_when_hidden,
            )
                .chain()
                .in_set(TransitSet::Train)
                .run_if(in_state(GameState::Playing)),
        );
    }
}
