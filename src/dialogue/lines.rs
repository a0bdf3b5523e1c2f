//! What NPCs say, by boarding target.

use rand::seq::SliceRandom;
use rand::Rng;
use crate::shared::*;

pub const CLASS_A_REQUEST: &str = "Please can I have a ticket for the 2nd class carriage.";
pub const CLASS_B_REQUEST: &str = "Please can I have a ticket for the 3rd class carriage.";
/// The player's answer to a ticket request.
pub const REPLY: &str = "Here you go.";
pub const SILENT: &str = "...";

pub const CLASS_A_CHATTER: [&str; 3] = [
    "I can't wait to try the new train route from Wadebridge to Bodmin that opened today!",
    "The new train is so loud, sometimes I can't sleep at night.",
    "I finally know the way to the train station!",
];

pub const CLASS_B_CHATTER: [&str; 2] = [
    "I need to pack my umbrella just in case it rains. The third class carriage does not have a roof!",
    "I heard that the third class carriage used to carry sand.",
];

fn pick(pool: &[&str], rng: &mut impl Rng) -> String {
    pool.choose(rng).copied().unwrap_or(SILENT).to_string()
}

/// Ticket holders wait for the player to hand one over.
pub fn awaits_reply(target: &TargetClass) -> bool {
    matches!(target, TargetClass::Carriage(_))
}

pub fn build_lines(target: &TargetClass, rng: &mut impl Rng) -> Vec<String> {
    match target {
        TargetClass::Carriage(CarriageClass::ClassA) => {
            vec![pick(&CLASS_A_CHATTER, rng), CLASS_A_REQUEST.to_string()]
        }
        TargetClass::Carriage(CarriageClass::ClassB) => {
            vec![pick(&CLASS_B_CHATTER, rng), CLASS_B_REQUEST.to_string()]
        }
        TargetClass::None => {
            let pool: Vec<&str> = CLASS_A_CHATTER
                .iter()
                .chain(CLASS_B_CHATTER.iter())
                .copied()
                .collect();
            vec![pick(&pool, rng)]
        }
        TargetClass::Cleared | TargetClass::Unrecognized(_) => vec![SILENT.to_string()],
    }
}
