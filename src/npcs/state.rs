//! Pure transition rules of the NPC state machine.
//!
//! Nothing here touches the ECS. The systems in `behaviour` gather the
//! inputs, call these functions and apply the side effects of whatever
//! transition comes back.

use rand::Rng;
use crate::shared::*;

/// Everything a transition decision may depend on this tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInputs {
    pub movable: bool,
    pub in_range: bool,
    /// Interact was pressed and no other conversation holds the player.
    pub interact: bool,
}

/// Idle: talking takes precedence over wandering off.
pub fn idle_exit(inputs: TickInputs) -> Option<NpcState> {
    if inputs.interact && inputs.in_range {
        Some(NpcState::Talking)
    } else if inputs.movable {
        Some(NpcState::Moving)
    } else {
        None
    }
}

/// Moving: only wanderers can be stopped for a chat.
pub fn moving_exit(target: &TargetClass, inputs: TickInputs) -> Option<NpcState> {
    if target.is_wanderer() && inputs.interact && inputs.in_range {
        Some(NpcState::Talking)
    } else {
        None
    }
}

/// Talking ends on the matching dialogue completion.
pub fn talking_exit(target: &TargetClass) -> NpcState {
    if target.is_wanderer() {
        NpcState::Idle
    } else {
        NpcState::Embarking
    }
}

pub fn embarking_exit(inputs: TickInputs) -> NpcState {
    if inputs.in_range {
        NpcState::Moving
    } else {
        NpcState::Idle
    }
}

/// Signed x velocity of a Moving NPC.
pub fn walk_velocity(
    target: &TargetClass,
    station: Station,
    walk_speed: f32,
    wander_velocity: f32,
) -> f32 {
    match target {
        TargetClass::None => wander_velocity,
        TargetClass::Carriage(_) | TargetClass::Unrecognized(_) => {
            station.approach_sign() * walk_speed
        }
        TargetClass::Cleared => -station.approach_sign() * walk_speed,
    }
}

/// Uniform draw from {-1, 0, 1}.
pub fn draw_wander_velocity(rng: &mut impl Rng) -> f32 {
    rng.gen_range(-1..=1) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(movable: bool, in_range: bool, interact: bool) -> TickInputs {
        TickInputs {
            movable,
            in_range,
            interact,
        }
    }

    #[test]
    fn test_idle_prefers_talking_over_moving() {
        assert_eq!(idle_exit(inputs(true, true, true)), Some(NpcState::Talking));
        assert_eq!(idle_exit(inputs(true, false, true)), Some(NpcState::Moving));
        assert_eq!(idle_exit(inputs(false, false, false)), None);
        assert_eq!(idle_exit(inputs(false, true, false)), None);
    }

    #[test]
    fn test_only_wanderers_stop_while_moving() {
        let wanderer = TargetClass::None;
        let ticketed = TargetClass::Carriage(CarriageClass::ClassA);
        assert_eq!(
            moving_exit(&wanderer, inputs(true, true, true)),
            Some(NpcState::Talking)
        );
        assert_eq!(moving_exit(&ticketed, inputs(true, true, true)), None);
        assert_eq!(moving_exit(&wanderer, inputs(true, false, true)), None);
    }

    #[test]
    fn test_wanderers_never_embark() {
        assert_eq!(talking_exit(&TargetClass::None), NpcState::Idle);
        assert_eq!(
            talking_exit(&TargetClass::Carriage(CarriageClass::ClassB)),
            NpcState::Embarking
        );
        assert_eq!(
            talking_exit(&TargetClass::Unrecognized("Pullman".into())),
            NpcState::Embarking
        );
    }

    #[test]
    fn test_embarking_needs_player_in_range() {
        assert_eq!(embarking_exit(inputs(false, true, false)), NpcState::Moving);
        assert_eq!(embarking_exit(inputs(false, false, false)), NpcState::Idle);
    }

    #[test]
    fn test_walk_direction_depends_on_station_and_target() {
        let ticketed = TargetClass::Carriage(CarriageClass::ClassA);
        assert_eq!(walk_velocity(&ticketed, Station::Wadebridge, 5.0, 0.0), 5.0);
        assert_eq!(walk_velocity(&ticketed, Station::Bodmin, 5.0, 0.0), -5.0);
        assert_eq!(
            walk_velocity(&TargetClass::Cleared, Station::Bodmin, 5.0, 0.0),
            5.0
        );
        assert_eq!(walk_velocity(&TargetClass::None, Station::Bodmin, 5.0, -1.0), -1.0);
    }

    #[test]
    fn test_wander_velocity_stays_in_range() {
        let mut rng = rand::thread_rng();
        for _ in 0..100 {
            let v = draw_wander_velocity(&mut rng);
            assert!(v == -1.0 || v == 0.0 || v == 1.0);
        }
    }
}
