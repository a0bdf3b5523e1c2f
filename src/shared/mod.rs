//! Shared components, resources, events, and states for the Bodmin Line.
//!
//! This is the type contract. Every domain plugin imports from here.
//! No domain imports from any other domain directly, with two exceptions:
//! `world` calls the spawn helpers of `npcs` and `train` when a level is
//! loaded, and `train` spawns reconstructed passengers through `npcs`.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

// ═══════════════════════════════════════════════════════════════════════
// GAME STATE: top-level state machine
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, States, Default)]
pub enum GameState {
    #[default]
    Loading,
    Title,
    Playing,
}

/// Per-tick ordering of the simulation. Configured as a chain by `main.rs`
/// and by the headless test harness.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransitSet {
    /// Tear down and spawn levels.
    Level,
    /// Replay the passenger manifest into fresh seats.
    Reconstruct,
    /// Place carriages/seats, carry seated NPCs, refresh visibility.
    Layout,
    /// Proximity edges and boarding contacts.
    Sense,
    /// NPC state machines.
    Agents,
    /// Seat assignment, motion and the station protocol.
    Train,
}

// ═══════════════════════════════════════════════════════════════════════
// STATIONS
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Station {
    Wadebridge,
    Bodmin,
}

impl Station {
    /// The other end of the line.
    pub fn next(self) -> Self {
        match self {
            Station::Wadebridge => Station::Bodmin,
            Station::Bodmin => Station::Wadebridge,
        }
    }

    /// Build index the level loader knows this station by.
    pub fn level_index(self) -> usize {
        match self {
            Station::Bodmin => 2,
            Station::Wadebridge => 3,
        }
    }

    pub fn from_level_index(index: usize) -> Option<Self> {
        match index {
            2 => Some(Station::Bodmin),
            3 => Some(Station::Wadebridge),
            _ => None,
        }
    }

    /// Sign of the x direction ticketed passengers walk to reach the train.
    /// The platform corridor is on the -x side at Wadebridge and on the +x
    /// side at Bodmin.
    pub fn approach_sign(self) -> f32 {
        match self {
            Station::Wadebridge => 1.0,
            Station::Bodmin => -1.0,
        }
    }

    /// Orientation the train takes while laying over at this station. An
    /// arriving train runs the opposite way and is turned round off screen.
    pub fn departure_heading(self) -> Heading {
        match self {
            Station::Wadebridge => Heading::Reversed,
            Station::Bodmin => Heading::Forward,
        }
    }

    /// Whether the player standing at `x` is on the platform side of the train.
    pub fn on_boarding_side(self, x: f32) -> bool {
        match self {
            Station::Wadebridge => x > -5.0,
            Station::Bodmin => x < 4.0,
        }
    }
}

impl fmt::Display for Station {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Station::Wadebridge => write!(f, "Wadebridge"),
            Station::Bodmin => write!(f, "Bodmin"),
        }
    }
}

/// The station whose level is currently loaded.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentStation(pub Station);

impl Default for CurrentStation {
    fn default() -> Self {
        Self(Station::Wadebridge)
    }
}

/// Train orientation along the track. `Forward` travels towards -x.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Heading {
    #[default]
    Forward,
    Reversed,
}

impl Heading {
    /// Multiplier applied to train-local x offsets.
    pub fn sign(self) -> f32 {
        match self {
            Heading::Forward => 1.0,
            Heading::Reversed => -1.0,
        }
    }

    /// Direction of travel in world x.
    pub fn travel_sign(self) -> f32 {
        -self.sign()
    }

    pub fn reversed(self) -> Self {
        match self {
            Heading::Forward => Heading::Reversed,
            Heading::Reversed => Heading::Forward,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// CARRIAGE CLASSES & TICKETS
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CarriageClass {
    /// 2nd class.
    ClassA,
    /// 3rd class, open-topped.
    ClassB,
}

impl CarriageClass {
    pub const ALL: [CarriageClass; 2] = [CarriageClass::ClassA, CarriageClass::ClassB];
}

/// What an NPC wants from the train.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum TargetClass {
    /// Wanders indefinitely and never boards.
    #[default]
    None,
    /// Holds (or wants) a ticket for this carriage.
    Carriage(CarriageClass),
    /// Has already ridden; no further boarding target.
    Cleared,
    /// A class name nobody recognises. Such an NPC can never be seated.
    Unrecognized(String),
}

impl TargetClass {
    /// Parse the class vocabulary used by level rosters.
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "ClassA" => TargetClass::Carriage(CarriageClass::ClassA),
            "ClassB" => TargetClass::Carriage(CarriageClass::ClassB),
            "None" => TargetClass::None,
            other => TargetClass::Unrecognized(other.to_string()),
        }
    }

    pub fn is_wanderer(&self) -> bool {
        matches!(self, TargetClass::None)
    }

    /// NPCs the player still has to hand a ticket to.
    pub fn counts_as_passenger(&self) -> bool {
        matches!(self, TargetClass::Carriage(_) | TargetClass::Unrecognized(_))
    }

    pub fn carriage(&self) -> Option<CarriageClass> {
        match self {
            TargetClass::Carriage(class) => Some(*class),
            _ => None,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// NPCs
// ═══════════════════════════════════════════════════════════════════════

/// Stable archetype identity. Doubles as the manifest key, so it must match
/// across instantiations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ArchetypeId(pub String);

impl ArchetypeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArchetypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchetypeDef {
    pub id: ArchetypeId,
    pub name: String,
    /// Placeholder sprite tint (r, g, b).
    pub tint: (f32, f32, f32),
}

/// All NPC templates a level or the manifest can instantiate.
#[derive(Resource, Debug, Clone, Default)]
pub struct ArchetypeRegistry {
    pub archetypes: HashMap<ArchetypeId, ArchetypeDef>,
}

impl ArchetypeRegistry {
    pub fn get(&self, id: &ArchetypeId) -> Option<&ArchetypeDef> {
        self.archetypes.get(id)
    }

    pub fn insert(&mut self, def: ArchetypeDef) {
        self.archetypes.insert(def.id.clone(), def);
    }
}

#[derive(Component, Debug, Clone)]
pub struct Npc {
    pub archetype: ArchetypeId,
    pub target: TargetClass,
}

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NpcState {
    #[default]
    Idle,
    Moving,
    Talking,
    Embarking,
    Seated,
    Disembarking,
}

/// Mutable per-agent bookkeeping read and written by the state machine.
#[derive(Component, Debug, Clone)]
pub struct NpcAgent {
    /// Signed walking velocity along the track axis (wanderers only).
    pub velocity: f32,
    /// Set once the NPC is allowed to leave Idle on its own.
    pub movable: bool,
    /// The player is inside this NPC's interaction range.
    pub in_range: bool,
    /// A dialogue session was started for the current Talking entry.
    pub session_started: bool,
    /// Whether the NPC takes part in boarding contacts and proximity.
    pub collidable: bool,
    /// Drives the wander velocity redraw.
    pub wander_timer: Timer,
}

impl NpcAgent {
    pub fn new(wander_interval_secs: f32) -> Self {
        Self {
            velocity: 0.0,
            movable: false,
            in_range: false,
            session_started: false,
            collidable: true,
            wander_timer: Timer::from_seconds(wander_interval_secs, TimerMode::Repeating),
        }
    }
}

impl Default for NpcAgent {
    fn default() -> Self {
        Self::new(TransitConfig::default().wander_interval_secs)
    }
}

/// Interaction visuals carried by an NPC.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Affordances {
    /// "Press E" style prompt shown while the player is in range.
    pub prompt_visible: bool,
    /// Ticket marker shown above NPCs still waiting for a ticket.
    pub ticket_visible: bool,
    /// Whether the player can talk to this NPC at all.
    pub interactable: bool,
}

impl Default for Affordances {
    fn default() -> Self {
        Self {
            prompt_visible: false,
            ticket_visible: false,
            interactable: true,
        }
    }
}

impl Affordances {
    pub fn hidden() -> Self {
        Self {
            prompt_visible: false,
            ticket_visible: false,
            interactable: false,
        }
    }
}

/// Back-reference from a seated NPC to the seat it occupies.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeatAnchor(pub Entity);

// ═══════════════════════════════════════════════════════════════════════
// TRAIN, CARRIAGES & SEATS
// ═══════════════════════════════════════════════════════════════════════

#[derive(Component, Debug, Clone)]
pub struct Train {
    pub moving: bool,
    /// False from station arrival until the off-screen re-orientation.
    pub has_rotated: bool,
    pub heading: Heading,
    /// Whistle delay between the player boarding and the train moving off.
    pub departure: Option<Timer>,
}

impl Default for Train {
    fn default() -> Self {
        Self {
            moving: false,
            has_rotated: true,
            heading: Heading::Forward,
            departure: None,
        }
    }
}

/// Trigger volume along the train, expressed in train-local x.
#[derive(Component, Debug, Clone, Copy)]
pub struct BoardingVolume {
    pub near: f32,
    pub far: f32,
    pub enabled: bool,
}

impl BoardingVolume {
    /// World-space (min, max) of the volume for a train at `train_x`.
    pub fn world_extent(&self, train_x: f32, heading: Heading) -> (f32, f32) {
        let a = train_x + heading.sign() * self.near;
        let b = train_x + heading.sign() * self.far;
        (a.min(b), a.max(b))
    }

    pub fn contains(&self, train_x: f32, heading: Heading, x: f32) -> bool {
        let (min, max) = self.world_extent(train_x, heading);
        x >= min && x <= max
    }
}

#[derive(Component, Debug, Clone)]
pub struct Carriage {
    pub class: CarriageClass,
    /// Train-local x of the carriage centre.
    pub offset: f32,
    pub half_length: f32,
    /// Seats in search order, front to back.
    pub seats: Vec<Entity>,
}

#[derive(Component, Debug, Clone)]
pub struct Seat {
    pub carriage: Entity,
    pub class: CarriageClass,
    pub index: usize,
    /// Carriage-local x of the seat.
    pub local_x: f32,
    /// Non-owning handle to the seated NPC.
    pub occupant: Option<Entity>,
}

impl Seat {
    pub fn is_free(&self) -> bool {
        self.occupant.is_none()
    }

    /// Depth offset of an occupant relative to the seat.
    pub fn occupant_depth(&self) -> f32 {
        match self.class {
            CarriageClass::ClassA => 1.0,
            CarriageClass::ClassB => 0.0,
        }
    }
}

/// The train stops when its locomotive passes this x.
#[derive(Component, Debug, Clone, Copy)]
pub struct StationStop {
    pub x: f32,
    pub enabled: bool,
}

/// Passing this x with the trigger armed loads the next station.
#[derive(Component, Debug, Clone, Copy)]
pub struct DepartureTrigger {
    pub x: f32,
    pub enabled: bool,
}

/// Horizontal half-size of anything whose on-screen state matters.
#[derive(Component, Debug, Clone, Copy)]
pub struct VisualExtent {
    pub half_width: f32,
}

/// Whether an entity with a `VisualExtent` overlaps the current view.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OnScreen(pub bool);

/// Despawned by the next level load.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct LevelScoped;

/// Set by a level load; cleared once the manifest has been replayed into
/// the fresh seats.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PendingReconstruction(pub bool);

// ═══════════════════════════════════════════════════════════════════════
// PLAYER
// ═══════════════════════════════════════════════════════════════════════

#[derive(Component, Debug, Clone, Default)]
pub struct Player;

/// Locomotion/visibility switches other domains flip on the player.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerControl {
    pub locomotion: bool,
    pub visible: bool,
    pub on_board: bool,
}

impl Default for PlayerControl {
    fn default() -> Self {
        Self {
            locomotion: true,
            visible: true,
            on_board: false,
        }
    }
}

/// Sampled actions for the current frame. Written by the input plugin,
/// or directly by tests.
#[derive(Resource, Debug, Clone, Default)]
pub struct PlayerInput {
    pub interact: bool,
    pub move_x: f32,
    pub toggle_text_speed: bool,
}

/// Horizontal window of the world an observer currently sees.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct ViewBounds {
    pub min_x: f32,
    pub max_x: f32,
}

impl Default for ViewBounds {
    fn default() -> Self {
        Self {
            min_x: -9.0,
            max_x: 9.0,
        }
    }
}

impl ViewBounds {
    pub fn centered(x: f32, half_width: f32) -> Self {
        Self {
            min_x: x - half_width,
            max_x: x + half_width,
        }
    }

    pub fn overlaps(&self, x: f32, half_width: f32) -> bool {
        x + half_width >= self.min_x && x - half_width <= self.max_x
    }
}

// ═══════════════════════════════════════════════════════════════════════
// PASSENGER COUNTER
// ═══════════════════════════════════════════════════════════════════════

/// NPCs at the current station still waiting for a ticket.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RemainingPassengers(pub u32);

impl RemainingPassengers {
    pub fn add(&mut self) {
        self.0 += 1;
    }

    pub fn remove(&mut self) {
        self.0 = self.0.saturating_sub(1);
    }

    pub fn prompt_text(&self) -> String {
        format!("Remaining: {}", self.0)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// CONFIGURATION
// ═══════════════════════════════════════════════════════════════════════

/// Tunables. Overridden from `config/transit.ron` on native builds.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitConfig {
    pub npc_walk_speed: f32,
    pub train_speed: f32,
    pub player_speed: f32,
    pub wander_interval_secs: f32,
    pub whistle_delay_secs: f32,
    pub interact_range: f32,
    pub view_half_width: f32,
    pub char_reveal_secs: f32,
    pub line_pause_secs: f32,
    pub close_delay_secs: f32,
}

impl Default for TransitConfig {
    fn default() -> Self {
        Self {
            npc_walk_speed: 5.0,
            train_speed: 5.0,
            player_speed: 5.0,
            wander_interval_secs: 5.0,
            whistle_delay_secs: 0.3,
            interact_range: 1.5,
            view_half_width: 9.0,
            char_reveal_secs: 0.1,
            line_pause_secs: 0.2,
            close_delay_secs: 0.2,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// LEVEL DEFINITIONS
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarriageLayout {
    pub class: CarriageClass,
    pub offset: f32,
    pub half_length: f32,
    /// Carriage-local seat x positions in search order.
    pub seats: Vec<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NpcSpawn {
    pub archetype: String,
    /// Raw class name: "ClassA", "ClassB" or "None".
    pub class: String,
    pub x: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelDef {
    pub station: Station,
    /// Where an arriving train enters the level.
    pub arrival_start_x: f32,
    /// Where the train lays over, and where an arriving train stops.
    pub station_stop_x: f32,
    pub departure_x: f32,
    pub player_start_x: f32,
    pub locomotive_half_length: f32,
    pub boarding_near: f32,
    pub boarding_far: f32,
    pub carriages: Vec<CarriageLayout>,
    pub npcs: Vec<NpcSpawn>,
}

#[derive(Resource, Debug, Clone, Default)]
pub struct LevelRegistry {
    pub levels: HashMap<Station, LevelDef>,
}

impl LevelRegistry {
    pub fn get(&self, station: Station) -> Option<&LevelDef> {
        self.levels.get(&station)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// ERRORS
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Error)]
pub enum TransitError {
    #[error("invalid carriage class '{0}'")]
    UnknownCarriageClass(String),
    #[error("no archetype registered as '{0}'")]
    UnknownArchetype(ArchetypeId),
    #[error("no free {class:?} seat for '{archetype}'")]
    NoFreeSeat {
        archetype: ArchetypeId,
        class: CarriageClass,
    },
    #[error("level has no {0:?} carriage")]
    MissingCarriage(CarriageClass),
    #[error("no level defined for {0}")]
    MissingLevel(Station),
    #[error("could not read config: {0}")]
    ConfigRead(#[from] std::io::Error),
    #[error("could not parse config: {0}")]
    ConfigParse(#[from] ron::error::SpannedError),
}

// ═══════════════════════════════════════════════════════════════════════
// EVENTS: cross-domain communication
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProximityKind {
    Entered,
    Exited,
}

/// The player entered or left an NPC's interaction range.
#[derive(Event, Debug, Clone, Copy)]
pub struct ProximityEvent {
    pub npc: Entity,
    pub kind: ProximityKind,
}

/// An NPC asks the dialogue session to run a conversation.
#[derive(Event, Debug, Clone)]
pub struct DialogueStartEvent {
    pub npc: Entity,
    pub target: TargetClass,
}

/// The conversation with `npc` has finished.
#[derive(Event, Debug, Clone, Copy)]
pub struct DialogueEndEvent {
    pub npc: Entity,
}

/// Request to tear down the current level and load `station`.
#[derive(Event, Debug, Clone, Copy)]
pub struct LoadLevelEvent {
    pub station: Station,
    /// The player arrives on board a moving train rather than on foot.
    pub by_train: bool,
}

/// An NPC is overlapping the train's boarding volume this tick.
#[derive(Event, Debug, Clone, Copy)]
pub struct BoardingContactEvent {
    pub npc: Entity,
}

#[derive(Event, Debug, Clone, Copy)]
pub struct NpcStateChanged {
    pub npc: Entity,
    pub from: NpcState,
    pub to: NpcState,
}

#[derive(Event, Debug, Clone, Copy)]
pub struct StationArrivedEvent {
    pub station: Station,
    pub disembarked: usize,
}

// ═══════════════════════════════════════════════════════════════════════
// CONSTANTS
// ═══════════════════════════════════════════════════════════════════════

pub const SCREEN_WIDTH: f32 = 960.0;
pub const SCREEN_HEIGHT: f32 = 540.0;
/// World units to pixels.
pub const PIXELS_PER_UNIT: f32 = 48.0;

/// Depth every train visual is normalised to after re-orientation.
pub const TRAIN_DEPTH: f32 = 1.0;
/// Height of a seat above the track.
pub const SEAT_HEIGHT: f32 = 1.0;
/// Ground level NPCs and the player walk on.
pub const TRACK_LEVEL: f32 = 0.0;

/// Move an NPC's `state` to `to` and announce it. Both the NPC and the train
/// domains drive transitions through here.
pub fn transition_npc(
    npc: Entity,
    state: &mut NpcState,
    to: NpcState,
    changed: &mut EventWriter<NpcStateChanged>,
) {
    if *state == to {
        return;
    }
    let from = *state;
    *state = to;
    debug!("[Npc] {:?}: {:?} -> {:?}", npc, from, to);
    changed.send(NpcStateChanged { npc, from, to });
}

/// Do two track positions fall on the same whole position unit?
pub fn lines_up(a: f32, b: f32) -> bool {
    a.round() == b.round()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_class_parse() {
        assert_eq!(
            TargetClass::parse("ClassA"),
            TargetClass::Carriage(CarriageClass::ClassA)
        );
        assert_eq!(
            TargetClass::parse(" ClassB "),
            TargetClass::Carriage(CarriageClass::ClassB)
        );
        assert_eq!(TargetClass::parse("None"), TargetClass::None);
        assert_eq!(
            TargetClass::parse("FirstClass"),
            TargetClass::Unrecognized("FirstClass".to_string())
        );
    }

    #[test]
    fn test_passenger_counting() {
        assert!(TargetClass::Carriage(CarriageClass::ClassA).counts_as_passenger());
        assert!(TargetClass::Unrecognized("x".into()).counts_as_passenger());
        assert!(!TargetClass::None.counts_as_passenger());
        assert!(!TargetClass::Cleared.counts_as_passenger());
    }

    #[test]
    fn test_station_round_trip() {
        for station in [Station::Wadebridge, Station::Bodmin] {
            assert_eq!(station.next().next(), station);
            assert_eq!(Station::from_level_index(station.level_index()), Some(station));
        }
        assert_eq!(Station::from_level_index(0), None);
    }

    #[test]
    fn test_lines_up_rounds_to_whole_units() {
        assert!(lines_up(-8.4, -8.0));
        assert!(lines_up(6.49, 6.0));
        assert!(!lines_up(6.6, 6.0));
        assert!(!lines_up(-9.0, -8.0));
    }

    #[test]
    fn test_boarding_volume_follows_heading() {
        let volume = BoardingVolume {
            near: -2.0,
            far: 14.0,
            enabled: true,
        };
        assert_eq!(volume.world_extent(0.0, Heading::Forward), (-2.0, 14.0));
        assert_eq!(volume.world_extent(0.0, Heading::Reversed), (-14.0, 2.0));
        assert!(volume.contains(10.0, Heading::Reversed, 0.0));
        assert!(!volume.contains(10.0, Heading::Forward, 0.0));
    }

    #[test]
    fn test_remaining_passengers_never_underflows() {
        let mut remaining = RemainingPassengers::default();
        remaining.remove();
        assert_eq!(remaining.0, 0);
        remaining.add();
        remaining.add();
        remaining.remove();
        assert_eq!(remaining.prompt_text(), "Remaining: 1");
    }

    #[test]
    fn test_view_bounds_overlap() {
        let view = ViewBounds::centered(0.0, 9.0);
        assert!(view.overlaps(10.0, 2.0));
        assert!(!view.overlaps(12.0, 2.0));
        assert!(view.overlaps(-10.5, 2.0));
    }
}
