//! Dialogue session: a typewriter conversation between the player and one NPC.
//!
//! Opens on `DialogueStartEvent`, reveals its lines one character at a time,
//! waits for the player to hand over a ticket where one was asked for, and
//! announces the end with `DialogueEndEvent`. Only one conversation is open
//! at a time.

use bevy::prelude::*;
use std::time::Duration;
use crate::shared::*;

pub mod lines;

pub struct DialoguePlugin;

impl Plugin for DialoguePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DialogueSession>();

        // Conversations advance before the agents look for their completion.
        app.add_systems(
            Update,
            (toggle_text_speed, start_conversations, advance_conversation)
                .chain()
                .in_set(TransitSet::Sense)
                .run_if(in_state(GameState::Playing)),
        );
    }
}

// ═══════════════════════════════════════════════════════════════════════
// CONVERSATION
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Revealing,
    Pausing,
    AwaitingReply,
    Closing,
}

#[derive(Debug, Clone)]
pub struct Conversation {
    pub npc: Entity,
    pub lines: Vec<String>,
    pub current_line: usize,
    /// Characters of the current line shown so far.
    pub revealed: usize,
    pub phase: Phase,
    pub awaits_reply: bool,
    timer: Timer,
}

fn reveal_timer(config: &TransitConfig, speed: f32) -> Timer {
    Timer::from_seconds(config.char_reveal_secs * speed, TimerMode::Repeating)
}

impl Conversation {
    pub fn new(
        npc: Entity,
        lines: Vec<String>,
        awaits_reply: bool,
        config: &TransitConfig,
        speed: f32,
    ) -> Self {
        Self {
            npc,
            lines,
            current_line: 0,
            revealed: 0,
            phase: Phase::Revealing,
            awaits_reply,
            timer: reveal_timer(config, speed),
        }
    }

    fn line_len(&self) -> usize {
        self.lines
            .get(self.current_line)
            .map(|line| line.chars().count())
            .unwrap_or(0)
    }

    pub fn visible_text(&self) -> String {
        self.lines
            .get(self.current_line)
            .map(|line| line.chars().take(self.revealed).collect())
            .unwrap_or_default()
    }

    fn next_line(&mut self, config: &TransitConfig, speed: f32) {
        self.current_line += 1;
        self.revealed = 0;
        self.phase = Phase::Revealing;
        self.timer = reveal_timer(config, speed);
    }

    /// Advance by `delta`. `reply` is the player's interact for this frame.
    /// Returns true once the conversation is over.
    pub fn advance(
        &mut self,
        delta: Duration,
        reply: bool,
        config: &TransitConfig,
        speed: f32,
    ) -> bool {
        match self.phase {
            Phase::Revealing => {
                self.timer.tick(delta);
                let steps = self.timer.times_finished_this_tick() as usize;
                self.revealed = (self.revealed + steps).min(self.line_len());
                if self.revealed >= self.line_len() {
                    self.phase = Phase::Pausing;
                    self.timer =
                        Timer::from_seconds(config.line_pause_secs * speed, TimerMode::Once);
                }
            }
            Phase::Pausing => {
                self.timer.tick(delta);
                if self.timer.finished() {
                    if self.current_line + 1 < self.lines.len() {
                        self.next_line(config, speed);
                    } else if self.awaits_reply {
                        self.phase = Phase::AwaitingReply;
                    } else {
                        self.phase = Phase::Closing;
                        self.timer =
                            Timer::from_seconds(config.close_delay_secs * speed, TimerMode::Once);
                    }
                }
            }
            Phase::AwaitingReply => {
                if reply {
                    self.lines.push(lines::REPLY.to_string());
                    self.awaits_reply = false;
                    self.next_line(config, speed);
                }
            }
            Phase::Closing => {
                self.timer.tick(delta);
                return self.timer.finished();
            }
        }
        false
    }
}

/// The open conversation, if any, and the text speed setting.
#[derive(Resource, Debug, Clone)]
pub struct DialogueSession {
    pub conversation: Option<Conversation>,
    /// Multiplies every reveal delay. 0.5 is the fast setting.
    pub speed_multiplier: f32,
}

impl Default for DialogueSession {
    fn default() -> Self {
        Self {
            conversation: None,
            speed_multiplier: 1.0,
        }
    }
}

impl DialogueSession {
    pub fn toggle_speed(&mut self) {
        self.speed_multiplier = if self.speed_multiplier < 1.0 { 1.0 } else { 0.5 };
    }
}

// ═══════════════════════════════════════════════════════════════════════
// SYSTEMS
// ═══════════════════════════════════════════════════════════════════════

fn toggle_text_speed(input: Res<PlayerInput>, mut session: ResMut<DialogueSession>) {
    if input.toggle_text_speed {
        session.toggle_speed();
        info!("[Dialogue] text speed x{}", session.speed_multiplier);
    }
}

pub fn start_conversations(
    mut events: EventReader<DialogueStartEvent>,
    config: Res<TransitConfig>,
    mut session: ResMut<DialogueSession>,
) {
    let mut rng = rand::thread_rng();
    for event in events.read() {
        if let Some(open) = &session.conversation {
            warn!(
                "[Dialogue] {:?} asked to talk while {:?} is still talking",
                event.npc, open.npc
            );
            continue;
        }
        let speed = session.speed_multiplier;
        session.conversation = Some(Conversation::new(
            event.npc,
            lines::build_lines(&event.target, &mut rng),
            lines::awaits_reply(&event.target),
            &config,
            speed,
        ));
        debug!("[Dialogue] conversation with {:?} opened", event.npc);
    }
}

pub fn advance_conversation(
    time: Res<Time>,
    input: Res<PlayerInput>,
    config: Res<TransitConfig>,
    mut session: ResMut<DialogueSession>,
    mut end: EventWriter<DialogueEndEvent>,
) {
    let speed = session.speed_multiplier;
    let Some(conversation) = session.conversation.as_mut() else {
        return;
    };
    if conversation.advance(time.delta(), input.interact, &config, speed) {
        let npc = conversation.npc;
        session.conversation = None;
        end.send(DialogueEndEvent { npc });
        debug!("[Dialogue] conversation with {:?} closed", npc);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(conversation: &mut Conversation, reply_at_wait: bool, config: &TransitConfig) -> usize {
        let step = Duration::from_millis(10);
        for frame in 0..10_000 {
            let reply = reply_at_wait && conversation.phase == Phase::AwaitingReply;
            if conversation.advance(step, reply, config, 1.0) {
                return frame;
            }
        }
        panic!("conversation never closed");
    }

    #[test]
    fn test_single_line_closes_on_its_own() {
        let config = TransitConfig::default();
        let mut conversation =
            Conversation::new(Entity::PLACEHOLDER, vec!["Hello".into()], false, &config, 1.0);
        let frames = run(&mut conversation, false, &config);
        // 5 chars at 0.1s, a 0.2s pause and a 0.2s close delay.
        assert!(frames >= 85, "closed too early after {frames} frames");
    }

    #[test]
    fn test_ticket_request_waits_for_reply() {
        let config = TransitConfig::default();
        let mut conversation = Conversation::new(
            Entity::PLACEHOLDER,
            vec!["Hi".into(), lines::CLASS_A_REQUEST.into()],
            true,
            &config,
            1.0,
        );
        for _ in 0..2_000 {
            assert!(!conversation.advance(Duration::from_millis(10), false, &config, 1.0));
        }
        assert_eq!(conversation.phase, Phase::AwaitingReply);
        assert_eq!(conversation.visible_text(), lines::CLASS_A_REQUEST);

        run(&mut conversation, true, &config);
        assert_eq!(conversation.lines.last().map(String::as_str), Some(lines::REPLY));
    }

    #[test]
    fn test_reveal_is_one_char_per_interval() {
        let config = TransitConfig::default();
        let mut conversation =
            Conversation::new(Entity::PLACEHOLDER, vec!["Hello".into()], false, &config, 1.0);
        conversation.advance(Duration::from_millis(250), false, &config, 1.0);
        assert_eq!(conversation.visible_text(), "He");
    }

    #[test]
    fn test_speed_toggle_flips_between_normal_and_fast() {
        let mut session = DialogueSession::default();
        session.toggle_speed();
        assert_eq!(session.speed_multiplier, 0.5);
        session.toggle_speed();
        assert_eq!(session.speed_multiplier, 1.0);
    }
}
