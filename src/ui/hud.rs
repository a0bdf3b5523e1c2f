use bevy::prelude::*;
use crate::dialogue::DialogueSession;
use crate::shared::*;

// ═══════════════════════════════════════════════════════════════════════
// MARKER COMPONENTS
// ═══════════════════════════════════════════════════════════════════════

#[derive(Component)]
pub struct TitleScreenRoot;

#[derive(Component)]
pub struct HudRemainingText;

#[derive(Component)]
pub struct HudDialogueText;

// ═══════════════════════════════════════════════════════════════════════
// TITLE
// ═══════════════════════════════════════════════════════════════════════

pub fn spawn_title_screen(mut commands: Commands) {
    commands
        .spawn((
            TitleScreenRoot,
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                row_gap: Val::Px(16.0),
                ..default()
            },
            BackgroundColor(Color::srgb(0.08, 0.1, 0.12)),
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("The Bodmin Line"),
                TextFont {
                    font_size: 48.0,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));
            parent.spawn((
                Text::new("Press E to start"),
                TextFont {
                    font_size: 20.0,
                    ..default()
                },
                TextColor(Color::srgb(0.8, 0.8, 0.8)),
            ));
        });
}

pub fn despawn_title_screen(mut commands: Commands, query: Query<Entity, With<TitleScreenRoot>>) {
    for entity in &query {
        commands.entity(entity).despawn_recursive();
    }
}

// ═══════════════════════════════════════════════════════════════════════
// IN-GAME HUD
// ═══════════════════════════════════════════════════════════════════════

pub fn spawn_hud(mut commands: Commands) {
    commands
        .spawn(Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            flex_direction: FlexDirection::Column,
            justify_content: JustifyContent::SpaceBetween,
            padding: UiRect::all(Val::Px(12.0)),
            ..default()
        })
        .with_children(|parent| {
            parent.spawn((
                HudRemainingText,
                Text::new(RemainingPassengers::default().prompt_text()),
                TextFont {
                    font_size: 18.0,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));
            parent.spawn((
                HudDialogueText,
                Text::new(""),
                TextFont {
                    font_size: 18.0,
                    ..default()
                },
                TextColor(Color::srgb(1.0, 0.95, 0.8)),
                BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.6)),
            ));
        });
}

pub fn update_remaining_text(
    remaining: Res<RemainingPassengers>,
    mut query: Query<&mut Text, With<HudRemainingText>>,
) {
    if !remaining.is_changed() {
        return;
    }
    for mut text in &mut query {
        **text = remaining.prompt_text();
    }
}

pub fn update_dialogue_text(
    session: Res<DialogueSession>,
    mut query: Query<&mut Text, With<HudDialogueText>>,
) {
    let shown = session
        .conversation
        .as_ref()
        .map(|conversation| conversation.visible_text())
        .unwrap_or_default();
    for mut text in &mut query {
        if **text != shown {
            **text = shown.clone();
        }
    }
}
