use bevy::prelude::*;
use crate::shared::*;

/// Floating "press E" marker above an NPC.
#[derive(Component)]
pub struct PromptMarker;

/// Ticket marker above an NPC still waiting for one.
#[derive(Component)]
pub struct TicketMarker;

const NPC_SIZE: Vec2 = Vec2::new(0.8, 1.6);
const SEAT_SIZE: Vec2 = Vec2::new(0.8, 0.3);

fn tint((r, g, b): (f32, f32, f32)) -> Color {
    Color::srgb(r, g, b)
}

fn shown(on: bool) -> Visibility {
    if on {
        Visibility::Inherited
    } else {
        Visibility::Hidden
    }
}

pub fn attach_npc_sprites(
    mut commands: Commands,
    archetypes: Res<ArchetypeRegistry>,
    npcs: Query<(Entity, &Npc, &Affordances), Added<Npc>>,
) {
    // Markers start out matching the affordances the NPC spawned with.
    for (entity, npc, affordances) in npcs.iter() {
        let color = archetypes
            .get(&npc.archetype)
            .map(|def| tint(def.tint))
            .unwrap_or(Color::srgb(0.5, 0.5, 0.5));
        commands
            .entity(entity)
            .insert(Sprite::from_color(color, NPC_SIZE))
            .with_children(|parent| {
                parent.spawn((
                    PromptMarker,
                    Sprite::from_color(Color::srgb(1.0, 1.0, 1.0), Vec2::splat(0.3)),
                    Transform::from_xyz(0.0, 1.3, 0.1),
                    shown(affordances.prompt_visible),
                ));
                parent.spawn((
                    TicketMarker,
                    Sprite::from_color(Color::srgb(0.95, 0.8, 0.2), Vec2::new(0.4, 0.25)),
                    Transform::from_xyz(0.0, 1.0, 0.1),
                    shown(affordances.ticket_visible),
                ));
            });
    }
}

pub fn attach_train_sprites(
    mut commands: Commands,
    trains: Query<(Entity, &VisualExtent), Added<Train>>,
    carriages: Query<(Entity, &Carriage), Added<Carriage>>,
    seats: Query<Entity, Added<Seat>>,
) {
    for (entity, extent) in trains.iter() {
        commands.entity(entity).insert(Sprite::from_color(
            Color::srgb(0.15, 0.3, 0.2),
            Vec2::new(extent.half_width * 2.0, 2.5),
        ));
    }
    for (entity, carriage) in carriages.iter() {
        let color = match carriage.class {
            CarriageClass::ClassA => Color::srgb(0.45, 0.15, 0.15),
            CarriageClass::ClassB => Color::srgb(0.55, 0.45, 0.3),
        };
        commands.entity(entity).insert(Sprite::from_color(
            color,
            Vec2::new(carriage.half_length * 2.0, 1.8),
        ));
    }
    for entity in seats.iter() {
        commands
            .entity(entity)
            .insert(Sprite::from_color(Color::srgb(0.3, 0.2, 0.1), SEAT_SIZE));
    }
}

pub fn attach_player_sprite(mut commands: Commands, player: Query<Entity, Added<Player>>) {
    for entity in player.iter() {
        commands.entity(entity).insert((
            Sprite::from_color(Color::srgb(0.1, 0.2, 0.6), NPC_SIZE),
            Visibility::Inherited,
        ));
    }
}

pub fn sync_player_visibility(
    control: Res<PlayerControl>,
    mut player: Query<&mut Visibility, With<Player>>,
) {
    for mut visibility in player.iter_mut() {
        *visibility = shown(control.visible);
    }
}

pub fn sync_affordance_markers(
    npcs: Query<(&Affordances, &Children), Changed<Affordances>>,
    mut prompts: Query<&mut Visibility, (With<PromptMarker>, Without<TicketMarker>)>,
    mut tickets: Query<&mut Visibility, (With<TicketMarker>, Without<PromptMarker>)>,
) {
    for (affordances, children) in npcs.iter() {
        for &child in children.iter() {
            if let Ok(mut visibility) = prompts.get_mut(child) {
                *visibility = shown(affordances.prompt_visible);
            }
            if let Ok(mut visibility) = tickets.get_mut(child) {
                *visibility = shown(affordances.ticket_visible);
            }
        }
    }
}
