//! HUD - stamina bar, magazine readout, movement state and range stats.

use bevy::prelude::*;

use crate::core::{DeathEvent, GameState, WeaponFired};
use crate::player::{CurrentWeapon, MovementState, Player, Stamina};
use crate::weapons::Weapon;
use crate::world::Target;

/// Marker for HUD root entity.
#[derive(Component)]
pub struct HudRoot;

/// Marker for stamina bar fill.
#[derive(Component)]
pub struct StaminaBar;

/// Marker for the magazine text.
#[derive(Component)]
pub struct AmmoText;

/// Marker for the movement state text.
#[derive(Component)]
pub struct MovementStateText;

/// Marker for the remaining targets text.
#[derive(Component)]
pub struct TargetsText;

/// Shots and kills of the player during the current game.
#[derive(Resource, Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeStats {
    pub shots: u32,
    pub kills: u32,
}

const STAMINA_COLOR: Color = Color::srgb(0.2, 0.8, 0.3);
const TIRED_COLOR: Color = Color::srgb(0.8, 0.5, 0.15);
const STATE_COLOR: Color = Color::srgb(0.8, 0.8, 0.8);
const AIMING_COLOR: Color = Color::srgb(1.0, 0.85, 0.4);

/// Setup HUD systems.
pub fn setup_hud_systems(app: &mut App) {
    // The HUD lives as long as the arena; pausing keeps it on screen
    app.init_resource::<RangeStats>()
        .add_systems(
            OnTransition {
                exited: GameState::MainMenu,
                entered: GameState::InGame,
            },
            spawn_hud,
        )
        .add_systems(OnEnter(GameState::MainMenu), cleanup_hud)
        .add_systems(
            Update,
            (
                track_range_stats,
                update_stamina_bar,
                update_ammo_text,
                update_movement_state_text,
                update_targets_text,
            )
                .run_if(in_state(GameState::InGame)),
        );
}

/// Spawn the HUD UI.
fn spawn_hud(mut commands: Commands, mut stats: ResMut<RangeStats>) {
    *stats = RangeStats::default();

    // Bottom-left: stamina and movement state
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::End,
                align_items: AlignItems::Start,
                padding: UiRect::all(Val::Px(20.0)),
                ..default()
            },
            HudRoot,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(MovementState::default().name()),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(STATE_COLOR),
                Node {
                    margin: UiRect::bottom(Val::Px(6.0)),
                    ..default()
                },
                MovementStateText,
            ));

            spawn_bar(parent, "Stamina", STAMINA_COLOR, StaminaBar);
        });

    // Bottom-right: magazine and targets
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::End,
                align_items: AlignItems::End,
                padding: UiRect::all(Val::Px(20.0)),
                position_type: PositionType::Absolute,
                ..default()
            },
            HudRoot,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(""),
                TextFont {
                    font_size: 14.0,
                    ..default()
                },
                TextColor(Color::srgb(0.7, 0.7, 0.75)),
                Node {
                    margin: UiRect::bottom(Val::Px(6.0)),
                    ..default()
                },
                TargetsText,
            ));

            parent.spawn((
                Text::new("--"),
                TextFont {
                    font_size: 28.0,
                    ..default()
                },
                TextColor(Color::srgb(0.9, 0.9, 0.9)),
                AmmoText,
            ));
        });
}

/// Helper to spawn a status bar.
fn spawn_bar<M: Component>(parent: &mut ChildBuilder, label: &str, color: Color, bar_marker: M) {
    parent
        .spawn(Node {
            flex_direction: FlexDirection::Row,
            align_items: AlignItems::Center,
            margin: UiRect::bottom(Val::Px(5.0)),
            ..default()
        })
        .with_children(|bar_parent| {
            // Label
            bar_parent.spawn((
                Text::new(label),
                TextFont {
                    font_size: 14.0,
                    ..default()
                },
                TextColor(Color::srgb(0.8, 0.8, 0.8)),
                Node {
                    width: Val::Px(60.0),
                    ..default()
                },
            ));

            // Bar background
            bar_parent
                .spawn((
                    Node {
                        width: Val::Px(150.0),
                        height: Val::Px(12.0),
                        ..default()
                    },
                    BackgroundColor(Color::srgb(0.1, 0.1, 0.1)),
                ))
                .with_children(|bg| {
                    // Bar fill
                    bg.spawn((
                        Node {
                            width: Val::Percent(100.0),
                            height: Val::Percent(100.0),
                            ..default()
                        },
                        BackgroundColor(color),
                        bar_marker,
                    ));
                });
        });
}

/// Update stamina bar based on player stamina.
fn update_stamina_bar(
    player_query: Query<&Stamina, (With<Player>, Changed<Stamina>)>,
    mut bar_query: Query<(&mut Node, &mut BackgroundColor), With<StaminaBar>>,
) {
    let Ok(stamina) = player_query.get_single() else {
        return;
    };
    let Ok((mut bar, mut color)) = bar_query.get_single_mut() else {
        return;
    };

    bar.width = Val::Percent(stamina.fraction() * 100.0);
    color.0 = if stamina.tired { TIRED_COLOR } else { STAMINA_COLOR };
}

/// Show the current weapon's magazine, or that it is reloading.
fn update_ammo_text(
    player_query: Query<&CurrentWeapon, With<Player>>,
    weapon_query: Query<&Weapon>,
    mut text_query: Query<&mut Text, With<AmmoText>>,
) {
    let Ok(mut text) = text_query.get_single_mut() else {
        return;
    };

    let readout = player_query
        .get_single()
        .ok()
        .and_then(|current| current.0)
        .and_then(|entity| weapon_query.get(entity).ok())
        .map(ammo_readout)
        .unwrap_or_else(|| "--".to_string());

    if text.0 != readout {
        text.0 = readout;
    }
}

fn ammo_readout(weapon: &Weapon) -> String {
    if weapon.reloading {
        format!("{}  RELOADING", weapon.info.name)
    } else {
        format!("{}  {}/{}", weapon.info.name, weapon.rounds, weapon.info.max_round)
    }
}

fn update_movement_state_text(
    player_query: Query<&MovementState, (With<Player>, Changed<MovementState>)>,
    mut text_query: Query<(&mut Text, &mut TextColor), With<MovementStateText>>,
) {
    let Ok(state) = player_query.get_single() else {
        return;
    };
    if let Ok((mut text, mut color)) = text_query.get_single_mut() {
        text.0 = state.name().to_string();
        color.0 = if state.is_aiming() { AIMING_COLOR } else { STATE_COLOR };
    }
}

/// Count the player's shots and the kills credited to them.
fn track_range_stats(
    mut fired_events: EventReader<WeaponFired>,
    mut death_events: EventReader<DeathEvent>,
    player_query: Query<Entity, With<Player>>,
    mut stats: ResMut<RangeStats>,
) {
    let player = player_query.get_single().ok();
    if player.is_none() {
        fired_events.clear();
        death_events.clear();
        return;
    }

    let shots = fired_events.read().filter(|event| event.owner == player).count();
    let kills = death_events.read().filter(|event| event.killed_by == player).count();
    if shots > 0 || kills > 0 {
        stats.shots += shots as u32;
        stats.kills += kills as u32;
    }
}

fn update_targets_text(
    target_query: Query<(), With<Target>>,
    stats: Res<RangeStats>,
    mut text_query: Query<&mut Text, With<TargetsText>>,
) {
    let Ok(mut text) = text_query.get_single_mut() else {
        return;
    };

    let readout = range_readout(target_query.iter().count(), *stats);
    if text.0 != readout {
        text.0 = readout;
    }
}

fn range_readout(remaining: usize, stats: RangeStats) -> String {
    let targets = match remaining {
        0 => "All targets down".to_string(),
        remaining => format!("Targets: {remaining}"),
    };
    format!("{targets}  Shots: {}  Kills: {}", stats.shots, stats.kills)
}

/// Clean up HUD entities.
fn cleanup_hud(mut commands: Commands, query: Query<Entity, With<HudRoot>>) {
    for entity in query.iter() {
        commands.entity(entity).despawn_recursive();
    }
}
