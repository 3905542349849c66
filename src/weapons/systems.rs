//! Weapon systems - equipping, trigger input, reload and the fire loop.

use bevy::prelude::*;
use bevy_kira_audio::{Audio, AudioControl};
use bevy_rapier3d::prelude::*;
use rand::Rng;

use super::components::*;
use super::data::WeaponRegistry;
use super::error::WeaponError;
use super::projectile::{spawn_projectile, ProjectileAssets};
use crate::core::{DamageEvent, GameState, MovementStateChanged, SimulationSet, WeaponFired};
use crate::player::{CharacterConfig, CurrentWeapon, MovementState, Player};

/// Where the weapon sits relative to the character.
const WEAPON_OFFSET: Vec3 = Vec3::new(0.35, 0.2, -0.3);
/// Where shots leave the weapon, relative to the weapon.
const MUZZLE_OFFSET: Vec3 = Vec3::new(0.0, 0.0, -0.5);

/// Number keys that switch to the n-th weapon of the table.
const WEAPON_SLOTS: [KeyCode; 4] = [
    KeyCode::Digit1,
    KeyCode::Digit2,
    KeyCode::Digit3,
    KeyCode::Digit4,
];

/// Shared weapon visuals, built once at startup.
#[derive(Resource)]
pub struct WeaponAssets {
    pub mesh: Handle<Mesh>,
    pub material: Handle<StandardMaterial>,
}

/// Configure weapon systems.
pub fn setup_weapon_systems(app: &mut App) {
    app.add_systems(
        Update,
        (equip_initial_weapon, weapon_input, release_trigger)
            .chain()
            .run_if(in_state(GameState::InGame)),
    )
    .add_systems(
        FixedUpdate,
        (apply_movement_state, reload_tick, fire_tick)
            .chain()
            .in_set(SimulationSet::Weapons),
    );
}

pub fn setup_weapon_assets(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.insert_resource(WeaponAssets {
        mesh: meshes.add(Cuboid::new(0.12, 0.12, 0.7)),
        material: materials.add(StandardMaterial {
            base_color: Color::srgb(0.15, 0.15, 0.17),
            metallic: 0.6,
            ..default()
        }),
    });
}

/// Equip a weapon from the table, replacing whatever the character held.
#[allow(clippy::too_many_arguments)]
pub fn init_weapon(
    commands: &mut Commands,
    registry: &WeaponRegistry,
    assets: &WeaponAssets,
    character: Entity,
    current: &mut CurrentWeapon,
    state: MovementState,
    name: &str,
) -> Result<Entity, WeaponError> {
    let info = registry
        .get(name)
        .ok_or_else(|| WeaponError::UnknownWeapon(name.to_string()))?;

    if let Some(previous) = current.0.take() {
        commands.entity(previous).despawn_recursive();
    }

    let weapon = commands
        .spawn((
            Weapon::new(info.clone(), state),
            Mesh3d(assets.mesh.clone()),
            MeshMaterial3d(assets.material.clone()),
            Transform::from_translation(WEAPON_OFFSET),
        ))
        .with_children(|parent| {
            parent.spawn((
                Muzzle,
                Transform::from_translation(MUZZLE_OFFSET),
                Visibility::default(),
            ));
        })
        .id();

    commands.entity(character).add_child(weapon);
    current.0 = Some(weapon);

    info!("Equipped {} ({} rounds)", info.name, info.max_round);
    Ok(weapon)
}

/// Press or release the trigger of the character's current weapon.
pub fn attack_char_event(
    character: Entity,
    current: &CurrentWeapon,
    weapons: &mut Query<&mut Weapon>,
    firing: bool,
) -> Result<(), WeaponError> {
    let entity = current.0.ok_or(WeaponError::NoCurrentWeapon(character))?;
    let mut weapon = weapons
        .get_mut(entity)
        .map_err(|_| WeaponError::WeaponMissing(entity))?;

    weapon.set_fire_state(firing);
    Ok(())
}

/// Ask the current weapon to reload. Ok(false) means nothing to do.
pub fn try_reload_weapon(
    character: Entity,
    current: &CurrentWeapon,
    weapons: &mut Query<&mut Weapon>,
) -> Result<bool, WeaponError> {
    let entity = current.0.ok_or(WeaponError::NoCurrentWeapon(character))?;
    let mut weapon = weapons
        .get_mut(entity)
        .map_err(|_| WeaponError::WeaponMissing(entity))?;

    Ok(weapon.start_reload())
}

/// Rotate `forward` around the vertical axis by a random angle within
/// `spread_degrees` either way.
pub fn spread_direction(forward: Dir3, spread_degrees: f32, rng: &mut impl Rng) -> Dir3 {
    if spread_degrees <= 0.0 {
        return forward;
    }
    let angle = rng.gen_range(-spread_degrees..=spread_degrees).to_radians();
    Quat::from_rotation_y(angle) * forward
}

fn play_sound(audio: &Audio, asset_server: &AssetServer, path: Option<&String>) {
    if let Some(path) = path {
        audio.play(asset_server.load(path.clone()));
    }
}

/// Give a freshly spawned player the configured starting weapon.
fn equip_initial_weapon(
    mut commands: Commands,
    config: Res<CharacterConfig>,
    registry: Res<WeaponRegistry>,
    assets: Res<WeaponAssets>,
    mut players: Query<(Entity, &mut CurrentWeapon, &MovementState), Added<Player>>,
) {
    let Some(name) = config.initial_weapon.as_deref() else {
        return;
    };

    for (entity, mut current, state) in players.iter_mut() {
        if let Err(e) = init_weapon(&mut commands, &registry, &assets, entity, &mut current, *state, name) {
            warn!("{}", e);
        }
    }
}

/// Trigger, reload and weapon-switch input.
#[allow(clippy::too_many_arguments)]
fn weapon_input(
    mut commands: Commands,
    keyboard: Res<ButtonInput<KeyCode>>,
    mouse: Res<ButtonInput<MouseButton>>,
    registry: Res<WeaponRegistry>,
    assets: Res<WeaponAssets>,
    audio: Res<Audio>,
    asset_server: Res<AssetServer>,
    mut players: Query<(Entity, &mut CurrentWeapon, &MovementState), With<Player>>,
    mut weapons: Query<&mut Weapon>,
) {
    let Ok((player, mut current, state)) = players.get_single_mut() else {
        return;
    };

    for (slot, key) in WEAPON_SLOTS.iter().enumerate() {
        if !keyboard.just_pressed(*key) {
            continue;
        }
        let Some(name) = registry.names().nth(slot) else {
            debug!("No weapon in slot {}", slot + 1);
            continue;
        };
        if let Err(e) = init_weapon(&mut commands, &registry, &assets, player, &mut current, *state, name) {
            warn!("{}", e);
        }
    }

    if mouse.just_pressed(MouseButton::Left) {
        if let Err(e) = attack_char_event(player, &current, &mut weapons, true) {
            warn!("Cannot fire: {}", e);
        }
    }
    if keyboard.just_pressed(KeyCode::KeyR) {
        match try_reload_weapon(player, &current, &mut weapons) {
            Ok(true) => {
                if let Some(weapon) = current.0.and_then(|entity| weapons.get(entity).ok()) {
                    play_sound(&audio, &asset_server, weapon.info.reload_sound.as_ref());
                }
            }
            Ok(false) => {}
            Err(e) => warn!("Cannot reload: {}", e),
        }
    }
}

/// Let go of the trigger whenever the fire button is up, including a release
/// that happened while the game was paused.
fn release_trigger(
    mouse: Res<ButtonInput<MouseButton>>,
    players: Query<(Entity, &CurrentWeapon), With<Player>>,
    mut weapons: Query<&mut Weapon>,
) {
    if mouse.pressed(MouseButton::Left) {
        return;
    }
    let Ok((player, current)) = players.get_single() else {
        return;
    };

    let held = current
        .0
        .and_then(|entity| weapons.get(entity).ok())
        .is_some_and(|weapon| weapon.firing);
    if held {
        if let Err(e) = attack_char_event(player, current, &mut weapons, false) {
            debug!("Trigger release ignored: {}", e);
        }
    }
}

/// Resettle dispersion when the carrier changes movement state.
fn apply_movement_state(
    mut state_events: EventReader<MovementStateChanged>,
    carriers: Query<&CurrentWeapon>,
    mut weapons: Query<&mut Weapon>,
) {
    for event in state_events.read() {
        let Some(entity) = carriers.get(event.entity).ok().and_then(|current| current.0) else {
            continue;
        };
        if let Ok(mut weapon) = weapons.get_mut(entity) {
            weapon.update_state_weapon(event.state);
        }
    }
}

/// Advance running reloads.
fn reload_tick(time: Res<Time>, mut weapons: Query<&mut Weapon>) {
    for mut weapon in weapons.iter_mut() {
        if weapon.reloading && weapon.tick_reload(time.delta_secs()) {
            debug!("{} reloaded", weapon.info.name);
        }
    }
}

/// Run the fire-rate loop and release shots.
#[allow(clippy::too_many_arguments)]
fn fire_tick(
    mut commands: Commands,
    time: Res<Time>,
    projectile_assets: Res<ProjectileAssets>,
    rapier_context: Query<&RapierContext>,
    audio: Res<Audio>,
    asset_server: Res<AssetServer>,
    mut weapons: Query<(Entity, &mut Weapon, &Parent, &Children)>,
    muzzles: Query<&GlobalTransform, With<Muzzle>>,
    mut fired_events: EventWriter<WeaponFired>,
    mut damage_events: EventWriter<DamageEvent>,
) {
    let dt = time.delta_secs();
    let mut rng = rand::thread_rng();

    for (entity, mut weapon, parent, children) in weapons.iter_mut() {
        if !weapon.fire_tick(dt) {
            continue;
        }

        let owner = parent.get();
        let Some(muzzle) = children.iter().find_map(|child| muzzles.get(*child).ok()) else {
            warn!("{} has no muzzle, shot dropped", weapon.info.name);
            continue;
        };

        let origin = muzzle.translation();
        let direction = spread_direction(muzzle.forward(), weapon.dispersion, &mut rng);

        match weapon.info.projectile {
            Some(settings) => {
                spawn_projectile(
                    &mut commands,
                    &projectile_assets,
                    settings,
                    origin,
                    direction,
                    Some(owner),
                );
            }
            None => {
                let hit = rapier_context.get_single().ok().and_then(|context| {
                    context.cast_ray(
                        origin,
                        direction.as_vec3(),
                        weapon.info.trace_distance,
                        true,
                        QueryFilter::default().exclude_collider(owner),
                    )
                });
                if let Some((target, distance)) = hit {
                    debug!("{} trace hit {} at {:.1}", weapon.info.name, target, distance);
                    damage_events.send(DamageEvent {
                        target,
                        source: Some(owner),
                        amount: weapon.info.weapon_damage,
                    });
                }
            }
        }

        play_sound(&audio, &asset_server, weapon.info.fire_sound.as_ref());
        fired_events.send(WeaponFired {
            weapon: entity,
            owner: Some(owner),
        });

        if weapon.reloading {
            info!("{} empty, reloading", weapon.info.name);
            play_sound(&audio, &asset_server, weapon.info.reload_sound.as_ref());
        }
    }
}
