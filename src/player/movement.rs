//! Character input, locomotion state machine and movement.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::camera::{spawn_camera_rig, AimPoint};
use super::components::*;
use super::config::CharacterConfig;
use super::stamina::{DrainOutcome, RegenOutcome, Stamina};
use crate::core::{GameState, MovementStateChanged, SimulationSet};

/// Constant downward push keeping the kinematic body on the ground.
const GROUND_STICK_SPEED: f32 = 2.0;

/// Set up movement systems.
pub fn setup_movement_systems(app: &mut App) {
    app.add_systems(
        Update,
        read_movement_input.run_if(in_state(GameState::InGame)),
    )
    .add_systems(
        FixedUpdate,
        (
            update_stamina,
            sync_movement_state,
            advance_speed_ramp,
            apply_movement,
        )
            .chain()
            .in_set(SimulationSet::Locomotion),
    );
}

/// Translate keyboard and mouse state into axes and movement flags.
///
/// Walk, aim and sprint start on a press and end as soon as the button is
/// found up. A fast-run that cancels walking or aiming therefore stays in
/// effect until that button is pressed again.
pub fn read_movement_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mouse: Res<ButtonInput<MouseButton>>,
    mut query: Query<(&mut AxisInput, &mut MovementFlags, &Stamina), With<Player>>,
) {
    let Ok((mut axes, mut flags, stamina)) = query.get_single_mut() else {
        return;
    };

    let axis = |positive: KeyCode, negative: KeyCode| {
        let mut value = 0.0;
        if keyboard.pressed(positive) {
            value += 1.0;
        }
        if keyboard.pressed(negative) {
            value -= 1.0;
        }
        value
    };
    input_axis_x(&mut axes, axis(KeyCode::KeyW, KeyCode::KeyS));
    input_axis_y(&mut axes, axis(KeyCode::KeyD, KeyCode::KeyA));

    let mut next = *flags;

    // Presses start an action; a button found up drops it, so releases missed
    // while the simulation was paused still count
    let walk_held = keyboard.pressed(KeyCode::ControlLeft);
    if keyboard.just_pressed(KeyCode::ControlLeft) {
        next.walking = true;
    }
    if !walk_held {
        next.walking = false;
    }

    let aim_held = mouse.pressed(MouseButton::Right);
    if mouse.just_pressed(MouseButton::Right) {
        next.aiming = true;
    }
    if !aim_held {
        next.aiming = false;
    }

    next.sprint_held = keyboard.pressed(KeyCode::ShiftLeft);
    if keyboard.just_pressed(KeyCode::ShiftLeft) {
        if stamina.tired {
            debug!("Too tired to sprint");
        } else {
            next.fast_running = true;
        }
    }
    if !next.sprint_held {
        next.fast_running = false;
    }

    flags.set_if_neq(next);
}

/// Store the forward/back axis value.
pub fn input_axis_x(axes: &mut AxisInput, value: f32) {
    axes.x = value.clamp(-1.0, 1.0);
}

/// Store the right/left axis value.
pub fn input_axis_y(axes: &mut AxisInput, value: f32) {
    axes.y = value.clamp(-1.0, 1.0);
}

/// Drain stamina while fast-running, regenerate it otherwise.
fn update_stamina(
    time: Res<Time>,
    mut query: Query<(&AxisInput, &mut MovementFlags, &mut Stamina)>,
) {
    let dt = time.delta_secs();

    for (axes, mut flags, mut stamina) in query.iter_mut() {
        stamina.tick_timer(dt);

        if flags.fast_running && stamina.drain(dt, axes.is_moving()) == DrainOutcome::Exhausted {
            info!("Stamina exhausted, fast run stopped");
            flags.fast_running = false;
        }

        if stamina.regenerate(dt, flags.sprint_held) == RegenOutcome::ResumeFastRun {
            debug!("Stamina recovered, resuming fast run");
            flags.fast_running = true;
        }
    }
}

/// Re-derive the movement state whenever the flags changed.
pub(crate) fn sync_movement_state(
    config: Res<CharacterConfig>,
    mut query: Query<
        (Entity, &mut MovementFlags, &mut MovementState, &mut SpeedRamp),
        Changed<MovementFlags>,
    >,
    mut state_events: EventWriter<MovementStateChanged>,
) {
    for (entity, mut flags, mut state, mut ramp) in query.iter_mut() {
        let new_state = change_movement_state(&mut flags);
        character_update_speed(&mut ramp, &config, new_state);

        if *state != new_state {
            debug!("Movement state {} -> {}", state.name(), new_state.name());
            *state = new_state;
            state_events.send(MovementStateChanged {
                entity,
                state: new_state,
            });
        }
    }
}

/// Resolve the state from the flags, writing back the flags it cancels.
pub fn change_movement_state(flags: &mut Mut<MovementFlags>) -> MovementState {
    let mut resolved = **flags;
    let state = resolved.resolve_state();
    flags.set_if_neq(resolved);
    state
}

/// Point the speed ramp at the speed for `state`.
pub fn character_update_speed(ramp: &mut SpeedRamp, config: &CharacterConfig, state: MovementState) {
    ramp.retarget(config.speed.for_state(state));
}

/// Step every character's speed toward its target.
fn advance_speed_ramp(time: Res<Time>, mut query: Query<&mut SpeedRamp>) {
    let dt = time.delta_secs();
    for mut ramp in query.iter_mut() {
        // Skip resting ramps so change detection stays quiet
        if ramp.is_active() {
            ramp.advance(dt);
        }
    }
}

/// Move the character and turn it toward the cursor or its heading.
fn apply_movement(
    time: Res<Time>,
    mut query: Query<
        (
            &mut Transform,
            &AxisInput,
            &MovementFlags,
            &SpeedRamp,
            &AimPoint,
            &mut KinematicCharacterController,
        ),
        With<Player>,
    >,
) {
    let dt = time.delta_secs();

    for (mut transform, axes, flags, ramp, aim, mut controller) in query.iter_mut() {
        let direction = axes.direction();
        let horizontal = direction * ramp.current * dt;
        controller.translation = Some(horizontal - Vec3::Y * GROUND_STICK_SPEED * dt);

        let facing = if flags.fast_running {
            (direction != Vec3::ZERO).then(|| transform.translation + direction)
        } else {
            aim.0
        };

        if let Some(target) = facing {
            face_towards(&mut transform, target);
        }
    }
}

/// Yaw the transform so its forward axis points at `target`.
pub fn face_towards(transform: &mut Transform, target: Vec3) {
    let flat = Vec3::new(target.x, transform.translation.y, target.z);
    if flat.distance_squared(transform.translation) > 1e-4 {
        transform.look_at(flat, Vec3::Y);
    }
}

/// Spawn the player character with its camera rig.
pub fn spawn_player(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    position: Vec3,
    config: &CharacterConfig,
) -> Entity {
    let state = MovementState::default();

    let player = commands
        .spawn((
            Player,
            AxisInput::default(),
            MovementFlags::default(),
            state,
            SpeedRamp::new(config.speed.for_state(state), config.speed.acceleration),
            Stamina::new(config.stamina),
            AimPoint::default(),
            CurrentWeapon::default(),
            // Visuals
            Mesh3d(meshes.add(Capsule3d::new(0.4, 1.0))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: Color::srgb(0.25, 0.45, 0.8),
                ..default()
            })),
            Transform::from_translation(position),
            // Rapier physics components
            RigidBody::KinematicPositionBased,
            Collider::capsule_y(0.5, 0.4),
            KinematicCharacterController {
                offset: CharacterLength::Absolute(0.01),
                max_slope_climb_angle: 45_f32.to_radians(),
                min_slope_slide_angle: 30_f32.to_radians(),
                snap_to_ground: Some(CharacterLength::Absolute(0.5)),
                ..default()
            },
        ))
        .id();

    spawn_camera_rig(commands, meshes, materials, position, config.camera);

    info!("Spawned player at {}", position);
    player
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_values_are_clamped() {
        let mut axes = AxisInput::default();
        input_axis_x(&mut axes, 3.0);
        input_axis_y(&mut axes, -2.5);
        assert_eq!(axes.x, 1.0);
        assert_eq!(axes.y, -1.0);
    }

    #[test]
    fn facing_turns_forward_axis_to_target() {
        let mut transform = Transform::from_xyz(0.0, 1.0, 0.0);
        face_towards(&mut transform, Vec3::new(5.0, 0.0, 0.0));
        let forward = transform.forward();
        assert!((forward.x - 1.0).abs() < 1e-4);
        assert!(forward.y.abs() < 1e-4);
    }

    #[test]
    fn facing_ignores_target_under_character() {
        let mut transform = Transform::from_xyz(2.0, 1.0, 2.0);
        let before = transform.rotation;
        face_towards(&mut transform, Vec3::new(2.0, 0.0, 2.0));
        assert_eq!(transform.rotation, before);
    }

    #[test]
    fn update_speed_targets_state_speed() {
        let config = CharacterConfig::default();
        let mut ramp = SpeedRamp::new(config.speed.run_speed, config.speed.acceleration);
        character_update_speed(&mut ramp, &config, MovementState::AimWalk);
        assert_eq!(ramp.target, config.speed.aim_walk_speed);
        assert!(ramp.is_active());
    }

    fn input_app(flags: MovementFlags, tired: bool, keys: &[KeyCode]) -> (App, Entity) {
        let mut app = App::new();
        let mut keyboard = ButtonInput::<KeyCode>::default();
        for key in keys {
            keyboard.press(*key);
        }
        app.insert_resource(keyboard)
            .insert_resource(ButtonInput::<MouseButton>::default())
            .add_systems(Update, read_movement_input);

        let mut stamina = Stamina::default();
        stamina.tired = tired;
        let player = app
            .world_mut()
            .spawn((Player, AxisInput::default(), flags, stamina))
            .id();
        (app, player)
    }

    fn flags_of(app: &App, player: Entity) -> MovementFlags {
        *app.world().get::<MovementFlags>(player).unwrap()
    }

    #[test]
    fn sprint_press_ignored_while_tired() {
        let (mut app, player) = input_app(MovementFlags::default(), true, &[KeyCode::ShiftLeft]);
        app.update();

        let flags = flags_of(&app, player);
        assert!(flags.sprint_held);
        assert!(!flags.fast_running);
    }

    #[test]
    fn sprint_press_starts_fast_run() {
        let (mut app, player) = input_app(MovementFlags::default(), false, &[KeyCode::ShiftLeft]);
        app.update();
        assert!(flags_of(&app, player).fast_running);
    }

    #[test]
    fn buttons_found_up_drop_their_actions() {
        // Flags left over from before a pause, with every button released since
        let stale = MovementFlags {
            walking: true,
            aiming: true,
            fast_running: true,
            sprint_held: true,
        };
        let (mut app, player) = input_app(stale, false, &[]);
        app.update();
        assert_eq!(flags_of(&app, player), MovementFlags::default());
    }

    #[test]
    fn held_sprint_survives_without_a_new_press() {
        let running = MovementFlags {
            fast_running: true,
            sprint_held: true,
            ..default()
        };
        let (mut app, player) = input_app(running, false, &[KeyCode::ShiftLeft]);
        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .clear();
        app.update();

        let flags = flags_of(&app, player);
        assert!(flags.fast_running);
        assert!(flags.sprint_held);
    }
}
