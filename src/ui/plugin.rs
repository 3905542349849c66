//! UI plugin - main menu, pause menu and the HUD.

use bevy::prelude::*;

use super::hud;
use crate::core::GameState;

/// UI plugin - handles all user interface.
pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        hud::setup_hud_systems(app);

        app.add_systems(OnEnter(GameState::MainMenu), setup_main_menu)
            .add_systems(OnExit(GameState::MainMenu), cleanup_menu::<MainMenuUi>)
            .add_systems(OnEnter(GameState::Paused), setup_pause_menu)
            .add_systems(OnExit(GameState::Paused), cleanup_menu::<PauseMenuUi>)
            .add_systems(
                Update,
                menu_buttons
                    .run_if(in_state(GameState::MainMenu).or(in_state(GameState::Paused))),
            );
    }
}

/// Marker for main menu UI entities, including its camera.
#[derive(Component)]
struct MainMenuUi;

/// Marker for pause menu UI entities.
#[derive(Component)]
struct PauseMenuUi;

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
enum MenuButton {
    NewGame,
    Quit,
    Resume,
    MainMenu,
}

impl MenuButton {
    fn label(&self) -> &'static str {
        match self {
            MenuButton::NewGame => "New Game",
            MenuButton::Quit => "Quit",
            MenuButton::Resume => "Resume",
            MenuButton::MainMenu => "Main Menu",
        }
    }
}

const CONTROLS: &[(&str, &str)] = &[
    ("WASD", "Move"),
    ("Mouse", "Aim"),
    ("Left Ctrl", "Walk"),
    ("Right Mouse", "Aim down sights"),
    ("Shift", "Sprint"),
    ("Left Mouse", "Fire"),
    ("R", "Reload"),
    ("1-4", "Switch weapon"),
    ("Wheel", "Zoom"),
    ("Escape", "Pause"),
];

const TITLE_COLOR: Color = Color::srgb(0.85, 0.75, 0.5);
const TEXT_COLOR: Color = Color::srgb(0.8, 0.8, 0.85);
const MUTED_COLOR: Color = Color::srgb(0.5, 0.5, 0.55);

fn button_color(interaction: Interaction) -> Color {
    match interaction {
        Interaction::Pressed => Color::srgb(0.3, 0.3, 0.35),
        Interaction::Hovered => Color::srgb(0.25, 0.25, 0.3),
        Interaction::None => Color::srgb(0.15, 0.15, 0.2),
    }
}

/// Full-screen centered column.
fn menu_root(background: Color) -> (Node, BackgroundColor) {
    (
        Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            flex_direction: FlexDirection::Column,
            justify_content: JustifyContent::Center,
            align_items: AlignItems::Center,
            ..default()
        },
        BackgroundColor(background),
    )
}

fn spawn_text(parent: &mut ChildBuilder, text: &str, size: f32, color: Color, bottom: f32) {
    parent.spawn((
        Text::new(text),
        TextFont {
            font_size: size,
            ..default()
        },
        TextColor(color),
        Node {
            margin: UiRect::bottom(Val::Px(bottom)),
            ..default()
        },
    ));
}

fn spawn_menu_button(parent: &mut ChildBuilder, button: MenuButton) {
    parent
        .spawn((
            Button,
            Node {
                width: Val::Px(200.0),
                height: Val::Px(50.0),
                margin: UiRect::all(Val::Px(10.0)),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            BackgroundColor(button_color(Interaction::None)),
            button,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(button.label()),
                TextFont {
                    font_size: 24.0,
                    ..default()
                },
                TextColor(TEXT_COLOR),
            ));
        });
}

/// Title screen. The arena camera does not exist yet, so the menu brings
/// its own.
fn setup_main_menu(mut commands: Commands) {
    commands.spawn((Camera2d, MainMenuUi));

    commands
        .spawn((menu_root(Color::srgb(0.05, 0.05, 0.08)), MainMenuUi))
        .with_children(|parent| {
            spawn_text(parent, "TDS", 80.0, TITLE_COLOR, 20.0);
            spawn_text(parent, "Top-down shooting range", 24.0, MUTED_COLOR, 40.0);

            spawn_menu_button(parent, MenuButton::NewGame);
            spawn_menu_button(parent, MenuButton::Quit);

            // Key reference
            parent
                .spawn(Node {
                    flex_direction: FlexDirection::Column,
                    margin: UiRect::top(Val::Px(40.0)),
                    row_gap: Val::Px(2.0),
                    ..default()
                })
                .with_children(|list| {
                    for (key, action) in CONTROLS {
                        spawn_text(list, &format!("{key:<12} {action}"), 14.0, MUTED_COLOR, 0.0);
                    }
                });
        });
}

fn setup_pause_menu(mut commands: Commands) {
    commands
        .spawn((menu_root(Color::srgba(0.0, 0.0, 0.0, 0.7)), PauseMenuUi))
        .with_children(|parent| {
            spawn_text(parent, "PAUSED", 48.0, TEXT_COLOR, 40.0);
            spawn_menu_button(parent, MenuButton::Resume);
            spawn_menu_button(parent, MenuButton::MainMenu);
        });
}

/// Hover feedback and actions for every menu button on screen.
fn menu_buttons(
    mut interaction_query: Query<
        (&Interaction, &MenuButton, &mut BackgroundColor),
        (Changed<Interaction>, With<Button>),
    >,
    mut next_state: ResMut<NextState<GameState>>,
    mut exit: EventWriter<AppExit>,
) {
    for (interaction, button, mut bg_color) in interaction_query.iter_mut() {
        bg_color.0 = button_color(*interaction);
        if *interaction != Interaction::Pressed {
            continue;
        }

        match button {
            MenuButton::NewGame => {
                info!("Starting a new game");
                next_state.set(GameState::InGame);
            }
            MenuButton::Resume => next_state.set(GameState::InGame),
            MenuButton::MainMenu => {
                info!("Leaving the arena");
                next_state.set(GameState::MainMenu);
            }
            MenuButton::Quit => {
                exit.send(AppExit::Success);
            }
        }
    }
}

fn cleanup_menu<M: Component>(mut commands: Commands, query: Query<Entity, With<M>>) {
    for entity in query.iter() {
        commands.entity(entity).despawn_recursive();
    }
}
