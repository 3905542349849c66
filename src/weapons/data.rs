//! Weapon table loading from RON files.
//!
//! Each file under assets/data/weapons/ is one table row; the file stem is
//! the name the row is looked up by.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use bevy::prelude::*;

use super::components::WeaponInfo;
use crate::core::DataLoadError;

/// Directory holding one RON file per weapon.
pub const WEAPONS_DIR: &str = "assets/data/weapons";

/// Resource holding every weapon table row, keyed by weapon name.
#[derive(Resource, Default, Debug)]
pub struct WeaponRegistry {
    definitions: BTreeMap<String, WeaponInfo>,
}

impl WeaponRegistry {
    /// Look up a weapon by name.
    pub fn get(&self, name: &str) -> Option<&WeaponInfo> {
        self.definitions.get(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, mut info: WeaponInfo) {
        let name = name.into();
        if info.name.is_empty() {
            info.name = name.clone();
        }
        self.definitions.insert(name, info);
    }

    /// Weapon names in a stable order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.definitions.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

/// Parse and validate one weapon row.
pub fn parse_weapon(path: &str, contents: &str) -> Result<WeaponInfo, DataLoadError> {
    let info: WeaponInfo = ron::from_str(contents).map_err(|e| DataLoadError::ParseError {
        path: path.to_string(),
        details: e.to_string(),
    })?;

    let mut fields = vec![
        ("rate_of_fire", info.rate_of_fire),
        ("reload_time", info.reload_time),
        ("weapon_damage", info.weapon_damage),
        ("trace_distance", info.trace_distance),
        ("dispersion.aim_start", info.dispersion.aim_start),
        ("dispersion.aim_max", info.dispersion.aim_max),
        ("dispersion.aim_min", info.dispersion.aim_min),
        ("dispersion.aim_shoot_coef", info.dispersion.aim_shoot_coef),
    ];
    if let Some(projectile) = &info.projectile {
        fields.extend([
            ("projectile.damage", projectile.damage),
            ("projectile.life_time", projectile.life_time),
            ("projectile.initial_speed", projectile.initial_speed),
            ("projectile.max_radius_damage", projectile.max_radius_damage),
            ("projectile.radius", projectile.radius),
        ]);
    }

    if let Some((field, value)) = fields.into_iter().find(|(_, v)| !v.is_finite() || *v < 0.0) {
        return Err(DataLoadError::NegativeValue {
            path: path.to_string(),
            field,
            value,
        });
    }

    Ok(info)
}

/// Read every `.ron` row in `dir`.
///
/// A missing directory is an error; a bad file is logged and skipped so one
/// broken row does not take the whole table down.
pub fn load_registry(dir: &Path) -> Result<WeaponRegistry, DataLoadError> {
    let display = dir.display().to_string();
    if !dir.exists() {
        return Err(DataLoadError::FileNotFound(display));
    }

    let entries = fs::read_dir(dir).map_err(|e| DataLoadError::ReadError {
        path: display.clone(),
        details: e.to_string(),
    })?;

    let mut registry = WeaponRegistry::default();

    for entry in entries.flatten() {
        let path = entry.path();
        if !path.extension().is_some_and(|ext| ext == "ron") {
            continue;
        }

        let Some(name) = path.file_stem().and_then(|s| s.to_str()).map(str::to_string) else {
            warn!("Skipping weapon file with unusable name: {:?}", path);
            continue;
        };
        let path_str = path.display().to_string();

        let parsed = fs::read_to_string(&path)
            .map_err(|e| DataLoadError::ReadError {
                path: path_str.clone(),
                details: e.to_string(),
            })
            .and_then(|contents| parse_weapon(&path_str, &contents));

        match parsed {
            Ok(info) => {
                debug!("Loaded weapon '{}' from {}", name, path_str);
                registry.insert(name, info);
            }
            Err(e) => error!("{}", e),
        }
    }

    Ok(registry)
}

/// Startup system filling the weapon registry.
pub fn load_weapon_definitions(mut registry: ResMut<WeaponRegistry>) {
    match load_registry(Path::new(WEAPONS_DIR)) {
        Ok(loaded) => {
            *registry = loaded;
            info!("Loaded {} weapon definitions", registry.len());
        }
        Err(e) => warn!("Weapon table unavailable: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHOTGUN: &str = r#"(
        name: "Shotgun",
        rate_of_fire: 0.9,
        max_round: 6,
        dispersion: (aim_max: 8.0),
        projectile: Some((damage: 12.0, initial_speed: 25.0)),
        fire_sound: Some("sounds/shotgun.ogg"),
    )"#;

    #[test]
    fn parses_row_with_defaults() {
        let info = parse_weapon("shotgun.ron", SHOTGUN).unwrap();
        assert_eq!(info.name, "Shotgun");
        assert_eq!(info.max_round, 6);
        assert_eq!(info.reload_time, WeaponInfo::default().reload_time);
        assert_eq!(info.dispersion.aim_max, 8.0);
        assert_eq!(info.dispersion.aim_min, 0.1);

        let projectile = info.projectile.unwrap();
        assert_eq!(projectile.damage, 12.0);
        assert_eq!(projectile.life_time, 20.0);
        assert!(!projectile.is_bomb);
        assert_eq!(info.fire_sound.as_deref(), Some("sounds/shotgun.ogg"));
    }

    #[test]
    fn row_without_projectile_is_hitscan() {
        let info = parse_weapon("sniper.ron", "(weapon_damage: 80.0, trace_distance: 40.0)").unwrap();
        assert!(info.projectile.is_none());
        assert_eq!(info.trace_distance, 40.0);
    }

    #[test]
    fn negative_projectile_speed_is_rejected() {
        let err = parse_weapon("bad.ron", "(projectile: Some((initial_speed: -1.0)))").unwrap_err();
        assert!(matches!(
            err,
            DataLoadError::NegativeValue { field: "projectile.initial_speed", .. }
        ));
    }

    #[test]
    fn infinite_reload_time_is_rejected() {
        let err = parse_weapon("bad.ron", "(reload_time: inf)").unwrap_err();
        assert!(matches!(err, DataLoadError::NegativeValue { field: "reload_time", .. }));

        let err = parse_weapon("bad.ron", "(projectile: Some((life_time: inf)))").unwrap_err();
        assert!(matches!(
            err,
            DataLoadError::NegativeValue { field: "projectile.life_time", .. }
        ));
    }

    #[test]
    fn wrong_type_is_a_parse_error() {
        let err = parse_weapon("bad.ron", "(rate_of_fire: \"fast\")").unwrap_err();
        assert!(matches!(err, DataLoadError::ParseError { .. }));
    }

    #[test]
    fn registry_lookup_by_name() {
        let mut registry = WeaponRegistry::default();
        registry.insert("rifle", WeaponInfo::default());
        registry.insert("pistol", WeaponInfo { name: "Sidearm".into(), ..default() });

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("rifle").map(|w| w.name.as_str()), Some("rifle"));
        assert_eq!(registry.get("pistol").map(|w| w.name.as_str()), Some("Sidearm"));
        assert!(registry.get("bazooka").is_none());
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["pistol", "rifle"]);
    }

    #[test]
    fn missing_directory_is_not_found() {
        let err = load_registry(Path::new("no/such/weapons")).unwrap_err();
        assert!(matches!(err, DataLoadError::FileNotFound(_)));
    }

    #[test]
    fn shipped_weapon_table_parses() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join(WEAPONS_DIR);
        let registry = load_registry(&dir).unwrap();
        assert_eq!(
            registry.names().collect::<Vec<_>>(),
            vec!["grenade_launcher", "pistol", "rifle", "sniper"]
        );
        assert!(registry.get("sniper").is_some_and(|w| w.projectile.is_none()));
        assert!(registry
            .get("grenade_launcher")
            .and_then(|w| w.projectile.as_ref())
            .is_some_and(|p| p.is_bomb));
    }
}
