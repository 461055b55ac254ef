//! Movement settings plugin wiring (glue).
//! - Asset + `.movement.ron` loader
//! - Config (asset path) + handle resources
//! - Ready log and, with `editor`, re-validation on edits

use bevy::prelude::*;

use super::core::MovementSettings;
use super::loader::MovementSettingsLoader;
#[cfg(feature = "editor")]
use super::validation::{EditedProperty, Violation};

/// Where the settings asset lives.
#[derive(Resource, Clone)]
pub struct MovementSettingsConfig {
    pub path: String,
}
impl Default for MovementSettingsConfig {
    fn default() -> Self {
        Self { path: "movement/default.movement.ron".to_string() }
    }
}

/// Handle to the loaded MovementSettings asset.
#[derive(Resource, Default)]
pub struct MovementSettingsHandle(pub Handle<MovementSettings>);

pub struct MovementSettingsPlugin;
impl Plugin for MovementSettingsPlugin {
    fn build(&self, app: &mut App) {
        app.init_asset::<MovementSettings>()
            .register_asset_loader(MovementSettingsLoader)
            .init_resource::<MovementSettingsConfig>()
            .init_resource::<MovementSettingsHandle>()
            .add_systems(Startup, load_movement_settings)
            .add_systems(Update, monitor_settings_ready);

        #[cfg(feature = "editor")]
        app.add_event::<MovementSettingsEdited>()
            .add_systems(Update, revalidate_edited_settings);
    }
}

/// Run condition: the settings asset is loaded.
pub fn settings_ready(
    handle: Res<MovementSettingsHandle>,
    settings: Res<Assets<MovementSettings>>,
) -> bool {
    settings.get(&handle.0).is_some()
}

/// Startup: request loading the settings file, store handle.
fn load_movement_settings(
    mut handle_res: ResMut<MovementSettingsHandle>,
    config: Res<MovementSettingsConfig>,
    assets: Res<AssetServer>,
) {
    if handle_res.0.is_strong() { return; }
    handle_res.0 = assets.load(config.path.as_str());
    info!("Movement: loading settings from '{}'", config.path);
}

/// Update: log once when the settings become available.
fn monitor_settings_ready(
    handle_res: Res<MovementSettingsHandle>,
    settings: Res<Assets<MovementSettings>>,
    mut logged: Local<bool>,
) {
    if *logged { return; }
    let Some(settings) = settings.get(&handle_res.0) else { return; };
    *logged = true;
    info!("Movement: settings loaded and ready");
    for (mode, stance, gait) in settings.iter_gaits() {
        info!(
            "Movement: {}/{} walk {} run {} sprint {}",
            mode,
            stance,
            gait.max_walk_speed(),
            gait.max_run_speed(),
            gait.sprint_speed
        );
    }
}

/// Sent after an edited settings asset has been re-validated.
#[cfg(feature = "editor")]
#[derive(Event, Clone, Debug)]
pub struct MovementSettingsEdited {
    pub id: AssetId<MovementSettings>,
    /// Empty when the edited asset is valid.
    pub violations: Vec<Violation>,
}

/// Update: in-memory edits through `Assets::get_mut` skip the loader's
/// validation, so check again. Hot-reloaded files were already validated by the loader.
#[cfg(feature = "editor")]
fn revalidate_edited_settings(
    mut events: EventReader<AssetEvent<MovementSettings>>,
    settings: Res<Assets<MovementSettings>>,
    mut edited: EventWriter<MovementSettingsEdited>,
) {
    for ev in events.read() {
        let AssetEvent::Modified { id } = ev else { continue; };
        let Some(settings) = settings.get(*id) else { continue; };
        let mut violations = settings.on_property_edited(&EditedProperty::InterpolationRange);
        violations.extend(settings.on_property_edited(&EditedProperty::RotationModes));
        if violations.is_empty() {
            info!("Movement: settings {:?} edited, no violations", id);
        }
        edited.write(MovementSettingsEdited { id: *id, violations });
    }
}
