use bevy::app::AppExit;
use bevy::asset::LoadState;
use bevy::log::LogPlugin;
use bevy::prelude::*;

use locomotion::movement::{
    settings_ready, MovementSettings, MovementSettingsHandle, MovementSettingsPlugin,
    RotationModeTag, StanceTag,
};

/// Set to keep the app alive and watch the settings file for edits.
const WATCH_ENV: &str = "LOCOMOTION_WATCH";

fn main() -> AppExit {
    let watch = std::env::var_os(WATCH_ENV).is_some();

    let mut app = App::new();
    app.add_plugins((
        // headless: no window, no renderer
        MinimalPlugins,
        LogPlugin::default(),
        AssetPlugin {
            watch_for_changes_override: Some(watch),
            ..default()
        },
    ))
    .add_plugins(MovementSettingsPlugin)
    .add_systems(Update, (report_default_gait.run_if(settings_ready), exit_on_load_failure));

    if !watch {
        app.add_systems(Update, exit_when_reported.after(report_default_gait).run_if(settings_ready));
    }

    app.run()
}

/// Log the gait a freshly spawned character would start with.
fn report_default_gait(
    handle: Res<MovementSettingsHandle>,
    settings: Res<Assets<MovementSettings>>,
    mut reported: Local<bool>,
) {
    if *reported { return; }
    *reported = true;
    let Some(settings) = settings.get(&handle.0) else { return; };
    match settings.gait(&RotationModeTag::VELOCITY_DIRECTION, &StanceTag::STANDING) {
        Ok(gait) => info!(
            "Default gait: walk {} run {} sprint {} (interpolation range {:?})",
            gait.max_walk_speed(),
            gait.max_run_speed(),
            gait.sprint_speed,
            settings.velocity_direction_to_speed_interpolation_range
        ),
        Err(e) => error!("Default gait unavailable: {}", e),
    }
}

fn exit_when_reported(mut exit: EventWriter<AppExit>) {
    exit.write(AppExit::Success);
}

fn exit_on_load_failure(
    handle: Res<MovementSettingsHandle>,
    server: Res<AssetServer>,
    mut exit: EventWriter<AppExit>,
) {
    if let LoadState::Failed(err) = server.load_state(&handle.0) {
        error!("Movement settings failed to load: {}", err);
        exit.write(AppExit::error());
    }
}
