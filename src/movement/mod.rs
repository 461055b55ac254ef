pub mod core;
pub mod tags;
pub mod validation;
pub mod loader;
pub mod plugin;

pub use self::core::{
    AccelerationSample, CurveEvaluator, CurveRef, GaitSettings, MovementSettings, SettingsError,
    StanceSettings, GAIT_AMOUNT_MAX,
};
pub use loader::{MovementSettingsLoadError, MovementSettingsLoader};
pub use plugin::{settings_ready, MovementSettingsConfig, MovementSettingsHandle, MovementSettingsPlugin};
#[cfg(feature = "editor")]
pub use plugin::MovementSettingsEdited;
pub use tags::{RotationModeTag, StanceTag};
pub use validation::{EditedProperty, InvalidSettings, Violation};
