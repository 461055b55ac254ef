// src/movement/loader.rs
//! RON form of `MovementSettings` + asset loader for `.movement.ron`.

use bevy::asset::{io::Reader, AssetLoader, LoadContext};
use ron::ser::PrettyConfig;

use super::core::MovementSettings;
use super::validation::InvalidSettings;

impl MovementSettings {
    /// Parse and validate. Rejects with every violation found.
    pub fn from_ron_str(text: &str) -> Result<Self, MovementSettingsLoadError> {
        let settings: MovementSettings =
            ron::de::from_str(text).map_err(|e| MovementSettingsLoadError::Ron(e.to_string()))?;
        Ok(settings.validated()?)
    }

    pub fn from_ron_bytes(bytes: &[u8]) -> Result<Self, MovementSettingsLoadError> {
        let settings: MovementSettings =
            ron::de::from_bytes(bytes).map_err(|e| MovementSettingsLoadError::Ron(e.to_string()))?;
        Ok(settings.validated()?)
    }

    pub fn to_ron_string(&self) -> Result<String, MovementSettingsLoadError> {
        ron::ser::to_string_pretty(self, PrettyConfig::default())
            .map_err(|e| MovementSettingsLoadError::Serialize(e.to_string()))
    }
}

// ---------- Asset loader ----------

#[derive(Default)]
pub struct MovementSettingsLoader;

impl AssetLoader for MovementSettingsLoader {
    type Asset = MovementSettings;
    type Settings = ();
    type Error = MovementSettingsLoadError;

    fn extensions(&self) -> &[&str] {
        &["movement.ron"]
    }

    async fn load(
        &self,
        reader: &mut dyn Reader,
        _settings: &Self::Settings,
        _load_context: &mut LoadContext<'_>,
    ) -> Result<Self::Asset, Self::Error> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes).await?;
        MovementSettings::from_ron_bytes(&bytes)
    }
}

// ---------- Loader errors ----------

#[derive(thiserror::Error, Debug)]
pub enum MovementSettingsLoadError {
    #[error("I/O while reading movement settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON parse error: {0}")]
    Ron(String),
    #[error("RON serialize error: {0}")]
    Serialize(String),
    #[error("Invalid movement settings: {0}")]
    Invalid(#[from] InvalidSettings),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movement::core::{CurveRef, StanceSettings};
    use crate::movement::tags::{RotationModeTag, StanceTag};
    use crate::movement::validation::Violation;
    use bevy::math::Vec2;
    use std::collections::HashSet;

    #[test]
    fn test_round_trip_preserves_everything() {
        let mut settings = MovementSettings::default();
        settings.velocity_direction_to_speed_interpolation_range = Vec2::new(-0.25, -0.75);
        let gait = settings
            .rotation_modes
            .get_mut(&RotationModeTag::VELOCITY_DIRECTION)
            .and_then(|s| s.stances.get_mut(&StanceTag::STANDING))
            .unwrap();
        gait.walk_forward_speed = 180.5;
        gait.run_backward_speed = 290.0;
        gait.acceleration_curve = Some(CurveRef::new("curves/standing_accel.curve"));
        gait.rotation_interpolation_curve = Some(CurveRef::new("curves/standing_rotation.curve"));

        let text = settings.to_ron_string().unwrap();
        let back = MovementSettings::from_ron_str(&text).unwrap();
        assert_eq!(back, settings);

        let back_gait = back
            .gait(&RotationModeTag::VELOCITY_DIRECTION, &StanceTag::STANDING)
            .unwrap();
        assert_eq!(back_gait.max_walk_speed(), 180.5);
        assert_eq!(
            back_gait.acceleration_curve.as_ref().map(CurveRef::path),
            Some("curves/standing_accel.curve")
        );
    }

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        let settings = MovementSettings::from_ron_str("()").unwrap();
        assert_eq!(settings, MovementSettings::default());

        let partial = r#"(
            rotation_modes: {
                "RotationMode.Aiming": (
                    stances: {
                        "Stance.Standing": (sprint_speed: 500.0),
                    },
                ),
            },
        )"#;
        let settings = MovementSettings::from_ron_str(partial).unwrap();
        let modes: HashSet<_> = settings.rotation_modes.keys().cloned().collect();
        assert_eq!(modes, HashSet::from([RotationModeTag::AIMING]));

        let gait = settings.gait(&RotationModeTag::AIMING, &StanceTag::STANDING).unwrap();
        assert_eq!(gait.sprint_speed, 500.0);
        assert_eq!(gait.walk_forward_speed, 175.0);
        assert!(settings.gait(&RotationModeTag::AIMING, &StanceTag::CROUCHING).is_err());
    }

    #[test]
    fn test_mode_without_stances_gets_default_stances() {
        let text = r#"(rotation_modes: { "RotationMode.ViewDirection": () })"#;
        let settings = MovementSettings::from_ron_str(text).unwrap();
        assert_eq!(
            settings.stances(&RotationModeTag::VIEW_DIRECTION).unwrap(),
            &StanceSettings::default()
        );
    }

    #[test]
    fn test_invalid_values_are_rejected_not_clamped() {
        let text = r#"(
            velocity_direction_to_speed_interpolation_range: (-0.2, -1.4),
            rotation_modes: {
                "RotationMode.Aiming": (
                    stances: { "Stance.Crouching": (run_forward_speed: -10.0) },
                ),
            },
        )"#;
        match MovementSettings::from_ron_str(text) {
            Err(MovementSettingsLoadError::Invalid(InvalidSettings(violations))) => {
                assert_eq!(violations.len(), 2);
                assert!(violations.contains(&Violation::RangeOutOfBounds { axis: 'y', value: -1.4 }));
            }
            other => panic!("expected validation failure, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_text_is_a_parse_error() {
        let err = MovementSettings::from_ron_bytes(b"(rotation_modes: [").unwrap_err();
        assert!(matches!(err, MovementSettingsLoadError::Ron(_)));
    }

    #[test]
    fn test_duplicate_keys_are_rejected_at_both_levels() {
        let stances = r#"(
            rotation_modes: {
                "RotationMode.Aiming": (
                    stances: {
                        "Stance.Standing": (sprint_speed: 111.0),
                        "Stance.Standing": (sprint_speed: 999.0),
                    },
                ),
            },
        )"#;
        match MovementSettings::from_ron_str(stances) {
            Err(MovementSettingsLoadError::Ron(msg)) => {
                assert!(msg.contains("duplicate key 'Stance.Standing'"), "{msg}");
            }
            other => panic!("expected duplicate stance to be rejected, got {other:?}"),
        }

        let modes = r#"(
            rotation_modes: {
                "RotationMode.Aiming": (),
                "RotationMode.ViewDirection": (),
                "RotationMode.Aiming": (),
            },
        )"#;
        match MovementSettings::from_ron_str(modes) {
            Err(MovementSettingsLoadError::Ron(msg)) => {
                assert!(msg.contains("duplicate key 'RotationMode.Aiming'"), "{msg}");
            }
            other => panic!("expected duplicate rotation mode to be rejected, got {other:?}"),
        }
    }

    #[test]
    fn test_shipped_default_asset_matches_defaults() {
        let text = include_str!("../../assets/movement/default.movement.ron");
        let settings = MovementSettings::from_ron_str(text).unwrap();
        let keys: HashSet<_> = settings.rotation_modes.keys().cloned().collect();
        let expected: HashSet<_> = RotationModeTag::REGISTERED.into_iter().collect();
        assert_eq!(keys, expected);
        for (_, _, gait) in settings.iter_gaits() {
            assert_eq!(gait.max_walk_speed(), 175.0);
            assert_eq!(gait.max_run_speed(), 375.0);
            assert_eq!(gait.sprint_speed, 650.0);
        }
    }
}
