// src/movement/validation.rs
//! Boundary checks for `MovementSettings`.
//! Validation only reports; it never clamps or repairs.

#[cfg(feature = "editor")]
use bevy::log::warn;

use super::core::{CurveRef, MovementSettings};
use super::tags::{RotationModeTag, StanceTag};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Violation {
    #[error("{rotation_mode}/{stance}: {field} must be a finite, non-negative speed (got {value})")]
    InvalidSpeed {
        rotation_mode: RotationModeTag,
        stance: StanceTag,
        field: &'static str,
        value: f32,
    },
    #[error("Speed interpolation range component {axis} must lie in [-1, 1] (got {value})")]
    RangeOutOfBounds { axis: char, value: f32 },
    #[error("Rotation mode '{0}' is not a registered tag")]
    UnregisteredRotationMode(RotationModeTag),
    #[error("Stance '{stance}' under rotation mode '{rotation_mode}' is not a registered tag")]
    UnregisteredStance { rotation_mode: RotationModeTag, stance: StanceTag },
    #[error("{rotation_mode}/{stance}: {field} references a curve with an empty path")]
    EmptyCurvePath {
        rotation_mode: RotationModeTag,
        stance: StanceTag,
        field: &'static str,
    },
}

/// Every violation found, rejected as a whole.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("{} violation(s): {}", .0.len(), join_violations(.0))]
pub struct InvalidSettings(pub Vec<Violation>);

fn join_violations(violations: &[Violation]) -> String {
    violations.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
}

/// Which part of the asset an authoring edit touched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EditedProperty {
    InterpolationRange,
    /// Structural change to the rotation-mode or stance maps.
    RotationModes,
    Gait { rotation_mode: RotationModeTag, stance: StanceTag },
}

impl Violation {
    /// Whether this violation belongs to the given edited property.
    pub fn concerns(&self, edited: &EditedProperty) -> bool {
        match (edited, self) {
            (EditedProperty::InterpolationRange, Violation::RangeOutOfBounds { .. }) => true,
            (EditedProperty::InterpolationRange, _) => false,
            (EditedProperty::RotationModes, Violation::RangeOutOfBounds { .. }) => false,
            (EditedProperty::RotationModes, _) => true,
            (EditedProperty::Gait { rotation_mode, stance }, v) => match v.location() {
                Some((m, s)) => m == rotation_mode && s == stance,
                None => false,
            },
        }
    }

    fn location(&self) -> Option<(&RotationModeTag, &StanceTag)> {
        match self {
            Violation::InvalidSpeed { rotation_mode, stance, .. }
            | Violation::UnregisteredStance { rotation_mode, stance }
            | Violation::EmptyCurvePath { rotation_mode, stance, .. } => Some((rotation_mode, stance)),
            Violation::RangeOutOfBounds { .. } | Violation::UnregisteredRotationMode(_) => None,
        }
    }
}

fn range_component_ok(v: f32) -> bool {
    v.is_finite() && (-1.0..=1.0).contains(&v)
}

fn blank(curve: &Option<CurveRef>) -> bool {
    curve.as_ref().is_some_and(|c| c.path().trim().is_empty())
}

impl MovementSettings {
    /// All invariant violations, in a stable order. Empty when valid.
    /// The ordering of the two range components is not checked.
    pub fn validate(&self) -> Vec<Violation> {
        let mut out = Vec::new();

        let range = self.velocity_direction_to_speed_interpolation_range;
        for (axis, value) in [('x', range.x), ('y', range.y)] {
            if !range_component_ok(value) {
                out.push(Violation::RangeOutOfBounds { axis, value });
            }
        }

        let mut modes: Vec<_> = self.rotation_modes.keys().collect();
        modes.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        for mode in modes {
            if !mode.is_registered() {
                out.push(Violation::UnregisteredRotationMode(mode.clone()));
            }
        }

        for (mode, stance, gait) in self.iter_gaits() {
            if !stance.is_registered() {
                out.push(Violation::UnregisteredStance {
                    rotation_mode: mode.clone(),
                    stance: stance.clone(),
                });
            }
            for (field, value) in gait.speeds() {
                if !(value.is_finite() && value >= 0.0) {
                    out.push(Violation::InvalidSpeed {
                        rotation_mode: mode.clone(),
                        stance: stance.clone(),
                        field,
                        value,
                    });
                }
            }
            for (field, curve) in [
                ("acceleration_curve", &gait.acceleration_curve),
                ("rotation_interpolation_curve", &gait.rotation_interpolation_curve),
            ] {
                if blank(curve) {
                    out.push(Violation::EmptyCurvePath {
                        rotation_mode: mode.clone(),
                        stance: stance.clone(),
                        field,
                    });
                }
            }
        }

        out
    }

    /// Gate for programmatic construction: pass through if valid.
    pub fn validated(self) -> Result<Self, InvalidSettings> {
        let violations = self.validate();
        if violations.is_empty() {
            Ok(self)
        } else {
            Err(InvalidSettings(violations))
        }
    }

    /// Authoring-time notification. Reports the violations the edit is
    /// responsible for; the authoring surface decides what to repair.
    #[cfg(feature = "editor")]
    pub fn on_property_edited(&self, edited: &EditedProperty) -> Vec<Violation> {
        let violations: Vec<_> = self
            .validate()
            .into_iter()
            .filter(|v| v.concerns(edited))
            .collect();
        for v in &violations {
            warn!("Movement settings: {}", v);
        }
        violations
    }
}
