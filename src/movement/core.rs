// src/movement/core.rs
//! Locomotion tuning data: per-gait speeds and response curves,
//! keyed by rotation mode, then by stance.

use bevy::prelude::*; // Vec2, Vec3, Asset
use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;

use super::tags::{RotationModeTag, StanceTag};

/// Upper end of the gait-amount abscissa.
/// 0 = stopped, 1 = walking, 2 = running, 3 = sprinting.
pub const GAIT_AMOUNT_MAX: f32 = 3.0;

// ---------- Curve references ----------

/// Non-owning reference to an externally managed curve asset (asset path).
/// Resolution and sampling are the evaluator's job.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurveRef(pub String);

impl CurveRef {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &str {
        &self.0
    }
}

/// One sample of the 3-channel acceleration curve.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AccelerationSample {
    pub acceleration: f32,
    pub deceleration: f32,
    pub ground_friction: f32,
}

impl From<Vec3> for AccelerationSample {
    fn from(v: Vec3) -> Self {
        Self { acceleration: v.x, deceleration: v.y, ground_friction: v.z }
    }
}

/// External curve sampler. Returns `None` when the reference can't be resolved.
pub trait CurveEvaluator {
    /// 3-channel curve: (acceleration, deceleration, ground friction).
    fn sample_vector(&self, curve: &CurveRef, gait_amount: f32) -> Option<Vec3>;
    /// 1-channel curve: rotation interpolation speed.
    fn sample_float(&self, curve: &CurveRef, gait_amount: f32) -> Option<f32>;
}

// ---------- Gait ----------

/// Speeds (cm/s) and response curves for one (rotation mode, stance) pair.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GaitSettings {
    pub walk_forward_speed: f32,
    pub walk_backward_speed: f32,
    pub run_forward_speed: f32,
    pub run_backward_speed: f32,
    pub sprint_speed: f32,

    /// Gait amount -> acceleration, deceleration, ground friction.
    pub acceleration_curve: Option<CurveRef>,

    /// Gait amount -> rotation interpolation speed.
    pub rotation_interpolation_curve: Option<CurveRef>,
}

impl Default for GaitSettings {
    fn default() -> Self {
        Self {
            walk_forward_speed: 175.0,
            walk_backward_speed: 175.0,
            run_forward_speed: 375.0,
            run_backward_speed: 375.0,
            sprint_speed: 650.0,
            acceleration_curve: None,
            rotation_interpolation_curve: None,
        }
    }
}

impl GaitSettings {
    pub fn max_walk_speed(&self) -> f32 {
        self.walk_forward_speed.max(self.walk_backward_speed)
    }

    pub fn max_run_speed(&self) -> f32 {
        self.run_forward_speed.max(self.run_backward_speed)
    }

    pub fn with_acceleration_curve(mut self, curve: CurveRef) -> Self {
        self.acceleration_curve = Some(curve);
        self
    }

    pub fn with_rotation_interpolation_curve(mut self, curve: CurveRef) -> Self {
        self.rotation_interpolation_curve = Some(curve);
        self
    }

    /// All speed fields with their names, in declaration order.
    pub fn speeds(&self) -> [(&'static str, f32); 5] {
        [
            ("walk_forward_speed", self.walk_forward_speed),
            ("walk_backward_speed", self.walk_backward_speed),
            ("run_forward_speed", self.run_forward_speed),
            ("run_backward_speed", self.run_backward_speed),
            ("sprint_speed", self.sprint_speed),
        ]
    }

    /// Sample the acceleration curve. `None` means "no modifier"
    /// (no curve bound, or the evaluator couldn't resolve it).
    pub fn acceleration_at(
        &self,
        evaluator: &dyn CurveEvaluator,
        gait_amount: f32,
    ) -> Option<AccelerationSample> {
        let curve = self.acceleration_curve.as_ref()?;
        evaluator
            .sample_vector(curve, clamp_gait_amount(gait_amount))
            .map(AccelerationSample::from)
    }

    /// Sample the rotation interpolation speed curve. Same `None` semantics.
    pub fn rotation_interpolation_speed_at(
        &self,
        evaluator: &dyn CurveEvaluator,
        gait_amount: f32,
    ) -> Option<f32> {
        let curve = self.rotation_interpolation_curve.as_ref()?;
        evaluator.sample_float(curve, clamp_gait_amount(gait_amount))
    }
}

#[inline]
fn clamp_gait_amount(gait_amount: f32) -> f32 {
    gait_amount.clamp(0.0, GAIT_AMOUNT_MAX)
}

// ---------- Stances ----------

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StanceSettings {
    #[serde(deserialize_with = "deserialize_unique_keys")]
    pub stances: HashMap<StanceTag, GaitSettings>,
}

impl Default for StanceSettings {
    fn default() -> Self {
        Self {
            stances: StanceTag::REGISTERED
                .into_iter()
                .map(|tag| (tag, GaitSettings::default()))
                .collect(),
        }
    }
}

impl StanceSettings {
    /// Unknown stances are `None`, never a default-valued gait.
    pub fn gait(&self, stance: &StanceTag) -> Option<&GaitSettings> {
        self.stances.get(stance)
    }
}

// ---------- Root asset ----------

/// Root locomotion asset.
#[derive(Asset, TypePath, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementSettings {
    /// X-components (sine of angle) of the velocity direction relative to the
    /// view direction at which forward speed starts / finishes blending into
    /// backward speed. First is the milder angle.
    pub velocity_direction_to_speed_interpolation_range: Vec2,

    #[serde(deserialize_with = "deserialize_unique_keys")]
    pub rotation_modes: HashMap<RotationModeTag, StanceSettings>,
}

impl Default for MovementSettings {
    fn default() -> Self {
        Self {
            velocity_direction_to_speed_interpolation_range: default_interpolation_range(),
            rotation_modes: RotationModeTag::REGISTERED
                .into_iter()
                .map(|tag| (tag, StanceSettings::default()))
                .collect(),
        }
    }
}

/// (sin(-10°), sin(-35°))
pub fn default_interpolation_range() -> Vec2 {
    Vec2::new((-10.0f32).to_radians().sin(), (-35.0f32).to_radians().sin())
}

impl MovementSettings {
    pub fn stances(&self, rotation_mode: &RotationModeTag) -> Result<&StanceSettings, SettingsError> {
        self.rotation_modes
            .get(rotation_mode)
            .ok_or_else(|| SettingsError::MissingRotationMode(rotation_mode.clone()))
    }

    /// Resolve `rotation_modes[mode].stances[stance]`.
    pub fn gait(
        &self,
        rotation_mode: &RotationModeTag,
        stance: &StanceTag,
    ) -> Result<&GaitSettings, SettingsError> {
        self.stances(rotation_mode)?
            .gait(stance)
            .ok_or_else(|| SettingsError::MissingStance {
                rotation_mode: rotation_mode.clone(),
                stance: stance.clone(),
            })
    }

    /// Every (mode, stance, gait) triple, sorted by tag name.
    pub fn iter_gaits(&self) -> Vec<(&RotationModeTag, &StanceTag, &GaitSettings)> {
        let mut out: Vec<_> = self
            .rotation_modes
            .iter()
            .flat_map(|(mode, stances)| {
                stances.stances.iter().map(move |(stance, gait)| (mode, stance, gait))
            })
            .collect();
        out.sort_by(|a, b| (a.0.as_str(), a.1.as_str()).cmp(&(b.0.as_str(), b.1.as_str())));
        out
    }
}

// ---------- Key uniqueness ----------

/// Map deserializer that rejects a repeated key instead of keeping the last one.
fn deserialize_unique_keys<'de, D, K, V>(deserializer: D) -> Result<HashMap<K, V>, D::Error>
where
    D: Deserializer<'de>,
    K: Deserialize<'de> + Eq + Hash + fmt::Display,
    V: Deserialize<'de>,
{
    struct UniqueKeys<K, V>(PhantomData<fn() -> (K, V)>);

    impl<'de, K, V> Visitor<'de> for UniqueKeys<K, V>
    where
        K: Deserialize<'de> + Eq + Hash + fmt::Display,
        V: Deserialize<'de>,
    {
        type Value = HashMap<K, V>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a map with unique keys")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
            let mut map = HashMap::with_capacity(access.size_hint().unwrap_or(0));
            while let Some((key, value)) = access.next_entry::<K, V>()? {
                if map.contains_key(&key) {
                    return Err(de::Error::custom(format_args!("duplicate key '{}'", key)));
                }
                map.insert(key, value);
            }
            Ok(map)
        }
    }

    deserializer.deserialize_map(UniqueKeys(PhantomData))
}

// ---------- Lookup errors ----------

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SettingsError {
    #[error("Rotation mode '{0}' is not configured")]
    MissingRotationMode(RotationModeTag),
    #[error("Stance '{stance}' is not configured for rotation mode '{rotation_mode}'")]
    MissingStance { rotation_mode: RotationModeTag, stance: StanceTag },
}
