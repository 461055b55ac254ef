// src/movement/tags.rs
//! Identifier vocabulary for the settings maps.
//! Tags are opaque keys; only equality and hashing matter.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

macro_rules! define_tag {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Cow<'static, str>);

        impl $name {
            pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
                Self(name.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// True if this tag is part of the registered vocabulary.
            pub fn is_registered(&self) -> bool {
                Self::REGISTERED.contains(self)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

define_tag!(
    /// How the character turns (orient to velocity, to view, aiming).
    RotationModeTag
);

define_tag!(
    /// Posture (standing, crouching).
    StanceTag
);

impl RotationModeTag {
    pub const VELOCITY_DIRECTION: Self = Self(Cow::Borrowed("RotationMode.VelocityDirection"));
    pub const VIEW_DIRECTION: Self = Self(Cow::Borrowed("RotationMode.ViewDirection"));
    pub const AIMING: Self = Self(Cow::Borrowed("RotationMode.Aiming"));

    /// Registered rotation modes, in default population order.
    pub const REGISTERED: [Self; 3] = [Self::VELOCITY_DIRECTION, Self::VIEW_DIRECTION, Self::AIMING];
}

impl StanceTag {
    pub const STANDING: Self = Self(Cow::Borrowed("Stance.Standing"));
    pub const CROUCHING: Self = Self(Cow::Borrowed("Stance.Crouching"));

    /// Registered stances, in default population order.
    pub const REGISTERED: [Self; 2] = [Self::STANDING, Self::CROUCHING];
}
