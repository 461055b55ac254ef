//! Locomotion tuning data for a character: per-gait speeds and response
//! curves, organized by rotation mode and stance, loaded as a Bevy asset.

pub mod movement;

pub use movement::MovementSettingsPlugin;
