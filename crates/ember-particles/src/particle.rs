//! The particle record.

use ember_common::ColourValue;
use glam::Vec3;

/// What an active pool slot represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParticleKind {
    /// An ordinary rendered particle.
    #[default]
    Visual,
    /// A particle that is itself an emitter drawn from a per-name pool.
    Emitter,
}

/// One pooled particle. Slots are reused; [`Particle::reset`] restores the
/// defaults before an emitter re-initialises them.
#[derive(Debug, Clone)]
pub struct Particle {
    /// Position, in system-local or world space per the owning system.
    pub position: Vec3,
    /// Velocity in units per second.
    pub direction: Vec3,
    /// Current colour.
    pub colour: ColourValue,
    /// Seconds of life remaining. Never exceeds `total_time_to_live`.
    pub time_to_live: f32,
    /// Lifetime assigned at emission.
    pub total_time_to_live: f32,
    /// Billboard rotation in radians.
    pub rotation: f32,
    /// Rotation speed in radians per second.
    pub rotation_speed: f32,
    /// Whether this particle overrides the system's default dimensions.
    pub own_dimensions: bool,
    /// Width when `own_dimensions` is set.
    pub width: f32,
    /// Height when `own_dimensions` is set.
    pub height: f32,
    /// Visual or emitted-emitter.
    pub kind: ParticleKind,
    /// Texture coordinate index into the material's atlas.
    pub texcoord_index: u16,
    /// For [`ParticleKind::Emitter`], the slot of the pooled emitter this
    /// particle drives.
    pub emitter_slot: Option<usize>,
}

impl Default for Particle {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            direction: Vec3::ZERO,
            colour: ColourValue::WHITE,
            time_to_live: 10.0,
            total_time_to_live: 10.0,
            rotation: 0.0,
            rotation_speed: 0.0,
            own_dimensions: false,
            width: 0.0,
            height: 0.0,
            kind: ParticleKind::Visual,
            texcoord_index: 0,
            emitter_slot: None,
        }
    }
}

impl Particle {
    /// Restores the slot to emission defaults.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Sets per-particle dimensions, overriding the system defaults.
    pub fn set_dimensions(&mut self, width: f32, height: f32) {
        self.own_dimensions = true;
        self.width = width;
        self.height = height;
    }

    /// The larger of the particle's dimensions, or `default` when the
    /// particle uses the system defaults.
    #[must_use]
    pub fn max_dimension(&self, default: f32) -> f32 {
        if self.own_dimensions {
            self.width.max(self.height)
        } else {
            default
        }
    }
}
