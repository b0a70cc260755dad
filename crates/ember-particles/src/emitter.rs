//! Emitters: where and how fast particles come into being.
//!
//! Concrete emitters share an [`EmitterState`] parameter block and plug in
//! through an [`EmitterFactory`] keyed by type tag. An emitter whose
//! `emits` field names another emitter is a template: the system builds a
//! pool of its clones, and those clones ride on emitted particles.

use ember_common::ColourValue;
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::particle::Particle;

fn random_range(lo: f32, hi: f32) -> f32 {
    if hi <= lo {
        lo
    } else {
        lo + fastrand::f32() * (hi - lo)
    }
}

/// Parameters and live timers shared by every emitter type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmitterState {
    /// Emitter name; referenced by other emitters' `emits` fields.
    pub name: String,
    /// Name of the emitter this one emits as particles. Empty emits
    /// ordinary visual particles.
    pub emits: String,
    /// Whether this emitter is a pooled clone (or a template serving one).
    pub emitted: bool,
    /// Whether the emitter currently emits.
    pub enabled: bool,
    /// Emission origin in system space.
    pub position: Vec3,
    /// Base emission direction.
    pub direction: Vec3,
    /// Half-angle in radians of the emission cone around `direction`.
    pub angle: f32,
    /// Speed range in units per second.
    pub min_speed: f32,
    /// Upper bound of the speed range.
    pub max_speed: f32,
    /// Lifetime range in seconds.
    pub min_ttl: f32,
    /// Upper bound of the lifetime range.
    pub max_ttl: f32,
    /// Colour range; each particle picks a random blend.
    pub colour_start: ColourValue,
    /// End of the colour range.
    pub colour_end: ColourValue,
    /// Particles per second.
    pub emission_rate: f32,
    /// Delay before emission begins each time the emitter is enabled.
    pub start_time: f32,
    /// Emission window in seconds; 0 disables the window.
    pub min_duration: f32,
    /// Upper bound of the emission window.
    pub max_duration: f32,
    /// Pause range before re-enabling after the window closes.
    pub min_repeat_delay: f32,
    /// Upper bound of the pause range.
    pub max_repeat_delay: f32,
    #[serde(skip)]
    remainder: f32,
    #[serde(skip)]
    start_remaining: f32,
    #[serde(skip)]
    duration_remaining: f32,
    #[serde(skip)]
    repeat_remaining: f32,
}

impl Default for EmitterState {
    fn default() -> Self {
        Self {
            name: String::new(),
            emits: String::new(),
            emitted: false,
            enabled: true,
            position: Vec3::ZERO,
            direction: Vec3::X,
            angle: 0.0,
            min_speed: 1.0,
            max_speed: 1.0,
            min_ttl: 5.0,
            max_ttl: 5.0,
            colour_start: ColourValue::WHITE,
            colour_end: ColourValue::WHITE,
            emission_rate: 10.0,
            start_time: 0.0,
            min_duration: 0.0,
            max_duration: 0.0,
            min_repeat_delay: 0.0,
            max_repeat_delay: 0.0,
            remainder: 0.0,
            start_remaining: 0.0,
            duration_remaining: 0.0,
            repeat_remaining: 0.0,
        }
    }
}

impl EmitterState {
    /// Enables or disables emission, rolling fresh start / duration /
    /// repeat timers.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if enabled {
            self.start_remaining = self.start_time;
            self.duration_remaining = random_range(self.min_duration, self.max_duration);
            self.remainder = 0.0;
        } else if self.max_repeat_delay > 0.0 {
            self.repeat_remaining = random_range(self.min_repeat_delay, self.max_repeat_delay);
        }
    }

    /// Whether the emitter has a finite emission window and re-arms itself.
    #[must_use]
    pub fn repeats(&self) -> bool {
        self.max_duration > 0.0 && self.max_repeat_delay > 0.0
    }

    /// Integer number of particles to emit this step, accounting for the
    /// start delay, the duration window, the repeat delay, and fractional
    /// carry-over between steps.
    pub fn emission_count(&mut self, dt: f32) -> usize {
        if !self.enabled {
            if self.repeat_remaining > 0.0 {
                self.repeat_remaining -= dt;
                if self.repeat_remaining <= 0.0 {
                    self.set_enabled(true);
                }
            }
            return 0;
        }
        if self.start_remaining > 0.0 {
            self.start_remaining -= dt;
            return 0;
        }
        self.remainder += self.emission_rate * dt;
        let count = if self.remainder >= 1.0 {
            let whole = self.remainder.floor();
            self.remainder -= whole;
            whole as usize
        } else {
            0
        };
        if self.max_duration > 0.0 {
            self.duration_remaining -= dt;
            if self.duration_remaining <= 0.0 {
                self.set_enabled(false);
            }
        }
        count
    }

    /// A direction within the cone of `angle` around `direction`.
    #[must_use]
    pub fn random_direction(&self) -> Vec3 {
        let base = self.direction.normalize_or_zero();
        if self.angle <= 0.0 || base == Vec3::ZERO {
            return base;
        }
        let tilt = Quat::from_axis_angle(
            base.any_orthonormal_vector(),
            fastrand::f32() * self.angle,
        );
        let spin = Quat::from_axis_angle(base, fastrand::f32() * std::f32::consts::TAU);
        spin * (tilt * base)
    }

    /// Fills in the state-driven particle fields: direction and speed,
    /// colour, and lifetime. Position is the concrete emitter's job.
    pub fn init_particle_common(&self, particle: &mut Particle) {
        particle.direction =
            self.random_direction() * random_range(self.min_speed, self.max_speed);
        particle.colour = self.colour_start.lerp(self.colour_end, fastrand::f32());
        let ttl = random_range(self.min_ttl, self.max_ttl);
        particle.time_to_live = ttl;
        particle.total_time_to_live = ttl;
    }
}

/// An emitter behind a type tag.
pub trait ParticleEmitter: Send {
    /// The factory type tag, e.g. `"Point"`.
    fn type_name(&self) -> &str;

    /// Shared parameter block.
    fn state(&self) -> &EmitterState;

    /// Mutable access to the parameter block.
    fn state_mut(&mut self) -> &mut EmitterState;

    /// Initialises a freshly allocated particle.
    fn init_particle(&mut self, particle: &mut Particle);

    /// Particles requested this step.
    fn emission_count(&mut self, dt: f32) -> usize {
        self.state_mut().emission_count(dt)
    }

    /// A deep copy, used for emitted-emitter pools and templates.
    fn clone_box(&self) -> Box<dyn ParticleEmitter>;
}

/// Emits from a single point.
#[derive(Debug, Clone, Default)]
pub struct PointEmitter {
    /// Shared parameters.
    pub state: EmitterState,
}

impl ParticleEmitter for PointEmitter {
    fn type_name(&self) -> &str {
        "Point"
    }

    fn state(&self) -> &EmitterState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut EmitterState {
        &mut self.state
    }

    fn init_particle(&mut self, particle: &mut Particle) {
        particle.position = self.state.position;
        self.state.init_particle_common(particle);
    }

    fn clone_box(&self) -> Box<dyn ParticleEmitter> {
        Box::new(self.clone())
    }
}

/// Emits from a random point inside an axis-aligned box centred on the
/// emitter position.
#[derive(Debug, Clone)]
pub struct BoxEmitter {
    /// Shared parameters.
    pub state: EmitterState,
    /// Full box extents.
    pub size: Vec3,
}

impl Default for BoxEmitter {
    fn default() -> Self {
        Self {
            state: EmitterState::default(),
            size: Vec3::ONE,
        }
    }
}

impl ParticleEmitter for BoxEmitter {
    fn type_name(&self) -> &str {
        "Box"
    }

    fn state(&self) -> &EmitterState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut EmitterState {
        &mut self.state
    }

    fn init_particle(&mut self, particle: &mut Particle) {
        let jitter = Vec3::new(
            fastrand::f32() - 0.5,
            fastrand::f32() - 0.5,
            fastrand::f32() - 0.5,
        ) * self.size;
        particle.position = self.state.position + jitter;
        self.state.init_particle_common(particle);
    }

    fn clone_box(&self) -> Box<dyn ParticleEmitter> {
        Box::new(self.clone())
    }
}

/// Creates emitters of one type tag.
pub trait EmitterFactory: Send + Sync {
    /// The tag this factory handles.
    fn type_name(&self) -> &str;

    /// A fresh emitter with default parameters.
    fn create(&self) -> Box<dyn ParticleEmitter>;
}

/// Factory for [`PointEmitter`].
pub struct PointEmitterFactory;

impl EmitterFactory for PointEmitterFactory {
    fn type_name(&self) -> &str {
        "Point"
    }

    fn create(&self) -> Box<dyn ParticleEmitter> {
        Box::new(PointEmitter::default())
    }
}

/// Factory for [`BoxEmitter`].
pub struct BoxEmitterFactory;

impl EmitterFactory for BoxEmitterFactory {
    fn type_name(&self) -> &str {
        "Box"
    }

    fn create(&self) -> Box<dyn ParticleEmitter> {
        Box::new(BoxEmitter::default())
    }
}
