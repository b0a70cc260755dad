//! # Ember Particles
//!
//! The pooled particle system runtime for the Ember engine core.
//!
//! A [`ParticleSystem`] owns a fixed pool of particles partitioned into
//! active and free lists, a set of emitters that bring particles to life,
//! and affectors that adjust them every step. Rendering stays behind the
//! [`ParticleRenderer`] boundary, so systems simulate headless. The
//! [`ParticleSystemManager`] holds factory registries keyed by type tag
//! and a template library systems are instantiated from.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod affector;
pub mod emitter;
pub mod manager;
pub mod particle;
pub mod renderer;
pub mod sort;
pub mod system;

pub use affector::{
    AffectorFactory, ColourFaderAffector, ForceApplication, LinearForceAffector, ParticleAffector,
    ScalerAffector,
};
pub use emitter::{BoxEmitter, EmitterFactory, EmitterState, ParticleEmitter, PointEmitter};
pub use manager::{ParticleSystemManager, DEFAULT_MATERIAL};
pub use particle::{Particle, ParticleKind};
pub use renderer::{NullRenderer, ParticleRenderer, RecordingRenderer, RendererEvents, SortMode};
pub use sort::RadixSorter;
pub use system::ParticleSystem;
