//! Affectors: per-step adjustments applied to every active particle.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::particle::Particle;

/// An affector behind a type tag. Applied to each active particle every
/// step, after expiry and before motion.
pub trait ParticleAffector: Send {
    /// The factory type tag, e.g. `"LinearForce"`.
    fn type_name(&self) -> &str;

    /// Hook run once when a particle is emitted.
    fn init_particle(&self, _particle: &mut Particle) {}

    /// Adjusts one active particle for this step.
    fn affect_particle(&self, particle: &mut Particle, dt: f32);

    /// A deep copy, used when instantiating templates.
    fn clone_box(&self) -> Box<dyn ParticleAffector>;
}

/// How [`LinearForceAffector`] folds its force into a velocity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ForceApplication {
    /// `direction += force * dt`.
    #[default]
    Add,
    /// `direction = (direction + force) / 2`; dampens toward the force.
    Average,
}

/// Applies a constant force (gravity, wind) to particle velocities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearForceAffector {
    /// Force vector in units per second squared.
    pub force: Vec3,
    /// Fold mode.
    pub application: ForceApplication,
}

impl Default for LinearForceAffector {
    fn default() -> Self {
        Self {
            force: Vec3::new(0.0, -100.0, 0.0),
            application: ForceApplication::Add,
        }
    }
}

impl ParticleAffector for LinearForceAffector {
    fn type_name(&self) -> &str {
        "LinearForce"
    }

    fn affect_particle(&self, particle: &mut Particle, dt: f32) {
        match self.application {
            ForceApplication::Add => particle.direction += self.force * dt,
            ForceApplication::Average => {
                particle.direction = (particle.direction + self.force) * 0.5;
            }
        }
    }

    fn clone_box(&self) -> Box<dyn ParticleAffector> {
        Box::new(self.clone())
    }
}

/// Shifts particle colour channels at a fixed rate per second, clamping to
/// the unit range.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ColourFaderAffector {
    /// Per-channel adjustment (r, g, b, a) per second.
    pub adjust: [f32; 4],
}

impl ParticleAffector for ColourFaderAffector {
    fn type_name(&self) -> &str {
        "ColourFader"
    }

    fn affect_particle(&self, particle: &mut Particle, dt: f32) {
        let c = &mut particle.colour;
        c.r += self.adjust[0] * dt;
        c.g += self.adjust[1] * dt;
        c.b += self.adjust[2] * dt;
        c.a += self.adjust[3] * dt;
        *c = c.saturated();
    }

    fn clone_box(&self) -> Box<dyn ParticleAffector> {
        Box::new(self.clone())
    }
}

/// Grows (or shrinks) particle dimensions over time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScalerAffector {
    /// Size delta in units per second; negative shrinks.
    pub rate: f32,
}

impl ParticleAffector for ScalerAffector {
    fn type_name(&self) -> &str {
        "Scaler"
    }

    fn affect_particle(&self, particle: &mut Particle, dt: f32) {
        particle.own_dimensions = true;
        particle.width = (particle.width + self.rate * dt).max(0.0);
        particle.height = (particle.height + self.rate * dt).max(0.0);
    }

    fn clone_box(&self) -> Box<dyn ParticleAffector> {
        Box::new(self.clone())
    }
}

/// Creates affectors of one type tag.
pub trait AffectorFactory: Send + Sync {
    /// The tag this factory handles.
    fn type_name(&self) -> &str;

    /// A fresh affector with default parameters.
    fn create(&self) -> Box<dyn ParticleAffector>;
}

/// Factory for [`LinearForceAffector`].
pub struct LinearForceAffectorFactory;

impl AffectorFactory for LinearForceAffectorFactory {
    fn type_name(&self) -> &str {
        "LinearForce"
    }

    fn create(&self) -> Box<dyn ParticleAffector> {
        Box::new(LinearForceAffector::default())
    }
}

/// Factory for [`ColourFaderAffector`].
pub struct ColourFaderAffectorFactory;

impl AffectorFactory for ColourFaderAffectorFactory {
    fn type_name(&self) -> &str {
        "ColourFader"
    }

    fn create(&self) -> Box<dyn ParticleAffector> {
        Box::new(ColourFaderAffector::default())
    }
}

/// Factory for [`ScalerAffector`].
pub struct ScalerAffectorFactory;

impl AffectorFactory for ScalerAffectorFactory {
    fn type_name(&self) -> &str {
        "Scaler"
    }

    fn create(&self) -> Box<dyn ParticleAffector> {
        Box::new(ScalerAffector::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_force_add() {
        let affector = LinearForceAffector {
            force: Vec3::new(0.0, -10.0, 0.0),
            application: ForceApplication::Add,
        };
        let mut p = Particle {
            direction: Vec3::new(1.0, 0.0, 0.0),
            ..Particle::default()
        };
        affector.affect_particle(&mut p, 0.5);
        assert_eq!(p.direction, Vec3::new(1.0, -5.0, 0.0));
    }

    #[test]
    fn test_linear_force_average_converges() {
        let affector = LinearForceAffector {
            force: Vec3::new(4.0, 0.0, 0.0),
            application: ForceApplication::Average,
        };
        let mut p = Particle::default();
        for _ in 0..20 {
            affector.affect_particle(&mut p, 0.1);
        }
        assert!((p.direction.x - 4.0).abs() < 1e-3);
    }

    #[test]
    fn test_colour_fader_clamps() {
        let affector = ColourFaderAffector {
            adjust: [-2.0, 0.0, 0.0, 0.0],
        };
        let mut p = Particle::default();
        affector.affect_particle(&mut p, 1.0);
        assert_eq!(p.colour.r, 0.0);
        assert_eq!(p.colour.g, 1.0);
    }

    #[test]
    fn test_scaler_never_goes_negative() {
        let affector = ScalerAffector { rate: -10.0 };
        let mut p = Particle::default();
        p.set_dimensions(1.0, 1.0);
        affector.affect_particle(&mut p, 1.0);
        assert_eq!(p.width, 0.0);
        assert_eq!(p.height, 0.0);
    }
}
