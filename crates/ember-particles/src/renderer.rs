//! The renderer collaborator boundary.
//!
//! The runtime never draws; it pushes state changes to a
//! [`ParticleRenderer`] which a graphics backend implements. The
//! [`NullRenderer`] keeps systems fully simulatable headless.

use std::sync::Arc;

use parking_lot::Mutex;

use ember_common::Aabb;

use crate::particle::Particle;

/// Camera-relative ordering a renderer can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    /// No ordering.
    #[default]
    None,
    /// Sort by distance from the camera, farthest first.
    Distance,
    /// Sort along the camera view direction, farthest first.
    Direction,
}

/// Receives simulation state each update.
#[allow(unused_variables)]
pub trait ParticleRenderer: Send {
    /// The factory type tag, e.g. `"Billboard"`.
    fn type_name(&self) -> &str;

    /// The pool was (re)allocated to this many slots.
    fn notify_quota(&mut self, quota: usize) {}

    /// The system's default particle dimensions changed.
    fn notify_default_dimensions(&mut self, width: f32, height: f32) {}

    /// The resolved material to draw with.
    fn set_material(&mut self, name: &str) {}

    /// A particle came alive this step.
    fn notify_particle_emitted(&mut self, particle: &Particle) {}

    /// A particle was retired this step.
    fn notify_particle_expired(&mut self, particle: &Particle) {}

    /// The motion pass finished; `active` particles moved.
    fn notify_particles_moved(&mut self, active: usize) {}

    /// Every particle was returned to the pool.
    fn notify_particles_cleared(&mut self) {}

    /// The system's bounds for this frame.
    fn notify_bounds(&mut self, bounds: &Aabb) {}

    /// Whether particle positions are in the parent node's frame.
    fn set_keep_in_local_space(&mut self, local: bool) {}

    /// The ordering this renderer wants before consuming particles.
    fn sort_mode(&self) -> SortMode {
        SortMode::None
    }
}

/// A renderer that draws nothing. Used for headless simulation and as the
/// default until a backend attaches.
#[derive(Debug, Default)]
pub struct NullRenderer;

impl ParticleRenderer for NullRenderer {
    fn type_name(&self) -> &str {
        "Null"
    }
}

/// Tally of the notifications a [`RecordingRenderer`] has seen.
#[derive(Debug, Default, Clone)]
pub struct RendererEvents {
    /// Pool size pushed at configure time.
    pub quota: usize,
    /// Most recent material name pushed.
    pub material: String,
    /// Particles emitted so far.
    pub emitted: usize,
    /// Particles expired so far.
    pub expired: usize,
    /// Motion-pass notifications received.
    pub moved_calls: usize,
    /// Active count reported by the most recent motion pass.
    pub last_active: usize,
    /// Clear notifications received.
    pub cleared: usize,
    /// Most recent bounds, if any were reported.
    pub bounds: Option<Aabb>,
}

/// A renderer that draws nothing but tallies every notification behind a
/// shared handle. Used to observe headless simulations in tests.
pub struct RecordingRenderer {
    events: Arc<Mutex<RendererEvents>>,
    sort: SortMode,
}

impl RecordingRenderer {
    /// A recorder requesting the given sort mode.
    #[must_use]
    pub fn new(sort: SortMode) -> Self {
        Self {
            events: Arc::new(Mutex::new(RendererEvents::default())),
            sort,
        }
    }

    /// Shared handle to the tally; clone it before boxing the recorder.
    #[must_use]
    pub fn events(&self) -> Arc<Mutex<RendererEvents>> {
        Arc::clone(&self.events)
    }
}

impl ParticleRenderer for RecordingRenderer {
    fn type_name(&self) -> &str {
        "Recording"
    }

    fn notify_quota(&mut self, quota: usize) {
        self.events.lock().quota = quota;
    }

    fn set_material(&mut self, name: &str) {
        self.events.lock().material = name.to_owned();
    }

    fn notify_particle_emitted(&mut self, _particle: &Particle) {
        self.events.lock().emitted += 1;
    }

    fn notify_particle_expired(&mut self, _particle: &Particle) {
        self.events.lock().expired += 1;
    }

    fn notify_particles_moved(&mut self, active: usize) {
        let mut events = self.events.lock();
        events.moved_calls += 1;
        events.last_active = active;
    }

    fn notify_particles_cleared(&mut self) {
        self.events.lock().cleared += 1;
    }

    fn notify_bounds(&mut self, bounds: &Aabb) {
        self.events.lock().bounds = Some(*bounds);
    }

    fn sort_mode(&self) -> SortMode {
        self.sort
    }
}
