//! The particle system: a pooled simulation driven by emitters and
//! affectors.
//!
//! Pool slots are indices into a flat particle vector; `active` and `free`
//! partition the allocated slots at every update boundary. Emitted
//! emitters (emitters riding on particles) live in per-name slot pools of
//! the same shape.

use ahash::AHashMap;
use glam::{Affine3A, Vec3};
use tracing::{debug, warn};

use ember_common::Aabb;

use crate::affector::ParticleAffector;
use crate::emitter::ParticleEmitter;
use crate::particle::{Particle, ParticleKind};
use crate::renderer::{ParticleRenderer, SortMode};
use crate::sort::RadixSorter;

enum EmitterRef {
    Main(usize),
    Emitted(usize),
}

/// A fixed-capacity particle simulation.
pub struct ParticleSystem {
    name: String,
    resource_group: String,
    material_name: String,
    default_width: f32,
    default_height: f32,

    quota: usize,
    emitted_emitter_quota: usize,
    pool: Vec<Particle>,
    free: Vec<u32>,
    active: Vec<u32>,

    emitters: Vec<Box<dyn ParticleEmitter>>,
    affectors: Vec<Box<dyn ParticleAffector>>,

    emitted_emitters: Vec<Box<dyn ParticleEmitter>>,
    emitted_pools: AHashMap<String, Vec<usize>>,
    active_emitted: Vec<usize>,
    emitted_pools_initialised: bool,

    speed_factor: f32,
    iteration_interval: f32,
    update_remain_time: f32,
    non_visible_timeout: f32,
    time_since_visible: f32,
    visible: bool,
    local_space: bool,
    sorting_enabled: bool,
    emitting: bool,

    bounds: Aabb,
    bounds_auto_update: bool,
    bounds_update_time: f32,
    parent_transform: Affine3A,

    renderer: Option<Box<dyn ParticleRenderer>>,
    renderer_configured: bool,
    sorter: RadixSorter,
}

impl ParticleSystem {
    /// An empty system belonging to a resource group.
    #[must_use]
    pub fn new(name: impl Into<String>, resource_group: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            resource_group: resource_group.into(),
            material_name: String::new(),
            default_width: 100.0,
            default_height: 100.0,
            quota: 10,
            emitted_emitter_quota: 3,
            pool: Vec::new(),
            free: Vec::new(),
            active: Vec::new(),
            emitters: Vec::new(),
            affectors: Vec::new(),
            emitted_emitters: Vec::new(),
            emitted_pools: AHashMap::new(),
            active_emitted: Vec::new(),
            emitted_pools_initialised: false,
            speed_factor: 1.0,
            iteration_interval: 0.0,
            update_remain_time: 0.0,
            non_visible_timeout: 0.0,
            time_since_visible: 0.0,
            visible: true,
            local_space: false,
            sorting_enabled: false,
            emitting: true,
            bounds: Aabb::NULL,
            bounds_auto_update: true,
            bounds_update_time: 0.0,
            parent_transform: Affine3A::IDENTITY,
            renderer: None,
            renderer_configured: false,
            sorter: RadixSorter::new(),
        }
    }

    /// System name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The resource group material lookups resolve against.
    #[must_use]
    pub fn resource_group(&self) -> &str {
        &self.resource_group
    }

    // ------------------------------------------------------------------
    // Configuration
    // ------------------------------------------------------------------

    /// Stores the material name; resolution happens at configure time.
    pub fn set_material_name(&mut self, name: impl Into<String>) {
        self.material_name = name.into();
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.set_material(&self.material_name);
        }
    }

    /// The material this system draws with.
    #[must_use]
    pub fn material_name(&self) -> &str {
        &self.material_name
    }

    /// Grows the particle pool limit. Quotas never shrink; the pool itself
    /// grows lazily during the next update.
    pub fn set_particle_quota(&mut self, quota: usize) {
        self.quota = self.quota.max(quota);
    }

    /// The pool limit.
    #[must_use]
    pub fn particle_quota(&self) -> usize {
        self.quota
    }

    /// Grows the emitted-emitter pool limit.
    pub fn set_emitted_emitter_quota(&mut self, quota: usize) {
        self.emitted_emitter_quota = self.emitted_emitter_quota.max(quota);
    }

    /// Default particle dimensions for particles without their own.
    pub fn set_default_dimensions(&mut self, width: f32, height: f32) {
        self.default_width = width;
        self.default_height = height;
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.notify_default_dimensions(width, height);
        }
    }

    /// Whether particle positions stay in the parent node's frame.
    pub fn set_keep_particles_in_local_space(&mut self, local: bool) {
        self.local_space = local;
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.set_keep_in_local_space(local);
        }
    }

    /// Enables camera-relative sorting when the renderer asks for it.
    pub fn set_sorting_enabled(&mut self, enabled: bool) {
        self.sorting_enabled = enabled;
    }

    /// Fixed simulation step; 0 steps once per update with the frame dt.
    pub fn set_iteration_interval(&mut self, seconds: f32) {
        self.iteration_interval = seconds;
        self.update_remain_time = 0.0;
    }

    /// Seconds of continuous invisibility (unscaled) after which updates
    /// are skipped; 0 disables the timeout.
    pub fn set_non_visible_update_timeout(&mut self, seconds: f32) {
        self.non_visible_timeout = seconds;
        self.time_since_visible = 0.0;
    }

    /// Time scale applied to every step.
    pub fn set_speed_factor(&mut self, factor: f32) {
        self.speed_factor = factor;
    }

    /// Master emission switch; active particles keep simulating.
    pub fn set_emitting(&mut self, emitting: bool) {
        self.emitting = emitting;
    }

    /// Whether emitters run.
    #[must_use]
    pub fn is_emitting(&self) -> bool {
        self.emitting
    }

    /// Marks the system visible or not for the non-visible timeout.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
        if visible {
            self.time_since_visible = 0.0;
        }
    }

    /// World transform of the parent node; used for world-space emission
    /// and bounds conversion.
    pub fn set_parent_transform(&mut self, transform: Affine3A) {
        self.parent_transform = transform;
    }

    /// Replaces the manually maintained bounds.
    pub fn set_bounds(&mut self, bounds: Aabb) {
        self.bounds = bounds;
    }

    /// Controls automatic bounds maintenance. With `auto_update` off,
    /// positions still merge into the existing bounds for `stop_in`
    /// further seconds, then the bounds freeze.
    pub fn set_bounds_auto_update(&mut self, auto_update: bool, stop_in: f32) {
        self.bounds_auto_update = auto_update;
        self.bounds_update_time = stop_in;
    }

    /// Current bounds.
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    /// Attaches the renderer collaborator; configuration is pushed during
    /// the next update.
    pub fn set_renderer(&mut self, renderer: Box<dyn ParticleRenderer>) {
        self.renderer = Some(renderer);
        self.renderer_configured = false;
    }

    /// The attached renderer, if any.
    #[must_use]
    pub fn renderer(&self) -> Option<&dyn ParticleRenderer> {
        self.renderer.as_deref()
    }

    // ------------------------------------------------------------------
    // Emitters and affectors
    // ------------------------------------------------------------------

    /// Appends an emitter; returns its index.
    pub fn add_emitter(&mut self, emitter: Box<dyn ParticleEmitter>) -> usize {
        self.emitters.push(emitter);
        self.emitted_pools_initialised = false;
        self.emitters.len() - 1
    }

    /// The emitter at `index`.
    #[must_use]
    pub fn emitter(&self, index: usize) -> Option<&dyn ParticleEmitter> {
        self.emitters.get(index).map(Box::as_ref)
    }

    /// Mutable access to the emitter at `index`.
    pub fn emitter_mut(&mut self, index: usize) -> Option<&mut Box<dyn ParticleEmitter>> {
        self.emitters.get_mut(index)
    }

    /// Number of emitters.
    #[must_use]
    pub fn emitter_count(&self) -> usize {
        self.emitters.len()
    }

    /// Removes the emitter at `index`.
    pub fn remove_emitter(&mut self, index: usize) {
        if index < self.emitters.len() {
            self.emitters.remove(index);
            self.emitted_pools_initialised = false;
        }
    }

    /// Removes every emitter.
    pub fn remove_all_emitters(&mut self) {
        self.emitters.clear();
        self.emitted_pools_initialised = false;
    }

    /// Appends an affector; returns its index.
    pub fn add_affector(&mut self, affector: Box<dyn ParticleAffector>) -> usize {
        self.affectors.push(affector);
        self.affectors.len() - 1
    }

    /// Number of affectors.
    #[must_use]
    pub fn affector_count(&self) -> usize {
        self.affectors.len()
    }

    /// Removes the affector at `index`.
    pub fn remove_affector(&mut self, index: usize) {
        if index < self.affectors.len() {
            self.affectors.remove(index);
        }
    }

    /// Removes every affector.
    pub fn remove_all_affectors(&mut self) {
        self.affectors.clear();
    }

    // ------------------------------------------------------------------
    // Pool queries
    // ------------------------------------------------------------------

    /// Number of live particles.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Number of free pool slots.
    #[must_use]
    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    /// Allocated pool size (grows lazily up to the quota).
    #[must_use]
    pub fn pool_size(&self) -> usize {
        self.pool.len()
    }

    /// The active particles, in active-list order.
    pub fn active_particles(&self) -> impl Iterator<Item = &Particle> {
        self.active.iter().map(|&i| &self.pool[i as usize])
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Returns every particle and emitted emitter to its free list and
    /// resets the step accumulator.
    pub fn clear(&mut self) {
        for &i in &self.active {
            self.free.push(i);
        }
        self.active.clear();
        for &slot in &self.active_emitted {
            let key = self.emitted_emitters[slot].state().name.clone();
            if let Some(pool) = self.emitted_pools.get_mut(&key) {
                pool.push(slot);
            }
        }
        self.active_emitted.clear();
        self.update_remain_time = 0.0;
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.notify_particles_cleared();
        }
    }

    /// Advances the simulation by `duration` in fixed `step` increments,
    /// without waiting for frame updates.
    pub fn fast_forward(&mut self, duration: f32, step: f32) {
        if step <= 0.0 {
            return;
        }
        let mut elapsed = 0.0;
        while elapsed < duration {
            self.update(step);
            elapsed += step;
        }
    }

    /// One frame of simulation.
    pub fn update(&mut self, dt: f32) {
        if self.non_visible_timeout > 0.0 {
            if self.visible {
                self.time_since_visible = 0.0;
            } else {
                // Accumulates unscaled wall time.
                self.time_since_visible += dt;
                if self.time_since_visible >= self.non_visible_timeout {
                    return;
                }
            }
        }

        let dt = dt * self.speed_factor;
        self.ensure_pool();
        self.configure_renderer();
        self.initialise_emitted_pools();

        if self.iteration_interval > 0.0 {
            self.update_remain_time += dt;
            while self.update_remain_time >= self.iteration_interval {
                self.step(self.iteration_interval);
                self.update_remain_time -= self.iteration_interval;
            }
        } else {
            self.step(dt);
        }

        self.update_bounds(dt);
    }

    fn step(&mut self, dt: f32) {
        self.expire(dt);
        self.trigger_affectors(dt);
        self.apply_motion(dt);
        if self.emitting {
            self.trigger_emitters(dt);
        }
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.notify_particles_moved(self.active.len());
        }
    }

    fn ensure_pool(&mut self) {
        while self.pool.len() < self.quota {
            self.pool.push(Particle::default());
            self.free.push((self.pool.len() - 1) as u32);
        }
    }

    fn configure_renderer(&mut self) {
        if self.renderer_configured {
            return;
        }
        let Some(renderer) = self.renderer.as_mut() else {
            return;
        };
        renderer.notify_quota(self.quota);
        renderer.set_material(&self.material_name);
        renderer.notify_default_dimensions(self.default_width, self.default_height);
        renderer.set_keep_in_local_space(self.local_space);
        self.renderer_configured = true;
    }

    /// Builds the per-name pools of emitted-emitter clones. The quota is
    /// split evenly (floored) across distinct target names; remainder
    /// slots stay unused.
    fn initialise_emitted_pools(&mut self) {
        if self.emitted_pools_initialised {
            return;
        }
        self.emitted_emitters.clear();
        self.emitted_pools.clear();
        self.active_emitted.clear();

        let mut names: Vec<String> = Vec::new();
        for emitter in &self.emitters {
            let emits = &emitter.state().emits;
            if !emits.is_empty() && !names.contains(emits) {
                names.push(emits.clone());
            }
        }
        if names.is_empty() {
            self.emitted_pools_initialised = true;
            return;
        }

        let per_pool = self.emitted_emitter_quota / names.len();
        for name in names {
            let Some(template) = self
                .emitters
                .iter()
                .position(|e| e.state().name == name)
            else {
                warn!(system = %self.name, target = %name, "emits target has no matching emitter");
                continue;
            };
            self.emitters[template].state_mut().emitted = true;
            let mut slots = Vec::with_capacity(per_pool);
            for _ in 0..per_pool {
                let mut clone = self.emitters[template].clone_box();
                let state = clone.state_mut();
                state.emitted = true;
                // Finite-duration clones wait for their first repeat delay.
                if state.repeats() {
                    state.set_enabled(false);
                }
                self.emitted_emitters.push(clone);
                slots.push(self.emitted_emitters.len() - 1);
            }
            self.emitted_pools.insert(name, slots);
        }
        debug!(
            system = %self.name,
            pools = self.emitted_pools.len(),
            clones = self.emitted_emitters.len(),
            "initialised emitted-emitter pools"
        );
        self.emitted_pools_initialised = true;
    }

    fn expire(&mut self, dt: f32) {
        let mut i = 0;
        while i < self.active.len() {
            let index = self.active[i] as usize;
            if self.pool[index].time_to_live <= dt {
                if let Some(renderer) = self.renderer.as_mut() {
                    renderer.notify_particle_expired(&self.pool[index]);
                }
                if self.pool[index].kind == ParticleKind::Emitter {
                    if let Some(slot) = self.pool[index].emitter_slot {
                        let key = self.emitted_emitters[slot].state().name.clone();
                        if let Some(pool) = self.emitted_pools.get_mut(&key) {
                            pool.push(slot);
                        }
                        if let Some(pos) =
                            self.active_emitted.iter().position(|&s| s == slot)
                        {
                            self.active_emitted.swap_remove(pos);
                        }
                    }
                }
                self.free.push(self.active[i]);
                self.active.swap_remove(i);
            } else {
                self.pool[index].time_to_live -= dt;
                i += 1;
            }
        }
    }

    fn trigger_affectors(&mut self, dt: f32) {
        for affector in &self.affectors {
            for &i in &self.active {
                affector.affect_particle(&mut self.pool[i as usize], dt);
            }
        }
    }

    fn apply_motion(&mut self, dt: f32) {
        for &i in &self.active {
            let particle = &mut self.pool[i as usize];
            particle.position += particle.direction * dt;
            particle.rotation += particle.rotation_speed * dt;
        }
        // Pooled emitters ride on their particles.
        for &i in &self.active {
            let particle = &self.pool[i as usize];
            if let Some(slot) = particle.emitter_slot {
                self.emitted_emitters[slot].state_mut().position = particle.position;
            }
        }
    }

    fn trigger_emitters(&mut self, dt: f32) {
        let mut requests: Vec<(EmitterRef, usize)> = Vec::new();
        let mut total = 0usize;
        for (i, emitter) in self.emitters.iter_mut().enumerate() {
            if emitter.state().emitted {
                continue;
            }
            let count = emitter.emission_count(dt);
            total += count;
            requests.push((EmitterRef::Main(i), count));
        }
        for &slot in &self.active_emitted {
            let count = self.emitted_emitters[slot].emission_count(dt);
            total += count;
            requests.push((EmitterRef::Emitted(slot), count));
        }

        // Under pressure, scale every request proportionally (floored).
        if total > self.free.len() && total > 0 {
            let available = self.free.len();
            for (_, count) in &mut requests {
                *count = *count * available / total;
            }
        }

        for (eref, count) in requests {
            for n in 0..count {
                let Some(index) = self.free.pop() else {
                    return;
                };
                let index_usize = index as usize;
                {
                    let particle = &mut self.pool[index_usize];
                    particle.reset();
                    particle.width = self.default_width;
                    particle.height = self.default_height;
                }
                let (emits, is_main) = match &eref {
                    EmitterRef::Main(i) => {
                        let emitter = &mut self.emitters[*i];
                        emitter.init_particle(&mut self.pool[index_usize]);
                        (emitter.state().emits.clone(), true)
                    }
                    EmitterRef::Emitted(slot) => {
                        let emitter = &mut self.emitted_emitters[*slot];
                        emitter.init_particle(&mut self.pool[index_usize]);
                        (emitter.state().emits.clone(), false)
                    }
                };

                {
                    let particle = &mut self.pool[index_usize];
                    if !self.local_space {
                        // Pooled emitters already sit in world space, so
                        // only their directions need the parent frame.
                        if is_main {
                            particle.position =
                                self.parent_transform.transform_point3(particle.position);
                        }
                        particle.direction =
                            self.parent_transform.transform_vector3(particle.direction);
                    }
                    // Smear emissions across the step.
                    let fraction = if count > 1 {
                        dt * (n as f32) / (count as f32)
                    } else {
                        0.0
                    };
                    particle.position += particle.direction * fraction;
                }

                if !emits.is_empty() {
                    let slot = self
                        .emitted_pools
                        .get_mut(&emits)
                        .and_then(Vec::pop);
                    let Some(slot) = slot else {
                        // Emitted pool exhausted; give the slot back.
                        self.free.push(index);
                        continue;
                    };
                    {
                        let particle = &mut self.pool[index_usize];
                        particle.kind = ParticleKind::Emitter;
                        particle.emitter_slot = Some(slot);
                    }
                    self.active_emitted.push(slot);
                    let position = self.pool[index_usize].position;
                    let state = self.emitted_emitters[slot].state_mut();
                    state.position = position;
                    if !state.repeats() {
                        state.set_enabled(true);
                    }
                }
                for affector in &self.affectors {
                    affector.init_particle(&mut self.pool[index_usize]);
                }
                self.active.push(index);
                if let Some(renderer) = self.renderer.as_mut() {
                    renderer.notify_particle_emitted(&self.pool[index_usize]);
                }
            }
        }
    }

    fn update_bounds(&mut self, dt: f32) {
        let windowed = !self.bounds_auto_update && self.bounds_update_time > 0.0;
        if !self.bounds_auto_update && !windowed {
            return;
        }
        let mut bounds = if self.bounds_auto_update {
            Aabb::NULL
        } else {
            self.bounds
        };
        let default_half = self.default_width.max(self.default_height) * 0.5;
        for &i in &self.active {
            let particle = &self.pool[i as usize];
            let half = particle.max_dimension(default_half * 2.0) * 0.5;
            bounds.merge_point(particle.position - Vec3::splat(half));
            bounds.merge_point(particle.position + Vec3::splat(half));
        }
        if !self.local_space && !bounds.is_null() {
            // Positions are world-space; bounds are kept in parent-local.
            bounds = bounds.transformed(&self.parent_transform.inverse());
        }
        self.bounds = bounds;
        if windowed {
            self.bounds_update_time = (self.bounds_update_time - dt).max(0.0);
        }
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.notify_bounds(&self.bounds);
        }
    }

    /// Orders the active list for the camera, honouring the renderer's
    /// requested sort mode. Camera vectors are given in world space and
    /// converted when particles live in local space.
    pub fn sort_particles(&mut self, camera_position: Vec3, camera_direction: Vec3) {
        if !self.sorting_enabled {
            return;
        }
        let mode = self
            .renderer
            .as_ref()
            .map_or(SortMode::None, |r| r.sort_mode());
        if mode == SortMode::None {
            return;
        }
        let (cam_pos, cam_dir) = if self.local_space {
            let inverse = self.parent_transform.inverse();
            (
                inverse.transform_point3(camera_position),
                inverse.transform_vector3(camera_direction),
            )
        } else {
            (camera_position, camera_direction)
        };
        let pool = &self.pool;
        match mode {
            SortMode::Distance => self.sorter.sort(&mut self.active, |i| {
                -(cam_pos - pool[i as usize].position).length_squared()
            }),
            SortMode::Direction => self
                .sorter
                .sort(&mut self.active, |i| -cam_dir.dot(pool[i as usize].position)),
            SortMode::None => {}
        }
    }

    /// A configuration copy under a new name: emitters, affectors, quotas,
    /// material, and flags, with a fresh empty pool.
    #[must_use]
    pub fn duplicate(&self, name: impl Into<String>) -> Self {
        let mut copy = Self::new(name, self.resource_group.clone());
        copy.material_name = self.material_name.clone();
        copy.default_width = self.default_width;
        copy.default_height = self.default_height;
        copy.quota = self.quota;
        copy.emitted_emitter_quota = self.emitted_emitter_quota;
        copy.speed_factor = self.speed_factor;
        copy.iteration_interval = self.iteration_interval;
        copy.non_visible_timeout = self.non_visible_timeout;
        copy.local_space = self.local_space;
        copy.sorting_enabled = self.sorting_enabled;
        copy.emitting = self.emitting;
        copy.emitters = self.emitters.iter().map(|e| e.clone_box()).collect();
        copy.affectors = self.affectors.iter().map(|a| a.clone_box()).collect();
        copy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emitter::PointEmitter;
    use crate::renderer::RecordingRenderer;

    fn point_emitter(rate: f32, position: Vec3, speed: f32) -> Box<PointEmitter> {
        let mut emitter = PointEmitter::default();
        emitter.state.emission_rate = rate;
        emitter.state.position = position;
        emitter.state.min_speed = speed;
        emitter.state.max_speed = speed;
        Box::new(emitter)
    }

    fn assert_pool_conserved(system: &ParticleSystem) {
        assert_eq!(
            system.active_count() + system.free_count(),
            system.pool_size()
        );
    }

    #[test]
    fn test_quota_pressure_scales_requests_proportionally() {
        let mut system = ParticleSystem::new("smoke", "General");
        system.quota = 4;
        system.set_keep_particles_in_local_space(true);
        // Two emitters each asking for 3 particles this step.
        system.add_emitter(point_emitter(30.0, Vec3::new(-10.0, 0.0, 0.0), 0.0));
        system.add_emitter(point_emitter(30.0, Vec3::new(10.0, 0.0, 0.0), 0.0));
        system.update(0.1);

        assert_eq!(system.active_count(), 4);
        assert_eq!(system.free_count(), 0);
        let left = system
            .active_particles()
            .filter(|p| p.position.x < 0.0)
            .count();
        let right = system
            .active_particles()
            .filter(|p| p.position.x > 0.0)
            .count();
        assert_eq!(left, 2);
        assert_eq!(right, 2);
    }

    #[test]
    fn test_pool_conserved_across_expiry_cycles() {
        let mut system = ParticleSystem::new("sparks", "General");
        system.set_particle_quota(16);
        let mut emitter = point_emitter(40.0, Vec3::ZERO, 1.0);
        emitter.state.min_ttl = 0.17;
        emitter.state.max_ttl = 0.17;
        system.add_emitter(emitter);

        for _ in 0..40 {
            system.update(0.05);
            assert_pool_conserved(&system);
            for p in system.active_particles() {
                assert!(p.time_to_live > 0.0);
            }
        }
        assert!(system.active_count() > 0);
        assert!(system.free_count() > 0);
    }

    #[test]
    fn test_clear_returns_all_particles() {
        let mut system = ParticleSystem::new("burst", "General");
        system.add_emitter(point_emitter(50.0, Vec3::ZERO, 1.0));
        system.update(0.1);
        assert!(system.active_count() > 0);
        system.clear();
        assert_eq!(system.active_count(), 0);
        assert_eq!(system.free_count(), system.pool_size());
    }

    #[test]
    fn test_iteration_interval_steps_fixed() {
        let mut system = ParticleSystem::new("steady", "General");
        system.set_iteration_interval(0.1);
        system.add_emitter(point_emitter(10.0, Vec3::ZERO, 0.0));
        // 0.35 s covers three whole 0.1 s steps; the rest carries over.
        system.update(0.35);
        assert_eq!(system.active_count(), 3);
        // The carry plus 0.15 s makes 0.5 s total, five steps in all.
        system.update(0.15);
        assert_eq!(system.active_count(), 5);
    }

    #[test]
    fn test_non_visible_timeout_skips_updates() {
        let mut system = ParticleSystem::new("offscreen", "General");
        system.set_non_visible_update_timeout(1.0);
        system.add_emitter(point_emitter(10.0, Vec3::ZERO, 0.0));

        system.set_visible(false);
        system.update(0.6);
        let seen = system.active_count();
        assert!(seen > 0);
        // Accumulated invisibility passes the timeout; this update is
        // skipped entirely.
        system.update(0.6);
        assert_eq!(system.active_count(), seen);

        system.set_visible(true);
        system.update(0.1);
        assert!(system.active_count() > seen);
    }

    #[test]
    fn test_emitted_emitters_cascade() {
        let mut system = ParticleSystem::new("fireworks", "General");
        system.set_particle_quota(32);
        system.set_keep_particles_in_local_space(true);
        let mut shell = point_emitter(10.0, Vec3::ZERO, 0.0);
        shell.state.name = "shell".into();
        shell.state.emits = "spark".into();
        let mut spark = point_emitter(10.0, Vec3::ZERO, 0.0);
        spark.state.name = "spark".into();
        system.add_emitter(shell);
        system.add_emitter(spark);

        // First update: only the shell emits, producing one carrier.
        system.update(0.1);
        assert_eq!(system.active_count(), 1);
        let carriers = system
            .active_particles()
            .filter(|p| p.kind == ParticleKind::Emitter)
            .count();
        assert_eq!(carriers, 1);
        assert_eq!(system.active_emitted.len(), 1);

        // Second update: the pooled spark emits alongside a new carrier.
        system.update(0.1);
        assert_eq!(system.active_count(), 3);
        let visuals = system
            .active_particles()
            .filter(|p| p.kind == ParticleKind::Visual)
            .count();
        assert_eq!(visuals, 1);
        assert_pool_conserved(&system);
    }

    #[test]
    fn test_bounds_pad_half_max_dimension() {
        let mut system = ParticleSystem::new("bounded", "General");
        system.set_keep_particles_in_local_space(true);
        system.set_default_dimensions(2.0, 2.0);
        system.add_emitter(point_emitter(10.0, Vec3::ZERO, 0.0));
        system.update(0.1);

        let bounds = system.bounds();
        assert!(!bounds.is_null());
        assert_eq!(bounds.min(), Vec3::splat(-1.0));
        assert_eq!(bounds.max(), Vec3::splat(1.0));
    }

    #[test]
    fn test_world_transform_applied_at_emission() {
        let mut system = ParticleSystem::new("attached", "General");
        system.set_parent_transform(Affine3A::from_translation(Vec3::new(5.0, 0.0, 0.0)));
        system.add_emitter(point_emitter(10.0, Vec3::ZERO, 0.0));
        system.update(0.1);

        let particle = system.active_particles().next().expect("one particle");
        assert_eq!(particle.position, Vec3::new(5.0, 0.0, 0.0));
        // Bounds come back in the parent's local frame.
        assert!(system.bounds().center().length() < 1e-4);
    }

    #[test]
    fn test_fast_forward_prewarms() {
        let mut system = ParticleSystem::new("prewarmed", "General");
        system.add_emitter(point_emitter(10.0, Vec3::ZERO, 1.0));
        system.fast_forward(1.0, 0.1);
        assert_eq!(system.active_count(), 10);
    }

    #[test]
    fn test_set_emitting_stops_new_particles() {
        let mut system = ParticleSystem::new("paused", "General");
        system.add_emitter(point_emitter(10.0, Vec3::ZERO, 1.0));
        system.update(0.1);
        let count = system.active_count();
        system.set_emitting(false);
        system.update(0.1);
        assert_eq!(system.active_count(), count);
    }

    #[test]
    fn test_duplicate_copies_configuration_not_state() {
        let mut system = ParticleSystem::new("template", "General");
        system.set_particle_quota(20);
        system.set_material_name("Flames");
        system.add_emitter(point_emitter(10.0, Vec3::ZERO, 1.0));
        system.update(0.5);
        assert!(system.active_count() > 0);

        let copy = system.duplicate("instance");
        assert_eq!(copy.name(), "instance");
        assert_eq!(copy.material_name(), "Flames");
        assert_eq!(copy.particle_quota(), 20);
        assert_eq!(copy.emitter_count(), 1);
        assert_eq!(copy.active_count(), 0);
    }

    #[test]
    fn test_renderer_tallies_traffic() {
        let mut system = ParticleSystem::new("watched", "General");
        system.set_keep_particles_in_local_space(true);
        system.set_material_name("Sparks");
        let recorder = RecordingRenderer::new(SortMode::None);
        let events = recorder.events();
        system.set_renderer(Box::new(recorder));
        let mut emitter = point_emitter(10.0, Vec3::ZERO, 0.0);
        emitter.state.min_ttl = 0.25;
        emitter.state.max_ttl = 0.25;
        system.add_emitter(emitter);

        // One particle per update; the first one expires on the fourth.
        for _ in 0..4 {
            system.update(0.1);
        }
        let seen = events.lock().clone();
        assert_eq!(seen.quota, 10);
        assert_eq!(seen.material, "Sparks");
        assert_eq!(seen.emitted, 4);
        assert_eq!(seen.expired, 1);
        assert_eq!(seen.moved_calls, 4);
        assert_eq!(seen.last_active, 3);
        assert!(seen.bounds.is_some());

        system.clear();
        assert_eq!(events.lock().cleared, 1);
    }

    #[test]
    fn test_sort_orders_farthest_first() {
        let mut system = ParticleSystem::new("sorted", "General");
        system.set_keep_particles_in_local_space(true);
        system.set_sorting_enabled(true);
        system.set_renderer(Box::new(RecordingRenderer::new(SortMode::Distance)));
        system.add_emitter(point_emitter(10.0, Vec3::new(0.0, 0.0, 1.0), 0.0));
        system.add_emitter(point_emitter(10.0, Vec3::new(0.0, 0.0, 10.0), 0.0));
        system.update(0.1);
        assert_eq!(system.active_count(), 2);

        system.sort_particles(Vec3::ZERO, Vec3::Z);
        let positions: Vec<Vec3> = system.active_particles().map(|p| p.position).collect();
        assert_eq!(positions[0].z, 10.0);
        assert_eq!(positions[1].z, 1.0);
    }
}
