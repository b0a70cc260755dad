//! The particle system manager: factory registries, named templates, and
//! system instantiation.

use std::sync::Arc;

use ahash::AHashMap;
use parking_lot::Mutex;
use tracing::{debug, warn};

use ember_assets::ResourceGroupManager;
use ember_common::{EmberError, EmberResult};

use crate::affector::{
    AffectorFactory, ColourFaderAffectorFactory, LinearForceAffectorFactory, ParticleAffector,
    ScalerAffectorFactory,
};
use crate::emitter::{BoxEmitterFactory, EmitterFactory, ParticleEmitter, PointEmitterFactory};
use crate::system::ParticleSystem;

/// Material drawn when a template names one that no resource group holds.
pub const DEFAULT_MATERIAL: &str = "BaseWhite";

/// Registry of emitter and affector factories plus the template library.
///
/// Templates are fully configured systems held by name; instantiating one
/// deep-copies its configuration into a fresh system with an empty pool.
pub struct ParticleSystemManager {
    emitter_factories: Mutex<AHashMap<String, Arc<dyn EmitterFactory>>>,
    affector_factories: Mutex<AHashMap<String, Arc<dyn AffectorFactory>>>,
    templates: Mutex<AHashMap<String, ParticleSystem>>,
    group_manager: Mutex<Option<Arc<ResourceGroupManager>>>,
    default_iteration_interval: Mutex<f32>,
    default_non_visible_timeout: Mutex<f32>,
}

impl Default for ParticleSystemManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ParticleSystemManager {
    /// A manager with the built-in emitter and affector types registered.
    #[must_use]
    pub fn new() -> Self {
        let manager = Self {
            emitter_factories: Mutex::new(AHashMap::new()),
            affector_factories: Mutex::new(AHashMap::new()),
            templates: Mutex::new(AHashMap::new()),
            group_manager: Mutex::new(None),
            default_iteration_interval: Mutex::new(0.0),
            default_non_visible_timeout: Mutex::new(0.0),
        };
        manager.register_emitter_factory(Arc::new(PointEmitterFactory));
        manager.register_emitter_factory(Arc::new(BoxEmitterFactory));
        manager.register_affector_factory(Arc::new(LinearForceAffectorFactory));
        manager.register_affector_factory(Arc::new(ColourFaderAffectorFactory));
        manager.register_affector_factory(Arc::new(ScalerAffectorFactory));
        manager
    }

    /// Connects the asset layer used to resolve template materials.
    pub fn set_resource_group_manager(&self, groups: Arc<ResourceGroupManager>) {
        *self.group_manager.lock() = Some(groups);
    }

    // ------------------------------------------------------------------
    // Factories
    // ------------------------------------------------------------------

    /// Registers (or replaces) an emitter factory under its type tag.
    pub fn register_emitter_factory(&self, factory: Arc<dyn EmitterFactory>) {
        let tag = factory.type_name().to_owned();
        debug!(%tag, "registered emitter factory");
        self.emitter_factories.lock().insert(tag, factory);
    }

    /// Registers (or replaces) an affector factory under its type tag.
    pub fn register_affector_factory(&self, factory: Arc<dyn AffectorFactory>) {
        let tag = factory.type_name().to_owned();
        debug!(%tag, "registered affector factory");
        self.affector_factories.lock().insert(tag, factory);
    }

    /// Creates an emitter of the tagged type with default parameters.
    pub fn create_emitter(&self, type_tag: &str) -> EmberResult<Box<dyn ParticleEmitter>> {
        self.emitter_factories
            .lock()
            .get(type_tag)
            .map(|f| f.create())
            .ok_or_else(|| {
                EmberError::InvalidParameters(format!("no emitter type registered as '{type_tag}'"))
            })
    }

    /// Creates an affector of the tagged type with default parameters.
    pub fn create_affector(&self, type_tag: &str) -> EmberResult<Box<dyn ParticleAffector>> {
        self.affector_factories
            .lock()
            .get(type_tag)
            .map(|f| f.create())
            .ok_or_else(|| {
                EmberError::InvalidParameters(format!(
                    "no affector type registered as '{type_tag}'"
                ))
            })
    }

    /// Registered emitter type tags.
    #[must_use]
    pub fn emitter_types(&self) -> Vec<String> {
        self.emitter_factories.lock().keys().cloned().collect()
    }

    /// Registered affector type tags.
    #[must_use]
    pub fn affector_types(&self) -> Vec<String> {
        self.affector_factories.lock().keys().cloned().collect()
    }

    // ------------------------------------------------------------------
    // Templates
    // ------------------------------------------------------------------

    /// Stores a configured system as a template under its own name.
    pub fn add_template(&self, template: ParticleSystem) -> EmberResult<()> {
        let mut templates = self.templates.lock();
        let name = template.name().to_owned();
        if templates.contains_key(&name) {
            return Err(EmberError::DuplicateItem(format!(
                "particle system template '{name}' already exists"
            )));
        }
        templates.insert(name, template);
        Ok(())
    }

    /// Creates an empty template belonging to a resource group.
    pub fn create_template(
        &self,
        name: &str,
        resource_group: &str,
    ) -> EmberResult<()> {
        self.add_template(ParticleSystem::new(name, resource_group))
    }

    /// Runs `f` against a stored template, e.g. to configure it in place.
    pub fn with_template<R>(
        &self,
        name: &str,
        f: impl FnOnce(&mut ParticleSystem) -> R,
    ) -> EmberResult<R> {
        let mut templates = self.templates.lock();
        let template = templates.get_mut(name).ok_or_else(|| {
            EmberError::ItemNotFound(format!("no particle system template '{name}'"))
        })?;
        Ok(f(template))
    }

    /// Whether a template is stored under `name`.
    #[must_use]
    pub fn has_template(&self, name: &str) -> bool {
        self.templates.lock().contains_key(name)
    }

    /// Drops a stored template.
    pub fn remove_template(&self, name: &str) {
        self.templates.lock().remove(name);
    }

    /// Drops every stored template.
    pub fn remove_all_templates(&self) {
        self.templates.lock().clear();
    }

    /// Stored template names.
    #[must_use]
    pub fn template_names(&self) -> Vec<String> {
        self.templates.lock().keys().cloned().collect()
    }

    // ------------------------------------------------------------------
    // Instantiation
    // ------------------------------------------------------------------

    /// Instantiates a named system from a template. The copy gets its own
    /// empty pool, the manager defaults for stepping and visibility, and a
    /// resolved material.
    pub fn create_system(&self, name: &str, template_name: &str) -> EmberResult<ParticleSystem> {
        let mut system = {
            let templates = self.templates.lock();
            let template = templates.get(template_name).ok_or_else(|| {
                EmberError::ItemNotFound(format!("no particle system template '{template_name}'"))
            })?;
            template.duplicate(name)
        };
        system.set_iteration_interval(*self.default_iteration_interval.lock());
        system.set_non_visible_update_timeout(*self.default_non_visible_timeout.lock());
        self.resolve_material(&mut system);
        Ok(system)
    }

    /// Substitutes the default material when the named one is missing from
    /// every resource group. This is deliberately a recovery, not an
    /// error: a particle system with a placeholder material is still
    /// useful, and the miss is logged.
    fn resolve_material(&self, system: &mut ParticleSystem) {
        let material = system.material_name().to_owned();
        if material.is_empty() {
            system.set_material_name(DEFAULT_MATERIAL);
            return;
        }
        let Some(groups) = self.group_manager.lock().clone() else {
            return;
        };
        if !groups.resource_exists_in_any_group(&material) {
            warn!(
                system = %system.name(),
                %material,
                "material not found in any resource group, using default"
            );
            system.set_material_name(DEFAULT_MATERIAL);
        }
    }

    // ------------------------------------------------------------------
    // Defaults
    // ------------------------------------------------------------------

    /// Fixed step applied to systems created after this call; 0 steps
    /// per-frame.
    pub fn set_default_iteration_interval(&self, seconds: f32) {
        *self.default_iteration_interval.lock() = seconds;
    }

    /// The default fixed step.
    #[must_use]
    pub fn default_iteration_interval(&self) -> f32 {
        *self.default_iteration_interval.lock()
    }

    /// Non-visible timeout applied to systems created after this call.
    pub fn set_default_non_visible_update_timeout(&self, seconds: f32) {
        *self.default_non_visible_timeout.lock() = seconds;
    }

    /// The default non-visible timeout.
    #[must_use]
    pub fn default_non_visible_update_timeout(&self) -> f32 {
        *self.default_non_visible_timeout.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_assets::MemoryArchive;
    use glam::Vec3;

    use crate::emitter::PointEmitter;

    #[test]
    fn test_builtin_factories_registered() {
        let manager = ParticleSystemManager::new();
        assert!(manager.create_emitter("Point").is_ok());
        assert!(manager.create_emitter("Box").is_ok());
        assert!(manager.create_affector("LinearForce").is_ok());
        assert!(manager.create_affector("ColourFader").is_ok());
        assert!(manager.create_affector("Scaler").is_ok());
    }

    #[test]
    fn test_unknown_type_tag_is_invalid_parameters() {
        let manager = ParticleSystemManager::new();
        assert!(matches!(
            manager.create_emitter("Ring"),
            Err(EmberError::InvalidParameters(_))
        ));
        assert!(matches!(
            manager.create_affector("Vortex"),
            Err(EmberError::InvalidParameters(_))
        ));
    }

    #[test]
    fn test_duplicate_template_rejected() {
        let manager = ParticleSystemManager::new();
        manager.create_template("smoke", "General").expect("create");
        assert!(matches!(
            manager.create_template("smoke", "General"),
            Err(EmberError::DuplicateItem(_))
        ));
    }

    #[test]
    fn test_create_system_is_a_deep_copy() {
        let manager = ParticleSystemManager::new();
        manager.create_template("smoke", "General").expect("create");
        manager
            .with_template("smoke", |template| {
                template.set_particle_quota(64);
                let mut emitter = PointEmitter::default();
                emitter.state.emission_rate = 25.0;
                template.add_emitter(Box::new(emitter));
            })
            .expect("configure");

        let mut system = manager.create_system("campfire", "smoke").expect("create");
        assert_eq!(system.name(), "campfire");
        assert_eq!(system.particle_quota(), 64);
        assert_eq!(system.emitter_count(), 1);

        // Mutating the instance leaves the template untouched.
        if let Some(emitter) = system.emitter_mut(0) {
            emitter.state_mut().emission_rate = 1.0;
        }
        let template_rate = manager
            .with_template("smoke", |t| {
                t.emitter(0).map(|e| e.state().emission_rate)
            })
            .expect("template");
        assert_eq!(template_rate, Some(25.0));
    }

    #[test]
    fn test_missing_template_is_item_not_found() {
        let manager = ParticleSystemManager::new();
        assert!(matches!(
            manager.create_system("x", "absent"),
            Err(EmberError::ItemNotFound(_))
        ));
    }

    #[test]
    fn test_missing_material_falls_back_to_default() {
        let groups = Arc::new(ResourceGroupManager::new());
        let archive = Arc::new(MemoryArchive::new("materials", true));
        archive.add_file("Flames.material", b"material Flames {}".to_vec());
        groups.archive_manager().add_archive(archive);
        groups
            .add_resource_location("materials", "Memory", "General", true, true)
            .expect("location");

        let manager = ParticleSystemManager::new();
        manager.set_resource_group_manager(Arc::clone(&groups));

        manager.create_template("fire", "General").expect("create");
        manager
            .with_template("fire", |t| t.set_material_name("Flames.material"))
            .expect("configure");
        let system = manager.create_system("lit", "fire").expect("create");
        assert_eq!(system.material_name(), "Flames.material");

        manager.create_template("mist", "General").expect("create");
        manager
            .with_template("mist", |t| t.set_material_name("Missing.material"))
            .expect("configure");
        let system = manager.create_system("foggy", "mist").expect("create");
        assert_eq!(system.material_name(), DEFAULT_MATERIAL);
    }

    #[test]
    fn test_defaults_applied_to_new_systems() {
        let manager = ParticleSystemManager::new();
        manager.set_default_iteration_interval(0.05);
        manager.create_template("steady", "General").expect("create");
        manager
            .with_template("steady", |t| {
                let mut emitter = PointEmitter::default();
                emitter.state.position = Vec3::ZERO;
                t.add_emitter(Box::new(emitter));
            })
            .expect("configure");

        let mut system = manager.create_system("instance", "steady").expect("create");
        // Two fixed 0.05 s steps inside one 0.1 s frame.
        system.update(0.1);
        assert_eq!(system.active_count(), 1);
    }
}
