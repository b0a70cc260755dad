//! Resources, their managers, and script loaders.
//!
//! A [`Resource`] is a named object whose data comes from a group-resolved
//! stream. Concrete kinds (textures, meshes, ...) live behind a
//! [`ResourceManager`] registered with the group manager under a type tag.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use ember_common::EmberResult;

use crate::stream::DataStream;

/// Shared, lockable handle to a resource.
pub type ResourceHandle = Arc<Mutex<dyn Resource>>;

/// Lifecycle states a resource moves through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadingState {
    /// Nothing staged or loaded.
    #[default]
    Unloaded,
    /// Data staged but not yet usable.
    Prepared,
    /// Fully loaded.
    Loaded,
}

/// A named, loadable object owned by one resource group.
pub trait Resource: Send {
    /// Resource name, unique within its manager.
    fn name(&self) -> &str;

    /// Name of the group this resource belongs to.
    fn group(&self) -> &str;

    /// Reassigns the owning group. Called during group migration; the group
    /// manager keeps its own bookkeeping in sync.
    fn set_group(&mut self, group: String);

    /// Type tag of the manager that owns this resource.
    fn resource_type(&self) -> &str;

    /// Current lifecycle state.
    fn state(&self) -> LoadingState;

    /// Whether [`Resource::load`] may be called again after an unload.
    fn is_reloadable(&self) -> bool {
        true
    }

    /// Stages data without making the resource usable. No-op by default.
    fn prepare(&mut self) -> EmberResult<()> {
        Ok(())
    }

    /// Loads the resource. Must be a no-op when already loaded.
    fn load(&mut self) -> EmberResult<()>;

    /// Unloads the resource, releasing its data.
    fn unload(&mut self) -> EmberResult<()>;

    /// Whether the resource is fully loaded.
    fn is_loaded(&self) -> bool {
        self.state() == LoadingState::Loaded
    }
}

/// Supplies resource data from outside the archive system.
pub trait ManualResourceLoader: Send + Sync {
    /// Fills in `resource` during load.
    fn load_resource(&self, resource: &mut dyn Resource) -> EmberResult<()>;
}

/// A resource declared ahead of creation, instantiated when its group is
/// initialised.
#[derive(Clone)]
pub struct ResourceDeclaration {
    /// Resource name.
    pub name: String,
    /// Type tag selecting the [`ResourceManager`].
    pub resource_type: String,
    /// Optional manual loader to invoke instead of stream loading.
    pub loader: Option<Arc<dyn ManualResourceLoader>>,
    /// Free-form creation parameters.
    pub parameters: HashMap<String, String>,
}

/// Creates and tracks resources of one type.
///
/// `create` must register the new resource with the group manager via
/// `ResourceGroupManager::notify_resource_created` so it lands in its
/// group's load-order bucket.
pub trait ResourceManager: Send + Sync {
    /// The type tag, e.g. `"Texture"`.
    fn resource_type(&self) -> &str;

    /// Relative order in which groups load this type; lower loads first.
    fn loading_order(&self) -> f32;

    /// Creates a resource. Fails with `DuplicateItem` if the name is taken.
    fn create(
        &self,
        name: &str,
        group: &str,
        loader: Option<Arc<dyn ManualResourceLoader>>,
        parameters: &HashMap<String, String>,
    ) -> EmberResult<ResourceHandle>;

    /// Looks up a resource by name.
    fn get(&self, name: &str) -> Option<ResourceHandle>;

    /// Removes a resource by name, unloading it first.
    fn remove(&self, name: &str);

    /// Removes every resource this manager owns.
    fn remove_all(&self);
}

/// Parses declaration scripts discovered during group initialisation.
pub trait ScriptLoader: Send + Sync {
    /// Relative order among script loaders; lower parses first.
    fn loading_order(&self) -> f32 {
        100.0
    }

    /// Filename patterns this loader claims, e.g. `["*.material"]`.
    fn script_patterns(&self) -> Vec<String>;

    /// Parses one script on behalf of `group`.
    fn parse_script(&self, stream: &mut dyn DataStream, group: &str) -> EmberResult<()>;
}
