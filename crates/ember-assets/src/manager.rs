//! The resource group manager.
//!
//! Central service that owns the named groups, routes resource creation to
//! the registered [`ResourceManager`]s, resolves filenames to archive
//! streams, and drives group initialisation and loading with listener
//! progress callbacks.
//!
//! All methods take `&self`; internal state sits behind a mutex that is
//! never held across calls into resources, script loaders, or listeners,
//! so those callbacks may re-enter the manager (declaring or creating
//! further resources mid-load).

use std::collections::HashMap;
use std::sync::Arc;
use std::time::SystemTime;

use ahash::AHashMap;
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use ember_common::{EmberError, EmberResult};

use crate::archive::{ArchiveManager, FileInfo};
use crate::group::{GroupStatus, Location, ResourceGroup};
use crate::listener::{ListenerHandle, LoadingListener, ResourceGroupListener};
use crate::resource::{
    ManualResourceLoader, ResourceDeclaration, ResourceHandle, ResourceManager, ScriptLoader,
};
use crate::stream::{DataStream, MemoryStream, SharedStream};

/// Group resources land in when no group is named.
pub const DEFAULT_GROUP: &str = "General";
/// Group for engine-internal resources, skipped by bulk operations.
pub const INTERNAL_GROUP: &str = "Internal";
/// Pseudo-group whose resources migrate to whichever group provides their
/// data stream.
pub const AUTODETECT_GROUP: &str = "Autodetect";

/// File streams at or below this size are buffered into memory before
/// script parsing, so parsers can seek freely.
const SCRIPT_BUFFER_LIMIT: u64 = 1024 * 1024;

struct CurrentLoad {
    group: String,
    cascades: Vec<ResourceHandle>,
}

struct Inner {
    groups: AHashMap<String, ResourceGroup>,
    /// Insertion order, used for cross-group searches.
    group_order: Vec<String>,
    resource_managers: AHashMap<String, Arc<dyn ResourceManager>>,
    script_loaders: Vec<Arc<dyn ScriptLoader>>,
    listeners: Vec<ListenerHandle>,
    loading_listener: Option<Arc<dyn LoadingListener>>,
    world_group: String,
    current_load: Option<CurrentLoad>,
}

impl Inner {
    fn group(&self, name: &str) -> EmberResult<&ResourceGroup> {
        self.groups
            .get(name)
            .ok_or_else(|| EmberError::ItemNotFound(format!("resource group '{name}' not found")))
    }

    fn group_mut(&mut self, name: &str) -> EmberResult<&mut ResourceGroup> {
        self.groups
            .get_mut(name)
            .ok_or_else(|| EmberError::ItemNotFound(format!("resource group '{name}' not found")))
    }

    fn add_group(&mut self, name: &str, in_global_pool: bool) {
        self.groups
            .insert(name.to_string(), ResourceGroup::new(name, in_global_pool));
        self.group_order.push(name.to_string());
    }
}

/// Owns every resource group. See the module docs for threading rules.
pub struct ResourceGroupManager {
    archive_manager: Arc<ArchiveManager>,
    inner: Mutex<Inner>,
}

impl Default for ResourceGroupManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceGroupManager {
    /// A manager with the three built-in groups created.
    #[must_use]
    pub fn new() -> Self {
        let mut inner = Inner {
            groups: AHashMap::new(),
            group_order: Vec::new(),
            resource_managers: AHashMap::new(),
            script_loaders: Vec::new(),
            listeners: Vec::new(),
            loading_listener: None,
            world_group: DEFAULT_GROUP.to_string(),
            current_load: None,
        };
        inner.add_group(DEFAULT_GROUP, true);
        inner.add_group(INTERNAL_GROUP, true);
        inner.add_group(AUTODETECT_GROUP, true);
        Self {
            archive_manager: Arc::new(ArchiveManager::new()),
            inner: Mutex::new(inner),
        }
    }

    /// The archive registry backing all locations.
    #[must_use]
    pub fn archive_manager(&self) -> &Arc<ArchiveManager> {
        &self.archive_manager
    }

    // ------------------------------------------------------------------
    // Group lifecycle
    // ------------------------------------------------------------------

    /// Creates an empty group.
    pub fn create_resource_group(&self, name: &str, in_global_pool: bool) -> EmberResult<()> {
        let mut inner = self.inner.lock();
        if inner.groups.contains_key(name) {
            return Err(EmberError::DuplicateItem(format!(
                "resource group '{name}' already exists"
            )));
        }
        info!(group = name, in_global_pool, "created resource group");
        inner.add_group(name, in_global_pool);
        Ok(())
    }

    /// Whether the named group exists.
    #[must_use]
    pub fn resource_group_exists(&self, name: &str) -> bool {
        self.inner.lock().groups.contains_key(name)
    }

    /// Names of all groups, in creation order.
    #[must_use]
    pub fn resource_group_names(&self) -> Vec<String> {
        self.inner.lock().group_order.clone()
    }

    /// Current lifecycle status of a group.
    pub fn group_status(&self, name: &str) -> EmberResult<GroupStatus> {
        Ok(self.inner.lock().group(name)?.status)
    }

    /// Whether the group has been initialised (or loaded).
    pub fn is_group_initialised(&self, name: &str) -> EmberResult<bool> {
        Ok(matches!(
            self.group_status(name)?,
            GroupStatus::Initialised | GroupStatus::Loaded
        ))
    }

    /// Whether the group is fully loaded.
    pub fn is_group_loaded(&self, name: &str) -> EmberResult<bool> {
        Ok(self.group_status(name)? == GroupStatus::Loaded)
    }

    /// Parses scripts and instantiates declared resources.
    pub fn initialise_resource_group(&self, name: &str) -> EmberResult<()> {
        let declarations = {
            let mut inner = self.inner.lock();
            let group = inner.group_mut(name)?;
            if group.status != GroupStatus::Uninitialised {
                return Ok(());
            }
            group.status = GroupStatus::Initialising;
            group.declarations.clone()
        };
        info!(group = name, "initialising resource group");

        self.parse_resource_group_scripts(name)?;

        // Scripts may have added declarations of their own.
        let declarations = {
            let inner = self.inner.lock();
            let group = inner.group(name)?;
            let mut all = declarations;
            for decl in &group.declarations {
                if !all.iter().any(|d| d.name == decl.name) {
                    all.push(decl.clone());
                }
            }
            all
        };

        for decl in declarations {
            let manager = self.resource_manager(&decl.resource_type)?;
            manager.create(&decl.name, name, decl.loader.clone(), &decl.parameters)?;
        }

        self.inner.lock().group_mut(name)?.status = GroupStatus::Initialised;
        Ok(())
    }

    /// Initialises every group still uninitialised.
    pub fn initialise_all_resource_groups(&self) -> EmberResult<()> {
        for name in self.resource_group_names() {
            self.initialise_resource_group(&name)?;
        }
        Ok(())
    }

    /// Loads every created resource in the group, walking buckets in
    /// ascending manager loading order. Resources created during the load
    /// (cascades) are appended to the bucket being iterated.
    pub fn load_resource_group(&self, name: &str) -> EmberResult<()> {
        let (buckets, announced) = {
            let mut inner = self.inner.lock();
            let group = inner.group_mut(name)?;
            let buckets: Vec<Vec<ResourceHandle>> =
                group.buckets.values().cloned().collect();
            let announced = group.resource_count() + group.custom_stage_count;
            let group_name = group.name.clone();
            inner.current_load = Some(CurrentLoad {
                group: group_name,
                cascades: Vec::new(),
            });
            (buckets, announced)
        };
        info!(group = name, resources = announced, "loading resource group");
        self.fire(|l| l.group_load_started(name, announced));

        let result = self.run_load_buckets(buckets);
        self.inner.lock().current_load = None;
        result?;

        self.inner.lock().group_mut(name)?.status = GroupStatus::Loaded;
        self.fire(|l| l.group_load_ended(name));
        Ok(())
    }

    fn run_load_buckets(&self, buckets: Vec<Vec<ResourceHandle>>) -> EmberResult<()> {
        for bucket in buckets {
            let mut worklist = bucket;
            let mut i = 0;
            while i < worklist.len() {
                let handle = Arc::clone(&worklist[i]);
                let resource_name = handle.lock().name().to_string();
                self.fire(|l| l.resource_load_started(&resource_name));
                handle.lock().load()?;
                self.fire(|l| l.resource_load_ended());
                // Cascaded creations extend the bucket currently iterated.
                if let Some(current) = self.inner.lock().current_load.as_mut() {
                    worklist.append(&mut current.cascades);
                }
                i += 1;
            }
        }
        Ok(())
    }

    /// Prepares (stages without loading) every created resource.
    pub fn prepare_resource_group(&self, name: &str) -> EmberResult<()> {
        let (handles, announced) = {
            let inner = self.inner.lock();
            let group = inner.group(name)?;
            let handles: Vec<ResourceHandle> =
                group.buckets.values().flatten().map(Arc::clone).collect();
            let announced = handles.len();
            (handles, announced)
        };
        self.fire(|l| l.group_prepare_started(name, announced));
        for handle in handles {
            let resource_name = handle.lock().name().to_string();
            self.fire(|l| l.resource_prepare_started(&resource_name));
            handle.lock().prepare()?;
            self.fire(|l| l.resource_prepare_ended());
        }
        self.fire(|l| l.group_prepare_ended(name));
        Ok(())
    }

    /// Unloads every resource in the group. With `reloadable_only`,
    /// resources that cannot be reloaded are left alone.
    pub fn unload_resource_group(&self, name: &str, reloadable_only: bool) -> EmberResult<()> {
        let handles: Vec<ResourceHandle> = {
            let inner = self.inner.lock();
            inner
                .group(name)?
                .buckets
                .values()
                .flatten()
                .map(Arc::clone)
                .collect()
        };
        info!(group = name, "unloading resource group");
        for handle in handles {
            let mut resource = handle.lock();
            if !reloadable_only || resource.is_reloadable() {
                resource.unload()?;
            }
        }
        let mut inner = self.inner.lock();
        let group = inner.group_mut(name)?;
        if group.status == GroupStatus::Loaded {
            group.status = GroupStatus::Initialised;
        }
        Ok(())
    }

    /// Unloads only resources no longer referenced outside the group
    /// bookkeeping and their owning manager.
    pub fn unload_unreferenced_resources(
        &self,
        name: &str,
        reloadable_only: bool,
    ) -> EmberResult<()> {
        let unused: Vec<ResourceHandle> = {
            let inner = self.inner.lock();
            inner
                .group(name)?
                .buckets
                .values()
                .flatten()
                // Two strong refs mean the bucket and the owning manager.
                .filter(|h| Arc::strong_count(h) <= 2)
                .map(Arc::clone)
                .collect()
        };
        for handle in unused {
            let mut resource = handle.lock();
            if !reloadable_only || resource.is_reloadable() {
                resource.unload()?;
            }
        }
        Ok(())
    }

    /// Destroys all resources in the group, returning it to an
    /// uninitialised state. Locations are kept.
    pub fn clear_resource_group(&self, name: &str) -> EmberResult<()> {
        let handles: Vec<ResourceHandle> = {
            let mut inner = self.inner.lock();
            let group = inner.group_mut(name)?;
            let handles = group.buckets.values().flatten().map(Arc::clone).collect();
            group.buckets.clear();
            group.declarations.clear();
            group.status = GroupStatus::Uninitialised;
            handles
        };
        info!(group = name, resources = handles.len(), "clearing resource group");
        for handle in handles {
            let (resource_name, resource_type) = {
                let mut resource = handle.lock();
                resource.unload()?;
                (
                    resource.name().to_string(),
                    resource.resource_type().to_string(),
                )
            };
            if let Ok(manager) = self.resource_manager(&resource_type) {
                manager.remove(&resource_name);
            }
            self.fire(|l| l.resource_removed(&handle));
        }
        Ok(())
    }

    /// Clears the group and then removes it entirely.
    pub fn destroy_resource_group(&self, name: &str) -> EmberResult<()> {
        self.clear_resource_group(name)?;
        let mut inner = self.inner.lock();
        inner.groups.remove(name);
        inner.group_order.retain(|g| g != name);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Locations
    // ------------------------------------------------------------------

    /// Adds an archive location to a group, creating the group if needed,
    /// and indexes its contents.
    pub fn add_resource_location(
        &self,
        location: &str,
        archive_type: &str,
        group: &str,
        recursive: bool,
        read_only: bool,
    ) -> EmberResult<()> {
        let archive = self
            .archive_manager
            .load(location, archive_type, read_only)?;
        let filenames = archive.list(recursive, false);

        let mut inner = self.inner.lock();
        if !inner.groups.contains_key(group) {
            debug!(group, "implicitly creating resource group for location");
            inner.add_group(group, true);
        }
        let group_state = inner.group_mut(group)?;
        for filename in filenames {
            // Later locations override index entries they touch.
            group_state.index.insert(filename, Arc::clone(&archive));
        }
        group_state.locations.push(Location { archive, recursive });
        info!(location, archive_type, group, "added resource location");
        Ok(())
    }

    /// Removes a location from a group along with its index entries.
    pub fn remove_resource_location(&self, location: &str, group: &str) -> EmberResult<()> {
        let mut inner = self.inner.lock();
        let group_state = inner.group_mut(group)?;
        let before = group_state.locations.len();
        group_state
            .locations
            .retain(|loc| loc.archive.name() != location);
        if group_state.locations.len() == before {
            return Err(EmberError::ItemNotFound(format!(
                "location '{location}' is not part of group '{group}'"
            )));
        }
        group_state
            .index
            .retain(|_, archive| archive.name() != location);
        info!(location, group, "removed resource location");
        Ok(())
    }

    /// Location names registered with a group.
    pub fn resource_locations(&self, group: &str) -> EmberResult<Vec<String>> {
        let inner = self.inner.lock();
        Ok(inner
            .group(group)?
            .locations
            .iter()
            .map(|loc| loc.archive.name().to_string())
            .collect())
    }

    // ------------------------------------------------------------------
    // Declarations
    // ------------------------------------------------------------------

    /// Declares a resource for instantiation at group initialisation.
    pub fn declare_resource(
        &self,
        name: &str,
        resource_type: &str,
        group: &str,
        loader: Option<Arc<dyn ManualResourceLoader>>,
        parameters: HashMap<String, String>,
    ) -> EmberResult<()> {
        let mut inner = self.inner.lock();
        let group_state = inner.group_mut(group)?;
        group_state.declarations.push(ResourceDeclaration {
            name: name.to_string(),
            resource_type: resource_type.to_string(),
            loader,
            parameters,
        });
        Ok(())
    }

    /// Removes a declaration by name.
    pub fn undeclare_resource(&self, name: &str, group: &str) -> EmberResult<()> {
        let mut inner = self.inner.lock();
        let group_state = inner.group_mut(group)?;
        group_state.declarations.retain(|decl| decl.name != name);
        Ok(())
    }

    /// Declarations currently registered with a group.
    pub fn resource_declarations(&self, group: &str) -> EmberResult<Vec<ResourceDeclaration>> {
        Ok(self.inner.lock().group(group)?.declarations.clone())
    }

    // ------------------------------------------------------------------
    // Resource managers, script loaders, listeners
    // ------------------------------------------------------------------

    /// Registers a resource manager under its type tag.
    pub fn register_resource_manager(&self, manager: Arc<dyn ResourceManager>) {
        debug!(resource_type = manager.resource_type(), "registered resource manager");
        self.inner
            .lock()
            .resource_managers
            .insert(manager.resource_type().to_string(), manager);
    }

    /// Unregisters a resource manager by type tag.
    pub fn unregister_resource_manager(&self, resource_type: &str) {
        self.inner.lock().resource_managers.remove(resource_type);
    }

    /// The manager registered for a type tag.
    pub fn resource_manager(&self, resource_type: &str) -> EmberResult<Arc<dyn ResourceManager>> {
        self.inner
            .lock()
            .resource_managers
            .get(resource_type)
            .map(Arc::clone)
            .ok_or_else(|| {
                EmberError::ItemNotFound(format!(
                    "no resource manager registered for type '{resource_type}'"
                ))
            })
    }

    /// Registers a script loader.
    pub fn register_script_loader(&self, loader: Arc<dyn ScriptLoader>) {
        self.inner.lock().script_loaders.push(loader);
    }

    /// Unregisters a script loader by identity.
    pub fn unregister_script_loader(&self, loader: &Arc<dyn ScriptLoader>) {
        self.inner
            .lock()
            .script_loaders
            .retain(|l| !Arc::ptr_eq(l, loader));
    }

    /// Adds a lifecycle listener.
    pub fn add_listener(&self, listener: ListenerHandle) {
        self.inner.lock().listeners.push(listener);
    }

    /// Removes a lifecycle listener by identity.
    pub fn remove_listener(&self, listener: &ListenerHandle) {
        self.inner
            .lock()
            .listeners
            .retain(|l| !Arc::ptr_eq(l, listener));
    }

    /// Installs (or clears) the stream-interception listener.
    pub fn set_loading_listener(&self, listener: Option<Arc<dyn LoadingListener>>) {
        self.inner.lock().loading_listener = listener;
    }

    // ------------------------------------------------------------------
    // Resource creation and notifications
    // ------------------------------------------------------------------

    /// Creates a resource through the manager registered for its type.
    pub fn create_resource(
        &self,
        name: &str,
        resource_type: &str,
        group: &str,
        loader: Option<Arc<dyn ManualResourceLoader>>,
        parameters: &HashMap<String, String>,
    ) -> EmberResult<ResourceHandle> {
        let manager = self.resource_manager(resource_type)?;
        manager.create(name, group, loader, parameters)
    }

    /// Registers a freshly created resource with its group. Resource
    /// managers call this from their `create`. During a group load, the
    /// resource is also appended to the bucket being iterated.
    pub fn notify_resource_created(&self, handle: &ResourceHandle) -> EmberResult<()> {
        let (group, resource_type) = {
            let resource = handle.lock();
            (
                resource.group().to_string(),
                resource.resource_type().to_string(),
            )
        };
        let order = self
            .inner
            .lock()
            .resource_managers
            .get(&resource_type)
            .map_or(100.0, |m| m.loading_order());
        {
            let mut inner = self.inner.lock();
            inner.group_mut(&group)?.add_resource(order, Arc::clone(handle));
            if let Some(current) = inner.current_load.as_mut() {
                if current.group == group {
                    current.cascades.push(Arc::clone(handle));
                }
            }
        }
        self.fire(|l| l.resource_created(handle));
        Ok(())
    }

    /// Removes a resource from its group's bookkeeping.
    pub fn notify_resource_removed(&self, handle: &ResourceHandle) -> EmberResult<()> {
        let group = handle.lock().group().to_string();
        {
            let mut inner = self.inner.lock();
            inner.group_mut(&group)?.remove_resource(handle);
        }
        self.fire(|l| l.resource_removed(handle));
        Ok(())
    }

    /// Moves a resource's bookkeeping after its group field changed. The
    /// resource must already report its new group.
    pub fn notify_resource_group_changed(
        &self,
        old_group: &str,
        handle: &ResourceHandle,
    ) -> EmberResult<()> {
        let (new_group, resource_type) = {
            let resource = handle.lock();
            (
                resource.group().to_string(),
                resource.resource_type().to_string(),
            )
        };
        let mut inner = self.inner.lock();
        let order = inner
            .resource_managers
            .get(&resource_type)
            .map_or(100.0, |m| m.loading_order());
        inner.group_mut(old_group)?.remove_resource(handle);
        inner
            .group_mut(&new_group)?
            .add_resource(order, Arc::clone(handle));
        debug!(old_group, new_group, "resource changed group");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Stream resolution
    // ------------------------------------------------------------------

    /// Opens a resource by name within a group, falling back to the global
    /// pool when the group itself does not provide it.
    pub fn open_resource(&self, name: &str, group: &str) -> EmberResult<SharedStream> {
        self.open_resource_extended(name, group, false, None)
    }

    /// Full-control variant of [`ResourceGroupManager::open_resource`].
    ///
    /// Resolution order: loading-listener intercept, the group's filename
    /// index, a direct probe of each location, then other groups in creation
    /// order. The fallback normally considers only groups in the global
    /// pool; `search_all_groups` widens it to every group. When the
    /// fallback resolves a stream on behalf of a resource whose group is
    /// [`AUTODETECT_GROUP`], the resource migrates into the providing group.
    pub fn open_resource_extended(
        &self,
        name: &str,
        group: &str,
        search_all_groups: bool,
        on_behalf_of: Option<&ResourceHandle>,
    ) -> EmberResult<SharedStream> {
        let loading_listener = self.inner.lock().loading_listener.clone();
        if let Some(listener) = &loading_listener {
            if let Some(stream) = listener.resource_loading(name, group) {
                return Ok(stream);
            }
        }

        let (archive, providing_group) = {
            let inner = self.inner.lock();
            let group_state = inner.group(group)?;
            if let Some(archive) = group_state.resolve(name) {
                (Some(archive), None)
            } else {
                let mut found = None;
                for other in &inner.group_order {
                    if other == group {
                        continue;
                    }
                    let Some(candidate) = inner.groups.get(other) else {
                        continue;
                    };
                    if !(candidate.in_global_pool || search_all_groups) {
                        continue;
                    }
                    if let Some(archive) = candidate.resolve(name) {
                        found = Some((archive, other.clone()));
                        break;
                    }
                }
                match found {
                    Some((archive, other)) => (Some(archive), Some(other)),
                    None => (None, None),
                }
            }
        };

        let Some(archive) = archive else {
            return Err(EmberError::FileNotFound {
                name: name.to_string(),
                group: group.to_string(),
            });
        };

        if let (Some(resolved_group), Some(handle)) = (&providing_group, on_behalf_of) {
            let needs_migration = {
                let resource = handle.lock();
                resource.group() == AUTODETECT_GROUP
            };
            if needs_migration {
                handle.lock().set_group(resolved_group.clone());
                self.notify_resource_group_changed(AUTODETECT_GROUP, handle)?;
            }
        }

        let mut stream = archive.open(name)?;
        if let Some(listener) = &loading_listener {
            listener.resource_stream_opened(name, group, stream.as_mut());
        }
        Ok(stream)
    }

    /// Like [`ResourceGroupManager::open_resource`], but absence is `None`
    /// instead of an error.
    pub fn try_open_resource(&self, name: &str, group: &str) -> Option<SharedStream> {
        self.open_resource(name, group).ok()
    }

    /// Opens every resource in the group matching a pattern.
    pub fn open_resources(&self, pattern: &str, group: &str) -> EmberResult<Vec<SharedStream>> {
        let names = self.find_resource_names(group, pattern)?;
        let mut streams = Vec::with_capacity(names.len());
        for name in names {
            streams.push(self.open_resource(&name, group)?);
        }
        Ok(streams)
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    fn locations_snapshot(&self, group: &str) -> EmberResult<Vec<(Arc<dyn crate::archive::Archive>, bool)>> {
        let inner = self.inner.lock();
        Ok(inner
            .group(group)?
            .locations
            .iter()
            .map(|loc| (Arc::clone(&loc.archive), loc.recursive))
            .collect())
    }

    /// All resource names visible in a group.
    pub fn list_resource_names(&self, group: &str) -> EmberResult<Vec<String>> {
        let mut names = Vec::new();
        for (archive, recursive) in self.locations_snapshot(group)? {
            names.extend(archive.list(recursive, false));
        }
        Ok(names)
    }

    /// All resource metadata visible in a group.
    pub fn list_resource_file_info(&self, group: &str) -> EmberResult<Vec<FileInfo>> {
        let mut infos = Vec::new();
        for (archive, recursive) in self.locations_snapshot(group)? {
            infos.extend(archive.list_file_info(recursive, false));
        }
        Ok(infos)
    }

    /// Resource names in a group matching a pattern.
    pub fn find_resource_names(&self, group: &str, pattern: &str) -> EmberResult<Vec<String>> {
        let mut names = Vec::new();
        for (archive, recursive) in self.locations_snapshot(group)? {
            names.extend(archive.find(pattern, recursive, false));
        }
        Ok(names)
    }

    /// Resource metadata in a group matching a pattern.
    pub fn find_resource_file_info(
        &self,
        group: &str,
        pattern: &str,
    ) -> EmberResult<Vec<FileInfo>> {
        let mut infos = Vec::new();
        for (archive, recursive) in self.locations_snapshot(group)? {
            infos.extend(archive.find_file_info(pattern, recursive, false));
        }
        Ok(infos)
    }

    /// Whether a file exists in the group. Never errors: an unknown group
    /// simply reports `false`.
    #[must_use]
    pub fn resource_exists(&self, name: &str, group: &str) -> bool {
        self.inner
            .lock()
            .groups
            .get(group)
            .is_some_and(|g| g.resolve(name).is_some())
    }

    /// Whether a file exists in any group.
    #[must_use]
    pub fn resource_exists_in_any_group(&self, name: &str) -> bool {
        let inner = self.inner.lock();
        inner
            .group_order
            .iter()
            .any(|g| inner.groups.get(g).is_some_and(|g| g.resolve(name).is_some()))
    }

    /// The first group (in creation order) containing the named file.
    pub fn find_group_containing_resource(&self, name: &str) -> EmberResult<String> {
        let inner = self.inner.lock();
        inner
            .group_order
            .iter()
            .find(|g| inner.groups.get(*g).is_some_and(|g| g.resolve(name).is_some()))
            .cloned()
            .ok_or_else(|| EmberError::FileNotFound {
                name: name.to_string(),
                group: "(any)".to_string(),
            })
    }

    /// Last modification time of a file within a group, if the backing
    /// archive tracks one.
    pub fn resource_modified_time(
        &self,
        name: &str,
        group: &str,
    ) -> EmberResult<Option<SystemTime>> {
        let archive = {
            let inner = self.inner.lock();
            inner.group(group)?.resolve(name)
        };
        Ok(archive.and_then(|a| a.modified_time(name)))
    }

    // ------------------------------------------------------------------
    // Writable resources
    // ------------------------------------------------------------------

    /// Creates a new file in the first writable location of the group
    /// (optionally restricted to locations matching `location_pattern`).
    pub fn create_resource_file(
        &self,
        filename: &str,
        group: &str,
        overwrite: bool,
        location_pattern: Option<&str>,
    ) -> EmberResult<SharedStream> {
        let locations = self.locations_snapshot(group)?;
        for (archive, _) in &locations {
            if archive.is_read_only() {
                continue;
            }
            if let Some(pattern) = location_pattern {
                if !crate::pattern::matches(pattern, archive.name(), archive.is_case_sensitive()) {
                    continue;
                }
            }
            if !overwrite && archive.exists(filename) {
                return Err(EmberError::DuplicateItem(format!(
                    "'{filename}' already exists in '{}'",
                    archive.name()
                )));
            }
            let stream = archive.create(filename)?;
            self.inner
                .lock()
                .group_mut(group)?
                .index
                .insert(filename.to_string(), Arc::clone(archive));
            return Ok(stream);
        }
        Err(EmberError::ItemNotFound(format!(
            "no writable location in group '{group}' for '{filename}'"
        )))
    }

    /// Deletes a file from whichever writable location provides it.
    pub fn delete_resource_file(&self, filename: &str, group: &str) -> EmberResult<()> {
        let locations = self.locations_snapshot(group)?;
        for (archive, _) in &locations {
            if !archive.is_read_only() && archive.exists(filename) {
                archive.remove(filename)?;
                self.inner.lock().group_mut(group)?.index.remove(filename);
                return Ok(());
            }
        }
        Err(EmberError::FileNotFound {
            name: filename.to_string(),
            group: group.to_string(),
        })
    }

    /// Deletes every matching file from writable locations.
    pub fn delete_matching_resource_files(
        &self,
        pattern: &str,
        group: &str,
    ) -> EmberResult<()> {
        let locations = self.locations_snapshot(group)?;
        for (archive, recursive) in &locations {
            if archive.is_read_only() {
                continue;
            }
            for name in archive.find(pattern, *recursive, false) {
                archive.remove(&name)?;
                self.inner.lock().group_mut(group)?.index.remove(&name);
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Script parsing
    // ------------------------------------------------------------------

    /// Parses every script claimed by the registered loaders, in ascending
    /// loader order, each file exactly once per loader.
    pub fn parse_resource_group_scripts(&self, group: &str) -> EmberResult<()> {
        let loaders = {
            let inner = self.inner.lock();
            let mut loaders = inner.script_loaders.clone();
            loaders.sort_by(|a, b| a.loading_order().total_cmp(&b.loading_order()));
            loaders
        };

        // Gather each loader's matching scripts up front so the announced
        // count is exact.
        let mut per_loader: Vec<(Arc<dyn ScriptLoader>, Vec<String>)> = Vec::new();
        let mut total = 0;
        for loader in loaders {
            let mut names = Vec::new();
            for pattern in loader.script_patterns() {
                for name in self.find_resource_names(group, &pattern)? {
                    if !names.contains(&name) {
                        names.push(name);
                    }
                }
            }
            total += names.len();
            per_loader.push((loader, names));
        }

        debug!(group, scripts = total, "parsing resource group scripts");
        self.fire(|l| l.group_scripting_started(group, total));
        for (loader, names) in per_loader {
            for name in names {
                let mut skip = false;
                self.fire_mut(|l| l.script_parse_started(&name, &mut skip));
                if !skip {
                    let mut stream = self.open_resource(&name, group)?;
                    if stream.len() <= SCRIPT_BUFFER_LIMIT {
                        stream = Box::new(MemoryStream::buffer_from(&name, stream.as_mut())?);
                    }
                    if let Err(err) = loader.parse_script(stream.as_mut(), group) {
                        warn!(script = %name, %err, "script parse failed");
                        return Err(err);
                    }
                }
                self.fire(|l| l.script_parse_ended(&name, skip));
            }
        }
        self.fire(|l| l.group_scripting_ended(group));
        Ok(())
    }

    // ------------------------------------------------------------------
    // World group and custom stages
    // ------------------------------------------------------------------

    /// Marks a group as holding the active world data.
    pub fn set_world_resource_group(&self, group: &str) {
        self.inner.lock().world_group = group.to_string();
    }

    /// The group currently holding world data.
    #[must_use]
    pub fn world_resource_group(&self) -> String {
        self.inner.lock().world_group.clone()
    }

    /// Sets how many client-driven stages the group's load announces.
    pub fn set_custom_stage_count(&self, group: &str, count: usize) -> EmberResult<()> {
        self.inner.lock().group_mut(group)?.custom_stage_count = count;
        Ok(())
    }

    /// The group's announced custom stage count.
    pub fn custom_stage_count(&self, group: &str) -> EmberResult<usize> {
        Ok(self.inner.lock().group(group)?.custom_stage_count)
    }

    /// Announces the start of a client-driven loading stage.
    pub fn notify_custom_stage_started(&self, description: &str) {
        self.fire(|l| l.custom_stage_started(description));
    }

    /// Announces the end of the current client-driven stage.
    pub fn notify_custom_stage_ended(&self) {
        self.fire(|l| l.custom_stage_ended());
    }

    // ------------------------------------------------------------------

    fn fire(&self, f: impl Fn(&dyn ResourceGroupListener)) {
        let listeners = self.inner.lock().listeners.clone();
        for listener in listeners {
            f(listener.as_ref());
        }
    }

    fn fire_mut(&self, mut f: impl FnMut(&dyn ResourceGroupListener)) {
        let listeners = self.inner.lock().listeners.clone();
        for listener in listeners {
            f(listener.as_ref());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryArchive;
    use crate::resource::{LoadingState, Resource};
    use std::sync::Weak;

    type LoadHook = Box<dyn Fn() -> EmberResult<()> + Send>;

    struct TestResource {
        name: String,
        group: String,
        resource_type: &'static str,
        state: LoadingState,
        reloadable: bool,
        on_first_load: Option<LoadHook>,
    }

    impl Resource for TestResource {
        fn name(&self) -> &str {
            &self.name
        }

        fn group(&self) -> &str {
            &self.group
        }

        fn set_group(&mut self, group: String) {
            self.group = group;
        }

        fn resource_type(&self) -> &str {
            self.resource_type
        }

        fn state(&self) -> LoadingState {
            self.state
        }

        fn is_reloadable(&self) -> bool {
            self.reloadable
        }

        fn load(&mut self) -> EmberResult<()> {
            if self.state == LoadingState::Loaded {
                return Ok(());
            }
            if let Some(hook) = self.on_first_load.take() {
                hook()?;
            }
            self.state = LoadingState::Loaded;
            Ok(())
        }

        fn unload(&mut self) -> EmberResult<()> {
            self.state = LoadingState::Unloaded;
            Ok(())
        }
    }

    struct TestResourceManager {
        type_tag: &'static str,
        order: f32,
        group_manager: Mutex<Weak<ResourceGroupManager>>,
        resources: Mutex<AHashMap<String, ResourceHandle>>,
    }

    impl TestResourceManager {
        fn new(order: f32) -> Arc<Self> {
            Self::tagged("Test", order)
        }

        fn tagged(type_tag: &'static str, order: f32) -> Arc<Self> {
            Arc::new(Self {
                type_tag,
                order,
                group_manager: Mutex::new(Weak::new()),
                resources: Mutex::new(AHashMap::new()),
            })
        }

        fn attach(self: &Arc<Self>, rgm: &Arc<ResourceGroupManager>) {
            *self.group_manager.lock() = Arc::downgrade(rgm);
            rgm.register_resource_manager(Arc::clone(self) as Arc<dyn ResourceManager>);
        }

        fn create_with_hook(
            &self,
            name: &str,
            group: &str,
            hook: Option<LoadHook>,
        ) -> EmberResult<ResourceHandle> {
            if self.resources.lock().contains_key(name) {
                return Err(EmberError::DuplicateItem(name.to_string()));
            }
            let handle: ResourceHandle = Arc::new(Mutex::new(TestResource {
                name: name.to_string(),
                group: group.to_string(),
                resource_type: self.type_tag,
                state: LoadingState::Unloaded,
                reloadable: true,
                on_first_load: hook,
            }));
            self.resources
                .lock()
                .insert(name.to_string(), Arc::clone(&handle));
            if let Some(rgm) = self.group_manager.lock().upgrade() {
                rgm.notify_resource_created(&handle)?;
            }
            Ok(handle)
        }
    }

    impl ResourceManager for TestResourceManager {
        fn resource_type(&self) -> &str {
            self.type_tag
        }

        fn loading_order(&self) -> f32 {
            self.order
        }

        fn create(
            &self,
            name: &str,
            group: &str,
            _loader: Option<Arc<dyn ManualResourceLoader>>,
            _parameters: &HashMap<String, String>,
        ) -> EmberResult<ResourceHandle> {
            self.create_with_hook(name, group, None)
        }

        fn get(&self, name: &str) -> Option<ResourceHandle> {
            self.resources.lock().get(name).map(Arc::clone)
        }

        fn remove(&self, name: &str) {
            self.resources.lock().remove(name);
        }

        fn remove_all(&self) {
            self.resources.lock().clear();
        }
    }

    #[derive(Default)]
    struct RecordingListener {
        events: Mutex<Vec<String>>,
    }

    impl RecordingListener {
        fn events(&self) -> Vec<String> {
            self.events.lock().clone()
        }

        fn push(&self, event: String) {
            self.events.lock().push(event);
        }
    }

    impl ResourceGroupListener for RecordingListener {
        fn group_scripting_started(&self, group: &str, script_count: usize) {
            self.push(format!("scripting_started:{group}:{script_count}"));
        }

        fn script_parse_started(&self, script_name: &str, _skip: &mut bool) {
            self.push(format!("script:{script_name}"));
        }

        fn group_load_started(&self, group: &str, resource_count: usize) {
            self.push(format!("load_started:{group}:{resource_count}"));
        }

        fn resource_load_started(&self, name: &str) {
            self.push(format!("load:{name}"));
        }

        fn resource_load_ended(&self) {
            self.push("load_ended".to_string());
        }

        fn group_load_ended(&self, group: &str) {
            self.push(format!("group_loaded:{group}"));
        }
    }

    struct RecordingScriptLoader {
        order: f32,
        patterns: Vec<String>,
        parsed: Arc<Mutex<Vec<String>>>,
    }

    impl ScriptLoader for RecordingScriptLoader {
        fn loading_order(&self) -> f32 {
            self.order
        }

        fn script_patterns(&self) -> Vec<String> {
            self.patterns.clone()
        }

        fn parse_script(
            &self,
            stream: &mut dyn crate::stream::DataStream,
            _group: &str,
        ) -> EmberResult<()> {
            self.parsed.lock().push(stream.name().to_string());
            Ok(())
        }
    }

    fn seeded_group(rgm: &ResourceGroupManager, group: &str, files: &[(&str, &[u8])]) {
        let archive = Arc::new(MemoryArchive::new(format!("mem:{group}"), true));
        for (name, data) in files {
            archive.add_file(*name, data.to_vec());
        }
        rgm.archive_manager().add_archive(archive);
        rgm.add_resource_location(&format!("mem:{group}"), "Memory", group, true, true)
            .expect("location");
    }

    #[test]
    fn test_group_status_transitions() {
        let rgm = Arc::new(ResourceGroupManager::new());
        let manager = TestResourceManager::new(100.0);
        manager.attach(&rgm);

        rgm.create_resource_group("Level", false).expect("create");
        assert_eq!(
            rgm.group_status("Level").expect("status"),
            GroupStatus::Uninitialised
        );

        rgm.declare_resource("thing", "Test", "Level", None, HashMap::new())
            .expect("declare");
        rgm.initialise_resource_group("Level").expect("initialise");
        assert_eq!(
            rgm.group_status("Level").expect("status"),
            GroupStatus::Initialised
        );

        rgm.load_resource_group("Level").expect("load");
        assert_eq!(
            rgm.group_status("Level").expect("status"),
            GroupStatus::Loaded
        );
        assert!(manager.get("thing").expect("resource").lock().is_loaded());

        rgm.unload_resource_group("Level", false).expect("unload");
        assert_eq!(
            rgm.group_status("Level").expect("status"),
            GroupStatus::Initialised
        );

        rgm.clear_resource_group("Level").expect("clear");
        assert_eq!(
            rgm.group_status("Level").expect("status"),
            GroupStatus::Uninitialised
        );
        assert!(manager.get("thing").is_none());
    }

    #[test]
    fn test_duplicate_group_rejected() {
        let rgm = ResourceGroupManager::new();
        assert!(matches!(
            rgm.create_resource_group(DEFAULT_GROUP, true),
            Err(EmberError::DuplicateItem(_))
        ));
    }

    #[test]
    fn test_load_announces_exact_counts() {
        let rgm = Arc::new(ResourceGroupManager::new());
        let manager = TestResourceManager::new(100.0);
        manager.attach(&rgm);
        let listener = Arc::new(RecordingListener::default());
        rgm.add_listener(Arc::clone(&listener) as ListenerHandle);

        rgm.create_resource_group("Level", false).expect("create");
        manager.create("a", "Level", None, &HashMap::new()).expect("a");
        manager.create("b", "Level", None, &HashMap::new()).expect("b");

        rgm.load_resource_group("Level").expect("load");

        let events = listener.events();
        assert!(events.contains(&"load_started:Level:2".to_string()));
        let started = events.iter().filter(|e| e.starts_with("load:")).count();
        let ended = events.iter().filter(|e| *e == "load_ended").count();
        assert_eq!(started, 2);
        assert_eq!(ended, 2);
        assert_eq!(events.last().expect("events"), "group_loaded:Level");
    }

    #[test]
    fn test_cascade_extends_current_bucket() {
        let rgm = Arc::new(ResourceGroupManager::new());
        let manager = TestResourceManager::new(100.0);
        manager.attach(&rgm);
        let listener = Arc::new(RecordingListener::default());
        rgm.add_listener(Arc::clone(&listener) as ListenerHandle);

        rgm.create_resource_group("Level", false).expect("create");
        let cascade_manager = Arc::clone(&manager);
        manager
            .create_with_hook(
                "X",
                "Level",
                Some(Box::new(move || {
                    cascade_manager.create_with_hook("Y", "Level", None)?;
                    Ok(())
                })),
            )
            .expect("X");

        rgm.load_resource_group("Level").expect("load");

        let loads: Vec<String> = listener
            .events()
            .into_iter()
            .filter(|e| e.starts_with("load:"))
            .collect();
        assert_eq!(loads, ["load:X", "load:Y"]);
        assert!(manager.get("Y").expect("Y").lock().is_loaded());
    }

    #[test]
    fn test_open_resource_falls_back_to_other_groups() {
        let rgm = Arc::new(ResourceGroupManager::new());
        rgm.create_resource_group("Level", true).expect("create");
        seeded_group(&rgm, "Level", &[("map.cfg", b"data")]);

        // DEFAULT_GROUP is in the global pool, so the search reaches Level.
        let mut stream = rgm.open_resource("map.cfg", DEFAULT_GROUP).expect("open");
        assert_eq!(stream.read_to_end().expect("read"), b"data");

        assert!(matches!(
            rgm.open_resource("missing.cfg", DEFAULT_GROUP),
            Err(EmberError::FileNotFound { .. })
        ));
    }

    #[test]
    fn test_later_location_overrides_shared_names() {
        let rgm = Arc::new(ResourceGroupManager::new());
        seeded_group(&rgm, DEFAULT_GROUP, &[("shared.txt", b"from-first")]);

        let overriding = Arc::new(MemoryArchive::new("mem:override", true));
        overriding.add_file("shared.txt", b"from-second".to_vec());
        rgm.archive_manager().add_archive(overriding);
        rgm.add_resource_location("mem:override", "Memory", DEFAULT_GROUP, true, true)
            .expect("location");

        let mut stream = rgm
            .open_resource("shared.txt", DEFAULT_GROUP)
            .expect("open");
        assert_eq!(stream.read_to_end().expect("read"), b"from-second");
    }

    #[test]
    fn test_autodetect_resource_migrates_to_providing_group() {
        let rgm = Arc::new(ResourceGroupManager::new());
        let manager = TestResourceManager::new(100.0);
        manager.attach(&rgm);
        rgm.create_resource_group("Level", true).expect("create");
        seeded_group(&rgm, "Level", &[("auto.tex", b"texels")]);

        let handle = manager
            .create("auto.tex", AUTODETECT_GROUP, None, &HashMap::new())
            .expect("create");
        let stream = rgm
            .open_resource_extended("auto.tex", AUTODETECT_GROUP, true, Some(&handle))
            .expect("open");
        assert!(!stream.is_empty());
        assert_eq!(handle.lock().group(), "Level");
    }

    #[test]
    fn test_global_pool_lookup_ignores_private_groups() {
        let rgm = Arc::new(ResourceGroupManager::new());
        rgm.create_resource_group("A", false).expect("create A");
        rgm.create_resource_group("B", true).expect("create B");
        seeded_group(&rgm, "A", &[("foo.tex", b"f")]);
        seeded_group(&rgm, "B", &[("bar.tex", b"b")]);

        // B is in the global pool, so a miss in A falls through to it.
        assert!(rgm.open_resource("bar.tex", "A").is_ok());
        // A is private, so a miss in B cannot reach it.
        assert!(matches!(
            rgm.open_resource("foo.tex", "B"),
            Err(EmberError::FileNotFound { .. })
        ));
        // Unless the search is widened to every group.
        assert!(rgm
            .open_resource_extended("foo.tex", "B", true, None)
            .is_ok());
    }

    #[test]
    fn test_resource_exists_never_errors() {
        let rgm = ResourceGroupManager::new();
        assert!(!rgm.resource_exists("anything", "NoSuchGroup"));
        assert!(!rgm.resource_exists_in_any_group("anything"));
    }

    #[test]
    fn test_create_resource_file_needs_writable_location() {
        let rgm = ResourceGroupManager::new();
        rgm.create_resource_group("Out", false).expect("create");

        let sealed = Arc::new(MemoryArchive::new("mem:sealed", true));
        rgm.archive_manager().add_archive(sealed);
        rgm.add_resource_location("mem:sealed", "Memory", "Out", true, true)
            .expect("location");
        assert!(matches!(
            rgm.create_resource_file("new.cfg", "Out", false, None),
            Err(EmberError::ItemNotFound(_))
        ));

        let open = Arc::new(MemoryArchive::new("mem:open", false));
        rgm.archive_manager().add_archive(open);
        rgm.add_resource_location("mem:open", "Memory", "Out", true, false)
            .expect("location");
        {
            let mut stream = rgm
                .create_resource_file("new.cfg", "Out", false, None)
                .expect("create");
            stream.write(b"fresh").expect("write");
        }
        assert!(rgm.resource_exists("new.cfg", "Out"));
        assert!(matches!(
            rgm.create_resource_file("new.cfg", "Out", false, None),
            Err(EmberError::DuplicateItem(_))
        ));

        rgm.delete_resource_file("new.cfg", "Out").expect("delete");
        assert!(!rgm.resource_exists("new.cfg", "Out"));
    }

    #[test]
    fn test_scripts_parse_in_loader_order() {
        let rgm = Arc::new(ResourceGroupManager::new());
        let listener = Arc::new(RecordingListener::default());
        rgm.add_listener(Arc::clone(&listener) as ListenerHandle);

        rgm.create_resource_group("Level", false).expect("create");
        seeded_group(
            &rgm,
            "Level",
            &[
                ("rock.mat", b"material"),
                ("tree.mat", b"material"),
                ("world.cfg", b"config"),
            ],
        );

        let parsed = Arc::new(Mutex::new(Vec::new()));
        rgm.register_script_loader(Arc::new(RecordingScriptLoader {
            order: 10.0,
            patterns: vec!["*.mat".to_string()],
            parsed: Arc::clone(&parsed),
        }));
        rgm.register_script_loader(Arc::new(RecordingScriptLoader {
            order: 5.0,
            patterns: vec!["*.cfg".to_string()],
            parsed: Arc::clone(&parsed),
        }));

        rgm.parse_resource_group_scripts("Level").expect("parse");

        let parsed = parsed.lock().clone();
        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed[0], "world.cfg");
        assert!(parsed[1..].contains(&"rock.mat".to_string()));
        assert!(parsed[1..].contains(&"tree.mat".to_string()));
        assert!(listener
            .events()
            .contains(&"scripting_started:Level:3".to_string()));
    }

    #[test]
    fn test_loading_order_buckets_ascend() {
        let rgm = Arc::new(ResourceGroupManager::new());
        let early = TestResourceManager::tagged("Early", 50.0);
        let late = TestResourceManager::tagged("Late", 200.0);
        early.attach(&rgm);
        late.attach(&rgm);

        let listener = Arc::new(RecordingListener::default());
        rgm.add_listener(Arc::clone(&listener) as ListenerHandle);

        rgm.create_resource_group("Level", false).expect("create");
        // Created in reverse order; buckets must still load early-first.
        late.create("second", "Level", None, &HashMap::new())
            .expect("late");
        early
            .create("first", "Level", None, &HashMap::new())
            .expect("early");

        rgm.load_resource_group("Level").expect("load");
        let loads: Vec<String> = listener
            .events()
            .into_iter()
            .filter(|e| e.starts_with("load:"))
            .collect();
        assert_eq!(loads, ["load:first", "load:second"]);
    }

    #[test]
    fn test_unload_unreferenced_spares_held_handles() {
        let rgm = Arc::new(ResourceGroupManager::new());
        let manager = TestResourceManager::new(100.0);
        manager.attach(&rgm);

        rgm.create_resource_group("Level", false).expect("create");
        manager.create("kept", "Level", None, &HashMap::new()).expect("kept");
        manager.create("dropped", "Level", None, &HashMap::new()).expect("dropped");
        rgm.load_resource_group("Level").expect("load");

        let held = manager.get("kept").expect("kept");
        rgm.unload_unreferenced_resources("Level", false)
            .expect("unload");

        assert!(held.lock().is_loaded());
        assert!(!manager.get("dropped").expect("dropped").lock().is_loaded());
    }

    #[test]
    fn test_custom_stages_count_into_announcement() {
        let rgm = Arc::new(ResourceGroupManager::new());
        let listener = Arc::new(RecordingListener::default());
        rgm.add_listener(Arc::clone(&listener) as ListenerHandle);

        rgm.create_resource_group("World", false).expect("create");
        rgm.set_custom_stage_count("World", 3).expect("stages");
        assert_eq!(rgm.custom_stage_count("World").expect("count"), 3);

        rgm.load_resource_group("World").expect("load");
        assert!(listener
            .events()
            .contains(&"load_started:World:3".to_string()));
    }

    #[test]
    fn test_world_resource_group_roundtrip() {
        let rgm = ResourceGroupManager::new();
        assert_eq!(rgm.world_resource_group(), DEFAULT_GROUP);
        rgm.set_world_resource_group("Terrain");
        assert_eq!(rgm.world_resource_group(), "Terrain");
    }

    #[test]
    fn test_find_group_containing_resource() {
        let rgm = Arc::new(ResourceGroupManager::new());
        rgm.create_resource_group("Maps", false).expect("create");
        seeded_group(&rgm, "Maps", &[("dungeon.map", b"m")]);

        assert_eq!(
            rgm.find_group_containing_resource("dungeon.map").expect("find"),
            "Maps"
        );
        assert!(rgm.find_group_containing_resource("nothing").is_err());
        assert!(rgm
            .resource_modified_time("dungeon.map", "Maps")
            .expect("time")
            .is_some());
    }
}
