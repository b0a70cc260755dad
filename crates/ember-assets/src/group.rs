//! Internal state of a single resource group.

use std::collections::BTreeMap;
use std::sync::Arc;

use ahash::AHashMap;

use crate::archive::Archive;
use crate::resource::{ResourceDeclaration, ResourceHandle};

/// Lifecycle of a group as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupStatus {
    /// Created; scripts not yet parsed.
    #[default]
    Uninitialised,
    /// Script parsing / declaration instantiation in progress.
    Initialising,
    /// Declared resources created but not loaded.
    Initialised,
    /// All resources loaded.
    Loaded,
}

/// One registered location within a group.
pub(crate) struct Location {
    pub archive: Arc<dyn Archive>,
    pub recursive: bool,
}

/// Sort key for `f32` loading orders. `to_bits` is monotone for
/// non-negative floats, which loading orders are.
pub(crate) fn order_key(order: f32) -> u32 {
    debug_assert!(order >= 0.0);
    order.to_bits()
}

/// A named group: its locations, filename index, declarations, and created
/// resources bucketed by manager loading order.
pub(crate) struct ResourceGroup {
    pub name: String,
    pub in_global_pool: bool,
    pub status: GroupStatus,
    pub locations: Vec<Location>,
    /// Case-sensitive filename -> providing archive. Later locations
    /// override entries they touch.
    pub index: AHashMap<String, Arc<dyn Archive>>,
    pub declarations: Vec<ResourceDeclaration>,
    /// Created resources, keyed by their manager's loading order.
    pub buckets: BTreeMap<u32, Vec<ResourceHandle>>,
    /// Extra load stages announced in load counts and driven by the client.
    pub custom_stage_count: usize,
}

impl ResourceGroup {
    pub fn new(name: impl Into<String>, in_global_pool: bool) -> Self {
        Self {
            name: name.into(),
            in_global_pool,
            status: GroupStatus::Uninitialised,
            locations: Vec::new(),
            index: AHashMap::new(),
            declarations: Vec::new(),
            buckets: BTreeMap::new(),
            custom_stage_count: 0,
        }
    }

    /// The archive that provides `filename`, via the index first and then a
    /// direct probe of each location (covers files added after indexing).
    pub fn resolve(&self, filename: &str) -> Option<Arc<dyn Archive>> {
        if let Some(archive) = self.index.get(filename) {
            return Some(Arc::clone(archive));
        }
        self.locations
            .iter()
            .find(|loc| loc.archive.exists(filename))
            .map(|loc| Arc::clone(&loc.archive))
    }

    /// Adds a created resource to the bucket for `loading_order`.
    pub fn add_resource(&mut self, loading_order: f32, handle: ResourceHandle) {
        self.buckets
            .entry(order_key(loading_order))
            .or_default()
            .push(handle);
    }

    /// Removes a resource by handle identity. Returns whether it was found.
    pub fn remove_resource(&mut self, handle: &ResourceHandle) -> bool {
        for bucket in self.buckets.values_mut() {
            if let Some(i) = bucket.iter().position(|h| Arc::ptr_eq(h, handle)) {
                bucket.remove(i);
                return true;
            }
        }
        false
    }

    /// Total number of created resources across all buckets.
    pub fn resource_count(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_key_is_monotone() {
        let orders = [0.0_f32, 0.5, 1.0, 50.0, 100.0, 110.0, 1000.0];
        for pair in orders.windows(2) {
            assert!(order_key(pair[0]) < order_key(pair[1]));
        }
    }

    #[test]
    fn test_group_status_default() {
        let group = ResourceGroup::new("General", true);
        assert_eq!(group.status, GroupStatus::Uninitialised);
        assert_eq!(group.resource_count(), 0);
    }
}
