//! Observer hooks for group lifecycle events.

use std::sync::Arc;

use crate::resource::ResourceHandle;
use crate::stream::{DataStream, SharedStream};

/// Progress callbacks fired during group initialisation and loading.
///
/// Every method has a default empty body, so implementors override only
/// what they care about. For each `*_started` event that announces a count,
/// exactly that many per-item callbacks follow (cascaded creations during a
/// group load are the one exception, and can push the observed
/// [`ResourceGroupListener::resource_load_started`] count above the
/// announced total).
#[allow(unused_variables)]
pub trait ResourceGroupListener: Send + Sync {
    /// A group is about to parse `script_count` scripts.
    fn group_scripting_started(&self, group: &str, script_count: usize) {}

    /// One script is about to be parsed; set `skip` to suppress it.
    fn script_parse_started(&self, script_name: &str, skip: &mut bool) {}

    /// One script finished parsing (or was skipped).
    fn script_parse_ended(&self, script_name: &str, skipped: bool) {}

    /// Script parsing for the group is complete.
    fn group_scripting_ended(&self, group: &str) {}

    /// A group is about to prepare `resource_count` resources.
    fn group_prepare_started(&self, group: &str, resource_count: usize) {}

    /// One resource is about to be prepared.
    fn resource_prepare_started(&self, name: &str) {}

    /// The resource announced by the previous
    /// [`ResourceGroupListener::resource_prepare_started`] finished.
    fn resource_prepare_ended(&self) {}

    /// Preparation for the group is complete.
    fn group_prepare_ended(&self, group: &str) {}

    /// A group is about to load `resource_count` resources (including its
    /// custom stages).
    fn group_load_started(&self, group: &str, resource_count: usize) {}

    /// One resource is about to load.
    fn resource_load_started(&self, name: &str) {}

    /// The resource announced by the previous
    /// [`ResourceGroupListener::resource_load_started`] finished.
    fn resource_load_ended(&self) {}

    /// A client-driven loading stage began.
    fn custom_stage_started(&self, description: &str) {}

    /// The current custom stage finished.
    fn custom_stage_ended(&self) {}

    /// Loading for the group is complete.
    fn group_load_ended(&self, group: &str) {}

    /// A resource was registered with a group.
    fn resource_created(&self, resource: &ResourceHandle) {}

    /// A resource was removed from its group.
    fn resource_removed(&self, resource: &ResourceHandle) {}
}

/// Shared listener handle.
pub type ListenerHandle = Arc<dyn ResourceGroupListener>;

/// Intercepts resource stream resolution.
#[allow(unused_variables)]
pub trait LoadingListener: Send + Sync {
    /// Offers a replacement stream for the named resource; return `None`
    /// to fall through to normal group resolution.
    fn resource_loading(&self, name: &str, group: &str) -> Option<SharedStream> {
        None
    }

    /// Called after a stream has been resolved, before it is returned.
    fn resource_stream_opened(&self, name: &str, group: &str, stream: &mut dyn DataStream) {}
}
