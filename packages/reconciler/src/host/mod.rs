//! Host binding: the only way the reconciler touches the host tree.

pub mod memory;

pub use memory::{HostNode, HostNodeKind, HostOp, HostSnapshot, MemoryHost, NodeId};

use crate::config::StaleAttributes;
use arbor_vdom::{event_name, is_event_prop, Listener, PropValue, Props};
use std::fmt::Debug;
use tracing::trace;

/// Host tree operations. Implementations are assumed to always succeed.
pub trait HostBinding {
    /// Opaque reference to a host node
    type Handle: Clone + PartialEq + Debug;

    fn create_node(&mut self, tag: &str) -> Self::Handle;

    fn create_text_node(&mut self) -> Self::Handle;

    fn set_attribute(&mut self, node: &Self::Handle, key: &str, value: &PropValue);

    fn remove_attribute(&mut self, node: &Self::Handle, key: &str);

    fn add_listener(&mut self, node: &Self::Handle, event: &str, listener: &Listener);

    fn remove_listener(&mut self, node: &Self::Handle, event: &str, listener: &Listener);

    fn append_child(&mut self, parent: &Self::Handle, child: &Self::Handle);

    fn remove_child(&mut self, parent: &Self::Handle, child: &Self::Handle);
}

/// Bring a host node from `prev` props to `next` props.
///
/// Removals run before additions: stale listeners, then stale attributes,
/// then new listeners, then new attributes. A key counts as changed when its
/// value differs; listeners compare by identity.
pub fn update_host_props<H: HostBinding>(
    host: &mut H,
    node: &H::Handle,
    prev: &Props,
    next: &Props,
    stale: StaleAttributes,
) {
    let changed = |key: &str| prev.get(key) != next.get(key);

    for (key, value) in prev.attributes() {
        if !is_event_prop(key) || !changed(key) {
            continue;
        }
        if let Some(listener) = value.as_listener() {
            trace!(key = %key, "Removing listener");
            host.remove_listener(node, &event_name(key), listener);
        }
    }

    if stale == StaleAttributes::Clear {
        for key in prev.attributes().keys() {
            if !is_event_prop(key) && !next.contains(key) {
                trace!(key = %key, "Removing attribute");
                host.remove_attribute(node, key);
            }
        }
    }

    for (key, value) in next.attributes() {
        if !is_event_prop(key) || !changed(key) {
            continue;
        }
        if let Some(listener) = value.as_listener() {
            trace!(key = %key, "Adding listener");
            host.add_listener(node, &event_name(key), listener);
        }
    }

    for (key, value) in next.attributes() {
        if !is_event_prop(key) && changed(key) {
            trace!(key = %key, "Setting attribute");
            host.set_attribute(node, key, value);
        }
    }
}
