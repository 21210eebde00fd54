use crate::config::StaleAttributes;
use crate::error::{ReconcileError, ReconcileResult};
use crate::fiber::{FiberId, FiberTree};
use crate::host::{update_host_props, HostBinding};
use crate::reconcile::reconcile_children;
use arbor_vdom::{NodeType, Props};
use std::borrow::Cow;
use tracing::{debug, trace};

/// Expand one fiber and return the next unit of work.
///
/// Component fibers call their function to get their single child; host and
/// text fibers get a host node (if they have none yet) with all props
/// applied. Either way the children are then reconciled against the
/// alternate. On a component failure the fiber is left untouched.
pub(crate) fn perform_unit_of_work<H: HostBinding>(
    host: &mut H,
    wip: &mut FiberTree<H::Handle>,
    current: Option<&mut FiberTree<H::Handle>>,
    deletions: &mut Vec<FiberId>,
    fiber: FiberId,
) -> ReconcileResult<Option<FiberId>> {
    let (node_type, props) = {
        let f = wip.get(fiber);
        (f.node_type.clone(), f.props.clone())
    };
    trace!(
        fiber = %fiber,
        node_type = ?node_type.as_ref().map(ToString::to_string),
        "Performing unit of work"
    );

    let children = match &node_type {
        Some(NodeType::Component(component)) => {
            debug!(component = %component.name(), "Rendering component");
            let output = component
                .call(&props)
                .map_err(|source| ReconcileError::Component {
                    component: component.name().to_string(),
                    source,
                })?;
            Cow::Owned(vec![output])
        }
        Some(NodeType::Host(tag)) => {
            if wip.get(fiber).host.is_none() {
                let handle = host.create_node(tag);
                apply_initial_props(host, &handle, &props);
                wip.set_host(fiber, handle);
            }
            Cow::Borrowed(props.children())
        }
        Some(NodeType::Text) => {
            if wip.get(fiber).host.is_none() {
                let handle = host.create_text_node();
                apply_initial_props(host, &handle, &props);
                wip.set_host(fiber, handle);
            }
            Cow::Borrowed(props.children())
        }
        None => Cow::Borrowed(props.children()),
    };

    reconcile_children(wip, current, fiber, &children, deletions);

    Ok(wip.next_in_preorder(fiber))
}

fn apply_initial_props<H: HostBinding>(host: &mut H, handle: &H::Handle, props: &Props) {
    // Nothing is stale on a fresh node, so the policy is irrelevant.
    update_host_props(host, handle, &Props::default(), props, StaleAttributes::Retain);
}
