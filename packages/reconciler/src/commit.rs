use crate::config::StaleAttributes;
use crate::fiber::{Effect, FiberId, FiberTree};
use crate::host::{update_host_props, HostBinding};
use arbor_vdom::Props;
use serde::Serialize;
use tracing::{info, instrument, trace, warn};

/// Fibers committed per effect
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CommitSummary {
    pub placements: usize,
    pub updates: usize,
    pub deletions: usize,
}

/// Apply a finished traversal to the host tree.
///
/// Deletions go first, in the order they were collected, resolved against
/// `current` (the tree they were taken from). Then the work-in-progress tree
/// is walked in pre-order: placements are appended under the nearest host
/// ancestor and updates diff `alternate.props` into `props`. Never yields.
#[instrument(skip_all, fields(generation = wip.generation(), deletions = deletions.len()))]
pub(crate) fn commit_root<H: HostBinding>(
    host: &mut H,
    wip: &FiberTree<H::Handle>,
    current: Option<&FiberTree<H::Handle>>,
    deletions: &[FiberId],
    stale: StaleAttributes,
) -> CommitSummary {
    let mut summary = CommitSummary::default();

    if let Some(old_tree) = current {
        for &id in deletions {
            commit_deletion(host, old_tree, id);
            summary.deletions += 1;
        }
    }

    let empty = Props::default();
    let mut cursor = wip.root().first_child();
    while let Some(id) = cursor {
        let fiber = wip.get(id);
        match fiber.effect() {
            Effect::Placement => {
                summary.placements += 1;
                if let (Some(node), Some(parent)) = (fiber.host(), wip.host_parent(id)) {
                    trace!(fiber = %id, "Appending host node");
                    host.append_child(parent, node);
                }
            }
            Effect::Update => {
                summary.updates += 1;
                if let Some(node) = fiber.host() {
                    let prev = match (fiber.alternate(), current) {
                        (Some(alt), Some(old_tree)) => old_tree.get(alt).props(),
                        _ => &empty,
                    };
                    update_host_props(host, node, prev, fiber.props(), stale);
                }
            }
            Effect::Deletion | Effect::None => {}
        }
        cursor = wip.next_in_preorder(id);
    }

    info!(
        placements = summary.placements,
        updates = summary.updates,
        deletions = summary.deletions,
        "Commit complete"
    );
    summary
}

fn commit_deletion<H: HostBinding>(host: &mut H, tree: &FiberTree<H::Handle>, id: FiberId) {
    let Some(parent) = tree.host_parent(id) else {
        warn!(fiber = %id, "Deleted fiber has no host ancestor");
        return;
    };
    match tree.first_host(id) {
        Some(node) => {
            trace!(fiber = %id, "Removing host node");
            host.remove_child(parent, node);
        }
        None => trace!(fiber = %id, "Deleted fiber owns no host node"),
    }
}
