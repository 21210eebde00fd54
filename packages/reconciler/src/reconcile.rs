//! Positional child diffing.
//!
//! Children are matched by index and type only: the i-th new element is
//! compared with the i-th fiber of the alternate's child chain. There is no
//! key-based matching, so an insertion at the front shifts every later
//! position into a type comparison with its old neighbour.

use crate::fiber::{Effect, Fiber, FiberId, FiberTree};
use arbor_vdom::VNode;
use tracing::trace;

/// Build `parent`'s new child chain from `elements`, tagging effects.
///
/// `current` is the tree the work-in-progress generation is diffed against.
/// Old fibers without a same-type successor are tagged [`Effect::Deletion`]
/// in `current` and appended to `deletions`; they are never linked into
/// `wip`.
pub(crate) fn reconcile_children<H: Clone>(
    wip: &mut FiberTree<H>,
    mut current: Option<&mut FiberTree<H>>,
    parent: FiberId,
    elements: &[VNode],
    deletions: &mut Vec<FiberId>,
) {
    debug_assert!(
        wip.get(parent).first_child.is_none(),
        "fiber {} expanded twice",
        parent
    );

    let alternate = wip.get(parent).alternate;
    let mut old = match (alternate, current.as_deref()) {
        (Some(alt), Some(tree)) => tree.get(alt).first_child,
        _ => None,
    };
    let mut index = 0;
    let mut prev_sibling: Option<FiberId> = None;

    while index < elements.len() || old.is_some() {
        let element = elements.get(index);
        let old_fiber = match (old, current.as_deref()) {
            (Some(id), Some(tree)) => Some((id, tree.get(id))),
            _ => None,
        };
        let next_old = old_fiber.and_then(|(_, fiber)| fiber.next_sibling);

        let (new_fiber, deleted) = match (old_fiber, element) {
            (Some((old_id, fiber)), Some(element))
                if fiber.node_type.as_ref() == Some(element.node_type()) =>
            {
                let update = Fiber::update(element, parent, fiber.host.clone(), old_id);
                (Some(update), None)
            }
            (old_fiber, element) => (
                element.map(|e| Fiber::placement(e, parent)),
                old_fiber.map(|(old_id, _)| old_id),
            ),
        };

        if let Some(old_id) = deleted {
            if let Some(tree) = current.as_deref_mut() {
                tree.get_mut(old_id).effect = Effect::Deletion;
            }
            trace!(fiber = %old_id, index, "Old fiber marked for deletion");
            deletions.push(old_id);
        }

        if let Some(fiber) = new_fiber {
            trace!(index, effect = ?fiber.effect, "Child fiber created");
            let id = wip.push(fiber);
            match prev_sibling {
                None => wip.get_mut(parent).first_child = Some(id),
                Some(prev) => wip.get_mut(prev).next_sibling = Some(id),
            }
            prev_sibling = Some(id);
        }

        old = next_old;
        index += 1;
    }
}
