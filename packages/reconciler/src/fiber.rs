use arbor_vdom::{NodeType, Props, VNode};
use std::fmt;
use std::rc::Rc;

/// Index of a fiber inside its [`FiberTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FiberId(u32);

impl FiberId {
    pub const ROOT: FiberId = FiberId(0);

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for FiberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "f{}", self.0)
    }
}

/// Host mutation assigned during reconciliation, consumed by the commit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Effect {
    #[default]
    None,
    Placement,
    Update,
    Deletion,
}

/// One unit of work / work-done record.
///
/// `parent` and `alternate` are non-owning indices. `alternate` points into
/// the tree this fiber's generation was diffed against.
#[derive(Debug, Clone)]
pub struct Fiber<H> {
    pub(crate) node_type: Option<NodeType>,
    pub(crate) props: Rc<Props>,
    pub(crate) parent: Option<FiberId>,
    pub(crate) first_child: Option<FiberId>,
    pub(crate) next_sibling: Option<FiberId>,
    pub(crate) host: Option<H>,
    pub(crate) alternate: Option<FiberId>,
    pub(crate) effect: Effect,
}

impl<H> Fiber<H> {
    pub(crate) fn root(element: VNode, container: H, alternate: Option<FiberId>) -> Self {
        Self {
            node_type: None,
            props: Rc::new(Props::with_children(vec![element])),
            parent: None,
            first_child: None,
            next_sibling: None,
            host: Some(container),
            alternate,
            effect: Effect::None,
        }
    }

    pub(crate) fn placement(element: &VNode, parent: FiberId) -> Self {
        Self {
            node_type: Some(element.node_type().clone()),
            props: element.shared_props(),
            parent: Some(parent),
            first_child: None,
            next_sibling: None,
            host: None,
            alternate: None,
            effect: Effect::Placement,
        }
    }

    pub(crate) fn update(
        element: &VNode,
        parent: FiberId,
        host: Option<H>,
        alternate: FiberId,
    ) -> Self {
        Self {
            node_type: Some(element.node_type().clone()),
            props: element.shared_props(),
            parent: Some(parent),
            first_child: None,
            next_sibling: None,
            host,
            alternate: Some(alternate),
            effect: Effect::Update,
        }
    }

    /// `None` for the synthetic root
    pub fn node_type(&self) -> Option<&NodeType> {
        self.node_type.as_ref()
    }

    pub fn props(&self) -> &Props {
        &self.props
    }

    pub fn parent(&self) -> Option<FiberId> {
        self.parent
    }

    pub fn first_child(&self) -> Option<FiberId> {
        self.first_child
    }

    pub fn next_sibling(&self) -> Option<FiberId> {
        self.next_sibling
    }

    pub fn host(&self) -> Option<&H> {
        self.host.as_ref()
    }

    pub fn alternate(&self) -> Option<FiberId> {
        self.alternate
    }

    pub fn effect(&self) -> Effect {
        self.effect
    }

    pub fn is_root(&self) -> bool {
        self.node_type.is_none()
    }
}

/// One generation of fibers.
///
/// The arena owns every fiber of the generation; links between fibers are
/// plain indices. The root is always [`FiberId::ROOT`].
#[derive(Debug, Clone)]
pub struct FiberTree<H> {
    generation: u64,
    base: Option<u64>,
    fibers: Vec<Fiber<H>>,
}

impl<H> FiberTree<H> {
    pub(crate) fn new(generation: u64, base: Option<u64>, root: Fiber<H>) -> Self {
        Self {
            generation,
            base,
            fibers: vec![root],
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Generation that `alternate` indices of this tree refer to
    pub fn base(&self) -> Option<u64> {
        self.base
    }

    pub fn root(&self) -> &Fiber<H> {
        self.get(FiberId::ROOT)
    }

    pub fn get(&self, id: FiberId) -> &Fiber<H> {
        &self.fibers[id.index()]
    }

    pub(crate) fn get_mut(&mut self, id: FiberId) -> &mut Fiber<H> {
        &mut self.fibers[id.index()]
    }

    pub(crate) fn push(&mut self, fiber: Fiber<H>) -> FiberId {
        let id = FiberId(self.fibers.len() as u32);
        self.fibers.push(fiber);
        id
    }

    /// Number of fibers allocated in this generation, reachable or not
    pub fn len(&self) -> usize {
        self.fibers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fibers.is_empty()
    }

    pub(crate) fn set_host(&mut self, id: FiberId, handle: H) {
        let fiber = self.get_mut(id);
        debug_assert!(fiber.host.is_none(), "host handle assigned twice");
        fiber.host = Some(handle);
    }

    /// Depth-first pre-order successor: first child, else the nearest
    /// sibling of the fiber or one of its ancestors.
    pub fn next_in_preorder(&self, id: FiberId) -> Option<FiberId> {
        if let Some(child) = self.get(id).first_child {
            return Some(child);
        }
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let fiber = self.get(current);
            if let Some(sibling) = fiber.next_sibling {
                return Some(sibling);
            }
            cursor = fiber.parent;
        }
        None
    }

    /// Reachable fibers in pre-order, root first
    pub fn iter(&self) -> Preorder<'_, H> {
        Preorder {
            tree: self,
            next: Some(FiberId::ROOT),
        }
    }

    pub fn children(&self, id: FiberId) -> Children<'_, H> {
        Children {
            tree: self,
            next: self.get(id).first_child,
        }
    }

    /// Host handle of the nearest ancestor that has one
    pub fn host_parent(&self, id: FiberId) -> Option<&H> {
        let mut cursor = self.get(id).parent;
        while let Some(current) = cursor {
            let fiber = self.get(current);
            if let Some(host) = &fiber.host {
                return Some(host);
            }
            cursor = fiber.parent;
        }
        None
    }

    /// The fiber's own host handle, or the first one found down the
    /// `first_child` chain for component fibers
    pub fn first_host(&self, id: FiberId) -> Option<&H> {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let fiber = self.get(current);
            if let Some(host) = &fiber.host {
                return Some(host);
            }
            cursor = fiber.first_child;
        }
        None
    }
}

pub struct Preorder<'a, H> {
    tree: &'a FiberTree<H>,
    next: Option<FiberId>,
}

impl<'a, H> Iterator for Preorder<'a, H> {
    type Item = (FiberId, &'a Fiber<H>);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        self.next = self.tree.next_in_preorder(id);
        Some((id, self.tree.get(id)))
    }
}

pub struct Children<'a, H> {
    tree: &'a FiberTree<H>,
    next: Option<FiberId>,
}

impl<'a, H> Iterator for Children<'a, H> {
    type Item = (FiberId, &'a Fiber<H>);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        let fiber = self.tree.get(id);
        self.next = fiber.next_sibling;
        Some((id, fiber))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_with(children: &[&str]) -> FiberTree<u32> {
        let element = VNode::host("div");
        let mut tree = FiberTree::new(1, None, Fiber::root(element.clone(), 0, None));
        let top = tree.push(Fiber::placement(&element, FiberId::ROOT));
        tree.get_mut(FiberId::ROOT).first_child = Some(top);

        let mut prev: Option<FiberId> = None;
        for tag in children {
            let id = tree.push(Fiber::placement(&VNode::host(*tag), top));
            match prev {
                None => tree.get_mut(top).first_child = Some(id),
                Some(p) => tree.get_mut(p).next_sibling = Some(id),
            }
            prev = Some(id);
        }
        tree
    }

    #[test]
    fn test_preorder_walk() {
        let tree = tree_with(&["a", "p", "span"]);
        let order: Vec<String> = tree
            .iter()
            .map(|(_, f)| f.node_type().map(|t| t.to_string()).unwrap_or_default())
            .collect();
        assert_eq!(order, vec!["", "div", "a", "p", "span"]);

        let roots: Vec<FiberId> = tree
            .iter()
            .filter(|(_, f)| f.is_root())
            .map(|(id, _)| id)
            .collect();
        assert_eq!(roots, vec![FiberId::ROOT]);
    }

    #[test]
    fn test_children_iter() {
        let tree = tree_with(&["a", "p"]);
        let top = tree.root().first_child().unwrap();
        let tags: Vec<String> = tree
            .children(top)
            .map(|(_, f)| f.node_type().unwrap().to_string())
            .collect();
        assert_eq!(tags, vec!["a", "p"]);
        assert_eq!(tree.children(FiberId(2)).count(), 0);
    }

    #[test]
    fn test_host_lookup_skips_handleless_fibers() {
        let mut tree = tree_with(&["a"]);
        let top = tree.root().first_child().unwrap();
        let leaf = tree.get(top).first_child().unwrap();

        // Only the root container has a handle so far.
        assert_eq!(tree.host_parent(leaf), Some(&0));
        assert_eq!(tree.first_host(top), None);

        tree.set_host(leaf, 7);
        assert_eq!(tree.first_host(top), Some(&7));

        tree.set_host(top, 3);
        assert_eq!(tree.host_parent(leaf), Some(&3));
        assert_eq!(tree.first_host(top), Some(&3));
    }
}
